//! Checkout wizard steps and the single-active-step state machine.

use serde::{Deserialize, Serialize};

/// One page of the checkout flow, in order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    /// Buyer details.
    #[default]
    One,
    /// Delivery.
    Two,
    /// Payment.
    Three,
    /// Read-only confirmation.
    Four,
}

impl WizardStep {
    /// Every step in page order.
    pub const ALL: [Self; 4] = [Self::One, Self::Two, Self::Three, Self::Four];

    /// The step whose entry copies the form into the summary.
    pub const SUMMARY: Self = Self::Four;

    /// Value of the `data-path` / `data-target` attributes.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::One => "one",
            Self::Two => "two",
            Self::Three => "three",
            Self::Four => "four",
        }
    }

    /// Menu caption.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::One => "User details",
            Self::Two => "Delivery",
            Self::Three => "Payment",
            Self::Four => "Confirmation",
        }
    }

    /// The step a "next" button on this page leads to.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::One => Some(Self::Two),
            Self::Two => Some(Self::Three),
            Self::Three => Some(Self::Four),
            Self::Four => None,
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

impl std::str::FromStr for WizardStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|step| step.path() == s.trim())
            .ok_or_else(|| format!("invalid wizard step: {s}"))
    }
}

/// What a transition did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Step that was active before.
    pub from: WizardStep,
    /// Step that is active now.
    pub to: WizardStep,
}

impl Transition {
    /// True when the summary must be refreshed from the form.
    ///
    /// Fires on every navigation to the summary, including re-selecting it.
    #[must_use]
    pub fn entered_summary(&self) -> bool {
        self.to == WizardStep::SUMMARY
    }
}

/// The checkout wizard: exactly one step is active at any time.
///
/// Only the active step is stored, so exactly one page is open and the
/// active menu entry always names the same step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WizardState {
    active: WizardStep,
}

impl WizardState {
    /// A wizard positioned on the first step.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The active step.
    #[must_use]
    pub const fn active(&self) -> WizardStep {
        self.active
    }

    /// Whether `step`'s page is open.
    #[must_use]
    pub fn is_open(&self, step: WizardStep) -> bool {
        self.active == step
    }

    /// Move to `step`, closing everything else.
    pub fn go_to(&mut self, step: WizardStep) -> Transition {
        let from = self.active;
        self.active = step;
        Transition { from, to: step }
    }
}
