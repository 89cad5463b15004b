//! Whether the current page belongs to a signed-in buyer.

use serde::{Deserialize, Serialize};

/// Authentication mode of the page session.
///
/// The backend returns differently shaped cart lines for signed-in and
/// anonymous buyers, so every cart read is made in one of these modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// Signed-in buyer; prices live on the nested seller-product.
    Authenticated,
    /// Session cart; prices are flattened onto the line.
    #[default]
    Anonymous,
}

impl AuthMode {
    /// Build from a boolean flag.
    #[must_use]
    pub const fn from_flag(authenticated: bool) -> Self {
        if authenticated {
            Self::Authenticated
        } else {
            Self::Anonymous
        }
    }

    /// Returns true for [`AuthMode::Authenticated`].
    #[must_use]
    pub const fn is_authenticated(self) -> bool {
        matches!(self, Self::Authenticated)
    }
}

impl std::fmt::Display for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authenticated => write!(f, "authenticated"),
            Self::Anonymous => write!(f, "anonymous"),
        }
    }
}

impl std::str::FromStr for AuthMode {
    type Err = String;

    /// Accepts the template flag (`True`/`False`) as well as lowercase
    /// booleans and `1`/`0`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "True" | "true" | "1" | "authenticated" => Ok(Self::Authenticated),
            "False" | "false" | "0" | "" | "anonymous" => Ok(Self::Anonymous),
            other => Err(format!("invalid authentication flag: {other}")),
        }
    }
}
