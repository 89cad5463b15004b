//! The order wizard.
//!
//! Four steps with a side menu. Exactly one step is open at a time. Moving
//! to the confirmation step copies the form into the read-only summary and
//! recalculates the order total from the total the page was loaded with.

use bazaar_core::{
    CheckoutDraft, DeliveryType, PaymentType, Price, Transition, WizardState, WizardStep,
    summary_total,
};
use rust_decimal::Decimal;

use crate::view::{
    CheckoutView, FormView, MenuEntryView, Notice, Region, Renderer, StepPageView, SummaryView,
};

/// Form values read at the moment of a transition.
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    pub draft: CheckoutDraft,
    /// Extra cost of express delivery.
    pub express_surcharge: Decimal,
}

/// Handle to the checkout page.
pub struct CheckoutPage<R> {
    wizard: WizardState,
    /// Order total when the page was loaded. Never changes.
    original_total: Price,
    price: Price,
    /// Form as read at the last transition.
    form: CheckoutForm,
    summary: SummaryView,
    notice: Option<Notice>,
    renderer: R,
}

impl<R: Renderer<CheckoutView>> CheckoutPage<R> {
    /// Open the page on the first step.
    pub fn new(original_total: Price, renderer: R) -> Self {
        let page = Self {
            wizard: WizardState::new(),
            original_total,
            price: original_total,
            form: CheckoutForm::default(),
            summary: SummaryView::default(),
            notice: None,
            renderer,
        };
        page.renderer.render(&page.view());
        page
    }

    /// The renderer this page draws with.
    #[must_use]
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The open step.
    #[must_use]
    pub const fn active(&self) -> WizardStep {
        self.wizard.active()
    }

    /// The total shown on the confirmation step.
    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    /// A side menu entry was clicked.
    pub fn select_menu(&mut self, step: WizardStep, form: &CheckoutForm) -> Transition {
        self.go_to(step, form)
    }

    /// A "next" button pointing at `step` was clicked.
    pub fn next(&mut self, step: WizardStep, form: &CheckoutForm) -> Transition {
        self.go_to(step, form)
    }

    /// Follow the open page's "next" button. Does nothing on the last step.
    pub fn advance(&mut self, form: &CheckoutForm) -> Option<Transition> {
        let step = self.wizard.active().next()?;
        Some(self.next(step, form))
    }

    fn go_to(&mut self, step: WizardStep, form: &CheckoutForm) -> Transition {
        let transition = self.wizard.go_to(step);
        tracing::debug!(from = %transition.from, to = %transition.to, "Checkout step");
        self.form.clone_from(form);
        if transition.entered_summary() {
            self.fill_summary(form);
        }
        self.renderer.render(&self.view());
        transition
    }

    fn fill_summary(&mut self, form: &CheckoutForm) {
        let draft = &form.draft;
        self.summary = SummaryView {
            full_name: draft.full_name.clone(),
            phone: draft.display_phone(),
            email: draft.email.clone(),
            delivery_type: draft.delivery.label().to_owned(),
            city: draft.city.clone(),
            address: draft.address.clone(),
            payment_type: draft.payment.label().to_owned(),
        };
        self.price = summary_total(self.original_total, draft.delivery, form.express_surcharge);

        let problems = draft.problems();
        self.notice = if problems.is_empty() {
            None
        } else {
            let message = problems
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            tracing::warn!("Checkout form has problems: {message}");
            Some(Notice {
                region: Region::Checkout,
                message,
            })
        };
        tracing::info!(delivery = %draft.delivery, price = %self.price.display(), "Checkout summary");
    }

    fn form_view(&self) -> FormView {
        let draft = &self.form.draft;
        FormView {
            full_name: draft.full_name.clone(),
            phone: draft.phone.clone(),
            email: draft.email.clone(),
            express: draft.delivery == DeliveryType::Express,
            city: draft.city.clone(),
            address: draft.address.clone(),
            pay_by_card: draft.payment == PaymentType::Card,
            express_price: self.form.express_surcharge.to_string(),
        }
    }

    /// Current page as a view model.
    #[must_use]
    pub fn view(&self) -> CheckoutView {
        let active = self.wizard.active();
        CheckoutView {
            menu: WizardStep::ALL
                .into_iter()
                .map(|step| MenuEntryView {
                    step,
                    path: step.path(),
                    title: step.title(),
                    active: step == active,
                })
                .collect(),
            pages: WizardStep::ALL
                .into_iter()
                .map(|step| StepPageView {
                    step,
                    path: step.path(),
                    open: self.wizard.is_open(step),
                    next_path: step.next().map(WizardStep::path),
                })
                .collect(),
            form: self.form_view(),
            summary: self.summary.clone(),
            total_price_value: self.price.amount_string(),
            cart_price: self.price.display(),
            notice: self.notice.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::view::RecordingRenderer;

    fn form(delivery: DeliveryType) -> CheckoutForm {
        CheckoutForm {
            draft: CheckoutDraft {
                full_name: "Ivan Petrov".into(),
                phone: "89991234567".into(),
                email: "ivan@example.com".into(),
                delivery,
                city: "Moscow".into(),
                address: "Tverskaya 1".into(),
                payment: PaymentType::RandomAccount,
            },
            express_surcharge: "15.00".parse().unwrap(),
        }
    }

    fn page() -> CheckoutPage<RecordingRenderer<CheckoutView>> {
        CheckoutPage::new(Price::usd("100.00".parse().unwrap()), RecordingRenderer::new())
    }

    fn assert_single_open(view: &CheckoutView, step: WizardStep) {
        assert_eq!(view.open_steps(), vec![step]);
        assert_eq!(view.active_steps(), vec![step]);
    }

    #[test]
    fn test_starts_on_first_step() {
        let page = page();
        let view = page.renderer().last().unwrap();
        assert_single_open(&view, WizardStep::One);
        assert_eq!(view.cart_price, "100.00$");
    }

    #[test]
    fn test_every_transition_leaves_one_step_open() {
        let mut page = page();
        let form = form(DeliveryType::Standard);
        for step in [
            WizardStep::Three,
            WizardStep::One,
            WizardStep::Four,
            WizardStep::Four,
            WizardStep::Two,
        ] {
            page.select_menu(step, &form);
            assert_single_open(&page.view(), step);
        }
    }

    #[test]
    fn test_summary_copies_form() {
        let mut page = page();
        let form = form(DeliveryType::Express);
        while page.advance(&form).is_some() {}

        assert_eq!(page.active(), WizardStep::Four);
        let view = page.view();
        assert_eq!(view.summary.full_name, "Ivan Petrov");
        assert_eq!(view.summary.phone, "+7 (999) 123-45-67");
        assert_eq!(view.summary.delivery_type, "Express delivery");
        assert_eq!(view.summary.payment_type, "Online from a random account");
        assert_eq!(view.summary.address, "Tverskaya 1");
        assert!(view.notice.is_none());
        assert_eq!(page.advance(&form), None);
    }

    #[test]
    fn test_express_toggle_never_compounds() {
        let mut page = page();

        page.next(WizardStep::Four, &form(DeliveryType::Express));
        assert_eq!(page.view().cart_price, "115.00$");
        assert_eq!(page.view().total_price_value, "115.00");

        page.select_menu(WizardStep::Two, &form(DeliveryType::Standard));
        page.next(WizardStep::Four, &form(DeliveryType::Standard));
        assert_eq!(page.view().cart_price, "100.00$");

        page.select_menu(WizardStep::Four, &form(DeliveryType::Express));
        page.select_menu(WizardStep::Four, &form(DeliveryType::Express));
        assert_eq!(page.price().display(), "115.00$");
    }

    #[test]
    fn test_summary_reads_form_at_transition_time() {
        let mut page = page();
        let mut form = form(DeliveryType::Standard);
        page.next(WizardStep::Four, &form);

        form.draft.city = "Kazan".into();
        page.select_menu(WizardStep::Three, &form);
        assert_eq!(page.view().summary.city, "Moscow");

        page.next(WizardStep::Four, &form);
        assert_eq!(page.view().summary.city, "Kazan");
    }

    #[test]
    fn test_form_inputs_follow_last_transition() {
        let mut page = page();
        assert_eq!(page.view().form, FormView::default());

        page.next(WizardStep::Two, &form(DeliveryType::Express));

        let view = page.view();
        assert_eq!(view.form.full_name, "Ivan Petrov");
        assert_eq!(view.form.phone, "89991234567");
        assert!(view.form.express);
        assert!(!view.form.pay_by_card);
        assert_eq!(view.form.express_price, "15.00");
    }

    #[test]
    fn test_invalid_contact_shows_notice_without_blocking() {
        let mut page = page();
        let mut form = form(DeliveryType::Standard);
        form.draft.phone = "12345".into();
        form.draft.email = "not-an-email".into();

        page.next(WizardStep::Four, &form);

        assert_eq!(page.active(), WizardStep::Four);
        let view = page.view();
        assert_eq!(view.summary.phone, "12345");
        let notice = view.notice.unwrap();
        assert_eq!(notice.region, Region::Checkout);
        assert!(notice.message.contains("; "));
    }
}
