//! Order dialog controller.
//!
//! All UI interaction is expressed as a `FormEvent`; `OrderForm::apply` is
//! the single place state changes, which makes the handler set enumerable and
//! testable without a document. The Yew side drives it through `use_reducer`.

use crate::catalog::Catalog;
use crate::draft::OrderDraft;
use crate::pricing::{self, Quote};
use crate::submission::SubmitOutcome;
use crate::validation::{FieldError, FormField, OrderFields};
use crate::{ItemId, OrderType};
use log::debug;
use std::rc::Rc;
use yew::Reducible;

/// Editable text inputs of the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Name,
    Phone,
    DeliveryAddress,
    RentDate,
    RentAddress,
    Comment,
}

impl TextField {
    /// Editing a field hides the error shown for it.
    fn error_field(self) -> Option<FormField> {
        match self {
            TextField::Name => Some(FormField::Name),
            TextField::Phone => Some(FormField::Phone),
            TextField::DeliveryAddress => Some(FormField::DeliveryAddress),
            TextField::RentDate => Some(FormField::RentDate),
            TextField::RentAddress => Some(FormField::RentAddress),
            TextField::Comment => None,
        }
    }
}

/// Preset applied when the dialog is opened from a specific button.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpenPreset {
    pub order_type: Option<OrderType>,
    pub rent_option: Option<ItemId>,
    pub game: Option<ItemId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    DialogOpened(OpenPreset),
    DialogCloseRequested,
    OrderTypeChanged(OrderType),
    RentOptionChanged(Option<ItemId>),
    DoubleGameCountChanged(u8),
    BuyGameToggled(ItemId, bool),
    AdditionalGoodToggled(ItemId, bool),
    RentGameToggled(ItemId, bool),
    EngravingToggled(bool),
    TextEdited(TextField, String),
    ValidationFailed(Vec<FieldError>),
    SubmitStarted,
    SubmitFinished(SubmitOutcome),
    SuccessDismissed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderForm {
    pub catalog: Rc<Catalog>,
    pub draft: OrderDraft,
    pub fields: OrderFields,
    pub dialog_open: bool,
    /// Single pending-request flag; the submit button is disabled while set.
    pub submitting: bool,
    pub errors: Vec<FieldError>,
    /// Bumped on every rejected submit. The view scrolls to the first error
    /// once the messages are rendered.
    pub error_scroll: u32,
    pub form_error: Option<String>,
    /// Confirmation text shown after the server accepted the order.
    pub success: Option<String>,
}

impl OrderForm {
    pub fn new(catalog: Rc<Catalog>) -> Self {
        Self {
            catalog,
            draft: OrderDraft::default(),
            fields: OrderFields::default(),
            dialog_open: false,
            submitting: false,
            errors: Vec::new(),
            error_scroll: 0,
            form_error: None,
            success: None,
        }
    }

    pub fn quote(&self) -> Quote {
        pricing::quote(&self.catalog, &self.draft)
    }

    pub fn error_for(&self, field: FormField) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Element id of the first error on the page, to scroll to.
    pub fn first_error_element(&self) -> Option<&'static str> {
        self.errors
            .iter()
            .map(|e| e.field)
            .min()
            .map(FormField::error_element_id)
    }

    fn clear_error(&mut self, field: FormField) {
        self.errors.retain(|e| e.field != field);
    }

    fn reset_order(&mut self) {
        self.draft = OrderDraft::default();
        self.fields = OrderFields::default();
        self.errors.clear();
        self.form_error = None;
    }

    pub fn apply(&mut self, event: FormEvent) {
        debug!("Order form event: {:?}", event);
        let catalog = Rc::clone(&self.catalog);
        match event {
            FormEvent::DialogOpened(preset) => {
                self.dialog_open = true;
                self.form_error = None;
                if let Some(order_type) = preset.order_type {
                    self.draft.set_order_type(order_type);
                }
                if preset.rent_option.is_some() {
                    self.draft.select_rent_option(&catalog, preset.rent_option);
                }
                if let Some(game) = preset.game {
                    match self.draft.order_type {
                        OrderType::Rent => self.draft.toggle_rent_game(&catalog, game, true),
                        OrderType::Buy | OrderType::DoubleBuy => {
                            self.draft.toggle_buy_game(&catalog, game, true)
                        }
                        OrderType::Unset => {}
                    }
                }
            }
            FormEvent::DialogCloseRequested => {
                self.dialog_open = false;
            }
            FormEvent::OrderTypeChanged(order_type) => {
                self.draft.set_order_type(order_type);
                self.clear_error(FormField::OrderType);
            }
            FormEvent::RentOptionChanged(option) => {
                self.draft.select_rent_option(&catalog, option);
                self.clear_error(FormField::RentOption);
                self.clear_error(FormField::RentGames);
            }
            FormEvent::DoubleGameCountChanged(count) => {
                self.draft.set_double_game_count(count);
            }
            FormEvent::BuyGameToggled(id, checked) => {
                self.draft.toggle_buy_game(&catalog, id, checked);
                self.clear_error(FormField::BuySelection);
            }
            FormEvent::AdditionalGoodToggled(id, checked) => {
                self.draft.toggle_additional_good(&catalog, id, checked);
                self.clear_error(FormField::BuySelection);
            }
            FormEvent::RentGameToggled(id, checked) => {
                self.draft.toggle_rent_game(&catalog, id, checked);
                self.clear_error(FormField::RentGames);
            }
            FormEvent::EngravingToggled(on) => {
                self.fields.engraving = on;
            }
            FormEvent::TextEdited(field, value) => {
                match field {
                    TextField::Name => self.fields.name = value,
                    TextField::Phone => self.fields.phone = value,
                    TextField::DeliveryAddress => self.fields.delivery_address = value,
                    TextField::RentDate => self.fields.rent_date = value,
                    TextField::RentAddress => self.fields.rent_address = value,
                    TextField::Comment => self.fields.comment = value,
                }
                if let Some(error_field) = field.error_field() {
                    self.clear_error(error_field);
                }
            }
            FormEvent::ValidationFailed(errors) => {
                self.errors = errors;
                self.error_scroll = self.error_scroll.wrapping_add(1);
                self.form_error = None;
            }
            FormEvent::SubmitStarted => {
                self.submitting = true;
                self.errors.clear();
                self.form_error = None;
            }
            FormEvent::SubmitFinished(outcome) => {
                self.submitting = false;
                self.form_error = outcome.form_error().map(str::to_string);
                match outcome {
                    SubmitOutcome::Invalid(errors) => {
                        self.errors = errors;
                        self.error_scroll = self.error_scroll.wrapping_add(1);
                    }
                    SubmitOutcome::Accepted { message } => {
                        self.reset_order();
                        self.dialog_open = false;
                        self.success = Some(message);
                    }
                    SubmitOutcome::Rejected { .. } | SubmitOutcome::TransportFailed => {}
                }
            }
            FormEvent::SuccessDismissed => {
                self.success = None;
            }
        }
    }
}

impl Reducible for OrderForm {
    type Action = FormEvent;

    fn reduce(self: Rc<Self>, action: FormEvent) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample_catalog;
    use crate::validation::{self, messages};

    fn form() -> OrderForm {
        OrderForm::new(Rc::new(sample_catalog()))
    }

    #[test]
    fn opening_with_rent_preset_selects_option() {
        let mut form = form();
        form.apply(FormEvent::DialogOpened(OpenPreset {
            order_type: Some(OrderType::Rent),
            rent_option: Some(11),
            game: None,
        }));
        assert!(form.dialog_open);
        assert!(form.draft.shows_rent_section());
        assert_eq!(form.draft.rent_games, vec![2]);
        assert_eq!(form.quote().display(), "2500,00");
    }

    #[test]
    fn total_tracks_every_toggle() {
        let mut form = form();
        form.apply(FormEvent::OrderTypeChanged(OrderType::Buy));
        form.apply(FormEvent::BuyGameToggled(3, true));
        assert_eq!(form.quote().total, 990.0);
        form.apply(FormEvent::AdditionalGoodToggled(101, true));
        assert_eq!(form.quote().total, 1140.0);
        form.apply(FormEvent::BuyGameToggled(3, false));
        assert_eq!(form.quote().total, 150.0);
        form.apply(FormEvent::OrderTypeChanged(OrderType::Unset));
        assert!(!form.quote().show_summary);
    }

    #[test]
    fn editing_a_field_clears_its_error_only() {
        let mut form = form();
        let errors = validation::validate(&form.draft, &form.fields);
        form.apply(FormEvent::ValidationFailed(errors));
        assert!(form.error_for(FormField::Name).is_some());
        assert_eq!(form.first_error_element(), Some("name-error"));

        form.apply(FormEvent::TextEdited(TextField::Name, "Анна".into()));
        assert!(form.error_for(FormField::Name).is_none());
        assert!(form.error_for(FormField::Phone).is_some());
        assert_eq!(form.first_error_element(), Some("phone-error"));
    }

    #[test]
    fn every_rejected_submit_requests_a_scroll() {
        let mut form = form();
        assert_eq!(form.error_scroll, 0);

        let errors = validation::validate(&form.draft, &form.fields);
        form.apply(FormEvent::ValidationFailed(errors.clone()));
        assert_eq!(form.error_scroll, 1);

        // same errors again still scroll
        form.apply(FormEvent::ValidationFailed(errors.clone()));
        assert_eq!(form.error_scroll, 2);

        form.apply(FormEvent::SubmitStarted);
        form.apply(FormEvent::SubmitFinished(SubmitOutcome::Invalid(errors)));
        assert_eq!(form.error_scroll, 3);
        assert_eq!(form.first_error_element(), Some("name-error"));

        form.apply(FormEvent::TextEdited(TextField::Name, "Анна".into()));
        assert_eq!(form.error_scroll, 3);
    }

    #[test]
    fn submit_flag_is_cleared_on_every_outcome() {
        let outcomes = vec![
            SubmitOutcome::TransportFailed,
            SubmitOutcome::Rejected {
                message: "Нет".into(),
            },
            SubmitOutcome::Accepted {
                message: messages::ORDER_ACCEPTED.into(),
            },
            SubmitOutcome::Invalid(Vec::new()),
        ];
        for outcome in outcomes {
            let mut form = form();
            form.apply(FormEvent::DialogOpened(OpenPreset::default()));
            form.apply(FormEvent::SubmitStarted);
            assert!(form.submitting);
            form.apply(FormEvent::SubmitFinished(outcome));
            assert!(!form.submitting);
        }
    }

    #[test]
    fn accepted_order_closes_dialog_and_resets() {
        let mut form = form();
        form.apply(FormEvent::DialogOpened(OpenPreset::default()));
        form.apply(FormEvent::OrderTypeChanged(OrderType::Buy));
        form.apply(FormEvent::BuyGameToggled(1, true));
        form.apply(FormEvent::SubmitStarted);
        form.apply(FormEvent::SubmitFinished(SubmitOutcome::Accepted {
            message: "Готово".into(),
        }));
        assert!(!form.dialog_open);
        assert_eq!(form.success.as_deref(), Some("Готово"));
        assert_eq!(form.draft, OrderDraft::default());

        form.apply(FormEvent::SuccessDismissed);
        assert_eq!(form.success, None);
    }

    #[test]
    fn failed_submission_keeps_draft_for_retry() {
        let mut form = form();
        form.apply(FormEvent::DialogOpened(OpenPreset::default()));
        form.apply(FormEvent::OrderTypeChanged(OrderType::Buy));
        form.apply(FormEvent::BuyGameToggled(1, true));
        form.apply(FormEvent::SubmitStarted);
        form.apply(FormEvent::SubmitFinished(SubmitOutcome::TransportFailed));
        assert!(form.dialog_open);
        assert_eq!(form.form_error.as_deref(), Some(messages::SUBMIT_FAILED));
        assert_eq!(form.draft.buy_games, vec![1]);
    }

    #[test]
    fn reducer_returns_new_state() {
        let state = Rc::new(form());
        let next = state.clone().reduce(FormEvent::OrderTypeChanged(OrderType::Rent));
        assert_eq!(state.draft.order_type, OrderType::Unset);
        assert_eq!(next.draft.order_type, OrderType::Rent);
    }
}
