//! Client-side checks run when the customer presses "submit".
//!
//! Every rule is evaluated so that all problems surface at once; the order is
//! sent only when the returned list is empty.

use crate::draft::OrderDraft;
use crate::OrderType;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d\s\-()+]{10,}$").unwrap());

/// User-visible texts, in the storefront's language.
pub mod messages {
    pub const NAME_REQUIRED: &str = "Пожалуйста, укажите ваше имя";
    pub const PHONE_INVALID: &str = "Пожалуйста, укажите корректный номер телефона";
    pub const ORDER_TYPE_REQUIRED: &str = "Пожалуйста, выберите тип заказа";
    pub const BUY_SELECTION_REQUIRED: &str =
        "Выберите хотя бы одну игру или дополнительный товар";
    pub const DOUBLE_BUY_SELECTION: &str = "Для игры «2 в 1» выберите ровно две игры";
    pub const DELIVERY_ADDRESS_REQUIRED: &str = "Пожалуйста, укажите адрес доставки";
    pub const RENT_OPTION_REQUIRED: &str = "Пожалуйста, выберите вариант аренды";
    pub const RENT_DATE_REQUIRED: &str = "Пожалуйста, выберите дату аренды";
    pub const RENT_ADDRESS_REQUIRED: &str = "Пожалуйста, укажите адрес проведения";
    pub const SUBMIT_FAILED: &str = "Произошла ошибка при отправке заказа. Попробуйте ещё раз.";
    pub const ORDER_ACCEPTED: &str = "Заказ успешно оформлен!";

    pub fn rent_games_mismatch(expected: usize, selected: usize) -> String {
        format!(
            "Выберите ровно {} игр(ы) для этой аренды (выбрано: {})",
            expected, selected
        )
    }
}

/// Free-text inputs of the order dialog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderFields {
    pub name: String,
    pub phone: String,
    pub delivery_address: String,
    pub engraving: bool,
    pub rent_date: String,
    pub rent_address: String,
    pub comment: String,
}

/// Named regions of the dialog an error message can be attached to.
///
/// Variant order is the top-to-bottom order on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FormField {
    Name,
    Phone,
    OrderType,
    BuySelection,
    DeliveryAddress,
    RentOption,
    RentGames,
    RentDate,
    RentAddress,
}

impl FormField {
    /// Id of the element that displays this field's error.
    pub fn error_element_id(self) -> &'static str {
        match self {
            FormField::Name => "name-error",
            FormField::Phone => "phone-error",
            FormField::OrderType => "order-type-error",
            FormField::BuySelection => "buy-games-error",
            FormField::DeliveryAddress => "delivery-address-error",
            FormField::RentOption => "rent-type-error",
            FormField::RentGames => "rent-games-error",
            FormField::RentDate => "rent-date-error",
            FormField::RentAddress => "rent-address-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

impl FieldError {
    pub fn new(field: FormField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.field, self.message)
    }
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone.trim())
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Check the whole dialog. Errors come back in page order.
pub fn validate(draft: &OrderDraft, fields: &OrderFields) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if is_blank(&fields.name) {
        errors.push(FieldError::new(FormField::Name, messages::NAME_REQUIRED));
    }
    if !is_valid_phone(&fields.phone) {
        errors.push(FieldError::new(FormField::Phone, messages::PHONE_INVALID));
    }

    match draft.order_type {
        OrderType::Unset => {
            errors.push(FieldError::new(
                FormField::OrderType,
                messages::ORDER_TYPE_REQUIRED,
            ));
        }
        OrderType::Buy => {
            if draft.buy_games.is_empty() && draft.additional_goods.is_empty() {
                errors.push(FieldError::new(
                    FormField::BuySelection,
                    messages::BUY_SELECTION_REQUIRED,
                ));
            }
            if is_blank(&fields.delivery_address) {
                errors.push(FieldError::new(
                    FormField::DeliveryAddress,
                    messages::DELIVERY_ADDRESS_REQUIRED,
                ));
            }
        }
        OrderType::DoubleBuy => {
            if draft.buy_games.len() != crate::defaults::DOUBLE_BUY_GAMES {
                errors.push(FieldError::new(
                    FormField::BuySelection,
                    messages::DOUBLE_BUY_SELECTION,
                ));
            }
            if is_blank(&fields.delivery_address) {
                errors.push(FieldError::new(
                    FormField::DeliveryAddress,
                    messages::DELIVERY_ADDRESS_REQUIRED,
                ));
            }
        }
        OrderType::Rent => {
            if draft.rent_option_id.is_none() {
                errors.push(FieldError::new(
                    FormField::RentOption,
                    messages::RENT_OPTION_REQUIRED,
                ));
            } else if draft.rent_games.len() != draft.max_selectable_games {
                errors.push(FieldError::new(
                    FormField::RentGames,
                    messages::rent_games_mismatch(
                        draft.max_selectable_games,
                        draft.rent_games.len(),
                    ),
                ));
            }
            if is_blank(&fields.rent_date) {
                errors.push(FieldError::new(
                    FormField::RentDate,
                    messages::RENT_DATE_REQUIRED,
                ));
            }
            if is_blank(&fields.rent_address) {
                errors.push(FieldError::new(
                    FormField::RentAddress,
                    messages::RENT_ADDRESS_REQUIRED,
                ));
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample_catalog;

    fn contact() -> OrderFields {
        OrderFields {
            name: "Анна".into(),
            phone: "+7 (912) 345-67-89".into(),
            ..OrderFields::default()
        }
    }

    fn fields_of(errors: &[FieldError]) -> Vec<FormField> {
        errors.iter().map(|e| e.field).collect()
    }

    #[test]
    fn phone_pattern() {
        assert!(is_valid_phone("+7 (912) 345-67-89"));
        assert!(is_valid_phone("89123456789"));
        assert!(!is_valid_phone("abc"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("8912345678x"));
    }

    #[test]
    fn empty_name_and_bad_phone_both_reported() {
        let mut draft = OrderDraft::default();
        draft.order_type = OrderType::Buy;
        draft.buy_games = vec![1];
        let fields = OrderFields {
            name: "   ".into(),
            phone: "abc".into(),
            delivery_address: "ул. Ленина, 1".into(),
            ..OrderFields::default()
        };
        let errors = validate(&draft, &fields);
        assert_eq!(fields_of(&errors), vec![FormField::Name, FormField::Phone]);
    }

    #[test]
    fn unset_type_is_rejected() {
        let errors = validate(&OrderDraft::default(), &contact());
        assert_eq!(fields_of(&errors), vec![FormField::OrderType]);
    }

    #[test]
    fn buy_needs_items_and_address() {
        let mut draft = OrderDraft::default();
        draft.order_type = OrderType::Buy;
        let errors = validate(&draft, &contact());
        assert_eq!(
            fields_of(&errors),
            vec![FormField::BuySelection, FormField::DeliveryAddress]
        );

        draft.additional_goods = vec![100];
        let mut fields = contact();
        fields.delivery_address = "Москва".into();
        assert!(validate(&draft, &fields).is_empty());
    }

    #[test]
    fn double_buy_needs_exactly_two() {
        let mut draft = OrderDraft::default();
        draft.order_type = OrderType::DoubleBuy;
        draft.buy_games = vec![1];
        let mut fields = contact();
        fields.delivery_address = "Москва".into();
        assert_eq!(
            fields_of(&validate(&draft, &fields)),
            vec![FormField::BuySelection]
        );
        draft.buy_games = vec![1, 2];
        assert!(validate(&draft, &fields).is_empty());
    }

    #[test]
    fn rent_count_must_match_exactly() {
        let catalog = sample_catalog();
        let mut draft = OrderDraft::default();
        draft.set_order_type(OrderType::Rent);
        draft.select_rent_option(&catalog, Some(10));
        draft.toggle_rent_game(&catalog, 1, true);
        draft.toggle_rent_game(&catalog, 2, true);

        let mut fields = contact();
        fields.rent_date = "2026-12-31".into();
        fields.rent_address = "Кафе «Буква»".into();

        let errors = validate(&draft, &fields);
        assert_eq!(fields_of(&errors), vec![FormField::RentGames]);
        assert!(errors[0].message.contains('3'));

        draft.toggle_rent_game(&catalog, 3, true);
        assert!(validate(&draft, &fields).is_empty());
    }

    #[test]
    fn rent_without_option_reports_every_missing_field() {
        let mut draft = OrderDraft::default();
        draft.order_type = OrderType::Rent;
        let errors = validate(&draft, &contact());
        assert_eq!(
            fields_of(&errors),
            vec![
                FormField::RentOption,
                FormField::RentDate,
                FormField::RentAddress
            ]
        );
    }
}
