//! Client-side widgets of the Bulka Play storefront.
//!
//! The library holds the page-independent logic: the order draft and its
//! selection rules, pricing, validation, submission and the small gallery and
//! guest-count widgets. The binary mounts Yew components that drive it.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use wasm_bindgen::prelude::*;

/// Tunables of the order rules.
pub mod defaults {
    /// Discount per game when two games are bought for one board.
    pub const PAIR_DISCOUNT: f64 = 0.10;
    /// Games in a "two games on one board" order.
    pub const DOUBLE_BUY_GAMES: usize = 2;
    /// Smallest party the guest recommender asks the server about.
    pub const MIN_GUESTS: u32 = 2;
}

/// Catalog ids as rendered into `data-*-id` attributes.
pub type ItemId = u32;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    #[default]
    #[serde(rename = "")]
    Unset,
    Buy,
    DoubleBuy,
    Rent,
}

impl OrderType {
    /// Value of the `order_type` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderType::Unset => "",
            OrderType::Buy => "buy",
            OrderType::DoubleBuy => "double_buy",
            OrderType::Rent => "rent",
        }
    }

    /// Parse a `<select>` value. Anything unknown means "not chosen".
    pub fn parse(raw: &str) -> OrderType {
        match raw.trim() {
            "buy" => OrderType::Buy,
            "double_buy" => OrderType::DoubleBuy,
            "rent" => OrderType::Rent,
            _ => OrderType::Unset,
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub mod api;
pub mod carousel;
pub mod catalog;
pub mod draft;
pub mod form;
pub mod guests;
pub mod menu;
pub mod pricing;
pub mod submission;
pub mod validation;

use catalog::Catalog;
use draft::OrderDraft;

/// Total of a draft for inline page scripts that still render their own
/// summary.
///
/// # Arguments
/// * `catalog_csv` - The page's catalog block
/// * `draft_js` - A serialized `OrderDraft`
///
/// # Returns
/// The formatted total (`"1290,50"`), or `"0,00"` when the input is unusable
#[wasm_bindgen]
pub fn quote_order(catalog_csv: &str, draft_js: JsValue) -> String {
    let catalog = match Catalog::from_csv_str(catalog_csv) {
        Ok(c) => c,
        Err(e) => {
            warn!("quote_order: {}", e);
            return pricing::format_price(0.0);
        }
    };

    let draft: OrderDraft = match serde_wasm_bindgen::from_value(draft_js) {
        Ok(d) => d,
        Err(e) => {
            warn!("quote_order: failed to deserialize draft: {}", e);
            return pricing::format_price(0.0);
        }
    };

    quote_normalized(&catalog, draft)
}

/// Price a draft that did not come from the dialog's own reducer.
fn quote_normalized(catalog: &Catalog, mut draft: OrderDraft) -> String {
    draft.normalize(catalog);
    pricing::quote(catalog, &draft).display()
}
