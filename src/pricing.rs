//! Order total calculation.
//!
//! Prices arrive from server-rendered markup in the Russian locale
//! (`"1 290,50"`), so parsing is forgiving: anything that does not read as a
//! finite, non-negative number counts as zero.

use crate::catalog::Catalog;
use crate::defaults::PAIR_DISCOUNT;
use crate::draft::OrderDraft;
use crate::OrderType;

/// Parse a locale-formatted price. Malformed input yields `0.0`.
///
/// # Examples
/// ```
/// use bulka_play::pricing::parse_price;
/// assert_eq!(parse_price("1 290,50"), 1290.5);
/// assert_eq!(parse_price("abc"), 0.0);
/// ```
pub fn parse_price(raw: &str) -> f64 {
    let normalized: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => 0.0,
    }
}

/// Format an amount with two decimals and a comma separator (`"1290,50"`).
pub fn format_price(amount: f64) -> String {
    format!("{:.2}", amount).replace('.', ",")
}

/// Result of pricing the current draft.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub total: f64,
    /// Whether the summary panel should be shown at all.
    pub show_summary: bool,
}

impl Quote {
    pub fn display(&self) -> String {
        format_price(self.total)
    }
}

/// True when two games are bought together and the pair discount applies.
pub fn pair_pricing_applies(draft: &OrderDraft) -> bool {
    let pair_requested =
        draft.order_type == OrderType::DoubleBuy || draft.double_game_count == 2;
    pair_requested && draft.buy_games.len() == 2
}

/// Price the draft against the catalog.
pub fn quote(catalog: &Catalog, draft: &OrderDraft) -> Quote {
    let total = match draft.order_type {
        OrderType::Unset => 0.0,
        OrderType::Buy | OrderType::DoubleBuy => {
            let games: f64 = draft
                .buy_games
                .iter()
                .filter_map(|id| catalog.game(*id))
                .map(|game| game.price)
                .sum();
            let games = if pair_pricing_applies(draft) {
                games * (1.0 - PAIR_DISCOUNT)
            } else {
                games
            };
            let goods: f64 = draft
                .additional_goods
                .iter()
                .filter_map(|id| catalog.additional_good(*id))
                .map(|good| good.price)
                .sum();
            games + goods
        }
        OrderType::Rent => draft
            .rent_option_id
            .and_then(|id| catalog.rental_option(id))
            .map(|option| option.price)
            .unwrap_or(0.0),
    };

    let rent_selected = draft.order_type == OrderType::Rent && draft.rent_option_id.is_some();
    Quote {
        total,
        show_summary: total > 0.0 || rent_selected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample_catalog;

    #[test]
    fn parses_locale_prices() {
        assert_eq!(parse_price("1290,50"), 1290.5);
        assert_eq!(parse_price("1\u{a0}290,50"), 1290.5);
        assert_eq!(parse_price(" 990 "), 990.0);
        assert_eq!(parse_price(""), 0.0);
        assert_eq!(parse_price("12,3,4"), 0.0);
        assert_eq!(parse_price("-5"), 0.0);
        assert_eq!(parse_price("NaN"), 0.0);
    }

    #[test]
    fn formats_with_comma() {
        assert_eq!(format_price(0.0), "0,00");
        assert_eq!(format_price(2700.0), "2700,00");
        assert_eq!(format_price(1290.456), "1290,46");
    }

    #[test]
    fn buy_total_is_sum_of_checked_items() {
        let catalog = sample_catalog();
        let mut draft = OrderDraft::default();
        draft.set_order_type(OrderType::Buy);
        draft.toggle_buy_game(&catalog, 1, true);
        draft.toggle_additional_good(&catalog, 100, true);

        let q = quote(&catalog, &draft);
        assert_eq!(q.total, 1500.0 + 300.0);
        assert!(q.show_summary);

        draft.toggle_additional_good(&catalog, 100, false);
        assert_eq!(quote(&catalog, &draft).total, 1500.0);
    }

    #[test]
    fn double_buy_discounts_both_games_but_not_goods() {
        let catalog = sample_catalog();
        let mut draft = OrderDraft::default();
        draft.set_order_type(OrderType::DoubleBuy);
        draft.toggle_buy_game(&catalog, 1, true);
        draft.toggle_buy_game(&catalog, 2, true);
        draft.toggle_additional_good(&catalog, 100, true);

        let q = quote(&catalog, &draft);
        assert!((q.total - ((1500.0 + 2000.0) * 0.9 + 300.0)).abs() < 1e-9);
    }

    #[test]
    fn double_game_count_selector_enables_pair_pricing_for_buy() {
        let catalog = sample_catalog();
        let mut draft = OrderDraft::default();
        draft.set_order_type(OrderType::Buy);
        draft.toggle_buy_game(&catalog, 1, true);
        draft.toggle_buy_game(&catalog, 2, true);
        assert_eq!(quote(&catalog, &draft).total, 3500.0);

        draft.double_game_count = 2;
        assert!((quote(&catalog, &draft).total - 3150.0).abs() < 1e-9);

        // a single game never gets the pair discount
        draft.toggle_buy_game(&catalog, 2, false);
        assert_eq!(quote(&catalog, &draft).total, 1500.0);
    }

    #[test]
    fn rent_total_is_option_price() {
        let catalog = sample_catalog();
        let mut draft = OrderDraft::default();
        draft.set_order_type(OrderType::Rent);
        let q = quote(&catalog, &draft);
        assert_eq!(q.total, 0.0);
        assert!(!q.show_summary);

        draft.select_rent_option(&catalog, Some(10));
        let q = quote(&catalog, &draft);
        assert_eq!(q.total, 4000.0);
        assert!(q.show_summary);
    }

    #[test]
    fn free_rent_option_still_shows_summary() {
        let catalog = sample_catalog();
        let mut draft = OrderDraft::default();
        draft.set_order_type(OrderType::Rent);
        draft.select_rent_option(&catalog, Some(12));
        let q = quote(&catalog, &draft);
        assert_eq!(q.total, 0.0);
        assert!(q.show_summary);
    }

    #[test]
    fn recompute_is_idempotent() {
        let catalog = sample_catalog();
        let mut draft = OrderDraft::default();
        draft.set_order_type(OrderType::Buy);
        draft.toggle_buy_game(&catalog, 3, true);
        let first = quote(&catalog, &draft).display();
        let second = quote(&catalog, &draft).display();
        assert_eq!(first, second);
        assert_eq!(first, "990,00");
    }
}
