//! The in-progress order selection and the rules that constrain it.

use crate::catalog::Catalog;
use crate::defaults::DOUBLE_BUY_GAMES;
use crate::{ItemId, OrderType};
use log::debug;
use serde::{Deserialize, Serialize};

/// Unsaved selection state of the order dialog.
///
/// All selection lists hold unique ids in page order. Missing fields take
/// their defaults when deserialized; call [`OrderDraft::normalize`] on such a
/// draft before using it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderDraft {
    pub order_type: OrderType,
    pub rent_option_id: Option<ItemId>,
    pub max_selectable_games: usize,
    /// Set while a specific-game rental option is selected.
    pub pinned_game: Option<ItemId>,
    /// "Games on one board" selector of the buy section (1 or 2).
    pub double_game_count: u8,
    pub buy_games: Vec<ItemId>,
    pub additional_goods: Vec<ItemId>,
    pub rent_games: Vec<ItemId>,
}

impl Default for OrderDraft {
    fn default() -> Self {
        Self {
            order_type: OrderType::Unset,
            rent_option_id: None,
            max_selectable_games: 0,
            pinned_game: None,
            double_game_count: 1,
            buy_games: Vec::new(),
            additional_goods: Vec::new(),
            rent_games: Vec::new(),
        }
    }
}

/// How a game card in the rent section should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardState {
    pub visible: bool,
    pub enabled: bool,
    pub checked: bool,
}

/// Insert or remove `id`, keeping `list` sorted by `position`.
fn toggle_in_order(
    list: &mut Vec<ItemId>,
    id: ItemId,
    checked: bool,
    position: impl Fn(ItemId) -> Option<usize>,
) {
    if position(id).is_none() {
        debug!("Ignoring toggle of unknown item {}", id);
        return;
    }
    if checked {
        if !list.contains(&id) {
            list.push(id);
            list.sort_by_key(|item| position(*item).unwrap_or(usize::MAX));
        }
    } else {
        list.retain(|item| *item != id);
    }
}

/// Drop unknown and repeated ids and sort the rest by `position`.
fn normalize_list(list: &mut Vec<ItemId>, position: impl Fn(ItemId) -> Option<usize>) {
    let mut ranked: Vec<(usize, ItemId)> = list
        .iter()
        .filter_map(|id| position(*id).map(|pos| (pos, *id)))
        .collect();
    ranked.sort_unstable();
    ranked.dedup();
    *list = ranked.into_iter().map(|(_, id)| id).collect();
}

impl OrderDraft {
    /// Which section of the dialog is visible.
    pub fn shows_buy_section(&self) -> bool {
        matches!(self.order_type, OrderType::Buy | OrderType::DoubleBuy)
    }

    pub fn shows_rent_section(&self) -> bool {
        self.order_type == OrderType::Rent
    }

    pub fn set_order_type(&mut self, order_type: OrderType) {
        self.order_type = order_type;
        self.enforce_double_buy_limit();
    }

    pub fn set_double_game_count(&mut self, count: u8) {
        self.double_game_count = count.clamp(1, 2);
    }

    pub fn toggle_buy_game(&mut self, catalog: &Catalog, id: ItemId, checked: bool) {
        toggle_in_order(&mut self.buy_games, id, checked, |i| catalog.game_position(i));
        self.enforce_double_buy_limit();
    }

    pub fn toggle_additional_good(&mut self, catalog: &Catalog, id: ItemId, checked: bool) {
        toggle_in_order(&mut self.additional_goods, id, checked, |i| {
            catalog.good_position(i)
        });
    }

    /// Toggle a rent game. Ignored while a specific game is pinned.
    pub fn toggle_rent_game(&mut self, catalog: &Catalog, id: ItemId, checked: bool) {
        if self.pinned_game.is_some() {
            debug!("Rent selection is pinned, ignoring toggle of {}", id);
            return;
        }
        toggle_in_order(&mut self.rent_games, id, checked, |i| catalog.game_position(i));
        self.apply_rental_constraints(catalog);
    }

    /// Change the rental option and re-derive the selection limits.
    pub fn select_rent_option(&mut self, catalog: &Catalog, option_id: Option<ItemId>) {
        self.rent_option_id = option_id.filter(|id| catalog.rental_option(*id).is_some());
        self.apply_rental_constraints(catalog);
    }

    /// Derive `max_selectable_games` and the pin from the current option and
    /// bring `rent_games` back within them.
    pub fn apply_rental_constraints(&mut self, catalog: &Catalog) {
        let option = self.rent_option_id.and_then(|id| catalog.rental_option(id));
        match option {
            Some(option) => match option.pinned_game() {
                Some(game) if catalog.game(game).is_some() => {
                    self.max_selectable_games = 1;
                    self.pinned_game = Some(game);
                    self.rent_games = vec![game];
                }
                _ => {
                    self.max_selectable_games = option.game_count;
                    self.pinned_game = None;
                    self.rent_games.truncate(option.game_count);
                }
            },
            None => {
                self.max_selectable_games = 0;
                self.pinned_game = None;
                self.rent_games.clear();
            }
        }
    }

    /// Bring a draft assembled outside the dialog back within the selection
    /// rules. Derived fields are recomputed from the catalog.
    pub fn normalize(&mut self, catalog: &Catalog) {
        normalize_list(&mut self.buy_games, |i| catalog.game_position(i));
        normalize_list(&mut self.additional_goods, |i| catalog.good_position(i));
        normalize_list(&mut self.rent_games, |i| catalog.game_position(i));
        self.double_game_count = self.double_game_count.clamp(1, 2);
        self.rent_option_id = self
            .rent_option_id
            .filter(|id| catalog.rental_option(*id).is_some());
        self.enforce_double_buy_limit();
        self.apply_rental_constraints(catalog);
    }

    fn enforce_double_buy_limit(&mut self) {
        if self.order_type == OrderType::DoubleBuy {
            self.buy_games.truncate(DOUBLE_BUY_GAMES);
        }
    }

    /// Render state of a game card in the rent section.
    pub fn rent_card(&self, id: ItemId) -> CardState {
        let checked = self.rent_games.contains(&id);
        match self.pinned_game {
            Some(pinned) => CardState {
                visible: pinned == id,
                enabled: false,
                checked,
            },
            None => CardState {
                visible: true,
                enabled: true,
                checked,
            },
        }
    }

    /// Ids submitted under `buy_games`, `additional_goods` or `rent_games`.
    pub fn tracked_selection(&self) -> Vec<(&'static str, ItemId)> {
        match self.order_type {
            OrderType::Buy | OrderType::DoubleBuy => self
                .buy_games
                .iter()
                .map(|id| ("buy_games", *id))
                .chain(self.additional_goods.iter().map(|id| ("additional_goods", *id)))
                .collect(),
            OrderType::Rent => self.rent_games.iter().map(|id| ("rent_games", *id)).collect(),
            OrderType::Unset => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample_catalog;

    #[test]
    fn sections_follow_order_type() {
        let mut draft = OrderDraft::default();
        assert!(!draft.shows_buy_section());
        assert!(!draft.shows_rent_section());

        draft.set_order_type(OrderType::DoubleBuy);
        assert!(draft.shows_buy_section());
        assert!(!draft.shows_rent_section());

        draft.set_order_type(OrderType::Rent);
        assert!(!draft.shows_buy_section());
        assert!(draft.shows_rent_section());
    }

    #[test]
    fn third_game_in_double_buy_keeps_first_two() {
        let catalog = sample_catalog();
        let mut draft = OrderDraft::default();
        draft.set_order_type(OrderType::DoubleBuy);
        draft.toggle_buy_game(&catalog, 3, true);
        draft.toggle_buy_game(&catalog, 1, true);
        draft.toggle_buy_game(&catalog, 4, true);
        assert_eq!(draft.buy_games, vec![1, 3]);

        // an earlier card displaces the last one in page order
        draft.toggle_buy_game(&catalog, 2, true);
        assert_eq!(draft.buy_games, vec![1, 2]);
    }

    #[test]
    fn switching_to_double_buy_caps_existing_selection() {
        let catalog = sample_catalog();
        let mut draft = OrderDraft::default();
        draft.set_order_type(OrderType::Buy);
        for id in [1, 2, 3] {
            draft.toggle_buy_game(&catalog, id, true);
        }
        assert_eq!(draft.buy_games.len(), 3);
        draft.set_order_type(OrderType::DoubleBuy);
        assert_eq!(draft.buy_games, vec![1, 2]);
    }

    #[test]
    fn generic_option_truncates_to_game_count() {
        let catalog = sample_catalog();
        let mut draft = OrderDraft::default();
        draft.set_order_type(OrderType::Rent);
        draft.select_rent_option(&catalog, Some(10));
        assert_eq!(draft.max_selectable_games, 3);

        for id in [1, 2, 3, 4] {
            draft.toggle_rent_game(&catalog, id, true);
        }
        assert_eq!(draft.rent_games, vec![1, 2, 3]);
        assert!(!draft.rent_card(4).checked);
        assert!(draft.rent_card(4).enabled);
    }

    #[test]
    fn smaller_option_truncates_from_tail() {
        let catalog = sample_catalog();
        let mut draft = OrderDraft::default();
        draft.set_order_type(OrderType::Rent);
        draft.select_rent_option(&catalog, Some(10));
        for id in [5, 2, 4] {
            draft.toggle_rent_game(&catalog, id, true);
        }
        draft.select_rent_option(&catalog, Some(12));
        assert_eq!(draft.max_selectable_games, 2);
        assert_eq!(draft.rent_games, vec![2, 4]);
    }

    #[test]
    fn specific_option_pins_one_game() {
        let catalog = sample_catalog();
        let mut draft = OrderDraft::default();
        draft.set_order_type(OrderType::Rent);
        draft.select_rent_option(&catalog, Some(10));
        draft.toggle_rent_game(&catalog, 1, true);

        draft.select_rent_option(&catalog, Some(11));
        assert_eq!(draft.rent_games, vec![2]);
        assert_eq!(draft.pinned_game, Some(2));
        assert_eq!(draft.max_selectable_games, 1);

        let pinned = draft.rent_card(2);
        assert_eq!(
            pinned,
            CardState {
                visible: true,
                enabled: false,
                checked: true
            }
        );
        for other in [1, 3, 4, 5] {
            let card = draft.rent_card(other);
            assert!(!card.visible && !card.enabled && !card.checked);
        }

        // checkboxes are disabled, toggles change nothing
        draft.toggle_rent_game(&catalog, 2, false);
        draft.toggle_rent_game(&catalog, 3, true);
        assert_eq!(draft.rent_games, vec![2]);
    }

    #[test]
    fn leaving_specific_option_unpins() {
        let catalog = sample_catalog();
        let mut draft = OrderDraft::default();
        draft.select_rent_option(&catalog, Some(11));
        draft.select_rent_option(&catalog, Some(10));
        assert_eq!(draft.pinned_game, None);
        assert_eq!(draft.rent_games, vec![2]);
        assert!(draft.rent_card(1).visible && draft.rent_card(1).enabled);
    }

    #[test]
    fn clearing_option_clears_selection() {
        let catalog = sample_catalog();
        let mut draft = OrderDraft::default();
        draft.select_rent_option(&catalog, Some(10));
        draft.toggle_rent_game(&catalog, 1, true);
        draft.select_rent_option(&catalog, None);
        assert_eq!(draft.max_selectable_games, 0);
        assert!(draft.rent_games.is_empty());

        draft.select_rent_option(&catalog, Some(999));
        assert_eq!(draft.rent_option_id, None);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let catalog = sample_catalog();
        let mut draft = OrderDraft::default();
        draft.set_order_type(OrderType::Buy);
        draft.toggle_buy_game(&catalog, 42, true);
        draft.toggle_additional_good(&catalog, 1, true);
        assert!(draft.buy_games.is_empty());
        assert!(draft.additional_goods.is_empty());
    }

    #[test]
    fn tracked_selection_depends_on_type() {
        let catalog = sample_catalog();
        let mut draft = OrderDraft::default();
        draft.set_order_type(OrderType::Buy);
        draft.toggle_buy_game(&catalog, 1, true);
        draft.toggle_additional_good(&catalog, 101, true);
        draft.select_rent_option(&catalog, Some(11));

        assert_eq!(
            draft.tracked_selection(),
            vec![("buy_games", 1), ("additional_goods", 101)]
        );
        draft.set_order_type(OrderType::Rent);
        assert_eq!(draft.tracked_selection(), vec![("rent_games", 2)]);
    }

    #[test]
    fn normalize_repairs_foreign_draft() {
        let catalog = sample_catalog();
        let mut draft = OrderDraft {
            order_type: OrderType::DoubleBuy,
            double_game_count: 0,
            buy_games: vec![4, 1, 1, 99, 2],
            additional_goods: vec![101, 100, 101, 7],
            ..OrderDraft::default()
        };
        draft.normalize(&catalog);
        assert_eq!(draft.buy_games, vec![1, 2]);
        assert_eq!(draft.additional_goods, vec![100, 101]);
        assert_eq!(draft.double_game_count, 1);
    }

    #[test]
    fn normalize_recomputes_rental_limits() {
        let catalog = sample_catalog();
        let mut draft = OrderDraft {
            order_type: OrderType::Rent,
            rent_option_id: Some(11),
            max_selectable_games: 9,
            rent_games: vec![5, 5, 1],
            ..OrderDraft::default()
        };
        draft.normalize(&catalog);
        assert_eq!(draft.pinned_game, Some(2));
        assert_eq!(draft.max_selectable_games, 1);
        assert_eq!(draft.rent_games, vec![2]);

        draft.rent_option_id = Some(404);
        draft.normalize(&catalog);
        assert_eq!(draft.rent_option_id, None);
        assert_eq!(draft.max_selectable_games, 0);
        assert!(draft.rent_games.is_empty());
    }
}
