//! Guest-count slider: how many games to bring for a party of `n`.

use crate::api::{ApiError, GameRange, StoreApi};
use crate::defaults::MIN_GUESTS;

/// Value shown next to the slider; the slider never goes below two people.
pub fn clamp_guests(raw: &str) -> u32 {
    raw.trim().parse::<u32>().unwrap_or(0).max(MIN_GUESTS)
}

/// Guest count worth asking the server about, if any.
pub fn query_guests(raw: &str) -> Option<u32> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|guests| *guests >= MIN_GUESTS)
}

/// Text of the recommendation line, or `None` to clear it.
pub fn range_text(range: &GameRange) -> Option<String> {
    match (range.min, range.max) {
        (Some(min), Some(max)) => Some(format!("{} – {} игр", min, max)),
        _ => None,
    }
}

/// Fill percentage of the slider track, for the `--value` CSS variable.
pub fn slider_fill_percent(value: u32, min: u32, max: u32) -> f64 {
    if max <= min {
        return 0.0;
    }
    let clamped = value.clamp(min, max);
    (clamped - min) as f64 / (max - min) as f64 * 100.0
}

/// Ask the server for a recommendation; below the minimum nothing is sent.
pub async fn recommend<A: StoreApi + ?Sized>(
    api: &A,
    guests: Option<u32>,
) -> Result<Option<GameRange>, ApiError> {
    match guests {
        Some(guests) => api.recommend_games(guests).await.map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OrderResponse;
    use crate::submission::tests::FakeApi;
    use futures::executor::block_on;

    #[test]
    fn clamps_to_two_people() {
        assert_eq!(clamp_guests("1"), 2);
        assert_eq!(clamp_guests("0"), 2);
        assert_eq!(clamp_guests(""), 2);
        assert_eq!(clamp_guests("7"), 7);
    }

    #[test]
    fn small_parties_are_not_queried() {
        assert_eq!(query_guests("1"), None);
        assert_eq!(query_guests("x"), None);
        assert_eq!(query_guests(" 4 "), Some(4));

        let api = FakeApi::replying(Ok(OrderResponse {
            success: true,
            message: None,
        }));
        let result = block_on(recommend(&api, query_guests("1"))).unwrap();
        assert_eq!(result, None);
        assert!(api.queried.borrow().is_empty());
    }

    #[test]
    fn four_guests_show_server_range() {
        let mut api = FakeApi::replying(Ok(OrderResponse {
            success: true,
            message: None,
        }));
        api.range_reply = Ok(GameRange {
            min: Some(2),
            max: Some(3),
        });
        let range = block_on(recommend(&api, Some(4))).unwrap().unwrap();
        let text = range_text(&range).unwrap();
        assert!(text.contains('2') && text.contains('3'));
        assert_eq!(*api.queried.borrow(), vec![4]);
    }

    #[test]
    fn missing_bounds_clear_the_text() {
        assert_eq!(range_text(&GameRange { min: None, max: Some(3) }), None);
    }

    #[test]
    fn slider_fill() {
        assert_eq!(slider_fill_percent(2, 2, 12), 0.0);
        assert_eq!(slider_fill_percent(7, 2, 12), 50.0);
        assert_eq!(slider_fill_percent(40, 2, 12), 100.0);
        assert_eq!(slider_fill_percent(5, 5, 5), 0.0);
    }
}
