//! Thread-local cache of guest-count recommendations.
//!
//! The server's answer depends only on the guest count, so each count is
//! fetched at most once per page load while the slider is dragged back and
//! forth.

use bulka_play::api::GameRange;
use std::cell::RefCell;
use std::collections::HashMap;

thread_local! {
    pub static RANGE_CACHE: RefCell<HashMap<u32, GameRange>> = RefCell::new(HashMap::new());
}

pub fn cached_range(guests: u32) -> Option<GameRange> {
    RANGE_CACHE.with(|c| c.borrow().get(&guests).copied())
}

pub fn store_range(guests: u32, range: GameRange) {
    RANGE_CACHE.with(|c| {
        c.borrow_mut().insert(guests, range);
    });
}
