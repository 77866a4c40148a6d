//! Read-only catalog of games, additional goods and rental options.
//!
//! The catalog is rendered by the server; the client never mutates it. Item
//! order is the order in which items appear on the page and decides which
//! selections survive when a limit is enforced.

use crate::pricing::parse_price;
use crate::ItemId;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A game or an additional good.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,
    pub price: f64,
}

/// A rental plan: flat price, how many games it includes, optional pin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalOption {
    pub id: ItemId,
    pub name: String,
    pub price: f64,
    pub game_count: usize,
    pub is_specific: bool,
    pub specific_game: Option<ItemId>,
}

impl RentalOption {
    /// The pinned game, if this option rents one predetermined game.
    pub fn pinned_game(&self) -> Option<ItemId> {
        if self.is_specific {
            self.specific_game
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub games: Vec<CatalogItem>,
    pub additional_goods: Vec<CatalogItem>,
    pub rental_options: Vec<RentalOption>,
}

#[derive(Debug)]
pub enum CatalogError {
    /// The CSV block could not be read at all (bad header, bad encoding).
    Csv(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Csv(msg) => write!(f, "Failed to read catalog CSV: {}", msg),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<csv::Error> for CatalogError {
    fn from(e: csv::Error) -> Self {
        CatalogError::Csv(e.to_string())
    }
}

/// One row of the embedded catalog block.
///
/// Columns: `kind,id,name,price,game_count,is_specific,specific_game`
#[derive(Debug, Deserialize)]
struct CatalogRow {
    kind: String,
    id: ItemId,
    name: String,
    price: String,
    game_count: Option<usize>,
    is_specific: Option<String>,
    specific_game: Option<ItemId>,
}

/// Interpret a server-rendered boolean attribute (`True`, `true`, `1`, `on`).
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

impl Catalog {
    pub fn game(&self, id: ItemId) -> Option<&CatalogItem> {
        self.games.iter().find(|g| g.id == id)
    }

    pub fn additional_good(&self, id: ItemId) -> Option<&CatalogItem> {
        self.additional_goods.iter().find(|g| g.id == id)
    }

    pub fn rental_option(&self, id: ItemId) -> Option<&RentalOption> {
        self.rental_options.iter().find(|o| o.id == id)
    }

    /// Position of a game in page order.
    pub fn game_position(&self, id: ItemId) -> Option<usize> {
        self.games.iter().position(|g| g.id == id)
    }

    pub fn good_position(&self, id: ItemId) -> Option<usize> {
        self.additional_goods.iter().position(|g| g.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty() && self.additional_goods.is_empty() && self.rental_options.is_empty()
    }

    /// Drop repeated ids, keeping the first occurrence of each.
    pub fn dedup(&mut self) {
        let mut seen = HashSet::new();
        self.games.retain(|g| seen.insert(g.id));
        seen.clear();
        self.additional_goods.retain(|g| seen.insert(g.id));
        seen.clear();
        self.rental_options.retain(|o| seen.insert(o.id));
    }

    /// Load a catalog from the CSV block embedded in the page.
    ///
    /// Rows that fail to deserialize or carry an unknown `kind` are skipped,
    /// duplicate ids keep their first occurrence.
    pub fn from_csv_str(content: &str) -> Result<Catalog, CatalogError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut catalog = Catalog::default();
        for (line, row) in reader.deserialize::<CatalogRow>().enumerate() {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    debug!("Skipping catalog row {}: {}", line + 2, e);
                    continue;
                }
            };
            let price = parse_price(&row.price);
            match row.kind.as_str() {
                "game" => catalog.games.push(CatalogItem {
                    id: row.id,
                    name: row.name,
                    price,
                }),
                "good" => catalog.additional_goods.push(CatalogItem {
                    id: row.id,
                    name: row.name,
                    price,
                }),
                "rent" => catalog.rental_options.push(RentalOption {
                    id: row.id,
                    name: row.name,
                    price,
                    game_count: row.game_count.unwrap_or(0),
                    is_specific: row.is_specific.as_deref().map(parse_flag).unwrap_or(false),
                    specific_game: row.specific_game,
                }),
                other => debug!("Skipping catalog row {}: unknown kind '{}'", line + 2, other),
            }
        }
        catalog.dedup();

        info!(
            "Loaded catalog: {} games, {} additional goods, {} rental options",
            catalog.games.len(),
            catalog.additional_goods.len(),
            catalog.rental_options.len()
        );
        Ok(catalog)
    }
}
