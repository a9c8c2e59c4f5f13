//! Identity catalog: the players and decks a slot can be assigned.

use tracing::warn;

use crate::core::{DeckRef, PlayerRef};
use crate::error::CatalogError;

/// Source of selectable players and decks.
pub trait IdentityCatalog {
    fn players(&self) -> Result<Vec<PlayerRef>, CatalogError>;

    fn decks(&self) -> Result<Vec<DeckRef>, CatalogError>;
}

/// List players, degrading to an empty list when the catalog fails.
pub fn players_or_empty(catalog: &dyn IdentityCatalog) -> Vec<PlayerRef> {
    catalog.players().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to list players, showing none");
        Vec::new()
    })
}

/// List decks, degrading to an empty list when the catalog fails.
pub fn decks_or_empty(catalog: &dyn IdentityCatalog) -> Vec<DeckRef> {
    catalog.decks().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to list decks, showing none");
        Vec::new()
    })
}

/// Catalog backed by fixed lists.
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    pub players: Vec<PlayerRef>,
    pub decks: Vec<DeckRef>,
}

impl StaticCatalog {
    #[must_use]
    pub fn new(players: Vec<PlayerRef>, decks: Vec<DeckRef>) -> Self {
        Self { players, decks }
    }

    /// Find a player by id.
    #[must_use]
    pub fn player(&self, id: &str) -> Option<&PlayerRef> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Find a deck by id.
    #[must_use]
    pub fn deck(&self, id: &str) -> Option<&DeckRef> {
        self.decks.iter().find(|d| d.id == id)
    }
}

impl IdentityCatalog for StaticCatalog {
    fn players(&self) -> Result<Vec<PlayerRef>, CatalogError> {
        Ok(self.players.clone())
    }

    fn decks(&self) -> Result<Vec<DeckRef>, CatalogError> {
        Ok(self.decks.clone())
    }
}
