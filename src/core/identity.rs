//! Player and deck identity references.
//!
//! Identities come from an external catalog. The engine stores them and
//! compares ids but never interprets names or image references.

use serde::{Deserialize, Serialize};

/// A player pulled from the identity catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerRef {
    pub id: String,
    pub name: String,
}

impl PlayerRef {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// An empty id marks an unresolved identity.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !self.id.is_empty()
    }
}

/// A deck pulled from the identity catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeckRef {
    pub id: String,
    pub name: String,
    /// Version of the deck list at selection time.
    #[serde(default)]
    pub version: Option<String>,
    /// Featured card art shown behind the slot.
    #[serde(default)]
    pub featured_image: Option<String>,
}

impl DeckRef {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: None,
            featured_image: None,
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_featured_image(mut self, url: impl Into<String>) -> Self {
        self.featured_image = Some(url.into());
        self
    }

    /// An empty id marks an unresolved identity.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Identity assignment payload: either half of a slot's identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum IdentityRef {
    Player(PlayerRef),
    Deck(DeckRef),
}
