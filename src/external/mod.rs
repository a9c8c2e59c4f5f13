//! Adapters for services outside the tracker: identity catalog and image
//! lookup. Failures here degrade to empty results and are logged.

pub mod assets;
pub mod catalog;

pub use assets::{resolve_or_empty, AssetResolver, FeaturedImageResolver, PortraitCache};
pub use catalog::{decks_or_empty, players_or_empty, IdentityCatalog, StaticCatalog};
