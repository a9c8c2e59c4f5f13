//! Image lookup for identities.
//!
//! Resolution never blocks play: a failed lookup yields an empty URL and
//! the slot renders without art.

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use super::catalog::{players_or_empty, IdentityCatalog};
use crate::core::IdentityRef;
use crate::error::AssetError;

/// Maps an identity to an image URL.
pub trait AssetResolver {
    fn resolve(&self, identity: &IdentityRef) -> Result<String, AssetError>;
}

/// Resolve an identity's image, degrading to an empty URL on failure.
pub fn resolve_or_empty(resolver: &dyn AssetResolver, identity: &IdentityRef) -> String {
    resolver.resolve(identity).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to resolve asset, using no image");
        String::new()
    })
}

/// Resolver that serves a deck's own featured image and nothing else.
#[derive(Clone, Copy, Debug, Default)]
pub struct FeaturedImageResolver;

impl AssetResolver for FeaturedImageResolver {
    fn resolve(&self, identity: &IdentityRef) -> Result<String, AssetError> {
        match identity {
            IdentityRef::Deck(deck) => deck
                .featured_image
                .clone()
                .ok_or_else(|| AssetError::NotFound(deck.id.clone())),
            IdentityRef::Player(player) => Err(AssetError::NotFound(player.id.clone())),
        }
    }
}

/// Player portrait URLs keyed by player id.
///
/// Filled once from the catalog; players whose portrait fails to resolve
/// are cached with an empty URL.
#[derive(Clone, Debug, Default)]
pub struct PortraitCache {
    urls: FxHashMap<String, String>,
}

impl PortraitCache {
    /// Resolve a portrait for every player in the catalog.
    pub fn load(catalog: &dyn IdentityCatalog, resolver: &dyn AssetResolver) -> Self {
        let urls: FxHashMap<String, String> = players_or_empty(catalog)
            .into_iter()
            .map(|player| {
                let url = resolve_or_empty(resolver, &IdentityRef::Player(player.clone()));
                (player.id, url)
            })
            .collect();

        debug!(players = urls.len(), "portrait cache loaded");
        Self { urls }
    }

    /// Portrait URL for a player. Unknown players and failed lookups read
    /// as `None`.
    #[must_use]
    pub fn get(&self, player_id: &str) -> Option<&str> {
        self.urls
            .get(player_id)
            .map(String::as_str)
            .filter(|url| !url.is_empty())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
