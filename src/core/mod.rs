//! Core tracker types: slots, identities, session state, intents, configuration.
//!
//! This module holds the data model. Behavior lives in `rules` (pure
//! transitions and validation) and `timers` (press-and-hold and batch
//! display scheduling).

pub mod config;
pub mod identity;
pub mod intent;
pub mod slot;
pub mod state;

pub use config::{TrackerConfig, MIN_TIMER_PERIOD};
pub use identity::{DeckRef, IdentityRef, PlayerRef};
pub use intent::Intent;
pub use slot::{SlotId, SlotMap, SLOT_COUNT};
pub use state::{PlayerSlot, Session};
