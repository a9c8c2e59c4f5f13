//! # commander-tracker
//!
//! Life and counter tracking for a four-player Commander table.
//!
//! ## Design Principles
//!
//! 1. **Pure transitions**: The engine maps a session snapshot and an intent
//!    to the next snapshot. It never fails and never performs I/O.
//!
//! 2. **Closed shapes**: Exactly four slots and a fixed set of counters, both
//!    closed enumerations, so every operation is total.
//!
//! 3. **Explicit timers**: Press-and-hold repeats and the batch display run
//!    on one cooperative queue with injected time. Handles are values the
//!    caller must end.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) snapshot clones via `im`.
//!
//! - **Boundary adapters**: catalog, asset, archive and storage failures
//!   degrade or are reported; the live session is never lost to them.
//!
//! ## Modules
//!
//! - `core`: Slots, identities, session state, intents, configuration
//! - `counters`: Counter identifiers, kinds and the static registry
//! - `rules`: Game state engine and archive validation
//! - `timers`: Timer queue, repeat-on-hold and batch display
//! - `table`: Driver owning the live session
//! - `archive`: Game records and the archive sink
//! - `external`: Identity catalog and asset lookup
//! - `storage`: Local session snapshot
//! - `error`: Boundary error types

pub mod archive;
pub mod core;
pub mod counters;
pub mod error;
pub mod external;
pub mod rules;
pub mod storage;
pub mod table;
pub mod timers;

// Re-export commonly used types
pub use crate::core::{
    DeckRef, IdentityRef, Intent, PlayerRef, PlayerSlot, Session, SlotId, SlotMap, TrackerConfig,
    SLOT_COUNT,
};

pub use crate::counters::{
    CounterDefinition, CounterId, CounterKind, CounterRegistry, CounterState, Exclusivity,
};

pub use crate::rules::{validate_for_archive, GameEngine, RejectReason};

pub use crate::timers::{Control, HoldHandle, InteractionTimers, TimerAction, TimerId};

pub use crate::archive::{ArchiveSink, GameRecord, GameRecordEntry, MemoryArchive};

pub use crate::external::{AssetResolver, IdentityCatalog, PortraitCache};

pub use crate::storage::SnapshotStore;

pub use crate::error::{ArchiveError, AssetError, CatalogError, InvariantViolation, StorageError};

pub use crate::table::Table;
