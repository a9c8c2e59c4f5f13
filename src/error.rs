//! Boundary error types.
//!
//! The engine itself never fails. These cover the adapters around it:
//! local storage, the archive sink, the identity catalog and the asset
//! resolver. `InvariantViolation` describes a session read from outside
//! that the engine could never have produced.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::SlotId;
use crate::counters::CounterId;
use crate::rules::RejectReason;

// ============================================================================
// Session
// ============================================================================

/// A session that no sequence of engine transitions can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("{slot} has negative life {life}")]
    NegativeLife { slot: SlotId, life: i32 },

    #[error("{slot} has negative commander damage from {from}")]
    NegativeCommanderDamage { slot: SlotId, from: SlotId },

    #[error("{slot} has commander damage from itself")]
    SelfCommanderDamage { slot: SlotId },

    #[error("{slot} death flag disagrees with its Dead counter")]
    DeadCounterMismatch { slot: SlotId },

    #[error("{counter} is held by {holders} slots")]
    ExclusiveCounterShared { counter: CounterId, holders: usize },

    #[error("{counter} differs between slots")]
    SyncCounterDiverged { counter: CounterId },
}

// ============================================================================
// Storage
// ============================================================================

/// Snapshot store failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading, writing or removing the snapshot file failed
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot could not be encoded or decoded
    #[error("invalid snapshot json: {0}")]
    Json(#[from] serde_json::Error),

    /// The snapshot parsed but describes an impossible session
    #[error("invalid snapshot session: {0}")]
    Invalid(#[from] InvariantViolation),

    /// The snapshot was written by an incompatible format version
    #[error("unsupported snapshot version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },
}

// ============================================================================
// Archive
// ============================================================================

/// Why archiving a finished game failed.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The session did not pass validation
    #[error("session rejected: {0}")]
    Rejected(#[from] RejectReason),

    /// The sink refused or failed to store the record
    #[error("archive sink failed: {0}")]
    Sink(String),
}

impl ArchiveError {
    /// Sentence to show the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ArchiveError::Rejected(reason) => reason.user_message().to_string(),
            ArchiveError::Sink(message) => format!("Could not save the game: {message}"),
        }
    }
}

// ============================================================================
// External lookups
// ============================================================================

/// Identity catalog failures.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    #[error("malformed catalog entry: {0}")]
    Malformed(String),
}

/// Asset resolver failures.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("no asset for {0}")]
    NotFound(String),

    #[error("asset lookup failed: {0}")]
    Lookup(String),
}
