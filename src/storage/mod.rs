//! Local persistence of the live session.

pub mod snapshot;

pub use snapshot::{SnapshotStore, SNAPSHOT_VERSION};
