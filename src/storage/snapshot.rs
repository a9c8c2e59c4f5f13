//! JSON snapshot of the session on local disk.
//!
//! The file holds a versioned envelope around the session. Reads fall back
//! to a fresh session on any problem; the table decides whether a failed
//! write matters (it logs and carries on).

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::Session;
use crate::error::StorageError;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 2;

#[derive(Serialize, Deserialize)]
struct Envelope {
    version: u32,
    session: Session,
}

/// Reads and writes the session snapshot file.
#[derive(Clone, Debug)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the saved session.
    ///
    /// Returns `Ok(None)` when nothing has been saved yet. A session that
    /// breaks the engine invariants is rejected as `StorageError::Invalid`.
    pub fn try_load(&self) -> Result<Option<Session>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let envelope: Envelope = serde_json::from_str(&content)?;
        if envelope.version != SNAPSHOT_VERSION {
            return Err(StorageError::Version {
                found: envelope.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        envelope.session.check_invariants()?;
        Ok(Some(envelope.session))
    }

    /// Read the saved session, falling back to `fresh()` when there is none
    /// or it cannot be read.
    pub fn load_or_else(&self, fresh: impl FnOnce() -> Session) -> Session {
        match self.try_load() {
            Ok(Some(session)) => {
                debug!(path = %self.path.display(), "session restored");
                session
            }
            Ok(None) => fresh(),
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "Failed to read saved session, starting fresh");
                fresh()
            }
        }
    }

    /// Write the session.
    pub fn save(&self, session: &Session) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let envelope = Envelope {
            version: SNAPSHOT_VERSION,
            session: session.clone(),
        };
        let content = serde_json::to_string(&envelope)?;
        fs::write(&self.path, content).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Delete saved data. Clearing when nothing is saved succeeds.
    pub fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "saved session cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SlotId;
    use crate::error::InvariantViolation;

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("session.json"));

        assert!(store.try_load().unwrap().is_none());
        assert_eq!(store.load_or_else(|| Session::new(40)), Session::new(40));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("nested").join("session.json"));
        let mut session = Session::new(40);
        session.slot_mut(SlotId::Player2).life_total = 12;

        store.save(&session).unwrap();

        assert_eq!(store.try_load().unwrap(), Some(session));
    }

    #[test]
    fn test_version_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let session = serde_json::to_value(Session::new(40)).unwrap();
        fs::write(&path, serde_json::json!({ "version": 99, "session": session }).to_string()).unwrap();

        let store = SnapshotStore::new(&path);

        assert!(matches!(
            store.try_load(),
            Err(StorageError::Version { found: 99, expected: SNAPSHOT_VERSION })
        ));
        assert_eq!(store.load_or_else(|| Session::new(30)), Session::new(30));
    }

    #[test]
    fn test_impossible_session_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("session.json"));
        let mut session = Session::new(40);
        session.slot_mut(SlotId::Player3).life_total = -7;
        store.save(&session).unwrap();

        assert!(matches!(
            store.try_load(),
            Err(StorageError::Invalid(InvariantViolation::NegativeLife { .. }))
        ));
        assert_eq!(store.load_or_else(|| Session::new(40)), Session::new(40));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("session.json"));
        store.save(&Session::new(40)).unwrap();

        store.clear().unwrap();
        store.clear().unwrap();

        assert!(!store.path().exists());
    }
}
