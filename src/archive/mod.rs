//! Game records for finished sessions and the sink that stores them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{PlayerSlot, Session, SlotId, SlotMap};
use crate::counters::CounterId;
use crate::error::ArchiveError;

/// One seat's line in an archived game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecordEntry {
    pub player: String,
    pub deck: String,
    /// Empty when the deck carried no version.
    pub deck_version: String,
    pub started: bool,
    pub t1_sol_ring: bool,
    pub won: bool,
}

impl GameRecordEntry {
    /// Project a slot into its archive line.
    #[must_use]
    pub fn from_slot(slot: &PlayerSlot) -> Self {
        Self {
            player: slot.player_id().unwrap_or_default().to_string(),
            deck: slot.deck_id().unwrap_or_default().to_string(),
            deck_version: slot
                .deck
                .as_ref()
                .and_then(|d| d.version.clone())
                .unwrap_or_default(),
            started: slot.has_counter(CounterId::Started),
            t1_sol_ring: slot.has_counter(CounterId::T1SolRing),
            won: !slot.dead,
        }
    }
}

/// A finished game as handed to the archive sink.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub date: DateTime<Utc>,
    pub comments: String,
    /// One line per seat, stored under `player1` .. `player4`.
    #[serde(flatten)]
    pub players: SlotMap<GameRecordEntry>,
}

impl GameRecord {
    /// Build a record from a session snapshot.
    #[must_use]
    pub fn from_session(session: &Session, comments: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            date,
            comments: comments.into(),
            players: session.slots().map(|_, slot| GameRecordEntry::from_slot(slot)),
        }
    }

    /// Line for one seat.
    #[must_use]
    pub fn entry(&self, slot: SlotId) -> &GameRecordEntry {
        &self.players[slot]
    }

    /// Seat that won, if exactly one did.
    #[must_use]
    pub fn winner(&self) -> Option<SlotId> {
        let mut winners = self.players.iter().filter(|(_, e)| e.won).map(|(id, _)| id);
        match (winners.next(), winners.next()) {
            (Some(winner), None) => Some(winner),
            _ => None,
        }
    }
}

/// Destination for archived games.
pub trait ArchiveSink {
    /// Store a record. Implementations report failures as
    /// `ArchiveError::Sink`.
    fn store(&mut self, record: &GameRecord) -> Result<(), ArchiveError>;
}

/// Sink that keeps records in memory.
#[derive(Debug, Default)]
pub struct MemoryArchive {
    records: Vec<GameRecord>,
}

impl MemoryArchive {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn records(&self) -> &[GameRecord] {
        &self.records
    }
}

impl ArchiveSink for MemoryArchive {
    fn store(&mut self, record: &GameRecord) -> Result<(), ArchiveError> {
        self.records.push(record.clone());
        Ok(())
    }
}
