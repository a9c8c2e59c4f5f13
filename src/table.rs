//! The table: live session, engine, timers and storage wired together.
//!
//! `Table` is the single owner of the current session. User input and fired
//! timers both go through it, so every transition sees the latest snapshot
//! and is persisted before the next one starts.
//!
//! ## Example
//!
//! ```
//! use std::time::Instant;
//! use commander_tracker::{SlotId, Table, TrackerConfig};
//!
//! let mut table = Table::new(TrackerConfig::default());
//! let now = Instant::now();
//!
//! table.tap_life(SlotId::Player1, false, now);
//! assert_eq!(table.session()[SlotId::Player1].life_total, 39);
//! assert_eq!(table.batch_label(SlotId::Player1).as_deref(), Some("- 1"));
//! ```

use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::archive::{ArchiveSink, GameRecord};
use crate::core::{Intent, Session, SlotId, TrackerConfig};
use crate::error::{ArchiveError, StorageError};
use crate::rules::{validate_for_archive, GameEngine, RejectReason};
use crate::storage::SnapshotStore;
use crate::timers::{Control, HoldHandle, InteractionTimers, TimerAction};

/// Live tracker state for one table.
pub struct Table {
    engine: GameEngine,
    session: Session,
    timers: InteractionTimers,
    store: Option<SnapshotStore>,
}

impl Table {
    /// Create a table with a fresh session and no persistence.
    #[must_use]
    pub fn new(config: TrackerConfig) -> Self {
        let engine = GameEngine::new(config);
        let session = engine.new_session();
        let timers = InteractionTimers::new(engine.config());
        Self {
            engine,
            session,
            timers,
            store: None,
        }
    }

    /// Create a table backed by a snapshot store, restoring the saved
    /// session if there is a readable one.
    #[must_use]
    pub fn open(config: TrackerConfig, store: SnapshotStore) -> Self {
        let mut table = Self::new(config);
        let engine = &table.engine;
        table.session = store.load_or_else(|| engine.new_session());
        // An archive interrupted by shutdown is not resumed
        table.session.pending_archive = false;
        table.store = Some(store);
        table
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        self.engine.config()
    }

    #[must_use]
    pub fn timers(&self) -> &InteractionTimers {
        &self.timers
    }

    // === Input ===

    /// Apply an intent and persist the result.
    ///
    /// Life changes also feed the slot's batch display with the requested
    /// amount. `Intent::Reset` goes through `reset`.
    pub fn dispatch(&mut self, intent: &Intent, now: Instant) {
        if *intent == Intent::Reset {
            self.reset();
            return;
        }

        self.session = self.engine.apply(&self.session, intent);
        if let Intent::ChangeLife { slot, amount } = *intent {
            self.timers.record_life_change(slot, amount, now);
        }
        self.persist();
    }

    /// Single tap on a life button.
    pub fn tap_life(&mut self, slot: SlotId, up: bool, now: Instant) {
        let amount = signed(self.config().tap_step, up);
        self.dispatch(&Intent::ChangeLife { slot, amount }, now);
    }

    /// Single tap on a commander damage button.
    pub fn tap_commander_damage(&mut self, slot: SlotId, source: SlotId, up: bool, now: Instant) {
        let amount = signed(self.config().tap_step, up);
        self.dispatch(&Intent::ChangeCommanderDamage { slot, source, amount }, now);
    }

    /// Press and hold a control: apply one hold step now and keep repeating
    /// until the returned handle is ended.
    pub fn begin_hold(&mut self, control: Control, up: bool, now: Instant) -> HoldHandle {
        let step = signed(self.config().hold_step, up);
        self.dispatch(&control.intent(step), now);
        self.timers.begin_hold(control, step, now)
    }

    /// Release a held control.
    pub fn end_hold(&mut self, handle: HoldHandle) -> bool {
        self.timers.end_hold(handle)
    }

    /// Release every hold on a slot.
    pub fn release_slot(&mut self, slot: SlotId) -> usize {
        self.timers.release_slot(slot)
    }

    // === Time ===

    /// Fire every timer due at or before `now`, in deadline order.
    ///
    /// Returns the number of timer actions handled.
    pub fn advance(&mut self, now: Instant) -> usize {
        let mut handled = 0;
        while let Some(action) = self.timers.poll(now) {
            match action {
                TimerAction::Repeat { intent, at } => self.dispatch(&intent, at),
                TimerAction::BatchCleared(slot) => debug!(%slot, "batch display cleared"),
            }
            handled += 1;
        }
        handled
    }

    /// Earliest instant `advance` has work to do.
    pub fn next_deadline(&mut self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Running life delta shown for a slot.
    #[must_use]
    pub fn recent_delta(&self, slot: SlotId) -> i32 {
        self.timers.recent_delta(slot)
    }

    #[must_use]
    pub fn batch_label(&self, slot: SlotId) -> Option<String> {
        self.timers.batch_label(slot)
    }

    // === Session lifecycle ===

    /// Check whether the current session may be archived.
    #[must_use]
    pub fn validate(&self) -> Option<RejectReason> {
        validate_for_archive(&self.session)
    }

    /// Archive the finished game and start the next one.
    ///
    /// On any failure the session is left as it was so the archive can be
    /// retried.
    pub fn archive_and_reset(
        &mut self,
        sink: &mut dyn ArchiveSink,
        comments: &str,
        date: DateTime<Utc>,
    ) -> Result<GameRecord, ArchiveError> {
        if let Some(reason) = self.validate() {
            info!(%reason, "archive rejected");
            return Err(ArchiveError::Rejected(reason));
        }

        self.session.pending_archive = true;
        self.persist();

        let record = GameRecord::from_session(&self.session, comments, date);
        if let Err(e) = sink.store(&record) {
            warn!(error = %e, "Failed to archive game, keeping session");
            self.session.pending_archive = false;
            self.persist();
            return Err(e);
        }

        info!(winner = ?record.winner(), "game archived");
        self.reset();
        Ok(record)
    }

    /// Restore every slot to its starting state, keeping identities.
    ///
    /// Ends outstanding holds and clears the batch display.
    pub fn reset(&mut self) {
        let released = self.timers.release_all();
        self.timers.clear_batches();
        self.session = self.engine.reset_session(&self.session);
        info!(released, "session reset");
        self.persist();
    }

    /// Delete saved data and start from an empty table, identities
    /// included.
    ///
    /// The file is removed first; if that fails the table is left as it
    /// was.
    pub fn clear_saved_data(&mut self) -> Result<(), StorageError> {
        if let Some(store) = &self.store {
            store.clear()?;
        }
        self.timers.release_all();
        self.timers.clear_batches();
        self.session = self.engine.new_session();
        Ok(())
    }

    fn persist(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&self.session) {
                warn!(error = %e, "Failed to save session");
            }
        }
    }
}

fn signed(step: i32, up: bool) -> i32 {
    if up {
        step
    } else {
        step.saturating_neg()
    }
}
