//! Interaction timers: repeat-on-hold and the decaying batch display.
//!
//! Both disciplines share one `TimerQueue`, so their callbacks are
//! serialized with each other and with user input. Nothing here touches the
//! session: fired timers are turned into `TimerAction`s for the table to
//! apply.
//!
//! ## Leaks
//!
//! Holds are explicit handles. A hold whose press-release never arrives
//! keeps producing repeats; `active_holds()` exposes the count so callers
//! and tests can assert that every gesture was ended.

pub mod batch;
pub mod hold;
pub mod queue;

use std::time::Instant;

use tracing::warn;

pub use batch::BatchDisplay;
pub use hold::{Control, HoldHandle, RepeatOnHold};
pub use queue::{Fired, TimerId, TimerQueue};

use crate::core::{Intent, SlotId, TrackerConfig};

/// Payload of a queued timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    HoldRepeat(HoldHandle),
    BatchDecay(SlotId),
}

/// Work produced by a fired timer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimerAction {
    /// A held control repeated; apply the intent as of `at`, the repeat's
    /// scheduled deadline.
    Repeat { intent: Intent, at: Instant },
    /// A slot's batch display decayed to zero.
    BatchCleared(SlotId),
}

/// Owner of every interaction timer at the table.
pub struct InteractionTimers {
    queue: TimerQueue<TimerEvent>,
    holds: RepeatOnHold,
    batch: BatchDisplay,
}

impl InteractionTimers {
    /// Create timers using the configured intervals.
    #[must_use]
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            queue: TimerQueue::new(),
            holds: RepeatOnHold::new(config.hold_repeat_interval),
            batch: BatchDisplay::new(config.batch_decay),
        }
    }

    // === Holds ===

    /// Start a hold. The caller applies the first step itself.
    pub fn begin_hold(&mut self, control: Control, step: i32, now: Instant) -> HoldHandle {
        self.holds.begin(&mut self.queue, control, step, now)
    }

    /// End a hold. Idempotent.
    pub fn end_hold(&mut self, handle: HoldHandle) -> bool {
        self.holds.end(&mut self.queue, handle)
    }

    /// End every hold on a slot's controls (the slot's widgets went away).
    pub fn release_slot(&mut self, slot: SlotId) -> usize {
        self.holds.end_slot(&mut self.queue, slot)
    }

    /// End every hold.
    pub fn release_all(&mut self) -> usize {
        self.holds.end_all(&mut self.queue)
    }

    /// Check if a hold is still active.
    #[must_use]
    pub fn is_holding(&self, handle: HoldHandle) -> bool {
        self.holds.is_active(handle)
    }

    /// Number of holds that have not been ended.
    #[must_use]
    pub fn active_holds(&self) -> usize {
        self.holds.len()
    }

    // === Batch Display ===

    /// Record a committed life change for the batch display.
    pub fn record_life_change(&mut self, slot: SlotId, amount: i32, now: Instant) {
        self.batch.record(&mut self.queue, slot, amount, now);
    }

    /// Current running delta for a slot.
    #[must_use]
    pub fn recent_delta(&self, slot: SlotId) -> i32 {
        self.batch.delta(slot)
    }

    /// Display text for a slot's running delta.
    #[must_use]
    pub fn batch_label(&self, slot: SlotId) -> Option<String> {
        self.batch.label(slot)
    }

    /// Drop all running deltas.
    pub fn clear_batches(&mut self) {
        self.batch.clear(&mut self.queue);
    }

    // === Queue ===

    /// Fire the next timer due at or before `now`.
    ///
    /// Call repeatedly until it returns `None`, applying each action before
    /// polling again.
    pub fn poll(&mut self, now: Instant) -> Option<TimerAction> {
        while let Some(fired) = self.queue.pop_due(now) {
            let action = match fired.payload {
                TimerEvent::HoldRepeat(handle) => self
                    .holds
                    .on_fire(&mut self.queue, handle, fired.id, fired.fire_at)
                    .map(|intent| TimerAction::Repeat { intent, at: fired.fire_at }),
                TimerEvent::BatchDecay(slot) => self
                    .batch
                    .on_fire(slot, fired.id)
                    .then_some(TimerAction::BatchCleared(slot)),
            };
            if action.is_some() {
                return action;
            }
        }
        None
    }

    /// Earliest pending deadline, for the event loop to sleep until.
    pub fn next_deadline(&mut self) -> Option<Instant> {
        self.queue.next_deadline()
    }

    /// Number of pending timers of either kind.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.queue.len()
    }
}

impl Drop for InteractionTimers {
    fn drop(&mut self) {
        if !self.holds.is_empty() {
            warn!(holds = self.holds.len(), "interaction timers dropped with active holds");
        }
    }
}
