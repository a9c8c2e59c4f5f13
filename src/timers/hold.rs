//! Repeat-while-held timers.
//!
//! A hold applies its step once when the press starts (the caller does
//! that) and then once per interval until the press ends. Each hold is
//! identified by a `HoldHandle` the caller must hand back to `end`; a
//! handle that is never ended keeps repeating.

use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::queue::{TimerId, TimerQueue};
use super::TimerEvent;
use crate::core::{Intent, SlotId, MIN_TIMER_PERIOD};

/// A press-and-hold control on a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    /// The life total +/- buttons.
    Life(SlotId),
    /// A commander damage +/- button for one source.
    CommanderDamage { slot: SlotId, source: SlotId },
}

impl Control {
    /// The intent one repetition of this control applies.
    #[must_use]
    pub fn intent(self, step: i32) -> Intent {
        match self {
            Control::Life(slot) => Intent::ChangeLife { slot, amount: step },
            Control::CommanderDamage { slot, source } => Intent::ChangeCommanderDamage {
                slot,
                source,
                amount: step,
            },
        }
    }

    /// The slot the control belongs to.
    #[must_use]
    pub const fn slot(self) -> SlotId {
        match self {
            Control::Life(slot) | Control::CommanderDamage { slot, .. } => slot,
        }
    }
}

/// Handle to an active hold. Must be passed to `end` when the press is
/// released.
#[must_use = "a hold repeats until its handle is ended"]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HoldHandle(u64);

#[derive(Clone, Copy, Debug)]
struct Hold {
    control: Control,
    step: i32,
    timer: TimerId,
}

/// Tracks active holds and their repeat timers.
pub struct RepeatOnHold {
    interval: Duration,
    next_handle: u64,
    holds: FxHashMap<HoldHandle, Hold>,
}

impl RepeatOnHold {
    /// Create a tracker repeating every `interval` (at least
    /// `MIN_TIMER_PERIOD`).
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_TIMER_PERIOD),
            next_handle: 0,
            holds: FxHashMap::default(),
        }
    }

    /// Start holding `control`. The first repeat is due one interval after
    /// `now`.
    ///
    /// A control can only be held once; an existing hold on the same
    /// control is ended first.
    pub fn begin(
        &mut self,
        queue: &mut TimerQueue<TimerEvent>,
        control: Control,
        step: i32,
        now: Instant,
    ) -> HoldHandle {
        if let Some(previous) = self.handle_for(control) {
            debug!(?control, "replacing hold on already held control");
            self.end(queue, previous);
        }

        let handle = HoldHandle(self.next_handle);
        self.next_handle += 1;

        let timer = queue.schedule_at(now + self.interval, TimerEvent::HoldRepeat(handle));
        self.holds.insert(handle, Hold { control, step, timer });

        debug!(?control, step, handle = handle.0, "hold started");
        handle
    }

    /// End a hold and cancel its pending repeat.
    ///
    /// Returns true if the hold was active. Ending twice is a no-op.
    pub fn end(&mut self, queue: &mut TimerQueue<TimerEvent>, handle: HoldHandle) -> bool {
        match self.holds.remove(&handle) {
            Some(hold) => {
                queue.cancel(hold.timer);
                debug!(control = ?hold.control, handle = handle.0, "hold ended");
                true
            }
            None => false,
        }
    }

    /// End every hold on controls belonging to `slot`.
    pub fn end_slot(&mut self, queue: &mut TimerQueue<TimerEvent>, slot: SlotId) -> usize {
        let handles: Vec<HoldHandle> = self
            .holds
            .iter()
            .filter(|(_, hold)| hold.control.slot() == slot)
            .map(|(handle, _)| *handle)
            .collect();

        handles.into_iter().filter(|&h| self.end(queue, h)).count()
    }

    /// End every active hold.
    pub fn end_all(&mut self, queue: &mut TimerQueue<TimerEvent>) -> usize {
        let count = self.holds.len();
        for (_, hold) in self.holds.drain() {
            queue.cancel(hold.timer);
        }
        count
    }

    /// Handle a fired repeat timer.
    ///
    /// Schedules the next repeat one interval after the scheduled deadline
    /// (fixed rate, so a late poll catches up) and returns the intent to
    /// apply. Returns `None` for a timer that no longer belongs to a hold.
    pub fn on_fire(
        &mut self,
        queue: &mut TimerQueue<TimerEvent>,
        handle: HoldHandle,
        timer: TimerId,
        fire_at: Instant,
    ) -> Option<Intent> {
        let hold = self.holds.get_mut(&handle)?;
        if hold.timer != timer {
            return None;
        }

        hold.timer = queue.schedule_at(fire_at + self.interval, TimerEvent::HoldRepeat(handle));
        trace!(control = ?hold.control, step = hold.step, "hold repeat");
        Some(hold.control.intent(hold.step))
    }

    /// Check if a hold is active.
    #[must_use]
    pub fn is_active(&self, handle: HoldHandle) -> bool {
        self.holds.contains_key(&handle)
    }

    /// Active hold on `control`, if any.
    #[must_use]
    pub fn handle_for(&self, control: Control) -> Option<HoldHandle> {
        self.holds
            .iter()
            .find(|(_, hold)| hold.control == control)
            .map(|(handle, _)| *handle)
    }

    /// Number of active holds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.holds.len()
    }

    /// Check if no holds are active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.holds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Drive the queue and collect the repeat intents it produces.
    fn drain(
        holds: &mut RepeatOnHold,
        queue: &mut TimerQueue<TimerEvent>,
        now: Instant,
    ) -> Vec<Intent> {
        let mut out = Vec::new();
        while let Some(fired) = queue.pop_due(now) {
            if let TimerEvent::HoldRepeat(handle) = fired.payload {
                out.extend(holds.on_fire(queue, handle, fired.id, fired.fire_at));
            }
        }
        out
    }

    #[test]
    fn test_repeats_every_interval() {
        let base = Instant::now();
        let mut queue = TimerQueue::new();
        let mut holds = RepeatOnHold::new(ms(500));
        let control = Control::Life(SlotId::Player1);

        let handle = holds.begin(&mut queue, control, -10, base);

        assert!(drain(&mut holds, &mut queue, base + ms(499)).is_empty());
        let repeats = drain(&mut holds, &mut queue, base + ms(1500));
        assert_eq!(repeats.len(), 3);
        assert_eq!(repeats[0], Intent::ChangeLife { slot: SlotId::Player1, amount: -10 });

        assert!(holds.end(&mut queue, handle));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_end_stops_repeats() {
        let base = Instant::now();
        let mut queue = TimerQueue::new();
        let mut holds = RepeatOnHold::new(ms(500));

        let handle = holds.begin(&mut queue, Control::Life(SlotId::Player2), 10, base);
        drain(&mut holds, &mut queue, base + ms(500));
        holds.end(&mut queue, handle);

        assert!(drain(&mut holds, &mut queue, base + ms(10_000)).is_empty());
        assert!(!holds.end(&mut queue, handle));
    }

    #[test]
    fn test_begin_replaces_hold_on_same_control() {
        let base = Instant::now();
        let mut queue = TimerQueue::new();
        let mut holds = RepeatOnHold::new(ms(500));
        let control = Control::CommanderDamage { slot: SlotId::Player1, source: SlotId::Player2 };

        let first = holds.begin(&mut queue, control, 10, base);
        let second = holds.begin(&mut queue, control, -10, base + ms(100));

        assert!(!holds.is_active(first));
        assert!(holds.is_active(second));
        assert_eq!(holds.len(), 1);
        assert_eq!(queue.len(), 1);
        assert_eq!(holds.handle_for(control), Some(second));
    }

    #[test]
    fn test_end_slot_only_touches_that_slot() {
        let base = Instant::now();
        let mut queue = TimerQueue::new();
        let mut holds = RepeatOnHold::new(ms(500));

        let _a = holds.begin(&mut queue, Control::Life(SlotId::Player1), 1, base);
        let _b = holds.begin(
            &mut queue,
            Control::CommanderDamage { slot: SlotId::Player1, source: SlotId::Player3 },
            1,
            base,
        );
        let c = holds.begin(&mut queue, Control::Life(SlotId::Player2), 1, base);

        assert_eq!(holds.end_slot(&mut queue, SlotId::Player1), 2);
        assert!(holds.is_active(c));
        assert_eq!(queue.len(), 1);

        assert_eq!(holds.end_all(&mut queue), 1);
        assert!(holds.is_empty());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_control_intent() {
        let control = Control::CommanderDamage { slot: SlotId::Player4, source: SlotId::Player1 };
        assert_eq!(control.slot(), SlotId::Player4);
        assert_eq!(
            control.intent(-1),
            Intent::ChangeCommanderDamage { slot: SlotId::Player4, source: SlotId::Player1, amount: -1 }
        );
    }
}
