//! Decaying "recent change" display.
//!
//! Every life change on a slot adds to that slot's running delta and
//! restarts its decay timer. When the timer fires without an intervening
//! change the delta drops back to zero. This is a debounce: a steady stream
//! of changes keeps the total on screen.

use std::time::{Duration, Instant};

use tracing::trace;

use super::queue::{TimerId, TimerQueue};
use super::TimerEvent;
use crate::core::{SlotId, SlotMap, MIN_TIMER_PERIOD};

#[derive(Clone, Copy, Debug, Default)]
struct BatchSlot {
    delta: i32,
    timer: Option<TimerId>,
}

/// Per-slot running deltas with debounced reset.
pub struct BatchDisplay {
    decay: Duration,
    slots: SlotMap<BatchSlot>,
}

impl BatchDisplay {
    /// Create a display whose deltas reset after `decay` of quiet (at least
    /// `MIN_TIMER_PERIOD`).
    #[must_use]
    pub fn new(decay: Duration) -> Self {
        Self {
            decay: decay.max(MIN_TIMER_PERIOD),
            slots: SlotMap::default(),
        }
    }

    /// Add a change to a slot's running delta and restart its decay timer.
    ///
    /// A change that brings the delta back to zero leaves no timer behind.
    pub fn record(
        &mut self,
        queue: &mut TimerQueue<TimerEvent>,
        slot: SlotId,
        amount: i32,
        now: Instant,
    ) {
        let entry = &mut self.slots[slot];
        entry.delta = entry.delta.saturating_add(amount);

        if let Some(timer) = entry.timer.take() {
            queue.cancel(timer);
        }
        if entry.delta != 0 {
            entry.timer = Some(queue.schedule_at(now + self.decay, TimerEvent::BatchDecay(slot)));
        }

        trace!(%slot, amount, delta = entry.delta, "batch updated");
    }

    /// Handle a fired decay timer. Returns true if the delta was cleared.
    ///
    /// A timer that was replaced before it fired is ignored.
    pub fn on_fire(&mut self, slot: SlotId, timer: TimerId) -> bool {
        let entry = &mut self.slots[slot];
        if entry.timer != Some(timer) {
            return false;
        }
        entry.timer = None;
        entry.delta = 0;
        true
    }

    /// Drop every slot's delta and cancel pending decay timers.
    pub fn clear(&mut self, queue: &mut TimerQueue<TimerEvent>) {
        for (_, entry) in self.slots.iter_mut() {
            if let Some(timer) = entry.timer.take() {
                queue.cancel(timer);
            }
            entry.delta = 0;
        }
    }

    /// Current running delta for a slot.
    #[must_use]
    pub fn delta(&self, slot: SlotId) -> i32 {
        self.slots[slot].delta
    }

    /// Display text for a slot's delta, e.g. `"+ 3"` or `"- 12"`. `None`
    /// while there is nothing to show.
    #[must_use]
    pub fn label(&self, slot: SlotId) -> Option<String> {
        match self.delta(slot) {
            0 => None,
            d if d > 0 => Some(format!("+ {}", d.unsigned_abs())),
            d => Some(format!("- {}", d.unsigned_abs())),
        }
    }

    /// Check if a slot has a decay timer pending.
    #[must_use]
    pub fn is_decaying(&self, slot: SlotId) -> bool {
        self.slots[slot].timer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn drain(batch: &mut BatchDisplay, queue: &mut TimerQueue<TimerEvent>, now: Instant) {
        while let Some(fired) = queue.pop_due(now) {
            if let TimerEvent::BatchDecay(slot) = fired.payload {
                batch.on_fire(slot, fired.id);
            }
        }
    }

    #[test]
    fn test_accumulates_and_decays() {
        let base = Instant::now();
        let mut queue = TimerQueue::new();
        let mut batch = BatchDisplay::new(ms(3000));

        batch.record(&mut queue, SlotId::Player1, -1, base);
        batch.record(&mut queue, SlotId::Player1, -1, base + ms(100));
        assert_eq!(batch.delta(SlotId::Player1), -2);
        assert_eq!(batch.label(SlotId::Player1).as_deref(), Some("- 2"));

        drain(&mut batch, &mut queue, base + ms(3099));
        assert_eq!(batch.delta(SlotId::Player1), -2);

        drain(&mut batch, &mut queue, base + ms(3100));
        assert_eq!(batch.delta(SlotId::Player1), 0);
        assert_eq!(batch.label(SlotId::Player1), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_each_change_restarts_timer() {
        let base = Instant::now();
        let mut queue = TimerQueue::new();
        let mut batch = BatchDisplay::new(ms(3000));

        for i in 0..5 {
            batch.record(&mut queue, SlotId::Player2, 1, base + ms(i * 2000));
        }

        // Only the latest timer is pending
        assert_eq!(queue.len(), 1);
        drain(&mut batch, &mut queue, base + ms(10_999));
        assert_eq!(batch.delta(SlotId::Player2), 5);
        drain(&mut batch, &mut queue, base + ms(11_000));
        assert_eq!(batch.delta(SlotId::Player2), 0);
    }

    #[test]
    fn test_back_to_zero_schedules_nothing() {
        let base = Instant::now();
        let mut queue = TimerQueue::new();
        let mut batch = BatchDisplay::new(ms(3000));

        batch.record(&mut queue, SlotId::Player3, 5, base);
        batch.record(&mut queue, SlotId::Player3, -5, base);

        assert!(!batch.is_decaying(SlotId::Player3));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_slots_are_independent() {
        let base = Instant::now();
        let mut queue = TimerQueue::new();
        let mut batch = BatchDisplay::new(ms(3000));

        batch.record(&mut queue, SlotId::Player1, 3, base);
        batch.record(&mut queue, SlotId::Player4, -4, base + ms(2000));

        drain(&mut batch, &mut queue, base + ms(3000));
        assert_eq!(batch.delta(SlotId::Player1), 0);
        assert_eq!(batch.delta(SlotId::Player4), -4);
    }

    #[test]
    fn test_stale_fire_ignored() {
        let base = Instant::now();
        let mut queue = TimerQueue::new();
        let mut batch = BatchDisplay::new(ms(3000));

        batch.record(&mut queue, SlotId::Player1, 1, base);
        let stale = queue.pop_due(base + ms(3000)).unwrap();
        batch.record(&mut queue, SlotId::Player1, 1, base + ms(3000));

        assert!(!batch.on_fire(SlotId::Player1, stale.id));
        assert_eq!(batch.delta(SlotId::Player1), 2);
    }

    #[test]
    fn test_clear() {
        let base = Instant::now();
        let mut queue = TimerQueue::new();
        let mut batch = BatchDisplay::new(ms(3000));
        batch.record(&mut queue, SlotId::Player1, 7, base);

        batch.clear(&mut queue);

        assert_eq!(batch.delta(SlotId::Player1), 0);
        assert!(queue.is_empty());
    }
}
