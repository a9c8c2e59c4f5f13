//! Cooperative timer queue.
//!
//! A single deadline-ordered queue shared by every timer at the table. The
//! queue never runs anything itself: the owner polls it with the current
//! instant and handles each due entry before polling again, so timer work
//! and user input are serialized on one loop.
//!
//! Cancellation removes the pending entry immediately; the matching heap
//! entry is discarded lazily when it reaches the top.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Instant;

use rustc_hash::FxHashMap;

/// Handle to a scheduled timer.
///
/// Ids increase monotonically, which also orders timers that share a
/// deadline by scheduling order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Get the raw id value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// A timer whose deadline has passed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fired<T> {
    pub id: TimerId,
    /// Scheduled deadline (not the instant it was polled at).
    pub fire_at: Instant,
    pub payload: T,
}

struct Pending<T> {
    fire_at: Instant,
    payload: T,
}

/// Deadline-ordered queue of one-shot timers.
pub struct TimerQueue<T> {
    next_id: u64,
    pending: FxHashMap<TimerId, Pending<T>>,
    heap: BinaryHeap<Reverse<(Instant, TimerId)>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            pending: FxHashMap::default(),
            heap: BinaryHeap::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` to fire at `fire_at`.
    pub fn schedule_at(&mut self, fire_at: Instant, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        self.pending.insert(id, Pending { fire_at, payload });
        self.heap.push(Reverse((fire_at, id)));
        id
    }

    /// Cancel a timer.
    ///
    /// Returns true if the timer was still pending. Cancelling a fired or
    /// already cancelled timer is a no-op.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.pending.remove(&id).is_some()
    }

    /// Check if a timer is still pending.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.contains_key(&id)
    }

    /// Deadline of a pending timer.
    #[must_use]
    pub fn deadline(&self, id: TimerId) -> Option<Instant> {
        self.pending.get(&id).map(|p| p.fire_at)
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&mut self) -> Option<Instant> {
        self.pop_stale();
        self.heap.peek().map(|Reverse((t, _))| *t)
    }

    /// Remove and return the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<Fired<T>> {
        self.pop_stale();

        let Reverse((fire_at, id)) = *self.heap.peek()?;
        if fire_at > now {
            return None;
        }
        let _ = self.heap.pop();

        self.pending.remove(&id).map(|p| Fired {
            id,
            fire_at: p.fire_at,
            payload: p.payload,
        })
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if no timers are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Cancel every pending timer.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.heap.clear();
    }

    fn pop_stale(&mut self) {
        while let Some(Reverse((fire_at, id))) = self.heap.peek() {
            match self.pending.get(id) {
                Some(p) if p.fire_at == *fire_at => break,
                _ => {
                    let _ = self.heap.pop();
                }
            }
        }
    }
}
