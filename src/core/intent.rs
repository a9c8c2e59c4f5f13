//! Intent representation: one discrete user gesture against the table.
//!
//! Intents are the only way a session changes. The engine applies them one
//! at a time, in issue order, each producing a complete new snapshot.

use serde::{Deserialize, Serialize};

use super::identity::IdentityRef;
use super::slot::SlotId;
use crate::counters::CounterId;

/// A single state-changing request.
///
/// ## Example
///
/// ```
/// use commander_tracker::core::{Intent, SlotId};
/// use commander_tracker::counters::CounterId;
///
/// let hit = Intent::ChangeCommanderDamage {
///     slot: SlotId::Player2,
///     source: SlotId::Player1,
///     amount: 7,
/// };
/// assert_eq!(hit.slot(), Some(SlotId::Player2));
///
/// let tap = Intent::CounterPrimary { slot: SlotId::Player3, counter: CounterId::Monarch };
/// assert!(tap.touches_other_slots());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    ChangeLife {
        slot: SlotId,
        amount: i32,
    },
    ChangeCommanderDamage {
        slot: SlotId,
        source: SlotId,
        amount: i32,
    },
    /// Tap on a counter.
    CounterPrimary {
        slot: SlotId,
        counter: CounterId,
    },
    /// Long-press on a counter (clear).
    CounterSecondary {
        slot: SlotId,
        counter: CounterId,
    },
    DecrementCounter {
        slot: SlotId,
        counter: CounterId,
    },
    AssignIdentity {
        slot: SlotId,
        identity: IdentityRef,
    },
    Reset,
}

impl Intent {
    /// The slot the gesture was made on. `None` for table-wide intents.
    #[must_use]
    pub fn slot(&self) -> Option<SlotId> {
        match self {
            Intent::ChangeLife { slot, .. }
            | Intent::ChangeCommanderDamage { slot, .. }
            | Intent::CounterPrimary { slot, .. }
            | Intent::CounterSecondary { slot, .. }
            | Intent::DecrementCounter { slot, .. }
            | Intent::AssignIdentity { slot, .. } => Some(*slot),
            Intent::Reset => None,
        }
    }

    /// Check if applying this intent may write to slots other than `slot()`.
    #[must_use]
    pub fn touches_other_slots(&self) -> bool {
        match self {
            Intent::CounterPrimary { counter, .. } | Intent::CounterSecondary { counter, .. } => {
                let def = counter.definition();
                def.is_global_exclusive() || def.is_global_sync()
            }
            Intent::Reset => true,
            _ => false,
        }
    }

    /// Same intent with the amount replaced, for life and damage changes.
    #[must_use]
    pub fn with_amount(&self, amount: i32) -> Self {
        match self {
            Intent::ChangeLife { slot, .. } => Intent::ChangeLife { slot: *slot, amount },
            Intent::ChangeCommanderDamage { slot, source, .. } => Intent::ChangeCommanderDamage {
                slot: *slot,
                source: *source,
                amount,
            },
            other => other.clone(),
        }
    }
}
