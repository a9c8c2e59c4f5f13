//! Counter definitions - static counter behavior.
//!
//! `CounterDefinition` holds the immutable properties of a counter:
//! how a tap is interpreted (its `CounterKind`) and whether its state is
//! shared across the table (its `Exclusivity`).
//!
//! Per-slot runtime data lives separately in `CounterState`.

use serde::{Deserialize, Serialize};

/// Identifier for every counter the tracker knows about.
///
/// The set is closed: dispatch over it is exhaustive and cannot fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CounterId {
    Monarch,
    Initiative,
    Ascend,
    DayNight,
    Started,
    #[serde(rename = "t1-sol-ring")]
    T1SolRing,
    Dead,
    Energy,
    Experience,
    Treasure,
    Poison,
    Rad,
    CommanderTax,
}

impl CounterId {
    /// All counters in display order.
    pub const ALL: [CounterId; 13] = [
        CounterId::Monarch,
        CounterId::Initiative,
        CounterId::Ascend,
        CounterId::DayNight,
        CounterId::Started,
        CounterId::T1SolRing,
        CounterId::Dead,
        CounterId::Energy,
        CounterId::Experience,
        CounterId::Treasure,
        CounterId::Poison,
        CounterId::Rad,
        CounterId::CommanderTax,
    ];

    /// Get the static definition for this counter.
    #[must_use]
    pub const fn definition(self) -> CounterDefinition {
        use CounterKind::{Counter, Switch, Toggle};
        use Exclusivity as E;

        let (kind, exclusivity, label) = match self {
            CounterId::Monarch => (Toggle, E::GlobalExclusiveToggle, "Monarch"),
            CounterId::Initiative => (Toggle, E::GlobalExclusiveToggle, "Initiative"),
            CounterId::Ascend => (Toggle, E::None, "Ascend"),
            CounterId::DayNight => (Switch, E::GlobalSyncSwitch, "Day/Night"),
            CounterId::Started => (Toggle, E::None, "Started"),
            CounterId::T1SolRing => (Toggle, E::None, "Sol Ring"),
            CounterId::Dead => (Toggle, E::None, "Dead"),
            CounterId::Energy => (Counter, E::None, "Energy"),
            CounterId::Experience => (Counter, E::None, "XP"),
            CounterId::Treasure => (Counter, E::None, "Treasure"),
            CounterId::Poison => (Counter, E::None, "Poison"),
            CounterId::Rad => (Counter, E::None, "Rad"),
            CounterId::CommanderTax => (Counter, E::None, "C. Tax"),
        };

        CounterDefinition {
            id: self,
            kind,
            exclusivity,
            label,
        }
    }
}

impl std::fmt::Display for CounterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.definition().label)
    }
}

/// How a counter responds to taps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CounterKind {
    /// Integer tally (energy, poison, ...).
    Counter,
    /// On/off status marker.
    Toggle,
    /// Two-state marker that must be enabled before it can be flipped.
    Switch,
}

/// Whether a counter's state is shared across slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exclusivity {
    /// Independent per slot.
    None,
    /// At most one slot may hold it.
    GlobalExclusiveToggle,
    /// One value mirrored to every slot.
    GlobalSyncSwitch,
}

/// Static counter definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CounterDefinition {
    pub id: CounterId,
    pub kind: CounterKind,
    pub exclusivity: Exclusivity,
    /// Short display label.
    pub label: &'static str,
}

impl CounterDefinition {
    /// Check if this counter is held by at most one slot.
    #[must_use]
    pub const fn is_global_exclusive(&self) -> bool {
        matches!(self.exclusivity, Exclusivity::GlobalExclusiveToggle)
    }

    /// Check if this counter is mirrored to every slot.
    #[must_use]
    pub const fn is_global_sync(&self) -> bool {
        matches!(self.exclusivity, Exclusivity::GlobalSyncSwitch)
    }
}

/// Runtime state of one counter on one slot.
///
/// `value` is only meaningful for `CounterKind::Counter`, `switched` only
/// for `CounterKind::Switch`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CounterState {
    pub enabled: bool,
    pub value: i32,
    pub switched: bool,
}

impl CounterState {
    /// Apply the tap rule shared by every switch: enable a disabled switch,
    /// flip an enabled one.
    #[must_use]
    pub const fn switch_tapped(self) -> Self {
        if self.enabled {
            Self {
                switched: !self.switched,
                ..self
            }
        } else {
            Self {
                enabled: true,
                ..self
            }
        }
    }
}
