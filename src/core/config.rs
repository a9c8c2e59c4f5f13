//! Tracker configuration.
//!
//! The defaults reproduce a standard four-player commander table. Every
//! value can be overridden with a `with_*` builder or loaded from JSON.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Shortest accepted hold interval or batch decay. A zero period would make
/// a repeat due again the moment it fires.
pub const MIN_TIMER_PERIOD: Duration = Duration::from_millis(1);

/// Tracker configuration parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Life total every slot starts (and resets) with.
    pub starting_life: i32,

    /// Commander damage from a single source at which a slot is dead.
    pub commander_damage_lethal: i32,

    /// Delay between repeats while a control is held.
    #[serde(with = "millis")]
    pub hold_repeat_interval: Duration,

    /// Quiet period after which the recent-change display resets.
    #[serde(with = "millis")]
    pub batch_decay: Duration,

    /// Amount applied by a single tap on a life or damage control.
    pub tap_step: i32,

    /// Amount applied by each repeat of a held control.
    pub hold_step: i32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            starting_life: 40,
            commander_damage_lethal: 21,
            hold_repeat_interval: Duration::from_millis(500),
            batch_decay: Duration::from_millis(3000),
            tap_step: 1,
            hold_step: 10,
        }
    }
}

impl TrackerConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    ///
    /// Zero timer periods are rejected.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Create a new config with a custom starting life.
    #[must_use]
    pub fn with_starting_life(mut self, life: i32) -> Self {
        self.starting_life = life;
        self
    }

    /// Create a new config with a custom lethal commander damage threshold.
    #[must_use]
    pub fn with_commander_damage_lethal(mut self, lethal: i32) -> Self {
        self.commander_damage_lethal = lethal;
        self
    }

    /// Create a new config with a custom hold repeat interval, clamped to
    /// `MIN_TIMER_PERIOD`.
    #[must_use]
    pub fn with_hold_repeat_interval(mut self, interval: Duration) -> Self {
        self.hold_repeat_interval = interval.max(MIN_TIMER_PERIOD);
        self
    }

    /// Create a new config with a custom batch decay period, clamped to
    /// `MIN_TIMER_PERIOD`.
    #[must_use]
    pub fn with_batch_decay(mut self, decay: Duration) -> Self {
        self.batch_decay = decay.max(MIN_TIMER_PERIOD);
        self
    }

    /// Create a new config with custom tap and hold steps.
    #[must_use]
    pub fn with_steps(mut self, tap: i32, hold: i32) -> Self {
        self.tap_step = tap;
        self.hold_step = hold;
        self
    }
}

mod millis {
    use std::time::Duration;

    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        match u64::deserialize(deserializer)? {
            0 => Err(D::Error::custom("timer period must be at least 1 ms")),
            ms => Ok(Duration::from_millis(ms)),
        }
    }
}
