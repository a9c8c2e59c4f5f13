//! Session state: the four player slots.
//!
//! ## PlayerSlot
//!
//! Everything tracked for one seat:
//! - Identity references (player, deck)
//! - Life total and death flag
//! - Commander damage taken from each other slot
//! - Counter states
//!
//! ## Session
//!
//! The four slots plus the pending-archive flag. The shape is fixed; slots
//! are never added or removed.

use im::HashMap as ImHashMap;
use serde::{Deserialize, Serialize};

use super::identity::{DeckRef, PlayerRef};
use super::slot::{SlotId, SlotMap};
use crate::counters::{CounterId, CounterRegistry, CounterState};
use crate::error::InvariantViolation;

/// State of one seat at the table.
///
/// Uses `im` persistent maps so snapshot clones are O(1).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSlot {
    /// Assigned player, if any.
    #[serde(default)]
    pub player: Option<PlayerRef>,

    /// Assigned deck, if any.
    #[serde(default)]
    pub deck: Option<DeckRef>,

    /// Current life total. Never negative.
    pub life_total: i32,

    /// Whether the slot is out of the game.
    pub dead: bool,

    /// Commander damage taken, keyed by source slot. The entry for the slot
    /// itself stays at zero.
    #[serde(default)]
    pub commander_damage: SlotMap<i32>,

    /// Counter states. Missing entries read as the default state.
    #[serde(default)]
    pub counters: ImHashMap<CounterId, CounterState>,
}

impl PlayerSlot {
    /// Create a slot with no identity and default game state.
    #[must_use]
    pub fn new(starting_life: i32) -> Self {
        Self {
            player: None,
            deck: None,
            life_total: starting_life,
            dead: false,
            commander_damage: SlotMap::default(),
            counters: default_counters(),
        }
    }

    /// Get a counter's state, defaulting when absent.
    #[must_use]
    pub fn counter(&self, id: CounterId) -> CounterState {
        self.counters.get(&id).copied().unwrap_or_default()
    }

    /// Check if a counter is enabled.
    #[must_use]
    pub fn has_counter(&self, id: CounterId) -> bool {
        self.counter(id).enabled
    }

    /// Set a counter's state.
    pub fn set_counter(&mut self, id: CounterId, state: CounterState) {
        self.counters.insert(id, state);
    }

    /// Modify a counter's state in place.
    pub fn update_counter(&mut self, id: CounterId, f: impl FnOnce(CounterState) -> CounterState) {
        let next = f(self.counter(id));
        self.set_counter(id, next);
    }

    /// Iterate over enabled counters in display order.
    pub fn enabled_counters(&self) -> impl Iterator<Item = (CounterId, CounterState)> + '_ {
        CounterId::ALL
            .into_iter()
            .map(|id| (id, self.counter(id)))
            .filter(|(_, state)| state.enabled)
    }

    /// Commander damage taken from `source`.
    #[must_use]
    pub fn commander_damage_from(&self, source: SlotId) -> i32 {
        self.commander_damage[source]
    }

    /// Check if damage from any single source has reached `lethal`.
    #[must_use]
    pub fn has_lethal_commander_damage(&self, lethal: i32) -> bool {
        self.commander_damage.values().any(|&damage| damage >= lethal)
    }

    /// Derive the death flag from life and commander damage.
    #[must_use]
    pub fn derive_dead(&self, lethal: i32) -> bool {
        self.life_total == 0 || self.has_lethal_commander_damage(lethal)
    }

    /// Resolved player id, if a real player is assigned.
    #[must_use]
    pub fn player_id(&self) -> Option<&str> {
        self.player
            .as_ref()
            .filter(|p| p.is_resolved())
            .map(|p| p.id.as_str())
    }

    /// Resolved deck id, if a real deck is assigned.
    #[must_use]
    pub fn deck_id(&self) -> Option<&str> {
        self.deck
            .as_ref()
            .filter(|d| d.is_resolved())
            .map(|d| d.id.as_str())
    }

    /// Return a fresh slot that keeps this slot's identities.
    #[must_use]
    pub fn reset(&self, starting_life: i32) -> Self {
        Self {
            player: self.player.clone(),
            deck: self.deck.clone(),
            ..Self::new(starting_life)
        }
    }
}

fn default_counters() -> ImHashMap<CounterId, CounterState> {
    CounterId::ALL
        .into_iter()
        .map(|id| (id, CounterState::default()))
        .collect()
}

/// Complete table state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    slots: SlotMap<PlayerSlot>,

    /// Set while an archive of this session is in progress.
    #[serde(default)]
    pub pending_archive: bool,
}

impl Session {
    /// Create a session with four empty slots.
    #[must_use]
    pub fn new(starting_life: i32) -> Self {
        Self {
            slots: SlotMap::new(|_| PlayerSlot::new(starting_life)),
            pending_archive: false,
        }
    }

    /// Get a slot.
    #[must_use]
    pub fn slot(&self, slot: SlotId) -> &PlayerSlot {
        &self.slots[slot]
    }

    /// Get a mutable slot.
    pub fn slot_mut(&mut self, slot: SlotId) -> &mut PlayerSlot {
        &mut self.slots[slot]
    }

    /// Get all slots.
    #[must_use]
    pub fn slots(&self) -> &SlotMap<PlayerSlot> {
        &self.slots
    }

    /// Iterate over (SlotId, &PlayerSlot) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &PlayerSlot)> {
        self.slots.iter()
    }

    /// Iterate over (SlotId, &mut PlayerSlot) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut PlayerSlot)> {
        self.slots.iter_mut()
    }

    /// Number of dead slots.
    #[must_use]
    pub fn dead_count(&self) -> usize {
        self.slots.values().filter(|s| s.dead).count()
    }

    /// Slots that currently have `counter` enabled.
    pub fn holders(&self, counter: CounterId) -> impl Iterator<Item = SlotId> + '_ {
        self.iter()
            .filter(move |(_, s)| s.has_counter(counter))
            .map(|(id, _)| id)
    }

    /// Slots still in the game.
    pub fn alive(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.iter().filter(|(_, s)| !s.dead).map(|(id, _)| id)
    }

    /// Check the invariants every engine transition preserves.
    ///
    /// `dead` is not re-derived from life and damage: the manual Dead
    /// toggle may legitimately override it. It must still agree with the
    /// Dead counter.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        for (id, slot) in self.iter() {
            if slot.life_total < 0 {
                return Err(InvariantViolation::NegativeLife { slot: id, life: slot.life_total });
            }
            if slot.commander_damage[id] != 0 {
                return Err(InvariantViolation::SelfCommanderDamage { slot: id });
            }
            if let Some((from, _)) = slot.commander_damage.iter().find(|(_, d)| **d < 0) {
                return Err(InvariantViolation::NegativeCommanderDamage { slot: id, from });
            }
            if slot.dead != slot.has_counter(CounterId::Dead) {
                return Err(InvariantViolation::DeadCounterMismatch { slot: id });
            }
        }

        for def in CounterRegistry::iter() {
            if def.is_global_exclusive() {
                let holders = self.holders(def.id).count();
                if holders > 1 {
                    return Err(InvariantViolation::ExclusiveCounterShared { counter: def.id, holders });
                }
            }
            if def.is_global_sync() {
                let first = self.slots[SlotId::Player1].counter(def.id);
                if self.slots.values().any(|s| s.counter(def.id) != first) {
                    return Err(InvariantViolation::SyncCounterDiverged { counter: def.id });
                }
            }
        }

        Ok(())
    }
}

impl std::ops::Index<SlotId> for Session {
    type Output = PlayerSlot;

    fn index(&self, slot: SlotId) -> &Self::Output {
        self.slot(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_slot_new() {
        let slot = PlayerSlot::new(40);

        assert_eq!(slot.life_total, 40);
        assert!(!slot.dead);
        assert!(slot.player.is_none());
        assert_eq!(slot.counters.len(), CounterId::ALL.len());
        assert_eq!(slot.enabled_counters().count(), 0);
        for source in SlotId::all() {
            assert_eq!(slot.commander_damage_from(source), 0);
        }
    }

    #[test]
    fn test_counter_defaults_when_missing() {
        let mut slot = PlayerSlot::new(40);
        slot.counters.remove(&CounterId::Poison);

        assert_eq!(slot.counter(CounterId::Poison), CounterState::default());
    }

    #[test]
    fn test_update_counter() {
        let mut slot = PlayerSlot::new(40);
        slot.update_counter(CounterId::Energy, |c| CounterState {
            enabled: true,
            value: c.value + 2,
            ..c
        });

        assert_eq!(slot.counter(CounterId::Energy).value, 2);
        let enabled: Vec<_> = slot.enabled_counters().map(|(id, _)| id).collect();
        assert_eq!(enabled, vec![CounterId::Energy]);
    }

    #[test]
    fn test_derive_dead() {
        let mut slot = PlayerSlot::new(40);
        assert!(!slot.derive_dead(21));

        slot.commander_damage[SlotId::Player3] = 21;
        assert!(slot.derive_dead(21));

        slot.commander_damage[SlotId::Player3] = 20;
        slot.life_total = 0;
        assert!(slot.derive_dead(21));
    }

    #[test]
    fn test_identity_ids_ignore_unresolved() {
        let mut slot = PlayerSlot::new(40);
        slot.player = Some(PlayerRef::default());
        assert_eq!(slot.player_id(), None);

        slot.player = Some(PlayerRef::new("p1", "Alice"));
        assert_eq!(slot.player_id(), Some("p1"));
    }

    #[test]
    fn test_slot_reset_keeps_identity() {
        let mut slot = PlayerSlot::new(40);
        slot.player = Some(PlayerRef::new("p1", "Alice"));
        slot.deck = Some(DeckRef::new("d1", "Atraxa"));
        slot.life_total = 3;
        slot.dead = true;
        slot.set_counter(CounterId::Poison, CounterState { enabled: true, value: 4, switched: false });

        let reset = slot.reset(40);

        assert_eq!(reset.player, slot.player);
        assert_eq!(reset.deck, slot.deck);
        assert_eq!(reset.life_total, 40);
        assert!(!reset.dead);
        assert!(!reset.has_counter(CounterId::Poison));
    }

    #[test]
    fn test_session_queries() {
        let mut session = Session::new(40);
        session.slot_mut(SlotId::Player2).dead = true;
        session
            .slot_mut(SlotId::Player4)
            .set_counter(CounterId::Monarch, CounterState { enabled: true, ..Default::default() });

        assert_eq!(session.dead_count(), 1);
        assert_eq!(session.holders(CounterId::Monarch).collect::<Vec<_>>(), vec![SlotId::Player4]);
        assert_eq!(session.alive().count(), 3);
        assert_eq!(session[SlotId::Player1].life_total, 40);
    }

    #[test]
    fn test_check_invariants() {
        assert_eq!(Session::new(40).check_invariants(), Ok(()));

        let mut session = Session::new(40);
        session.slot_mut(SlotId::Player3).life_total = -7;
        assert_eq!(
            session.check_invariants(),
            Err(InvariantViolation::NegativeLife { slot: SlotId::Player3, life: -7 })
        );

        let mut session = Session::new(40);
        session.slot_mut(SlotId::Player2).commander_damage[SlotId::Player2] = 3;
        assert_eq!(
            session.check_invariants(),
            Err(InvariantViolation::SelfCommanderDamage { slot: SlotId::Player2 })
        );

        let mut session = Session::new(40);
        session.slot_mut(SlotId::Player1).commander_damage[SlotId::Player4] = -1;
        assert_eq!(
            session.check_invariants(),
            Err(InvariantViolation::NegativeCommanderDamage {
                slot: SlotId::Player1,
                from: SlotId::Player4
            })
        );

        let monarch = CounterState { enabled: true, ..Default::default() };
        let mut session = Session::new(40);
        session.slot_mut(SlotId::Player1).set_counter(CounterId::Monarch, monarch);
        session.slot_mut(SlotId::Player2).set_counter(CounterId::Monarch, monarch);
        assert_eq!(
            session.check_invariants(),
            Err(InvariantViolation::ExclusiveCounterShared { counter: CounterId::Monarch, holders: 2 })
        );

        let mut session = Session::new(40);
        session.slot_mut(SlotId::Player4).set_counter(CounterId::DayNight, monarch);
        assert_eq!(
            session.check_invariants(),
            Err(InvariantViolation::SyncCounterDiverged { counter: CounterId::DayNight })
        );
    }

    #[test]
    fn test_manual_death_passes_invariants() {
        let mut session = Session::new(40);
        let slot = session.slot_mut(SlotId::Player1);
        slot.dead = true;
        slot.set_counter(CounterId::Dead, CounterState { enabled: true, ..Default::default() });

        assert_eq!(session.check_invariants(), Ok(()));

        session.slot_mut(SlotId::Player1).dead = false;
        assert_eq!(
            session.check_invariants(),
            Err(InvariantViolation::DeadCounterMismatch { slot: SlotId::Player1 })
        );
    }

    #[test]
    fn test_session_serialization() {
        let mut session = Session::new(40);
        session.slot_mut(SlotId::Player1).player = Some(PlayerRef::new("p1", "Alice"));
        session.slot_mut(SlotId::Player2).commander_damage[SlotId::Player1] = 6;

        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();

        assert_eq!(back, session);
    }
}
