//! Game state engine: pure transitions over a session snapshot.
//!
//! Every operation takes the current `Session` and returns the next one.
//! Cross-slot rules (exclusive toggles, synchronized switches) are resolved
//! inside a single transition, so no caller ever observes a snapshot where
//! one slot has been updated and its siblings have not.
//!
//! Operations are total. Amounts are absorbed by clamps and counters come
//! from a closed enumeration, so there is nothing to report as an error.

use tracing::debug;

use crate::core::{IdentityRef, Intent, PlayerSlot, Session, SlotId, TrackerConfig};
use crate::counters::{CounterId, CounterKind, CounterRegistry, CounterState, Exclusivity};

/// Applies intents to sessions.
#[derive(Clone, Debug, Default)]
pub struct GameEngine {
    config: TrackerConfig,
}

impl GameEngine {
    /// Create an engine with the given configuration.
    #[must_use]
    pub fn new(config: TrackerConfig) -> Self {
        Self { config }
    }

    /// Get the engine configuration.
    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Create a freshly initialized session.
    #[must_use]
    pub fn new_session(&self) -> Session {
        Session::new(self.config.starting_life)
    }

    /// Apply any intent.
    #[must_use]
    pub fn apply(&self, session: &Session, intent: &Intent) -> Session {
        match intent {
            Intent::ChangeLife { slot, amount } => self.change_life(session, *slot, *amount),
            Intent::ChangeCommanderDamage { slot, source, amount } => {
                self.change_commander_damage(session, *slot, *source, *amount)
            }
            Intent::CounterPrimary { slot, counter } => {
                self.dispatch_counter_primary(session, *slot, *counter)
            }
            Intent::CounterSecondary { slot, counter } => {
                self.dispatch_counter_secondary(session, *slot, *counter)
            }
            Intent::DecrementCounter { slot, counter } => {
                self.decrement_counter(session, *slot, *counter)
            }
            Intent::AssignIdentity { slot, identity } => {
                self.assign_identity(session, *slot, identity.clone())
            }
            Intent::Reset => self.reset_session(session),
        }
    }

    // === Life and Commander Damage ===

    /// Change a slot's life total, flooring at zero.
    #[must_use]
    pub fn change_life(&self, session: &Session, slot: SlotId, amount: i32) -> Session {
        let mut next = session.clone();
        let target = next.slot_mut(slot);

        target.life_total = target.life_total.saturating_add(amount).max(0);
        let dead = target.derive_dead(self.config.commander_damage_lethal);
        set_dead(target, dead);

        debug!(%slot, amount, life = target.life_total, dead, "life changed");
        next
    }

    /// Record commander damage dealt to `slot` by `source`.
    ///
    /// Life moves inversely to damage. Removing more damage than is on
    /// record clamps the ledger at zero and only refunds life for the part
    /// that was real.
    #[must_use]
    pub fn change_commander_damage(
        &self,
        session: &Session,
        slot: SlotId,
        source: SlotId,
        amount: i32,
    ) -> Session {
        if slot == source {
            debug!(%slot, "ignoring commander damage from own slot");
            return session.clone();
        }

        let mut next = session.clone();
        let target = next.slot_mut(slot);

        let raw = target.commander_damage[source].saturating_add(amount);
        let overcorrection = raw.min(0).saturating_neg();

        target.life_total = target
            .life_total
            .saturating_sub(amount)
            .saturating_sub(overcorrection)
            .max(0);
        target.commander_damage[source] = raw.max(0);

        let dead = target.derive_dead(self.config.commander_damage_lethal);
        set_dead(target, dead);

        debug!(
            %slot,
            %source,
            amount,
            overcorrection,
            damage = target.commander_damage[source],
            life = target.life_total,
            dead,
            "commander damage changed"
        );
        next
    }

    // === Counters ===

    /// Tap on a counter.
    #[must_use]
    pub fn dispatch_counter_primary(
        &self,
        session: &Session,
        slot: SlotId,
        counter: CounterId,
    ) -> Session {
        let def = CounterRegistry::get(counter);
        let mut next = session.clone();

        match (def.kind, def.exclusivity) {
            (CounterKind::Counter, _) => {
                next.slot_mut(slot).update_counter(counter, |c| CounterState {
                    enabled: true,
                    value: c.value.saturating_add(1),
                    ..c
                });
            }
            (CounterKind::Toggle, Exclusivity::GlobalExclusiveToggle) => {
                let new_self = !session[slot].has_counter(counter);
                for (id, target) in next.iter_mut() {
                    target.update_counter(counter, |c| CounterState {
                        enabled: id == slot && new_self,
                        ..c
                    });
                }
            }
            (CounterKind::Toggle, _) => {
                let target = next.slot_mut(slot);
                target.update_counter(counter, |c| CounterState {
                    enabled: !c.enabled,
                    ..c
                });
                if counter == CounterId::Dead {
                    target.dead = !target.dead;
                }
            }
            (CounterKind::Switch, Exclusivity::GlobalSyncSwitch) => {
                let tapped = session[slot].counter(counter).switch_tapped();
                for (_, target) in next.iter_mut() {
                    target.set_counter(counter, tapped);
                }
            }
            (CounterKind::Switch, _) => {
                next.slot_mut(slot)
                    .update_counter(counter, CounterState::switch_tapped);
            }
        }

        debug!(%slot, ?counter, state = ?next[slot].counter(counter), "counter tapped");
        next
    }

    /// Long-press on a counter: clear it.
    #[must_use]
    pub fn dispatch_counter_secondary(
        &self,
        session: &Session,
        slot: SlotId,
        counter: CounterId,
    ) -> Session {
        let def = CounterRegistry::get(counter);
        let mut next = session.clone();

        match (def.kind, def.exclusivity) {
            (CounterKind::Counter, _) => {
                next.slot_mut(slot).update_counter(counter, |c| CounterState {
                    enabled: false,
                    value: 0,
                    ..c
                });
            }
            (CounterKind::Toggle, _) => {
                let target = next.slot_mut(slot);
                target.update_counter(counter, |c| CounterState {
                    enabled: false,
                    ..c
                });
                if counter == CounterId::Dead {
                    target.dead = false;
                }
            }
            (CounterKind::Switch, Exclusivity::GlobalSyncSwitch) => {
                for (_, target) in next.iter_mut() {
                    target.set_counter(counter, CounterState::default());
                }
            }
            (CounterKind::Switch, _) => {
                next.slot_mut(slot).update_counter(counter, |c| CounterState {
                    enabled: false,
                    switched: false,
                    ..c
                });
            }
        }

        debug!(%slot, ?counter, "counter cleared");
        next
    }

    /// Decrement a tally counter. The value is not floored at zero.
    ///
    /// Only `CounterKind::Counter` counters have a value; other kinds are
    /// returned unchanged.
    #[must_use]
    pub fn decrement_counter(&self, session: &Session, slot: SlotId, counter: CounterId) -> Session {
        if CounterRegistry::kind_of(counter) != CounterKind::Counter {
            debug!(%slot, ?counter, "decrement ignored for non-tally counter");
            return session.clone();
        }

        let mut next = session.clone();
        next.slot_mut(slot).update_counter(counter, |c| {
            let value = c.value.saturating_sub(1);
            CounterState {
                enabled: value > 0,
                value,
                ..c
            }
        });

        debug!(%slot, ?counter, value = next[slot].counter(counter).value, "counter decremented");
        next
    }

    // === Session ===

    /// Restore every slot to its starting state, keeping identities.
    #[must_use]
    pub fn reset_session(&self, session: &Session) -> Session {
        let mut next = session.clone();
        for (_, target) in next.iter_mut() {
            *target = target.reset(self.config.starting_life);
        }
        next.pending_archive = false;

        debug!(starting_life = self.config.starting_life, "session reset");
        next
    }

    /// Assign a player or deck to a slot.
    #[must_use]
    pub fn assign_identity(&self, session: &Session, slot: SlotId, identity: IdentityRef) -> Session {
        let mut next = session.clone();
        let target = next.slot_mut(slot);

        match identity {
            IdentityRef::Player(player) => {
                debug!(%slot, player = %player.id, "player assigned");
                target.player = Some(player);
            }
            IdentityRef::Deck(deck) => {
                debug!(%slot, deck = %deck.id, "deck assigned");
                target.deck = Some(deck);
            }
        }

        next
    }
}

/// Set the death flag and keep the death counter in lock-step with it.
fn set_dead(slot: &mut PlayerSlot, dead: bool) {
    slot.dead = dead;
    slot.update_counter(CounterId::Dead, |c| CounterState {
        enabled: dead,
        ..c
    });
}
