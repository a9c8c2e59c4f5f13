//! Pre-archive validation.
//!
//! A session can only be archived as a completed game once every seat has a
//! distinct player and deck, exactly one player is left standing, and
//! exactly one player is marked as having started.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Session, SLOT_COUNT};
use crate::counters::CounterId;

/// Number of dead slots in a finished four-player game.
const FINISHED_DEAD_COUNT: usize = SLOT_COUNT - 1;

/// Why a session cannot be archived. Checks run in declaration order and
/// the first failure wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RejectReason {
    #[error("players incomplete")]
    PlayersIncomplete,
    #[error("duplicate players")]
    DuplicatePlayers,
    #[error("decks incomplete")]
    DecksIncomplete,
    #[error("duplicate decks")]
    DuplicateDecks,
    #[error("winner undetermined")]
    WinnerUndetermined { dead: usize },
    #[error("ambiguous starting player")]
    AmbiguousStartingPlayer { started: usize },
}

impl RejectReason {
    /// Sentence shown to the user on the save screen.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            RejectReason::PlayersIncomplete => "You have not selected all players.",
            RejectReason::DuplicatePlayers => "You selected duplicate players.",
            RejectReason::DecksIncomplete => "You have not selected all decks.",
            RejectReason::DuplicateDecks => "You selected duplicate decks.",
            RejectReason::WinnerUndetermined { .. } => "A winner was not determined for this game.",
            RejectReason::AmbiguousStartingPlayer { started: 0 } => "No player has started the game.",
            RejectReason::AmbiguousStartingPlayer { .. } => "Multiple players have started the game.",
        }
    }
}

/// Check whether a session may be archived.
///
/// Returns `None` when every check passes.
#[must_use]
pub fn validate_for_archive(session: &Session) -> Option<RejectReason> {
    let player_ids: Vec<Option<&str>> = session.slots().values().map(|s| s.player_id()).collect();
    if player_ids.iter().any(Option::is_none) {
        return Some(RejectReason::PlayersIncomplete);
    }
    if distinct(&player_ids) != SLOT_COUNT {
        return Some(RejectReason::DuplicatePlayers);
    }

    let deck_ids: Vec<Option<&str>> = session.slots().values().map(|s| s.deck_id()).collect();
    if deck_ids.iter().any(Option::is_none) {
        return Some(RejectReason::DecksIncomplete);
    }
    if distinct(&deck_ids) != SLOT_COUNT {
        return Some(RejectReason::DuplicateDecks);
    }

    let dead = session.dead_count();
    if dead != FINISHED_DEAD_COUNT {
        return Some(RejectReason::WinnerUndetermined { dead });
    }

    let started = session.holders(CounterId::Started).count();
    if started != 1 {
        return Some(RejectReason::AmbiguousStartingPlayer { started });
    }

    None
}

fn distinct(ids: &[Option<&str>]) -> usize {
    ids.iter().flatten().collect::<FxHashSet<_>>().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DeckRef, PlayerRef, SlotId};
    use crate::counters::CounterState;

    fn complete_session() -> Session {
        let mut session = Session::new(40);
        for slot in SlotId::all() {
            let n = slot.number();
            let target = session.slot_mut(slot);
            target.player = Some(PlayerRef::new(format!("p{n}"), format!("Player {n}")));
            target.deck = Some(DeckRef::new(format!("d{n}"), format!("Deck {n}")));
            target.dead = slot != SlotId::Player1;
        }
        session
            .slot_mut(SlotId::Player3)
            .set_counter(CounterId::Started, CounterState { enabled: true, ..Default::default() });
        session
    }

    #[test]
    fn test_complete_session_is_valid() {
        assert_eq!(validate_for_archive(&complete_session()), None);
    }

    #[test]
    fn test_empty_session_reports_players_first() {
        assert_eq!(
            validate_for_archive(&Session::new(40)),
            Some(RejectReason::PlayersIncomplete)
        );
    }

    #[test]
    fn test_unresolved_player_counts_as_missing() {
        let mut session = complete_session();
        session.slot_mut(SlotId::Player2).player = Some(PlayerRef::default());

        assert_eq!(validate_for_archive(&session), Some(RejectReason::PlayersIncomplete));
    }

    #[test]
    fn test_no_winner() {
        let mut session = complete_session();
        session.slot_mut(SlotId::Player2).dead = false;

        assert_eq!(
            validate_for_archive(&session),
            Some(RejectReason::WinnerUndetermined { dead: 2 })
        );
    }

    #[test]
    fn test_starting_player_messages() {
        let mut session = complete_session();
        session
            .slot_mut(SlotId::Player3)
            .set_counter(CounterId::Started, CounterState::default());

        let reason = validate_for_archive(&session).unwrap();
        assert_eq!(reason, RejectReason::AmbiguousStartingPlayer { started: 0 });
        assert_eq!(reason.user_message(), "No player has started the game.");
        assert_eq!(reason.to_string(), "ambiguous starting player");

        let multiple = RejectReason::AmbiguousStartingPlayer { started: 2 };
        assert_eq!(multiple.user_message(), "Multiple players have started the game.");
    }
}
