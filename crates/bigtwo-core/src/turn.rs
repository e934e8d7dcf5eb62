// Turn state and auto-pass automation.
//
// The engine reads the session after each reconciliation and decides whether
// the client should act on its own. User-initiated play/pass requests are
// checked here too so the same preconditions guard both paths.

use tracing::{debug, info};

use crate::card::Card;
use crate::error::ActionError;
use crate::protocol::ClientCommand;
use crate::session::Session;

/// Where the local player stands relative to the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Waiting,
    YourTurn,
    Ended,
}

impl TurnState {
    pub fn of(session: &Session) -> Self {
        if session.is_over() {
            TurnState::Ended
        } else if session.is_your_turn() {
            TurnState::YourTurn
        } else {
            TurnState::Waiting
        }
    }
}

/// What the automation did for one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutomationOutcome {
    /// Auto-pass was armed and has been disarmed.
    pub auto_pass_cleared: bool,
    /// A pass to send on the player's behalf. At most one per snapshot.
    pub command: Option<ClientCommand>,
}

/// Result of pressing the pass control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// Pass on the local turn. `auto_pass_cleared` is set when this also
    /// disarmed auto-pass.
    Send {
        command: ClientCommand,
        auto_pass_cleared: bool,
    },
    /// Off-turn press: auto-pass is now in the given state.
    Toggled(bool),
}

/// A new trick is led: nobody has passed on the current play and either
/// nothing is on the table or the leader is the one who played it.
pub fn is_new_trick(session: &Session) -> bool {
    if session.pass_count() != 0 {
        return false;
    }
    match session.last_played_hand() {
        None => true,
        Some(played) => session.current_player_id() == Some(played.owner_id.as_str()),
    }
}

/// Run the automation rules against a freshly reconciled session.
///
/// The reset rule runs before consumption so a pass armed during the
/// previous trick is never spent on the next one. `connected` gates only the
/// emitted command; flag changes always apply.
pub fn apply_automation(session: &mut Session, connected: bool) -> AutomationOutcome {
    let mut outcome = AutomationOutcome::default();
    if !session.auto_pass_enabled() {
        return outcome;
    }

    if session.is_over() {
        session.set_auto_pass(false);
        outcome.auto_pass_cleared = true;
        info!("Auto-pass cleared: game over");
        return outcome;
    }

    if is_new_trick(session) {
        session.set_auto_pass(false);
        outcome.auto_pass_cleared = true;
        info!("Auto-pass cleared: new trick");
        return outcome;
    }

    if session.is_your_turn() {
        if connected {
            info!("Auto-passing");
            outcome.command = Some(ClientCommand::PassTurn);
        } else {
            debug!("Auto-pass due but not connected, skipping");
        }
    }
    outcome
}

/// Check a play request and build the command.
pub fn request_play(session: &Session, cards: &[Card]) -> Result<ClientCommand, ActionError> {
    ensure_live(session)?;
    if !session.is_your_turn() {
        return Err(ActionError::NotYourTurn);
    }
    if cards.is_empty() {
        return Err(ActionError::NoCardsSelected);
    }
    Ok(ClientCommand::PlayCards {
        cards: cards.to_vec(),
    })
}

/// An explicit pass. Only valid on the local turn; disarms auto-pass.
pub fn request_pass(session: &mut Session) -> Result<PassOutcome, ActionError> {
    ensure_live(session)?;
    if !session.is_your_turn() {
        return Err(ActionError::NotYourTurn);
    }
    let auto_pass_cleared = session.auto_pass_enabled();
    session.set_auto_pass(false);
    Ok(PassOutcome::Send {
        command: ClientCommand::PassTurn,
        auto_pass_cleared,
    })
}

/// The pass control: pass on the local turn, otherwise arm or disarm
/// auto-pass.
pub fn toggle_auto_pass(session: &mut Session) -> Result<PassOutcome, ActionError> {
    ensure_live(session)?;
    if session.is_your_turn() {
        return request_pass(session);
    }
    let enabled = !session.auto_pass_enabled();
    session.set_auto_pass(enabled);
    info!("Auto-pass {}", if enabled { "armed" } else { "disarmed" });
    Ok(PassOutcome::Toggled(enabled))
}

fn ensure_live(session: &Session) -> Result<(), ActionError> {
    if session.is_over() {
        Err(ActionError::GameOver)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit};
    use crate::protocol::{GameStatePayload, PlayedHand, PlayerInfo};

    fn players() -> Vec<PlayerInfo> {
        ["p1", "p2", "p3"]
            .iter()
            .map(|id| PlayerInfo {
                id: id.to_string(),
                name: id.to_uppercase(),
                card_count: 10,
                has_passed: false,
            })
            .collect()
    }

    fn played_by(owner: &str) -> Option<Option<PlayedHand>> {
        Some(Some(PlayedHand {
            cards: vec![Card::new(Rank::Seven, Suit::Hearts)],
            owner_id: owner.into(),
            hand_type_code: 1,
            hand_type_label: "Single".into(),
            rank: 7,
        }))
    }

    fn session_at(current: &str, pass_count: u32, owner: Option<&str>) -> Session {
        let mut session = Session::default();
        session.reconcile(GameStatePayload {
            your_player_id: Some("p1".into()),
            current_player_id: Some(current.into()),
            pass_count: Some(pass_count),
            players_info: Some(players()),
            last_played_hand: match owner {
                Some(o) => played_by(o),
                None => Some(None),
            },
            is_game_over: Some(false),
            ..Default::default()
        });
        session
    }

    #[test]
    fn turn_state_follows_session() {
        assert_eq!(TurnState::of(&session_at("p1", 1, Some("p2"))), TurnState::YourTurn);
        assert_eq!(TurnState::of(&session_at("p2", 1, Some("p3"))), TurnState::Waiting);

        let mut over = session_at("p1", 0, None);
        over.reconcile(GameStatePayload {
            is_game_over: Some(true),
            ..Default::default()
        });
        assert_eq!(TurnState::of(&over), TurnState::Ended);
    }

    #[test]
    fn empty_table_with_no_passes_is_a_new_trick() {
        assert!(is_new_trick(&session_at("p2", 0, None)));
    }

    #[test]
    fn trick_winner_leading_is_a_new_trick() {
        assert!(is_new_trick(&session_at("p2", 0, Some("p2"))));
        assert!(!is_new_trick(&session_at("p2", 0, Some("p3"))));
        assert!(!is_new_trick(&session_at("p2", 1, Some("p2"))));
    }

    #[test]
    fn armed_auto_pass_sends_once_mid_trick_and_stays_armed() {
        let mut session = session_at("p1", 1, Some("p3"));
        session.set_auto_pass(true);

        let outcome = apply_automation(&mut session, true);
        assert_eq!(outcome.command, Some(ClientCommand::PassTurn));
        assert!(!outcome.auto_pass_cleared);
        assert!(session.auto_pass_enabled());
    }

    #[test]
    fn auto_pass_cleared_at_trick_boundary_without_sending() {
        let mut session = session_at("p1", 0, Some("p1"));
        session.set_auto_pass(true);

        let outcome = apply_automation(&mut session, true);
        assert_eq!(outcome.command, None);
        assert!(outcome.auto_pass_cleared);
        assert!(!session.auto_pass_enabled());
    }

    #[test]
    fn auto_pass_waits_on_opponent_turn() {
        let mut session = session_at("p2", 1, Some("p3"));
        session.set_auto_pass(true);

        let outcome = apply_automation(&mut session, true);
        assert_eq!(outcome, AutomationOutcome::default());
        assert!(session.auto_pass_enabled());
    }

    #[test]
    fn auto_pass_not_sent_while_disconnected() {
        let mut session = session_at("p1", 1, Some("p3"));
        session.set_auto_pass(true);
        let outcome = apply_automation(&mut session, false);
        assert_eq!(outcome.command, None);
        assert!(session.auto_pass_enabled());
    }

    #[test]
    fn game_over_clears_auto_pass_and_rejects_actions() {
        let mut session = session_at("p1", 1, Some("p3"));
        session.set_auto_pass(true);
        session.reconcile(GameStatePayload {
            is_game_over: Some(true),
            ..Default::default()
        });

        let outcome = apply_automation(&mut session, true);
        assert!(outcome.auto_pass_cleared);
        assert_eq!(outcome.command, None);
        assert_eq!(
            request_play(&session, &[Card::new(Rank::Three, Suit::Diamonds)]),
            Err(ActionError::GameOver)
        );
        assert_eq!(request_pass(&mut session), Err(ActionError::GameOver));
        assert_eq!(toggle_auto_pass(&mut session), Err(ActionError::GameOver));
    }

    #[test]
    fn play_requires_turn_and_cards() {
        let mine = session_at("p1", 0, None);
        let theirs = session_at("p2", 0, None);
        let card = Card::new(Rank::Three, Suit::Diamonds);

        assert_eq!(request_play(&theirs, &[card]), Err(ActionError::NotYourTurn));
        assert_eq!(request_play(&mine, &[]), Err(ActionError::NoCardsSelected));
        assert_eq!(
            request_play(&mine, &[card]),
            Ok(ClientCommand::PlayCards { cards: vec![card] })
        );
    }

    #[test]
    fn pass_control_toggles_off_turn() {
        let mut session = session_at("p2", 1, Some("p3"));
        assert_eq!(toggle_auto_pass(&mut session), Ok(PassOutcome::Toggled(true)));
        assert!(session.auto_pass_enabled());
        assert_eq!(toggle_auto_pass(&mut session), Ok(PassOutcome::Toggled(false)));
        assert!(!session.auto_pass_enabled());
    }

    #[test]
    fn pass_control_on_own_turn_passes_and_disarms() {
        let mut session = session_at("p1", 1, Some("p3"));
        session.set_auto_pass(true);
        assert_eq!(
            toggle_auto_pass(&mut session),
            Ok(PassOutcome::Send {
                command: ClientCommand::PassTurn,
                auto_pass_cleared: true,
            })
        );
        assert!(!session.auto_pass_enabled());
    }

    #[test]
    fn explicit_pass_off_turn_is_rejected() {
        let mut session = session_at("p2", 1, Some("p3"));
        assert_eq!(request_pass(&mut session), Err(ActionError::NotYourTurn));
    }
}
