// Messages between the app orchestrator and the TUI, plus the render-ready
// snapshot of the game the TUI draws from.

use bigtwo_core::card::Card;
use bigtwo_core::client::{ConnectionStatus, GameClient};
use bigtwo_core::messages::{ActionStatus, MessageLog};
use bigtwo_core::notify::NotificationKind;
use bigtwo_core::scores::ScoreTable;
use bigtwo_core::session::GamePhase;
use bigtwo_core::sort::SortPreference;

/// Updates pushed from the app orchestrator to the TUI.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    /// Full redraw data after any state change.
    Snapshot(Box<ViewSnapshot>),
    /// A turn change the user should hear about.
    Notify(NotificationKind),
}

/// Commands sent from the TUI to the app orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    PlayCards(Vec<Card>),
    /// The pass control: pass on your turn, toggle auto-pass otherwise.
    Pass,
    SendChat(String),
    SetAlias(String),
    NewGame,
    ToggleSort,
    /// The first key press of the session.
    UnlockNotifications,
    Quit,
}

/// One row of the players panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRow {
    pub id: String,
    pub name: String,
    pub card_count: u32,
    pub has_passed: bool,
    pub is_you: bool,
    pub is_current: bool,
}

/// The hand on the table, ready to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePlay {
    pub cards: Vec<Card>,
    pub label: String,
    pub played_by: String,
}

/// Everything the TUI needs to draw one frame.
#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    pub title: String,
    pub connection: ConnectionStatus,
    pub phase: GamePhase,
    pub round_number: u32,
    pub is_your_turn: bool,
    pub is_round_over: bool,
    pub is_match_over: bool,
    pub current_player_name: Option<String>,
    pub round_winner: Option<String>,
    pub match_winner: Option<String>,
    pub pass_count: u32,
    pub auto_pass: bool,
    pub sort_preference: SortPreference,
    pub alias: Option<String>,
    pub hand: Vec<Card>,
    pub table: Option<TablePlay>,
    pub players: Vec<PlayerRow>,
    pub scores: ScoreTable,
    pub action_status: Option<ActionStatus>,
    pub chat: Vec<String>,
    pub system: Vec<String>,
    pub errors: Vec<String>,
    pub game_messages: Vec<String>,
}

impl ViewSnapshot {
    pub fn from_client(client: &GameClient) -> Self {
        let session = client.session();
        let you = session.your_player_id();
        let current = session.current_player_id();

        let players = session
            .players()
            .iter()
            .map(|p| PlayerRow {
                id: p.id.clone(),
                name: p.name.clone(),
                card_count: p.card_count,
                has_passed: p.has_passed,
                is_you: you == Some(p.id.as_str()),
                is_current: current == Some(p.id.as_str()),
            })
            .collect();

        let table = session.last_played_hand().map(|played| TablePlay {
            cards: played.cards.clone(),
            label: played.label().to_string(),
            played_by: session.player_name(&played.owner_id).to_string(),
        });

        let current_player_name = session
            .current_player_name()
            .map(str::to_string)
            .or_else(|| current.map(|id| session.player_name(id).to_string()));

        ViewSnapshot {
            title: client.title(),
            connection: client.connection(),
            phase: session.phase(),
            round_number: session.round_number(),
            is_your_turn: session.is_your_turn(),
            is_round_over: session.is_round_over(),
            is_match_over: session.is_match_over(),
            current_player_name,
            round_winner: session
                .round_winner_id()
                .map(|id| session.player_name(id).to_string()),
            match_winner: session
                .match_winner_id()
                .map(|id| session.player_name(id).to_string()),
            pass_count: session.pass_count(),
            auto_pass: session.auto_pass_enabled(),
            sort_preference: session.sort_preference(),
            alias: client.alias().map(str::to_string),
            hand: session.hand().to_vec(),
            table,
            players,
            scores: client.score_table(),
            action_status: client.action_status().cloned(),
            chat: log_lines(client.chat_log()),
            system: log_lines(client.system_log()),
            errors: log_lines(client.error_log()),
            game_messages: log_lines(client.game_message_log()),
        }
    }
}

/// `[HH:MM:SS] text`, oldest first.
fn log_lines(log: &MessageLog) -> Vec<String> {
    log.iter()
        .map(|entry| format!("[{}] {}", entry.at.format("%H:%M:%S"), entry.text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigtwo_core::client::ClientPrefs;

    #[test]
    fn snapshot_marks_you_and_current_player() {
        let mut client = GameClient::new(ClientPrefs::default());
        client.on_connected();
        client.handle_raw(
            r#"{"type":"gameState","yourPlayerId":"p1","currentPlayerId":"p2","passCount":0,
                "playersInfo":[{"id":"p1","name":"Alice","cardCount":13,"hasPassed":false},
                               {"id":"p2","name":"Bob","cardCount":12,"hasPassed":false}],
                "lastPlayedHand":{"cards":[{"rank":3,"suit":0}],"playerId":"p1","handType":1,"rank":3},
                "isGameOver":false}"#,
        );
        client.handle_raw(r#"{"type":"chat","sender":"Bob","content":"gl"}"#);

        let view = ViewSnapshot::from_client(&client);
        assert_eq!(view.players.len(), 2);
        assert!(view.players[0].is_you && !view.players[0].is_current);
        assert!(view.players[1].is_current);
        assert_eq!(view.current_player_name.as_deref(), Some("Bob"));

        let table = view.table.unwrap();
        assert_eq!(table.label, "Single");
        assert_eq!(table.played_by, "Alice");

        assert_eq!(view.chat.len(), 1);
        assert!(view.chat[0].ends_with("] Bob: gl"));
        assert_eq!(view.title, "Alice - Big Two (R1)");
    }
}
