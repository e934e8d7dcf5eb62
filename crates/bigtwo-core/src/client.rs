// GameClient: the inbound pipeline (validate -> reconcile -> automate ->
// notify) and the user-action entry points.
//
// Every operation returns the side effects the caller must perform. The
// client itself never touches the network or the filesystem.

use tracing::{debug, info, warn};

use crate::card::Card;
use crate::error::ActionError;
use crate::messages::{ActionStatus, MessageLog};
use crate::notify::{turn_notification, NotificationKind};
use crate::protocol::{
    parse_server_message, ClientCommand, GameStatePayload, ServerMessage, VALIDATION_CONTEXT,
};
use crate::scores::ScoreTable;
use crate::session::Session;
use crate::sort::SortPreference;
use crate::turn::{self, PassOutcome};

/// Info note shown when an explicit pass disarms auto-pass.
pub const AUTO_PASS_DISABLED: &str = "Auto-pass disabled.";

/// A side effect for the runtime to carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Serialize and write to the socket.
    Send(ClientCommand),
    /// Alert the user about a turn change.
    Notify(NotificationKind),
    /// Store the new sort preference.
    PersistSortPreference(SortPreference),
    /// Store the new alias.
    PersistAlias(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    Connected,
    #[default]
    Disconnected,
}

/// Durable values read at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientPrefs {
    pub alias: Option<String>,
    pub sort_preference: SortPreference,
}

/// Owns the session plus the connection-scoped state around it.
#[derive(Debug, Clone)]
pub struct GameClient {
    session: Session,
    connection: ConnectionStatus,
    /// Set on (re)connect; cleared when the next snapshot arrives.
    awaiting_snapshot: bool,
    notifications_unlocked: bool,
    alias: Option<String>,
    action_status: Option<ActionStatus>,
    chat: MessageLog,
    system: MessageLog,
    errors: MessageLog,
    game_messages: MessageLog,
    diagnostics: MessageLog,
}

impl GameClient {
    pub fn new(prefs: ClientPrefs) -> Self {
        GameClient {
            session: Session::new(prefs.sort_preference),
            connection: ConnectionStatus::Disconnected,
            awaiting_snapshot: false,
            notifications_unlocked: false,
            alias: prefs.alias.filter(|a| !a.trim().is_empty()),
            action_status: None,
            chat: MessageLog::default(),
            system: MessageLog::default(),
            errors: MessageLog::default(),
            game_messages: MessageLog::default(),
            diagnostics: MessageLog::default(),
        }
    }

    // --- Read access ---

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn connection(&self) -> ConnectionStatus {
        self.connection
    }

    pub fn is_connected(&self) -> bool {
        self.connection == ConnectionStatus::Connected
    }

    pub fn notifications_unlocked(&self) -> bool {
        self.notifications_unlocked
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn action_status(&self) -> Option<&ActionStatus> {
        self.action_status.as_ref()
    }

    pub fn chat_log(&self) -> &MessageLog {
        &self.chat
    }

    pub fn system_log(&self) -> &MessageLog {
        &self.system
    }

    pub fn error_log(&self) -> &MessageLog {
        &self.errors
    }

    pub fn game_message_log(&self) -> &MessageLog {
        &self.game_messages
    }

    /// Rejected inbound payloads. Never shown as game errors.
    pub fn diagnostics(&self) -> &MessageLog {
        &self.diagnostics
    }

    /// Score panel projection for the current players.
    pub fn score_table(&self) -> ScoreTable {
        let session = &self.session;
        session.scores().project(
            session
                .players()
                .iter()
                .map(|p| (p.id.as_str(), p.name.as_str())),
            session.target_score(),
            session.is_match_over(),
        )
    }

    /// Window title / turn banner.
    pub fn title(&self) -> String {
        let session = &self.session;
        let base = match session.local_player() {
            Some(me) if !me.info.name.is_empty() => {
                format!("{} - Big Two (R{})", me.info.name, session.round_number())
            }
            _ => format!("Big Two (R{})", session.round_number()),
        };
        if session.is_your_turn() && !session.is_over() {
            format!("YOUR TURN! - {base}")
        } else {
            base
        }
    }

    // --- Connection lifecycle ---

    /// The transport opened. Re-announces the stored alias.
    pub fn on_connected(&mut self) -> Vec<Effect> {
        info!("Connected");
        self.connection = ConnectionStatus::Connected;
        self.awaiting_snapshot = true;
        match &self.alias {
            Some(alias) => vec![Effect::Send(ClientCommand::SetAlias {
                alias: alias.clone(),
            })],
            None => Vec::new(),
        }
    }

    /// The transport closed. The session is kept for display.
    pub fn on_disconnected(&mut self) {
        if self.is_connected() {
            warn!("Disconnected from server");
        }
        self.connection = ConnectionStatus::Disconnected;
    }

    /// A user gesture allows notifications for the rest of the session.
    pub fn unlock_notifications(&mut self) {
        if !self.notifications_unlocked {
            debug!("Notifications unlocked");
            self.notifications_unlocked = true;
        }
    }

    // --- Inbound ---

    /// Validate and process one raw socket payload.
    pub fn handle_raw(&mut self, raw: &str) -> Vec<Effect> {
        match parse_server_message(raw) {
            Ok(message) => self.handle_message(message),
            Err(e) => {
                warn!("Dropping malformed server payload: {}", e);
                self.diagnostics.push(e.to_string());
                Vec::new()
            }
        }
    }

    /// Process one validated message to completion.
    pub fn handle_message(&mut self, message: ServerMessage) -> Vec<Effect> {
        self.action_status = None;
        match message {
            ServerMessage::GameState(payload) => self.apply_snapshot(*payload),
            ServerMessage::Chat { sender, content } => {
                self.chat.push(format!("{sender}: {content}"));
                Vec::new()
            }
            ServerMessage::Error { content, context } => {
                if context.as_deref() == Some(VALIDATION_CONTEXT) {
                    self.action_status = Some(ActionStatus::Error(content));
                } else {
                    warn!("Server error: {}", content);
                    self.errors.push(content);
                }
                Vec::new()
            }
            ServerMessage::System { content } => {
                info!("System: {}", content);
                self.system.push(content);
                Vec::new()
            }
            ServerMessage::ActionSuccess { .. } => Vec::new(),
        }
    }

    fn apply_snapshot(&mut self, mut payload: GameStatePayload) -> Vec<Effect> {
        if self.awaiting_snapshot {
            self.awaiting_snapshot = false;
            if self.session.has_snapshot() {
                info!("Fresh snapshot after reconnect, replacing session");
                self.session = Session::new(self.session.sort_preference());
            }
        }

        if let Some(message) = payload.game_message.take().filter(|m| !m.is_empty()) {
            self.game_messages.push(message);
        }

        self.session.reconcile(payload);

        let mut effects = Vec::new();
        let connected = self.is_connected();
        let automation = turn::apply_automation(&mut self.session, connected);
        if let Some(command) = automation.command {
            effects.push(Effect::Send(command));
        }

        let session = &self.session;
        if let Some(kind) = turn_notification(
            session.previous_current_player_id(),
            session.current_player_id(),
            session.your_player_id(),
            self.notifications_unlocked,
        ) {
            effects.push(Effect::Notify(kind));
        }
        self.session.observe_turn();

        effects
    }

    // --- User actions ---

    /// Play the selected cards.
    pub fn play_cards(&mut self, cards: &[Card]) -> Vec<Effect> {
        let result = self
            .ensure_can_send()
            .and_then(|()| turn::request_play(&self.session, cards));
        self.finish(result.map(|command| vec![Effect::Send(command)]))
    }

    /// Pass the local turn.
    pub fn pass_turn(&mut self) -> Vec<Effect> {
        let result = self
            .ensure_can_send()
            .and_then(|()| turn::request_pass(&mut self.session));
        let effects = result.map(|outcome| self.pass_effects(outcome));
        self.finish(effects)
    }

    /// The pass control: passes on the local turn, otherwise toggles
    /// auto-pass without sending.
    pub fn toggle_auto_pass(&mut self) -> Vec<Effect> {
        let result = if self.session.is_your_turn() && !self.session.is_over() {
            self.ensure_can_send()
                .and_then(|()| turn::toggle_auto_pass(&mut self.session))
        } else {
            turn::toggle_auto_pass(&mut self.session)
        };
        let effects = result.map(|outcome| self.pass_effects(outcome));
        self.finish(effects)
    }

    fn pass_effects(&mut self, outcome: PassOutcome) -> Vec<Effect> {
        match outcome {
            PassOutcome::Send {
                command,
                auto_pass_cleared,
            } => {
                if auto_pass_cleared {
                    self.action_status = Some(ActionStatus::Info(AUTO_PASS_DISABLED.into()));
                }
                vec![Effect::Send(command)]
            }
            PassOutcome::Toggled(_) => Vec::new(),
        }
    }

    /// Send a chat line. Blank input is ignored.
    pub fn send_chat(&mut self, text: &str) -> Vec<Effect> {
        let content = text.trim();
        if content.is_empty() {
            return Vec::new();
        }
        let result = self.ensure_can_send().map(|()| {
            vec![Effect::Send(ClientCommand::Chat {
                content: content.to_string(),
            })]
        });
        self.finish(result)
    }

    /// Store a new alias and announce it when connected.
    pub fn set_alias(&mut self, alias: &str) -> Vec<Effect> {
        let alias = alias.trim();
        if alias.is_empty() {
            return self.finish(Err(ActionError::EmptyAlias));
        }
        info!("Alias set to {}", alias);
        self.alias = Some(alias.to_string());
        let mut effects = vec![Effect::PersistAlias(alias.to_string())];
        if self.is_connected() {
            effects.push(Effect::Send(ClientCommand::SetAlias {
                alias: alias.to_string(),
            }));
        }
        effects
    }

    /// Ask the server for a new game.
    pub fn new_game(&mut self) -> Vec<Effect> {
        if let Err(e) = self.ensure_can_send() {
            return self.finish(Err(e));
        }
        self.session.set_auto_pass(false);
        self.action_status = None;
        vec![Effect::Send(ClientCommand::NewGame)]
    }

    /// Change the hand order. Re-sorts immediately and persists.
    pub fn set_sort_preference(&mut self, preference: SortPreference) -> Vec<Effect> {
        self.session.set_sort_preference(preference);
        vec![Effect::PersistSortPreference(preference)]
    }

    pub fn toggle_sort_preference(&mut self) -> Vec<Effect> {
        let next = self.session.sort_preference().toggled();
        self.set_sort_preference(next)
    }

    fn ensure_can_send(&self) -> Result<(), ActionError> {
        if self.is_connected() && !self.awaiting_snapshot {
            Ok(())
        } else {
            Err(ActionError::NotConnected)
        }
    }

    /// Surface a rejection on the action channel.
    fn finish(&mut self, result: Result<Vec<Effect>, ActionError>) -> Vec<Effect> {
        match result {
            Ok(effects) => effects,
            Err(e) => {
                debug!("Action rejected: {}", e);
                self.action_status = Some(ActionStatus::Error(e.to_string()));
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit};

    const TABLE: &str = r#"[
        {"id":"p1","name":"Alice","cardCount":13,"hasPassed":false},
        {"id":"p2","name":"Bob","cardCount":13,"hasPassed":false}
    ]"#;

    fn snapshot(current: &str, pass_count: u32) -> String {
        format!(
            r#"{{"type":"gameState","yourPlayerId":"p1","currentPlayerId":"{current}",
                "passCount":{pass_count},"playersInfo":{TABLE},"isGameOver":false,
                "lastPlayedHand":{{"cards":[{{"rank":9,"suit":1}}],"playerId":"p2","handType":1,"rank":9}}}}"#
        )
    }

    fn connected() -> GameClient {
        let mut client = GameClient::new(ClientPrefs::default());
        client.on_connected();
        client.handle_raw(&snapshot("p2", 0));
        client
    }

    #[test]
    fn connect_announces_stored_alias() {
        let mut client = GameClient::new(ClientPrefs {
            alias: Some("Alice".into()),
            sort_preference: SortPreference::BySuit,
        });
        assert_eq!(
            client.on_connected(),
            vec![Effect::Send(ClientCommand::SetAlias {
                alias: "Alice".into()
            })]
        );
        assert_eq!(client.session().sort_preference(), SortPreference::BySuit);
    }

    #[test]
    fn malformed_payload_recorded_as_diagnostic_only() {
        let mut client = connected();
        assert!(client.handle_raw("not json").is_empty());
        assert!(client.handle_raw(r#"{"type":"bogus"}"#).is_empty());
        assert_eq!(client.diagnostics().len(), 2);
        assert!(client.error_log().is_empty());
    }

    #[test]
    fn validation_errors_use_the_action_slot() {
        let mut client = connected();
        client.handle_raw(r#"{"type":"error","content":"Invalid play","context":"validation"}"#);
        assert_eq!(
            client.action_status(),
            Some(&ActionStatus::Error("Invalid play".into()))
        );
        assert!(client.error_log().is_empty());

        client.handle_raw(r#"{"type":"system","content":"Bob joined"}"#);
        assert_eq!(client.action_status(), None);
        assert_eq!(client.system_log().len(), 1);
    }

    #[test]
    fn other_errors_go_to_the_error_log() {
        let mut client = connected();
        client.handle_raw(r#"{"type":"error","content":"Room full"}"#);
        assert_eq!(client.error_log().last().unwrap().text, "Room full");
        assert_eq!(client.action_status(), None);
    }

    #[test]
    fn chat_is_logged_with_sender() {
        let mut client = connected();
        client.handle_raw(r#"{"type":"chat","sender":"Bob","content":"hi"}"#);
        assert_eq!(client.chat_log().last().unwrap().text, "Bob: hi");
    }

    #[test]
    fn game_message_is_logged() {
        let mut client = connected();
        client.handle_raw(r#"{"type":"gameState","gameMessage":"Bob played a Pair"}"#);
        assert_eq!(
            client.game_message_log().last().unwrap().text,
            "Bob played a Pair"
        );
    }

    #[test]
    fn actions_rejected_while_disconnected() {
        let mut client = connected();
        client.on_disconnected();
        assert!(client.send_chat("hello").is_empty());
        assert_eq!(
            client.action_status(),
            Some(&ActionStatus::Error("Not connected to server.".into()))
        );
        assert!(client.new_game().is_empty());
        // The stale session is still there.
        assert_eq!(client.session().current_player_id(), Some("p2"));
    }

    #[test]
    fn reconnect_waits_for_fresh_snapshot() {
        let mut client = connected();
        client.on_disconnected();
        client.on_connected();
        assert!(client.send_chat("hello").is_empty());

        client.handle_raw(&snapshot("p1", 1));
        assert_eq!(
            client.send_chat("hello"),
            vec![Effect::Send(ClientCommand::Chat {
                content: "hello".into()
            })]
        );
    }

    #[test]
    fn blank_chat_is_ignored() {
        let mut client = connected();
        assert!(client.send_chat("   ").is_empty());
        assert_eq!(client.action_status(), None);
    }

    #[test]
    fn alias_is_trimmed_persisted_and_sent() {
        let mut client = connected();
        assert_eq!(
            client.set_alias("  Zed "),
            vec![
                Effect::PersistAlias("Zed".into()),
                Effect::Send(ClientCommand::SetAlias { alias: "Zed".into() }),
            ]
        );
        assert_eq!(client.alias(), Some("Zed"));

        assert!(client.set_alias("  ").is_empty());
        assert_eq!(
            client.action_status(),
            Some(&ActionStatus::Error("Alias cannot be empty.".into()))
        );
    }

    #[test]
    fn alias_set_offline_is_only_persisted() {
        let mut client = GameClient::new(ClientPrefs::default());
        assert_eq!(client.set_alias("Zed"), vec![Effect::PersistAlias("Zed".into())]);
    }

    #[test]
    fn play_sends_selected_cards() {
        let mut client = connected();
        client.handle_raw(&snapshot("p1", 1));
        let card = Card::new(Rank::Ten, Suit::Spades);
        assert_eq!(
            client.play_cards(&[card]),
            vec![Effect::Send(ClientCommand::PlayCards { cards: vec![card] })]
        );
    }

    #[test]
    fn play_off_turn_is_rejected_on_action_channel() {
        let mut client = connected();
        assert!(client
            .play_cards(&[Card::new(Rank::Ten, Suit::Spades)])
            .is_empty());
        assert_eq!(
            client.action_status(),
            Some(&ActionStatus::Error("Not your turn.".into()))
        );
    }

    #[test]
    fn explicit_pass_disarms_auto_pass_with_note() {
        let mut client = connected();
        assert!(client.toggle_auto_pass().is_empty());
        assert!(client.session().auto_pass_enabled());

        // Auto-pass fires on the next local turn mid-trick.
        let effects = client.handle_raw(&snapshot("p1", 1));
        assert_eq!(effects, vec![Effect::Send(ClientCommand::PassTurn)]);

        assert_eq!(client.pass_turn(), vec![Effect::Send(ClientCommand::PassTurn)]);
        assert!(!client.session().auto_pass_enabled());
        assert_eq!(
            client.action_status(),
            Some(&ActionStatus::Info(AUTO_PASS_DISABLED.into()))
        );
    }

    #[test]
    fn armed_auto_pass_holds_fire_while_disconnected() {
        let mut client = connected();
        client.toggle_auto_pass();
        client.on_disconnected();

        assert!(client.handle_raw(&snapshot("p1", 1)).is_empty());
        assert!(client.session().auto_pass_enabled());
        assert!(client.session().is_your_turn());
    }

    #[test]
    fn new_game_clears_auto_pass() {
        let mut client = connected();
        client.toggle_auto_pass();
        assert_eq!(client.new_game(), vec![Effect::Send(ClientCommand::NewGame)]);
        assert!(!client.session().auto_pass_enabled());
        assert_eq!(client.action_status(), None);
    }

    #[test]
    fn sort_change_is_persisted() {
        let mut client = connected();
        assert_eq!(
            client.toggle_sort_preference(),
            vec![Effect::PersistSortPreference(SortPreference::BySuit)]
        );
        assert_eq!(client.session().sort_preference(), SortPreference::BySuit);
    }

    #[test]
    fn title_reflects_turn() {
        let mut client = connected();
        assert_eq!(client.title(), "Alice - Big Two (R1)");
        client.handle_raw(&snapshot("p1", 1));
        assert_eq!(client.title(), "YOUR TURN! - Alice - Big Two (R1)");
    }

    #[test]
    fn score_table_lists_players() {
        let client = connected();
        let table = client.score_table();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].name, "Alice");
        assert_eq!(table.columns, vec!["R1", "Total"]);
    }
}
