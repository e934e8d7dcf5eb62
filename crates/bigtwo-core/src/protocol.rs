// Wire protocol: inbound server messages, outbound client commands, and the
// validator that sits between raw socket text and the session.
//
// Every inbound payload goes through `parse_server_message`. Anything that is
// not a JSON object with a recognized `type` and a body of the right shape is
// rejected with a `ProtocolError` before it can touch the session.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::card::{Card, HandKind};
use crate::error::ProtocolError;

/// The `type` literals the server may send.
pub const KNOWN_MESSAGE_TYPES: [&str; 5] = ["gameState", "chat", "error", "system", "actionSuccess"];

/// The `context` value that marks an error as a rejected action.
pub const VALIDATION_CONTEXT: &str = "validation";

/// Per-player score mapping, as sent in `scores` and `roundScoresHistory`.
pub type ScoreRecord = HashMap<String, i64>;

// ---------------------------------------------------------------------------
// Inbound payload types
// ---------------------------------------------------------------------------

/// Public information about one seat at the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub card_count: u32,
    #[serde(default)]
    pub has_passed: bool,
}

/// The most recent accepted play on the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedHand {
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(rename = "playerId", default)]
    pub owner_id: String,
    #[serde(rename = "handType", default)]
    pub hand_type_code: u8,
    #[serde(rename = "handTypeString", default)]
    pub hand_type_label: String,
    #[serde(default)]
    pub rank: u8,
}

impl PlayedHand {
    /// Display label, falling back to the hand-type code when the server
    /// omitted `handTypeString`.
    pub fn label(&self) -> &str {
        if !self.hand_type_label.is_empty() {
            return &self.hand_type_label;
        }
        HandKind::from_code(self.hand_type_code)
            .map(HandKind::label)
            .unwrap_or("Unknown")
    }
}

/// A `gameState` snapshot.
///
/// Every field is optional: a field the server omits must leave the
/// corresponding session value untouched. `last_played_hand` additionally
/// distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`), which clears the table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatePayload {
    #[serde(default)]
    pub hand: Option<Vec<Card>>,
    #[serde(default, deserialize_with = "present")]
    pub last_played_hand: Option<Option<PlayedHand>>,
    #[serde(default)]
    pub your_player_id: Option<String>,
    #[serde(default)]
    pub current_player_id: Option<String>,
    #[serde(default)]
    pub current_player_name: Option<String>,
    #[serde(default)]
    pub pass_count: Option<u32>,
    #[serde(default)]
    pub players_info: Option<Vec<PlayerInfo>>,
    #[serde(default)]
    pub is_game_over: Option<bool>,
    #[serde(default)]
    pub scores: Option<ScoreRecord>,
    #[serde(default)]
    pub round_number: Option<u32>,
    #[serde(default)]
    pub target_score: Option<i64>,
    #[serde(default)]
    pub is_match_over: Option<bool>,
    #[serde(default)]
    pub overall_winner_id: Option<String>,
    #[serde(default)]
    pub round_scores_history: Option<Vec<ScoreRecord>>,
    #[serde(default)]
    pub winner_id: Option<String>,
    #[serde(default)]
    pub game_message: Option<String>,
}

/// Wraps any value that is present in the payload (including `null`) in
/// `Some`, so that `#[serde(default)]` alone yields `None` for absence.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A validated inbound message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    GameState(Box<GameStatePayload>),
    Chat {
        #[serde(default)]
        sender: String,
        content: String,
    },
    Error {
        content: String,
        #[serde(default)]
        context: Option<String>,
    },
    System {
        content: String,
    },
    ActionSuccess {
        #[serde(default)]
        content: Option<String>,
    },
}

/// The closed set of inbound message kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    GameState,
    Chat,
    Error,
    System,
    ActionSuccess,
}

impl ServerMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            ServerMessage::GameState(_) => MessageKind::GameState,
            ServerMessage::Chat { .. } => MessageKind::Chat,
            ServerMessage::Error { .. } => MessageKind::Error,
            ServerMessage::System { .. } => MessageKind::System,
            ServerMessage::ActionSuccess { .. } => MessageKind::ActionSuccess,
        }
    }
}

/// Classify raw socket text into a [`ServerMessage`] or reject it.
pub fn parse_server_message(raw: &str) -> Result<ServerMessage, ProtocolError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(ProtocolError::NotJson)?;

    let object = value.as_object().ok_or(ProtocolError::NotObject)?;
    let kind = object
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or(ProtocolError::MissingType)?;
    if !KNOWN_MESSAGE_TYPES.contains(&kind) {
        return Err(ProtocolError::UnknownType(kind.to_string()));
    }
    let kind = kind.to_string();

    serde_json::from_value(value).map_err(|source| ProtocolError::BadShape { kind, source })
}

// ---------------------------------------------------------------------------
// Outbound commands
// ---------------------------------------------------------------------------

/// A command sent to the server. Serialized with a `type` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientCommand {
    PlayCards { cards: Vec<Card> },
    PassTurn,
    Chat { content: String },
    SetAlias { alias: String },
    NewGame,
}

impl ClientCommand {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
