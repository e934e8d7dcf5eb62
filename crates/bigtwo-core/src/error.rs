// Error types for the client core.

use thiserror::Error;

/// Why an inbound payload was rejected by the validator.
///
/// These are diagnostics, not game errors: they never reach the session and
/// are never shown in the game error log.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("payload is not valid JSON: {0}")]
    NotJson(#[source] serde_json::Error),

    #[error("payload is not a JSON object")]
    NotObject,

    #[error("payload has no string `type` field")]
    MissingType,

    #[error("unknown message type `{0}`")]
    UnknownType(String),

    #[error("`{kind}` message has an invalid shape: {source}")]
    BadShape {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A user action rejected before it reached the transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("The game/match is over.")]
    GameOver,

    #[error("Not your turn.")]
    NotYourTurn,

    #[error("No cards selected.")]
    NoCardsSelected,

    #[error("Not connected to server.")]
    NotConnected,

    #[error("Alias cannot be empty.")]
    EmptyAlias,
}
