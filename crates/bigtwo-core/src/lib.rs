//! Big Two client core: wire protocol, session reconciliation, turn
//! automation, hand ordering, score history and turn notifications.
//!
//! Nothing here performs I/O. [`client::GameClient`] consumes raw server
//! payloads and user actions and returns [`client::Effect`]s for the runtime
//! to execute.

pub mod card;
pub mod client;
pub mod error;
pub mod messages;
pub mod notify;
pub mod protocol;
pub mod scores;
pub mod session;
pub mod sort;
pub mod turn;
