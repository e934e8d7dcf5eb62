// Library root: re-exports all modules so integration tests and the binary
// can access the crate's public API.

pub mod app;
pub mod config;
pub mod prefs;
pub mod protocol;
pub mod tui;
pub mod ws_client;
