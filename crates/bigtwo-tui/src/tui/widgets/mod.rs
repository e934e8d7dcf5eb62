// TUI widget modules for each dashboard panel.

pub mod hand;
pub mod help_bar;
pub mod messages;
pub mod players;
pub mod scores;
pub mod status_bar;
pub mod table;
