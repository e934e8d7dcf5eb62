// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding the latest `ViewSnapshot` from the app
// orchestrator plus purely local state (cursor, selection, text input). The
// orchestrator pushes `UiUpdate` messages over an mpsc channel; the TUI
// applies them and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::io::Write;
use std::time::Duration;

use bigtwo_core::card::Card;
use bigtwo_core::notify::NotificationKind;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::protocol::{UiUpdate, UserCommand, ViewSnapshot};

use layout::build_layout;

// ---------------------------------------------------------------------------
// Local view types
// ---------------------------------------------------------------------------

/// What the bottom line is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Chat,
    Alias,
}

/// Which log the messages panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageTab {
    #[default]
    Chat,
    Game,
    System,
    Errors,
}

impl MessageTab {
    pub const ALL: [MessageTab; 4] = [
        MessageTab::Chat,
        MessageTab::Game,
        MessageTab::System,
        MessageTab::Errors,
    ];

    pub fn next(self) -> Self {
        match self {
            MessageTab::Chat => MessageTab::Game,
            MessageTab::Game => MessageTab::System,
            MessageTab::System => MessageTab::Errors,
            MessageTab::Errors => MessageTab::Chat,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MessageTab::Chat => "Chat",
            MessageTab::Game => "Game",
            MessageTab::System => "System",
            MessageTab::Errors => "Errors",
        }
    }
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state for rendering.
#[derive(Debug, Default)]
pub struct ViewState {
    /// Latest game snapshot; `None` until the orchestrator sends one.
    pub game: Option<ViewSnapshot>,
    /// Index into the hand of the highlighted card.
    pub cursor: usize,
    /// Cards marked for the next play. Kept by identity so re-sorting does
    /// not change the selection.
    pub selected: Vec<Card>,
    pub input_mode: InputMode,
    pub input_text: String,
    pub message_tab: MessageTab,
    /// Last turn notification, shown in the status bar until the next key.
    pub flash: Option<NotificationKind>,
    /// Whether the unlock command has gone out.
    pub notifications_unlocked: bool,
}

impl ViewState {
    pub fn hand(&self) -> &[Card] {
        self.game.as_ref().map(|g| g.hand.as_slice()).unwrap_or(&[])
    }

    pub fn is_selected(&self, card: &Card) -> bool {
        self.selected.contains(card)
    }

    /// Selected cards in hand order.
    pub fn selection_in_hand_order(&self) -> Vec<Card> {
        self.hand()
            .iter()
            .filter(|c| self.selected.contains(c))
            .copied()
            .collect()
    }

    /// Replace the game snapshot, keeping only selections still in hand.
    pub fn apply_snapshot(&mut self, snapshot: ViewSnapshot) {
        self.selected.retain(|c| snapshot.hand.contains(c));
        let len = snapshot.hand.len();
        self.cursor = if len == 0 { 0 } else { self.cursor.min(len - 1) };
        self.game = Some(snapshot);
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState. Returns true when the terminal
/// bell should ring.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) -> bool {
    match update {
        UiUpdate::Snapshot(snapshot) => {
            state.apply_snapshot(*snapshot);
            false
        }
        UiUpdate::Notify(kind) => {
            state.flash = Some(kind);
            true
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::table::render(frame, layout.table, state);
    widgets::hand::render(frame, layout.hand, state);
    widgets::messages::render(frame, layout.messages, state);
    widgets::players::render(frame, layout.players, state);
    widgets::scores::render(frame, layout.scores, state);
    widgets::help_bar::render_action_line(frame, layout.action_line, state);
    widgets::help_bar::render(frame, layout.help_bar, state);
}

fn ring_bell() {
    let mut out = std::io::stdout();
    if let Err(e) = out.write_all(b"\x07").and_then(|()| out.flush()) {
        warn!("Failed to ring terminal bell: {}", e);
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => {
                        if apply_ui_update(&mut view_state, ui_update) {
                            ring_bell();
                        }
                    }
                    None => break,
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if key_event.kind != KeyEventKind::Press {
                            continue;
                        }
                        // Any key is a user gesture: notifications may start.
                        if !view_state.notifications_unlocked {
                            view_state.notifications_unlocked = true;
                            let _ = cmd_tx.send(UserCommand::UnlockNotifications).await;
                        }
                        view_state.flash = None;
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            debug!("User command: {:?}", cmd);
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("Terminal input error: {}", e);
                        break;
                    }
                    None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
