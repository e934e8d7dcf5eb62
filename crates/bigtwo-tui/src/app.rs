// Application orchestration.
//
// The central event loop that feeds WebSocket events and user commands
// through the `GameClient`, carries out the effects it returns, and pushes a
// fresh view snapshot to the TUI after every change.

use bigtwo_core::client::{Effect, GameClient};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::prefs::PrefsStore;
use crate::protocol::{UiUpdate, UserCommand, ViewSnapshot};
use crate::ws_client::WsEvent;

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub client: GameClient,
    pub prefs: PrefsStore,
    /// JSON frames for the socket writer.
    outbound: mpsc::Sender<String>,
}

impl AppState {
    /// Build the state; the client starts from the stored preferences.
    pub fn new(
        prefs: PrefsStore,
        default_sort: bigtwo_core::sort::SortPreference,
        outbound: mpsc::Sender<String>,
    ) -> Self {
        let client = GameClient::new(prefs.prefs().to_client_prefs(default_sort));
        AppState {
            client,
            prefs,
            outbound,
        }
    }

    pub fn build_snapshot(&self) -> ViewSnapshot {
        ViewSnapshot::from_client(&self.client)
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens on two channels using `tokio::select!`:
/// 1. WebSocket events from the server connection
/// 2. User commands from the TUI
///
/// The loop keeps running after the connection ends so the last known game
/// stays on screen; it exits on `Quit` or when the TUI goes away.
pub async fn run(
    mut ws_rx: mpsc::Receiver<WsEvent>,
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    // Replace the ws recv with a disabled branch once the connection task is
    // gone so select! does not spin on a closed channel.
    let mut ws_open = true;

    push_snapshot(&state, &ui_tx).await;

    loop {
        tokio::select! {
            ws_event = ws_rx.recv(), if ws_open => {
                match ws_event {
                    Some(event) => handle_ws_event(&mut state, event, &ui_tx).await,
                    None => {
                        info!("WebSocket channel closed");
                        ws_open = false;
                    }
                }
            }

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => handle_user_command(&mut state, cmd, &ui_tx).await,
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }
        }
    }

    info!("Application event loop exiting");
    Ok(())
}

/// Handle one event from the connection task.
async fn handle_ws_event(state: &mut AppState, event: WsEvent, ui_tx: &mpsc::Sender<UiUpdate>) {
    let effects = match event {
        WsEvent::Connected { url } => {
            info!("Connected to game server at {}", url);
            state.client.on_connected()
        }
        WsEvent::Disconnected => {
            state.client.on_disconnected();
            Vec::new()
        }
        WsEvent::Message(raw) => {
            debug!("Inbound: {}", raw);
            state.client.handle_raw(&raw)
        }
    };
    execute_effects(state, effects, ui_tx).await;
    push_snapshot(state, ui_tx).await;
}

/// Handle a user command from the TUI.
async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    let effects = match cmd {
        UserCommand::PlayCards(cards) => state.client.play_cards(&cards),
        UserCommand::Pass => state.client.toggle_auto_pass(),
        UserCommand::SendChat(text) => state.client.send_chat(&text),
        UserCommand::SetAlias(alias) => state.client.set_alias(&alias),
        UserCommand::NewGame => state.client.new_game(),
        UserCommand::ToggleSort => state.client.toggle_sort_preference(),
        UserCommand::UnlockNotifications => {
            state.client.unlock_notifications();
            Vec::new()
        }
        UserCommand::Quit => {
            // Handled in the main loop
            Vec::new()
        }
    };
    execute_effects(state, effects, ui_tx).await;
    push_snapshot(state, ui_tx).await;
}

/// Carry out the side effects requested by the client, in order.
async fn execute_effects(
    state: &mut AppState,
    effects: Vec<Effect>,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    for effect in effects {
        match effect {
            Effect::Send(command) => match command.to_json() {
                Ok(json) => {
                    debug!("Outbound: {}", json);
                    if state.outbound.send(json).await.is_err() {
                        warn!("Connection writer gone, dropping {:?}", command);
                    }
                }
                Err(e) => warn!("Failed to serialize {:?}: {}", command, e),
            },
            Effect::Notify(kind) => {
                let _ = ui_tx.send(UiUpdate::Notify(kind)).await;
            }
            Effect::PersistSortPreference(sort) => {
                if let Err(e) = state.prefs.set_sort(sort) {
                    warn!("Failed to persist sort preference: {}", e);
                }
            }
            Effect::PersistAlias(alias) => {
                if let Err(e) = state.prefs.set_alias(&alias) {
                    warn!("Failed to persist alias: {}", e);
                }
            }
        }
    }
}

async fn push_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let snapshot = state.build_snapshot();
    let _ = ui_tx.send(UiUpdate::Snapshot(Box::new(snapshot))).await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
