// Big Two terminal client entry point.
//
// Startup sequence:
// 1. Load config (first CLI argument overrides the server URL)
// 2. Initialize tracing (log to file, not terminal)
// 3. Open the preferences store
// 4. Create mpsc channels
// 5. Spawn WebSocket client task
// 6. Spawn app logic task
// 7. Run the TUI until the user quits
// 8. Cleanup on exit

use bigtwo_tui::app;
use bigtwo_tui::config;
use bigtwo_tui::prefs::PrefsStore;
use bigtwo_tui::tui;
use bigtwo_tui::ws_client;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Config comes first: it names the log directory.
    let url_override = std::env::args().nth(1);
    let config = config::load_config(url_override).context("failed to load configuration")?;

    // 2. Tracing
    init_tracing(&config.logging.dir)?;
    info!("Big Two client starting up, server {}", config.server.url);

    // 3. Preferences
    let prefs_path = config.prefs_path();
    let prefs = PrefsStore::open_or_default(&prefs_path);
    info!("Preferences at {}", prefs_path.display());

    // 4. Channels
    let (ws_tx, ws_rx) = mpsc::channel(256);
    let (out_tx, out_rx) = mpsc::channel(64);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let app_state = app::AppState::new(prefs, config.client.default_sort, out_tx);

    // 5. WebSocket client task
    let url = config.server.url.clone();
    let ws_handle = tokio::spawn(async move {
        if let Err(e) = ws_client::run(url, ws_tx, out_rx).await {
            error!("WebSocket client error: {}", e);
        }
    });

    // 6. App logic task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(ws_rx, cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 7. TUI event loop (blocks until the user quits)
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    // 8. Cleanup: let the app task finish, then drop the connection.
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;
    ws_handle.abort();

    info!("Big Two client shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing(dir: &str) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join(dir);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("bigtwo.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bigtwo_tui=info,bigtwo_core=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
