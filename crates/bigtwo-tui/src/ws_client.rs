// WebSocket client connection to the game server.

use futures_util::stream::Stream;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{info, warn};

/// Events emitted by the WebSocket client to the application layer.
#[derive(Debug, PartialEq)]
pub enum WsEvent {
    /// The connection to the server is open.
    Connected { url: String },
    /// The connection closed or could not be opened.
    Disconnected,
    /// A text message was received from the server (raw JSON string).
    Message(String),
}

/// Connect to `url`, forward inbound events through `tx`, and write every
/// string received on `outbound` as a text frame.
///
/// Runs until the server closes the connection, the socket errors, or either
/// channel closes. There is no reconnect: a `Disconnected` event is always the
/// last thing sent.
pub async fn run(
    url: String,
    tx: mpsc::Sender<WsEvent>,
    mut outbound: mpsc::Receiver<String>,
) -> anyhow::Result<()> {
    info!("Connecting to {url}");
    let ws_stream = match tokio_tungstenite::connect_async(url.as_str()).await {
        Ok((ws, _response)) => ws,
        Err(e) => {
            warn!("WebSocket connect to {url} failed: {e}");
            let _ = tx.send(WsEvent::Disconnected).await;
            return Err(e.into());
        }
    };

    if tx.send(WsEvent::Connected { url: url.clone() }).await.is_err() {
        return Ok(());
    }
    info!("Connected to {url}");

    let (mut write, read) = ws_stream.split();

    let writer = async {
        while let Some(text) = outbound.recv().await {
            if let Err(e) = write.send(Message::Text(text.into())).await {
                warn!("WebSocket write failed: {e}");
                break;
            }
        }
        let _ = write.close().await;
    };

    tokio::select! {
        _ = process_message_stream(read, &tx, &url) => {}
        _ = writer => {
            info!("Outbound channel closed, dropping connection");
        }
    }

    let _ = tx.send(WsEvent::Disconnected).await;
    Ok(())
}

/// Process raw WebSocket [`Message`] items from any [`Stream`], forwarding
/// text payloads through `tx`. Returns `Err(())` if the channel is closed
/// (receiver dropped), signalling the caller to stop.
///
/// Generic over the stream so it can be tested without opening sockets.
pub async fn process_message_stream<St>(
    mut stream: St,
    tx: &mpsc::Sender<WsEvent>,
    peer: &str,
) -> Result<(), ()>
where
    St: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    while let Some(msg_result) = stream.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                if tx.send(WsEvent::Message(text.to_string())).await.is_err() {
                    return Err(());
                }
            }
            Ok(Message::Close(_)) => {
                info!("Server {peer} sent close frame");
                break;
            }
            Err(e) => {
                warn!("WebSocket error from {peer}: {e}");
                break;
            }
            _ => {
                // Binary, Ping, Pong and raw frames carry nothing for us.
            }
        }
    }
    Ok(())
}
