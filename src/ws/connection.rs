//! WebSocket connection loop.
//!
//! Opens a [`Session`], then multiplexes two directions until either side
//! ends: inbound text frames go to the session, outbound frames from the
//! observer's channel go to the socket. However the loop exits, the session
//! is closed exactly once.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use crate::notify::{NotificationHub, Session};

/// Runs the read/write loop for a single WebSocket connection.
pub async fn run_connection(socket: WebSocket, hub: NotificationHub) {
    let (session, mut outbound) = Session::open(&hub).await;
    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let _ = session.handle_text(text.as_str()).await;
                    }
                    Some(Ok(Message::Binary(_))) => {
                        tracing::warn!(observer_id = %session.id(), "ignoring binary frame");
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(observer_id = %session.id(), %err, "ws read failed");
                        break;
                    }
                    // Ping/pong are answered by axum.
                    Some(Ok(_)) => {}
                }
            }
            // Frame from the dispatcher
            frame = outbound.recv() => {
                let Some(frame) = frame else {
                    tracing::debug!(observer_id = %session.id(), "outbound channel closed, dropping connection");
                    break;
                };
                if let Err(err) = ws_tx.send(Message::text(frame.to_string())).await {
                    tracing::debug!(observer_id = %session.id(), %err, "ws write failed");
                    break;
                }
            }
        }
    }

    session.close().await;
    let _ = ws_tx.close().await;
}
