//! WebSocket connection handlers.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{
        ConnectInfo, State,
        ws::{Message, WebSocket, WebSocketUpgrade, rejection::WebSocketUpgradeRejection},
    },
    response::{IntoResponse, Response},
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use super::static_files::{Asset, serve_asset};
use crate::{
    domain::{Connection, ConnectionIdFactory, Timestamp},
    ui::state::AppState,
    usecase::{ConnectClientUseCase, DisconnectClientUseCase, SendMessageUseCase},
};

/// `GET /`: upgrade to WebSocket, or serve the client page for plain requests.
pub async fn root_handler(
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match ws {
        Ok(ws) => ws
            .on_upgrade(move |socket| handle_socket(socket, state, remote_addr))
            .into_response(),
        Err(_) => serve_asset(&state.public_dir, Asset::Index).await,
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, remote_addr: SocketAddr) {
    let connection = Connection::new(
        ConnectionIdFactory::generate(),
        remote_addr,
        Timestamp::now(),
    );
    let connection_id = connection.id;
    let (mut sender, mut receiver) = socket.split();

    // Create a channel for this client to receive envelopes
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    // Register, welcome, announce join
    let connect_usecase = ConnectClientUseCase::new(state.registry.clone());
    match connect_usecase.execute(connection, tx).await {
        Ok(outcome) => {
            tracing::info!(
                connection_id = %connection_id,
                remote_addr = %remote_addr,
                total_clients = outcome.total_clients,
                "New client connected"
            );
        }
        Err(e) => {
            tracing::warn!(
                connection_id = %connection_id,
                remote_addr = %remote_addr,
                "Rejecting connection: {}",
                e
            );
            return;
        }
    }

    // Spawn a task to forward queued envelopes to this client
    let mut send_task = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if sender.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    // Spawn a task to receive messages from this client
    let registry = state.registry.clone();
    let mut recv_task = tokio::spawn(async move {
        let send_usecase = SendMessageUseCase::new(registry);

        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!(connection_id = %connection_id, "WebSocket error: {}", e);
                    break;
                }
            };

            let result = match msg {
                Message::Text(text) => {
                    tracing::debug!(connection_id = %connection_id, "Received: {}", text.as_str());
                    send_usecase
                        .execute_text(&connection_id, text.as_str())
                        .await
                }
                Message::Binary(bytes) => {
                    tracing::debug!(
                        connection_id = %connection_id,
                        "Received {} binary bytes",
                        bytes.len()
                    );
                    send_usecase.execute_binary(&connection_id, &bytes).await
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                Message::Ping(_) | Message::Pong(_) => continue,
                Message::Close(_) => {
                    tracing::debug!(connection_id = %connection_id, "Client requested close");
                    break;
                }
            };

            match result {
                Ok(report) => tracing::debug!(
                    connection_id = %connection_id,
                    delivered = report.delivered,
                    failed = report.failed,
                    "Relayed message"
                ),
                Err(e) => tracing::warn!(connection_id = %connection_id, "Message not relayed: {}", e),
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Remove and announce departure
    let disconnect_usecase = DisconnectClientUseCase::new(state.registry.clone());
    match disconnect_usecase.execute(&connection_id).await {
        Ok(Some(report)) => {
            let remaining = disconnect_usecase.count_remaining_clients().await;
            tracing::info!(
                connection_id = %connection_id,
                remote_addr = %remote_addr,
                total_clients = remaining,
                notified = report.delivered,
                "Client disconnected"
            );
        }
        Ok(None) => {
            tracing::debug!(connection_id = %connection_id, "Client was already removed");
        }
        Err(e) => {
            tracing::warn!(
                connection_id = %connection_id,
                "Failed to announce departure: {}",
                e
            );
        }
    }
}
