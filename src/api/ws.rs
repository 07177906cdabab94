//! WebSocket streaming of the ranked opportunity set.
//!
//! On connect the session immediately forwards the latest published set
//! (queued by the Distributor at subscribe time), then a full set every
//! detection cycle. A `{"type":"subscribe","pair":...}` control message is
//! acknowledged with `{"type":"subscribed","pair":...}` and scopes
//! subsequent pushes to that pair. Pair filtering is a session concern —
//! the Distributor itself always fans out the full set.
//!
//! There is no backlog: a reconnecting observer only ever gets latest
//! state.

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

use super::AppState;
use crate::types::{RankedSet, StreamCommand, StreamEvent};

/// GET /ws
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let (subscription, mut rx) = state.distributor.subscribe().await;
    let mut pair_filter: Option<String> = None;

    loop {
        tokio::select! {
            // Push ranked sets to the observer
            set = rx.recv() => {
                let Some(set) = set else {
                    // Dropped by the distributor (stalled) — close out.
                    break;
                };
                let event = StreamEvent::Opportunities {
                    data: scoped(&set, pair_filter.as_deref()),
                };
                let msg = match serde_json::to_string(&event) {
                    Ok(msg) => msg,
                    Err(e) => {
                        warn!(error = %e, "Failed to serialize stream event");
                        continue;
                    }
                };
                if socket.send(Message::Text(msg)).await.is_err() {
                    break;
                }
            }
            // Handle control messages from the observer
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<StreamCommand>(&text) {
                            Ok(StreamCommand::Subscribe { pair }) => {
                                let ack = StreamEvent::Subscribed { pair: pair.clone() };
                                pair_filter = Some(pair);
                                if let Ok(msg) = serde_json::to_string(&ack) {
                                    if socket.send(Message::Text(msg)).await.is_err() {
                                        break;
                                    }
                                }
                            }
                            Err(e) => {
                                debug!(error = %e, "Ignoring unrecognized control message");
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {} // ping/pong/binary — ignore
                }
            }
        }
    }

    // Releases the subscription's resources immediately.
    state.distributor.unsubscribe(subscription.id).await;
    debug!(observer = %subscription.id, "Stream session closed");
}

/// Apply the session's pair filter to a set snapshot.
fn scoped(set: &Arc<RankedSet>, pair_filter: Option<&str>) -> RankedSet {
    match pair_filter {
        None => (**set).clone(),
        Some(pair) => RankedSet {
            opportunities: set
                .opportunities
                .iter()
                .filter(|o| o.pair == pair)
                .cloned()
                .collect(),
            generated_at: set.generated_at,
        },
    }
}
