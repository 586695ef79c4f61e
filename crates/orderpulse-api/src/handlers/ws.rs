//! WebSocket upgrade handler.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use orderpulse_realtime::Session;

use crate::dto::request::WsQuery;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /ws?token={jwt}
///
/// The credential is verified before the upgrade; a refused handshake is
/// answered with 401 and never joins a topic.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
) -> Result<Response, ApiError> {
    let session = state
        .realtime
        .connect(query.token.as_deref())
        .await
        .inspect_err(|e| {
            if e.is_auth_failure() {
                debug!(error = %e, "WebSocket handshake refused");
            } else {
                warn!(error = %e, "WebSocket handshake failed");
            }
        })?;

    let realtime = Arc::clone(&state.realtime);
    let session_id = session.handle.id;
    Ok(ws
        .max_message_size(state.config.realtime.max_inbound_message_bytes)
        .on_failed_upgrade(move |e| {
            warn!(session_id = %session_id, error = %e, "WebSocket upgrade failed");
            realtime.disconnect(&session_id);
        })
        .on_upgrade(move |socket| run_session(state, session, socket)))
}

/// Drives an established WebSocket until either side closes.
async fn run_session(state: AppState, session: Session, socket: WebSocket) {
    let Session {
        handle,
        mut receiver,
    } = session;
    let session_id = handle.id;
    let user_id = handle.user_id;
    let (mut ws_tx, mut ws_rx) = socket.split();

    info!(session_id = %session_id, user_id = %user_id, "WebSocket connection established");

    let writer_handle = Arc::clone(&handle);
    let mut outbound = tokio::spawn(async move {
        loop {
            tokio::select! {
                frame = receiver.recv() => match frame {
                    Some(text) => {
                        if ws_tx.send(Message::Text(text.into())).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                },
                () = writer_handle.closed() => break,
            }
        }
        let _ = ws_tx.send(Message::Close(None)).await;
    });

    loop {
        tokio::select! {
            inbound = ws_rx.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    state.realtime.handle_inbound(&session_id, text.as_str());
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!(session_id = %session_id, error = %e, "WebSocket read error");
                    break;
                }
            },
            _ = &mut outbound => break,
        }
    }

    state.realtime.disconnect(&session_id);
    outbound.abort();

    info!(session_id = %session_id, user_id = %user_id, "WebSocket connection closed");
}
