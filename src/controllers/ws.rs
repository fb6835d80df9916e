//! Push WebSocket upgrade (spec §4.B, §6 "Push socket"). The ticket is
//! consumed (`get+delete`) before the handler runs; an invalid or
//! already-used ticket still completes the WS handshake (a 401 can't be sent
//! after the upgrade), then the socket is immediately closed with 1008
//! policy violation.

use axum::{
	Extension,
	extract::{
		Query,
		ws::{Message, WebSocket, WebSocketUpgrade},
	},
	response::Response,
	routing::get,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{info, warn};

use crate::controllers::AxumRouter;
use crate::global::PUSH_IDLE_TIMEOUT_SECONDS;
use crate::push::{CloseSource, PushChannel, assert_close_code_consistency};
use crate::state::AppState;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Deserialize)]
pub struct TicketQuery {
	pub ticket: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum ClientMessage {
	Subscribe { request_id: String },
}

pub async fn ws_upgrade(
	ws: WebSocketUpgrade,
	Query(query): Query<TicketQuery>,
	Extension(state): Extension<Arc<AppState>>,
) -> Response {
	let Some(payload) = state.tickets.consume(&query.ticket) else {
		warn!("push socket upgrade rejected: invalid or expired ticket");
		return ws.on_upgrade(|mut socket| async move {
			close(&mut socket, CloseSource::Policy).await;
		});
	};

	ws.on_upgrade(move |socket| handle_socket(socket, state.push.clone(), payload.session_id))
}

async fn handle_socket(mut socket: WebSocket, push: Arc<PushChannel>, session_id: String) {
	let connection_id = NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed);
	let mut receiver = push.register(connection_id);
	info!(connection_id, %session_id, "push socket connected");

	loop {
		tokio::select! {
			incoming = socket.recv() => {
				match incoming {
					Some(Ok(Message::Text(text))) => {
						if let Ok(ClientMessage::Subscribe { request_id }) = serde_json::from_str::<ClientMessage>(&text) {
							push.subscribe(connection_id, ("assistant".to_string(), request_id.clone(), session_id.clone()));
							push.subscribe(connection_id, ("search".to_string(), request_id, session_id.clone()));
						}
					}
					Some(Ok(Message::Close(_))) | None => {
						close(&mut socket, CloseSource::ClientClose).await;
						break;
					}
					Some(Err(_)) => {
						close(&mut socket, CloseSource::Error).await;
						break;
					}
					_ => {}
				}
			}
			event = receiver.recv() => {
				match event {
					Some(event) => {
						let body = serde_json::to_string(&event).unwrap_or_else(|_| json!({}).to_string());
						if socket.send(Message::Text(body.into())).await.is_err() {
							break;
						}
					}
					None => break,
				}
			}
			_ = tokio::time::sleep(Duration::from_secs(PUSH_IDLE_TIMEOUT_SECONDS)) => {
				close(&mut socket, CloseSource::IdleTimeout).await;
				break;
			}
		}
	}

	push.unsubscribe_all(connection_id);
}

async fn close(socket: &mut WebSocket, source: CloseSource) {
	let code = source.code();
	assert_close_code_consistency(code, source);
	let frame = axum::extract::ws::CloseFrame {
		code,
		reason: source.reason().into(),
	};
	let _ = socket.send(Message::Close(Some(frame))).await;
}

pub fn ws_routes() -> AxumRouter {
	AxumRouter::new().route("/ws", get(ws_upgrade))
}
