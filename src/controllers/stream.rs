//! Assistant SSE stream (spec §6 "SSE event shape"). Emits `meta` first, then
//! forwards assistant-channel messages, and ends with `done` once the search
//! channel reports `ready` — never emitting `error` after a client disconnect.

use axum::{
	Extension,
	extract::Path,
	response::sse::{Event, KeepAlive, Sse},
	routing::get,
};
use futures::stream::{self, Stream};
use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::UnboundedReceiver;
use utoipa::OpenApi;

use crate::controllers::AxumRouter;
use crate::http_models::push::PushEvent;
use crate::http_models::sse::{SseMessage, SseMeta};
use crate::middleware::{AuthSession, auth_session_middleware};
use crate::push::PushChannel;
use crate::state::AppState;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

#[derive(OpenApi)]
#[openapi(paths(get_stream_assistant), tags((name = "Stream")))]
pub struct StreamApiDoc;

/// `GET /api/v1/stream/assistant/:requestId` (spec §6).
#[utoipa::path(
	get,
	path = "/stream/assistant/{requestId}",
	summary = "Stream assistant narration for an in-flight search",
	params(("requestId" = String, Path, description = "The search request id")),
	responses((status = 200, description = "text/event-stream of meta/message/done frames")),
	security(("bearer" = [])),
	tag = "Stream"
)]
pub async fn get_stream_assistant(
	Extension(state): Extension<Arc<AppState>>,
	Extension(session): Extension<AuthSession>,
	Path(request_id): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
	let connection_id = NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed);
	let receiver = state.push.register(connection_id);
	state.push.subscribe(connection_id, ("assistant".to_string(), request_id.clone(), session.session_id.clone()));
	state.push.subscribe(connection_id, ("search".to_string(), request_id.clone(), session.session_id.clone()));

	let push = state.push.clone();
	let body = stream::unfold(SseState::AwaitingFirstEvent { receiver, request_id }, move |state| {
		let push = push.clone();
		async move { advance(state, connection_id, &push).await }
	});

	Sse::new(body).keep_alive(KeepAlive::default())
}

/// Threaded accumulator for the SSE state machine. `meta` cannot be emitted
/// until the first real event arrives (its `assistantLanguage` comes from
/// that event), so the first received event is buffered for the next poll
/// rather than dropped.
enum SseState {
	AwaitingFirstEvent { receiver: UnboundedReceiver<PushEvent>, request_id: String },
	Buffered { receiver: UnboundedReceiver<PushEvent>, event: PushEvent },
	Streaming { receiver: UnboundedReceiver<PushEvent> },
	Finished,
}

async fn advance(state: SseState, connection_id: u64, push: &PushChannel) -> Option<(Result<Event, Infallible>, SseState)> {
	match state {
		SseState::AwaitingFirstEvent { mut receiver, request_id } => match receiver.recv().await {
			Some(event) => {
				let assistant_language = assistant_language_of(&event).unwrap_or_else(|| "und".to_string());
				let meta = Event::default()
					.event("meta")
					.json_data(SseMeta { request_id, assistant_language })
					.unwrap_or_else(|_| Event::default().event("meta").data("{}"));
				Some((Ok(meta), SseState::Buffered { receiver, event }))
			}
			None => {
				push.unsubscribe_all(connection_id);
				None
			}
		},
		SseState::Buffered { receiver, event } => Some(emit(event, receiver, connection_id, push)),
		SseState::Streaming { mut receiver } => match receiver.recv().await {
			Some(event) => Some(emit(event, receiver, connection_id, push)),
			None => {
				push.unsubscribe_all(connection_id);
				None
			}
		},
		SseState::Finished => None,
	}
}

fn assistant_language_of(event: &PushEvent) -> Option<String> {
	match event {
		PushEvent::Assistant { assistant_language, .. } | PushEvent::Error { assistant_language, .. } => Some(assistant_language.clone()),
		_ => None,
	}
}

fn emit(event: PushEvent, receiver: UnboundedReceiver<PushEvent>, connection_id: u64, push: &PushChannel) -> (Result<Event, Infallible>, SseState) {
	match event {
		PushEvent::Assistant { kind, message, question, blocks_search, .. } => {
			let sse_message = Event::default()
				.event("message")
				.json_data(SseMessage { kind, message, question, blocks_search })
				.unwrap_or_else(|_| Event::default().event("message").data("{}"));
			(Ok(sse_message), SseState::Streaming { receiver })
		}
		PushEvent::Ready { .. } => {
			push.unsubscribe_all(connection_id);
			(Ok(Event::default().event("done").data("{}")), SseState::Finished)
		}
		PushEvent::Error { message, .. } => (Ok(Event::default().event("error").data(message)), SseState::Streaming { receiver }),
		PushEvent::ResultPatch { .. } => (Ok(Event::default().event("ping").data("")), SseState::Streaming { receiver }),
	}
}

pub fn stream_routes() -> AxumRouter {
	AxumRouter::new()
		.route("/stream/assistant/{requestId}", get(get_stream_assistant))
		.route_layer(axum::middleware::from_fn(auth_session_middleware))
}
