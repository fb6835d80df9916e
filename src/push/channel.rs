//! Push channel: subscription manager + close-code taxonomy (spec §4.B).
//! The WS/SSE handler mechanics this drives are grounded in the
//! prospector-btc orchestrator's triple-task `tokio::select!` handler
//! (mechanics only — its comment style was not carried over).

use crate::http_models::push::PushEvent;
use dashmap::DashMap;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::warn;

pub type ConnectionId = u64;

/// `(channel, requestId, sessionId)` (spec §4.B.1).
pub type SubscriptionKey = (String, String, String);

/// Enumerated close-source tag (spec §4.B.2 / GLOSSARY "Close source").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseSource {
	IdleTimeout,
	ServerShutdown,
	ClientClose,
	Policy,
	Error,
}

impl CloseSource {
	/// Close-code invariant (spec §4.B.2): `1001` only for `IDLE_TIMEOUT` or
	/// `SERVER_SHUTDOWN`; `1000` for `CLIENT_CLOSE`; `1008` for `POLICY`;
	/// `1011` for `ERROR`.
	pub fn code(self) -> u16 {
		match self {
			CloseSource::IdleTimeout | CloseSource::ServerShutdown => 1001,
			CloseSource::ClientClose => 1000,
			CloseSource::Policy => 1008,
			CloseSource::Error => 1011,
		}
	}

	pub fn reason(self) -> &'static str {
		match self {
			CloseSource::IdleTimeout => "IDLE_TIMEOUT",
			CloseSource::ServerShutdown => "SERVER_SHUTDOWN",
			CloseSource::ClientClose => "CLIENT_CLOSE",
			CloseSource::Policy => "POLICY",
			CloseSource::Error => "ERROR",
		}
	}
}

/// Validates a `(code, source)` pair against the invariant in spec §4.B.2 /
/// §8 invariant 7. Logs a diagnostic (does not panic) if `1001` is ever
/// paired with a source other than idle-timeout/server-shutdown.
pub fn assert_close_code_consistency(code: u16, source: CloseSource) {
	if code == 1001 && !matches!(source, CloseSource::IdleTimeout | CloseSource::ServerShutdown) {
		warn!(code, source = source.reason(), "close code 1001 used with an unexpected close source");
	}
}

struct Subscriber {
	sender: UnboundedSender<PushEvent>,
}

/// Subscription manager (spec §4.B.1). Unsubscribe/cleanup are idempotent:
/// repeated calls on an already-removed connection are silent no-ops.
#[derive(Default)]
pub struct PushChannel {
	subscriptions: DashMap<SubscriptionKey, Vec<ConnectionId>>,
	reverse_index: DashMap<ConnectionId, Vec<SubscriptionKey>>,
	connections: DashMap<ConnectionId, Subscriber>,
}

impl PushChannel {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a new connection and returns its receiver half; the caller
	/// owns forwarding received events to the actual transport (WS/SSE).
	pub fn register(&self, connection_id: ConnectionId) -> UnboundedReceiver<PushEvent> {
		let (tx, rx) = mpsc::unbounded_channel();
		self.connections.insert(connection_id, Subscriber { sender: tx });
		self.reverse_index.insert(connection_id, Vec::new());
		rx
	}

	pub fn subscribe(&self, connection_id: ConnectionId, key: SubscriptionKey) {
		self.subscriptions.entry(key.clone()).or_default().push(connection_id);
		if let Some(mut keys) = self.reverse_index.get_mut(&connection_id) {
			keys.push(key);
		}
	}

	/// Idempotent: a second call for an already-removed connection is a
	/// silent no-op (spec §4.B.1).
	pub fn unsubscribe_all(&self, connection_id: ConnectionId) {
		let Some((_, keys)) = self.reverse_index.remove(&connection_id) else {
			return;
		};
		for key in keys {
			if let Some(mut subs) = self.subscriptions.get_mut(&key) {
				subs.retain(|id| *id != connection_id);
			}
		}
		self.connections.remove(&connection_id);
	}

	pub fn publish(&self, key: &SubscriptionKey, event: PushEvent) {
		let Some(subs) = self.subscriptions.get(key) else {
			return;
		};
		for connection_id in subs.iter() {
			if let Some(subscriber) = self.connections.get(connection_id) {
				// Publish failures are never fatal (spec §7); the HTTP
				// result endpoint remains authoritative either way.
				let _ = subscriber.sender.send(event.clone());
			}
		}
	}

	/// Server-shutdown hook (spec §4.B.4): close every live connection with
	/// `(1001, SERVER_SHUTDOWN)` and drain all bookkeeping.
	pub fn shutdown_all(&self) {
		let ids: Vec<ConnectionId> = self.connections.iter().map(|e| *e.key()).collect();
		for id in ids {
			self.unsubscribe_all(id);
		}
	}

	pub fn connection_count(&self) -> usize {
		self.connections.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn key() -> SubscriptionKey {
		("assistant".to_string(), "req-1".to_string(), "session-a".to_string())
	}

	#[test]
	fn close_codes_match_the_spec_taxonomy() {
		assert_eq!(CloseSource::IdleTimeout.code(), 1001);
		assert_eq!(CloseSource::ServerShutdown.code(), 1001);
		assert_eq!(CloseSource::ClientClose.code(), 1000);
		assert_eq!(CloseSource::Policy.code(), 1008);
		assert_eq!(CloseSource::Error.code(), 1011);
	}

	#[test]
	fn unsubscribe_is_idempotent() {
		let channel = PushChannel::new();
		channel.register(1);
		channel.subscribe(1, key());
		channel.unsubscribe_all(1);
		channel.unsubscribe_all(1);
		assert_eq!(channel.connection_count(), 0);
	}

	#[test]
	fn publish_after_unsubscribe_does_not_panic_or_resurrect_subscriber() {
		let channel = PushChannel::new();
		channel.register(1);
		channel.subscribe(1, key());
		channel.unsubscribe_all(1);
		channel.publish(&key(), PushEvent::Ready { request_id: "req-1".to_string() });
		assert_eq!(channel.connection_count(), 0);
	}

	#[test]
	fn shutdown_all_clears_every_connection() {
		let channel = PushChannel::new();
		channel.register(1);
		channel.register(2);
		channel.subscribe(1, key());
		channel.subscribe(2, key());
		channel.shutdown_all();
		assert_eq!(channel.connection_count(), 0);
	}
}
