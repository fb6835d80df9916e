//! One-time push-channel tickets (spec §4.C). Tickets are never echoed in
//! URLs or logs (GLOSSARY "Ticket").

use crate::global::TICKET_TTL_SECONDS;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::RngCore;

#[derive(Debug, Clone)]
pub struct TicketPayload {
	pub session_id: String,
	pub user_id: Option<String>,
	pub created_at: DateTime<Utc>,
}

pub struct TicketService {
	tickets: DashMap<String, TicketPayload>,
}

impl TicketService {
	pub fn new() -> Self {
		TicketService { tickets: DashMap::new() }
	}

	pub fn issue_ticket(&self, session_id: &str, user_id: Option<&str>) -> String {
		let ticket = random_opaque_token();
		self.tickets.insert(
			ticket.clone(),
			TicketPayload {
				session_id: session_id.to_string(),
				user_id: user_id.map(|s| s.to_string()),
				created_at: Utc::now(),
			},
		);
		ticket
	}

	/// Atomic `get+delete` (spec §4.C): a ticket is consumed at most once
	/// (spec §8 invariant 6). Expired tickets are treated as a miss.
	pub fn consume(&self, ticket: &str) -> Option<TicketPayload> {
		let (_, payload) = self.tickets.remove(ticket)?;
		let expires_at = payload.created_at + Duration::seconds(TICKET_TTL_SECONDS);
		if Utc::now() > expires_at { None } else { Some(payload) }
	}
}

impl Default for TicketService {
	fn default() -> Self {
		Self::new()
	}
}

fn random_opaque_token() -> String {
	let mut bytes = [0u8; 24];
	rand::thread_rng().fill_bytes(&mut bytes);
	bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn a_ticket_can_be_consumed_exactly_once() {
		let service = TicketService::new();
		let ticket = service.issue_ticket("session-a", None);
		assert!(service.consume(&ticket).is_some());
		assert!(service.consume(&ticket).is_none());
	}

	#[test]
	fn unknown_ticket_is_a_miss() {
		let service = TicketService::new();
		assert!(service.consume("does-not-exist").is_none());
	}

	#[test]
	fn expired_ticket_is_refused() {
		let service = TicketService::new();
		let ticket = service.issue_ticket("session-a", None);
		if let Some(mut entry) = service.tickets.get_mut(&ticket) {
			entry.created_at = Utc::now() - Duration::seconds(TICKET_TTL_SECONDS + 1);
		}
		assert!(service.consume(&ticket).is_none());
	}
}
