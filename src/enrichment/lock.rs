//! Short-TTL `(provider, placeId)` lock (spec §4.M step 1): another worker
//! already resolving the same place is a skip, not a retry.

use crate::global::ENRICHMENT_LOCK_TTL_SECONDS;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

pub struct EnrichmentLock {
	held: DashMap<String, DateTime<Utc>>,
}

impl EnrichmentLock {
	pub fn new() -> Self {
		EnrichmentLock { held: DashMap::new() }
	}

	pub fn key(provider: &str, place_id: &str) -> String {
		format!("{provider}:{place_id}")
	}

	/// Returns `true` if the lock was acquired. An expired lock is treated
	/// as free and silently replaced.
	pub fn try_acquire(&self, key: &str) -> bool {
		let now = Utc::now();
		let expired = self.held.get(key).map(|held| *held < now).unwrap_or(true);
		if !expired {
			return false;
		}
		self.held.insert(key.to_string(), now + Duration::seconds(ENRICHMENT_LOCK_TTL_SECONDS));
		true
	}

	pub fn release(&self, key: &str) {
		self.held.remove(key);
	}
}

impl Default for EnrichmentLock {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn second_acquire_is_rejected_while_held() {
		let lock = EnrichmentLock::new();
		let key = EnrichmentLock::key("wolt", "place-1");
		assert!(lock.try_acquire(&key));
		assert!(!lock.try_acquire(&key));
	}

	#[test]
	fn release_frees_the_lock_for_reacquisition() {
		let lock = EnrichmentLock::new();
		let key = EnrichmentLock::key("wolt", "place-1");
		lock.try_acquire(&key);
		lock.release(&key);
		assert!(lock.try_acquire(&key));
	}

	#[test]
	fn an_expired_lock_can_be_reacquired() {
		let lock = EnrichmentLock::new();
		let key = EnrichmentLock::key("wolt", "place-1");
		lock.held.insert(key.clone(), Utc::now() - Duration::seconds(1));
		assert!(lock.try_acquire(&key));
	}
}
