//! Provider request cache (spec §4.I): keyed by `(method, normalised
//! request body)`. Reads race against an independent timeout at the call
//! site; this type itself only owns storage and TTL.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

struct Entry<V> {
	value: V,
	expires_at: DateTime<Utc>,
}

pub struct ProviderCache<V: Clone> {
	entries: DashMap<String, Entry<V>>,
	ttl: Duration,
}

impl<V: Clone> ProviderCache<V> {
	pub fn new(ttl: Duration) -> Self {
		ProviderCache {
			entries: DashMap::new(),
			ttl,
		}
	}

	pub fn key(method: &str, normalised_body: &str) -> String {
		format!("{method}:{normalised_body}")
	}

	pub fn get(&self, key: &str) -> Option<V> {
		let entry = self.entries.get(key)?;
		if entry.expires_at < Utc::now() {
			drop(entry);
			self.entries.remove(key);
			return None;
		}
		Some(entry.value.clone())
	}

	pub fn put(&self, key: String, value: V) {
		self.entries.insert(
			key,
			Entry {
				value,
				expires_at: Utc::now() + self.ttl,
			},
		);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stores_and_reads_back_a_value() {
		let cache: ProviderCache<String> = ProviderCache::new(Duration::seconds(60));
		let key = ProviderCache::<String>::key("searchText", "{\"q\":\"pizza\"}");
		cache.put(key.clone(), "cached-response".to_string());
		assert_eq!(cache.get(&key), Some("cached-response".to_string()));
	}

	#[test]
	fn expired_entries_are_treated_as_a_miss() {
		let cache: ProviderCache<String> = ProviderCache::new(Duration::seconds(-1));
		let key = ProviderCache::<String>::key("searchText", "{}");
		cache.put(key.clone(), "stale".to_string());
		assert_eq!(cache.get(&key), None);
	}
}
