//! Enrichment worker (spec §4.M): for each ranked place, resolve a
//! delivery-provider deep link in the background and publish exactly one
//! `RESULT_PATCH` per `(provider, place)` pair. Never blocks `orchestrator::run`.

pub mod lock;
pub mod providers;
pub mod websearch;

use crate::global::ENRICHMENT_CACHE_TTL_SECONDS;
use crate::http_models::push::{EnrichmentStatus, PushEvent};
use crate::models::place::PlaceResult;
use crate::orchestrator::EnrichmentKickoff;
use crate::provider::cache::ProviderCache;
use crate::push::PushChannel;
use chrono::Duration;
use lock::EnrichmentLock;
use providers::EnrichmentProvider;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::warn;
use websearch::{relaxation_plan, search_web};

#[derive(Debug, Clone)]
struct CachedDeepLink {
	status: EnrichmentStatus,
	url: Option<String>,
}

struct Inner {
	lock: EnrichmentLock,
	cache: ProviderCache<CachedDeepLink>,
	push: Arc<PushChannel>,
	/// Bounds total in-flight enrichment jobs across all providers and
	/// places (spec §4.M: "a bounded worker pool, not one task per place").
	concurrency: Semaphore,
}

/// Concrete `EnrichmentKickoff` implementation. Cheap to clone (wraps an
/// `Arc`); the orchestrator holds it behind `Arc<dyn EnrichmentKickoff>`.
pub struct Dispatcher {
	inner: Arc<Inner>,
}

impl Dispatcher {
	pub fn new(push: Arc<PushChannel>, max_concurrent_jobs: usize) -> Self {
		Dispatcher {
			inner: Arc::new(Inner {
				lock: EnrichmentLock::new(),
				cache: ProviderCache::new(Duration::seconds(ENRICHMENT_CACHE_TTL_SECONDS)),
				push,
				concurrency: Semaphore::new(max_concurrent_jobs),
			}),
		}
	}
}

impl EnrichmentKickoff for Dispatcher {
	fn kickoff(&self, request_id: &str, session_id: &str, city: Option<&str>, places: &[PlaceResult]) {
		for place in places {
			for provider in EnrichmentProvider::all() {
				let inner = self.inner.clone();
				let request_id = request_id.to_string();
				let session_id = session_id.to_string();
				let city = city.map(|c| c.to_string());
				let place = place.clone();
				let provider = *provider;
				tokio::spawn(async move {
					process_one(&inner, &request_id, &session_id, city.as_deref(), &place, provider).await;
				});
			}
		}
	}
}

/// Resolves one `(provider, place)` pair. Every branch ends with a publish
/// or an intentional skip (lock already held by another worker, which will
/// itself publish) — there is no path that leaves a client waiting forever.
async fn process_one(
	inner: &Inner,
	request_id: &str,
	session_id: &str,
	city: Option<&str>,
	place: &PlaceResult,
	provider: EnrichmentProvider,
) {
	let Ok(_permit) = inner.concurrency.acquire().await else {
		return;
	};

	let lock_key = EnrichmentLock::key(provider.key(), &place.id);
	if !inner.lock.try_acquire(&lock_key) {
		return;
	}

	let cache_key = ProviderCache::<CachedDeepLink>::key(provider.key(), &place.id);
	if let Some(cached) = inner.cache.get(&cache_key) {
		publish(inner, request_id, session_id, place, provider, cached.status, cached.url);
		inner.lock.release(&lock_key);
		return;
	}

	let outcome = resolve_deep_link(place, city, provider).await;
	inner.cache.put(cache_key, CachedDeepLink { status: outcome.status, url: outcome.url.clone() });
	publish(inner, request_id, session_id, place, provider, outcome.status, outcome.url);
	inner.lock.release(&lock_key);
}

struct DeepLinkOutcome {
	status: EnrichmentStatus,
	url: Option<String>,
}

/// Progressive relaxation (spec §4.M step 3): try each query in the plan in
/// order, accepting the first result whose URL passes the provider's
/// host/path allow-list.
async fn resolve_deep_link(place: &PlaceResult, city: Option<&str>, provider: EnrichmentProvider) -> DeepLinkOutcome {
	for query in relaxation_plan(&place.name, city, provider.site_hint()) {
		let results = search_web(&query, 5).await;
		if let Some(hit) = results.into_iter().find(|r| provider.accepts_url(&r.url)) {
			return DeepLinkOutcome { status: EnrichmentStatus::Found, url: Some(hit.url) };
		}
	}
	DeepLinkOutcome { status: EnrichmentStatus::NotFound, url: None }
}

fn publish(
	inner: &Inner,
	request_id: &str,
	session_id: &str,
	place: &PlaceResult,
	provider: EnrichmentProvider,
	status: EnrichmentStatus,
	url: Option<String>,
) {
	let key = ("search".to_string(), request_id.to_string(), session_id.to_string());
	if inner.push.connection_count() == 0 {
		warn!(request_id, place_id = %place.id, provider = provider.key(), "publishing RESULT_PATCH with no live subscribers");
	}
	inner.push.publish(
		&key,
		PushEvent::ResultPatch {
			request_id: request_id.to_string(),
			place_id: place.id.clone(),
			provider: provider.key().to_string(),
			status,
			url,
		},
	);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::models::query::LatLng;

	fn place(id: &str) -> PlaceResult {
		PlaceResult {
			id: id.to_string(),
			name: "Test Restaurant".to_string(),
			location: LatLng { lat: 32.08, lng: 34.78 },
			rating: None,
			user_ratings_total: None,
			price_level: None,
			open_now: None,
			photo_references: Vec::new(),
			tags: Vec::new(),
		}
	}

	fn dispatcher() -> (Dispatcher, Arc<PushChannel>) {
		let push = Arc::new(PushChannel::new());
		(Dispatcher::new(push.clone(), 4), push)
	}

	/// A cache hit publishes the cached outcome directly, never reaching the
	/// live `search_web` call (proven by the cached URL being one that no
	/// real search would return).
	#[tokio::test]
	async fn cache_hit_publishes_the_cached_outcome_without_refetching() {
		let (dispatcher, push) = dispatcher();
		let place = place("place-cached");
		let provider = EnrichmentProvider::Wolt;
		let cache_key = ProviderCache::<CachedDeepLink>::key(provider.key(), &place.id);
		dispatcher.inner.cache.put(
			cache_key,
			CachedDeepLink { status: EnrichmentStatus::Found, url: Some("https://wolt.com/restaurant/from-cache".to_string()) },
		);

		let connection_id = 1;
		let mut receiver = push.register(connection_id);
		push.subscribe(connection_id, ("search".to_string(), "req-1".to_string(), "session-a".to_string()));

		process_one(&dispatcher.inner, "req-1", "session-a", Some("Tel Aviv"), &place, provider).await;

		let event = tokio::time::timeout(std::time::Duration::from_secs(1), receiver.recv())
			.await
			.expect("cache hit must publish promptly")
			.expect("channel open");
		match event {
			PushEvent::ResultPatch { status, url, .. } => {
				assert_eq!(status, EnrichmentStatus::Found);
				assert_eq!(url.as_deref(), Some("https://wolt.com/restaurant/from-cache"));
			}
			other => panic!("expected ResultPatch, got {other:?}"),
		}
	}

	/// A lock already held by another in-flight worker is a silent skip: no
	/// publish happens and the borrowed permit is returned immediately.
	#[tokio::test]
	async fn lock_already_held_skips_without_publishing() {
		let (dispatcher, push) = dispatcher();
		let place = place("place-locked");
		let provider = EnrichmentProvider::Wolt;
		let lock_key = EnrichmentLock::key(provider.key(), &place.id);
		assert!(dispatcher.inner.lock.try_acquire(&lock_key));

		let connection_id = 2;
		let mut receiver = push.register(connection_id);
		push.subscribe(connection_id, ("search".to_string(), "req-2".to_string(), "session-a".to_string()));

		process_one(&dispatcher.inner, "req-2", "session-a", None, &place, provider).await;

		let result = tokio::time::timeout(std::time::Duration::from_millis(200), receiver.recv()).await;
		assert!(result.is_err(), "a lock-skip must never publish");
	}
}
