#![allow(unexpected_cfgs)]

mod config;
mod controllers;
mod enrichment;
mod error;
mod filters;
mod global;
mod http_models;
mod jobstore;
mod jwt;
mod llm;
mod log;
mod middleware;
mod models;
mod orchestrator;
mod provider;
mod push;
mod ranker;
mod state;
mod util;

#[cfg(not(tarpaulin_include))]
mod swagger;

use crate::config::Config;
use crate::controllers::AxumRouter;
use crate::enrichment::Dispatcher;
use crate::jobstore::{JobStore, memory::MemoryJobStore, redis_store::RedisJobStore};
use crate::llm::LlmClient;
use crate::provider::google::PlacesProvider;
use crate::push::{PushChannel, TicketService};
use crate::state::AppState;
use axum::Extension;
use http::Method;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use tower_cookies::CookieManagerLayer;
use tower_cookies::cookie::Key;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

/// Periodic TTL sweep for the in-memory job store backend (spec §9: "TTL-
/// expiring; no unbounded growth"). The Redis backend honours TTL via
/// `set_ex` on write and needs no equivalent task.
fn spawn_memory_job_store_sweep(store: Arc<MemoryJobStore>) {
	tokio::spawn(async move {
		let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
		loop {
			interval.tick().await;
			store.evict_expired();
		}
	});
}

#[cfg(not(tarpaulin_include))]
#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
	dotenvy::dotenv().ok();
	log::init_panic_handler();
	log::init_logger();

	let config = Arc::new(Config::load());

	let job_store: Arc<dyn JobStore> = match &config.redis_url {
		Some(url) => {
			let store = RedisJobStore::connect(url).await.expect("failed to connect to REDIS_URL");
			info!("job store backend: redis");
			Arc::new(store)
		}
		None => {
			info!("job store backend: in-memory");
			let store = Arc::new(MemoryJobStore::new());
			spawn_memory_job_store_sweep(store.clone());
			store
		}
	};

	let llm = Arc::new(LlmClient::new(&config.llm_api_key));
	let provider = Arc::new(PlacesProvider::new(config.places_api_key.clone()).expect("failed to build places provider"));
	let push = Arc::new(PushChannel::new());
	let tickets = Arc::new(TicketService::new());
	let enrichment: Arc<dyn crate::orchestrator::EnrichmentKickoff> = Arc::new(Dispatcher::new(push.clone(), 16));

	let state = Arc::new(AppState {
		config: config.clone(),
		llm,
		provider,
		push: push.clone(),
		tickets,
		job_store,
		enrichment,
	});

	// CORS: exact-origin or `*.domain` allowlist (spec §6 "CORS & origins").
	// A bare `*` is refused at startup in production by `Config::assert_production_gates`.
	let allowed_origins = config.frontend_origins.clone();
	let cors = CorsLayer::new()
		.allow_origin(AllowOrigin::predicate(move |origin, _| {
			let Ok(origin_str) = origin.to_str() else {
				return false;
			};
			allowed_origins.iter().any(|allowed| {
				if allowed == "*" {
					return true;
				}
				if let Some(suffix) = allowed.strip_prefix("*.") {
					return origin_str.ends_with(suffix);
				}
				origin_str == allowed
			})
		}))
		.allow_credentials(true)
		.allow_methods([Method::GET, Method::POST, Method::DELETE])
		.allow_headers([
			http::header::CONTENT_TYPE,
			http::header::ACCEPT,
			http::header::AUTHORIZATION,
			http::header::HeaderName::from_static("x-requested-with"),
		]);

	let cookie_key = Key::generate();

	let search_governor = Arc::new(
		GovernorConfigBuilder::default()
			.per_second(1)
			.burst_size(100)
			.key_extractor(tower_governor::key_extractor::SmartIpKeyExtractor)
			.finish()
			.expect("search rate limit config"),
	);
	let photo_governor = Arc::new(
		GovernorConfigBuilder::default()
			.per_second(1)
			.burst_size(60)
			.key_extractor(tower_governor::key_extractor::SmartIpKeyExtractor)
			.finish()
			.expect("photo rate limit config"),
	);

	let api_routes = AxumRouter::new()
		.nest("/auth", controllers::auth::auth_routes())
		.merge(
			controllers::search::search_routes()
				.layer(GovernorLayer { config: search_governor }),
		)
		.merge(controllers::stream::stream_routes())
		.merge(
			controllers::photos::photos_routes()
				.layer(GovernorLayer { config: photo_governor }),
		)
		.merge(controllers::debug::debug_routes());

	let api_routes = AxumRouter::new().nest("/api/v1", api_routes).merge(controllers::ws::ws_routes());

	#[cfg(all(not(test), debug_assertions))]
	let api_routes = crate::swagger::merge_swagger(api_routes);

	let app = axum::Router::new()
		.merge(api_routes)
		.layer(Extension(state))
		.layer(Extension(cookie_key))
		.layer(CookieManagerLayer::new())
		.layer(cors);

	let addr = SocketAddr::from_str(&config.bind_address).expect("invalid BIND_ADDRESS");
	info!(address = %config.api_base_url, "server starting");

	let listener = tokio::net::TcpListener::bind(addr).await?;
	axum::serve(listener, app.into_make_service()).await?;

	Ok(())
}
