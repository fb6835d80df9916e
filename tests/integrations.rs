//! tests/integrations.rs
//!
//! Spins up one real server instance bound to an ephemeral port and drives it
//! over HTTP, covering the auth/session lifecycle and the object-level
//! authorization boundary around async search jobs (no live LLM/Places calls
//! are made here; those adapters are exercised by their own unit tests).

extern crate journey_search as app;

use app::config::{Config, Environment};
use app::controllers::{self, AxumRouter};
use app::enrichment::Dispatcher;
use app::http_models::search::{Assist, QueryEcho, SearchMeta, SearchResponse};
use app::jobstore::{JobStore, memory::MemoryJobStore};
use app::llm::LlmClient;
use app::models::failure::FailureReason;
use app::models::filters::{AppliedFilters, RelaxedFilters};
use app::provider::google::PlacesProvider;
use app::push::{PushChannel, TicketService};
use app::state::AppState;
use axum::{Extension, Router};
use std::sync::{Arc, Once};
use tower_cookies::{Cookie, CookieManagerLayer, cookie::Key};

static TEST_LOG_INIT: Once = Once::new();

fn test_state() -> Arc<AppState> {
	let config = Arc::new(Config {
		environment: Environment::Dev,
		bind_address: "127.0.0.1:0".to_string(),
		api_base_url: "http://127.0.0.1".to_string(),
		frontend_origins: vec!["*".to_string()],
		jwt_secret: "test-secret-not-for-production-use".to_string(),
		redis_url: None,
		places_api_key: "test-places-api-key".to_string(),
		llm_api_key: "test-llm-api-key".to_string(),
		enable_debug_redis: false,
		default_region: "IL".to_string(),
	});

	let push = Arc::new(PushChannel::new());
	let job_store: Arc<dyn JobStore> = Arc::new(MemoryJobStore::new());
	let enrichment: Arc<dyn app::orchestrator::EnrichmentKickoff> = Arc::new(Dispatcher::new(push.clone(), 4));

	Arc::new(AppState {
		config: config.clone(),
		llm: Arc::new(LlmClient::new(&config.llm_api_key)),
		provider: Arc::new(PlacesProvider::new(config.places_api_key.clone()).expect("test provider builds")),
		push,
		tickets: Arc::new(TicketService::new()),
		job_store,
		enrichment,
	})
}

fn fake_search_response(request_id: &str) -> SearchResponse {
	SearchResponse {
		request_id: request_id.to_string(),
		query: QueryEcho { original: "sushi nearby".to_string(), parsed: Some("sushi".to_string()), language: "en".to_string() },
		results: Vec::new(),
		chips: Vec::new(),
		assist: None::<Assist>,
		meta: SearchMeta {
			took_ms: 12,
			mode: "NEARBY".to_string(),
			confidence: 0.9,
			applied_filters: AppliedFilters::default(),
			relaxed_filters: RelaxedFilters::default(),
			source: "test".to_string(),
			failure_reason: FailureReason::None,
		},
	}
}

/// Builds the same router shape as `main.rs`, minus CORS/rate-limiting,
/// which are not under test here.
fn build_app(state: Arc<AppState>, cookie_key: Key) -> Router {
	let api_routes = AxumRouter::new()
		.nest("/auth", controllers::auth::auth_routes())
		.merge(controllers::search::search_routes())
		.merge(controllers::stream::stream_routes())
		.merge(controllers::photos::photos_routes())
		.merge(controllers::debug::debug_routes());

	let api_routes = AxumRouter::new().nest("/api/v1", api_routes).merge(controllers::ws::ws_routes());

	Router::new()
		.merge(api_routes)
		.layer(Extension(state))
		.layer(Extension(cookie_key))
		.layer(CookieManagerLayer::new())
}

async fn spawn_test_server() -> (String, Arc<AppState>, Key) {
	TEST_LOG_INIT.call_once(|| {
		if std::env::var("RUST_LOG").is_err() {
			unsafe { std::env::set_var("RUST_LOG", "info") };
		}
		app::log::init_panic_handler();
		app::log::init_logger();
	});

	let state = test_state();
	let cookie_key = Key::generate();
	let app = build_app(state.clone(), cookie_key.clone());

	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind test server");
	let addr = listener.local_addr().unwrap();
	tokio::spawn(axum::serve(listener, app.into_make_service()).into_future());

	(format!("http://127.0.0.1:{}", addr.port()), state, cookie_key)
}

#[tokio::test]
async fn test_endpoints() {
	let (base, state, cookie_key) = spawn_test_server().await;
	let client = reqwest::Client::new();

	tokio::join!(
		test_whoami_never_401s(&client, &base),
		test_token_session_whoami_round_trip(&client, &base, &cookie_key),
		test_bootstrap_sets_cookie(&client, &base),
		test_search_requires_auth(&client, &base),
		test_ws_ticket_requires_auth(&client, &base),
		test_debug_redis_visible_in_dev(&client, &base),
		test_async_job_ownership_hides_cross_session_access(&client, &base, state.clone()),
	);
}

async fn test_whoami_never_401s(client: &reqwest::Client, base: &str) {
	let resp = client.get(format!("{base}/api/v1/auth/whoami")).send().await.unwrap();
	assert_eq!(resp.status().as_u16(), 200, "whoami must never reject an anonymous caller");
	let body: serde_json::Value = resp.json().await.unwrap();
	assert_eq!(body["authenticated"], false);
}

async fn test_token_session_whoami_round_trip(client: &reqwest::Client, base: &str, cookie_key: &Key) {
	let resp = client
		.post(format!("{base}/api/v1/auth/token"))
		.json(&serde_json::json!({}))
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status().as_u16(), 200);
	let body: serde_json::Value = resp.json().await.unwrap();
	let token = body["token"].as_str().unwrap().to_string();
	let session_id = body["sessionId"].as_str().unwrap().to_string();
	assert!(!token.is_empty());

	// Exchanging the bearer for a cookie must succeed, and the cookie must
	// decode (via the same signing key) back to the same session id.
	let resp = client
		.post(format!("{base}/api/v1/auth/session"))
		.bearer_auth(&token)
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status().as_u16(), 200);
	let set_cookie = resp.headers().get("set-cookie").expect("session endpoint must set a cookie");
	let parsed = Cookie::parse(set_cookie.to_str().unwrap().to_string()).unwrap();
	let mut jar = tower_cookies::cookie::CookieJar::new();
	jar.add(parsed.clone());
	let decrypted = jar.signed(cookie_key).get(parsed.name()).expect("cookie must be signed with the server key");
	let payload: serde_json::Value = serde_json::from_str(decrypted.value()).unwrap();
	assert_eq!(payload["sessionId"], session_id);
}

async fn test_bootstrap_sets_cookie(client: &reqwest::Client, base: &str) {
	let resp = client
		.post(format!("{base}/api/v1/auth/bootstrap"))
		.json(&serde_json::json!({}))
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status().as_u16(), 200);
	assert!(resp.headers().get("set-cookie").is_some());
	let body: serde_json::Value = resp.json().await.unwrap();
	assert_eq!(body["ok"], true);
}

async fn test_search_requires_auth(client: &reqwest::Client, base: &str) {
	let resp = client
		.post(format!("{base}/api/v1/search"))
		.json(&serde_json::json!({ "query": "ramen near me" }))
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status().as_u16(), 401, "search must require a session");
}

async fn test_ws_ticket_requires_auth(client: &reqwest::Client, base: &str) {
	let resp = client
		.post(format!("{base}/api/v1/auth/ws-ticket"))
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status().as_u16(), 401);
}

async fn test_debug_redis_visible_in_dev(client: &reqwest::Client, base: &str) {
	let resp = client.get(format!("{base}/api/v1/debug/redis")).send().await.unwrap();
	assert_eq!(resp.status().as_u16(), 200, "debug routes are reachable in dev builds");
}

/// Scenario S7: an async job created by session A is invisible (404, never
/// 403) to session B, and visible with a successful result to session A,
/// with no provider API key anywhere in the payload (spec §8 invariant 5).
async fn test_async_job_ownership_hides_cross_session_access(client: &reqwest::Client, base: &str, state: Arc<AppState>) {
	let request_id = "owned-by-a";
	state.job_store.create_job(request_id, "session-a", None).await.unwrap();
	state.job_store.set_result(request_id, fake_search_response(request_id)).await.unwrap();

	let token_a = mint_bearer("session-a");
	let token_b = mint_bearer("session-b");

	let resp = client
		.get(format!("{base}/api/v1/search/{request_id}/result"))
		.bearer_auth(&token_b)
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status().as_u16(), 404, "a non-owning session must see 404, never 403");

	let resp = client
		.get(format!("{base}/api/v1/search/{request_id}/result"))
		.bearer_auth(&token_a)
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status().as_u16(), 200);
	let body_text = resp.text().await.unwrap();
	assert!(!body_text.contains(&state.config.places_api_key), "no provider API key may ever appear in a response body");
	let body: serde_json::Value = serde_json::from_str(&body_text).unwrap();
	assert_eq!(body["requestId"], request_id);
}

/// Mints a bearer token for an arbitrary session id directly (bypassing
/// `/auth/token`, which only ever mints a fresh random id), so two distinct
/// callers can exercise the ownership boundary deterministically.
fn mint_bearer(session_id: &str) -> String {
	app::jwt::issue_token("test-secret-not-for-production-use", session_id, chrono::Duration::hours(1)).unwrap()
}
