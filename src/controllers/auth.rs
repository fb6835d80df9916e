//! Session bootstrap endpoints (spec §4.O, §6).

use axum::{Extension, Json, extract::Query, routing::{get, post}};
use chrono::Duration;
use serde::Deserialize;
use tower_cookies::{
	Cookie, Cookies,
	cookie::{Key, SameSite, time::Duration as CookieDuration},
};
use tracing::info;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::controllers::AxumRouter;
use crate::error::{ApiResult, AppError, PublicError};
use crate::global::{SESSION_COOKIE_MAX_AGE_SECONDS, TICKET_TTL_SECONDS};
use crate::http_models::auth::{AuthSource, BootstrapResponse, TokenResponse, WhoamiResponse, WsTicketResponse};
use crate::jwt;
use crate::middleware::{SESSION_COOKIE_NAME, SessionCookiePayload, auth_session_middleware, resolve_auth_session};
use crate::state::AppState;
use std::sync::Arc;

#[derive(OpenApi)]
#[openapi(
	paths(post_token, post_session, post_bootstrap, get_whoami, post_ws_ticket),
	tags((name = "Auth"))
)]
pub struct AuthApiDoc;

fn new_session_id() -> String {
	Uuid::new_v4().to_string()
}

fn new_trace_id() -> String {
	Uuid::new_v4().to_string()
}

fn session_cookie(key: &Key, cookies: &Cookies, session_id: &str, user_id: Option<&str>, secure: bool) {
	let payload = SessionCookiePayload {
		session_id: session_id.to_string(),
		user_id: user_id.map(|s| s.to_string()),
	};
	let value = serde_json::to_string(&payload).expect("session cookie payload always serializes");
	let cookie = Cookie::build((SESSION_COOKIE_NAME, value))
		.path("/")
		.http_only(true)
		.secure(secure)
		.same_site(if secure { SameSite::None } else { SameSite::Lax })
		.max_age(CookieDuration::seconds(SESSION_COOKIE_MAX_AGE_SECONDS))
		.build();
	cookies.signed(key).add(cookie);
}

/// `POST /api/v1/auth/token` — mints a fresh session id and a bearer JWT for it.
#[utoipa::path(
	post,
	path = "/token",
	summary = "Mint a session token",
	responses((status = 200, description = "Token minted", body = TokenResponse)),
	tag = "Auth"
)]
pub async fn post_token(Extension(state): Extension<Arc<AppState>>) -> ApiResult<Json<TokenResponse>> {
	let session_id = new_session_id();
	let token = jwt::issue_token(&state.config.jwt_secret, &session_id, Duration::hours(24))?;
	Ok(Json(TokenResponse { token, session_id, trace_id: new_trace_id() }))
}

/// `POST /api/v1/auth/session` — exchanges a bearer token for the browser session cookie.
#[utoipa::path(
	post,
	path = "/session",
	summary = "Set the session cookie from a bearer token",
	responses(
		(status = 200, description = "Cookie set"),
		(status = 401, description = "Missing or invalid bearer token")
	),
	security(("bearer" = [])),
	tag = "Auth"
)]
pub async fn post_session(
	Extension(state): Extension<Arc<AppState>>,
	Extension(key): Extension<Key>,
	cookies: Cookies,
	req: axum::extract::Request,
) -> ApiResult<()> {
	let session = resolve_auth_session(&req).ok_or_else(|| AppError::from(PublicError::unauthenticated()))?;
	session_cookie(&key, &cookies, &session.session_id, session.user_id.as_deref(), state.config.is_production());
	Ok(())
}

/// `POST /api/v1/auth/bootstrap` — mints a token and sets the cookie in one round trip,
/// refusing when the backing job store is not reachable.
#[utoipa::path(
	post,
	path = "/bootstrap",
	summary = "Bootstrap a new session",
	responses(
		(status = 200, description = "Session bootstrapped", body = BootstrapResponse),
		(status = 503, description = "Session store unavailable")
	),
	tag = "Auth"
)]
pub async fn post_bootstrap(
	Extension(state): Extension<Arc<AppState>>,
	Extension(key): Extension<Key>,
	cookies: Cookies,
) -> ApiResult<Json<BootstrapResponse>> {
	if !state.job_store.is_available().await {
		return Err(AppError::from(PublicError::new(
			crate::error::PublicErrorKind::StoreUnavailable,
			"Session store unavailable",
		)));
	}

	let session_id = new_session_id();
	session_cookie(&key, &cookies, &session_id, None, state.config.is_production());
	info!(%session_id, "bootstrapped session");
	Ok(Json(BootstrapResponse { ok: true, session_id, trace_id: new_trace_id() }))
}

/// `GET /api/v1/auth/whoami` — best-effort identity lookup; never 401s.
#[utoipa::path(
	get,
	path = "/whoami",
	summary = "Report the caller's current auth state",
	responses((status = 200, description = "Identity report", body = WhoamiResponse)),
	tag = "Auth"
)]
pub async fn get_whoami(req: axum::extract::Request) -> Json<WhoamiResponse> {
	match resolve_auth_session(&req) {
		Some(session) => Json(WhoamiResponse {
			authenticated: true,
			session_id: Some(session.session_id),
			user_id: session.user_id,
			auth_source: Some(session.source),
		}),
		None => Json(WhoamiResponse { authenticated: false, session_id: None, user_id: None, auth_source: None }),
	}
}

#[derive(Debug, Deserialize)]
pub struct WsTicketQuery {}

/// `POST /api/v1/auth/ws-ticket` — issues a one-time push-socket ticket for an authenticated session.
#[utoipa::path(
	post,
	path = "/ws-ticket",
	summary = "Issue a one-time push-socket ticket",
	responses(
		(status = 200, description = "Ticket issued", body = WsTicketResponse),
		(status = 401, description = "Authentication required")
	),
	security(("bearer" = [])),
	tag = "Auth"
)]
pub async fn post_ws_ticket(
	Extension(state): Extension<Arc<AppState>>,
	Extension(session): Extension<crate::middleware::AuthSession>,
	Query(_): Query<WsTicketQuery>,
) -> Json<WsTicketResponse> {
	let ticket = state.tickets.issue_ticket(&session.session_id, session.user_id.as_deref());
	Json(WsTicketResponse { ticket, ttl_seconds: TICKET_TTL_SECONDS })
}

pub fn auth_routes() -> AxumRouter {
	AxumRouter::new()
		.route("/ws-ticket", post(post_ws_ticket))
		.route_layer(axum::middleware::from_fn(auth_session_middleware))
		.route("/token", post(post_token))
		.route("/session", post(post_session))
		.route("/bootstrap", post(post_bootstrap))
		.route("/whoami", get(get_whoami))
}
