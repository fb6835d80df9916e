//! Session auth middleware (spec §4.O). Extracts `AuthSession` from the
//! signed `session` cookie or a `Bearer` JWT — cookie takes precedence —
//! and inserts it into request extensions, exactly as the imitated stack's
//! own `AuthUser` middleware attaches a request-scoped identity.

use crate::error::{AppError, PublicError};
use crate::http_models::auth::AuthSource;
use crate::jwt;
use crate::state::AppState;
use axum::{extract::Request, http::header, middleware::Next, response::Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_cookies::Cookies;
use tower_cookies::cookie::Key;

/// Request-scoped identity (spec §3 "Auth / push entities"). Inserted into
/// request extensions on success; object-level authorization (job
/// ownership) is checked by comparing `session_id` against the job record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
	pub session_id: String,
	pub user_id: Option<String>,
	pub source: AuthSource,
}

/// Payload carried inside the signed `session` cookie (spec §4.O).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCookiePayload {
	pub session_id: String,
	pub user_id: Option<String>,
}

pub const SESSION_COOKIE_NAME: &str = "session";

/// Best-effort extraction, used directly by `GET /auth/whoami` (which must
/// succeed with `authenticated: false` rather than 401).
pub fn resolve_auth_session(req: &Request) -> Option<AuthSession> {
	if let Some(session) = from_cookie(req) {
		return Some(session);
	}
	from_bearer(req)
}

fn from_cookie(req: &Request) -> Option<AuthSession> {
	let key = req.extensions().get::<Key>()?;
	let cookies = req.extensions().get::<Cookies>()?;
	let cookie = cookies.signed(key).get(SESSION_COOKIE_NAME)?;
	let payload: SessionCookiePayload = serde_json::from_str(cookie.value()).ok()?;
	Some(AuthSession {
		session_id: payload.session_id,
		user_id: payload.user_id,
		source: AuthSource::Cookie,
	})
}

fn from_bearer(req: &Request) -> Option<AuthSession> {
	let header_value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
	let token = header_value.strip_prefix("Bearer ")?;
	let state = req.extensions().get::<Arc<AppState>>()?;
	let claims = jwt::verify_token(&state.config.jwt_secret, token).ok()?;
	Some(AuthSession { session_id: claims.sub, user_id: None, source: AuthSource::Bearer })
}

/// Rejects with 401 when neither a valid cookie nor a valid bearer token is
/// present; otherwise inserts `AuthSession` and continues.
pub async fn auth_session_middleware(mut req: Request, next: Next) -> Response {
	match resolve_auth_session(&req) {
		Some(session) => {
			req.extensions_mut().insert(session);
			next.run(req).await
		}
		None => {
			use axum::response::IntoResponse;
			AppError::from(PublicError::unauthenticated()).into_response()
		}
	}
}
