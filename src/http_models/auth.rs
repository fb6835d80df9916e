use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response for `POST /api/v1/auth/token` (spec §6).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
	pub token: String,
	pub session_id: String,
	pub trace_id: String,
}

/// Response for `POST /api/v1/auth/bootstrap` on success.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapResponse {
	pub ok: bool,
	pub session_id: String,
	pub trace_id: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AuthSource {
	Cookie,
	Bearer,
}

/// Response for `GET /api/v1/auth/whoami`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WhoamiResponse {
	pub authenticated: bool,
	pub session_id: Option<String>,
	pub user_id: Option<String>,
	pub auth_source: Option<AuthSource>,
}

/// Response for `POST /api/v1/auth/ws-ticket`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WsTicketResponse {
	pub ticket: String,
	pub ttl_seconds: i64,
}
