//! Debug-only introspection (spec §6 `/debug/redis`). Disabled in production
//! unless explicitly re-enabled, since it reports backing-store health.

use axum::{Extension, Json, routing::get};
use serde::Serialize;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::controllers::AxumRouter;
use crate::error::{ApiResult, AppError, PublicError, PublicErrorKind};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DebugRedisResponse {
	pub available: bool,
}

#[derive(OpenApi)]
#[openapi(paths(get_debug_redis), tags((name = "Debug")))]
pub struct DebugApiDoc;

/// `GET /api/v1/debug/redis` (spec §6). 404s outside dev unless
/// `ENABLE_DEBUG_REDIS=true`, matching the non-disclosure posture for every
/// other gated resource in this crate.
#[utoipa::path(
	get,
	path = "/debug/redis",
	summary = "Report job-store backend health (dev/debug only)",
	responses(
		(status = 200, description = "Backend reachability", body = DebugRedisResponse),
		(status = 404, description = "Disabled outside development")
	),
	tag = "Debug"
)]
pub async fn get_debug_redis(Extension(state): Extension<Arc<AppState>>) -> ApiResult<Json<DebugRedisResponse>> {
	if state.config.is_production() && !state.config.enable_debug_redis {
		return Err(AppError::from(PublicError::new(PublicErrorKind::NotFound, "Not found")));
	}
	Ok(Json(DebugRedisResponse { available: state.job_store.is_available().await }))
}

pub fn debug_routes() -> AxumRouter {
	AxumRouter::new().route("/debug/redis", get(get_debug_redis))
}
