//! Search endpoints (spec §4.L, §6): synchronous and asynchronous orchestrator
//! invocation, plus polling the async job's result.

use axum::{
	Extension, Json,
	extract::{Path, Query},
	routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::OpenApi;
use uuid::Uuid;

use crate::controllers::AxumRouter;
use crate::error::{ApiResult, AppError, PublicError, PublicErrorKind};
use crate::http_models::search::{AsyncAcceptedResponse, SearchPendingResponse, SearchRequest, SearchResponse};
use crate::middleware::{AuthSession, auth_session_middleware};
use crate::models::job::JobStatus;
use crate::models::query::QueryInput;
use crate::orchestrator::{OrchestratorContext, RunRequest};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(post_search, get_search_result), tags((name = "Search")))]
pub struct SearchApiDoc;

#[derive(Debug, Deserialize)]
pub struct SearchModeQuery {
	#[serde(default)]
	pub mode: Option<String>,
}

fn build_context(state: &AppState) -> OrchestratorContext {
	OrchestratorContext {
		llm: state.llm.clone(),
		provider: state.provider.clone(),
		push: state.push.clone(),
		enrichment: state.enrichment.clone(),
		default_region: state.config.default_region.clone(),
	}
}

fn build_request(session: &AuthSession, request_id: String, body: SearchRequest) -> RunRequest {
	let session_id = body.session_id.clone().unwrap_or_else(|| session.session_id.clone());
	RunRequest {
		request_id,
		session_id,
		query: QueryInput::from(body),
		ui_language: None,
	}
}

/// `POST /api/v1/search?mode=sync|async` (spec §6).
#[utoipa::path(
	post,
	path = "/search",
	summary = "Run a restaurant search",
	params(("mode" = Option<String>, Query, description = "sync (default) or async")),
	request_body = SearchRequest,
	responses(
		(status = 200, description = "Synchronous result", body = SearchResponse),
		(status = 202, description = "Accepted for async processing", body = AsyncAcceptedResponse),
		(status = 401, description = "Authentication required")
	),
	security(("bearer" = [])),
	tag = "Search"
)]
pub async fn post_search(
	Extension(state): Extension<Arc<AppState>>,
	Extension(session): Extension<AuthSession>,
	Query(mode): Query<SearchModeQuery>,
	Json(body): Json<SearchRequest>,
) -> ApiResult<axum::response::Response> {
	use axum::response::IntoResponse;

	let request_id = Uuid::new_v4().to_string();
	let run_request = build_request(&session, request_id.clone(), body);
	let ctx = build_context(&state);

	if mode.mode.as_deref() == Some("async") {
		if !state.job_store.is_available().await {
			error!(request_id = %request_id, "job store unavailable before first write, continuing anyway");
		}
		let _ = state
			.job_store
			.create_job(&request_id, &run_request.session_id, session.user_id.as_deref())
			.await
			.inspect_err(|e| error!(request_id = %request_id, error = %e, "failed to persist async job creation"));

		let job_store = state.job_store.clone();
		let spawn_request_id = request_id.clone();
		tokio::spawn(async move {
			let _ = job_store.set_status(&spawn_request_id, JobStatus::Running, Some(10)).await;
			match crate::orchestrator::run(&ctx, run_request).await {
				Ok(result) => {
					if let Err(err) = job_store.set_result(&spawn_request_id, result).await {
						error!(request_id = %spawn_request_id, error = %err, "failed to persist async search result");
					}
				}
				Err(err) => {
					let code = format!("{:?}", err.kind());
					if let Err(store_err) = job_store.set_error(&spawn_request_id, &code, "search failed").await {
						error!(request_id = %spawn_request_id, error = %store_err, "failed to persist async search failure");
					}
				}
			}
		});

		let result_url = format!("/api/v1/search/{request_id}/result");
		return Ok((axum::http::StatusCode::ACCEPTED, Json(AsyncAcceptedResponse { request_id, result_url })).into_response());
	}

	let result = crate::orchestrator::run(&ctx, run_request).await?;
	Ok(Json(result).into_response())
}

/// `GET /api/v1/search/:requestId/result` (spec §6). Ownership mismatch and
/// unknown jobs are both reported as `404`, never `403` (spec §8 invariant 5).
#[utoipa::path(
	get,
	path = "/search/{requestId}/result",
	summary = "Poll an async search job",
	params(("requestId" = String, Path, description = "Job id returned from the async search")),
	responses(
		(status = 200, description = "Job finished", body = SearchResponse),
		(status = 202, description = "Job still running", body = SearchPendingResponse),
		(status = 404, description = "Unknown job or not owned by this session"),
		(status = 401, description = "Authentication required")
	),
	security(("bearer" = [])),
	tag = "Search"
)]
pub async fn get_search_result(
	Extension(state): Extension<Arc<AppState>>,
	Extension(session): Extension<AuthSession>,
	Path(request_id): Path<String>,
) -> ApiResult<axum::response::Response> {
	use axum::response::IntoResponse;

	let job = state
		.job_store
		.get(&request_id)
		.await
		.map_err(crate::error::PrivateError::Store)?
		.ok_or_else(|| AppError::from(PublicError::not_found()))?;

	if !job.is_owned_by(&session.session_id) {
		info!(request_id = %request_id, "search result requested by a non-owning session");
		return Err(AppError::from(PublicError::not_found()));
	}

	match job.status {
		JobStatus::Accepted | JobStatus::Running => {
			Ok(Json(SearchPendingResponse { status: "RUNNING".to_string(), progress: job.progress }).into_response())
		}
		JobStatus::DoneSuccess => {
			let result = job.result.ok_or_else(|| AppError::from(PublicError::new(PublicErrorKind::Internal, "missing result")))?;
			Ok(Json(result).into_response())
		}
		JobStatus::DoneFailure => {
			let detail = job.error.unwrap_or(crate::models::job::JobError {
				code: "INTERNAL".to_string(),
				message: "search failed".to_string(),
			});
			Err(AppError::from(PublicError::new(PublicErrorKind::Internal, detail.message)))
		}
	}
}

pub fn search_routes() -> AxumRouter {
	AxumRouter::new()
		.route("/search", post(post_search))
		.route("/search/{requestId}/result", get(get_search_result))
		.route_layer(axum::middleware::from_fn(auth_session_middleware))
}
