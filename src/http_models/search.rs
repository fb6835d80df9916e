use crate::models::failure::FailureReason;
use crate::models::filters::{AppliedFilters, RelaxedFilters};
use crate::models::place::PlaceResult;
use crate::models::query::{LatLng, QueryInput};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body for `POST /api/v1/search` (spec §6).
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
	pub query: String,
	#[serde(default)]
	pub user_location: Option<LatLng>,
	#[serde(default)]
	pub session_id: Option<String>,
	#[serde(default)]
	pub filters: Option<serde_json::Value>,
	#[serde(default)]
	pub locale: Option<String>,
}

impl From<SearchRequest> for QueryInput {
	fn from(value: SearchRequest) -> Self {
		QueryInput {
			query: value.query,
			user_location: value.user_location,
			city_text: None,
			locale: value.locale,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QueryEcho {
	pub original: String,
	pub parsed: Option<String>,
	pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Assist {
	#[serde(rename = "type")]
	pub kind: String,
	pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchMeta {
	pub took_ms: u64,
	pub mode: String,
	pub confidence: f32,
	pub applied_filters: AppliedFilters,
	pub relaxed_filters: RelaxedFilters,
	pub source: String,
	pub failure_reason: FailureReason,
}

/// Full response body, both for sync `/search` and for
/// `GET /search/:requestId/result` (spec §3, §4.L "Response assembly").
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
	pub request_id: String,
	pub query: QueryEcho,
	pub results: Vec<PlaceResult>,
	pub chips: Vec<String>,
	pub assist: Option<Assist>,
	pub meta: SearchMeta,
}

/// 202 body returned from async `/search` (spec §6).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AsyncAcceptedResponse {
	pub request_id: String,
	pub result_url: String,
}

/// 202 body returned from `/search/:requestId/result` while still running.
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchPendingResponse {
	pub status: String,
	pub progress: u8,
}
