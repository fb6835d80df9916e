use crate::http_models::sse::AssistantMessageType;
use serde::Serialize;

/// Tagged event published on the `assistant`/`search` channels (spec §4.B).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum PushEvent {
	#[serde(rename = "ready", rename_all = "camelCase")]
	Ready { request_id: String },
	#[serde(rename = "assistant", rename_all = "camelCase")]
	Assistant {
		request_id: String,
		assistant_language: String,
		kind: AssistantMessageType,
		message: String,
		question: Option<String>,
		blocks_search: bool,
	},
	#[serde(rename = "RESULT_PATCH", rename_all = "camelCase")]
	ResultPatch {
		request_id: String,
		place_id: String,
		provider: String,
		status: EnrichmentStatus,
		url: Option<String>,
	},
	#[serde(rename = "error", rename_all = "camelCase")]
	Error {
		request_id: String,
		assistant_language: String,
		message: String,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrichmentStatus {
	Found,
	NotFound,
}
