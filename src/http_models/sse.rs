use serde::Serialize;

/// SSE `event: meta` payload (spec §6 "SSE event shape").
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SseMeta {
	pub request_id: String,
	pub assistant_language: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssistantMessageType {
	Clarify,
	Stop,
	GenericQueryNarration,
	Summary,
}

/// SSE `event: message` payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SseMessage {
	#[serde(rename = "type")]
	pub kind: AssistantMessageType,
	pub message: String,
	pub question: Option<String>,
	pub blocks_search: bool,
}
