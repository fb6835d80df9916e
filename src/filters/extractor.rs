use crate::global::FILTER_EXTRACTOR_TIMEOUT_MS;
use crate::llm::{LlmClient, prompts};
use crate::models::filters::PreGoogleBaseFilters;
use std::time::Duration;

/// Shared-filters extractor (spec §4.E): a single bounded LLM call that
/// MUST NOT block the pipeline. On any failure or timeout, returns the safe
/// fallback — never propagated as an error to the orchestrator.
pub async fn extract_shared_filters(llm: &LlmClient, query: &str, route: &str) -> PreGoogleBaseFilters {
	let prompt = prompts::filter_extractor_prompt(query, route);
	let timeout = Duration::from_millis(FILTER_EXTRACTOR_TIMEOUT_MS);
	match llm
		.complete_json_with_retry::<PreGoogleBaseFilters>(&prompt, timeout, false)
		.await
	{
		Ok(filters) => filters,
		Err(_) => PreGoogleBaseFilters::fallback(),
	}
}
