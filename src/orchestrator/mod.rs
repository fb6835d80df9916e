//! Central sequencer (spec §4.L). `run()` is the single entry point the
//! search controller calls for both sync and async modes; everything push-
//! related is a side effect published through `PushChannel`, never part of
//! the return value.

pub mod messages;

use crate::error::{ApiResult, AppError, PrivateError, PublicError, PublicErrorKind};
use crate::filters::{apply_post_filters, extract_shared_filters, tighten_filters};
use crate::global::{
	GATE_TIMEOUT_MS, INTENT_TIMEOUT_MS, MAPPER_LANDMARK_TIMEOUT_MS, MAPPER_NEARBY_TIMEOUT_MS,
	MAPPER_TEXTSEARCH_TIMEOUT_MS,
};
use crate::http_models::push::PushEvent;
use crate::http_models::search::{Assist, QueryEcho, SearchMeta, SearchResponse};
use crate::llm::{prompts, LlmClient};
use crate::models::failure::FailureReason;
use crate::models::gate::{GateDecision, GateResult};
use crate::models::intent::{IntentResult, Route};
use crate::models::language::AssistantLanguage;
use crate::models::mapping::{AfterGeocode, RouteMapping};
use crate::models::place::PlaceResult;
use crate::models::query::{LatLng, QueryInput};
use crate::provider::google::PlacesProvider;
use crate::push::PushChannel;
use crate::ranker::{self, RankContext, RankWeights};
use messages::{assistant_message, to_wire, AssistantMessageKind};
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Fire-and-forget enrichment kickoff (spec §4.L stage 9, §4.M). Defined
/// here so the orchestrator can depend on the interface without depending
/// on the worker implementation; `crate::enrichment` provides the concrete
/// type.
pub trait EnrichmentKickoff: Send + Sync {
	fn kickoff(&self, request_id: &str, session_id: &str, city: Option<&str>, places: &[PlaceResult]);
}

pub struct OrchestratorContext {
	pub llm: Arc<LlmClient>,
	pub provider: Arc<PlacesProvider>,
	pub push: Arc<PushChannel>,
	pub enrichment: Arc<dyn EnrichmentKickoff>,
	pub default_region: String,
}

pub struct RunRequest {
	pub request_id: String,
	pub session_id: String,
	pub query: QueryInput,
	pub ui_language: Option<AssistantLanguage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGateOutput {
	food_signal: bool,
	language: AssistantLanguage,
	region: Option<String>,
	confidence: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTextSearchOutput {
	text_query: String,
	region: String,
	language: String,
	bias: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNearbyOutput {
	radius_meters: u32,
	keyword: String,
	region: String,
	language: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLandmarkOutput {
	geocode_query: String,
	after_geocode: AfterGeocode,
	radius_meters: u32,
	keyword: String,
	region: String,
	language: String,
}

/// Absolute-priority language resolution (spec §4.L stage 1 / §4.F): a
/// Hebrew-script query always wins; otherwise the UI hint or the gate's own
/// classification can distinguish a non-Hebrew language, falling back to
/// English.
fn resolve_assistant_language(
	query_language: AssistantLanguage,
	ui_language: Option<AssistantLanguage>,
	gate_language: AssistantLanguage,
) -> AssistantLanguage {
	if matches!(query_language, AssistantLanguage::He) {
		return AssistantLanguage::He;
	}
	ui_language.unwrap_or(gate_language)
}

fn publish_assistant(
	push: &PushChannel,
	request_id: &str,
	session_id: &str,
	language: AssistantLanguage,
	kind: AssistantMessageKind,
	message: String,
) {
	let (wire_kind, blocks_search) = to_wire(kind);
	push.publish(
		&("assistant".to_string(), request_id.to_string(), session_id.to_string()),
		PushEvent::Assistant {
			request_id: request_id.to_string(),
			assistant_language: language.as_str().to_string(),
			kind: wire_kind,
			message,
			question: None,
			blocks_search,
		},
	);
}

fn early_response(
	request_id: &str,
	query: &str,
	language: AssistantLanguage,
	assist_kind: &str,
	message: String,
	failure_reason: FailureReason,
	started_at: Instant,
) -> SearchResponse {
	SearchResponse {
		request_id: request_id.to_string(),
		query: QueryEcho {
			original: query.to_string(),
			parsed: None,
			language: language.as_str().to_string(),
		},
		results: Vec::new(),
		chips: Vec::new(),
		assist: Some(Assist { kind: assist_kind.to_string(), message }),
		meta: SearchMeta {
			took_ms: started_at.elapsed().as_millis() as u64,
			mode: "BLOCKED".to_string(),
			confidence: 0.0,
			applied_filters: Default::default(),
			relaxed_filters: Default::default(),
			source: "gate".to_string(),
			failure_reason,
		},
	}
}

/// Central sequencer (spec §4.L). Guard-triggered early exits (STOP,
/// CLARIFY, missing location anchor) are NOT errors — they return a 200-
/// shaped response with `assist` set and an empty result set. A real
/// transport/provider failure after the guards pass is the only path that
/// returns `Err`.
pub async fn run(ctx: &OrchestratorContext, request: RunRequest) -> ApiResult<SearchResponse> {
	let started_at = Instant::now();
	let query_language = crate::util::language_detect::detect_query_language(&request.query.query);

	// Stage 2: gate. No downstream LLM call is started before this guard
	// passes (spec §4.L stage 2, principal cost saver).
	let gate_timeout = Duration::from_millis(GATE_TIMEOUT_MS);
	let gate_prompt = prompts::gate_prompt(&request.query.query, request.query.locale.as_deref());
	let (gate, decision): (RawGateOutput, GateDecision) =
		match ctx.llm.complete_json::<RawGateOutput>(&gate_prompt, gate_timeout).await {
			Ok(raw) => {
				let decision = GateResult::decide(raw.food_signal, raw.confidence);
				(raw, decision)
			}
			Err(err) => {
				warn!(error = ?err, "gate classifier exhausted retry, continuing with confidence=0");
				let raw = RawGateOutput { food_signal: true, language: query_language, region: None, confidence: 0.0 };
				(raw, GateDecision::Continue)
			}
		};
	let assistant_language = resolve_assistant_language(query_language, request.ui_language, gate.language);

	match decision {
		GateDecision::Stop => {
			let message = assistant_message(AssistantMessageKind::Stop, assistant_language);
			publish_assistant(&ctx.push, &request.request_id, &request.session_id, assistant_language, AssistantMessageKind::Stop, message.clone());
			return Ok(early_response(
				&request.request_id,
				&request.query.query,
				assistant_language,
				"STOP",
				message,
				FailureReason::None,
				started_at,
			));
		}
		GateDecision::Clarify => {
			let message = assistant_message(AssistantMessageKind::ClarifyLowConfidence, assistant_language);
			publish_assistant(&ctx.push, &request.request_id, &request.session_id, assistant_language, AssistantMessageKind::ClarifyLowConfidence, message.clone());
			return Ok(early_response(
				&request.request_id,
				&request.query.query,
				assistant_language,
				"CLARIFY",
				message,
				FailureReason::LowConfidence,
				started_at,
			));
		}
		GateDecision::Continue => {}
	}

	// Stage 3: deterministic near-me pre-check, ahead of the intent call.
	let is_near_me = crate::util::near_me::is_near_me_query(&request.query.query);
	if is_near_me && request.query.user_location.is_none() {
		let message = assistant_message(AssistantMessageKind::ClarifyLocationRequired, assistant_language);
		publish_assistant(&ctx.push, &request.request_id, &request.session_id, assistant_language, AssistantMessageKind::ClarifyLocationRequired, message.clone());
		return Ok(early_response(
			&request.request_id,
			&request.query.query,
			assistant_language,
			"CLARIFY",
			message,
			FailureReason::LocationRequired,
			started_at,
		));
	}

	// Stage 4: intent.
	let intent_timeout = Duration::from_millis(INTENT_TIMEOUT_MS);
	let intent_prompt = prompts::intent_prompt(&request.query.query, gate.region.as_deref());
	let mut intent: IntentResult = ctx.llm.complete_json::<IntentResult>(&intent_prompt, intent_timeout).await?;
	if is_near_me {
		intent.route = Route::Nearby;
	}

	if matches!(intent.route, Route::Textsearch) {
		let has_anchor = request.query.city_text.is_some()
			|| request.query.user_location.is_some()
			|| intent.region.is_some();
		if !has_anchor {
			let message = assistant_message(AssistantMessageKind::ClarifyMissingAnchor, assistant_language);
			publish_assistant(&ctx.push, &request.request_id, &request.session_id, assistant_language, AssistantMessageKind::ClarifyMissingAnchor, message.clone());
			return Ok(early_response(
				&request.request_id,
				&request.query.query,
				assistant_language,
				"CLARIFY",
				message,
				FailureReason::LocationRequired,
				started_at,
			));
		}
	}
	if matches!(intent.route, Route::Nearby) && request.query.user_location.is_none() {
		let message = assistant_message(AssistantMessageKind::ClarifyLocationRequired, assistant_language);
		publish_assistant(&ctx.push, &request.request_id, &request.session_id, assistant_language, AssistantMessageKind::ClarifyLocationRequired, message.clone());
		return Ok(early_response(
			&request.request_id,
			&request.query.query,
			assistant_language,
			"CLARIFY",
			message,
			FailureReason::LocationRequired,
			started_at,
		));
	}

	// Stage 5: route mapper (one more location guard for NEARBY, repeated
	// per spec §4.L stage 5 since the mapper is a second, independent call).
	let route_mapping = map_route(ctx, &request, &intent, assistant_language).await?;

	// Stage 6: parallel fan-out — shared-filters extractor + provider call —
	// only after every early guard has passed.
	let route_label = route_label(&intent.route);
	let (base_filters, raw_places) = tokio::join!(
		extract_shared_filters(&ctx.llm, &request.query.query, route_label),
		call_provider(ctx, &route_mapping)
	);
	let raw_places = raw_places?;

	let final_filters = tighten_filters(&base_filters, request.ui_language, assistant_language, &ctx.default_region);
	let places: Vec<PlaceResult> = raw_places.into_iter().map(|p| p.into_place_result()).collect();

	// Stage 7: post-filter + rank.
	let outcome = apply_post_filters(&places, &final_filters);
	let rank_ctx = RankContext {
		weights: adjusted_weights(&request, &final_filters),
		user_location: request.query.user_location,
		open_now_requested: matches!(final_filters.open_state, Some(crate::models::filters::OpenState::OpenNow)),
		cuisine_scores: None,
	};
	let ranked = ranker::rank(outcome.filtered, &rank_ctx);

	let failure_reason = if ranked.is_empty() { FailureReason::NoResults } else { FailureReason::None };
	let summary_kind = if ranked.is_empty() {
		AssistantMessageKind::Failure(FailureReason::NoResults)
	} else {
		AssistantMessageKind::Summary
	};
	let assist = Some(Assist {
		kind: "SUMMARY".to_string(),
		message: assistant_message(summary_kind, assistant_language),
	});

	// Stage 9: enrichment kickoff, non-blocking.
	if !ranked.is_empty() {
		ctx.enrichment.kickoff(&request.request_id, &request.session_id, request.query.city_text.as_deref(), &ranked);
	}

	ctx.push.publish(
		&("search".to_string(), request.request_id.clone(), request.session_id.clone()),
		PushEvent::Ready { request_id: request.request_id.clone() },
	);
	if let Some(assist) = &assist {
		let narration = assistant_message(AssistantMessageKind::GenericQueryNarration, assistant_language);
		publish_assistant(
			&ctx.push,
			&request.request_id,
			&request.session_id,
			assistant_language,
			AssistantMessageKind::GenericQueryNarration,
			narration,
		);
		publish_assistant(&ctx.push, &request.request_id, &request.session_id, assistant_language, summary_kind, assist.message.clone());
	}

	info!(request_id = %request.request_id, route = route_label, results = ranked.len(), "search completed");

	Ok(SearchResponse {
		request_id: request.request_id.clone(),
		query: QueryEcho {
			original: request.query.query.clone(),
			parsed: Some(route_label.to_string()),
			language: assistant_language.as_str().to_string(),
		},
		results: ranked,
		chips: Vec::new(),
		assist,
		meta: SearchMeta {
			took_ms: started_at.elapsed().as_millis() as u64,
			mode: route_label.to_string(),
			confidence: intent.confidence,
			applied_filters: outcome.applied,
			relaxed_filters: outcome.relaxed,
			source: "google_places".to_string(),
			failure_reason,
		},
	})
}

fn route_label(route: &Route) -> &'static str {
	match route {
		Route::Textsearch => "TEXTSEARCH",
		Route::Nearby => "NEARBY",
		Route::Landmark => "LANDMARK",
	}
}

/// Choke point (spec §4.K / DESIGN.md Open Question 2): the only place in
/// the crate that zeroes a ranking weight. The ranker itself never
/// re-derives these.
fn adjusted_weights(request: &RunRequest, filters: &crate::models::filters::FinalFilters) -> RankWeights {
	let mut weights = RankWeights::base();
	if request.query.user_location.is_none() {
		weights.distance = 0.0;
	}
	if matches!(filters.open_state, Some(crate::models::filters::OpenState::OpenNow)) {
		weights.open_state = 0.0;
	}
	weights.cuisine = 0.0;
	weights
}

async fn map_route(
	ctx: &OrchestratorContext,
	request: &RunRequest,
	intent: &IntentResult,
	assistant_language: AssistantLanguage,
) -> ApiResult<RouteMapping> {
	match intent.route {
		Route::Textsearch => {
			let timeout = Duration::from_millis(MAPPER_TEXTSEARCH_TIMEOUT_MS);
			let prompt = prompts::textsearch_mapper_prompt(&request.query.query, assistant_language.as_str());
			let raw: RawTextSearchOutput = ctx.llm.complete_json_with_retry(&prompt, timeout, false).await?;
			Ok(RouteMapping::TextSearch {
				text_query: raw.text_query,
				region: raw.region,
				language: raw.language,
				bias: raw.bias.or(request.query.user_location),
			})
		}
		Route::Nearby => {
			let Some(location) = request.query.user_location else {
				return Err(PublicError::new(PublicErrorKind::InputInvalid, "NEARBY route requires a user location").into());
			};
			let timeout = Duration::from_millis(MAPPER_NEARBY_TIMEOUT_MS);
			let prompt = prompts::nearby_mapper_prompt(&request.query.query, location.lat, location.lng, assistant_language.as_str());
			let raw: RawNearbyOutput = ctx.llm.complete_json_with_retry(&prompt, timeout, true).await?;
			Ok(RouteMapping::Nearby {
				location,
				radius_meters: raw.radius_meters,
				keyword: raw.keyword,
				region: raw.region,
				language: raw.language,
			})
		}
		Route::Landmark => {
			let timeout = Duration::from_millis(MAPPER_LANDMARK_TIMEOUT_MS);
			let prompt = prompts::landmark_mapper_prompt(&request.query.query, assistant_language.as_str());
			let raw: RawLandmarkOutput = ctx.llm.complete_json_with_retry(&prompt, timeout, false).await?;
			Ok(RouteMapping::Landmark {
				geocode_query: raw.geocode_query,
				after_geocode: raw.after_geocode,
				radius_meters: raw.radius_meters,
				keyword: raw.keyword,
				region: raw.region,
				language: raw.language,
			})
		}
	}
}

async fn call_provider(
	ctx: &OrchestratorContext,
	mapping: &RouteMapping,
) -> ApiResult<Vec<crate::provider::google::RawPlace>> {
	match mapping {
		RouteMapping::TextSearch { text_query, region, language, bias } => Ok(ctx
			.provider
			.search_text(text_query, region, language, *bias)
			.await?),
		RouteMapping::Nearby { location, radius_meters, region, language, .. } => Ok(ctx
			.provider
			.search_nearby(*location, *radius_meters as f64, region, language)
			.await?),
		RouteMapping::Landmark { geocode_query, after_geocode, radius_meters, region, language, .. } => {
			let anchor = ctx.provider.geocode(geocode_query).await.map_err(|e| {
				let detail = match e {
					crate::provider::google::GeocodeError::NotFound => "no geocoding results".to_string(),
					crate::provider::google::GeocodeError::Failed(detail) => detail,
				};
				AppError::from(PrivateError::ProviderTransport(format!("geocoding failed: {detail}")))
			})?;
			match after_geocode {
				AfterGeocode::NearbySearch => Ok(ctx
					.provider
					.search_nearby(anchor, *radius_meters as f64, region, language)
					.await?),
				AfterGeocode::TextSearchWithBias => Ok(ctx
					.provider
					.search_text(geocode_query, region, language, Some(anchor))
					.await?),
			}
		}
	}
}
