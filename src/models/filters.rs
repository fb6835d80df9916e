use crate::models::language::{FinalLanguage, PreGoogleLanguage};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpenState {
	OpenNow,
	OpenAt,
	OpenBetween,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceIntent {
	Cheap,
	Mid,
	Expensive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum MinRatingBucket {
	R35,
	R40,
	R45,
}

impl MinRatingBucket {
	pub fn threshold(self) -> f32 {
		match self {
			MinRatingBucket::R35 => 3.5,
			MinRatingBucket::R40 => 4.0,
			MinRatingBucket::R45 => 4.5,
		}
	}
}

/// `PreGoogleBaseFilters` (spec §3): the raw, LLM-extracted filter signal
/// before deterministic tightening.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreGoogleBaseFilters {
	pub language: PreGoogleLanguage,
	pub open_state: Option<OpenState>,
	pub open_at: Option<String>,
	pub open_between: Option<(String, String)>,
	pub region_hint: Option<String>,
	pub price_intent: Option<PriceIntent>,
	pub min_rating_bucket: Option<MinRatingBucket>,
}

impl PreGoogleBaseFilters {
	/// The safe fallback returned by the extractor on any failure or timeout
	/// (spec §4.E) — never blocks the pipeline.
	pub fn fallback() -> Self {
		PreGoogleBaseFilters {
			language: PreGoogleLanguage::Auto,
			open_state: None,
			open_at: None,
			open_between: None,
			region_hint: None,
			price_intent: None,
			min_rating_bucket: None,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disclaimers {
	pub hours: bool,
	pub dietary: bool,
}

impl Default for Disclaimers {
	fn default() -> Self {
		Disclaimers {
			hours: true,
			dietary: true,
		}
	}
}

/// `FinalFilters` (spec §3): the deterministically tightened value used by
/// the provider adapter and post-filter engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalFilters {
	pub language: FinalLanguage,
	pub open_state: Option<OpenState>,
	pub open_at: Option<String>,
	pub open_between: Option<(String, String)>,
	pub region_code: String,
	pub price_intent: Option<PriceIntent>,
	pub min_rating_bucket: Option<MinRatingBucket>,
	pub disclaimers: Disclaimers,
}

/// Which filters were actually enforced after auto-relax (spec §4.J).
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFilters {
	pub open_state: Option<OpenState>,
	pub price_intent: Option<PriceIntent>,
	pub min_rating_bucket: Option<MinRatingBucket>,
}

/// Which filters were dropped by auto-relax because they emptied the result
/// set (spec §4.J, invariant 3/4).
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelaxedFilters {
	pub open_state: bool,
	pub price_intent: bool,
	pub min_rating: bool,
}
