use serde::{Deserialize, Serialize};

/// `meta.failureReason` taxonomy (spec §4.L).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureReason {
	None,
	NoResults,
	LowConfidence,
	GeocodingFailed,
	GoogleApiError,
	Timeout,
	QuotaExceeded,
	LiveDataUnavailable,
	WeakMatches,
	LocationRequired,
}
