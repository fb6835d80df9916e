use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct LatLng {
	pub lat: f64,
	pub lng: f64,
}

/// Raw input to the orchestrator (spec §3 "Query input").
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueryInput {
	pub query: String,
	#[serde(default)]
	pub user_location: Option<LatLng>,
	#[serde(default)]
	pub city_text: Option<String>,
	#[serde(default)]
	pub locale: Option<String>,
}
