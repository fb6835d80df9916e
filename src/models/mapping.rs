use crate::models::query::LatLng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AfterGeocode {
	NearbySearch,
	TextSearchWithBias,
}

/// Closed tagged union (spec §3 "Route mapping" / §9 "Dynamic / duck
/// typing"): a discriminated sum with `providerMethod` as the tag. Every
/// downstream consumer must branch exhaustively on this enum.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "providerMethod")]
pub enum RouteMapping {
	#[serde(rename = "TEXTSEARCH")]
	TextSearch {
		text_query: String,
		region: String,
		language: String,
		bias: Option<LatLng>,
	},
	#[serde(rename = "NEARBY")]
	Nearby {
		location: LatLng,
		radius_meters: u32,
		keyword: String,
		region: String,
		language: String,
	},
	#[serde(rename = "LANDMARK")]
	Landmark {
		geocode_query: String,
		after_geocode: AfterGeocode,
		radius_meters: u32,
		keyword: String,
		region: String,
		language: String,
	},
}
