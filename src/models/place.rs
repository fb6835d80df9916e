use crate::models::query::LatLng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Normalized place result (spec §3 "Place result"). `photo_references`
/// holds only opaque provider-internal identifiers — never a signed URL or
/// an embedded API key (spec §9 open question resolution, §6 photos).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceResult {
	pub id: String,
	pub name: String,
	pub location: LatLng,
	pub rating: Option<f32>,
	pub user_ratings_total: Option<u32>,
	pub price_level: Option<u8>,
	pub open_now: Option<bool>,
	pub photo_references: Vec<String>,
	pub tags: Vec<String>,
}
