//! Places provider adapter (spec §4.I). `searchText`/`searchNearby` go
//! through raw `reqwest` so the outbound body is wire-exact — the
//! `includedTypes` plural-array invariant in particular does not survive a
//! generic request builder. Geocoding (LANDMARK route) reuses the existing
//! `google_maps` crate integration, grounded in
//! `src/controllers/fallback.rs`'s `gm_client.geocoding()` call.

use crate::error::PrivateError;
use crate::global::{PROVIDER_CACHE_TTL_SECONDS, PROVIDER_TIMEOUT_MS};
use crate::models::query::LatLng;
use crate::provider::cache::ProviderCache;
use crate::provider::timeout::{with_timeout, TimedOutOr};
use google_maps::Client as GeocodingClient;
use num_traits::cast::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const PLACES_BASE_URL: &str = "https://places.googleapis.com";
const SEARCH_FIELD_MASK: &str =
	"places.id,places.displayName,places.location,places.rating,places.userRatingCount,places.priceLevel,places.currentOpeningHours.openNow,places.photos,places.types";

#[derive(Debug, Clone, Serialize)]
struct Circle {
	circle: CircleBody,
}

#[derive(Debug, Clone, Serialize)]
struct CircleBody {
	center: LatLngLiteral,
	radius: f64,
}

#[derive(Debug, Clone, Serialize)]
struct LatLngLiteral {
	latitude: f64,
	longitude: f64,
}

#[derive(Debug, Clone, Serialize)]
struct SearchTextBody {
	#[serde(rename = "textQuery")]
	text_query: String,
	#[serde(rename = "languageCode")]
	language_code: String,
	#[serde(rename = "regionCode")]
	region_code: String,
	#[serde(rename = "includedTypes")]
	included_types: Vec<String>,
	#[serde(rename = "locationBias", skip_serializing_if = "Option::is_none")]
	location_bias: Option<Circle>,
}

#[derive(Debug, Clone, Serialize)]
struct SearchNearbyBody {
	#[serde(rename = "locationRestriction")]
	location_restriction: Circle,
	#[serde(rename = "languageCode")]
	language_code: String,
	#[serde(rename = "regionCode")]
	region_code: String,
	#[serde(rename = "includedTypes")]
	included_types: Vec<String>,
	#[serde(rename = "rankPreference")]
	rank_preference: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPlace {
	pub id: String,
	#[serde(rename = "displayName")]
	pub display_name: Option<RawDisplayName>,
	pub location: Option<RawLocation>,
	pub rating: Option<f32>,
	#[serde(rename = "userRatingCount")]
	pub user_rating_count: Option<u32>,
	#[serde(rename = "priceLevel")]
	pub price_level: Option<String>,
	#[serde(rename = "currentOpeningHours")]
	pub current_opening_hours: Option<RawOpeningHours>,
	pub photos: Option<Vec<RawPhoto>>,
	pub types: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDisplayName {
	pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLocation {
	pub latitude: f64,
	pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOpeningHours {
	#[serde(rename = "openNow")]
	pub open_now: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPhoto {
	pub name: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponseBody {
	#[serde(default)]
	places: Vec<RawPlace>,
}

/// Maps the textual `priceLevel` enum Places returns (`PRICE_LEVEL_FREE`
/// through `PRICE_LEVEL_VERY_EXPENSIVE`) to the 0-4 scale the rest of this
/// crate works with.
fn price_level_to_u8(level: &str) -> Option<u8> {
	match level {
		"PRICE_LEVEL_FREE" => Some(0),
		"PRICE_LEVEL_INEXPENSIVE" => Some(1),
		"PRICE_LEVEL_MODERATE" => Some(2),
		"PRICE_LEVEL_EXPENSIVE" => Some(3),
		"PRICE_LEVEL_VERY_EXPENSIVE" => Some(4),
		_ => None,
	}
}

impl RawPlace {
	pub fn into_place_result(self) -> crate::models::place::PlaceResult {
		crate::models::place::PlaceResult {
			id: self.id,
			name: self
				.display_name
				.map(|n| n.text)
				.unwrap_or_else(|| "".to_string()),
			location: self
				.location
				.map(|l| LatLng { lat: l.latitude, lng: l.longitude })
				.unwrap_or(LatLng { lat: 0.0, lng: 0.0 }),
			rating: self.rating,
			user_ratings_total: self.user_rating_count,
			price_level: self.price_level.as_deref().and_then(price_level_to_u8),
			open_now: self.current_opening_hours.and_then(|h| h.open_now),
			photo_references: self
				.photos
				.unwrap_or_default()
				.into_iter()
				.map(|p| p.name)
				.collect(),
			tags: self.types.unwrap_or_default(),
		}
	}
}

#[derive(Debug)]
pub enum GeocodeError {
	NotFound,
	Failed(String),
}

pub struct PlacesProvider {
	http: reqwest::Client,
	geocoding: GeocodingClient,
	api_key: String,
	cache: ProviderCache<Value>,
}

impl PlacesProvider {
	pub fn new(api_key: impl Into<String>) -> Result<Self, PrivateError> {
		let api_key = api_key.into();
		let geocoding = GeocodingClient::try_new(api_key.clone())
			.map_err(|e| PrivateError::Internal(format!("failed to build geocoding client: {e}")))?;
		Ok(PlacesProvider {
			http: reqwest::Client::new(),
			geocoding,
			api_key,
			cache: ProviderCache::new(chrono::Duration::seconds(PROVIDER_CACHE_TTL_SECONDS)),
		})
	}

	/// Resolves a free-text location (LANDMARK route) to coordinates.
	/// A geocoding miss maps to `failureReason=GEOCODING_FAILED` at the
	/// orchestrator layer, never to a silent zero-result success.
	pub async fn geocode(&self, query: &str) -> Result<LatLng, GeocodeError> {
		let timeout = Duration::from_millis(PROVIDER_TIMEOUT_MS);
		let call = self.geocoding.geocoding().with_address(query).execute();
		let response = match with_timeout(timeout, async { call.await.map_err(|e| e.to_string()) }).await {
			Ok(response) => response,
			Err(TimedOutOr::TimedOut) => return Err(GeocodeError::Failed("geocoding timed out".to_string())),
			Err(TimedOutOr::Err(detail)) => return Err(GeocodeError::Failed(detail)),
		};
		if !matches!(response.status, google_maps::geocoding::Status::Ok) {
			return Err(GeocodeError::Failed(format!("geocoding status {}", response.status)));
		}
		let Some(first) = response.results.into_iter().next() else {
			return Err(GeocodeError::NotFound);
		};
		let lat = first.geometry.location.lat.to_f64().ok_or(GeocodeError::NotFound)?;
		let lng = first.geometry.location.lng.to_f64().ok_or(GeocodeError::NotFound)?;
		Ok(LatLng { lat, lng })
	}

	pub async fn search_text(
		&self,
		text_query: &str,
		region: &str,
		language: &str,
		bias: Option<LatLng>,
	) -> Result<Vec<RawPlace>, PrivateError> {
		let body = SearchTextBody {
			text_query: text_query.to_string(),
			language_code: language.to_string(),
			region_code: region.to_string(),
			included_types: vec!["restaurant".to_string()],
			location_bias: bias.map(|center| Circle {
				circle: CircleBody {
					center: LatLngLiteral { latitude: center.lat, longitude: center.lng },
					radius: 5_000.0,
				},
			}),
		};
		self.post("searchText", &body).await
	}

	pub async fn search_nearby(
		&self,
		location: LatLng,
		radius_meters: f64,
		region: &str,
		language: &str,
	) -> Result<Vec<RawPlace>, PrivateError> {
		let body = SearchNearbyBody {
			location_restriction: Circle {
				circle: CircleBody {
					center: LatLngLiteral { latitude: location.lat, longitude: location.lng },
					radius: radius_meters,
				},
			},
			language_code: language.to_string(),
			region_code: region.to_string(),
			included_types: vec!["restaurant".to_string()],
			rank_preference: "DISTANCE".to_string(),
		};
		self.post("searchNearby", &body).await
	}

	/// Streams photo bytes for the photo proxy (spec §6 `/photos`). The API
	/// key lives only in the outbound request; it never reaches the response
	/// body or any URL handed back to a client.
	pub async fn fetch_photo(&self, photo_reference: &str, max_width_px: u32) -> Result<(Vec<u8>, String), PrivateError> {
		let timeout = Duration::from_millis(PROVIDER_TIMEOUT_MS);
		let url = format!("{PLACES_BASE_URL}/v1/{photo_reference}/media");
		let request = self
			.http
			.get(url)
			.query(&[("maxWidthPx", max_width_px.to_string().as_str()), ("key", &self.api_key)])
			.send();

		let response = match with_timeout(timeout, async { request.await.map_err(|e| e.to_string()) }).await {
			Ok(response) => response,
			Err(TimedOutOr::TimedOut) => return Err(PrivateError::ProviderTransport("photo fetch timed out".to_string())),
			Err(TimedOutOr::Err(detail)) => return Err(PrivateError::ProviderTransport(detail)),
		};

		let status = response.status();
		if !status.is_success() {
			return Err(PrivateError::ProviderHttp { status: status.as_u16(), body: String::new() });
		}
		let content_type = response
			.headers()
			.get(reqwest::header::CONTENT_TYPE)
			.and_then(|v| v.to_str().ok())
			.unwrap_or("image/jpeg")
			.to_string();
		let bytes = response
			.bytes()
			.await
			.map_err(|e| PrivateError::ProviderTransport(format!("could not read photo bytes: {e}")))?;
		Ok((bytes.to_vec(), content_type))
	}

	async fn post<B: Serialize>(&self, method: &str, body: &B) -> Result<Vec<RawPlace>, PrivateError> {
		let normalised_body = serde_json::to_string(body)
			.map_err(|e| PrivateError::Internal(format!("could not normalise {method} request body: {e}")))?;
		let cache_key = ProviderCache::<Value>::key(method, &normalised_body);
		if let Some(cached) = self.cache.get(&cache_key) {
			let places: Vec<RawPlace> = serde_json::from_value(cached)
				.map_err(|e| PrivateError::Internal(format!("could not decode cached {method} response: {e}")))?;
			return Ok(places);
		}

		let timeout = Duration::from_millis(PROVIDER_TIMEOUT_MS);
		let request = self
			.http
			.post(format!("{PLACES_BASE_URL}/v1/places:{method}"))
			.header("X-Goog-Api-Key", &self.api_key)
			.header("X-Goog-FieldMask", SEARCH_FIELD_MASK)
			.json(body)
			.send();

		let response = match with_timeout(timeout, async { request.await.map_err(|e| e.to_string()) }).await {
			Ok(response) => response,
			Err(TimedOutOr::TimedOut) => {
				return Err(PrivateError::ProviderTransport(format!("{method} timed out")));
			}
			Err(TimedOutOr::Err(detail)) => return Err(PrivateError::ProviderTransport(detail)),
		};

		let status = response.status();
		if !status.is_success() {
			// HTTP non-2xx is a FAILURE, never reported as empty success (spec §4.I).
			let text = response.text().await.unwrap_or_default();
			return Err(PrivateError::ProviderHttp { status: status.as_u16(), body: text });
		}

		let parsed: SearchResponseBody = response
			.json()
			.await
			.map_err(|e| PrivateError::ProviderTransport(format!("could not decode {method} response: {e}")))?;
		if let Ok(value) = serde_json::to_value(&parsed.places) {
			self.cache.put(cache_key, value);
		}
		Ok(parsed.places)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn cached_request_body_returns_without_a_live_call() {
		let provider = PlacesProvider::new("test-api-key").unwrap();
		let body = SearchTextBody {
			text_query: "pizza".to_string(),
			language_code: "en".to_string(),
			region_code: "IL".to_string(),
			included_types: vec!["restaurant".to_string()],
			location_bias: None,
		};
		let normalised_body = serde_json::to_string(&body).unwrap();
		let cache_key = ProviderCache::<Value>::key("searchText", &normalised_body);
		let cached_place = RawPlace {
			id: "cached-place".to_string(),
			display_name: Some(RawDisplayName { text: "Cached Pizza".to_string() }),
			location: None,
			rating: None,
			user_rating_count: None,
			price_level: None,
			current_opening_hours: None,
			photos: None,
			types: None,
		};
		provider.cache.put(cache_key, serde_json::to_value(vec![cached_place]).unwrap());

		let places = provider.post("searchText", &body).await.unwrap();
		assert_eq!(places.len(), 1);
		assert_eq!(places[0].id, "cached-place");
	}

	#[test]
	fn price_level_maps_known_enum_values() {
		assert_eq!(price_level_to_u8("PRICE_LEVEL_FREE"), Some(0));
		assert_eq!(price_level_to_u8("PRICE_LEVEL_VERY_EXPENSIVE"), Some(4));
		assert_eq!(price_level_to_u8("PRICE_LEVEL_UNSPECIFIED"), None);
	}

	#[test]
	fn search_text_body_serialises_included_types_as_plural_array() {
		let body = SearchTextBody {
			text_query: "pizza".to_string(),
			language_code: "he".to_string(),
			region_code: "IL".to_string(),
			included_types: vec!["restaurant".to_string()],
			location_bias: None,
		};
		let json = serde_json::to_value(&body).unwrap();
		assert_eq!(json["includedTypes"], serde_json::json!(["restaurant"]));
		assert!(json.get("includedType").is_none());
	}

	#[test]
	fn search_nearby_body_ranks_by_distance() {
		let body = SearchNearbyBody {
			location_restriction: Circle {
				circle: CircleBody { center: LatLngLiteral { latitude: 32.0, longitude: 34.7 }, radius: 1_000.0 },
			},
			language_code: "en".to_string(),
			region_code: "IL".to_string(),
			included_types: vec!["restaurant".to_string()],
			rank_preference: "DISTANCE".to_string(),
		};
		let json = serde_json::to_value(&body).unwrap();
		assert_eq!(json["rankPreference"], "DISTANCE");
	}

	#[test]
	fn raw_place_converts_to_place_result_with_opaque_photo_refs() {
		let raw = RawPlace {
			id: "place-1".to_string(),
			display_name: Some(RawDisplayName { text: "Pizza Place".to_string() }),
			location: Some(RawLocation { latitude: 32.1, longitude: 34.8 }),
			rating: Some(4.5),
			user_rating_count: Some(120),
			price_level: Some("PRICE_LEVEL_MODERATE".to_string()),
			current_opening_hours: Some(RawOpeningHours { open_now: Some(true) }),
			photos: Some(vec![RawPhoto { name: "places/place-1/photos/abc".to_string() }]),
			types: Some(vec!["restaurant".to_string()]),
		};
		let result = raw.into_place_result();
		assert_eq!(result.price_level, Some(2));
		assert_eq!(result.photo_references, vec!["places/place-1/photos/abc".to_string()]);
	}
}
