//! Ranker (spec §4.K): a pure consumer of already-resolved weights. Weight
//! adjustment (zeroing distance/open-state/cuisine when their inputs are
//! absent) happens exactly once, in the orchestrator's single choke point —
//! this module never re-adjusts or re-derives a weight, only scores and
//! sorts with what it is handed.

use crate::models::place::PlaceResult;
use crate::models::query::LatLng;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankWeights {
	pub distance: f64,
	pub rating: f64,
	pub open_state: f64,
	pub cuisine: f64,
}

impl RankWeights {
	/// Base weights before the orchestrator's choke-point adjustments.
	pub fn base() -> Self {
		RankWeights { distance: 0.35, rating: 0.35, open_state: 0.2, cuisine: 0.1 }
	}
}

impl Default for RankWeights {
	fn default() -> Self {
		Self::base()
	}
}

pub struct RankContext {
	pub weights: RankWeights,
	pub user_location: Option<LatLng>,
	pub open_now_requested: bool,
	pub cuisine_scores: Option<std::collections::HashMap<String, f64>>,
}

/// Great-circle distance in meters (haversine), used only to build a 0..1
/// proximity score — never returned to the client.
fn haversine_meters(a: LatLng, b: LatLng) -> f64 {
	const EARTH_RADIUS_M: f64 = 6_371_000.0;
	let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
	let d_lat = (b.lat - a.lat).to_radians();
	let d_lng = (b.lng - a.lng).to_radians();
	let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
	2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

fn proximity_score(user: LatLng, place: LatLng) -> f64 {
	const SCORE_RADIUS_M: f64 = 5_000.0;
	let distance = haversine_meters(user, place);
	(1.0 - (distance / SCORE_RADIUS_M)).clamp(0.0, 1.0)
}

fn rating_score(place: &PlaceResult) -> f64 {
	(place.rating.unwrap_or(0.0) as f64 / 5.0).clamp(0.0, 1.0)
}

fn open_state_score(place: &PlaceResult, open_now_requested: bool) -> f64 {
	if !open_now_requested {
		return 0.0;
	}
	match place.open_now {
		Some(true) => 1.0,
		Some(false) => 0.0,
		None => 0.5,
	}
}

fn cuisine_score(place: &PlaceResult, scores: &Option<std::collections::HashMap<String, f64>>) -> f64 {
	scores.as_ref().and_then(|m| m.get(&place.id)).copied().unwrap_or(0.0).clamp(0.0, 1.0)
}

/// Scores and sorts (descending), breaking ties by `id` for determinism.
pub fn rank(results: Vec<PlaceResult>, ctx: &RankContext) -> Vec<PlaceResult> {
	if ctx.weights != RankWeights::base() {
		info!(
			distance = ctx.weights.distance,
			rating = ctx.weights.rating,
			open_state = ctx.weights.open_state,
			cuisine = ctx.weights.cuisine,
			"ranking_weights_final"
		);
	}

	let mut scored: Vec<(f64, PlaceResult)> = results
		.into_iter()
		.map(|place| {
			let distance = ctx
				.user_location
				.map(|user| proximity_score(user, place.location))
				.unwrap_or(0.0);
			let score = ctx.weights.distance * distance
				+ ctx.weights.rating * rating_score(&place)
				+ ctx.weights.open_state * open_state_score(&place, ctx.open_now_requested)
				+ ctx.weights.cuisine * cuisine_score(&place, &ctx.cuisine_scores);
			(score, place)
		})
		.collect();

	scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.1.id.cmp(&b.1.id)));
	scored.into_iter().map(|(_, place)| place).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn place(id: &str, lat: f64, lng: f64, rating: Option<f32>) -> PlaceResult {
		PlaceResult {
			id: id.to_string(),
			name: id.to_string(),
			location: LatLng { lat, lng },
			rating,
			user_ratings_total: None,
			price_level: None,
			open_now: None,
			photo_references: vec![],
			tags: vec![],
		}
	}

	#[test]
	fn closer_place_ranks_above_farther_one_with_equal_rating() {
		let user = LatLng { lat: 32.0, lng: 34.8 };
		let near = place("near", 32.0005, 34.8, Some(4.0));
		let far = place("far", 32.05, 34.8, Some(4.0));
		let ctx = RankContext {
			weights: RankWeights::base(),
			user_location: Some(user),
			open_now_requested: false,
			cuisine_scores: None,
		};
		let ranked = rank(vec![far, near], &ctx);
		assert_eq!(ranked[0].id, "near");
	}

	#[test]
	fn zero_distance_weight_ignores_location_entirely() {
		let user = LatLng { lat: 32.0, lng: 34.8 };
		let near = place("near", 32.0005, 34.8, Some(3.0));
		let far = place("far", 32.05, 34.8, Some(4.5));
		let ctx = RankContext {
			weights: RankWeights { distance: 0.0, rating: 1.0, open_state: 0.0, cuisine: 0.0 },
			user_location: Some(user),
			open_now_requested: false,
			cuisine_scores: None,
		};
		let ranked = rank(vec![near, far], &ctx);
		assert_eq!(ranked[0].id, "far");
	}

	#[test]
	fn ties_break_by_id_for_determinism() {
		let a = place("a", 0.0, 0.0, None);
		let b = place("b", 0.0, 0.0, None);
		let ctx = RankContext {
			weights: RankWeights { distance: 0.0, rating: 0.0, open_state: 0.0, cuisine: 0.0 },
			user_location: None,
			open_now_requested: false,
			cuisine_scores: None,
		};
		let ranked = rank(vec![b, a], &ctx);
		assert_eq!(ranked[0].id, "a");
		assert_eq!(ranked[1].id, "b");
	}
}
