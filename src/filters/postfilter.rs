use crate::models::filters::{AppliedFilters, FinalFilters, OpenState, PriceIntent, RelaxedFilters};
use crate::models::place::PlaceResult;

pub struct PostFilterOutcome {
	pub filtered: Vec<PlaceResult>,
	pub applied: AppliedFilters,
	pub relaxed: RelaxedFilters,
}

/// `applyPostFilters` (spec §4.J): pure, deterministic, with sequential
/// auto-relax. Filters are applied in a fixed order — open-state, price,
/// rating — and a filter that would empty a non-empty set is dropped
/// (recorded in `relaxed`) rather than applied (spec invariant 3/4).
pub fn apply_post_filters(results: &[PlaceResult], filters: &FinalFilters) -> PostFilterOutcome {
	let mut current = results.to_vec();
	let mut applied = AppliedFilters::default();
	let mut relaxed = RelaxedFilters::default();

	if let Some(open_state) = filters.open_state {
		let next = filter_open_state(&current, open_state);
		if next.is_empty() && !current.is_empty() {
			relaxed.open_state = true;
		} else {
			applied.open_state = Some(open_state);
			current = next;
		}
	}

	if let Some(price_intent) = filters.price_intent {
		let next = filter_price(&current, price_intent);
		if next.is_empty() && !current.is_empty() {
			relaxed.price_intent = true;
		} else {
			applied.price_intent = Some(price_intent);
			current = next;
		}
	}

	if let Some(min_rating) = filters.min_rating_bucket {
		let threshold = min_rating.threshold();
		let next: Vec<PlaceResult> = current
			.iter()
			.filter(|p| p.rating.map(|r| r >= threshold).unwrap_or(true))
			.cloned()
			.collect();
		if next.is_empty() && !current.is_empty() {
			relaxed.min_rating = true;
		} else {
			applied.min_rating_bucket = Some(min_rating);
			current = next;
		}
	}

	PostFilterOutcome {
		filtered: current,
		applied,
		relaxed,
	}
}

fn filter_open_state(results: &[PlaceResult], open_state: OpenState) -> Vec<PlaceResult> {
	// Unknown openNow is always KEEP (conservative policy, spec §4.J.1).
	// OPEN_AT / OPEN_BETWEEN have no hours-table input in this data model
	// yet, so they degrade to the same keep-unknown policy as OPEN_NOW.
	match open_state {
		OpenState::OpenNow | OpenState::OpenAt | OpenState::OpenBetween => results
			.iter()
			.filter(|p| p.open_now != Some(false))
			.cloned()
			.collect(),
	}
}

fn filter_price(results: &[PlaceResult], price_intent: PriceIntent) -> Vec<PlaceResult> {
	let allowed: &[u8] = match price_intent {
		PriceIntent::Cheap => &[1],
		PriceIntent::Mid => &[2],
		PriceIntent::Expensive => &[3, 4],
	};
	results
		.iter()
		.filter(|p| p.price_level.map(|level| allowed.contains(&level)).unwrap_or(true))
		.cloned()
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::models::filters::{Disclaimers, MinRatingBucket};
	use crate::models::language::FinalLanguage;
	use crate::models::query::LatLng;

	fn place(id: &str, rating: Option<f32>, price_level: Option<u8>, open_now: Option<bool>) -> PlaceResult {
		PlaceResult {
			id: id.to_string(),
			name: id.to_string(),
			location: LatLng { lat: 0.0, lng: 0.0 },
			rating,
			user_ratings_total: None,
			price_level,
			open_now,
			photo_references: vec![],
			tags: vec![],
		}
	}

	fn base_filters() -> FinalFilters {
		FinalFilters {
			language: FinalLanguage::En,
			open_state: None,
			open_at: None,
			open_between: None,
			region_code: "IL".to_string(),
			price_intent: None,
			min_rating_bucket: None,
			disclaimers: Disclaimers::default(),
		}
	}

	#[test]
	fn cheap_price_filter_keeps_only_level_one_or_unknown() {
		let results = vec![
			place("a", None, Some(1), None),
			place("b", None, Some(2), None),
			place("c", None, None, None),
		];
		let mut filters = base_filters();
		filters.price_intent = Some(PriceIntent::Cheap);
		let outcome = apply_post_filters(&results, &filters);
		let ids: Vec<_> = outcome.filtered.iter().map(|p| p.id.as_str()).collect();
		assert_eq!(ids, vec!["a", "c"]);
	}

	#[test]
	fn open_now_filter_excludes_only_explicitly_closed() {
		let results = vec![
			place("a", None, None, Some(true)),
			place("b", None, None, Some(false)),
			place("c", None, None, None),
		];
		let mut filters = base_filters();
		filters.open_state = Some(OpenState::OpenNow);
		let outcome = apply_post_filters(&results, &filters);
		let ids: Vec<_> = outcome.filtered.iter().map(|p| p.id.as_str()).collect();
		assert_eq!(ids, vec!["a", "c"]);
	}

	#[test]
	fn rating_filter_relaxes_when_it_would_empty_a_nonempty_set() {
		let results: Vec<_> = (0..15)
			.map(|i| {
				let rating = if i < 10 { Some(4.0) } else { Some(3.6) };
				place(&i.to_string(), rating, None, Some(true))
			})
			.collect();
		let mut filters = base_filters();
		filters.open_state = Some(OpenState::OpenNow);
		filters.min_rating_bucket = Some(MinRatingBucket::R45);
		let outcome = apply_post_filters(&results, &filters);
		assert_eq!(outcome.filtered.len(), 15);
		assert!(outcome.relaxed.min_rating);
		assert_eq!(outcome.applied.min_rating_bucket, None);
		assert_eq!(outcome.applied.open_state, Some(OpenState::OpenNow));
	}

	#[test]
	fn auto_relax_does_not_remove_more_than_the_emptying_filter() {
		let results = vec![place("a", Some(4.2), Some(1), Some(true))];
		let mut filters = base_filters();
		filters.price_intent = Some(PriceIntent::Expensive);
		filters.min_rating_bucket = Some(MinRatingBucket::R40);
		let outcome = apply_post_filters(&results, &filters);
		assert_eq!(outcome.filtered.len(), 1);
		assert!(outcome.relaxed.price_intent);
		assert!(!outcome.relaxed.min_rating);
		assert_eq!(outcome.applied.min_rating_bucket, Some(MinRatingBucket::R40));
	}
}
