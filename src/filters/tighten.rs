use crate::models::filters::{Disclaimers, FinalFilters, PreGoogleBaseFilters};
use crate::models::language::{AssistantLanguage, FinalLanguage, PreGoogleLanguage};

/// Deterministic tightening (spec §4.E, <1ms pure function):
/// - `language` resolves with priority `uiLanguage > base.language(non-auto) > gateLanguage`.
/// - `regionCode` resolves with priority `base.regionHint > defaultRegion`.
/// - `disclaimers` is always `{hours:true, dietary:true}`.
pub fn tighten_filters(
	base: &PreGoogleBaseFilters,
	ui_language: Option<AssistantLanguage>,
	gate_language: AssistantLanguage,
	default_region: &str,
) -> FinalFilters {
	let language = resolve_final_language(base.language, ui_language, gate_language);
	let region_code = base
		.region_hint
		.clone()
		.unwrap_or_else(|| default_region.to_string())
		.to_uppercase();

	FinalFilters {
		language,
		open_state: base.open_state,
		open_at: base.open_at.clone(),
		open_between: base.open_between.clone(),
		region_code,
		price_intent: base.price_intent,
		min_rating_bucket: base.min_rating_bucket,
		disclaimers: Disclaimers::default(),
	}
}

fn resolve_final_language(
	base_language: PreGoogleLanguage,
	ui_language: Option<AssistantLanguage>,
	gate_language: AssistantLanguage,
) -> FinalLanguage {
	if let Some(ui) = ui_language {
		return to_final(ui);
	}
	match base_language {
		PreGoogleLanguage::He => FinalLanguage::He,
		PreGoogleLanguage::En => FinalLanguage::En,
		PreGoogleLanguage::Auto => to_final(gate_language),
	}
}

fn to_final(language: AssistantLanguage) -> FinalLanguage {
	match language {
		AssistantLanguage::He => FinalLanguage::He,
		_ => FinalLanguage::En,
	}
}
