use serde::{Deserialize, Serialize};

/// Frozen once by the gate (spec §3 "Language context"). Write-once on the
/// request context; any later write is a bug and must be logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistantLanguage {
	He,
	En,
	Ar,
	Ru,
	Fr,
	Es,
}

impl AssistantLanguage {
	pub fn as_str(self) -> &'static str {
		match self {
			AssistantLanguage::He => "he",
			AssistantLanguage::En => "en",
			AssistantLanguage::Ar => "ar",
			AssistantLanguage::Ru => "ru",
			AssistantLanguage::Fr => "fr",
			AssistantLanguage::Es => "es",
		}
	}
}

/// Two-value lattice used by the shared-filters extractor and tightening
/// (spec §3 / §4.E): `auto` only survives until tightening resolves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreGoogleLanguage {
	He,
	En,
	Auto,
}

/// Final, narrowed language used for provider calls (spec §3 "Final").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinalLanguage {
	He,
	En,
}

impl FinalLanguage {
	pub fn as_str(self) -> &'static str {
		match self {
			FinalLanguage::He => "he",
			FinalLanguage::En => "en",
		}
	}
}

/// Resolves the assistant-facing language with the priority chain the spec
/// names in several places: explicit preferred value, then fallback, then a
/// hard default. Logs (at the call site, not here) whenever the fallback
/// tier was needed.
pub fn resolve_language(
	preferred: Option<AssistantLanguage>,
	fallback: Option<AssistantLanguage>,
) -> AssistantLanguage {
	preferred.or(fallback).unwrap_or(AssistantLanguage::En)
}
