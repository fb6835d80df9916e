use crate::models::language::AssistantLanguage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Route {
	Textsearch,
	Nearby,
	Landmark,
}

/// Output of the intent classifier (spec §4.G / §3 "Intent result").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentResult {
	pub route: Route,
	pub region: Option<String>,
	pub language: AssistantLanguage,
	pub confidence: f32,
	pub reason: String,
}
