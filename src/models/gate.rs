use crate::models::language::AssistantLanguage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateDecision {
	Stop,
	Clarify,
	Continue,
}

/// Output of the gate classifier (spec §4.F / §3 "Gate result").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateResult {
	pub food_signal: bool,
	pub language: AssistantLanguage,
	pub region: Option<String>,
	pub confidence: f32,
	pub decision: GateDecision,
}

impl GateResult {
	/// Deterministic post-processing of the raw LLM output (spec §4.F):
	/// the decision field itself is always derived here, never trusted from
	/// the model's own opinion of it.
	pub fn decide(food_signal: bool, confidence: f32) -> GateDecision {
		if !food_signal {
			GateDecision::Stop
		} else if confidence < 0.6 {
			GateDecision::Clarify
		} else {
			GateDecision::Continue
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn no_food_signal_always_stops() {
		assert_eq!(GateResult::decide(false, 0.99), GateDecision::Stop);
	}

	#[test]
	fn low_confidence_food_signal_clarifies() {
		assert_eq!(GateResult::decide(true, 0.59), GateDecision::Clarify);
	}

	#[test]
	fn confident_food_signal_continues() {
		assert_eq!(GateResult::decide(true, 0.6), GateDecision::Continue);
	}
}
