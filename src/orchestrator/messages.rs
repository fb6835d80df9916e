//! Fixed assistant-message templates (spec §4.L / §7): timeout and
//! near-me-clarify copy is never phrased by an LLM call, only looked up by
//! `{kind, language}`.

use crate::http_models::sse::AssistantMessageType;
use crate::models::failure::FailureReason;
use crate::models::language::AssistantLanguage;

#[derive(Debug, Clone, Copy)]
pub enum AssistantMessageKind {
	Stop,
	ClarifyLowConfidence,
	ClarifyLocationRequired,
	ClarifyMissingAnchor,
	GenericQueryNarration,
	Summary,
	Failure(FailureReason),
}

/// Maps an internal message kind to the wire-level `type` the push/SSE
/// channels carry, plus whether it blocks the client from treating the turn
/// as a completed search (spec §6 "SSE event shape").
pub fn to_wire(kind: AssistantMessageKind) -> (AssistantMessageType, bool) {
	match kind {
		AssistantMessageKind::Stop => (AssistantMessageType::Stop, true),
		AssistantMessageKind::ClarifyLowConfidence
		| AssistantMessageKind::ClarifyLocationRequired
		| AssistantMessageKind::ClarifyMissingAnchor => (AssistantMessageType::Clarify, true),
		AssistantMessageKind::GenericQueryNarration => (AssistantMessageType::GenericQueryNarration, false),
		AssistantMessageKind::Summary | AssistantMessageKind::Failure(_) => (AssistantMessageType::Summary, false),
	}
}

/// Looks up the fixed copy for `(kind, language)`. Falls back to English for
/// any language without an explicit template (spec only requires he/en
/// coverage; the rest degrade gracefully rather than error).
pub fn assistant_message(kind: AssistantMessageKind, language: AssistantLanguage) -> String {
	let hebrew = matches!(language, AssistantLanguage::He);
	match kind {
		AssistantMessageKind::Stop => if hebrew {
			"נראה שזו לא שאלה על מסעדות. אפשר לנסח מחדש?".to_string()
		} else {
			"This doesn't look like a restaurant search. Could you rephrase?".to_string()
		},
		AssistantMessageKind::ClarifyLowConfidence => if hebrew {
			"לא הייתי בטוח/ה שהבנתי נכון — אפשר לפרט יותר?".to_string()
		} else {
			"I wasn't confident I understood — could you add a bit more detail?".to_string()
		},
		AssistantMessageKind::ClarifyLocationRequired => if hebrew {
			"אני צריך/ה מיקום כדי לחפש \"ליד אליי\".".to_string()
		} else {
			"I need a location to search near you.".to_string()
		},
		AssistantMessageKind::ClarifyMissingAnchor => if hebrew {
			"באיזו עיר או אזור לחפש?".to_string()
		} else {
			"Which city or area should I search in?".to_string()
		},
		AssistantMessageKind::GenericQueryNarration => if hebrew {
			"מחפש/ת מסעדות שמתאימות לבקשה שלך…".to_string()
		} else {
			"Searching for restaurants that match your request…".to_string()
		},
		AssistantMessageKind::Summary => if hebrew {
			"הנה התוצאות שמצאתי.".to_string()
		} else {
			"Here's what I found.".to_string()
		},
		AssistantMessageKind::Failure(reason) => failure_message(reason, hebrew),
	}
}

fn failure_message(reason: FailureReason, hebrew: bool) -> String {
	match reason {
		FailureReason::None => String::new(),
		FailureReason::NoResults => if hebrew { "לא נמצאו תוצאות.".to_string() } else { "No results found.".to_string() },
		FailureReason::LowConfidence => if hebrew { "לא הייתי בטוח/ה בתוצאות.".to_string() } else { "I wasn't confident in these results.".to_string() },
		FailureReason::GeocodingFailed => if hebrew { "לא הצלחתי לאתר את המקום שציינת.".to_string() } else { "I couldn't locate the place you mentioned.".to_string() },
		FailureReason::GoogleApiError => if hebrew { "שירות החיפוש זמנית לא זמין.".to_string() } else { "The search provider is temporarily unavailable.".to_string() },
		FailureReason::Timeout => if hebrew { "החיפוש ארך זמן רב מדי.".to_string() } else { "The search took too long.".to_string() },
		FailureReason::QuotaExceeded => if hebrew { "הגעתי למכסת הבקשות. נסו שוב בעוד רגע.".to_string() } else { "Request quota exceeded, please try again shortly.".to_string() },
		FailureReason::LiveDataUnavailable => if hebrew { "מידע עדכני לא זמין כרגע.".to_string() } else { "Live data isn't available right now.".to_string() },
		FailureReason::WeakMatches => if hebrew { "מצאתי רק התאמות חלשות.".to_string() } else { "I only found weak matches.".to_string() },
		FailureReason::LocationRequired => if hebrew { "אני צריך/ה מיקום כדי להמשיך.".to_string() } else { "I need a location to continue.".to_string() },
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn narration_and_summary_are_distinct_wire_kinds_that_never_block_search() {
		let (narration_kind, narration_blocks) = to_wire(AssistantMessageKind::GenericQueryNarration);
		let (summary_kind, summary_blocks) = to_wire(AssistantMessageKind::Summary);
		assert_eq!(narration_kind, AssistantMessageType::GenericQueryNarration);
		assert_eq!(summary_kind, AssistantMessageType::Summary);
		assert_ne!(narration_kind, summary_kind);
		assert!(!narration_blocks);
		assert!(!summary_blocks);
	}

	#[test]
	fn stop_and_clarify_kinds_block_search() {
		assert!(to_wire(AssistantMessageKind::Stop).1);
		assert!(to_wire(AssistantMessageKind::ClarifyLowConfidence).1);
		assert!(to_wire(AssistantMessageKind::ClarifyLocationRequired).1);
		assert!(to_wire(AssistantMessageKind::ClarifyMissingAnchor).1);
	}

	#[test]
	fn every_kind_has_non_empty_copy_in_both_languages() {
		let kinds = [
			AssistantMessageKind::Stop,
			AssistantMessageKind::ClarifyLowConfidence,
			AssistantMessageKind::ClarifyLocationRequired,
			AssistantMessageKind::ClarifyMissingAnchor,
			AssistantMessageKind::GenericQueryNarration,
			AssistantMessageKind::Summary,
		];
		for kind in kinds {
			assert!(!assistant_message(kind, AssistantLanguage::He).is_empty());
			assert!(!assistant_message(kind, AssistantLanguage::En).is_empty());
		}
	}
}
