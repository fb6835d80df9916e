use crate::models::language::AssistantLanguage;

/// `detectQueryLanguage` (spec §4.N): `he` iff any character lies in the
/// Hebrew Unicode block `U+0590..U+05FF`; otherwise `en`.
pub fn detect_query_language(query: &str) -> AssistantLanguage {
	if query.chars().any(|c| ('\u{0590}'..='\u{05FF}').contains(&c)) {
		AssistantLanguage::He
	} else {
		AssistantLanguage::En
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hebrew_text_detected_as_he() {
		assert_eq!(detect_query_language("פיצה בתל אביב"), AssistantLanguage::He);
	}

	#[test]
	fn latin_text_detected_as_en() {
		assert_eq!(detect_query_language("pizza in tel aviv"), AssistantLanguage::En);
	}

	#[test]
	fn mixed_text_with_any_hebrew_char_detected_as_he() {
		assert_eq!(detect_query_language("pizza ליד"), AssistantLanguage::He);
	}
}
