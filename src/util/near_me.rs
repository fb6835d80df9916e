/// Enumerated "near me" phrases (spec §4.N / §4.L stage 3 / GLOSSARY).
const NEAR_ME_PHRASES_HE: &[&str] = &[
	"לידי", "לידיי", "ממני", "קרוב אליי", "בסביבה", "בקרבתי", "קרוב אלי",
];
const NEAR_ME_PHRASES_EN: &[&str] = &[
	"near me", "nearby", "around me", "close to me", "in my area",
];

/// `isNearMeQuery` (spec §4.N): case-insensitive match against the
/// enumerated phrase set.
pub fn is_near_me_query(query: &str) -> bool {
	let lowered = query.to_lowercase();
	NEAR_ME_PHRASES_EN.iter().any(|p| lowered.contains(p))
		// Hebrew has no case folding; match directly against the original text.
		|| NEAR_ME_PHRASES_HE.iter().any(|p| query.contains(p))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn detects_english_near_me_phrases() {
		assert!(is_near_me_query("burgers near me"));
		assert!(is_near_me_query("NEARBY pizza"));
	}

	#[test]
	fn detects_hebrew_near_me_phrases() {
		assert!(is_near_me_query("ציזבורגר לידי"));
		assert!(is_near_me_query("מסעדות ממני"));
	}

	#[test]
	fn plain_queries_are_not_near_me() {
		assert!(!is_near_me_query("pizza in tel aviv"));
		assert!(!is_near_me_query("מסעדות איטלקיות 800 מטר משער הניצחון"));
	}
}
