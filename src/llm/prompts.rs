//! Prompt templates. These encode the contract rules spec §4.E-§4.H
//! describe as "contract, not implementation" — the prompt is where that
//! contract lives; the surrounding Rust code only validates and post-
//! processes the result.

pub fn gate_prompt(query: &str, ui_locale: Option<&str>) -> String {
	format!(
		"You are a gate classifier for a restaurant search assistant.\n\
		 Given the user query, decide whether it expresses a food/restaurant search intent.\n\
		 Query: {query}\n\
		 UI locale hint: {locale}\n\
		 Respond with ONLY a JSON object: {{\"foodSignal\": bool, \"language\": \"he\"|\"en\"|\"ar\"|\"ru\"|\"fr\"|\"es\", \"region\": string|null, \"confidence\": number between 0 and 1}}",
		locale = ui_locale.unwrap_or("none")
	)
}

pub fn intent_prompt(query: &str, region: Option<&str>) -> String {
	format!(
		"You are an intent classifier for a restaurant search assistant.\n\
		 Classify the route as TEXTSEARCH, NEARBY, or LANDMARK.\n\
		 NEARBY is only for distance from the USER (\"near me\", \"ליד\", \"ממני\").\n\
		 Distance from a NAMED LANDMARK (\"800m from X\") is LANDMARK, not NEARBY.\n\
		 LANDMARK applies to any named-place anchor (street, POI, foreign landmark).\n\
		 TEXTSEARCH otherwise, iff the query contains a location anchor.\n\
		 Query: {query}\n\
		 Region hint: {region}\n\
		 Respond with ONLY a JSON object: {{\"route\": \"TEXTSEARCH\"|\"NEARBY\"|\"LANDMARK\", \"region\": string|null, \"language\": string, \"confidence\": number, \"reason\": string}}",
		region = region.unwrap_or("none")
	)
}

pub fn textsearch_mapper_prompt(query: &str, language: &str) -> String {
	format!(
		"Produce provider search parameters for a TEXTSEARCH route.\n\
		 Preserve the query's language ({language}), remove filler words, and add a \
		 restaurant/מסעדה place-type keyword only if one is not already present.\n\
		 Query: {query}\n\
		 Respond with ONLY a JSON object: {{\"textQuery\": string, \"region\": string, \"language\": string, \"bias\": {{\"lat\": number, \"lng\": number}}|null}}"
	)
}

pub fn nearby_mapper_prompt(query: &str, lat: f64, lng: f64, language: &str) -> String {
	format!(
		"Produce provider search parameters for a NEARBY route.\n\
		 The user is located at ({lat}, {lng}).\n\
		 Query: {query}\n\
		 Respond with ONLY a JSON object: {{\"radiusMeters\": number, \"keyword\": string, \"region\": string, \"language\": \"{language}\"}}"
	)
}

pub fn landmark_mapper_prompt(query: &str, language: &str) -> String {
	format!(
		"Produce provider search parameters for a LANDMARK route.\n\
		 Extract the full landmark phrase for geocoding SEPARATELY from the food keyword.\n\
		 Respect an explicit in-query radius if present, default to 800 meters otherwise.\n\
		 Query: {query}\n\
		 Respond with ONLY a JSON object: {{\"geocodeQuery\": string, \"afterGeocode\": \"nearbySearch\"|\"textSearchWithBias\", \"radiusMeters\": number, \"keyword\": string, \"region\": string, \"language\": \"{language}\"}}"
	)
}

pub fn filter_extractor_prompt(query: &str, route: &str) -> String {
	format!(
		"Extract structured search filters from a restaurant search query.\n\
		 openState rules: \"open now\"/\"פתוח עכשיו\" -> OPEN_NOW; \"open at 20:00\" -> OPEN_AT + openAt; \"open 19-22\" -> OPEN_BETWEEN + openBetween.\n\
		 priceIntent rules: cheap/budget/זול -> CHEAP; moderate/medium/בינוני -> MID; expensive/luxury/יקר -> EXPENSIVE.\n\
		 minRatingBucket rules: \"3.5+/סביר\" -> R35; \"4+/high rated/דירוג גבוה\" -> R40; \"4.5+/best/הכי טובים\" -> R45.\n\
		 Route: {route}\n\
		 Query: {query}\n\
		 Respond with ONLY a JSON object matching PreGoogleBaseFilters: {{\"language\": \"he\"|\"en\"|\"auto\", \"openState\": \"OPEN_NOW\"|\"OPEN_AT\"|\"OPEN_BETWEEN\"|null, \"openAt\": string|null, \"openBetween\": [string, string]|null, \"regionHint\": string|null, \"priceIntent\": \"CHEAP\"|\"MID\"|\"EXPENSIVE\"|null, \"minRatingBucket\": \"R35\"|\"R40\"|\"R45\"|null}}"
	)
}
