//! `searchWeb` (spec §4.M step 3), grounded in the `elisplash-paw` repo's
//! DuckDuckGo-HTML `execute_web_search` tool: scrape the no-API-key HTML
//! endpoint rather than depend on a paid search API.

use scraper::{Html, Selector};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct WebSearchResult {
	pub title: String,
	pub url: String,
}

pub async fn search_web(query: &str, limit: usize) -> Vec<WebSearchResult> {
	let encoded = url::form_urlencoded::Serializer::new(String::new()).append_pair("q", query).finish();
	let endpoint = format!("https://html.duckduckgo.com/html/?{encoded}");

	let Ok(client) = reqwest::Client::builder()
		.timeout(Duration::from_secs(8))
		.user_agent("Mozilla/5.0 (compatible; journey-search/1.0)")
		.build()
	else {
		return Vec::new();
	};

	let Ok(response) = client.get(&endpoint).send().await else {
		return Vec::new();
	};
	let Ok(html) = response.text().await else {
		return Vec::new();
	};

	parse_results(&html, limit)
}

fn parse_results(html: &str, limit: usize) -> Vec<WebSearchResult> {
	let document = Html::parse_document(html);
	let Ok(result_selector) = Selector::parse(".result__a") else {
		return Vec::new();
	};

	document
		.select(&result_selector)
		.take(limit)
		.filter_map(|el| {
			let title = el.text().collect::<String>().trim().to_string();
			let href = el.value().attr("href")?.to_string();
			if title.is_empty() {
				None
			} else {
				Some(WebSearchResult { title, url: href })
			}
		})
		.collect()
}

/// Progressive query relaxation (spec §4.M step 3): try the most specific
/// phrasing first, then loosen, then the name alone.
pub fn relaxation_plan(place_name: &str, city: Option<&str>, allowed_hosts_hint: &str) -> Vec<String> {
	let mut plan = Vec::new();
	if let Some(city) = city {
		plan.push(format!("{place_name} {city}"));
		plan.push(format!("{place_name} {city} site:{allowed_hosts_hint}"));
	}
	plan.push(place_name.to_string());
	plan
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn relaxation_plan_narrows_from_specific_to_bare_name() {
		let plan = relaxation_plan("Pizza Place", Some("Tel Aviv"), "wolt.com");
		assert_eq!(plan, vec!["Pizza Place Tel Aviv", "Pizza Place Tel Aviv site:wolt.com", "Pizza Place"]);
	}

	#[test]
	fn relaxation_plan_without_city_is_just_the_name() {
		let plan = relaxation_plan("Pizza Place", None, "wolt.com");
		assert_eq!(plan, vec!["Pizza Place"]);
	}

	#[test]
	fn parse_results_extracts_title_and_href_pairs() {
		let html = r#"<html><body>
			<a class="result__a" href="https://wolt.com/restaurant/a">Pizza A</a>
			<a class="result__a" href="https://example.com/b">Pizza B</a>
		</body></html>"#;
		let results = parse_results(html, 10);
		assert_eq!(results.len(), 2);
		assert_eq!(results[0].url, "https://wolt.com/restaurant/a");
	}
}
