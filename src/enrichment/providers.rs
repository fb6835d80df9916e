//! Delivery-provider allow-list (spec §4.M). A URL that isn't on a
//! provider's allowed-host list, or lacks its required path prefix, is
//! rejected — the worker falls back to `NOT_FOUND` rather than ever
//! returning a synthesized search URL.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentProvider {
	Wolt,
	TenBis,
	Mishloha,
}

impl EnrichmentProvider {
	pub fn all() -> &'static [EnrichmentProvider] {
		&[EnrichmentProvider::Wolt, EnrichmentProvider::TenBis, EnrichmentProvider::Mishloha]
	}

	pub fn key(self) -> &'static str {
		match self {
			EnrichmentProvider::Wolt => "wolt",
			EnrichmentProvider::TenBis => "10bis",
			EnrichmentProvider::Mishloha => "mishloha",
		}
	}

	fn allowed_hosts(self) -> &'static [&'static str] {
		match self {
			EnrichmentProvider::Wolt => &["wolt.com", "*.wolt.com"],
			EnrichmentProvider::TenBis => &["10bis.co.il", "*.10bis.co.il"],
			EnrichmentProvider::Mishloha => &["mishloha.co.il", "*.mishloha.co.il"],
		}
	}

	/// Bare domain used to build a `site:` query hint for progressive
	/// relaxation (spec §4.M step 3), not itself a validation input.
	pub fn site_hint(self) -> &'static str {
		match self {
			EnrichmentProvider::Wolt => "wolt.com",
			EnrichmentProvider::TenBis => "10bis.co.il",
			EnrichmentProvider::Mishloha => "mishloha.co.il",
		}
	}

	fn required_path_prefix(self) -> &'static str {
		match self {
			EnrichmentProvider::Wolt => "/restaurant/",
			EnrichmentProvider::TenBis => "/next/",
			EnrichmentProvider::Mishloha => "/now/r/",
		}
	}

	/// Host + path-prefix validation (spec §4.M step 3). A provider with no
	/// valid deep-link yields `NOT_FOUND`, never a synthesized search URL.
	pub fn accepts_url(self, url: &str) -> bool {
		let Ok(parsed) = url::Url::parse(url) else {
			return false;
		};
		let Some(host) = parsed.host_str() else {
			return false;
		};
		let host_ok = self.allowed_hosts().iter().any(|allowed| {
			allowed
				.strip_prefix("*.")
				.map(|suffix| host == suffix || host.ends_with(&format!(".{suffix}")))
				.unwrap_or(host == *allowed)
		});
		host_ok && parsed.path().starts_with(self.required_path_prefix())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn accepts_exact_host_with_required_prefix() {
		assert!(EnrichmentProvider::Wolt.accepts_url("https://wolt.com/restaurant/tlv-pizza"));
	}

	#[test]
	fn accepts_wildcard_subdomain() {
		assert!(EnrichmentProvider::TenBis.accepts_url("https://www.10bis.co.il/next/restaurants/123"));
	}

	#[test]
	fn rejects_wrong_path_prefix() {
		assert!(!EnrichmentProvider::Wolt.accepts_url("https://wolt.com/search?q=pizza"));
	}

	#[test]
	fn rejects_foreign_host() {
		assert!(!EnrichmentProvider::Mishloha.accepts_url("https://evil.example.com/now/r/123"));
	}
}
