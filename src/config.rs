//! Process-wide configuration loaded once from the environment at startup.

use crate::global::{DEV_JWT_SECRET, MIN_JWT_SECRET_LEN};
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
	Dev,
	Prod,
}

#[derive(Debug, Clone)]
pub struct Config {
	pub environment: Environment,
	pub bind_address: String,
	pub api_base_url: String,
	pub frontend_origins: Vec<String>,
	pub jwt_secret: String,
	pub redis_url: Option<String>,
	pub places_api_key: String,
	pub llm_api_key: String,
	pub enable_debug_redis: bool,
	pub default_region: String,
}

impl Config {
	/// Loads configuration from the environment, applying the production
	/// fail-fast gates from spec §6 (Environment / CORS & origins). Panics
	/// before the listener binds if a required production gate is violated.
	pub fn load() -> Self {
		let environment = match env::var("APP_ENV").as_deref() {
			Ok("production") | Ok("prod") => Environment::Prod,
			_ => Environment::Dev,
		};

		let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3001".to_string());
		let api_base_url = env::var("API_BASE_URL").unwrap_or_else(|_| bind_address.clone());

		let frontend_origins = env::var("FRONTEND_ORIGINS")
			.unwrap_or_else(|_| "http://localhost:5173".to_string())
			.split(',')
			.map(|s| s.trim().to_string())
			.filter(|s| !s.is_empty())
			.collect::<Vec<_>>();

		let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string());
		let redis_url = env::var("REDIS_URL").ok();
		let places_api_key = env::var("PLACES_API_KEY").unwrap_or_default();
		let llm_api_key = env::var("LLM_API_KEY").unwrap_or_default();
		let enable_debug_redis = env::var("ENABLE_DEBUG_REDIS")
			.map(|v| v == "true")
			.unwrap_or(false);
		let default_region = env::var("DEFAULT_REGION").unwrap_or_else(|_| "IL".to_string());

		let config = Config {
			environment,
			bind_address,
			api_base_url,
			frontend_origins,
			jwt_secret,
			redis_url,
			places_api_key,
			llm_api_key,
			enable_debug_redis,
			default_region,
		};

		config.assert_production_gates();
		config
	}

	fn assert_production_gates(&self) {
		if self.environment != Environment::Prod {
			return;
		}

		if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
			panic!("JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} characters in production");
		}
		if self.jwt_secret == DEV_JWT_SECRET {
			panic!("JWT_SECRET must not equal the development default in production");
		}
		if self.places_api_key.is_empty() {
			panic!("PLACES_API_KEY must be set in production");
		}
		if self.llm_api_key.is_empty() {
			panic!("LLM_API_KEY must be set in production");
		}
		if self.redis_url.is_none() {
			panic!("REDIS_URL must be set in production");
		}
		if self.frontend_origins.iter().any(|o| o == "*") {
			panic!("FRONTEND_ORIGINS must not be a bare '*' in production");
		}
	}

	pub fn is_production(&self) -> bool {
		self.environment == Environment::Prod
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn clear_prod_env() {
		for key in [
			"APP_ENV",
			"JWT_SECRET",
			"REDIS_URL",
			"PLACES_API_KEY",
			"LLM_API_KEY",
			"FRONTEND_ORIGINS",
		] {
			unsafe { env::remove_var(key) };
		}
	}

	#[test]
	fn dev_defaults_do_not_panic() {
		clear_prod_env();
		let config = Config::load();
		assert_eq!(config.environment, Environment::Dev);
		assert!(!config.is_production());
	}

	#[test]
	fn production_panics_on_weak_secret() {
		clear_prod_env();
		unsafe {
			env::set_var("APP_ENV", "production");
			env::set_var("JWT_SECRET", "too-short");
			env::set_var("REDIS_URL", "redis://localhost");
			env::set_var("PLACES_API_KEY", "key");
			env::set_var("LLM_API_KEY", "key");
		}
		let result = std::panic::catch_unwind(Config::load);
		clear_prod_env();
		assert!(result.is_err());
	}

	#[test]
	fn production_panics_on_dev_default_secret() {
		clear_prod_env();
		unsafe {
			env::set_var("APP_ENV", "production");
			env::set_var("JWT_SECRET", DEV_JWT_SECRET);
			env::set_var("REDIS_URL", "redis://localhost");
			env::set_var("PLACES_API_KEY", "key");
			env::set_var("LLM_API_KEY", "key");
		}
		let result = std::panic::catch_unwind(Config::load);
		clear_prod_env();
		assert!(result.is_err());
	}

	#[test]
	fn production_accepts_strong_config() {
		clear_prod_env();
		unsafe {
			env::set_var("APP_ENV", "production");
			env::set_var("JWT_SECRET", "x".repeat(40));
			env::set_var("REDIS_URL", "redis://localhost");
			env::set_var("PLACES_API_KEY", "key");
			env::set_var("LLM_API_KEY", "key");
			env::set_var("FRONTEND_ORIGINS", "https://example.com");
		}
		let config = Config::load();
		clear_prod_env();
		assert!(config.is_production());
	}
}
