//! JWT mint/verify for session bootstrap (spec §4.O, §6 `/auth/token`).
//!
//! Grounded in the neurostore-next gateway's HS256 pattern: a single shared
//! secret, a short claims struct, and a strength gate enforced at startup
//! rather than here (see `config::Config::assert_production_gates`).

use crate::error::{AppError, PublicError, PublicErrorKind};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
	pub sub: String,
	pub exp: i64,
	pub iat: i64,
}

pub fn issue_token(secret: &str, session_id: &str, ttl: Duration) -> Result<String, AppError> {
	let now = Utc::now();
	let claims = Claims {
		sub: session_id.to_string(),
		iat: now.timestamp(),
		exp: (now + ttl).timestamp(),
	};
	encode(
		&Header::default(),
		&claims,
		&EncodingKey::from_secret(secret.as_bytes()),
	)
	.map_err(|e| AppError::from(crate::error::PrivateError::Internal(format!("jwt encode: {e}"))))
}

pub fn verify_token(secret: &str, token: &str) -> Result<Claims, AppError> {
	let mut validation = Validation::default();
	validation.validate_exp = true;
	decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
		.map(|data| data.claims)
		.map_err(|_| AppError::from(PublicError::new(PublicErrorKind::Unauthenticated, "Invalid or expired token")))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn round_trips_a_valid_token() {
		let secret = "x".repeat(32);
		let token = issue_token(&secret, "session-123", Duration::hours(1)).unwrap();
		let claims = verify_token(&secret, &token).unwrap();
		assert_eq!(claims.sub, "session-123");
	}

	#[test]
	fn rejects_expired_token() {
		let secret = "x".repeat(32);
		let token = issue_token(&secret, "session-123", Duration::seconds(-10)).unwrap();
		assert!(verify_token(&secret, &token).is_err());
	}

	#[test]
	fn rejects_token_signed_with_different_secret() {
		let secret_a = "a".repeat(32);
		let secret_b = "b".repeat(32);
		let token = issue_token(&secret_a, "session-123", Duration::hours(1)).unwrap();
		assert!(verify_token(&secret_b, &token).is_err());
	}
}
