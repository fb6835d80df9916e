//! Error taxonomy (spec §7, §4.Q).
//!
//! `PrivateError` carries internal failure detail and is always logged in
//! full. `PublicError` is the stable, client-facing shape. `AppError` is the
//! single type handlers return; it implements `IntoResponse` and maps every
//! case to the right HTTP status without leaking `PrivateError` detail.

use axum::{
	Json,
	http::StatusCode,
	response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

pub type ApiResult<T> = std::result::Result<T, AppError>;

/// Internal causes never shown to a client. Always logged with full detail
/// before being classified into a `PublicError`.
#[derive(Debug)]
pub enum PrivateError {
	Store(String),
	LlmTransport(String),
	LlmParse(String),
	ProviderTransport(String),
	ProviderHttp { status: u16, body: String },
	Internal(String),
}

/// The stable, client-facing error shape (spec §7 error kinds).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicErrorKind {
	InputInvalid,
	Unauthenticated,
	NotFound,
	RateLimited,
	UpstreamTimeout,
	UpstreamError,
	LlmTimeout,
	LlmParseError,
	StoreUnavailable,
	Internal,
}

impl PublicErrorKind {
	fn code(self) -> &'static str {
		match self {
			PublicErrorKind::InputInvalid => "INPUT_INVALID",
			PublicErrorKind::Unauthenticated => "UNAUTHENTICATED",
			PublicErrorKind::NotFound => "NOT_FOUND",
			PublicErrorKind::RateLimited => "RATE_LIMITED",
			PublicErrorKind::UpstreamTimeout => "UPSTREAM_TIMEOUT",
			PublicErrorKind::UpstreamError => "UPSTREAM_ERROR",
			PublicErrorKind::LlmTimeout => "LLM_TIMEOUT",
			PublicErrorKind::LlmParseError => "LLM_PARSE_ERROR",
			PublicErrorKind::StoreUnavailable => "STORE_UNAVAILABLE",
			PublicErrorKind::Internal => "INTERNAL",
		}
	}

	fn status(self) -> StatusCode {
		match self {
			PublicErrorKind::InputInvalid => StatusCode::BAD_REQUEST,
			PublicErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
			// FORBIDDEN_HIDDEN is never distinguished from NOT_FOUND on the wire.
			PublicErrorKind::NotFound => StatusCode::NOT_FOUND,
			PublicErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
			PublicErrorKind::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
			PublicErrorKind::UpstreamError => StatusCode::BAD_GATEWAY,
			PublicErrorKind::LlmTimeout => StatusCode::GATEWAY_TIMEOUT,
			PublicErrorKind::LlmParseError => StatusCode::BAD_GATEWAY,
			PublicErrorKind::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
			PublicErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

#[derive(Debug, Clone)]
pub struct PublicError {
	pub kind: PublicErrorKind,
	pub message: String,
}

impl PublicError {
	pub fn new(kind: PublicErrorKind, message: impl Into<String>) -> Self {
		Self {
			kind,
			message: message.into(),
		}
	}

	pub fn invalid_json() -> Self {
		Self::new(PublicErrorKind::InputInvalid, "Request body is not valid JSON")
	}

	pub fn unauthenticated() -> Self {
		Self::new(PublicErrorKind::Unauthenticated, "Authentication required")
	}

	pub fn not_found() -> Self {
		Self::new(PublicErrorKind::NotFound, "Not found")
	}

	pub fn rate_limited() -> Self {
		Self::new(PublicErrorKind::RateLimited, "Too many requests")
	}
}

#[derive(Serialize)]
struct ErrorBody<'a> {
	error: &'a str,
	code: &'a str,
}

/// The single error type every axum handler in this crate returns.
#[derive(Debug)]
pub struct AppError(PublicError);

impl AppError {
	pub fn kind(&self) -> PublicErrorKind {
		self.0.kind
	}
}

impl From<PublicError> for AppError {
	fn from(value: PublicError) -> Self {
		AppError(value)
	}
}

impl From<PrivateError> for AppError {
	/// Classifies and logs the private cause, then yields the matching
	/// public kind. Internal detail never survives into the `AppError`.
	fn from(value: PrivateError) -> Self {
		let public = match &value {
			PrivateError::Store(detail) => {
				error!(error = %detail, "job/enrichment store failure");
				PublicError::new(PublicErrorKind::StoreUnavailable, "Service temporarily unavailable")
			}
			PrivateError::LlmTransport(detail) => {
				error!(error = %detail, "llm transport failure");
				PublicError::new(PublicErrorKind::LlmTimeout, "Upstream assistant unavailable")
			}
			PrivateError::LlmParse(detail) => {
				error!(error = %detail, "llm response did not parse");
				PublicError::new(PublicErrorKind::LlmParseError, "Upstream assistant returned an invalid response")
			}
			PrivateError::ProviderTransport(detail) => {
				error!(error = %detail, "provider transport failure");
				PublicError::new(PublicErrorKind::UpstreamTimeout, "Search provider unavailable")
			}
			PrivateError::ProviderHttp { status, body } => {
				error!(status, body = %body, "provider returned non-2xx");
				PublicError::new(PublicErrorKind::UpstreamError, "Search provider returned an error")
			}
			PrivateError::Internal(detail) => {
				error!(error = %detail, "internal error");
				PublicError::new(PublicErrorKind::Internal, "Internal error")
			}
		};
		AppError(public)
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response {
		let status = self.0.kind.status();
		let body = json!(ErrorBody {
			error: &self.0.message,
			code: self.0.kind.code(),
		});
		(status, Json(body)).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn not_found_maps_to_404_never_403() {
		let err: AppError = PublicError::not_found().into();
		assert_eq!(err.kind().status(), StatusCode::NOT_FOUND);
	}

	#[test]
	fn provider_http_error_never_reports_as_success() {
		let err: AppError = PrivateError::ProviderHttp {
			status: 500,
			body: "boom".to_string(),
		}
		.into();
		assert_eq!(err.kind(), PublicErrorKind::UpstreamError);
	}

	#[test]
	fn store_failure_maps_to_503() {
		let err: AppError = PrivateError::Store("connection refused".to_string()).into();
		assert_eq!(err.kind().status(), StatusCode::SERVICE_UNAVAILABLE);
	}
}
