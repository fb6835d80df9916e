use crate::error::{AppError, PrivateError};

/// `completeJSON` failure kinds (spec §4.D).
#[derive(Debug)]
pub enum LlmError {
	Timeout,
	ParseError(String),
	SchemaMismatch(String),
	Transport(String),
}

impl From<LlmError> for AppError {
	fn from(value: LlmError) -> Self {
		match value {
			LlmError::Timeout => PrivateError::LlmTransport("timed out after retry".to_string()).into(),
			LlmError::ParseError(detail) => PrivateError::LlmParse(detail).into(),
			LlmError::SchemaMismatch(detail) => PrivateError::LlmParse(format!("schema mismatch: {detail}")).into(),
			LlmError::Transport(detail) => PrivateError::LlmTransport(detail).into(),
		}
	}
}
