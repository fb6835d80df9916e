pub mod memory;
pub mod redis_store;

use crate::http_models::search::SearchResponse;
use crate::models::job::{JobError, JobRecord, JobStatus};
use async_trait::async_trait;

/// Job store contract (spec §4.A). Every call is non-blocking for the
/// orchestrator and every failure is non-fatal — the trait returns `Result`
/// so the caller can log and continue rather than unwrap.
#[async_trait]
pub trait JobStore: Send + Sync {
	async fn is_available(&self) -> bool;

	async fn create_job(
		&self,
		request_id: &str,
		owner_session_id: &str,
		owner_user_id: Option<&str>,
	) -> Result<(), String>;

	async fn set_status(&self, request_id: &str, status: JobStatus, progress: Option<u8>) -> Result<(), String>;

	async fn set_result(&self, request_id: &str, result: SearchResponse) -> Result<(), String>;

	async fn set_error(&self, request_id: &str, code: &str, message: &str) -> Result<(), String>;

	async fn get(&self, request_id: &str) -> Result<Option<JobRecord>, String>;
}

pub(crate) fn error_record_for(job: &mut JobRecord, code: &str, message: &str) {
	job.status = JobStatus::DoneFailure;
	job.error = Some(JobError {
		code: code.to_string(),
		message: message.to_string(),
	});
}
