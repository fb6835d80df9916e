//! Process-local job store backend (spec §4.A, §9 Open Question
//! resolution). `DashMap`-based, grounded in the seneschal-program service's
//! concurrent-map usage. Default backend; what the test suite exercises.

use crate::global::JOB_TTL_SECONDS;
use crate::http_models::search::SearchResponse;
use crate::jobstore::{JobStore, error_record_for};
use crate::models::job::{JobRecord, JobStatus};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

pub struct MemoryJobStore {
	jobs: DashMap<String, JobRecord>,
}

impl MemoryJobStore {
	pub fn new() -> Self {
		MemoryJobStore { jobs: DashMap::new() }
	}

	/// TTL cleanup of records older than `JOB_TTL_SECONDS` (spec §4.A).
	pub fn evict_expired(&self) {
		let cutoff = Utc::now() - chrono::Duration::seconds(JOB_TTL_SECONDS);
		self.jobs.retain(|_, job| job.created_at > cutoff);
	}
}

impl Default for MemoryJobStore {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl JobStore for MemoryJobStore {
	async fn is_available(&self) -> bool {
		true
	}

	async fn create_job(
		&self,
		request_id: &str,
		owner_session_id: &str,
		owner_user_id: Option<&str>,
	) -> Result<(), String> {
		let record = JobRecord::new(
			request_id.to_string(),
			owner_session_id.to_string(),
			owner_user_id.map(|s| s.to_string()),
		);
		self.jobs.insert(request_id.to_string(), record);
		Ok(())
	}

	async fn set_status(&self, request_id: &str, status: JobStatus, progress: Option<u8>) -> Result<(), String> {
		let mut entry = self
			.jobs
			.get_mut(request_id)
			.ok_or_else(|| format!("no job {request_id}"))?;
		if !entry.status.can_transition_to(status) {
			return Err(format!("illegal transition {:?} -> {:?}", entry.status, status));
		}
		entry.status = status;
		if let Some(p) = progress {
			entry.progress = p;
		}
		Ok(())
	}

	async fn set_result(&self, request_id: &str, result: SearchResponse) -> Result<(), String> {
		let mut entry = self
			.jobs
			.get_mut(request_id)
			.ok_or_else(|| format!("no job {request_id}"))?;
		entry.status = JobStatus::DoneSuccess;
		entry.progress = 100;
		entry.result = Some(result);
		Ok(())
	}

	async fn set_error(&self, request_id: &str, code: &str, message: &str) -> Result<(), String> {
		let mut entry = self
			.jobs
			.get_mut(request_id)
			.ok_or_else(|| format!("no job {request_id}"))?;
		error_record_for(&mut entry, code, message);
		Ok(())
	}

	async fn get(&self, request_id: &str) -> Result<Option<JobRecord>, String> {
		Ok(self.jobs.get(request_id).map(|entry| entry.clone()))
	}
}

#[cfg(test)]
mod unit_tests {
	use super::*;

	#[tokio::test]
	async fn create_then_get_round_trips() {
		let store = MemoryJobStore::new();
		store.create_job("req-1", "session-a", None).await.unwrap();
		let job = store.get("req-1").await.unwrap().unwrap();
		assert_eq!(job.status, JobStatus::Accepted);
		assert!(job.is_owned_by("session-a"));
	}

	#[tokio::test]
	async fn terminal_status_is_immutable() {
		let store = MemoryJobStore::new();
		store.create_job("req-1", "session-a", None).await.unwrap();
		store.set_error("req-1", "INTERNAL", "boom").await.unwrap();
		let result = store.set_status("req-1", JobStatus::Running, None).await;
		assert!(result.is_err());
	}

	#[tokio::test]
	async fn is_available_is_always_true_for_memory_backend() {
		let store = MemoryJobStore::new();
		assert!(store.is_available().await);
	}
}
