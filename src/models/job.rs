use crate::http_models::search::SearchResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
	Accepted,
	Running,
	DoneSuccess,
	DoneFailure,
}

impl JobStatus {
	/// Monotonic ordering guarantee (spec §4.A): a later status may never
	/// regress to an earlier stage, and terminal states are immutable.
	pub fn rank(self) -> u8 {
		match self {
			JobStatus::Accepted => 0,
			JobStatus::Running => 1,
			JobStatus::DoneSuccess => 2,
			JobStatus::DoneFailure => 2,
		}
	}

	pub fn is_terminal(self) -> bool {
		matches!(self, JobStatus::DoneSuccess | JobStatus::DoneFailure)
	}

	pub fn can_transition_to(self, next: JobStatus) -> bool {
		if self.is_terminal() {
			return false;
		}
		next.rank() >= self.rank()
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobError {
	pub code: String,
	pub message: String,
}

/// Request-scoped job record (spec §3 "Job record"). Owned singly by the
/// session that created it; written only by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
	pub request_id: String,
	pub owner_session_id: String,
	pub owner_user_id: Option<String>,
	pub status: JobStatus,
	pub progress: u8,
	pub created_at: DateTime<Utc>,
	pub result: Option<SearchResponse>,
	pub error: Option<JobError>,
}

impl JobRecord {
	pub fn new(request_id: String, owner_session_id: String, owner_user_id: Option<String>) -> Self {
		JobRecord {
			request_id,
			owner_session_id,
			owner_user_id,
			status: JobStatus::Accepted,
			progress: 0,
			created_at: Utc::now(),
			result: None,
			error: None,
		}
	}

	/// Object-level authorization check (spec §6, §8 invariant 5): a job
	/// with no owner (legacy) is also treated as not owned by anyone.
	pub fn is_owned_by(&self, session_id: &str) -> bool {
		self.owner_session_id == session_id
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn terminal_status_rejects_further_transitions() {
		assert!(!JobStatus::DoneSuccess.can_transition_to(JobStatus::Running));
		assert!(!JobStatus::DoneFailure.can_transition_to(JobStatus::DoneSuccess));
	}

	#[test]
	fn status_cannot_regress() {
		assert!(!JobStatus::Running.can_transition_to(JobStatus::Accepted));
		assert!(JobStatus::Accepted.can_transition_to(JobStatus::Running));
	}

	#[test]
	fn ownership_mismatch_is_detected() {
		let job = JobRecord::new("req-1".into(), "session-a".into(), None);
		assert!(job.is_owned_by("session-a"));
		assert!(!job.is_owned_by("session-b"));
	}
}
