//! Remote job-store backend (spec §4.A, §9 Open Question resolution).
//! Grounded in the keyai-desktop search service's
//! `redis::Client`/`AsyncCommands` usage. Activates when `REDIS_URL` is set.

use crate::global::JOB_TTL_SECONDS;
use crate::http_models::search::SearchResponse;
use crate::jobstore::JobStore;
use crate::models::job::{JobRecord, JobStatus};
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

pub struct RedisJobStore {
	manager: ConnectionManager,
}

impl RedisJobStore {
	pub async fn connect(redis_url: &str) -> Result<Self, String> {
		let client = redis::Client::open(redis_url).map_err(|e| e.to_string())?;
		let manager = client.get_connection_manager().await.map_err(|e| e.to_string())?;
		Ok(RedisJobStore { manager })
	}

	fn key(request_id: &str) -> String {
		format!("job:{request_id}")
	}
}

#[async_trait]
impl JobStore for RedisJobStore {
	/// MUST return true only when the connection is actually ready (spec
	/// §4.A) — a lightweight `PING` round-trip, not merely "client exists".
	async fn is_available(&self) -> bool {
		let mut conn = self.manager.clone();
		redis::cmd("PING").query_async::<String>(&mut conn).await.is_ok()
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
		self.write(request_id, &record).await
	}

	async fn set_status(&self, request_id: &str, status: JobStatus, progress: Option<u8>) -> Result<(), String> {
		let mut record = self.read(request_id).await?.ok_or_else(|| format!("no job {request_id}"))?;
		if !record.status.can_transition_to(status) {
			return Err(format!("illegal transition {:?} -> {:?}", record.status, status));
		}
		record.status = status;
		if let Some(p) = progress {
			record.progress = p;
		}
		self.write(request_id, &record).await
	}

	async fn set_result(&self, request_id: &str, result: SearchResponse) -> Result<(), String> {
		let mut record = self.read(request_id).await?.ok_or_else(|| format!("no job {request_id}"))?;
		record.status = JobStatus::DoneSuccess;
		record.progress = 100;
		record.result = Some(result);
		self.write(request_id, &record).await
	}

	async fn set_error(&self, request_id: &str, code: &str, message: &str) -> Result<(), String> {
		let mut record = self.read(request_id).await?.ok_or_else(|| format!("no job {request_id}"))?;
		crate::jobstore::error_record_for(&mut record, code, message);
		self.write(request_id, &record).await
	}

	async fn get(&self, request_id: &str) -> Result<Option<JobRecord>, String> {
		self.read(request_id).await
	}
}

impl RedisJobStore {
	async fn read(&self, request_id: &str) -> Result<Option<JobRecord>, String> {
		let mut conn = self.manager.clone();
		let raw: Option<String> = conn.get(Self::key(request_id)).await.map_err(|e| e.to_string())?;
		match raw {
			Some(json) => serde_json::from_str(&json).map(Some).map_err(|e| e.to_string()),
			None => Ok(None),
		}
	}

	async fn write(&self, request_id: &str, record: &JobRecord) -> Result<(), String> {
		let mut conn = self.manager.clone();
		let json = serde_json::to_string(record).map_err(|e| e.to_string())?;
		let _: () = conn
			.set_ex(Self::key(request_id), json, JOB_TTL_SECONDS as u64)
			.await
			.map_err(|e| e.to_string())?;
		Ok(())
	}
}
