pub const LOG_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/logs");
pub const CRASH_LOG: &str = "crash.log";
pub const LATEST_LOG: &str = "latest.log";

/// Default dev JWT secret. Startup refuses to run in production with this value.
pub const DEV_JWT_SECRET: &str = "dev-secret-change-me-dev-secret-change";
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Push ticket TTL ceiling (spec §4.C, §6).
pub const TICKET_TTL_SECONDS: i64 = 60;
/// Idle push-socket timeout (spec §4.B).
pub const PUSH_IDLE_TIMEOUT_SECONDS: u64 = 15 * 60;
/// Job record TTL in the job store (spec §4.A).
pub const JOB_TTL_SECONDS: i64 = 30 * 60;
/// Enrichment cache entry TTL (spec §4.M).
pub const ENRICHMENT_CACHE_TTL_SECONDS: i64 = 24 * 60 * 60;
/// Places provider request cache entry TTL (spec §4.I).
pub const PROVIDER_CACHE_TTL_SECONDS: i64 = 5 * 60;
/// Enrichment lock TTL (spec §4.M / §5).
pub const ENRICHMENT_LOCK_TTL_SECONDS: i64 = 30;
/// Session cookie lifetime.
pub const SESSION_COOKIE_MAX_AGE_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Per-call timeouts, milliseconds (spec §4.D-§4.H).
pub const GATE_TIMEOUT_MS: u64 = 2_500;
pub const INTENT_TIMEOUT_MS: u64 = 3_500;
pub const MAPPER_TEXTSEARCH_TIMEOUT_MS: u64 = 3_500;
pub const MAPPER_NEARBY_TIMEOUT_MS: u64 = 4_500;
pub const MAPPER_LANDMARK_TIMEOUT_MS: u64 = 4_000;
pub const FILTER_EXTRACTOR_TIMEOUT_MS: u64 = 900;
pub const PROVIDER_TIMEOUT_MS: u64 = 8_000;
pub const LLM_RETRY_BACKOFF_MS: u64 = 500;
