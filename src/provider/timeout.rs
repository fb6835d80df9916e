//! Centralised timeout helper (spec §4.I, §5): a cancellable operation with
//! a hard ceiling, guaranteeing timer cleanup on every exit path. In Rust
//! this falls out of `tokio::time::timeout` + drop semantics, but the
//! wrapper keeps the "always classify as timeout vs transport" decision in
//! one place rather than repeated at every call site.

use std::future::Future;
use std::time::Duration;

#[derive(Debug)]
pub enum TimedOutOr<E> {
	TimedOut,
	Err(E),
}

/// Runs `fut` under a hard deadline. On success, drops the timer
/// immediately (no `forget`/leak path exists in this implementation, so
/// leaks are structurally impossible rather than merely cleaned up).
pub async fn with_timeout<T, E, F>(duration: Duration, fut: F) -> Result<T, TimedOutOr<E>>
where
	F: Future<Output = Result<T, E>>,
{
	match tokio::time::timeout(duration, fut).await {
		Ok(Ok(value)) => Ok(value),
		Ok(Err(e)) => Err(TimedOutOr::Err(e)),
		Err(_) => Err(TimedOutOr::TimedOut),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn returns_value_when_future_completes_in_time() {
		let result = with_timeout(Duration::from_millis(50), async { Ok::<_, ()>(42) }).await;
		assert!(matches!(result, Ok(42)));
	}

	#[tokio::test]
	async fn reports_timed_out_when_future_is_too_slow() {
		let result = with_timeout(Duration::from_millis(10), async {
			tokio::time::sleep(Duration::from_millis(200)).await;
			Ok::<_, ()>(1)
		})
		.await;
		assert!(matches!(result, Err(TimedOutOr::TimedOut)));
	}
}
