#[cfg(test)]
mod tests {
	use {
		journey_search::{global::*, log},
		std::{fs, io::Write, path::Path, time::Duration},
		tracing::{error, trace},
	};

	/// Verifies that `logs/latest.log` is created and written to from log events.
	#[test]
	fn test_logger() {
		unsafe {
			std::env::set_var("RUST_LOG", "warn,journey_search=debug");
		}
		let latest_log_path = Path::new(LOG_DIR).join(LATEST_LOG);
		_ = fs::remove_file(latest_log_path.as_path());
		log::init_logger();
		trace!("Test trace");
		error!("Test error");
		log::log_writer().flush().unwrap();
		// flushing the non-blocking writer is async; give the worker thread a moment.
		std::thread::sleep(Duration::from_millis(50));
		let logs = fs::read_to_string(latest_log_path).unwrap();
		assert!(!logs.is_empty());
	}

	/// Verifies that `logs/crash.log` is created and written to on a panic.
	#[test]
	fn test_panic_handler() {
		_ = fs::remove_file(Path::new(LOG_DIR).join(CRASH_LOG));
		log::init_panic_handler();
		std::panic::catch_unwind(|| {
			panic!("Test panic");
		})
		.unwrap_err();
		assert!(!fs::read_to_string(Path::new(LOG_DIR).join(CRASH_LOG)).unwrap().is_empty());
	}
}
