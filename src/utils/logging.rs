//! Logging utilities for the application
//!
//! This module provides utilities for setting up and configuring logging for
//! the application. It uses the `tracing_subscriber` crate to configure the
//! logging and sends output to stdout by default.

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Setup logging for the application
///
/// Filtering defaults to `info` and honors the standard environment filter
/// variable.
pub fn setup_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
	setup_logging_with_writer(std::io::stdout)?;
	Ok(())
}

/// Setup logging for the application with a custom writer
pub fn setup_logging_with_writer<W>(
	writer: W,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>
where
	W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::registry()
		.with(filter)
		.with(
			fmt::layer()
				.with_writer(writer)
				.event_format(
					fmt::format()
						.with_level(true)
						.with_target(true)
						.with_thread_ids(false)
						.with_thread_names(false)
						.with_ansi(true)
						.compact(),
				)
				.fmt_fields(fmt::format::PrettyFields::new()),
		)
		.try_init()?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_setup_logging_is_idempotent_failure() {
		// The second initialization attempt must fail rather than panic
		let first = setup_logging();
		let second = setup_logging();
		assert!(first.is_ok() || second.is_err());
	}
}
