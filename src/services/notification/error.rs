//! Notification error types.

use log::error;
use std::fmt;

/// Errors raised while delivering notifications.
#[derive(Debug)]
pub enum NotificationError {
	/// The sink endpoint could not be reached or rejected the request
	NetworkError(String),
	/// The sink configuration is unusable
	ConfigError(String),
}

impl NotificationError {
	fn format_message(&self) -> String {
		match self {
			Self::NetworkError(msg) => format!("Network error: {}", msg),
			Self::ConfigError(msg) => format!("Config error: {}", msg),
		}
	}

	pub fn network_error(msg: impl Into<String>) -> Self {
		let error = Self::NetworkError(msg.into());
		error!("{}", error.format_message());
		error
	}

	pub fn config_error(msg: impl Into<String>) -> Self {
		let error = Self::ConfigError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl fmt::Display for NotificationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl std::error::Error for NotificationError {}
