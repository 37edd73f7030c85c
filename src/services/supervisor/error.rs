//! Connection supervision error types.

use log::error;
use std::fmt;

/// Errors raised by the websocket event stream.
///
/// Any of these surfacing from the stream is the signal for one reconnect
/// cycle; the stream itself never retries.
#[derive(Debug)]
pub enum SupervisorError {
	/// Dialing failed or the connection dropped
	ConnectionError(String),
	/// The subscription request could not be sent
	SubscribeError(String),
	/// An inbound frame was not valid JSON
	DecodeError(String),
}

impl SupervisorError {
	fn format_message(&self) -> String {
		match self {
			Self::ConnectionError(msg) => format!("Connection error: {}", msg),
			Self::SubscribeError(msg) => format!("Subscribe error: {}", msg),
			Self::DecodeError(msg) => format!("Decode error: {}", msg),
		}
	}

	pub fn connection_error(msg: impl Into<String>) -> Self {
		let error = Self::ConnectionError(msg.into());
		error!("{}", error.format_message());
		error
	}

	pub fn subscribe_error(msg: impl Into<String>) -> Self {
		let error = Self::SubscribeError(msg.into());
		error!("{}", error.format_message());
		error
	}

	pub fn decode_error(msg: impl Into<String>) -> Self {
		let error = Self::DecodeError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl fmt::Display for SupervisorError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl std::error::Error for SupervisorError {}
