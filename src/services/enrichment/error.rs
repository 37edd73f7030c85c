//! Enrichment error types and handling.
//!
//! Enrichment lookups are decorative; every error here is logged and replaced
//! with a safe default by the caller, never propagated as fatal.

use log::error;
use std::{error::Error, fmt};

/// Represents possible errors during enrichment lookups
#[derive(Debug)]
pub enum EnrichmentError {
	/// Network-related errors (request failed, bad status)
	NetworkError(String),
	/// Response body could not be decoded
	ParseError(String),
	/// The response decoded but did not carry the expected data
	MissingData(String),
}

impl EnrichmentError {
	fn format_message(&self) -> String {
		match self {
			Self::NetworkError(msg) => format!("Network error: {}", msg),
			Self::ParseError(msg) => format!("Parse error: {}", msg),
			Self::MissingData(msg) => format!("Missing data: {}", msg),
		}
	}

	pub fn network_error(msg: impl Into<String>) -> Self {
		let error = Self::NetworkError(msg.into());
		error!("{}", error.format_message());
		error
	}

	pub fn parse_error(msg: impl Into<String>) -> Self {
		let error = Self::ParseError(msg.into());
		error!("{}", error.format_message());
		error
	}

	pub fn missing_data(msg: impl Into<String>) -> Self {
		let error = Self::MissingData(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl fmt::Display for EnrichmentError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for EnrichmentError {}
