//! Utility modules for common functionality.
//!
//! - http: Retryable HTTP client construction
//! - logging: Logging utilities

pub mod http;
pub mod logging;
