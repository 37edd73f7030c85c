//! Notification delivery services.
//!
//! A `Notifier` adapts one messaging platform: it rewrites the rendered HTML
//! into the platform's markup and publishes to a single destination. The
//! `NotificationService` fans each message out across every configured sink
//! and destination.

mod discord;
mod error;
mod service;
mod telegram;

use async_trait::async_trait;

pub use discord::DiscordNotifier;
pub use error::NotificationError;
pub use service::{DispatchReport, NotificationService, SinkBinding};
pub use telegram::TelegramNotifier;

/// A single messaging platform sink.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
	/// Platform name for logging.
	fn platform(&self) -> &'static str;

	/// Rewrites rendered HTML into the platform's markup.
	fn adjust_markup(&self, text: &str) -> String;

	/// Delivers `text` to one destination (a chat or channel id).
	async fn publish(&self, destination: &str, text: &str) -> Result<(), NotificationError>;
}
