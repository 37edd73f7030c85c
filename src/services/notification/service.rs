//! Notification dispatch fan-out.
//!
//! Holds the configured sinks and delivers each formatted message to every
//! destination of every sink. Deliveries are independent: one failing
//! destination is logged and counted, never aborting the rest.

use std::sync::Arc;

use tracing::{debug, warn};

use super::{DiscordNotifier, NotificationError, Notifier, TelegramNotifier};
use crate::models::SinksConfig;

/// One sink with its destination list.
pub struct SinkBinding {
	pub notifier: Arc<dyn Notifier>,
	pub destinations: Vec<String>,
}

/// Outcome of one dispatch across all sinks.
#[derive(Debug, Default, PartialEq)]
pub struct DispatchReport {
	pub delivered: usize,
	pub failed: usize,
}

/// Fans formatted messages out to every configured destination.
#[derive(Default)]
pub struct NotificationService {
	sinks: Vec<SinkBinding>,
}

impl NotificationService {
	pub fn new(sinks: Vec<SinkBinding>) -> Self {
		Self { sinks }
	}

	/// Builds the service from the configured sinks.
	pub fn from_config(config: &SinksConfig) -> Result<Self, NotificationError> {
		let mut sinks = Vec::new();

		if let Some(telegram) = &config.telegram {
			if telegram.token.is_empty() {
				return Err(NotificationError::config_error(
					"Telegram sink configured without a bot token",
				));
			}
			sinks.push(SinkBinding {
				notifier: Arc::new(TelegramNotifier::new(telegram.token.clone())),
				destinations: telegram.chat_ids.clone(),
			});
		}
		if let Some(discord) = &config.discord {
			if discord.token.is_empty() {
				return Err(NotificationError::config_error(
					"Discord sink configured without a bot token",
				));
			}
			sinks.push(SinkBinding {
				notifier: Arc::new(DiscordNotifier::new(discord.token.clone())),
				destinations: discord.channel_ids.clone(),
			});
		}

		if sinks.is_empty() {
			return Err(NotificationError::config_error("no notification sinks configured"));
		}
		Ok(Self::new(sinks))
	}

	/// Delivers `text` to every destination of every sink.
	///
	/// The markup is adjusted once per sink, then sent to each of that sink's
	/// destinations in turn. Failures are logged and tallied.
	pub async fn dispatch(&self, text: &str) -> DispatchReport {
		let mut report = DispatchReport::default();

		for sink in &self.sinks {
			let adjusted = sink.notifier.adjust_markup(text);
			for destination in &sink.destinations {
				match sink.notifier.publish(destination, &adjusted).await {
					Ok(()) => {
						debug!(
							platform = sink.notifier.platform(),
							destination = %destination,
							"notification delivered"
						);
						report.delivered += 1;
					}
					Err(e) => {
						warn!(
							platform = sink.notifier.platform(),
							destination = %destination,
							error = %e,
							"notification delivery failed"
						);
						report.failed += 1;
					}
				}
			}
		}

		report
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::models::{DiscordSinkConfig, TelegramSinkConfig};
	use crate::services::notification::MockNotifier;

	fn mock_sink(
		platform: &'static str,
		destinations: &[&str],
		failing: Option<&'static str>,
	) -> SinkBinding {
		let mut notifier = MockNotifier::new();
		notifier.expect_platform().return_const(platform);
		notifier
			.expect_adjust_markup()
			.returning(|text| text.to_string());
		notifier.expect_publish().returning(move |destination, _| {
			if failing == Some(destination) {
				Err(NotificationError::NetworkError("boom".to_string()))
			} else {
				Ok(())
			}
		});
		SinkBinding {
			notifier: Arc::new(notifier),
			destinations: destinations.iter().map(|d| d.to_string()).collect(),
		}
	}

	#[tokio::test]
	async fn test_dispatch_fans_out_to_all_destinations() {
		let service = NotificationService::new(vec![
			mock_sink("telegram", &["a", "b", "c"], None),
			mock_sink("discord", &["d", "e", "f"], Some("e")),
		]);

		let report = service.dispatch("hello").await;

		assert_eq!(report, DispatchReport {
			delivered: 5,
			failed: 1,
		});
	}

	#[tokio::test]
	async fn test_dispatch_with_no_sinks() {
		let service = NotificationService::default();
		assert_eq!(service.dispatch("hello").await, DispatchReport::default());
	}

	#[test]
	fn test_from_config_requires_a_token() {
		let config = SinksConfig {
			telegram: Some(TelegramSinkConfig {
				token: String::new(),
				chat_ids: vec!["1".to_string()],
			}),
			discord: None,
		};
		assert!(NotificationService::from_config(&config).is_err());
	}

	#[test]
	fn test_from_config_builds_both_sinks() {
		let config = SinksConfig {
			telegram: Some(TelegramSinkConfig {
				token: "T".to_string(),
				chat_ids: vec!["1".to_string()],
			}),
			discord: Some(DiscordSinkConfig {
				token: "D".to_string(),
				channel_ids: vec!["2".to_string()],
			}),
		};

		let service = NotificationService::from_config(&config).unwrap();
		assert_eq!(service.sinks.len(), 2);
	}

	#[test]
	fn test_from_config_rejects_empty() {
		let config = SinksConfig::default();
		assert!(NotificationService::from_config(&config).is_err());
	}
}
