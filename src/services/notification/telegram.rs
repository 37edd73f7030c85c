//! Telegram notification implementation.
//!
//! Delivers rendered messages through the Telegram bot API with HTML parse
//! mode and link previews disabled. Rendered text is already HTML, so no
//! markup adjustment is needed.

use async_trait::async_trait;

use super::{NotificationError, Notifier};

/// The public bot API endpoint.
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Sends messages to Telegram chats via a bot token.
pub struct TelegramNotifier {
	base_url: String,
	token: String,
	client: reqwest::Client,
}

impl TelegramNotifier {
	pub fn new(token: String) -> Self {
		Self::with_base_url(TELEGRAM_API_BASE.to_string(), token)
	}

	pub fn with_base_url(base_url: String, token: String) -> Self {
		Self {
			base_url: base_url.trim_end_matches('/').to_string(),
			token,
			client: reqwest::Client::new(),
		}
	}

	/// Builds the sendMessage URL for one chat.
	fn construct_url(&self, chat_id: &str, text: &str) -> String {
		format!(
			"{}/bot{}/sendMessage?text={}&chat_id={}&parse_mode=HTML&disable_web_page_preview=true",
			self.base_url,
			self.token,
			urlencoding::encode(text),
			chat_id
		)
	}
}

#[async_trait]
impl Notifier for TelegramNotifier {
	fn platform(&self) -> &'static str {
		"telegram"
	}

	fn adjust_markup(&self, text: &str) -> String {
		text.to_string()
	}

	async fn publish(&self, destination: &str, text: &str) -> Result<(), NotificationError> {
		let url = self.construct_url(destination, text);
		let response = self
			.client
			.get(&url)
			.send()
			.await
			.map_err(|e| NotificationError::network_error(e.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(NotificationError::network_error(format!(
				"Telegram API returned {}: {}",
				status, body
			)));
		}
		Ok(())
	}
}
