//! Discord notification implementation.
//!
//! Delivers rendered messages through the Discord bot API. Rendered text is
//! HTML, so the markup is rewritten to Discord-flavored markdown before
//! sending: bold tags become `**`, anchors become `[label](url)`, and literal
//! square brackets are escaped first so they cannot corrupt the links.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::json;

use super::{NotificationError, Notifier};

/// The bot API endpoint.
pub const DISCORD_API_BASE: &str = "https://discord.com/api/v10";

lazy_static! {
	static ref ANCHOR_RE: Regex =
		Regex::new(r#"<a href="(?P<url>[^"]*)">(?P<label>[^<]*)</a>"#).expect("valid regex");
}

/// Sends messages to Discord channels via a bot token.
pub struct DiscordNotifier {
	base_url: String,
	token: String,
	client: reqwest::Client,
}

impl DiscordNotifier {
	pub fn new(token: String) -> Self {
		Self::with_base_url(DISCORD_API_BASE.to_string(), token)
	}

	pub fn with_base_url(base_url: String, token: String) -> Self {
		Self {
			base_url: base_url.trim_end_matches('/').to_string(),
			token,
			client: reqwest::Client::new(),
		}
	}
}

#[async_trait]
impl Notifier for DiscordNotifier {
	fn platform(&self) -> &'static str {
		"discord"
	}

	fn adjust_markup(&self, text: &str) -> String {
		// Escape literal brackets before introducing markdown link syntax
		let escaped = text.replace('[', "\\[").replace(']', "\\]");
		let bolded = escaped.replace("<b>", "**").replace("</b>", "**");
		ANCHOR_RE
			.replace_all(&bolded, "[$label]($url)")
			.into_owned()
	}

	async fn publish(&self, destination: &str, text: &str) -> Result<(), NotificationError> {
		let url = format!("{}/channels/{}/messages", self.base_url, destination);
		let response = self
			.client
			.post(&url)
			.header("Authorization", format!("Bot {}", self.token))
			.json(&json!({ "content": text }))
			.send()
			.await
			.map_err(|e| NotificationError::network_error(e.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(NotificationError::network_error(format!(
				"Discord API returned {}: {}",
				status, body
			)));
		}
		Ok(())
	}
}
