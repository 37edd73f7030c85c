//! Outbound message filtering.
//!
//! Two independent gates run after rendering and before dispatch: a substring
//! whitelist/blacklist over the rendered text, and a fiat-value threshold over
//! the event's primary amount. Both default to letting everything through
//! when unconfigured.

use tracing::debug;

use crate::models::{ChainConfig, FilterMode, MessageCategory, MessageTypeConfig};
use crate::services::renderer::{round2, split_amount_denom};

/// Whether the rendered text passes the category's substring filter.
///
/// Blacklist mode rejects text containing any listed substring; whitelist
/// mode rejects text containing none of them. An empty list in either mode
/// keeps the default behavior for that mode (blacklist passes everything,
/// whitelist rejects everything).
pub fn is_allowed_message(
	category: MessageCategory,
	config: &MessageTypeConfig,
	text: &str,
) -> bool {
	let allowed = match config.filter {
		FilterMode::None => true,
		FilterMode::Blacklist => !config.list.iter().any(|entry| text.contains(entry)),
		FilterMode::Whitelist => config.list.iter().any(|entry| text.contains(entry)),
	};
	if !allowed {
		debug!(category = %category, "message suppressed by substring filter");
	}
	allowed
}

/// Whether the event's primary amount passes the category's fiat threshold.
///
/// When the amount filter is enabled, only amounts denominated in the chain's
/// base denom can be valued; anything else, including a missing amount, is
/// rejected rather than passed through unvalued.
pub fn is_allowed_amount(
	category: MessageCategory,
	config: &MessageTypeConfig,
	chain: &ChainConfig,
	base_price: f64,
	raw_amount: Option<&str>,
) -> bool {
	if !config.amount_filter {
		return true;
	}
	let Some(raw) = raw_amount else {
		debug!(category = %category, "amount filter active but event carries no amount");
		return false;
	};

	let (amount, denom) = split_amount_denom(raw);
	if denom != chain.base_denom {
		debug!(
			category = %category,
			denom = %denom,
			"amount filter cannot value non-base denom"
		);
		return false;
	}

	let scaled = round2(amount / 10f64.powi(chain.exponent as i32));
	let fiat_value = scaled * base_price;
	if fiat_value < config.threshold {
		debug!(
			category = %category,
			fiat_value,
			threshold = config.threshold,
			"message suppressed by amount threshold"
		);
		return false;
	}
	true
}

#[cfg(test)]
mod tests {
	use super::*;

	fn chain() -> ChainConfig {
		ChainConfig {
			display_name: "FUND".to_string(),
			base_denom: "nund".to_string(),
			exponent: 9,
			bech32_prefix: "und".to_string(),
			price_feed_id: "unification".to_string(),
		}
	}

	fn amount_config(threshold: f64) -> MessageTypeConfig {
		MessageTypeConfig {
			amount_filter: true,
			threshold,
			..Default::default()
		}
	}

	////////////////////////////////////////////////////////////
	// is_allowed_message tests
	////////////////////////////////////////////////////////////

	#[test]
	fn test_no_filter_allows_everything() {
		let config = MessageTypeConfig::default();
		assert!(is_allowed_message(
			MessageCategory::Transfer,
			&config,
			"anything at all"
		));
	}

	#[test]
	fn test_blacklist_rejects_listed_substring() {
		let config = MessageTypeConfig {
			filter: FilterMode::Blacklist,
			list: vec!["und1spammer".to_string()],
			..Default::default()
		};

		assert!(!is_allowed_message(
			MessageCategory::Transfer,
			&config,
			"transfer from und1spammer to und1user"
		));
		assert!(is_allowed_message(
			MessageCategory::Transfer,
			&config,
			"transfer from und1friend to und1user"
		));
	}

	#[test]
	fn test_whitelist_requires_listed_substring() {
		let config = MessageTypeConfig {
			filter: FilterMode::Whitelist,
			list: vec!["und1watched".to_string()],
			..Default::default()
		};

		assert!(is_allowed_message(
			MessageCategory::Transfer,
			&config,
			"transfer from und1watched"
		));
		assert!(!is_allowed_message(
			MessageCategory::Transfer,
			&config,
			"transfer from und1other"
		));
	}

	#[test]
	#[tracing_test::traced_test]
	fn test_suppression_is_logged() {
		let config = MessageTypeConfig {
			filter: FilterMode::Blacklist,
			list: vec!["und1spammer".to_string()],
			..Default::default()
		};
		is_allowed_message(MessageCategory::Transfer, &config, "from und1spammer");

		assert!(logs_contain("message suppressed by substring filter"));
	}

	#[test]
	fn test_whitelist_with_empty_list_rejects() {
		let config = MessageTypeConfig {
			filter: FilterMode::Whitelist,
			..Default::default()
		};
		assert!(!is_allowed_message(
			MessageCategory::Transfer,
			&config,
			"anything"
		));
	}

	////////////////////////////////////////////////////////////
	// is_allowed_amount tests
	////////////////////////////////////////////////////////////

	#[test]
	fn test_amount_filter_disabled_allows_everything() {
		let config = MessageTypeConfig::default();
		assert!(is_allowed_amount(
			MessageCategory::Transfer,
			&config,
			&chain(),
			1.0,
			None
		));
	}

	#[test]
	fn test_amount_below_threshold_rejected() {
		// 50 FUND at 1.0 per unit is below a 100 threshold
		assert!(!is_allowed_amount(
			MessageCategory::Transfer,
			&amount_config(100.0),
			&chain(),
			1.0,
			Some("50000000000nund")
		));
	}

	#[test]
	fn test_amount_at_or_above_threshold_allowed() {
		assert!(is_allowed_amount(
			MessageCategory::Transfer,
			&amount_config(100.0),
			&chain(),
			1.0,
			Some("150000000000nund")
		));
		assert!(is_allowed_amount(
			MessageCategory::Transfer,
			&amount_config(100.0),
			&chain(),
			1.0,
			Some("100000000000nund")
		));
	}

	#[test]
	fn test_non_base_denom_rejected_when_filter_active() {
		assert!(!is_allowed_amount(
			MessageCategory::IbcTransferIn,
			&amount_config(100.0),
			&chain(),
			1.0,
			Some("500000ibc/ED07A339")
		));
	}

	#[test]
	fn test_missing_amount_rejected_when_filter_active() {
		assert!(!is_allowed_amount(
			MessageCategory::RegisterAccount,
			&amount_config(100.0),
			&chain(),
			1.0,
			None
		));
	}

	#[test]
	fn test_price_scales_fiat_value() {
		// 60 FUND at 2.0 per unit clears a 100 threshold
		assert!(is_allowed_amount(
			MessageCategory::Transfer,
			&amount_config(100.0),
			&chain(),
			2.0,
			Some("60000000000nund")
		));
		// The same amount at 1.0 per unit does not
		assert!(!is_allowed_amount(
			MessageCategory::Transfer,
			&amount_config(100.0),
			&chain(),
			1.0,
			Some("60000000000nund")
		));
	}
}
