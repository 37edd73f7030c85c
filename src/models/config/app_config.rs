//! Application configuration model.
//!
//! One JSON file describes the watched chain, the REST/websocket endpoints,
//! per-category message filtering rules, named addresses, foreign assets, and
//! the chat sinks to deliver to. Loading and validation follow the
//! `ConfigLoader` trait in this module's parent.

use serde::Deserialize;
use std::{fs, path::Path};

use crate::models::config::{ConfigLoader, error::ConfigError};
use crate::models::core::MessageCategory;

/// Identity of the watched chain and its native asset.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
	/// Ticker shown in rendered messages, e.g. "FUND".
	pub display_name: String,
	/// Smallest indivisible unit of the native asset, e.g. "nund".
	pub base_denom: String,
	/// Power of ten between base denom and display unit.
	pub exponent: u32,
	/// Account address prefix, e.g. "und".
	pub bech32_prefix: String,
	/// Identifier on the price feed, e.g. "unification".
	pub price_feed_id: String,
}

/// Endpoints for the node and the enrichment collaborators.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionsConfig {
	/// Websocket endpoint of the node's RPC, e.g. "wss://rpc1.example.io/websocket".
	pub websocket_url: String,
	/// REST (LCD) endpoint of the home chain.
	pub rest_url: String,
	/// REST endpoint of the chain hosting the name-service contract.
	#[serde(default = "defaults::name_service_url")]
	pub name_service_url: String,
	/// Name-service contract address queried for reverse lookups.
	#[serde(default = "defaults::name_service_contract")]
	pub name_service_contract: String,
	/// Price feed base URL; per-coin market data lives under `<base>/<id>`.
	#[serde(default = "defaults::price_feed_url")]
	pub price_feed_url: String,
}

/// Explorer link bases keyed by what the link points at.
#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerConfig {
	pub account_url: String,
	pub validator_url: String,
	pub tx_url: String,
	/// Explorers for recognized foreign address prefixes.
	#[serde(default = "defaults::foreign_explorers")]
	pub foreign: Vec<ForeignExplorer>,
	/// Fallback account explorer for unrecognized prefixes.
	#[serde(default = "defaults::generic_account_url")]
	pub generic_account_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForeignExplorer {
	pub prefix: String,
	pub account_url: String,
}

/// A wallet the operator wants displayed under a fixed name.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedAddress {
	pub name: String,
	pub address: String,
}

/// A foreign asset reachable over IBC, matched by its origin base denom.
#[derive(Debug, Clone, Deserialize)]
pub struct ForeignAsset {
	/// Origin chain base denom, e.g. "uosmo".
	pub base_denom: String,
	/// Ticker shown in rendered messages, e.g. "OSMO".
	pub symbol: String,
	pub exponent: u32,
	/// Price feed identifier; assets without one render without a fiat value.
	#[serde(default)]
	pub price_feed_id: Option<String>,
}

/// Whitelist/blacklist mode for one message category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
	#[default]
	None,
	Whitelist,
	Blacklist,
}

/// Filtering rules for one message category.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageTypeConfig {
	#[serde(default = "defaults::enabled")]
	pub enabled: bool,
	#[serde(default)]
	pub filter: FilterMode,
	#[serde(default)]
	pub list: Vec<String>,
	#[serde(default)]
	pub amount_filter: bool,
	#[serde(default)]
	pub threshold: f64,
}

impl Default for MessageTypeConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			filter: FilterMode::None,
			list: Vec::new(),
			amount_filter: false,
			threshold: 0.0,
		}
	}
}

/// Per-category message configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MessagesConfig {
	pub transfers: MessageTypeConfig,
	pub ibc_transfers_in: MessageTypeConfig,
	pub ibc_transfers_out: MessageTypeConfig,
	pub withdraw_rewards: MessageTypeConfig,
	pub withdraw_commission: MessageTypeConfig,
	pub delegations: MessageTypeConfig,
	pub undelegations: MessageTypeConfig,
	pub redelegations: MessageTypeConfig,
	pub restake: MessageTypeConfig,
	pub register_account: MessageTypeConfig,
	pub register_domain: MessageTypeConfig,
	pub transfer_account: MessageTypeConfig,
	pub transfer_domain: MessageTypeConfig,
	pub delete_account: MessageTypeConfig,
}

impl MessagesConfig {
	/// Configuration block for one category.
	pub fn for_category(&self, category: MessageCategory) -> &MessageTypeConfig {
		match category {
			MessageCategory::Transfer => &self.transfers,
			MessageCategory::IbcTransferIn => &self.ibc_transfers_in,
			MessageCategory::IbcTransferOut => &self.ibc_transfers_out,
			MessageCategory::WithdrawRewards => &self.withdraw_rewards,
			MessageCategory::WithdrawCommission => &self.withdraw_commission,
			MessageCategory::Delegate => &self.delegations,
			MessageCategory::Undelegate => &self.undelegations,
			MessageCategory::Redelegate => &self.redelegations,
			MessageCategory::Restake => &self.restake,
			MessageCategory::RegisterAccount => &self.register_account,
			MessageCategory::RegisterDomain => &self.register_domain,
			MessageCategory::TransferAccount => &self.transfer_account,
			MessageCategory::TransferDomain => &self.transfer_domain,
			MessageCategory::DeleteAccount => &self.delete_account,
		}
	}
}

/// Telegram sink: one bot token, one or more chat destinations.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramSinkConfig {
	#[serde(default)]
	pub token: String,
	pub chat_ids: Vec<String>,
}

/// Discord sink: one bot token, one or more channel destinations.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordSinkConfig {
	#[serde(default)]
	pub token: String,
	pub channel_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SinksConfig {
	pub telegram: Option<TelegramSinkConfig>,
	pub discord: Option<DiscordSinkConfig>,
}

/// Timing knobs for the reconnect driver and background refreshers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
	/// Delay between a connection fault and the next dial attempt.
	pub reconnect_delay_secs: u64,
	/// Base price and validator set refresh interval.
	pub refresh_interval_secs: u64,
	/// Jitter bounds for per-foreign-asset price refreshers. Staggering the
	/// start keeps a burst of refreshers from tripping feed rate limits.
	pub asset_refresh_min_secs: u64,
	pub asset_refresh_max_secs: u64,
}

impl Default for RuntimeConfig {
	fn default() -> Self {
		Self {
			reconnect_delay_secs: 10,
			refresh_interval_secs: 300,
			asset_refresh_min_secs: 300,
			asset_refresh_max_secs: 600,
		}
	}
}

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
	pub chain: ChainConfig,
	pub connections: ConnectionsConfig,
	pub explorer: ExplorerConfig,
	/// Display currency ticker for fiat values, lowercase, e.g. "usd".
	#[serde(default = "defaults::currency")]
	pub currency: String,
	#[serde(default)]
	pub messages: MessagesConfig,
	#[serde(default)]
	pub named_addresses: Vec<NamedAddress>,
	#[serde(default)]
	pub foreign_assets: Vec<ForeignAsset>,
	#[serde(default)]
	pub sinks: SinksConfig,
	#[serde(default)]
	pub runtime: RuntimeConfig,
}

mod defaults {
	use super::ForeignExplorer;

	pub fn enabled() -> bool {
		true
	}

	pub fn currency() -> String {
		"usd".to_string()
	}

	pub fn name_service_url() -> String {
		"https://lcd.osmosis.zone".to_string()
	}

	pub fn name_service_contract() -> String {
		"osmo1xk0s8xgktn9x5vwcgtjdxqzadg88fgn33p8u9cnpdxwemvxscvast52cdd".to_string()
	}

	pub fn price_feed_url() -> String {
		"https://api.coingecko.com/api/v3/coins".to_string()
	}

	pub fn generic_account_url() -> String {
		"https://www.mintscan.io/wallet/address/".to_string()
	}

	pub fn foreign_explorers() -> Vec<ForeignExplorer> {
		vec![
			ForeignExplorer {
				prefix: "osmo".to_string(),
				account_url: "https://www.mintscan.io/osmosis/address/".to_string(),
			},
			ForeignExplorer {
				prefix: "gravity".to_string(),
				account_url: "https://www.mintscan.io/gravity-bridge/address/".to_string(),
			},
			ForeignExplorer {
				prefix: "cosmos".to_string(),
				account_url: "https://www.mintscan.io/cosmos/address/".to_string(),
			},
		]
	}
}

impl AppConfig {
	/// Resolves sink tokens from the environment when the config leaves them
	/// empty. `TELEGRAM_BOT_TOKEN` and `DISCORD_BOT_TOKEN` are honored.
	pub fn apply_env_overrides(&mut self) {
		if let Some(telegram) = self.sinks.telegram.as_mut() {
			if telegram.token.is_empty() {
				if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN") {
					telegram.token = token;
				}
			}
		}
		if let Some(discord) = self.sinks.discord.as_mut() {
			if discord.token.is_empty() {
				if let Ok(token) = std::env::var("DISCORD_BOT_TOKEN") {
					discord.token = token;
				}
			}
		}
	}
}

impl ConfigLoader for AppConfig {
	/// Loads and validates the configuration from a JSON file.
	fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		if !Self::is_json_file(path) {
			return Err(ConfigError::file_error(format!(
				"config file must be JSON: {}",
				path.display()
			)));
		}
		let contents = fs::read_to_string(path)
			.map_err(|e| ConfigError::file_error(format!("failed to read {}: {}", path.display(), e)))?;
		let mut config: AppConfig = serde_json::from_str(&contents)
			.map_err(|e| ConfigError::parse_error(format!("failed to parse {}: {}", path.display(), e)))?;
		config.apply_env_overrides();
		config.validate().map_err(ConfigError::validation_error)?;
		Ok(config)
	}

	fn validate(&self) -> Result<(), String> {
		if self.chain.base_denom.is_empty() {
			return Err("chain.base_denom must not be empty".to_string());
		}
		if self.chain.bech32_prefix.is_empty() {
			return Err("chain.bech32_prefix must not be empty".to_string());
		}
		if self.chain.exponent == 0 {
			return Err("chain.exponent must be greater than zero".to_string());
		}
		let websocket = url::Url::parse(&self.connections.websocket_url)
			.map_err(|e| format!("connections.websocket_url: {}", e))?;
		if websocket.scheme() != "ws" && websocket.scheme() != "wss" {
			return Err("connections.websocket_url must use a ws or wss scheme".to_string());
		}
		url::Url::parse(&self.connections.rest_url)
			.map_err(|e| format!("connections.rest_url: {}", e))?;
		if self.currency.is_empty() {
			return Err("currency must not be empty".to_string());
		}
		if self.sinks.telegram.is_none() && self.sinks.discord.is_none() {
			return Err("at least one sink (telegram or discord) must be configured".to_string());
		}
		if let Some(telegram) = &self.sinks.telegram {
			if telegram.chat_ids.is_empty() {
				return Err("sinks.telegram.chat_ids must not be empty".to_string());
			}
		}
		if let Some(discord) = &self.sinks.discord {
			if discord.channel_ids.is_empty() {
				return Err("sinks.discord.channel_ids must not be empty".to_string());
			}
		}
		if self.runtime.asset_refresh_min_secs > self.runtime.asset_refresh_max_secs {
			return Err("runtime.asset_refresh_min_secs must not exceed max".to_string());
		}
		for category in MessageCategory::ALL {
			let cfg = self.messages.for_category(category);
			if cfg.threshold < 0.0 {
				return Err(format!("{}: threshold must not be negative", category));
			}
		}
		Ok(())
	}
}
