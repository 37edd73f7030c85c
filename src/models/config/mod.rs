//! Configuration loading and validation.

use std::path::Path;

pub(crate) mod error;
mod app_config;

pub use app_config::{
	AppConfig, ChainConfig, ConnectionsConfig, DiscordSinkConfig, ExplorerConfig, FilterMode,
	ForeignAsset, ForeignExplorer, MessageTypeConfig, MessagesConfig, NamedAddress, RuntimeConfig,
	SinksConfig, TelegramSinkConfig,
};
pub use error::ConfigError;

/// Common interface for loading configuration files
pub trait ConfigLoader: Sized {
	fn load_from_path(path: &Path) -> Result<Self, error::ConfigError>;

	fn validate(&self) -> Result<(), String>;

	fn is_json_file(path: &Path) -> bool {
		path.extension()
			.map(|ext| ext.to_string_lossy().to_lowercase() == "json")
			.unwrap_or(false)
	}
}
