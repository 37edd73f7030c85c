//! Domain models and data structures for the transaction notifier.
//!
//! - `config`: Configuration loading and validation
//! - `core`: Core domain models (event bags, candidate events, messages,
//!   reference snapshots)

mod config;
mod core;

pub use config::{
	AppConfig, ChainConfig, ConfigError, ConfigLoader, ConnectionsConfig, DiscordSinkConfig,
	ExplorerConfig, FilterMode, ForeignAsset, ForeignExplorer, MessageTypeConfig, MessagesConfig,
	NamedAddress, RuntimeConfig, SinksConfig, TelegramSinkConfig,
};
pub use core::{
	keys, CandidateEvent, EventMap, FormattedMessage, MessageCategory, RawEventBag, ReferenceData,
	RestakeLeg, ValidatorInfo,
};
