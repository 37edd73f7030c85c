//! Inbound transaction event types.
//!
//! A Tendermint `Tx` subscription frame carries its events as parallel string
//! arrays keyed by event attribute (`transfer.sender`, `transfer.amount`, ...).
//! Entries that belong to the same logical sub-event are correlated by
//! position, per fixed per-action offset conventions (see the classifier
//! table). This module models the decoded bag plus the typed candidate events
//! extracted from it.

use serde::Deserialize;
use std::collections::HashMap;

/// Event attribute keys emitted by the chain.
///
/// Kept as named constants so every positional access in the classifier reads
/// against the same key spelling the node emits.
pub mod keys {
	pub const MESSAGE_ACTION: &str = "message.action";
	pub const MESSAGE_SENDER: &str = "message.sender";
	pub const TX_HASH: &str = "tx.hash";

	pub const TRANSFER_SENDER: &str = "transfer.sender";
	pub const TRANSFER_RECIPIENT: &str = "transfer.recipient";
	pub const TRANSFER_AMOUNT: &str = "transfer.amount";

	pub const IBC_TRANSFER_SENDER: &str = "ibc_transfer.sender";
	pub const IBC_TRANSFER_RECEIVER: &str = "ibc_transfer.receiver";
	pub const FUNGIBLE_PACKET_SENDER: &str = "fungible_token_packet.sender";

	pub const WITHDRAW_REWARDS_VALIDATOR: &str = "withdraw_rewards.validator";
	pub const WITHDRAW_REWARDS_DELEGATOR: &str = "withdraw_rewards.delegator";
	pub const WITHDRAW_REWARDS_AMOUNT: &str = "withdraw_rewards.amount";
	pub const WITHDRAW_COMMISSION_AMOUNT: &str = "withdraw_commission.amount";

	pub const DELEGATE_VALIDATOR: &str = "delegate.validator";
	pub const DELEGATE_AMOUNT: &str = "delegate.amount";
	pub const UNBOND_VALIDATOR: &str = "unbond.validator";
	pub const UNBOND_AMOUNT: &str = "unbond.amount";
	pub const REDELEGATE_SOURCE_VALIDATOR: &str = "redelegate.source_validator";
	pub const REDELEGATE_DESTINATION_VALIDATOR: &str = "redelegate.destination_validator";
	pub const REDELEGATE_AMOUNT: &str = "redelegate.amount";

	pub const ACCOUNT_NAME: &str = "message.account_name";
	pub const DOMAIN_NAME: &str = "message.domain_name";
	pub const REGISTERER: &str = "message.registerer";
	pub const NEW_ACCOUNT_OWNER: &str = "message.new_account_owner";
	pub const NEW_DOMAIN_OWNER: &str = "message.new_domain_owner";
}

/// Map of event attribute key to its ordered value list.
pub type EventMap = HashMap<String, Vec<String>>;

#[derive(Debug, Deserialize, Default)]
struct SubscriptionFrame {
	#[serde(default)]
	result: FrameResult,
}

#[derive(Debug, Deserialize, Default)]
struct FrameResult {
	#[serde(default)]
	events: Option<EventMap>,
}

/// One decoded transaction notification.
///
/// Created per inbound frame and discarded once the frame's pipeline task
/// finishes with it.
#[derive(Debug, Clone, Default)]
pub struct RawEventBag {
	events: EventMap,
}

impl RawEventBag {
	pub fn new(events: EventMap) -> Self {
		Self { events }
	}

	/// Decodes a raw websocket frame into an event bag.
	///
	/// Returns `Ok(None)` for well-formed frames that carry no events (the
	/// subscription acknowledgement is one), and a decode error for frames
	/// that are not valid JSON.
	pub fn from_frame(frame: &str) -> Result<Option<Self>, serde_json::Error> {
		let decoded: SubscriptionFrame = serde_json::from_str(frame)?;
		Ok(decoded.result.events.map(Self::new))
	}

	/// All values recorded under `key`, empty when the key is absent.
	pub fn values(&self, key: &str) -> &[String] {
		self.events.get(key).map(Vec::as_slice).unwrap_or_default()
	}

	/// The value at `index` under `key`, if present.
	pub fn value(&self, key: &str, index: usize) -> Option<&str> {
		self.values(key).get(index).map(String::as_str)
	}

	/// Whether `key` holds at least `len` values.
	pub fn has_at_least(&self, key: &str, len: usize) -> bool {
		self.values(key).len() >= len
	}

	/// The transaction's action tags, in execution order.
	pub fn action_tags(&self) -> &[String] {
		self.values(keys::MESSAGE_ACTION)
	}

	/// The transaction hash attached to the frame.
	pub fn tx_hash(&self) -> Option<&str> {
		self.value(keys::TX_HASH, 0)
	}
}

/// A single delegator leg of an authorized batch reward restake.
#[derive(Debug, Clone, PartialEq)]
pub struct RestakeLeg {
	pub delegator: String,
	pub amount: String,
}

/// A typed event extracted from a bag, holding everything rendering needs.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateEvent {
	Transfer {
		sender: String,
		recipient: String,
		amount: String,
		tx_hash: String,
	},
	IbcTransferOut {
		sender: String,
		receiver: String,
		amount: String,
		tx_hash: String,
	},
	IbcTransferIn {
		sender: String,
		recipient: String,
		amount: String,
		tx_hash: String,
	},
	WithdrawRewards {
		delegator: String,
		validator: String,
		amount: String,
		tx_hash: String,
	},
	WithdrawCommission {
		validator: String,
		amount: String,
		tx_hash: String,
	},
	Delegate {
		delegator: String,
		validator: String,
		amount: String,
		tx_hash: String,
	},
	Undelegate {
		delegator: String,
		validator: String,
		amount: String,
		tx_hash: String,
	},
	Redelegate {
		delegator: String,
		source_validator: String,
		destination_validator: String,
		amount: String,
		tx_hash: String,
	},
	Restake {
		validator: String,
		legs: Vec<RestakeLeg>,
		tx_hash: String,
	},
	RegisterAccount {
		account: String,
		domain: String,
		registerer: String,
		tx_hash: String,
	},
	RegisterDomain {
		domain: String,
		registerer: String,
		tx_hash: String,
	},
	TransferAccount {
		account: String,
		domain: String,
		new_owner: String,
		tx_hash: String,
	},
	TransferDomain {
		domain: String,
		new_owner: String,
		tx_hash: String,
	},
	DeleteAccount {
		account: String,
		domain: String,
		sender: String,
		tx_hash: String,
	},
}

impl CandidateEvent {
	/// The filtering/config category this event belongs to.
	pub fn category(&self) -> super::message::MessageCategory {
		use super::message::MessageCategory;
		match self {
			Self::Transfer { .. } => MessageCategory::Transfer,
			Self::IbcTransferOut { .. } => MessageCategory::IbcTransferOut,
			Self::IbcTransferIn { .. } => MessageCategory::IbcTransferIn,
			Self::WithdrawRewards { .. } => MessageCategory::WithdrawRewards,
			Self::WithdrawCommission { .. } => MessageCategory::WithdrawCommission,
			Self::Delegate { .. } => MessageCategory::Delegate,
			Self::Undelegate { .. } => MessageCategory::Undelegate,
			Self::Redelegate { .. } => MessageCategory::Redelegate,
			Self::Restake { .. } => MessageCategory::Restake,
			Self::RegisterAccount { .. } => MessageCategory::RegisterAccount,
			Self::RegisterDomain { .. } => MessageCategory::RegisterDomain,
			Self::TransferAccount { .. } => MessageCategory::TransferAccount,
			Self::TransferDomain { .. } => MessageCategory::TransferDomain,
			Self::DeleteAccount { .. } => MessageCategory::DeleteAccount,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_from_frame_with_events() {
		let frame = r#"{
			"jsonrpc": "2.0",
			"result": {
				"events": {
					"message.action": ["/cosmos.bank.v1beta1.MsgSend"],
					"tx.hash": ["ABC123"]
				}
			}
		}"#;

		let bag = RawEventBag::from_frame(frame).unwrap().unwrap();
		assert_eq!(bag.action_tags(), ["/cosmos.bank.v1beta1.MsgSend"]);
		assert_eq!(bag.tx_hash(), Some("ABC123"));
	}

	#[test]
	fn test_from_frame_subscription_ack() {
		// The node acknowledges a subscription with an empty result object
		let frame = r#"{"jsonrpc": "2.0", "id": 0, "result": {}}"#;
		assert!(RawEventBag::from_frame(frame).unwrap().is_none());
	}

	#[test]
	fn test_from_frame_malformed() {
		assert!(RawEventBag::from_frame("not json").is_err());
	}

	#[test]
	fn test_value_accessors() {
		let mut events = EventMap::new();
		events.insert(
			"transfer.recipient".to_string(),
			vec!["fee-collector".to_string(), "und1xyz".to_string()],
		);
		let bag = RawEventBag::new(events);

		assert_eq!(bag.value("transfer.recipient", 1), Some("und1xyz"));
		assert_eq!(bag.value("transfer.recipient", 2), None);
		assert_eq!(bag.value("transfer.sender", 0), None);
		assert!(bag.has_at_least("transfer.recipient", 2));
		assert!(!bag.has_at_least("transfer.recipient", 3));
	}
}
