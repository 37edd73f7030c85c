//! Action tag lookup table.
//!
//! Maps each recognized transaction message type URL to its category, its
//! required event arrays (with minimum lengths), and a positional extractor.
//! The offsets encode the chain's event-emission conventions and must be kept
//! as-is: several event arrays carry a fee-collection leg before the
//! user-facing leg, so the user entry is not at index zero.

use crate::models::{keys, CandidateEvent, MessageCategory, RawEventBag, RestakeLeg};

/// Index of the user-facing sender within `transfer.sender`.
pub const TRANSFER_SENDER_IDX: usize = 0;
/// Index of the user-facing recipient within `transfer.recipient`. Index 0 is
/// the fee-collection leg emitted by the chain before the user transfer.
pub const TRANSFER_RECIPIENT_IDX: usize = 1;
/// Index of the user-facing amount within `transfer.amount`; pairs with the
/// recipient index above.
pub const TRANSFER_AMOUNT_IDX: usize = 1;
/// Stride over `withdraw_rewards.delegator` in an authorized restake batch:
/// each delegator appears twice, once per withdraw and redelegate leg.
pub const RESTAKE_DELEGATOR_STRIDE: usize = 2;

/// Recognized action tags.
pub mod tags {
	pub const SEND: &str = "/cosmos.bank.v1beta1.MsgSend";
	pub const IBC_TRANSFER: &str = "/ibc.applications.transfer.v1.MsgTransfer";
	pub const IBC_RECV_PACKET: &str = "/ibc.core.channel.v1.MsgRecvPacket";
	pub const WITHDRAW_REWARDS: &str = "/cosmos.distribution.v1beta1.MsgWithdrawDelegatorReward";
	pub const WITHDRAW_COMMISSION: &str =
		"/cosmos.distribution.v1beta1.MsgWithdrawValidatorCommission";
	pub const DELEGATE: &str = "/cosmos.staking.v1beta1.MsgDelegate";
	pub const UNDELEGATE: &str = "/cosmos.staking.v1beta1.MsgUndelegate";
	pub const REDELEGATE: &str = "/cosmos.staking.v1beta1.MsgBeginRedelegate";
	pub const AUTHZ_EXEC: &str = "/cosmos.authz.v1beta1.MsgExec";
	pub const REGISTER_ACCOUNT: &str = "/starnamed.x.starname.v1beta1.MsgRegisterAccount";
	pub const REGISTER_DOMAIN: &str = "/starnamed.x.starname.v1beta1.MsgRegisterDomain";
	pub const TRANSFER_ACCOUNT: &str = "/starnamed.x.starname.v1beta1.MsgTransferAccount";
	pub const TRANSFER_DOMAIN: &str = "/starnamed.x.starname.v1beta1.MsgTransferDomain";
	pub const DELETE_ACCOUNT: &str = "/starnamed.x.starname.v1beta1.MsgDeleteAccount";
}

/// One row of the classification table.
pub struct ActionSpec {
	pub tag: &'static str,
	pub category: MessageCategory,
	/// Event keys this action needs, with the minimum array length for its
	/// positional accesses. A bag failing any of these is skipped silently.
	pub required: &'static [(&'static str, usize)],
	pub extract: fn(&RawEventBag) -> Option<CandidateEvent>,
}

impl ActionSpec {
	/// Whether the bag satisfies every required-length precondition.
	pub fn requirements_met(&self, bag: &RawEventBag) -> bool {
		self.required
			.iter()
			.all(|(key, len)| bag.has_at_least(key, *len))
	}
}

/// The full classification table, scanned in action order per bag.
pub static ACTION_TABLE: &[ActionSpec] = &[
	ActionSpec {
		tag: tags::SEND,
		category: MessageCategory::Transfer,
		required: &[
			(keys::TRANSFER_SENDER, 1),
			(keys::TRANSFER_RECIPIENT, 2),
			(keys::TRANSFER_AMOUNT, 2),
			(keys::TX_HASH, 1),
		],
		extract: extract_transfer,
	},
	ActionSpec {
		tag: tags::IBC_TRANSFER,
		category: MessageCategory::IbcTransferOut,
		required: &[
			(keys::IBC_TRANSFER_SENDER, 1),
			(keys::IBC_TRANSFER_RECEIVER, 1),
			(keys::TRANSFER_AMOUNT, 2),
			(keys::TX_HASH, 1),
		],
		extract: extract_ibc_out,
	},
	ActionSpec {
		tag: tags::IBC_RECV_PACKET,
		category: MessageCategory::IbcTransferIn,
		required: &[
			(keys::FUNGIBLE_PACKET_SENDER, 1),
			(keys::TRANSFER_RECIPIENT, 2),
			(keys::TRANSFER_AMOUNT, 2),
			(keys::TX_HASH, 1),
		],
		extract: extract_ibc_in,
	},
	ActionSpec {
		tag: tags::WITHDRAW_REWARDS,
		category: MessageCategory::WithdrawRewards,
		required: &[
			(keys::WITHDRAW_REWARDS_DELEGATOR, 1),
			(keys::WITHDRAW_REWARDS_VALIDATOR, 1),
			(keys::WITHDRAW_REWARDS_AMOUNT, 1),
			(keys::TX_HASH, 1),
		],
		extract: extract_withdraw_rewards,
	},
	ActionSpec {
		tag: tags::WITHDRAW_COMMISSION,
		category: MessageCategory::WithdrawCommission,
		required: &[
			(keys::WITHDRAW_COMMISSION_AMOUNT, 1),
			(keys::MESSAGE_SENDER, 1),
			(keys::TX_HASH, 1),
		],
		extract: extract_withdraw_commission,
	},
	ActionSpec {
		tag: tags::DELEGATE,
		category: MessageCategory::Delegate,
		required: &[
			(keys::MESSAGE_SENDER, 1),
			(keys::DELEGATE_VALIDATOR, 1),
			(keys::DELEGATE_AMOUNT, 1),
			(keys::TX_HASH, 1),
		],
		extract: extract_delegate,
	},
	ActionSpec {
		tag: tags::UNDELEGATE,
		category: MessageCategory::Undelegate,
		required: &[
			(keys::MESSAGE_SENDER, 1),
			(keys::UNBOND_VALIDATOR, 1),
			(keys::UNBOND_AMOUNT, 1),
			(keys::TX_HASH, 1),
		],
		extract: extract_undelegate,
	},
	ActionSpec {
		tag: tags::REDELEGATE,
		category: MessageCategory::Redelegate,
		required: &[
			(keys::MESSAGE_SENDER, 1),
			(keys::REDELEGATE_SOURCE_VALIDATOR, 1),
			(keys::REDELEGATE_DESTINATION_VALIDATOR, 1),
			(keys::REDELEGATE_AMOUNT, 1),
			(keys::TX_HASH, 1),
		],
		extract: extract_redelegate,
	},
	ActionSpec {
		tag: tags::AUTHZ_EXEC,
		category: MessageCategory::Restake,
		required: &[
			(keys::WITHDRAW_REWARDS_VALIDATOR, 1),
			(keys::WITHDRAW_REWARDS_DELEGATOR, 1),
			(keys::WITHDRAW_REWARDS_AMOUNT, 1),
			(keys::TX_HASH, 1),
		],
		extract: extract_restake,
	},
	ActionSpec {
		tag: tags::REGISTER_ACCOUNT,
		category: MessageCategory::RegisterAccount,
		required: &[
			(keys::ACCOUNT_NAME, 1),
			(keys::DOMAIN_NAME, 1),
			(keys::REGISTERER, 1),
			(keys::TX_HASH, 1),
		],
		extract: extract_register_account,
	},
	ActionSpec {
		tag: tags::REGISTER_DOMAIN,
		category: MessageCategory::RegisterDomain,
		required: &[
			(keys::DOMAIN_NAME, 1),
			(keys::REGISTERER, 1),
			(keys::TX_HASH, 1),
		],
		extract: extract_register_domain,
	},
	ActionSpec {
		tag: tags::TRANSFER_ACCOUNT,
		category: MessageCategory::TransferAccount,
		required: &[
			(keys::ACCOUNT_NAME, 1),
			(keys::DOMAIN_NAME, 1),
			(keys::NEW_ACCOUNT_OWNER, 1),
			(keys::TX_HASH, 1),
		],
		extract: extract_transfer_account,
	},
	ActionSpec {
		tag: tags::TRANSFER_DOMAIN,
		category: MessageCategory::TransferDomain,
		required: &[
			(keys::DOMAIN_NAME, 1),
			(keys::NEW_DOMAIN_OWNER, 1),
			(keys::TX_HASH, 1),
		],
		extract: extract_transfer_domain,
	},
	ActionSpec {
		tag: tags::DELETE_ACCOUNT,
		category: MessageCategory::DeleteAccount,
		required: &[
			(keys::ACCOUNT_NAME, 1),
			(keys::DOMAIN_NAME, 1),
			(keys::MESSAGE_SENDER, 1),
			(keys::TX_HASH, 1),
		],
		extract: extract_delete_account,
	},
];

/// Table row for a tag, if the tag is recognized.
pub fn lookup(tag: &str) -> Option<&'static ActionSpec> {
	ACTION_TABLE.iter().find(|spec| spec.tag == tag)
}

fn tx_hash(bag: &RawEventBag) -> Option<String> {
	bag.tx_hash().map(str::to_string)
}

fn extract_transfer(bag: &RawEventBag) -> Option<CandidateEvent> {
	Some(CandidateEvent::Transfer {
		sender: bag.value(keys::TRANSFER_SENDER, TRANSFER_SENDER_IDX)?.to_string(),
		recipient: bag
			.value(keys::TRANSFER_RECIPIENT, TRANSFER_RECIPIENT_IDX)?
			.to_string(),
		amount: bag.value(keys::TRANSFER_AMOUNT, TRANSFER_AMOUNT_IDX)?.to_string(),
		tx_hash: tx_hash(bag)?,
	})
}

fn extract_ibc_out(bag: &RawEventBag) -> Option<CandidateEvent> {
	Some(CandidateEvent::IbcTransferOut {
		sender: bag.value(keys::IBC_TRANSFER_SENDER, 0)?.to_string(),
		receiver: bag.value(keys::IBC_TRANSFER_RECEIVER, 0)?.to_string(),
		amount: bag.value(keys::TRANSFER_AMOUNT, TRANSFER_AMOUNT_IDX)?.to_string(),
		tx_hash: tx_hash(bag)?,
	})
}

fn extract_ibc_in(bag: &RawEventBag) -> Option<CandidateEvent> {
	Some(CandidateEvent::IbcTransferIn {
		sender: bag.value(keys::FUNGIBLE_PACKET_SENDER, 0)?.to_string(),
		recipient: bag
			.value(keys::TRANSFER_RECIPIENT, TRANSFER_RECIPIENT_IDX)?
			.to_string(),
		amount: bag.value(keys::TRANSFER_AMOUNT, TRANSFER_AMOUNT_IDX)?.to_string(),
		tx_hash: tx_hash(bag)?,
	})
}

fn extract_withdraw_rewards(bag: &RawEventBag) -> Option<CandidateEvent> {
	Some(CandidateEvent::WithdrawRewards {
		delegator: bag.value(keys::WITHDRAW_REWARDS_DELEGATOR, 0)?.to_string(),
		validator: bag.value(keys::WITHDRAW_REWARDS_VALIDATOR, 0)?.to_string(),
		amount: bag.value(keys::WITHDRAW_REWARDS_AMOUNT, 0)?.to_string(),
		tx_hash: tx_hash(bag)?,
	})
}

fn extract_withdraw_commission(bag: &RawEventBag) -> Option<CandidateEvent> {
	Some(CandidateEvent::WithdrawCommission {
		validator: bag.value(keys::MESSAGE_SENDER, 0)?.to_string(),
		amount: bag.value(keys::WITHDRAW_COMMISSION_AMOUNT, 0)?.to_string(),
		tx_hash: tx_hash(bag)?,
	})
}

fn extract_delegate(bag: &RawEventBag) -> Option<CandidateEvent> {
	Some(CandidateEvent::Delegate {
		delegator: bag.value(keys::MESSAGE_SENDER, 0)?.to_string(),
		validator: bag.value(keys::DELEGATE_VALIDATOR, 0)?.to_string(),
		amount: bag.value(keys::DELEGATE_AMOUNT, 0)?.to_string(),
		tx_hash: tx_hash(bag)?,
	})
}

fn extract_undelegate(bag: &RawEventBag) -> Option<CandidateEvent> {
	Some(CandidateEvent::Undelegate {
		delegator: bag.value(keys::MESSAGE_SENDER, 0)?.to_string(),
		validator: bag.value(keys::UNBOND_VALIDATOR, 0)?.to_string(),
		amount: bag.value(keys::UNBOND_AMOUNT, 0)?.to_string(),
		tx_hash: tx_hash(bag)?,
	})
}

fn extract_redelegate(bag: &RawEventBag) -> Option<CandidateEvent> {
	Some(CandidateEvent::Redelegate {
		delegator: bag.value(keys::MESSAGE_SENDER, 0)?.to_string(),
		source_validator: bag.value(keys::REDELEGATE_SOURCE_VALIDATOR, 0)?.to_string(),
		destination_validator: bag
			.value(keys::REDELEGATE_DESTINATION_VALIDATOR, 0)?
			.to_string(),
		amount: bag.value(keys::REDELEGATE_AMOUNT, 0)?.to_string(),
		tx_hash: tx_hash(bag)?,
	})
}

/// A restake batch repeats each delegator in `withdraw_rewards.delegator`
/// (withdraw leg plus redelegate leg); stepping by two pairs each delegator
/// with one entry of `withdraw_rewards.amount`.
fn extract_restake(bag: &RawEventBag) -> Option<CandidateEvent> {
	let delegators = bag.values(keys::WITHDRAW_REWARDS_DELEGATOR);
	let amounts = bag.values(keys::WITHDRAW_REWARDS_AMOUNT);

	let mut legs = Vec::new();
	for (i, delegator) in delegators
		.iter()
		.step_by(RESTAKE_DELEGATOR_STRIDE)
		.enumerate()
	{
		let Some(amount) = amounts.get(i) else { break };
		legs.push(RestakeLeg {
			delegator: delegator.clone(),
			amount: amount.clone(),
		});
	}
	if legs.is_empty() {
		return None;
	}

	Some(CandidateEvent::Restake {
		validator: bag.value(keys::WITHDRAW_REWARDS_VALIDATOR, 0)?.to_string(),
		legs,
		tx_hash: tx_hash(bag)?,
	})
}

fn extract_register_account(bag: &RawEventBag) -> Option<CandidateEvent> {
	Some(CandidateEvent::RegisterAccount {
		account: bag.value(keys::ACCOUNT_NAME, 0)?.to_string(),
		domain: bag.value(keys::DOMAIN_NAME, 0)?.to_string(),
		registerer: bag.value(keys::REGISTERER, 0)?.to_string(),
		tx_hash: tx_hash(bag)?,
	})
}

fn extract_register_domain(bag: &RawEventBag) -> Option<CandidateEvent> {
	Some(CandidateEvent::RegisterDomain {
		domain: bag.value(keys::DOMAIN_NAME, 0)?.to_string(),
		registerer: bag.value(keys::REGISTERER, 0)?.to_string(),
		tx_hash: tx_hash(bag)?,
	})
}

fn extract_transfer_account(bag: &RawEventBag) -> Option<CandidateEvent> {
	Some(CandidateEvent::TransferAccount {
		account: bag.value(keys::ACCOUNT_NAME, 0)?.to_string(),
		domain: bag.value(keys::DOMAIN_NAME, 0)?.to_string(),
		new_owner: bag.value(keys::NEW_ACCOUNT_OWNER, 0)?.to_string(),
		tx_hash: tx_hash(bag)?,
	})
}

fn extract_transfer_domain(bag: &RawEventBag) -> Option<CandidateEvent> {
	Some(CandidateEvent::TransferDomain {
		domain: bag.value(keys::DOMAIN_NAME, 0)?.to_string(),
		new_owner: bag.value(keys::NEW_DOMAIN_OWNER, 0)?.to_string(),
		tx_hash: tx_hash(bag)?,
	})
}

fn extract_delete_account(bag: &RawEventBag) -> Option<CandidateEvent> {
	Some(CandidateEvent::DeleteAccount {
		account: bag.value(keys::ACCOUNT_NAME, 0)?.to_string(),
		domain: bag.value(keys::DOMAIN_NAME, 0)?.to_string(),
		sender: bag.value(keys::MESSAGE_SENDER, 0)?.to_string(),
		tx_hash: tx_hash(bag)?,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::models::EventMap;

	fn bag(entries: &[(&str, &[&str])]) -> RawEventBag {
		let mut events = EventMap::new();
		for (key, values) in entries {
			events.insert(
				key.to_string(),
				values.iter().map(|v| v.to_string()).collect(),
			);
		}
		RawEventBag::new(events)
	}

	#[test]
	fn test_table_has_unique_tags_and_categories() {
		for (i, a) in ACTION_TABLE.iter().enumerate() {
			for b in &ACTION_TABLE[i + 1..] {
				assert_ne!(a.tag, b.tag);
				assert_ne!(a.category, b.category);
			}
		}
	}

	#[test]
	fn test_lookup() {
		assert!(lookup(tags::SEND).is_some());
		assert!(lookup("/cosmos.gov.v1beta1.MsgVote").is_none());
	}

	#[test]
	fn test_transfer_uses_second_recipient_entry() {
		let bag = bag(&[
			(keys::TRANSFER_SENDER, &["und1sender", "und1sender"]),
			(keys::TRANSFER_RECIPIENT, &["und1feecollector", "und1user"]),
			(keys::TRANSFER_AMOUNT, &["25000nund", "1000000000nund"]),
			(keys::TX_HASH, &["AAA"]),
		]);

		let event = extract_transfer(&bag).unwrap();
		match event {
			CandidateEvent::Transfer {
				sender,
				recipient,
				amount,
				..
			} => {
				assert_eq!(sender, "und1sender");
				assert_eq!(recipient, "und1user");
				assert_eq!(amount, "1000000000nund");
			}
			other => panic!("unexpected candidate: {:?}", other),
		}
	}

	#[test]
	fn test_requirements_guard_short_arrays() {
		let spec = lookup(tags::SEND).unwrap();
		// Only the fee leg is present, the user leg is missing
		let short = bag(&[
			(keys::TRANSFER_SENDER, &["und1sender"]),
			(keys::TRANSFER_RECIPIENT, &["und1feecollector"]),
			(keys::TRANSFER_AMOUNT, &["25000nund"]),
			(keys::TX_HASH, &["AAA"]),
		]);
		assert!(!spec.requirements_met(&short));
		// The extractor itself also refuses to index past the end
		assert!(extract_transfer(&short).is_none());
	}

	#[test]
	fn test_restake_pairs_every_second_delegator() {
		let bag = bag(&[
			(keys::WITHDRAW_REWARDS_VALIDATOR, &["undvaloper1val"]),
			(
				keys::WITHDRAW_REWARDS_DELEGATOR,
				&["und1a", "und1a", "und1b", "und1b", "und1c", "und1c"],
			),
			(
				keys::WITHDRAW_REWARDS_AMOUNT,
				&["100nund", "200nund", "300nund"],
			),
			(keys::TX_HASH, &["BBB"]),
		]);

		let event = extract_restake(&bag).unwrap();
		match event {
			CandidateEvent::Restake { legs, .. } => {
				assert_eq!(legs.len(), 3);
				assert_eq!(legs[0], RestakeLeg {
					delegator: "und1a".to_string(),
					amount: "100nund".to_string(),
				});
				assert_eq!(legs[2].delegator, "und1c");
				assert_eq!(legs[2].amount, "300nund");
			}
			other => panic!("unexpected candidate: {:?}", other),
		}
	}

	#[test]
	fn test_restake_with_fewer_amounts_than_delegators() {
		// Truncated amount array pairs only as far as it reaches
		let bag = bag(&[
			(keys::WITHDRAW_REWARDS_VALIDATOR, &["undvaloper1val"]),
			(
				keys::WITHDRAW_REWARDS_DELEGATOR,
				&["und1a", "und1a", "und1b", "und1b"],
			),
			(keys::WITHDRAW_REWARDS_AMOUNT, &["100nund"]),
			(keys::TX_HASH, &["BBB"]),
		]);

		match extract_restake(&bag).unwrap() {
			CandidateEvent::Restake { legs, .. } => assert_eq!(legs.len(), 1),
			other => panic!("unexpected candidate: {:?}", other),
		}
	}
}
