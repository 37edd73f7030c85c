//! Notification message types shared by the renderer, filter, and dispatch
//! stages.

use std::fmt;

/// Semantic category of a notification, one per configurable message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageCategory {
	Transfer,
	IbcTransferIn,
	IbcTransferOut,
	WithdrawRewards,
	WithdrawCommission,
	Delegate,
	Undelegate,
	Redelegate,
	Restake,
	RegisterAccount,
	RegisterDomain,
	TransferAccount,
	TransferDomain,
	DeleteAccount,
}

impl MessageCategory {
	/// Every category, in the order they appear in the configuration.
	pub const ALL: [MessageCategory; 14] = [
		Self::Transfer,
		Self::IbcTransferIn,
		Self::IbcTransferOut,
		Self::WithdrawRewards,
		Self::WithdrawCommission,
		Self::Delegate,
		Self::Undelegate,
		Self::Redelegate,
		Self::Restake,
		Self::RegisterAccount,
		Self::RegisterDomain,
		Self::TransferAccount,
		Self::TransferDomain,
		Self::DeleteAccount,
	];
}

impl fmt::Display for MessageCategory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Transfer => "Transfer",
			Self::IbcTransferIn => "IBC Transfer In",
			Self::IbcTransferOut => "IBC Transfer Out",
			Self::WithdrawRewards => "Withdraw Rewards",
			Self::WithdrawCommission => "Withdraw Commission",
			Self::Delegate => "Delegation",
			Self::Undelegate => "Undelegation",
			Self::Redelegate => "Redelegation",
			Self::Restake => "Restake",
			Self::RegisterAccount => "Register Account",
			Self::RegisterDomain => "Register Domain",
			Self::TransferAccount => "Transfer Account",
			Self::TransferDomain => "Transfer Domain",
			Self::DeleteAccount => "Delete Account",
		};
		write!(f, "{}", name)
	}
}

/// A rendered notification on its way through filtering and dispatch.
///
/// Transient: produced per candidate event, dropped once dispatched (or
/// rejected). `text` is in the HTML markup subset; sinks adjust it to their
/// own dialect at delivery time.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedMessage {
	pub category: MessageCategory,
	pub text: String,
	/// The raw `<integer><denom>` amount driving the currency threshold
	/// filter. `None` for categories that carry no amount (naming actions).
	pub primary_amount: Option<String>,
}
