//! Account directory: address to display-name resolution.
//!
//! Resolution order, first match wins:
//! 1. validator moniker, matching either the operator address itself or its
//!    bech32 payload re-encoded under the account prefix
//! 2. the configured named-address table
//! 3. a name-service reverse lookup
//! 4. a fixed-width head/tail truncation of the address

use std::sync::Arc;

use bech32::{Bech32, Hrp};

use crate::{
	models::{NamedAddress, ReferenceData},
	services::enrichment::EnrichmentProvider,
};

/// Width of each end of a truncated address.
const TRUNCATION_WIDTH: usize = 7;

/// Resolves addresses to display names using the validator set snapshot, the
/// operator's named-address table, and the name service.
pub struct AccountDirectory<E> {
	account_prefix: String,
	named: Vec<NamedAddress>,
	refs: Arc<ReferenceData>,
	enrichment: Arc<E>,
}

impl<E: EnrichmentProvider> AccountDirectory<E> {
	pub fn new(
		account_prefix: String,
		named: Vec<NamedAddress>,
		refs: Arc<ReferenceData>,
		enrichment: Arc<E>,
	) -> Self {
		Self {
			account_prefix,
			named,
			refs,
			enrichment,
		}
	}

	/// Display name for an address. Never fails; the worst case is the
	/// truncated address itself.
	pub async fn display_name(&self, address: &str) -> String {
		if let Some(moniker) = self.validator_moniker(address) {
			return moniker;
		}

		if let Some(named) = self
			.named
			.iter()
			.find(|entry| entry.address == address)
		{
			return named.name.clone();
		}

		match self.enrichment.primary_name(address).await {
			Ok(Some(name)) => return format!("{} (ICNS)", name),
			Ok(None) => {}
			Err(e) => {
				tracing::debug!("name-service lookup failed for {}: {}", address, e);
			}
		}

		truncate_address(address)
	}

	/// Moniker of the validator owning `address`, matching the operator
	/// address or its account-prefix re-encoding.
	fn validator_moniker(&self, address: &str) -> Option<String> {
		for validator in self.refs.validators().iter() {
			if validator.operator_address == address {
				return Some(validator.moniker.clone());
			}
			if let Some(account) =
				reencode_with_prefix(&validator.operator_address, &self.account_prefix)
			{
				if account == address {
					return Some(validator.moniker.clone());
				}
			}
		}
		None
	}
}

/// Re-encodes a bech32 address under a different role prefix, reusing the
/// payload bytes. Returns `None` for undecodable input.
pub fn reencode_with_prefix(address: &str, prefix: &str) -> Option<String> {
	let (_, data) = bech32::decode(address).ok()?;
	let hrp = Hrp::parse(prefix).ok()?;
	bech32::encode::<Bech32>(hrp, &data).ok()
}

/// Head/tail truncation used when no name is known.
pub fn truncate_address(address: &str) -> String {
	if address.len() <= TRUNCATION_WIDTH * 2 {
		return address.to_string();
	}
	format!(
		"{}...{}",
		&address[..TRUNCATION_WIDTH],
		&address[address.len() - TRUNCATION_WIDTH..]
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::models::ValidatorInfo;
	use crate::services::enrichment::client::MockEnrichmentProvider;
	use crate::services::enrichment::EnrichmentError;

	// A real operator/account pair sharing one bech32 payload
	const OPERATOR: &str = "undvaloper1k03uvkkzmtkvfedufaxft75yqdfkfgvgsgjfwa";

	fn directory_with(
		named: Vec<NamedAddress>,
		validators: Vec<ValidatorInfo>,
		mock: MockEnrichmentProvider,
	) -> AccountDirectory<MockEnrichmentProvider> {
		let refs = Arc::new(ReferenceData::new());
		refs.set_validators(validators);
		AccountDirectory::new("und".to_string(), named, refs, Arc::new(mock))
	}

	#[test]
	fn test_reencode_round_trip() {
		let account = reencode_with_prefix(OPERATOR, "und").unwrap();
		assert!(account.starts_with("und1"));
		// Re-encoding back under the operator prefix recovers the original
		let operator = reencode_with_prefix(&account, "undvaloper").unwrap();
		assert_eq!(operator, OPERATOR);
	}

	#[test]
	fn test_truncate_address() {
		let truncated = truncate_address("und1qqqqqqqqqqqqqqqqqqqqqqqqqqqqph4djz5txt");
		assert!(truncated.starts_with("und1qqq"));
		assert!(truncated.contains("..."));
		assert!(truncated.ends_with("djz5txt"));
		// Short strings are returned untouched
		assert_eq!(truncate_address("und1short"), "und1short");
	}

	#[tokio::test]
	async fn test_validator_moniker_wins_over_named_table() {
		let account = reencode_with_prefix(OPERATOR, "und").unwrap();
		let mock = MockEnrichmentProvider::new();
		let directory = directory_with(
			vec![NamedAddress {
				name: "Exchange".to_string(),
				address: account.clone(),
			}],
			vec![ValidatorInfo {
				operator_address: OPERATOR.to_string(),
				moniker: "node-one".to_string(),
			}],
			mock,
		);

		assert_eq!(directory.display_name(&account).await, "node-one");
		assert_eq!(directory.display_name(OPERATOR).await, "node-one");
	}

	#[tokio::test]
	async fn test_named_table_wins_over_name_service() {
		let mut mock = MockEnrichmentProvider::new();
		mock.expect_primary_name().never();
		let directory = directory_with(
			vec![NamedAddress {
				name: "Burn Address".to_string(),
				address: "und1qqqqqqqqqqqqqqqqqqqqqqqqqqqqph4djz5txt".to_string(),
			}],
			vec![],
			mock,
		);

		assert_eq!(
			directory
				.display_name("und1qqqqqqqqqqqqqqqqqqqqqqqqqqqqph4djz5txt")
				.await,
			"Burn Address"
		);
	}

	#[tokio::test]
	async fn test_name_service_hit() {
		let mut mock = MockEnrichmentProvider::new();
		mock.expect_primary_name()
			.returning(|_| Ok(Some("alice".to_string())));
		let directory = directory_with(vec![], vec![], mock);

		assert_eq!(
			directory.display_name("und1someunknownaddressxyz").await,
			"alice (ICNS)"
		);
	}

	#[tokio::test]
	async fn test_lookup_failure_falls_back_to_truncation() {
		let mut mock = MockEnrichmentProvider::new();
		mock.expect_primary_name()
			.returning(|_| Err(EnrichmentError::network_error("down")));
		let directory = directory_with(vec![], vec![], mock);

		let name = directory.display_name("und1unknownaddressabcdefghijk").await;
		assert!(name.contains("..."));
	}
}
