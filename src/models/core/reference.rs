//! Shared reference snapshots refreshed in the background.
//!
//! Rendering and filtering read the base-asset price, the validator set, and
//! per-foreign-asset prices. Each dataset is replaced wholesale on a
//! successful refresh; a failed refresh leaves the previous snapshot in place.
//! Readers clone an `Arc` under a short read lock, so no field-level locking
//! is needed.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// One validator of the home chain's active set.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorInfo {
	/// Operator (`...valoper1`) address.
	pub operator_address: String,
	/// Human-readable moniker from the validator description.
	pub moniker: String,
}

/// Process-lifetime holder for all refreshed reference datasets.
#[derive(Debug)]
pub struct ReferenceData {
	base_price: RwLock<f64>,
	validators: RwLock<Arc<Vec<ValidatorInfo>>>,
	asset_prices: RwLock<Arc<HashMap<String, f64>>>,
}

impl Default for ReferenceData {
	fn default() -> Self {
		Self {
			base_price: RwLock::new(0.0),
			validators: RwLock::new(Arc::new(Vec::new())),
			asset_prices: RwLock::new(Arc::new(HashMap::new())),
		}
	}
}

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
	lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
	lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ReferenceData {
	pub fn new() -> Self {
		Self::default()
	}

	/// Latest successfully fetched base-asset price in the display currency.
	/// Zero until the first successful refresh.
	pub fn base_price(&self) -> f64 {
		*read_lock(&self.base_price)
	}

	pub fn set_base_price(&self, price: f64) {
		*write_lock(&self.base_price) = price;
	}

	/// Latest successfully fetched validator set snapshot.
	pub fn validators(&self) -> Arc<Vec<ValidatorInfo>> {
		read_lock(&self.validators).clone()
	}

	pub fn set_validators(&self, validators: Vec<ValidatorInfo>) {
		*write_lock(&self.validators) = Arc::new(validators);
	}

	/// Price of a foreign asset keyed by its origin base denom.
	pub fn asset_price(&self, base_denom: &str) -> Option<f64> {
		read_lock(&self.asset_prices).get(base_denom).copied()
	}

	/// Replaces the asset price map with a copy holding the updated entry.
	pub fn set_asset_price(&self, base_denom: &str, price: f64) {
		let mut guard = write_lock(&self.asset_prices);
		let mut next: HashMap<String, f64> = guard.as_ref().clone();
		next.insert(base_denom.to_string(), price);
		*guard = Arc::new(next);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults_are_empty() {
		let refs = ReferenceData::new();
		assert_eq!(refs.base_price(), 0.0);
		assert!(refs.validators().is_empty());
		assert_eq!(refs.asset_price("uosmo"), None);
	}

	#[test]
	fn test_wholesale_replacement() {
		let refs = ReferenceData::new();
		refs.set_base_price(2.0);
		assert_eq!(refs.base_price(), 2.0);

		refs.set_validators(vec![ValidatorInfo {
			operator_address: "undvaloper1abc".to_string(),
			moniker: "node-one".to_string(),
		}]);
		let first = refs.validators();

		refs.set_validators(vec![]);
		// Old snapshot stays valid for readers that already hold it
		assert_eq!(first.len(), 1);
		assert!(refs.validators().is_empty());
	}

	#[test]
	fn test_asset_price_updates_preserve_other_entries() {
		let refs = ReferenceData::new();
		refs.set_asset_price("uosmo", 0.5);
		refs.set_asset_price("ugraviton", 0.01);
		assert_eq!(refs.asset_price("uosmo"), Some(0.5));
		assert_eq!(refs.asset_price("ugraviton"), Some(0.01));
	}
}
