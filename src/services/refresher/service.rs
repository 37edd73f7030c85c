//! Background reference data refreshers.
//!
//! Each refresher loops forever on its own tokio task, replacing one slice of
//! the shared reference data wholesale on every successful fetch. A failed
//! fetch logs a warning and keeps the previous snapshot, so the pipeline never
//! sees partial data.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::models::{AppConfig, ForeignAsset, ReferenceData};
use crate::services::enrichment::EnrichmentProvider;

/// Spawns and tracks the reference data refresh loops.
pub struct BackgroundRefresher<E: EnrichmentProvider + 'static> {
	refs: Arc<ReferenceData>,
	enrichment: Arc<E>,
	price_feed_id: String,
	currency: String,
	foreign_assets: Vec<ForeignAsset>,
	refresh_interval: Duration,
	asset_jitter_secs: (u64, u64),
}

impl<E: EnrichmentProvider + 'static> BackgroundRefresher<E> {
	pub fn new(config: &AppConfig, refs: Arc<ReferenceData>, enrichment: Arc<E>) -> Self {
		Self {
			refs,
			enrichment,
			price_feed_id: config.chain.price_feed_id.clone(),
			currency: config.currency.clone(),
			foreign_assets: config.foreign_assets.clone(),
			refresh_interval: Duration::from_secs(config.runtime.refresh_interval_secs),
			asset_jitter_secs: (
				config.runtime.asset_refresh_min_secs,
				config.runtime.asset_refresh_max_secs,
			),
		}
	}

	/// Spawns every refresh loop and returns their handles.
	///
	/// Each loop refreshes once immediately, then sleeps its interval. The
	/// per-asset price loops each draw one jittered interval at spawn so the
	/// set of refreshers stays spread out over time.
	pub fn spawn_all(&self) -> Vec<JoinHandle<()>> {
		let mut handles = Vec::new();

		handles.push(self.spawn_base_price_loop());
		handles.push(self.spawn_validator_loop());
		for asset in &self.foreign_assets {
			if asset.price_feed_id.is_some() {
				handles.push(self.spawn_asset_price_loop(asset.clone()));
			}
		}

		handles
	}

	fn spawn_base_price_loop(&self) -> JoinHandle<()> {
		let refs = self.refs.clone();
		let enrichment = self.enrichment.clone();
		let price_feed_id = self.price_feed_id.clone();
		let currency = self.currency.clone();
		let interval = self.refresh_interval;

		tokio::spawn(async move {
			loop {
				refresh_base_price(&*enrichment, &refs, &price_feed_id, &currency).await;
				tokio::time::sleep(interval).await;
			}
		})
	}

	fn spawn_validator_loop(&self) -> JoinHandle<()> {
		let refs = self.refs.clone();
		let enrichment = self.enrichment.clone();
		let interval = self.refresh_interval;

		tokio::spawn(async move {
			loop {
				refresh_validators(&*enrichment, &refs).await;
				tokio::time::sleep(interval).await;
			}
		})
	}

	fn spawn_asset_price_loop(&self, asset: ForeignAsset) -> JoinHandle<()> {
		let refs = self.refs.clone();
		let enrichment = self.enrichment.clone();
		let currency = self.currency.clone();
		let (min, max) = self.asset_jitter_secs;
		let interval = Duration::from_secs(rand::rng().random_range(min..=max));

		tokio::spawn(async move {
			loop {
				refresh_asset_price(&*enrichment, &refs, &asset, &currency).await;
				tokio::time::sleep(interval).await;
			}
		})
	}
}

/// Fetches the base denom price and stores it if usable.
///
/// The price feed returns zeros when it is rate limiting, so non-positive
/// prices are discarded and the previous price stays in place.
pub async fn refresh_base_price<E: EnrichmentProvider + ?Sized>(
	enrichment: &E,
	refs: &ReferenceData,
	price_feed_id: &str,
	currency: &str,
) {
	match enrichment.coin_price(price_feed_id, currency).await {
		Ok(price) if price > 0.0 => {
			debug!(price, "base price refreshed");
			refs.set_base_price(price);
		}
		Ok(price) => {
			warn!(price, "discarding non-positive base price");
		}
		Err(e) => {
			warn!(error = %e, "base price refresh failed, keeping previous value");
		}
	}
}

/// Fetches the bonded validator set and replaces the stored snapshot.
pub async fn refresh_validators<E: EnrichmentProvider + ?Sized>(
	enrichment: &E,
	refs: &ReferenceData,
) {
	match enrichment.active_validators().await {
		Ok(validators) => {
			debug!(count = validators.len(), "validator set refreshed");
			refs.set_validators(validators);
		}
		Err(e) => {
			warn!(error = %e, "validator refresh failed, keeping previous set");
		}
	}
}

/// Fetches one foreign asset's price and stores it if usable.
pub async fn refresh_asset_price<E: EnrichmentProvider + ?Sized>(
	enrichment: &E,
	refs: &ReferenceData,
	asset: &ForeignAsset,
	currency: &str,
) {
	let Some(price_feed_id) = &asset.price_feed_id else {
		return;
	};
	match enrichment.coin_price(price_feed_id, currency).await {
		Ok(price) if price > 0.0 => {
			debug!(denom = %asset.base_denom, price, "asset price refreshed");
			refs.set_asset_price(&asset.base_denom, price);
		}
		Ok(price) => {
			warn!(denom = %asset.base_denom, price, "discarding non-positive asset price");
		}
		Err(e) => {
			warn!(
				denom = %asset.base_denom,
				error = %e,
				"asset price refresh failed, keeping previous value"
			);
		}
	}
}
