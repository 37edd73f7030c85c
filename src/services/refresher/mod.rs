//! Periodic reference data refresh.

mod service;

pub use service::{
	refresh_asset_price, refresh_base_price, refresh_validators, BackgroundRefresher,
};
