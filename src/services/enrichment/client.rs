//! REST collaborator client.
//!
//! All outbound enrichment queries go through this client: transaction memos,
//! IBC denom traces, the validator set listing, name-service reverse lookups,
//! and the price feed. Every method returns a `Result`; callers substitute
//! safe defaults on failure.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest_middleware::ClientWithMiddleware;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;

use crate::{
	models::{ConnectionsConfig, ValidatorInfo},
	services::enrichment::EnrichmentError,
	utils::http::{create_retryable_http_client, HttpRetryConfig},
};

/// Abstract enrichment collaborator, mockable in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrichmentProvider: Send + Sync {
	/// Memo attached to a transaction, looked up by hash.
	async fn transaction_memo(&self, hash: &str) -> Result<String, EnrichmentError>;

	/// Origin-chain base denom behind an `ibc/<hash>` denom.
	async fn denom_trace_base(&self, ibc_denom: &str) -> Result<String, EnrichmentError>;

	/// The chain's bonded validator set.
	async fn active_validators(&self) -> Result<Vec<ValidatorInfo>, EnrichmentError>;

	/// Reverse name-service lookup for an address, if it has a primary name.
	async fn primary_name(&self, address: &str) -> Result<Option<String>, EnrichmentError>;

	/// Current price of a coin in the given display currency.
	async fn coin_price(&self, price_feed_id: &str, currency: &str)
		-> Result<f64, EnrichmentError>;
}

#[derive(Debug, Deserialize)]
struct TxResponse {
	tx: TxBody,
}

#[derive(Debug, Deserialize)]
struct TxBody {
	body: TxBodyInner,
}

#[derive(Debug, Deserialize)]
struct TxBodyInner {
	#[serde(default)]
	memo: String,
}

#[derive(Debug, Deserialize)]
struct DenomTraceResponse {
	denom_trace: DenomTrace,
}

#[derive(Debug, Deserialize)]
struct DenomTrace {
	base_denom: String,
}

#[derive(Debug, Deserialize)]
struct ValidatorSetResponse {
	#[serde(default)]
	validators: Vec<ValidatorEntry>,
}

#[derive(Debug, Deserialize)]
struct ValidatorEntry {
	operator_address: String,
	description: ValidatorDescription,
}

#[derive(Debug, Deserialize)]
struct ValidatorDescription {
	#[serde(default)]
	moniker: String,
}

#[derive(Debug, Deserialize)]
struct NameServiceResponse {
	#[serde(default)]
	data: NameServiceData,
}

#[derive(Debug, Deserialize, Default)]
struct NameServiceData {
	#[serde(default, alias = "primary_name")]
	name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PriceResponse {
	market_data: MarketData,
}

#[derive(Debug, Deserialize)]
struct MarketData {
	#[serde(default)]
	current_price: HashMap<String, f64>,
}

/// REST client over the home chain's LCD, the name-service chain's LCD, and
/// the price feed.
pub struct RestClient {
	client: ClientWithMiddleware,
	rest_url: String,
	name_service_url: String,
	name_service_contract: String,
	price_feed_url: String,
}

impl RestClient {
	pub fn new(connections: &ConnectionsConfig) -> Self {
		let client =
			create_retryable_http_client(&HttpRetryConfig::default(), reqwest::Client::new());
		Self {
			client,
			rest_url: connections.rest_url.trim_end_matches('/').to_string(),
			name_service_url: connections.name_service_url.trim_end_matches('/').to_string(),
			name_service_contract: connections.name_service_contract.clone(),
			price_feed_url: connections.price_feed_url.trim_end_matches('/').to_string(),
		}
	}

	async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, EnrichmentError> {
		let response = self
			.client
			.get(url)
			.send()
			.await
			.map_err(|e| EnrichmentError::network_error(format!("GET {} failed: {}", url, e)))?;

		if !response.status().is_success() {
			return Err(EnrichmentError::network_error(format!(
				"GET {} returned status {}",
				url,
				response.status()
			)));
		}

		response
			.json::<T>()
			.await
			.map_err(|e| EnrichmentError::parse_error(format!("GET {} body: {}", url, e)))
	}
}

#[async_trait]
impl EnrichmentProvider for RestClient {
	async fn transaction_memo(&self, hash: &str) -> Result<String, EnrichmentError> {
		let url = format!("{}/cosmos/tx/v1beta1/txs/{}", self.rest_url, hash);
		let response: TxResponse = self.get_json(&url).await?;
		Ok(response.tx.body.memo)
	}

	async fn denom_trace_base(&self, ibc_denom: &str) -> Result<String, EnrichmentError> {
		let hash = ibc_denom.strip_prefix("ibc/").ok_or_else(|| {
			EnrichmentError::missing_data(format!("not an IBC denom: {}", ibc_denom))
		})?;
		let url = format!("{}/ibc/apps/transfer/v1/denom_traces/{}", self.rest_url, hash);
		let response: DenomTraceResponse = self.get_json(&url).await?;
		Ok(response.denom_trace.base_denom)
	}

	async fn active_validators(&self) -> Result<Vec<ValidatorInfo>, EnrichmentError> {
		let url = format!(
			"{}/cosmos/staking/v1beta1/validators?status=BOND_STATUS_BONDED&pagination.limit=500",
			self.rest_url
		);
		let response: ValidatorSetResponse = self.get_json(&url).await?;
		Ok(response
			.validators
			.into_iter()
			.map(|v| ValidatorInfo {
				operator_address: v.operator_address,
				moniker: v.description.moniker,
			})
			.collect())
	}

	async fn primary_name(&self, address: &str) -> Result<Option<String>, EnrichmentError> {
		let query = format!(r#"{{ "primary_name": {{ "address": "{}" }}}}"#, address);
		let url = format!(
			"{}/cosmwasm/wasm/v1/contract/{}/smart/{}",
			self.name_service_url,
			self.name_service_contract,
			BASE64.encode(query)
		);
		let response: NameServiceResponse = self.get_json(&url).await?;
		Ok(response.data.name.filter(|name| !name.is_empty()))
	}

	async fn coin_price(
		&self,
		price_feed_id: &str,
		currency: &str,
	) -> Result<f64, EnrichmentError> {
		let url = format!("{}/{}", self.price_feed_url, price_feed_id);
		let response: PriceResponse = self.get_json(&url).await?;
		response
			.market_data
			.current_price
			.get(&currency.to_lowercase())
			.copied()
			.ok_or_else(|| {
				EnrichmentError::missing_data(format!(
					"price feed has no {} quote for {}",
					currency, price_feed_id
				))
			})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::models::ConnectionsConfig;

	fn client_for(server: &mockito::ServerGuard) -> RestClient {
		RestClient::new(&ConnectionsConfig {
			websocket_url: "wss://unused.example/websocket".to_string(),
			rest_url: server.url(),
			name_service_url: server.url(),
			name_service_contract: "osmo1contract".to_string(),
			price_feed_url: format!("{}/coins", server.url()),
		})
	}

	#[tokio::test]
	async fn test_transaction_memo() {
		let mut server = mockito::Server::new_async().await;
		let _mock = server
			.mock("GET", "/cosmos/tx/v1beta1/txs/ABC123")
			.with_status(200)
			.with_body(r#"{"tx": {"body": {"memo": "hello"}}}"#)
			.create_async()
			.await;

		let memo = client_for(&server).transaction_memo("ABC123").await.unwrap();
		assert_eq!(memo, "hello");
	}

	#[tokio::test]
	async fn test_denom_trace_base() {
		let mut server = mockito::Server::new_async().await;
		let _mock = server
			.mock("GET", "/ibc/apps/transfer/v1/denom_traces/DEADBEEF")
			.with_status(200)
			.with_body(r#"{"denom_trace": {"path": "transfer/channel-0", "base_denom": "uosmo"}}"#)
			.create_async()
			.await;

		let base = client_for(&server)
			.denom_trace_base("ibc/DEADBEEF")
			.await
			.unwrap();
		assert_eq!(base, "uosmo");
	}

	#[tokio::test]
	async fn test_denom_trace_rejects_non_ibc_denom() {
		let server = mockito::Server::new_async().await;
		let result = client_for(&server).denom_trace_base("nund").await;
		assert!(result.is_err());
	}

	#[tokio::test]
	async fn test_active_validators() {
		let mut server = mockito::Server::new_async().await;
		let _mock = server
			.mock(
				"GET",
				"/cosmos/staking/v1beta1/validators?status=BOND_STATUS_BONDED&pagination.limit=500",
			)
			.with_status(200)
			.with_body(
				r#"{"validators": [
					{"operator_address": "undvaloper1abc", "description": {"moniker": "node-one"}}
				]}"#,
			)
			.create_async()
			.await;

		let validators = client_for(&server).active_validators().await.unwrap();
		assert_eq!(validators.len(), 1);
		assert_eq!(validators[0].moniker, "node-one");
	}

	#[tokio::test]
	async fn test_primary_name_empty_is_none() {
		let mut server = mockito::Server::new_async().await;
		let _mock = server
			.mock(
				"GET",
				mockito::Matcher::Regex("^/cosmwasm/wasm/v1/contract/osmo1contract/smart/.+$".to_string()),
			)
			.with_status(200)
			.with_body(r#"{"data": {"name": ""}}"#)
			.create_async()
			.await;

		let name = client_for(&server).primary_name("und1abc").await.unwrap();
		assert_eq!(name, None);
	}

	#[tokio::test]
	async fn test_coin_price_missing_currency() {
		let mut server = mockito::Server::new_async().await;
		let _mock = server
			.mock("GET", "/coins/unification")
			.with_status(200)
			.with_body(r#"{"market_data": {"current_price": {"usd": 2.0}}}"#)
			.create_async()
			.await;

		let client = client_for(&server);
		assert_eq!(client.coin_price("unification", "USD").await.unwrap(), 2.0);
		assert!(client.coin_price("unification", "xyz").await.is_err());
	}
}
