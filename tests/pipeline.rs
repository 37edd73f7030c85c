//! End-to-end pipeline test: a raw websocket frame through decoding,
//! classification, rendering against mocked REST collaborators, and the
//! outbound filters.

use std::sync::Arc;

use cosmos_tx_notifier::models::{
	ChainConfig, ConnectionsConfig, ExplorerConfig, FilterMode, MessageCategory, MessageTypeConfig,
	MessagesConfig, RawEventBag, ReferenceData,
};
use cosmos_tx_notifier::services::classifier::EventClassifier;
use cosmos_tx_notifier::services::enrichment::RestClient;
use cosmos_tx_notifier::services::filter::{is_allowed_amount, is_allowed_message};
use cosmos_tx_notifier::services::renderer::MessageRenderer;

fn chain() -> ChainConfig {
	ChainConfig {
		display_name: "FUND".to_string(),
		base_denom: "nund".to_string(),
		exponent: 9,
		bech32_prefix: "und".to_string(),
		price_feed_id: "unification".to_string(),
	}
}

fn explorer() -> ExplorerConfig {
	ExplorerConfig {
		account_url: "https://explorer.example/account/".to_string(),
		validator_url: "https://explorer.example/validator/".to_string(),
		tx_url: "https://explorer.example/tx/".to_string(),
		foreign: Vec::new(),
		generic_account_url: "https://mintscan.example/wallet/".to_string(),
	}
}

fn connections(base_url: &str) -> ConnectionsConfig {
	ConnectionsConfig {
		websocket_url: "ws://unused".to_string(),
		rest_url: base_url.to_string(),
		name_service_url: base_url.to_string(),
		name_service_contract: "osmo1contract".to_string(),
		price_feed_url: base_url.to_string(),
	}
}

fn send_frame() -> String {
	serde_json::json!({
		"jsonrpc": "2.0",
		"id": 0,
		"result": {
			"events": {
				"message.action": ["/cosmos.bank.v1beta1.MsgSend"],
				"transfer.sender": ["und1senderaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "und1senderaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"],
				"transfer.recipient": ["und1feecollectoraaaaaaaaaaaaaaaaaaaaaa", "und1recipientbbbbbbbbbbbbbbbbbbbbbbbbb"],
				"transfer.amount": ["25000nund", "1000000000nund"],
				"tx.hash": ["AAA111"]
			}
		}
	})
	.to_string()
}

#[tokio::test]
async fn send_frame_becomes_a_filtered_notification() {
	let mut server = mockito::Server::new_async().await;

	// Reverse name lookups resolve to nothing, addresses fall back to
	// truncated form
	let _names = server
		.mock(
			"GET",
			mockito::Matcher::Regex(r"^/cosmwasm/wasm/v1/contract/.*/smart/.*".to_string()),
		)
		.with_status(200)
		.with_body(r#"{"data":{"name":""}}"#)
		.expect_at_least(1)
		.create_async()
		.await;
	let _memo = server
		.mock("GET", "/cosmos/tx/v1beta1/txs/AAA111")
		.with_status(200)
		.with_body(r#"{"tx":{"body":{"memo":"rent for may"}}}"#)
		.create_async()
		.await;

	let refs = Arc::new(ReferenceData::new());
	refs.set_base_price(2.0);

	let classifier = EventClassifier::new(MessagesConfig::default());
	let renderer = MessageRenderer::new(
		chain(),
		explorer(),
		"usd",
		Vec::new(),
		Vec::new(),
		refs.clone(),
		Arc::new(RestClient::new(&connections(&server.url()))),
	);

	let bag = RawEventBag::from_frame(&send_frame()).unwrap().unwrap();
	let candidates = classifier.classify(&bag);
	assert_eq!(candidates.len(), 1);

	let message = renderer.render(&candidates[0]).await;
	assert_eq!(message.category, MessageCategory::Transfer);
	assert!(message.text.contains("<b>Transfer</b>"));
	// 1000000000nund at exponent 9 is 1 FUND, valued at the refreshed price
	assert!(message.text.contains("1.00 FUND (2.00 USD)"));
	assert!(message
		.text
		.contains(r#"href="https://explorer.example/tx/AAA111""#));
	// Fee-collection leg must not leak into the rendered message
	assert!(!message.text.contains("feecollector"));
	assert!(message.text.contains("🗒️ rent for may"));

	// Substring filter in default mode passes everything
	let defaults = MessageTypeConfig::default();
	assert!(is_allowed_message(
		message.category,
		&defaults,
		&message.text
	));

	// A 100 USD threshold suppresses this 2 USD transfer
	let thresholded = MessageTypeConfig {
		amount_filter: true,
		threshold: 100.0,
		..Default::default()
	};
	assert!(!is_allowed_amount(
		message.category,
		&thresholded,
		&chain(),
		refs.base_price(),
		message.primary_amount.as_deref(),
	));

	// A 1 USD threshold lets it through
	let permissive = MessageTypeConfig {
		amount_filter: true,
		threshold: 1.0,
		..Default::default()
	};
	assert!(is_allowed_amount(
		message.category,
		&permissive,
		&chain(),
		refs.base_price(),
		message.primary_amount.as_deref(),
	));
}

#[tokio::test]
async fn blacklisted_sender_is_suppressed() {
	let mut server = mockito::Server::new_async().await;
	let _catch_all = server
		.mock("GET", mockito::Matcher::Regex(".*".to_string()))
		.with_status(404)
		.expect_at_least(0)
		.create_async()
		.await;

	let refs = Arc::new(ReferenceData::new());
	let classifier = EventClassifier::new(MessagesConfig::default());
	let renderer = MessageRenderer::new(
		chain(),
		explorer(),
		"usd",
		Vec::new(),
		Vec::new(),
		refs,
		Arc::new(RestClient::new(&connections(&server.url()))),
	);

	let bag = RawEventBag::from_frame(&send_frame()).unwrap().unwrap();
	let message = renderer.render(&classifier.classify(&bag)[0]).await;

	let blacklist = MessageTypeConfig {
		filter: FilterMode::Blacklist,
		list: vec!["und1senderaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string()],
		..Default::default()
	};
	assert!(!is_allowed_message(
		message.category,
		&blacklist,
		&message.text
	));
}
