//! Entry point: loads configuration, starts the background refreshers, and
//! runs the websocket event pipeline until interrupted.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use dotenvy::dotenv;
use tokio::sync::{mpsc, watch};
use tracing::info;

use cosmos_tx_notifier::bootstrap::{
	create_event_handler, initialize_services, run_event_stream, Result,
};
use cosmos_tx_notifier::models::{AppConfig, ConfigLoader};
use cosmos_tx_notifier::services::supervisor::ConnectionSupervisor;
use cosmos_tx_notifier::utils::logging::setup_logging;

/// Bounded handoff between the websocket read loop and the pipeline tasks.
const EVENT_CHANNEL_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> Result<()> {
	dotenv().ok();
	setup_logging().map_err(anyhow::Error::from_boxed)?;

	let matches = Command::new("cosmos-tx-notifier")
		.version(env!("CARGO_PKG_VERSION"))
		.about("Chain transaction event notifier for Telegram and Discord")
		.arg(
			Arg::new("config")
				.long("config")
				.short('c')
				.value_name("FILE")
				.default_value("config.json")
				.help("Path to the configuration file"),
		)
		.arg(
			Arg::new("check-config")
				.long("check-config")
				.action(ArgAction::SetTrue)
				.help("Validate the configuration and exit"),
		)
		.get_matches();

	let config_path = matches
		.get_one::<String>("config")
		.expect("config has a default value");
	let config = AppConfig::load_from_path(Path::new(config_path))
		.with_context(|| format!("loading configuration from {}", config_path))?;

	if matches.get_flag("check-config") {
		println!("configuration OK: {}", config_path);
		return Ok(());
	}

	let context = initialize_services(config)?;
	let refresher_handles = context.refresher.spawn_all();
	info!(
		refreshers = refresher_handles.len(),
		"background refreshers started"
	);

	let handler = create_event_handler(&context);
	let (bag_tx, mut bag_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
	let consumer = tokio::spawn(async move {
		while let Some(bag) = bag_rx.recv().await {
			handler(bag);
		}
	});

	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	let supervisor = Arc::new(ConnectionSupervisor::new(
		context.config.connections.websocket_url.clone(),
	));
	let reconnect_delay = Duration::from_secs(context.config.runtime.reconnect_delay_secs);

	let driver = {
		let supervisor = supervisor.clone();
		let bag_tx = bag_tx.clone();
		tokio::spawn(async move {
			run_event_stream(&*supervisor, bag_tx, reconnect_delay, shutdown_rx).await;
		})
	};

	tokio::signal::ctrl_c().await?;
	info!("shutdown signal received");
	let _ = shutdown_tx.send(true);

	// The read loop blocks on the socket, so it will not observe the
	// shutdown flag until the next frame; cut it off instead.
	driver.abort();
	let _ = driver.await;
	drop(bag_tx);
	let _ = consumer.await;
	for handle in refresher_handles {
		handle.abort();
	}

	info!("shutdown complete");
	Ok(())
}
