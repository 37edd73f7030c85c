//! Bootstraps all services and wires the event pipeline together.
//!
//! Construction happens once at startup: the enrichment client, the shared
//! reference data, the classifier, the renderer, and the notification fan-out
//! are built from the loaded configuration. Each decoded event bag is then
//! processed on its own tokio task so a slow enrichment lookup never stalls
//! the websocket read loop.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use crate::models::{AppConfig, RawEventBag, ReferenceData};
use crate::services::classifier::EventClassifier;
use crate::services::enrichment::{EnrichmentProvider, RestClient};
use crate::services::filter::{is_allowed_amount, is_allowed_message};
use crate::services::notification::NotificationService;
use crate::services::refresher::BackgroundRefresher;
use crate::services::renderer::MessageRenderer;
use crate::services::supervisor::EventStream;

/// Result type for startup and runtime errors.
pub type Result<T> = anyhow::Result<T>;

/// Everything the pipeline needs, built once from configuration.
pub struct ServiceContext<E: EnrichmentProvider + 'static> {
	pub config: AppConfig,
	pub refs: Arc<ReferenceData>,
	pub classifier: Arc<EventClassifier>,
	pub renderer: Arc<MessageRenderer<E>>,
	pub notifications: Arc<NotificationService>,
	pub refresher: BackgroundRefresher<E>,
}

/// Builds the full service context from configuration.
pub fn initialize_services(config: AppConfig) -> Result<ServiceContext<RestClient>> {
	let enrichment = Arc::new(RestClient::new(&config.connections));
	let refs = Arc::new(ReferenceData::new());

	let classifier = Arc::new(EventClassifier::new(config.messages.clone()));
	let renderer = Arc::new(MessageRenderer::new(
		config.chain.clone(),
		config.explorer.clone(),
		&config.currency,
		config.foreign_assets.clone(),
		config.named_addresses.clone(),
		refs.clone(),
		enrichment.clone(),
	));
	let notifications = Arc::new(
		NotificationService::from_config(&config.sinks)
			.context("building notification sinks")?,
	);
	let refresher = BackgroundRefresher::new(&config, refs.clone(), enrichment);

	info!(
		chain = %config.chain.display_name,
		"services initialized"
	);

	Ok(ServiceContext {
		config,
		refs,
		classifier,
		renderer,
		notifications,
		refresher,
	})
}

/// Runs one event bag through classify, render, filter, and dispatch.
pub async fn process_event_bag<E: EnrichmentProvider>(
	bag: RawEventBag,
	config: &AppConfig,
	refs: &ReferenceData,
	classifier: &EventClassifier,
	renderer: &MessageRenderer<E>,
	notifications: &NotificationService,
) {
	for candidate in classifier.classify(&bag) {
		let message = renderer.render(&candidate).await;
		let type_config = config.messages.for_category(message.category);

		if !is_allowed_message(message.category, type_config, &message.text) {
			continue;
		}
		if !is_allowed_amount(
			message.category,
			type_config,
			&config.chain,
			refs.base_price(),
			message.primary_amount.as_deref(),
		) {
			continue;
		}

		let report = notifications.dispatch(&message.text).await;
		info!(
			category = %message.category,
			delivered = report.delivered,
			failed = report.failed,
			"notification dispatched"
		);
	}
}

/// Returns a handler that processes each bag on its own tokio task.
pub fn create_event_handler<E: EnrichmentProvider + 'static>(
	context: &ServiceContext<E>,
) -> Arc<dyn Fn(RawEventBag) + Send + Sync> {
	let config = Arc::new(context.config.clone());
	let refs = context.refs.clone();
	let classifier = context.classifier.clone();
	let renderer = context.renderer.clone();
	let notifications = context.notifications.clone();

	Arc::new(move |bag: RawEventBag| {
		let config = config.clone();
		let refs = refs.clone();
		let classifier = classifier.clone();
		let renderer = renderer.clone();
		let notifications = notifications.clone();
		tokio::spawn(async move {
			process_event_bag(bag, &config, &refs, &classifier, &renderer, &notifications)
				.await;
		});
	})
}

/// Drives the event stream, reconnecting after every fault.
///
/// The stream returning `Ok` means the sink was closed for shutdown and the
/// loop exits. Any error waits out the reconnect delay and dials again, until
/// the shutdown signal flips.
pub async fn run_event_stream<S: EventStream + ?Sized>(
	stream: &S,
	sink: mpsc::Sender<RawEventBag>,
	reconnect_delay: Duration,
	mut shutdown: watch::Receiver<bool>,
) {
	loop {
		if *shutdown.borrow() {
			return;
		}

		match stream.run(sink.clone()).await {
			Ok(()) => {
				info!("event stream closed for shutdown");
				return;
			}
			Err(e) => {
				warn!(
					error = %e,
					delay_secs = reconnect_delay.as_secs(),
					"event stream faulted, reconnecting"
				);
			}
		}

		tokio::select! {
			_ = shutdown.changed() => {
				if *shutdown.borrow() {
					return;
				}
			}
			_ = tokio::time::sleep(reconnect_delay) => {}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::services::supervisor::{MockEventStream, SupervisorError};
	use std::sync::atomic::{AtomicUsize, Ordering};

	#[tokio::test]
	async fn test_driver_reconnects_after_faults() {
		let attempts = Arc::new(AtomicUsize::new(0));
		let counted = attempts.clone();

		let mut stream = MockEventStream::new();
		stream.expect_run().returning(move |_| {
			// Fail twice, then report an orderly shutdown
			if counted.fetch_add(1, Ordering::SeqCst) < 2 {
				Err(SupervisorError::ConnectionError("dropped".to_string()))
			} else {
				Ok(())
			}
		});

		let (tx, _rx) = mpsc::channel(1);
		let (_shutdown_tx, shutdown_rx) = watch::channel(false);

		run_event_stream(&stream, tx, Duration::from_millis(1), shutdown_rx).await;
		assert_eq!(attempts.load(Ordering::SeqCst), 3);
	}

	#[tokio::test]
	async fn test_driver_exits_on_shutdown_signal() {
		let mut stream = MockEventStream::new();
		stream
			.expect_run()
			.returning(|_| Err(SupervisorError::ConnectionError("dropped".to_string())));

		let (tx, _rx) = mpsc::channel(1);
		let (shutdown_tx, shutdown_rx) = watch::channel(false);

		let driver = tokio::spawn(run_event_stream_owned(stream, tx, shutdown_rx));
		shutdown_tx.send(true).unwrap();

		tokio::time::timeout(Duration::from_secs(1), driver)
			.await
			.expect("driver should exit after shutdown")
			.unwrap();
	}

	async fn run_event_stream_owned(
		stream: MockEventStream,
		sink: mpsc::Sender<RawEventBag>,
		shutdown: watch::Receiver<bool>,
	) {
		run_event_stream(&stream, sink, Duration::from_secs(60), shutdown).await;
	}
}
