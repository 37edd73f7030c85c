//! Websocket event stream supervision.
//!
//! One supervisor owns one websocket session: dial, subscribe to transaction
//! events, then read frames sequentially and hand decoded bags to the sink
//! channel. Every session-ending condition surfaces as a single error return;
//! the reconnect loop around the stream decides what happens next.

use std::sync::Mutex;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info};

use super::SupervisorError;
use crate::models::RawEventBag;

/// Subscription request for all transaction events.
pub const SUBSCRIBE_PAYLOAD: &str =
	r#"{"jsonrpc":"2.0","method":"subscribe","id":0,"params":{"query":"tm.event='Tx'"}}"#;

/// Lifecycle of one websocket session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConnectionState {
	Idle,
	Dialing,
	Subscribing,
	Listening,
	Faulted,
}

/// A source of decoded transaction event bags.
///
/// `run` drives one session to completion: it returns `Ok(())` only when the
/// sink is closed (orderly shutdown), and any `Err` is the signal for one
/// reconnect cycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventStream: Send + Sync {
	async fn run(&self, sink: mpsc::Sender<RawEventBag>) -> Result<(), SupervisorError>;
}

/// Tendermint websocket subscription stream.
pub struct ConnectionSupervisor {
	url: String,
	state: Mutex<ConnectionState>,
}

impl ConnectionSupervisor {
	pub fn new(url: String) -> Self {
		Self {
			url,
			state: Mutex::new(ConnectionState::Idle),
		}
	}

	pub fn state(&self) -> ConnectionState {
		*self.state.lock().unwrap_or_else(|p| p.into_inner())
	}

	fn set_state(&self, state: ConnectionState) {
		*self.state.lock().unwrap_or_else(|p| p.into_inner()) = state;
	}
}

#[async_trait]
impl EventStream for ConnectionSupervisor {
	async fn run(&self, sink: mpsc::Sender<RawEventBag>) -> Result<(), SupervisorError> {
		self.set_state(ConnectionState::Dialing);
		let (mut ws, _) = connect_async(self.url.as_str()).await.map_err(|e| {
			self.set_state(ConnectionState::Faulted);
			SupervisorError::connection_error(format!("failed to dial {}: {}", self.url, e))
		})?;
		info!(url = %self.url, "websocket connected");

		self.set_state(ConnectionState::Subscribing);
		ws.send(Message::Text(SUBSCRIBE_PAYLOAD.into()))
			.await
			.map_err(|e| {
				self.set_state(ConnectionState::Faulted);
				SupervisorError::subscribe_error(e.to_string())
			})?;

		self.set_state(ConnectionState::Listening);
		while let Some(frame) = ws.next().await {
			let frame = frame.map_err(|e| {
				self.set_state(ConnectionState::Faulted);
				SupervisorError::connection_error(e.to_string())
			})?;

			match frame {
				Message::Text(text) => {
					match RawEventBag::from_frame(text.as_str()) {
						Ok(Some(bag)) => {
							if sink.send(bag).await.is_err() {
								// Receiver gone means the process is shutting down
								self.set_state(ConnectionState::Idle);
								return Ok(());
							}
						}
						Ok(None) => {
							debug!("skipping frame without events");
						}
						Err(e) => {
							self.set_state(ConnectionState::Faulted);
							return Err(SupervisorError::decode_error(e.to_string()));
						}
					}
				}
				Message::Close(_) => {
					self.set_state(ConnectionState::Faulted);
					return Err(SupervisorError::connection_error(
						"server closed the connection",
					));
				}
				// Control and binary frames carry no transaction events
				_ => {}
			}
		}

		self.set_state(ConnectionState::Faulted);
		Err(SupervisorError::connection_error("stream ended"))
	}
}
