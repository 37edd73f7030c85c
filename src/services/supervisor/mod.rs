//! Websocket connection supervision.

mod error;
mod service;

pub use error::SupervisorError;
pub use service::{ConnectionState, ConnectionSupervisor, EventStream, SUBSCRIBE_PAYLOAD};

#[cfg(test)]
pub use service::MockEventStream;
