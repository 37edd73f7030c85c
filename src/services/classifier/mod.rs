//! Transaction event classification.
//!
//! Turns decoded event bags into typed candidate events via a fixed table of
//! recognized action tags and their positional extraction conventions.

mod service;
mod table;

pub use service::EventClassifier;
pub use table::{
	lookup, tags, ActionSpec, ACTION_TABLE, RESTAKE_DELEGATOR_STRIDE, TRANSFER_AMOUNT_IDX,
	TRANSFER_RECIPIENT_IDX, TRANSFER_SENDER_IDX,
};
