//! Core domain models for the transaction notifier.
//!
//! This module contains the fundamental data structures that flow through the
//! pipeline:
//! - Event bags and candidate events decoded from the subscription stream
//! - Formatted notification messages and their categories
//! - Shared reference snapshots (prices, validator set)

mod event;
mod message;
mod reference;

pub use event::{keys, CandidateEvent, EventMap, RawEventBag, RestakeLeg};
pub use message::{FormattedMessage, MessageCategory};
pub use reference::{ReferenceData, ValidatorInfo};
