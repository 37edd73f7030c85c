//! Event classification service.
//!
//! Scans a decoded event bag's action tags against the classification table
//! and extracts at most one primary candidate event. A reward withdrawal may
//! additionally carry a commission withdrawal in the same transaction, which
//! is the only case where two candidates come out of one bag.

use tracing::debug;

use super::table::{self, tags};
use crate::models::{CandidateEvent, MessagesConfig, RawEventBag};

/// Classifies decoded event bags into typed candidate events.
pub struct EventClassifier {
	messages: MessagesConfig,
}

impl EventClassifier {
	pub fn new(messages: MessagesConfig) -> Self {
		Self { messages }
	}

	/// Extracts the candidate events a bag produces.
	///
	/// Action tags are scanned in order. The first tag whose category is
	/// enabled and whose event arrays satisfy the table's length requirements
	/// yields the bag's candidate, and scanning stops there, except that a
	/// reward withdrawal keeps scanning for a commission withdrawal in the
	/// same transaction. Unrecognized tags, disabled categories, and bags
	/// whose arrays are too short all classify to nothing.
	pub fn classify(&self, bag: &RawEventBag) -> Vec<CandidateEvent> {
		let mut candidates = Vec::new();

		for tag in bag.action_tags() {
			let Some(spec) = table::lookup(tag) else {
				debug!(tag = %tag, "skipping unrecognized action tag");
				continue;
			};
			if !self.messages.for_category(spec.category).enabled {
				continue;
			}
			if !spec.requirements_met(bag) {
				debug!(
					tag = %tag,
					"skipping candidate with incomplete event arrays"
				);
				continue;
			}
			let Some(candidate) = (spec.extract)(bag) else {
				continue;
			};

			let keep_scanning = matches!(candidate, CandidateEvent::WithdrawRewards { .. });
			candidates.push(candidate);
			if !keep_scanning {
				break;
			}
			// Only a trailing commission withdrawal may join a reward
			// withdrawal in the same notification batch.
			if let Some(commission) = self.scan_for_commission(bag, tag) {
				candidates.push(commission);
			}
			break;
		}

		candidates
	}

	fn scan_for_commission(&self, bag: &RawEventBag, after: &str) -> Option<CandidateEvent> {
		let spec = table::lookup(tags::WITHDRAW_COMMISSION)?;
		if !self.messages.for_category(spec.category).enabled {
			return None;
		}
		let remaining = bag
			.action_tags()
			.iter()
			.skip_while(|tag| tag.as_str() != after)
			.skip(1);
		for tag in remaining {
			if tag == tags::WITHDRAW_COMMISSION && spec.requirements_met(bag) {
				return (spec.extract)(bag);
			}
		}
		None
	}
}
