//! Enrichment services.
//!
//! Everything that turns raw chain identifiers into human-friendly data:
//! the REST collaborator client, and the account directory that resolves
//! addresses to display names.

mod accounts;
pub(crate) mod client;
mod error;

pub use accounts::{reencode_with_prefix, truncate_address, AccountDirectory};
pub use client::{EnrichmentProvider, RestClient};
pub use error::EnrichmentError;

#[cfg(test)]
pub use client::MockEnrichmentProvider;
