//! Pipeline services.
//!
//! Each stage of the notification pipeline lives in its own service module:
//! supervision of the websocket subscription, classification of decoded event
//! bags, enrichment lookups, message rendering, outbound filtering, and
//! notification dispatch, plus the background reference data refreshers.

pub mod classifier;
pub mod enrichment;
pub mod filter;
pub mod notification;
pub mod refresher;
pub mod renderer;
pub mod supervisor;
