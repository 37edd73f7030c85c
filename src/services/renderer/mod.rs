//! Message rendering: amount/denom resolution, hyperlinks, message bodies.

mod amounts;
mod service;

pub use amounts::{format_grouped, round2, split_amount_denom, DenomTotaler};
pub use service::{MessageRenderer, IBC_DENOM_PREFIX, UNKNOWN_IBC};
