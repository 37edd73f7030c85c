//! A transaction notification pipeline for Cosmos SDK chains.
//!
//! Subscribes to a node's websocket transaction events, classifies each
//! transaction into a typed candidate event, enriches it with names, prices,
//! and memos, renders a human-readable message, filters it against the
//! configured rules, and fans it out to Telegram and Discord.

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;
