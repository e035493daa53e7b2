//! orderbook-replay
//!
//! Reads an order-entry CSV file, splits it into flush-terminated
//! books and replays each one against a fresh matching engine.

pub mod config;
pub mod runner;

pub use config::{Config, Overrides};
pub use runner::{replay_file, replay_session, replay_to, run, ReplaySummary};
