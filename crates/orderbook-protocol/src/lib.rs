//! orderbook-protocol
//!
//! Text encoding/decoding around the order book core.
//!
//! This crate is responsible for turning raw CSV lines into logical
//! engine messages (`orderbook_core::InputMessage`), grouping them into
//! independent book sessions, and rendering `OutputMessage`s back into
//! event lines.
//!
//! - [`csv_codec`] : line parser and event formatter
//! - [`session`]   : splits an input file into flush-terminated books

pub mod error;
pub mod csv_codec;
pub mod session;

pub use error::ParseError;

pub use csv_codec::{format_output, parse_input_line};

pub use session::{split_sessions, BookSession, SessionCommand};
