//! orderbook-core
//!
//! Pure matching engine logic for a single limit order book:
//! - messages (input commands / output events)
//! - order representation and price-time ordered ladders
//! - top-of-book snapshots with sentinel bounds
//! - the per-book state and the command dispatcher

pub mod side;
pub mod messages;
pub mod order;
pub mod ladder;
pub mod order_book;
pub mod matching_engine;
pub mod error;
pub mod top_of_book;

pub use side::Side;

pub use messages::{
    Ack,
    Cancel,
    CancelAck,
    InputMessage,
    NewOrder,
    OutputMessage,
    Reject,
    TopOfBook,
    Trade,
};

pub use order::{Order, OrderId, Price, Quantity, UserId};
pub use ladder::Ladder;
pub use order_book::OrderBook;
pub use matching_engine::{EngineConfig, MatchingEngine};
pub use error::EngineError;
pub use top_of_book::TopOfBookSnapshot;
