//! Error types for the core matching engine.
//!
//! Only *data* errors live here. Policy outcomes (a rejected order, a
//! cancel for an id that is not resting) are ordinary events and never
//! surface as an `Err`.
//!
//! Any `EngineError` is fatal for the book session that produced it; the
//! caller decides whether the rest of the run continues.

use thiserror::Error;

use crate::order::{OrderId, Price};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A new order arrived with a zero price.
    #[error("invalid price {price} for order {user_order_id}")]
    InvalidPrice { user_order_id: OrderId, price: Price },

    /// A ladder mutation was asked to touch a position that does not exist.
    #[error("index {index} out of bounds for ladder of length {len} in {op}")]
    IndexOutOfBounds {
        op: &'static str,
        index: usize,
        len: usize,
    },

    /// Aggregated top-of-book quantity does not fit in a `Quantity`.
    #[error("top-of-book quantity overflow at price {price}")]
    QuantityOverflow { price: Price },
}
