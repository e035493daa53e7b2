//! Message types used by the core matching engine.
//!
//! These are **transport-agnostic** logical messages:
//! - [`InputMessage`]: what the engine consumes.
//! - [`OutputMessage`]: what the engine produces.
//!
//! Note: the CSV parser and line formatter live in the
//! `orderbook-protocol` crate; this module is purely logical.

use crate::order::{OrderId, Price, Quantity, UserId};
use crate::side::Side;

/// A command replayed into one book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMessage {
    /// New limit order.
    NewOrder(NewOrder),

    /// Cancel a resting order by `user_order_id`.
    Cancel(Cancel),

    /// Reset the book to its freshly constructed state.
    Flush,
}

/// An event emitted by the matching engine, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMessage {
    /// A new order was accepted into the book.
    Ack(Ack),

    /// A new order was refused because it would cross the book.
    Reject(Reject),

    /// A resting order was cancelled.
    CancelAck(CancelAck),

    /// The best bid and best ask were matched against each other.
    Trade(Trade),

    /// The best level on one side changed.
    TopOfBook(TopOfBook),
}

/// New order message (input).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub user_id: UserId,

    /// Instrument symbol. Carried along, never used for matching.
    pub symbol: String,

    /// Limit price. Zero is a data error.
    pub price: Price,

    pub quantity: Quantity,

    pub side: Side,

    /// Identifier for cancelling later; unique within a book session.
    pub user_order_id: OrderId,
}

/// Cancel message (input).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cancel {
    pub user_id: UserId,
    pub user_order_id: OrderId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    pub user_id: UserId,
    pub user_order_id: OrderId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reject {
    pub user_id: UserId,
    pub user_order_id: OrderId,
}

/// Acknowledgement of a successful cancel.
///
/// `user_id` echoes the cancel command, not the resting order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelAck {
    pub user_id: UserId,
    pub user_order_id: OrderId,
}

/// Trade event (output). Price and quantity are the ask's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    pub user_id_buy: UserId,
    pub user_order_id_buy: OrderId,

    pub user_id_sell: UserId,
    pub user_order_id_sell: OrderId,

    pub price: Price,
    pub quantity: Quantity,
}

/// Top-of-book event (output).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopOfBook {
    /// Side this TOB event refers to (bid or ask).
    pub side: Side,

    /// Best price; meaningless when `eliminated`.
    pub price: Price,

    /// Quantity the front order's user has at the best price.
    pub total_quantity: Quantity,

    /// True when the side is empty.
    /// When `true`, `price` and `total_quantity` should be ignored.
    pub eliminated: bool,
}

// -----------------------------------------------------------------------------
// Convenience constructors
// -----------------------------------------------------------------------------

impl OutputMessage {
    pub fn ack(user_id: UserId, user_order_id: OrderId) -> Self {
        OutputMessage::Ack(Ack {
            user_id,
            user_order_id,
        })
    }

    pub fn reject(user_id: UserId, user_order_id: OrderId) -> Self {
        OutputMessage::Reject(Reject {
            user_id,
            user_order_id,
        })
    }

    pub fn cancel_ack(user_id: UserId, user_order_id: OrderId) -> Self {
        OutputMessage::CancelAck(CancelAck {
            user_id,
            user_order_id,
        })
    }

    pub fn trade(
        user_id_buy: UserId,
        user_order_id_buy: OrderId,
        user_id_sell: UserId,
        user_order_id_sell: OrderId,
        price: Price,
        quantity: Quantity,
    ) -> Self {
        OutputMessage::Trade(Trade {
            user_id_buy,
            user_order_id_buy,
            user_id_sell,
            user_order_id_sell,
            price,
            quantity,
        })
    }

    /// Convenience constructor for a non-eliminated top-of-book event.
    pub fn top_of_book(side: Side, price: Price, total_quantity: Quantity) -> Self {
        OutputMessage::TopOfBook(TopOfBook {
            side,
            price,
            total_quantity,
            eliminated: false,
        })
    }

    /// Convenience constructor for an eliminated top-of-book event.
    pub fn top_of_book_eliminated(side: Side) -> Self {
        OutputMessage::TopOfBook(TopOfBook {
            side,
            price: 0,
            total_quantity: 0,
            eliminated: true,
        })
    }
}
