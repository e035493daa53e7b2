//! Internal order representation used inside the ladders.
//!
//! Orders are immutable once they rest: there are no partial fills, so
//! an order only ever leaves the book whole (cancel or trade).

use crate::messages::NewOrder;
use crate::side::Side;

pub type UserId = i64;
pub type OrderId = i64;
pub type Price = i64;
pub type Quantity = i64;

/// A single resting order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    // Order identification
    pub user_id: UserId,
    pub user_order_id: OrderId,
    pub symbol: String,

    // Order details
    pub price: Price,
    pub quantity: Quantity,
    pub side: Side,
}

impl Order {
    /// Construct an `Order` from a [`NewOrder`] message.
    ///
    /// Arrival order is not stamped on the order itself; it is the
    /// position the ladder gives the order among equal prices.
    pub fn from_new_order(msg: &NewOrder) -> Self {
        Order {
            user_id: msg.user_id,
            user_order_id: msg.user_order_id,
            symbol: msg.symbol.clone(),
            price: msg.price,
            quantity: msg.quantity,
            side: msg.side,
        }
    }
}
