//! One side of the book as a flat, price-time ordered sequence.
//!
//! - Bids: descending by price (best = front).
//! - Asks: ascending by price (best = front).
//! - Equal prices keep arrival order, earlier nearer the front.
//!
//! A flat `Vec` rather than a `BTreeMap` of levels: top-of-book only
//! ever looks at the front order and the orders sharing its user and
//! price, and cancel is a linear scan either way.

use crate::error::EngineError;
use crate::order::{Order, OrderId, Price};
use crate::side::Side;

#[derive(Debug, Clone)]
pub struct Ladder {
    side: Side,
    orders: Vec<Order>,
}

impl Ladder {
    pub fn new(side: Side) -> Self {
        Ladder {
            side,
            orders: Vec::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Best resting order, if any.
    pub fn front(&self) -> Option<&Order> {
        self.orders.first()
    }

    /// Orders from best to worst.
    pub fn iter(&self) -> std::slice::Iter<'_, Order> {
        self.orders.iter()
    }

    /// Position a new order at `price` would take.
    ///
    /// That is the first resting order with a strictly worse price, so
    /// the new order lands behind everything already resting at its price.
    pub fn insertion_index(&self, price: Price) -> usize {
        self.orders
            .iter()
            .position(|resting| self.is_better(price, resting.price))
            .unwrap_or(self.orders.len())
    }

    /// Insert preserving price-time priority. Returns the position used.
    pub fn insert(&mut self, order: Order) -> Result<usize, EngineError> {
        debug_assert_eq!(order.side, self.side, "order routed to the wrong ladder");
        let index = self.insertion_index(order.price);
        self.insert_at(index, order)?;
        Ok(index)
    }

    /// Position of the first order with the given `user_order_id`.
    pub fn position_of(&self, user_order_id: OrderId) -> Option<usize> {
        self.orders
            .iter()
            .position(|o| o.user_order_id == user_order_id)
    }

    /// Remove and return the order at `index`, shifting the rest forward.
    pub fn remove_at(&mut self, index: usize) -> Result<Order, EngineError> {
        if index >= self.orders.len() {
            return Err(EngineError::IndexOutOfBounds {
                op: "remove",
                index,
                len: self.orders.len(),
            });
        }
        Ok(self.orders.remove(index))
    }

    /// Remove and return the best order.
    pub fn pop_front(&mut self) -> Result<Order, EngineError> {
        self.remove_at(0)
    }

    fn insert_at(&mut self, index: usize, order: Order) -> Result<(), EngineError> {
        if index > self.orders.len() {
            return Err(EngineError::IndexOutOfBounds {
                op: "insert",
                index,
                len: self.orders.len(),
            });
        }
        self.orders.insert(index, order);
        Ok(())
    }

    /// Whether price `a` ranks strictly ahead of price `b` on this side.
    fn is_better(&self, a: Price, b: Price) -> bool {
        match self.side {
            Side::Buy => a > b,
            Side::Sell => a < b,
        }
    }
}
