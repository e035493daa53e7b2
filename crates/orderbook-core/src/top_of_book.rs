//! Helper types for representing top-of-book state.
//!
//! This is separate from the [`OutputMessage::TopOfBook`](crate::messages::TopOfBook)
//! event type: the book caches one snapshot per side as last reported,
//! and only emits an event when a freshly computed candidate differs.

use crate::error::EngineError;
use crate::ladder::Ladder;
use crate::messages::OutputMessage;
use crate::order::{Price, Quantity, UserId};
use crate::side::Side;

/// Best level of one side as last reported.
///
/// An empty side is represented by a sentinel price that can never look
/// like a real improvement: `Price::MIN` for bids, `Price::MAX` for asks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopOfBookSnapshot {
    pub user_id: UserId,
    pub price: Price,
    pub quantity: Quantity,
}

impl TopOfBookSnapshot {
    pub fn new(user_id: UserId, price: Price, quantity: Quantity) -> Self {
        TopOfBookSnapshot {
            user_id,
            price,
            quantity,
        }
    }

    /// The "no top" value for a side.
    pub fn sentinel(side: Side) -> Self {
        let price = match side {
            Side::Buy => Price::MIN,
            Side::Sell => Price::MAX,
        };
        TopOfBookSnapshot::new(0, price, 0)
    }

    /// Returns `true` if this snapshot is the sentinel for `side`.
    pub fn is_sentinel(&self, side: Side) -> bool {
        match side {
            Side::Buy => self.price == Price::MIN,
            Side::Sell => self.price == Price::MAX,
        }
    }

    /// Compute the candidate top-of-book for a ladder.
    ///
    /// The front order's quantity is summed with every other order in the
    /// ladder that has the same user *and* price; other users resting at
    /// the same price are not included.
    pub fn from_ladder(ladder: &Ladder) -> Result<Self, EngineError> {
        let front = match ladder.front() {
            Some(front) => front,
            None => return Ok(Self::sentinel(ladder.side())),
        };

        let mut quantity = front.quantity;
        for order in ladder.iter().skip(1) {
            if order.user_id == front.user_id && order.price == front.price {
                quantity = quantity
                    .checked_add(order.quantity)
                    .ok_or(EngineError::QuantityOverflow { price: front.price })?;
            }
        }

        Ok(TopOfBookSnapshot::new(front.user_id, front.price, quantity))
    }

    /// The event reporting this snapshot as the new top of `side`.
    pub fn to_output(&self, side: Side) -> OutputMessage {
        if self.is_sentinel(side) {
            OutputMessage::top_of_book_eliminated(side)
        } else {
            OutputMessage::top_of_book(side, self.price, self.quantity)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::Order;

    fn order(user_id: UserId, user_order_id: i64, price: Price, quantity: Quantity) -> Order {
        Order {
            user_id,
            user_order_id,
            symbol: "IBM".to_string(),
            price,
            quantity,
            side: Side::Buy,
        }
    }

    #[test]
    fn empty_ladder_gives_sentinel() {
        let bids = Ladder::new(Side::Buy);
        let asks = Ladder::new(Side::Sell);

        let bid = TopOfBookSnapshot::from_ladder(&bids).unwrap();
        let ask = TopOfBookSnapshot::from_ladder(&asks).unwrap();

        assert_eq!(bid, TopOfBookSnapshot::new(0, Price::MIN, 0));
        assert_eq!(ask, TopOfBookSnapshot::new(0, Price::MAX, 0));
        assert!(bid.is_sentinel(Side::Buy));
        assert!(!bid.is_sentinel(Side::Sell));
    }

    #[test]
    fn aggregates_same_user_same_price_only() {
        let mut bids = Ladder::new(Side::Buy);
        bids.insert(order(1, 1, 10, 100)).unwrap();
        bids.insert(order(2, 2, 10, 40)).unwrap();
        bids.insert(order(1, 3, 10, 25)).unwrap();
        bids.insert(order(1, 4, 9, 1000)).unwrap();

        let top = TopOfBookSnapshot::from_ladder(&bids).unwrap();
        assert_eq!(top, TopOfBookSnapshot::new(1, 10, 125));
    }

    #[test]
    fn overflow_is_a_data_error() {
        let mut bids = Ladder::new(Side::Buy);
        bids.insert(order(1, 1, 10, Quantity::MAX)).unwrap();
        bids.insert(order(1, 2, 10, 1)).unwrap();

        assert_eq!(
            TopOfBookSnapshot::from_ladder(&bids),
            Err(EngineError::QuantityOverflow { price: 10 })
        );
    }

    #[test]
    fn sentinel_reports_as_eliminated() {
        let out = TopOfBookSnapshot::sentinel(Side::Sell).to_output(Side::Sell);
        assert_eq!(out, OutputMessage::top_of_book_eliminated(Side::Sell));

        let out = TopOfBookSnapshot::new(3, 11, 50).to_output(Side::Sell);
        assert_eq!(out, OutputMessage::top_of_book(Side::Sell, 11, 50));
    }
}
