//! State of a single limit order book.
//!
//! - Two [`Ladder`]s (bids descending, asks ascending, FIFO within a price).
//! - One cached [`TopOfBookSnapshot`] per side, as last reported.
//! - A side index `user_order_id -> Side` so cancel scans one ladder only.
//!
//! Every operation here returns the event it produced (if any) and leaves
//! sequencing to [`MatchingEngine`](crate::matching_engine::MatchingEngine).

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::error::EngineError;
use crate::ladder::Ladder;
use crate::messages::{Cancel, NewOrder, OutputMessage};
use crate::order::{Order, OrderId};
use crate::side::Side;
use crate::top_of_book::TopOfBookSnapshot;

#[derive(Debug, Clone)]
pub struct OrderBook {
    bids: Ladder,
    asks: Ladder,

    /// Cache of previously reported top-of-book for change detection.
    top_bid: TopOfBookSnapshot,
    top_ask: TopOfBookSnapshot,

    /// Side each accepted order was placed on. Only cleared by flush.
    side_index: HashMap<OrderId, Side>,
}

impl Default for OrderBook {
    fn default() -> Self {
        OrderBook::new()
    }
}

impl OrderBook {
    /// An empty book with both snapshots at their sentinels.
    pub fn new() -> Self {
        OrderBook {
            bids: Ladder::new(Side::Buy),
            asks: Ladder::new(Side::Sell),
            top_bid: TopOfBookSnapshot::sentinel(Side::Buy),
            top_ask: TopOfBookSnapshot::sentinel(Side::Sell),
            side_index: HashMap::new(),
        }
    }

    /// Reset to exactly the state [`OrderBook::new`] produces.
    pub fn flush(&mut self) {
        *self = OrderBook::new();
    }

    pub fn bids(&self) -> &Ladder {
        &self.bids
    }

    pub fn asks(&self) -> &Ladder {
        &self.asks
    }

    /// The cached (last reported) top-of-book for a side.
    pub fn top_of_book(&self, side: Side) -> TopOfBookSnapshot {
        match side {
            Side::Buy => self.top_bid,
            Side::Sell => self.top_ask,
        }
    }

    /// Side an order id was accepted on, if it ever was.
    pub fn side_of(&self, user_order_id: OrderId) -> Option<Side> {
        self.side_index.get(&user_order_id).copied()
    }

    /// Accept or reject a new order.
    ///
    /// With trading disabled, an order that would cross the *cached*
    /// opposite top-of-book is rejected and not inserted. The cache is the
    /// one left by the previous command, not a live look at the ladder.
    pub fn accept(
        &mut self,
        msg: &NewOrder,
        trading_enabled: bool,
    ) -> Result<OutputMessage, EngineError> {
        if msg.price == 0 {
            return Err(EngineError::InvalidPrice {
                user_order_id: msg.user_order_id,
                price: msg.price,
            });
        }

        if !trading_enabled && self.would_cross(msg) {
            debug!(
                user_id = msg.user_id,
                user_order_id = msg.user_order_id,
                side = %msg.side,
                price = msg.price,
                "rejecting crossing order"
            );
            return Ok(OutputMessage::reject(msg.user_id, msg.user_order_id));
        }

        let position = self.ladder_mut(msg.side).insert(Order::from_new_order(msg))?;
        self.side_index.insert(msg.user_order_id, msg.side);

        trace!(
            user_order_id = msg.user_order_id,
            side = %msg.side,
            price = msg.price,
            position,
            "order resting"
        );

        Ok(OutputMessage::ack(msg.user_id, msg.user_order_id))
    }

    /// Match the best bid against the best ask, once.
    ///
    /// Only an exact quantity match trades; crossing prices with different
    /// quantities leave both orders resting. The trade prints at the ask.
    pub fn try_trade(&mut self) -> Result<Option<OutputMessage>, EngineError> {
        let crosses = match (self.bids.front(), self.asks.front()) {
            (Some(bid), Some(ask)) => bid.price >= ask.price && bid.quantity == ask.quantity,
            _ => false,
        };
        if !crosses {
            return Ok(None);
        }

        let ask = self.asks.pop_front()?;
        let bid = self.bids.pop_front()?;

        debug!(
            symbol = %ask.symbol,
            buy_order_id = bid.user_order_id,
            sell_order_id = ask.user_order_id,
            price = ask.price,
            quantity = ask.quantity,
            "trade"
        );

        Ok(Some(OutputMessage::trade(
            bid.user_id,
            bid.user_order_id,
            ask.user_id,
            ask.user_order_id,
            ask.price,
            ask.quantity,
        )))
    }

    /// Remove a resting order from the ladder for `side`.
    ///
    /// `side` is `None` when the id was never accepted; like an id that is
    /// no longer resting, that is not an error and yields no event.
    pub fn cancel(
        &mut self,
        msg: &Cancel,
        side: Option<Side>,
    ) -> Result<Option<OutputMessage>, EngineError> {
        let ladder = match side {
            Some(side) => self.ladder_mut(side),
            None => {
                trace!(user_order_id = msg.user_order_id, "cancel for unknown order id");
                return Ok(None);
            }
        };

        let index = match ladder.position_of(msg.user_order_id) {
            Some(index) => index,
            None => {
                trace!(user_order_id = msg.user_order_id, "cancel found no resting order");
                return Ok(None);
            }
        };
        let removed = ladder.remove_at(index)?;

        debug!(
            user_order_id = msg.user_order_id,
            symbol = %removed.symbol,
            side = %removed.side,
            "order cancelled"
        );
        Ok(Some(OutputMessage::cancel_ack(msg.user_id, msg.user_order_id)))
    }

    /// Recompute the top of one side, emitting an event if it changed.
    pub fn evaluate(&mut self, side: Side) -> Result<Option<OutputMessage>, EngineError> {
        let candidate = TopOfBookSnapshot::from_ladder(self.ladder(side))?;

        let cached = match side {
            Side::Buy => &mut self.top_bid,
            Side::Sell => &mut self.top_ask,
        };
        if *cached == candidate {
            return Ok(None);
        }

        *cached = candidate;
        Ok(Some(candidate.to_output(side)))
    }

    /// Evaluate bid then ask, collecting whichever changed.
    pub fn check_top_of_book_changes(&mut self) -> Result<Vec<OutputMessage>, EngineError> {
        let mut outputs = Vec::new();
        outputs.extend(self.evaluate(Side::Buy)?);
        outputs.extend(self.evaluate(Side::Sell)?);
        Ok(outputs)
    }

    // -------------------------------------------------------------------------
    // Internal helpers
    // -------------------------------------------------------------------------

    fn would_cross(&self, msg: &NewOrder) -> bool {
        match msg.side {
            Side::Buy => msg.price >= self.top_ask.price,
            Side::Sell => msg.price <= self.top_bid.price,
        }
    }

    fn ladder(&self, side: Side) -> &Ladder {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    fn ladder_mut(&mut self, side: Side) -> &mut Ladder {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }
}
