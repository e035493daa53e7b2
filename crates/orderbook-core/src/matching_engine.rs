//! Command dispatcher for one book session.
//!
//! Each [`InputMessage`] is applied to completion before the next one,
//! and the events it produced are returned in emission order:
//!
//! - NewOrder: Ack/Reject, then (trading enabled) at most one Trade, then
//!   top-of-book changes, bid side first.
//! - Cancel: CancelAck (if the order was resting), then top-of-book changes.
//! - Flush: nothing; the book is rebuilt from scratch.
//!
//! A [`EngineError`] aborts the command that raised it. The book may be
//! left partially updated, which is why callers treat it as fatal for
//! the whole session.

use tracing::debug;

use crate::error::EngineError;
use crate::messages::{Cancel, InputMessage, NewOrder, OutputMessage};
use crate::order_book::OrderBook;

/// Knobs the core needs from the outside world.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// When `false`, orders that would cross the book are rejected up front.
    /// When `true`, they are accepted and matched.
    pub trading_enabled: bool,
}

/// Single-book matching engine.
#[derive(Debug, Default)]
pub struct MatchingEngine {
    config: EngineConfig,
    book: OrderBook,
}

impl MatchingEngine {
    /// Create a new engine over an empty book.
    pub fn new(config: EngineConfig) -> Self {
        MatchingEngine {
            config,
            book: OrderBook::new(),
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// For tests or inspection: the current book state.
    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    /// Process a single input message and return any output events.
    pub fn process_message(&mut self, msg: InputMessage) -> Result<Vec<OutputMessage>, EngineError> {
        match msg {
            InputMessage::NewOrder(new) => self.process_new_order(&new),
            InputMessage::Cancel(cancel) => self.process_cancel(&cancel),
            InputMessage::Flush => Ok(self.process_flush()),
        }
    }

    // -------------------------------------------------------------------------
    // Internal handlers
    // -------------------------------------------------------------------------

    fn process_new_order(&mut self, msg: &NewOrder) -> Result<Vec<OutputMessage>, EngineError> {
        let mut outputs = vec![self.book.accept(msg, self.config.trading_enabled)?];

        if self.config.trading_enabled {
            outputs.extend(self.book.try_trade()?);
        }

        outputs.extend(self.book.check_top_of_book_changes()?);
        Ok(outputs)
    }

    fn process_cancel(&mut self, msg: &Cancel) -> Result<Vec<OutputMessage>, EngineError> {
        let side = self.book.side_of(msg.user_order_id);

        let mut outputs = Vec::new();
        outputs.extend(self.book.cancel(msg, side)?);
        outputs.extend(self.book.check_top_of_book_changes()?);
        Ok(outputs)
    }

    fn process_flush(&mut self) -> Vec<OutputMessage> {
        debug!("flushing book");
        self.book.flush();

        // No output messages for flush.
        Vec::new()
    }
}
