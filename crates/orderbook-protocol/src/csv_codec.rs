// crates/orderbook-protocol/src/csv_codec.rs

//! CSV codec.
//!
//! Input format (lines → `InputMessage`):
//!
//! - New order:
//!   `N, user(int), symbol(string), price(int), qty(int), side(char B or S), userOrderId(int)`
//!
//! - Cancel:
//!   `C, user(int), userOrderId(int)`
//!
//! - Flush:
//!   `F`
//!
//! Blank lines and lines not starting with `N`, `C` or `F` (comments,
//! headers) are skipped. Fields are trimmed before parsing.
//!
//! Output format (`OutputMessage` → line):
//!
//! - Ack / CancelAck:
//!   `A, userId, userOrderId`
//!
//! - Reject:
//!   `R, userId, userOrderId`
//!
//! - Trade:
//!   `T, userIdBuy, userOrderIdBuy, userIdSell, userOrderIdSell, price, quantity`
//!
//! - TopOfBook:
//!   `B, side(B/S), price, totalQuantity`
//!
//! - TopOfBook (side empty):
//!   `B, side(B/S), -, -`

use std::num::ParseIntError;

use orderbook_core::{Cancel, InputMessage, NewOrder, OutputMessage, Side};

use crate::error::ParseError;

/// Parse a single CSV line into an `InputMessage`.
///
/// Returns `Ok(None)` for lines that carry no command.
pub fn parse_input_line(line: &str) -> Result<Option<InputMessage>, ParseError> {
    let trimmed = line.trim();

    let msg_type = match trimmed.chars().next() {
        Some(c @ ('N' | 'C' | 'F')) => c,
        _ => return Ok(None),
    };

    let tokens = split_and_trim(trimmed, ',');

    let msg = match msg_type {
        'N' => parse_new_order(&tokens)?,
        'C' => parse_cancel(&tokens)?,
        _ => {
            expect_fields('F', &tokens, 1)?;
            InputMessage::Flush
        }
    };
    Ok(Some(msg))
}

fn parse_new_order(tokens: &[&str]) -> Result<InputMessage, ParseError> {
    // N, user, symbol, price, qty, side, userOrderId
    expect_fields('N', tokens, 7)?;

    let user_id = parse_int('N', "userId", tokens[1])?;
    let symbol = tokens[2].to_string();
    let price = parse_int('N', "price", tokens[3])?;
    let quantity = parse_int('N', "quantity", tokens[4])?;
    let side = parse_side(tokens[5])?;
    let user_order_id = parse_int('N', "userOrderId", tokens[6])?;

    Ok(InputMessage::NewOrder(NewOrder {
        user_id,
        symbol,
        price,
        quantity,
        side,
        user_order_id,
    }))
}

fn parse_cancel(tokens: &[&str]) -> Result<InputMessage, ParseError> {
    // C, user, userOrderId
    expect_fields('C', tokens, 3)?;

    let user_id = parse_int('C', "userId", tokens[1])?;
    let user_order_id = parse_int('C', "userOrderId", tokens[2])?;

    Ok(InputMessage::Cancel(Cancel {
        user_id,
        user_order_id,
    }))
}

/// Format an `OutputMessage` as a CSV line.
pub fn format_output(msg: &OutputMessage) -> String {
    match msg {
        OutputMessage::Ack(a) => format!("A, {}, {}", a.user_id, a.user_order_id),
        OutputMessage::CancelAck(c) => format!("A, {}, {}", c.user_id, c.user_order_id),
        OutputMessage::Reject(r) => format!("R, {}, {}", r.user_id, r.user_order_id),
        OutputMessage::Trade(t) => format!(
            "T, {}, {}, {}, {}, {}, {}",
            t.user_id_buy,
            t.user_order_id_buy,
            t.user_id_sell,
            t.user_order_id_sell,
            t.price,
            t.quantity
        ),
        OutputMessage::TopOfBook(t) => {
            if t.eliminated {
                format!("B, {}, -, -", t.side.as_char())
            } else {
                format!("B, {}, {}, {}", t.side.as_char(), t.price, t.total_quantity)
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

fn split_and_trim(s: &str, delimiter: char) -> Vec<&str> {
    s.split(delimiter).map(str::trim).collect()
}

fn expect_fields(command: char, tokens: &[&str], expected: usize) -> Result<(), ParseError> {
    if tokens.len() != expected {
        return Err(ParseError::FieldCount {
            command,
            expected,
            actual: tokens.len(),
        });
    }
    if tokens[0].len() != 1 {
        return Err(ParseError::UnknownCommand {
            value: tokens[0].to_string(),
        });
    }
    Ok(())
}

fn parse_int(command: char, field: &'static str, s: &str) -> Result<i64, ParseError> {
    s.parse::<i64>().map_err(|_: ParseIntError| ParseError::InvalidInteger {
        command,
        field,
        value: s.to_string(),
    })
}

fn parse_side(s: &str) -> Result<Side, ParseError> {
    let mut chars = s.chars();
    match (chars.next().and_then(Side::from_char), chars.next()) {
        (Some(side), None) => Ok(side),
        _ => Err(ParseError::InvalidSide {
            value: s.to_string(),
        }),
    }
}
