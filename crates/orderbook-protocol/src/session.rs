//! Splitting an input file into independent book sessions.
//!
//! Each `F` line closes the current book: the flush itself is the last
//! command of the session it terminates. Commands after the final `F`
//! belong to no session and are dropped.

use std::mem;

use orderbook_core::InputMessage;
use tracing::warn;

use crate::csv_codec::parse_input_line;
use crate::error::ParseError;

/// A parsed command and the 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCommand {
    pub line: usize,
    pub msg: InputMessage,
}

/// One flush-terminated group of commands, replayed against a fresh book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSession {
    /// 1-based position of this book in the input.
    pub number: usize,
    pub commands: Vec<SessionCommand>,
}

/// Parse a whole input and group it into book sessions.
///
/// The first malformed line fails the whole input.
pub fn split_sessions(input: &str) -> Result<Vec<BookSession>, ParseError> {
    let mut sessions = Vec::new();
    let mut current = Vec::new();

    for (idx, raw) in input.lines().enumerate() {
        let line = idx + 1;
        let msg = match parse_input_line(raw).map_err(|e| e.at_line(line))? {
            Some(msg) => msg,
            None => continue,
        };

        let closes_book = msg == InputMessage::Flush;
        current.push(SessionCommand { line, msg });

        if closes_book {
            sessions.push(BookSession {
                number: sessions.len() + 1,
                commands: mem::take(&mut current),
            });
        }
    }

    if !current.is_empty() {
        warn!(
            dropped = current.len(),
            first_line = current[0].line,
            "commands after the last flush are not part of any book"
        );
    }

    Ok(sessions)
}
