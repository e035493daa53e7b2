//! Side (Buy / Sell) for orders and top-of-book.

use std::fmt;

/// Order side: Buy or Sell.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The single-character form used on the wire (`'B'` / `'S'`).
    pub fn as_char(self) -> char {
        match self {
            Side::Buy => 'B',
            Side::Sell => 'S',
        }
    }

    /// Try to parse from a char (`'B'` / `'S'`, case-sensitive).
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'B' => Some(Side::Buy),
            'S' => Some(Side::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
