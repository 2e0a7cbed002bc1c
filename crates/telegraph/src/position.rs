// ABOUTME: Sortable position keys built from a tag's source line, column, and sequence number.
// ABOUTME: The fixed-width rendering makes string order equal to document order.

//! Position keys.
//!
//! Converters run independently and in any order, so every converted tag is
//! keyed by where it started in the source. Sorting the keys restores the
//! original document order.
//!
//! A key renders as three zero-padded fields: line (7 digits), column
//! (5 digits), sequence (2 digits). The ordering of [`PositionKey`] and the
//! ordering of its rendered string always agree as long as each field stays
//! within its width: line < 10^7, column < 10^5, sequence < 10^2.

use std::fmt;
use std::str::FromStr;

const LINE_WIDTH: usize = 7;
const COLUMN_WIDTH: usize = 5;
const SEQUENCE_WIDTH: usize = 2;

const MAX_LINE: usize = 9_999_999;
const MAX_COLUMN: usize = 99_999;
const MAX_SEQUENCE: u8 = 99;

/// Sequence used when a converter has no need to tell apart tags that share
/// a line and column.
pub const DEFAULT_SEQUENCE: u8 = 1;

/// Orderable encoding of a tag's original source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PositionKey {
    line: usize,
    column: usize,
    sequence: u8,
}

/// Builds a position key. A missing `sequence` means [`DEFAULT_SEQUENCE`].
pub fn encode(line: usize, column: usize, sequence: Option<u8>) -> PositionKey {
    let sequence = sequence.unwrap_or(DEFAULT_SEQUENCE);
    debug_assert!(line <= MAX_LINE, "line {} overflows position key", line);
    debug_assert!(
        column <= MAX_COLUMN,
        "column {} overflows position key",
        column
    );
    debug_assert!(
        sequence <= MAX_SEQUENCE,
        "sequence {} overflows position key",
        sequence
    );
    PositionKey {
        line,
        column,
        sequence,
    }
}

impl PositionKey {
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn sequence(&self) -> u8 {
        self.sequence
    }

    /// The fixed-width string form, e.g. `00000020000501`.
    pub fn as_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:0lw$}{:0cw$}{:0sw$}",
            self.line,
            self.column,
            self.sequence,
            lw = LINE_WIDTH,
            cw = COLUMN_WIDTH,
            sw = SEQUENCE_WIDTH
        )
    }
}

/// Error returned when a string is not a rendered position key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed position key '{0}'")]
pub struct MalformedKey(pub String);

impl FromStr for PositionKey {
    type Err = MalformedKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || MalformedKey(s.to_string());
        if s.len() != LINE_WIDTH + COLUMN_WIDTH + SEQUENCE_WIDTH
            || !s.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(malformed());
        }
        let (line, rest) = s.split_at(LINE_WIDTH);
        let (column, sequence) = rest.split_at(COLUMN_WIDTH);
        Ok(PositionKey {
            line: line.parse().map_err(|_| malformed())?,
            column: column.parse().map_err(|_| malformed())?,
            sequence: sequence.parse().map_err(|_| malformed())?,
        })
    }
}
