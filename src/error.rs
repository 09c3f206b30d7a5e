//! Error types for AAG parsing
//!
//! Only the two fatal parse failures of the record model get a variant
//! here. Every other error kind named in the design (unparseable
//! individual records, order-size mismatches, cyclic support) is handled
//! in place by the component that encounters it, not propagated as an
//! `AagError`.

use std::fmt;

/// Fatal failure to parse an AAG file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AagError {
    /// The first non-empty line does not start with `aag ` or has fewer
    /// than 6 whitespace-separated fields.
    MalformedHeader(String),
    /// Fewer lines are present than the header's `I + L + O + A` count
    /// requires.
    TruncatedBlock {
        /// Which block ran out of lines (`"input"`, `"latch"`, `"output"`
        /// or `"and"`).
        block: &'static str,
        /// Number of lines the header promised for this block.
        expected: usize,
        /// Number of lines actually available.
        found: usize,
    },
}

impl fmt::Display for AagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AagError::MalformedHeader(line) => {
                write!(f, "malformed AAG header: {line:?}")
            }
            AagError::TruncatedBlock {
                block,
                expected,
                found,
            } => {
                write!(
                    f,
                    "truncated {block} block: expected {expected} line(s), found {found}"
                )
            }
        }
    }
}

impl std::error::Error for AagError {}
