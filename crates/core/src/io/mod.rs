//! File-format parsing for genders databases.
//!
//! [`parser`] implements the line-oriented loader (and its
//! non-destructive `lint` twin); [`hostlist`] implements the
//! nodename-range expander the loader consumes.

pub mod hostlist;
pub mod parser;

use thiserror::Error;

/// Maximum length, in bytes, of a single logical line in a genders
/// file, matching the original `GENDERS_READLINE_BUFLEN`.
pub const MAX_LINE_LEN: usize = 65_535;

/// A parse failure tied to a specific source line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {reason}")]
pub struct ParseError {
    pub line: usize,
    pub reason: String,
}

impl ParseError {
    pub fn new(line: usize, reason: impl Into<String>) -> Self {
        ParseError {
            line,
            reason: reason.into(),
        }
    }
}

/// One non-fatal diagnostic produced during `lint`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub reason: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Line {}: {}", self.line, self.reason)
    }
}
