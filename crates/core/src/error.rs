//! Unified error types for the genders-core crate.
//!
//! Two views of the same taxonomy are exposed: [`GendersError`], an
//! idiomatic `thiserror` enum meant to be matched on or propagated with
//! `?`, and [`ErrorCode`], a stable-ordinal enum mirroring the original
//! C library's `errnum`/`strerror` interface for callers porting code
//! that polls the handle instead of matching a `Result`.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::io::ParseError;

/// Stable, contiguous-from-zero error ordinals, preserved for
/// `errnum`/`strerror`/`set_errnum` parity with the original API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,
    NullHandle = 1,
    Open = 2,
    Read = 3,
    Parse = 4,
    NotLoaded = 5,
    IsLoaded = 6,
    Overflow = 7,
    Parameters = 8,
    NullPtr = 9,
    NotFound = 10,
    OutMem = 11,
    Magic = 12,
    Internal = 13,
    ErrNumRange = 14,
}

impl ErrorCode {
    /// Fixed English text for this code, matching the original
    /// `errmsg[]` table verbatim.
    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::Success => "success",
            ErrorCode::NullHandle => "genders handle is null",
            ErrorCode::Open => "error opening genders file",
            ErrorCode::Read => "error reading genders file",
            ErrorCode::Parse => "genders file parse error",
            ErrorCode::NotLoaded => "genders data not loaded",
            ErrorCode::IsLoaded => "genders data already loaded",
            ErrorCode::Overflow => "array or string passed in not large enough to store result",
            ErrorCode::Parameters => "incorrect parameters passed in",
            ErrorCode::NullPtr => "null pointer reached in list",
            ErrorCode::NotFound => "node not found",
            ErrorCode::OutMem => "out of memory",
            ErrorCode::Magic => "genders handle magic number incorrect, improper handle passed in",
            ErrorCode::Internal => "unknown internal error",
            ErrorCode::ErrNumRange => "error number out of range",
        }
    }

    /// Reconstruct a code from a raw ordinal, as `set_errnum` accepts
    /// from callers porting integer error codes. Out-of-range ordinals
    /// map to [`ErrorCode::ErrNumRange`], matching the original's
    /// `genders_strerror` fallback.
    pub fn from_ordinal(ordinal: i32) -> ErrorCode {
        match ordinal {
            0 => ErrorCode::Success,
            1 => ErrorCode::NullHandle,
            2 => ErrorCode::Open,
            3 => ErrorCode::Read,
            4 => ErrorCode::Parse,
            5 => ErrorCode::NotLoaded,
            6 => ErrorCode::IsLoaded,
            7 => ErrorCode::Overflow,
            8 => ErrorCode::Parameters,
            9 => ErrorCode::NullPtr,
            10 => ErrorCode::NotFound,
            11 => ErrorCode::OutMem,
            12 => ErrorCode::Magic,
            13 => ErrorCode::Internal,
            _ => ErrorCode::ErrNumRange,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Idiomatic error type returned by every fallible `Genders` operation.
///
/// Each variant corresponds 1:1 to an [`ErrorCode`] ordinal; see
/// [`GendersError::code`].
#[derive(Error, Debug)]
pub enum GendersError {
    /// The handle was already destroyed.
    #[error("genders handle magic number incorrect, improper handle passed in")]
    Magic,

    /// `load` was called on an already-loaded handle.
    #[error("genders data already loaded")]
    IsLoaded,

    /// A query was issued before `load` succeeded.
    #[error("genders data not loaded")]
    NotLoaded,

    /// Failed to open the database file.
    #[error("error opening genders file: {0}")]
    Open(#[source] io::Error),

    /// Failed while reading the database file.
    #[error("error reading genders file: {0}")]
    Read(#[source] io::Error),

    /// The database file failed to parse.
    #[error("genders file parse error: {0}")]
    Parse(#[from] ParseError),

    /// An output slice was too small to hold the result.
    #[error("array or string passed in not large enough to store result")]
    Overflow,

    /// A caller-supplied argument was invalid.
    #[error("incorrect parameters passed in: {0}")]
    Parameters(&'static str),

    /// An output slot was `None` where a value was required.
    #[error("null pointer reached in list")]
    NullPtr,

    /// The requested node is not in the database.
    #[error("node not found")]
    NotFound,

    /// Allocation failed. Unreachable via the safe API in practice; see
    /// DESIGN.md.
    #[error("out of memory")]
    OutMem,

    /// An invariant the loader is supposed to maintain was violated at
    /// runtime.
    #[error("unknown internal error: {0}")]
    Internal(&'static str),
}

impl GendersError {
    /// The stable ordinal this error corresponds to, for callers using
    /// the `errnum`-style API.
    pub fn code(&self) -> ErrorCode {
        match self {
            GendersError::Magic => ErrorCode::Magic,
            GendersError::IsLoaded => ErrorCode::IsLoaded,
            GendersError::NotLoaded => ErrorCode::NotLoaded,
            GendersError::Open(_) => ErrorCode::Open,
            GendersError::Read(_) => ErrorCode::Read,
            GendersError::Parse(_) => ErrorCode::Parse,
            GendersError::Overflow => ErrorCode::Overflow,
            GendersError::Parameters(_) => ErrorCode::Parameters,
            GendersError::NullPtr => ErrorCode::NullPtr,
            GendersError::NotFound => ErrorCode::NotFound,
            GendersError::OutMem => ErrorCode::OutMem,
            GendersError::Internal(_) => ErrorCode::Internal,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GendersError>;
