//! Error types.

use core::fmt;

/// The only failure the arithmetic core can report.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// The element (in at least one lane) has no square root modulo `p`.
    NoSquareRoot,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoSquareRoot => write!(f, "no square root exists"),
        }
    }
}

/// Result type.
pub type Result<T> = core::result::Result<T, Error>;
