//! Error types for gridflow data sources.

use alloc::format;
use alloc::string::String;
use core::fmt;

/// Result type alias for gridflow operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for data-source operations.
///
/// Most operations are total and signal "no visible change" with `None`
/// instead of failing; removal of an unknown key is the one hard contract
/// violation.
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// No record exists under the given key.
    RowNotFound { key: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::RowNotFound { key } => {
                write!(f, "Row not found for key: {}", key)
            }
        }
    }
}

impl Error {
    /// Creates a row-not-found error.
    pub fn row_not_found(key: impl fmt::Debug) -> Self {
        Error::RowNotFound {
            key: format!("{:?}", key),
        }
    }
}
