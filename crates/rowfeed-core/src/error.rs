use std::fmt;
use thiserror::Error as ThisError;

///
/// ReaderError
///
/// Every failure surfaced by column mapping and the record reader.
/// Errors are returned at the point of the offending call; nothing here is
/// retried or recovered internally.
///

#[derive(Debug, ThisError)]
pub enum ReaderError {
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("column not found: '{name}'")]
    ColumnNotFound { name: String },

    #[error("column ordinal {ordinal} out of range (column count {count})")]
    OrdinalOutOfRange { ordinal: usize, count: usize },

    #[error("invalid cast at column {ordinal}: expected {expected}, found {found}")]
    InvalidCast {
        ordinal: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("unsupported operation: {operation}")]
    Unsupported { operation: &'static str },

    #[error("no current row")]
    NoCurrentRow,

    #[error("reader is closed")]
    Closed,

    #[error("configuration error: {message}")]
    Config { message: String },
}

impl ReaderError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn column_not_found(name: impl Into<String>) -> Self {
        Self::ColumnNotFound { name: name.into() }
    }

    pub(crate) const fn unsupported(operation: &'static str) -> Self {
        Self::Unsupported { operation }
    }

    /// Stable classification for this error.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidArgument { .. } | Self::Config { .. } => ErrorClass::InvalidArgument,
            Self::ColumnNotFound { .. } | Self::OrdinalOutOfRange { .. } => ErrorClass::NotFound,
            Self::InvalidCast { .. } => ErrorClass::InvalidCast,
            Self::Unsupported { .. } => ErrorClass::Unsupported,
            Self::NoCurrentRow | Self::Closed => ErrorClass::InvalidState,
        }
    }

    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}: {self}", self.class())
    }
}

///
/// ErrorClass
/// Coarse error taxonomy for callers that only branch on the kind of failure.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    InvalidArgument,
    NotFound,
    InvalidCast,
    Unsupported,
    InvalidState,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InvalidArgument => "invalid_argument",
            Self::NotFound => "not_found",
            Self::InvalidCast => "invalid_cast",
            Self::Unsupported => "unsupported",
            Self::InvalidState => "invalid_state",
        };
        write!(f, "{label}")
    }
}
