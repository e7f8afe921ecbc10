// src/error.rs

use thiserror::Error;

/// Offset value used by parse errors when the position is unknown.
pub const OFFSET_UNKNOWN: i64 = -1;

#[derive(Debug, Error)]
pub enum QsError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("parse error (offset {offset}): {message}")]
    Parse { message: String, offset: i64 },

    #[error("arithmetic inconsistency: {0}")]
    ArithmeticInconsistency(String),

    #[error("the rank of the augmented system is greater than the rank of the coefficient system")]
    Inconsistent,

    #[error("unable to factor after {0} attempts")]
    FactorizationFailed(u64),

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

impl QsError {
    /// Parse error at an unknown offset.
    pub fn parse(message: impl Into<String>) -> Self {
        QsError::Parse {
            message: message.into(),
            offset: OFFSET_UNKNOWN,
        }
    }

    pub fn parse_at(message: impl Into<String>, offset: i64) -> Self {
        QsError::Parse {
            message: message.into(),
            offset,
        }
    }
}

pub type QsResult<T> = Result<T, QsError>;
