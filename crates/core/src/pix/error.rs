//! BR Code errors.

use thiserror::Error;

/// Errors raised while building or reading a BR Code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PixError {
    /// No receiving key configured.
    #[error("PIX key is not configured")]
    MissingKey,

    /// Empty input code.
    #[error("BR Code is empty")]
    EmptyCode,

    /// Tag is not two ASCII digits.
    #[error("invalid TLV tag {0:?}")]
    InvalidTag(String),

    /// Value longer than the two-digit length prefix allows.
    #[error("value of tag {tag} is {len} bytes, maximum is 99")]
    FieldTooLong {
        /// Tag being encoded.
        tag: String,
        /// Encoded byte length.
        len: usize,
    },

    /// Input does not parse as TLV.
    #[error("malformed BR Code at byte {0}")]
    Malformed(usize),

    /// Amount must be positive.
    #[error("invalid amount: {0} cents")]
    InvalidAmount(i64),
}

impl PixError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::MissingKey => 500,
            _ => 400,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingKey => "PIX_NOT_CONFIGURED",
            _ => "INVALID_BR_CODE",
        }
    }
}
