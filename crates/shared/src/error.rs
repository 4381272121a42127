//! Access errors raised at the API boundary.
//!
//! Business rule failures live with their domain in `vertice-core`; this
//! type only covers who may see what.

use thiserror::Error;
use uuid::Uuid;

use crate::jwt::JwtError;

/// Failure to authenticate the caller or to resolve a resource for them.
#[derive(Debug, Error)]
pub enum AppError {
    /// No bearer token on a protected route.
    #[error("Authorization header with Bearer token is required")]
    MissingToken,

    /// The token's `exp` is in the past.
    #[error("Token has expired")]
    TokenExpired,

    /// The token could not be decoded or its signature is wrong.
    #[error("Invalid or malformed token")]
    InvalidToken,

    /// A handler ran without claims in the request.
    #[error("Authentication required")]
    Unauthenticated,

    /// Back-office route reached by a client.
    #[error("Administrator access required")]
    AdminRequired,

    /// The resource does not exist or belongs to someone else.
    #[error("{resource} {id} not found")]
    NotFound {
        /// Kind of resource, e.g. `"investment"`.
        resource: &'static str,
        /// Requested id.
        id: Uuid,
    },
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::MissingToken | Self::TokenExpired | Self::InvalidToken | Self::Unauthenticated => {
                401
            }
            Self::AdminRequired => 403,
            Self::NotFound { .. } => 404,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingToken => "MISSING_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Unauthenticated => "UNAUTHORIZED",
            Self::AdminRequired => "FORBIDDEN",
            Self::NotFound { .. } => "NOT_FOUND",
        }
    }
}

impl From<JwtError> for AppError {
    fn from(e: JwtError) -> Self {
        match e {
            JwtError::Expired => Self::TokenExpired,
            JwtError::EncodingError(_) | JwtError::DecodingError(_) => Self::InvalidToken,
        }
    }
}
