//! Token domain errors.
//!
//! Errors are matched by variant. `TokenError::NotFound` must stay distinct
//! from `TokenError::InvalidToken` so that `authenticate` can translate one
//! into the other.

use thiserror::Error;

/// Failures reported by a token store implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached or the connection dropped
    #[error("Store connection error: {message}")]
    Connection { message: String },

    /// The store answered but rejected or failed the command
    #[error("Store command error: {message}")]
    Command { message: String },

    /// The store did not answer in time
    #[error("Store timeout: {message}")]
    Timeout { message: String },
}

/// Errors returned by token lifecycle operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("id is not set")]
    IdNotSet,

    #[error("token value is not set")]
    ValueNotSet,

    #[error("not found")]
    NotFound,

    #[error("invalid token")]
    InvalidToken,

    #[error("token value generation failed: {message}")]
    Generation { message: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TokenError {
    /// Whether the error came from the store rather than token validation
    pub fn is_store_error(&self) -> bool {
        matches!(self, TokenError::Store(_))
    }
}

pub type TokenResult<T> = Result<T, TokenError>;
