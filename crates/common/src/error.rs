//! Unified error type for the signal client.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("query is empty")]
    EmptyQuery,

    #[error("query is longer than {max} characters")]
    QueryTooLong { max: usize },

    #[error("query contains characters outside letters, digits, spaces, '.' and '-'")]
    InvalidCharacters,

    #[error("upstream error (status={status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("malformed response body: {0}")]
    Malformed(String),

    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// True for failures the user can fix by editing the query; these
    /// never involve the network.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::EmptyQuery | Error::QueryTooLong { .. } | Error::InvalidCharacters
        )
    }

    /// Upstream HTTP status code, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}
