//! Errors raised by search backends

use thiserror::Error;

/// Failure while talking to a search backend
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("keywords is mandatory")]
    EmptyQuery,

    #[error("{url} {status} Ratelimit")]
    RateLimited { url: String, status: u16 },

    #[error("{url} returned HTTP {status}")]
    Http { url: String, status: u16 },

    #[error("{url} timed out")]
    Timeout { url: String },

    #[error(transparent)]
    Request(#[from] reqwest::Error),
}
