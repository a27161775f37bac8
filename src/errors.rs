use thiserror::Error;

/// Error taxonomy for the queue engine.
///
/// The Query Controller returns these categorical errors; the API layer maps
/// each variant to an HTTP status code (see [`crate::server::routes`]).
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("queue already exists: {0}")]
    Conflict(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("crypto error: {0}")]
    CryptoError(String),

    #[error("io error: {0}")]
    IoError(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
