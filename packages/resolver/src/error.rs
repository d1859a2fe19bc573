use thiserror::Error;

pub type SourceResult<T> = Result<T, SourceError>;

/// Failure talking to a design source.
///
/// Always recoverable: the resolver and the batched style fetch log these and
/// degrade their result instead of propagating them.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
