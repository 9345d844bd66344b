use thiserror::Error;

/// Main error type for drugpath
#[derive(Error, Debug)]
pub enum DrugPathError {
    /// HTTP transport errors (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint URL construction errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Server responded with a non-success status
    #[error("API error: {0}")]
    Api(String),

    /// Payload arrived but is missing an expected field or has the wrong shape
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Caller misuse (e.g. empty required identifier)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient Result type using DrugPathError
pub type Result<T> = std::result::Result<T, DrugPathError>;
