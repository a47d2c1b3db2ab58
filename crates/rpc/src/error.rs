//! Errors of chordring_rpc.

/// A wrap `Result` contains custom errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors enum mapping global custom errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Unknown route name.
    #[error("Invalid method: {0}")]
    InvalidMethod(String),
    /// The http client could not be built.
    #[error("Http client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}
