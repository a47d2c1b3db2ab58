//! A bunch of wrap errors.
use crate::prelude::chordring_core;
use crate::prelude::chordring_rpc;

/// A wrap `Result` contains custom errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors enum mapping global custom errors.
/// The error type can be expressed in decimal, where the high decs represent
/// the error category and the low decs represent the error type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
#[repr(u32)]
pub enum Error {
    #[error("Remote call failed: {0}")]
    RemoteFailed(chordring_core::error::Error) = 100,
    #[error("Invalid operation: {0}")]
    InvalidOperation(chordring_core::error::Error) = 101,
    #[error("Internal error: {0}.")]
    InternalError(chordring_core::error::Error) = 102,
    #[error("Http client error: {0}")]
    HttpClientError(#[from] chordring_rpc::error::Error) = 200,
    #[error("Http server error: {0}")]
    HttpServerError(#[from] hyper::Error) = 202,
    #[error("Failed to bind {0}: {1}")]
    BindError(String, String) = 203,
    #[error("Invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError) = 300,
    #[error("Invalid node id {0} for a space of {1} bits")]
    InvalidNodeId(u64, u8) = 301,
    #[error("Invalid logging level: {0}")]
    InvalidLoggingLevel(String) = 302,
    #[error("Failed to open file: {0}")]
    OpenFileError(String) = 400,
    #[error("Failed to create file: {0}")]
    CreateFileError(String) = 401,
    #[error("Cannot find home directory")]
    HomeDirError = 402,
    #[error("Cannot find parent directory")]
    ParentDirError = 403,
    #[error("Serialize error: {0}")]
    SerializeError(String) = 500,
    #[error("Deserialize error: {0}")]
    DeserializeError(String) = 501,
    #[error("Maintenance task error: {0}")]
    TaskError(String) = 600,
}

impl Error {
    pub fn code(&self) -> u32 {
        // Safety: `Error` is `repr(u32)` so its discriminant sits at the
        // start of the value.
        unsafe { *<*const _>::from(self).cast::<u32>() }
    }
}

impl From<chordring_core::error::Error> for Error {
    fn from(e: chordring_core::error::Error) -> Self {
        if e.is_failed() {
            Self::RemoteFailed(e)
        } else if e.is_invalid() {
            Self::InvalidOperation(e)
        } else {
            Self::InternalError(e)
        }
    }
}
