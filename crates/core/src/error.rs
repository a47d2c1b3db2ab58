//! Error of chordring_core

use crate::dht::PeerRingAction;

/// A wrap `Result` contains custom errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors collections in chordring-core.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A remote call did not complete: network error, timeout, unreachable
    /// peer or an unexpected status code.
    #[error("Remote operation {op} failed: {reason}")]
    Failed { op: String, reason: String },

    /// A locally detected semantic violation.
    #[error("Invalid operation: {0}")]
    Invalid(String),

    #[error("Identifier space of {0} bits is not supported, expect 1..=63")]
    InvalidIdSpace(u8),

    #[error("Finger index {0} out of range")]
    FingerIndexOutOfRange(usize),

    #[error("DHT lock error")]
    DHTSyncLockError,

    #[error("Unexpected PeerRingAction, {0:?}")]
    PeerRingUnexpectedAction(PeerRingAction),

    #[error("Node {0} is not registered on the network")]
    NodeNotFound(String),

    #[error("URL parse error")]
    URLParse(#[from] url::ParseError),
}

impl Error {
    /// Build a [Error::Failed] for the remote operation `op`.
    pub fn failed(op: impl Into<String>, reason: impl ToString) -> Self {
        Self::Failed {
            op: op.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [Error::Invalid].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid(reason.into())
    }

    /// Returns `true` if the error comes from a remote call.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Returns `true` if the error is a local semantic violation.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}
