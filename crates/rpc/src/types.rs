//! Query strings of the `/dht` routes.
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

/// Timeout in milliseconds.
#[derive(Deserialize, Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct Timeout(u64);

impl Default for Timeout {
    fn default() -> Self {
        Timeout(chordring_core::consts::DEFAULT_REQUEST_TIMEOUT_MS)
    }
}

impl From<Timeout> for Duration {
    fn from(val: Timeout) -> Self {
        Duration::from_millis(val.0)
    }
}

impl From<u64> for Timeout {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// `?id=` of find, findClosestPrecedingFinger and notify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct IdQuery {
    /// A ring identifier.
    pub id: u64,
}

/// `?key=` of getValue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct KeyQuery {
    /// The key.
    pub key: String,
}

/// `?key=&value=` of delete.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct KeyValueQuery {
    /// The key.
    pub key: String,
    /// One value bound to the key.
    pub value: String,
}
