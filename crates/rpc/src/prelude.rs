//! Re-exports for downstream crates.
pub use chordring_core;
pub use reqwest;

pub use crate::client::HttpTransport;
pub use crate::method::Method;
