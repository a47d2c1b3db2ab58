//! The native side of a node: configuration, http endpoint and cli client.
pub mod cli;
pub mod config;
pub mod endpoint;
