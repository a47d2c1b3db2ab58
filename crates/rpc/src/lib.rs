//! HTTP face of a chordring node.
//!
//! - [method] maps every remote operation to its verb and path under `/dht`.
//! - [types] holds the query strings shared by client and server.
//! - [client::HttpTransport] implements the core `Transport` with one pooled
//!   reqwest client per process.
#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod method;
pub mod prelude;
pub mod types;
