//! chordring-node serves a [chordring_core::swarm::Swarm] over HTTP and keeps
//! it in shape with periodic stabilization.
//!
//! The pieces:
//! * [processor::Processor] owns the swarm and its maintenance tasks.
//! * [native::endpoint] exposes the `/dht` routes.
//! * [native::config::Config] is the YAML configuration of a node.
//! * [native::cli::Client] is the remote client used by the `chordring` binary.
pub mod error;
pub mod logging;
pub mod native;
pub mod prelude;
pub mod processor;
#[cfg(test)]
mod tests;
pub mod util;
