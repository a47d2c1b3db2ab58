//! Chordring: a Chord based distributed hash table.
//! --------------
//! - [Chord](crate::dht::PeerRing) keeps the ring state of a node and makes every routing
//!   decision from local information only.
//! - [Swarm](crate::swarm) executes the remote steps those decisions ask for, through a
//!   [Transport](crate::transport::Transport).
//! - [Stabilizer](crate::dht::Stabilizer) runs the periodic stabilize and fix fingers passes.
//!
//! # Join
//!
//! 1. A node asks an introducer for the successor of its own id, takes the answer as successor
//!    and forgets any predecessor.
//! 2. On its next stabilize, it notifies the successor. The successor accepts it as predecessor
//!    if it is closer than the current one and hands over the bindings of the keys in
//!    (old predecessor, new node].
//! 3. The old predecessor finds the new node as the predecessor of its successor during its own
//!    stabilize, adopts it as successor and notifies it in turn.
//!
//! # Ownership
//!
//! A node owns the keys whose hash lies in (predecessor, self]. Bindings only move on an
//! accepted notify. A transfer lost in flight is not retried.

pub mod consts;
pub mod dht;
pub mod error;
pub mod inspect;
pub mod prelude;
pub mod storage;
pub mod swarm;
pub mod transport;
