//! Module of MemStorage, the per-node key/value store.

pub mod memory;

pub use crate::storage::memory::MemStorage;
