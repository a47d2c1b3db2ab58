#![warn(missing_docs)]
//! Implementation of the ring's DHT
//! which is based on CHORD, ref: <https://pdos.csail.mit.edu/papers/ton:chord/paper-ton.pdf>
//! With high probability, the number of nodes that must be contacted to find a successor in an N-node network is O(log N).

mod chord;
pub mod did;
/// Finger table of the ring
pub mod finger;
mod stabilization;
pub mod types;

pub use chord::PeerRing;
pub use chord::PeerRingAction;
pub use chord::RemoteAction as PeerRingRemoteAction;
pub use did::Did;
pub use did::IdSpace;
pub use did::SortRing;
pub use finger::FingerTable;
pub use stabilization::Stabilizer;
pub use types::Chord;
pub use types::NodeInfo;
pub use types::TableRep;
pub use types::TableRow;
