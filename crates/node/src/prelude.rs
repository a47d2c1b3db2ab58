//! A prelude is provided which imports all the important data types and traits of chordring.
/// Use this when you want to quickly bootstrap a new project.
pub use chordring_core;
pub use chordring_rpc;

pub use self::chordring_core::dht::Did;
pub use self::chordring_core::dht::IdSpace;
pub use self::chordring_core::dht::NodeInfo;
pub use self::chordring_core::dht::PeerRing;
pub use self::chordring_core::dht::Stabilizer;
pub use self::chordring_core::dht::TableRep;
pub use self::chordring_core::dht::TableRow;
pub use self::chordring_core::inspect::SwarmInspect;
pub use self::chordring_core::swarm::NodeState;
pub use self::chordring_core::swarm::Swarm;
pub use self::chordring_core::swarm::SwarmBuilder;
pub use self::chordring_core::transport::Transport;
pub use self::chordring_rpc::prelude::HttpTransport;
