//! Items needed by the rpc and node crates.
pub use async_trait::async_trait;
pub use url;

pub use crate::dht::Did;
pub use crate::dht::IdSpace;
pub use crate::dht::NodeInfo;
pub use crate::dht::TableRep;
pub use crate::dht::TableRow;
pub use crate::swarm::Swarm;
pub use crate::swarm::SwarmBuilder;
pub use crate::transport::Transport;
