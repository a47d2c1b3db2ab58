#![warn(missing_docs)]
//! This module provider [SwarmBuilder] and it's interface for
//! [Swarm]

use std::sync::Arc;
use std::sync::Mutex;

use crate::dht::IdSpace;
use crate::dht::NodeInfo;
use crate::dht::PeerRing;
use crate::error::Result;
use crate::swarm::NodeState;
use crate::swarm::Swarm;
use crate::transport::Transport;

/// Creates a SwarmBuilder to configure a Swarm.
pub struct SwarmBuilder {
    info: NodeInfo,
    space: IdSpace,
    transport: Arc<dyn Transport>,
    max_hops: Option<usize>,
}

impl SwarmBuilder {
    /// Creates new instance of [SwarmBuilder]
    pub fn new(info: NodeInfo, space: IdSpace, transport: Arc<dyn Transport>) -> Self {
        SwarmBuilder {
            info,
            space,
            transport,
            max_hops: None,
        }
    }

    /// Sets up the hop budget of a lookup, `2 * m` if unset.
    pub fn max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = Some(max_hops);
        self
    }

    /// Try build for `Swarm`. The node starts in [NodeState::Joining].
    pub fn build(self) -> Result<Swarm> {
        let max_hops = self
            .max_hops
            .unwrap_or(2 * self.space.bits() as usize);
        let dht = Arc::new(PeerRing::new(self.info, self.space)?);

        Ok(Swarm {
            dht,
            transport: self.transport,
            max_hops,
            state: Mutex::new(NodeState::Joining),
        })
    }
}
