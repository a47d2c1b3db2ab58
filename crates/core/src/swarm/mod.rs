#![warn(missing_docs)]
//! The node facade: the local ring state plus the transport to reach others.
//!
//! [Swarm] executes the remote actions returned by [PeerRing], which makes
//! it the only place where routing crosses node boundaries.

mod builder;

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

pub use builder::SwarmBuilder;
use serde::Deserialize;
use serde::Serialize;
use url::Url;

use crate::dht::Chord;
use crate::dht::Did;
use crate::dht::NodeInfo;
use crate::dht::PeerRing;
use crate::dht::PeerRingAction;
use crate::dht::PeerRingRemoteAction;
use crate::dht::TableRep;
use crate::error::Error;
use crate::error::Result;
use crate::inspect::SwarmInspect;
use crate::transport::Transport;

/// Membership state of a node. A failed node is never observed locally,
/// others find out by its silence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeState {
    /// Not yet part of a ring.
    Joining,
    /// Member of a ring, possibly a singleton one.
    Active,
}

/// A ring member: DHT state, transport, and membership state.
pub struct Swarm {
    /// Reference of DHT.
    pub(crate) dht: Arc<PeerRing>,
    pub(crate) transport: Arc<dyn Transport>,
    max_hops: usize,
    state: Mutex<NodeState>,
}

impl Swarm {
    /// Get did of self.
    pub fn did(&self) -> Did {
        self.dht.did()
    }

    /// Get identity of self.
    pub fn info(&self) -> NodeInfo {
        self.dht.info.clone()
    }

    /// Get DHT(Distributed Hash Table) of self.
    pub fn dht(&self) -> Arc<PeerRing> {
        self.dht.clone()
    }

    /// Get transport of self.
    pub fn transport(&self) -> Arc<dyn Transport> {
        self.transport.clone()
    }

    /// Hop budget of a lookup.
    pub fn max_hops(&self) -> usize {
        self.max_hops
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, NodeState>> {
        self.state.lock().map_err(|_| Error::DHTSyncLockError)
    }

    /// Current membership state.
    pub fn state(&self) -> Result<NodeState> {
        Ok(*self.lock_state()?)
    }

    /// Start a new ring with self as its only member.
    pub fn create(&self) -> Result<()> {
        let mut state = self.lock_state()?;
        if *state == NodeState::Active {
            return Err(Error::invalid(format!("{} is already active", self.info())));
        }
        *state = NodeState::Active;
        tracing::info!("{} created a new ring", self.info());
        Ok(())
    }

    /// Join the ring known to `introducer`: our successor is whatever the
    /// introducer resolves for our own id.
    /// If the introducer is unreachable the node stays in Joining.
    pub async fn join(&self, introducer: &Url) -> Result<()> {
        if self.state()? == NodeState::Active {
            return Err(Error::invalid(format!("{} is already active", self.info())));
        }
        let successor = self.transport.find_successor(introducer, self.did()).await?;
        self.dht.join(successor.clone())?;
        *self.lock_state()? = NodeState::Active;
        tracing::info!("{} joined via {}, successor {}", self.info(), introducer, successor);
        Ok(())
    }

    /// Resolve the node owning `did`, hopping over remote nodes when needed.
    pub async fn find_successor(&self, did: Did) -> Result<NodeInfo> {
        let action = self.dht.find_successor(did)?;
        self.route(action).await
    }

    /// Drive a lookup to its end as an explicit loop bounded by `max_hops`.
    pub(crate) async fn route(&self, mut action: PeerRingAction) -> Result<NodeInfo> {
        let mut hops = 0;
        loop {
            match action {
                PeerRingAction::Some(node) => return Ok(node),
                PeerRingAction::RemoteAction(next, PeerRingRemoteAction::FindSuccessor(did)) => {
                    if hops >= self.max_hops {
                        return Err(Error::failed(
                            "findSuccessor",
                            format!("no owner of {} within {} hops", did, self.max_hops),
                        ));
                    }
                    hops += 1;
                    action = self.hop(&next, did).await?;
                }
                act => return Err(Error::PeerRingUnexpectedAction(act)),
            }
        }
    }

    /// One routing step at `node`, the remote twin of [PeerRing::find_successor].
    async fn hop(&self, node: &NodeInfo, did: Did) -> Result<PeerRingAction> {
        if *node == self.dht.info {
            return self.dht.find_successor(did);
        }
        tracing::debug!("find_successor of {} hop to {}", did, node);
        let successor = self.transport.get_succ(node).await?;
        if self.dht.space.between_right_incl(node.id, did, successor.id) {
            return Ok(PeerRingAction::Some(successor));
        }
        let closest = self.transport.closest_preceding_finger(node, did).await?;
        let next = if closest == *node { successor } else { closest };
        Ok(PeerRingAction::RemoteAction(
            next,
            PeerRingRemoteAction::FindSuccessor(did),
        ))
    }

    /// getNodeInfo
    pub fn get_node_info(&self) -> NodeInfo {
        self.info()
    }

    /// getPred
    pub fn get_pred(&self) -> Result<Option<NodeInfo>> {
        self.dht.predecessor()
    }

    /// getSucc
    pub fn get_succ(&self) -> Result<NodeInfo> {
        self.dht.successor()
    }

    /// closestPrecedingFinger
    pub fn closest_preceding_finger(&self, did: Did) -> Result<NodeInfo> {
        self.dht.closest_preceding_finger(did)
    }

    /// Handle a notify record, answering with the bindings transfer record
    /// on acceptance and `None` on rejection.
    pub fn notify(&self, record: TableRep) -> Result<Option<TableRep>> {
        let candidate = record
            .info
            .ok_or_else(|| Error::invalid("notify without candidate"))?;
        if !self.dht.space.contains(candidate.id) {
            return Err(Error::invalid(format!(
                "candidate {} is outside of the ring",
                candidate
            )));
        }
        let moved = self.dht.notify(candidate)?;
        match moved {
            Some(entry) => Ok(Some(TableRep::transfer(
                self.info(),
                self.get_succ()?,
                entry,
            ))),
            None => Ok(None),
        }
    }

    /// Local get.
    pub fn get(&self, key: &str) -> Vec<String> {
        self.dht.get(key)
    }

    /// Local add.
    pub fn add(&self, key: &str, value: &str) -> Result<()> {
        self.dht.add(key, value)
    }

    /// Local add from an add record.
    pub fn add_record(&self, record: &TableRep) -> Result<()> {
        let (key, value) = record.as_single()?;
        self.add(key, value)
    }

    /// Local delete.
    pub fn delete(&self, key: &str, value: &str) -> Result<()> {
        self.dht.delete(key, value)
    }

    async fn owner_of(&self, key: &str) -> Result<NodeInfo> {
        self.find_successor(self.dht.space.hash_key(key)).await
    }

    /// Values of `key` at its owner.
    pub async fn lookup(&self, key: &str) -> Result<Vec<String>> {
        let owner = self.owner_of(key).await?;
        if owner == self.dht.info {
            return Ok(self.get(key));
        }
        self.transport.get(&owner, key).await
    }

    /// Bind `value` under `key` at its owner.
    pub async fn put(&self, key: &str, value: &str) -> Result<()> {
        let owner = self.owner_of(key).await?;
        if owner == self.dht.info {
            return self.add(key, value);
        }
        self.transport.add(&owner, key, value).await
    }

    /// Remove a binding at the owner of `key`.
    pub async fn remove(&self, key: &str, value: &str) -> Result<()> {
        let owner = self.owner_of(key).await?;
        if owner == self.dht.info {
            return self.delete(key, value);
        }
        self.transport.delete(&owner, key, value).await
    }

    /// Snapshot of the node.
    pub fn inspect(&self) -> Result<SwarmInspect> {
        SwarmInspect::inspect(self)
    }
}
