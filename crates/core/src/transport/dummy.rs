//! An in-process network for tests: nodes are reached by calling the
//! target [Swarm] directly.
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use url::Url;

use super::Transport;
use crate::dht::Did;
use crate::dht::NodeInfo;
use crate::dht::TableRep;
use crate::error::Error;
use crate::error::Result;
use crate::swarm::Swarm;

/// Registry of reachable nodes keyed by address. A node missing from the
/// registry looks failed to every caller.
#[derive(Default)]
pub struct DummyTransport {
    hub: DashMap<String, Arc<Swarm>>,
}

impl DummyTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `swarm` reachable at its address.
    pub fn register(&self, swarm: Arc<Swarm>) {
        self.hub.insert(swarm.info().addr.to_string(), swarm);
    }

    /// Make the node at `addr` unreachable, its state is left untouched.
    pub fn disconnect(&self, addr: &Url) -> Option<Arc<Swarm>> {
        self.hub.remove(addr.as_str()).map(|(_, v)| v)
    }

    fn connect(&self, addr: &Url, op: &str) -> Result<Arc<Swarm>> {
        self.hub
            .get(addr.as_str())
            .map(|s| s.value().clone())
            .ok_or_else(|| Error::failed(op, Error::NodeNotFound(addr.to_string())))
    }
}

#[async_trait]
impl Transport for DummyTransport {
    async fn get_node_info(&self, addr: &Url) -> Result<NodeInfo> {
        Ok(self.connect(addr, "getNodeInfo")?.get_node_info())
    }

    async fn get_pred(&self, node: &NodeInfo) -> Result<Option<NodeInfo>> {
        self.connect(&node.addr, "getPred")?.get_pred()
    }

    async fn get_succ(&self, node: &NodeInfo) -> Result<NodeInfo> {
        self.connect(&node.addr, "getSucc")?.get_succ()
    }

    async fn find_successor(&self, addr: &Url, id: Did) -> Result<NodeInfo> {
        let swarm = self.connect(addr, "findSuccessor")?;
        swarm.find_successor(id).await
    }

    async fn closest_preceding_finger(&self, node: &NodeInfo, id: Did) -> Result<NodeInfo> {
        self.connect(&node.addr, "closestPrecedingFinger")?
            .closest_preceding_finger(id)
    }

    async fn notify(&self, node: &NodeInfo, record: TableRep) -> Result<Option<TableRep>> {
        self.connect(&node.addr, "notify")?.notify(record)
    }

    async fn get(&self, node: &NodeInfo, key: &str) -> Result<Vec<String>> {
        Ok(self.connect(&node.addr, "getValue")?.get(key))
    }

    async fn add(&self, node: &NodeInfo, key: &str, value: &str) -> Result<()> {
        self.connect(&node.addr, "add")?
            .add_record(&TableRep::single(key, value))
    }

    async fn delete(&self, node: &NodeInfo, key: &str, value: &str) -> Result<()> {
        self.connect(&node.addr, "delete")?.delete(key, value)
    }
}
