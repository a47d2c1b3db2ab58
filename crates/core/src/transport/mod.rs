//! The Transport collaborator: remote call primitives between ring members.
//!
//! Every remote entry point of a node has the same semantics as the local
//! one, plus the possibility of failing with [Error::Failed](crate::error::Error::Failed).

#[cfg(any(test, feature = "dummy"))]
pub mod dummy;

use async_trait::async_trait;
use url::Url;

use crate::dht::Did;
use crate::dht::NodeInfo;
use crate::dht::TableRep;
use crate::error::Result;

/// Remote calls a node issues to another node.
/// Implementations must bound every call by a timeout and report any
/// non-success as `Failed`, never retrying on their own.
#[async_trait]
pub trait Transport: Send + Sync {
    /// NodeInfo of the node reachable at `addr`.
    async fn get_node_info(&self, addr: &Url) -> Result<NodeInfo>;

    /// Predecessor of `node`.
    async fn get_pred(&self, node: &NodeInfo) -> Result<Option<NodeInfo>>;

    /// Successor of `node`.
    async fn get_succ(&self, node: &NodeInfo) -> Result<NodeInfo>;

    /// Ask the node at `addr` to resolve the successor of `id`.
    async fn find_successor(&self, addr: &Url, id: Did) -> Result<NodeInfo>;

    /// Closest preceding finger of `id` in the finger table of `node`.
    async fn closest_preceding_finger(&self, node: &NodeInfo, id: Did) -> Result<NodeInfo>;

    /// Assert candidacy as predecessor of `node`.
    /// `Ok(None)` is the "not accepted" signal, distinct from failure.
    async fn notify(&self, node: &NodeInfo, record: TableRep) -> Result<Option<TableRep>>;

    /// Values bound under `key` at `node`.
    async fn get(&self, node: &NodeInfo, key: &str) -> Result<Vec<String>>;

    /// Bind `value` under `key` at `node`.
    async fn add(&self, node: &NodeInfo, key: &str, value: &str) -> Result<()>;

    /// Remove a binding at `node`.
    async fn delete(&self, node: &NodeInfo, key: &str, value: &str) -> Result<()>;

    /// Liveness probe, any failure to fetch the node info counts as failed.
    async fn is_failed(&self, node: &NodeInfo) -> bool {
        match self.get_node_info(&node.addr).await {
            Ok(_) => false,
            Err(e) => {
                tracing::debug!("probe of {} failed: {}", node, e);
                true
            }
        }
    }
}
