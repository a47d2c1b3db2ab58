#![warn(missing_docs)]
//! # chordring client
//!
//! Client of a running node, used by the `chordring` command line. Ring
//! queries are sent to the given endpoint, storage commands are routed to
//! the node owning the key.

use url::Url;

use crate::prelude::chordring_rpc::method::Method;
use crate::prelude::chordring_rpc::types::Timeout;
use crate::prelude::HttpTransport;
use crate::prelude::IdSpace;
use crate::prelude::NodeInfo;
use crate::prelude::SwarmInspect;
use crate::prelude::Transport;

/// Alias about Result<ClientOutput<T>, E>.
type Output<T> = anyhow::Result<ClientOutput<T>>;

/// Wrap transport calls against one node.
pub struct Client {
    endpoint: Url,
    space: IdSpace,
    transport: HttpTransport,
    http: reqwest::Client,
}

/// Wrap client output contain raw result and humanreadable display.
pub struct ClientOutput<T> {
    /// Output data.
    pub result: T,
    display: String,
}

impl Client {
    /// Creates a client of the node at `endpoint_url`. Keys are hashed into
    /// `space`, which must be the ring's.
    pub fn new(endpoint_url: &str, space: IdSpace, timeout: Timeout) -> anyhow::Result<Self> {
        let endpoint = Url::parse(endpoint_url)?;
        let transport = HttpTransport::new(timeout)?;
        let http = reqwest::Client::builder().timeout(timeout.into()).build()?;
        Ok(Self {
            endpoint,
            space,
            transport,
            http,
        })
    }

    /// Identity of the node.
    pub async fn node_info(&self) -> Output<NodeInfo> {
        let info = self.transport.get_node_info(&self.endpoint).await?;
        ClientOutput::ok(info.to_string(), info)
    }

    /// Predecessor of the node.
    pub async fn pred(&self) -> Output<Option<NodeInfo>> {
        let node = self.node_info().await?.result;
        let pred = self.transport.get_pred(&node).await?;
        let display = match &pred {
            Some(p) => p.to_string(),
            None => "None".to_string(),
        };
        ClientOutput::ok(display, pred)
    }

    /// Successor of the node.
    pub async fn succ(&self) -> Output<NodeInfo> {
        let node = self.node_info().await?.result;
        let succ = self.transport.get_succ(&node).await?;
        ClientOutput::ok(succ.to_string(), succ)
    }

    /// Owner of `id`, resolved by the node.
    pub async fn find(&self, id: u64) -> Output<NodeInfo> {
        if id >= self.space.size() {
            anyhow::bail!("id {} is outside of a {} bits ring", id, self.space.bits());
        }
        let owner = self
            .transport
            .find_successor(&self.endpoint, self.space.did(id))
            .await?;
        ClientOutput::ok(owner.to_string(), owner)
    }

    async fn owner_of(&self, key: &str) -> anyhow::Result<NodeInfo> {
        let did = self.space.hash_key(key);
        Ok(self.transport.find_successor(&self.endpoint, did).await?)
    }

    /// Values of `key` at its owner.
    pub async fn get(&self, key: &str) -> Output<Vec<String>> {
        let owner = self.owner_of(key).await?;
        let vals = self.transport.get(&owner, key).await?;
        ClientOutput::ok(format!("{} @ {}: {:?}", key, owner, vals), vals)
    }

    /// Bind `value` under `key` at its owner.
    pub async fn add(&self, key: &str, value: &str) -> Output<()> {
        let owner = self.owner_of(key).await?;
        self.transport.add(&owner, key, value).await?;
        ClientOutput::ok(format!("Added to {}", owner), ())
    }

    /// Remove the binding of `value` under `key` at its owner.
    pub async fn delete(&self, key: &str, value: &str) -> Output<()> {
        let owner = self.owner_of(key).await?;
        self.transport.delete(&owner, key, value).await?;
        ClientOutput::ok(format!("Deleted from {}", owner), ())
    }

    /// Snapshot of the node.
    pub async fn inspect(&self) -> Output<SwarmInspect> {
        let url = self.endpoint.join(&Method::Inspect.path())?;
        let resp = self.http.get(url).send().await?.error_for_status()?;
        let inspect: SwarmInspect = resp.json().await?;
        let display = serde_json::to_string_pretty(&inspect)?;
        ClientOutput::ok(display, inspect)
    }
}

impl<T> ClientOutput<T> {
    /// Put display ahead to avoid moved value error.
    pub fn ok(display: String, result: T) -> anyhow::Result<Self> {
        Ok(Self { result, display })
    }

    /// Prints the display value of this ClientOutput instance to the console.
    pub fn display(&self) {
        println!("{}", self.display);
    }
}
