//! Nodes served by real axum servers on ephemeral ports, talking over
//! [HttpTransport].
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::native::endpoint::serve;
use crate::prelude::chordring_rpc::types::Timeout;
use crate::prelude::HttpTransport;
use crate::prelude::IdSpace;
use crate::prelude::NodeInfo;
use crate::prelude::TableRep;
use crate::prelude::Transport;
use crate::processor::Processor;
use crate::processor::ProcessorBuilder;
use crate::processor::ProcessorConfig;

mod test_http;

pub fn space() -> IdSpace {
    IdSpace::new(6).unwrap()
}

pub fn transport() -> HttpTransport {
    HttpTransport::new(Timeout::from(2000)).unwrap()
}

pub struct TestNode {
    pub processor: Arc<Processor>,
    server: JoinHandle<crate::error::Result<()>>,
}

impl TestNode {
    pub fn info(&self) -> NodeInfo {
        self.processor.swarm.info()
    }

    pub async fn stop(self) {
        self.processor.shutdown().await.unwrap();
        self.server.await.unwrap().unwrap();
    }
}

/// Serve node `id` and make it create a ring, or join the ring of
/// `introducer`.
pub async fn prepare_node(id: u64, introducer: Option<&NodeInfo>) -> TestNode {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = format!("http://{}/", listener.local_addr().unwrap());
    let config = ProcessorConfig {
        space: space(),
        info: NodeInfo::new(space().did(id), addr.parse().unwrap()),
        introducer: introducer.map(|x| x.addr.clone()),
        stabilize_interval: Duration::from_secs(3600),
        fix_fingers_interval: Duration::from_secs(3600),
        request_timeout: Timeout::from(2000),
        max_hops: None,
    };
    let processor = Arc::new(ProcessorBuilder::from_config(config).build().unwrap());
    let server = tokio::spawn(serve(listener, processor.clone()));
    processor.join_or_create().await.unwrap();
    println!("prepared node: {}", processor.swarm.info());
    TestNode { processor, server }
}

pub async fn stabilize_rounds(nodes: &[&TestNode], rounds: usize) {
    for _ in 0..rounds {
        for node in nodes {
            if let Err(e) = node.processor.stabilizer().stabilize().await {
                println!("stabilize of {} failed: {}", node.info(), e);
            }
        }
    }
}

/// `n` distinct keys whose hash lands in (a, b].
pub fn keys_in(a: u64, b: u64, n: usize) -> Vec<String> {
    let s = space();
    (0..)
        .map(|i| format!("key-{i}"))
        .filter(|k| s.between_right_incl(s.did(a), s.hash_key(k), s.did(b)))
        .take(n)
        .collect()
}

/// A notify request for `candidate`, sent without going through the
/// transport so the raw status is visible.
pub async fn raw_notify(target: &NodeInfo, candidate: NodeInfo) -> reqwest::Response {
    let id = u64::from(candidate.id);
    reqwest::Client::new()
        .put(target.addr.join("/dht/notify").unwrap())
        .query(&[("id", id)])
        .json(&TableRep::notify(candidate))
        .send()
        .await
        .unwrap()
}

pub async fn succ_of(node: &TestNode) -> NodeInfo {
    transport().get_succ(&node.info()).await.unwrap()
}

pub async fn pred_of(node: &TestNode) -> Option<NodeInfo> {
    transport().get_pred(&node.info()).await.unwrap()
}
