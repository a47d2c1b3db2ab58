use std::sync::Arc;

use crate::dht::tests::node;
use crate::dht::tests::space;
use crate::error::Result;
use crate::swarm::SwarmBuilder;
use crate::tests::default::expected_owner;
use crate::tests::default::prepare_node;
use crate::tests::default::prepare_ring;
use crate::tests::default::stabilize_rounds;
use crate::transport::dummy::DummyTransport;

#[tokio::test]
async fn test_single_node_find_successor_is_self() -> Result<()> {
    let network = Arc::new(DummyTransport::new());
    let swarm = prepare_node(&network, 21);
    swarm.create()?;
    let s = space();
    for v in 0..s.size() {
        assert_eq!(swarm.find_successor(s.did(v)).await?, node(21));
    }
    Ok(())
}

#[tokio::test]
async fn test_find_successor_agrees_from_every_node() -> Result<()> {
    let ids = [3, 17, 25, 36, 44, 59];
    let network = Arc::new(DummyTransport::new());
    let nodes = prepare_ring(&network, &ids).await?;

    let s = space();
    for swarm in &nodes {
        for key in ["apple", "banana", "cherry", "durian", "elderberry"] {
            let did = s.hash_key(key);
            assert_eq!(
                swarm.find_successor(did).await?,
                expected_owner(&ids, did),
                "owner of {} from {}",
                key,
                swarm.info()
            );
        }
        for v in (0..s.size()).step_by(5) {
            let did = s.did(v);
            assert_eq!(swarm.find_successor(did).await?, expected_owner(&ids, did));
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_unreachable_intermediate_surfaces_failed() -> Result<()> {
    let network = Arc::new(DummyTransport::new());
    let nodes = prepare_ring(&network, &[10, 30, 50]).await?;
    let (n10, n30) = (nodes[0].clone(), nodes[1].clone());
    let succ_30 = n30.get_succ()?;
    let pred_30 = n30.get_pred()?;

    // The only finger of node 10 before 45 is node 30.
    let unreachable = network.disconnect(&node(30).addr).unwrap();
    let err = n10.find_successor(space().did(45)).await.unwrap_err();
    assert!(err.is_failed());
    assert_eq!(n10.get_succ()?, node(30));

    network.register(unreachable);
    assert_eq!(n30.get_succ()?, succ_30);
    assert_eq!(n30.get_pred()?, pred_30);
    assert_eq!(n10.find_successor(space().did(45)).await?, node(50));
    Ok(())
}

#[tokio::test]
async fn test_hop_limit_surfaces_failed() -> Result<()> {
    let network = Arc::new(DummyTransport::new());
    let n10 = Arc::new(
        SwarmBuilder::new(node(10), space(), network.clone())
            .max_hops(0)
            .build()?,
    );
    network.register(n10.clone());
    n10.create()?;
    let n30 = prepare_node(&network, 30);
    n30.join(&node(10).addr).await?;
    let nodes = vec![n10.clone(), n30];
    stabilize_rounds(&nodes, 2).await;

    // Answered by the successor pointer, no hop needed.
    assert_eq!(n10.find_successor(space().did(20)).await?, node(30));
    let err = n10.find_successor(space().did(40)).await.unwrap_err();
    assert!(err.is_failed());
    Ok(())
}
