use std::sync::Arc;

use crate::dht::tests::node;
use crate::dht::tests::space;
use crate::dht::Stabilizer;
use crate::error::Result;
use crate::inspect::DHTInspect;
use crate::swarm::NodeState;
use crate::tests::default::assert_converged;
use crate::tests::default::expected_owner;
use crate::tests::default::prepare_node;
use crate::tests::default::prepare_ring;
use crate::tests::default::stabilize_rounds;
use crate::transport::dummy::DummyTransport;

#[tokio::test]
async fn test_stabilization_once() -> Result<()> {
    let network = Arc::new(DummyTransport::new());
    let swarm1 = prepare_node(&network, 10);
    let swarm2 = prepare_node(&network, 30);
    swarm1.create()?;
    swarm2.join(&swarm1.info().addr).await?;
    assert_eq!(swarm2.state()?, NodeState::Active);
    assert_eq!(swarm2.get_succ()?, node(10));
    assert_eq!(swarm2.get_pred()?, None);

    println!("stabilize joining node");
    Stabilizer::new(swarm2.clone()).stabilize().await?;
    assert_eq!(swarm1.get_pred()?, Some(node(30)));
    assert_eq!(swarm1.get_succ()?, node(10));

    println!("stabilize singleton node, adopt own predecessor as successor");
    Stabilizer::new(swarm1.clone()).stabilize().await?;
    assert_eq!(swarm1.get_succ()?, node(30));
    assert_eq!(swarm2.get_pred()?, Some(node(10)));

    assert_converged(&[swarm1, swarm2])
}

#[tokio::test]
async fn test_join_fails_on_unreachable_introducer() -> Result<()> {
    let network = Arc::new(DummyTransport::new());
    let swarm = prepare_node(&network, 10);
    let err = swarm
        .join(&"mem://nowhere".parse().unwrap())
        .await
        .unwrap_err();
    assert!(err.is_failed());
    assert_eq!(swarm.state()?, NodeState::Joining);

    swarm.create()?;
    assert!(swarm.create().unwrap_err().is_invalid());
    assert!(swarm
        .join(&"mem://nowhere".parse().unwrap())
        .await
        .unwrap_err()
        .is_invalid());
    Ok(())
}

#[tokio::test]
async fn test_stabilization_converges() -> Result<()> {
    let ids = [5, 12, 20, 33, 41, 47, 58, 63];
    let network = Arc::new(DummyTransport::new());
    let nodes = prepare_ring(&network, &ids).await?;
    assert_converged(&nodes)?;

    println!("walk successors from every node");
    for start in &nodes {
        let mut seen = vec![start.did()];
        let mut cur = start.get_succ()?;
        while cur != start.info() {
            assert!(!seen.contains(&cur.id), "{} visited twice", cur);
            seen.push(cur.id);
            let next = nodes.iter().find(|x| x.info() == cur).unwrap();
            cur = next.get_succ()?;
        }
        assert_eq!(seen.len(), ids.len());
    }

    println!("ownership intervals partition the ring");
    let s = space();
    for v in 0..s.size() {
        let did = s.did(v);
        let owners: Vec<_> = nodes
            .iter()
            .filter(|x| x.dht().owns(did).unwrap())
            .map(|x| x.did())
            .collect();
        assert_eq!(owners, vec![expected_owner(&ids, did).id], "owner of {}", did);
    }
    Ok(())
}

#[tokio::test]
async fn test_stabilize_is_stable_once_converged() -> Result<()> {
    let ids = [10, 30, 50];
    let network = Arc::new(DummyTransport::new());
    let nodes = prepare_ring(&network, &ids).await?;
    let before: Vec<DHTInspect> = nodes
        .iter()
        .map(|x| DHTInspect::inspect(&x.dht()))
        .collect::<Result<_>>()?;

    stabilize_rounds(&nodes, 3).await;
    let after: Vec<DHTInspect> = nodes
        .iter()
        .map(|x| DHTInspect::inspect(&x.dht()))
        .collect::<Result<_>>()?;
    assert_eq!(before, after);
    Ok(())
}

#[tokio::test]
async fn test_fix_fingers_reach_exact_successors() -> Result<()> {
    let ids = [5, 12, 20, 33, 41, 47, 58, 63];
    let network = Arc::new(DummyTransport::new());
    let nodes = prepare_ring(&network, &ids).await?;

    let s = space();
    for swarm in &nodes {
        let stabilizer = Stabilizer::new(swarm.clone());
        for _ in 0..s.bits() {
            stabilizer.fix_fingers().await?;
        }
        let finger = swarm.dht().lock_finger()?.clone();
        for i in 0..finger.size() {
            assert_eq!(
                finger[i],
                expected_owner(&ids, finger.start(i)),
                "finger {} of {}",
                i,
                swarm.info()
            );
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_successor_failure_falls_back_to_finger() -> Result<()> {
    let network = Arc::new(DummyTransport::new());
    let nodes = prepare_ring(&network, &[10, 30, 50]).await?;
    let (n10, n50) = (nodes[0].clone(), nodes[2].clone());

    println!("node 30 stops answering");
    network.disconnect(&node(30).addr).unwrap();

    assert!(Stabilizer::new(n10.clone()).stabilize().await.is_err());
    assert_eq!(n10.get_succ()?, node(50));
    assert!(!n10.dht().lock_finger()?.contains(node(30).id));

    let survivors = vec![n10.clone(), n50.clone()];
    stabilize_rounds(&survivors, 3).await;
    assert_converged(&survivors)
}

#[tokio::test]
async fn test_predecessor_failure_is_cleared() -> Result<()> {
    let network = Arc::new(DummyTransport::new());
    let nodes = prepare_ring(&network, &[10, 30]).await?;
    network.disconnect(&node(10).addr).unwrap();

    Stabilizer::new(nodes[1].clone()).check_predecessor().await?;
    assert_eq!(nodes[1].get_pred()?, None);
    Ok(())
}
