use std::sync::Arc;
use std::sync::Barrier;

use crate::dht::tests::node;
use crate::dht::tests::space;
use crate::dht::Chord;
use crate::dht::PeerRing;
use crate::dht::Stabilizer;
use crate::error::Result;
use crate::tests::default::assert_converged;
use crate::tests::default::keys_in;
use crate::tests::default::prepare_node;
use crate::tests::default::prepare_ring;
use crate::transport::dummy::DummyTransport;

#[tokio::test]
async fn test_join_moves_keys_to_new_predecessor() -> Result<()> {
    let network = Arc::new(DummyTransport::new());
    let mut nodes = prepare_ring(&network, &[10, 30, 50]).await?;
    let (n10, n30, n50) = (nodes[0].clone(), nodes[1].clone(), nodes[2].clone());

    let moving = keys_in(30, 40, 3);
    let staying = keys_in(40, 50, 2);
    let elsewhere = keys_in(50, 10, 2);
    for k in moving.iter().chain(&staying).chain(&elsewhere) {
        n10.put(k, "v1").await?;
        n10.put(k, "v2").await?;
    }
    for k in moving.iter().chain(&staying) {
        assert_eq!(n50.get(k), vec!["v1".to_string(), "v2".into()]);
    }
    for k in &elsewhere {
        assert_eq!(n10.get(k).len(), 2);
    }

    println!("node 40 joins via node 50");
    let n40 = prepare_node(&network, 40);
    n40.join(&node(50).addr).await?;
    assert_eq!(n40.get_succ()?, node(50));

    Stabilizer::new(n40.clone()).stabilize().await?;
    assert_eq!(n50.get_pred()?, Some(node(40)));
    Stabilizer::new(n30.clone()).stabilize().await?;
    assert_eq!(n30.get_succ()?, node(40));
    assert_eq!(n40.get_pred()?, Some(node(30)));

    for k in &moving {
        assert!(n50.get(k).is_empty(), "{} still on node 50", k);
        assert_eq!(n40.get(k), vec!["v1".to_string(), "v2".into()]);
    }
    for k in &staying {
        assert!(n40.get(k).is_empty());
        assert_eq!(n50.get(k).len(), 2);
    }
    for k in &elsewhere {
        assert_eq!(n10.get(k).len(), 2);
    }

    nodes.push(n40);
    assert_converged(&nodes)?;
    for k in &moving {
        assert_eq!(n30.lookup(k).await?, vec!["v1".to_string(), "v2".into()]);
    }
    Ok(())
}

#[tokio::test]
async fn test_add_is_idempotent() -> Result<()> {
    let network = Arc::new(DummyTransport::new());
    let nodes = prepare_ring(&network, &[10, 30]).await?;
    let key = keys_in(10, 30, 1).remove(0);

    nodes[0].put(&key, "v").await?;
    let once = nodes[0].lookup(&key).await?;
    nodes[0].put(&key, "v").await?;
    assert_eq!(nodes[0].lookup(&key).await?, once);
    assert_eq!(once, vec!["v".to_string()]);
    assert_eq!(nodes[1].get(&key), once);
    Ok(())
}

#[tokio::test]
async fn test_remove_missing_binding_is_invalid() -> Result<()> {
    let network = Arc::new(DummyTransport::new());
    let nodes = prepare_ring(&network, &[10, 30]).await?;
    let key = keys_in(30, 10, 1).remove(0);

    assert!(nodes[1].remove(&key, "v").await.unwrap_err().is_invalid());
    nodes[1].put(&key, "v").await?;
    nodes[1].remove(&key, "v").await?;
    assert!(nodes[1].lookup(&key).await?.is_empty());
    assert!(nodes[0].get(&key).is_empty());
    Ok(())
}

#[test]
fn test_concurrent_notify_keeps_one_predecessor() {
    let s = space();
    let near = keys_in(30, 40, 2);
    let far = keys_in(10, 30, 2);

    for _ in 0..50 {
        let dht = Arc::new(PeerRing::new(node(50), s).unwrap());
        *dht.lock_predecessor().unwrap() = Some(node(10));
        for k in near.iter().chain(&far) {
            dht.add(k, "v").unwrap();
        }

        let barrier = Arc::new(Barrier::new(2));
        let (moved_far, moved_near) = std::thread::scope(|scope| {
            let a = scope.spawn(|| {
                barrier.wait();
                dht.notify(node(30)).unwrap()
            });
            let b = scope.spawn(|| {
                barrier.wait();
                dht.notify(node(40)).unwrap()
            });
            (a.join().unwrap(), b.join().unwrap())
        });

        assert_eq!(dht.predecessor().unwrap(), Some(node(40)));
        let moved_near = moved_near.expect("closer candidate is always accepted");
        match moved_far {
            // 30 came first and was replaced by 40 afterwards.
            Some(rows) => {
                assert_eq!(rows.len(), far.len());
                assert_eq!(moved_near.len(), near.len());
            }
            // 30 lost the race: nothing was handed to it.
            None => assert_eq!(moved_near.len(), near.len() + far.len()),
        }
        assert_eq!(dht.storage.count(), 0);
    }
}
