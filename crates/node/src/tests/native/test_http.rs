use reqwest::StatusCode;

use super::*;
use crate::prelude::NodeState;

#[tokio::test]
async fn test_single_node_over_http() {
    let node = prepare_node(10, None).await;
    let t = transport();

    let info = t.get_node_info(&node.info().addr).await.unwrap();
    assert_eq!(info, node.info());
    assert_eq!(info.addr, node.info().addr);
    assert_eq!(pred_of(&node).await, None);
    assert_eq!(succ_of(&node).await, node.info());
    let owner = t
        .find_successor(&node.info().addr, space().did(33))
        .await
        .unwrap();
    assert_eq!(owner, node.info());

    let inspect = node.processor.inspect().unwrap();
    assert_eq!(inspect.state, NodeState::Active);
    assert_eq!(inspect.dht.id, 10);
    node.stop().await;
}

#[tokio::test]
async fn test_pred_is_null_and_version_header() {
    let node = prepare_node(10, None).await;
    let resp = reqwest::get(node.info().addr.join("/dht/pred").unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let version = resp
        .headers()
        .get("X-NODE-VERSION")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(version.starts_with(env!("CARGO_PKG_VERSION")));
    assert_eq!(resp.text().await.unwrap(), "null");
    node.stop().await;
}

#[tokio::test]
async fn test_join_transfers_ownership_over_http() {
    let n10 = prepare_node(10, None).await;
    let n50 = prepare_node(50, Some(&n10.info())).await;
    stabilize_rounds(&[&n10, &n50], 2).await;
    assert_eq!(succ_of(&n10).await, n50.info());
    assert_eq!(pred_of(&n10).await, Some(n50.info()));
    assert_eq!(pred_of(&n50).await, Some(n10.info()));

    let moving = keys_in(10, 30, 3);
    let staying = keys_in(30, 50, 3);
    for key in moving.iter().chain(staying.iter()) {
        n10.processor.swarm.put(key, "v").await.unwrap();
    }
    for key in moving.iter().chain(staying.iter()) {
        assert_eq!(n50.processor.swarm.get(key), vec!["v".to_string()]);
    }

    let n30 = prepare_node(30, Some(&n10.info())).await;
    assert_eq!(succ_of(&n30).await, n50.info());
    stabilize_rounds(&[&n30, &n10, &n50], 2).await;

    assert_eq!(succ_of(&n10).await, n30.info());
    assert_eq!(succ_of(&n30).await, n50.info());
    assert_eq!(succ_of(&n50).await, n10.info());
    assert_eq!(pred_of(&n30).await, Some(n10.info()));
    assert_eq!(pred_of(&n50).await, Some(n30.info()));

    let t = transport();
    for key in moving.iter() {
        assert_eq!(t.get(&n30.info(), key).await.unwrap(), vec!["v".to_string()]);
        assert!(t.get(&n50.info(), key).await.unwrap().is_empty());
        assert_eq!(
            n50.processor.swarm.lookup(key).await.unwrap(),
            vec!["v".to_string()]
        );
    }
    for key in staying.iter() {
        assert_eq!(t.get(&n50.info(), key).await.unwrap(), vec!["v".to_string()]);
        assert!(t.get(&n30.info(), key).await.unwrap().is_empty());
    }

    n30.stop().await;
    n50.stop().await;
    n10.stop().await;
}

#[tokio::test]
async fn test_rejected_notify_is_not_modified() {
    let n10 = prepare_node(10, None).await;
    let n50 = prepare_node(50, Some(&n10.info())).await;
    stabilize_rounds(&[&n10, &n50], 2).await;
    assert_eq!(pred_of(&n50).await, Some(n10.info()));

    // 5 is not between the current predecessor 10 and 50.
    let far = NodeInfo::new(space().did(5), "http://127.0.0.1:9/".parse().unwrap());
    let resp = raw_notify(&n50.info(), far.clone()).await;
    assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
    let res = transport()
        .notify(&n50.info(), TableRep::notify(far))
        .await
        .unwrap();
    assert!(res.is_none());

    // The current predecessor notifying again is rejected as well.
    let resp = raw_notify(&n50.info(), n10.info()).await;
    assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
    assert_eq!(pred_of(&n50).await, Some(n10.info()));

    n50.stop().await;
    n10.stop().await;
}

#[tokio::test]
async fn test_bad_requests() {
    let node = prepare_node(10, None).await;
    let client = reqwest::Client::new();
    let url = |path: &str| node.info().addr.join(path).unwrap();

    let resp = client
        .get(url("/dht/find"))
        .query(&[("id", 64)])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = client
        .get(url("/dht/find?id=abc"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = client
        .delete(url("/dht/delete"))
        .query(&[("key", "absent"), ("value", "v")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let two = TableRep {
        entry: vec![crate::prelude::TableRow::new(
            "k",
            vec!["a".to_string(), "b".to_string()],
        )],
        ..Default::default()
    };
    let resp = client
        .put(url("/dht/add"))
        .json(&two)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Query id and candidate must agree.
    let candidate = NodeInfo::new(space().did(20), "http://127.0.0.1:9/".parse().unwrap());
    let resp = client
        .put(url("/dht/notify"))
        .query(&[("id", 21)])
        .json(&TableRep::notify(candidate))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Empty value set of an unknown key is not an error.
    let t = transport();
    assert!(t.get(&node.info(), "absent").await.unwrap().is_empty());
    let err = t.delete(&node.info(), "absent", "v").await.unwrap_err();
    assert!(err.is_failed());

    node.stop().await;
}

#[tokio::test]
async fn test_add_and_delete_over_http() {
    let node = prepare_node(10, None).await;
    let t = transport();
    t.add(&node.info(), "k", "a").await.unwrap();
    t.add(&node.info(), "k", "a").await.unwrap();
    t.add(&node.info(), "k", "b").await.unwrap();
    assert_eq!(
        t.get(&node.info(), "k").await.unwrap(),
        vec!["a".to_string(), "b".to_string()]
    );
    t.delete(&node.info(), "k", "a").await.unwrap();
    assert_eq!(t.get(&node.info(), "k").await.unwrap(), vec!["b".to_string()]);
    node.stop().await;
}

#[tokio::test]
async fn test_failed_hop_is_service_unavailable() {
    let n10 = prepare_node(10, None).await;
    let n50 = prepare_node(50, Some(&n10.info())).await;
    stabilize_rounds(&[&n10, &n50], 2).await;
    let addr = n10.info().addr;
    n50.stop().await;

    // 5 is outside of (10, 50], so 10 resolves it through the stopped node.
    let resp = reqwest::Client::new()
        .get(addr.join("/dht/find").unwrap())
        .query(&[("id", 5)])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    n10.stop().await;
}
