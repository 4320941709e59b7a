//! Running-clients listing tests: the liveness cross-reference must stay
//! best-effort.

mod common;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use common::{
    FailingLiveness, HangingLiveness, MemoryStore, StaticLiveness, engine, engine_with_liveness,
    issued_license,
};

#[tokio::test]
async fn test_running_flag_follows_registry() {
    let store = Arc::new(MemoryStore::new());
    store.insert(issued_license("K1", "C1")).await;
    store.insert(issued_license("K2", "C2")).await;

    let bootstrap = engine(Arc::clone(&store));
    bootstrap.verify("K1", "C1", "HW1", "10.0.0.1").await.unwrap();
    bootstrap.verify("K2", "C2", "HW2", "10.0.0.2").await.unwrap();

    let registry = StaticLiveness(HashSet::from(["K1".to_string()]));
    let engine = engine_with_liveness(
        Arc::clone(&store),
        Arc::new(registry),
        Duration::from_millis(200),
    );

    let clients = engine.list_running_clients().await.unwrap();
    assert_eq!(clients.len(), 2);
    for client in &clients {
        match client.license.license_key.as_str() {
            "K1" => assert!(client.running),
            "K2" => assert!(!client.running),
            other => panic!("unexpected license {other}"),
        }
    }
}

#[tokio::test]
async fn test_issued_licenses_are_not_listed() {
    let store = Arc::new(MemoryStore::new());
    store.insert(issued_license("K1", "C1")).await;
    let engine = engine(Arc::clone(&store));

    assert!(engine.list_running_clients().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_registry_failure_defaults_to_not_running() {
    let store = Arc::new(MemoryStore::new());
    store.insert(issued_license("K1", "C1")).await;
    engine(Arc::clone(&store))
        .verify("K1", "C1", "HW1", "10.0.0.1")
        .await
        .unwrap();

    let engine = engine_with_liveness(
        Arc::clone(&store),
        Arc::new(FailingLiveness),
        Duration::from_millis(200),
    );

    let clients = engine.list_running_clients().await.unwrap();
    assert_eq!(clients.len(), 1);
    assert!(!clients[0].running);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_hanging_registry_is_cut_off_by_the_timeout() {
    let store = Arc::new(MemoryStore::new());
    store.insert(issued_license("K1", "C1")).await;
    engine(Arc::clone(&store))
        .verify("K1", "C1", "HW1", "10.0.0.1")
        .await
        .unwrap();

    let engine = engine_with_liveness(
        Arc::clone(&store),
        Arc::new(HangingLiveness),
        Duration::from_millis(100),
    );

    let started = Instant::now();
    let clients = engine.list_running_clients().await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(clients.len(), 1);
    assert!(!clients[0].running);
}
