//! Activation engine behavior tests.

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};

use keyhub_entity::license::{LicenseStatus, VerificationOutcome};

use common::{MemoryStore, engine, issued_license};

#[tokio::test]
async fn test_first_activation_binds_hardware() {
    let store = Arc::new(MemoryStore::new());
    let id = store.insert(issued_license("K1", "C1")).await;
    let engine = engine(Arc::clone(&store));

    let outcome = engine.verify("K1", "C1", "HW1", "10.0.0.1").await.unwrap();
    assert_eq!(outcome, VerificationOutcome::Success);
    assert_eq!(outcome.check_code(), "Y");

    let license = store.get(id).await;
    assert_eq!(license.status, LicenseStatus::InUse);
    assert_eq!(license.hardware_id.as_deref(), Some("HW1"));
    assert!(license.activated_at.is_some());

    let logs = store.logs().await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].license_id, Some(id));
    assert!(logs[0].status);
    assert_eq!(logs[0].message, "first activation");
}

#[tokio::test]
async fn test_replay_is_duplicate_and_does_not_mutate() {
    let store = Arc::new(MemoryStore::new());
    let id = store.insert(issued_license("K1", "C1")).await;
    let engine = engine(Arc::clone(&store));

    engine.verify("K1", "C1", "HW1", "10.0.0.1").await.unwrap();
    let activated = store.get(id).await;

    let outcome = engine.verify("K1", "C1", "HW1", "10.0.0.1").await.unwrap();
    assert_eq!(outcome, VerificationOutcome::Duplicate);
    assert_eq!(outcome.check_code(), "D");

    let after = store.get(id).await;
    assert_eq!(after.hardware_id, activated.hardware_id);
    assert_eq!(after.activated_at, activated.activated_at);
    assert_eq!(after.status, LicenseStatus::InUse);

    let logs = store.logs().await;
    assert_eq!(logs.len(), 2);
    assert!(!logs[1].status);
    assert_eq!(logs[1].message, "already activated");
}

#[tokio::test]
async fn test_replay_with_different_hardware_keeps_original_binding() {
    let store = Arc::new(MemoryStore::new());
    let id = store.insert(issued_license("K1", "C1")).await;
    let engine = engine(Arc::clone(&store));

    engine.verify("K1", "C1", "HW1", "10.0.0.1").await.unwrap();
    let outcome = engine.verify("K1", "C1", "HW2", "10.0.0.2").await.unwrap();

    assert_eq!(outcome, VerificationOutcome::Duplicate);
    assert_eq!(store.get(id).await.hardware_id.as_deref(), Some("HW1"));
}

#[tokio::test]
async fn test_unknown_key_is_invalid_with_null_log_reference() {
    let store = Arc::new(MemoryStore::new());
    let engine = engine(Arc::clone(&store));

    let outcome = engine.verify("NOPE", "C1", "HW1", "10.0.0.1").await.unwrap();
    assert_eq!(outcome, VerificationOutcome::Invalid);
    assert_eq!(outcome.check_code(), "N");

    let logs = store.logs().await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].license_id, None);
    assert!(!logs[0].status);
}

#[tokio::test]
async fn test_key_and_client_must_both_match() {
    let store = Arc::new(MemoryStore::new());
    let id = store.insert(issued_license("K1", "C1")).await;
    let engine = engine(Arc::clone(&store));

    let outcome = engine.verify("K1", "C2", "HW1", "10.0.0.1").await.unwrap();
    assert_eq!(outcome, VerificationOutcome::Invalid);
    assert_eq!(store.get(id).await.status, LicenseStatus::Issued);
}

#[tokio::test]
async fn test_expired_license_is_invalid() {
    let store = Arc::new(MemoryStore::new());
    let mut license = issued_license("K1", "C1");
    license.expires_at = Utc::now() - Duration::days(1);
    let id = store.insert(license).await;
    let engine = engine(Arc::clone(&store));

    let outcome = engine.verify("K1", "C1", "HW1", "10.0.0.1").await.unwrap();
    assert_eq!(outcome, VerificationOutcome::Invalid);
    assert_eq!(store.get(id).await.status, LicenseStatus::Issued);

    let logs = store.logs().await;
    assert_eq!(logs[0].license_id, Some(id));
}

#[tokio::test]
async fn test_kill_switch_makes_issued_license_invalid() {
    let store = Arc::new(MemoryStore::new());
    let mut license = issued_license("K1", "C1");
    license.is_active = false;
    store.insert(license).await;
    let engine = engine(Arc::clone(&store));

    let outcome = engine.verify("K1", "C1", "HW1", "10.0.0.1").await.unwrap();
    assert_eq!(outcome, VerificationOutcome::Invalid);
}

#[tokio::test]
async fn test_stopped_license_is_indistinguishable_from_not_found() {
    let store = Arc::new(MemoryStore::new());
    let mut license = issued_license("K1", "C1");
    license.status = LicenseStatus::Stopped;
    store.insert(license).await;
    let engine = engine(Arc::clone(&store));

    let outcome = engine.verify("K1", "C1", "HW1", "10.0.0.1").await.unwrap();
    assert_eq!(outcome, VerificationOutcome::Invalid);
    assert_eq!(outcome.check_code(), "N");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_verifies_have_exactly_one_winner() {
    let store = Arc::new(MemoryStore::new());
    let id = store.insert(issued_license("K1", "C1")).await;
    let engine = Arc::new(engine(Arc::clone(&store)));

    let mut handles = Vec::new();
    for n in 0..16 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            let hardware = format!("HW{n}");
            let outcome = engine.verify("K1", "C1", &hardware, "10.0.0.1").await.unwrap();
            (hardware, outcome)
        }));
    }

    let mut winners = Vec::new();
    let mut duplicates = 0;
    for handle in handles {
        let (hardware, outcome) = handle.await.unwrap();
        match outcome {
            VerificationOutcome::Success => winners.push(hardware),
            VerificationOutcome::Duplicate => duplicates += 1,
            VerificationOutcome::Invalid => panic!("no verify may be rejected here"),
        }
    }

    assert_eq!(winners.len(), 1);
    assert_eq!(duplicates, 15);

    let license = store.get(id).await;
    assert_eq!(license.status, LicenseStatus::InUse);
    assert_eq!(license.hardware_id.as_deref(), Some(winners[0].as_str()));

    // Every attempt left an audit row.
    assert_eq!(store.logs().await.len(), 16);
}

#[tokio::test]
async fn test_stop_is_idempotent_and_terminal() {
    let store = Arc::new(MemoryStore::new());
    let id = store.insert(issued_license("K1", "C1")).await;
    let engine = engine(Arc::clone(&store));

    let stopped = engine.stop(id).await.unwrap();
    assert_eq!(stopped.status, LicenseStatus::Stopped);

    // Stopping again is a no-op success.
    let again = engine.stop(id).await.unwrap();
    assert_eq!(again.status, LicenseStatus::Stopped);

    // Re-enabling the kill-switch does not resurrect it.
    engine.set_active(id, true).await.unwrap();
    let outcome = engine.verify("K1", "C1", "HW1", "10.0.0.1").await.unwrap();
    assert_eq!(outcome, VerificationOutcome::Invalid);
}

#[tokio::test]
async fn test_stop_after_activation_keeps_binding() {
    let store = Arc::new(MemoryStore::new());
    let id = store.insert(issued_license("K1", "C1")).await;
    let engine = engine(Arc::clone(&store));

    engine.verify("K1", "C1", "HW1", "10.0.0.1").await.unwrap();
    let stopped = engine.stop(id).await.unwrap();

    assert_eq!(stopped.status, LicenseStatus::Stopped);
    assert_eq!(stopped.hardware_id.as_deref(), Some("HW1"));
    assert!(stopped.activated_at.is_some());
}

#[tokio::test]
async fn test_stop_unknown_license_is_not_found() {
    let store = Arc::new(MemoryStore::new());
    let engine = engine(store);
    assert!(engine.stop(4242).await.is_err());
}

#[tokio::test]
async fn test_storage_failure_is_an_error_not_an_outcome() {
    let store = Arc::new(MemoryStore::new());
    store.insert(issued_license("K1", "C1")).await;
    store.break_logging();
    let engine = engine(Arc::clone(&store));

    assert!(engine.verify("K1", "C1", "HW1", "10.0.0.1").await.is_err());
}
