//! SQLite Record Store Tests
//! SQLite 记录存储测试

use std::sync::Arc;
use std::time::{Duration, Instant};

use ig_core::config::StorageConfig;
use ig_core::identity::{Fingerprint, IdentityCatalog};
use ig_core::ids::OwnerId;
use ig_core::ports::{
    ConflictClass, ConflictClassifierPort, IsolationLevel, RecordStorePort, TxOptions,
};
use ig_core::record::{CandidateRecord, NewRecord};
use ig_infra::db::executor::DieselSqliteExecutor;
use ig_infra::db::pool::init_db_pool;
use ig_infra::{DieselRecordStore, SqliteConflictClassifier, SystemClock};
use tempfile::TempDir;

fn open_store(dir: &TempDir) -> DieselRecordStore {
    let config = StorageConfig {
        database_path: dir.path().join("records.db"),
        pool_size: 4,
        busy_timeout_ms: 5_000,
    };
    let pool = init_db_pool(&config).expect("Failed to create test DB pool");
    DieselRecordStore::new(DieselSqliteExecutor::new(pool), Arc::new(SystemClock))
}

fn fingerprinted(candidate: &CandidateRecord) -> NewRecord {
    let strategy = IdentityCatalog::default()
        .strategy_for(candidate.kind())
        .cloned()
        .unwrap();
    NewRecord::new(candidate, strategy.fingerprint_of(candidate))
}

#[tokio::test]
async fn test_insert_and_find_by_identity() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let record = fingerprinted(&CandidateRecord::billing_address(
        "user-1", "1 Elm St.", Some("Apt 4"), "Austin", "73301", "TX",
    ));

    let created = store.insert(&record, &TxOptions::default()).await.unwrap();
    let found = store.find_by_identity(&record.identity).await.unwrap();

    assert_eq!(found, Some(created.clone()));
    assert_eq!(created.fingerprint().as_str().len(), 64);
    assert!(created.created_at_ms > 0);
}

#[tokio::test]
async fn test_find_by_identity_misses_other_kind_and_owner() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let record = fingerprinted(&CandidateRecord::fund_option("user123", "2222"));
    store.insert(&record, &TxOptions::default()).await.unwrap();

    let mut other_owner = record.identity.clone();
    other_owner.owner_id = OwnerId::new("user124");
    let mut other_key = record.identity.clone();
    other_key.fingerprint = Fingerprint::from_stored("user123\u{1f}2223");

    assert_eq!(store.find_by_identity(&other_owner).await.unwrap(), None);
    assert_eq!(store.find_by_identity(&other_key).await.unwrap(), None);
}

#[tokio::test]
async fn test_duplicate_insert_is_classified_duplicate() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let record = fingerprinted(&CandidateRecord::fund_option("user123", "2222"));

    store.insert(&record, &TxOptions::default()).await.unwrap();

    for isolation in [
        IsolationLevel::Serializable,
        IsolationLevel::RepeatableRead,
        IsolationLevel::ReadCommitted,
    ] {
        let options = TxOptions {
            isolation,
            deadline: None,
        };
        let err = store.insert(&record, &options).await.unwrap_err();
        assert_eq!(
            SqliteConflictClassifier.classify(&err),
            ConflictClass::Duplicate,
            "{isolation:?}: {err}"
        );
    }
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_expired_deadline_rolls_back() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let record = fingerprinted(&CandidateRecord::fund_option("user123", "2222"));
    let options = TxOptions {
        isolation: IsolationLevel::Serializable,
        deadline: Instant::now().checked_sub(Duration::from_millis(1)),
    };

    let err = store.insert(&record, &options).await.unwrap_err();

    assert_eq!(SqliteConflictClassifier.classify(&err), ConflictClass::Fatal);
    assert_eq!(store.find_by_identity(&record.identity).await.unwrap(), None);
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_find_all_by_owner_lists_only_that_owner() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    for (owner, identifier) in [("user123", "1"), ("user123", "2"), ("user999", "1")] {
        let record = fingerprinted(&CandidateRecord::fund_option(owner, identifier));
        store.insert(&record, &TxOptions::default()).await.unwrap();
    }

    let listed = store
        .find_all_by_owner(&OwnerId::new("user123"))
        .await
        .unwrap();

    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|r| r.identity.owner_id.as_str() == "user123"));
    assert_eq!(store.count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let record = fingerprinted(&CandidateRecord::fund_option("user123", "2222"));
    let created = {
        let store = open_store(&dir);
        store.insert(&record, &TxOptions::default()).await.unwrap()
    };

    let store = open_store(&dir);
    let found = store.find_by_identity(&record.identity).await.unwrap();

    assert_eq!(found.map(|r| r.id), Some(created.id));
}
