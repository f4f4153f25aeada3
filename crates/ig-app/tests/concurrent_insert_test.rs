//! Concurrent insert-if-absent against real stores
//! 真实存储上的并发幂等插入测试

use std::collections::HashSet;
use std::sync::Arc;

use ig_app::{InsertIfAbsent, ListRecordsByOwner};
use ig_core::config::StorageConfig;
use ig_core::ids::{OwnerId, RecordId};
use ig_core::ports::{ConflictClassifierPort, IsolationLevel, RecordStorePort};
use ig_core::record::{CandidateRecord, InsertError, InsertOutcome};
use ig_infra::db::executor::DieselSqliteExecutor;
use ig_infra::db::pool::init_db_pool;
use ig_infra::{
    DieselRecordStore, InMemoryRecordStore, MemoryConflictClassifier, SqliteConflictClassifier,
    SystemClock,
};
use tempfile::TempDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct Harness {
    usecase: Arc<InsertIfAbsent>,
    store: Arc<dyn RecordStorePort>,
    // Keeps the database file alive for the duration of the test.
    _dir: Option<TempDir>,
}

fn sqlite_harness(busy_timeout_ms: u64) -> Harness {
    sqlite_harness_at(busy_timeout_ms, IsolationLevel::default())
}

fn sqlite_harness_at(busy_timeout_ms: u64, isolation: IsolationLevel) -> Harness {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let pool = init_db_pool(&StorageConfig {
        database_path: dir.path().join("records.db"),
        pool_size: 8,
        busy_timeout_ms,
    })
    .unwrap();
    let store: Arc<dyn RecordStorePort> = Arc::new(DieselRecordStore::new(
        DieselSqliteExecutor::new(pool),
        Arc::new(SystemClock),
    ));
    let classifier: Arc<dyn ConflictClassifierPort> = Arc::new(SqliteConflictClassifier);
    Harness {
        usecase: Arc::new(
            InsertIfAbsent::from_ports(store.clone(), classifier).with_isolation(isolation),
        ),
        store,
        _dir: Some(dir),
    }
}

fn memory_harness() -> Harness {
    init_tracing();
    let store: Arc<dyn RecordStorePort> = Arc::new(InMemoryRecordStore::new(Arc::new(SystemClock)));
    let classifier: Arc<dyn ConflictClassifierPort> = Arc::new(MemoryConflictClassifier);
    Harness {
        usecase: Arc::new(InsertIfAbsent::from_ports(store.clone(), classifier)),
        store,
        _dir: None,
    }
}

/// Runs `candidates` concurrently, one task each.
async fn submit_all(
    usecase: &Arc<InsertIfAbsent>,
    candidates: Vec<CandidateRecord>,
) -> Vec<Result<InsertOutcome, InsertError>> {
    let handles: Vec<_> = candidates
        .into_iter()
        .map(|candidate| {
            let usecase = usecase.clone();
            tokio::spawn(async move { usecase.execute(&candidate).await })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    results
}

/// Variants of one address differing only in case, spacing and punctuation.
fn address_variant(i: usize) -> CandidateRecord {
    let (line1, city) = match i % 4 {
        0 => ("123 Main St.", "Springfield"),
        1 => ("123 main st", "SPRINGFIELD"),
        2 => (" 123  MAIN  ST ", "spring field"),
        _ => ("123 Main St", "Spring.field"),
    };
    CandidateRecord::billing_address("user-42", line1, None, city, "62704", "IL")
}

fn assert_single_winner(results: Vec<Result<InsertOutcome, InsertError>>) -> RecordId {
    let outcomes: Vec<InsertOutcome> = results.into_iter().map(|r| r.unwrap()).collect();
    let created = outcomes.iter().filter(|o| o.was_created()).count();
    let ids: HashSet<RecordId> = outcomes.iter().map(|o| o.record().id.clone()).collect();

    assert_eq!(created, 1, "exactly one caller creates the record");
    assert_eq!(ids.len(), 1, "every caller sees the same record");
    ids.into_iter().next().unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_concurrent_submissions_yield_one_record_sqlite() {
    let h = sqlite_harness(5_000);
    let candidate = CandidateRecord::fund_option("user123", "2222");

    let results = submit_all(&h.usecase, vec![candidate.clone(), candidate]).await;

    assert_single_winner(results);
    assert_eq!(h.store.count().await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_submissions_yield_one_record_at_every_isolation_level() {
    for isolation in [
        IsolationLevel::Serializable,
        IsolationLevel::RepeatableRead,
        IsolationLevel::ReadCommitted,
    ] {
        for _round in 0..3 {
            let h = sqlite_harness_at(5_000, isolation);
            let candidate = CandidateRecord::fund_option("user123", "2222");

            let results = submit_all(&h.usecase, vec![candidate; 16]).await;

            assert_single_winner(results);
            assert_eq!(h.store.count().await.unwrap(), 1, "{isolation:?}");
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_normalized_variants_yield_one_record_sqlite() {
    let h = sqlite_harness(5_000);

    let results = submit_all(&h.usecase, (0..16).map(address_variant).collect()).await;

    let id = assert_single_winner(results);
    let listed = h.store.find_all_by_owner(&OwnerId::new("user-42")).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_normalized_variants_yield_one_record_memory() {
    let h = memory_harness();

    let results = submit_all(&h.usecase, (0..32).map(address_variant).collect()).await;

    assert_single_winner(results);
    assert_eq!(h.store.count().await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_distinct_identities_under_load_all_persist() {
    const WORKERS: usize = 20;
    const PER_WORKER: usize = 10;
    let h = sqlite_harness(5_000);

    let handles: Vec<_> = (0..WORKERS)
        .map(|worker| {
            let usecase = h.usecase.clone();
            tokio::spawn(async move {
                let mut created = 0usize;
                for i in 0..PER_WORKER {
                    let candidate = CandidateRecord::fund_option(
                        &format!("owner-{worker}"),
                        &format!("account-{i}"),
                    );
                    if usecase.execute(&candidate).await.unwrap().was_created() {
                        created += 1;
                    }
                }
                created
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        created += handle.await.unwrap();
    }

    assert_eq!(created, WORKERS * PER_WORKER);
    assert_eq!(h.store.count().await.unwrap(), (WORKERS * PER_WORKER) as u64);
}

#[tokio::test]
async fn test_sequential_resubmission_resolves_to_first_record() {
    for h in [sqlite_harness(5_000), memory_harness()] {
        let candidate = CandidateRecord::fund_option("user123", "2222");

        let first = h.usecase.execute(&candidate).await.unwrap();
        let second = h.usecase.execute(&candidate).await.unwrap();

        assert!(first.was_created());
        assert!(matches!(second, InsertOutcome::DuplicateResolved { attempts: 1, .. }));
        assert_eq!(first.record().id, second.record().id);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_fund_option_race_leaves_one_option_for_owner() {
    let h = sqlite_harness(5_000);
    let candidate = CandidateRecord::fund_option("user123", "2222");

    let results = submit_all(&h.usecase, vec![candidate.clone(), candidate]).await;
    assert!(results.iter().all(|r| r.is_ok()));

    let listed = ListRecordsByOwner::from_ports(h.store.clone())
        .execute(&OwnerId::new("user123"))
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].identity_fields[0].value(), Some("2222"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_busy_database_never_produces_a_second_record() {
    // Without a busy timeout SQLite reports contention immediately, so
    // callers may run out of retries, but never duplicate.
    let h = sqlite_harness(0);
    let candidate = CandidateRecord::fund_option("user123", "2222");

    let results = submit_all(&h.usecase, vec![candidate; 12]).await;

    let mut ids = HashSet::new();
    for result in results {
        match result {
            Ok(outcome) => {
                ids.insert(outcome.record().id.clone());
            }
            Err(InsertError::ExhaustedRetries { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert!(ids.len() <= 1);
    assert_eq!(h.store.count().await.unwrap(), 1);
}
