//! Load probe / 负载探测
//!
//! K workers each submit M candidates and the probe reports how many
//! records were created and how long it took. With `shared_identities`
//! every worker submits the same M identities, which turns the run into a
//! contention test: the store must still end up with exactly M records.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use ig_app::InsertIfAbsent;
use ig_core::ports::RecordStorePort;
use ig_core::record::CandidateRecord;

#[derive(Debug, Clone, Copy)]
pub struct ProbePlan {
    pub workers: usize,
    pub per_worker: usize,
    pub shared_identities: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub started_at: DateTime<Utc>,
    pub workers: usize,
    pub per_worker: usize,
    pub submitted: usize,
    pub created: usize,
    pub resolved_duplicates: usize,
    pub failed: usize,
    pub stored: u64,
    pub total_ms: u128,
    pub avg_ms: f64,
}

impl ProbePlan {
    fn candidate(&self, worker: usize, i: usize) -> CandidateRecord {
        let owner = if self.shared_identities {
            "probe-owner".to_string()
        } else {
            format!("probe-owner-{worker}")
        };
        CandidateRecord::fund_option(&owner, &format!("account-{i}"))
    }

    /// Records the store must hold after the run.
    pub fn expected_records(&self) -> usize {
        if self.shared_identities {
            self.per_worker
        } else {
            self.workers * self.per_worker
        }
    }
}

#[derive(Default)]
struct WorkerTally {
    created: usize,
    resolved: usize,
    failed: usize,
}

pub async fn run_probe(
    plan: ProbePlan,
    usecase: Arc<InsertIfAbsent>,
    store: Arc<dyn RecordStorePort>,
) -> anyhow::Result<ProbeReport> {
    let started_at = Utc::now();
    let start = Instant::now();

    let handles: Vec<_> = (0..plan.workers)
        .map(|worker| {
            let usecase = usecase.clone();
            tokio::spawn(async move {
                let mut tally = WorkerTally::default();
                for i in 0..plan.per_worker {
                    match usecase.execute(&plan.candidate(worker, i)).await {
                        Ok(outcome) if outcome.was_created() => tally.created += 1,
                        Ok(_) => tally.resolved += 1,
                        Err(e) => {
                            warn!(worker, i, error = %e, "Probe insert failed");
                            tally.failed += 1;
                        }
                    }
                }
                tally
            })
        })
        .collect();

    let mut total = WorkerTally::default();
    for handle in handles {
        let tally = handle.await?;
        total.created += tally.created;
        total.resolved += tally.resolved;
        total.failed += tally.failed;
    }

    let elapsed = start.elapsed();
    let submitted = plan.workers * plan.per_worker;
    let stored = store.count().await?;

    info!(
        created = total.created,
        stored,
        total_ms = elapsed.as_millis() as u64,
        "Probe finished"
    );

    Ok(ProbeReport {
        started_at,
        workers: plan.workers,
        per_worker: plan.per_worker,
        submitted,
        created: total.created,
        resolved_duplicates: total.resolved,
        failed: total.failed,
        stored,
        total_ms: elapsed.as_millis(),
        avg_ms: average_ms(elapsed, submitted),
    })
}

fn average_ms(elapsed: Duration, submitted: usize) -> f64 {
    if submitted == 0 {
        return 0.0;
    }
    elapsed.as_secs_f64() * 1000.0 / submitted as f64
}
