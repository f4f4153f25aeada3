//! Idempotent insert coordination / 幂等插入协调
//!
//! ```text
//! validate ──> fingerprint ──> attempt (own transaction) ──┬─ ok ─────────> Created
//!                                 ^                         ├─ duplicate ──> lookup ──> DuplicateResolved
//!                                 │                         ├─ transient ──> backoff ─┐
//!                                 └─────────────────────────┼──────────────────────────┘
//!                                                           └─ fatal ──────> InsertError::Store
//! ```
//!
//! Mutual exclusion is entirely the store's job: the coordinator keeps no
//! shared state and takes no locks. Among concurrent callers with the same
//! identity the store's transaction manager picks the single winner.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use ig_core::config::GuardConfig;
use ig_core::identity::IdentityCatalog;
use ig_core::ports::{
    ConflictClass, ConflictClassifierPort, IsolationLevel, RecordStorePort, TxOptions,
};
use ig_core::record::{AttemptOutcome, CandidateRecord, InsertError, InsertOutcome, NewRecord};
use ig_core::retry::RetryPolicy;

pub struct InsertIfAbsent {
    store: Arc<dyn RecordStorePort>,
    classifier: Arc<dyn ConflictClassifierPort>,
    catalog: IdentityCatalog,
    retry: RetryPolicy,
    isolation: IsolationLevel,
    deadline: Option<Duration>,
}

impl InsertIfAbsent {
    /// Built-in identity catalog, default retry policy, serializable
    /// isolation, no deadline.
    pub fn from_ports(
        store: Arc<dyn RecordStorePort>,
        classifier: Arc<dyn ConflictClassifierPort>,
    ) -> Self {
        Self {
            store,
            classifier,
            catalog: IdentityCatalog::default(),
            retry: RetryPolicy::default(),
            isolation: IsolationLevel::default(),
            deadline: None,
        }
    }

    pub fn from_config(
        store: Arc<dyn RecordStorePort>,
        classifier: Arc<dyn ConflictClassifierPort>,
        config: &GuardConfig,
    ) -> Self {
        Self::from_ports(store, classifier)
            .with_catalog(config.identity_catalog())
            .with_retry_policy(config.retry.clone())
            .with_isolation(config.insert.isolation)
            .with_deadline(config.insert.deadline())
    }

    pub fn with_catalog(mut self, catalog: IdentityCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_isolation(mut self, isolation: IsolationLevel) -> Self {
        self.isolation = isolation;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Insert `candidate` unless a record with the same identity exists.
    ///
    /// Returns the winning record either way. Uses the configured deadline.
    pub async fn execute(&self, candidate: &CandidateRecord) -> Result<InsertOutcome, InsertError> {
        self.execute_with_deadline(candidate, self.deadline).await
    }

    /// Same as [`Self::execute`] with an explicit overall deadline across all
    /// attempts.
    ///
    /// On expiry the outstanding attempt is dropped and
    /// [`InsertError::Timeout`] is returned; the deadline is also handed to
    /// the store so an attempt that reaches commit late rolls back.
    #[tracing::instrument(
        name = "usecase.insert_if_absent.execute",
        skip(self, candidate),
        fields(kind = %candidate.kind(), owner_id = %candidate.owner_id())
    )]
    pub async fn execute_with_deadline(
        &self,
        candidate: &CandidateRecord,
        deadline: Option<Duration>,
    ) -> Result<InsertOutcome, InsertError> {
        let strategy = self.catalog.strategy_for(candidate.kind())?;
        if let Err(e) = strategy.validate(candidate) {
            warn!(error = %e, "Rejected candidate record");
            return Err(e.into());
        }

        let record = NewRecord::new(candidate, strategy.fingerprint_of(candidate));
        // A deadline too far out to represent as an instant means no deadline.
        let (deadline_at, tx_deadline) = match deadline.map(|d| {
            (
                Instant::now().checked_add(d),
                std::time::Instant::now().checked_add(d),
            )
        }) {
            Some((Some(at), Some(tx_at))) => (Some(at), Some(tx_at)),
            _ => (None, None),
        };
        let options = TxOptions {
            isolation: self.isolation,
            deadline: tx_deadline,
        };
        let timeout = |attempts: u32| InsertError::Timeout {
            attempts,
            deadline: deadline.unwrap_or_default(),
        };

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let outcome = within(deadline_at, self.attempt(&record, &options))
                .await
                .ok_or_else(|| timeout(attempt))?;

            match outcome {
                AttemptOutcome::Created(created) => {
                    info!(
                        record_id = %created.id,
                        fingerprint = %created.identity.fingerprint,
                        attempt,
                        "Created record"
                    );
                    return Ok(InsertOutcome::Created {
                        record: created,
                        attempts: attempt,
                    });
                }
                AttemptOutcome::AlreadyExists(existing) => {
                    info!(
                        record_id = %existing.id,
                        fingerprint = %existing.identity.fingerprint,
                        attempt,
                        "Resolved duplicate to existing record"
                    );
                    return Ok(InsertOutcome::DuplicateResolved {
                        record: existing,
                        attempts: attempt,
                    });
                }
                AttemptOutcome::Fatal(cause) => {
                    error!(error = %cause, attempt, "Insert failed");
                    return Err(InsertError::Store {
                        attempts: attempt,
                        source: cause,
                    });
                }
                AttemptOutcome::TransientConflict(cause) => {
                    if !self.retry.should_retry(attempt) {
                        warn!(error = %cause, attempt, "Retries exhausted on transient conflicts");
                        return Err(InsertError::ExhaustedRetries {
                            attempts: attempt,
                            last: cause,
                        });
                    }
                    let delay = self.retry.next_delay(attempt);
                    debug!(error = %cause, attempt, delay_ms = delay.as_millis() as u64, "Transient conflict, retrying");
                    within(deadline_at, tokio::time::sleep(delay))
                        .await
                        .ok_or_else(|| timeout(attempt))?;
                }
            }
        }
    }

    /// One transactional attempt plus classification of its failure.
    async fn attempt(&self, record: &NewRecord, options: &TxOptions) -> AttemptOutcome {
        let cause = match self.store.insert(record, options).await {
            Ok(created) => return AttemptOutcome::Created(created),
            Err(e) => e,
        };

        match self.classifier.classify(&cause) {
            ConflictClass::Transient => AttemptOutcome::TransientConflict(cause),
            ConflictClass::Fatal => AttemptOutcome::Fatal(cause),
            ConflictClass::Duplicate => {
                match self.store.find_by_identity(&record.identity).await {
                    Ok(Some(existing)) => AttemptOutcome::AlreadyExists(existing),
                    // The conflicting row is gone again; the insert may now win.
                    Ok(None) => {
                        debug!(identity = %record.identity, "Conflicting record not visible, retrying");
                        AttemptOutcome::TransientConflict(cause)
                    }
                    Err(lookup) => match self.classifier.classify(&lookup) {
                        ConflictClass::Transient => AttemptOutcome::TransientConflict(lookup),
                        _ => AttemptOutcome::Fatal(lookup),
                    },
                }
            }
        }
    }
}

/// `None` when `deadline` passes before `fut` completes.
async fn within<F: Future>(deadline: Option<Instant>, fut: F) -> Option<F::Output> {
    match deadline {
        Some(at) => tokio::time::timeout_at(at, fut).await.ok(),
        None => Some(fut.await),
    }
}
