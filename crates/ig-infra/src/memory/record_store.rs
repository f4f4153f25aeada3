use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use thiserror::Error;

use ig_core::ids::{OwnerId, RecordId};
use ig_core::ports::{
    ClockPort, ConflictClass, ConflictClassifierPort, RecordStorePort, StoreError,
    StoreOperation, TxOptions,
};
use ig_core::record::{NewRecord, PersistedRecord, RecordIdentity};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MemoryStoreError {
    #[error("identity {0} already committed")]
    DuplicateIdentity(RecordIdentity),

    #[error("deadline passed before commit")]
    DeadlineExceeded,

    #[error("store lock poisoned")]
    Poisoned,
}

#[derive(Default)]
struct Records {
    by_identity: HashMap<RecordIdentity, PersistedRecord>,
    /// Commit order, for owner listings.
    order: Vec<RecordIdentity>,
}

/// Process-local [`RecordStorePort`].
///
/// The mutex is held only for the check-and-insert itself, which makes it
/// the commit point. Isolation levels are irrelevant here: every insert is
/// serializable.
pub struct InMemoryRecordStore {
    records: Mutex<Records>,
    clock: Arc<dyn ClockPort>,
}

impl InMemoryRecordStore {
    pub fn new(clock: Arc<dyn ClockPort>) -> Self {
        Self {
            records: Mutex::new(Records::default()),
            clock,
        }
    }

    fn lock(&self, op: StoreOperation) -> Result<MutexGuard<'_, Records>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::new(op, MemoryStoreError::Poisoned))
    }
}

#[async_trait]
impl RecordStorePort for InMemoryRecordStore {
    async fn insert(
        &self,
        record: &NewRecord,
        options: &TxOptions,
    ) -> Result<PersistedRecord, StoreError> {
        let mut records = self.lock(StoreOperation::Insert)?;

        if records.by_identity.contains_key(&record.identity) {
            return Err(StoreError::new(
                StoreOperation::Insert,
                MemoryStoreError::DuplicateIdentity(record.identity.clone()),
            ));
        }
        if options.expired() {
            return Err(StoreError::new(
                StoreOperation::Insert,
                MemoryStoreError::DeadlineExceeded,
            ));
        }

        let persisted = PersistedRecord::from_new(RecordId::new(), record, self.clock.now_ms());
        records
            .by_identity
            .insert(record.identity.clone(), persisted.clone());
        records.order.push(record.identity.clone());
        Ok(persisted)
    }

    async fn find_by_identity(
        &self,
        identity: &RecordIdentity,
    ) -> Result<Option<PersistedRecord>, StoreError> {
        let records = self.lock(StoreOperation::FindByIdentity)?;
        Ok(records.by_identity.get(identity).cloned())
    }

    async fn find_all_by_owner(&self, owner: &OwnerId) -> Result<Vec<PersistedRecord>, StoreError> {
        let records = self.lock(StoreOperation::FindAllByOwner)?;
        Ok(records
            .order
            .iter()
            .filter(|identity| &identity.owner_id == owner)
            .filter_map(|identity| records.by_identity.get(identity).cloned())
            .collect())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let records = self.lock(StoreOperation::Count)?;
        Ok(records.by_identity.len() as u64)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryConflictClassifier;

impl ConflictClassifierPort for MemoryConflictClassifier {
    fn classify(&self, error: &StoreError) -> ConflictClass {
        match error.downcast_ref::<MemoryStoreError>() {
            Some(MemoryStoreError::DuplicateIdentity(_)) => ConflictClass::Duplicate,
            Some(MemoryStoreError::DeadlineExceeded | MemoryStoreError::Poisoned) | None => {
                ConflictClass::Fatal
            }
        }
    }
}
