use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::errors::StoreError;
use crate::ids::OwnerId;
use crate::record::{NewRecord, PersistedRecord, RecordIdentity};

/// Requested transaction isolation for one insert attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationLevel {
    ReadCommitted,
    RepeatableRead,
    /// Prevents two concurrent transactions from both believing they are
    /// first to insert an identity.
    #[default]
    Serializable,
}

/// Per-attempt transaction options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TxOptions {
    pub isolation: IsolationLevel,
    /// Adapters must roll back instead of committing once this has passed.
    pub deadline: Option<Instant>,
}

impl TxOptions {
    pub fn expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Transactional record store with a uniqueness guarantee on
/// [`RecordIdentity`].
///
/// Every call runs in its own transaction; implementations must not share
/// a transaction between calls.
#[async_trait]
pub trait RecordStorePort: Send + Sync {
    /// Atomically insert `record`. Must fail with an error the paired
    /// classifier reports as `Duplicate` if the identity is already committed.
    async fn insert(&self, record: &NewRecord, options: &TxOptions)
        -> Result<PersistedRecord, StoreError>;

    async fn find_by_identity(
        &self,
        identity: &RecordIdentity,
    ) -> Result<Option<PersistedRecord>, StoreError>;

    async fn find_all_by_owner(&self, owner: &OwnerId) -> Result<Vec<PersistedRecord>, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}
