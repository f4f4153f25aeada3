use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use ig_core::ids::OwnerId;
use ig_core::ports::RecordStorePort;
use ig_core::record::PersistedRecord;

/// Use case for listing every record an owner has, oldest first.
pub struct ListRecordsByOwner {
    store: Arc<dyn RecordStorePort>,
}

impl ListRecordsByOwner {
    pub fn from_ports(store: Arc<dyn RecordStorePort>) -> Self {
        Self { store }
    }

    #[tracing::instrument(name = "usecase.list_records_by_owner.execute", skip(self), fields(owner_id = %owner))]
    pub async fn execute(&self, owner: &OwnerId) -> Result<Vec<PersistedRecord>> {
        let records = self
            .store
            .find_all_by_owner(owner)
            .await
            .with_context(|| format!("Failed to list records for owner {owner}"))?;
        debug!(count = records.len(), "Listed records");
        Ok(records)
    }
}
