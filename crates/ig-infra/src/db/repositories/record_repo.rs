use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use tracing::debug;

use ig_core::ids::{OwnerId, RecordId};
use ig_core::ports::{
    ClockPort, IsolationLevel, RecordStorePort, StoreError, StoreOperation, TxOptions,
};
use ig_core::record::{NewRecord, PersistedRecord, RecordIdentity};

use crate::db::error::DbError;
use crate::db::executor::DieselSqliteExecutor;
use crate::db::mappers::RecordRowMapper;
use crate::db::models::RecordRow;
use crate::db::ports::{InsertMapper, RowMapper};
use crate::db::schema::t_record;

/// SQLite-backed [`RecordStorePort`].
///
/// Uniqueness comes from the `ux_record_identity` index; a losing insert
/// surfaces as a diesel `UniqueViolation` wrapped in [`DbError::Query`].
pub struct DieselRecordStore {
    executor: DieselSqliteExecutor,
    mapper: RecordRowMapper,
    clock: Arc<dyn ClockPort>,
}

impl DieselRecordStore {
    pub fn new(executor: DieselSqliteExecutor, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            executor,
            mapper: RecordRowMapper,
            clock,
        }
    }

    fn to_domain_all(&self, rows: &[RecordRow]) -> Result<Vec<PersistedRecord>, DbError> {
        rows.iter().map(|row| self.mapper.to_domain(row)).collect()
    }
}

#[async_trait]
impl RecordStorePort for DieselRecordStore {
    async fn insert(
        &self,
        record: &NewRecord,
        options: &TxOptions,
    ) -> Result<PersistedRecord, StoreError> {
        let persisted = PersistedRecord::from_new(RecordId::new(), record, self.clock.now_ms());
        let row = self
            .mapper
            .to_row(&persisted)
            .map_err(|e| StoreError::new(StoreOperation::Insert, e))?;
        let options = *options;

        self.executor
            .run(move |conn| {
                let write = |conn: &mut SqliteConnection| -> Result<(), DbError> {
                    diesel::insert_into(t_record::table)
                        .values(&row)
                        .execute(conn)?;
                    // Late commits must never become visible.
                    if options.expired() {
                        return Err(DbError::DeadlineExceeded);
                    }
                    Ok(())
                };

                match options.isolation {
                    // BEGIN IMMEDIATE takes the write lock up front, so two
                    // writers never both run the unique check on one snapshot.
                    IsolationLevel::Serializable => conn.immediate_transaction(write),
                    IsolationLevel::ReadCommitted | IsolationLevel::RepeatableRead => {
                        conn.transaction(write)
                    }
                }
            })
            .await
            .map_err(|e| StoreError::new(StoreOperation::Insert, e))?;

        debug!(record_id = %persisted.id, identity = %persisted.identity, "record committed");
        Ok(persisted)
    }

    async fn find_by_identity(
        &self,
        identity: &RecordIdentity,
    ) -> Result<Option<PersistedRecord>, StoreError> {
        let kind = identity.kind.to_string();
        let owner = identity.owner_id.to_string();
        let key = identity.fingerprint.to_string();

        let row = self
            .executor
            .run(move |conn| {
                let row: Option<RecordRow> = t_record::table
                    .filter(t_record::record_kind.eq(&kind))
                    .filter(t_record::owner_id.eq(&owner))
                    .filter(t_record::identity_key.eq(&key))
                    .select(RecordRow::as_select())
                    .first(conn)
                    .optional()?;
                Ok(row)
            })
            .await
            .map_err(|e| StoreError::new(StoreOperation::FindByIdentity, e))?;

        row.map(|r| self.mapper.to_domain(&r))
            .transpose()
            .map_err(|e| StoreError::new(StoreOperation::FindByIdentity, e))
    }

    async fn find_all_by_owner(&self, owner: &OwnerId) -> Result<Vec<PersistedRecord>, StoreError> {
        let owner = owner.to_string();

        let rows = self
            .executor
            .run(move |conn| {
                let rows: Vec<RecordRow> = t_record::table
                    .filter(t_record::owner_id.eq(&owner))
                    .order((t_record::created_at_ms.asc(), t_record::id.asc()))
                    .select(RecordRow::as_select())
                    .load(conn)?;
                Ok(rows)
            })
            .await
            .map_err(|e| StoreError::new(StoreOperation::FindAllByOwner, e))?;

        self.to_domain_all(&rows)
            .map_err(|e| StoreError::new(StoreOperation::FindAllByOwner, e))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let total = self
            .executor
            .run(|conn| {
                let total: i64 = t_record::table.count().get_result(conn)?;
                u64::try_from(total).map_err(|e| DbError::Mapping(e.to_string()))
            })
            .await
            .map_err(|e| StoreError::new(StoreOperation::Count, e))?;
        Ok(total)
    }
}
