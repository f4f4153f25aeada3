use ig_core::identity::Fingerprint;
use ig_core::ids::{OwnerId, RecordId, RecordKind};
use ig_core::record::{IdentityField, PersistedRecord, RecordIdentity};

use crate::db::error::DbError;
use crate::db::models::{NewRecordRow, RecordRow};
use crate::db::ports::{InsertMapper, RowMapper};

pub struct RecordRowMapper;

impl InsertMapper<PersistedRecord, NewRecordRow> for RecordRowMapper {
    fn to_row(&self, domain: &PersistedRecord) -> Result<NewRecordRow, DbError> {
        Ok(NewRecordRow {
            id: domain.id.to_string(),
            record_kind: domain.identity.kind.to_string(),
            owner_id: domain.identity.owner_id.to_string(),
            identity_key: domain.identity.fingerprint.to_string(),
            identity_fields: serde_json::to_string(&domain.identity_fields)?,
            payload: serde_json::to_string(&domain.payload)?,
            created_at_ms: domain.created_at_ms,
        })
    }
}

impl RowMapper<RecordRow, PersistedRecord> for RecordRowMapper {
    fn to_domain(&self, row: &RecordRow) -> Result<PersistedRecord, DbError> {
        let identity_fields: Vec<IdentityField> = serde_json::from_str(&row.identity_fields)?;
        Ok(PersistedRecord {
            id: RecordId::from(row.id.clone()),
            identity: RecordIdentity {
                kind: RecordKind::from(row.record_kind.clone()),
                owner_id: OwnerId::from(row.owner_id.clone()),
                fingerprint: Fingerprint::from_stored(row.identity_key.clone()),
            },
            identity_fields,
            payload: serde_json::from_str(&row.payload)?,
            created_at_ms: row.created_at_ms,
        })
    }
}
