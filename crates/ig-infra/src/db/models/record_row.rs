use crate::db::schema::t_record;
use diesel::prelude::*;

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = t_record)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RecordRow {
    pub id: String,
    pub record_kind: String,
    pub owner_id: String,
    pub identity_key: String,
    pub identity_fields: String,
    pub payload: String,
    pub created_at_ms: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = t_record)]
pub struct NewRecordRow {
    pub id: String,
    pub record_kind: String,
    pub owner_id: String,
    pub identity_key: String,
    pub identity_fields: String,
    pub payload: String,
    pub created_at_ms: i64,
}
