//! Maps diesel/SQLite failures onto [`ConflictClass`].

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use ig_core::ports::{ConflictClass, ConflictClassifierPort, StoreError};

use super::error::DbError;

/// Message fragments SQLite uses for `SQLITE_BUSY` / `SQLITE_LOCKED`.
const BUSY_MARKERS: [&str; 2] = ["database is locked", "database table is locked"];

#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteConflictClassifier;

impl SqliteConflictClassifier {
    fn classify_diesel(error: &DieselError) -> ConflictClass {
        match error {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                ConflictClass::Duplicate
            }
            DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
                ConflictClass::Transient
            }
            DieselError::DatabaseError(_, info) if is_busy(info.message()) => {
                ConflictClass::Transient
            }
            DieselError::RollbackErrorOnCommit { commit_error, .. } => {
                Self::classify_diesel(commit_error)
            }
            _ => ConflictClass::Fatal,
        }
    }
}

fn is_busy(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    BUSY_MARKERS.iter().any(|marker| message.contains(marker))
}

impl ConflictClassifierPort for SqliteConflictClassifier {
    fn classify(&self, error: &StoreError) -> ConflictClass {
        match error.downcast_ref::<DbError>() {
            Some(DbError::Query(e)) => Self::classify_diesel(e),
            // Pool exhaustion, join failures, corrupt rows and deadline
            // rollbacks are not resolved by trying again.
            Some(_) | None => ConflictClass::Fatal,
        }
    }
}
