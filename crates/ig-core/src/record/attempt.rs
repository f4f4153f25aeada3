use super::persisted::PersistedRecord;
use crate::ports::StoreError;

/// Result of a single transactional insert attempt.
#[derive(Debug)]
pub enum AttemptOutcome {
    Created(PersistedRecord),
    AlreadyExists(PersistedRecord),
    TransientConflict(StoreError),
    Fatal(StoreError),
}

/// Success value of `insert if absent`.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    /// This call committed the record.
    Created { record: PersistedRecord, attempts: u32 },
    /// A peer committed first; this is the record it created.
    DuplicateResolved { record: PersistedRecord, attempts: u32 },
}

impl InsertOutcome {
    pub fn record(&self) -> &PersistedRecord {
        match self {
            InsertOutcome::Created { record, .. } | InsertOutcome::DuplicateResolved { record, .. } => {
                record
            }
        }
    }

    pub fn into_record(self) -> PersistedRecord {
        match self {
            InsertOutcome::Created { record, .. } | InsertOutcome::DuplicateResolved { record, .. } => {
                record
            }
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            InsertOutcome::Created { attempts, .. }
            | InsertOutcome::DuplicateResolved { attempts, .. } => *attempts,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, InsertOutcome::Created { .. })
    }
}
