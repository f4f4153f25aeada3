use std::time::Duration;

use thiserror::Error;

use crate::ids::RecordKind;
use crate::ports::StoreError;

/// Candidate rejected before any store interaction. Never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{kind}: missing owner id")]
    MissingOwner { kind: RecordKind },

    #[error("{kind}: missing required field `{field}`")]
    MissingField { kind: RecordKind, field: String },

    #[error("{kind}: compound key needs at least one identity field")]
    NoIdentityFields { kind: RecordKind },

    #[error("unknown record kind `{0}`")]
    UnknownKind(RecordKind),
}

/// Failure of one `insert if absent` call.
///
/// A concurrent winner is not an error: see `InsertOutcome::DuplicateResolved`.
#[derive(Debug, Error)]
pub enum InsertError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("gave up after {attempts} attempts on transient conflicts: {last}")]
    ExhaustedRetries { attempts: u32, last: StoreError },

    #[error("store error on attempt {attempts}: {source}")]
    Store {
        attempts: u32,
        #[source]
        source: StoreError,
    },

    #[error("deadline of {deadline:?} exceeded after {attempts} attempts")]
    Timeout { attempts: u32, deadline: Duration },
}

impl InsertError {
    pub fn attempts(&self) -> u32 {
        match self {
            InsertError::Validation(_) => 0,
            InsertError::ExhaustedRetries { attempts, .. }
            | InsertError::Store { attempts, .. }
            | InsertError::Timeout { attempts, .. } => *attempts,
        }
    }
}
