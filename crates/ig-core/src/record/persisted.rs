use serde::{Deserialize, Serialize};

use super::candidate::{CandidateRecord, IdentityField};
use crate::identity::Fingerprint;
use crate::ids::{OwnerId, RecordId, RecordKind};

/// The unit of uniqueness enforced by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordIdentity {
    pub kind: RecordKind,
    pub owner_id: OwnerId,
    pub fingerprint: Fingerprint,
}

impl std::fmt::Display for RecordIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.kind, self.owner_id, self.fingerprint)
    }
}

/// A validated candidate paired with the fingerprint it will be stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub identity: RecordIdentity,
    pub identity_fields: Vec<IdentityField>,
    pub payload: serde_json::Value,
}

impl NewRecord {
    pub fn new(candidate: &CandidateRecord, fingerprint: Fingerprint) -> Self {
        Self {
            identity: RecordIdentity {
                kind: candidate.kind().clone(),
                owner_id: candidate.owner_id().clone(),
                fingerprint,
            },
            identity_fields: candidate.identity_fields().to_vec(),
            payload: candidate.payload().clone(),
        }
    }
}

/// A committed record. Identity fields never change after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub id: RecordId,
    pub identity: RecordIdentity,
    pub identity_fields: Vec<IdentityField>,
    pub payload: serde_json::Value,
    /// Set once by the store adapter at commit time.
    pub created_at_ms: i64,
}

impl PersistedRecord {
    pub fn from_new(id: RecordId, record: &NewRecord, created_at_ms: i64) -> Self {
        Self {
            id,
            identity: record.identity.clone(),
            identity_fields: record.identity_fields.clone(),
            payload: record.payload.clone(),
            created_at_ms,
        }
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.identity.fingerprint
    }
}
