use super::errors::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictClass {
    /// Uniqueness/identity conflict: a peer already committed this identity.
    Duplicate,
    /// Serialization abort, write-write conflict, lock wait timeout.
    Transient,
    /// Everything else. Never retried.
    Fatal,
}

/// Store-specific interpretation of store-native error signals.
pub trait ConflictClassifierPort: Send + Sync {
    fn classify(&self, error: &StoreError) -> ConflictClass;
}
