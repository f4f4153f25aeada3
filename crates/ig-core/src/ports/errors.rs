use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Insert,
    FindByIdentity,
    FindAllByOwner,
    Count,
}

impl std::fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            StoreOperation::Insert => "insert",
            StoreOperation::FindByIdentity => "find_by_identity",
            StoreOperation::FindAllByOwner => "find_all_by_owner",
            StoreOperation::Count => "count",
        };
        write!(f, "{label}")
    }
}

/// Opaque store failure.
///
/// The store-native cause is kept intact so that a store-specific
/// [`ConflictClassifierPort`](super::ConflictClassifierPort) can inspect it;
/// the coordinator itself never looks inside.
#[derive(Debug, Error)]
#[error("store {operation} failed: {source}")]
pub struct StoreError {
    operation: StoreOperation,
    #[source]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

impl StoreError {
    pub fn new(
        operation: StoreOperation,
        source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            operation,
            source: source.into(),
        }
    }

    pub fn operation(&self) -> StoreOperation {
        self.operation
    }

    pub fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.source.as_ref()
    }

    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        self.source.downcast_ref::<T>()
    }
}
