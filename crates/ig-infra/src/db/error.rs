use thiserror::Error;

/// Store-native failure of the SQLite adapter.
///
/// Wrapped unchanged into `StoreError` so that
/// [`SqliteConflictClassifier`](super::conflict::SqliteConflictClassifier)
/// can read the diesel error kind back out.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error(transparent)]
    Query(#[from] diesel::result::Error),

    #[error("row mapping error: {0}")]
    Mapping(String),

    #[error("deadline passed before commit, transaction rolled back")]
    DeadlineExceeded,

    #[error("blocking database task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<serde_json::Error> for DbError {
    fn from(e: serde_json::Error) -> Self {
        DbError::Mapping(e.to_string())
    }
}
