//! # Dependency Injection / 依赖注入模块
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Create the store adapter named by the configuration / 创建存储适配器
//! - ✅ Pair each store with its conflict classifier / 为存储配对冲突分类器
//! - ✅ Inject everything into the use cases / 将依赖注入用例
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No business logic / 禁止包含任何业务逻辑**
//!
//! > **This is the only place allowed to depend on ig-infra and ig-app simultaneously.**
//! > **这是唯一允许同时依赖 ig-infra 和 ig-app 的地方。**

use std::sync::Arc;

use ig_app::{InsertIfAbsent, ListRecordsByOwner};
use ig_core::config::{GuardConfig, StorageConfig};
use ig_core::ports::{ClockPort, ConflictClassifierPort, RecordStorePort};
use ig_infra::db::executor::DieselSqliteExecutor;
use ig_infra::db::pool::{init_db_pool, DbPool};
use ig_infra::{
    DieselRecordStore, InMemoryRecordStore, MemoryConflictClassifier, SqliteConflictClassifier,
    SystemClock,
};
use tracing::info;

/// Result type for wiring operations
pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
/// 依赖注入错误（基础设施初始化失败）
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Database initialization failed: {0}")]
    DatabaseInit(String),
}

/// Assembled use cases plus the store they share.
pub struct GuardDeps {
    pub insert_if_absent: Arc<InsertIfAbsent>,
    pub list_records_by_owner: Arc<ListRecordsByOwner>,
    pub store: Arc<dyn RecordStorePort>,
}

/// Create SQLite database connection pool
/// 创建 SQLite 数据库连接池
///
/// # Errors / 错误
///
/// Returns `WiringError::DatabaseInit` if:
/// - Parent directory creation fails / 父目录创建失败
/// - Database pool creation fails / 数据库池创建失败
/// - Migration fails / 迁移失败
fn create_db_pool(storage: &StorageConfig) -> WiringResult<DbPool> {
    // Ensure parent directory exists
    // 确保父目录存在
    if let Some(parent) = storage.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                WiringError::DatabaseInit(format!("Failed to create DB directory: {}", e))
            })?;
        }
    }

    init_db_pool(storage).map_err(|e| WiringError::DatabaseInit(format!("{e:#}")))
}

fn assemble(
    config: &GuardConfig,
    store: Arc<dyn RecordStorePort>,
    classifier: Arc<dyn ConflictClassifierPort>,
) -> GuardDeps {
    GuardDeps {
        insert_if_absent: Arc::new(InsertIfAbsent::from_config(
            store.clone(),
            classifier,
            config,
        )),
        list_records_by_owner: Arc::new(ListRecordsByOwner::from_ports(store.clone())),
        store,
    }
}

/// Wire the use cases against the SQLite store at `config.storage`
/// 基于 SQLite 存储装配用例
pub fn wire_sqlite(config: &GuardConfig) -> WiringResult<GuardDeps> {
    let pool = create_db_pool(&config.storage)?;
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);
    let store: Arc<dyn RecordStorePort> =
        Arc::new(DieselRecordStore::new(DieselSqliteExecutor::new(pool), clock));

    info!(
        database = %config.storage.database_path.display(),
        isolation = ?config.insert.isolation,
        "Wired SQLite record store"
    );
    Ok(assemble(config, store, Arc::new(SqliteConflictClassifier)))
}

/// Wire the use cases against a fresh process-local store
/// 基于内存存储装配用例
pub fn wire_memory(config: &GuardConfig) -> GuardDeps {
    let store: Arc<dyn RecordStorePort> = Arc::new(InMemoryRecordStore::new(Arc::new(SystemClock)));
    info!("Wired in-memory record store");
    assemble(config, store, Arc::new(MemoryConflictClassifier))
}
