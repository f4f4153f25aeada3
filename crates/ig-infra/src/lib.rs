pub mod db;
pub mod memory;
pub mod time;

pub use db::conflict::SqliteConflictClassifier;
pub use db::repositories::DieselRecordStore;
pub use memory::{InMemoryRecordStore, MemoryConflictClassifier};
pub use time::SystemClock;
