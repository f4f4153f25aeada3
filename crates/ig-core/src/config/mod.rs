pub mod guard_config;

pub use guard_config::{GuardConfig, InsertConfig, StorageConfig};
