//! # Configuration DTO / 配置数据
//!
//! Pure data mapped from TOML. Missing sections and keys fall back to the
//! defaults below; no other policy lives here.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::identity::IdentityCatalog;
use crate::ports::IsolationLevel;
use crate::retry::RetryPolicy;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    pub storage: StorageConfig,
    pub insert: InsertConfig,
    pub retry: RetryPolicy,
    /// Overrides merged on top of the built-in identity catalog.
    pub identity: IdentityCatalog,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file.
    pub database_path: PathBuf,
    pub pool_size: u32,
    /// How long a connection waits on a locked database before SQLite
    /// reports it busy.
    pub busy_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("insert-guard.db"),
            pool_size: 8,
            busy_timeout_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InsertConfig {
    pub isolation: IsolationLevel,
    /// Overall deadline across all attempts of one call. `None` waits for
    /// the retry policy to finish.
    pub deadline_ms: Option<u64>,
}

impl InsertConfig {
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}

impl GuardConfig {
    /// Map a parsed TOML document onto the DTO.
    pub fn from_toml(value: toml::Value) -> Result<Self, toml::de::Error> {
        value.try_into()
    }

    /// Built-in catalog with the configured overrides applied.
    pub fn identity_catalog(&self) -> IdentityCatalog {
        IdentityCatalog::default().merged(self.identity.clone())
    }
}
