//! # ig-core
//!
//! Core domain models and ports for insert-guard.
//!
//! This crate contains pure logic without any infrastructure dependencies:
//! fingerprinting, candidate/persisted record types, the retry policy and
//! the ports the insert coordinator talks to.

pub mod config;
pub mod identity;
pub mod ids;
pub mod ports;
pub mod record;
pub mod retry;

// Re-export commonly used types at the crate root
pub use config::GuardConfig;
pub use identity::{Fingerprint, IdentityCatalog, IdentityStrategy};
pub use ids::{OwnerId, RecordId, RecordKind};
pub use record::{CandidateRecord, InsertError, InsertOutcome, PersistedRecord, RecordIdentity};
pub use retry::RetryPolicy;
