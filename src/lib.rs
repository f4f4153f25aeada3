//! insert-guard: insert-or-detect-duplicate for concurrent writers.
//!
//! The workspace crates hold the domain (`ig-core`), the use cases
//! (`ig-app`) and the store adapters (`ig-infra`); this crate only
//! bootstraps them and hosts the `insert-probe` load harness.

pub mod bootstrap;
pub mod probe;

pub use ig_app::{InsertIfAbsent, ListRecordsByOwner};
pub use ig_core::{CandidateRecord, GuardConfig, InsertError, InsertOutcome};
