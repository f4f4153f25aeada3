//! insert-guard application layer
//!
//! This crate contains the use cases that orchestrate the core ports.

pub mod usecases;

pub use usecases::{InsertIfAbsent, ListRecordsByOwner};
