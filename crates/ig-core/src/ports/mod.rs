//! Port interfaces for the application layer
//!
//! Ports define the contract between the insert coordinator and the
//! infrastructure that backs it. The coordinator only ever sees these
//! traits; every store-specific decision lives behind them.

mod clock;
mod conflict_classifier;
mod errors;
mod record_store;

pub use clock::ClockPort;
pub use conflict_classifier::{ConflictClass, ConflictClassifierPort};
pub use errors::{StoreError, StoreOperation};
pub use record_store::{IsolationLevel, RecordStorePort, TxOptions};
