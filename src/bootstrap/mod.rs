pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::load_config;
pub use wiring::{wire_memory, wire_sqlite, GuardDeps, WiringError};
