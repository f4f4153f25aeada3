//! Fingerprint computation: canonical identity strings for deduplication.

mod catalog;
mod fingerprint;
mod normalize;
mod strategy;

pub use catalog::IdentityCatalog;
pub use fingerprint::Fingerprint;
pub use normalize::{normalize, PunctuationClass};
pub use strategy::{FingerprintMode, IdentityStrategy, COMPOUND_KEY_SEPARATOR};
