mod attempt;
mod candidate;
mod error;
pub mod kinds;
mod persisted;

pub use attempt::{AttemptOutcome, InsertOutcome};
pub use candidate::{CandidateRecord, CandidateRecordBuilder, IdentityField};
pub use error::{InsertError, ValidationError};
pub use kinds::{AddressSource, BillingAddress, FundOption};
pub use persisted::{NewRecord, PersistedRecord, RecordIdentity};
