//! ID type wrappers for type safety.

mod id_macro;
mod record;

pub use record::{OwnerId, RecordId, RecordKind};
