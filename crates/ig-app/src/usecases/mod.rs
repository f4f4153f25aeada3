//! Business logic use cases
//!
//! InsertIfAbsent      → insert a candidate or resolve to the committed peer
//! ListRecordsByOwner  → read back what an owner has

pub mod insert_if_absent;
pub mod list_records_by_owner;

pub use insert_if_absent::InsertIfAbsent;
pub use list_records_by_owner::ListRecordsByOwner;
