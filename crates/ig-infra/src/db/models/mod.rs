pub mod record_row;

pub use record_row::{NewRecordRow, RecordRow};
