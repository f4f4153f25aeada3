use serde::{Deserialize, Serialize};

use super::id_macro::{impl_id, impl_key};

/// Surrogate identifier assigned by the record store on first commit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(String);

/// Owner of a record, e.g. the user a fund option or address belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerId(String);

/// Logical record type, e.g. `fund_option` or `billing_address`.
///
/// Uniqueness is scoped per kind: the same fingerprint under two kinds
/// denotes two different records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordKind(String);

impl_id!(RecordId);
impl_key!(OwnerId, RecordKind);

impl RecordKind {
    pub const BILLING_ADDRESS: &'static str = "billing_address";
    pub const FUND_OPTION: &'static str = "fund_option";

    pub fn billing_address() -> Self {
        Self::new(Self::BILLING_ADDRESS)
    }

    pub fn fund_option() -> Self {
        Self::new(Self::FUND_OPTION)
    }
}
