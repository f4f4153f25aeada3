//! Typed inputs for the two record kinds the store knows out of the box.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::candidate::CandidateRecord;
use super::error::ValidationError;
use crate::ids::RecordKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressSource {
    UserApi,
    User,
    Wallet,
}

#[derive(Debug, Clone)]
pub struct BillingAddress {
    pub owner_id: String,
    pub addr_line1: String,
    pub addr_line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub state: String,
    pub address_id: Option<String>,
    pub source: AddressSource,
}

impl BillingAddress {
    /// Addresses entered by the user must carry the client `address_id`.
    pub fn into_candidate(self) -> Result<CandidateRecord, ValidationError> {
        let address_id = self.address_id.filter(|id| !id.is_empty());
        if self.source == AddressSource::User && address_id.is_none() {
            return Err(ValidationError::MissingField {
                kind: RecordKind::billing_address(),
                field: "address_id".to_string(),
            });
        }

        Ok(CandidateRecord::builder(RecordKind::billing_address(), self.owner_id)
            .identity("addr_line1", self.addr_line1)
            .optional_identity("addr_line2", self.addr_line2)
            .identity("city", self.city)
            .identity("postal_code", self.postal_code)
            .identity("state", self.state)
            .payload(json!({
                "address_id": address_id,
                "address_source": self.source,
            }))
            .build())
    }
}

#[derive(Debug, Clone)]
pub struct FundOption {
    pub owner_id: String,
    pub identifier: String,
    pub name: Option<String>,
    pub fund_type: String,
    pub bank_routing_number: Option<String>,
    pub bank_account_number: Option<String>,
}

impl FundOption {
    pub fn into_candidate(self) -> CandidateRecord {
        CandidateRecord::builder(RecordKind::fund_option(), self.owner_id)
            .identity("identifier", self.identifier)
            .payload(json!({
                "name": self.name,
                "type": self.fund_type,
                "details": {
                    "bank_routing_number": self.bank_routing_number,
                    "bank_account_number": self.bank_account_number,
                },
                "is_deleted": false,
                "is_disabled": false,
            }))
            .build()
    }
}
