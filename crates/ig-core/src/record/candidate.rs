use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use crate::ids::{OwnerId, RecordKind};

/// One identity-bearing field, in the position it is fingerprinted at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityField {
    name: String,
    value: Option<String>,
    required: bool,
}

impl IdentityField {
    pub fn required(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            value: value.map(Into::into),
            required: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Absent or empty. Whitespace-only counts as present.
    pub fn is_blank(&self) -> bool {
        self.value.as_deref().map_or(true, str::is_empty)
    }
}

/// Caller-supplied record before persistence. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    kind: RecordKind,
    owner_id: OwnerId,
    identity: Vec<IdentityField>,
    payload: serde_json::Value,
}

impl CandidateRecord {
    pub fn builder(kind: RecordKind, owner_id: impl Into<OwnerId>) -> CandidateRecordBuilder {
        CandidateRecordBuilder {
            kind,
            owner_id: owner_id.into(),
            identity: Vec::new(),
            payload: serde_json::Value::Null,
        }
    }

    /// Address identity: line 1, line 2, city, postal code, state, in that order.
    pub fn billing_address(
        owner_id: &str,
        addr_line1: &str,
        addr_line2: Option<&str>,
        city: &str,
        postal_code: &str,
        state: &str,
    ) -> Self {
        Self::builder(RecordKind::billing_address(), owner_id)
            .identity("addr_line1", addr_line1)
            .optional_identity("addr_line2", addr_line2)
            .identity("city", city)
            .identity("postal_code", postal_code)
            .identity("state", state)
            .build()
    }

    /// Business-key identity: owner + client-supplied identifier.
    pub fn fund_option(owner_id: &str, identifier: &str) -> Self {
        Self::builder(RecordKind::fund_option(), owner_id)
            .identity("identifier", identifier)
            .build()
    }

    pub fn kind(&self) -> &RecordKind {
        &self.kind
    }

    pub fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }

    pub fn identity_fields(&self) -> &[IdentityField] {
        &self.identity
    }

    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }

    /// Required-field check. Runs before any store interaction.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.owner_id.is_blank() {
            return Err(ValidationError::MissingOwner {
                kind: self.kind.clone(),
            });
        }
        if let Some(field) = self
            .identity
            .iter()
            .find(|f| f.is_required() && f.is_blank())
        {
            return Err(ValidationError::MissingField {
                kind: self.kind.clone(),
                field: field.name().to_string(),
            });
        }
        Ok(())
    }
}

pub struct CandidateRecordBuilder {
    kind: RecordKind,
    owner_id: OwnerId,
    identity: Vec<IdentityField>,
    payload: serde_json::Value,
}

impl CandidateRecordBuilder {
    pub fn identity(mut self, name: &str, value: impl Into<String>) -> Self {
        self.identity.push(IdentityField::required(name, value));
        self
    }

    pub fn optional_identity(mut self, name: &str, value: Option<impl Into<String>>) -> Self {
        self.identity.push(IdentityField::optional(name, value));
        self
    }

    pub fn payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn build(self) -> CandidateRecord {
        CandidateRecord {
            kind: self.kind,
            owner_id: self.owner_id,
            identity: self.identity,
            payload: self.payload,
        }
    }
}
