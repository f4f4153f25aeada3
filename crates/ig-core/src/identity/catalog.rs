use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::normalize::PunctuationClass;
use super::strategy::{FingerprintMode, IdentityStrategy};
use crate::ids::RecordKind;
use crate::record::ValidationError;

/// Which identity strategy applies to which record kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityCatalog(BTreeMap<RecordKind, IdentityStrategy>);

impl Default for IdentityCatalog {
    /// Address identity is a content hash, fund options use the business key.
    fn default() -> Self {
        let mut map = BTreeMap::new();
        map.insert(
            RecordKind::billing_address(),
            IdentityStrategy::ContentHash {
                mode: FingerprintMode::Hashed,
                punctuation: PunctuationClass::Ascii,
            },
        );
        map.insert(RecordKind::fund_option(), IdentityStrategy::CompoundKey);
        Self(map)
    }
}

impl IdentityCatalog {
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with(mut self, kind: RecordKind, strategy: IdentityStrategy) -> Self {
        self.0.insert(kind, strategy);
        self
    }

    /// Entries from `overrides` replace the entry for the same kind.
    pub fn merged(mut self, overrides: IdentityCatalog) -> Self {
        self.0.extend(overrides.0);
        self
    }

    pub fn strategy_for(&self, kind: &RecordKind) -> Result<&IdentityStrategy, ValidationError> {
        self.0
            .get(kind)
            .ok_or_else(|| ValidationError::UnknownKind(kind.clone()))
    }

    pub fn kinds(&self) -> impl Iterator<Item = &RecordKind> {
        self.0.keys()
    }
}
