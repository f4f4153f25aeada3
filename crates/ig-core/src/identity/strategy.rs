//! Identity strategies / 身份策略
//!
//! Two ways of turning identity-bearing fields into a [`Fingerprint`]:
//!
//! ```text
//! ContentHash:  fields -> concat -> strip ws / punctuation -> lowercase -> [sha256 -> hex]
//! CompoundKey:  owner \x1f field_1 \x1f ... field_n          (exact, no normalization)
//! ```
//!
//! Address identity uses the content hash; business-key identity (owner +
//! client identifier) uses the compound key.

use serde::{Deserialize, Serialize};

use super::fingerprint::Fingerprint;
use super::normalize::{normalize, PunctuationClass};
use crate::ids::OwnerId;
use crate::record::{CandidateRecord, IdentityField, ValidationError};

/// Separator between compound key parts. Cannot appear in normal text input.
pub const COMPOUND_KEY_SEPARATOR: char = '\u{1f}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerprintMode {
    /// SHA-256 hex digest of the normalized string.
    #[default]
    Hashed,
    /// The normalized string itself.
    Normalized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum IdentityStrategy {
    ContentHash {
        #[serde(default)]
        mode: FingerprintMode,
        #[serde(default)]
        punctuation: PunctuationClass,
    },
    CompoundKey,
}

impl Default for IdentityStrategy {
    fn default() -> Self {
        IdentityStrategy::ContentHash {
            mode: FingerprintMode::default(),
            punctuation: PunctuationClass::default(),
        }
    }
}

impl IdentityStrategy {
    /// Compute the fingerprint for `fields`. Never fails.
    pub fn fingerprint(&self, owner: &OwnerId, fields: &[IdentityField]) -> Fingerprint {
        match self {
            IdentityStrategy::ContentHash { mode, punctuation } => {
                let normalized = normalize(fields.iter().map(IdentityField::value), *punctuation);
                match mode {
                    FingerprintMode::Hashed => Fingerprint::sha256_of(&normalized),
                    FingerprintMode::Normalized => Fingerprint::from_stored(normalized),
                }
            }
            IdentityStrategy::CompoundKey => {
                let mut key = String::from(owner.as_str());
                for field in fields {
                    key.push(COMPOUND_KEY_SEPARATOR);
                    key.push_str(field.value().unwrap_or(""));
                }
                Fingerprint::from_stored(key)
            }
        }
    }

    pub fn fingerprint_of(&self, candidate: &CandidateRecord) -> Fingerprint {
        self.fingerprint(candidate.owner_id(), candidate.identity_fields())
    }

    /// Whether two candidates denote the same logical record.
    pub fn matches(&self, a: &CandidateRecord, b: &CandidateRecord) -> bool {
        a.kind() == b.kind() && self.fingerprint_of(a) == self.fingerprint_of(b)
    }

    /// Field validation that must pass before any store interaction.
    ///
    /// Compound keys treat every identity field as required: an absent
    /// client identifier would collapse distinct records onto one key.
    pub fn validate(&self, candidate: &CandidateRecord) -> Result<(), ValidationError> {
        candidate.validate()?;
        if let IdentityStrategy::CompoundKey = self {
            if candidate.identity_fields().is_empty() {
                return Err(ValidationError::NoIdentityFields {
                    kind: candidate.kind().clone(),
                });
            }
            if let Some(field) = candidate.identity_fields().iter().find(|f| f.is_blank()) {
                return Err(ValidationError::MissingField {
                    kind: candidate.kind().clone(),
                    field: field.name().to_string(),
                });
            }
        }
        Ok(())
    }
}
