//! Canonical text normalization for content fingerprints.

use serde::{Deserialize, Serialize};

/// Which punctuation characters are removed before fingerprinting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunctuationClass {
    /// Only literal `.` (the rule existing address hashes were computed with).
    Periods,
    /// Every ASCII punctuation character.
    #[default]
    Ascii,
}

impl PunctuationClass {
    fn strips(&self, c: char) -> bool {
        match self {
            PunctuationClass::Periods => c == '.',
            PunctuationClass::Ascii => c.is_ascii_punctuation(),
        }
    }
}

/// Concatenate `parts` in order and canonicalize the result.
///
/// `None` parts contribute nothing. Whitespace is removed, punctuation of
/// `punctuation` is removed, and the remainder is lower-cased.
pub fn normalize<'a, I>(parts: I, punctuation: PunctuationClass) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    parts
        .into_iter()
        .flatten()
        .flat_map(str::chars)
        .filter(|c| !c.is_whitespace() && !punctuation.strips(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_strips_whitespace_periods_and_case() {
        let raw = normalize(
            [Some("123 Main St."), None, Some("Springfield"), Some("62704"), Some("IL")],
            PunctuationClass::Periods,
        );
        assert_eq!(raw, "123mainstspringfield62704il");
    }

    #[test]
    fn test_periods_class_keeps_other_punctuation() {
        let raw = normalize([Some("Apt #4, B.")], PunctuationClass::Periods);
        assert_eq!(raw, "apt#4,b");
    }

    #[test]
    fn test_ascii_class_strips_all_ascii_punctuation() {
        let raw = normalize([Some("Apt #4, B.")], PunctuationClass::Ascii);
        assert_eq!(raw, "apt4b");
    }

    #[test]
    fn test_missing_parts_contribute_empty_string() {
        let with_none = normalize([Some("a"), None, Some("b")], PunctuationClass::Ascii);
        let with_empty = normalize([Some("a"), Some(""), Some("b")], PunctuationClass::Ascii);
        assert_eq!(with_none, "ab");
        assert_eq!(with_none, with_empty);
    }

    fn noise() -> impl Strategy<Value = String> {
        proptest::collection::vec(prop_oneof![Just(" "), Just("\t"), Just("."), Just(",")], 0..3)
            .prop_map(|v| v.concat())
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(s in "[ -~\t]{0,40}") {
            let once = normalize([Some(s.as_str())], PunctuationClass::Ascii);
            let twice = normalize([Some(once.as_str())], PunctuationClass::Ascii);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_noise_and_case_do_not_change_result(
            words in proptest::collection::vec("[A-Za-z0-9]{1,8}", 1..6),
            gaps in proptest::collection::vec(noise(), 6),
            upper in any::<bool>(),
        ) {
            let plain = words.concat();
            let noisy: String = words
                .iter()
                .zip(gaps.iter())
                .map(|(w, g)| format!("{g}{}", if upper { w.to_uppercase() } else { w.to_lowercase() }))
                .collect();
            prop_assert_eq!(
                normalize([Some(plain.as_str())], PunctuationClass::Ascii),
                normalize([Some(noisy.as_str())], PunctuationClass::Ascii)
            );
        }
    }
}
