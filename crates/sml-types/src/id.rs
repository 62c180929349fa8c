use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::TypeError;

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Returns `true` if `c` belongs to the identifier alphabet `[A-Za-z0-9_]`.
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Returns `true` if `candidate` is a well-formed share identifier: one or
/// more characters from `[A-Za-z0-9_]`.
///
/// Anything else, including the empty string, path separators, dots, and
/// whitespace, is rejected.
pub fn is_valid_identifier(candidate: &str) -> bool {
    !candidate.is_empty() && candidate.chars().all(is_word_char)
}

/// Retrieval key for a shared payload.
///
/// Server-computed identifiers are the lowercase hex SHA-256 digest of the
/// payload bytes (see [`ShareId::from_digest`]). Client-supplied keys go
/// through [`ShareId::parse`], which only admits the identifier alphabet, so
/// a `ShareId` can always be appended to a directory path without escaping it.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ShareId(String);

impl ShareId {
    /// Build the canonical identifier for a 32-byte digest.
    pub fn from_digest(digest: [u8; 32]) -> Self {
        Self(hex::encode(digest))
    }

    /// Validate a client-supplied identifier.
    pub fn parse(candidate: &str) -> Result<Self, TypeError> {
        if is_valid_identifier(candidate) {
            Ok(Self(candidate.to_owned()))
        } else {
            Err(TypeError::InvalidIdentifier(candidate.to_owned()))
        }
    }

    /// Returns `true` if this identifier has the canonical digest form
    /// (64 lowercase hex characters).
    pub fn is_digest(&self) -> bool {
        self.0.len() == DIGEST_HEX_LEN
            && self.0.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    /// Decode the digest bytes, if this identifier has digest form.
    pub fn to_digest(&self) -> Result<[u8; 32], TypeError> {
        if !self.is_digest() {
            return Err(TypeError::InvalidLength {
                expected: DIGEST_HEX_LEN,
                actual: self.0.len(),
            });
        }
        let mut out = [0u8; 32];
        hex::decode_to_slice(&self.0, &mut out)
            .map_err(|_| TypeError::InvalidIdentifier(self.0.clone()))?;
        Ok(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short representation (first 8 characters) for log lines.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(8)]
    }
}

impl fmt::Debug for ShareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShareId({})", self.short())
    }
}

impl fmt::Display for ShareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ShareId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ShareId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for ShareId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_word_characters() {
        assert!(is_valid_identifier("abc123"));
        assert!(is_valid_identifier("ABC_def_9"));
        assert!(ShareId::parse("abc123").is_ok());
    }

    #[test]
    fn rejects_traversal_and_junk() {
        for bad in ["", "a b", "../../etc/passwd", "a/b", "a.sml", "/abs", "a\0b", "ü"] {
            assert!(!is_valid_identifier(bad), "{bad:?} should be rejected");
            assert_eq!(
                ShareId::parse(bad),
                Err(TypeError::InvalidIdentifier(bad.to_owned()))
            );
        }
    }

    #[test]
    fn from_digest_is_lowercase_hex() {
        let id = ShareId::from_digest([0xab; 32]);
        assert_eq!(id.as_str().len(), DIGEST_HEX_LEN);
        assert_eq!(id.as_str(), "ab".repeat(32));
        assert!(id.is_digest());
    }

    #[test]
    fn digest_roundtrip() {
        let digest = [7u8; 32];
        let id = ShareId::from_digest(digest);
        assert_eq!(id.to_digest().unwrap(), digest);
    }

    #[test]
    fn short_identifier_is_not_digest() {
        let id = ShareId::parse("abc123").unwrap();
        assert!(!id.is_digest());
        assert_eq!(
            id.to_digest(),
            Err(TypeError::InvalidLength { expected: 64, actual: 6 })
        );
    }

    #[test]
    fn uppercase_hex_is_valid_but_not_canonical() {
        let id = ShareId::parse(&"AB".repeat(32)).unwrap();
        assert!(!id.is_digest());
    }

    #[test]
    fn short_is_prefix() {
        let id = ShareId::from_digest([0x12; 32]);
        assert_eq!(id.short(), "12121212");
        assert_eq!(ShareId::parse("ab").unwrap().short(), "ab");
    }

    #[test]
    fn serde_rejects_invalid() {
        let id: ShareId = serde_json::from_str("\"abc_1\"").unwrap();
        assert_eq!(id.as_str(), "abc_1");
        assert!(serde_json::from_str::<ShareId>("\"../x\"").is_err());
    }

    proptest! {
        #[test]
        fn any_digest_parses_back(bytes in any::<[u8; 32]>()) {
            let id = ShareId::from_digest(bytes);
            prop_assert!(id.is_digest());
            prop_assert_eq!(ShareId::parse(id.as_str()).unwrap(), id);
        }

        #[test]
        fn strings_with_separators_are_rejected(prefix in "[a-z0-9]{0,8}", sep in "[/.\\\\ %-]", suffix in "[a-z0-9]{0,8}") {
            let candidate = format!("{prefix}{sep}{suffix}");
            prop_assert!(!is_valid_identifier(&candidate));
        }
    }
}
