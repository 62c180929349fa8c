use std::fmt;

use serde::{Deserialize, Serialize};

/// A content domain. Each domain has its own storage root and a fixed file
/// extension, so identifiers from different domains never share a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Plain program text.
    Code,
    /// Structured wish/config JSON.
    Wish,
}

impl Domain {
    /// All domains, in a fixed order.
    pub const ALL: [Domain; 2] = [Domain::Code, Domain::Wish];

    /// File extension appended to stored entries of this domain.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Code => ".sml",
            Self::Wish => ".wish.json",
        }
    }

    /// Route segment used by the HTTP API (`/api/share/`, `/api/wishare/`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Code => "share",
            Self::Wish => "wishare",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_are_distinct() {
        assert_eq!(Domain::Code.extension(), ".sml");
        assert_eq!(Domain::Wish.extension(), ".wish.json");
        assert_ne!(Domain::Code.extension(), Domain::Wish.extension());
    }

    #[test]
    fn display_matches_route_segment() {
        assert_eq!(format!("{}", Domain::Code), "share");
        assert_eq!(format!("{}", Domain::Wish), "wishare");
    }

    #[test]
    fn serde_lowercase() {
        assert_eq!(serde_json::to_string(&Domain::Wish).unwrap(), "\"wish\"");
        let d: Domain = serde_json::from_str("\"code\"").unwrap();
        assert_eq!(d, Domain::Code);
    }
}
