use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::TypeError;
use crate::id::is_word_char;

fn is_segment_char(c: char) -> bool {
    is_word_char(c) || c == '%'
}

fn is_separator(c: char) -> bool {
    matches!(c, '/' | '.' | '-')
}

/// Returns `true` if `candidate` is a well-formed catalog key.
///
/// A key starts with a character from `[A-Za-z0-9_]`. Every later `/`, `.` or
/// `-` must be followed by at least one character from `[A-Za-z0-9_%]`. This
/// admits `a/b/c.sml` and `basics/hello-world.sml` but rules out `..`, `/.`,
/// empty segments, absolute paths, and trailing separators.
pub fn is_valid_catalog_key(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(c) if is_word_char(c) => {}
        _ => return false,
    }
    let mut pending_separator = false;
    for c in chars {
        if is_segment_char(c) {
            pending_separator = false;
        } else if is_separator(c) && !pending_separator {
            pending_separator = true;
        } else {
            return false;
        }
    }
    !pending_separator
}

/// A validated relative path into a read-only example tree.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CatalogKey(String);

impl CatalogKey {
    /// Validate a client-supplied catalog key.
    pub fn parse(candidate: &str) -> Result<Self, TypeError> {
        if is_valid_catalog_key(candidate) {
            Ok(Self(candidate.to_owned()))
        } else {
            Err(TypeError::InvalidCatalogKey(candidate.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `/`-separated segments of this key.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Join this key under `root`, appending `suffix` to the last segment.
    ///
    /// Segments are pushed one at a time so the result is built from
    /// [`std::path::Component::Normal`] parts only.
    pub fn to_path(&self, root: &Path, suffix: &str) -> PathBuf {
        let mut path = root.to_path_buf();
        let mut segments = self.segments().peekable();
        while let Some(segment) = segments.next() {
            if segments.peek().is_some() {
                path.push(segment);
            } else {
                path.push(format!("{segment}{suffix}"));
            }
        }
        path
    }
}

impl fmt::Debug for CatalogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CatalogKey({})", self.0)
    }
}

impl fmt::Display for CatalogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_nested_paths() {
        for good in [
            "abc123",
            "a1/b2/c3",
            "intro/hello.sml",
            "x_y/z%20w.sml",
            "a.b.c",
            "basics/hello-world.sml",
            "type-inference/let-poly.sml",
        ] {
            assert!(is_valid_catalog_key(good), "{good:?} should be accepted");
        }
    }

    #[test]
    fn rejects_traversal() {
        for bad in [
            "",
            "../../etc/passwd",
            "a/../b",
            "a/./b",
            "a/.hidden",
            "/etc/passwd",
            "a//b",
            "a/",
            "a.",
            "a..b",
            "a b",
            "a\\b",
            "%2e",
            ".profile",
            "-rf",
            "a-",
            "a--b",
            "a/-b",
            "a-/b",
            "a-.sml",
        ] {
            assert!(!is_valid_catalog_key(bad), "{bad:?} should be rejected");
            assert!(CatalogKey::parse(bad).is_err());
        }
    }

    #[test]
    fn segments_split_on_slash() {
        let key = CatalogKey::parse("a1/b2/c3").unwrap();
        assert_eq!(key.segments().collect::<Vec<_>>(), vec!["a1", "b2", "c3"]);
    }

    #[test]
    fn to_path_appends_suffix_to_last_segment() {
        let key = CatalogKey::parse("lists/map").unwrap();
        let path = key.to_path(Path::new("/srv/wishes"), ".wish.json");
        assert_eq!(path, PathBuf::from("/srv/wishes/lists/map.wish.json"));
    }

    #[test]
    fn to_path_without_suffix() {
        let key = CatalogKey::parse("c.sml").unwrap();
        assert_eq!(key.to_path(Path::new("root"), ""), PathBuf::from("root/c.sml"));
    }

    proptest! {
        #[test]
        fn generated_keys_are_accepted(key in "[a-z0-9_]{1,6}([/-][a-z0-9_%]{1,6}){0,4}(\\.[a-z]{1,4})?") {
            prop_assert!(is_valid_catalog_key(&key));
        }

        #[test]
        fn dot_dot_never_accepted(prefix in "[a-z]{0,5}", suffix in "[a-z/]{0,5}") {
            let candidate = format!("{prefix}..{suffix}");
            prop_assert!(!is_valid_catalog_key(&candidate));
        }
    }
}
