use std::io::{self, Read};

use sha2::{Digest, Sha256};
use sml_types::ShareId;

/// SHA-256 content hasher.
///
/// Unlike a domain-separated hasher, the digest covers the payload bytes
/// only: clients can compute the identifier of a snippet themselves with any
/// `sha256sum`. Domains are kept apart by storage layout, not by the hash.
pub struct ContentHasher;

impl ContentHasher {
    /// Identifier of `data`.
    pub fn hash(data: &[u8]) -> ShareId {
        ShareId::from_digest(Self::raw_hash(data))
    }

    /// Raw 32-byte SHA-256 digest.
    pub fn raw_hash(data: &[u8]) -> [u8; 32] {
        finish(Sha256::new().chain_update(data))
    }

    /// Hash everything `reader` yields, without buffering it whole.
    pub fn hash_reader<R: Read>(mut reader: R) -> io::Result<ShareId> {
        let mut hasher = Sha256::new();
        let mut buf = [0u8; 8192];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        Ok(ShareId::from_digest(finish(hasher)))
    }

    /// Verify that `data` produces the expected identifier.
    pub fn verify(data: &[u8], expected: &ShareId) -> bool {
        Self::hash(data) == *expected
    }
}

fn finish(hasher: Sha256) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_vector_empty() {
        assert_eq!(
            ContentHasher::hash(b"").as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn known_vector_abc() {
        assert_eq!(
            ContentHasher::hash(b"abc").as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn hash_is_deterministic() {
        let a = ContentHasher::hash(b"val x = 1;");
        let b = ContentHasher::hash(b"val x = 1;");
        assert_eq!(a, b);
        assert!(a.is_digest());
    }

    #[test]
    fn different_payloads_differ() {
        assert_ne!(ContentHasher::hash(b"val x = 1;"), ContentHasher::hash(b"val x = 2;"));
    }

    #[test]
    fn verify_detects_tampering() {
        let id = ContentHasher::hash(b"original");
        assert!(ContentHasher::verify(b"original", &id));
        assert!(!ContentHasher::verify(b"tampered", &id));
    }

    #[test]
    fn reader_matches_slice() {
        let data = vec![0x5a; 20_000];
        let streamed = ContentHasher::hash_reader(&data[..]).unwrap();
        assert_eq!(streamed, ContentHasher::hash(&data));
    }

    proptest! {
        #[test]
        fn identifier_is_hex_of_raw_digest(data in proptest::collection::vec(any::<u8>(), 0..512)) {
            let id = ContentHasher::hash(&data);
            prop_assert_eq!(id.as_str(), hex::encode(ContentHasher::raw_hash(&data)));
            prop_assert_eq!(id.as_str().len(), 64);
        }
    }
}
