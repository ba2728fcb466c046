//! Shared SHA-256 hex digest utility.
//!
//! Used by `naming` for content-addressed artifact filenames and by the
//! client crate for TC3 request signing payload hashes.

use sha2::{Digest, Sha256};

/// Compute a SHA-256 hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

/// First `len` hex characters of the SHA-256 digest of `data`.
///
/// `len` is capped at the full digest length (64).
pub fn short_hash(data: &[u8], len: usize) -> String {
    let mut hex = sha256_hex(data);
    hex.truncate(len.min(64));
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_produces_known_hash() {
        let hash = sha256_hex(b"");
        assert_eq!(
            hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn consistent_output() {
        let data = b"a cute robot toy";
        assert_eq!(sha256_hex(data), sha256_hex(data));
        assert_eq!(sha256_hex(data).len(), 64);
    }

    #[test]
    fn short_hash_is_prefix() {
        let full = sha256_hex(b"prompt");
        assert_eq!(short_hash(b"prompt", 8), full[..8]);
    }

    #[test]
    fn short_hash_capped_at_digest_length() {
        assert_eq!(short_hash(b"prompt", 1000).len(), 64);
    }
}
