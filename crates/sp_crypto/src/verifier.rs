//! Passphrase verification artifact.
//!
//! The artifact is the raw 32-byte SHA-256 digest of the passphrase. Where it
//! lives on disk is the bootstrap's business; this module only produces and
//! checks it.

use sha2::{Digest, Sha256};

pub const DIGEST_LEN: usize = 32;

pub fn passphrase_digest(passphrase: &str) -> [u8; DIGEST_LEN] {
    Sha256::digest(passphrase.as_bytes()).into()
}

/// Check `passphrase` against a stored digest without early exit on mismatch.
pub fn verify_passphrase(passphrase: &str, stored: &[u8]) -> bool {
    constant_time_eq(&passphrase_digest(passphrase), stored)
}

/// Constant-time comparison to prevent timing attacks.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_matches_known_vector() {
        assert_eq!(
            hex::encode(passphrase_digest("")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn verify_accepts_correct_and_rejects_wrong() {
        let stored = passphrase_digest("correct horse");
        assert!(verify_passphrase("correct horse", &stored));
        assert!(!verify_passphrase("correct horse ", &stored));
        assert!(!verify_passphrase("Correct horse", &stored));
    }

    #[test]
    fn truncated_artifact_is_rejected() {
        let stored = passphrase_digest("pw");
        assert!(!verify_passphrase("pw", &stored[..31]));
        assert!(!verify_passphrase("pw", &[]));
    }

    #[test]
    fn constant_time_eq_basics() {
        assert!(constant_time_eq(b"", b""));
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
    }
}
