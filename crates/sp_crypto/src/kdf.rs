//! Master key derivation
//!
//! `MasterKey::derive` hashes the UTF-8 passphrase with SHA-256. The digest is
//! the AES-256 key and its first 16 bytes are the CBC IV.
//!
//! KNOWN WEAKNESS: the IV is fixed per passphrase and there is no salt, so equal
//! plaintexts encrypt to equal ciphertexts and a fast hash is brute-forceable.
//! Existing vaults depend on this derivation for decryption, so it is kept
//! as-is. A random per-field IV stored with the ciphertext would need a
//! versioned field format.

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const KEY_LEN: usize = 32;
pub const IV_LEN: usize = 16;

/// AES-256 key and CBC IV derived from the master passphrase. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey {
    key: [u8; KEY_LEN],
    iv: [u8; IV_LEN],
}

impl MasterKey {
    pub fn derive(passphrase: &str) -> Self {
        let mut key: [u8; KEY_LEN] = Sha256::digest(passphrase.as_bytes()).into();
        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(&key[..IV_LEN]);
        let derived = Self { key, iv };
        key.zeroize();
        iv.zeroize();
        derived
    }

    pub fn key(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_sha256_of_passphrase() {
        let mk = MasterKey::derive("abc");
        assert_eq!(
            hex::encode(mk.key()),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn iv_is_key_prefix() {
        let mk = MasterKey::derive("correct horse battery staple");
        assert_eq!(mk.iv(), &mk.key()[..IV_LEN]);
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = MasterKey::derive("пароль");
        let b = MasterKey::derive("пароль");
        assert_eq!(a.key(), b.key());
        assert_ne!(MasterKey::derive("other").key(), a.key());
    }

    #[test]
    fn debug_does_not_leak_key() {
        let mk = MasterKey::derive("abc");
        assert_eq!(format!("{mk:?}"), "MasterKey(..)");
    }
}
