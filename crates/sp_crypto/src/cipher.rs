//! Field cipher
//!
//! AES-256-CBC with PKCS#7 padding under the passphrase-derived key/IV.
//!
//! Text wire format:
//!   base64( ciphertext )   (standard alphabet, padded, no IV prefix)
//!
//! Empty input passes through unchanged in both directions.

use aes::Aes256;
use base64::{engine::general_purpose, Engine as _};
use cbc::cipher::{
    block_padding::Pkcs7, generic_array::GenericArray, BlockDecryptMut, BlockEncryptMut, KeyIvInit,
};
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::kdf::MasterKey;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Returned by [`CipherEngine::decrypt`] in place of a plaintext it could not recover.
pub const DECRYPTION_ERROR: &str = "Decryption error";

pub fn is_decryption_error(value: &str) -> bool {
    value == DECRYPTION_ERROR
}

/// Stateless apart from the derived key; cheap to clone and safe to rebuild per call.
#[derive(Clone, Debug)]
pub struct CipherEngine {
    key: MasterKey,
}

impl CipherEngine {
    pub fn new(passphrase: &str) -> Self {
        Self {
            key: MasterKey::derive(passphrase),
        }
    }

    /// Encrypt `plaintext` and return it base64-encoded.
    pub fn encrypt(&self, plaintext: &str) -> String {
        if plaintext.is_empty() {
            return String::new();
        }
        let ct = Aes256CbcEnc::new(
            GenericArray::from_slice(self.key.key()),
            GenericArray::from_slice(self.key.iv()),
        )
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
        general_purpose::STANDARD.encode(ct)
    }

    /// Decrypt a base64 field, reporting why it failed.
    pub fn try_decrypt(&self, encoded: &str) -> Result<Zeroizing<String>, CryptoError> {
        if encoded.is_empty() {
            return Ok(Zeroizing::new(String::new()));
        }
        let ct = general_purpose::STANDARD.decode(encoded)?;
        let pt = Aes256CbcDec::new(
            GenericArray::from_slice(self.key.key()),
            GenericArray::from_slice(self.key.iv()),
        )
        .decrypt_padded_vec_mut::<Pkcs7>(&ct)
        .map_err(|_| CryptoError::Decrypt)?;
        let pt = Zeroizing::new(pt);
        let text = String::from_utf8(pt.to_vec())?;
        Ok(Zeroizing::new(text))
    }

    /// Decrypt a base64 field. Any failure yields [`DECRYPTION_ERROR`].
    pub fn decrypt(&self, encoded: &str) -> Zeroizing<String> {
        match self.try_decrypt(encoded) {
            Ok(pt) => pt,
            Err(_) => Zeroizing::new(DECRYPTION_ERROR.to_string()),
        }
    }
}
