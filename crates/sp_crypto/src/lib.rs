//! sp_crypto: SecurePass master-key and field-cipher primitives
//!
//! # Design principles
//! - NO custom crypto; primitives come from the RustCrypto crates.
//! - Key material is zeroized on drop.
//! - Field decryption never propagates an error to presentation code; it
//!   yields the [`cipher::DECRYPTION_ERROR`] sentinel instead.
//!
//! # Module layout
//! - `kdf`:       SHA-256 master key + IV derivation from the passphrase
//! - `cipher`:    AES-256-CBC field encrypt/decrypt, base64 text encoding
//! - `verifier`:  passphrase digest and constant-time comparison
//! - `generator`: random password generation
//! - `error`:     unified error type

pub mod cipher;
pub mod error;
pub mod generator;
pub mod kdf;
pub mod verifier;

pub use cipher::{is_decryption_error, CipherEngine, DECRYPTION_ERROR};
pub use error::CryptoError;
