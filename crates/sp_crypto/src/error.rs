use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    #[error("Decryption failed (wrong key, truncated data or bad padding)")]
    Decrypt,

    #[error("Decrypted field is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Invalid length: {0}")]
    InvalidLength(String),
}
