//! Random password generation.

use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::CryptoError;

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const SPECIALS: &str = "!@#$%^&*()-_=+[]{}|;:,.<>?";

pub const DEFAULT_LENGTH: usize = 12;
pub const MAX_LENGTH: usize = 128;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneratorOptions {
    pub length: usize,
    pub uppercase: bool,
    pub digits: bool,
    pub special: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            uppercase: true,
            digits: true,
            special: true,
        }
    }
}

impl GeneratorOptions {
    /// Lowercase letters are always included.
    pub fn charset(&self) -> Vec<char> {
        let mut set: Vec<char> = LOWERCASE.chars().collect();
        if self.uppercase {
            set.extend(UPPERCASE.chars());
        }
        if self.digits {
            set.extend(DIGITS.chars());
        }
        if self.special {
            set.extend(SPECIALS.chars());
        }
        set
    }
}

/// Draw `opts.length` characters uniformly from the charset using the OS CSPRNG.
pub fn generate(opts: &GeneratorOptions) -> Result<Zeroizing<String>, CryptoError> {
    if opts.length == 0 || opts.length > MAX_LENGTH {
        return Err(CryptoError::InvalidLength(format!(
            "password length must be between 1 and {MAX_LENGTH}, got {}",
            opts.length
        )));
    }
    let charset = opts.charset();
    let mut rng = OsRng;
    let mut out = Zeroizing::new(String::with_capacity(opts.length));
    for _ in 0..opts.length {
        out.push(charset[rng.gen_range(0..charset.len())]);
    }
    Ok(out)
}
