//! Caller-side entry drafts.
//!
//! A draft carries the plaintext password and is sealed (validated + encrypted)
//! before anything is handed to the [`Store`](crate::Store). The plaintext is
//! zeroized when the draft is dropped.

use sp_crypto::CipherEngine;
use zeroize::Zeroizing;

use crate::error::StoreError;
use crate::models::{require_fields, NewEntry, VaultEntry};

pub const MIN_PASSWORD_LEN: usize = 4;

#[derive(Clone, Default)]
pub struct EntryDraft {
    pub title: String,
    pub username: String,
    pub password: Zeroizing<String>,
    pub category: String,
}

impl std::fmt::Debug for EntryDraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryDraft")
            .field("title", &self.title)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("category", &self.category)
            .finish()
    }
}

impl EntryDraft {
    pub fn validate(&self) -> Result<(), StoreError> {
        require_fields(&self.title, &self.username)?;
        if self.password.trim().is_empty() {
            return Err(StoreError::Validation("password is required".into()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(StoreError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }

    /// Validate and encrypt into a row ready for [`Store::add`](crate::Store::add).
    pub fn seal(&self, cipher: &CipherEngine) -> Result<NewEntry, StoreError> {
        self.validate()?;
        Ok(NewEntry {
            title: self.title.trim().to_string(),
            username: self.username.trim().to_string(),
            secret_ciphertext: cipher.encrypt(&self.password),
            category: self.category.trim().to_string(),
            created_at: None,
        })
    }

    /// Validate and encrypt over `existing`, keeping its `id` and `created_at`.
    pub fn seal_over(
        &self,
        existing: &VaultEntry,
        cipher: &CipherEngine,
    ) -> Result<VaultEntry, StoreError> {
        let sealed = self.seal(cipher)?;
        Ok(VaultEntry {
            id: existing.id,
            title: sealed.title,
            username: sealed.username,
            secret_ciphertext: sealed.secret_ciphertext,
            category: sealed.category,
            created_at: existing.created_at,
        })
    }
}
