//! Row models: these map to/from the `vault_entries` relation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct VaultEntry {
    /// Store-assigned, immutable.
    pub id: i64,
    pub title: String,
    pub username: String,
    /// Base64 AES-CBC ciphertext. Never the plaintext.
    pub secret_ciphertext: String,
    /// Free text, may be empty.
    pub category: String,
    /// Set on insert, never rewritten.
    pub created_at: DateTime<Utc>,
}

/// An entry that has not been persisted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub title: String,
    pub username: String,
    pub secret_ciphertext: String,
    pub category: String,
    /// `None` means "now" at insert time.
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryStats {
    pub entries: i64,
    pub categories: usize,
}

pub(crate) fn require_fields(title: &str, username: &str) -> Result<(), StoreError> {
    if title.trim().is_empty() {
        return Err(StoreError::Validation("title is required".into()));
    }
    if username.trim().is_empty() {
        return Err(StoreError::Validation("username is required".into()));
    }
    Ok(())
}

impl VaultEntry {
    /// Case-insensitive substring match on title, username or category.
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self.username.to_lowercase().contains(needle_lower)
            || self.category.to_lowercase().contains(needle_lower)
    }
}
