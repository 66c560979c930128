//! Vault store over SQLite via sqlx.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::Utc;
use sp_crypto::CipherEngine;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::error::StoreError;
use crate::migrations;
use crate::models::{require_fields, EntryStats, NewEntry, VaultEntry};

const SELECT_ENTRIES: &str =
    "SELECT id, title, username, secret_ciphertext, category, created_at FROM vault_entries";
const ORDER_NEWEST_FIRST: &str = "ORDER BY created_at DESC, id DESC";

/// Store handle for one vault (one passphrase). Cheap to clone (Arc internally).
///
/// Every method acquires a pooled connection for the duration of its statement
/// and releases it on return. Callers serialize writes; there is no locking
/// beyond SQLite's own per-statement atomicity.
#[derive(Clone)]
pub struct Store {
    pub pool: SqlitePool,
    cipher: CipherEngine,
}

impl Store {
    /// Open (or create) the SQLite database at `db_path` for `passphrase`.
    /// Runs pending migrations, then the double-encryption repair pass.
    ///
    /// WAL journal mode is configured at connection time, not inside a
    /// migration: SQLite refuses to change `journal_mode` inside a transaction.
    pub async fn open(db_path: &Path, passphrase: &str) -> Result<Self, StoreError> {
        let opts = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePool::connect_with(opts).await?;
        migrations::run(&pool).await?;

        let store = Self {
            pool,
            cipher: CipherEngine::new(passphrase),
        };
        info!(path = %db_path.display(), "vault store opened");

        // Advisory: a failed pass must not keep the vault from opening.
        if let Err(e) = store.repair_double_encrypted().await {
            warn!(error = %e, "double-encryption repair pass failed");
        }
        Ok(store)
    }

    /// The cipher bound to this vault's passphrase.
    pub fn cipher(&self) -> &CipherEngine {
        &self.cipher
    }

    /// Decrypt an entry's secret. Yields the sentinel when it cannot be recovered.
    pub fn reveal(&self, entry: &VaultEntry) -> Zeroizing<String> {
        self.cipher.decrypt(&entry.secret_ciphertext)
    }

    pub async fn add(&self, entry: NewEntry) -> Result<VaultEntry, StoreError> {
        require_fields(&entry.title, &entry.username)?;
        let created_at = entry.created_at.unwrap_or_else(Utc::now);

        let id = sqlx::query(
            "INSERT INTO vault_entries (title, username, secret_ciphertext, category, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&entry.title)
        .bind(&entry.username)
        .bind(&entry.secret_ciphertext)
        .bind(&entry.category)
        .bind(created_at)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        debug!(id, "vault entry added");
        Ok(VaultEntry {
            id,
            title: entry.title,
            username: entry.username,
            secret_ciphertext: entry.secret_ciphertext,
            category: entry.category,
            created_at,
        })
    }

    /// All entries, newest first; equal timestamps fall back to id descending.
    pub async fn get_all(&self) -> Result<Vec<VaultEntry>, StoreError> {
        let rows = sqlx::query_as::<_, VaultEntry>(&format!("{SELECT_ENTRIES} {ORDER_NEWEST_FIRST}"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<VaultEntry>, StoreError> {
        let row = sqlx::query_as::<_, VaultEntry>(&format!("{SELECT_ENTRIES} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Overwrite title, username, secret and category of an existing entry.
    /// `created_at` is never taken from `entry`.
    pub async fn update(&self, entry: &VaultEntry) -> Result<(), StoreError> {
        require_fields(&entry.title, &entry.username)?;

        let result = sqlx::query(
            "UPDATE vault_entries SET title = ?, username = ?, secret_ciphertext = ?, category = ? WHERE id = ?",
        )
        .bind(&entry.title)
        .bind(&entry.username)
        .bind(&entry.secret_ciphertext)
        .bind(&entry.category)
        .bind(entry.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(entry.id));
        }
        debug!(id = entry.id, "vault entry updated");
        Ok(())
    }

    /// Remove an entry. Unknown ids are a no-op.
    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM vault_entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        debug!(id, removed = result.rows_affected(), "vault entry delete");
        Ok(())
    }

    /// Case-insensitive substring search over title, username and category.
    /// A blank query returns everything. Ordering matches [`Store::get_all`].
    pub async fn search(&self, text: &str) -> Result<Vec<VaultEntry>, StoreError> {
        let all = self.get_all().await?;
        if text.trim().is_empty() {
            return Ok(all);
        }
        // SQLite's lower()/LIKE only fold ASCII, so filter here.
        let needle = text.to_lowercase();
        Ok(all.into_iter().filter(|e| e.matches(&needle)).collect())
    }

    /// Entries whose category equals `category` exactly, newest first.
    pub async fn filter_by_category(&self, category: &str) -> Result<Vec<VaultEntry>, StoreError> {
        let rows = sqlx::query_as::<_, VaultEntry>(&format!(
            "{SELECT_ENTRIES} WHERE category = ? {ORDER_NEWEST_FIRST}"
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Distinct non-empty categories in use.
    pub async fn list_categories(&self) -> Result<BTreeSet<String>, StoreError> {
        let rows: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT category FROM vault_entries WHERE category <> ''")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().collect())
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vault_entries")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    pub async fn stats(&self) -> Result<EntryStats, StoreError> {
        Ok(EntryStats {
            entries: self.count().await?,
            categories: self.list_categories().await?.len(),
        })
    }

    /// Replace only the ciphertext column. Used by the repair pass.
    pub(crate) async fn rewrite_secret(&self, id: i64, ciphertext: &str) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE vault_entries SET secret_ciphertext = ? WHERE id = ?")
            .bind(ciphertext)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Store;
    use crate::models::NewEntry;
    use tempfile::tempdir;

    #[tokio::test]
    async fn migrations_create_empty_vault() {
        let dir = tempdir().unwrap();
        let store = Store::open(&dir.path().join("vault.db"), "pw").await.expect("open store");
        assert_eq!(store.count().await.unwrap(), 0);

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'vault_entries'",
        )
        .fetch_one(&store.pool)
        .await
        .unwrap();
        assert_eq!(tables, 1);
    }

    #[tokio::test]
    async fn reopen_keeps_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vault.db");
        let id = {
            let store = Store::open(&path, "pw").await.unwrap();
            let secret = store.cipher().encrypt("hunter22");
            let added = store
                .add(NewEntry {
                    title: "Steam".into(),
                    username: "gamer123".into(),
                    secret_ciphertext: secret,
                    category: "Games".into(),
                    created_at: None,
                })
                .await
                .unwrap();
            store.pool.close().await;
            added.id
        };

        let store = Store::open(&path, "pw").await.unwrap();
        let entry = store.get_by_id(id).await.unwrap().expect("entry persisted");
        assert_eq!(store.reveal(&entry).as_str(), "hunter22");
    }
}
