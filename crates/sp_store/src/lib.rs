//! sp_store: Encrypted local credential store for SecurePass
//!
//! # Encryption strategy
//! SQLite does NOT natively encrypt. Encryption is application-level:
//! - `secret_ciphertext` holds AES-256-CBC ciphertext, base64-encoded, produced
//!   by the caller through [`sp_crypto::CipherEngine`] before the row reaches
//!   the store. The store never encrypts on `add`/`update`.
//! - Titles, usernames, categories and timestamps are plaintext so search and
//!   ordering can run without the key.
//!
//! # Self-healing
//! Older builds stored some secrets encrypted twice. [`Store::open`] runs
//! [`Store::repair_double_encrypted`] once to rewrite those fields.
//!
//! # Migration
//! SQLx migrations in `migrations/` are run on open.

pub mod db;
pub mod draft;
pub mod error;
pub mod export;
pub mod migrations;
pub mod models;
pub mod repair;

pub use db::Store;
pub use draft::EntryDraft;
pub use error::{ErrorKind, StoreError};
pub use models::{EntryStats, NewEntry, VaultEntry};
pub use repair::{RepairOutcome, RepairReport, SkipReason};
