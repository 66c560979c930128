//! First-run / returning-user bootstrap.
//!
//! The presence of the verification artifact decides which path runs. On
//! success the caller gets an owned [`Session`]; the passphrase itself is
//! dropped (and zeroized) once the store's cipher has been derived from it.

use anyhow::{anyhow, bail, Context, Result};
use sp_crypto::verifier::{passphrase_digest, verify_passphrase};
use sp_store::Store;
use std::io::Write;
use std::path::Path;
use tracing::info;
use zeroize::Zeroizing;

use crate::paths::{db_path, verifier_path};

pub const PASSPHRASE_ENV: &str = "SECUREPASS_PASSPHRASE";
pub const PASSPHRASE_CONFIRM_ENV: &str = "SECUREPASS_PASSPHRASE_CONFIRM";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultState {
    FirstRun,
    Returning,
}

pub fn detect(data_dir: &Path) -> VaultState {
    if verifier_path(data_dir).exists() {
        VaultState::Returning
    } else {
        VaultState::FirstRun
    }
}

/// Everything a command needs once the vault is unlocked.
pub struct Session {
    pub store: Store,
}

pub async fn unlock(data_dir: &Path) -> Result<Session> {
    ensure_data_dir(data_dir)?;
    let verifier = verifier_path(data_dir);

    let store = match detect(data_dir) {
        VaultState::FirstRun => {
            let passphrase = prompt_passphrase_twice("Create master password: ")?;
            let store = initialise(data_dir, &passphrase).await?;
            eprintln!("Master password set. Remember it - access cannot be recovered without it.");
            store
        }
        VaultState::Returning => {
            let passphrase = prompt_passphrase_once("Master password: ")?;
            if !check(&verifier, &passphrase)? {
                bail!("incorrect master password");
            }
            Store::open(&db_path(data_dir), &passphrase)
                .await
                .context("open vault store")?
        }
    };
    Ok(Session { store })
}

/// Create the store for a new vault, then record the passphrase digest.
/// A failed open leaves no artifact behind.
pub async fn initialise(data_dir: &Path, passphrase: &str) -> Result<Store> {
    let store = Store::open(&db_path(data_dir), passphrase)
        .await
        .context("open vault store")?;
    establish(&verifier_path(data_dir), passphrase)?;
    info!("vault initialised");
    Ok(store)
}

fn ensure_data_dir(data_dir: &Path) -> Result<()> {
    if !data_dir.exists() {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("create {}", data_dir.display()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(data_dir, std::fs::Permissions::from_mode(0o700))?;
        }
    }
    Ok(())
}

/// Persist the verification artifact for a new vault.
pub fn establish(path: &Path, passphrase: &str) -> Result<()> {
    let mut opts = std::fs::OpenOptions::new();
    opts.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    let mut file = opts
        .open(path)
        .with_context(|| format!("create {}", path.display()))?;
    file.write_all(&passphrase_digest(passphrase))?;
    file.flush()?;
    Ok(())
}

pub fn check(path: &Path, passphrase: &str) -> Result<bool> {
    let stored = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    Ok(verify_passphrase(passphrase, &stored))
}

fn prompt_passphrase_once(prompt: &str) -> Result<Zeroizing<String>> {
    let passphrase = match std::env::var(PASSPHRASE_ENV) {
        Ok(pw) if !pw.is_empty() => Zeroizing::new(pw),
        _ => Zeroizing::new(
            rpassword::prompt_password(prompt).map_err(|e| anyhow!("password prompt: {e}"))?,
        ),
    };
    if passphrase.trim().is_empty() {
        bail!("master password must not be empty");
    }
    Ok(passphrase)
}

fn prompt_passphrase_twice(prompt: &str) -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSPHRASE_ENV) {
        if !pw.is_empty() {
            if let Ok(confirm) = std::env::var(PASSPHRASE_CONFIRM_ENV) {
                if confirm != pw {
                    bail!("password confirmation mismatch");
                }
            }
        }
    }
    let first = prompt_passphrase_once(prompt)?;
    if std::env::var(PASSPHRASE_ENV).is_ok_and(|pw| !pw.is_empty()) {
        return Ok(first);
    }
    let second = Zeroizing::new(
        rpassword::prompt_password("Confirm master password: ")
            .map_err(|e| anyhow!("password prompt: {e}"))?,
    );
    if *first != *second {
        bail!("passwords do not match");
    }
    Ok(first)
}
