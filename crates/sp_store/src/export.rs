//! Plaintext export.
//!
//! Format: `;`-separated, every field double-quoted with embedded quotes
//! doubled, header `Title;Username;Password;Category;CreatedDate`, `\n` line
//! endings, UTF-8 without BOM. Secrets are DECRYPTED: the output file is as
//! sensitive as the vault itself.

use std::path::Path;

use sp_crypto::CipherEngine;
use tokio::io::AsyncWriteExt;
use tracing::info;
use zeroize::Zeroizing;

use crate::db::Store;
use crate::error::StoreError;
use crate::models::VaultEntry;

pub const EXPORT_HEADER: &str = "Title;Username;Password;Category;CreatedDate";
pub const EXPORT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn quote(out: &mut String, field: &str) {
    out.push('"');
    out.push_str(&field.replace('"', "\"\""));
    out.push('"');
}

/// Render `entries` in the given order. Undecryptable secrets are written as
/// the cipher's sentinel.
pub fn render_export(entries: &[VaultEntry], cipher: &CipherEngine) -> Zeroizing<String> {
    let mut out = Zeroizing::new(String::new());
    out.push_str(EXPORT_HEADER);
    out.push('\n');
    for entry in entries {
        let secret = cipher.decrypt(&entry.secret_ciphertext);
        quote(&mut out, &entry.title);
        out.push(';');
        quote(&mut out, &entry.username);
        out.push(';');
        quote(&mut out, &secret);
        out.push(';');
        quote(&mut out, &entry.category);
        out.push(';');
        quote(
            &mut out,
            &entry.created_at.format(EXPORT_DATE_FORMAT).to_string(),
        );
        out.push('\n');
    }
    out
}

impl Store {
    /// Write `entries` to `destination`, replacing any existing file.
    /// Returns the number of rows written.
    pub async fn export(&self, entries: &[VaultEntry], destination: &Path) -> Result<usize, StoreError> {
        let rendered = render_export(entries, self.cipher());

        let mut opts = tokio::fs::OpenOptions::new();
        opts.write(true).create(true).truncate(true);
        #[cfg(unix)]
        opts.mode(0o600);

        let mut file = opts.open(destination).await?;
        // `mode` only applies on creation; an existing file keeps its bits.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .await?;
        }
        file.write_all(rendered.as_bytes()).await?;
        file.flush().await?;

        info!(rows = entries.len(), path = %destination.display(), "vault exported");
        Ok(entries.len())
    }
}
