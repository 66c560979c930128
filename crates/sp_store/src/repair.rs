//! Double-encryption repair pass.
//!
//! An earlier release encrypted some secrets twice before persisting them.
//! A field is considered double-encrypted when it decrypts once, and that
//! result decrypts again to a non-empty value. Such fields are rewritten as the
//! single encryption of the inner plaintext.
//!
//! The check is heuristic: a genuine secret that happens to be valid base64
//! ciphertext under the same key would be "repaired" too. That risk is
//! accepted; a versioned ciphertext tag would remove it.
//!
//! Only one layer is removed per pass, so the pass is idempotent for single
//! and double encryption but not beyond: a triple-encrypted field needs two
//! passes to settle.

use sp_crypto::{is_decryption_error, CipherEngine};
use tracing::{debug, info, warn};

use crate::db::Store;
use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    EmptyField,
    /// The stored value does not decrypt at all.
    NotCiphertext,
    /// Decrypts once, but the result is not itself ciphertext. The normal case.
    SingleEncrypted,
    /// The second decryption produced an empty string.
    EmptyInner,
    WriteFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairOutcome {
    Repaired,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    pub examined: usize,
    pub repaired: Vec<i64>,
    pub skipped: Vec<(i64, SkipReason)>,
}

impl RepairReport {
    fn record(&mut self, id: i64, outcome: RepairOutcome) {
        self.examined += 1;
        match outcome {
            RepairOutcome::Repaired => self.repaired.push(id),
            RepairOutcome::Skipped(reason) => self.skipped.push((id, reason)),
        }
    }
}

/// Return the single-encrypted replacement for `field`, or why it was left alone.
pub fn classify(cipher: &CipherEngine, field: &str) -> Result<String, SkipReason> {
    if field.is_empty() {
        return Err(SkipReason::EmptyField);
    }
    let once = cipher
        .try_decrypt(field)
        .map_err(|_| SkipReason::NotCiphertext)?;
    if once.is_empty() || is_decryption_error(&once) {
        return Err(SkipReason::NotCiphertext);
    }
    let twice = cipher
        .try_decrypt(&once)
        .map_err(|_| SkipReason::SingleEncrypted)?;
    if twice.is_empty() {
        return Err(SkipReason::EmptyInner);
    }
    if is_decryption_error(&twice) {
        return Err(SkipReason::SingleEncrypted);
    }
    Ok(cipher.encrypt(&twice))
}

impl Store {
    /// Rewrite every double-encrypted secret as a single encryption.
    ///
    /// Only reading the entry list can fail. Per-entry problems, including a
    /// failed rewrite, are recorded as skips and never abort the pass.
    pub async fn repair_double_encrypted(&self) -> Result<RepairReport, StoreError> {
        let entries = self.get_all().await?;
        let mut report = RepairReport::default();

        for entry in entries {
            let outcome = match classify(self.cipher(), &entry.secret_ciphertext) {
                Ok(fixed) => match self.rewrite_secret(entry.id, &fixed).await {
                    Ok(()) => {
                        debug!(id = entry.id, "double-encrypted secret rewritten");
                        RepairOutcome::Repaired
                    }
                    Err(e) => {
                        warn!(id = entry.id, error = %e, "repair rewrite failed; entry left unchanged");
                        RepairOutcome::Skipped(SkipReason::WriteFailed(e.to_string()))
                    }
                },
                Err(reason) => RepairOutcome::Skipped(reason),
            };
            report.record(entry.id, outcome);
        }

        info!(
            examined = report.examined,
            repaired = report.repaired.len(),
            "double-encryption repair pass complete"
        );
        Ok(report)
    }
}
