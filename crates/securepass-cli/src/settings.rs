use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sp_crypto::generator::GeneratorOptions;
use std::path::Path;

use crate::paths::settings_path;

pub const DEFAULT_LOG_FILTER: &str = "securepass=info,sp_store=info";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CliSettings {
    /// Category applied by `add` when none is given.
    pub default_category: String,
    pub generator: GeneratorOptions,
    /// tracing-subscriber filter; `RUST_LOG` still takes precedence.
    pub log_filter: String,
}

impl Default for CliSettings {
    fn default() -> Self {
        Self {
            default_category: String::new(),
            generator: GeneratorOptions::default(),
            log_filter: DEFAULT_LOG_FILTER.into(),
        }
    }
}

/// Read `settings.json` from the data directory; a missing file means defaults.
pub fn load(data_dir: &Path) -> Result<CliSettings> {
    let path = settings_path(data_dir);
    if !path.exists() {
        return Ok(CliSettings::default());
    }
    let bytes = std::fs::read(&path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))
}
