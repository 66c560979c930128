use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub const APP_QUALIFIER: &str = "com";
pub const APP_ORG: &str = "securepass";
pub const APP_NAME: &str = "securepass";

pub const DATA_DIR_ENV: &str = "SECUREPASS_DATA_DIR";

pub fn data_dir() -> anyhow::Result<PathBuf> {
    let dirs = ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .ok_or_else(|| anyhow::anyhow!("cannot determine data directory"))?;
    Ok(dirs.data_dir().to_path_buf())
}

/// `--data-dir` wins, then `SECUREPASS_DATA_DIR`, then the platform default.
pub fn resolve_data_dir(flag: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Ok(override_path) = std::env::var(DATA_DIR_ENV) {
        if !override_path.is_empty() {
            return Ok(PathBuf::from(override_path));
        }
    }
    data_dir()
}

pub fn db_path(data_dir: &Path) -> PathBuf {
    data_dir.join("securepass.db")
}

/// Passphrase verification artifact (raw SHA-256 digest).
pub fn verifier_path(data_dir: &Path) -> PathBuf {
    data_dir.join("master.pwd")
}

pub fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join("settings.json")
}
