//! Runtime configuration.
//!
//! ## Loading order
//!
//! 1. `GEOTRACK_CONFIG` environment variable (path to a TOML file)
//! 2. `geotrack.toml` in the current working directory
//! 3. Built-in defaults
//!
//! A config file that exists but cannot be read or parsed is reported and
//! replaced by the defaults rather than aborting startup.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_ENV_VAR: &str = "GEOTRACK_CONFIG";
const LOCAL_CONFIG_FILE: &str = "geotrack.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory of the sled database.
    pub db_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("geotrack_db"),
        }
    }
}

impl Config {
    /// Load configuration following the documented order.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::load_or_default(Path::new(&path));
        }
        let local = Path::new(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Self::load_or_default(local);
        }
        Self::default()
    }

    /// Read and parse a specific TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = toml::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    fn load_or_default(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "configuration loaded");
                config
            }
            Err(err) => {
                tracing::warn!(error = %err, "falling back to default configuration");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.db_path, PathBuf::from("geotrack_db"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geotrack.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "db_path = \"/var/lib/geotrack\"").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/var/lib/geotrack"));
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geotrack.toml");
        fs::write(&path, "").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_unreadable_file_falls_back() {
        let config = Config::load_or_default(Path::new("/nonexistent/geotrack.toml"));
        assert_eq!(config, Config::default());
    }
}
