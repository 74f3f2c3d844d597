//! CLI configuration file.

use anyhow::{Context, Result};
use ecc_enclave::EnclaveConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,

    pub enclave: EnclaveConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            enclave: EnclaveConfig::default(),
        }
    }
}

impl Config {
    /// `~/.ecc/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".ecc").join("config.toml"))
    }

    /// Load from `path` if given, otherwise from the default location if a
    /// file exists there. Without a file the enclave settings come from the
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|p| p.exists()),
        };

        let config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self {
                enclave: EnclaveConfig::from_env(),
                ..Self::default()
            },
        };

        config.enclave.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
log_level = "debug"

[enclave]
max_response_size = 4096
"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.enclave.max_response_size, 4096);
        assert_eq!(config.enclave.response_reserve, 1024);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = Config::load(Some(file.path())).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_enclave_settings_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[enclave]\nresponse_reserve = 0").unwrap();

        assert!(Config::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
