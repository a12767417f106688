//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: AppConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load the file when one is given, otherwise validate and return the defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let config = AppConfig::default();
            validate_config(&config).map_err(ConfigError::Validation)?;
            Ok(config)
        }
    }
}

/// Command-line values that replace fields of a loaded configuration.
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub output: Option<PathBuf>,
    pub bind_address: Option<String>,
}

impl ConfigOverrides {
    /// Apply the overrides and validate the result again.
    pub fn apply(self, mut config: AppConfig) -> Result<AppConfig, ConfigError> {
        if let Some(api_url) = self.api_url {
            config.ledger.api_url = api_url;
        }
        if let Some(output) = self.output {
            config.output.path = output;
        }
        if let Some(bind_address) = self.bind_address {
            config.portal.bind_address = bind_address;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}
