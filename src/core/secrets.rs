//! Loads the Gemini API key once at startup. The environment variable
//! takes precedence over the TOML secrets file so deployments can
//! inject the key without writing it to disk.

use std::env::{self, VarError};
use std::fs;
use std::io;
use std::path::Path;

use super::config::ConfigError;

pub const API_KEY_NAME: &str = "GOOGLE_API_KEY";

pub fn load_api_key(secrets_path: &Path) -> Result<String, ConfigError> {
    let from_env = match env::var(API_KEY_NAME) {
        Ok(key) => Some(key),
        Err(VarError::NotPresent) => None,
        Err(VarError::NotUnicode(_)) => {
            return Err(ConfigError::Malformed {
                origin: "the environment".to_string(),
                reason: "value is not valid unicode".to_string(),
            });
        }
    };
    resolve_api_key(from_env, secrets_path)
}

fn resolve_api_key(from_env: Option<String>, secrets_path: &Path) -> Result<String, ConfigError> {
    if let Some(key) = from_env {
        tracing::debug!("Using {} from the environment", API_KEY_NAME);
        return non_empty(key);
    }

    let contents = match fs::read_to_string(secrets_path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ConfigError::MissingKey(secrets_path.to_path_buf()));
        }
        Err(source) => {
            return Err(ConfigError::Unreadable {
                path: secrets_path.to_path_buf(),
                source,
            });
        }
    };

    let secrets: toml::Table = contents.parse().map_err(|e: toml::de::Error| {
        ConfigError::Malformed {
            origin: secrets_path.display().to_string(),
            reason: e.message().to_string(),
        }
    })?;

    match secrets.get(API_KEY_NAME) {
        Some(toml::Value::String(key)) => non_empty(key.clone()),
        Some(other) => Err(ConfigError::Malformed {
            origin: secrets_path.display().to_string(),
            reason: format!("expected a string but found {}", other.type_str()),
        }),
        None => Err(ConfigError::MissingKey(secrets_path.to_path_buf())),
    }
}

fn non_empty(key: String) -> Result<String, ConfigError> {
    let key = key.trim();
    if key.is_empty() {
        Err(ConfigError::EmptyKey)
    } else {
        Ok(key.to_string())
    }
}
