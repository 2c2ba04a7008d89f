use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use super::secrets::{API_KEY_NAME, load_api_key};

/// Fatal configuration problems. These halt startup before the server
/// binds a socket.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not find `GOOGLE_API_KEY` in the environment or in {}", .0.display())]
    MissingKey(PathBuf),
    #[error("The `GOOGLE_API_KEY` is empty")]
    EmptyKey,
    #[error("Failed to parse `GOOGLE_API_KEY` from {origin}: {reason}")]
    Malformed { origin: String, reason: String },
    #[error("Failed to read secrets file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid value {value:?} for {name}")]
    InvalidSetting { name: String, value: String },
}

impl ConfigError {
    /// Operator facing instructions for fixing the problem.
    pub fn remediation(&self) -> String {
        match self {
            ConfigError::MissingKey(path) | ConfigError::Unreadable { path, .. } => format!(
                "Add a `{API_KEY_NAME} = 'YOUR_KEY_HERE'` line to {} or export {API_KEY_NAME}, then restart.",
                path.display()
            ),
            ConfigError::EmptyKey => format!(
                "Provide a valid API key for `{API_KEY_NAME}` in your secrets file or environment, then restart."
            ),
            ConfigError::Malformed { origin, .. } => format!(
                "Fix {origin} so that `{API_KEY_NAME}` is a quoted string, e.g. `{API_KEY_NAME} = 'YOUR_KEY_HERE'`."
            ),
            ConfigError::InvalidSetting { name, .. } => {
                format!("Set {name} to a whole number of seconds or unset it to use the default.")
            }
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub gemini_api_key: String,
    pub gemini_api_hostname: String,
    pub gemini_model: String,
    pub request_timeout: Duration,
    pub session_idle_timeout: Duration,
}

// Keep the API key out of logs
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("gemini_api_key", &"<redacted>")
            .field("gemini_api_hostname", &self.gemini_api_hostname)
            .field("gemini_model", &self.gemini_model)
            .field("request_timeout", &self.request_timeout)
            .field("session_idle_timeout", &self.session_idle_timeout)
            .finish()
    }
}

impl AppConfig {
    /// Read settings from the environment and the API key from the
    /// secret store.
    pub fn load() -> Result<Self, ConfigError> {
        let secrets_path = env::var("SPARK_SECRETS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".spark/secrets.toml"));
        let gemini_api_key = load_api_key(&secrets_path)?;
        let gemini_api_hostname = env::var("SPARK_GEMINI_API_HOST")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string());
        let gemini_model =
            env::var("SPARK_GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".to_string());
        let request_timeout = seconds_from_env("SPARK_REQUEST_TIMEOUT_SECS", 60)?;
        let session_idle_timeout = seconds_from_env("SPARK_SESSION_IDLE_SECS", 60 * 60)?;

        Ok(Self {
            gemini_api_key,
            gemini_api_hostname,
            gemini_model,
            request_timeout,
            session_idle_timeout,
        })
    }
}

fn seconds_from_env(name: &str, default: u64) -> Result<Duration, ConfigError> {
    match env::var(name) {
        Ok(value) => parse_seconds(name, &value),
        Err(_) => Ok(Duration::from_secs(default)),
    }
}

fn parse_seconds(name: &str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::InvalidSetting {
            name: name.to_string(),
            value: value.to_string(),
        })
}
