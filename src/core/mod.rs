pub mod config;
pub mod secrets;

pub use config::{AppConfig, ConfigError};
