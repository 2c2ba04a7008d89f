//! Tests for loading configuration from the environment and the
//! secrets file. These touch process-wide environment variables so they
//! run serially.

#[cfg(test)]
mod tests {
    use std::env;
    use std::io::Write;
    use std::time::Duration;

    use serial_test::serial;
    use tempfile::NamedTempFile;

    use spark::core::{AppConfig, ConfigError};

    const VARS: [&str; 6] = [
        "GOOGLE_API_KEY",
        "SPARK_SECRETS_PATH",
        "SPARK_GEMINI_API_HOST",
        "SPARK_GEMINI_MODEL",
        "SPARK_REQUEST_TIMEOUT_SECS",
        "SPARK_SESSION_IDLE_SECS",
    ];

    fn clear_env() {
        for name in VARS {
            unsafe { env::remove_var(name) };
        }
    }

    fn secrets_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    fn point_at(file: &NamedTempFile) {
        unsafe { env::set_var("SPARK_SECRETS_PATH", file.path()) };
    }

    #[test]
    #[serial]
    fn it_loads_defaults_with_a_secrets_file() {
        clear_env();
        let file = secrets_file("GOOGLE_API_KEY = 'file-key'\n");
        point_at(&file);

        let config = AppConfig::load().unwrap();

        assert_eq!(config.gemini_api_key, "file-key");
        assert_eq!(
            config.gemini_api_hostname,
            "https://generativelanguage.googleapis.com"
        );
        assert_eq!(config.gemini_model, "gemini-1.5-flash");
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.session_idle_timeout, Duration::from_secs(3600));
    }

    #[test]
    #[serial]
    fn the_environment_overrides_the_secrets_file() {
        clear_env();
        let file = secrets_file("GOOGLE_API_KEY = 'file-key'\n");
        point_at(&file);
        unsafe {
            env::set_var("GOOGLE_API_KEY", "env-key");
            env::set_var("SPARK_GEMINI_MODEL", "gemini-2.0-flash");
            env::set_var("SPARK_REQUEST_TIMEOUT_SECS", "15");
        }

        let config = AppConfig::load().unwrap();
        clear_env();

        assert_eq!(config.gemini_api_key, "env-key");
        assert_eq!(config.gemini_model, "gemini-2.0-flash");
        assert_eq!(config.request_timeout, Duration::from_secs(15));
    }

    #[test]
    #[serial]
    fn it_fails_without_a_key() {
        clear_env();
        unsafe { env::set_var("SPARK_SECRETS_PATH", "/nonexistent/spark/secrets.toml") };

        let err = AppConfig::load().unwrap_err();
        clear_env();

        assert!(matches!(err, ConfigError::MissingKey(_)));
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
        assert!(err.remediation().contains("/nonexistent/spark/secrets.toml"));
    }

    #[test]
    #[serial]
    fn it_fails_on_a_blank_key() {
        clear_env();
        let file = secrets_file("GOOGLE_API_KEY = '   '\n");
        point_at(&file);

        let err = AppConfig::load().unwrap_err();
        clear_env();

        assert!(matches!(err, ConfigError::EmptyKey));
    }

    #[test]
    #[serial]
    fn it_fails_on_an_invalid_timeout() {
        clear_env();
        unsafe {
            env::set_var("GOOGLE_API_KEY", "env-key");
            env::set_var("SPARK_SESSION_IDLE_SECS", "forever");
        }

        let err = AppConfig::load().unwrap_err();
        clear_env();

        match err {
            ConfigError::InvalidSetting { name, value } => {
                assert_eq!(name, "SPARK_SESSION_IDLE_SECS");
                assert_eq!(value, "forever");
            }
            other => panic!("Unexpected error: {other}"),
        }
    }
}
