//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::{MonitorConfig, ResolvedConfig};
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

/// Load, parse, and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ResolvedConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let raw: MonitorConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    let services = validate_config(&raw).map_err(ConfigError::Validation)?;

    Ok(ResolvedConfig {
        services,
        checks: raw.checks,
        alerting: raw.alerting,
        retention: raw.retention,
        storage: raw.storage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_minimal_config_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[[services]]
name = "web"
url = "https://example.org/healthz"
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.services.len(), 1);
        assert_eq!(config.checks.interval_secs, 60);
        assert_eq!(config.checks.max_retries, 3);
        assert_eq!(config.retention.days, 60);
        assert!(config.alerting.webhook_url.is_empty());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/statuswatch.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn empty_service_list_fails_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[checks]\ninterval_secs = 30\n").unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
