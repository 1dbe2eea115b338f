//! Configuration loading and validation.

use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Extraction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Fixed UTC offset such as "+08:00"; system local time when absent
    #[serde(default)]
    pub timezone: Option<String>,

    /// Base date (YYYY-MM-DD) for time-only notations; today when absent
    #[serde(default)]
    pub base_date: Option<String>,
}

impl ExtractionConfig {
    /// Parsed fixed offset, if one is configured.
    pub fn fixed_offset(&self) -> Result<Option<FixedOffset>, ConfigError> {
        self.timezone
            .as_deref()
            .map(|tz| {
                tz.parse::<FixedOffset>().map_err(|e| {
                    ConfigError::ValidationError(format!("Invalid timezone offset {:?}: {}", tz, e))
                })
            })
            .transpose()
    }

    /// Parsed base date, if one is configured.
    pub fn base_date(&self) -> Result<Option<NaiveDate>, ConfigError> {
        self.base_date
            .as_deref()
            .map(|d| {
                NaiveDate::parse_from_str(d, "%Y-%m-%d").map_err(|e| {
                    ConfigError::ValidationError(format!(
                        "Invalid base date {:?} (expected YYYY-MM-DD): {}",
                        d, e
                    ))
                })
            })
            .transpose()
    }
}

/// Display configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Print the multi-line duration breakdown
    #[serde(default)]
    pub detailed: bool,
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub extraction: ExtractionConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            extraction: ExtractionConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Log level must not be empty".to_string(),
            ));
        }

        self.extraction.fixed_offset()?;
        self.extraction.base_date()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, "info");
        assert!(config.extraction.timezone.is_none());
        assert!(config.extraction.base_date.is_none());
        assert!(!config.display.detailed);
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fixed_offset() {
        let mut config = AppConfig::default();
        config.extraction.timezone = Some("+08:00".to_string());

        let offset = config.extraction.fixed_offset().unwrap().unwrap();
        assert_eq!(offset.local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn test_config_validation_bad_timezone() {
        let mut config = AppConfig::default();
        config.extraction.timezone = Some("Mars/Olympus".to_string());

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_base_date() {
        let mut config = AppConfig::default();
        config.extraction.base_date = Some("2024-03-05".to_string());

        assert_eq!(
            config.extraction.base_date().unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
    }

    #[test]
    fn test_config_validation_bad_base_date() {
        let mut config = AppConfig::default();
        config.extraction.base_date = Some("2024-02-30".to_string());

        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_config_validation_empty_log_level() {
        let mut config = AppConfig::default();
        config.log_level = " ".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let mut config = AppConfig::default();
        config.extraction.timezone = Some("-05:00".to_string());
        let toml_str = toml::to_string(&config).unwrap();

        // Should be parseable
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.extraction.timezone.as_deref(), Some("-05:00"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "log_level = \"debug\"\n\n[extraction]\ntimezone = \"+09:00\"\n\n[display]\ndetailed = true"
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.extraction.timezone.as_deref(), Some("+09:00"));
        assert!(config.display.detailed);
    }

    #[test]
    fn test_from_file_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = ").unwrap();

        assert!(matches!(
            AppConfig::from_file(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.log_level, "info");
    }
}
