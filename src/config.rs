use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{MailError, Result};

/// Environment variable naming the language-resource directory
pub const NLP_DATA_ENV: &str = "SENT_MAIL_ANALYSIS_NLP_DATA";

/// Largest page the Gmail list endpoint will return
const MAX_PAGE_SIZE: u32 = 500;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Label whose messages are listed
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Abort the run instead of analyzing an empty corpus when fetching fails
    #[serde(default)]
    pub fail_on_error: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            label: default_label(),
            page_size: default_page_size(),
            request_timeout_secs: default_request_timeout_secs(),
            fail_on_error: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Directory holding `corpora/stopwords/english` and `entities.toml`
    #[serde(default)]
    pub nlp_data_dir: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            nlp_data_dir: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_label() -> String {
    "SENT".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_top_k() -> usize {
    10
}

impl Config {
    /// Load configuration, falling back to defaults when the file is absent.
    ///
    /// Environment overrides are applied here, once, before validation.
    pub async fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = tokio::fs::read_to_string(path).await.map_err(|e| {
                MailError::ConfigError(format!("Failed to read config file: {}", e))
            })?;

            let config: Self = toml::from_str(&content).map_err(|e| {
                MailError::ConfigError(format!("Failed to parse config file: {}", e))
            })?;

            tracing::info!("Loaded configuration from {:?}", path);
            config
        } else {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `SENT_MAIL_ANALYSIS_NLP_DATA` over the file value
    pub fn apply_env_overrides(&mut self) {
        if let Some(dir) = std::env::var_os(NLP_DATA_ENV).filter(|v| !v.is_empty()) {
            tracing::debug!("{} overrides analysis.nlp_data_dir", NLP_DATA_ENV);
            self.analysis.nlp_data_dir = Some(PathBuf::from(dir));
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.fetch.label.trim().is_empty() {
            return Err(MailError::ConfigError(
                "fetch.label cannot be empty".to_string(),
            ));
        }

        if self.fetch.page_size == 0 {
            return Err(MailError::ConfigError(
                "fetch.page_size must be at least 1".to_string(),
            ));
        }
        if self.fetch.page_size > MAX_PAGE_SIZE {
            return Err(MailError::ConfigError(format!(
                "fetch.page_size cannot exceed {} (Gmail API maximum)",
                MAX_PAGE_SIZE
            )));
        }

        if self.fetch.request_timeout_secs == 0 {
            return Err(MailError::ConfigError(
                "fetch.request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.analysis.top_k == 0 {
            return Err(MailError::ConfigError(
                "analysis.top_k must be greater than 0".to_string(),
            ));
        }

        if let Some(dir) = &self.analysis.nlp_data_dir {
            if !dir.is_dir() {
                return Err(MailError::ConfigError(format!(
                    "analysis.nlp_data_dir {:?} is not a directory",
                    dir
                )));
            }
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.fetch.label, "SENT");
        assert_eq!(config.fetch.page_size, 100);
        assert_eq!(config.fetch.request_timeout_secs, 30);
        assert!(!config.fetch.fail_on_error);
        assert_eq!(config.analysis.top_k, 10);
        assert!(config.analysis.nlp_data_dir.is_none());
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_page_size_bounds() {
        let mut config = Config::default();

        config.fetch.page_size = 0;
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("at least 1"));

        config.fetch.page_size = 501;
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("cannot exceed 500"));

        config.fetch.page_size = 1;
        assert!(config.validate().is_ok());
        config.fetch.page_size = 500;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_rejects_zero_values() {
        let mut config = Config::default();
        config.fetch.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.analysis.top_k = 0;
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("top_k must be greater than 0"));

        let mut config = Config::default();
        config.fetch.label = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_missing_data_dir() {
        let mut config = Config::default();
        config.analysis.nlp_data_dir = Some(PathBuf::from("/nonexistent/nlp-data-12345"));
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("is not a directory"));
    }

    #[tokio::test]
    #[serial]
    async fn test_config_load_nonexistent_returns_default() {
        std::env::remove_var(NLP_DATA_ENV);
        let config = Config::load(Path::new("/tmp/nonexistent-config-12345.toml"))
            .await
            .unwrap();

        assert_eq!(config.fetch.page_size, 100);
        assert_eq!(config.analysis.top_k, 10);
    }

    #[tokio::test]
    #[serial]
    async fn test_config_load_invalid_toml() {
        let temp_file = NamedTempFile::new().unwrap();
        tokio::fs::write(temp_file.path(), "this is not valid toml {[}]")
            .await
            .unwrap();

        let result = Config::load(temp_file.path()).await;
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to parse config file"));
    }

    #[tokio::test]
    #[serial]
    async fn test_config_partial_with_defaults() {
        std::env::remove_var(NLP_DATA_ENV);
        let temp_file = NamedTempFile::new().unwrap();
        let partial_config = r#"
[fetch]
page_size = 250
fail_on_error = true

[output]
format = "json"
"#;
        tokio::fs::write(temp_file.path(), partial_config)
            .await
            .unwrap();

        let config = Config::load(temp_file.path()).await.unwrap();

        assert_eq!(config.fetch.page_size, 250);
        assert!(config.fetch.fail_on_error);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.fetch.label, "SENT");
        assert_eq!(config.analysis.top_k, 10);
    }

    #[tokio::test]
    #[serial]
    async fn test_env_overrides_nlp_data_dir() {
        let data_dir = TempDir::new().unwrap();
        std::env::set_var(NLP_DATA_ENV, data_dir.path());

        let config = Config::load(Path::new("/tmp/nonexistent-config-12345.toml"))
            .await
            .unwrap();
        std::env::remove_var(NLP_DATA_ENV);

        assert_eq!(
            config.analysis.nlp_data_dir.as_deref(),
            Some(data_dir.path())
        );
    }

    #[test]
    #[serial]
    fn test_empty_env_value_is_ignored() {
        std::env::set_var(NLP_DATA_ENV, "");
        let mut config = Config::default();
        config.apply_env_overrides();
        std::env::remove_var(NLP_DATA_ENV);

        assert!(config.analysis.nlp_data_dir.is_none());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut config = Config::default();
        config.output.format = OutputFormat::Json;

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(deserialized.fetch.page_size, config.fetch.page_size);
        assert_eq!(deserialized.output.format, OutputFormat::Json);
    }
}
