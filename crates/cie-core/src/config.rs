//! CIE Configuration Management
//!
//! Handles configuration from environment variables and TOML config files
//! with sensible defaults for development.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Answer reader configuration
    pub reader: ReaderConfig,

    /// Extraction pipeline configuration
    pub extractor: ExtractorConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Reader
        if let Ok(provider) = std::env::var("READER_PROVIDER") {
            config.reader.provider = provider.parse()?;
        }
        if let Ok(url) = std::env::var("READER_BASE_URL") {
            config.reader.base_url = url;
        }
        if let Ok(model) = std::env::var("READER_MODEL") {
            config.reader.model = model;
        }
        if let Ok(key) = std::env::var("HF_API_TOKEN") {
            config.reader.api_token = Some(key);
        }
        if let Ok(top_k) = std::env::var("READER_TOP_K") {
            config.reader.top_k = top_k.parse().map_err(|_| ConfigError::InvalidValue {
                key: "READER_TOP_K".to_string(),
                value: top_k,
            })?;
        }

        // Extractor
        if let Ok(max_words) = std::env::var("EXTRACTOR_MAX_SPAN_WORDS") {
            config.extractor.max_span_words =
                max_words.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "EXTRACTOR_MAX_SPAN_WORDS".to_string(),
                    value: max_words,
                })?;
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        let env_config = Self::from_env()?;

        if env_config.reader.base_url != ReaderConfig::default().base_url {
            self.reader.base_url = env_config.reader.base_url;
        }
        if env_config.reader.model != ReaderConfig::default().model {
            self.reader.model = env_config.reader.model;
        }

        // Always use env for sensitive values
        if env_config.reader.api_token.is_some() {
            self.reader.api_token = env_config.reader.api_token;
        }

        Ok(self)
    }
}

/// Answer reader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Reader backend to use
    pub provider: ReaderProvider,

    /// Base URL of the reader service
    pub base_url: String,

    /// Model identifier (e.g. a SQuAD2-tuned checkpoint)
    pub model: String,

    /// API token for hosted inference
    pub api_token: Option<String>,

    /// Maximum candidate answers per query
    pub top_k: usize,

    /// Permit "no answer" as a valid response
    pub allow_no_answer: bool,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            provider: ReaderProvider::HuggingFace,
            base_url: "https://api-inference.huggingface.co".to_string(),
            model: "deepset/roberta-base-squad2".to_string(),
            api_token: None,
            top_k: 20,
            allow_no_answer: true,
            timeout_secs: 60,
        }
    }
}

/// Supported answer reader backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReaderProvider {
    #[default]
    HuggingFace,
    Local,
}

impl std::str::FromStr for ReaderProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            "local" => Ok(Self::Local),
            _ => Err(ConfigError::InvalidValue {
                key: "READER_PROVIDER".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Extraction pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Maximum whitespace-separated words in a clean span
    pub max_span_words: usize,

    /// Minimum span words outside the function-word stoplist
    pub min_content_words: usize,

    /// Additional stopwords merged into the built-in stoplist
    pub extra_stopwords: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_span_words: 3,
            min_content_words: 1,
            extra_stopwords: Vec::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
