use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::{CoachError, Result};

pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const YOUTUBE_API_KEY_ENV: &str = "YOUTUBE_API_KEY";

/// Coach configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Generative-text API
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Video search API
    #[serde(default)]
    pub youtube: YoutubeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoutubeConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_youtube_base_url")]
    pub base_url: String,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_youtube_base_url() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}

fn default_max_results() -> u32 {
    10
}

fn default_timeout() -> u64 {
    120
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_gemini_base_url(),
            model: default_gemini_model(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_youtube_base_url(),
            max_results: default_max_results(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        info!(
            model = %config.gemini.model,
            max_results = config.youtube.max_results,
            "configuration loaded"
        );
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CoachError::Config(e.to_string()))
    }

    /// Fill API keys from the environment. Environment values win over the file.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    fn apply_env_with<F: Fn(&str) -> Option<String>>(&mut self, lookup: F) {
        if let Some(key) = lookup(GEMINI_API_KEY_ENV).filter(|k| !k.is_empty()) {
            self.gemini.api_key = Some(key);
        }
        if let Some(key) = lookup(YOUTUBE_API_KEY_ENV).filter(|k| !k.is_empty()) {
            self.youtube.api_key = Some(key);
        }
    }

    /// Load from an optional file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }
}
