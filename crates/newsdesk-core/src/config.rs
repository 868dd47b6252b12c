use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{NewsdeskError, Result};

/// Environment variable carrying the news API key.
pub const NEWS_API_KEY_ENV: &str = "NEWS_API_KEY";
/// Environment variable carrying the knowledge API key.
pub const KNOWLEDGE_API_KEY_ENV: &str = "KNOWLEDGE_API_KEY";

/// Top-level configuration for the Newsdesk assistant.
///
/// Loaded from `~/.newsdesk/config.toml` by default. Each section corresponds
/// to one collaborator or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsdeskConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
}

impl NewsdeskConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: NewsdeskConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| NewsdeskError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Apply API keys from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Empty values are ignored so an exported-but-blank variable never
    /// clobbers a key from the config file.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(NEWS_API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            debug!("News API key taken from {}", NEWS_API_KEY_ENV);
            self.news.api_key = key.trim().to_string();
        }
        if let Some(key) = lookup(KNOWLEDGE_API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            debug!("Knowledge API key taken from {}", KNOWLEDGE_API_KEY_ENV);
            self.knowledge.api_key = key.trim().to_string();
        }
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Conversational assistant behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Whether the assistant accepts input at all.
    pub enabled: bool,
    /// Maximum length of a submitted message, in characters.
    pub max_message_length: usize,
    /// Maximum retrieved items attached to a single reply.
    pub max_attached_results: usize,
    /// Lower bound of the cosmetic pause before contacting a source.
    pub processing_delay_min_ms: u64,
    /// Upper bound of the cosmetic pause before contacting a source.
    pub processing_delay_max_ms: u64,
    /// Capacity of the session event channel.
    pub event_buffer: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_message_length: 2000,
            max_attached_results: 5,
            processing_delay_min_ms: 1000,
            processing_delay_max_ms: 2500,
            event_buffer: 256,
        }
    }
}

impl AssistantConfig {
    /// Configuration with no cosmetic delay, for tests and scripted use.
    pub fn without_delay() -> Self {
        Self {
            processing_delay_min_ms: 0,
            processing_delay_max_ms: 0,
            ..Self::default()
        }
    }
}

/// News search API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub base_url: String,
    pub api_key: String,
    /// Country filter for top headlines.
    pub country: String,
    /// Language filter for free-text search.
    pub language: String,
    pub page_size: u32,
    /// Sort order for free-text search.
    pub sort_by: String,
    pub timeout_secs: u64,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://newsapi.org/v2".to_string(),
            api_key: String::new(),
            country: "us".to_string(),
            language: "en".to_string(),
            page_size: 20,
            sort_by: "relevancy".to_string(),
            timeout_secs: 15,
        }
    }
}

impl NewsConfig {
    /// The API key with surrounding whitespace removed, or `None` if blank.
    pub fn credential(&self) -> Option<&str> {
        Some(self.api_key.trim()).filter(|key| !key.is_empty())
    }
}

/// General-purpose knowledge API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Base URL of the model collection; the model name is appended.
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    /// Key values that count as "not configured".
    pub placeholder_keys: Vec<String>,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            model: "gemini-pro".to_string(),
            api_key: String::new(),
            placeholder_keys: vec![
                "YOUR_API_KEY".to_string(),
                "your-api-key".to_string(),
                "changeme".to_string(),
            ],
            temperature: 0.7,
            top_k: 32,
            top_p: 1.0,
            max_output_tokens: 2048,
            timeout_secs: 30,
        }
    }
}

impl KnowledgeConfig {
    /// The trimmed API key, if it is usable.
    ///
    /// Blank keys and any of `placeholder_keys` (case-insensitive) are unset.
    pub fn credential(&self) -> Option<&str> {
        let key = self.api_key.trim();
        let placeholder = self
            .placeholder_keys
            .iter()
            .any(|p| p.eq_ignore_ascii_case(key));
        (!key.is_empty() && !placeholder).then_some(key)
    }

    pub fn has_credential(&self) -> bool {
        self.credential().is_some()
    }
}

/// Spoken output of assistant replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Whether replies are spoken when the session opens.
    pub enabled: bool,
    pub language: String,
    pub pitch: f32,
    pub rate: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            language: "en".to_string(),
            pitch: 1.0,
            rate: 0.9,
        }
    }
}
