//! Application configuration value object

use serde::{Deserialize, Serialize};

use super::environment::Environment;
use crate::domain::jobs::Language;
use crate::domain::recording::Duration;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Explicit API base URL; wins over `environment`
    pub api_url: Option<String>,
    pub environment: Option<String>,
    pub language: Option<String>,
    pub max_duration: Option<String>,
    pub play_reply: Option<bool>,
    pub request_timeout: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            api_url: None,
            environment: Some(Environment::default().to_string()),
            language: Some(Language::default().to_string()),
            max_duration: Some(Duration::default_max_duration().to_string()),
            play_reply: Some(true),
            request_timeout: Some(Duration::default_request_timeout().to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_url: other.api_url.or(self.api_url),
            environment: other.environment.or(self.environment),
            language: other.language.or(self.language),
            max_duration: other.max_duration.or(self.max_duration),
            play_reply: other.play_reply.or(self.play_reply),
            request_timeout: other.request_timeout.or(self.request_timeout),
        }
    }

    /// Get environment, or local if not set/invalid
    pub fn environment_or_default(&self) -> Environment {
        self.environment
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// API base URL: the explicit one if set, otherwise the environment's.
    /// A trailing slash is removed.
    pub fn api_url_or_default(&self) -> String {
        let url = self
            .api_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| self.environment_or_default().api_url());
        url.trim_end_matches('/').to_string()
    }

    /// Get language as parsed Language, or English if not set/invalid
    pub fn language_or_default(&self) -> Language {
        self.language
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Whether to play the spoken reply, true if not set
    pub fn play_reply_or_default(&self) -> bool {
        self.play_reply.unwrap_or(true)
    }
}
