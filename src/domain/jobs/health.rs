//! Backend health report

use serde::Deserialize;

/// Answer of the backend health endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: String,
    /// Whether the backend has a language model for intent extraction
    #[serde(default)]
    pub gemini_configured: bool,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}
