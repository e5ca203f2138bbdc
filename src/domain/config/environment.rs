//! Deployment environment value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidEnvironmentError;

/// Backend used during local development
pub const LOCAL_API_URL: &str = "http://localhost:5000/api";

/// Backend used by deployed clients
pub const PRODUCTION_API_URL: &str = "https://your-backend-url.com/api";

/// Which backend deployment to talk to when no explicit URL is configured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    #[default]
    Local,
    Production,
}

impl Environment {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Production => "production",
        }
    }

    /// Default API base URL for this environment
    pub const fn api_url(&self) -> &'static str {
        match self {
            Self::Local => LOCAL_API_URL,
            Self::Production => PRODUCTION_API_URL,
        }
    }
}

impl FromStr for Environment {
    type Err = InvalidEnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "development" | "dev" => Ok(Self::Local),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(InvalidEnvironmentError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
