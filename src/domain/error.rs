//! Domain error types

use thiserror::Error;

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected format: <number>s, <number>m, or <number>m<number>s (e.g., 30s, 1m, 2m30s)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when an unsupported language code is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid language: \"{input}\". Valid languages are: en, hi, ta, te, mr")]
pub struct InvalidLanguageError {
    pub input: String,
}

/// Error when an unknown deployment environment is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid environment: \"{input}\". Valid environments are: local, production")]
pub struct InvalidEnvironmentError {
    pub input: String,
}

/// A required job-posting field was left blank.
///
/// Raised before any request leaves the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please fill in the {field} field")]
pub struct JobValidationError {
    pub field: &'static str,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_names_field() {
        let err = JobValidationError { field: "salary" };
        assert_eq!(err.to_string(), "Please fill in the salary field");
    }

    #[test]
    fn language_error_lists_choices() {
        let err = InvalidLanguageError {
            input: "fr".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("\"fr\""));
        assert!(msg.contains("mr"));
    }
}
