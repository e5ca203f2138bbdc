//! Job backend port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::jobs::{HealthStatus, Job, JobFilter, NewJob};

/// Errors talking to the backend
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("Could not reach the server: {0}")]
    Network(String),

    #[error("Server returned HTTP {status}: {}", message.as_deref().unwrap_or("no details"))]
    Server {
        status: u16,
        /// `error` field of the response body, when the server sent one
        message: Option<String>,
    },

    #[error("Unexpected response from the server: {0}")]
    MalformedResponse(String),

    #[error("Failed to prepare request: {0}")]
    Encoding(String),
}

impl BackendError {
    /// Message the server itself provided, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Server { status: 404, .. })
    }
}

/// Port for the job storage and search service
#[async_trait]
pub trait JobBackend: Send + Sync {
    /// List the jobs matching `filter`; an empty filter lists all
    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>, BackendError>;

    /// Create a job and return it as stored
    async fn create_job(&self, job: &NewJob) -> Result<Job, BackendError>;

    /// Delete a job by id
    async fn delete_job(&self, id: &str) -> Result<(), BackendError>;

    /// Report backend health
    async fn health(&self) -> Result<HealthStatus, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_ignores_blank() {
        let err = BackendError::Server {
            status: 500,
            message: Some("  ".to_string()),
        };
        assert!(err.server_message().is_none());

        let err = BackendError::Server {
            status: 500,
            message: Some("too loud".to_string()),
        };
        assert_eq!(err.server_message(), Some("too loud"));
        assert_eq!(err.to_string(), "Server returned HTTP 500: too loud");
    }

    #[test]
    fn not_found() {
        let err = BackendError::Server {
            status: 404,
            message: None,
        };
        assert!(err.is_not_found());
        assert!(!BackendError::Network("refused".into()).is_not_found());
        assert_eq!(err.to_string(), "Server returned HTTP 404: no details");
    }
}
