//! Job posting and removal use case

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::domain::board::JobBoard;
use crate::domain::error::JobValidationError;
use crate::domain::jobs::{HealthStatus, Job, JobDraft};

use super::job_search::JobSearchUseCase;
use super::ports::{BackendError, JobBackend};

pub const POSTED: &str = "Job posted successfully!";
pub const POST_FAILED: &str = "Failed to post job";
pub const DELETED: &str = "Job deleted successfully!";
pub const NOT_FOUND: &str = "Job not found";
pub const DELETE_FAILED: &str = "Failed to delete job";

/// Errors from posting or deleting jobs
#[derive(Debug, Error)]
pub enum JobAdminError {
    /// The form was incomplete; nothing was sent
    #[error(transparent)]
    Validation(#[from] JobValidationError),

    #[error("{message}")]
    Request {
        message: String,
        #[source]
        source: BackendError,
    },
}

impl JobAdminError {
    fn request(source: BackendError, fallback: &str) -> Self {
        let message = source.server_message().unwrap_or(fallback).to_string();
        Self::Request { message, source }
    }
}

/// Posts and deletes jobs, reloading the board afterwards
pub struct JobAdminUseCase<B: JobBackend> {
    search: JobSearchUseCase<B>,
}

impl<B: JobBackend> JobAdminUseCase<B> {
    pub fn new(backend: B) -> Self {
        Self {
            search: JobSearchUseCase::new(backend),
        }
    }

    fn backend(&self) -> &B {
        self.search.backend()
    }

    /// Validate and post a job, then reload the full list.
    pub async fn post(&self, draft: &JobDraft, board: &Mutex<JobBoard>) -> Result<Job, JobAdminError> {
        let new_job = match draft.validate() {
            Ok(new_job) => new_job,
            Err(err) => {
                board.lock().await.fail(err.to_string());
                return Err(err.into());
            }
        };

        match self.backend().create_job(&new_job).await {
            Ok(job) => {
                info!(id = %job.id, title = %job.title, "job posted");
                board.lock().await.succeed(POSTED);
                self.reload(board).await;
                Ok(job)
            }
            Err(source) => {
                warn!(error = %source, "posting job failed");
                let err = JobAdminError::request(source, POST_FAILED);
                board.lock().await.fail(err.to_string());
                Err(err)
            }
        }
    }

    /// Delete a job by id, then reload the full list.
    pub async fn delete(&self, id: &str, board: &Mutex<JobBoard>) -> Result<(), JobAdminError> {
        match self.backend().delete_job(id).await {
            Ok(()) => {
                info!(%id, "job deleted");
                board.lock().await.succeed(DELETED);
                self.reload(board).await;
                Ok(())
            }
            Err(source) => {
                warn!(error = %source, %id, "deleting job failed");
                let fallback = if source.is_not_found() {
                    NOT_FOUND
                } else {
                    DELETE_FAILED
                };
                let err = JobAdminError::request(source, fallback);
                board.lock().await.fail(err.to_string());
                Err(err)
            }
        }
    }

    /// Ask the backend whether it is up
    pub async fn health(&self) -> Result<HealthStatus, BackendError> {
        self.backend().health().await
    }

    // A failed reload only shows on the board; the change itself went through.
    async fn reload(&self, board: &Mutex<JobBoard>) {
        if let Err(err) = self.search.load_all(board).await {
            warn!(error = %err, "reload after change failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::job_search::tests::{job, MockJobBackend};

    fn draft() -> JobDraft {
        JobDraft {
            title: "Plumber".to_string(),
            company: "FixIt".to_string(),
            location: "Hyderabad".to_string(),
            salary: "₹25,000/month".to_string(),
            skills: "pipes, fittings".to_string(),
            contact: "+91 9000000000".to_string(),
            description: "Residential plumbing work".to_string(),
        }
    }

    #[tokio::test]
    async fn post_creates_and_reloads() {
        let use_case = JobAdminUseCase::new(MockJobBackend::with_jobs(vec![job("1", "Driver")]));
        let board = Mutex::new(JobBoard::new());

        let posted = use_case.post(&draft(), &board).await.unwrap();

        assert_eq!(posted.title, "Plumber");
        let created = use_case.backend().created.lock().unwrap().clone();
        assert_eq!(created[0].skills, vec!["pipes", "fittings"]);

        let board = board.lock().await;
        assert_eq!(board.success(), Some(POSTED));
        assert_eq!(board.jobs().len(), 2);
    }

    #[tokio::test]
    async fn failed_reload_still_returns_posted_job() {
        let use_case = JobAdminUseCase::new(MockJobBackend {
            listing_failure: Some(BackendError::Network("reset".to_string())),
            ..MockJobBackend::default()
        });
        let board = Mutex::new(JobBoard::new());

        let posted = use_case.post(&draft(), &board).await.unwrap();

        assert_eq!(posted.title, "Plumber");
        assert_eq!(use_case.backend().created.lock().unwrap().len(), 1);
        assert_eq!(use_case.backend().queries.lock().unwrap().len(), 1);
        assert!(board.lock().await.error().is_some());
    }

    #[tokio::test]
    async fn blank_field_fails_without_request() {
        let use_case = JobAdminUseCase::new(MockJobBackend::default());
        let board = Mutex::new(JobBoard::new());
        let incomplete = JobDraft {
            company: "  ".to_string(),
            ..draft()
        };

        let err = use_case.post(&incomplete, &board).await.unwrap_err();

        assert!(matches!(err, JobAdminError::Validation(_)));
        assert_eq!(err.to_string(), "Please fill in the company field");
        assert_eq!(use_case.backend().calls(), 0);
        assert_eq!(
            board.lock().await.error(),
            Some("Please fill in the company field")
        );
    }

    #[tokio::test]
    async fn post_failure_uses_server_message() {
        let use_case = JobAdminUseCase::new(MockJobBackend::failing(BackendError::Server {
            status: 400,
            message: Some("Missing required field: salary".to_string()),
        }));
        let board = Mutex::new(JobBoard::new());

        let err = use_case.post(&draft(), &board).await.unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: salary");

        let use_case = JobAdminUseCase::new(MockJobBackend::failing(BackendError::Network(
            "timed out".to_string(),
        )));
        let err = use_case.post(&draft(), &board).await.unwrap_err();
        assert_eq!(err.to_string(), POST_FAILED);
        assert!(board.lock().await.success().is_none());
    }

    #[tokio::test]
    async fn delete_removes_and_reloads() {
        let use_case = JobAdminUseCase::new(MockJobBackend::with_jobs(vec![
            job("1", "Driver"),
            job("2", "Cook"),
        ]));
        let board = Mutex::new(JobBoard::new());

        use_case.delete("1", &board).await.unwrap();

        let board = board.lock().await;
        assert_eq!(board.success(), Some(DELETED));
        assert_eq!(board.jobs().len(), 1);
        assert_eq!(board.jobs()[0].id, "2");
    }

    #[tokio::test]
    async fn delete_unknown_reports_not_found() {
        let use_case = JobAdminUseCase::new(MockJobBackend::failing(BackendError::Server {
            status: 404,
            message: None,
        }));
        let board = Mutex::new(JobBoard::new());

        let err = use_case.delete("42", &board).await.unwrap_err();
        assert_eq!(err.to_string(), NOT_FOUND);

        let use_case = JobAdminUseCase::new(MockJobBackend::failing(BackendError::Server {
            status: 500,
            message: None,
        }));
        let err = use_case.delete("42", &board).await.unwrap_err();
        assert_eq!(err.to_string(), DELETE_FAILED);
        assert_eq!(board.lock().await.error(), Some(DELETE_FAILED));
    }

    #[tokio::test]
    async fn health_passes_through() {
        let use_case = JobAdminUseCase::new(MockJobBackend::default());
        let health = use_case.health().await.unwrap();
        assert!(health.is_healthy());
        assert!(health.gemini_configured);
    }
}
