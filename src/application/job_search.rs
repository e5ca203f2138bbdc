//! Text search and listing use case

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::board::JobBoard;
use crate::domain::jobs::{Job, JobFilter};

use super::ports::{BackendError, JobBackend};

/// Shown when listing failed with an HTTP error
pub const LOAD_FAILED: &str = "Failed to load jobs";

/// Shown when listing never reached the server
pub const CONNECT_FAILED: &str = "Failed to connect to server";

/// Shown when a text search failed
pub const SEARCH_FAILED: &str = "Failed to search jobs";

/// A list or search request that did not succeed
#[derive(Debug, Error)]
#[error("{message}")]
pub struct JobSearchError {
    pub message: String,
    #[source]
    pub source: BackendError,
}

/// Result of a list or search
#[derive(Debug)]
pub struct SearchOutput {
    pub jobs: Vec<Job>,
    /// False when a newer request already settled the board
    pub applied: bool,
}

/// Lists and searches jobs through the backend
pub struct JobSearchUseCase<B: JobBackend> {
    backend: B,
}

impl<B: JobBackend> JobSearchUseCase<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }

    /// Fetch every job and show it.
    pub async fn load_all(&self, board: &Mutex<JobBoard>) -> Result<SearchOutput, JobSearchError> {
        let ticket = board.lock().await.begin_request();
        debug!(generation = ticket.generation(), "loading jobs");

        match self.backend.list_jobs(&JobFilter::default()).await {
            Ok(jobs) => {
                info!(count = jobs.len(), "jobs loaded");
                let applied = board.lock().await.apply_jobs(ticket, jobs.clone());
                Ok(SearchOutput { jobs, applied })
            }
            Err(source) => {
                let message = match &source {
                    BackendError::Network(_) => CONNECT_FAILED,
                    _ => LOAD_FAILED,
                };
                warn!(error = %source, "loading jobs failed");
                board.lock().await.apply_failure(ticket, message);
                Err(JobSearchError {
                    message: message.to_string(),
                    source,
                })
            }
        }
    }

    /// Search by keyword. A blank query lists everything.
    pub async fn search(
        &self,
        query: &str,
        board: &Mutex<JobBoard>,
    ) -> Result<SearchOutput, JobSearchError> {
        self.search_filtered(&JobFilter::keyword(query), board).await
    }

    /// Search by keyword and place. An empty filter lists everything.
    pub async fn search_filtered(
        &self,
        filter: &JobFilter,
        board: &Mutex<JobBoard>,
    ) -> Result<SearchOutput, JobSearchError> {
        if filter.is_empty() {
            return self.load_all(board).await;
        }

        let ticket = board.lock().await.begin_request();
        debug!(
            generation = ticket.generation(),
            query = ?filter.query,
            location = ?filter.location,
            "searching jobs"
        );

        match self.backend.list_jobs(filter).await {
            Ok(jobs) => {
                info!(count = jobs.len(), query = ?filter.query, "search finished");
                let applied = board.lock().await.apply_jobs(ticket, jobs.clone());
                Ok(SearchOutput { jobs, applied })
            }
            Err(source) => {
                warn!(error = %source, query = ?filter.query, "search failed");
                board.lock().await.apply_failure(ticket, SEARCH_FAILED);
                Err(JobSearchError {
                    message: SEARCH_FAILED.to_string(),
                    source,
                })
            }
        }
    }
}
