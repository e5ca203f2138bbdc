//! Displayed job list and status banners

use crate::domain::jobs::{Job, VoiceQueryResult};

/// Identity of one list/search/voice request.
///
/// Tickets are handed out in increasing order; a completion is applied only
/// if its ticket is newer than the last one that settled the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// View state shared by the voice and text search paths
#[derive(Debug, Default)]
pub struct JobBoard {
    jobs: Vec<Job>,
    voice_result: Option<VoiceQueryResult>,
    error: Option<String>,
    success: Option<String>,
    issued: u64,
    settled: u64,
}

impl JobBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jobs currently on display
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Most recent applied voice result
    pub fn voice_result(&self) -> Option<&VoiceQueryResult> {
        self.voice_result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    /// True while a request newer than the last settled one is outstanding
    pub fn is_loading(&self) -> bool {
        self.issued > self.settled
    }

    /// Register a new request
    pub fn begin_request(&mut self) -> RequestTicket {
        self.issued += 1;
        RequestTicket(self.issued)
    }

    /// Whether a completion for `ticket` would still be applied
    pub fn is_fresh(&self, ticket: RequestTicket) -> bool {
        ticket.0 > self.settled
    }

    fn settle(&mut self, ticket: RequestTicket) -> bool {
        if !self.is_fresh(ticket) {
            return false;
        }
        self.settled = ticket.0;
        true
    }

    /// Replace the displayed list. Returns false for stale completions.
    pub fn apply_jobs(&mut self, ticket: RequestTicket, jobs: Vec<Job>) -> bool {
        if !self.settle(ticket) {
            return false;
        }
        self.jobs = jobs;
        self.error = None;
        true
    }

    /// Store a voice result and show its jobs. Returns false for stale completions.
    pub fn apply_voice_result(&mut self, ticket: RequestTicket, result: VoiceQueryResult) -> bool {
        if !self.settle(ticket) {
            return false;
        }
        self.jobs = result.jobs.clone();
        self.voice_result = Some(result);
        self.error = None;
        true
    }

    /// Record a failed request. The displayed list is left as is.
    /// Returns false for stale completions.
    pub fn apply_failure(&mut self, ticket: RequestTicket, message: impl Into<String>) -> bool {
        if !self.settle(ticket) {
            return false;
        }
        self.fail(message);
        true
    }

    /// Show an error that is not tied to a request
    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.success = None;
    }

    /// Show a success banner
    pub fn succeed(&mut self, message: impl Into<String>) {
        self.success = Some(message.into());
        self.error = None;
    }

    /// Clear both banners, e.g. when the user starts a new action
    pub fn clear_banners(&mut self) {
        self.error = None;
        self.success = None;
    }
}
