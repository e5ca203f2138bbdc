//! Voice query port interface

use async_trait::async_trait;

use super::job_backend::BackendError;
use crate::domain::jobs::{Language, VoiceQueryResult};
use crate::domain::recording::AudioPayload;

/// Port for the transcription and intent service
#[async_trait]
pub trait VoiceBackend: Send + Sync {
    /// Submit a recorded query.
    ///
    /// # Arguments
    /// * `payload` - The finalized recording
    /// * `language` - Language the user spoke
    ///
    /// # Returns
    /// Transcript, intent, matching jobs and an optional spoken reply
    async fn process_voice(
        &self,
        payload: &AudioPayload,
        language: Language,
    ) -> Result<VoiceQueryResult, BackendError>;
}
