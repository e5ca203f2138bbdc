//! Spoken reply playback port

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during reply playback
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// Could not download the reply audio
    #[error("Failed to fetch reply audio: {0}")]
    FetchFailed(String),

    /// The reply is not in a playable format
    #[error("Unsupported reply audio: {0}")]
    Decode(String),

    /// Failed to play the audio
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    /// No audio output device available
    #[error("Audio device not available: {0}")]
    DeviceNotAvailable(String),
}

/// Port trait for playing the synthesized reply
#[async_trait]
pub trait ReplyPlayer: Send + Sync {
    /// Fetch and play the audio at `url`, resolving once playback ends
    async fn play(&self, url: &str) -> Result<(), PlaybackError>;
}
