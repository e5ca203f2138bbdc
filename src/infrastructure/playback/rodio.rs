//! Rodio-based reply player
//!
//! Downloads the synthesized answer and plays it on the default output.

use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink};
use tracing::debug;

use crate::application::ports::{PlaybackError, ReplyPlayer};

/// Reply player using rodio
pub struct RodioReplyPlayer {
    client: reqwest::Client,
}

impl RodioReplyPlayer {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self { client }
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, PlaybackError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PlaybackError::FetchFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlaybackError::FetchFailed(format!("HTTP {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PlaybackError::FetchFailed(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ReplyPlayer for RodioReplyPlayer {
    async fn play(&self, url: &str) -> Result<(), PlaybackError> {
        let audio = self.fetch(url).await?;
        debug!(bytes = audio.len(), "reply audio fetched");

        // The output stream is not Send; it lives and dies on the blocking thread.
        tokio::task::spawn_blocking(move || play_sync(audio))
            .await
            .map_err(|e| PlaybackError::PlaybackFailed(format!("Task join error: {}", e)))?
    }
}

fn play_sync(audio: Vec<u8>) -> Result<(), PlaybackError> {
    let source = Decoder::new(Cursor::new(audio)).map_err(|e| PlaybackError::Decode(e.to_string()))?;

    let (_stream, handle) =
        OutputStream::try_default().map_err(|e| PlaybackError::DeviceNotAvailable(e.to_string()))?;
    let sink = Sink::try_new(&handle).map_err(|e| PlaybackError::PlaybackFailed(e.to_string()))?;

    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}
