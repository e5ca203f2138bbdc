//! Microphone port interface

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use crate::domain::recording::{AudioEncoding, AudioFragment};

/// Microphone access errors
#[derive(Debug, Clone, Error)]
pub enum DeviceAccessError {
    #[error("No audio input device available")]
    NoInputDevice,

    #[error("Microphone access denied: {0}")]
    Denied(String),

    #[error("Microphone unavailable: {0}")]
    Unavailable(String),

    #[error("Microphone stream failed: {0}")]
    StreamFailed(String),
}

impl DeviceAccessError {
    /// Message suitable for the status line
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::StreamFailed(_) => "Recording was interrupted. Please try again.",
            _ => "Failed to access microphone. Please allow microphone access.",
        }
    }
}

/// Something the input device reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// Audio arrived
    Fragment(AudioFragment),
    /// The device stream broke; no more audio will follow
    Failed(String),
    /// The device was released after a stop request
    Stopped,
}

/// A live capture: events from the device plus the means to stop it.
///
/// Dropping the stream asks the device to stop, so the microphone is
/// released on every path out of a recording.
#[derive(Debug)]
pub struct CaptureStream {
    encoding: AudioEncoding,
    events: mpsc::UnboundedReceiver<CaptureEvent>,
    stop: Option<oneshot::Sender<()>>,
}

impl CaptureStream {
    pub fn new(
        encoding: AudioEncoding,
        events: mpsc::UnboundedReceiver<CaptureEvent>,
        stop: oneshot::Sender<()>,
    ) -> Self {
        Self {
            encoding,
            events,
            stop: Some(stop),
        }
    }

    pub fn encoding(&self) -> AudioEncoding {
        self.encoding
    }

    /// Ask the device to stop and collect every fragment it delivered first,
    /// in arrival order.
    pub async fn finish(mut self) -> Result<Vec<AudioFragment>, DeviceAccessError> {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }

        let mut fragments = Vec::new();
        while let Some(event) = self.events.recv().await {
            match event {
                CaptureEvent::Fragment(fragment) => fragments.push(fragment),
                CaptureEvent::Failed(reason) => return Err(DeviceAccessError::StreamFailed(reason)),
                CaptureEvent::Stopped => break,
            }
        }
        Ok(fragments)
    }
}

impl Drop for CaptureStream {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

/// Port for exclusive access to an audio input device
#[async_trait]
pub trait Microphone: Send + Sync {
    /// Acquire the device and start streaming fragments.
    ///
    /// # Returns
    /// A live capture, or an error if access was denied or no device exists
    async fn open(&self) -> Result<CaptureStream, DeviceAccessError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const PCM: AudioEncoding = AudioEncoding::Pcm16Mono { sample_rate: 16_000 };

    #[tokio::test]
    async fn finish_collects_until_stopped() {
        let (tx, rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = oneshot::channel();
        let stream = CaptureStream::new(PCM, rx, stop_tx);

        tx.send(CaptureEvent::Fragment(AudioFragment::new(vec![1]))).unwrap();
        tx.send(CaptureEvent::Fragment(AudioFragment::new(vec![2, 3]))).unwrap();

        let device = tokio::spawn(async move {
            stop_rx.await.unwrap();
            tx.send(CaptureEvent::Fragment(AudioFragment::new(vec![4]))).unwrap();
            tx.send(CaptureEvent::Stopped).unwrap();
        });

        let fragments = stream.finish().await.unwrap();
        device.await.unwrap();
        let bytes: Vec<u8> = fragments.iter().flat_map(|f| f.as_bytes().to_vec()).collect();
        assert_eq!(bytes, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn finish_reports_stream_failure() {
        let (tx, rx) = mpsc::unbounded_channel();
        let (stop_tx, _stop_rx) = oneshot::channel();
        let stream = CaptureStream::new(PCM, rx, stop_tx);

        tx.send(CaptureEvent::Fragment(AudioFragment::new(vec![1]))).unwrap();
        tx.send(CaptureEvent::Failed("device unplugged".to_string())).unwrap();

        let err = stream.finish().await.unwrap_err();
        assert!(matches!(err, DeviceAccessError::StreamFailed(ref r) if r == "device unplugged"));
    }

    #[tokio::test]
    async fn finish_ends_when_device_side_closes() {
        let (tx, rx) = mpsc::unbounded_channel();
        let (stop_tx, _stop_rx) = oneshot::channel();
        let stream = CaptureStream::new(PCM, rx, stop_tx);
        drop(tx);
        assert!(stream.finish().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn drop_signals_stop() {
        let (_tx, rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = oneshot::channel();
        let stream = CaptureStream::new(PCM, rx, stop_tx);
        drop(stream);
        assert!(stop_rx.await.is_ok());
    }

    #[test]
    fn user_messages() {
        assert_eq!(
            DeviceAccessError::NoInputDevice.user_message(),
            "Failed to access microphone. Please allow microphone access."
        );
        assert!(DeviceAccessError::StreamFailed("x".into())
            .user_message()
            .contains("interrupted"));
    }
}
