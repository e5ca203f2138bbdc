//! Voice capture session state machine

use std::fmt;
use std::time::Instant;

use thiserror::Error;

use super::audio_payload::{AudioEncoding, AudioFragment, AudioPayload};
use crate::domain::jobs::Language;

/// Capture states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    RequestingDevice,
    Recording,
    Finalizing,
    Processing,
}

impl CaptureState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::RequestingDevice => "requesting device",
            Self::Recording => "recording",
            Self::Finalizing => "finalizing",
            Self::Processing => "processing",
        }
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while {current_state}")]
pub struct InvalidStateTransition {
    pub current_state: CaptureState,
    pub action: &'static str,
}

/// One voice capture cycle.
///
/// State machine:
///   IDLE -> REQUESTING_DEVICE (begin_device_request)
///   REQUESTING_DEVICE -> RECORDING (device_granted)
///   REQUESTING_DEVICE -> IDLE (device_denied)
///   RECORDING -> FINALIZING (begin_finalizing)
///   FINALIZING -> PROCESSING (finalize)
///   PROCESSING -> IDLE (complete_processing)
///   any -> IDLE (abort)
///
/// Fragments are kept only while RECORDING or FINALIZING and are dropped
/// whenever the session returns to IDLE.
#[derive(Debug, Default)]
pub struct CaptureSession {
    state: CaptureState,
    language: Language,
    encoding: Option<AudioEncoding>,
    chunks: Vec<AudioFragment>,
    started_at: Option<Instant>,
}

impl CaptureSession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == CaptureState::Idle
    }

    pub fn is_recording(&self) -> bool {
        self.state == CaptureState::Recording
    }

    /// Language chosen when the capture started
    pub fn language(&self) -> Language {
        self.language
    }

    /// Number of fragments buffered so far
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Time since the device was granted, zero when not recording
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at
            .map(|started| started.elapsed())
            .unwrap_or_default()
    }

    fn expect(&self, expected: CaptureState, action: &'static str) -> Result<(), InvalidStateTransition> {
        if self.state != expected {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action,
            });
        }
        Ok(())
    }

    /// Transition from IDLE to REQUESTING_DEVICE
    pub fn begin_device_request(&mut self, language: Language) -> Result<(), InvalidStateTransition> {
        self.expect(CaptureState::Idle, "start capture")?;
        self.language = language;
        self.state = CaptureState::RequestingDevice;
        Ok(())
    }

    /// Transition from REQUESTING_DEVICE to RECORDING
    pub fn device_granted(&mut self, encoding: AudioEncoding) -> Result<(), InvalidStateTransition> {
        self.expect(CaptureState::RequestingDevice, "begin recording")?;
        self.encoding = Some(encoding);
        self.chunks.clear();
        self.started_at = Some(Instant::now());
        self.state = CaptureState::Recording;
        Ok(())
    }

    /// Transition from REQUESTING_DEVICE back to IDLE
    pub fn device_denied(&mut self) -> Result<(), InvalidStateTransition> {
        self.expect(CaptureState::RequestingDevice, "reject device access")?;
        self.reset();
        Ok(())
    }

    /// Buffer a fragment, keeping arrival order
    pub fn push_fragment(&mut self, fragment: AudioFragment) -> Result<(), InvalidStateTransition> {
        if !matches!(self.state, CaptureState::Recording | CaptureState::Finalizing) {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "buffer audio",
            });
        }
        self.chunks.push(fragment);
        Ok(())
    }

    /// Transition from RECORDING to FINALIZING
    pub fn begin_finalizing(&mut self) -> Result<(), InvalidStateTransition> {
        self.expect(CaptureState::Recording, "stop capture")?;
        self.state = CaptureState::Finalizing;
        Ok(())
    }

    /// Transition from FINALIZING to PROCESSING, producing the payload
    pub fn finalize(&mut self) -> Result<AudioPayload, InvalidStateTransition> {
        self.expect(CaptureState::Finalizing, "finalize audio")?;
        let encoding = self
            .encoding
            .take()
            .unwrap_or(AudioEncoding::Pcm16Mono { sample_rate: 0 });
        let chunks = std::mem::take(&mut self.chunks);
        self.started_at = None;
        self.state = CaptureState::Processing;
        Ok(AudioPayload::from_fragments(&chunks, encoding))
    }

    /// Transition from PROCESSING to IDLE
    pub fn complete_processing(&mut self) -> Result<(), InvalidStateTransition> {
        self.expect(CaptureState::Processing, "complete processing")?;
        self.reset();
        Ok(())
    }

    /// Return to IDLE from any state, discarding buffered audio
    pub fn abort(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.state = CaptureState::Idle;
        self.encoding = None;
        self.chunks.clear();
        self.started_at = None;
    }
}
