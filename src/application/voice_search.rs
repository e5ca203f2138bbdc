//! Voice search use case
//!
//! Drives one capture cycle: acquire the microphone, buffer what it hears,
//! finalize the recording, submit it and apply the answer to the board.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::board::JobBoard;
use crate::domain::jobs::{Language, VoiceQueryResult};
use crate::domain::recording::{AudioPayload, CaptureSession, CaptureState, InvalidStateTransition};

use super::ports::{
    BackendError, CaptureStream, DeviceAccessError, Microphone, ReplyPlayer, VoiceBackend,
};

/// Shown when the server rejected the query without saying why
pub const VOICE_SERVER_FALLBACK: &str = "Failed to process voice";

/// Shown when the query never got a usable answer
pub const VOICE_REQUEST_FALLBACK: &str = "Failed to process voice recording";

/// A voice query the backend did not answer successfully
#[derive(Debug, Error)]
#[error("{message}")]
pub struct VoiceSubmissionError {
    /// Message for the user: the server's own when it sent one
    pub message: String,
    #[source]
    pub source: BackendError,
}

impl VoiceSubmissionError {
    fn from_backend(source: BackendError) -> Self {
        let message = match (&source, source.server_message()) {
            (_, Some(message)) => message.to_string(),
            (BackendError::Server { .. }, None) => VOICE_SERVER_FALLBACK.to_string(),
            _ => VOICE_REQUEST_FALLBACK.to_string(),
        };
        Self { message, source }
    }
}

/// Errors from the voice search use case
#[derive(Debug, Error)]
pub enum VoiceSearchError {
    #[error(transparent)]
    InvalidState(#[from] InvalidStateTransition),

    #[error("{}", .0.user_message())]
    DeviceAccess(#[from] DeviceAccessError),

    #[error(transparent)]
    Submission(#[from] VoiceSubmissionError),
}

/// Output of a completed voice query
#[derive(Debug)]
pub struct VoiceSearchOutput {
    pub result: VoiceQueryResult,
    /// False when a newer request already settled the board
    pub applied: bool,
    /// Background playback of the spoken reply, if there is one
    pub playback: Option<JoinHandle<()>>,
}

#[derive(Debug, Default)]
struct Capture {
    session: CaptureSession,
    stream: Option<CaptureStream>,
}

/// Returns the session to idle when a stop or submit is dropped before it
/// settles. Disarmed under the capture lock once the cycle completes.
struct CycleGuard {
    capture: Option<Arc<Mutex<Capture>>>,
}

impl CycleGuard {
    fn new(capture: &Arc<Mutex<Capture>>) -> Self {
        Self {
            capture: Some(Arc::clone(capture)),
        }
    }

    fn disarm(mut self) {
        self.capture = None;
    }
}

impl Drop for CycleGuard {
    fn drop(&mut self) {
        let Some(capture) = self.capture.take() else {
            return;
        };
        warn!("voice query abandoned before it settled");

        if let Ok(mut state) = capture.try_lock() {
            state.session.abort();
            state.stream = None;
            return;
        }
        if let Ok(handle) = Handle::try_current() {
            handle.spawn(async move {
                let mut state = capture.lock().await;
                state.session.abort();
                state.stream = None;
            });
        }
    }
}

/// Voice capture controller
pub struct VoiceSearchUseCase<M, V>
where
    M: Microphone,
    V: VoiceBackend,
{
    microphone: M,
    backend: V,
    player: Option<Arc<dyn ReplyPlayer>>,
    capture: Arc<Mutex<Capture>>,
}

impl<M, V> VoiceSearchUseCase<M, V>
where
    M: Microphone,
    V: VoiceBackend,
{
    /// Create a controller that plays spoken replies through `player`
    pub fn new(microphone: M, backend: V, player: Arc<dyn ReplyPlayer>) -> Self {
        Self {
            microphone,
            backend,
            player: Some(player),
            capture: Arc::new(Mutex::new(Capture::default())),
        }
    }

    /// Create a controller that ignores spoken replies
    pub fn without_reply(microphone: M, backend: V) -> Self {
        Self {
            microphone,
            backend,
            player: None,
            capture: Arc::new(Mutex::new(Capture::default())),
        }
    }

    /// Get current capture state
    pub async fn state(&self) -> CaptureState {
        self.capture.lock().await.session.state()
    }

    /// Time spent recording so far
    pub async fn capture_elapsed(&self) -> StdDuration {
        self.capture.lock().await.session.elapsed()
    }

    /// Acquire the microphone and start buffering audio.
    ///
    /// Rejected unless idle. On a denied or missing device the board shows
    /// the error and the controller stays idle.
    pub async fn start_capture(
        &self,
        language: Language,
        board: &Mutex<JobBoard>,
    ) -> Result<(), VoiceSearchError> {
        self.capture
            .lock()
            .await
            .session
            .begin_device_request(language)?;
        board.lock().await.clear_banners();

        info!(%language, "requesting microphone");
        match self.microphone.open().await {
            Ok(stream) => {
                let mut capture = self.capture.lock().await;
                capture.session.device_granted(stream.encoding())?;
                debug!(encoding = %stream.encoding(), "recording");
                capture.stream = Some(stream);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "microphone unavailable");
                self.capture.lock().await.session.device_denied()?;
                board.lock().await.fail(err.user_message());
                Err(err.into())
            }
        }
    }

    /// Stop recording, finalize the audio and submit it.
    pub async fn stop_capture(
        &self,
        board: &Mutex<JobBoard>,
    ) -> Result<VoiceSearchOutput, VoiceSearchError> {
        let (stream, language) = {
            let mut capture = self.capture.lock().await;
            capture.session.begin_finalizing()?;
            (capture.stream.take(), capture.session.language())
        };
        let guard = CycleGuard::new(&self.capture);

        let drained = match stream {
            Some(stream) => stream.finish().await,
            None => Ok(Vec::new()),
        };

        let payload = {
            let mut capture = self.capture.lock().await;
            match drained {
                Ok(fragments) => {
                    for fragment in fragments {
                        capture.session.push_fragment(fragment)?;
                    }
                    capture.session.finalize()?
                }
                Err(err) => {
                    warn!(error = %err, "recording interrupted");
                    capture.session.abort();
                    guard.disarm();
                    drop(capture);
                    board.lock().await.fail(err.user_message());
                    return Err(err.into());
                }
            }
        };

        info!(
            size = %payload.human_readable_size(),
            duration_ms = payload.duration_ms(),
            "recording finalized"
        );
        self.submit(payload, language, board, guard).await
    }

    /// Send a finalized recording and apply the answer.
    ///
    /// Runs while processing; the controller is idle again when this returns,
    /// whatever the outcome.
    pub async fn submit_voice_payload(
        &self,
        payload: AudioPayload,
        language: Language,
        board: &Mutex<JobBoard>,
    ) -> Result<VoiceSearchOutput, VoiceSearchError> {
        let state = self.state().await;
        if state != CaptureState::Processing {
            return Err(InvalidStateTransition {
                current_state: state,
                action: "submit audio",
            }
            .into());
        }

        let guard = CycleGuard::new(&self.capture);
        self.submit(payload, language, board, guard).await
    }

    async fn submit(
        &self,
        payload: AudioPayload,
        language: Language,
        board: &Mutex<JobBoard>,
        guard: CycleGuard,
    ) -> Result<VoiceSearchOutput, VoiceSearchError> {
        let ticket = board.lock().await.begin_request();
        let outcome = self.backend.process_voice(&payload, language).await;

        let output = match outcome {
            Ok(result) => {
                info!(
                    transcript = %result.transcript,
                    job_role = %result.intent.job_role,
                    location = %result.intent.location,
                    jobs = result.jobs.len(),
                    "voice query answered"
                );
                let applied = board
                    .lock()
                    .await
                    .apply_voice_result(ticket, result.clone());
                if !applied {
                    debug!(generation = ticket.generation(), "voice result superseded");
                }
                let playback = match (&self.player, &result.audio_url) {
                    (Some(player), Some(url)) => Some(spawn_playback(Arc::clone(player), url.clone())),
                    _ => None,
                };
                Ok(VoiceSearchOutput {
                    result,
                    applied,
                    playback,
                })
            }
            Err(err) => {
                warn!(error = %err, "voice query failed");
                let err = VoiceSubmissionError::from_backend(err);
                board.lock().await.apply_failure(ticket, err.message.clone());
                Err(err.into())
            }
        };

        let mut capture = self.capture.lock().await;
        guard.disarm();
        capture.session.complete_processing()?;
        output
    }
}

fn spawn_playback(player: Arc<dyn ReplyPlayer>, url: String) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!(%url, "playing spoken reply");
        if let Err(err) = player.play(&url).await {
            warn!(error = %err, %url, "spoken reply not played");
        }
    })
}
