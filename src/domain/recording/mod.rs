//! Voice recording domain module

mod audio_payload;
mod duration;
mod session;

pub use audio_payload::{AudioEncoding, AudioFragment, AudioPayload, UPLOAD_SAMPLE_RATE};
pub use duration::Duration;
pub use session::{CaptureSession, CaptureState, InvalidStateTransition};
