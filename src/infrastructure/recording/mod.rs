//! Recording infrastructure module
//!
//! Captures microphone audio with cpal and packages finished recordings
//! as WAV for upload.

mod cpal_microphone;
mod wav_encoder;

pub use cpal_microphone::CpalMicrophone;
pub use wav_encoder::{encode_wav, resample, EncodingError};

/// Create the microphone for the current platform
pub fn create_microphone() -> CpalMicrophone {
    CpalMicrophone::new()
}
