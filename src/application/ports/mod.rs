//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod job_backend;
pub mod microphone;
pub mod reply_player;
pub mod voice_backend;

// Re-export common types
pub use config::ConfigStore;
pub use job_backend::{BackendError, JobBackend};
pub use microphone::{CaptureEvent, CaptureStream, DeviceAccessError, Microphone};
pub use reply_player::{PlaybackError, ReplyPlayer};
pub use voice_backend::VoiceBackend;
