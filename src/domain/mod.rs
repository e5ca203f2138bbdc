//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod board;
pub mod config;
pub mod error;
pub mod jobs;
pub mod recording;

// Re-export common types
pub use board::{JobBoard, RequestTicket};
pub use config::{AppConfig, Environment};
pub use error::*;
pub use jobs::{HealthStatus, Job, JobDraft, JobFilter, Language, NewJob, VoiceIntent, VoiceQueryResult};
pub use recording::{
    AudioEncoding, AudioFragment, AudioPayload, CaptureSession, CaptureState, Duration,
    InvalidStateTransition,
};
