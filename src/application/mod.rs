//! Application layer - Use cases and port interfaces
//!
//! Contains the voice, search and admin operations and the trait
//! definitions for the device, backend and playback seams.

pub mod job_admin;
pub mod job_search;
pub mod ports;
pub mod voice_search;

// Re-export use cases
pub use job_admin::{JobAdminError, JobAdminUseCase};
pub use job_search::{JobSearchError, JobSearchUseCase, SearchOutput};
pub use voice_search::{
    VoiceSearchError, VoiceSearchOutput, VoiceSearchUseCase, VoiceSubmissionError,
};
