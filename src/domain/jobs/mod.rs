//! Job listing domain module

mod filter;
mod health;
mod job;
mod language;
mod voice_result;

pub use filter::JobFilter;
pub use health::HealthStatus;
pub use job::{split_skills, Job, JobDraft, NewJob};
pub use language::{Language, ALL_LANGUAGES};
pub use voice_result::{VoiceIntent, VoiceQueryResult};
