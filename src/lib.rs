//! VocaWork - voice-powered job search client
//!
//! This crate records a spoken query from the microphone, sends it to the
//! VocaWork backend for transcription and intent extraction, and shows the
//! matching jobs. It also lists, searches, posts and deletes jobs.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Jobs, languages, the capture state machine and the job board
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, reqwest, rodio, TOML config)
//! - **CLI**: Command-line interface, argument parsing and terminal input

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
