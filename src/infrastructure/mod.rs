//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces:
//! the cpal microphone, the HTTP backend client, rodio playback
//! and the TOML config file.

pub mod backend;
pub mod config;
pub mod playback;
pub mod recording;

// Re-export adapters
pub use backend::VocaworkClient;
pub use config::XdgConfigStore;
pub use playback::{create_reply_player, RodioReplyPlayer};
pub use recording::{create_microphone, CpalMicrophone};
