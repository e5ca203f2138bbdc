//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, terminal input handling,
//! logging setup and the command runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod interactive;
pub mod logging;
pub mod presenter;
pub mod signals;

// Re-export commonly used types
pub use app::{
    run_delete, run_health, run_post, run_search, run_voice, EXIT_ERROR, EXIT_SUCCESS,
    EXIT_USAGE_ERROR,
};
pub use args::{Cli, Commands, ConfigAction, Settings};
pub use interactive::run_interactive;
pub use logging::init_logging;
pub use presenter::Presenter;
