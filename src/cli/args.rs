//! CLI argument definitions using Clap

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::config::{AppConfig, Environment};
use crate::domain::jobs::{JobDraft, Language};
use crate::domain::recording::Duration;

/// VocaWork - find jobs by speaking
#[derive(Parser, Debug)]
#[command(name = "vocawork")]
#[command(version)]
#[command(about = "Voice-powered job search: speak a query, get matching jobs")]
#[command(long_about = None)]
pub struct Cli {
    /// Backend API base URL (overrides --env)
    #[arg(long, global = true, value_name = "URL", env = "VOCAWORK_API_URL")]
    pub api_url: Option<String>,

    /// Backend environment
    #[arg(long = "env", global = true, value_name = "ENV", env = "VOCAWORK_ENV")]
    pub environment: Option<EnvironmentArg>,

    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run (defaults to interactive)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a spoken query and show matching jobs
    Voice {
        /// Language you will speak
        #[arg(short, long, value_name = "LANG")]
        language: Option<LanguageArg>,

        /// Stop recording automatically after this long (e.g. 30s, 1m)
        #[arg(long, value_name = "TIME")]
        max_duration: Option<String>,

        /// Do not play the spoken reply
        #[arg(long)]
        no_reply: bool,
    },
    /// Search jobs by keyword, or list all jobs
    Search {
        /// Search terms; omit to list everything
        query: Vec<String>,

        /// Only jobs in this place
        #[arg(long, value_name = "PLACE")]
        location: Option<String>,
    },
    /// Post a new job
    Post(PostArgs),
    /// Delete a job
    Delete {
        /// Job id
        id: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Check that the backend is up
    Health,
    /// Interactive session with voice and text search
    Interactive {
        /// Language you will speak
        #[arg(short, long, value_name = "LANG")]
        language: Option<LanguageArg>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Job posting fields.
///
/// Every field defaults to empty so missing ones are reported by the same
/// check the backend would apply.
#[derive(Args, Debug, Clone, Default)]
pub struct PostArgs {
    #[arg(long, default_value = "")]
    pub title: String,
    #[arg(long, default_value = "")]
    pub company: String,
    #[arg(long, default_value = "")]
    pub location: String,
    #[arg(long, default_value = "")]
    pub salary: String,
    /// Comma-separated skills
    #[arg(long, default_value = "")]
    pub skills: String,
    #[arg(long, default_value = "")]
    pub contact: String,
    #[arg(long, default_value = "")]
    pub description: String,
}

impl From<PostArgs> for JobDraft {
    fn from(args: PostArgs) -> Self {
        JobDraft {
            title: args.title,
            company: args.company,
            location: args.location,
            salary: args.salary,
            skills: args.skills,
            contact: args.contact,
            description: args.description,
        }
    }
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Spoken language argument
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LanguageArg {
    #[value(alias = "english")]
    En,
    #[value(alias = "hindi")]
    Hi,
    #[value(alias = "tamil")]
    Ta,
    #[value(alias = "telugu")]
    Te,
    #[value(alias = "marathi")]
    Mr,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::En => Language::English,
            LanguageArg::Hi => Language::Hindi,
            LanguageArg::Ta => Language::Tamil,
            LanguageArg::Te => Language::Telugu,
            LanguageArg::Mr => Language::Marathi,
        }
    }
}

/// Backend environment argument
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum EnvironmentArg {
    #[value(alias = "dev")]
    Local,
    #[value(alias = "prod")]
    Production,
}

impl From<EnvironmentArg> for Environment {
    fn from(arg: EnvironmentArg) -> Self {
        match arg {
            EnvironmentArg::Local => Environment::Local,
            EnvironmentArg::Production => Environment::Production,
        }
    }
}

/// Settings every command runs with, after merging config sources
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub language: Language,
    pub max_duration: Duration,
    pub request_timeout: Duration,
    pub play_reply: bool,
}

impl Settings {
    /// Resolve a merged config. Unparseable durations are reported rather
    /// than silently replaced.
    pub fn resolve(config: &AppConfig) -> Result<Self, String> {
        let max_duration = parse_duration("max-duration", config.max_duration.as_deref())?
            .unwrap_or_else(Duration::default_max_duration);
        let request_timeout = parse_duration("request-timeout", config.request_timeout.as_deref())?
            .unwrap_or_else(Duration::default_request_timeout);

        Ok(Self {
            api_url: config.api_url_or_default(),
            language: config.language_or_default(),
            max_duration,
            request_timeout,
            play_reply: config.play_reply_or_default(),
        })
    }
}

fn parse_duration(name: &str, value: Option<&str>) -> Result<Option<Duration>, String> {
    value
        .map(|v| v.parse::<Duration>().map_err(|e| format!("Invalid {}: {}", name, e)))
        .transpose()
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "api_url",
    "environment",
    "language",
    "max_duration",
    "play_reply",
    "request_timeout",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
