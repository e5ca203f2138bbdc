//! Configuration domain module

mod app_config;
mod environment;

pub use app_config::AppConfig;
pub use environment::{Environment, LOCAL_API_URL, PRODUCTION_API_URL};
