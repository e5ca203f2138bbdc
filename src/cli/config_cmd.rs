//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, Environment};
use crate::domain::error::ConfigError;
use crate::domain::jobs::Language;
use crate::domain::recording::Duration;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => {
            presenter.output(&store.path().to_string_lossy());
            Ok(())
        }
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;
    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;
    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value.trim()));
    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;
    let config = store.load().await?;
    presenter.output(value_of(&config, key).as_deref().unwrap_or(NOT_SET));
    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;
    for key in VALID_CONFIG_KEYS {
        presenter.key_value(key, value_of(&config, key).as_deref().unwrap_or(NOT_SET));
    }
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

fn value_of(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "api_url" => config.api_url.clone(),
        "environment" => config.environment.clone(),
        "language" => config.language.clone(),
        "max_duration" => config.max_duration.clone(),
        "play_reply" => config.play_reply.map(|b| b.to_string()),
        "request_timeout" => config.request_timeout.clone(),
        _ => None,
    }
}

/// Validate `value` for `key` and store its normalized form
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };
    let value = value.trim();

    match key {
        "api_url" => {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(invalid(
                    "Value must start with http:// or https://".to_string(),
                ));
            }
            config.api_url = Some(value.trim_end_matches('/').to_string());
        }
        "environment" => {
            let environment: Environment = value.parse().map_err(|e| invalid(format!("{e}")))?;
            config.environment = Some(environment.to_string());
        }
        "language" => {
            let language: Language = value.parse().map_err(|e| invalid(format!("{e}")))?;
            config.language = Some(language.to_string());
        }
        "max_duration" | "request_timeout" => {
            let duration: Duration = value.parse().map_err(|e| invalid(format!("{e}")))?;
            if key == "max_duration" {
                config.max_duration = Some(duration.to_string());
            } else {
                config.request_timeout = Some(duration.to_string());
            }
        }
        "play_reply" => {
            let enabled = parse_bool(value)
                .ok_or_else(|| invalid("Value must be 'true' or 'false'".to_string()))?;
            config.play_reply = Some(enabled);
        }
        _ => return Err(invalid("Unknown key".to_string())),
    }
    Ok(())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}
