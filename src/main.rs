//! VocaWork CLI entry point

use std::process::ExitCode;

use clap::Parser;

use vocawork::cli::{
    app::{load_merged_config, run_delete, run_health, run_post, run_search, run_voice},
    args::{Cli, Commands, Settings},
    config_cmd::handle_config_command,
    init_logging,
    interactive::run_interactive,
    presenter::Presenter,
    EXIT_ERROR, EXIT_USAGE_ERROR,
};
use vocawork::domain::config::{AppConfig, Environment};
use vocawork::domain::jobs::Language;
use vocawork::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let presenter = Presenter::new();

    let command = match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        Some(command) => command,
        None => Commands::Interactive { language: None },
    };

    // Build CLI config from args
    let mut cli_config = AppConfig {
        api_url: cli.api_url.clone(),
        environment: cli.environment.map(|e| Environment::from(e).to_string()),
        ..AppConfig::empty()
    };
    match &command {
        Commands::Voice {
            language,
            max_duration,
            no_reply,
        } => {
            cli_config.language = language.map(|l| Language::from(l).to_string());
            cli_config.max_duration = max_duration.clone();
            if *no_reply {
                cli_config.play_reply = Some(false);
            }
        }
        Commands::Interactive { language } => {
            cli_config.language = language.map(|l| Language::from(l).to_string());
        }
        _ => {}
    }

    let mut config = load_merged_config(cli_config).await;
    // An environment chosen on the command line beats a URL from the file.
    if cli.environment.is_some() && cli.api_url.is_none() {
        config.api_url = None;
    }

    let settings = match Settings::resolve(&config) {
        Ok(settings) => settings,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    match command {
        Commands::Voice { .. } => run_voice(&settings).await,
        Commands::Search { query, location } => {
            run_search(&settings, &query.join(" "), location.as_deref().unwrap_or("")).await
        }
        Commands::Post(args) => run_post(&settings, args.into()).await,
        Commands::Delete { id, yes } => run_delete(&settings, &id, yes).await,
        Commands::Health => run_health(&settings).await,
        Commands::Interactive { .. } => run_interactive(settings).await,
        Commands::Config { .. } => ExitCode::SUCCESS,
    }
}
