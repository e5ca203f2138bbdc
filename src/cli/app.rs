//! Command runners

use std::process::ExitCode;
use std::time::Duration as StdDuration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::application::ports::{BackendError, ConfigStore};
use crate::application::job_admin::{DELETED, POSTED};
use crate::application::{JobAdminUseCase, JobSearchUseCase, VoiceSearchUseCase};
use crate::domain::board::JobBoard;
use crate::domain::config::AppConfig;
use crate::domain::jobs::{JobDraft, JobFilter};
use crate::domain::recording::Duration;
use crate::infrastructure::{create_microphone, create_reply_player, CpalMicrophone, VocaworkClient, XdgConfigStore};

use super::args::Settings;
use super::presenter::Presenter;
use super::signals::{UserInput, UserInputHandler};

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Voice search wired to the real device and backend
pub type CliVoiceSearch = VoiceSearchUseCase<CpalMicrophone, VocaworkClient>;

/// Load and merge configuration: defaults < file < environment/CLI.
///
/// Clap already folds the environment variables into the CLI values.
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, path = %store.path().display(), "ignoring unreadable config file");
            AppConfig::empty()
        }
    };

    AppConfig::defaults().merge(file_config).merge(cli_config)
}

pub fn build_client(settings: &Settings) -> Result<VocaworkClient, BackendError> {
    debug!(api_url = %settings.api_url, "using backend");
    VocaworkClient::new(&settings.api_url, settings.request_timeout.as_std())
}

/// Voice search with the default microphone and, if enabled, reply playback
pub fn build_voice_search(client: VocaworkClient, settings: &Settings) -> CliVoiceSearch {
    match create_reply_player(settings.play_reply, settings.request_timeout.as_std()) {
        Some(player) => VoiceSearchUseCase::new(create_microphone(), client, player),
        None => VoiceSearchUseCase::without_reply(create_microphone(), client),
    }
}

/// Record one spoken query and show what it found
pub async fn run_voice(settings: &Settings) -> ExitCode {
    let mut presenter = Presenter::new();
    let client = match build_client(settings) {
        Ok(client) => client,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };
    let use_case = build_voice_search(client, settings);
    let board = Mutex::new(JobBoard::new());
    let mut input = UserInputHandler::new();

    presenter.info(&format!("Speak in {}", settings.language.label()));
    if let Err(e) = use_case.start_capture(settings.language, &board).await {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    presenter.show_recording_progress("Recording... (Enter to stop)");
    if wait_for_stop(&use_case, &mut input, &presenter, settings.max_duration).await {
        presenter.update_spinner("Maximum duration reached, processing...");
    } else {
        presenter.update_spinner("Processing...");
    }

    match use_case.stop_capture(&board).await {
        Ok(output) => {
            presenter.stop_spinner();
            presenter.voice_result(&output.result);
            if let Some(playback) = output.playback {
                wait_for_playback(playback, &mut input, &presenter).await;
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.spinner_fail(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Wait until the user stops recording or the limit passes.
/// Returns true when the limit ended it.
async fn wait_for_stop(
    use_case: &CliVoiceSearch,
    input: &mut UserInputHandler,
    presenter: &Presenter,
    max_duration: Duration,
) -> bool {
    let deadline = tokio::time::sleep(max_duration.as_std());
    tokio::pin!(deadline);
    let mut ticker = tokio::time::interval(StdDuration::from_millis(200));
    let mut input_open = true;

    loop {
        tokio::select! {
            _ = &mut deadline => return true,
            event = input.recv(), if input_open => match event {
                Some(UserInput::Line(_)) | Some(UserInput::Interrupt) => return false,
                // Piped stdin: keep recording until Ctrl+C or the limit.
                Some(UserInput::Closed) => {}
                None => input_open = false,
            },
            _ = ticker.tick() => {
                let elapsed = use_case.capture_elapsed().await;
                presenter.update_recording_progress(elapsed.as_millis() as u64, max_duration.as_millis());
            }
        }
    }
}

async fn wait_for_playback(
    mut playback: JoinHandle<()>,
    input: &mut UserInputHandler,
    presenter: &Presenter,
) {
    presenter.info("Playing the spoken reply (Enter to skip)");
    loop {
        tokio::select! {
            _ = &mut playback => return,
            event = input.recv() => match event {
                Some(UserInput::Closed) => {}
                Some(_) | None => {
                    playback.abort();
                    return;
                }
            },
        }
    }
}

/// List all jobs, or search when `query` or `location` is not blank
pub async fn run_search(settings: &Settings, query: &str, location: &str) -> ExitCode {
    let presenter = Presenter::new();
    let client = match build_client(settings) {
        Ok(client) => client,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };
    let board = Mutex::new(JobBoard::new());

    let filter = JobFilter::new(query, location);
    match JobSearchUseCase::new(client).search_filtered(&filter, &board).await {
        Ok(output) => {
            presenter.job_list(&output.jobs);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

pub async fn run_post(settings: &Settings, draft: JobDraft) -> ExitCode {
    let presenter = Presenter::new();
    let client = match build_client(settings) {
        Ok(client) => client,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };
    let board = Mutex::new(JobBoard::new());

    match JobAdminUseCase::new(client).post(&draft, &board).await {
        // The board may hold a reload error by now; the post itself went through.
        Ok(job) => {
            presenter.success(POSTED);
            presenter.output(&job.id);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

pub async fn run_delete(settings: &Settings, id: &str, confirmed: bool) -> ExitCode {
    let presenter = Presenter::new();
    if !confirmed && !confirm(&presenter, "Are you sure you want to delete this job? [y/N] ") {
        presenter.info("Deletion cancelled");
        return ExitCode::from(EXIT_ERROR);
    }

    let client = match build_client(settings) {
        Ok(client) => client,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };
    let board = Mutex::new(JobBoard::new());

    match JobAdminUseCase::new(client).delete(id, &board).await {
        Ok(()) => {
            presenter.success(DELETED);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

pub async fn run_health(settings: &Settings) -> ExitCode {
    let presenter = Presenter::new();
    let client = match build_client(settings) {
        Ok(client) => client,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    match JobAdminUseCase::new(client).health().await {
        Ok(health) => {
            presenter.health(&health);
            if health.is_healthy() {
                ExitCode::from(EXIT_SUCCESS)
            } else {
                ExitCode::from(EXIT_ERROR)
            }
        }
        Err(e) => {
            presenter.error(&format!("Backend unreachable at {}: {}", settings.api_url, e));
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn confirm(presenter: &Presenter, question: &str) -> bool {
    presenter.prompt(question);
    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    is_yes(&answer)
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
