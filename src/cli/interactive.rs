//! Interactive session
//!
//! One job board shared by voice queries and text searches. Requests run in
//! the background so the prompt stays responsive; whichever answer was
//! requested last is the one the board keeps.

use std::process::ExitCode;
use std::sync::Arc;

use tokio::sync::{oneshot, Mutex};
use tracing::debug;

use crate::application::ports::{Microphone, VoiceBackend};
use crate::application::{JobSearchUseCase, VoiceSearchError, VoiceSearchUseCase};
use crate::domain::board::JobBoard;
use crate::domain::jobs::Language;
use crate::domain::recording::{CaptureState, Duration};
use crate::infrastructure::VocaworkClient;

use super::app::{build_client, build_voice_search, CliVoiceSearch, EXIT_SUCCESS, EXIT_USAGE_ERROR};
use super::args::Settings;
use super::presenter::Presenter;
use super::signals::{UserInput, UserInputHandler};

const HELP: &str = "\
Commands:
  voice, v         start recording; run again (or press Enter) to stop
  search <terms>   search jobs by keyword (blank lists everything)
  list             list all jobs
  lang [code]      show or change the spoken language
  show             show the current results
  help             show this help
  quit, exit       leave (Ctrl+C also stops a recording)";

/// A parsed line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Empty,
    Voice,
    Search(String),
    List,
    Lang(Option<String>),
    Show,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head.to_lowercase().as_str() {
        "" => Command::Empty,
        "voice" | "v" => Command::Voice,
        "search" | "s" => Command::Search(rest.to_string()),
        "list" | "ls" => Command::List,
        "lang" | "language" => Command::Lang((!rest.is_empty()).then(|| rest.to_string())),
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

struct Session {
    settings: Settings,
    language: Language,
    board: Arc<Mutex<JobBoard>>,
    voice: Arc<CliVoiceSearch>,
    search: Arc<JobSearchUseCase<VocaworkClient>>,
    /// Cancels the max-duration stop while it is still waiting
    watchdog: Option<oneshot::Sender<()>>,
    presenter: Presenter,
}

impl Session {
    fn new(settings: Settings, client: VocaworkClient) -> Self {
        let voice = Arc::new(build_voice_search(client.clone(), &settings));
        Self {
            language: settings.language,
            settings,
            board: Arc::new(Mutex::new(JobBoard::new())),
            voice,
            search: Arc::new(JobSearchUseCase::new(client)),
            watchdog: None,
            presenter: Presenter::new(),
        }
    }

    async fn is_recording(&self) -> bool {
        matches!(
            self.voice.state().await,
            CaptureState::RequestingDevice | CaptureState::Recording
        )
    }

    async fn toggle_voice(&mut self) {
        match self.voice.state().await {
            CaptureState::Idle => self.start_recording().await,
            CaptureState::Recording => self.stop_recording(),
            CaptureState::RequestingDevice => self.presenter.info("Waiting for the microphone..."),
            CaptureState::Finalizing | CaptureState::Processing => {
                self.presenter.warn("Still processing the last recording")
            }
        }
    }

    async fn start_recording(&mut self) {
        match self.voice.start_capture(self.language, &self.board).await {
            Ok(()) => {
                self.presenter.info(&format!(
                    "Recording in {} (Enter to stop, up to {})",
                    self.language.label(),
                    self.settings.max_duration
                ));
                let (cancel, cancelled) = oneshot::channel();
                spawn_watchdog(
                    Arc::clone(&self.voice),
                    Arc::clone(&self.board),
                    self.settings.max_duration,
                    cancelled,
                );
                self.watchdog = Some(cancel);
            }
            Err(e) => self.presenter.error(&e.to_string()),
        }
    }

    fn stop_recording(&mut self) {
        self.cancel_watchdog();
        self.presenter.info("Processing...");
        spawn_submission(Arc::clone(&self.voice), Arc::clone(&self.board));
    }

    fn cancel_watchdog(&mut self) {
        if let Some(cancel) = self.watchdog.take() {
            let _ = cancel.send(());
        }
    }

    fn search(&self, query: String) {
        let search = Arc::clone(&self.search);
        let board = Arc::clone(&self.board);
        tokio::spawn(async move {
            let presenter = Presenter::new();
            match search.search(&query, &board).await {
                Ok(output) if output.applied => presenter.job_list(&output.jobs),
                Ok(_) => debug!(%query, "search superseded"),
                Err(e) => presenter.error(&e.to_string()),
            }
        });
    }

    fn change_language(&mut self, code: Option<String>) {
        let Some(code) = code else {
            self.presenter.languages(self.language);
            return;
        };
        match code.parse::<Language>() {
            Ok(language) => {
                self.language = language;
                self.presenter.success(&format!("Language set to {}", language.label()));
            }
            Err(e) => self.presenter.error(&e.to_string()),
        }
    }

    /// Handle one line; returns false when the session should end
    async fn handle_line(&mut self, line: &str) -> bool {
        if self.is_recording().await {
            if parse_command(line) == Command::Quit {
                return false;
            }
            self.stop_recording();
            return true;
        }

        match parse_command(line) {
            Command::Empty => {}
            Command::Voice => self.toggle_voice().await,
            Command::Search(query) => self.search(query),
            Command::List => self.search(String::new()),
            Command::Lang(code) => self.change_language(code),
            Command::Show => self.presenter.board(&*self.board.lock().await),
            Command::Help => self.presenter.output(HELP),
            Command::Quit => return false,
            Command::Unknown(word) => self
                .presenter
                .warn(&format!("Unknown command '{}'. Type 'help' for commands.", word)),
        }
        true
    }
}

/// Stop the recording once it reaches `max`.
///
/// Cancelling only takes effect during the wait; a stop already under way
/// runs to completion.
fn spawn_watchdog<M, V>(
    voice: Arc<VoiceSearchUseCase<M, V>>,
    board: Arc<Mutex<JobBoard>>,
    max: Duration,
    cancelled: oneshot::Receiver<()>,
) where
    M: Microphone + 'static,
    V: VoiceBackend + 'static,
{
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(max.as_std()) => {}
            _ = cancelled => return,
        }
        if voice.state().await == CaptureState::Recording {
            Presenter::new().info("Maximum duration reached, processing...");
            submit(&voice, &board).await;
        }
    });
}

fn spawn_submission(voice: Arc<CliVoiceSearch>, board: Arc<Mutex<JobBoard>>) {
    tokio::spawn(async move { submit(&voice, &board).await });
}

async fn submit<M, V>(voice: &VoiceSearchUseCase<M, V>, board: &Mutex<JobBoard>)
where
    M: Microphone,
    V: VoiceBackend,
{
    let presenter = Presenter::new();
    match voice.stop_capture(board).await {
        Ok(output) => {
            if output.applied {
                presenter.voice_result(&output.result);
            } else {
                presenter.info(&format!(
                    "Heard \"{}\", but a newer search replaced it",
                    output.result.transcript
                ));
            }
            if let Some(playback) = output.playback {
                let _ = playback.await;
            }
        }
        Err(VoiceSearchError::InvalidState(e)) => debug!(error = %e, "recording already stopped"),
        Err(e) => presenter.error(&e.to_string()),
    }
}

/// Run the interactive session until the user quits
pub async fn run_interactive(settings: Settings) -> ExitCode {
    let presenter = Presenter::new();
    let client = match build_client(&settings) {
        Ok(client) => client,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    presenter.info(&format!(
        "Connected to {} · speaking {} · type 'help' for commands",
        settings.api_url,
        settings.language.label()
    ));

    let mut session = Session::new(settings, client);
    let mut input = UserInputHandler::new();

    match session.search.load_all(&session.board).await {
        Ok(output) => presenter.job_list(&output.jobs),
        Err(e) => presenter.error(&e.to_string()),
    }

    loop {
        presenter.prompt("> ");
        match input.recv().await {
            Some(UserInput::Line(line)) => {
                if !session.handle_line(&line).await {
                    break;
                }
            }
            Some(UserInput::Interrupt) => {
                eprintln!();
                if session.is_recording().await {
                    session.stop_recording();
                } else {
                    break;
                }
            }
            Some(UserInput::Closed) | None => break,
        }
    }

    session.cancel_watchdog();
    ExitCode::from(EXIT_SUCCESS)
}
