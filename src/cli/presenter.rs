//! CLI presenter for output formatting

use std::io::{self, Write};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::board::JobBoard;
use crate::domain::jobs::{HealthStatus, Job, Language, VoiceQueryResult, ALL_LANGUAGES};

const SKILLS_SHOWN: usize = 4;

/// Presenter for CLI output formatting.
///
/// Results go to stdout; status, progress and errors go to stderr.
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Prompt on stderr without a newline
    pub fn prompt(&self, text: &str) {
        eprint!("{}", text);
        let _ = io::stderr().flush();
    }

    /// Format recording progress bar
    pub fn format_progress(&self, elapsed_ms: u64, total_ms: u64) -> String {
        let elapsed_secs = elapsed_ms / 1000;
        let total_secs = total_ms / 1000;
        let ratio = if total_ms > 0 {
            (elapsed_ms as f64 / total_ms as f64).min(1.0)
        } else {
            0.0
        };

        let bar_width = 20;
        let filled = (ratio * bar_width as f64) as usize;

        format!(
            "[{}{}] {:>3}s / {}s",
            "█".repeat(filled).red(),
            "░".repeat(bar_width - filled),
            elapsed_secs,
            total_secs
        )
    }

    pub fn show_recording_progress(&mut self, message: &str) {
        self.start_spinner(message);
    }

    pub fn update_recording_progress(&self, elapsed_ms: u64, total_ms: u64) {
        let progress = self.format_progress(elapsed_ms, total_ms);
        self.update_spinner(&format!("Recording... {} (Enter to stop)", progress));
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Print a list of jobs, or a note when there are none
    pub fn job_list(&self, jobs: &[Job]) {
        if jobs.is_empty() {
            self.info("No jobs found");
            return;
        }
        println!("{}", format!("{} job(s)", jobs.len()).bold());
        for job in jobs {
            println!();
            println!("{}", format_job(job));
        }
    }

    /// Print what a voice query understood, then its jobs
    pub fn voice_result(&self, result: &VoiceQueryResult) {
        println!("{} {}", "You said:".bold(), result.transcript);
        if !result.intent.is_empty() {
            println!("{}", format_intent(result));
        }
        println!();
        self.job_list(&result.jobs);
    }

    pub fn health(&self, health: &HealthStatus) {
        let status = if health.is_healthy() {
            health.status.green()
        } else {
            health.status.yellow()
        };
        println!("{}: {}", "status".cyan(), status);
        if !health.timestamp.is_empty() {
            println!("{}: {}", "timestamp".cyan(), health.timestamp);
        }
        println!("{}: {}", "intent model".cyan(), health.gemini_configured);
    }

    /// Print the current view state
    pub fn board(&self, board: &JobBoard) {
        if let Some(error) = board.error() {
            self.error(error);
        }
        if let Some(success) = board.success() {
            self.success(success);
        }
        if board.is_loading() {
            self.info("A request is still running");
        }
        if let Some(result) = board.voice_result() {
            println!("{} {}", "Last query:".bold(), result.transcript);
            if !result.intent.is_empty() {
                println!("{}", format_intent(result));
            }
            println!();
        }
        self.job_list(board.jobs());
    }

    pub fn languages(&self, current: Language) {
        for language in ALL_LANGUAGES {
            let marker = if *language == current { "*" } else { " " };
            println!("{} {:<3} {}", marker, language.code().cyan(), language.label());
        }
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Render one job as a text card
pub fn format_job(job: &Job) -> String {
    let mut lines = vec![
        format!("{} {}", job.title.bold(), format!("[{}]", job.id).dimmed()),
        format!("  {} · {}", job.company, job.location),
    ];
    if !job.salary.is_empty() {
        lines.push(format!("  {}", job.salary.green()));
    }
    if !job.description.is_empty() {
        lines.push(format!("  {}", job.description));
    }
    if !job.skills.is_empty() {
        let mut skills = job
            .skills
            .iter()
            .take(SKILLS_SHOWN)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        if job.skills.len() > SKILLS_SHOWN {
            skills.push_str(&format!(" +{} more", job.skills.len() - SKILLS_SHOWN));
        }
        lines.push(format!("  Skills: {}", skills));
    }
    if !job.contact.is_empty() {
        lines.push(format!("  Contact: {} ({})", job.contact, job.contact_uri()));
    }
    lines.push(format!("  Posted: {}", job.posted_on()));
    lines.join("\n")
}

fn format_intent(result: &VoiceQueryResult) -> String {
    let or_any = |s: &str| if s.is_empty() { "any".to_string() } else { s.to_string() };
    format!(
        "{} role: {}, location: {}",
        "Looking for".bold(),
        or_any(&result.intent.job_role),
        or_any(&result.intent.location)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> Job {
        Job {
            id: "7".to_string(),
            title: "Electrician".to_string(),
            company: "PowerGrid".to_string(),
            location: "Nagpur".to_string(),
            salary: "₹20,000/month".to_string(),
            skills: ["wiring", "safety", "panels", "tools", "meters", "solar"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            contact: "jobs@powergrid.example".to_string(),
            description: "Maintain site wiring".to_string(),
            posted_date: "2024-04-02T09:30:00".to_string(),
        }
    }

    #[test]
    fn format_progress_at_start() {
        let progress = Presenter::new().format_progress(0, 10000);
        assert!(progress.contains("0s / 10s"));
    }

    #[test]
    fn format_progress_caps_at_end() {
        let progress = Presenter::new().format_progress(15000, 10000);
        assert!(progress.contains("15s / 10s"));
    }

    #[test]
    fn job_card_shows_details() {
        let card = format_job(&job());
        assert!(card.contains("Electrician"));
        assert!(card.contains("PowerGrid · Nagpur"));
        assert!(card.contains("Skills: wiring, safety, panels, tools +2 more"));
        assert!(card.contains("mailto:jobs@powergrid.example"));
        assert!(card.contains("Posted: 2024-04-02"));
    }

    #[test]
    fn job_card_skips_missing_fields() {
        let sparse = Job {
            salary: String::new(),
            skills: vec![],
            contact: String::new(),
            posted_date: "soon".to_string(),
            ..job()
        };
        let card = format_job(&sparse);
        assert!(!card.contains("Skills"));
        assert!(!card.contains("Contact"));
        assert!(card.contains("Recently posted"));
    }

    #[test]
    fn intent_shows_any_for_blank_fields() {
        let mut result = VoiceQueryResult::default();
        result.intent.job_role = "driver".to_string();
        let text = format_intent(&result);
        assert!(text.contains("role: driver"));
        assert!(text.contains("location: any"));
    }
}
