//! Configuration and CLI argument handling

use std::sync::Arc;

use clap::Parser;

use crate::{
    clock::Clock,
    error::ConfigurationError,
    services::{CommandSubmitter, LogSubmitter, Submitter},
    state::{
        parse_start_time,
        phase::{DEFAULT_DANGER_SECONDS, DEFAULT_WARNING_SECONDS},
        Thresholds, TimerSession,
    },
};

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "quiz-timer")]
#[command(about = "Counts down a quiz attempt and submits it when time runs out")]
#[command(version)]
pub struct Config {
    /// Time limit of the attempt in minutes
    #[arg(short, long = "time-limit", allow_negative_numbers = true)]
    pub time_limit: i64,

    /// Start of the attempt (RFC 3339 or epoch seconds); defaults to now
    #[arg(short, long = "start-time")]
    pub start_time: Option<String>,

    /// Remaining seconds at which the timer turns to warning
    #[arg(long, default_value_t = DEFAULT_WARNING_SECONDS)]
    pub warning_at: u32,

    /// Remaining seconds at which the timer turns to danger
    #[arg(long, default_value_t = DEFAULT_DANGER_SECONDS)]
    pub danger_at: u32,

    /// Program to run when the attempt is submitted
    #[arg(long)]
    pub submit_command: Option<String>,

    /// Argument passed to the submit command (repeatable)
    #[arg(long = "submit-arg", requires = "submit_command", allow_hyphen_values = true)]
    pub submit_args: Vec<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn thresholds(&self) -> Result<Thresholds, ConfigurationError> {
        Thresholds::warning_danger(self.warning_at, self.danger_at)
    }

    /// Build the timer session, failing on any malformed input
    pub fn build_session(&self, clock: Arc<dyn Clock>) -> Result<TimerSession, ConfigurationError> {
        let start_time = match &self.start_time {
            Some(raw) => parse_start_time(raw)?,
            None => clock.now(),
        };
        TimerSession::new(start_time, self.time_limit, self.thresholds()?, clock)
    }

    pub fn submitter(&self) -> Arc<dyn Submitter> {
        match &self.submit_command {
            Some(program) => Arc::new(CommandSubmitter::new(program.clone(), self.submit_args.clone())),
            None => Arc::new(LogSubmitter),
        }
    }
}
