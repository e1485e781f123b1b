//! Error types for the quiz timer

use thiserror::Error;

/// Errors raised while building a timer session from its inputs.
///
/// Any of these prevents the timer from starting; nothing is defaulted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("start time is missing")]
    MissingStartTime,

    #[error("start time '{0}' is not an RFC 3339 timestamp or epoch seconds")]
    InvalidStartTime(String),

    #[error("start time {start} is after the current time {now}")]
    StartTimeInFuture { start: String, now: String },

    #[error("time limit must be a positive number of minutes, got '{0}'")]
    InvalidTimeLimit(String),

    #[error("invalid urgency thresholds: {0}")]
    InvalidThresholds(String),
}

/// Errors from handing a submission to the terminal action.
#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("failed to run submit command '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("submit command exited with {code:?}: {stderr}")]
    CommandFailed { code: Option<i32>, stderr: String },
}
