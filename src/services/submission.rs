//! Terminal action: handing a finished attempt to whatever submits it

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::{error::SubmissionError, state::Submission};

/// Receiver of the one-way submission handoff.
///
/// Called at most once per session. The timer does not retry and does not
/// wait for anything beyond the returned result.
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, submission: &Submission) -> Result<(), SubmissionError>;
}

/// Submitter that only records the submission in the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSubmitter;

#[async_trait]
impl Submitter for LogSubmitter {
    async fn submit(&self, submission: &Submission) -> Result<(), SubmissionError> {
        info!(
            reason = submission.reason.as_str(),
            time_taken = submission.time_taken_seconds,
            answered = ?submission.answered,
            total = ?submission.total,
            "Attempt submitted"
        );
        Ok(())
    }
}

/// Submitter that runs an external program.
///
/// Submission details are passed through `QUIZ_TIMER_*` environment
/// variables.
#[derive(Debug, Clone)]
pub struct CommandSubmitter {
    program: String,
    args: Vec<String>,
}

impl CommandSubmitter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn env(submission: &Submission) -> Vec<(&'static str, String)> {
        let count = |v: Option<u32>| v.map(|n| n.to_string()).unwrap_or_default();
        vec![
            ("QUIZ_TIMER_REASON", submission.reason.as_str().to_string()),
            ("QUIZ_TIMER_SUBMITTED_AT", submission.submitted_at.to_rfc3339()),
            ("QUIZ_TIMER_TIME_TAKEN", submission.time_taken_seconds.to_string()),
            ("QUIZ_TIMER_ANSWERED", count(submission.answered)),
            ("QUIZ_TIMER_TOTAL", count(submission.total)),
        ]
    }
}

#[async_trait]
impl Submitter for CommandSubmitter {
    async fn submit(&self, submission: &Submission) -> Result<(), SubmissionError> {
        debug!("Running submit command {} {:?}", self.program, self.args);

        let output = Command::new(&self.program)
            .args(&self.args)
            .envs(Self::env(submission))
            .output()
            .await
            .map_err(|source| SubmissionError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SubmissionError::CommandFailed {
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        info!("Submit command {} completed", self.program);
        Ok(())
    }
}
