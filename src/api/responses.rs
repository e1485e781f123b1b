//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{Submission, TimerView};

/// Body of `POST /submit`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// Number of questions the taker has answered
    pub answered: Option<u32>,
    /// Number of questions on the page
    pub total: Option<u32>,
    /// Submit even when some questions are unanswered
    #[serde(default)]
    pub confirm: bool,
}

impl SubmitRequest {
    /// Prompt shown when the taker is about to leave questions unanswered
    pub fn unanswered_prompt(&self) -> Option<String> {
        match (self.answered, self.total) {
            (Some(answered), Some(total)) if answered < total && !self.confirm => Some(format!(
                "You have answered {} out of {} questions. Submit anyway?",
                answered, total
            )),
            _ => None,
        }
    }
}

/// API response structure for submission requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub submission: Option<Submission>,
}

impl SubmitResponse {
    /// Create a new API response
    pub fn new(status: &str, message: String, submission: Option<Submission>) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            submission,
        }
    }

    pub fn submitted(submission: Submission) -> Self {
        Self::new("submitted", "Attempt submitted".to_string(), Some(submission))
    }

    pub fn already_submitted(submission: Submission) -> Self {
        Self::new(
            "already_submitted",
            format!("Attempt was already submitted ({})", submission.reason.as_str()),
            Some(submission),
        )
    }

    pub fn confirm_required(prompt: String) -> Self {
        Self::new("confirm_required", prompt, None)
    }

    pub fn invalid(message: String) -> Self {
        Self::new("invalid", message, None)
    }
}

/// Timer status with the current display state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerStatusResponse {
    pub view: TimerView,
    pub time_limit_minutes: u32,
    pub submission: Option<Submission>,
    pub last_error: Option<String>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_only_for_unconfirmed_partial_answers() {
        let partial = SubmitRequest { answered: Some(3), total: Some(5), confirm: false };
        assert_eq!(
            partial.unanswered_prompt().as_deref(),
            Some("You have answered 3 out of 5 questions. Submit anyway?")
        );

        let confirmed = SubmitRequest { confirm: true, ..partial.clone() };
        assert_eq!(confirmed.unanswered_prompt(), None);

        let complete = SubmitRequest { answered: Some(5), ..partial };
        assert_eq!(complete.unanswered_prompt(), None);

        assert_eq!(SubmitRequest::default().unanswered_prompt(), None);
    }
}
