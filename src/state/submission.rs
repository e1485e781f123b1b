//! Record of the terminal action

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timer_state::TimerSession;

/// What triggered the submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitReason {
    /// The deadline passed and the attempt was submitted automatically
    Deadline,
    /// The quiz taker pressed submit
    Manual,
}

impl SubmitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmitReason::Deadline => "deadline",
            SubmitReason::Manual => "manual",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub reason: SubmitReason,
    pub submitted_at: DateTime<Utc>,
    /// Seconds between the start and the submission, never beyond the limit
    pub time_taken_seconds: i64,
    pub answered: Option<u32>,
    pub total: Option<u32>,
}

impl Submission {
    fn new(session: &TimerSession, reason: SubmitReason, now: DateTime<Utc>) -> Self {
        Self {
            reason,
            submitted_at: now,
            time_taken_seconds: session
                .elapsed_seconds_at(now)
                .clamp(0, session.limit_seconds()),
            answered: None,
            total: None,
        }
    }

    pub fn deadline(session: &TimerSession, now: DateTime<Utc>) -> Self {
        Self::new(session, SubmitReason::Deadline, now)
    }

    pub fn manual(
        session: &TimerSession,
        now: DateTime<Utc>,
        answered: Option<u32>,
        total: Option<u32>,
    ) -> Self {
        Self {
            answered,
            total,
            ..Self::new(session, SubmitReason::Manual, now)
        }
    }
}

/// Result of asking for a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// This call won the latch and the submission was handed off
    Accepted(Submission),
    /// An earlier call already submitted; nothing was handed off
    AlreadySubmitted(Submission),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted(_))
    }

    pub fn submission(&self) -> &Submission {
        match self {
            SubmitOutcome::Accepted(s) | SubmitOutcome::AlreadySubmitted(s) => s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clock::ManualClock, state::Thresholds};
    use chrono::{Duration, TimeZone};
    use std::sync::Arc;

    #[test]
    fn time_taken_is_capped_at_the_limit() {
        let start = Utc.with_ymd_and_hms(2024, 1, 8, 10, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let session = TimerSession::new(start, 2, Thresholds::default(), clock).unwrap();

        let early = Submission::manual(&session, start + Duration::seconds(75), Some(3), Some(4));
        assert_eq!(early.time_taken_seconds, 75);
        assert_eq!(early.reason, SubmitReason::Manual);
        assert_eq!(early.answered, Some(3));

        let late = Submission::deadline(&session, start + Duration::seconds(200));
        assert_eq!(late.time_taken_seconds, 120);
        assert_eq!(late.reason, SubmitReason::Deadline);
        assert_eq!(late.total, None);
    }
}
