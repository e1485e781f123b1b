//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use quiz_timer::{
    error::SubmissionError,
    services::Submitter,
    state::{AppState, Submission, Thresholds, TimerSession},
    ManualClock,
};

/// Submitter that remembers every submission it receives
#[derive(Default)]
pub struct RecordingSubmitter {
    pub calls: AtomicUsize,
    pub received: Mutex<Vec<Submission>>,
}

impl RecordingSubmitter {
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn received(&self) -> Vec<Submission> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl Submitter for RecordingSubmitter {
    async fn submit(&self, submission: &Submission) -> Result<(), SubmissionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received.lock().unwrap().push(submission.clone());
        Ok(())
    }
}

pub fn attempt_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 7, 13, 0, 0).unwrap()
}

pub struct Fixture {
    pub state: Arc<AppState>,
    pub clock: Arc<ManualClock>,
    pub submitter: Arc<RecordingSubmitter>,
}

/// Session with `limit_minutes` budget, `elapsed_seconds` already gone
pub fn fixture(limit_minutes: i64, elapsed_seconds: i64) -> Fixture {
    let clock = Arc::new(ManualClock::new(
        attempt_start() + Duration::seconds(elapsed_seconds),
    ));
    let session = TimerSession::new(
        attempt_start(),
        limit_minutes,
        Thresholds::default(),
        clock.clone(),
    )
    .unwrap();
    let submitter = Arc::new(RecordingSubmitter::default());
    let state = Arc::new(AppState::new(
        &session,
        submitter.clone(),
        20554,
        "127.0.0.1".to_string(),
    ));

    Fixture {
        state,
        clock,
        submitter,
    }
}
