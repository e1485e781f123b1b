//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use tokio::sync::watch;
use tracing::{error, info, warn};

use super::{Submission, SubmitOutcome, TimerSession, TimerView};
use crate::services::Submitter;

/// Shared state between the deadline timer task and the HTTP handlers
pub struct AppState {
    /// Read-only copy of the session used to evaluate fresh views
    session: TimerSession,
    /// Terminal action receiver
    submitter: Arc<dyn Submitter>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last view rendered by the timer task
    pub view_tx: watch::Sender<TimerView>,
    /// One-shot submission latch; `Some` once the attempt has been submitted
    pub submission_tx: watch::Sender<Option<Submission>>,
    /// Set once the submitter has returned for the accepted submission
    pub handed_off_tx: watch::Sender<bool>,
    /// Last handoff failure, for client visibility
    pub last_error: Mutex<Option<String>>,
}

impl AppState {
    /// Create the state and render the session once so the view is never blank
    pub fn new(session: &TimerSession, submitter: Arc<dyn Submitter>, port: u16, host: String) -> Self {
        let (view_tx, _) = watch::channel(session.view());
        let (submission_tx, _) = watch::channel(None);
        let (handed_off_tx, _) = watch::channel(false);

        Self {
            session: session.clone(),
            submitter,
            start_time: Instant::now(),
            port,
            host,
            view_tx,
            submission_tx,
            handed_off_tx,
            last_error: Mutex::new(None),
        }
    }

    pub fn session(&self) -> &TimerSession {
        &self.session
    }

    /// Display state evaluated from the clock right now
    pub fn current_view(&self) -> TimerView {
        self.session.view()
    }

    /// Last view published by the timer task
    pub fn last_rendered_view(&self) -> TimerView {
        self.view_tx.borrow().clone()
    }

    /// Publish a freshly rendered view
    pub fn publish_view(&self, view: TimerView) {
        self.view_tx.send_replace(view);
    }

    pub fn subscribe_views(&self) -> watch::Receiver<TimerView> {
        self.view_tx.subscribe()
    }

    pub fn subscribe_submission(&self) -> watch::Receiver<Option<Submission>> {
        self.submission_tx.subscribe()
    }

    pub fn submission(&self) -> Option<Submission> {
        self.submission_tx.borrow().clone()
    }

    /// Submit the attempt at most once.
    ///
    /// The first caller wins the latch and hands the submission to the
    /// submitter; every later caller gets the winning submission back
    /// untouched. A failed handoff is logged and recorded, never retried.
    pub async fn submit(&self, submission: Submission) -> SubmitOutcome {
        let mut accepted = false;
        self.submission_tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(submission.clone());
            accepted = true;
            true
        });

        if !accepted {
            warn!(
                "Ignoring {} submission, attempt already submitted",
                submission.reason.as_str()
            );
            let existing = self.submission().unwrap_or(submission);
            return SubmitOutcome::AlreadySubmitted(existing);
        }

        info!(
            "Submitting attempt ({}) after {}s",
            submission.reason.as_str(),
            submission.time_taken_seconds
        );
        if let Err(e) = self.submitter.submit(&submission).await {
            error!("Failed to hand off submission: {}", e);
            self.set_last_error(format!("Submission failed: {}", e));
        }
        self.handed_off_tx.send_replace(true);

        SubmitOutcome::Accepted(submission)
    }

    pub fn is_handed_off(&self) -> bool {
        *self.handed_off_tx.borrow()
    }

    /// Wait until the accepted submission has been through the submitter
    pub async fn wait_for_handoff(&self) {
        let mut handed_off_rx = self.handed_off_tx.subscribe();
        // the sender lives in `self`, so the channel cannot close while waiting
        let _ = handed_off_rx.wait_for(|done| *done).await;
    }

    pub fn set_last_error(&self, message: String) {
        if let Ok(mut last_error) = self.last_error.lock() {
            *last_error = Some(message);
        }
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|e| e.clone())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed().as_secs())
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("session", &self.session)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("submission", &self.submission())
            .finish()
    }
}

fn format_uptime(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
