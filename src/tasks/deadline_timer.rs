//! Deadline timer background task

use std::{future::Future, sync::Arc, time::Duration};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::state::{AppState, Submission, SubmitOutcome, Tick};

/// Period between recomputations
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Why the timer task stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerExit {
    /// The deadline passed; carries the result of the automatic submission
    Expired(SubmitOutcome),
    /// The attempt was submitted some other way before the deadline
    Submitted,
    /// The host is shutting down
    Shutdown,
}

/// Background task that drives the timer session until it ends.
///
/// The first tick fires immediately, then once per [`TICK_INTERVAL`]. Each
/// tick recomputes the view from the clock, so late or skipped ticks need no
/// catching up. Scheduling stops on the first tick that sees the deadline.
/// The task only returns after the submitter has finished with the attempt.
pub async fn deadline_timer_task<F>(state: Arc<AppState>, shutdown: F) -> TimerExit
where
    F: Future<Output = ()>,
{
    let mut session = state.session().clone();
    info!(
        "Starting deadline timer: {} minute limit, deadline {}",
        session.time_limit_minutes(),
        session.deadline().to_rfc3339()
    );

    let mut submission_rx = state.subscribe_submission();
    if submission_rx.borrow_and_update().is_some() {
        info!("Attempt already submitted, deadline timer not started");
        state.wait_for_handoff().await;
        return TimerExit::Submitted;
    }

    let mut interval = tokio::time::interval(TICK_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_phase = state.last_rendered_view().phase;

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match session.tick() {
                    Tick::Running(view) => {
                        if view.phase != last_phase {
                            info!("Timer entered {:?} phase with {}s remaining", view.phase, view.remaining_seconds);
                            last_phase = view.phase;
                        }
                        debug!("{}", view.display.as_deref().unwrap_or_default());
                        state.publish_view(view);
                    }
                    Tick::Expired(view) => {
                        info!("Deadline passed ({}s remaining), submitting attempt", view.remaining_seconds);
                        state.publish_view(view);

                        let now = session.clock().now();
                        let outcome = state.submit(Submission::deadline(&session, now)).await;
                        return TimerExit::Expired(outcome);
                    }
                    Tick::Finished => {
                        // expiry was already handed off by an earlier tick
                        return TimerExit::Submitted;
                    }
                }
            }

            changed = submission_rx.changed() => {
                if changed.is_err() || submission_rx.borrow().is_some() {
                    info!("Attempt submitted before the deadline, stopping timer");
                    state.wait_for_handoff().await;
                    return TimerExit::Submitted;
                }
            }

            _ = &mut shutdown => {
                info!("Shutdown requested, stopping deadline timer");
                return TimerExit::Shutdown;
            }
        }
    }
}
