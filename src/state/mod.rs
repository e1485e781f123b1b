//! State management module
//! 
//! This module contains the timer session, its urgency phases, the submission
//! record, and the shared application state.

pub mod app_state;
pub mod phase;
pub mod submission;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use phase::{Phase, Thresholds};
pub use submission::{SubmitOutcome, SubmitReason, Submission};
pub use timer_state::{format_remaining, parse_start_time, Tick, TimerSession, TimerView};
