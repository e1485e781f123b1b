//! Quiz Timer - a deadline timer for timed quiz attempts
//! 
//! This library counts down an attempt from a fixed start time and budget,
//! escalates an urgency phase as the deadline nears, and submits the attempt
//! exactly once when time runs out.

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod server;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use server::run;
pub use error::{ConfigurationError, SubmissionError};
pub use state::{AppState, Phase, Thresholds, TimerSession, TimerView};
pub use utils::signals::shutdown_signal;
