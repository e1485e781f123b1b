//! Background tasks module
//! 
//! This module contains background tasks that run alongside the HTTP server.

pub mod deadline_timer;

// Re-export main functions
pub use deadline_timer::{deadline_timer_task, TimerExit, TICK_INTERVAL};
