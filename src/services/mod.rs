//! External service module
//! 
//! This module contains the submitters that receive a finished attempt.

pub mod submission;

// Re-export main types
pub use submission::{CommandSubmitter, LogSubmitter, Submitter};
