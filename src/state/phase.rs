//! Urgency phases and the threshold table that selects them

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Remaining seconds at or below which the timer shows a warning
pub const DEFAULT_WARNING_SECONDS: u32 = 300;
/// Remaining seconds at or below which the timer shows danger
pub const DEFAULT_DANGER_SECONDS: u32 = 60;

/// Urgency level of a running timer, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Normal,
    Warning,
    Danger,
    Expired,
}

impl Phase {
    /// Presentation class for the timer element
    pub fn css_class(&self) -> &'static str {
        match self {
            Phase::Normal => "timer",
            Phase::Warning => "timer warning",
            Phase::Danger => "timer danger",
            Phase::Expired => "timer expired",
        }
    }
}

/// Ordered `(threshold_seconds, phase)` table.
///
/// Entries are kept sorted by ascending threshold. A remaining time selects
/// the first entry whose threshold it is at or below, so boundaries are
/// inclusive. Severity strictly decreases as the threshold grows, which keeps
/// the phase from ever regressing while time runs down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thresholds {
    entries: Vec<(u32, Phase)>,
}

impl Thresholds {
    pub fn new(mut entries: Vec<(u32, Phase)>) -> Result<Self, ConfigurationError> {
        for &(seconds, phase) in &entries {
            if matches!(phase, Phase::Normal | Phase::Expired) {
                return Err(ConfigurationError::InvalidThresholds(format!(
                    "{:?} cannot be assigned a threshold",
                    phase
                )));
            }
            if seconds == 0 {
                return Err(ConfigurationError::InvalidThresholds(format!(
                    "{:?} threshold must be above zero",
                    phase
                )));
            }
        }

        entries.sort_by_key(|&(seconds, _)| seconds);

        for pair in entries.windows(2) {
            let (lower_secs, lower_phase) = pair[0];
            let (upper_secs, upper_phase) = pair[1];
            if lower_secs == upper_secs {
                return Err(ConfigurationError::InvalidThresholds(format!(
                    "duplicate threshold {}s",
                    lower_secs
                )));
            }
            if lower_phase <= upper_phase {
                return Err(ConfigurationError::InvalidThresholds(format!(
                    "{:?} at {}s must be more severe than {:?} at {}s",
                    lower_phase, lower_secs, upper_phase, upper_secs
                )));
            }
        }

        Ok(Self { entries })
    }

    /// Warning/danger table with the given boundaries
    pub fn warning_danger(warning_at: u32, danger_at: u32) -> Result<Self, ConfigurationError> {
        Self::new(vec![(danger_at, Phase::Danger), (warning_at, Phase::Warning)])
    }

    /// Phase for a number of remaining seconds
    pub fn phase_for(&self, remaining_seconds: i64) -> Phase {
        if remaining_seconds <= 0 {
            return Phase::Expired;
        }
        self.entries
            .iter()
            .find(|&&(seconds, _)| remaining_seconds <= i64::from(seconds))
            .map(|&(_, phase)| phase)
            .unwrap_or(Phase::Normal)
    }

    pub fn entries(&self) -> &[(u32, Phase)] {
        &self.entries
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            entries: vec![
                (DEFAULT_DANGER_SECONDS, Phase::Danger),
                (DEFAULT_WARNING_SECONDS, Phase::Warning),
            ],
        }
    }
}
