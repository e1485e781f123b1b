//! Timer session and the display state derived from it

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::phase::{Phase, Thresholds};
use crate::{clock::Clock, error::ConfigurationError};

/// Display state of the timer at one instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerView {
    pub start_time: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub remaining_seconds: i64,
    pub phase: Phase,
    pub css_class: String,
    /// `Time: M:SS`, absent once the deadline has passed
    pub display: Option<String>,
}

impl TimerView {
    pub fn is_expired(&self) -> bool {
        self.phase == Phase::Expired
    }
}

/// Result of one scheduled recomputation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Deadline not reached; render this view
    Running(TimerView),
    /// First observation of the deadline; run the terminal action now
    Expired(TimerView),
    /// Deadline was already reported by an earlier tick
    Finished,
}

/// A single countdown with a fixed start and budget.
///
/// Nothing about the session changes after construction except the one-shot
/// expiry flag. Every view is recomputed from the clock, so a late or skipped
/// tick lands on the same result as if every tick had run.
#[derive(Clone)]
pub struct TimerSession {
    start_time: DateTime<Utc>,
    time_limit_minutes: u32,
    deadline: DateTime<Utc>,
    thresholds: Thresholds,
    clock: Arc<dyn Clock>,
    expired: bool,
}

impl TimerSession {
    pub fn new(
        start_time: DateTime<Utc>,
        time_limit_minutes: i64,
        thresholds: Thresholds,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigurationError> {
        let limit = u32::try_from(time_limit_minutes)
            .ok()
            .filter(|&m| m > 0)
            .ok_or_else(|| ConfigurationError::InvalidTimeLimit(time_limit_minutes.to_string()))?;

        let now = clock.now();
        if start_time > now {
            return Err(ConfigurationError::StartTimeInFuture {
                start: start_time.to_rfc3339(),
                now: now.to_rfc3339(),
            });
        }

        let deadline = start_time
            .checked_add_signed(Duration::minutes(i64::from(limit)))
            .ok_or_else(|| ConfigurationError::InvalidTimeLimit(time_limit_minutes.to_string()))?;

        Ok(Self {
            start_time,
            time_limit_minutes: limit,
            deadline,
            thresholds,
            clock,
            expired: false,
        })
    }

    /// Build a session from host-supplied strings, as read off a page
    pub fn from_raw(
        start_time: &str,
        time_limit_minutes: &str,
        thresholds: Thresholds,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigurationError> {
        let raw_limit = time_limit_minutes.trim();
        let limit = raw_limit
            .parse::<i64>()
            .map_err(|_| ConfigurationError::InvalidTimeLimit(raw_limit.to_string()))?;
        Self::new(parse_start_time(start_time)?, limit, thresholds, clock)
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    pub fn time_limit_minutes(&self) -> u32 {
        self.time_limit_minutes
    }

    pub fn limit_seconds(&self) -> i64 {
        i64::from(self.time_limit_minutes) * 60
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Whole seconds elapsed since the start, floored
    pub fn elapsed_seconds_at(&self, now: DateTime<Utc>) -> i64 {
        (now - self.start_time).num_milliseconds().div_euclid(1000)
    }

    pub fn remaining_seconds_at(&self, now: DateTime<Utc>) -> i64 {
        self.limit_seconds() - self.elapsed_seconds_at(now)
    }

    /// Pure evaluation of the display state at `now`
    pub fn view_at(&self, now: DateTime<Utc>) -> TimerView {
        let remaining = self.remaining_seconds_at(now);
        let phase = self.thresholds.phase_for(remaining);
        let display = (phase != Phase::Expired).then(|| format_remaining(remaining));

        TimerView {
            start_time: self.start_time,
            deadline: self.deadline,
            remaining_seconds: remaining,
            phase,
            css_class: phase.css_class().to_string(),
            display,
        }
    }

    /// Display state according to the session's clock
    pub fn view(&self) -> TimerView {
        self.view_at(self.clock.now())
    }

    /// Recompute from the clock, reporting expiry only once
    pub fn tick(&mut self) -> Tick {
        if self.expired {
            return Tick::Finished;
        }
        let view = self.view();
        if view.is_expired() {
            self.expired = true;
            Tick::Expired(view)
        } else {
            Tick::Running(view)
        }
    }

    pub fn has_expired(&self) -> bool {
        self.expired
    }
}

impl std::fmt::Debug for TimerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerSession")
            .field("start_time", &self.start_time)
            .field("time_limit_minutes", &self.time_limit_minutes)
            .field("deadline", &self.deadline)
            .field("thresholds", &self.thresholds)
            .field("expired", &self.expired)
            .finish()
    }
}

/// Render remaining seconds as `Time: M:SS`
pub fn format_remaining(remaining_seconds: i64) -> String {
    let remaining = remaining_seconds.max(0);
    format!("Time: {}:{:02}", remaining / 60, remaining % 60)
}

/// Parse a start timestamp.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]` (or space-separated)
/// timestamp taken as UTC, or integer epoch seconds.
pub fn parse_start_time(raw: &str) -> Result<DateTime<Utc>, ConfigurationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ConfigurationError::MissingStartTime);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }

    raw.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| ConfigurationError::InvalidStartTime(raw.to_string()))
}
