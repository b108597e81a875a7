//! Clock times and time windows.
//!
//! # Time Model
//! All times are whole minutes since midnight of the operating day
//! ("minutes-of-day"). `08:00` is `480`. Values past `23:59` are allowed
//! for completion times that spill over midnight and format as `24:15` etc.

use serde::{Deserialize, Serialize};

/// Default start of the operating day (08:00).
pub const DAY_START_MIN: i64 = 8 * 60;

/// Longest accepted task duration (one day).
pub const MAX_DURATION_MIN: i64 = 24 * 60;

/// A closed time interval [start, end] in minutes-of-day.
///
/// Closed on both ends: an assignment may finish exactly at `end_min`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeWindow {
    /// Earliest start (minutes-of-day).
    pub start_min: i64,
    /// Latest completion (minutes-of-day).
    pub end_min: i64,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start_min: i64, end_min: i64) -> Self {
        Self { start_min, end_min }
    }

    /// Parses a window from two `"HH:MM"` strings.
    pub fn parse(start: &str, end: &str) -> Option<Self> {
        Some(Self::new(parse_clock(start)?, parse_clock(end)?))
    }

    /// Length of the window in minutes.
    #[inline]
    pub fn duration_min(&self) -> i64 {
        self.end_min - self.start_min
    }

    /// Whether `[start, end]` fits entirely inside this window.
    #[inline]
    pub fn contains_interval(&self, start_min: i64, end_min: i64) -> bool {
        start_min >= self.start_min && end_min <= self.end_min
    }

    /// Whether the half-open interval `[start, end)` overlaps this window.
    ///
    /// Touching endpoints do not overlap.
    pub fn overlaps(&self, start_min: i64, end_min: i64) -> bool {
        start_min < self.end_min && self.start_min < end_min
    }
}

/// Parses `"HH:MM"` into minutes-of-day.
///
/// Hours must be `0..=23` and minutes `0..=59`; surrounding whitespace is
/// ignored. Returns `None` for anything else.
pub fn parse_clock(text: &str) -> Option<i64> {
    let (h, m) = text.trim().split_once(':')?;
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return None;
    }
    let hours: i64 = h.parse().ok()?;
    let minutes: i64 = m.parse().ok()?;
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Formats minutes-of-day as `"HH:MM"`.
pub fn format_clock(minutes: i64) -> String {
    let minutes = minutes.max(0);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
