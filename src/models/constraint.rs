//! Operating constraints.
//!
//! Only no-fly zones carry data. Concurrency and return-to-base are
//! structural: every strategy enforces one active task per resource and
//! reserves a fixed turnaround after each task regardless of whether the
//! problem lists them.

use serde::{Deserialize, Serialize};

use super::TimeWindow;

/// An operating constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constraint {
    /// No unit may operate over `location` during `time_window`.
    NoFlyZone {
        location: String,
        time_window: TimeWindow,
    },

    /// A unit works on at most one task at a time.
    ConcurrencyLimit,

    /// A unit returns to base after each task, costing the turnaround.
    ReturnToBase,
}

impl Constraint {
    /// Creates a no-fly zone.
    pub fn no_fly_zone(location: impl Into<String>, time_window: TimeWindow) -> Self {
        Self::NoFlyZone {
            location: location.into(),
            time_window,
        }
    }

    /// Short label for logs and diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            Constraint::NoFlyZone { .. } => "no_fly_zone",
            Constraint::ConcurrencyLimit => "concurrency_limit",
            Constraint::ReturnToBase => "return_to_base",
        }
    }

    /// Whether an occupation of `location` over `[start, end)` breaks this constraint.
    ///
    /// Only no-fly zones can be broken this way.
    pub fn forbids(&self, location: &str, start_min: i64, end_min: i64) -> bool {
        match self {
            Constraint::NoFlyZone {
                location: zone,
                time_window,
            } => zone == location && time_window.overlaps(start_min, end_min),
            Constraint::ConcurrencyLimit | Constraint::ReturnToBase => false,
        }
    }
}
