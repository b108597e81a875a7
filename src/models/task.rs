//! Task model.
//!
//! A task is a unit of demand: something one mobile resource must carry out
//! inside a time window, optionally hauling a payload.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::TimeWindow;

/// A task to be allocated.
///
/// # Time Representation
/// Window bounds are minutes-of-day (see [`super::clock`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Scheduling priority.
    pub priority: Priority,
    /// Interval the whole execution, turnaround included, must fit into.
    pub time_window: TimeWindow,
    /// Execution time on site (minutes), excluding turnaround.
    pub duration_min: i64,
    /// Payload to carry (kg). Zero when the task carries nothing.
    pub payload_kg: f64,
    /// Task category.
    pub task_type: TaskType,
    /// Target area.
    pub location: String,
}

/// Task priority.
///
/// Variant order is Urgent first, so ordered collections keyed by
/// priority list the most important bucket first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
}

/// Task category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskType {
    /// Area or target reconnaissance.
    Recon,
    /// Payload delivery. Requires a resource that can carry something.
    Transport,
    /// Persistent observation.
    Monitor,
    Strike,
}

impl Priority {
    /// All priorities, most important first.
    pub const ALL: [Priority; 4] = [
        Priority::Urgent,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    /// Ordinal rank used for sorting: Urgent=4, High=3, Medium=2, Low=1.
    #[inline]
    pub fn rank(self) -> u8 {
        match self {
            Priority::Urgent => 4,
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    /// Urgent or High.
    #[inline]
    pub fn is_high(self) -> bool {
        matches!(self, Priority::Urgent | Priority::High)
    }

    /// Parses a priority label (case-insensitive).
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "urgent" | "紧急" => Some(Priority::Urgent),
            "high" | "高" => Some(Priority::High),
            "medium" | "中" => Some(Priority::Medium),
            "low" | "低" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::Urgent => "Urgent",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        };
        f.write_str(label)
    }
}

impl TaskType {
    /// Parses a task type label (case-insensitive).
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "recon" | "reconnaissance" | "侦察" => Some(TaskType::Recon),
            "transport" | "运输" => Some(TaskType::Transport),
            "monitor" | "监控" => Some(TaskType::Monitor),
            "strike" | "打击" => Some(TaskType::Strike),
            _ => None,
        }
    }
}

impl Task {
    /// Creates a Medium-priority recon task with the given window and duration.
    pub fn new(id: impl Into<String>, time_window: TimeWindow, duration_min: i64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            priority: Priority::Medium,
            time_window,
            duration_min,
            payload_kg: 0.0,
            task_type: TaskType::Recon,
            location: String::new(),
        }
    }

    /// Sets the task name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the payload (kg).
    pub fn with_payload(mut self, payload_kg: f64) -> Self {
        self.payload_kg = payload_kg;
        self
    }

    /// Sets the task type.
    pub fn with_type(mut self, task_type: TaskType) -> Self {
        self.task_type = task_type;
        self
    }

    /// Sets the target location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Whether the task carries a payload.
    pub fn has_payload(&self) -> bool {
        self.payload_kg > 0.0
    }
}
