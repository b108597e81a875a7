//! Problem snapshot.
//!
//! A `ProblemModel` bundles the tasks, resources, and constraints of one
//! allocation run. It is built once and only read afterwards.

use serde::{Deserialize, Serialize};

use super::clock::DAY_START_MIN;
use super::{Constraint, Resource, Task};
use crate::error::Result;
use crate::validation::{build_problem, ProblemInput};

/// Immutable input of one allocation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemModel {
    /// Tasks, in input order.
    pub tasks: Vec<Task>,
    /// Resources, in enumeration order (used for tie-breaking).
    pub resources: Vec<Resource>,
    /// Operating constraints.
    pub constraints: Vec<Constraint>,
    /// Start of the operating day (minutes-of-day).
    pub day_start_min: i64,
}

impl ProblemModel {
    /// Creates a problem with the default day start (08:00).
    pub fn new(tasks: Vec<Task>, resources: Vec<Resource>) -> Self {
        Self {
            tasks,
            resources,
            constraints: Vec::new(),
            day_start_min: DAY_START_MIN,
        }
    }

    /// Builds a problem from raw records, rejecting malformed ones.
    pub fn from_input(input: &ProblemInput) -> Result<Self> {
        build_problem(input)
    }

    /// Parses a JSON [`ProblemInput`] and builds the problem.
    pub fn from_json(json: &str) -> Result<Self> {
        let input: ProblemInput = serde_json::from_str(json)?;
        build_problem(&input)
    }

    /// Sets the constraints.
    pub fn with_constraints(mut self, constraints: Vec<Constraint>) -> Self {
        self.constraints = constraints;
        self
    }

    /// Sets the day start.
    pub fn with_day_start(mut self, day_start_min: i64) -> Self {
        self.day_start_min = day_start_min;
        self
    }

    /// Finds a task by ID.
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Finds a resource by ID.
    pub fn resource(&self, id: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }

    /// Number of tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Number of resources.
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// No-fly zones among the constraints.
    pub fn no_fly_zones(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints
            .iter()
            .filter(|c| matches!(c, Constraint::NoFlyZone { .. }))
    }
}
