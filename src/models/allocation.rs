//! Allocation (solution) model.
//!
//! An allocation maps tasks to resources and start times. Tasks that could
//! not be placed are listed as unassigned; that is a normal outcome, not an
//! error.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{Priority, ProblemModel};

/// The result of one allocation run.
///
/// # Invariant
/// Every task of the originating problem appears exactly once, either in
/// `assignments` or in `unassigned_task_ids`. Strategies guarantee this;
/// externally produced allocations can be checked with [`Allocation::is_partition_of`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// Label of the producing strategy.
    pub strategy: String,
    /// Assignments in the order they were made.
    pub assignments: Vec<Assignment>,
    /// Tasks left without a resource, in the order they were rejected.
    pub unassigned_task_ids: Vec<String>,
    /// Latest time any resource becomes free (minutes-of-day).
    pub total_completion_min: i64,
    /// Free-text risk narrative. Carried for the wire format, never scored.
    pub risk_assessment: String,
    /// Free-text notes.
    pub notes: String,
}

/// A task-resource-time assignment.
///
/// The resource is occupied over `[start_min, start_min + duration_min + turnaround_min]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Assigned task.
    pub task_id: String,
    /// Executing resource.
    pub resource_id: String,
    /// Start time (minutes-of-day).
    pub start_min: i64,
    /// On-site execution time (minutes).
    pub duration_min: i64,
    /// Travel allowance to and from base (minutes).
    pub turnaround_min: i64,
    /// Priority of the task at assignment time.
    pub priority: Priority,
    /// Why this resource was chosen.
    pub rationale: String,
}

impl Assignment {
    /// Creates a new assignment without turnaround or rationale.
    pub fn new(
        task_id: impl Into<String>,
        resource_id: impl Into<String>,
        start_min: i64,
        duration_min: i64,
        priority: Priority,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            resource_id: resource_id.into(),
            start_min,
            duration_min,
            turnaround_min: 0,
            priority,
            rationale: String::new(),
        }
    }

    /// Sets the turnaround allowance.
    pub fn with_turnaround(mut self, turnaround_min: i64) -> Self {
        self.turnaround_min = turnaround_min;
        self
    }

    /// Sets the rationale.
    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = rationale.into();
        self
    }

    /// Minutes the resource is occupied, turnaround included.
    ///
    /// Saturates at `i64::MAX`.
    #[inline]
    pub fn occupied_min(&self) -> i64 {
        self.duration_min.saturating_add(self.turnaround_min)
    }

    /// Time the resource becomes free again. Saturates at `i64::MAX`.
    #[inline]
    pub fn end_min(&self) -> i64 {
        self.start_min.saturating_add(self.occupied_min())
    }

    /// Whether two assignments occupy their resource at the same time.
    ///
    /// Back-to-back assignments (one ends when the other starts) do not overlap.
    pub fn overlaps(&self, other: &Assignment) -> bool {
        self.start_min < other.end_min() && other.start_min < self.end_min()
    }
}

impl Allocation {
    /// Creates an empty allocation labelled with the producing strategy.
    pub fn new(strategy: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            ..Self::default()
        }
    }

    /// Sets the risk narrative and notes.
    pub fn with_narrative(mut self, risk_assessment: impl Into<String>, notes: impl Into<String>) -> Self {
        self.risk_assessment = risk_assessment.into();
        self.notes = notes.into();
        self
    }

    /// Adds an assignment.
    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Marks a task as unassigned.
    pub fn mark_unassigned(&mut self, task_id: impl Into<String>) {
        self.unassigned_task_ids.push(task_id.into());
    }

    /// Finds the assignment for a task.
    pub fn assignment_for_task(&self, task_id: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.task_id == task_id)
    }

    /// Returns all assignments of a resource, in assignment order.
    pub fn assignments_for_resource(&self, resource_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.resource_id == resource_id)
            .collect()
    }

    /// Whether a task was left unassigned.
    pub fn is_unassigned(&self, task_id: &str) -> bool {
        self.unassigned_task_ids.iter().any(|id| id == task_id)
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Latest assignment end, or `None` without assignments.
    pub fn latest_end_min(&self) -> Option<i64> {
        self.assignments.iter().map(|a| a.end_min()).max()
    }

    /// Whether assignments and unassigned ids partition the problem's tasks.
    ///
    /// True iff every task id occurs exactly once across both lists and no
    /// foreign id occurs.
    pub fn is_partition_of(&self, problem: &ProblemModel) -> bool {
        let expected: HashSet<&str> = problem.tasks.iter().map(|t| t.id.as_str()).collect();
        let mut seen: HashSet<&str> = HashSet::new();
        let ids = self
            .assignments
            .iter()
            .map(|a| a.task_id.as_str())
            .chain(self.unassigned_task_ids.iter().map(String::as_str));
        for id in ids {
            if !expected.contains(id) || !seen.insert(id) {
                return false;
            }
        }
        seen.len() == expected.len()
    }
}
