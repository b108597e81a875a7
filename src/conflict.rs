//! Post-hoc conflict detection.
//!
//! Scans a finished allocation for two kinds of signal:
//!
//! - **Conflicts**: a resource holds more than one assignment. This flags a
//!   tight schedule, not an actual clash; back-to-back tasks count too.
//! - **Violations**: structured breaches of a hard rule. A true interval
//!   overlap on one resource, an assignment outside its task's window or
//!   before its resource is available, a capability mismatch, a no-fly zone
//!   entered while active, a task placed twice, an unknown task/resource id,
//!   or a problem task listed neither as assigned nor as unassigned.
//!
//! Strategies in this crate never produce violations. Allocations built from
//! external documents can.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::feasibility::capability_ok;
use crate::models::{format_clock, Allocation, Assignment, ProblemModel};

/// A resource carrying more than one assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    /// Flagged resource.
    pub resource_id: String,
    /// Its tasks, in assignment order.
    pub task_ids: Vec<String>,
    /// Human-readable description.
    pub message: String,
}

/// A broken hard rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity ID (task or resource).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

/// Classification of violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationType {
    /// Two assignments occupy one resource at the same time.
    Overlap,
    /// Execution (turnaround included) leaves the task's window.
    OutsideWindow,
    /// Assignment starts before the resource is available.
    ResourceUnavailable,
    /// Resource cannot carry the task's payload.
    CapabilityMismatch,
    /// Task location is a no-fly zone during execution.
    NoFlyZone,
    /// Task appears more than once across assignments and unassigned ids.
    DuplicateAssignment,
    /// Assignment or unassigned list names a task the problem does not have.
    UnknownTask,
    /// Problem task appears neither in assignments nor as unassigned.
    MissingTask,
    /// Assignment names a resource the problem does not have.
    UnknownResource,
}

impl ViolationType {
    fn severity(self) -> i32 {
        match self {
            ViolationType::NoFlyZone => 95,
            ViolationType::Overlap => 90,
            ViolationType::CapabilityMismatch => 85,
            ViolationType::OutsideWindow => 80,
            ViolationType::ResourceUnavailable => 75,
            ViolationType::DuplicateAssignment => 70,
            ViolationType::UnknownTask
            | ViolationType::UnknownResource
            | ViolationType::MissingTask => 60,
        }
    }
}

impl Violation {
    fn new(violation_type: ViolationType, entity_id: impl Into<String>, message: String) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message,
            severity: violation_type.severity(),
        }
    }
}

/// Coarse risk classification of an allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    /// No conflicts, no violations.
    Low,
    /// Tight schedules only.
    Medium,
    /// At least one violation.
    High,
}

impl RiskLevel {
    /// Safety score for this level: 1.0, 0.7, 0.4.
    pub fn safety_score(self) -> f64 {
        match self {
            RiskLevel::Low => 1.0,
            RiskLevel::Medium => 0.7,
            RiskLevel::High => 0.4,
        }
    }
}

/// Output of [`ConflictDetector::detect`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub conflicts: Vec<Conflict>,
    pub violations: Vec<Violation>,
}

impl ConflictReport {
    /// Number of tight-schedule conflicts.
    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }

    /// Number of violations.
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    /// Whether nothing was flagged.
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty() && self.violations.is_empty()
    }

    /// Risk derived from the flags.
    pub fn risk_level(&self) -> RiskLevel {
        if !self.violations.is_empty() {
            RiskLevel::High
        } else if !self.conflicts.is_empty() {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Violations of one type.
    pub fn violations_of(&self, violation_type: ViolationType) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.violation_type == violation_type)
            .collect()
    }
}

/// Scans allocations for conflicts and violations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictDetector;

impl ConflictDetector {
    /// Creates a detector.
    pub fn new() -> Self {
        Self
    }

    /// Inspects `allocation` against `problem`.
    pub fn detect(&self, allocation: &Allocation, problem: &ProblemModel) -> ConflictReport {
        let mut report = ConflictReport::default();

        // Group by resource, keeping first-appearance order.
        let mut groups: Vec<(&str, Vec<&Assignment>)> = Vec::new();
        let mut group_of: HashMap<&str, usize> = HashMap::new();
        for a in &allocation.assignments {
            let idx = *group_of.entry(a.resource_id.as_str()).or_insert_with(|| {
                groups.push((a.resource_id.as_str(), Vec::new()));
                groups.len() - 1
            });
            groups[idx].1.push(a);
        }

        for (resource_id, assignments) in &groups {
            if assignments.len() > 1 {
                let task_ids: Vec<String> = assignments.iter().map(|a| a.task_id.clone()).collect();
                let conflict = Conflict {
                    resource_id: resource_id.to_string(),
                    message: format!(
                        "{resource_id} has a tight schedule: {}",
                        task_ids.join(", ")
                    ),
                    task_ids,
                };
                debug!("conflict: {}", conflict.message);
                report.conflicts.push(conflict);
            }
            check_overlaps(resource_id, assignments, &mut report.violations);
        }

        for a in &allocation.assignments {
            check_assignment(a, problem, &mut report.violations);
        }
        check_duplicates(allocation, &mut report.violations);
        check_coverage(allocation, problem, &mut report.violations);

        for v in &report.violations {
            warn!("violation ({:?}): {}", v.violation_type, v.message);
        }
        report
    }
}

fn check_overlaps(resource_id: &str, assignments: &[&Assignment], out: &mut Vec<Violation>) {
    for (i, a) in assignments.iter().enumerate() {
        for b in &assignments[i + 1..] {
            if a.overlaps(b) {
                out.push(Violation::new(
                    ViolationType::Overlap,
                    resource_id,
                    format!(
                        "{resource_id} runs {} ({}-{}) and {} ({}-{}) at the same time",
                        a.task_id,
                        format_clock(a.start_min),
                        format_clock(a.end_min()),
                        b.task_id,
                        format_clock(b.start_min),
                        format_clock(b.end_min()),
                    ),
                ));
            }
        }
    }
}

fn check_assignment(a: &Assignment, problem: &ProblemModel, out: &mut Vec<Violation>) {
    let task = problem.task(&a.task_id);
    let resource = problem.resource(&a.resource_id);

    if task.is_none() {
        out.push(Violation::new(
            ViolationType::UnknownTask,
            &a.task_id,
            format!("assignment names unknown task {}", a.task_id),
        ));
    }
    if resource.is_none() {
        out.push(Violation::new(
            ViolationType::UnknownResource,
            &a.resource_id,
            format!("{} is assigned to unknown resource {}", a.task_id, a.resource_id),
        ));
    }
    let Some(task) = task else {
        return;
    };

    if !task.time_window.contains_interval(a.start_min, a.end_min()) {
        out.push(Violation::new(
            ViolationType::OutsideWindow,
            &task.id,
            format!(
                "{} runs {}-{}, outside its window {}-{}",
                task.id,
                format_clock(a.start_min),
                format_clock(a.end_min()),
                format_clock(task.time_window.start_min),
                format_clock(task.time_window.end_min),
            ),
        ));
    }

    for zone in problem.no_fly_zones() {
        if zone.forbids(&task.location, a.start_min, a.end_min()) {
            out.push(Violation::new(
                ViolationType::NoFlyZone,
                &task.id,
                format!(
                    "{} operates over no-fly zone {} at {}",
                    task.id,
                    task.location,
                    format_clock(a.start_min)
                ),
            ));
        }
    }

    let Some(resource) = resource else {
        return;
    };
    if !capability_ok(resource, task) {
        out.push(Violation::new(
            ViolationType::CapabilityMismatch,
            &task.id,
            format!(
                "{} cannot carry {} ({} kg > {} kg)",
                resource.id, task.id, task.payload_kg, resource.max_payload_kg
            ),
        ));
    }
    if a.start_min < resource.available_from_min {
        out.push(Violation::new(
            ViolationType::ResourceUnavailable,
            &resource.id,
            format!(
                "{} starts {} before {} is available at {}",
                task.id,
                format_clock(a.start_min),
                resource.id,
                format_clock(resource.available_from_min)
            ),
        ));
    }
}

fn check_duplicates(allocation: &Allocation, out: &mut Vec<Violation>) {
    let mut seen: HashSet<&str> = HashSet::new();
    let ids = allocation
        .assignments
        .iter()
        .map(|a| a.task_id.as_str())
        .chain(allocation.unassigned_task_ids.iter().map(String::as_str));
    for id in ids {
        if !seen.insert(id) {
            out.push(Violation::new(
                ViolationType::DuplicateAssignment,
                id,
                format!("{id} is listed more than once"),
            ));
        }
    }
}

/// Every task accounted for, and nothing foreign in the unassigned list.
fn check_coverage(allocation: &Allocation, problem: &ProblemModel, out: &mut Vec<Violation>) {
    for id in &allocation.unassigned_task_ids {
        if problem.task(id).is_none() {
            out.push(Violation::new(
                ViolationType::UnknownTask,
                id,
                format!("unassigned list names unknown task {id}"),
            ));
        }
    }

    let listed: HashSet<&str> = allocation
        .assignments
        .iter()
        .map(|a| a.task_id.as_str())
        .chain(allocation.unassigned_task_ids.iter().map(String::as_str))
        .collect();
    for task in &problem.tasks {
        if !listed.contains(task.id.as_str()) {
            out.push(Violation::new(
                ViolationType::MissingTask,
                &task.id,
                format!("{} is neither assigned nor listed as unassigned", task.id),
            ));
        }
    }
}
