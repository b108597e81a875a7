//! Metric computation.
//!
//! Runs the conflict detector once and derives the four sub-scores and the
//! weighted overall score from it.

use log::debug;
use std::collections::{BTreeMap, HashSet};

use super::metrics::{
    ConstraintSatisfaction, Metrics, PriorityStats, ResourceUtilization, TaskCompletion,
    TimeEfficiency,
};
use crate::config::EvaluationConfig;
use crate::conflict::{ConflictDetector, ConflictReport};
use crate::models::{Allocation, Assignment, Priority, ProblemModel};

/// Scores allocations.
///
/// Evaluation is a pure function of the allocation, the problem, and the
/// configuration. Empty inputs yield zero scores, never NaN.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: EvaluationConfig,
    detector: ConflictDetector,
}

impl Evaluator {
    /// Creates an evaluator with the default weights.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the evaluation settings.
    pub fn with_config(mut self, config: EvaluationConfig) -> Self {
        self.config = config;
        self
    }

    /// The settings in use.
    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Computes all metrics, running conflict detection internally.
    pub fn evaluate(&self, allocation: &Allocation, problem: &ProblemModel) -> Metrics {
        let report = self.detector.detect(allocation, problem);
        self.evaluate_with_report(allocation, problem, &report)
    }

    /// Computes all metrics from a precomputed conflict report.
    pub fn evaluate_with_report(
        &self,
        allocation: &Allocation,
        problem: &ProblemModel,
        report: &ConflictReport,
    ) -> Metrics {
        let task_completion = self.task_completion(allocation, problem);
        let time_efficiency = self.time_efficiency(allocation, problem);
        let resource_utilization = self.resource_utilization(allocation, problem);
        let constraint_satisfaction = self.constraint_satisfaction(report);

        let w = &self.config.weights;
        let weighted = w.task_completion * task_completion.score
            + w.time_efficiency * time_efficiency.score
            + w.resource_utilization * resource_utilization.score
            + w.constraint_satisfaction * constraint_satisfaction.score;
        let overall_score = (100.0 * weighted).clamp(0.0, 100.0);

        debug!(
            "evaluate({}): completion={:.3} time={:.3} utilization={:.3} constraints={:.3} overall={:.2}",
            allocation.strategy,
            task_completion.score,
            time_efficiency.score,
            resource_utilization.score,
            constraint_satisfaction.score,
            overall_score
        );

        Metrics {
            task_completion,
            time_efficiency,
            resource_utilization,
            constraint_satisfaction,
            overall_score,
        }
    }

    fn task_completion(&self, allocation: &Allocation, problem: &ProblemModel) -> TaskCompletion {
        // Distinct known tasks; duplicates and foreign ids are violations, not completions.
        let completed: HashSet<&str> = allocation
            .assignments
            .iter()
            .map(|a| a.task_id.as_str())
            .filter(|id| problem.task(id).is_some())
            .collect();

        let mut priority_breakdown: BTreeMap<Priority, PriorityStats> = BTreeMap::new();
        for task in &problem.tasks {
            let stats = priority_breakdown.entry(task.priority).or_default();
            stats.total += 1;
            if completed.contains(task.id.as_str()) {
                stats.completed += 1;
            }
        }

        let total_tasks = problem.task_count();
        let completed_tasks = completed.len();
        let (high_total, high_completed) = priority_breakdown
            .iter()
            .filter(|(p, _)| p.is_high())
            .fold((0, 0), |(t, c), (_, s)| (t + s.total, c + s.completed));

        TaskCompletion {
            total_tasks,
            completed_tasks,
            unassigned_tasks: total_tasks.saturating_sub(completed_tasks),
            completion_rate: 100.0 * ratio(completed_tasks, total_tasks),
            high_priority_completion_rate: 100.0 * ratio(high_completed, high_total),
            priority_breakdown,
            score: ratio(completed_tasks, total_tasks).min(1.0),
        }
    }

    fn time_efficiency(&self, allocation: &Allocation, problem: &ProblemModel) -> TimeEfficiency {
        if allocation.assignments.is_empty() {
            return TimeEfficiency {
                total_completion_time_min: 0.0,
                average_wait_time_min: 0.0,
                urgent_response_time_min: 0.0,
                score: 0.0,
            };
        }

        let day_start = problem.day_start_min;
        let span = allocation
            .total_completion_min
            .saturating_sub(day_start)
            .max(0) as f64;
        let score = (1.0 - span / self.config.time_ceiling_min).clamp(0.0, 1.0);

        let waits: Vec<f64> = allocation
            .assignments
            .iter()
            .map(|a| a.start_min.saturating_sub(day_start).max(0) as f64)
            .collect();

        let responses: Vec<f64> = allocation
            .assignments
            .iter()
            .filter(|a| priority_of(a, problem) == Priority::Urgent)
            .map(|a| {
                let release = problem
                    .task(&a.task_id)
                    .map_or(day_start, |t| t.time_window.start_min);
                a.start_min.saturating_sub(release).max(0) as f64
            })
            .collect();

        TimeEfficiency {
            total_completion_time_min: span,
            average_wait_time_min: mean(&waits),
            urgent_response_time_min: mean(&responses),
            score,
        }
    }

    fn resource_utilization(
        &self,
        allocation: &Allocation,
        problem: &ProblemModel,
    ) -> ResourceUtilization {
        let mut distribution: BTreeMap<String, usize> = BTreeMap::new();
        for a in &allocation.assignments {
            *distribution.entry(a.resource_id.clone()).or_insert(0) += 1;
        }

        let total_resources = problem.resource_count();
        let used_resources = distribution.len();
        let rate = ratio(used_resources, total_resources).min(1.0);

        let counts: Vec<f64> = distribution.values().map(|&c| c as f64).collect();
        let std = population_std(&counts);
        let load_balance_score = if counts.len() < 2 {
            1.0
        } else {
            (1.0 - std / self.config.load_balance_divisor).max(0.0)
        };

        // Zero resources cannot be utilized, whatever the balance says.
        let score = if total_resources == 0 {
            0.0
        } else {
            0.5 * rate + 0.5 * load_balance_score
        };

        ResourceUtilization {
            total_resources,
            used_resources,
            utilization_rate: 100.0 * rate,
            resource_task_distribution: distribution,
            load_balance_std: std,
            load_balance_score,
            score,
        }
    }

    fn constraint_satisfaction(&self, report: &ConflictReport) -> ConstraintSatisfaction {
        let conflict_count = report.conflict_count();
        let constraint_violations = report.violation_count();
        let penalty = self.config.conflict_penalty * conflict_count as f64
            + self.config.violation_penalty * constraint_violations as f64;
        let risk_level = report.risk_level();

        ConstraintSatisfaction {
            conflicts: report.conflicts.iter().map(|c| c.message.clone()).collect(),
            conflict_count,
            constraint_violations,
            risk_level,
            safety_score: risk_level.safety_score(),
            score: (1.0 - penalty).clamp(0.0, 1.0),
        }
    }
}

/// Priority from the problem when the task is known, else as recorded.
fn priority_of(assignment: &Assignment, problem: &ProblemModel) -> Priority {
    problem
        .task(&assignment.task_id)
        .map_or(assignment.priority, |t| t.priority)
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}
