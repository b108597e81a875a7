//! Metric records.
//!
//! Field names are the persisted wire names. Rates are percentages
//! (0-100); every `score` is normalized to [0, 1].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::conflict::RiskLevel;
use crate::models::Priority;

/// Full evaluation of one allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub task_completion: TaskCompletion,
    pub time_efficiency: TimeEfficiency,
    pub resource_utilization: ResourceUtilization,
    pub constraint_satisfaction: ConstraintSatisfaction,
    /// Weighted sum of the four scores, in [0, 100].
    pub overall_score: f64,
}

/// How many tasks were placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCompletion {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub unassigned_tasks: usize,
    /// Percent.
    pub completion_rate: f64,
    /// Percent of Urgent+High tasks placed. Diagnostic only.
    pub high_priority_completion_rate: f64,
    pub priority_breakdown: BTreeMap<Priority, PriorityStats>,
    pub score: f64,
}

/// Totals for one priority bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityStats {
    pub total: usize,
    pub completed: usize,
}

/// How early the work is done.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEfficiency {
    /// Minutes from day start to the last resource becoming free.
    pub total_completion_time_min: f64,
    /// Mean of (start - day start). Diagnostic only.
    pub average_wait_time_min: f64,
    /// Mean of (start - window start) over urgent tasks. Diagnostic only.
    pub urgent_response_time_min: f64,
    pub score: f64,
}

/// How many resources work and how evenly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceUtilization {
    pub total_resources: usize,
    pub used_resources: usize,
    /// Percent.
    pub utilization_rate: f64,
    /// Tasks per used resource.
    pub resource_task_distribution: BTreeMap<String, usize>,
    /// Population standard deviation of the distribution.
    pub load_balance_std: f64,
    pub load_balance_score: f64,
    pub score: f64,
}

/// How cleanly the allocation respects the rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSatisfaction {
    /// Conflict descriptions.
    pub conflicts: Vec<String>,
    pub conflict_count: usize,
    pub constraint_violations: usize,
    pub risk_level: RiskLevel,
    pub safety_score: f64,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_breakdown_serializes_by_name() {
        let mut breakdown = BTreeMap::new();
        breakdown.insert(Priority::Low, PriorityStats { total: 1, completed: 0 });
        breakdown.insert(Priority::Urgent, PriorityStats { total: 2, completed: 1 });
        let json = serde_json::to_value(&breakdown).unwrap();
        assert_eq!(json["Urgent"]["total"], 2);
        assert_eq!(json["Low"]["completed"], 0);

        // Urgent sorts first
        let keys: Vec<Priority> = breakdown.keys().copied().collect();
        assert_eq!(keys, vec![Priority::Urgent, Priority::Low]);
    }
}
