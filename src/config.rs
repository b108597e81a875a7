//! Allocation and evaluation settings.
//!
//! The defaults are the fixed constants of the scoring model. Callers can
//! deserialize overrides (missing fields fall back to the defaults) and
//! must call `validate()` before use when the values come from outside.

use serde::{Deserialize, Serialize};

use crate::error::{AllocError, Result};

/// Fixed turnaround added to every task (minutes).
pub const TURNAROUND_MIN: i64 = 15;

/// Settings shared by all allocation strategies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// Travel allowance to and from base added to each task.
    pub turnaround_min: i64,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            turnaround_min: TURNAROUND_MIN,
        }
    }
}

impl AllocationConfig {
    /// Sets the turnaround.
    pub fn with_turnaround(mut self, turnaround_min: i64) -> Self {
        self.turnaround_min = turnaround_min;
        self
    }

    /// Rejects negative turnaround.
    pub fn validate(&self) -> Result<()> {
        if self.turnaround_min < 0 {
            return Err(AllocError::InvalidConfig(format!(
                "turnaround_min must be >= 0, got {}",
                self.turnaround_min
            )));
        }
        Ok(())
    }
}

/// Weights of the four sub-scores in the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub task_completion: f64,
    pub time_efficiency: f64,
    pub resource_utilization: f64,
    pub constraint_satisfaction: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            task_completion: 0.4,
            time_efficiency: 0.25,
            resource_utilization: 0.2,
            constraint_satisfaction: 0.15,
        }
    }
}

impl ScoreWeights {
    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.task_completion
            + self.time_efficiency
            + self.resource_utilization
            + self.constraint_satisfaction
    }
}

/// Settings of the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Sub-score weights. Must be non-negative and sum to 1.
    pub weights: ScoreWeights,
    /// Completion span (after day start) at which time efficiency reaches 0.
    pub time_ceiling_min: f64,
    /// Task-count standard deviation at which load balance reaches 0.
    pub load_balance_divisor: f64,
    /// Penalty per tight-schedule conflict.
    pub conflict_penalty: f64,
    /// Penalty per constraint violation.
    pub violation_penalty: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            time_ceiling_min: 240.0,
            load_balance_divisor: 2.0,
            conflict_penalty: 0.2,
            violation_penalty: 0.3,
        }
    }
}

impl EvaluationConfig {
    /// Sets the sub-score weights.
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the time-efficiency ceiling.
    pub fn with_time_ceiling(mut self, minutes: f64) -> Self {
        self.time_ceiling_min = minutes;
        self
    }

    /// Sets the penalties per conflict and per violation.
    pub fn with_penalties(mut self, conflict: f64, violation: f64) -> Self {
        self.conflict_penalty = conflict;
        self.violation_penalty = violation;
        self
    }

    /// Checks that weights form a convex combination and divisors are positive.
    ///
    /// Keeps the overall score inside [0, 100].
    pub fn validate(&self) -> Result<()> {
        let w = &self.weights;
        let all = [
            w.task_completion,
            w.time_efficiency,
            w.resource_utilization,
            w.constraint_satisfaction,
        ];
        if all.iter().any(|x| !x.is_finite() || *x < 0.0) {
            return Err(AllocError::InvalidConfig(
                "score weights must be finite and non-negative".to_string(),
            ));
        }
        if (w.total() - 1.0).abs() > 1e-9 {
            return Err(AllocError::InvalidConfig(format!(
                "score weights must sum to 1, got {}",
                w.total()
            )));
        }
        if self.time_ceiling_min.is_nan() || self.time_ceiling_min <= 0.0 {
            return Err(AllocError::InvalidConfig(
                "time_ceiling_min must be positive".to_string(),
            ));
        }
        if self.load_balance_divisor.is_nan() || self.load_balance_divisor <= 0.0 {
            return Err(AllocError::InvalidConfig(
                "load_balance_divisor must be positive".to_string(),
            ));
        }
        if self.conflict_penalty < 0.0 || self.violation_penalty < 0.0 {
            return Err(AllocError::InvalidConfig(
                "penalties must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
