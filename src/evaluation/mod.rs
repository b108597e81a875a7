//! Allocation quality metrics.
//!
//! Four normalized sub-scores combined into an overall score.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Task completion | completed / total |
//! | Time efficiency | 1 - (completion - day start) / 240, clamped to [0, 1] |
//! | Resource utilization | 0.5 * used / total + 0.5 * load balance |
//! | Constraint satisfaction | 1 - 0.2 * conflicts - 0.3 * violations, floored at 0 |
//! | Overall | 100 * (0.4 c + 0.25 t + 0.2 r + 0.15 s) |
//!
//! Load balance is `1 - std / 2` over the task counts of used resources
//! (population standard deviation), and 1.0 with fewer than two used.
//! Constants come from [`EvaluationConfig`](crate::config::EvaluationConfig).
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

mod evaluator;
mod metrics;

pub use evaluator::Evaluator;
pub use metrics::{
    ConstraintSatisfaction, Metrics, PriorityStats, ResourceUtilization, TaskCompletion,
    TimeEfficiency,
};
