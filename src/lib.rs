//! Multi-resource task allocation.
//!
//! Assigns time-windowed, prioritized tasks to capability-limited mobile
//! resources, then scores the result on completion, timeliness, resource
//! usage, and constraint compliance.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Task`, `Resource`, `Constraint`,
//!   `ProblemModel`, `Allocation`, `Assignment`, clock helpers
//! - **`validation`**: Raw input records and integrity checks (missing fields,
//!   bad times, duplicate IDs)
//! - **`feasibility`**: Capability and time-window checks shared by all strategies
//! - **`scheduler`**: Greedy and seeded random allocators, strategy selection
//! - **`conflict`**: Post-hoc conflict and violation detection
//! - **`evaluation`**: Four-part scoring and the overall score
//! - **`wire`**: Allocation documents (JSON)
//! - **`comparison`**: Strategy ranking on one problem
//! - **`config`**: Turnaround, weights, and penalties
//!
//! # Example
//!
//! ```
//! use u_allocate::models::{Priority, ProblemModel, Resource, Task, TimeWindow};
//! use u_allocate::scheduler::Strategy;
//!
//! let problem = ProblemModel::new(
//!     vec![Task::new("T1", TimeWindow::new(480, 600), 30).with_priority(Priority::High)],
//!     vec![Resource::recon("R1")],
//! );
//! let allocation = u_allocate::allocate(&problem, &Strategy::Greedy);
//! let metrics = u_allocate::evaluate(&allocation, &problem);
//! assert_eq!(metrics.task_completion.completed_tasks, 1);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Gerkey & Matarić (2004), "A Formal Analysis and Taxonomy of Task
//!   Allocation in Multi-Robot Systems"

pub mod comparison;
pub mod config;
pub mod conflict;
pub mod error;
pub mod evaluation;
pub mod feasibility;
pub mod models;
pub mod scheduler;
pub mod validation;
pub mod wire;

#[cfg(test)]
mod fixtures;

pub use comparison::{compare, ComparisonEntry};
pub use error::{AllocError, Result};
pub use evaluation::Metrics;
pub use scheduler::Strategy;

use models::{Allocation, ProblemModel};

/// Runs `strategy` on `problem` with default settings.
pub fn allocate(problem: &ProblemModel, strategy: &Strategy) -> Allocation {
    strategy.allocate(problem)
}

/// Scores `allocation` against `problem` with the default weights.
pub fn evaluate(allocation: &Allocation, problem: &ProblemModel) -> Metrics {
    evaluation::Evaluator::new().evaluate(allocation, problem)
}
