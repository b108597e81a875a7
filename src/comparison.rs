//! Side-by-side strategy comparison.
//!
//! Runs several strategies on one problem, scores each allocation, and ranks
//! them by overall score. Allocations produced elsewhere (decoded documents)
//! can join the ranking.

use log::info;
use serde::Serialize;
use std::time::Instant;

use crate::config::AllocationConfig;
use crate::evaluation::{Evaluator, Metrics};
use crate::models::{Allocation, ProblemModel};
use crate::scheduler::Strategy;

/// One ranked allocation.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonEntry {
    /// Strategy label.
    pub label: String,
    pub allocation: Allocation,
    pub metrics: Metrics,
    /// Wall-clock allocation time. `None` for allocations added as-is.
    pub runtime_ms: Option<f64>,
}

/// Collects entries for one problem.
#[derive(Debug)]
pub struct Comparison<'a> {
    problem: &'a ProblemModel,
    evaluator: Evaluator,
    allocation_config: AllocationConfig,
    entries: Vec<ComparisonEntry>,
}

impl<'a> Comparison<'a> {
    /// Starts an empty comparison with default settings.
    pub fn new(problem: &'a ProblemModel) -> Self {
        Self {
            problem,
            evaluator: Evaluator::new(),
            allocation_config: AllocationConfig::default(),
            entries: Vec::new(),
        }
    }

    /// Sets the evaluator used for every entry.
    pub fn with_evaluator(mut self, evaluator: Evaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Sets the allocation settings passed to every strategy.
    pub fn with_allocation_config(mut self, config: AllocationConfig) -> Self {
        self.allocation_config = config;
        self
    }

    /// Runs and scores a strategy.
    pub fn run(&mut self, strategy: Strategy) -> &ComparisonEntry {
        let started = Instant::now();
        let allocation = strategy.allocate_with(self.problem, self.allocation_config);
        let runtime_ms = started.elapsed().as_secs_f64() * 1000.0;
        self.push(allocation, Some(runtime_ms))
    }

    /// Scores an existing allocation, labelled by its `strategy` field.
    pub fn add_allocation(&mut self, allocation: Allocation) -> &ComparisonEntry {
        self.push(allocation, None)
    }

    fn push(&mut self, allocation: Allocation, runtime_ms: Option<f64>) -> &ComparisonEntry {
        let metrics = self.evaluator.evaluate(&allocation, self.problem);
        let idx = self.entries.len();
        self.entries.push(ComparisonEntry {
            label: allocation.strategy.clone(),
            allocation,
            metrics,
            runtime_ms,
        });
        &self.entries[idx]
    }

    /// Entries ranked by overall score, best first. Ties keep insertion order.
    pub fn finish(self) -> Vec<ComparisonEntry> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.metrics.overall_score.total_cmp(&a.metrics.overall_score));
        for (rank, e) in entries.iter().enumerate() {
            info!(
                "#{} {}: overall {:.2}, {}/{} tasks",
                rank + 1,
                e.label,
                e.metrics.overall_score,
                e.metrics.task_completion.completed_tasks,
                e.metrics.task_completion.total_tasks
            );
        }
        entries
    }
}

/// Runs every strategy on `problem` and ranks the results.
pub fn compare(problem: &ProblemModel, strategies: &[Strategy]) -> Vec<ComparisonEntry> {
    let mut comparison = Comparison::new(problem);
    for &strategy in strategies {
        comparison.run(strategy);
    }
    comparison.finish()
}
