//! Per-run resource availability.

use crate::models::ProblemModel;

/// When each resource becomes free, indexed like `ProblemModel::resources`.
///
/// Owned by a single strategy invocation and dropped with it, so runs on
/// different threads never share state.
#[derive(Debug, Clone)]
pub(crate) struct Availability {
    free_at: Vec<i64>,
    day_start_min: i64,
}

impl Availability {
    /// Seeds every resource with its `available_from_min`.
    pub(crate) fn new(problem: &ProblemModel) -> Self {
        Self {
            free_at: problem
                .resources
                .iter()
                .map(|r| r.available_from_min)
                .collect(),
            day_start_min: problem.day_start_min,
        }
    }

    #[inline]
    pub(crate) fn free_at(&self, resource_idx: usize) -> i64 {
        self.free_at[resource_idx]
    }

    /// Books a resource until `end_min`.
    #[inline]
    pub(crate) fn reserve(&mut self, resource_idx: usize, end_min: i64) {
        self.free_at[resource_idx] = end_min;
    }

    /// Latest free time over all resources; day start when there are none.
    pub(crate) fn completion_min(&self) -> i64 {
        self.free_at
            .iter()
            .copied()
            .max()
            .unwrap_or(self.day_start_min)
    }
}
