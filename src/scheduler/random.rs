//! Seeded random allocator.
//!
//! Baseline for comparisons: same feasibility rules as the greedy
//! allocator, but tasks are processed in a random order and each task goes
//! to a uniformly chosen feasible resource. Not meant to be competitive.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::SeedableRng;

use super::availability::Availability;
use super::AllocationStrategy;
use crate::config::AllocationConfig;
use crate::feasibility::{feasible_slot, Slot};
use crate::models::{format_clock, Allocation, Assignment, ProblemModel};

/// Random allocator with a reproducible RNG stream.
///
/// Every call to [`RandomAllocator::allocate`] reseeds, so the same seed on
/// the same problem always yields the same allocation.
#[derive(Debug, Clone)]
pub struct RandomAllocator {
    seed: u64,
    config: AllocationConfig,
}

impl RandomAllocator {
    /// Creates an allocator with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            config: AllocationConfig::default(),
        }
    }

    /// Sets the allocation settings.
    pub fn with_config(mut self, config: AllocationConfig) -> Self {
        self.config = config;
        self
    }

    /// The seed in use.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Allocates every task or marks it unassigned.
    pub fn allocate(&self, problem: &ProblemModel) -> Allocation {
        let turnaround = self.config.turnaround_min;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut allocation = Allocation::new("Random").with_narrative(
            "Random allocation, not optimized",
            format!("Uniform random order and resource choice (seed {})", self.seed),
        );
        let mut availability = Availability::new(problem);

        let mut order: Vec<usize> = (0..problem.tasks.len()).collect();
        order.shuffle(&mut rng);

        for task_idx in order {
            let task = &problem.tasks[task_idx];
            let feasible: Vec<(usize, Slot)> = problem
                .resources
                .iter()
                .enumerate()
                .filter_map(|(r_idx, resource)| {
                    feasible_slot(resource, task, availability.free_at(r_idx), turnaround)
                        .map(|slot| (r_idx, slot))
                })
                .collect();

            match feasible.choose(&mut rng) {
                Some(&(r_idx, slot)) => {
                    let resource = &problem.resources[r_idx];
                    debug!(
                        "random: {} -> {} at {} ({} candidates)",
                        task.id,
                        resource.id,
                        format_clock(slot.start_min),
                        feasible.len()
                    );
                    allocation.add_assignment(
                        Assignment::new(
                            &task.id,
                            &resource.id,
                            slot.start_min,
                            task.duration_min,
                            task.priority,
                        )
                        .with_turnaround(turnaround)
                        .with_rationale("random assignment"),
                    );
                    availability.reserve(r_idx, slot.end_min);
                }
                None => {
                    debug!("random: no feasible resource for {}", task.id);
                    allocation.mark_unassigned(&task.id);
                }
            }
        }

        allocation.total_completion_min = availability.completion_min();
        info!(
            "random(seed={}): assigned {}/{} tasks",
            self.seed,
            allocation.assignment_count(),
            problem.task_count()
        );
        allocation
    }
}

impl AllocationStrategy for RandomAllocator {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn allocate(&self, problem: &ProblemModel) -> Allocation {
        RandomAllocator::allocate(self, problem)
    }
}
