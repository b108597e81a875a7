//! Priority-driven greedy allocator.
//!
//! # Algorithm
//!
//! 1. Sort tasks by priority rank (descending), then window start
//!    (ascending), then input order.
//! 2. For each task, collect the capable resources whose earliest slot fits
//!    the task's window.
//! 3. Take the one with the earliest start; ties go to the resource listed
//!    first.
//! 4. Book the resource until the slot end (duration + turnaround).
//!
//! Myopic: an assignment is never revisited, even if a later task could
//! have used the slot better.
//!
//! # Complexity
//! O(n log n + n * m) where n=tasks, m=resources.

use log::{debug, info};

use super::availability::Availability;
use super::AllocationStrategy;
use crate::config::AllocationConfig;
use crate::feasibility::{feasible_slot, Slot};
use crate::models::{format_clock, Allocation, Assignment, ProblemModel, Task};

/// Deterministic earliest-start greedy allocator.
///
/// # Example
///
/// ```
/// use u_allocate::models::{ProblemModel, Resource, Task, TimeWindow};
/// use u_allocate::scheduler::GreedyAllocator;
///
/// let problem = ProblemModel::new(
///     vec![Task::new("T1", TimeWindow::new(480, 600), 30)],
///     vec![Resource::recon("R1")],
/// );
/// let allocation = GreedyAllocator::new().allocate(&problem);
/// assert_eq!(allocation.assignment_count(), 1);
/// assert_eq!(allocation.total_completion_min, 480 + 30 + 15);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GreedyAllocator {
    config: AllocationConfig,
}

impl GreedyAllocator {
    /// Creates an allocator with the default turnaround.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the allocation settings.
    pub fn with_config(mut self, config: AllocationConfig) -> Self {
        self.config = config;
        self
    }

    /// Allocates every task or marks it unassigned.
    pub fn allocate(&self, problem: &ProblemModel) -> Allocation {
        let turnaround = self.config.turnaround_min;
        let mut allocation = Allocation::new("Greedy").with_narrative(
            "Greedy allocation, no global optimization",
            "Tasks assigned one by one in priority order; the result may not be optimal",
        );
        let mut availability = Availability::new(problem);

        for task_idx in priority_order(&problem.tasks) {
            let task = &problem.tasks[task_idx];

            // Earliest start wins; strict `<` keeps the first resource on ties.
            let mut best: Option<(usize, Slot)> = None;
            for (r_idx, resource) in problem.resources.iter().enumerate() {
                let Some(slot) = feasible_slot(resource, task, availability.free_at(r_idx), turnaround)
                else {
                    continue;
                };
                if best.map_or(true, |(_, b)| slot.start_min < b.start_min) {
                    best = Some((r_idx, slot));
                }
            }

            match best {
                Some((r_idx, slot)) => {
                    let resource = &problem.resources[r_idx];
                    debug!(
                        "greedy: {} -> {} at {}",
                        task.id,
                        resource.id,
                        format_clock(slot.start_min)
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
                        .with_rationale(format!(
                            "greedy: {} is the earliest capable unit, free at {}",
                            resource.id,
                            format_clock(slot.start_min)
                        )),
                    );
                    availability.reserve(r_idx, slot.end_min);
                }
                None => {
                    debug!("greedy: no feasible resource for {}", task.id);
                    allocation.mark_unassigned(&task.id);
                }
            }
        }

        allocation.total_completion_min = availability.completion_min();
        info!(
            "greedy: assigned {}/{} tasks, completion at {}",
            allocation.assignment_count(),
            problem.task_count(),
            format_clock(allocation.total_completion_min)
        );
        allocation
    }
}

impl AllocationStrategy for GreedyAllocator {
    fn name(&self) -> &'static str {
        "Greedy"
    }

    fn allocate(&self, problem: &ProblemModel) -> Allocation {
        GreedyAllocator::allocate(self, problem)
    }
}

/// Task indices in greedy processing order.
///
/// Priority rank descending, then earlier window start. The sort is stable,
/// so remaining ties keep input order.
pub fn priority_order(tasks: &[Task]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..tasks.len()).collect();
    indices.sort_by(|&a, &b| {
        tasks[b]
            .priority
            .rank()
            .cmp(&tasks[a].priority.rank())
            .then(tasks[a].time_window.start_min.cmp(&tasks[b].time_window.start_min))
    });
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feasibility::capability_ok;
    use crate::fixtures::{init_logging, scenario_a};
    use crate::models::{Priority, Resource, TimeWindow};

    fn task(id: &str, priority: Priority, start: i64, end: i64, duration: i64) -> Task {
        Task::new(id, TimeWindow::new(start, end), duration).with_priority(priority)
    }

    #[test]
    fn test_priority_order() {
        let tasks = vec![
            task("low", Priority::Low, 480, 720, 10),
            task("high_late", Priority::High, 540, 720, 10),
            task("high_early", Priority::High, 480, 720, 10),
            task("urgent", Priority::Urgent, 600, 720, 10),
            task("high_early_2", Priority::High, 480, 720, 10),
        ];
        let ids: Vec<&str> = priority_order(&tasks)
            .into_iter()
            .map(|i| tasks[i].id.as_str())
            .collect();
        assert_eq!(
            ids,
            vec!["urgent", "high_early", "high_early_2", "high_late", "low"]
        );
    }

    #[test]
    fn test_scenario_a() {
        init_logging();
        let problem = scenario_a();
        let allocation = GreedyAllocator::new().allocate(&problem);

        let placed: Vec<(&str, &str, i64)> = allocation
            .assignments
            .iter()
            .map(|a| (a.task_id.as_str(), a.resource_id.as_str(), a.start_min))
            .collect();
        assert_eq!(
            placed,
            vec![
                ("T1", "R1", 480),
                ("T2", "R2", 510),
                ("T3", "R1", 540),
                ("T5", "R2", 600),
            ]
        );
        // 20 min + 15 turnaround cannot fit the 30 min window
        assert_eq!(allocation.unassigned_task_ids, vec!["T4".to_string()]);
        assert_eq!(allocation.total_completion_min, 645);
        assert!(allocation.is_partition_of(&problem));
    }

    #[test]
    fn test_scenario_a_urgent_considered_first() {
        let problem = scenario_a();
        let order = priority_order(&problem.tasks);
        assert_eq!(problem.tasks[order[0]].id, "T4");

        // T4 is rejected before anything else is decided.
        let allocation = GreedyAllocator::new().allocate(&problem);
        assert!(allocation.is_unassigned("T4"));
        assert_eq!(allocation.assignments[0].task_id, "T1");
    }

    #[test]
    fn test_scenario_a_payload_never_on_recon() {
        let problem = scenario_a();
        let allocation = GreedyAllocator::new().allocate(&problem);
        for id in ["T2", "T5"] {
            let a = allocation.assignment_for_task(id).unwrap();
            assert!(a.resource_id != "R1" && a.resource_id != "R3");
        }
    }

    #[test]
    fn test_assignments_feasible_by_construction() {
        let problem = scenario_a();
        let allocation = GreedyAllocator::new().allocate(&problem);
        for a in &allocation.assignments {
            let task = problem.task(&a.task_id).unwrap();
            let resource = problem.resource(&a.resource_id).unwrap();
            assert!(capability_ok(resource, task));
            assert!(task.time_window.contains_interval(a.start_min, a.end_min()));
            assert!(a.start_min >= resource.available_from_min);
        }
        // No double booking
        for (i, a) in allocation.assignments.iter().enumerate() {
            for b in &allocation.assignments[i + 1..] {
                assert!(a.resource_id != b.resource_id || !a.overlaps(b));
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let problem = scenario_a();
        let first = GreedyAllocator::new().allocate(&problem);
        let second = GreedyAllocator::new().allocate(&problem);
        assert_eq!(first, second);
    }

    #[test]
    fn test_tie_goes_to_first_resource() {
        let problem = ProblemModel::new(
            vec![task("T1", Priority::High, 480, 600, 30)],
            vec![Resource::recon("B"), Resource::recon("A")],
        );
        let allocation = GreedyAllocator::new().allocate(&problem);
        assert_eq!(allocation.assignments[0].resource_id, "B");
    }

    #[test]
    fn test_prefers_earliest_start() {
        let problem = ProblemModel::new(
            vec![task("T1", Priority::High, 480, 720, 30)],
            vec![
                Resource::recon("busy").with_available_from(560),
                Resource::recon("idle").with_available_from(500),
            ],
        );
        let allocation = GreedyAllocator::new().allocate(&problem);
        assert_eq!(allocation.assignments[0].resource_id, "idle");
        assert_eq!(allocation.assignments[0].start_min, 500);
        // Completion spans all resources, used or not
        assert_eq!(allocation.total_completion_min, 560);
    }

    #[test]
    fn test_window_overflow_unassigned() {
        let problem = ProblemModel::new(
            vec![
                task("first", Priority::High, 480, 540, 40),
                task("second", Priority::Medium, 480, 540, 10),
            ],
            vec![Resource::recon("R1")],
        );
        let allocation = GreedyAllocator::new().allocate(&problem);
        // first occupies 480-535; second would end at 560 > 540
        assert_eq!(allocation.assignment_count(), 1);
        assert!(allocation.is_unassigned("second"));
    }

    #[test]
    fn test_custom_turnaround() {
        let problem = ProblemModel::new(
            vec![task("T1", Priority::High, 480, 510, 20)],
            vec![Resource::recon("R1")],
        );
        let strict = GreedyAllocator::new().allocate(&problem);
        assert!(strict.is_unassigned("T1"));

        let relaxed = GreedyAllocator::new()
            .with_config(AllocationConfig::default().with_turnaround(5))
            .allocate(&problem);
        assert_eq!(relaxed.assignments[0].end_min(), 505);
    }

    #[test]
    fn test_huge_duration_unassigned() {
        // Typed construction skips validation
        let problem = ProblemModel::new(
            vec![task("T1", Priority::High, 480, i64::MAX, i64::MAX)],
            vec![Resource::recon("R1")],
        );
        let allocation = GreedyAllocator::new().allocate(&problem);
        assert!(allocation.is_unassigned("T1"));
    }

    #[test]
    fn test_empty_inputs() {
        let none = GreedyAllocator::new().allocate(&ProblemModel::new(vec![], vec![]));
        assert_eq!(none.assignment_count(), 0);
        assert!(none.unassigned_task_ids.is_empty());
        assert_eq!(none.total_completion_min, 480);

        let no_resources = ProblemModel::new(vec![task("T1", Priority::High, 480, 600, 30)], vec![]);
        let allocation = GreedyAllocator::new().allocate(&no_resources);
        assert_eq!(allocation.unassigned_task_ids, vec!["T1".to_string()]);
        assert!(allocation.is_partition_of(&no_resources));
    }
}
