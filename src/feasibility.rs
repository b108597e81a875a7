//! Feasibility predicates.
//!
//! A resource may take a task iff it is *capable* (payload) and the task,
//! turnaround included, fits the task's window once the resource is free.
//! Both checks are pure and shared by every strategy and by the conflict
//! detector.

use crate::models::{Resource, Task, TaskType, TimeWindow};

/// A candidate occupation interval on one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Start (minutes-of-day).
    pub start_min: i64,
    /// End, turnaround included (minutes-of-day).
    pub end_min: i64,
}

/// Whether `resource` can physically carry out `task`.
///
/// False if the payload exceeds capacity, or if a transport task meets a
/// resource that cannot carry anything. There is no type-to-type table:
/// capability is decided by payload alone.
pub fn capability_ok(resource: &Resource, task: &Task) -> bool {
    if task.payload_kg > resource.max_payload_kg {
        return false;
    }
    if task.task_type == TaskType::Transport && !resource.can_carry() {
        return false;
    }
    true
}

/// Earliest slot for a task on a resource free from `available_from_min`.
///
/// Start is `max(available_from, window.start)`; end adds duration and
/// turnaround. Returns `None` when the end falls after `window.end` or
/// does not fit in an `i64`.
pub fn earliest_slot(
    available_from_min: i64,
    window: &TimeWindow,
    duration_min: i64,
    turnaround_min: i64,
) -> Option<Slot> {
    let start_min = available_from_min.max(window.start_min);
    let end_min = start_min
        .checked_add(duration_min)?
        .checked_add(turnaround_min)?;
    (end_min <= window.end_min).then_some(Slot { start_min, end_min })
}

/// Whether a task fits its window on a resource free from `available_from_min`.
pub fn time_ok(
    available_from_min: i64,
    window: &TimeWindow,
    duration_min: i64,
    turnaround_min: i64,
) -> bool {
    earliest_slot(available_from_min, window, duration_min, turnaround_min).is_some()
}

/// Capability and timing together, returning the slot when both hold.
pub fn feasible_slot(
    resource: &Resource,
    task: &Task,
    available_from_min: i64,
    turnaround_min: i64,
) -> Option<Slot> {
    if !capability_ok(resource, task) {
        return None;
    }
    earliest_slot(
        available_from_min,
        &task.time_window,
        task.duration_min,
        turnaround_min,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> TimeWindow {
        TimeWindow::new(510, 570) // 08:30-09:30
    }

    #[test]
    fn test_payload_capacity() {
        let task = Task::new("T2", window(), 40).with_payload(3.0);
        assert!(capability_ok(&Resource::transport("R2").with_payload(5.0), &task));
        assert!(capability_ok(&Resource::transport("R2").with_payload(3.0), &task));
        assert!(!capability_ok(&Resource::multi("R4").with_payload(2.0), &task));
        assert!(!capability_ok(&Resource::recon("R1"), &task));
    }

    #[test]
    fn test_transport_needs_carrier() {
        // Transport with no payload still needs a unit that can carry.
        let task = Task::new("T9", window(), 10).with_type(TaskType::Transport);
        assert!(!capability_ok(&Resource::recon("R1"), &task));
        assert!(capability_ok(&Resource::multi("R4").with_payload(2.0), &task));
    }

    #[test]
    fn test_recon_fits_anyone() {
        let task = Task::new("T1", window(), 30);
        assert!(capability_ok(&Resource::recon("R1"), &task));
        assert!(capability_ok(&Resource::transport("R2").with_payload(5.0), &task));
    }

    #[test]
    fn test_slot_waits_for_window() {
        let slot = earliest_slot(480, &window(), 40, 15).unwrap();
        assert_eq!(slot, Slot { start_min: 510, end_min: 565 });
    }

    #[test]
    fn test_slot_waits_for_resource() {
        let slot = earliest_slot(515, &window(), 40, 15).unwrap();
        assert_eq!(slot, Slot { start_min: 515, end_min: 570 });
    }

    #[test]
    fn test_slot_exceeds_window() {
        assert!(earliest_slot(516, &window(), 40, 15).is_none());
        assert!(!time_ok(516, &window(), 40, 15));
        // 20 min + 15 turnaround in a 30 min window never fits
        assert!(!time_ok(480, &TimeWindow::new(480, 510), 20, 15));
    }

    #[test]
    fn test_slot_overflow_is_infeasible() {
        let wide = TimeWindow::new(480, i64::MAX);
        assert!(earliest_slot(480, &wide, i64::MAX, 15).is_none());
        assert!(!time_ok(i64::MAX, &wide, 1, 0));
    }

    #[test]
    fn test_feasible_slot_combines_checks() {
        let task = Task::new("T2", window(), 40).with_payload(3.0);
        let carrier = Resource::transport("R2").with_payload(5.0);
        assert_eq!(
            feasible_slot(&carrier, &task, 480, 15),
            Some(Slot { start_min: 510, end_min: 565 })
        );
        assert_eq!(feasible_slot(&Resource::recon("R1"), &task, 480, 15), None);
        assert_eq!(feasible_slot(&carrier, &task, 530, 15), None);
    }
}
