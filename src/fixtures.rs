//! Shared test data.

use crate::models::{
    Allocation, Constraint, Priority, ProblemModel, Resource, Task, TaskType, TimeWindow,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Five tasks, four units, one no-fly zone.
///
/// Greedy result: T1->R1 08:00, T2->R2 08:30, T3->R1 09:00, T5->R2 10:00,
/// T4 unassigned, completion 10:45.
pub fn scenario_a() -> ProblemModel {
    let tasks = vec![
        Task::new("T1", TimeWindow::new(480, 600), 30)
            .with_name("Area reconnaissance")
            .with_priority(Priority::High)
            .with_location("Sector C"),
        Task::new("T2", TimeWindow::new(510, 570), 40)
            .with_name("Supply transport")
            .with_priority(Priority::High)
            .with_type(TaskType::Transport)
            .with_payload(3.0),
        Task::new("T3", TimeWindow::new(540, 720), 60)
            .with_name("Target monitoring")
            .with_type(TaskType::Monitor),
        Task::new("T4", TimeWindow::new(480, 510), 20)
            .with_name("Urgent reconnaissance")
            .with_priority(Priority::Urgent),
        Task::new("T5", TimeWindow::new(600, 720), 30)
            .with_name("Equipment drop")
            .with_priority(Priority::Low)
            .with_type(TaskType::Transport)
            .with_payload(1.0),
    ];
    let resources = vec![
        Resource::recon("R1")
            .with_flight_time(120)
            .with_speed(80.0)
            .with_home_base("Base A"),
        Resource::transport("R2")
            .with_flight_time(90)
            .with_speed(60.0)
            .with_payload(5.0)
            .with_battery(85.0)
            .with_home_base("Base A"),
        Resource::recon("R3")
            .with_flight_time(100)
            .with_speed(70.0)
            .with_battery(90.0)
            .with_home_base("Base B"),
        Resource::multi("R4")
            .with_flight_time(80)
            .with_speed(65.0)
            .with_payload(2.0)
            .with_battery(95.0)
            .with_home_base("Base A"),
    ];
    ProblemModel::new(tasks, resources).with_constraints(vec![
        Constraint::no_fly_zone("Sector D", TimeWindow::new(540, 570)),
        Constraint::ConcurrencyLimit,
        Constraint::ReturnToBase,
    ])
}

/// Lists every task of `problem` not yet mentioned in `allocation` as unassigned.
pub fn settle_unassigned(allocation: &mut Allocation, problem: &ProblemModel) {
    for task in &problem.tasks {
        if allocation.assignment_for_task(&task.id).is_none() && !allocation.is_unassigned(&task.id) {
            allocation.mark_unassigned(&task.id);
        }
    }
}
