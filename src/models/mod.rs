//! Allocation domain models.
//!
//! Provides the data types for representing allocation problems and
//! their solutions.
//!
//! # Domain Mappings
//!
//! | u-allocate | Air operations | Field service | Last-mile delivery |
//! |------------|----------------|---------------|--------------------|
//! | Task | Sortie | Work order | Drop-off |
//! | Resource | UAV | Technician van | Courier |
//! | Constraint | No-fly zone | Site closure | Restricted street |
//! | Allocation | Tasking order | Dispatch plan | Route assignment |

mod allocation;
pub mod clock;
mod constraint;
mod problem;
mod resource;
mod task;

pub use allocation::{Allocation, Assignment};
pub use clock::{format_clock, parse_clock, TimeWindow, DAY_START_MIN, MAX_DURATION_MIN};
pub use constraint::Constraint;
pub use problem::ProblemModel;
pub use resource::{Resource, ResourceType};
pub use task::{Priority, Task, TaskType};
