//! Input parsing and validation for allocation problems.
//!
//! Raw records arrive as loosely typed JSON (every field optional, times as
//! `"HH:MM"` strings). [`build_problem`] turns them into a typed
//! [`ProblemModel`], collecting every problem it finds instead of stopping
//! at the first. Detects:
//! - Missing required fields
//! - Unparsable times and unknown enum labels
//! - Negative durations and payloads, inverted windows
//! - Duplicate IDs
//!
//! Nothing is defaulted silently: a missing or malformed time is an error.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{AllocError, Result};
use crate::models::{
    parse_clock, Constraint, Priority, ProblemModel, Resource, ResourceType, Task, TaskType,
    TimeWindow, DAY_START_MIN, MAX_DURATION_MIN,
};

/// Validation result.
pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Offending record, e.g. `task T3` or `resource #2`.
    pub record: String,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A required field is absent.
    MissingField,
    /// A time is not `HH:MM`.
    InvalidTime,
    /// A value is out of range or an unknown label.
    InvalidValue,
    /// Two entities share the same ID.
    DuplicateId,
}

impl ValidationError {
    pub(crate) fn new(
        kind: ValidationErrorKind,
        record: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            record: record.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.record, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// A `{start, end}` pair of `"HH:MM"` strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindowRecord {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Raw task record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(alias = "id")]
    pub task_id: Option<String>,
    #[serde(alias = "name")]
    pub task_name: Option<String>,
    pub priority: Option<String>,
    pub time_window: Option<WindowRecord>,
    /// Minutes.
    #[serde(alias = "duration_minutes")]
    pub estimated_duration: Option<i64>,
    /// Kilograms. Absent means no payload.
    #[serde(alias = "payload_kg")]
    pub payload: Option<f64>,
    #[serde(rename = "type", alias = "task_type")]
    pub task_type: Option<String>,
    pub location: Option<String>,
}

/// Raw resource record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceRecord {
    #[serde(alias = "id", alias = "resource_id")]
    pub uav_id: Option<String>,
    #[serde(rename = "type", alias = "resource_type")]
    pub resource_type: Option<String>,
    /// Minutes.
    pub max_flight_time: Option<i64>,
    /// km/h.
    pub max_speed: Option<f64>,
    /// Kilograms.
    pub max_payload: Option<f64>,
    /// Percent. Absent means fully charged.
    pub battery: Option<f64>,
    /// Home base.
    #[serde(alias = "home_base")]
    pub location: Option<String>,
    /// `"HH:MM"`. Absent means day start.
    pub available_from: Option<String>,
}

/// Raw constraint record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConstraintRecord {
    #[serde(rename = "type")]
    pub constraint_type: Option<String>,
    pub location: Option<String>,
    pub time_window: Option<WindowRecord>,
    pub description: Option<String>,
}

/// A complete raw problem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProblemInput {
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
    #[serde(default, alias = "uavs")]
    pub resources: Vec<ResourceRecord>,
    #[serde(default)]
    pub constraints: Vec<ConstraintRecord>,
    /// `"HH:MM"`. Absent means 08:00.
    pub day_start: Option<String>,
}

/// Builds a typed problem from raw records.
///
/// # Returns
/// The problem, or `AllocError::Validation` listing every malformed record.
pub fn build_problem(input: &ProblemInput) -> Result<ProblemModel> {
    let mut errors = Vec::new();

    let day_start_min = match &input.day_start {
        None => DAY_START_MIN,
        Some(text) => match parse_clock(text) {
            Some(minutes) => minutes,
            None => {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidTime,
                    "problem",
                    format!("day_start '{text}' is not HH:MM"),
                ));
                DAY_START_MIN
            }
        },
    };

    let tasks: Vec<Task> = input
        .tasks
        .iter()
        .enumerate()
        .filter_map(|(i, rec)| parse_task(i, rec, &mut errors))
        .collect();
    let resources: Vec<Resource> = input
        .resources
        .iter()
        .enumerate()
        .filter_map(|(i, rec)| parse_resource(i, rec, day_start_min, &mut errors))
        .collect();
    let constraints: Vec<Constraint> = input
        .constraints
        .iter()
        .enumerate()
        .filter_map(|(i, rec)| parse_constraint(i, rec, &mut errors))
        .collect();

    let problem = ProblemModel::new(tasks, resources)
        .with_constraints(constraints)
        .with_day_start(day_start_min);

    if let Err(more) = validate_problem(&problem) {
        errors.extend(more);
    }

    if errors.is_empty() {
        Ok(problem)
    } else {
        for e in &errors {
            warn!("rejected input record: {e}");
        }
        Err(AllocError::Validation(errors))
    }
}

/// Validates a typed problem.
///
/// Checks:
/// 1. No duplicate task IDs
/// 2. No duplicate resource IDs
/// 3. Task durations within `0..=MAX_DURATION_MIN`, non-negative payloads
/// 4. Task windows not inverted
/// 5. Non-negative resource payload capacity
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_problem(problem: &ProblemModel) -> ValidationResult {
    let mut errors = Vec::new();

    let mut task_ids = HashSet::new();
    for task in &problem.tasks {
        let record = format!("task {}", task.id);
        if !task_ids.insert(task.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                &record,
                format!("duplicate task ID: {}", task.id),
            ));
        }
        if task.duration_min < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidValue,
                &record,
                format!("negative duration {}", task.duration_min),
            ));
        } else if task.duration_min > MAX_DURATION_MIN {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidValue,
                &record,
                format!(
                    "duration {} exceeds {MAX_DURATION_MIN} minutes",
                    task.duration_min
                ),
            ));
        }
        if task.payload_kg < 0.0 || task.payload_kg.is_nan() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidValue,
                &record,
                format!("invalid payload {}", task.payload_kg),
            ));
        }
        if task.time_window.end_min < task.time_window.start_min {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTime,
                &record,
                "time window ends before it starts",
            ));
        }
    }

    let mut resource_ids = HashSet::new();
    for r in &problem.resources {
        if !resource_ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("resource {}", r.id),
                format!("duplicate resource ID: {}", r.id),
            ));
        }
        if r.max_payload_kg < 0.0 || r.max_payload_kg.is_nan() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidValue,
                format!("resource {}", r.id),
                format!("invalid payload capacity {}", r.max_payload_kg),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn record_label(kind: &str, index: usize, id: Option<&String>) -> String {
    match id {
        Some(id) => format!("{kind} {id}"),
        None => format!("{kind} #{index}"),
    }
}

fn require<'a, T>(
    value: &'a Option<T>,
    field: &str,
    record: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<&'a T> {
    if value.is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingField,
            record,
            format!("missing {field}"),
        ));
    }
    value.as_ref()
}

fn parse_time_field(
    value: &Option<String>,
    field: &str,
    record: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<i64> {
    let text = require(value, field, record, errors)?;
    let parsed = parse_clock(text);
    if parsed.is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidTime,
            record,
            format!("{field} '{text}' is not HH:MM"),
        ));
    }
    parsed
}

fn parse_window(
    value: &Option<WindowRecord>,
    record: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<TimeWindow> {
    let window = require(value, "time_window", record, errors)?;
    let start = parse_time_field(&window.start, "time_window.start", record, errors);
    let end = parse_time_field(&window.end, "time_window.end", record, errors);
    Some(TimeWindow::new(start?, end?))
}

fn parse_label<T>(
    value: &Option<String>,
    field: &str,
    record: &str,
    parse: fn(&str) -> Option<T>,
    errors: &mut Vec<ValidationError>,
) -> Option<T> {
    let text = require(value, field, record, errors)?;
    let parsed = parse(text);
    if parsed.is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidValue,
            record,
            format!("unknown {field} '{text}'"),
        ));
    }
    parsed
}

fn parse_task(index: usize, rec: &TaskRecord, errors: &mut Vec<ValidationError>) -> Option<Task> {
    let record = record_label("task", index, rec.task_id.as_ref());
    let id = require(&rec.task_id, "task_id", &record, errors);
    let priority = parse_label(&rec.priority, "priority", &record, Priority::parse, errors);
    let window = parse_window(&rec.time_window, &record, errors);
    let duration = require(&rec.estimated_duration, "estimated_duration", &record, errors);
    let task_type = parse_label(&rec.task_type, "type", &record, TaskType::parse, errors);

    Some(
        Task::new(id?.clone(), window?, *duration?)
            .with_name(rec.task_name.clone().unwrap_or_default())
            .with_priority(priority?)
            .with_payload(rec.payload.unwrap_or(0.0))
            .with_type(task_type?)
            .with_location(rec.location.clone().unwrap_or_default()),
    )
}

fn parse_resource(
    index: usize,
    rec: &ResourceRecord,
    day_start_min: i64,
    errors: &mut Vec<ValidationError>,
) -> Option<Resource> {
    let record = record_label("resource", index, rec.uav_id.as_ref());
    let id = require(&rec.uav_id, "uav_id", &record, errors);
    let resource_type = parse_label(&rec.resource_type, "type", &record, ResourceType::parse, errors);
    let flight_time = require(&rec.max_flight_time, "max_flight_time", &record, errors);
    let speed = require(&rec.max_speed, "max_speed", &record, errors);
    let payload = require(&rec.max_payload, "max_payload", &record, errors);
    let available_from = match &rec.available_from {
        None => Some(day_start_min),
        Some(_) => parse_time_field(&rec.available_from, "available_from", &record, errors),
    };

    Some(
        Resource::new(id?.clone(), resource_type?)
            .with_flight_time(*flight_time?)
            .with_speed(*speed?)
            .with_payload(*payload?)
            .with_battery(rec.battery.unwrap_or(100.0))
            .with_home_base(rec.location.clone().unwrap_or_default())
            .with_available_from(available_from?),
    )
}

fn parse_constraint(
    index: usize,
    rec: &ConstraintRecord,
    errors: &mut Vec<ValidationError>,
) -> Option<Constraint> {
    let record = format!("constraint #{index}");
    let label = require(&rec.constraint_type, "type", &record, errors)?;
    let normalized = label.trim().to_ascii_lowercase().replace([' ', '-'], "_");

    match normalized.as_str() {
        "no_fly_zone" | "nofly_zone" | "no_fly" | "禁飞区" => {
            let location = require(&rec.location, "location", &record, errors);
            let window = parse_window(&rec.time_window, &record, errors);
            Some(Constraint::no_fly_zone(location?.clone(), window?))
        }
        "concurrency_limit" | "concurrency" | "并发限制" => Some(Constraint::ConcurrencyLimit),
        "return_to_base" | "return" | "返航要求" => Some(Constraint::ReturnToBase),
        _ => {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidValue,
                &record,
                format!("unknown constraint type '{label}'"),
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: &str, end: &str) -> Option<WindowRecord> {
        Some(WindowRecord {
            start: Some(start.into()),
            end: Some(end.into()),
        })
    }

    fn task_record(id: &str) -> TaskRecord {
        TaskRecord {
            task_id: Some(id.into()),
            task_name: Some(format!("Task {id}")),
            priority: Some("High".into()),
            time_window: window("08:00", "10:00"),
            estimated_duration: Some(30),
            payload: None,
            task_type: Some("Recon".into()),
            location: Some("Sector C".into()),
        }
    }

    fn resource_record(id: &str) -> ResourceRecord {
        ResourceRecord {
            uav_id: Some(id.into()),
            resource_type: Some("Transport".into()),
            max_flight_time: Some(90),
            max_speed: Some(60.0),
            max_payload: Some(5.0),
            battery: Some(85.0),
            location: Some("Base A".into()),
            available_from: None,
        }
    }

    fn kinds(err: AllocError) -> Vec<ValidationErrorKind> {
        match err {
            AllocError::Validation(errors) => errors.iter().map(|e| e.kind).collect(),
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_valid_input() {
        let input = ProblemInput {
            tasks: vec![task_record("T1")],
            resources: vec![resource_record("R1")],
            constraints: vec![ConstraintRecord {
                constraint_type: Some("no-fly zone".into()),
                location: Some("Sector D".into()),
                time_window: window("09:00", "09:30"),
                description: None,
            }],
            day_start: None,
        };

        let problem = build_problem(&input).unwrap();
        assert_eq!(problem.task_count(), 1);
        assert_eq!(problem.tasks[0].time_window, TimeWindow::new(480, 600));
        assert_eq!(problem.tasks[0].priority, Priority::High);
        assert!((problem.tasks[0].payload_kg - 0.0).abs() < 1e-10);
        assert_eq!(problem.resources[0].available_from_min, DAY_START_MIN);
        assert_eq!(problem.resources[0].home_base, "Base A");
        assert_eq!(
            problem.constraints,
            vec![Constraint::no_fly_zone("Sector D", TimeWindow::new(540, 570))]
        );
    }

    #[test]
    fn test_unparsable_time_rejected() {
        let mut rec = task_record("T1");
        rec.time_window = window("8 o'clock", "10:00");
        let input = ProblemInput {
            tasks: vec![rec],
            ..ProblemInput::default()
        };

        let err = build_problem(&input).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("task T1"));
        assert_eq!(kinds(err), vec![ValidationErrorKind::InvalidTime]);
    }

    #[test]
    fn test_missing_time_window_not_defaulted() {
        let mut rec = task_record("T1");
        rec.time_window = Some(WindowRecord {
            start: Some("08:00".into()),
            end: None,
        });
        let input = ProblemInput {
            tasks: vec![rec],
            ..ProblemInput::default()
        };

        assert_eq!(
            kinds(build_problem(&input).unwrap_err()),
            vec![ValidationErrorKind::MissingField]
        );
    }

    #[test]
    fn test_missing_id_names_record_by_index() {
        let mut rec = task_record("T1");
        rec.task_id = None;
        let input = ProblemInput {
            tasks: vec![task_record("T0"), rec],
            ..ProblemInput::default()
        };

        match build_problem(&input).unwrap_err() {
            AllocError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].record, "task #1");
                assert_eq!(errors[0].kind, ValidationErrorKind::MissingField);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_unknown_labels() {
        let mut task = task_record("T1");
        task.priority = Some("critical".into());
        let mut resource = resource_record("R1");
        resource.resource_type = Some("blimp".into());
        let input = ProblemInput {
            tasks: vec![task],
            resources: vec![resource],
            constraints: vec![ConstraintRecord {
                constraint_type: Some("curfew".into()),
                ..ConstraintRecord::default()
            }],
            day_start: None,
        };

        let found = kinds(build_problem(&input).unwrap_err());
        assert_eq!(found.len(), 3);
        assert!(found.iter().all(|k| *k == ValidationErrorKind::InvalidValue));
    }

    #[test]
    fn test_bad_available_from() {
        let mut rec = resource_record("R1");
        rec.available_from = Some("late".into());
        let input = ProblemInput {
            resources: vec![rec],
            ..ProblemInput::default()
        };
        assert_eq!(
            kinds(build_problem(&input).unwrap_err()),
            vec![ValidationErrorKind::InvalidTime]
        );
    }

    #[test]
    fn test_duplicate_ids() {
        let input = ProblemInput {
            tasks: vec![task_record("T1"), task_record("T1")],
            resources: vec![resource_record("R1"), resource_record("R1")],
            ..ProblemInput::default()
        };
        let found = kinds(build_problem(&input).unwrap_err());
        assert_eq!(found, vec![ValidationErrorKind::DuplicateId; 2]);
    }

    #[test]
    fn test_multiple_errors_collected() {
        let mut broken = task_record("T2");
        broken.estimated_duration = None;
        broken.task_type = None;
        let input = ProblemInput {
            tasks: vec![task_record("T1"), broken],
            resources: vec![ResourceRecord::default()],
            ..ProblemInput::default()
        };

        match build_problem(&input).unwrap_err() {
            // 2 for the task + 5 required resource fields
            AllocError::Validation(errors) => assert_eq!(errors.len(), 7),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_validate_problem_typed() {
        let problem = ProblemModel::new(
            vec![
                Task::new("T1", TimeWindow::new(600, 480), 30),
                Task::new("T2", TimeWindow::new(480, 600), -5),
            ],
            vec![Resource::recon("R1").with_payload(-1.0)],
        );
        let errors = validate_problem(&problem).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::InvalidTime));
    }

    #[test]
    fn test_oversized_duration_rejected() {
        let json = r#"{"tasks": [{"task_id": "T1", "priority": "High", "type": "Recon",
                        "time_window": {"start": "08:00", "end": "10:00"},
                        "estimated_duration": 9223372036854775807}]}"#;
        let input: ProblemInput = serde_json::from_str(json).unwrap();
        let err = build_problem(&input).unwrap_err();
        assert!(err.to_string().contains("task T1"));
        assert_eq!(kinds(err), vec![ValidationErrorKind::InvalidValue]);

        let mut day_long = task_record("T2");
        day_long.estimated_duration = Some(MAX_DURATION_MIN);
        day_long.time_window = window("00:00", "23:59");
        let input = ProblemInput {
            tasks: vec![day_long],
            ..ProblemInput::default()
        };
        assert!(build_problem(&input).is_ok());
    }

    #[test]
    fn test_from_source_json_field_names() {
        let json = r#"{
            "tasks": [{"task_id": "T2", "task_name": "Supply drop", "priority": "High",
                       "time_window": {"start": "08:30", "end": "09:30"},
                       "estimated_duration": 40, "payload": 3, "type": "Transport"}],
            "uavs": [{"uav_id": "UAV-002", "type": "Transport", "max_flight_time": 90,
                      "max_speed": 60, "max_payload": 5, "battery": 85, "location": "Base A"}],
            "constraints": [{"type": "concurrency_limit", "description": "one task at a time"}]
        }"#;
        let input: ProblemInput = serde_json::from_str(json).unwrap();
        let problem = build_problem(&input).unwrap();
        assert_eq!(problem.tasks[0].task_type, TaskType::Transport);
        assert!((problem.tasks[0].payload_kg - 3.0).abs() < 1e-10);
        assert_eq!(problem.resources[0].id, "UAV-002");
        assert_eq!(problem.constraints, vec![Constraint::ConcurrencyLimit]);
    }

    #[test]
    fn test_native_labels_accepted() {
        let json = r#"{
            "tasks": [{"task_id": "T1", "priority": "紧急", "type": "侦察",
                       "time_window": {"start": "08:00", "end": "09:00"}, "estimated_duration": 20},
                      {"task_id": "T2", "priority": "低", "type": "运输",
                       "time_window": {"start": "08:00", "end": "10:00"}, "estimated_duration": 30}],
            "uavs": [{"uav_id": "R1", "type": "多用途", "max_flight_time": 90, "max_speed": 60, "max_payload": 2},
                     {"uav_id": "R2", "type": "运输型", "max_flight_time": 90, "max_speed": 60, "max_payload": 5}],
            "constraints": [
                {"type": "禁飞区", "location": "Sector D", "time_window": {"start": "09:00", "end": "09:30"}},
                {"type": "并发限制"},
                {"type": "返航要求"}
            ]
        }"#;
        let input: ProblemInput = serde_json::from_str(json).unwrap();
        let problem = build_problem(&input).unwrap();
        assert_eq!(problem.tasks[0].priority, Priority::Urgent);
        assert_eq!(problem.tasks[0].task_type, TaskType::Recon);
        assert_eq!(problem.tasks[1].priority, Priority::Low);
        assert_eq!(problem.tasks[1].task_type, TaskType::Transport);
        assert_eq!(problem.resources[0].resource_type, ResourceType::Multi);
        assert_eq!(problem.resources[1].resource_type, ResourceType::Transport);
        assert_eq!(
            problem.constraints,
            vec![
                Constraint::no_fly_zone("Sector D", TimeWindow::new(540, 570)),
                Constraint::ConcurrencyLimit,
                Constraint::ReturnToBase,
            ]
        );
    }
}
