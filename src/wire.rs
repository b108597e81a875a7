//! Allocation documents.
//!
//! The persisted and exchanged shape of an allocation. Times are `"HH:MM"`,
//! `estimated_duration` is the minutes a resource is occupied (turnaround
//! included), and `decision_time` is a local `YYYY-mm-dd HH:MM:SS`
//! timestamp.
//!
//! Documents produced elsewhere can be decoded back into an [`Allocation`]
//! with [`Allocation::from_document`] and then checked and scored like any
//! other allocation. Decoding accepts the loose forms such producers emit:
//! `assigned_uav` for `assigned_resource`, durations written as `"30 min"`,
//! and the whole document wrapped as `{"final_allocation": {...}}`.

use chrono::{Local, NaiveDateTime};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AllocError, Result};
use crate::models::{
    format_clock, parse_clock, Allocation, Assignment, Priority, ProblemModel, MAX_DURATION_MIN,
};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Timestamp format of `decision_time`.
pub const DECISION_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Label given to decoded documents that name no algorithm.
pub const EXTERNAL_LABEL: &str = "External";

/// Serialized allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationDocument {
    #[serde(default)]
    pub decision_time: String,
    #[serde(default)]
    pub total_tasks: usize,
    #[serde(default, alias = "total_uavs")]
    pub total_resources: usize,
    pub assignments: Vec<AssignmentRecord>,
    #[serde(default)]
    pub unassigned_tasks: Vec<String>,
    /// `"HH:MM"`.
    #[serde(default)]
    pub total_completion_time: String,
    #[serde(default)]
    pub risk_assessment: String,
    #[serde(default)]
    pub notes: String,
    /// Producing strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
}

/// One serialized assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub task_id: String,
    #[serde(default)]
    pub task_name: String,
    #[serde(alias = "assigned_uav")]
    pub assigned_resource: String,
    /// `"HH:MM"`.
    pub start_time: String,
    /// Occupied minutes, turnaround included.
    #[serde(deserialize_with = "lenient_minutes")]
    pub estimated_duration: i64,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub rationale: String,
}

impl AllocationDocument {
    /// Parses a bare or `final_allocation`-wrapped document.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut value: serde_json::Value = serde_json::from_str(json)?;
        let doc = match value.get_mut("final_allocation") {
            Some(inner) => serde_json::from_value(inner.take())?,
            None => serde_json::from_value(value)?,
        };
        Ok(doc)
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// `decision_time` as a timestamp, if it is one.
    pub fn decision_timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(self.decision_time.trim(), DECISION_TIME_FORMAT).ok()
    }
}

impl Allocation {
    /// Serializes against `problem`, stamped with the current local time.
    pub fn to_document(&self, problem: &ProblemModel) -> AllocationDocument {
        self.to_document_at(problem, Local::now().naive_local())
    }

    /// Serializes against `problem` with an explicit decision time.
    pub fn to_document_at(
        &self,
        problem: &ProblemModel,
        decision_time: NaiveDateTime,
    ) -> AllocationDocument {
        let assignments = self
            .assignments
            .iter()
            .map(|a| AssignmentRecord {
                task_id: a.task_id.clone(),
                task_name: problem
                    .task(&a.task_id)
                    .map(|t| t.name.clone())
                    .unwrap_or_default(),
                assigned_resource: a.resource_id.clone(),
                start_time: format_clock(a.start_min),
                estimated_duration: a.occupied_min(),
                priority: a.priority.to_string(),
                rationale: a.rationale.clone(),
            })
            .collect();

        AllocationDocument {
            decision_time: decision_time.format(DECISION_TIME_FORMAT).to_string(),
            total_tasks: problem.task_count(),
            total_resources: problem.resource_count(),
            assignments,
            unassigned_tasks: self.unassigned_task_ids.clone(),
            total_completion_time: format_clock(self.total_completion_min),
            risk_assessment: self.risk_assessment.clone(),
            notes: self.notes.clone(),
            algorithm: Some(self.strategy.clone()),
        }
    }

    /// Decodes a document against `problem`.
    ///
    /// Durations and priorities of known tasks come from the problem; the
    /// remainder of `estimated_duration` is the turnaround. Ids are not
    /// checked here; unknown ones surface as violations during conflict
    /// detection.
    ///
    /// # Errors
    /// `AllocError::Validation` when a start time is not `"HH:MM"`, a
    /// duration is negative or longer than a day, or a task or resource id
    /// is empty.
    pub fn from_document(doc: &AllocationDocument, problem: &ProblemModel) -> Result<Self> {
        let mut errors = Vec::new();
        let mut allocation = Allocation::new(
            doc.algorithm
                .clone()
                .unwrap_or_else(|| EXTERNAL_LABEL.to_string()),
        )
        .with_narrative(doc.risk_assessment.clone(), doc.notes.clone());

        for (i, rec) in doc.assignments.iter().enumerate() {
            let record = format!("assignment[{i}] ({})", rec.task_id);
            if rec.task_id.trim().is_empty() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MissingField,
                    &record,
                    "task_id is empty",
                ));
                continue;
            }
            if rec.assigned_resource.trim().is_empty() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MissingField,
                    &record,
                    "assigned_resource is empty",
                ));
                continue;
            }
            if !(0..=MAX_DURATION_MIN).contains(&rec.estimated_duration) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidValue,
                    &record,
                    format!(
                        "estimated_duration {} is outside 0..={MAX_DURATION_MIN} minutes",
                        rec.estimated_duration
                    ),
                ));
                continue;
            }
            let Some(start_min) = parse_clock(&rec.start_time) else {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidTime,
                    &record,
                    format!("start_time '{}' is not HH:MM", rec.start_time),
                ));
                continue;
            };

            let task = problem.task(&rec.task_id);
            let duration_min = task.map_or(rec.estimated_duration, |t| t.duration_min);
            let priority = task
                .map(|t| t.priority)
                .or_else(|| Priority::parse(&rec.priority))
                .unwrap_or(Priority::Medium);

            allocation.add_assignment(
                Assignment::new(&rec.task_id, &rec.assigned_resource, start_min, duration_min, priority)
                    .with_turnaround((rec.estimated_duration - duration_min).max(0))
                    .with_rationale(rec.rationale.clone()),
            );
        }

        if !errors.is_empty() {
            for e in &errors {
                warn!("rejected allocation record: {e}");
            }
            return Err(AllocError::Validation(errors));
        }

        for id in &doc.unassigned_tasks {
            allocation.mark_unassigned(id);
        }

        let fallback = allocation
            .latest_end_min()
            .unwrap_or(problem.day_start_min)
            .max(problem.day_start_min);
        allocation.total_completion_min = match parse_clock(&doc.total_completion_time) {
            Some(minutes) => minutes,
            None => {
                if !doc.total_completion_time.is_empty() {
                    warn!(
                        "total_completion_time '{}' is not HH:MM, using {}",
                        doc.total_completion_time,
                        format_clock(fallback)
                    );
                }
                fallback
            }
        };

        Ok(allocation)
    }
}

/// Accepts `30`, `"30"`, or `"30 min"`.
fn lenient_minutes<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(text) => {
            let digits: String = text
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("'{text}' is not a number of minutes")))
        }
    }
}
