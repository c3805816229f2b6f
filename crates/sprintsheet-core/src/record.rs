//! Sprint metrics payload

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize};
use sprintsheet_grid::CellValue;

/// One sprint's metrics as posted by the dashboard
///
/// Every field is `None` when the key is absent from the payload and
/// `Some` when present, so an explicit `null` stays distinguishable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SprintRecord {
    /// Sprint display name; only a JSON string can yield a key
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub sprint_name: Option<serde_json::Value>,
    /// Story points completed outside the plan
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub completed_unplanned: Option<CellValue>,
    /// Story points completed from the plan
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub completed_planned: Option<CellValue>,
    /// Velocity
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub velocity: Option<CellValue>,
    /// Tasks completed
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub completed_tasks: Option<CellValue>,
    /// Tasks left open
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub incomplete_tasks: Option<CellValue>,
    /// Carryover, in percent
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub carryover: Option<CellValue>,
    /// Planned share, in percent
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub planned_pct: Option<CellValue>,
    /// Planned completion, in percent
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub planned_completion_pct: Option<CellValue>,
    /// Unplanned completion, in percent
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub unplanned_completion_pct: Option<CellValue>,
    /// Total completion, in percent
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub total_completion_pct: Option<CellValue>,
    /// Task completion, in percent
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub task_completion_pct: Option<CellValue>,
    /// Bugs opened
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub bugs_in: Option<CellValue>,
    /// Bugs closed
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub bugs_out: Option<CellValue>,
    /// Planned story points
    #[serde(
        rename = "plannedSP",
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub planned_sp: Option<CellValue>,
    /// Unplanned story points
    #[serde(
        rename = "unplannedSP",
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub unplanned_sp: Option<CellValue>,
}

impl SprintRecord {
    /// Record with only a name set
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            sprint_name: Some(serde_json::Value::String(name.into())),
            ..Self::default()
        }
    }

    /// Name text, if the name is a JSON string
    #[inline]
    #[must_use]
    pub fn name_text(&self) -> Option<&str> {
        self.sprint_name.as_ref().and_then(serde_json::Value::as_str)
    }

    /// Name as shown in error messages
    ///
    /// Strings appear without quotes; any other JSON value in its compact
    /// form (`null` included), with an absent name reading as `undefined`.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.sprint_name {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "undefined".to_string(),
        }
    }

    /// Builder-style field assignment
    #[must_use]
    pub fn with(mut self, field: Field, value: impl Into<CellValue>) -> Self {
        *self.field_mut(field) = Some(value.into());
        self
    }

    /// Value of a metric field, `None` when the payload omitted it
    #[must_use]
    pub fn field(&self, field: Field) -> Option<&CellValue> {
        let slot = match field {
            Field::CompletedUnplanned => &self.completed_unplanned,
            Field::CompletedPlanned => &self.completed_planned,
            Field::Velocity => &self.velocity,
            Field::CompletedTasks => &self.completed_tasks,
            Field::IncompleteTasks => &self.incomplete_tasks,
            Field::Carryover => &self.carryover,
            Field::PlannedPct => &self.planned_pct,
            Field::PlannedCompletionPct => &self.planned_completion_pct,
            Field::UnplannedCompletionPct => &self.unplanned_completion_pct,
            Field::TotalCompletionPct => &self.total_completion_pct,
            Field::TaskCompletionPct => &self.task_completion_pct,
            Field::BugsIn => &self.bugs_in,
            Field::BugsOut => &self.bugs_out,
            Field::PlannedSp => &self.planned_sp,
            Field::UnplannedSp => &self.unplanned_sp,
        };
        slot.as_ref()
    }

    fn field_mut(&mut self, field: Field) -> &mut Option<CellValue> {
        match field {
            Field::CompletedUnplanned => &mut self.completed_unplanned,
            Field::CompletedPlanned => &mut self.completed_planned,
            Field::Velocity => &mut self.velocity,
            Field::CompletedTasks => &mut self.completed_tasks,
            Field::IncompleteTasks => &mut self.incomplete_tasks,
            Field::Carryover => &mut self.carryover,
            Field::PlannedPct => &mut self.planned_pct,
            Field::PlannedCompletionPct => &mut self.planned_completion_pct,
            Field::UnplannedCompletionPct => &mut self.unplanned_completion_pct,
            Field::TotalCompletionPct => &mut self.total_completion_pct,
            Field::TaskCompletionPct => &mut self.task_completion_pct,
            Field::BugsIn => &mut self.bugs_in,
            Field::BugsOut => &mut self.bugs_out,
            Field::PlannedSp => &mut self.planned_sp,
            Field::UnplannedSp => &mut self.unplanned_sp,
        }
    }
}

// a present key deserializes to `Some`, even when its value is `null`
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Metric field selector used by the rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// `completedUnplanned`
    CompletedUnplanned,
    /// `completedPlanned`
    CompletedPlanned,
    /// `velocity`
    Velocity,
    /// `completedTasks`
    CompletedTasks,
    /// `incompleteTasks`
    IncompleteTasks,
    /// `carryover`
    Carryover,
    /// `plannedPct`
    PlannedPct,
    /// `plannedCompletionPct`
    PlannedCompletionPct,
    /// `unplannedCompletionPct`
    UnplannedCompletionPct,
    /// `totalCompletionPct`
    TotalCompletionPct,
    /// `taskCompletionPct`
    TaskCompletionPct,
    /// `bugsIn`
    BugsIn,
    /// `bugsOut`
    BugsOut,
    /// `plannedSP`
    PlannedSp,
    /// `unplannedSP`
    UnplannedSp,
}

impl Field {
    /// Payload key of the field
    #[must_use]
    pub fn json_name(self) -> &'static str {
        match self {
            Self::CompletedUnplanned => "completedUnplanned",
            Self::CompletedPlanned => "completedPlanned",
            Self::Velocity => "velocity",
            Self::CompletedTasks => "completedTasks",
            Self::IncompleteTasks => "incompleteTasks",
            Self::Carryover => "carryover",
            Self::PlannedPct => "plannedPct",
            Self::PlannedCompletionPct => "plannedCompletionPct",
            Self::UnplannedCompletionPct => "unplannedCompletionPct",
            Self::TotalCompletionPct => "totalCompletionPct",
            Self::TaskCompletionPct => "taskCompletionPct",
            Self::BugsIn => "bugsIn",
            Self::BugsOut => "bugsOut",
            Self::PlannedSp => "plannedSP",
            Self::UnplannedSp => "unplannedSP",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.json_name())
    }
}
