//! Discovery task and its lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::business::BusinessId;

pub type TaskId = i64;

/// Lifecycle status of a discovery task.
///
/// `Todo -> Processing -> {OkFound | OkNotFound | Errored}`. The last three are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    Processing,
    OkFound,
    OkNotFound,
    Errored,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::Processing => "processing",
            TaskStatus::OkFound => "ok_found",
            TaskStatus::OkNotFound => "ok_not_found",
            TaskStatus::Errored => "errored",
        }
    }

    /// True for states no transition leaves.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::OkFound | TaskStatus::OkNotFound | TaskStatus::Errored
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "processing" => Ok(TaskStatus::Processing),
            "ok_found" => Ok(TaskStatus::OkFound),
            "ok_not_found" => Ok(TaskStatus::OkNotFound),
            "errored" => Ok(TaskStatus::Errored),
            other => Err(format!("unknown task status: {}", other)),
        }
    }
}

/// A unit of discovery work tied to one source URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub url: String,
    /// Raw platform identifier; parsed into a `Platform` when processed so an
    /// unknown value fails the task instead of the read.
    pub platform: String,
    pub status: TaskStatus,
    /// Serialized thread snapshot, captured once the page is fetched
    pub input_json: Option<String>,
    /// Raw completion text
    pub gpt_response: Option<String>,
    pub business_id: Option<BusinessId>,
    pub error: Option<String>,
}

impl Task {
    /// Check the status / business_id / error consistency rule.
    ///
    /// Non-terminal states place no constraint on the nullable fields.
    pub fn is_consistent(&self) -> bool {
        match self.status {
            TaskStatus::Errored => self.error.is_some() && self.business_id.is_none(),
            TaskStatus::OkFound => self.business_id.is_some() && self.error.is_none(),
            TaskStatus::OkNotFound => self.business_id.is_none() && self.error.is_none(),
            TaskStatus::Todo | TaskStatus::Processing => true,
        }
    }
}

/// Partial update applied to a task row.
///
/// `None` leaves a column untouched. For the nullable `business_id` and `error`
/// columns, `Some(None)` clears the column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub status: Option<TaskStatus>,
    pub input_json: Option<String>,
    pub gpt_response: Option<String>,
    pub business_id: Option<Option<BusinessId>>,
    pub error: Option<Option<String>>,
}

impl TaskUpdate {
    /// Mark a freshly selected task as in progress.
    pub fn processing() -> Self {
        Self {
            status: Some(TaskStatus::Processing),
            ..Default::default()
        }
    }

    /// Terminal: a business was extracted and persisted.
    pub fn found(business_id: BusinessId) -> Self {
        Self {
            status: Some(TaskStatus::OkFound),
            business_id: Some(Some(business_id)),
            error: Some(None),
            ..Default::default()
        }
    }

    /// Terminal: the thread held no qualifying business.
    pub fn not_found() -> Self {
        Self {
            status: Some(TaskStatus::OkNotFound),
            business_id: Some(None),
            error: Some(None),
            ..Default::default()
        }
    }

    /// Terminal: processing failed with the given message.
    pub fn errored(message: impl Into<String>) -> Self {
        Self {
            status: Some(TaskStatus::Errored),
            business_id: Some(None),
            error: Some(Some(message.into())),
            ..Default::default()
        }
    }

    pub fn with_input_json(mut self, input_json: Option<String>) -> Self {
        self.input_json = input_json;
        self
    }

    pub fn with_gpt_response(mut self, gpt_response: Option<String>) -> Self {
        self.gpt_response = gpt_response;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.input_json.is_none()
            && self.gpt_response.is_none()
            && self.business_id.is_none()
            && self.error.is_none()
    }

    /// Apply this update to an in-memory task.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(input_json) = &self.input_json {
            task.input_json = Some(input_json.clone());
        }
        if let Some(gpt_response) = &self.gpt_response {
            task.gpt_response = Some(gpt_response.clone());
        }
        if let Some(business_id) = self.business_id {
            task.business_id = business_id;
        }
        if let Some(error) = &self.error {
            task.error = error.clone();
        }
    }
}
