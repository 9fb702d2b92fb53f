//! Project data structure.
//!
//! A project owns a set of tasks (1:N via `Task::project_id`). Its `status`
//! and `progress` fields are derived from that task set by the aggregator
//! in [`crate::status`] and are never written directly by callers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fields::*;

/// A unit of work containing one or more tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub category: Category,
    pub priority: Priority,
    /// Display-only colour, e.g. "#3b82f6".
    pub color_label: String,
    /// Derived from the task set; see [`crate::status`].
    pub status: Status,
    /// Derived from the task set; see [`crate::status`].
    pub progress: u8,
    pub start_date: NaiveDate,
    /// The project due date. Required at creation, optional thereafter.
    pub end_date: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub created_at_utc: i64,
    pub updated_at_utc: i64,
}

/// Caller-supplied fields for creating a project.
///
/// `tasks` are the user-entered initial tasks; the orchestrator appends the
/// "Review & Comments" task on top of these.
#[derive(Debug, Clone)]
pub struct ProjectDraft {
    pub name: String,
    pub description: Option<String>,
    pub category: Category,
    pub priority: Priority,
    pub color_label: String,
    pub end_date: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub tasks: Vec<crate::task::TaskDraft>,
}
