//! Task data structure and related functionality.
//!
//! This module defines the core `Task` struct that represents a single work
//! item belonging to a project, plus the `TaskDraft` shape used for the
//! user-entered initial tasks of a project creation request.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fields::*;

/// A work item belonging to exactly one project for its lifetime.
///
/// `completed` is kept in lockstep with `status == Done` by the lifecycle
/// operations; `progress` is a 0-100 percentage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: Status,
    pub project_id: u64,
    pub due_date: Option<NaiveDate>,
    pub progress: u8,
    pub tags: Vec<String>,
    pub estimated_hours: Option<f32>,
    pub actual_hours: Option<f32>,
    pub completed: bool,
    #[serde(default)]
    pub is_review_task: bool,
    pub created_at_utc: i64,
    pub updated_at_utc: i64,
}

/// A user-entered initial task inside a project creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
}
