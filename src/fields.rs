//! Enumerations and field types shared by tasks and projects.
//!
//! This module defines the structured vocabulary used to categorise work:
//! lifecycle status, priority, project category, and the list-command
//! sorting and due-date filter options.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Lifecycle status shared by tasks and (as a derived field) projects.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[serde(alias = "Todo")]
    Todo,
    #[serde(alias = "InProgress")]
    InProgress,
    #[serde(alias = "Review")]
    Review,
    #[serde(alias = "Done")]
    Done,
}

/// Priority classification for tasks and projects.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Project category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Tech,
    Academic,
    Research,
    Business,
    Personal,
}

/// Available sorting options for task lists.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortKey {
    Due,
    Priority,
    Id,
}

/// Filtering options for tasks based on due dates.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DueFilter {
    Today,
    ThisWeek,
    Overdue,
    None,
}
