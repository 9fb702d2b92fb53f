//! File-backed store and utility functions for projects and tasks.
//!
//! This module provides the `Store` struct holding both entity collections,
//! along with helpers for date parsing, tag normalisation, formatting, and
//! table output used by the command layer.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fields::*;
use crate::project::Project;
use crate::task::Task;

/// In-memory store for projects and tasks, persisted as one JSON document.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Store {
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
}

impl Store {
    /// Load the store from a JSON file, starting empty if the file doesn't
    /// exist or can't be parsed.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Store::default();
        }
        let mut buf = String::new();
        match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
            Ok(_) => match serde_json::from_str(&buf) {
                Ok(store) => store,
                Err(e) => {
                    tracing::warn!(error = %e, "store file unparseable, starting fresh");
                    Store::default()
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "store file unreadable, starting fresh");
                Store::default()
            }
        }
    }

    /// Save the store to a JSON file using atomic write (temp file + rename).
    pub fn save(&self, path: &Path) -> Result<()> {
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(self)?;
        let mut f = File::create(&tmp)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    /// Generate the next available task ID.
    pub fn next_task_id(&self) -> u64 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    /// Generate the next available project ID.
    pub fn next_project_id(&self) -> u64 {
        self.projects.iter().map(|p| p.id).max().unwrap_or(0) + 1
    }

    /// Get a task by ID.
    pub fn task(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Get a mutable reference to a task by ID.
    pub fn task_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Get a project by ID.
    pub fn project(&self, id: u64) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Get a mutable reference to a project by ID.
    pub fn project_mut(&mut self, id: u64) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == id)
    }

    /// All tasks belonging to one project, in insertion order.
    pub fn tasks_for_project(&self, project_id: u64) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.project_id == project_id).collect()
    }

    /// Remove a single task by ID.
    pub fn remove_task(&mut self, id: u64) {
        self.tasks.retain(|t| t.id != id);
    }

    /// Remove a project and every task that references it.
    pub fn remove_project_cascade(&mut self, project_id: u64) {
        self.projects.retain(|p| p.id != project_id);
        self.tasks.retain(|t| t.project_id != project_id);
    }
}

/// Normalise a tag string by trimming, lowercasing, and replacing spaces
/// with hyphens.
pub fn normalise_tag(s: &str) -> String {
    s.trim().to_lowercase().replace(' ', "-")
}

/// Split comma-separated tag strings and normalise each tag.
pub fn split_and_normalise_tags(inputs: &[String]) -> Vec<String> {
    let mut tags = Vec::new();
    for raw in inputs {
        for part in raw.split(',') {
            let tag = normalise_tag(part);
            if !tag.is_empty() {
                tags.push(tag);
            }
        }
    }
    tags.sort();
    tags.dedup();
    tags
}

/// Calculate the start and end dates of the current ISO week (Monday to
/// Sunday).
pub fn start_end_of_this_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let weekday = today.weekday().num_days_from_monday() as i64;
    let start = today - Duration::days(weekday);
    let end = start + Duration::days(6);
    (start, end)
}

/// Days until the next occurrence of `target` (0 = Monday), counting today
/// as a match.
fn days_until_weekday(today: NaiveDate, target: u32) -> i64 {
    ((target + 7 - today.weekday().num_days_from_monday()) % 7) as i64
}

/// Parse human-readable due date input.
///
/// Supports "today", "tomorrow", "yesterday", weekday names with optional
/// "this"/"next" prefixes, "end of week"/"end of month", "this weekend",
/// "in Nd"/"in Nw"/"in Nm", and ISO "YYYY-MM-DD".
pub fn parse_due_input(s: &str) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();
    let today = Local::now().date_naive();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "yesterday" => return Some(today - Duration::days(1)),
        "end of week" | "eow" => return Some(start_end_of_this_week(today).1),
        "end of month" | "eom" => {
            let (y, m) = if today.month() == 12 {
                (today.year() + 1, 1)
            } else {
                (today.year(), today.month() + 1)
            };
            return Some(NaiveDate::from_ymd_opt(y, m, 1)? - Duration::days(1));
        }
        "this weekend" | "weekend" => {
            return Some(today + Duration::days(days_until_weekday(today, 5)));
        }
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        let rest = rest.trim();
        if let Some(n) = rest.strip_suffix('d').and_then(|v| v.trim().parse::<i64>().ok()) {
            return Some(today + Duration::days(n));
        }
        if let Some(n) = rest.strip_suffix('w').and_then(|v| v.trim().parse::<i64>().ok()) {
            return Some(today + Duration::weeks(n));
        }
        if let Some(n) = rest.strip_suffix('m').and_then(|v| v.trim().parse::<i64>().ok()) {
            // Approximate: 30 days per month.
            return Some(today + Duration::days(n * 30));
        }
    }

    let weekdays = [
        ("monday", "mon", 0u32),
        ("tuesday", "tue", 1),
        ("wednesday", "wed", 2),
        ("thursday", "thu", 3),
        ("friday", "fri", 4),
        ("saturday", "sat", 5),
        ("sunday", "sun", 6),
    ];
    let (name, next) = match s.strip_prefix("next ") {
        Some(rest) => (rest, true),
        None => (s.strip_prefix("this ").unwrap_or(&s), false),
    };
    for (long, short, target) in weekdays {
        if name == long || name == short {
            let ahead = days_until_weekday(today, target);
            let ahead = if next {
                if ahead == 0 { 7 } else { ahead + 7 }
            } else {
                ahead
            };
            return Some(today + Duration::days(ahead));
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => {
            let days = (d - today).num_days();
            match days {
                0 => "today".into(),
                1 => "tomorrow".into(),
                n if n > 1 => format!("in {n}d"),
                n => format!("{}d late", -n),
            }
        }
    }
}

/// Format a status for display.
pub fn format_status(s: Status) -> &'static str {
    match s {
        Status::Todo => "Todo",
        Status::InProgress => "InProgress",
        Status::Review => "Review",
        Status::Done => "Done",
    }
}

/// Format a priority for display.
pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::Low => "Low",
        Priority::Medium => "Medium",
        Priority::High => "High",
    }
}

/// Format a project category for display.
pub fn format_category(c: Category) -> &'static str {
    match c {
        Category::Tech => "Tech",
        Category::Academic => "Academic",
        Category::Research => "Research",
        Category::Business => "Business",
        Category::Personal => "Personal",
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

/// Print tasks in a formatted table.
pub fn print_task_table(store: &Store, tasks: &[&Task]) {
    println!(
        "{:<5} {:<11} {:<7} {:<10} {:<5} {:<16} {}",
        "ID", "Status", "Pri", "Due", "Prog", "Project", "Title [tags]"
    );
    let today = Local::now().date_naive();
    for t in tasks {
        let tags = if t.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", t.tags.join(","))
        };
        let project = store
            .project(t.project_id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<5} {:<11} {:<7} {:<10} {:<5} {:<16} {}{}",
            t.id,
            format_status(t.status),
            format_priority(t.priority),
            format_due_relative(t.due_date, today),
            format!("{}%", t.progress),
            truncate(&project, 16),
            t.title,
            tags
        );
    }
}

/// Print projects in a formatted table.
pub fn print_project_table(projects: &[&Project]) {
    println!(
        "{:<5} {:<11} {:<5} {:<7} {:<9} {:<10} {}",
        "ID", "Status", "Prog", "Pri", "Category", "Due", "Name [tags]"
    );
    let today = Local::now().date_naive();
    for p in projects {
        let tags = if p.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", p.tags.join(","))
        };
        println!(
            "{:<5} {:<11} {:<5} {:<7} {:<9} {:<10} {}{}",
            p.id,
            format_status(p.status),
            format!("{}%", p.progress),
            format_priority(p.priority),
            format_category(p.category),
            format_due_relative(p.end_date, today),
            p.name,
            tags
        );
    }
}

/// Distinct tags with usage counts across all tasks.
pub fn tag_counts(store: &Store) -> Vec<(String, usize)> {
    let mut set: BTreeSet<&str> = BTreeSet::new();
    for t in &store.tasks {
        for tag in &t.tags {
            set.insert(tag);
        }
    }
    set.into_iter()
        .map(|tag| {
            let count = store
                .tasks
                .iter()
                .filter(|t| t.tags.iter().any(|x| x == tag))
                .count();
            (tag.to_string(), count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalise_tags() {
        assert_eq!(normalise_tag("  Web Development "), "web-development");
        let tags = split_and_normalise_tags(&["B, a".into(), "a".into(), " ".into()]);
        assert_eq!(tags, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_parse_due_iso() {
        assert_eq!(
            parse_due_input("2026-09-01"),
            NaiveDate::from_ymd_opt(2026, 9, 1)
        );
        assert_eq!(parse_due_input("not a date"), None);
    }

    #[test]
    fn test_parse_due_relative() {
        let today = Local::now().date_naive();
        assert_eq!(parse_due_input("today"), Some(today));
        assert_eq!(parse_due_input("in 3d"), Some(today + Duration::days(3)));
        assert_eq!(parse_due_input("in 2w"), Some(today + Duration::weeks(2)));
    }

    #[test]
    fn test_week_bounds() {
        let wed = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let (start, end) = start_end_of_this_week(wed);
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 8, 3).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 8, 9).unwrap());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer string", 8), "a longe…");
    }

    fn sample_task(id: u64, project_id: u64) -> Task {
        Task {
            id,
            title: format!("task {id}"),
            description: None,
            priority: Priority::Medium,
            status: Status::Todo,
            project_id,
            due_date: None,
            progress: 0,
            tags: Vec::new(),
            estimated_hours: None,
            actual_hours: None,
            completed: false,
            is_review_task: false,
            created_at_utc: 0,
            updated_at_utc: 0,
        }
    }

    fn sample_project(id: u64) -> Project {
        Project {
            id,
            name: format!("project {id}"),
            description: None,
            category: Category::Tech,
            priority: Priority::Medium,
            color_label: "#3b82f6".into(),
            status: Status::Todo,
            progress: 0,
            start_date: Local::now().date_naive(),
            end_date: None,
            tags: Vec::new(),
            created_at_utc: 0,
            updated_at_utc: 0,
        }
    }

    #[test]
    fn test_cascade_removal() {
        let mut store = Store::default();
        store.projects.push(sample_project(1));
        store.projects.push(sample_project(2));
        store.tasks.push(sample_task(1, 1));
        store.tasks.push(sample_task(2, 1));
        store.tasks.push(sample_task(3, 2));
        store.remove_project_cascade(1);
        assert_eq!(store.projects.len(), 1);
        assert_eq!(store.tasks.len(), 1);
        assert_eq!(store.tasks[0].project_id, 2);
    }

    #[test]
    fn test_id_allocation() {
        let mut store = Store::default();
        assert_eq!(store.next_task_id(), 1);
        store.tasks.push(sample_task(7, 1));
        assert_eq!(store.next_task_id(), 8);
        assert_eq!(store.next_project_id(), 1);
    }
}
