//! Lifecycle operations for projects and tasks.
//!
//! These are the mutation entry points exposed to the command layer. Every
//! task mutation persists first and then triggers a recomputation of the
//! owning project's derived status/progress. A recomputation failure after
//! a committed mutation is logged and left for the next trigger rather than
//! rolled back.

use std::path::Path;

use chrono::{Duration, Local, NaiveDate, Utc};

use crate::error::{Error, Result};
use crate::fields::{Priority, Status};
use crate::project::{Project, ProjectDraft};
use crate::status::recompute_project_status;
use crate::store::{split_and_normalise_tags, Store};
use crate::task::Task;

/// Nominal progress assigned when work on a task begins.
pub const STARTED_PROGRESS: u8 = 10;

/// Title of the auto-generated review task appended to every project.
pub const REVIEW_TASK_TITLE: &str = "Review & Comments";

const REVIEW_TASK_DESCRIPTION: &str = "Final review and collect feedback on the project";

/// Fallback due-date offset for the review task when the project has no end
/// date.
const REVIEW_TASK_FALLBACK_DAYS: i64 = 7;

/// Caller-supplied fields for creating a task against an existing project.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub project_id: u64,
    pub due_date: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub estimated_hours: Option<f32>,
    pub actual_hours: Option<f32>,
}

/// Field edits for the generic task update operation. `None` leaves the
/// field untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub progress: Option<u8>,
    pub due_date: Option<NaiveDate>,
    pub clear_due: bool,
    pub add_tags: Vec<String>,
    pub rm_tags: Vec<String>,
    pub estimated_hours: Option<f32>,
    pub actual_hours: Option<f32>,
}

fn validate_hours(label: &str, hours: Option<f32>) -> Result<()> {
    if let Some(h) = hours {
        if !h.is_finite() || h < 0.0 {
            return Err(Error::Validation(format!("{label} must be non-negative")));
        }
    }
    Ok(())
}

/// Recompute the owning project's derived fields, tolerating failure.
///
/// The task mutation is already committed at this point; a failed
/// recomputation leaves the project stale until the next trigger.
fn recompute_soft(store: &mut Store, db_path: &Path, project_id: u64) {
    if let Err(e) = recompute_project_status(store, db_path, project_id) {
        tracing::warn!(
            project_id,
            error = %e,
            "status recomputation failed; project derived fields are stale"
        );
    }
}

/// Insert one task row and trigger recomputation for its project.
fn insert_task(store: &mut Store, db_path: &Path, task: Task) -> Result<u64> {
    let id = task.id;
    let project_id = task.project_id;
    store.tasks.push(task);
    store.save(db_path)?;
    tracing::debug!(task_id = id, project_id, "task created");
    recompute_soft(store, db_path, project_id);
    Ok(id)
}

/// Create a project together with its initial tasks.
///
/// Persists the project first, then each user-supplied task, then exactly
/// one "Review & Comments" task. Per-insert recomputation settles the new
/// project at (Todo, 0) since every task starts as todo.
pub fn create_project(store: &mut Store, db_path: &Path, draft: ProjectDraft) -> Result<u64> {
    if draft.name.trim().is_empty() {
        return Err(Error::Validation("project name must not be empty".into()));
    }
    if draft.end_date.is_none() {
        return Err(Error::Validation("project due date is required".into()));
    }
    let user_tasks: Vec<_> = draft
        .tasks
        .iter()
        .filter(|t| !t.title.trim().is_empty())
        .cloned()
        .collect();
    if user_tasks.is_empty() {
        return Err(Error::Validation(
            "at least one initial task with a title is required".into(),
        ));
    }

    let now_utc = Utc::now().timestamp();
    let today = Local::now().date_naive();
    let project_id = store.next_project_id();
    let end_date = draft.end_date;

    store.projects.push(Project {
        id: project_id,
        name: draft.name.trim().to_string(),
        description: draft.description.filter(|d| !d.is_empty()),
        category: draft.category,
        priority: draft.priority,
        color_label: draft.color_label,
        status: Status::Todo,
        progress: 0,
        start_date: today,
        end_date,
        tags: split_and_normalise_tags(&draft.tags),
        created_at_utc: now_utc,
        updated_at_utc: now_utc,
    });
    store.save(db_path)?;
    tracing::debug!(project_id, "project created");

    for t in user_tasks {
        let task = Task {
            id: store.next_task_id(),
            title: t.title.trim().to_string(),
            description: t.description.filter(|d| !d.is_empty()),
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
            created_at_utc: now_utc,
            updated_at_utc: now_utc,
        };
        insert_task(store, db_path, task)?;
    }

    let review_due = end_date.unwrap_or(today + Duration::days(REVIEW_TASK_FALLBACK_DAYS));
    let review = Task {
        id: store.next_task_id(),
        title: REVIEW_TASK_TITLE.to_string(),
        description: Some(REVIEW_TASK_DESCRIPTION.to_string()),
        priority: Priority::Medium,
        status: Status::Todo,
        project_id,
        due_date: Some(review_due),
        progress: 0,
        tags: Vec::new(),
        estimated_hours: None,
        actual_hours: None,
        completed: false,
        is_review_task: true,
        created_at_utc: now_utc,
        updated_at_utc: now_utc,
    };
    insert_task(store, db_path, review)?;

    Ok(project_id)
}

/// Delete a project and every task that belongs to it.
pub fn delete_project(store: &mut Store, db_path: &Path, project_id: u64) -> Result<()> {
    if store.project(project_id).is_none() {
        return Err(Error::ProjectNotFound(project_id));
    }
    store.remove_project_cascade(project_id);
    store.save(db_path)?;
    tracing::debug!(project_id, "project deleted with its tasks");
    Ok(())
}

/// Create a task against an existing project.
pub fn add_task(store: &mut Store, db_path: &Path, new: NewTask) -> Result<u64> {
    if new.title.trim().is_empty() {
        return Err(Error::Validation("task title must not be empty".into()));
    }
    if store.project(new.project_id).is_none() {
        return Err(Error::ProjectNotFound(new.project_id));
    }
    validate_hours("estimated hours", new.estimated_hours)?;
    validate_hours("actual hours", new.actual_hours)?;

    let now_utc = Utc::now().timestamp();
    let task = Task {
        id: store.next_task_id(),
        title: new.title.trim().to_string(),
        description: new.description.filter(|d| !d.is_empty()),
        priority: new.priority,
        status: Status::Todo,
        project_id: new.project_id,
        due_date: new.due_date,
        progress: 0,
        tags: split_and_normalise_tags(&new.tags),
        estimated_hours: new.estimated_hours,
        actual_hours: new.actual_hours,
        completed: false,
        is_review_task: false,
        created_at_utc: now_utc,
        updated_at_utc: now_utc,
    };
    insert_task(store, db_path, task)
}

/// Move a task to in-progress, marking the nominal started progress.
///
/// Done is terminal; beginning a completed task is rejected.
pub fn begin_task(store: &mut Store, db_path: &Path, id: u64) -> Result<()> {
    let task = store.task_mut(id).ok_or(Error::TaskNotFound(id))?;
    if task.completed {
        return Err(Error::Validation(format!("task {id} is already done")));
    }
    task.status = Status::InProgress;
    task.progress = STARTED_PROGRESS;
    task.updated_at_utc = Utc::now().timestamp();
    let project_id = task.project_id;
    store.save(db_path)?;
    tracing::debug!(task_id = id, "task begun");
    recompute_soft(store, db_path, project_id);
    Ok(())
}

/// Mark a task done. Terminal; repeat calls are no-ops.
pub fn complete_task(store: &mut Store, db_path: &Path, id: u64) -> Result<()> {
    let task = store.task_mut(id).ok_or(Error::TaskNotFound(id))?;
    task.status = Status::Done;
    task.completed = true;
    task.progress = 100;
    task.updated_at_utc = Utc::now().timestamp();
    let project_id = task.project_id;
    store.save(db_path)?;
    tracing::debug!(task_id = id, "task completed");
    recompute_soft(store, db_path, project_id);
    Ok(())
}

/// Apply direct field edits to a task.
///
/// When `status` is edited, `completed` is synchronised so that
/// completed == (status == Done) always holds. `project_id` is immutable
/// and not part of the update surface.
pub fn update_task(store: &mut Store, db_path: &Path, id: u64, update: TaskUpdate) -> Result<()> {
    if let Some(ref title) = update.title {
        if title.trim().is_empty() {
            return Err(Error::Validation("task title must not be empty".into()));
        }
    }
    if let Some(p) = update.progress {
        if p > 100 {
            return Err(Error::Validation("progress must be in 0-100".into()));
        }
    }
    validate_hours("estimated hours", update.estimated_hours)?;
    validate_hours("actual hours", update.actual_hours)?;

    let task = store.task_mut(id).ok_or(Error::TaskNotFound(id))?;
    if let Some(title) = update.title {
        task.title = title.trim().to_string();
    }
    if let Some(desc) = update.description {
        task.description = if desc.is_empty() { None } else { Some(desc) };
    }
    if let Some(p) = update.priority {
        task.priority = p;
    }
    if let Some(s) = update.status {
        task.status = s;
        task.completed = s == Status::Done;
    }
    if let Some(p) = update.progress {
        task.progress = p;
    }
    if update.clear_due {
        task.due_date = None;
    }
    if let Some(d) = update.due_date {
        task.due_date = Some(d);
    }
    if let Some(h) = update.estimated_hours {
        task.estimated_hours = Some(h);
    }
    if let Some(h) = update.actual_hours {
        task.actual_hours = Some(h);
    }
    if !update.add_tags.is_empty() || !update.rm_tags.is_empty() {
        let mut tags = task.tags.clone();
        tags.extend(split_and_normalise_tags(&update.add_tags));
        let rm = split_and_normalise_tags(&update.rm_tags);
        tags.retain(|t| !rm.contains(t));
        tags.sort();
        tags.dedup();
        task.tags = tags;
    }
    task.updated_at_utc = Utc::now().timestamp();
    let project_id = task.project_id;
    store.save(db_path)?;
    tracing::debug!(task_id = id, "task updated");
    recompute_soft(store, db_path, project_id);
    Ok(())
}

/// Delete a task permanently and recompute its former project.
///
/// Review tasks are only removable through project deletion.
pub fn delete_task(store: &mut Store, db_path: &Path, id: u64) -> Result<()> {
    let task = store.task(id).ok_or(Error::TaskNotFound(id))?;
    if task.is_review_task {
        return Err(Error::Validation(format!(
            "task {id} is the project's review task; delete the project to remove it"
        )));
    }
    let project_id = task.project_id;
    store.remove_task(id);
    store.save(db_path)?;
    tracing::debug!(task_id = id, "task deleted");
    recompute_soft(store, db_path, project_id);
    Ok(())
}
