//! Project status aggregation.
//!
//! A project's `status` and `progress` are a pure function of its current
//! task set, recomputed in full after every task mutation. Callers never
//! patch the derived fields incrementally.

use std::path::Path;

use chrono::Utc;

use crate::error::Result;
use crate::fields::Status;
use crate::store::Store;
use crate::task::Task;

/// Compute a project's (status, progress) from its task set.
///
/// Rules, in order:
/// - no tasks: (Todo, 0)
/// - every task completed: (Done, 100)
/// - any task in review, or at least one completed: (Review, completed ratio)
/// - any task in progress: (InProgress, completed ratio)
/// - otherwise: (Todo, 0)
///
/// The ratio is `completed / total` as a percentage, rounded half-up.
pub fn compute_project_status(tasks: &[&Task]) -> (Status, u8) {
    let total = tasks.len();
    if total == 0 {
        return (Status::Todo, 0);
    }
    let completed = tasks.iter().filter(|t| t.completed).count();
    let any_review = tasks.iter().any(|t| t.status == Status::Review);
    let any_in_progress = tasks.iter().any(|t| t.status == Status::InProgress);

    let progress = percent(completed, total);
    if completed == total {
        (Status::Done, 100)
    } else if any_review || completed > 0 {
        (Status::Review, progress)
    } else if any_in_progress {
        (Status::InProgress, progress)
    } else {
        (Status::Todo, 0)
    }
}

/// `part / whole` as an integer percentage, rounded half-up.
fn percent(part: usize, whole: usize) -> u8 {
    ((part * 200 + whole) / (whole * 2)) as u8
}

/// Recompute a project's derived fields from the live task set and persist
/// the result. Idempotent; touches no other project.
pub fn recompute_project_status(store: &mut Store, db_path: &Path, project_id: u64) -> Result<()> {
    let (status, progress) = compute_project_status(&store.tasks_for_project(project_id));
    let Some(project) = store.project_mut(project_id) else {
        // Owner already deleted; nothing to write back.
        return Ok(());
    };
    project.status = status;
    project.progress = progress;
    project.updated_at_utc = Utc::now().timestamp();
    tracing::debug!(project_id, ?status, progress, "recomputed project status");
    store.save(db_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Priority;

    fn task(status: Status) -> Task {
        Task {
            id: 0,
            title: "t".into(),
            description: None,
            priority: Priority::Medium,
            status,
            project_id: 1,
            due_date: None,
            progress: 0,
            tags: Vec::new(),
            estimated_hours: None,
            actual_hours: None,
            completed: status == Status::Done,
            is_review_task: false,
            created_at_utc: 0,
            updated_at_utc: 0,
        }
    }

    fn compute(tasks: &[Task]) -> (Status, u8) {
        compute_project_status(&tasks.iter().collect::<Vec<_>>())
    }

    #[test]
    fn empty_set_is_todo_zero() {
        assert_eq!(compute(&[]), (Status::Todo, 0));
    }

    #[test]
    fn all_done_is_done_100() {
        let tasks = vec![task(Status::Done), task(Status::Done)];
        assert_eq!(compute(&tasks), (Status::Done, 100));
    }

    #[test]
    fn all_completed_wins_regardless_of_status() {
        // completed flag drives the all-done rule, not the status field
        let mut t = task(Status::Review);
        t.completed = true;
        assert_eq!(compute(&[t]), (Status::Done, 100));
    }

    #[test]
    fn any_review_task_puts_project_in_review() {
        let tasks = vec![task(Status::Review), task(Status::Todo)];
        assert_eq!(compute(&tasks), (Status::Review, 0));
    }

    #[test]
    fn partial_completion_puts_project_in_review() {
        let tasks = vec![
            task(Status::Done),
            task(Status::Todo),
            task(Status::Todo),
            task(Status::Todo),
        ];
        assert_eq!(compute(&tasks), (Status::Review, 25));
    }

    #[test]
    fn in_progress_without_completion() {
        let tasks = vec![
            task(Status::InProgress),
            task(Status::Todo),
            task(Status::Todo),
            task(Status::Todo),
        ];
        assert_eq!(compute(&tasks), (Status::InProgress, 0));
    }

    #[test]
    fn all_todo_is_todo_zero() {
        let tasks = vec![task(Status::Todo), task(Status::Todo)];
        assert_eq!(compute(&tasks), (Status::Todo, 0));
    }

    #[test]
    fn rounding_is_half_up() {
        // 1/3 = 33.33 -> 33, 2/3 = 66.67 -> 67, 1/8 = 12.5 -> 13
        let tasks = vec![task(Status::Done), task(Status::Todo), task(Status::Todo)];
        assert_eq!(compute(&tasks).1, 33);
        let tasks = vec![task(Status::Done), task(Status::Done), task(Status::Todo)];
        assert_eq!(compute(&tasks).1, 67);
        let mut tasks = vec![task(Status::Done)];
        tasks.extend((0..7).map(|_| task(Status::Todo)));
        assert_eq!(compute(&tasks).1, 13);
    }

    #[test]
    fn recompute_is_idempotent() {
        let tasks = vec![task(Status::Done), task(Status::InProgress), task(Status::Todo)];
        let first = compute(&tasks);
        assert_eq!(first, compute(&tasks));
    }
}
