//! End-to-end lifecycle scenarios over a temporary store file.

use std::path::PathBuf;

use chrono::{Duration, Local, NaiveDate};
use tempfile::TempDir;

use taskdeck::error::Error;
use taskdeck::fields::{Category, Priority, Status};
use taskdeck::ops::{self, NewTask, TaskUpdate, REVIEW_TASK_TITLE};
use taskdeck::project::ProjectDraft;
use taskdeck::status::recompute_project_status;
use taskdeck::store::Store;
use taskdeck::task::TaskDraft;

fn make_store() -> (Store, PathBuf, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir failed");
    let path = dir.path().join("taskdeck.json");
    (Store::default(), path, dir)
}

fn draft(name: &str, task_titles: &[&str]) -> ProjectDraft {
    ProjectDraft {
        name: name.to_string(),
        description: None,
        category: Category::Tech,
        priority: Priority::Medium,
        color_label: "#3b82f6".to_string(),
        end_date: NaiveDate::from_ymd_opt(2026, 12, 1),
        tags: Vec::new(),
        tasks: task_titles
            .iter()
            .map(|t| TaskDraft { title: t.to_string(), description: None })
            .collect(),
    }
}

#[test]
fn create_project_appends_review_task() {
    let (mut store, path, _dir) = make_store();
    let id = ops::create_project(&mut store, &path, draft("Site", &["A", "B"])).unwrap();

    let tasks = store.tasks_for_project(id);
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[0].title, "A");
    assert_eq!(tasks[1].title, "B");
    assert_eq!(tasks[2].title, REVIEW_TASK_TITLE);
    assert!(tasks[2].is_review_task);
    assert_eq!(tasks[2].due_date, NaiveDate::from_ymd_opt(2026, 12, 1));

    let project = store.project(id).unwrap();
    assert_eq!(project.status, Status::Todo);
    assert_eq!(project.progress, 0);
}

#[test]
fn create_project_validation_leaves_no_partial_writes() {
    let (mut store, path, _dir) = make_store();

    let mut no_name = draft("", &["A"]);
    no_name.name = "  ".into();
    assert!(matches!(
        ops::create_project(&mut store, &path, no_name),
        Err(Error::Validation(_))
    ));

    let mut no_due = draft("P", &["A"]);
    no_due.end_date = None;
    assert!(matches!(
        ops::create_project(&mut store, &path, no_due),
        Err(Error::Validation(_))
    ));

    let no_tasks = draft("P", &[]);
    assert!(matches!(
        ops::create_project(&mut store, &path, no_tasks),
        Err(Error::Validation(_))
    ));

    let blank_tasks = draft("P", &["  ", ""]);
    assert!(matches!(
        ops::create_project(&mut store, &path, blank_tasks),
        Err(Error::Validation(_))
    ));

    assert!(store.projects.is_empty());
    assert!(store.tasks.is_empty());
    assert!(!path.exists());
}

#[test]
fn lifecycle_scenario_drives_project_through_all_states() {
    // Project with 4 tasks (3 user + review).
    let (mut store, path, _dir) = make_store();
    let pid = ops::create_project(&mut store, &path, draft("P", &["A", "B", "C"])).unwrap();
    let ids: Vec<u64> = store.tasks_for_project(pid).iter().map(|t| t.id).collect();
    assert_eq!(ids.len(), 4);

    // Begin one task: project in progress, 0/4 completed.
    ops::begin_task(&mut store, &path, ids[0]).unwrap();
    let task = store.task(ids[0]).unwrap();
    assert_eq!(task.status, Status::InProgress);
    assert_eq!(task.progress, 10);
    assert!(!task.completed);
    let p = store.project(pid).unwrap();
    assert_eq!((p.status, p.progress), (Status::InProgress, 0));

    // Complete it: 1/4 done puts the project in review at 25%.
    ops::complete_task(&mut store, &path, ids[0]).unwrap();
    let p = store.project(pid).unwrap();
    assert_eq!((p.status, p.progress), (Status::Review, 25));

    // Complete the rest: project done at 100%.
    for &id in &ids[1..] {
        ops::complete_task(&mut store, &path, id).unwrap();
    }
    let p = store.project(pid).unwrap();
    assert_eq!((p.status, p.progress), (Status::Done, 100));
}

#[test]
fn begin_rejects_done_tasks() {
    let (mut store, path, _dir) = make_store();
    let pid = ops::create_project(&mut store, &path, draft("P", &["A"])).unwrap();
    let id = store.tasks_for_project(pid)[0].id;
    ops::complete_task(&mut store, &path, id).unwrap();
    assert!(matches!(
        ops::begin_task(&mut store, &path, id),
        Err(Error::Validation(_))
    ));
}

#[test]
fn completed_tracks_done_status_through_updates() {
    let (mut store, path, _dir) = make_store();
    let pid = ops::create_project(&mut store, &path, draft("P", &["A"])).unwrap();
    let id = store.tasks_for_project(pid)[0].id;

    ops::begin_task(&mut store, &path, id).unwrap();
    assert!(!store.task(id).unwrap().completed);

    let update = TaskUpdate { status: Some(Status::Done), ..Default::default() };
    ops::update_task(&mut store, &path, id, update).unwrap();
    assert!(store.task(id).unwrap().completed);

    // Moving a done task back to review through generic update clears the flag.
    let update = TaskUpdate { status: Some(Status::Review), ..Default::default() };
    ops::update_task(&mut store, &path, id, update).unwrap();
    let task = store.task(id).unwrap();
    assert_eq!(task.status, Status::Review);
    assert!(!task.completed);
}

#[test]
fn update_merges_and_removes_tags() {
    let (mut store, path, _dir) = make_store();
    let pid = ops::create_project(&mut store, &path, draft("P", &["A"])).unwrap();
    let id = store.tasks_for_project(pid)[0].id;

    let update = TaskUpdate {
        add_tags: vec!["Backend, API".into(), "backend".into()],
        ..Default::default()
    };
    ops::update_task(&mut store, &path, id, update).unwrap();
    assert_eq!(store.task(id).unwrap().tags, vec!["api", "backend"]);

    let update = TaskUpdate { rm_tags: vec!["API".into()], ..Default::default() };
    ops::update_task(&mut store, &path, id, update).unwrap();
    assert_eq!(store.task(id).unwrap().tags, vec!["backend"]);
}

#[test]
fn deleting_user_tasks_recomputes_from_what_remains() {
    let (mut store, path, _dir) = make_store();
    let pid = ops::create_project(&mut store, &path, draft("P", &["A", "B"])).unwrap();
    let ids: Vec<u64> = store.tasks_for_project(pid).iter().map(|t| t.id).collect();

    ops::complete_task(&mut store, &path, ids[0]).unwrap();
    let p = store.project(pid).unwrap();
    assert_eq!((p.status, p.progress), (Status::Review, 33));

    // Delete the completed task: 0/2 completed, all todo again.
    ops::delete_task(&mut store, &path, ids[0]).unwrap();
    let p = store.project(pid).unwrap();
    assert_eq!((p.status, p.progress), (Status::Todo, 0));

    ops::delete_task(&mut store, &path, ids[1]).unwrap();
    let p = store.project(pid).unwrap();
    assert_eq!((p.status, p.progress), (Status::Todo, 0));
}

#[test]
fn empty_task_set_recomputes_to_todo_zero() {
    // The empty-set rule applies when the last task disappears through a
    // store-level mutation (review tasks never go through delete_task).
    let (mut store, path, _dir) = make_store();
    let pid = ops::create_project(&mut store, &path, draft("P", &["A"])).unwrap();
    for id in store.tasks_for_project(pid).iter().map(|t| t.id).collect::<Vec<_>>() {
        ops::complete_task(&mut store, &path, id).unwrap();
    }
    let p = store.project(pid).unwrap();
    assert_eq!((p.status, p.progress), (Status::Done, 100));

    let ids: Vec<u64> = store.tasks_for_project(pid).iter().map(|t| t.id).collect();
    for id in ids {
        store.remove_task(id);
    }
    recompute_project_status(&mut store, &path, pid).unwrap();
    let p = store.project(pid).unwrap();
    assert_eq!((p.status, p.progress), (Status::Todo, 0));
}

#[test]
fn review_task_survives_everything_but_project_deletion() {
    let (mut store, path, _dir) = make_store();
    let pid = ops::create_project(&mut store, &path, draft("P", &["A"])).unwrap();
    let review_id = store
        .tasks_for_project(pid)
        .iter()
        .find(|t| t.is_review_task)
        .unwrap()
        .id;

    assert!(matches!(
        ops::delete_task(&mut store, &path, review_id),
        Err(Error::Validation(_))
    ));
    assert!(store.task(review_id).is_some());

    ops::delete_project(&mut store, &path, pid).unwrap();
    assert!(store.task(review_id).is_none());
}

#[test]
fn project_deletion_leaves_no_orphan_tasks() {
    let (mut store, path, _dir) = make_store();
    let keep = ops::create_project(&mut store, &path, draft("Keep", &["K"])).unwrap();
    let gone = ops::create_project(&mut store, &path, draft("Gone", &["G1", "G2"])).unwrap();

    ops::delete_project(&mut store, &path, gone).unwrap();
    assert!(store.project(gone).is_none());
    assert!(store.tasks.iter().all(|t| t.project_id == keep));
    assert_eq!(store.tasks_for_project(keep).len(), 2);
}

#[test]
fn add_task_requires_existing_project_and_valid_fields() {
    let (mut store, path, _dir) = make_store();
    let pid = ops::create_project(&mut store, &path, draft("P", &["A"])).unwrap();

    let new = |title: &str, project_id, estimate| NewTask {
        title: title.to_string(),
        description: None,
        priority: Priority::High,
        project_id,
        due_date: None,
        tags: Vec::new(),
        estimated_hours: estimate,
        actual_hours: None,
    };

    assert!(matches!(
        ops::add_task(&mut store, &path, new("T", 999, None)),
        Err(Error::ProjectNotFound(999))
    ));
    assert!(matches!(
        ops::add_task(&mut store, &path, new("  ", pid, None)),
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        ops::add_task(&mut store, &path, new("T", pid, Some(-1.0))),
        Err(Error::Validation(_))
    ));

    // Complete the existing tasks, then add a fresh one: the new todo task
    // pulls the project back out of done.
    for id in store.tasks_for_project(pid).iter().map(|t| t.id).collect::<Vec<_>>() {
        ops::complete_task(&mut store, &path, id).unwrap();
    }
    let p = store.project(pid).unwrap();
    assert_eq!((p.status, p.progress), (Status::Done, 100));

    let id = ops::add_task(&mut store, &path, new("T", pid, Some(4.0))).unwrap();
    let task = store.task(id).unwrap();
    assert_eq!(task.status, Status::Todo);
    assert_eq!(task.progress, 0);
    assert!(!task.completed);

    let p = store.project(pid).unwrap();
    assert_eq!((p.status, p.progress), (Status::Review, 67));
}

#[test]
fn store_round_trips_through_disk() {
    let (mut store, path, _dir) = make_store();
    let pid = ops::create_project(&mut store, &path, draft("P", &["A", "B"])).unwrap();
    let ids: Vec<u64> = store.tasks_for_project(pid).iter().map(|t| t.id).collect();
    ops::begin_task(&mut store, &path, ids[0]).unwrap();

    let reloaded = Store::load(&path);
    assert_eq!(reloaded.projects.len(), 1);
    assert_eq!(reloaded.tasks.len(), 3);
    let task = reloaded.task(ids[0]).unwrap();
    assert_eq!(task.status, Status::InProgress);
    assert_eq!(task.progress, 10);
    let p = reloaded.project(pid).unwrap();
    assert_eq!((p.status, p.progress), (Status::InProgress, 0));
}

#[test]
fn corrupt_store_file_starts_fresh() {
    let dir = tempfile::tempdir().expect("tempdir failed");
    let path = dir.path().join("taskdeck.json");
    std::fs::write(&path, "{ not json").unwrap();
    let store = Store::load(&path);
    assert!(store.projects.is_empty());
    assert!(store.tasks.is_empty());
}

#[test]
fn review_task_due_tracks_project_end_date() {
    let (mut store, path, _dir) = make_store();
    let due = Local::now().date_naive() + Duration::days(30);
    let mut d = draft("P", &["A"]);
    d.end_date = Some(due);
    let pid = ops::create_project(&mut store, &path, d).unwrap();
    let review = store
        .tasks_for_project(pid)
        .into_iter()
        .find(|t| t.is_review_task)
        .unwrap();
    assert_eq!(review.due_date, Some(due));
}
