//! Command implementations for the CLI interface.
//!
//! This module contains the subcommand definitions and the handlers that
//! translate them into lifecycle operations and formatted output. Mutation
//! logic lives in [`crate::ops`]; this layer owns parsing and printing.

use clap::Subcommand;
use clap_complete::{generate, Shell};

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use chrono::{Local, NaiveDate, TimeZone, Utc};

use crate::error::{Error, Result};
use crate::fields::*;
use crate::ops::{self, NewTask, TaskUpdate};
use crate::project::ProjectDraft;
use crate::store::*;
use crate::task::{Task, TaskDraft};

#[derive(Subcommand)]
pub enum Commands {
    /// Manage projects.
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Add a new task to an existing project.
    Add {
        /// Short title for the task.
        title: String,
        /// Owning project ID.
        #[arg(long)]
        project: u64,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Priority: low | medium | high.
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", or "in Nd".
        #[arg(long)]
        due: Option<String>,
        /// Comma-separated tags. May be repeated.
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Estimated hours.
        #[arg(long)]
        estimate: Option<f32>,
        /// Actual hours spent.
        #[arg(long)]
        actual: Option<f32>,
    },

    /// Start work on a task (status in-progress).
    Begin {
        /// Task ID.
        id: u64,
    },

    /// Mark a task done.
    Complete {
        /// Task ID.
        id: u64,
    },

    /// Update fields on a task.
    Update {
        /// Task ID.
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Status: todo | in-progress | review | done.
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Progress percentage, 0-100.
        #[arg(long)]
        progress: Option<u8>,
        #[arg(long)]
        due: Option<String>,
        /// Clear due date.
        #[arg(long)]
        clear_due: bool,
        /// Add tags. May be repeated and comma-separated.
        #[arg(long = "add-tag")]
        add_tags: Vec<String>,
        /// Remove tags. May be repeated and comma-separated.
        #[arg(long = "rm-tag")]
        rm_tags: Vec<String>,
        /// Estimated hours.
        #[arg(long)]
        estimate: Option<f32>,
        /// Actual hours spent.
        #[arg(long)]
        actual: Option<f32>,
    },

    /// Delete a task by ID.
    Delete {
        /// Task ID.
        id: u64,
    },

    /// List tasks with optional filters.
    List {
        /// Include done tasks.
        #[arg(long)]
        all: bool,
        /// Filter by status.
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Filter by priority.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Filter by owning project ID.
        #[arg(long)]
        project: Option<u64>,
        /// Filter by tag. May be repeated. Accepts comma-separated.
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Due filter: today | this-week | overdue | none.
        #[arg(long, value_enum)]
        due: Option<DueFilter>,
        /// Sort key.
        #[arg(long, value_enum, default_value_t = SortKey::Due)]
        sort: SortKey,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// View a single task by ID.
    View {
        /// Task ID.
        id: u64,
    },

    /// List distinct tags and counts.
    Tags,

    /// Create a timestamped backup of the store file.
    Backup,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a project with its initial tasks.
    ///
    /// "Review & Comments" is appended automatically and can only be
    /// removed by deleting the project.
    Create {
        /// Project name.
        name: String,
        /// Optional description.
        #[arg(long)]
        desc: Option<String>,
        /// Category: tech | academic | research | business | personal.
        #[arg(long, value_enum, default_value_t = Category::Tech)]
        category: Category,
        /// Priority: low | medium | high.
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Display colour label.
        #[arg(long, default_value = "#3b82f6")]
        color: String,
        /// Project due date: YYYY-MM-DD, "today", "tomorrow", or "in Nd".
        #[arg(long)]
        due: String,
        /// Comma-separated tags. May be repeated.
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Initial task title. May be repeated; at least one is required.
        #[arg(long = "task")]
        tasks: Vec<String>,
    },

    /// List all projects with derived status and progress.
    List,

    /// View a project and its tasks.
    View {
        /// Project ID.
        id: u64,
    },

    /// Delete a project and all of its tasks.
    Delete {
        /// Project ID.
        id: u64,
    },
}

fn parse_due_arg(s: &str) -> Result<NaiveDate> {
    parse_due_input(s).ok_or_else(|| {
        Error::Validation(format!(
            "unrecognised due date '{s}'; use YYYY-MM-DD, 'today', 'tomorrow', or 'in Nd'"
        ))
    })
}

fn format_timestamp(utc: i64) -> String {
    Utc.timestamp_opt(utc, 0)
        .single()
        .map(|d| d.to_rfc3339())
        .unwrap_or_else(|| "-".into())
}

/// Handle project subcommands.
pub fn cmd_project(store: &mut Store, db_path: &Path, action: ProjectAction) -> Result<()> {
    match action {
        ProjectAction::Create {
            name,
            desc,
            category,
            priority,
            color,
            due,
            tags,
            tasks,
        } => {
            let end_date = parse_due_arg(&due)?;
            let drafts = tasks
                .into_iter()
                .map(|title| TaskDraft { title, description: None })
                .collect();
            let draft = ProjectDraft {
                name,
                description: desc,
                category,
                priority,
                color_label: color,
                end_date: Some(end_date),
                tags,
                tasks: drafts,
            };
            let id = ops::create_project(store, db_path, draft)?;
            let count = store.tasks_for_project(id).len();
            println!("Created project {id} with {count} task(s)");
            Ok(())
        }
        ProjectAction::List => {
            let projects: Vec<_> = store.projects.iter().collect();
            print_project_table(&projects);
            Ok(())
        }
        ProjectAction::View { id } => cmd_project_view(store, id),
        ProjectAction::Delete { id } => {
            let count = store.tasks_for_project(id).len();
            ops::delete_project(store, db_path, id)?;
            println!("Deleted project {id} and {count} task(s)");
            Ok(())
        }
    }
}

/// View detailed information about a project and its tasks.
fn cmd_project_view(store: &Store, id: u64) -> Result<()> {
    let project = store.project(id).ok_or(Error::ProjectNotFound(id))?;
    let today = Local::now().date_naive();
    println!("ID:           {}", project.id);
    println!("Name:         {}", project.name);
    println!("Category:     {}", format_category(project.category));
    println!("Priority:     {}", format_priority(project.priority));
    println!("Colour:       {}", project.color_label);
    println!("Status:       {}", format_status(project.status));
    println!("Progress:     {}%", project.progress);
    println!("Started:      {}", project.start_date);
    println!(
        "Due:          {}",
        match project.end_date {
            Some(d) => format!("{d} ({})", format_due_relative(Some(d), today)),
            None => "-".into(),
        }
    );
    println!(
        "Tags:         {}",
        if project.tags.is_empty() { "-".into() } else { project.tags.join(",") }
    );
    println!(
        "Description:  {}",
        project.description.as_deref().unwrap_or("-")
    );
    println!();
    let tasks = store.tasks_for_project(id);
    print_task_table(store, &tasks);
    Ok(())
}

/// Add a new task to a project.
#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    store: &mut Store,
    db_path: &Path,
    title: String,
    project: u64,
    desc: Option<String>,
    priority: Priority,
    due: Option<String>,
    tags: Vec<String>,
    estimate: Option<f32>,
    actual: Option<f32>,
) -> Result<()> {
    let due_date = due.as_deref().map(parse_due_arg).transpose()?;
    let id = ops::add_task(
        store,
        db_path,
        NewTask {
            title,
            description: desc,
            priority,
            project_id: project,
            due_date,
            tags,
            estimated_hours: estimate,
            actual_hours: actual,
        },
    )?;
    println!("Added task {id}");
    Ok(())
}

/// Start work on a task.
pub fn cmd_begin(store: &mut Store, db_path: &Path, id: u64) -> Result<()> {
    ops::begin_task(store, db_path, id)?;
    println!("Began task {id}");
    Ok(())
}

/// Mark a task done.
pub fn cmd_complete(store: &mut Store, db_path: &Path, id: u64) -> Result<()> {
    ops::complete_task(store, db_path, id)?;
    println!("Completed task {id}");
    Ok(())
}

/// Update an existing task's fields.
#[allow(clippy::too_many_arguments)]
pub fn cmd_update(
    store: &mut Store,
    db_path: &Path,
    id: u64,
    title: Option<String>,
    desc: Option<String>,
    priority: Option<Priority>,
    status: Option<Status>,
    progress: Option<u8>,
    due: Option<String>,
    clear_due: bool,
    add_tags: Vec<String>,
    rm_tags: Vec<String>,
    estimate: Option<f32>,
    actual: Option<f32>,
) -> Result<()> {
    let due_date = due.as_deref().map(parse_due_arg).transpose()?;
    ops::update_task(
        store,
        db_path,
        id,
        TaskUpdate {
            title,
            description: desc,
            priority,
            status,
            progress,
            due_date,
            clear_due,
            add_tags,
            rm_tags,
            estimated_hours: estimate,
            actual_hours: actual,
        },
    )?;
    println!("Updated task {id}");
    Ok(())
}

/// Delete a task.
pub fn cmd_delete(store: &mut Store, db_path: &Path, id: u64) -> Result<()> {
    ops::delete_task(store, db_path, id)?;
    println!("Deleted task {id}");
    Ok(())
}

/// List tasks with optional filtering and sorting.
#[allow(clippy::too_many_arguments)]
pub fn cmd_list(
    store: &Store,
    all: bool,
    status: Option<Status>,
    priority: Option<Priority>,
    project: Option<u64>,
    tags: Vec<String>,
    due: Option<DueFilter>,
    sort: SortKey,
    limit: Option<usize>,
) -> Result<()> {
    let tags = split_and_normalise_tags(&tags);
    let today = Local::now().date_naive();
    let (week_start, week_end) = start_end_of_this_week(today);

    let mut filtered: Vec<&Task> = store
        .tasks
        .iter()
        .filter(|t| {
            if !all && t.status == Status::Done {
                return false;
            }
            if let Some(s) = status {
                if t.status != s {
                    return false;
                }
            }
            if let Some(p) = priority {
                if t.priority != p {
                    return false;
                }
            }
            if let Some(pid) = project {
                if t.project_id != pid {
                    return false;
                }
            }
            if !tags.is_empty() {
                let tagset: BTreeSet<_> = t.tags.iter().cloned().collect();
                if !tags.iter().all(|tg| tagset.contains(tg)) {
                    return false;
                }
            }
            if let Some(df) = due {
                match df {
                    DueFilter::Today => {
                        if t.due_date != Some(today) {
                            return false;
                        }
                    }
                    DueFilter::ThisWeek => match t.due_date {
                        Some(d) if d >= week_start && d <= week_end => {}
                        _ => return false,
                    },
                    DueFilter::Overdue => match t.due_date {
                        Some(d) if d < today => {}
                        _ => return false,
                    },
                    DueFilter::None => {
                        if t.due_date.is_some() {
                            return false;
                        }
                    }
                }
            }
            true
        })
        .collect();

    match sort {
        SortKey::Due => filtered.sort_by_key(|t| (t.due_date.unwrap_or(NaiveDate::MAX), t.id)),
        SortKey::Priority => {
            // High first, then ID for stability.
            let rank = |p: Priority| match p {
                Priority::High => 0,
                Priority::Medium => 1,
                Priority::Low => 2,
            };
            filtered.sort_by_key(|t| (rank(t.priority), t.id));
        }
        SortKey::Id => filtered.sort_by_key(|t| t.id),
    }

    if let Some(n) = limit {
        filtered.truncate(n);
    }

    print_task_table(store, &filtered);
    Ok(())
}

/// View detailed information about a specific task.
pub fn cmd_view(store: &Store, id: u64) -> Result<()> {
    let task = store.task(id).ok_or(Error::TaskNotFound(id))?;
    let today = Local::now().date_naive();
    let project = store
        .project(task.project_id)
        .map(|p| format!("{} (#{})", p.name, p.id))
        .unwrap_or_else(|| format!("#{}", task.project_id));
    println!("ID:           {}", task.id);
    println!("Title:        {}", task.title);
    println!(
        "Status:       {}{}",
        format_status(task.status),
        if task.is_review_task { " (review task)" } else { "" }
    );
    println!("Priority:     {}", format_priority(task.priority));
    println!("Project:      {project}");
    println!("Progress:     {}%", task.progress);
    println!(
        "Due:          {}",
        match task.due_date {
            Some(d) => format!("{d} ({})", format_due_relative(Some(d), today)),
            None => "-".into(),
        }
    );
    println!(
        "Tags:         {}",
        if task.tags.is_empty() { "-".into() } else { task.tags.join(",") }
    );
    println!(
        "Hours:        est {} / actual {}",
        task.estimated_hours.map(|h| h.to_string()).unwrap_or_else(|| "-".into()),
        task.actual_hours.map(|h| h.to_string()).unwrap_or_else(|| "-".into()),
    );
    println!("Created UTC:  {}", format_timestamp(task.created_at_utc));
    println!("Updated UTC:  {}", format_timestamp(task.updated_at_utc));
    println!(
        "Description:\n{}\n",
        task.description.as_deref().unwrap_or("-")
    );
    Ok(())
}

/// List all distinct tags with their usage counts.
pub fn cmd_tags(store: &Store) -> Result<()> {
    println!("{:<16} {}", "Tag", "Count");
    for (tag, count) in tag_counts(store) {
        println!("{:<16} {}", truncate(&tag, 16), count);
    }
    Ok(())
}

/// Create a timestamped backup of the store file.
pub fn cmd_backup(db_path: &Path) -> Result<()> {
    if !db_path.exists() {
        return Err(Error::Validation(format!(
            "store file {} does not exist",
            db_path.display()
        )));
    }
    let parent_dir = db_path.parent().unwrap_or_else(|| Path::new("."));
    let backup_dir = parent_dir.join("backup");
    fs::create_dir_all(&backup_dir)?;

    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let file_name = db_path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("taskdeck.json");
    let backup_path = backup_dir.join(format!("{timestamp}_{file_name}"));
    fs::copy(db_path, &backup_path)?;
    println!("Created backup: {}", backup_path.display());
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) -> Result<()> {
    use clap::CommandFactory;

    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
    Ok(())
}
