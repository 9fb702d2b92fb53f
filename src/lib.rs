//! # taskdeck
//!
//! A command-line project tracker: projects are decomposed into tasks, tasks
//! move through a status lifecycle, and each project's overall status and
//! progress are derived from its task set.
//!
//! ## Key ideas
//!
//! - **Derived project status**: a project's `status`/`progress` are never
//!   set directly. The aggregator in [`status`] recomputes them from the
//!   live task set after every task mutation, so they cannot drift.
//! - **Guaranteed review task**: every project is created with a
//!   "Review & Comments" task appended after the user's initial tasks; it
//!   stays until the project itself is deleted.
//! - **Local file storage**: one JSON store file holding all projects and
//!   tasks, written atomically, with timestamped backups on demand.
//!
//! ## Quick start
//!
//! ```bash
//! # Create a project with two initial tasks
//! td project create "Thesis" --due 2026-10-01 --task "Outline" --task "Draft"
//!
//! # Work a task through its lifecycle
//! td begin 1
//! td complete 1
//!
//! # Watch the project's derived status move
//! td project list
//! ```
//!
//! Data is stored in `~/.taskdeck/taskdeck.json` unless `--db` points
//! elsewhere.

pub mod cli;
pub mod cmd;
pub mod error;
pub mod fields;
pub mod ops;
pub mod project;
pub mod status;
pub mod store;
pub mod task;
