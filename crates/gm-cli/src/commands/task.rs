//! Task commands for assignments, exams and other work tied to a discipline.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDateTime};
use clap::{Args, Subcommand};

use gm_core::task::DUE_DATE_FORMAT;
use gm_core::{TaskDraft, TaskPriority, TaskStatus, TaskType, plan_task};
use gm_db::{TaskRecord, TaskScope};

use super::util::student_id;
use crate::Config;

/// Task subcommands.
#[derive(Debug, Subcommand)]
pub enum TaskAction {
    /// Add a task to an active discipline.
    Add(TaskAddArgs),

    /// List tasks of a discipline or of every discipline of a student.
    List(TaskListArgs),

    /// Change fields of an existing task.
    Update(TaskUpdateArgs),

    /// Mark a task as done, or reopen it with `--undo`.
    Done(TaskDoneArgs),

    /// Delete a task.
    Remove(TaskRemoveArgs),
}

#[derive(Debug, Args)]
pub struct TaskAddArgs {
    /// Discipline the task belongs to.
    #[arg(long)]
    pub discipline: i64,

    /// Task title (3 to 200 characters).
    #[arg(long)]
    pub title: String,

    /// Task type (EXAM, ASSIGNMENT, PROJECT, PRESENTATION, READING, OTHER).
    #[arg(long = "type")]
    pub task_type: TaskType,

    /// Due date, `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM`. A bare date means 23:59.
    #[arg(long)]
    pub due: String,

    #[arg(long)]
    pub description: Option<String>,

    /// Priority (LOW, MEDIUM, HIGH). Defaults to MEDIUM.
    #[arg(long)]
    pub priority: Option<TaskPriority>,

    /// Points the task is worth, 0 to 10.
    #[arg(long)]
    pub weight: Option<f64>,
}

impl TaskAddArgs {
    fn draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            task_type: self.task_type,
            status: None,
            priority: self.priority,
            due_date: self.due.clone(),
            grade_weight: self.weight,
            grade_obtained: None,
        }
    }
}

#[derive(Debug, Args)]
pub struct TaskListArgs {
    /// Only tasks of this discipline.
    #[arg(long, conflicts_with = "student", required_unless_present = "student")]
    pub discipline: Option<i64>,

    /// Tasks across all of this student's disciplines.
    #[arg(long)]
    pub student: Option<String>,

    /// Only completed tasks.
    #[arg(long, conflicts_with = "pending")]
    pub completed: bool,

    /// Only tasks not yet done.
    #[arg(long)]
    pub pending: bool,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct TaskUpdateArgs {
    /// Task ID.
    pub id: i64,

    /// Move the task to another discipline.
    #[arg(long)]
    pub discipline: Option<i64>,

    #[arg(long)]
    pub title: Option<String>,

    /// New description. An empty value clears it.
    #[arg(long)]
    pub description: Option<String>,

    #[arg(long = "type")]
    pub task_type: Option<TaskType>,

    #[arg(long)]
    pub status: Option<TaskStatus>,

    #[arg(long)]
    pub priority: Option<TaskPriority>,

    #[arg(long)]
    pub due: Option<String>,

    #[arg(long)]
    pub weight: Option<f64>,

    /// Grade obtained, 0 to 10.
    #[arg(long)]
    pub grade: Option<f64>,
}

impl TaskUpdateArgs {
    /// Stored values overlaid with the flags that were given.
    fn draft(&self, current: &TaskRecord) -> TaskDraft {
        TaskDraft {
            title: self.title.clone().unwrap_or_else(|| current.title.clone()),
            description: self
                .description
                .clone()
                .or_else(|| current.description.clone()),
            task_type: self.task_type.unwrap_or(current.task_type),
            status: Some(self.status.unwrap_or(current.status)),
            priority: Some(self.priority.unwrap_or(current.priority)),
            due_date: self.due.clone().unwrap_or_else(|| current.due_date.clone()),
            grade_weight: self.weight.or(current.grade_weight),
            grade_obtained: self.grade.or(current.grade_obtained),
        }
    }
}

#[derive(Debug, Args)]
pub struct TaskDoneArgs {
    /// Task ID.
    pub id: i64,

    /// Reopen the task instead.
    #[arg(long)]
    pub undo: bool,
}

#[derive(Debug, Args)]
pub struct TaskRemoveArgs {
    /// Task ID.
    pub id: i64,
}

pub fn run<W: Write>(writer: &mut W, action: &TaskAction, config: &Config) -> Result<()> {
    match action {
        TaskAction::Add(args) => add(writer, args, config, Local::now().naive_local()),
        TaskAction::List(args) => list(writer, args, config),
        TaskAction::Update(args) => update(writer, args, config),
        TaskAction::Done(args) => done(writer, args, config),
        TaskAction::Remove(args) => remove(writer, args, config),
    }
}

/// Adds a task whose due date must fall after `now`.
pub fn add<W: Write>(
    writer: &mut W,
    args: &TaskAddArgs,
    config: &Config,
    now: NaiveDateTime,
) -> Result<()> {
    let mut db = config.open_database()?;
    let context = || format!("cannot add task {:?}", args.title.trim());

    let discipline = db.get_discipline(args.discipline).with_context(context)?;
    let plan = plan_task(&args.draft(), discipline.active, now).with_context(context)?;

    let record = db.insert_task(discipline.id, &plan)?;
    tracing::info!(id = record.id, discipline = %discipline.code, "task added");
    writeln!(writer, "Added {}", summarize_task(&record))?;
    Ok(())
}

pub fn list<W: Write>(writer: &mut W, args: &TaskListArgs, config: &Config) -> Result<()> {
    let student = args.student.as_deref().map(student_id).transpose()?;
    let scope = match (args.discipline, &student) {
        (Some(id), _) => TaskScope::Discipline(id),
        (None, Some(student)) => TaskScope::Student(student),
        (None, None) => bail!("either --discipline or --student is required"),
    };
    let completed = if args.completed {
        Some(true)
    } else if args.pending {
        Some(false)
    } else {
        None
    };

    let db = config.open_database()?;
    let tasks = db.list_tasks(scope, completed)?;

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&tasks)?)?;
    } else {
        write!(writer, "{}", format_tasks(&tasks))?;
    }
    Ok(())
}

/// Updates a task. The due date may already have passed and the discipline
/// may be inactive; those rules only gate new tasks.
pub fn update<W: Write>(writer: &mut W, args: &TaskUpdateArgs, config: &Config) -> Result<()> {
    let mut db = config.open_database()?;
    let current = db.get_task(args.id)?;

    let plan = args
        .draft(&current)
        .validate()
        .with_context(|| format!("cannot update task #{}", args.id))?;
    let discipline_id = args.discipline.unwrap_or(current.discipline_id);

    let record = db.update_task(args.id, discipline_id, &plan)?;
    writeln!(writer, "Updated {}", summarize_task(&record))?;
    Ok(())
}

pub fn done<W: Write>(writer: &mut W, args: &TaskDoneArgs, config: &Config) -> Result<()> {
    let status = if args.undo {
        TaskStatus::Todo
    } else {
        TaskStatus::Done
    };
    let mut db = config.open_database()?;
    let record = db.set_task_status(args.id, status)?;
    let verb = if args.undo { "Reopened" } else { "Completed" };
    writeln!(writer, "{verb} {}", summarize_task(&record))?;
    Ok(())
}

pub fn remove<W: Write>(writer: &mut W, args: &TaskRemoveArgs, config: &Config) -> Result<()> {
    let mut db = config.open_database()?;
    db.delete_task(args.id)?;
    writeln!(writer, "Removed task #{}", args.id)?;
    Ok(())
}

/// `2026-05-01T23:59:00` shown as `2026-05-01 23:59`.
fn due_display(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, DUE_DATE_FORMAT)
        .map_or_else(|_| raw.to_string(), |due| due.format("%Y-%m-%d %H:%M").to_string())
}

/// One-line summary: `#2 Midterm [EXAM] due 2026-05-01 23:59 (TODO, HIGH) in Calculus I`.
fn summarize_task(record: &TaskRecord) -> String {
    format!(
        "#{} {} [{}] due {} ({}, {}) in {}",
        record.id,
        record.title,
        record.task_type,
        due_display(&record.due_date),
        record.status,
        record.priority,
        record.discipline_name
    )
}

/// Format tasks for human-readable output.
pub fn format_tasks(tasks: &[TaskRecord]) -> String {
    let mut output = String::new();

    if tasks.is_empty() {
        writeln!(output, "No tasks.").unwrap();
        return output;
    }

    writeln!(
        output,
        "{:>4}  {:<16}  {:<12}  {:<11}  {:<6}  {:<20}  Title",
        "ID", "Due", "Type", "Status", "Prio", "Discipline"
    )
    .unwrap();
    writeln!(
        output,
        "────  ────────────────  ────────────  ───────────  ──────  ────────────────────  ─────"
    )
    .unwrap();

    for task in tasks {
        let discipline = if task.discipline_name.chars().count() > 20 {
            format!(
                "{}...",
                task.discipline_name.chars().take(17).collect::<String>()
            )
        } else {
            task.discipline_name.clone()
        };
        writeln!(
            output,
            "{:>4}  {:<16}  {:<12}  {:<11}  {:<6}  {:<20}  {}",
            task.id,
            due_display(&task.due_date),
            task.task_type,
            task.status,
            task.priority,
            discipline,
            task.title
        )
        .unwrap();
    }

    output
}
