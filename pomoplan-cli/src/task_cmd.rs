use anyhow::{Result, bail};
use clap::Subcommand;
use pomoplan_core::{Category, NewTask, Task, parse_date};
use pomoplan_core::task::split_dependencies;
use tracing::warn;

use crate::prompt::confirm;
use crate::state::open_session;

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Add a task
    Add {
        name: String,

        /// study, exam, assignment, reading or other
        #[arg(long, short, default_value = "study")]
        category: String,

        /// Estimated focus blocks (>= 1)
        #[arg(long, short)]
        estimate: i64,

        /// Due date, YYYY-MM-DD (today or later)
        #[arg(long, short)]
        due: String,

        /// Comma separated names of tasks that must be completed first
        #[arg(long)]
        depends_on: Option<String>,
    },

    /// List tasks with their progress
    List {
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Delete a task (dependents keep the reference and stay blocked)
    Delete {
        name: String,

        /// Skip the confirmation prompt
        #[arg(long, short, default_value_t = false)]
        yes: bool,
    },
}

pub fn run(cmd: TaskCommand) -> Result<()> {
    match cmd {
        TaskCommand::Add {
            name,
            category,
            estimate,
            due,
            depends_on,
        } => add(name, category, estimate, &due, depends_on.as_deref()),
        TaskCommand::List { json } => list(json),
        TaskCommand::Delete { name, yes } => delete(&name, yes),
    }
}

fn add(
    name: String,
    category: String,
    estimate: i64,
    due: &str,
    depends_on: Option<&str>,
) -> Result<()> {
    let mut session = open_session()?;
    let due = parse_date(due)?;

    if Category::parse(&category).is_none() {
        warn!(%category, "unknown category, importance falls back to the default weight");
    }

    let deps = depends_on.map(split_dependencies).unwrap_or_default();
    for dep in &deps {
        if session.planner.get_task(dep).is_none() {
            warn!(dependency = %dep, "no task with this name yet; the new task stays blocked until it exists and completes");
        }
    }

    let new = NewTask::new(name, category, estimate, due).depends_on(deps);
    let task = session.planner.add_task(new, session.today)?;
    println!("Task '{}' added (due {}).", task.name, task.due_date);
    Ok(())
}

fn list(json: bool) -> Result<()> {
    let session = open_session()?;
    let tasks = session.planner.tasks();

    if json {
        println!("{}", serde_json::to_string_pretty(tasks)?);
        return Ok(());
    }
    if tasks.is_empty() {
        println!("No tasks available.");
        return Ok(());
    }

    println!("Current tasks\n");
    for t in tasks {
        print!("{}", render_task(t));
    }
    Ok(())
}

fn render_task(t: &Task) -> String {
    let mut s = format!(
        "- {}\n   Category : {}\n   Status   : {}\n   Blocks   : {}/{}\n   Remaining: {}\n   Due      : {}\n",
        t.name,
        t.category,
        t.progress(),
        t.completed_blocks,
        t.estimated_blocks,
        t.remaining_blocks(),
        t.due_date,
    );
    if !t.dependencies.is_empty() {
        s.push_str(&format!("   Needs    : {}\n", t.dependencies.join(", ")));
    }
    s.push('\n');
    s
}

fn delete(name: &str, yes: bool) -> Result<()> {
    let mut session = open_session()?;
    let Some(task) = session.planner.get_task(name) else {
        bail!("Task '{name}' not found.");
    };
    let display = task.name.clone();

    if !yes && !confirm(&format!("Are you sure you want to delete '{display}'?"))? {
        println!("Delete cancelled.");
        return Ok(());
    }

    session.planner.delete_task(name)?;
    if session.planner.tasks().is_empty() {
        println!("Task '{display}' deleted. No tasks remaining.");
    } else {
        println!("Task '{display}' deleted successfully.");
    }
    Ok(())
}
