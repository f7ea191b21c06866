//! Task collection stored as a CSV file, rewritten on every save.
//!
//! Header:
//! name,category,estimated_blocks,completed_blocks,status,start_date,due_date,end_date,dependencies

use chrono::NaiveDate;
use pomoplan_core::task::split_dependencies;
use pomoplan_core::time::format_date;
use pomoplan_core::{StorageError, Task, TaskRepository, TaskStatus, parse_date};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// One row as it appears on disk. Everything is text so that a bad cell
/// only costs its own row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TaskRow {
    name: String,
    category: String,
    estimated_blocks: String,
    #[serde(default)]
    completed_blocks: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    start_date: String,
    due_date: String,
    #[serde(default)]
    end_date: String,
    #[serde(default)]
    dependencies: String,
}

impl From<&Task> for TaskRow {
    fn from(t: &Task) -> Self {
        Self {
            name: t.name.clone(),
            category: t.category.clone(),
            estimated_blocks: t.estimated_blocks.to_string(),
            completed_blocks: t.completed_blocks.to_string(),
            status: t.status.as_str().to_string(),
            start_date: format_date(t.start_date),
            due_date: format_date(t.due_date),
            end_date: t.end_date.map(format_date).unwrap_or_default(),
            dependencies: t.dependencies.join(","),
        }
    }
}

impl TaskRow {
    fn into_task(self) -> Result<Task, String> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err("empty name".into());
        }
        let estimated: u32 = self
            .estimated_blocks
            .trim()
            .parse()
            .map_err(|_| format!("bad estimated_blocks '{}'", self.estimated_blocks))?;
        let completed: u32 = match self.completed_blocks.trim() {
            "" => 0,
            s => s
                .parse()
                .map_err(|_| format!("bad completed_blocks '{s}'"))?,
        };
        let due = parse_date(&self.due_date).map_err(|e| e.to_string())?;
        // start_date predates the file format in some exports; fall back to due.
        let start = optional_date(&self.start_date)?.unwrap_or(due);
        let end = optional_date(&self.end_date)?;
        let status = TaskStatus::parse(&self.status)
            .ok_or_else(|| format!("bad status '{}'", self.status))?;

        Ok(Task {
            name,
            category: self.category.trim().to_string(),
            estimated_blocks: estimated,
            completed_blocks: completed,
            due_date: due,
            start_date: start,
            end_date: end,
            status,
            dependencies: split_dependencies(&self.dependencies),
        })
    }
}

fn optional_date(s: &str) -> Result<Option<NaiveDate>, String> {
    if s.trim().is_empty() {
        return Ok(None);
    }
    parse_date(s).map(Some).map_err(|e| e.to_string())
}

#[derive(Debug, Clone)]
pub struct CsvTaskFile {
    path: PathBuf,
}

impl CsvTaskFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<Task>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_path(&self.path)
            .map_err(|e| StorageError::new(format!("open {}", self.path.display()), e))?;

        let mut tasks = Vec::new();
        for (i, result) in rdr.deserialize::<TaskRow>().enumerate() {
            let line = i + 2;
            let row = match result {
                Ok(row) => row,
                Err(e) => {
                    warn!(path = %self.path.display(), line, error = %e, "skipping unreadable task row");
                    continue;
                }
            };
            match row.into_task() {
                Ok(task) => tasks.push(task),
                Err(reason) => {
                    warn!(path = %self.path.display(), line, %reason, "skipping invalid task row");
                }
            }
        }
        Ok(tasks)
    }

    fn write(&self, tasks: &[Task]) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .map_err(|e| StorageError::new(format!("create {}", dir.display()), e))?;
        }

        // Write beside the target and rename so a crash never leaves half a file.
        let tmp = self.path.with_extension("csv.tmp");
        let ctx = || format!("write {}", tmp.display());
        {
            let mut wtr = csv::WriterBuilder::new()
                .has_headers(false)
                .from_path(&tmp)
                .map_err(|e| StorageError::new(ctx(), e))?;
            wtr.write_record(HEADER).map_err(|e| StorageError::new(ctx(), e))?;
            for t in tasks {
                wtr.serialize(TaskRow::from(t))
                    .map_err(|e| StorageError::new(ctx(), e))?;
            }
            wtr.flush().map_err(|e| StorageError::new(ctx(), e))?;
        }
        fs::rename(&tmp, &self.path)
            .map_err(|e| StorageError::new(format!("replace {}", self.path.display()), e))
    }
}

const HEADER: [&str; 9] = [
    "name",
    "category",
    "estimated_blocks",
    "completed_blocks",
    "status",
    "start_date",
    "due_date",
    "end_date",
    "dependencies",
];

impl TaskRepository for CsvTaskFile {
    fn load(&self) -> Result<Vec<Task>, StorageError> {
        self.read()
    }

    fn save(&mut self, tasks: &[Task]) -> Result<(), StorageError> {
        self.write(tasks)
    }
}
