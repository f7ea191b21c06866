//! Task model: a named unit of work measured in focus blocks.
//!
//! Identity is the name, compared case-insensitively. Dependencies are held
//! by name only; see [`crate::store::TaskLookup`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed category set understood by the importance table and the summary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Study,
    Exam,
    Assignment,
    Reading,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Study,
        Category::Exam,
        Category::Assignment,
        Category::Reading,
        Category::Other,
    ];

    /// Case-insensitive lookup; `None` for anything outside the fixed set.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "study" => Some(Self::Study),
            "exam" => Some(Self::Exam),
            "assignment" => Some(Self::Assignment),
            "reading" => Some(Self::Reading),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Like [`Category::parse`] but folds unknown names into `Other`.
    pub fn fold(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::Other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Study => "study",
            Self::Exam => "exam",
            Self::Assignment => "assignment",
            Self::Reading => "reading",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "not started")]
    NotStarted,
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not started",
            Self::InProgress => "in progress",
            Self::Completed => "completed",
        }
    }

    /// Accepts the persisted spelling, tolerating case and `_`/`-` separators.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "not started" | "" => Some(Self::NotStarted),
            "in progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    /// Free-form; unknown values get the fallback importance weight.
    pub category: String,
    pub estimated_blocks: u32,
    pub completed_blocks: u32,
    pub due_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: TaskStatus,
    pub dependencies: Vec<String>,
}

impl Task {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        estimated_blocks: u32,
        due_date: NaiveDate,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            estimated_blocks,
            completed_blocks: 0,
            due_date,
            start_date,
            end_date: None,
            status: TaskStatus::NotStarted,
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.dependencies = clean_dependencies(deps);
        self
    }

    /// Lowercased name, the identity key.
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }

    pub fn matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    pub fn category_key(&self) -> String {
        self.category.trim().to_lowercase()
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn remaining_blocks(&self) -> u32 {
        self.estimated_blocks.saturating_sub(self.completed_blocks)
    }

    /// Progress derived from the counters alone, ignoring the stored status.
    pub fn progress(&self) -> TaskStatus {
        if self.completed_blocks == 0 {
            TaskStatus::NotStarted
        } else if self.completed_blocks < self.estimated_blocks {
            TaskStatus::InProgress
        } else {
            TaskStatus::Completed
        }
    }

    /// Record one finished block. Returns true if this completed the task.
    pub fn add_block(&mut self, today: NaiveDate) -> bool {
        self.completed_blocks += 1;
        self.status = TaskStatus::InProgress;
        if self.completed_blocks >= self.estimated_blocks {
            self.mark_completed(today);
            return true;
        }
        false
    }

    pub fn mark_completed(&mut self, today: NaiveDate) {
        self.status = TaskStatus::Completed;
        self.end_date = Some(today);
    }
}

/// Trim dependency names and drop blanks.
pub fn clean_dependencies<I, S>(deps: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    deps.into_iter()
        .map(|d| d.as_ref().trim().to_string())
        .filter(|d| !d.is_empty())
        .collect()
}

/// Split a comma-joined dependency list as stored on disk.
pub fn split_dependencies(raw: &str) -> Vec<String> {
    clean_dependencies(raw.split(','))
}
