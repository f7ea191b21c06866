//! Priority scoring: urgency + importance + effort, weighted.
//!
//! Scores are never stored on a [`Task`]. Each scheduling call builds a fresh
//! [`PriorityTable`] keyed by task identity, so a decayed weekly view cannot
//! leak into the next call.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::task::Task;
use crate::time::days_until;

/// Importance for categories outside the table (including "study").
pub const FALLBACK_IMPORTANCE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityWeights {
    pub urgency: f64,
    pub importance: f64,
    pub effort: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            urgency: 0.4,
            importance: 0.4,
            effort: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityTier {
    High,
    Medium,
    Low,
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        };
        f.write_str(s)
    }
}

/// Tier for a score: >= 7 High, >= 4 Medium, otherwise Low.
pub fn priority_level(score: f64) -> PriorityTier {
    if score >= 7.0 {
        PriorityTier::High
    } else if score >= 4.0 {
        PriorityTier::Medium
    } else {
        PriorityTier::Low
    }
}

/// `max(0, 10 - days_until_due)`. Overdue tasks score above 10.
pub fn urgency_score(due: NaiveDate, today: NaiveDate) -> f64 {
    (10 - days_until(due, today)).max(0) as f64
}

pub fn importance_score(category: &str) -> f64 {
    match category.trim().to_lowercase().as_str() {
        "exam" => 10.0,
        "assignment" => 8.0,
        "reading" => 4.0,
        "other" => 2.0,
        _ => FALLBACK_IMPORTANCE,
    }
}

pub fn effort_score(task: &Task) -> f64 {
    task.estimated_blocks as f64
}

pub fn priority_score(task: &Task, today: NaiveDate, weights: &PriorityWeights) -> f64 {
    weights.urgency * urgency_score(task.due_date, today)
        + weights.importance * importance_score(&task.category)
        + weights.effort * effort_score(task)
}

/// Transient mapping from task identity to score.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriorityTable {
    scores: HashMap<String, f64>,
}

impl PriorityTable {
    pub fn get(&self, task: &Task) -> f64 {
        self.scores.get(&task.key()).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Every score multiplied by `max(0, 1 - decay_per_day * day_index)`,
    /// floored at zero.
    pub fn decayed(&self, decay_per_day: f64, day_index: usize) -> PriorityTable {
        let factor = 1.0 - decay_per_day * day_index as f64;
        let scores = self
            .scores
            .iter()
            .map(|(k, s)| (k.clone(), (s * factor).max(0.0)))
            .collect();
        PriorityTable { scores }
    }

    /// Tasks by score, highest first. Ties keep collection order.
    pub fn ranked<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        let mut ordered: Vec<&Task> = tasks.iter().collect();
        ordered.sort_by(|a, b| self.get(b).total_cmp(&self.get(a)));
        ordered
    }
}

/// Score every task for `today`.
pub fn calculate_priorities(
    tasks: &[Task],
    today: NaiveDate,
    weights: &PriorityWeights,
) -> PriorityTable {
    let scores = tasks
        .iter()
        .map(|t| (t.key(), priority_score(t, today, weights)))
        .collect();
    PriorityTable { scores }
}
