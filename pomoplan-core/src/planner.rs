//! Planner: the task store wired to its persistence collaborators.
//!
//! Every mutating call either completes (memory and storage agree) or
//! returns an error with the in-memory collection unchanged.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::availability::TimeWindow;
use crate::error::PlanError;
use crate::priority::{PriorityTable, PriorityWeights, calculate_priorities};
use crate::scheduler::{ScheduleEntry, WeeklySchedule, generate_daily_schedule, generate_weekly_schedule};
use crate::store::{NewTask, SessionLog, TaskRepository, TaskStore};
use crate::summary::{LogEntry, WeeklySummary, daily_count, weekly_summary};
use crate::task::Task;

/// Result of logging one block against a task.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub task: String,
    pub completed_blocks: u32,
    pub estimated_blocks: u32,
    /// True when this block finished the task.
    pub finished: bool,
    pub entry: LogEntry,
}

pub struct Planner<R: TaskRepository, L: SessionLog> {
    store: TaskStore,
    repo: R,
    log: L,
    weights: PriorityWeights,
}

impl<R: TaskRepository, L: SessionLog> Planner<R, L> {
    /// Load the task collection from `repo`.
    pub fn open(repo: R, log: L) -> Result<Self, PlanError> {
        let tasks = repo.load()?;
        debug!(tasks = tasks.len(), "loaded tasks");
        Ok(Self {
            store: TaskStore::from_tasks(tasks),
            repo,
            log,
            weights: PriorityWeights::default(),
        })
    }

    pub fn with_weights(mut self, weights: PriorityWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn weights(&self) -> &PriorityWeights {
        &self.weights
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn get_task(&self, name: &str) -> Option<&Task> {
        self.store.get(name)
    }

    pub fn add_task(&mut self, new: NewTask, today: NaiveDate) -> Result<&Task, PlanError> {
        self.store.add(new, today)?;
        if let Err(e) = self.repo.save(self.store.tasks()) {
            self.store.pop();
            return Err(e.into());
        }
        let task = &self.store.tasks()[self.store.len() - 1];
        info!(task = %task.name, due = %task.due_date, "task added");
        Ok(task)
    }

    pub fn delete_task(&mut self, name: &str) -> Result<Task, PlanError> {
        let index = self
            .store
            .index_of(name)
            .ok_or_else(|| PlanError::not_found(name))?;
        let removed = self.store.remove(name)?;
        if let Err(e) = self.repo.save(self.store.tasks()) {
            self.store.restore(index, removed);
            return Err(e.into());
        }
        info!(task = %removed.name, "task deleted");
        Ok(removed)
    }

    /// Record one completed block: bump the counter, save, append to the log.
    ///
    /// An unknown name fails before anything is written. A failed append
    /// restores the task and saves it again.
    pub fn log_completion(&mut self, name: &str, today: NaiveDate) -> Result<Completion, PlanError> {
        let before = self
            .store
            .get(name)
            .cloned()
            .ok_or_else(|| PlanError::not_found(name))?;

        let task = self.store.get_mut(name)?;
        let finished = task.add_block(today) && !before.is_completed();
        let completion = Completion {
            task: task.name.clone(),
            completed_blocks: task.completed_blocks,
            estimated_blocks: task.estimated_blocks,
            finished,
            entry: LogEntry::block(today, &task.category),
        };

        if let Err(e) = self.repo.save(self.store.tasks()) {
            *self.store.get_mut(name)? = before;
            return Err(e.into());
        }
        if let Err(e) = self.log.append(&completion.entry) {
            // Keep the task file in step with the log.
            *self.store.get_mut(name)? = before;
            if let Err(resave) = self.repo.save(self.store.tasks()) {
                warn!(task = %completion.task, error = %resave, "could not restore task file");
            }
            return Err(e.into());
        }
        info!(
            task = %completion.task,
            done = completion.completed_blocks,
            of = completion.estimated_blocks,
            "block logged"
        );
        Ok(completion)
    }

    pub fn priorities(&self, today: NaiveDate) -> PriorityTable {
        calculate_priorities(self.store.tasks(), today, &self.weights)
    }

    pub fn daily_schedule(&self, windows: &[TimeWindow], today: NaiveDate) -> Vec<ScheduleEntry> {
        generate_daily_schedule(self.store.tasks(), windows, today, &self.weights)
    }

    pub fn weekly_schedule(
        &self,
        per_day: &BTreeMap<NaiveDate, Vec<TimeWindow>>,
        today: NaiveDate,
        decay_per_day: f64,
    ) -> WeeklySchedule {
        generate_weekly_schedule(self.store.tasks(), per_day, today, &self.weights, decay_per_day)
    }

    pub fn weekly_summary(&self, today: NaiveDate) -> Result<WeeklySummary, PlanError> {
        let entries = self.log.read_all()?;
        Ok(weekly_summary(&entries, today))
    }

    pub fn today_count(&self, today: NaiveDate) -> Result<u64, PlanError> {
        let entries = self.log.read_all()?;
        Ok(daily_count(&entries, today))
    }
}
