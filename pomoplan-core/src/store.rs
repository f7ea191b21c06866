//! Task store: the in-memory task collection and the persistence seams.
//!
//! Dependencies are resolved by name through [`TaskLookup`]. A name that no
//! longer resolves (the task was deleted) counts as incomplete, so the
//! dependent task stays blocked until the reference is removed.

use chrono::NaiveDate;

use crate::error::{PlanError, StorageError, ValidationError};
use crate::summary::LogEntry;
use crate::task::{Task, clean_dependencies};

/// Largest estimate a task can carry.
pub const MAX_ESTIMATED_BLOCKS: u32 = u32::MAX;

/// Lookup-by-name capability used for dependency checks.
pub trait TaskLookup {
    fn find_task(&self, name: &str) -> Option<&Task>;
}

impl TaskLookup for [Task] {
    fn find_task(&self, name: &str) -> Option<&Task> {
        self.iter().find(|t| t.matches(name))
    }
}

impl TaskLookup for Vec<Task> {
    fn find_task(&self, name: &str) -> Option<&Task> {
        self.as_slice().find_task(name)
    }
}

/// True when every dependency exists and is completed.
pub fn can_schedule<L: TaskLookup + ?Sized>(task: &Task, lookup: &L) -> bool {
    task.dependencies
        .iter()
        .all(|dep| lookup.find_task(dep).is_some_and(Task::is_completed))
}

/// Load/save collaborator for the task collection.
pub trait TaskRepository {
    fn load(&self) -> Result<Vec<Task>, StorageError>;
    fn save(&mut self, tasks: &[Task]) -> Result<(), StorageError>;
}

/// Append-only collaborator for completed-block records.
pub trait SessionLog {
    fn append(&mut self, entry: &LogEntry) -> Result<(), StorageError>;
    fn read_all(&self) -> Result<Vec<LogEntry>, StorageError>;
}

/// Input for [`TaskStore::add`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub name: String,
    pub category: String,
    pub estimated_blocks: i64,
    pub due_date: NaiveDate,
    pub dependencies: Vec<String>,
}

impl NewTask {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        estimated_blocks: i64,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            estimated_blocks,
            due_date,
            dependencies: Vec::new(),
        }
    }

    pub fn depends_on<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.dependencies = clean_dependencies(deps);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.find_task(name)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.matches(name))
    }

    /// Check a new task against the collection without inserting it.
    pub fn validate(&self, new: &NewTask, today: NaiveDate) -> Result<(), ValidationError> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if new.due_date < today {
            return Err(ValidationError::DueDateInPast {
                due: new.due_date,
                today,
            });
        }
        if self.get(name).is_some() {
            return Err(ValidationError::DuplicateName {
                name: name.to_string(),
            });
        }
        if new.estimated_blocks < 1 {
            return Err(ValidationError::NonPositiveEstimate {
                given: new.estimated_blocks,
            });
        }
        if new.estimated_blocks > i64::from(MAX_ESTIMATED_BLOCKS) {
            return Err(ValidationError::EstimateTooLarge {
                given: new.estimated_blocks,
                max: MAX_ESTIMATED_BLOCKS,
            });
        }
        Ok(())
    }

    pub fn add(&mut self, new: NewTask, today: NaiveDate) -> Result<&Task, ValidationError> {
        self.validate(&new, today)?;
        let estimated = u32::try_from(new.estimated_blocks).map_err(|_| {
            ValidationError::EstimateTooLarge {
                given: new.estimated_blocks,
                max: MAX_ESTIMATED_BLOCKS,
            }
        })?;
        let task = Task::new(new.name.trim(), new.category.trim(), estimated, new.due_date, today)
            .with_dependencies(&new.dependencies);
        self.tasks.push(task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Remove a task. Dependents keep naming it.
    pub fn remove(&mut self, name: &str) -> Result<Task, PlanError> {
        let idx = self.position(name).ok_or_else(|| PlanError::not_found(name))?;
        Ok(self.tasks.remove(idx))
    }

    /// Put a task back at `index`, used to undo a removal.
    pub(crate) fn restore(&mut self, index: usize, task: Task) {
        let index = index.min(self.tasks.len());
        self.tasks.insert(index, task);
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.position(name)
    }

    pub(crate) fn pop(&mut self) -> Option<Task> {
        self.tasks.pop()
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Task, PlanError> {
        let idx = self.position(name).ok_or_else(|| PlanError::not_found(name))?;
        Ok(&mut self.tasks[idx])
    }
}

impl TaskLookup for TaskStore {
    fn find_task(&self, name: &str) -> Option<&Task> {
        self.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    #[test]
    fn added_task_is_found_case_insensitively() {
        let mut store = TaskStore::new();
        store
            .add(NewTask::new("Math Revision", "exam", 3, today() + Duration::days(3)), today())
            .unwrap();
        let t = store.get("math REVISION").unwrap();
        assert_eq!(t.name, "Math Revision");
        assert_eq!(t.start_date, today());
        assert_eq!(t.completed_blocks, 0);
    }

    #[test]
    fn due_today_is_accepted_yesterday_is_not() {
        let mut store = TaskStore::new();
        assert!(store.add(NewTask::new("Now", "study", 1, today()), today()).is_ok());

        let err = store
            .add(NewTask::new("Late", "study", 1, today() - Duration::days(1)), today())
            .unwrap_err();
        assert!(matches!(err, ValidationError::DueDateInPast { .. }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn rejects_duplicates_and_bad_estimates() {
        let mut store = TaskStore::new();
        let due = today() + Duration::days(2);
        store.add(NewTask::new("Essay", "assignment", 2, due), today()).unwrap();

        let dup = store.add(NewTask::new("ESSAY", "assignment", 2, due), today());
        assert_eq!(
            dup.unwrap_err(),
            ValidationError::DuplicateName { name: "ESSAY".into() }
        );

        let zero = store.add(NewTask::new("Zero", "other", 0, due), today());
        assert_eq!(
            zero.unwrap_err(),
            ValidationError::NonPositiveEstimate { given: 0 }
        );

        let blank = store.add(NewTask::new("  ", "other", 1, due), today());
        assert_eq!(blank.unwrap_err(), ValidationError::EmptyName);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn oversized_estimate_names_the_upper_bound() {
        let mut store = TaskStore::new();
        let due = today() + Duration::days(2);
        let err = store
            .add(NewTask::new("Huge", "study", 5_000_000_000, due), today())
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::EstimateTooLarge {
                given: 5_000_000_000,
                max: u32::MAX,
            }
        );
        assert_eq!(
            err.to_string(),
            "Estimated blocks must be at most 4294967295 (got 5000000000)."
        );
        assert!(store.is_empty());

        let max = i64::from(MAX_ESTIMATED_BLOCKS);
        assert!(store.add(NewTask::new("Max", "study", max, due), today()).is_ok());
    }

    #[test]
    fn remove_unknown_is_not_found() {
        let mut store = TaskStore::new();
        assert!(matches!(store.remove("ghost"), Err(PlanError::NotFound { .. })));
    }

    #[test]
    fn dependency_checks_by_name() {
        let due = today() + Duration::days(5);
        let mut d = Task::new("D", "study", 1, due, today());
        let c = Task::new("C", "study", 1, due, today()).with_dependencies(["d"]);
        let orphan = Task::new("E", "study", 1, due, today()).with_dependencies(["gone"]);

        let tasks = vec![d.clone(), c.clone()];
        assert!(!can_schedule(&c, tasks.as_slice()));
        assert!(!can_schedule(&orphan, tasks.as_slice()));

        d.add_block(today());
        let tasks = vec![d, c.clone()];
        assert!(can_schedule(&c, tasks.as_slice()));
    }

    #[test]
    fn deleting_a_dependency_leaves_dependent_blocked() {
        let mut store = TaskStore::new();
        let due = today() + Duration::days(5);
        store.add(NewTask::new("D", "study", 1, due), today()).unwrap();
        store
            .add(NewTask::new("C", "study", 1, due).depends_on(["D"]), today())
            .unwrap();
        store.get_mut("D").unwrap().add_block(today());
        assert!(can_schedule(store.get("C").unwrap(), &store));

        store.remove("D").unwrap();
        let c = store.get("C").unwrap();
        assert_eq!(c.dependencies, vec!["D"]);
        assert!(!can_schedule(c, &store));
    }
}
