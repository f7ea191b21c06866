//! pomoplan-core: task model, priority scoring and the greedy block scheduler.

pub mod availability;
pub mod error;
pub mod planner;
pub mod priority;
pub mod scheduler;
pub mod slots;
pub mod store;
pub mod summary;
pub mod task;
pub mod time;

pub use availability::{
    ParsedIntervals, TimeWindow, WorkHours, available_windows, default_work_hours, parse_intervals,
};
pub use error::{PlanError, StorageError, ValidationError};
pub use planner::{Completion, Planner};
pub use priority::{
    PriorityTable, PriorityTier, PriorityWeights, calculate_priorities, priority_level,
};
pub use scheduler::{
    DEFAULT_DECAY_PER_DAY, ScheduleEntry, WeeklySchedule, generate_daily_schedule,
    generate_weekly_schedule,
};
pub use slots::{SLOT_HOURS, Slot, generate_slots};
pub use store::{
    MAX_ESTIMATED_BLOCKS, NewTask, SessionLog, TaskLookup, TaskRepository, TaskStore, can_schedule,
};
pub use summary::{BLOCK_MINUTES, LogEntry, WeeklySummary, daily_count, weekly_summary};
pub use task::{Category, Task, TaskStatus};
pub use time::{format_date, parse_date, today_in};
