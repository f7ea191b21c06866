//! Daily and weekly schedulers.
//!
//! Greedy first-fit: tasks are visited by descending priority and each one
//! takes consecutive slots from a shared cursor, one slot per remaining
//! block. Once the cursor runs out of slots the pass ends.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::availability::TimeWindow;
use crate::priority::{PriorityTable, PriorityTier, PriorityWeights, calculate_priorities, priority_level};
use crate::slots::{Slot, generate_slots};
use crate::store::{TaskLookup, can_schedule};
use crate::task::Task;

/// Number of days covered by the weekly view, starting today.
pub const WEEK_DAYS: i64 = 7;

pub const DEFAULT_DECAY_PER_DAY: f64 = 0.1;

/// One half-hour assignment in a generated schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub task: String,
    pub start: f64,
    pub end: f64,
    pub priority: PriorityTier,
    pub category: String,
}

pub type WeeklySchedule = BTreeMap<NaiveDate, Vec<ScheduleEntry>>;

/// Fill `slots` from the ranked task list.
///
/// `due_cutoff`, when set, drops tasks due before that date.
fn fill_slots<L: TaskLookup + ?Sized>(
    tasks: &[Task],
    lookup: &L,
    scores: &PriorityTable,
    slots: &[Slot],
    due_cutoff: Option<NaiveDate>,
) -> Vec<ScheduleEntry> {
    let mut schedule = Vec::new();
    let mut cursor = 0usize;

    for task in scores.ranked(tasks) {
        if let Some(cutoff) = due_cutoff {
            if task.due_date < cutoff {
                debug!(task = %task.name, due = %task.due_date, "skipping overdue task");
                continue;
            }
        }
        if task.is_completed() {
            continue;
        }
        if !can_schedule(task, lookup) {
            debug!(task = %task.name, deps = ?task.dependencies, "dependencies not complete");
            continue;
        }

        let mut remaining = task.remaining_blocks();
        if remaining == 0 {
            continue;
        }

        let score = scores.get(task);
        let tier = priority_level(score);
        let category = task.category_key();

        while remaining > 0 && cursor < slots.len() {
            let slot = slots[cursor];
            schedule.push(ScheduleEntry {
                task: task.name.clone(),
                start: slot.start,
                end: slot.end,
                priority: tier,
                category: category.clone(),
            });
            cursor += 1;
            remaining -= 1;
        }

        if cursor >= slots.len() {
            break;
        }
    }

    schedule
}

/// Schedule one day over `windows`.
pub fn generate_daily_schedule(
    tasks: &[Task],
    windows: &[TimeWindow],
    today: NaiveDate,
    weights: &PriorityWeights,
) -> Vec<ScheduleEntry> {
    let scores = calculate_priorities(tasks, today, weights);
    let slots = generate_slots(windows);
    let schedule = fill_slots(tasks, tasks, &scores, &slots, None);
    debug!(slots = slots.len(), entries = schedule.len(), "daily schedule");
    schedule
}

/// Project a schedule over `today ..= today + 6`.
///
/// Base scores are computed once; day `i` uses them scaled by
/// `1 - decay_per_day * i` (floored at zero). Tasks due before today are
/// left out. Remaining blocks are not carried between days, so the same
/// work can be offered on several days.
pub fn generate_weekly_schedule(
    tasks: &[Task],
    per_day: &BTreeMap<NaiveDate, Vec<TimeWindow>>,
    today: NaiveDate,
    weights: &PriorityWeights,
    decay_per_day: f64,
) -> WeeklySchedule {
    let base = calculate_priorities(tasks, today, weights);
    let last_day = today + Duration::days(WEEK_DAYS - 1);

    let mut week = WeeklySchedule::new();
    for idx in 0..WEEK_DAYS {
        let day = today + Duration::days(idx);
        if day < today || day > last_day {
            week.insert(day, Vec::new());
            continue;
        }

        let scores = base.decayed(decay_per_day, idx as usize);
        let windows = per_day.get(&day).map(Vec::as_slice).unwrap_or_default();
        let slots = generate_slots(windows);
        let schedule = fill_slots(tasks, tasks, &scores, &slots, Some(today));
        debug!(%day, slots = slots.len(), entries = schedule.len(), "weekly schedule day");
        week.insert(day, schedule);
    }
    week
}
