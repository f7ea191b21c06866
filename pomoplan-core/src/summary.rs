//! Session log records and the trailing-week summary built from them.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::task::Category;

/// Minutes of focus credited per logged block.
pub const BLOCK_MINUTES: u64 = 25;

/// Length of the summary window, ending today inclusive.
pub const SUMMARY_DAYS: i64 = 7;

/// One append-only record of completed blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub date: NaiveDate,
    pub category: String,
    pub count: u32,
}

impl LogEntry {
    /// A single block, the shape written for every logged completion.
    pub fn block(date: NaiveDate, category: &str) -> Self {
        Self {
            date,
            category: category.trim().to_lowercase(),
            count: 1,
        }
    }
}

/// Totals are `u64` and saturate, so one absurd log row cannot poison the
/// rest of the week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total: u64,
    pub focus_minutes: u64,
    /// Always exactly seven keys, `start..=end`.
    pub per_day: BTreeMap<NaiveDate, u64>,
    /// Always the five fixed categories.
    pub by_category: BTreeMap<Category, u64>,
}

/// Aggregate the entries that fall within `today - 6 ..= today`.
pub fn weekly_summary(entries: &[LogEntry], today: NaiveDate) -> WeeklySummary {
    let start = today - Duration::days(SUMMARY_DAYS - 1);

    let mut per_day: BTreeMap<NaiveDate, u64> = (0..SUMMARY_DAYS)
        .map(|i| (start + Duration::days(i), 0))
        .collect();
    let mut by_category: BTreeMap<Category, u64> =
        Category::ALL.iter().map(|c| (*c, 0)).collect();

    for entry in entries {
        if entry.date < start || entry.date > today {
            continue;
        }
        let count = u64::from(entry.count);
        let day = per_day.entry(entry.date).or_default();
        *day = day.saturating_add(count);
        let cat = by_category.entry(Category::fold(&entry.category)).or_default();
        *cat = cat.saturating_add(count);
    }

    let total = per_day.values().fold(0u64, |acc, n| acc.saturating_add(*n));
    WeeklySummary {
        start,
        end: today,
        total,
        focus_minutes: total.saturating_mul(BLOCK_MINUTES),
        per_day,
        by_category,
    }
}

/// Blocks logged on `today`.
pub fn daily_count(entries: &[LogEntry], today: NaiveDate) -> u64 {
    entries
        .iter()
        .filter(|e| e.date == today)
        .fold(0u64, |acc, e| acc.saturating_add(u64::from(e.count)))
}
