//! Availability windows: free time in a day, in fractional hours.
//!
//! Free windows are derived by subtracting "unavailable" intervals from the
//! fixed work-hours span. The result is sorted and disjoint.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::error::ValidationError;

pub const DEFAULT_WORK_START: f64 = 9.0;
pub const DEFAULT_WORK_END: f64 = 22.0;
/// Hours in a day; no window may end after this.
pub const DAY_HOURS: f64 = 24.0;

/// Half-open interval `[start, end)` in hours of the day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Checked constructor: `0 <= start < end <= 24`.
    pub fn try_new(start: f64, end: f64) -> Result<Self, ValidationError> {
        if !start.is_finite() || !end.is_finite() || start < 0.0 || start >= end || end > DAY_HOURS {
            return Err(ValidationError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn hours(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    pub fn contains(&self, other: &TimeWindow) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// The global bound every window is clipped to.
pub type WorkHours = TimeWindow;

pub fn default_work_hours() -> WorkHours {
    TimeWindow::new(DEFAULT_WORK_START, DEFAULT_WORK_END)
}

/// Subtract `unavailable` from `work`. Input order and overlap don't matter.
pub fn available_windows(work: WorkHours, unavailable: &[TimeWindow]) -> Vec<TimeWindow> {
    let mut blocked: Vec<TimeWindow> = unavailable
        .iter()
        .map(|w| TimeWindow::new(w.start.max(work.start), w.end.min(work.end)))
        .filter(|w| w.start < w.end)
        .collect();
    blocked.sort_by(|a, b| a.start.total_cmp(&b.start).then(a.end.total_cmp(&b.end)));

    let mut free = Vec::new();
    let mut cursor = work.start;
    for b in blocked {
        if cursor < b.start {
            free.push(TimeWindow::new(cursor, b.start));
        }
        cursor = cursor.max(b.end);
    }
    if cursor < work.end {
        free.push(TimeWindow::new(cursor, work.end));
    }
    free
}

/// Result of parsing user-typed ranges like `"9-12, 15-20"`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedIntervals {
    pub windows: Vec<TimeWindow>,
    /// Parts that were not understood, verbatim.
    pub rejected: Vec<String>,
}

fn range_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d+(?:\.\d+)?)\s*-\s*(\d+(?:\.\d+)?)$").expect("valid range regex")
    })
}

/// Parse comma separated `a-b` hour ranges. Bad parts are collected, not fatal.
pub fn parse_intervals(input: &str) -> ParsedIntervals {
    let mut out = ParsedIntervals::default();
    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let parsed = range_re().captures(part).and_then(|caps| {
            let start: f64 = caps[1].parse().ok()?;
            let end: f64 = caps[2].parse().ok()?;
            Some(TimeWindow::new(start, end))
        });
        match parsed {
            Some(w) => out.windows.push(w),
            None => out.rejected.push(part.to_string()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(s: f64, e: f64) -> TimeWindow {
        TimeWindow::new(s, e)
    }

    #[test]
    fn nothing_unavailable_means_whole_day() {
        assert_eq!(available_windows(default_work_hours(), &[]), vec![w(9.0, 22.0)]);
    }

    #[test]
    fn subtracts_sorts_and_merges() {
        let free = available_windows(
            default_work_hours(),
            &[w(15.0, 20.0), w(9.0, 12.0), w(11.0, 13.0)],
        );
        assert_eq!(free, vec![w(13.0, 15.0), w(20.0, 22.0)]);
    }

    #[test]
    fn clips_to_work_hours() {
        let free = available_windows(default_work_hours(), &[w(6.0, 10.0), w(21.0, 23.0)]);
        assert_eq!(free, vec![w(10.0, 21.0)]);

        let free = available_windows(default_work_hours(), &[w(1.0, 5.0)]);
        assert_eq!(free, vec![w(9.0, 22.0)]);

        let free = available_windows(default_work_hours(), &[w(0.0, 24.0)]);
        assert!(free.is_empty());
    }

    #[test]
    fn output_is_sorted_and_disjoint() {
        let free = available_windows(
            default_work_hours(),
            &[w(18.0, 19.0), w(10.0, 10.5), w(13.0, 14.0), w(13.5, 15.0)],
        );
        for pair in free.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
        assert_eq!(free.first(), Some(&w(9.0, 10.0)));
        assert_eq!(free.last(), Some(&w(19.0, 22.0)));
    }

    #[test]
    fn parses_ranges_and_keeps_bad_parts() {
        let parsed = parse_intervals("9-12, 15 - 20.5, lunch, 7,");
        assert_eq!(parsed.windows, vec![w(9.0, 12.0), w(15.0, 20.5)]);
        assert_eq!(parsed.rejected, vec!["lunch", "7"]);

        assert_eq!(parse_intervals("  "), ParsedIntervals::default());
    }

    #[test]
    fn checked_constructor() {
        assert!(TimeWindow::try_new(9.0, 10.0).is_ok());
        assert!(TimeWindow::try_new(10.0, 10.0).is_err());
        assert!(TimeWindow::try_new(f64::NAN, 10.0).is_err());
        assert!(TimeWindow::try_new(0.0, 24.0).is_ok());
        assert!(TimeWindow::try_new(9.0, 24.5).is_err());
        assert!(TimeWindow::try_new(9.0, 1e9).is_err());
        assert!(w(9.0, 12.0).contains(&w(9.5, 10.0)));
    }
}
