use anyhow::{Context, Result, bail};
use chrono::{Duration, NaiveDate};
use clap::Subcommand;
use pomoplan_core::{ScheduleEntry, TimeWindow, available_windows, parse_date, parse_intervals};
use std::collections::BTreeMap;
use tracing::warn;

use crate::charts;
use crate::prompt::prompt;
use crate::state::open_session;

#[derive(Subcommand, Debug)]
pub enum ScheduleCommand {
    /// Plan today's half-hour slots
    Day {
        /// Hours you are busy, e.g. "9-12,15-20"
        #[arg(long, short)]
        unavailable: Option<String>,

        #[arg(long, default_value_t = false)]
        json: bool,

        #[arg(long, default_value_t = false)]
        chart: bool,
    },

    /// Project a schedule over the next seven days
    Week {
        /// Daily priority decay (defaults to schedule.decay_per_day)
        #[arg(long)]
        decay: Option<f64>,

        /// Busy hours for one day: YYYY-MM-DD=9-12,15-20 (repeatable)
        #[arg(long = "day", value_name = "DATE=RANGES")]
        days: Vec<String>,

        /// Ask for busy hours day by day
        #[arg(long, short, default_value_t = false)]
        interactive: bool,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

pub fn run(cmd: ScheduleCommand) -> Result<()> {
    match cmd {
        ScheduleCommand::Day {
            unavailable,
            json,
            chart,
        } => day(unavailable.as_deref(), json, chart),
        ScheduleCommand::Week {
            decay,
            days,
            interactive,
            json,
        } => week(decay, &days, interactive, json),
    }
}

/// `9.5` -> `09:30`.
pub fn format_hour(h: f64) -> String {
    let minutes = (h * 60.0).round() as i64;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Busy ranges to free windows. Unparseable parts are reported and skipped.
fn free_windows(work: TimeWindow, busy: &str) -> Vec<TimeWindow> {
    let parsed = parse_intervals(busy);
    for bad in &parsed.rejected {
        warn!(range = %bad, "ignoring range");
        eprintln!("Ignoring invalid range '{bad}' (use e.g. 9-12).");
    }
    available_windows(work, &parsed.windows)
}

/// Split `YYYY-MM-DD=ranges`.
fn parse_day_arg(arg: &str) -> Result<(NaiveDate, String)> {
    let Some((date, ranges)) = arg.split_once('=') else {
        bail!("expected DATE=RANGES, got '{arg}'");
    };
    let date = parse_date(date).with_context(|| format!("--day {arg}"))?;
    Ok((date, ranges.trim().to_string()))
}

fn render_entries(entries: &[ScheduleEntry]) -> String {
    let mut out = String::new();
    for e in entries {
        out.push_str(&format!(
            "  {}-{}  {}  [{}]  ({})\n",
            format_hour(e.start),
            format_hour(e.end),
            e.task,
            e.priority,
            e.category
        ));
    }
    out
}

fn day(unavailable: Option<&str>, json: bool, chart: bool) -> Result<()> {
    let session = open_session()?;
    let work = session.config.work_hours()?;
    let windows = free_windows(work, unavailable.unwrap_or(""));
    let schedule = session.planner.daily_schedule(&windows, session.today);

    if json {
        println!("{}", serde_json::to_string_pretty(&schedule)?);
    } else if schedule.is_empty() {
        println!("No tasks could be scheduled for {}.", session.today);
    } else {
        println!("Schedule for {}\n", session.today);
        print!("{}", render_entries(&schedule));
    }
    if chart {
        charts::show(&charts::schedule_pages(&schedule))?;
    }
    Ok(())
}

fn week(decay: Option<f64>, day_args: &[String], interactive: bool, json: bool) -> Result<()> {
    let session = open_session()?;
    let work = session.config.work_hours()?;
    let decay = decay.unwrap_or(session.config.schedule.decay_per_day);
    if decay.is_nan() || decay < 0.0 {
        bail!("decay must be >= 0, got {decay}");
    }

    let today = session.today;
    let last = today + Duration::days(6);

    let mut busy: BTreeMap<NaiveDate, String> = BTreeMap::new();
    for arg in day_args {
        let (date, ranges) = parse_day_arg(arg)?;
        if date < today || date > last {
            warn!(%date, "outside the coming week, ignored");
            continue;
        }
        busy.insert(date, ranges);
    }

    let mut per_day = BTreeMap::new();
    for i in 0..7 {
        let date = today + Duration::days(i);
        let ranges = match busy.remove(&date) {
            Some(r) => r,
            None if interactive => prompt(&format!(
                "Busy hours on {} {} (e.g. 9-12,15-20, blank for none)",
                date.format("%A"),
                date
            ))?,
            None => String::new(),
        };
        per_day.insert(date, free_windows(work, &ranges));
    }

    let week = session.planner.weekly_schedule(&per_day, today, decay);

    if json {
        println!("{}", serde_json::to_string_pretty(&week)?);
        return Ok(());
    }
    for (date, entries) in &week {
        println!("{} {}", date.format("%A"), date);
        if entries.is_empty() {
            println!("  (nothing scheduled)");
        } else {
            print!("{}", render_entries(entries));
        }
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomoplan_core::PriorityTier;

    #[test]
    fn hours_format_as_clock() {
        assert_eq!(format_hour(9.0), "09:00");
        assert_eq!(format_hour(9.5), "09:30");
        assert_eq!(format_hour(21.75), "21:45");
    }

    #[test]
    fn day_arg_splits_on_first_equals() {
        let (d, r) = parse_day_arg("2026-04-01= 9-12,15-20").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());
        assert_eq!(r, "9-12,15-20");
        assert!(parse_day_arg("2026-04-01").is_err());
        assert!(parse_day_arg("April=9-12").is_err());
    }

    #[test]
    fn busy_ranges_cut_the_work_day() {
        let free = free_windows(TimeWindow::new(9.0, 22.0), "9-12, nonsense, 15-20");
        assert_eq!(
            free,
            vec![TimeWindow::new(12.0, 15.0), TimeWindow::new(20.0, 22.0)]
        );
    }

    #[test]
    fn entries_render_one_per_line() {
        let e = ScheduleEntry {
            task: "Essay".into(),
            start: 12.0,
            end: 12.5,
            priority: PriorityTier::Medium,
            category: "assignment".into(),
        };
        assert_eq!(
            render_entries(&[e]),
            "  12:00-12:30  Essay  [Medium]  (assignment)\n"
        );
    }
}
