use anyhow::Result;
use pomoplan_core::WeeklySummary;

use crate::charts;
use crate::state::open_session;

pub fn run(json: bool, chart: bool) -> Result<()> {
    let session = open_session()?;
    let summary = session.planner.weekly_summary(session.today)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render(&summary));
    }
    if chart {
        charts::show(&charts::summary_pages(&summary))?;
    }
    Ok(())
}

fn render(s: &WeeklySummary) -> String {
    let mut out = format!("Weekly summary ({} .. {})\n\n", s.start, s.end);
    out.push_str(&format!("Total blocks : {}\n", s.total));
    out.push_str(&format!("Focus time   : {} minutes\n\n", s.focus_minutes));

    out.push_str("By day\n");
    for (day, n) in &s.per_day {
        out.push_str(&format!("  {} {} {}\n", day, day.format("%a"), n));
    }
    out.push_str("\nBy category\n");
    for (cat, n) in &s.by_category {
        out.push_str(&format!("  {:<11} {}\n", cat.as_str(), n));
    }
    out
}
