//! Focus timer: a work countdown followed by a break countdown.

use anyhow::Result;
use std::io::{self, Write};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};

use crate::config::TimerSection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOutcome {
    Finished,
    Cancelled,
}

fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Count down `total` seconds on one line. Ctrl-C stops early.
async fn countdown(label: &str, total: u64) -> Result<TimerOutcome> {
    let mut ticker = interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut left = total;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                print!("\r{label} {}  ", format_clock(left));
                io::stdout().flush().ok();
                if left == 0 {
                    println!();
                    return Ok(TimerOutcome::Finished);
                }
                left -= 1;
            }
            res = &mut ctrl_c => {
                res?;
                println!();
                return Ok(TimerOutcome::Cancelled);
            }
        }
    }
}

/// Run one work block and its break.
pub async fn run_block(cfg: &TimerSection) -> Result<TimerOutcome> {
    println!("Focus block started ({} minutes)", cfg.work_minutes);
    if countdown("work ", cfg.work_minutes * 60).await? == TimerOutcome::Cancelled {
        println!("Focus block cancelled");
        return Ok(TimerOutcome::Cancelled);
    }
    println!("Focus block completed");

    println!("Break time ({} minutes)", cfg.break_minutes);
    // The block counts even if the break is skipped.
    countdown("break", cfg.break_minutes * 60).await?;
    println!("Break done");
    Ok(TimerOutcome::Finished)
}
