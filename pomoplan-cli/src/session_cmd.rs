use anyhow::{Result, bail};
use pomoplan_core::{BLOCK_MINUTES, Completion};

use crate::prompt::confirm;
use crate::state::{Session, open_session};
use crate::timer::{TimerOutcome, run_block};

fn report(c: &Completion) {
    if c.finished {
        println!("Task '{}' is now completed!", c.task);
    } else {
        println!(
            "Logged 1 block for '{}' ({}/{} blocks).",
            c.task, c.completed_blocks, c.estimated_blocks
        );
    }
}

pub fn log(name: &str) -> Result<()> {
    let mut session = open_session()?;
    let completion = session.planner.log_completion(name, session.today)?;
    report(&completion);
    Ok(())
}

/// Run timer blocks against one task, logging each finished block.
pub async fn focus(name: &str) -> Result<()> {
    let mut session = open_session()?;
    let Some(task) = session.planner.get_task(name) else {
        bail!("Task '{name}' not found.");
    };
    if task.is_completed() {
        println!("Task '{}' is already completed.", task.name);
        return Ok(());
    }
    let display = task.name.clone();

    loop {
        if run_block(&session.config.timer).await? == TimerOutcome::Cancelled {
            println!("Block not logged.");
            break;
        }
        let completion = session.planner.log_completion(name, session.today)?;
        report(&completion);
        if completion.finished {
            break;
        }
        if !confirm(&format!("Start another block on '{display}'?"))? {
            break;
        }
    }
    print_today(&session)
}

/// Standalone timer, nothing is logged.
pub async fn timer() -> Result<()> {
    let session = open_session()?;
    run_block(&session.config.timer).await?;
    Ok(())
}

pub fn today() -> Result<()> {
    let session = open_session()?;
    print_today(&session)
}

fn print_today(session: &Session) -> Result<()> {
    let count = session.planner.today_count(session.today)?;
    println!(
        "Blocks completed today ({}): {count} ({} focus minutes)",
        session.today,
        count.saturating_mul(BLOCK_MINUTES)
    );
    Ok(())
}
