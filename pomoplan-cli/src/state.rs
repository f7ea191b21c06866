use anyhow::{Context, Result};
use chrono::NaiveDate;
use pomoplan_core::Planner;
use pomoplan_store::{CsvSessionLog, CsvTaskFile};
use std::fs;
use std::path::PathBuf;

use crate::config::{Config, load_config};

pub type CsvPlanner = Planner<CsvTaskFile, CsvSessionLog>;

/// `$POMOPLAN_HOME`, or `~/.pomoplan`.
pub fn pomoplan_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("POMOPLAN_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".pomoplan"))
}

pub fn ensure_home() -> Result<PathBuf> {
    let dir = pomoplan_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn tasks_path() -> Result<PathBuf> {
    Ok(ensure_home()?.join("tasks.csv"))
}

pub fn sessions_path() -> Result<PathBuf> {
    Ok(ensure_home()?.join("sessions.csv"))
}

/// Everything a command needs: config, the resolved date and the planner.
pub struct Session {
    pub config: Config,
    pub today: NaiveDate,
    pub planner: CsvPlanner,
}

pub fn open_session() -> Result<Session> {
    let config = load_config()?;
    let today = config.today()?;
    let planner = Planner::open(
        CsvTaskFile::new(tasks_path()?),
        CsvSessionLog::new(sessions_path()?),
    )
    .context("load tasks")?
    .with_weights(config.priority);
    Ok(Session {
        config,
        today,
        planner,
    })
}
