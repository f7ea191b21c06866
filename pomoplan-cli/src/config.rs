use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use pomoplan_core::{PriorityWeights, TimeWindow, today_in};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralSection,
    pub schedule: ScheduleSection,
    pub priority: PriorityWeights,
    pub timer: TimerSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSection {
    /// IANA timezone used to decide "today". Unset means the local zone.
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSection {
    pub work_start: f64,
    pub work_end: f64,
    pub decay_per_day: f64,
}

impl Default for ScheduleSection {
    fn default() -> Self {
        Self {
            work_start: pomoplan_core::availability::DEFAULT_WORK_START,
            work_end: pomoplan_core::availability::DEFAULT_WORK_END,
            decay_per_day: pomoplan_core::DEFAULT_DECAY_PER_DAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerSection {
    pub work_minutes: u64,
    pub break_minutes: u64,
}

impl Default for TimerSection {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            break_minutes: 5,
        }
    }
}

impl Config {
    pub fn today(&self) -> Result<NaiveDate> {
        today_in(self.general.timezone.as_deref()).map_err(|e| anyhow!(e))
    }

    pub fn work_hours(&self) -> Result<TimeWindow> {
        TimeWindow::try_new(self.schedule.work_start, self.schedule.work_end)
            .context("schedule.work_start/work_end in config.toml")
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    Ok(toml::from_str(s)?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let cfg = load_config()?;
    println!("# {}", config_path()?.display());
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}
