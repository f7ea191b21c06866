use anyhow::Result;
use clap::{Parser, Subcommand};

mod charts;
mod config;
mod prompt;
mod schedule_cmd;
mod session_cmd;
mod state;
mod summary_cmd;
mod task_cmd;
mod timer;

use schedule_cmd::ScheduleCommand;
use task_cmd::TaskCommand;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("POMOPLAN_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "pomoplan", version = VERSION, about = "Pomodoro study planner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add, list and delete tasks
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },

    /// Record one finished focus block for a task
    Log { name: String },

    /// Run focus blocks on a task, logging each one
    Focus { name: String },

    /// Run a single work + break timer without logging
    Timer,

    /// Blocks completed today
    Today,

    /// Last seven days of focus blocks
    Summary {
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Show bar charts in the terminal
        #[arg(long, default_value_t = false)]
        chart: bool,
    },

    /// Generate daily or weekly schedules
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommand,
    },

    /// Manage ~/.pomoplan/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a config with default values (keeps an existing one)
    Init,

    /// Print the effective config
    Show,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("POMOPLAN_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Task { command } => task_cmd::run(command)?,
        Command::Log { name } => session_cmd::log(&name)?,
        Command::Focus { name } => session_cmd::focus(&name).await?,
        Command::Timer => session_cmd::timer().await?,
        Command::Today => session_cmd::today()?,
        Command::Summary { json, chart } => summary_cmd::run(json, chart)?,
        Command::Schedule { command } => schedule_cmd::run(command)?,
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_week_with_repeated_days() {
        let cli = Cli::try_parse_from([
            "pomoplan",
            "schedule",
            "week",
            "--decay",
            "0.2",
            "--day",
            "2026-04-01=9-12",
            "--day",
            "2026-04-02=15-20",
        ])
        .unwrap();
        match cli.command {
            Command::Schedule {
                command: ScheduleCommand::Week { decay, days, .. },
            } => {
                assert_eq!(decay, Some(0.2));
                assert_eq!(days.len(), 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn task_add_takes_dependencies() {
        let cli = Cli::try_parse_from([
            "pomoplan", "task", "add", "Report", "-c", "assignment", "-e", "3", "-d",
            "2026-05-01", "--depends-on", "Outline,Sources",
        ])
        .unwrap();
        match cli.command {
            Command::Task {
                command: TaskCommand::Add {
                    depends_on, estimate, ..
                },
            } => {
                assert_eq!(estimate, 3);
                assert_eq!(depends_on.as_deref(), Some("Outline,Sources"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
