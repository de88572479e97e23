mod api;
mod config;
mod dates;
mod run;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::api::JiraClient;
use crate::config::Config;
use crate::dates::RunMode;

/// Log your work in JIRA from a per-ticket weekly schedule.
///
/// By default time is logged in all of your tickets ONLY FOR TODAY, and
/// nothing is submitted unless --confirm is passed. Use the week flags to
/// execute the full weekly schedule for this or last week.
#[derive(Parser)]
#[command(name = "jiralog", version)]
struct Cli {
    /// Log work in your tickets only for today (default)
    #[arg(long, group = "period")]
    today: bool,

    /// Execute the full weekly schedule for THIS week
    #[arg(long, group = "period")]
    this_week: bool,

    /// Execute the full weekly schedule for LAST week
    #[arg(long, group = "period")]
    last_week: bool,

    /// Actually create worklogs instead of the default dry run
    #[arg(long)]
    confirm: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Path to the config file (defaults to the platform config directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Cli {
    fn run_mode(&self) -> RunMode {
        if self.this_week {
            RunMode::ThisWeek
        } else if self.last_week {
            RunMode::LastWeek
        } else {
            RunMode::Today
        }
    }
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if cli.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    if let Err(err) = try_main(&cli) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn try_main(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let client = JiraClient::new(&config)?;

    run::execute(
        &client,
        &config,
        cli.run_mode(),
        cli.confirm,
        chrono::Local::now().date_naive(),
    )
}
