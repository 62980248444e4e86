//! Process configuration resolved from flags and environment.

use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;
use uuid::Uuid;

/// Global options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct PlannerConfig {
    /// SQLite database file.
    #[arg(long = "db", env = "PLANNER_DB", default_value = "planner.sqlite3", global = true)]
    pub db_path: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, env = "PLANNER_LOG_DIR", global = true)]
    pub log_dir: Option<String>,

    #[arg(
        long,
        env = "PLANNER_LOG_LEVEL",
        default_value = planner_core::default_log_level(),
        global = true
    )]
    pub log_level: String,

    /// Signed-in user id, as printed by `signup` or `login`.
    #[arg(long, env = "PLANNER_USER", global = true)]
    pub user: Option<Uuid>,

    /// Overrides the current date (YYYY-MM-DD).
    #[arg(long, global = true)]
    pub today: Option<NaiveDate>,
}

impl PlannerConfig {
    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}
