//! `planner` command-line entry point.
//!
//! # Responsibility
//! - Parse flags and environment into a [`PlannerConfig`].
//! - Dispatch one subcommand and print its result as JSON.
//!
//! # Invariants
//! - Success prints JSON on stdout; failure prints `{"error": ...}` on stderr
//!   and exits non-zero.

mod commands;
mod config;
mod identity;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use config::PlannerConfig;
use log::error;
use std::process::ExitCode;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "planner")]
#[command(about = "Mission, weekly big rocks, renewal and circle-of-control planner")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    config: PlannerConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create or migrate the database.
    Init,
    /// Register a new account.
    Signup {
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Sign in and print the user id.
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Show the profile, optionally renaming it first.
    Profile {
        #[arg(long)]
        name: Option<String>,
    },
    #[command(subcommand)]
    Roles(RolesCommand),
    #[command(subcommand)]
    Mission(MissionCommand),
    #[command(subcommand)]
    Week(WeekCommand),
    #[command(subcommand)]
    Rock(RockCommand),
    #[command(subcommand)]
    Task(TaskCommand),
    #[command(subcommand)]
    Renewal(RenewalCommand),
    #[command(subcommand)]
    Circle(CircleCommand),
    /// Mission, roles, this week's rocks and today's renewal scores.
    Dashboard,
}

#[derive(Subcommand, Debug)]
enum RolesCommand {
    List,
    Add {
        name: String,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Add roles from the suggestion catalog (e.g. `parent friend`).
    Adopt { ids: Vec<String> },
    Rename { id: Uuid, name: String },
    /// Rewrite the order to match the given ids.
    Reorder { ids: Vec<Uuid> },
    Remove { id: Uuid },
}

#[derive(Subcommand, Debug)]
enum MissionCommand {
    Show,
    /// List the core value and suggested role catalogs.
    Catalog,
    /// Compose a statement without saving it.
    Draft(MissionArgs),
    Save(MissionArgs),
}

#[derive(clap::Args, Debug)]
struct MissionArgs {
    /// Core value id; repeatable.
    #[arg(long = "value")]
    values: Vec<String>,
    /// `role=goal`; repeatable.
    #[arg(long = "goal")]
    goals: Vec<String>,
    #[arg(long)]
    legacy: Option<String>,
    /// Use this text instead of the composed statement.
    #[arg(long)]
    statement: Option<String>,
}

#[derive(Subcommand, Debug)]
enum WeekCommand {
    /// Board for the current week.
    Show,
    Review {
        #[arg(long)]
        reflection: Option<String>,
        #[arg(long, default_value_t = false)]
        complete: bool,
    },
}

#[derive(Subcommand, Debug)]
enum RockCommand {
    Add {
        title: String,
        #[arg(long)]
        role: Option<Uuid>,
        /// Day offset from Sunday, 0..=6.
        #[arg(long)]
        day: Option<u8>,
    },
    Done { id: Uuid },
    Undo { id: Uuid },
    /// Move to a day, or back to unscheduled when `--day` is omitted.
    Schedule {
        id: Uuid,
        #[arg(long)]
        day: Option<u8>,
    },
}

#[derive(Subcommand, Debug)]
enum TaskCommand {
    /// Tasks of the current week.
    List {
        #[arg(long, value_parser = commands::parse_quadrant)]
        quadrant: Option<planner_core::Quadrant>,
        /// Hide completed tasks.
        #[arg(long, default_value_t = false)]
        open: bool,
    },
    /// Add an item; q2 items become big rocks.
    Add {
        title: String,
        #[arg(long, value_parser = commands::parse_quadrant, conflicts_with_all = ["urgent", "important"])]
        quadrant: Option<planner_core::Quadrant>,
        #[arg(long, default_value_t = false)]
        urgent: bool,
        #[arg(long, default_value_t = false)]
        important: bool,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    Done { id: Uuid },
    Undo { id: Uuid },
    Schedule {
        id: Uuid,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Subcommand, Debug)]
enum RenewalCommand {
    /// Record today's (or `--date`) scores; values are clamped to 0..=10.
    Log {
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        physical: i64,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        mental: i64,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        spiritual: i64,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        social: i64,
        /// `dimension=text`; repeatable.
        #[arg(long = "note")]
        notes: Vec<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    Show {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Averages and insights for the current week.
    Week,
}

#[derive(Subcommand, Debug)]
enum CircleCommand {
    List,
    Add {
        item: String,
        #[arg(long, value_parser = commands::parse_category, default_value = "control")]
        category: planner_core::model::circle::CircleCategory,
    },
    Sort {
        id: Uuid,
        #[arg(value_parser = commands::parse_category)]
        category: planner_core::model::circle::CircleCategory,
    },
    Remove { id: Uuid },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.config.log_dir.as_deref() {
        if let Err(err) = planner_core::init_logging(&cli.config.log_level, log_dir) {
            eprintln!("{}", serde_json::json!({ "error": err }));
            return ExitCode::FAILURE;
        }
    }

    match commands::run(&cli.config, cli.command) {
        Ok(output) => {
            println!("{output:#}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=cli_command module=cli status=error error_code={}", err.code);
            eprintln!("{}", serde_json::json!({ "error": err.message }));
            ExitCode::FAILURE
        }
    }
}
