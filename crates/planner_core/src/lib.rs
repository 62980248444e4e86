//! Core domain logic for the principle planner.
//! This crate is the single source of truth for planning invariants.

pub mod board;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use board::{BoardError, BoardMutation, PlannerBoard, RemoteWrite, RemoteWriter, StoreWriter};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::Quadrant;
pub use model::week::week_start_for;
pub use repo::{RepoError, RepoResult};
pub use rusqlite::Connection;
pub use service::planner_service::{PlannerError, PlannerService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
