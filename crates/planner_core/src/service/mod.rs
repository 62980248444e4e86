//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep CLI and UI layers decoupled from storage details.
//! - Map failures to one user-facing message per form.

pub mod account_service;
pub mod circle_service;
pub mod dashboard;
pub mod mission_service;
pub mod planner_service;
pub mod renewal_service;
pub mod role_service;
