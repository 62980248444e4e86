//! Read-only home snapshot.
//!
//! # Responsibility
//! - Collect mission text, roles, this week's rocks and today's renewal
//!   scores in one pass.
//!
//! # Invariants
//! - Never creates rows; a missing weekly plan yields an empty rock list.
//! - Missing renewal log yields all-zero scores.

use crate::model::plan::{rock_completion, BigRock};
use crate::model::renewal::RenewalScores;
use crate::model::role::Role;
use crate::model::week::week_start_for;
use crate::model::UserId;
use crate::repo::mission_repo::MissionRepository;
use crate::repo::plan_repo::PlanRepository;
use crate::repo::renewal_repo::RenewalRepository;
use crate::repo::role_repo::RoleRepository;
use crate::repo::RepoResult;
use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub today: NaiveDate,
    pub week_start: NaiveDate,
    pub mission: Option<String>,
    pub roles: Vec<Role>,
    pub rocks: Vec<BigRock>,
    pub rock_completion: u8,
    pub today_scores: RenewalScores,
}

/// Repositories the dashboard reads from.
pub struct DashboardSources<'a, M, R, P, N> {
    pub missions: &'a M,
    pub roles: &'a R,
    pub plans: &'a P,
    pub renewals: &'a N,
}

pub fn build_dashboard<M, R, P, N>(
    sources: &DashboardSources<'_, M, R, P, N>,
    user_id: UserId,
    today: NaiveDate,
) -> RepoResult<Dashboard>
where
    M: MissionRepository,
    R: RoleRepository,
    P: PlanRepository,
    N: RenewalRepository,
{
    let week_start = week_start_for(today);
    let mission = sources
        .missions
        .get_mission(user_id)?
        .map(|mission| mission.statement)
        .filter(|statement| !statement.trim().is_empty());
    let roles = sources.roles.list_roles(user_id)?;
    let rocks = match sources.plans.get_weekly_plan(user_id, week_start)? {
        Some(plan) => sources.plans.list_big_rocks(user_id, plan.id)?,
        None => Vec::new(),
    };
    let today_scores = sources
        .renewals
        .get_renewal_log(user_id, today)?
        .map(|log| log.scores)
        .unwrap_or_default();

    debug!(
        "event=dashboard_build module=dashboard status=ok roles={} rocks={}",
        roles.len(),
        rocks.len()
    );
    Ok(Dashboard {
        today,
        week_start,
        mission,
        rock_completion: rock_completion(&rocks),
        roles,
        rocks,
        today_scores,
    })
}
