//! Weekly plan and big rock repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Resolve the `(user_id, week_start)` plan row idempotently.
//! - Own big rock CRUD, scoped through the owning plan's user.
//!
//! # Invariants
//! - `ensure_weekly_plan` never fails on a duplicate key; a concurrent or
//!   repeated create resolves to the already-stored row.
//! - Big rock writes are rejected unless the plan and the tagged role
//!   belong to the caller.

use crate::model::plan::{validate_scheduled_day, BigRock, WeeklyPlan};
use crate::model::{PlanId, RockId, RoleId, UserId};
use crate::repo::{
    bool_to_int, int_to_bool, parse_optional_uuid, parse_uuid, RepoError, RepoResult,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

const PLAN_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    week_start,
    reflection,
    is_complete,
    created_at,
    updated_at
FROM weekly_plans";

const ROCK_SELECT_SQL: &str = "SELECT
    br.id AS id,
    br.weekly_plan_id AS weekly_plan_id,
    br.role_id AS role_id,
    br.title AS title,
    br.description AS description,
    br.priority AS priority,
    br.is_complete AS is_complete,
    br.scheduled_day AS scheduled_day,
    br.created_at AS created_at
FROM big_rocks br
INNER JOIN weekly_plans wp ON wp.id = br.weekly_plan_id";

const ROCK_OWNED_BY_USER: &str =
    "weekly_plan_id IN (SELECT id FROM weekly_plans WHERE user_id = ?2)";

/// Repository interface for weekly plans and their rocks.
pub trait PlanRepository {
    /// Inserts `plan` unless the user already has a plan for that week, then
    /// returns the stored row.
    fn ensure_weekly_plan(&self, plan: &WeeklyPlan) -> RepoResult<WeeklyPlan>;
    fn get_weekly_plan(
        &self,
        user_id: UserId,
        week_start: NaiveDate,
    ) -> RepoResult<Option<WeeklyPlan>>;
    fn get_plan_by_id(&self, user_id: UserId, plan_id: PlanId) -> RepoResult<Option<WeeklyPlan>>;
    fn update_plan_review(
        &self,
        user_id: UserId,
        plan_id: PlanId,
        reflection: Option<&str>,
        is_complete: bool,
    ) -> RepoResult<()>;

    fn create_big_rock(&self, user_id: UserId, rock: &BigRock) -> RepoResult<RockId>;
    fn get_big_rock(&self, user_id: UserId, rock_id: RockId) -> RepoResult<Option<BigRock>>;
    fn list_big_rocks(&self, user_id: UserId, plan_id: PlanId) -> RepoResult<Vec<BigRock>>;
    fn set_rock_complete(&self, user_id: UserId, rock_id: RockId, complete: bool)
        -> RepoResult<()>;
    fn set_rock_scheduled_day(
        &self,
        user_id: UserId,
        rock_id: RockId,
        day: Option<u8>,
    ) -> RepoResult<()>;
}

/// SQLite-backed plan repository.
pub struct SqlitePlanRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePlanRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn ensure_plan_owned(&self, user_id: UserId, plan_id: PlanId) -> RepoResult<()> {
        if self.get_plan_by_id(user_id, plan_id)?.is_none() {
            return Err(RepoError::NotFound {
                entity: "weekly plan",
                id: plan_id,
            });
        }
        Ok(())
    }

    fn ensure_role_owned(&self, user_id: UserId, role_id: Option<RoleId>) -> RepoResult<()> {
        let Some(role_id) = role_id else {
            return Ok(());
        };
        let owned = self
            .conn
            .query_row(
                "SELECT 1 FROM roles WHERE id = ?1 AND user_id = ?2;",
                params![role_id.to_string(), user_id.to_string()],
                |_| Ok(()),
            )
            .optional()?;
        if owned.is_none() {
            return Err(RepoError::NotFound {
                entity: "role",
                id: role_id,
            });
        }
        Ok(())
    }
}

impl PlanRepository for SqlitePlanRepository<'_> {
    fn ensure_weekly_plan(&self, plan: &WeeklyPlan) -> RepoResult<WeeklyPlan> {
        self.conn.execute(
            "INSERT INTO weekly_plans (
                id,
                user_id,
                week_start,
                reflection,
                is_complete,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT (user_id, week_start) DO NOTHING;",
            params![
                plan.id.to_string(),
                plan.user_id.to_string(),
                plan.week_start,
                plan.reflection.as_deref(),
                bool_to_int(plan.is_complete),
                plan.created_at,
                plan.updated_at,
            ],
        )?;

        self.get_weekly_plan(plan.user_id, plan.week_start)?
            .ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "weekly plan for {} missing after insert",
                    plan.week_start
                ))
            })
    }

    fn get_weekly_plan(
        &self,
        user_id: UserId,
        week_start: NaiveDate,
    ) -> RepoResult<Option<WeeklyPlan>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PLAN_SELECT_SQL} WHERE user_id = ?1 AND week_start = ?2;"
        ))?;
        let mut rows = stmt.query(params![user_id.to_string(), week_start])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_plan_row(row)?)),
            None => Ok(None),
        }
    }

    fn get_plan_by_id(&self, user_id: UserId, plan_id: PlanId) -> RepoResult<Option<WeeklyPlan>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PLAN_SELECT_SQL} WHERE id = ?1 AND user_id = ?2;"
        ))?;
        let mut rows = stmt.query(params![plan_id.to_string(), user_id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_plan_row(row)?)),
            None => Ok(None),
        }
    }

    fn update_plan_review(
        &self,
        user_id: UserId,
        plan_id: PlanId,
        reflection: Option<&str>,
        is_complete: bool,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE weekly_plans
             SET
                reflection = ?3,
                is_complete = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1 AND user_id = ?2;",
            params![
                plan_id.to_string(),
                user_id.to_string(),
                reflection,
                bool_to_int(is_complete),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "weekly plan",
                id: plan_id,
            });
        }
        Ok(())
    }

    fn create_big_rock(&self, user_id: UserId, rock: &BigRock) -> RepoResult<RockId> {
        rock.validate()?;
        self.ensure_plan_owned(user_id, rock.weekly_plan_id)?;
        self.ensure_role_owned(user_id, rock.role_id)?;

        self.conn.execute(
            "INSERT INTO big_rocks (
                id,
                weekly_plan_id,
                role_id,
                title,
                description,
                priority,
                is_complete,
                scheduled_day,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                rock.id.to_string(),
                rock.weekly_plan_id.to_string(),
                rock.role_id.map(|id| id.to_string()),
                rock.title.as_str(),
                rock.description.as_deref(),
                rock.priority,
                bool_to_int(rock.is_complete),
                rock.scheduled_day,
                rock.created_at,
            ],
        )?;
        Ok(rock.id)
    }

    fn get_big_rock(&self, user_id: UserId, rock_id: RockId) -> RepoResult<Option<BigRock>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ROCK_SELECT_SQL} WHERE br.id = ?1 AND wp.user_id = ?2;"
        ))?;
        let mut rows = stmt.query(params![rock_id.to_string(), user_id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_rock_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_big_rocks(&self, user_id: UserId, plan_id: PlanId) -> RepoResult<Vec<BigRock>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ROCK_SELECT_SQL}
             WHERE br.weekly_plan_id = ?1 AND wp.user_id = ?2
             ORDER BY br.priority DESC, br.created_at ASC, br.rowid ASC;"
        ))?;
        let mut rows = stmt.query(params![plan_id.to_string(), user_id.to_string()])?;
        let mut rocks = Vec::new();
        while let Some(row) = rows.next()? {
            rocks.push(parse_rock_row(row)?);
        }
        Ok(rocks)
    }

    fn set_rock_complete(
        &self,
        user_id: UserId,
        rock_id: RockId,
        complete: bool,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!(
                "UPDATE big_rocks SET is_complete = ?3 WHERE id = ?1 AND {ROCK_OWNED_BY_USER};"
            ),
            params![rock_id.to_string(), user_id.to_string(), bool_to_int(complete)],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "big rock",
                id: rock_id,
            });
        }
        Ok(())
    }

    fn set_rock_scheduled_day(
        &self,
        user_id: UserId,
        rock_id: RockId,
        day: Option<u8>,
    ) -> RepoResult<()> {
        validate_scheduled_day(day)?;
        let changed = self.conn.execute(
            &format!(
                "UPDATE big_rocks SET scheduled_day = ?3 WHERE id = ?1 AND {ROCK_OWNED_BY_USER};"
            ),
            params![rock_id.to_string(), user_id.to_string(), day],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "big rock",
                id: rock_id,
            });
        }
        Ok(())
    }
}

fn parse_plan_row(row: &Row<'_>) -> RepoResult<WeeklyPlan> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    Ok(WeeklyPlan {
        id: parse_uuid(&id_text, "weekly_plans.id")?,
        user_id: parse_uuid(&user_text, "weekly_plans.user_id")?,
        week_start: row.get("week_start")?,
        reflection: row.get("reflection")?,
        is_complete: int_to_bool(row.get("is_complete")?, "weekly_plans.is_complete")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_rock_row(row: &Row<'_>) -> RepoResult<BigRock> {
    let id_text: String = row.get("id")?;
    let plan_text: String = row.get("weekly_plan_id")?;
    let rock = BigRock {
        id: parse_uuid(&id_text, "big_rocks.id")?,
        weekly_plan_id: parse_uuid(&plan_text, "big_rocks.weekly_plan_id")?,
        role_id: parse_optional_uuid(row.get("role_id")?, "big_rocks.role_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        priority: row.get("priority")?,
        is_complete: int_to_bool(row.get("is_complete")?, "big_rocks.is_complete")?,
        scheduled_day: row.get("scheduled_day")?,
        created_at: row.get("created_at")?,
    };
    rock.validate()?;
    Ok(rock)
}
