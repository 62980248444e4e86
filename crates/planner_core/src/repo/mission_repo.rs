//! Mission statement repository contracts and SQLite implementation.
//!
//! # Invariants
//! - At most one row per user; `save_mission` replaces it in place while
//!   keeping the original `id` and `created_at`.
//! - `values` and `principles` are stored as JSON arrays.

use crate::model::mission::{MissionStatement, RoleGoal};
use crate::model::validation::require_text;
use crate::model::UserId;
use crate::repo::{parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

/// Repository interface for the per-user mission document.
pub trait MissionRepository {
    /// Inserts or replaces the user's mission statement.
    fn save_mission(&self, mission: &MissionStatement) -> RepoResult<()>;
    fn get_mission(&self, user_id: UserId) -> RepoResult<Option<MissionStatement>>;
}

/// SQLite-backed mission repository.
pub struct SqliteMissionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMissionRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl MissionRepository for SqliteMissionRepository<'_> {
    fn save_mission(&self, mission: &MissionStatement) -> RepoResult<()> {
        require_text("mission statement", &mission.statement)?;
        let values = encode_json(&mission.values)?;
        let principles = encode_json(&mission.principles)?;

        self.conn.execute(
            "INSERT INTO mission_statements (
                id,
                user_id,
                statement,
                \"values\",
                principles,
                legacy,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT (user_id) DO UPDATE SET
                statement = excluded.statement,
                \"values\" = excluded.\"values\",
                principles = excluded.principles,
                legacy = excluded.legacy,
                updated_at = excluded.updated_at;",
            params![
                mission.id.to_string(),
                mission.user_id.to_string(),
                mission.statement.as_str(),
                values,
                principles,
                mission.legacy.as_deref(),
                mission.created_at,
                mission.updated_at,
            ],
        )?;
        Ok(())
    }

    fn get_mission(&self, user_id: UserId) -> RepoResult<Option<MissionStatement>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                id,
                user_id,
                statement,
                \"values\",
                principles,
                legacy,
                created_at,
                updated_at
             FROM mission_statements
             WHERE user_id = ?1;",
        )?;
        let mut rows = stmt.query([user_id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_mission_row(row)?)),
            None => Ok(None),
        }
    }
}

fn parse_mission_row(row: &Row<'_>) -> RepoResult<MissionStatement> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    let values_text: String = row.get("values")?;
    let principles_text: String = row.get("principles")?;

    let values: Vec<String> = decode_json(&values_text, "mission_statements.values")?;
    let principles: Vec<RoleGoal> = decode_json(&principles_text, "mission_statements.principles")?;

    Ok(MissionStatement {
        id: parse_uuid(&id_text, "mission_statements.id")?,
        user_id: parse_uuid(&user_text, "mission_statements.user_id")?,
        statement: row.get("statement")?,
        values,
        principles,
        legacy: row.get("legacy")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn encode_json<T: serde::Serialize>(value: &T) -> RepoResult<String> {
    serde_json::to_string(value)
        .map_err(|err| RepoError::InvalidData(format!("failed to encode json column: {err}")))
}

fn decode_json<T: serde::de::DeserializeOwned>(text: &str, column: &str) -> RepoResult<T> {
    serde_json::from_str(text)
        .map_err(|err| RepoError::InvalidData(format!("invalid json in {column}: {err}")))
}
