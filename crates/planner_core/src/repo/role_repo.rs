//! Role repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Roles list in `sort_order ASC, created_at ASC` order.
//! - All lookups are scoped by `user_id`.

use crate::model::role::Role;
use crate::model::{RoleId, UserId};
use crate::repo::{parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const ROLE_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    name,
    description,
    icon,
    color,
    sort_order,
    created_at
FROM roles";

/// Repository interface for life roles.
pub trait RoleRepository {
    fn create_role(&self, role: &Role) -> RepoResult<RoleId>;
    fn update_role(&self, role: &Role) -> RepoResult<()>;
    fn get_role(&self, user_id: UserId, id: RoleId) -> RepoResult<Option<Role>>;
    fn list_roles(&self, user_id: UserId) -> RepoResult<Vec<Role>>;
    fn delete_role(&self, user_id: UserId, id: RoleId) -> RepoResult<()>;
    /// Sort order that appends after every existing role of the user.
    fn next_sort_order(&self, user_id: UserId) -> RepoResult<i64>;
}

/// SQLite-backed role repository.
pub struct SqliteRoleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRoleRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RoleRepository for SqliteRoleRepository<'_> {
    fn create_role(&self, role: &Role) -> RepoResult<RoleId> {
        role.validate()?;

        self.conn.execute(
            "INSERT INTO roles (
                id,
                user_id,
                name,
                description,
                icon,
                color,
                sort_order,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                role.id.to_string(),
                role.user_id.to_string(),
                role.name.as_str(),
                role.description.as_deref(),
                role.icon.as_str(),
                role.color.as_str(),
                role.sort_order,
                role.created_at,
            ],
        )?;
        Ok(role.id)
    }

    fn update_role(&self, role: &Role) -> RepoResult<()> {
        role.validate()?;

        let changed = self.conn.execute(
            "UPDATE roles
             SET
                name = ?3,
                description = ?4,
                icon = ?5,
                color = ?6,
                sort_order = ?7
             WHERE id = ?1 AND user_id = ?2;",
            params![
                role.id.to_string(),
                role.user_id.to_string(),
                role.name.as_str(),
                role.description.as_deref(),
                role.icon.as_str(),
                role.color.as_str(),
                role.sort_order,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "role",
                id: role.id,
            });
        }
        Ok(())
    }

    fn get_role(&self, user_id: UserId, id: RoleId) -> RepoResult<Option<Role>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ROLE_SELECT_SQL} WHERE id = ?1 AND user_id = ?2;"
        ))?;
        let mut rows = stmt.query(params![id.to_string(), user_id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_role_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_roles(&self, user_id: UserId) -> RepoResult<Vec<Role>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ROLE_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY sort_order ASC, created_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([user_id.to_string()])?;
        let mut roles = Vec::new();
        while let Some(row) = rows.next()? {
            roles.push(parse_role_row(row)?);
        }
        Ok(roles)
    }

    fn delete_role(&self, user_id: UserId, id: RoleId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM roles WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), user_id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "role", id });
        }
        Ok(())
    }

    fn next_sort_order(&self, user_id: UserId) -> RepoResult<i64> {
        let next: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM roles WHERE user_id = ?1;",
            [user_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(next)
    }
}

fn parse_role_row(row: &Row<'_>) -> RepoResult<Role> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    Ok(Role {
        id: parse_uuid(&id_text, "roles.id")?,
        user_id: parse_uuid(&user_text, "roles.user_id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        icon: row.get("icon")?,
        color: row.get("color")?,
        sort_order: row.get("sort_order")?,
        created_at: row.get("created_at")?,
    })
}
