//! Profile repository contracts and SQLite implementation.

use crate::db::is_unique_violation;
use crate::model::profile::Profile;
use crate::model::UserId;
use crate::repo::{parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const PROFILE_SELECT_SQL: &str = "SELECT
    id,
    email,
    full_name,
    avatar_url,
    created_at,
    updated_at
FROM profiles";

/// Repository interface for per-user profiles.
pub trait ProfileRepository {
    fn create_profile(&self, profile: &Profile) -> RepoResult<()>;
    fn get_profile(&self, user_id: UserId) -> RepoResult<Option<Profile>>;
    fn find_profile_by_email(&self, email: &str) -> RepoResult<Option<Profile>>;
    fn update_profile(&self, profile: &Profile) -> RepoResult<()>;
}

/// SQLite-backed profile repository.
pub struct SqliteProfileRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProfileRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProfileRepository for SqliteProfileRepository<'_> {
    fn create_profile(&self, profile: &Profile) -> RepoResult<()> {
        profile.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO profiles (id, email, full_name, avatar_url, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                profile.id.to_string(),
                profile.email.as_str(),
                profile.full_name.as_deref(),
                profile.avatar_url.as_deref(),
                profile.created_at,
                profile.updated_at,
            ],
        );

        match inserted {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(RepoError::AlreadyExists {
                entity: "profile",
                id: profile.id,
            }),
            Err(err) => Err(err.into()),
        }
    }

    fn get_profile(&self, user_id: UserId) -> RepoResult<Option<Profile>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROFILE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([user_id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_profile_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_profile_by_email(&self, email: &str) -> RepoResult<Option<Profile>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROFILE_SELECT_SQL} WHERE lower(email) = lower(?1) ORDER BY created_at ASC LIMIT 1;"
        ))?;
        let mut rows = stmt.query([email])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_profile_row(row)?)),
            None => Ok(None),
        }
    }

    fn update_profile(&self, profile: &Profile) -> RepoResult<()> {
        profile.validate()?;

        let changed = self.conn.execute(
            "UPDATE profiles
             SET
                email = ?2,
                full_name = ?3,
                avatar_url = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                profile.id.to_string(),
                profile.email.as_str(),
                profile.full_name.as_deref(),
                profile.avatar_url.as_deref(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "profile",
                id: profile.id,
            });
        }
        Ok(())
    }
}

/// Returns whether a profile row exists for `user_id`.
pub fn profile_exists(conn: &Connection, user_id: UserId) -> RepoResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM profiles WHERE id = ?1;",
            [user_id.to_string()],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn parse_profile_row(row: &Row<'_>) -> RepoResult<Profile> {
    let id_text: String = row.get("id")?;
    Ok(Profile {
        id: parse_uuid(&id_text, "profiles.id")?,
        email: row.get("email")?,
        full_name: row.get("full_name")?,
        avatar_url: row.get("avatar_url")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
