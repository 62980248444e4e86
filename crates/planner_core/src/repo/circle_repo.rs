//! Circle-of-control item repository contracts and SQLite implementation.

use crate::model::circle::{CircleCategory, CircleItem};
use crate::model::{CircleItemId, UserId};
use crate::repo::{parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

/// Repository interface for sorted concerns.
pub trait CircleRepository {
    fn create_circle_item(&self, item: &CircleItem) -> RepoResult<CircleItemId>;
    /// Items ordered by `created_at ASC`.
    fn list_circle_items(&self, user_id: UserId) -> RepoResult<Vec<CircleItem>>;
    fn set_circle_category(
        &self,
        user_id: UserId,
        id: CircleItemId,
        category: CircleCategory,
    ) -> RepoResult<()>;
    fn delete_circle_item(&self, user_id: UserId, id: CircleItemId) -> RepoResult<()>;
}

/// SQLite-backed circle item repository.
pub struct SqliteCircleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCircleRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CircleRepository for SqliteCircleRepository<'_> {
    fn create_circle_item(&self, item: &CircleItem) -> RepoResult<CircleItemId> {
        item.validate()?;

        self.conn.execute(
            "INSERT INTO circle_items (id, user_id, item, category, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                item.id.to_string(),
                item.user_id.to_string(),
                item.item.as_str(),
                item.category.as_str(),
                item.created_at,
            ],
        )?;
        Ok(item.id)
    }

    fn list_circle_items(&self, user_id: UserId) -> RepoResult<Vec<CircleItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, item, category, created_at
             FROM circle_items
             WHERE user_id = ?1
             ORDER BY created_at ASC, rowid ASC;",
        )?;
        let mut rows = stmt.query([user_id.to_string()])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_circle_row(row)?);
        }
        Ok(items)
    }

    fn set_circle_category(
        &self,
        user_id: UserId,
        id: CircleItemId,
        category: CircleCategory,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE circle_items SET category = ?3 WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), user_id.to_string(), category.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "circle item",
                id,
            });
        }
        Ok(())
    }

    fn delete_circle_item(&self, user_id: UserId, id: CircleItemId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM circle_items WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), user_id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "circle item",
                id,
            });
        }
        Ok(())
    }
}

fn parse_circle_row(row: &Row<'_>) -> RepoResult<CircleItem> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    let category_text: String = row.get("category")?;
    let category = CircleCategory::parse(&category_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid category `{category_text}` in circle_items.category"
        ))
    })?;
    Ok(CircleItem {
        id: parse_uuid(&id_text, "circle_items.id")?,
        user_id: parse_uuid(&user_text, "circle_items.user_id")?,
        item: row.get("item")?,
        category,
        created_at: row.get("created_at")?,
    })
}
