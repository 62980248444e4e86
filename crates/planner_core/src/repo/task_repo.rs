//! Task repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Stored tasks never carry quadrant `q2`; `Task::validate` rejects it on
//!   write and the read path rejects it as invalid data.
//! - Lists are ordered by `created_at ASC`.

use crate::model::task::{Quadrant, Task};
use crate::model::{TaskId, UserId};
use crate::repo::{
    bool_to_int, int_to_bool, parse_optional_uuid, parse_uuid, RepoError, RepoResult,
};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    big_rock_id,
    user_id,
    title,
    quadrant,
    scheduled_date,
    is_complete,
    created_at
FROM tasks";

/// Query options for listing one user's tasks.
#[derive(Debug, Clone)]
pub struct TaskListQuery {
    pub user_id: UserId,
    /// Inclusive lower bound on `scheduled_date`.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on `scheduled_date`.
    pub to: Option<NaiveDate>,
    /// Keep tasks without a date when a date range is given.
    pub include_unscheduled: bool,
    pub quadrant: Option<Quadrant>,
    pub include_complete: bool,
}

impl TaskListQuery {
    /// Every task of the user.
    pub fn all(user_id: UserId) -> Self {
        Self {
            user_id,
            from: None,
            to: None,
            include_unscheduled: true,
            quadrant: None,
            include_complete: true,
        }
    }

    /// Tasks dated inside `[from, to]`, plus undated ones.
    pub fn between(user_id: UserId, from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            ..Self::all(user_id)
        }
    }
}

/// Repository interface for tasks.
pub trait TaskRepository {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    fn get_task(&self, user_id: UserId, id: TaskId) -> RepoResult<Option<Task>>;
    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
    fn set_task_complete(&self, user_id: UserId, id: TaskId, complete: bool) -> RepoResult<()>;
    fn set_task_scheduled_date(
        &self,
        user_id: UserId,
        id: TaskId,
        date: Option<NaiveDate>,
    ) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (
                id,
                big_rock_id,
                user_id,
                title,
                quadrant,
                scheduled_date,
                is_complete,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                task.id.to_string(),
                task.big_rock_id.map(|id| id.to_string()),
                task.user_id.to_string(),
                task.title.as_str(),
                task.quadrant.as_str(),
                task.scheduled_date,
                bool_to_int(task.is_complete),
                task.created_at,
            ],
        )?;
        Ok(task.id)
    }

    fn get_task(&self, user_id: UserId, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL} WHERE id = ?1 AND user_id = ?2;"
        ))?;
        let mut rows = stmt.query(params![id.to_string(), user_id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_task_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE user_id = ?");
        let mut bind_values: Vec<Value> = vec![Value::Text(query.user_id.to_string())];

        if query.from.is_some() || query.to.is_some() {
            let mut range = String::from("(scheduled_date IS NOT NULL");
            if let Some(from) = query.from {
                range.push_str(" AND scheduled_date >= ?");
                bind_values.push(Value::Text(from.format("%F").to_string()));
            }
            if let Some(to) = query.to {
                range.push_str(" AND scheduled_date <= ?");
                bind_values.push(Value::Text(to.format("%F").to_string()));
            }
            range.push(')');
            if query.include_unscheduled {
                sql.push_str(&format!(" AND ({range} OR scheduled_date IS NULL)"));
            } else {
                sql.push_str(&format!(" AND {range}"));
            }
        }

        if let Some(quadrant) = query.quadrant {
            sql.push_str(" AND quadrant = ?");
            bind_values.push(Value::Text(quadrant.as_str().to_string()));
        }

        if !query.include_complete {
            sql.push_str(" AND is_complete = 0");
        }

        sql.push_str(" ORDER BY created_at ASC, rowid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn set_task_complete(&self, user_id: UserId, id: TaskId, complete: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks SET is_complete = ?3 WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), user_id.to_string(), bool_to_int(complete)],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "task", id });
        }
        Ok(())
    }

    fn set_task_scheduled_date(
        &self,
        user_id: UserId,
        id: TaskId,
        date: Option<NaiveDate>,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks SET scheduled_date = ?3 WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), user_id.to_string(), date],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "task", id });
        }
        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    let quadrant_text: String = row.get("quadrant")?;
    let quadrant = Quadrant::parse(&quadrant_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid quadrant `{quadrant_text}` in tasks.quadrant"))
    })?;

    let task = Task {
        id: parse_uuid(&id_text, "tasks.id")?,
        user_id: parse_uuid(&user_text, "tasks.user_id")?,
        big_rock_id: parse_optional_uuid(row.get("big_rock_id")?, "tasks.big_rock_id")?,
        title: row.get("title")?,
        quadrant,
        scheduled_date: row.get("scheduled_date")?,
        is_complete: int_to_bool(row.get("is_complete")?, "tasks.is_complete")?,
        created_at: row.get("created_at")?,
    };
    task.validate()?;
    Ok(task)
}
