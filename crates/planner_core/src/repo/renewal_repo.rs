//! Renewal log repository contracts and SQLite implementation.
//!
//! # Invariants
//! - One row per `(user_id, log_date)`; saving a second log for the same
//!   date replaces scores and notes in place.
//! - Scores are clamped again right before the write.

use crate::model::renewal::{RenewalLog, RenewalNotes, RenewalScores, MAX_SCORE};
use crate::model::validation::ValidationError;
use crate::model::UserId;
use crate::repo::{parse_uuid, RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

const RENEWAL_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    log_date,
    physical,
    mental,
    spiritual,
    social,
    physical_notes,
    mental_notes,
    spiritual_notes,
    social_notes,
    created_at
FROM renewal_logs";

/// Repository interface for daily renewal logs.
pub trait RenewalRepository {
    /// Inserts or replaces the log for `(user_id, log_date)` and returns the
    /// stored row.
    fn upsert_renewal_log(&self, log: &RenewalLog) -> RepoResult<RenewalLog>;
    fn get_renewal_log(&self, user_id: UserId, date: NaiveDate) -> RepoResult<Option<RenewalLog>>;
    /// Logs dated inside `[from, to]`, oldest first.
    fn list_renewal_logs(
        &self,
        user_id: UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepoResult<Vec<RenewalLog>>;
}

/// SQLite-backed renewal log repository.
pub struct SqliteRenewalRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRenewalRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RenewalRepository for SqliteRenewalRepository<'_> {
    fn upsert_renewal_log(&self, log: &RenewalLog) -> RepoResult<RenewalLog> {
        let scores = log.scores.normalized();

        self.conn.execute(
            "INSERT INTO renewal_logs (
                id,
                user_id,
                log_date,
                physical,
                mental,
                spiritual,
                social,
                physical_notes,
                mental_notes,
                spiritual_notes,
                social_notes,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT (user_id, log_date) DO UPDATE SET
                physical = excluded.physical,
                mental = excluded.mental,
                spiritual = excluded.spiritual,
                social = excluded.social,
                physical_notes = excluded.physical_notes,
                mental_notes = excluded.mental_notes,
                spiritual_notes = excluded.spiritual_notes,
                social_notes = excluded.social_notes;",
            params![
                log.id.to_string(),
                log.user_id.to_string(),
                log.log_date,
                scores.physical,
                scores.mental,
                scores.spiritual,
                scores.social,
                log.notes.physical.as_deref(),
                log.notes.mental.as_deref(),
                log.notes.spiritual.as_deref(),
                log.notes.social.as_deref(),
                log.created_at,
            ],
        )?;

        self.get_renewal_log(log.user_id, log.log_date)?
            .ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "renewal log for {} missing after upsert",
                    log.log_date
                ))
            })
    }

    fn get_renewal_log(&self, user_id: UserId, date: NaiveDate) -> RepoResult<Option<RenewalLog>> {
        let mut stmt = self.conn.prepare(&format!(
            "{RENEWAL_SELECT_SQL} WHERE user_id = ?1 AND log_date = ?2;"
        ))?;
        let mut rows = stmt.query(params![user_id.to_string(), date])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_renewal_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_renewal_logs(
        &self,
        user_id: UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepoResult<Vec<RenewalLog>> {
        let mut stmt = self.conn.prepare(&format!(
            "{RENEWAL_SELECT_SQL}
             WHERE user_id = ?1 AND log_date >= ?2 AND log_date <= ?3
             ORDER BY log_date ASC;"
        ))?;
        let mut rows = stmt.query(params![user_id.to_string(), from, to])?;
        let mut logs = Vec::new();
        while let Some(row) = rows.next()? {
            logs.push(parse_renewal_row(row)?);
        }
        Ok(logs)
    }
}

fn parse_renewal_row(row: &Row<'_>) -> RepoResult<RenewalLog> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    Ok(RenewalLog {
        id: parse_uuid(&id_text, "renewal_logs.id")?,
        user_id: parse_uuid(&user_text, "renewal_logs.user_id")?,
        log_date: row.get("log_date")?,
        scores: RenewalScores {
            physical: read_score(row, "physical")?,
            mental: read_score(row, "mental")?,
            spiritual: read_score(row, "spiritual")?,
            social: read_score(row, "social")?,
        },
        notes: RenewalNotes {
            physical: row.get("physical_notes")?,
            mental: row.get("mental_notes")?,
            spiritual: row.get("spiritual_notes")?,
            social: row.get("social_notes")?,
        },
        created_at: row.get("created_at")?,
    })
}

fn read_score(row: &Row<'_>, dimension: &'static str) -> RepoResult<u8> {
    let value: i64 = row.get(dimension)?;
    if !(0..=i64::from(MAX_SCORE)).contains(&value) {
        return Err(ValidationError::ScoreOutOfRange { dimension, value }.into());
    }
    Ok(value as u8)
}
