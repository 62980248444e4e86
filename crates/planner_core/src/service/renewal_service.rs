//! Daily renewal use-case service.
//!
//! # Invariants
//! - Scores are clamped to `0..=10` before they reach storage.
//! - Weekly summaries are computed on the fly and never persisted.

use crate::model::renewal::{
    insights, score_label, weekly_averages, RenewalAverages, RenewalDimension, RenewalInsight,
    RenewalLog, RenewalScores, MAX_SCORE, MIN_SCORE,
};
use crate::model::week::{week_end, week_start_for};
use crate::model::UserId;
use crate::repo::renewal_repo::RenewalRepository;
use crate::repo::RepoError;
use chrono::NaiveDate;
use log::info;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum RenewalError {
    Repo(RepoError),
}

impl RenewalError {
    pub fn user_message(&self) -> &'static str {
        "Failed to save renewal log"
    }
}

impl Display for RenewalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RenewalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for RenewalError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Raw check-in input; scores may be out of range and are clamped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenewalEntry {
    pub physical: i64,
    pub mental: i64,
    pub spiritual: i64,
    pub social: i64,
    pub notes: Vec<(RenewalDimension, String)>,
}

/// Per-dimension line of the weekly overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionSummary {
    pub dimension: RenewalDimension,
    pub label: &'static str,
    pub average: u8,
    pub rating: &'static str,
}

/// Weekly renewal overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenewalWeekSummary {
    pub week_start: NaiveDate,
    pub logs: Vec<RenewalLog>,
    pub averages: RenewalAverages,
    pub dimensions: Vec<DimensionSummary>,
    pub overall_rating: &'static str,
    pub insights: Vec<RenewalInsight>,
    pub messages: Vec<&'static str>,
}

pub struct RenewalService<R: RenewalRepository> {
    repo: R,
}

impl<R: RenewalRepository> RenewalService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Saves the check-in for `date`, replacing any earlier one that day.
    pub fn log_day(
        &self,
        user_id: UserId,
        date: NaiveDate,
        entry: RenewalEntry,
    ) -> Result<RenewalLog, RenewalError> {
        let raw = [entry.physical, entry.mental, entry.spiritual, entry.social];
        let clamped = raw
            .iter()
            .any(|value| !(i64::from(MIN_SCORE)..=i64::from(MAX_SCORE)).contains(value));
        let scores =
            RenewalScores::clamped(entry.physical, entry.mental, entry.spiritual, entry.social);
        let mut log = RenewalLog::new(user_id, date, scores);
        for (dimension, note) in entry.notes {
            log.notes.set(dimension, Some(note));
        }

        let stored = self.repo.upsert_renewal_log(&log)?;
        info!(
            "event=renewal_log module=renewal status=ok date={} clamped={clamped}",
            stored.log_date
        );
        Ok(stored)
    }

    /// Scores for `date`; zeros when nothing was logged.
    pub fn day_scores(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> Result<RenewalScores, RenewalError> {
        Ok(self
            .repo
            .get_renewal_log(user_id, date)?
            .map(|log| log.scores)
            .unwrap_or_default())
    }

    pub fn get_log(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> Result<Option<RenewalLog>, RenewalError> {
        Ok(self.repo.get_renewal_log(user_id, date)?)
    }

    /// Averages, ratings and insights over the logs of `today`'s week.
    pub fn week_summary(
        &self,
        user_id: UserId,
        today: NaiveDate,
    ) -> Result<RenewalWeekSummary, RenewalError> {
        let week_start = week_start_for(today);
        let logs = self
            .repo
            .list_renewal_logs(user_id, week_start, week_end(week_start))?;
        Ok(summarize_week(week_start, logs))
    }
}

/// Builds the weekly overview from already-loaded logs.
pub fn summarize_week(week_start: NaiveDate, logs: Vec<RenewalLog>) -> RenewalWeekSummary {
    let averages = weekly_averages(logs.iter().map(|log| &log.scores));
    let dimensions = RenewalDimension::ALL
        .into_iter()
        .map(|dimension| DimensionSummary {
            dimension,
            label: dimension.label(),
            average: averages.get(dimension),
            rating: score_label(averages.get(dimension)),
        })
        .collect();
    let found = insights(&averages);
    let messages = found.iter().map(|insight| insight.message()).collect();

    RenewalWeekSummary {
        week_start,
        logs,
        averages,
        dimensions,
        overall_rating: score_label(averages.overall),
        insights: found,
        messages,
    }
}
