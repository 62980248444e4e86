//! Mission statement use-case service.
//!
//! # Responsibility
//! - Compose a draft statement from guided builder answers.
//! - Persist the user's single evolving mission document.
//!
//! # Invariants
//! - Saving keeps one row per user; the first save fixes `id`/`created_at`.
//! - A blank statement on save is replaced by the composed draft.

use crate::model::mission::{
    compose_statement, core_value, normalize_catalog_id, MissionStatement, RoleGoal,
};
use crate::model::{now_epoch_ms, UserId};
use crate::repo::mission_repo::MissionRepository;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum MissionError {
    UnknownValue(String),
    Repo(RepoError),
}

impl MissionError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::UnknownValue(_) => "Please pick values from the list",
            Self::Repo(_) => "Failed to save mission statement",
        }
    }
}

impl Display for MissionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownValue(id) => write!(f, "unknown core value `{id}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MissionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::UnknownValue(_) => None,
        }
    }
}

impl From<RepoError> for MissionError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Answers collected by the mission builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissionAnswers {
    pub legacy: Option<String>,
    /// Core value ids from the catalog.
    pub values: Vec<String>,
    pub role_goals: Vec<RoleGoal>,
    /// Edited statement text; composed from the answers when blank.
    pub statement: Option<String>,
}

pub struct MissionService<R: MissionRepository> {
    repo: R,
}

impl<R: MissionRepository> MissionService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Composes the statement text without persisting anything.
    pub fn draft(&self, answers: &MissionAnswers) -> String {
        let values = answers
            .values
            .iter()
            .map(|value| normalize_catalog_id(value))
            .collect::<Vec<_>>();
        compose_statement(&values, &answers.role_goals, answers.legacy.as_deref())
    }

    /// Saves the user's mission, replacing any previous one.
    pub fn save(
        &self,
        user_id: UserId,
        answers: MissionAnswers,
    ) -> Result<MissionStatement, MissionError> {
        let mut values = Vec::with_capacity(answers.values.len());
        for value in &answers.values {
            let id = normalize_catalog_id(value);
            if core_value(&id).is_none() {
                return Err(MissionError::UnknownValue(value.clone()));
            }
            if !values.contains(&id) {
                values.push(id);
            }
        }

        let statement = match answers.statement.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => compose_statement(&values, &answers.role_goals, answers.legacy.as_deref()),
        };

        let mut mission = match self.repo.get_mission(user_id)? {
            Some(existing) => existing,
            None => MissionStatement::new(user_id, String::new()),
        };
        mission.statement = statement;
        mission.values = values;
        mission.principles = answers
            .role_goals
            .into_iter()
            .filter(|entry| !entry.goal.trim().is_empty())
            .collect();
        mission.legacy = answers
            .legacy
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        mission.updated_at = now_epoch_ms();

        self.repo.save_mission(&mission)?;
        info!(
            "event=mission_save module=mission status=ok values={} principles={}",
            mission.values.len(),
            mission.principles.len()
        );
        Ok(mission)
    }

    pub fn get_mission(&self, user_id: UserId) -> Result<Option<MissionStatement>, MissionError> {
        Ok(self.repo.get_mission(user_id)?)
    }
}
