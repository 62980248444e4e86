//! Circle-of-control use-case service.

use crate::model::circle::{summarize, CircleCategory, CircleItem, ControlSummary};
use crate::model::validation::ValidationError;
use crate::model::{CircleItemId, UserId};
use crate::repo::circle_repo::CircleRepository;
use crate::repo::RepoError;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum CircleError {
    EmptyItem,
    ItemNotFound(CircleItemId),
    Repo(RepoError),
}

impl CircleError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyItem => "Please describe the concern",
            Self::ItemNotFound(_) => "Failed to move item",
            Self::Repo(_) => "Failed to add item",
        }
    }
}

impl Display for CircleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyItem => write!(f, "circle item must not be blank"),
            Self::ItemNotFound(id) => write!(f, "circle item not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CircleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CircleError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(ValidationError::BlankText { .. }) => Self::EmptyItem,
            RepoError::NotFound {
                entity: "circle item",
                id,
            } => Self::ItemNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Sorted concerns with the control ratio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CircleBoard {
    pub control: Vec<CircleItem>,
    pub no_control: Vec<CircleItem>,
    pub summary: ControlSummary,
}

pub struct CircleService<R: CircleRepository> {
    repo: R,
}

impl<R: CircleRepository> CircleService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn add_item(
        &self,
        user_id: UserId,
        text: impl Into<String>,
        category: CircleCategory,
    ) -> Result<CircleItem, CircleError> {
        let item = CircleItem::new(user_id, text, category);
        self.repo.create_circle_item(&item)?;
        Ok(item)
    }

    pub fn move_item(
        &self,
        user_id: UserId,
        item_id: CircleItemId,
        category: CircleCategory,
    ) -> Result<(), CircleError> {
        Ok(self.repo.set_circle_category(user_id, item_id, category)?)
    }

    pub fn remove_item(&self, user_id: UserId, item_id: CircleItemId) -> Result<(), CircleError> {
        Ok(self.repo.delete_circle_item(user_id, item_id)?)
    }

    pub fn board(&self, user_id: UserId) -> Result<CircleBoard, CircleError> {
        let items = self.repo.list_circle_items(user_id)?;
        let summary = summarize(&items);
        let (control, no_control) = items
            .into_iter()
            .partition(|item| item.category == CircleCategory::Control);
        Ok(CircleBoard {
            control,
            no_control,
            summary,
        })
    }
}
