//! Life role use-case service.
//!
//! # Invariants
//! - New roles append after the user's current last role.
//! - `reorder_roles` assigns dense `0..n` sort orders in the given order.

use crate::model::mission::suggested_role;
use crate::model::role::Role;
use crate::model::validation::ValidationError;
use crate::model::{RoleId, UserId};
use crate::repo::role_repo::RoleRepository;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum RoleServiceError {
    InvalidName,
    InvalidColor(String),
    RoleNotFound(RoleId),
    UnknownSuggestion(String),
    Repo(RepoError),
}

impl RoleServiceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidName => "Please give the role a name",
            Self::InvalidColor(_) => "Please choose a valid color",
            Self::RoleNotFound(_) | Self::UnknownSuggestion(_) => "Failed to update role",
            Self::Repo(_) => "Failed to save role",
        }
    }
}

impl Display for RoleServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "role name must not be blank"),
            Self::InvalidColor(color) => write!(f, "invalid role color `{color}`"),
            Self::RoleNotFound(id) => write!(f, "role not found: {id}"),
            Self::UnknownSuggestion(id) => write!(f, "unknown suggested role `{id}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RoleServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for RoleServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(ValidationError::BlankText { .. }) => Self::InvalidName,
            RepoError::Validation(ValidationError::InvalidColor(color)) => {
                Self::InvalidColor(color)
            }
            RepoError::NotFound { entity: "role", id } => Self::RoleNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Optional presentation fields for a new role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleStyle {
    pub icon: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
}

pub struct RoleService<R: RoleRepository> {
    repo: R,
}

impl<R: RoleRepository> RoleService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a role at the end of the user's list.
    pub fn add_role(
        &self,
        user_id: UserId,
        name: impl Into<String>,
        style: RoleStyle,
    ) -> Result<Role, RoleServiceError> {
        let mut role = Role::new(user_id, name);
        if let Some(icon) = style.icon.filter(|value| !value.trim().is_empty()) {
            role.icon = icon;
        }
        if let Some(color) = style.color {
            role.color = color.trim().to_string();
        }
        role.description = style
            .description
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        role.sort_order = self.repo.next_sort_order(user_id)?;
        self.repo.create_role(&role)?;
        Ok(role)
    }

    /// Creates roles from the builder's suggestion catalog, in order.
    pub fn adopt_suggested_roles(
        &self,
        user_id: UserId,
        suggestion_ids: &[String],
    ) -> Result<Vec<Role>, RoleServiceError> {
        let mut suggestions = Vec::with_capacity(suggestion_ids.len());
        for id in suggestion_ids {
            let suggestion = suggested_role(id.as_str())
                .ok_or_else(|| RoleServiceError::UnknownSuggestion(id.clone()))?;
            suggestions.push(suggestion);
        }

        suggestions
            .into_iter()
            .map(|suggestion| {
                self.add_role(
                    user_id,
                    suggestion.label,
                    RoleStyle {
                        icon: Some(suggestion.icon.to_string()),
                        color: None,
                        description: Some(suggestion.description.to_string()),
                    },
                )
            })
            .collect()
    }

    pub fn list_roles(&self, user_id: UserId) -> Result<Vec<Role>, RoleServiceError> {
        Ok(self.repo.list_roles(user_id)?)
    }

    pub fn rename_role(
        &self,
        user_id: UserId,
        role_id: RoleId,
        name: impl Into<String>,
    ) -> Result<Role, RoleServiceError> {
        let mut role = self
            .repo
            .get_role(user_id, role_id)?
            .ok_or(RoleServiceError::RoleNotFound(role_id))?;
        role.name = name.into().trim().to_string();
        self.repo.update_role(&role)?;
        Ok(role)
    }

    /// Rewrites sort orders so roles list in `ordered_ids` order.
    ///
    /// Every id is resolved before the first write; an unknown id leaves the
    /// stored order untouched.
    pub fn reorder_roles(
        &self,
        user_id: UserId,
        ordered_ids: &[RoleId],
    ) -> Result<Vec<Role>, RoleServiceError> {
        let mut roles = Vec::with_capacity(ordered_ids.len());
        for role_id in ordered_ids {
            let role = self
                .repo
                .get_role(user_id, *role_id)?
                .ok_or(RoleServiceError::RoleNotFound(*role_id))?;
            roles.push(role);
        }

        for (index, mut role) in roles.into_iter().enumerate() {
            role.sort_order = index as i64;
            self.repo.update_role(&role)?;
        }
        self.list_roles(user_id)
    }

    pub fn remove_role(&self, user_id: UserId, role_id: RoleId) -> Result<(), RoleServiceError> {
        Ok(self.repo.delete_role(user_id, role_id)?)
    }
}
