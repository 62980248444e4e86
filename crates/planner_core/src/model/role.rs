//! User-defined life roles.

use crate::model::validation::{require_text, ValidationError};
use crate::model::{now_epoch_ms, RoleId, UserId};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_ROLE_ICON: &str = "👤";
pub const DEFAULT_ROLE_COLOR: &str = "#6366f1";

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid color regex"));

/// A life role such as "Parent" or "Professional". Many per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub icon: String,
    pub color: String,
    /// Listing order; ties are broken by `created_at`.
    pub sort_order: i64,
    pub created_at: i64,
}

impl Role {
    /// Creates a role with default icon/color and `sort_order = 0`.
    pub fn new(user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into().trim().to_string(),
            description: None,
            icon: DEFAULT_ROLE_ICON.to_string(),
            color: DEFAULT_ROLE_COLOR.to_string(),
            sort_order: 0,
            created_at: now_epoch_ms(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("role name", &self.name)?;
        if !HEX_COLOR_RE.is_match(&self.color) {
            return Err(ValidationError::InvalidColor(self.color.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Role, DEFAULT_ROLE_COLOR};
    use crate::model::validation::ValidationError;
    use uuid::Uuid;

    #[test]
    fn new_role_uses_defaults_and_validates() {
        let role = Role::new(Uuid::new_v4(), "  Parent ");
        assert_eq!(role.name, "Parent");
        assert_eq!(role.color, DEFAULT_ROLE_COLOR);
        role.validate().unwrap();
    }

    #[test]
    fn rejects_blank_name_and_bad_color() {
        let blank = Role::new(Uuid::new_v4(), "   ");
        assert!(matches!(
            blank.validate(),
            Err(ValidationError::BlankText { .. })
        ));

        let mut colored = Role::new(Uuid::new_v4(), "Friend");
        colored.color = "green".to_string();
        assert_eq!(
            colored.validate(),
            Err(ValidationError::InvalidColor("green".to_string()))
        );
    }
}
