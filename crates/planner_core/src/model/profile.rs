//! Per-user profile row.

use crate::model::validation::{require_text, ValidationError};
use crate::model::{now_epoch_ms, UserId};
use serde::{Deserialize, Serialize};

/// Identity plus display name. One per user, keyed by the user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub email: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Profile {
    pub fn new(id: UserId, email: impl Into<String>, full_name: Option<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            id,
            email: email.into(),
            full_name: full_name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
            avatar_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("email", &self.email)
    }

    /// Name shown in greetings; falls back to the email local part.
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) => name,
            None => self.email.split('@').next().unwrap_or(self.email.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Profile;
    use uuid::Uuid;

    #[test]
    fn display_name_prefers_full_name() {
        let profile = Profile::new(Uuid::new_v4(), "ada@example.com", Some("Ada".into()));
        assert_eq!(profile.display_name(), "Ada");

        let anonymous = Profile::new(Uuid::new_v4(), "ada@example.com", Some("  ".into()));
        assert_eq!(anonymous.full_name, None);
        assert_eq!(anonymous.display_name(), "ada");
    }
}
