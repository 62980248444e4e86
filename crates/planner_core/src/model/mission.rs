//! Personal mission statement and its guided builder inputs.
//!
//! # Invariants
//! - One evolving statement per user; saving replaces the current document.
//! - Value tags are catalog ids; unknown ids are dropped when composing.

use crate::model::{now_epoch_ms, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Selectable core value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoreValue {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

/// Role offered by the builder before the user defines their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SuggestedRole {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

pub const CORE_VALUES: &[CoreValue] = &[
    CoreValue {
        id: "integrity",
        label: "Integrity",
        icon: "🛡️",
    },
    CoreValue {
        id: "family",
        label: "Family",
        icon: "👨‍👩‍👧‍👦",
    },
    CoreValue {
        id: "growth",
        label: "Growth",
        icon: "🌱",
    },
    CoreValue {
        id: "creativity",
        label: "Creativity",
        icon: "🎨",
    },
    CoreValue {
        id: "health",
        label: "Health",
        icon: "💪",
    },
    CoreValue {
        id: "wisdom",
        label: "Wisdom",
        icon: "📚",
    },
    CoreValue {
        id: "service",
        label: "Service",
        icon: "🤝",
    },
    CoreValue {
        id: "adventure",
        label: "Adventure",
        icon: "🏔️",
    },
    CoreValue {
        id: "freedom",
        label: "Freedom",
        icon: "🦅",
    },
    CoreValue {
        id: "love",
        label: "Love",
        icon: "❤️",
    },
    CoreValue {
        id: "faith",
        label: "Faith",
        icon: "✨",
    },
    CoreValue {
        id: "excellence",
        label: "Excellence",
        icon: "🏆",
    },
    CoreValue {
        id: "balance",
        label: "Balance",
        icon: "⚖️",
    },
    CoreValue {
        id: "loyalty",
        label: "Loyalty",
        icon: "🤞",
    },
    CoreValue {
        id: "courage",
        label: "Courage",
        icon: "🦁",
    },
    CoreValue {
        id: "compassion",
        label: "Compassion",
        icon: "💝",
    },
];

pub const SUGGESTED_ROLES: &[SuggestedRole] = &[
    SuggestedRole {
        id: "self",
        label: "Individual/Self",
        icon: "🧘",
        description: "Personal growth and self-care",
    },
    SuggestedRole {
        id: "parent",
        label: "Parent",
        icon: "👨‍👧",
        description: "Raising and nurturing children",
    },
    SuggestedRole {
        id: "spouse",
        label: "Spouse/Partner",
        icon: "💑",
        description: "Relationship with significant other",
    },
    SuggestedRole {
        id: "professional",
        label: "Professional",
        icon: "💼",
        description: "Career and work responsibilities",
    },
    SuggestedRole {
        id: "friend",
        label: "Friend",
        icon: "🤝",
        description: "Maintaining meaningful friendships",
    },
    SuggestedRole {
        id: "son_daughter",
        label: "Son/Daughter",
        icon: "👨‍👩‍👧",
        description: "Relationship with parents",
    },
    SuggestedRole {
        id: "community",
        label: "Community Member",
        icon: "🏘️",
        description: "Contributing to community",
    },
    SuggestedRole {
        id: "student",
        label: "Student/Learner",
        icon: "📖",
        description: "Continuous learning and growth",
    },
];

const CLOSING_COMMITMENT: &str = "I commit to living proactively, focusing on what I can control, \
and putting first things first in service of this mission.";

pub fn core_value(id: &str) -> Option<&'static CoreValue> {
    CORE_VALUES.iter().find(|value| value.id == id)
}

pub fn suggested_role(id: &str) -> Option<&'static SuggestedRole> {
    SUGGESTED_ROLES.iter().find(|role| role.id == id)
}

/// Catalog ids are lowercase; user input is matched after trimming.
pub fn normalize_catalog_id(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// Display name for a role typed by the user: the catalog label when the
/// text names a suggested role, otherwise the trimmed text.
pub fn role_display_name(raw: &str) -> String {
    match suggested_role(&normalize_catalog_id(raw)) {
        Some(role) => role.label.to_string(),
        None => raw.trim().to_string(),
    }
}

/// A role paired with what the user commits to in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGoal {
    pub role: String,
    pub goal: String,
}

impl RoleGoal {
    pub fn new(role: impl Into<String>, goal: impl Into<String>) -> Self {
        Self {
            role: role.into().trim().to_string(),
            goal: goal.into().trim().to_string(),
        }
    }
}

/// The user's current mission document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionStatement {
    pub id: Uuid,
    pub user_id: UserId,
    pub statement: String,
    /// Selected core value ids.
    pub values: Vec<String>,
    /// Role-goal pairs.
    pub principles: Vec<RoleGoal>,
    pub legacy: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl MissionStatement {
    pub fn new(user_id: UserId, statement: impl Into<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            id: Uuid::new_v4(),
            user_id,
            statement: statement.into(),
            values: Vec::new(),
            principles: Vec::new(),
            legacy: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Composes the statement text from builder answers.
pub fn compose_statement(
    value_ids: &[String],
    role_goals: &[RoleGoal],
    legacy: Option<&str>,
) -> String {
    let labels = value_ids
        .iter()
        .filter_map(|id| core_value(id.as_str()))
        .map(|value| value.label)
        .collect::<Vec<_>>()
        .join(", ");
    let values_line = if labels.is_empty() {
        "[your values]".to_string()
    } else {
        labels
    };

    let roles_summary = role_goals
        .iter()
        .filter(|entry| !entry.goal.trim().is_empty())
        .map(|entry| format!("As a {}, I will {}", entry.role.trim(), entry.goal.trim()))
        .collect::<Vec<_>>()
        .join(". ");
    let roles_line = if roles_summary.is_empty() {
        "I commit to excellence in all my roles.".to_string()
    } else {
        roles_summary
    };

    let legacy_line = legacy
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or("[what you want to be remembered for]");

    format!(
        "My Personal Mission Statement\n\n\
         I am guided by the values of {values_line}.\n\n\
         {roles_line}\n\n\
         My legacy: {legacy_line}\n\n\
         {CLOSING_COMMITMENT}"
    )
}

#[cfg(test)]
mod tests {
    use super::{
        compose_statement, core_value, role_display_name, suggested_role, RoleGoal, CORE_VALUES,
    };

    #[test]
    fn catalog_lookups() {
        assert_eq!(CORE_VALUES.len(), 16);
        assert_eq!(core_value("growth").map(|value| value.label), Some("Growth"));
        assert!(core_value("greed").is_none());
        assert_eq!(
            suggested_role("professional").map(|role| role.label),
            Some("Professional")
        );
    }

    #[test]
    fn role_names_resolve_to_catalog_labels() {
        assert_eq!(role_display_name("professional"), "Professional");
        assert_eq!(role_display_name(" Parent "), "Parent");
        assert_eq!(role_display_name("self"), "Individual/Self");
        assert_eq!(role_display_name("  Coach "), "Coach");
    }

    #[test]
    fn compose_uses_placeholders_when_empty() {
        let text = compose_statement(&[], &[], None);
        assert!(text.starts_with("My Personal Mission Statement\n\n"));
        assert!(text.contains("I am guided by the values of [your values]."));
        assert!(text.contains("I commit to excellence in all my roles."));
        assert!(text.contains("My legacy: [what you want to be remembered for]"));
        assert!(text.ends_with("in service of this mission."));
    }

    #[test]
    fn compose_joins_values_and_goals() {
        let values = vec![
            "integrity".to_string(),
            "bogus".to_string(),
            "family".to_string(),
        ];
        let goals = vec![
            RoleGoal::new("Professional", "deliver excellent work"),
            RoleGoal::new("Friend", "  "),
            RoleGoal::new("Parent", "be present and nurturing"),
        ];
        let text = compose_statement(&values, &goals, Some("a kind person"));
        assert!(text.contains("I am guided by the values of Integrity, Family."));
        assert!(text.contains(
            "As a Professional, I will deliver excellent work. \
             As a Parent, I will be present and nurturing"
        ));
        assert!(!text.contains("Friend"));
        assert!(text.contains("My legacy: a kind person"));
    }
}
