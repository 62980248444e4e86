//! Circle of control: concerns sorted by whether they can be influenced.

use crate::model::validation::{require_text, ValidationError};
use crate::model::{now_epoch_ms, percentage, CircleItemId, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persisted classification of a concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircleCategory {
    Control,
    NoControl,
}

impl CircleCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Control => "control",
            Self::NoControl => "no_control",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "control" => Some(Self::Control),
            "no_control" | "no-control" => Some(Self::NoControl),
            _ => None,
        }
    }
}

/// A worry or concern tagged as controllable or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircleItem {
    pub id: CircleItemId,
    pub user_id: UserId,
    pub item: String,
    pub category: CircleCategory,
    pub created_at: i64,
}

impl CircleItem {
    pub fn new(user_id: UserId, item: impl Into<String>, category: CircleCategory) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            item: item.into().trim().to_string(),
            category,
            created_at: now_epoch_ms(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("circle item", &self.item)
    }
}

/// Control-versus-concern counts over a sorting board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ControlSummary {
    pub control: usize,
    pub no_control: usize,
    /// Entered but not yet sorted.
    pub unassigned: usize,
    /// Rounded share of `control` over every item, unassigned included.
    pub control_percentage: u8,
}

impl ControlSummary {
    pub fn from_counts(control: usize, no_control: usize, unassigned: usize) -> Self {
        Self {
            control,
            no_control,
            unassigned,
            control_percentage: percentage(control, control + no_control + unassigned),
        }
    }

    pub fn total(&self) -> usize {
        self.control + self.no_control + self.unassigned
    }
}

/// Summarizes persisted items (which are always sorted).
pub fn summarize(items: &[CircleItem]) -> ControlSummary {
    let control = items
        .iter()
        .filter(|item| item.category == CircleCategory::Control)
        .count();
    ControlSummary::from_counts(control, items.len() - control, 0)
}

#[cfg(test)]
mod tests {
    use super::{summarize, CircleCategory, CircleItem, ControlSummary};
    use uuid::Uuid;

    #[test]
    fn one_of_three_is_thirty_three_percent() {
        let user = Uuid::new_v4();
        let items = vec![
            CircleItem::new(user, "My reaction", CircleCategory::Control),
            CircleItem::new(user, "The weather", CircleCategory::NoControl),
            CircleItem::new(user, "The economy", CircleCategory::NoControl),
        ];
        let summary = summarize(&items);
        assert_eq!(summary.control, 1);
        assert_eq!(summary.no_control, 2);
        assert_eq!(summary.control_percentage, 33);
    }

    #[test]
    fn empty_board_is_zero_and_unassigned_counts_toward_total() {
        assert_eq!(summarize(&[]).control_percentage, 0);
        let summary = ControlSummary::from_counts(1, 0, 1);
        assert_eq!(summary.control_percentage, 50);
        assert_eq!(summary.total(), 2);
    }

    #[test]
    fn category_parse_accepts_storage_names() {
        assert_eq!(CircleCategory::parse("no_control"), Some(CircleCategory::NoControl));
        assert_eq!(CircleCategory::parse("Control"), Some(CircleCategory::Control));
        assert_eq!(CircleCategory::parse("unassigned"), None);
    }
}
