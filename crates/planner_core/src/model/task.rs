//! Eisenhower quadrants and minor action items.
//!
//! # Invariants
//! - Q2 (important, not urgent) work is modeled as `BigRock`; a `Task` row
//!   never carries `Quadrant::Q2`.

use crate::model::validation::{require_text, ValidationError};
use crate::model::{now_epoch_ms, percentage, RockId, TaskId, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Urgency/importance bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quadrant {
    /// Urgent and important.
    Q1,
    /// Important, not urgent.
    Q2,
    /// Urgent, not important.
    Q3,
    /// Neither urgent nor important.
    Q4,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [Quadrant::Q1, Quadrant::Q2, Quadrant::Q3, Quadrant::Q4];

    /// Maps the two Eisenhower flags to a quadrant.
    pub fn classify(urgent: bool, important: bool) -> Self {
        match (urgent, important) {
            (true, true) => Self::Q1,
            (false, true) => Self::Q2,
            (true, false) => Self::Q3,
            (false, false) => Self::Q4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Q1 => "q1",
            Self::Q2 => "q2",
            Self::Q3 => "q3",
            Self::Q4 => "q4",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "q1" => Some(Self::Q1),
            "q2" => Some(Self::Q2),
            "q3" => Some(Self::Q3),
            "q4" => Some(Self::Q4),
            _ => None,
        }
    }

    pub fn is_urgent(self) -> bool {
        matches!(self, Self::Q1 | Self::Q3)
    }

    pub fn is_important(self) -> bool {
        matches!(self, Self::Q1 | Self::Q2)
    }

    /// Whether items of this quadrant are stored as big rocks.
    pub fn is_big_rock(self) -> bool {
        self == Self::Q2
    }
}

/// Minor action item, independent of a weekly plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub user_id: UserId,
    /// Optional link to the rock this task supports.
    pub big_rock_id: Option<RockId>,
    pub title: String,
    pub quadrant: Quadrant,
    pub scheduled_date: Option<NaiveDate>,
    pub is_complete: bool,
    pub created_at: i64,
}

impl Task {
    pub fn new(user_id: UserId, title: impl Into<String>, quadrant: Quadrant) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            big_rock_id: None,
            title: title.into().trim().to_string(),
            quadrant,
            scheduled_date: None,
            is_complete: false,
            created_at: now_epoch_ms(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("task title", &self.title)?;
        if self.quadrant.is_big_rock() {
            return Err(ValidationError::QuadrantNotTask);
        }
        Ok(())
    }
}

/// Rounded share of completed tasks, `0` when there are none.
pub fn task_completion(tasks: &[Task]) -> u8 {
    let done = tasks.iter().filter(|task| task.is_complete).count();
    percentage(done, tasks.len())
}
