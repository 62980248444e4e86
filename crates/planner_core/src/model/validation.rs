//! Write-path validation errors shared by all entities.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Violation of a model invariant detected before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty after trim.
    BlankText { field: &'static str },
    /// Big rock day offset outside `0..=6`.
    ScheduledDayOutOfRange(u8),
    /// Q2 work is modeled as a big rock, never as a task row.
    QuadrantNotTask,
    /// Persisted renewal score outside `0..=10`.
    ScoreOutOfRange { dimension: &'static str, value: i64 },
    /// Color is not a `#rrggbb` hex literal.
    InvalidColor(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankText { field } => write!(f, "{field} must not be blank"),
            Self::ScheduledDayOutOfRange(day) => {
                write!(f, "scheduled day {day} is outside 0..=6")
            }
            Self::QuadrantNotTask => write!(f, "q2 items must be stored as big rocks"),
            Self::ScoreOutOfRange { dimension, value } => {
                write!(f, "{dimension} score {value} is outside 0..=10")
            }
            Self::InvalidColor(value) => write!(f, "invalid color `{value}`"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankText { field });
    }
    Ok(())
}
