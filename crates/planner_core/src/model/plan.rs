//! Weekly plans and their big rocks.
//!
//! # Invariants
//! - A weekly plan is unique per `(user_id, week_start)`.
//! - `week_start` is always a Sunday produced by `week_start_for`.
//! - `BigRock::scheduled_day`, when set, is an offset `0..=6` from the
//!   owning plan's week start.

use crate::model::validation::{require_text, ValidationError};
use crate::model::week::{date_of_day, week_start_for, DAYS_PER_WEEK};
use crate::model::{now_epoch_ms, percentage, PlanId, RockId, RoleId, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Anchor row for one user's week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyPlan {
    pub id: PlanId,
    pub user_id: UserId,
    pub week_start: NaiveDate,
    /// Free-form end-of-week reflection, stored as JSON text.
    pub reflection: Option<String>,
    pub is_complete: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl WeeklyPlan {
    /// Creates the plan covering `date`'s week.
    pub fn for_date(user_id: UserId, date: NaiveDate) -> Self {
        let now = now_epoch_ms();
        Self {
            id: Uuid::new_v4(),
            user_id,
            week_start: week_start_for(date),
            reflection: None,
            is_complete: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// An important-not-urgent goal for the week (Q2 work).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BigRock {
    pub id: RockId,
    pub weekly_plan_id: PlanId,
    pub role_id: Option<RoleId>,
    pub title: String,
    pub description: Option<String>,
    pub priority: i64,
    pub is_complete: bool,
    pub scheduled_day: Option<u8>,
    pub created_at: i64,
}

impl BigRock {
    /// Creates an unscheduled, incomplete rock on `weekly_plan_id`.
    pub fn new(weekly_plan_id: PlanId, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            weekly_plan_id,
            role_id: None,
            title: title.into().trim().to_string(),
            description: None,
            priority: 0,
            is_complete: false,
            scheduled_day: None,
            created_at: now_epoch_ms(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("big rock title", &self.title)?;
        validate_scheduled_day(self.scheduled_day)
    }

    /// Calendar date this rock is scheduled on, given its plan's week start.
    pub fn scheduled_date(&self, week_start: NaiveDate) -> Option<NaiveDate> {
        self.scheduled_day.and_then(|day| date_of_day(week_start, day))
    }
}

pub fn validate_scheduled_day(day: Option<u8>) -> Result<(), ValidationError> {
    match day {
        Some(value) if value >= DAYS_PER_WEEK => {
            Err(ValidationError::ScheduledDayOutOfRange(value))
        }
        _ => Ok(()),
    }
}

/// Rounded share of completed rocks, `0` when there are none.
pub fn rock_completion(rocks: &[BigRock]) -> u8 {
    let done = rocks.iter().filter(|rock| rock.is_complete).count();
    percentage(done, rocks.len())
}

#[cfg(test)]
mod tests {
    use super::{rock_completion, BigRock, WeeklyPlan};
    use crate::model::validation::ValidationError;
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn plan_for_date_anchors_on_sunday() {
        let plan = WeeklyPlan::for_date(
            Uuid::new_v4(),
            NaiveDate::from_ymd_opt(2025, 1, 8).unwrap(),
        );
        assert_eq!(plan.week_start, NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());
    }

    #[test]
    fn scheduled_day_must_be_within_week() {
        let mut rock = BigRock::new(Uuid::new_v4(), "Call James");
        rock.scheduled_day = Some(6);
        rock.validate().unwrap();

        rock.scheduled_day = Some(7);
        assert_eq!(
            rock.validate(),
            Err(ValidationError::ScheduledDayOutOfRange(7))
        );
    }

    #[test]
    fn scheduled_date_is_offset_from_week_start() {
        let mut rock = BigRock::new(Uuid::new_v4(), "Family dinner");
        rock.scheduled_day = Some(6);
        let start = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(
            rock.scheduled_date(start),
            NaiveDate::from_ymd_opt(2025, 1, 11)
        );
    }

    #[test]
    fn completion_counts_done_rocks() {
        let plan_id = Uuid::new_v4();
        let mut rocks = vec![
            BigRock::new(plan_id, "a"),
            BigRock::new(plan_id, "b"),
            BigRock::new(plan_id, "c"),
        ];
        assert_eq!(rock_completion(&rocks), 0);
        rocks[0].is_complete = true;
        assert_eq!(rock_completion(&rocks), 33);
        assert_eq!(rock_completion(&[]), 0);
    }
}
