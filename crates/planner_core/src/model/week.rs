//! Sunday-anchored week arithmetic.
//!
//! # Invariants
//! - `week_start_for` is pure: every date of a Sunday..Saturday window maps
//!   to the same Sunday.
//! - Day indexes are offsets `0..=6` from the week start.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

/// Number of days in a planning week.
pub const DAYS_PER_WEEK: u8 = 7;

/// One column of the weekly calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekDay {
    pub date: NaiveDate,
    pub day_index: u8,
    /// Short English weekday label (`Sun`..`Sat`).
    pub label: &'static str,
}

/// Returns the most recent Sunday on or before `date`.
pub fn week_start_for(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(NaiveDate::MIN)
}

/// Returns the seven days of the week beginning at `week_start`.
pub fn week_days(week_start: NaiveDate) -> Vec<WeekDay> {
    (0..DAYS_PER_WEEK)
        .filter_map(|day_index| {
            let date = week_start.checked_add_days(Days::new(u64::from(day_index)))?;
            Some(WeekDay {
                date,
                day_index,
                label: short_label(date),
            })
        })
        .collect()
}

/// Maps `date` to its day index when it falls inside the week.
pub fn day_index_of(week_start: NaiveDate, date: NaiveDate) -> Option<u8> {
    let offset = date.signed_duration_since(week_start).num_days();
    if (0..i64::from(DAYS_PER_WEEK)).contains(&offset) {
        u8::try_from(offset).ok()
    } else {
        None
    }
}

/// Returns the calendar date of `day_index` inside the week.
pub fn date_of_day(week_start: NaiveDate, day_index: u8) -> Option<NaiveDate> {
    if day_index >= DAYS_PER_WEEK {
        return None;
    }
    week_start.checked_add_days(Days::new(u64::from(day_index)))
}

/// Last day (Saturday) of the week beginning at `week_start`.
pub fn week_end(week_start: NaiveDate) -> NaiveDate {
    date_of_day(week_start, DAYS_PER_WEEK - 1).unwrap_or(NaiveDate::MAX)
}

fn short_label(date: NaiveDate) -> &'static str {
    match date.weekday().num_days_from_sunday() {
        0 => "Sun",
        1 => "Mon",
        2 => "Tue",
        3 => "Wed",
        4 => "Thu",
        5 => "Fri",
        _ => "Sat",
    }
}

#[cfg(test)]
mod tests {
    use super::{date_of_day, day_index_of, week_days, week_end, week_start_for};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn wednesday_maps_to_previous_sunday() {
        assert_eq!(week_start_for(date(2025, 1, 8)), date(2025, 1, 5));
    }

    #[test]
    fn every_day_of_window_maps_to_same_sunday() {
        let sunday = date(2025, 1, 5);
        for day in 5..=11 {
            assert_eq!(week_start_for(date(2025, 1, day)), sunday);
        }
        assert_eq!(week_start_for(date(2025, 1, 12)), date(2025, 1, 12));
        assert_eq!(week_start_for(date(2025, 1, 4)), date(2024, 12, 29));
    }

    #[test]
    fn week_crosses_year_boundary() {
        assert_eq!(week_start_for(date(2026, 1, 1)), date(2025, 12, 28));
        assert_eq!(week_end(date(2025, 12, 28)), date(2026, 1, 3));
    }

    #[test]
    fn week_days_are_labelled_sunday_first() {
        let days = week_days(date(2025, 1, 5));
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].label, "Sun");
        assert_eq!(days[6].label, "Sat");
        assert_eq!(days[3].date, date(2025, 1, 8));
        assert_eq!(days[3].day_index, 3);
    }

    #[test]
    fn day_index_round_trips_inside_week_only() {
        let start = date(2025, 1, 5);
        assert_eq!(day_index_of(start, date(2025, 1, 8)), Some(3));
        assert_eq!(day_index_of(start, date(2025, 1, 12)), None);
        assert_eq!(day_index_of(start, date(2025, 1, 4)), None);
        assert_eq!(date_of_day(start, 6), Some(date(2025, 1, 11)));
        assert_eq!(date_of_day(start, 7), None);
    }
}
