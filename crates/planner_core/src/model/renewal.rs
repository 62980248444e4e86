//! Daily renewal tracking across four self-care dimensions.
//!
//! # Invariants
//! - Each score is independently clamped to `0..=10` on every write path.
//! - At most one log per `(user_id, log_date)`.

use crate::model::{now_epoch_ms, RenewalLogId, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_SCORE: u8 = 0;
pub const MAX_SCORE: u8 = 10;

/// One of the four renewal axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewalDimension {
    Physical,
    Mental,
    Spiritual,
    Social,
}

impl RenewalDimension {
    pub const ALL: [RenewalDimension; 4] = [
        RenewalDimension::Physical,
        RenewalDimension::Mental,
        RenewalDimension::Spiritual,
        RenewalDimension::Social,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Physical => "physical",
            Self::Mental => "mental",
            Self::Spiritual => "spiritual",
            Self::Social => "social",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|dimension| dimension.as_str() == value.trim().to_ascii_lowercase())
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Physical => "Physical",
            Self::Mental => "Mental",
            Self::Spiritual => "Spiritual",
            Self::Social => "Social/Emotional",
        }
    }
}

/// Clamps a raw slider value into `0..=10`.
pub fn clamp_score(raw: i64) -> u8 {
    raw.clamp(i64::from(MIN_SCORE), i64::from(MAX_SCORE)) as u8
}

/// The four scores of one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewalScores {
    pub physical: u8,
    pub mental: u8,
    pub spiritual: u8,
    pub social: u8,
}

impl RenewalScores {
    /// Builds scores from raw input, clamping each dimension.
    pub fn clamped(physical: i64, mental: i64, spiritual: i64, social: i64) -> Self {
        Self {
            physical: clamp_score(physical),
            mental: clamp_score(mental),
            spiritual: clamp_score(spiritual),
            social: clamp_score(social),
        }
    }

    pub fn get(&self, dimension: RenewalDimension) -> u8 {
        match dimension {
            RenewalDimension::Physical => self.physical,
            RenewalDimension::Mental => self.mental,
            RenewalDimension::Spiritual => self.spiritual,
            RenewalDimension::Social => self.social,
        }
    }

    /// Sets one dimension, clamping the raw value.
    pub fn set(&mut self, dimension: RenewalDimension, raw: i64) {
        let value = clamp_score(raw);
        match dimension {
            RenewalDimension::Physical => self.physical = value,
            RenewalDimension::Mental => self.mental = value,
            RenewalDimension::Spiritual => self.spiritual = value,
            RenewalDimension::Social => self.social = value,
        }
    }

    /// Re-applies the clamp to every dimension.
    pub fn normalized(self) -> Self {
        Self::clamped(
            i64::from(self.physical),
            i64::from(self.mental),
            i64::from(self.spiritual),
            i64::from(self.social),
        )
    }
}

/// Optional free-text notes per dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewalNotes {
    pub physical: Option<String>,
    pub mental: Option<String>,
    pub spiritual: Option<String>,
    pub social: Option<String>,
}

impl RenewalNotes {
    pub fn set(&mut self, dimension: RenewalDimension, note: Option<String>) {
        let note = note
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        match dimension {
            RenewalDimension::Physical => self.physical = note,
            RenewalDimension::Mental => self.mental = note,
            RenewalDimension::Spiritual => self.spiritual = note,
            RenewalDimension::Social => self.social = note,
        }
    }
}

/// One user's renewal check-in for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewalLog {
    pub id: RenewalLogId,
    pub user_id: UserId,
    pub log_date: NaiveDate,
    pub scores: RenewalScores,
    pub notes: RenewalNotes,
    pub created_at: i64,
}

impl RenewalLog {
    pub fn new(user_id: UserId, log_date: NaiveDate, scores: RenewalScores) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            log_date,
            scores: scores.normalized(),
            notes: RenewalNotes::default(),
            created_at: now_epoch_ms(),
        }
    }
}

/// Rounded per-dimension means plus the overall mean of those means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenewalAverages {
    pub physical: u8,
    pub mental: u8,
    pub spiritual: u8,
    pub social: u8,
    pub overall: u8,
    pub days_logged: usize,
}

impl RenewalAverages {
    pub fn get(&self, dimension: RenewalDimension) -> u8 {
        match dimension {
            RenewalDimension::Physical => self.physical,
            RenewalDimension::Mental => self.mental,
            RenewalDimension::Spiritual => self.spiritual,
            RenewalDimension::Social => self.social,
        }
    }
}

/// Averages a collection of daily scores; no scores yield all zeros.
pub fn weekly_averages<'a, I>(scores: I) -> RenewalAverages
where
    I: IntoIterator<Item = &'a RenewalScores>,
{
    let mut sums = [0u32; 4];
    let mut count = 0usize;
    for day in scores {
        for (slot, dimension) in sums.iter_mut().zip(RenewalDimension::ALL) {
            *slot += u32::from(day.get(dimension));
        }
        count += 1;
    }

    if count == 0 {
        return RenewalAverages::default();
    }

    let mean = |sum: u32| clamp_score((f64::from(sum) / count as f64).round() as i64);
    let physical = mean(sums[0]);
    let mental = mean(sums[1]);
    let spiritual = mean(sums[2]);
    let social = mean(sums[3]);
    let overall_sum =
        u32::from(physical) + u32::from(mental) + u32::from(spiritual) + u32::from(social);
    let overall = clamp_score((f64::from(overall_sum) / 4.0).round() as i64);

    RenewalAverages {
        physical,
        mental,
        spiritual,
        social,
        overall,
        days_logged: count,
    }
}

/// Human label for a score or average.
pub fn score_label(score: u8) -> &'static str {
    match score {
        8.. => "Excellent!",
        6..=7 => "Good",
        4..=5 => "Fair",
        2..=3 => "Needs attention",
        _ => "Not tracked",
    }
}

/// Weekly coaching hint derived from averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewalInsight {
    SpiritualNeedsAttention,
    StayingActive,
    Balanced,
    FocusOneDimension,
}

impl RenewalInsight {
    pub fn message(self) -> &'static str {
        match self {
            Self::SpiritualNeedsAttention => {
                "Your spiritual dimension could use more attention. Try 10 minutes of meditation tomorrow."
            }
            Self::StayingActive => "Great job staying active this week!",
            Self::Balanced => "You're maintaining good balance across all dimensions.",
            Self::FocusOneDimension => "Consider focusing on one dimension each day this week.",
        }
    }
}

/// Insights that apply to `averages`, in display order.
pub fn insights(averages: &RenewalAverages) -> Vec<RenewalInsight> {
    let mut found = Vec::new();
    if averages.spiritual < 4 {
        found.push(RenewalInsight::SpiritualNeedsAttention);
    }
    if averages.physical >= 7 {
        found.push(RenewalInsight::StayingActive);
    }
    if averages.overall >= 6 {
        found.push(RenewalInsight::Balanced);
    }
    if averages.overall < 5 {
        found.push(RenewalInsight::FocusOneDimension);
    }
    found
}

#[cfg(test)]
mod tests {
    use super::{
        clamp_score, insights, score_label, weekly_averages, RenewalDimension, RenewalInsight,
        RenewalScores,
    };

    #[test]
    fn scores_are_clamped_independently() {
        let scores = RenewalScores::clamped(14, -3, 5, 10);
        assert_eq!(scores.physical, 10);
        assert_eq!(scores.mental, 0);
        assert_eq!(scores.spiritual, 5);
        assert_eq!(scores.social, 10);
        assert_eq!(clamp_score(i64::MAX), 10);
    }

    #[test]
    fn set_clamps_single_dimension() {
        let mut scores = RenewalScores::default();
        scores.set(RenewalDimension::Social, 42);
        assert_eq!(scores.get(RenewalDimension::Social), 10);
        assert_eq!(scores.get(RenewalDimension::Physical), 0);
    }

    #[test]
    fn weekly_averages_round_each_dimension() {
        let week = [
            RenewalScores::clamped(8, 6, 4, 7),
            RenewalScores::clamped(5, 8, 6, 5),
            RenewalScores::clamped(7, 7, 5, 8),
            RenewalScores::clamped(0, 0, 0, 0),
        ];
        let averages = weekly_averages(&week);
        assert_eq!(averages.physical, 5);
        assert_eq!(averages.mental, 5);
        assert_eq!(averages.spiritual, 4);
        assert_eq!(averages.social, 5);
        assert_eq!(averages.overall, 5);
        assert_eq!(averages.days_logged, 4);
    }

    #[test]
    fn weekly_averages_of_nothing_are_zero() {
        let empty: [RenewalScores; 0] = [];
        let averages = weekly_averages(&empty);
        assert_eq!(averages.overall, 0);
        assert_eq!(averages.days_logged, 0);
    }

    #[test]
    fn labels_follow_thresholds() {
        assert_eq!(score_label(10), "Excellent!");
        assert_eq!(score_label(6), "Good");
        assert_eq!(score_label(5), "Fair");
        assert_eq!(score_label(2), "Needs attention");
        assert_eq!(score_label(1), "Not tracked");
    }

    #[test]
    fn insights_for_active_but_unbalanced_week() {
        let averages = weekly_averages(&[RenewalScores::clamped(9, 3, 2, 3)]);
        assert_eq!(
            insights(&averages),
            vec![
                RenewalInsight::SpiritualNeedsAttention,
                RenewalInsight::StayingActive,
                RenewalInsight::FocusOneDimension,
            ]
        );
    }

    #[test]
    fn dimension_parse_matches_as_str() {
        for dimension in RenewalDimension::ALL {
            assert_eq!(RenewalDimension::parse(dimension.as_str()), Some(dimension));
        }
        assert_eq!(RenewalDimension::parse("emotional"), None);
    }
}
