//! Planning domain model.
//!
//! # Responsibility
//! - Define the canonical records persisted by the table store.
//! - Own the pure derivations over them (week start, quadrant, score
//!   clamping, control ratio, statement composition).
//!
//! # Invariants
//! - Every row is identified by a stable UUID and scoped by a `UserId`.
//! - Derivations never touch storage.

pub mod circle;
pub mod mission;
pub mod plan;
pub mod profile;
pub mod renewal;
pub mod role;
pub mod task;
pub mod validation;
pub mod week;

use chrono::Utc;
use uuid::Uuid;

/// Identity issued by the external identity provider.
pub type UserId = Uuid;
pub type RoleId = Uuid;
pub type PlanId = Uuid;
pub type RockId = Uuid;
pub type TaskId = Uuid;
pub type RenewalLogId = Uuid;
pub type CircleItemId = Uuid;

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Rounded percentage of `part` over `total`; `0` for an empty total.
pub fn percentage(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let value = (part as f64 * 100.0 / total as f64).round();
    value.clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::percentage;

    #[test]
    fn percentage_rounds_and_handles_empty() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(4, 4), 100);
    }
}
