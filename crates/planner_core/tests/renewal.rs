use chrono::NaiveDate;
use planner_core::db::open_db_in_memory;
use planner_core::model::profile::Profile;
use planner_core::model::renewal::{RenewalDimension, RenewalInsight, RenewalScores};
use planner_core::model::UserId;
use planner_core::repo::profile_repo::{ProfileRepository, SqliteProfileRepository};
use planner_core::repo::renewal_repo::SqliteRenewalRepository;
use planner_core::service::renewal_service::{RenewalEntry, RenewalService};
use rusqlite::Connection;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn create_user(conn: &Connection) -> UserId {
    let user_id = Uuid::new_v4();
    SqliteProfileRepository::new(conn)
        .create_profile(&Profile::new(user_id, "renewal@example.com", None))
        .unwrap();
    user_id
}

fn entry(physical: i64, mental: i64, spiritual: i64, social: i64) -> RenewalEntry {
    RenewalEntry {
        physical,
        mental,
        spiritual,
        social,
        notes: Vec::new(),
    }
}

#[test]
fn scores_are_clamped_on_write() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn);
    let renewal = RenewalService::new(SqliteRenewalRepository::new(&conn));

    let stored = renewal
        .log_day(user, date(2025, 1, 8), entry(14, -3, 5, 10))
        .unwrap();
    assert_eq!(
        stored.scores,
        RenewalScores {
            physical: 10,
            mental: 0,
            spiritual: 5,
            social: 10,
        }
    );
}

#[test]
fn second_log_same_day_replaces_first() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn);
    let renewal = RenewalService::new(SqliteRenewalRepository::new(&conn));
    let day = date(2025, 1, 8);

    let first = renewal.log_day(user, day, entry(2, 2, 2, 2)).unwrap();
    let mut update = entry(8, 7, 6, 5);
    update
        .notes
        .push((RenewalDimension::Physical, "Morning run".to_string()));
    let second = renewal.log_day(user, day, update).unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.scores.physical, 8);
    assert_eq!(second.notes.physical.as_deref(), Some("Morning run"));
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM renewal_logs;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn missing_day_reads_as_zeros() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn);
    let renewal = RenewalService::new(SqliteRenewalRepository::new(&conn));
    assert_eq!(
        renewal.day_scores(user, date(2025, 1, 8)).unwrap(),
        RenewalScores::default()
    );
}

#[test]
fn week_summary_averages_only_this_week() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn);
    let renewal = RenewalService::new(SqliteRenewalRepository::new(&conn));

    renewal
        .log_day(user, date(2025, 1, 5), entry(8, 6, 2, 6))
        .unwrap();
    renewal
        .log_day(user, date(2025, 1, 6), entry(7, 7, 3, 7))
        .unwrap();
    // Previous week; must not count.
    renewal
        .log_day(user, date(2025, 1, 4), entry(0, 0, 0, 0))
        .unwrap();

    let summary = renewal.week_summary(user, date(2025, 1, 8)).unwrap();
    assert_eq!(summary.week_start, date(2025, 1, 5));
    assert_eq!(summary.averages.days_logged, 2);
    assert_eq!(summary.averages.physical, 8);
    assert_eq!(summary.averages.spiritual, 3);
    assert!(summary
        .insights
        .contains(&RenewalInsight::SpiritualNeedsAttention));
    assert!(summary.insights.contains(&RenewalInsight::StayingActive));
    assert_eq!(summary.insights.len(), summary.messages.len());
}

#[test]
fn empty_week_summarizes_to_zeros() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn);
    let renewal = RenewalService::new(SqliteRenewalRepository::new(&conn));

    let summary = renewal.week_summary(user, date(2025, 1, 8)).unwrap();
    assert_eq!(summary.averages.overall, 0);
    assert_eq!(summary.overall_rating, "Not tracked");
}
