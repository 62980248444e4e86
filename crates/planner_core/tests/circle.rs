use planner_core::db::open_db_in_memory;
use planner_core::model::circle::CircleCategory;
use planner_core::model::profile::Profile;
use planner_core::model::UserId;
use planner_core::repo::circle_repo::SqliteCircleRepository;
use planner_core::repo::profile_repo::{ProfileRepository, SqliteProfileRepository};
use planner_core::service::circle_service::{CircleError, CircleService};
use rusqlite::Connection;
use uuid::Uuid;

fn create_user(conn: &Connection) -> UserId {
    let user_id = Uuid::new_v4();
    SqliteProfileRepository::new(conn)
        .create_profile(&Profile::new(user_id, "circle@example.com", None))
        .unwrap();
    user_id
}

#[test]
fn board_splits_items_and_reports_ratio() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn);
    let circle = CircleService::new(SqliteCircleRepository::new(&conn));

    circle
        .add_item(user, "My exercise habit", CircleCategory::Control)
        .unwrap();
    circle
        .add_item(user, "The weather", CircleCategory::NoControl)
        .unwrap();
    circle
        .add_item(user, "The economy", CircleCategory::NoControl)
        .unwrap();

    let board = circle.board(user).unwrap();
    assert_eq!(board.control.len(), 1);
    assert_eq!(board.no_control.len(), 2);
    assert_eq!(board.summary.control_percentage, 33);
}

#[test]
fn moving_item_changes_category() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn);
    let circle = CircleService::new(SqliteCircleRepository::new(&conn));
    let item = circle
        .add_item(user, "My reaction to news", CircleCategory::NoControl)
        .unwrap();

    circle
        .move_item(user, item.id, CircleCategory::Control)
        .unwrap();
    let board = circle.board(user).unwrap();
    assert_eq!(board.control[0].id, item.id);
    assert_eq!(board.summary.control_percentage, 100);
}

#[test]
fn blank_item_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn);
    let err = CircleService::new(SqliteCircleRepository::new(&conn))
        .add_item(user, "  ", CircleCategory::Control)
        .unwrap_err();
    assert!(matches!(err, CircleError::EmptyItem));
}

#[test]
fn removing_foreign_item_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let owner = create_user(&conn);
    let circle = CircleService::new(SqliteCircleRepository::new(&conn));
    let item = circle
        .add_item(owner, "Sleep schedule", CircleCategory::Control)
        .unwrap();

    let err = circle.remove_item(Uuid::new_v4(), item.id).unwrap_err();
    assert!(matches!(err, CircleError::ItemNotFound(id) if id == item.id));

    circle.remove_item(owner, item.id).unwrap();
    assert_eq!(circle.board(owner).unwrap().summary.total(), 0);
}
