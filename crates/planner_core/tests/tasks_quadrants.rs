use chrono::NaiveDate;
use planner_core::db::open_db_in_memory;
use planner_core::model::profile::Profile;
use planner_core::model::task::{Quadrant, Task};
use planner_core::model::UserId;
use planner_core::repo::plan_repo::SqlitePlanRepository;
use planner_core::repo::profile_repo::{ProfileRepository, SqliteProfileRepository};
use planner_core::repo::task_repo::{SqliteTaskRepository, TaskListQuery, TaskRepository};
use planner_core::repo::RepoError;
use planner_core::service::planner_service::{NewItem, PlannedItem, PlannerError, PlannerService};
use rusqlite::Connection;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn create_user(conn: &Connection) -> UserId {
    let user_id = Uuid::new_v4();
    SqliteProfileRepository::new(conn)
        .create_profile(&Profile::new(user_id, "tasks@example.com", None))
        .unwrap();
    user_id
}

fn service(conn: &Connection) -> PlannerService<SqlitePlanRepository<'_>, SqliteTaskRepository<'_>> {
    PlannerService::new(
        SqlitePlanRepository::new(conn),
        SqliteTaskRepository::new(conn),
    )
}

fn task_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM tasks;", [], |row| row.get(0))
        .unwrap()
}

fn rock_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM big_rocks;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn q2_item_becomes_big_rock() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn);
    let planner = service(&conn);
    let today = date(2025, 1, 8);

    let mut item = NewItem::new("Exercise plan", Quadrant::Q2);
    item.scheduled_date = Some(date(2025, 1, 9));
    let created = planner.add_item(user, today, item).unwrap();

    match created {
        PlannedItem::BigRock(rock) => {
            assert_eq!(rock.title, "Exercise plan");
            assert_eq!(rock.scheduled_day, Some(4));
        }
        other => panic!("expected big rock, got {other:?}"),
    }
    assert_eq!(rock_count(&conn), 1);
    assert_eq!(task_count(&conn), 0);
}

#[test]
fn other_quadrants_create_tasks() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn);
    let planner = service(&conn);
    let today = date(2025, 1, 8);

    for quadrant in [Quadrant::Q1, Quadrant::Q3, Quadrant::Q4] {
        let created = planner
            .add_item(user, today, NewItem::new("Chore", quadrant))
            .unwrap();
        assert!(matches!(created, PlannedItem::Task(task) if task.quadrant == quadrant));
    }
    assert_eq!(task_count(&conn), 3);
    assert_eq!(rock_count(&conn), 0);
}

#[test]
fn blank_title_is_rejected_before_writing() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn);
    let err = service(&conn)
        .add_item(user, date(2025, 1, 8), NewItem::new("   ", Quadrant::Q1))
        .unwrap_err();
    assert!(matches!(err, PlannerError::InvalidTitle));
    assert_eq!(err.user_message(), "Please enter a title");
}

#[test]
fn repository_refuses_q2_task_rows() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn);
    let task = Task::new(user, "Sneaky", Quadrant::Q2);
    let err = SqliteTaskRepository::new(&conn).create_task(&task).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn week_listing_keeps_in_range_and_undated_tasks() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn);
    let planner = service(&conn);
    let today = date(2025, 1, 8);

    let mut inside = NewItem::new("Inside", Quadrant::Q1);
    inside.scheduled_date = Some(date(2025, 1, 11));
    let mut outside = NewItem::new("Outside", Quadrant::Q3);
    outside.scheduled_date = Some(date(2025, 1, 12));
    planner.add_item(user, today, inside).unwrap();
    planner.add_item(user, today, outside).unwrap();
    planner
        .add_item(user, today, NewItem::new("Someday", Quadrant::Q4))
        .unwrap();

    let titles: Vec<String> = planner
        .week_tasks(user, today)
        .unwrap()
        .into_iter()
        .map(|task| task.title)
        .collect();
    assert_eq!(titles, vec!["Inside".to_string(), "Someday".to_string()]);

    let all = SqliteTaskRepository::new(&conn)
        .list_tasks(&TaskListQuery::all(user))
        .unwrap();
    assert_eq!(all.len(), 3);
}

#[test]
fn week_tasks_filter_by_quadrant_and_open() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn);
    let planner = service(&conn);
    let today = date(2025, 1, 8);

    let mut ids = Vec::new();
    for (title, quadrant) in [
        ("Call plumber", Quadrant::Q1),
        ("Renew passport", Quadrant::Q1),
        ("Reply to survey", Quadrant::Q3),
    ] {
        let PlannedItem::Task(task) = planner
            .add_item(user, today, NewItem::new(title, quadrant))
            .unwrap()
        else {
            panic!("expected task");
        };
        ids.push(task.id);
    }
    planner.set_task_complete(user, ids[0], true).unwrap();

    let titles = |quadrant, open_only| -> Vec<String> {
        planner
            .filter_week_tasks(user, today, quadrant, open_only)
            .unwrap()
            .into_iter()
            .map(|task| task.title)
            .collect()
    };

    assert_eq!(
        titles(Some(Quadrant::Q1), false),
        vec!["Call plumber".to_string(), "Renew passport".to_string()]
    );
    assert_eq!(titles(Some(Quadrant::Q1), true), vec!["Renew passport".to_string()]);
    assert_eq!(
        titles(None, true),
        vec!["Renew passport".to_string(), "Reply to survey".to_string()]
    );
    assert_eq!(planner.week_tasks(user, today).unwrap().len(), 3);
}

#[test]
fn board_groups_tasks_by_quadrant_and_day() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn);
    let planner = service(&conn);
    let today = date(2025, 1, 8);

    let mut dated = NewItem::new("Call plumber", Quadrant::Q1);
    dated.scheduled_date = Some(today);
    planner.add_item(user, today, dated).unwrap();
    planner
        .add_item(user, today, NewItem::new("Scroll feeds", Quadrant::Q4))
        .unwrap();

    let board = planner.week_board(user, today).unwrap();
    assert_eq!(board.tasks_by_quadrant[&Quadrant::Q1].len(), 1);
    assert_eq!(board.tasks_by_quadrant[&Quadrant::Q4].len(), 1);
    assert!(!board.tasks_by_quadrant.contains_key(&Quadrant::Q2));
    assert_eq!(board.days[3].tasks.len(), 1);
}

#[test]
fn task_completion_is_set_not_flipped() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn);
    let planner = service(&conn);
    let created = planner
        .add_item(user, date(2025, 1, 8), NewItem::new("File taxes", Quadrant::Q1))
        .unwrap();
    let PlannedItem::Task(task) = created else {
        panic!("expected task");
    };

    for _ in 0..3 {
        let stored = planner.set_task_complete(user, task.id, true).unwrap();
        assert!(stored.is_complete);
    }
    let moved = planner
        .schedule_task(user, task.id, Some(date(2025, 1, 10)))
        .unwrap();
    assert_eq!(moved.scheduled_date, Some(date(2025, 1, 10)));
}
