use planner_core::db::migrations::latest_version;
use planner_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

const TABLES: [&str; 8] = [
    "profiles",
    "mission_statements",
    "roles",
    "weekly_plans",
    "big_rocks",
    "tasks",
    "renewal_logs",
    "circle_items",
];

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in TABLES {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn reopening_file_database_keeps_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planner.sqlite3");

    let first = open_db(&path).unwrap();
    assert_eq!(schema_version(&first), latest_version());
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second), latest_version());
    assert_table_exists(&second, "weekly_plans");
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn schema_rejects_out_of_range_scores_and_days() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO profiles (id, email, created_at, updated_at) VALUES ('u1', 'a@b.co', 0, 0);",
        [],
    )
    .unwrap();

    let score = conn.execute(
        "INSERT INTO renewal_logs (id, user_id, log_date, physical, created_at)
         VALUES ('r1', 'u1', '2025-01-05', 11, 0);",
        [],
    );
    assert!(score.is_err());

    conn.execute(
        "INSERT INTO weekly_plans (id, user_id, week_start, created_at, updated_at)
         VALUES ('p1', 'u1', '2025-01-05', 0, 0);",
        [],
    )
    .unwrap();
    let day = conn.execute(
        "INSERT INTO big_rocks (id, weekly_plan_id, title, scheduled_day, created_at)
         VALUES ('b1', 'p1', 'Rock', 7, 0);",
        [],
    );
    assert!(day.is_err());
}

#[test]
fn foreign_keys_are_enforced() {
    let conn = open_db_in_memory().unwrap();
    let orphan = conn.execute(
        "INSERT INTO roles (id, user_id, name, icon, color, created_at)
         VALUES ('r1', 'missing', 'Parent', 'x', '#000000', 0);",
        [],
    );
    assert!(orphan.is_err());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
