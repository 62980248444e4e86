use planner_core::db::open_db_in_memory;
use planner_core::model::mission::RoleGoal;
use planner_core::model::profile::Profile;
use planner_core::model::role::{DEFAULT_ROLE_COLOR, DEFAULT_ROLE_ICON};
use planner_core::model::UserId;
use planner_core::repo::mission_repo::SqliteMissionRepository;
use planner_core::repo::profile_repo::{ProfileRepository, SqliteProfileRepository};
use planner_core::repo::role_repo::SqliteRoleRepository;
use planner_core::service::mission_service::{MissionAnswers, MissionError, MissionService};
use planner_core::service::role_service::{RoleService, RoleServiceError, RoleStyle};
use rusqlite::Connection;
use uuid::Uuid;

fn create_user(conn: &Connection) -> UserId {
    let user_id = Uuid::new_v4();
    SqliteProfileRepository::new(conn)
        .create_profile(&Profile::new(user_id, "mission@example.com", None))
        .unwrap();
    user_id
}

#[test]
fn roles_append_in_creation_order_with_defaults() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn);
    let roles = RoleService::new(SqliteRoleRepository::new(&conn));

    roles.add_role(user, "Parent", RoleStyle::default()).unwrap();
    roles
        .add_role(
            user,
            "Friend",
            RoleStyle {
                color: Some("#10b981".to_string()),
                ..RoleStyle::default()
            },
        )
        .unwrap();

    let listed = roles.list_roles(user).unwrap();
    let names: Vec<&str> = listed.iter().map(|role| role.name.as_str()).collect();
    assert_eq!(names, ["Parent", "Friend"]);
    assert_eq!(listed[0].icon, DEFAULT_ROLE_ICON);
    assert_eq!(listed[0].color, DEFAULT_ROLE_COLOR);
    assert!(listed[1].sort_order > listed[0].sort_order);
}

#[test]
fn reorder_rewrites_sort_order() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn);
    let roles = RoleService::new(SqliteRoleRepository::new(&conn));
    let first = roles.add_role(user, "Parent", RoleStyle::default()).unwrap();
    let second = roles.add_role(user, "Leader", RoleStyle::default()).unwrap();

    let listed = roles.reorder_roles(user, &[second.id, first.id]).unwrap();
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
}

#[test]
fn reorder_with_unknown_id_changes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn);
    let roles = RoleService::new(SqliteRoleRepository::new(&conn));
    let first = roles.add_role(user, "Parent", RoleStyle::default()).unwrap();
    let second = roles.add_role(user, "Leader", RoleStyle::default()).unwrap();
    let before: Vec<i64> = roles
        .list_roles(user)
        .unwrap()
        .iter()
        .map(|role| role.sort_order)
        .collect();

    let missing = Uuid::new_v4();
    let err = roles
        .reorder_roles(user, &[second.id, missing, first.id])
        .unwrap_err();
    assert!(matches!(err, RoleServiceError::RoleNotFound(id) if id == missing));

    let listed = roles.list_roles(user).unwrap();
    assert_eq!(listed[0].id, first.id);
    assert_eq!(listed[1].id, second.id);
    let after: Vec<i64> = listed.iter().map(|role| role.sort_order).collect();
    assert_eq!(after, before);
}

#[test]
fn invalid_color_and_unknown_suggestion_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn);
    let roles = RoleService::new(SqliteRoleRepository::new(&conn));

    let err = roles
        .add_role(
            user,
            "Parent",
            RoleStyle {
                color: Some("purple".to_string()),
                ..RoleStyle::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, RoleServiceError::InvalidColor(_)));

    let err = roles
        .adopt_suggested_roles(user, &["astronaut".to_string()])
        .unwrap_err();
    assert!(matches!(err, RoleServiceError::UnknownSuggestion(_)));
    assert!(roles.list_roles(user).unwrap().is_empty());
}

#[test]
fn adopting_suggestions_copies_catalog_fields() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn);
    let roles = RoleService::new(SqliteRoleRepository::new(&conn));

    let adopted = roles
        .adopt_suggested_roles(user, &["parent".to_string(), "self".to_string()])
        .unwrap();
    assert_eq!(adopted[0].name, "Parent");
    assert_eq!(adopted[1].name, "Individual/Self");
    assert_eq!(
        adopted[0].description.as_deref(),
        Some("Raising and nurturing children")
    );
}

#[test]
fn mission_save_composes_and_upserts() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn);
    let missions = MissionService::new(SqliteMissionRepository::new(&conn));

    let answers = MissionAnswers {
        legacy: Some("A kind and present father".to_string()),
        values: vec!["integrity".to_string(), "family".to_string()],
        role_goals: vec![
            RoleGoal::new("Parent", "be present every evening"),
            RoleGoal::new("Friend", "   "),
        ],
        statement: None,
    };
    let first = missions.save(user, answers).unwrap();
    assert!(first
        .statement
        .contains("I am guided by the values of Integrity, Family."));
    assert!(first
        .statement
        .contains("As a Parent, I will be present every evening"));
    assert_eq!(first.principles.len(), 1);

    let edited = MissionAnswers {
        statement: Some("Live simply.".to_string()),
        ..MissionAnswers::default()
    };
    let second = missions.save(user, edited).unwrap();
    assert_eq!(second.id, first.id);

    let stored = missions.get_mission(user).unwrap().unwrap();
    assert_eq!(stored.statement, "Live simply.");
    assert!(stored.values.is_empty());
}

#[test]
fn unknown_value_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn);
    let missions = MissionService::new(SqliteMissionRepository::new(&conn));
    let answers = MissionAnswers {
        values: vec!["wealth".to_string()],
        ..MissionAnswers::default()
    };
    let err = missions.save(user, answers).unwrap_err();
    assert!(matches!(err, MissionError::UnknownValue(value) if value == "wealth"));
    assert!(missions.get_mission(user).unwrap().is_none());
}

#[test]
fn draft_uses_placeholders_when_empty() {
    let conn = open_db_in_memory().unwrap();
    let missions = MissionService::new(SqliteMissionRepository::new(&conn));
    let text = missions.draft(&MissionAnswers::default());
    assert!(text.contains("[your values]"));
    assert!(text.contains("I commit to excellence in all my roles."));
    assert!(text.contains("[what you want to be remembered for]"));
}

#[test]
fn draft_matches_value_ids_like_save() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn);
    let missions = MissionService::new(SqliteMissionRepository::new(&conn));
    let answers = MissionAnswers {
        values: vec![" Integrity".to_string(), "FAMILY".to_string()],
        ..MissionAnswers::default()
    };

    let draft = missions.draft(&answers);
    assert!(draft.contains("I am guided by the values of Integrity, Family."));

    let saved = missions.save(user, answers).unwrap();
    assert_eq!(saved.statement, draft);
}
