//! Subcommand handlers.

use crate::config::PlannerConfig;
use crate::identity::LocalIdentity;
use crate::{
    CircleCommand, Command, MissionArgs, MissionCommand, RenewalCommand, RockCommand,
    RolesCommand, TaskCommand, WeekCommand,
};
use chrono::NaiveDate;
use log::info;
use planner_core::board::{BoardError, BoardMutation, PlannerBoard, StoreWriter};
use planner_core::db::migrations::latest_version;
use planner_core::model::circle::CircleCategory;
use planner_core::model::mission::{role_display_name, RoleGoal, CORE_VALUES, SUGGESTED_ROLES};
use planner_core::model::renewal::RenewalDimension;
use planner_core::model::UserId;
use planner_core::repo::circle_repo::SqliteCircleRepository;
use planner_core::repo::mission_repo::SqliteMissionRepository;
use planner_core::repo::plan_repo::SqlitePlanRepository;
use planner_core::repo::profile_repo::SqliteProfileRepository;
use planner_core::repo::renewal_repo::SqliteRenewalRepository;
use planner_core::repo::role_repo::SqliteRoleRepository;
use planner_core::repo::task_repo::SqliteTaskRepository;
use planner_core::service::account_service::{AccountService, SignUpRequest};
use planner_core::service::circle_service::CircleService;
use planner_core::service::dashboard::{build_dashboard, DashboardSources};
use planner_core::service::mission_service::{MissionAnswers, MissionService};
use planner_core::service::planner_service::{NewItem, PlannerService};
use planner_core::service::renewal_service::{RenewalEntry, RenewalService};
use planner_core::service::role_service::{RoleService, RoleStyle};
use planner_core::{open_db, Connection, Quadrant};
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt::Display;

/// Failure shown to the user, with a stable code for the log.
#[derive(Debug)]
pub struct CliError {
    pub code: &'static str,
    pub message: String,
}

impl CliError {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Maps a service error to its form message.
fn fail<E: Display>(code: &'static str, message: impl Into<String>) -> impl FnOnce(E) -> CliError {
    let message = message.into();
    move |err| {
        log::debug!("event=cli_command module=cli status=error error_code={code} detail={err}");
        CliError::new(code, message)
    }
}

type CliResult = Result<Value, CliError>;

pub fn parse_quadrant(value: &str) -> Result<Quadrant, String> {
    Quadrant::parse(value).ok_or_else(|| format!("unknown quadrant `{value}`; expected q1..q4"))
}

pub fn parse_category(value: &str) -> Result<CircleCategory, String> {
    CircleCategory::parse(value)
        .ok_or_else(|| format!("unknown category `{value}`; expected control|no_control"))
}

pub fn run(config: &PlannerConfig, command: Command) -> CliResult {
    let conn = open_db(&config.db_path).map_err(fail("db_open", "Failed to open database"))?;
    info!(
        "event=cli_command module=cli status=start command={}",
        command_name(&command)
    );

    match command {
        Command::Init => Ok(json!({
            "db": config.db_path.display().to_string(),
            "schema_version": latest_version(),
        })),
        Command::Signup {
            email,
            password,
            confirm,
            name,
        } => {
            let accounts = AccountService::new(SqliteProfileRepository::new(&conn));
            let identity = LocalIdentity::new(SqliteProfileRepository::new(&conn));
            let request = SignUpRequest {
                full_name: name,
                email,
                password,
                confirm_password: confirm,
            };
            let profile = accounts
                .sign_up(&identity, request)
                .map_err(|err| CliError::new("sign_up", err.user_message()))?;
            to_json(&profile)
        }
        Command::Login { email, password } => {
            let accounts = AccountService::new(SqliteProfileRepository::new(&conn));
            let identity = LocalIdentity::new(SqliteProfileRepository::new(&conn));
            let (session, profile) = accounts
                .sign_in(&identity, &email, &password)
                .map_err(|err| CliError::new("sign_in", err.user_message()))?;
            Ok(json!({ "user_id": session.user_id, "profile": profile }))
        }
        Command::Profile { name } => {
            let user_id = require_user(config)?;
            let accounts = AccountService::new(SqliteProfileRepository::new(&conn));
            let profile = match name {
                Some(name) => accounts.update_full_name(user_id, Some(name)).map(Some),
                None => accounts.get_profile(user_id),
            }
            .map_err(|err| CliError::new("profile", err.user_message()))?;
            to_json(&profile)
        }
        Command::Roles(command) => run_roles(&conn, require_user(config)?, command),
        Command::Mission(command) => run_mission(&conn, require_user(config)?, command),
        Command::Week(command) => run_week(&conn, require_user(config)?, config.today(), command),
        Command::Rock(command) => run_rock(&conn, require_user(config)?, config.today(), command),
        Command::Task(command) => run_task(&conn, require_user(config)?, config.today(), command),
        Command::Renewal(command) => {
            run_renewal(&conn, require_user(config)?, config.today(), command)
        }
        Command::Circle(command) => run_circle(&conn, require_user(config)?, config.today(), command),
        Command::Dashboard => {
            let user_id = require_user(config)?;
            let sources = DashboardSources {
                missions: &SqliteMissionRepository::new(&conn),
                roles: &SqliteRoleRepository::new(&conn),
                plans: &SqlitePlanRepository::new(&conn),
                renewals: &SqliteRenewalRepository::new(&conn),
            };
            let dashboard = build_dashboard(&sources, user_id, config.today())
                .map_err(fail("dashboard", "Failed to load dashboard"))?;
            to_json(&dashboard)
        }
    }
}

fn run_roles(conn: &Connection, user_id: UserId, command: RolesCommand) -> CliResult {
    let roles = RoleService::new(SqliteRoleRepository::new(conn));
    let output = match command {
        RolesCommand::List => roles.list_roles(user_id).map(|list| to_json(&list)),
        RolesCommand::Add {
            name,
            icon,
            color,
            description,
        } => {
            let style = RoleStyle {
                icon,
                color,
                description,
            };
            roles.add_role(user_id, name, style).map(|role| to_json(&role))
        }
        RolesCommand::Adopt { ids } => roles
            .adopt_suggested_roles(user_id, &ids)
            .map(|list| to_json(&list)),
        RolesCommand::Rename { id, name } => {
            roles.rename_role(user_id, id, name).map(|role| to_json(&role))
        }
        RolesCommand::Reorder { ids } => roles
            .reorder_roles(user_id, &ids)
            .map(|list| to_json(&list)),
        RolesCommand::Remove { id } => roles
            .remove_role(user_id, id)
            .map(|()| Ok(json!({ "removed": id }))),
    };
    output.map_err(|err| CliError::new("roles", err.user_message()))?
}

fn run_mission(conn: &Connection, user_id: UserId, command: MissionCommand) -> CliResult {
    let missions = MissionService::new(SqliteMissionRepository::new(conn));
    match command {
        MissionCommand::Show => missions
            .get_mission(user_id)
            .map_err(|err| CliError::new("mission", err.user_message()))
            .and_then(|mission| to_json(&mission)),
        MissionCommand::Catalog => Ok(json!({
            "values": CORE_VALUES,
            "roles": SUGGESTED_ROLES,
        })),
        MissionCommand::Draft(args) => {
            let answers = mission_answers(args)?;
            Ok(json!({ "statement": missions.draft(&answers) }))
        }
        MissionCommand::Save(args) => {
            let answers = mission_answers(args)?;
            missions
                .save(user_id, answers)
                .map_err(|err| CliError::new("mission", err.user_message()))
                .and_then(|mission| to_json(&mission))
        }
    }
}

fn mission_answers(args: MissionArgs) -> Result<MissionAnswers, CliError> {
    let role_goals = args
        .goals
        .iter()
        .map(|entry| {
            entry
                .split_once('=')
                .map(|(role, goal)| RoleGoal::new(role_display_name(role), goal))
                .ok_or_else(|| CliError::new("mission_args", "Goals must look like role=goal"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(MissionAnswers {
        legacy: args.legacy,
        values: args.values,
        role_goals,
        statement: args.statement,
    })
}

fn planner(conn: &Connection) -> PlannerService<SqlitePlanRepository<'_>, SqliteTaskRepository<'_>> {
    PlannerService::new(SqlitePlanRepository::new(conn), SqliteTaskRepository::new(conn))
}

fn run_week(conn: &Connection, user_id: UserId, today: NaiveDate, command: WeekCommand) -> CliResult {
    let planner = planner(conn);
    let output = match command {
        WeekCommand::Show => planner.week_board(user_id, today).map(|board| to_json(&board)),
        WeekCommand::Review {
            reflection,
            complete,
        } => planner.resolve_week(user_id, today).and_then(|plan| {
            planner
                .review_week(user_id, plan.id, reflection.as_deref(), complete)
                .map(|plan| to_json(&plan))
        }),
    };
    output.map_err(|err| CliError::new("week", err.user_message()))?
}

fn run_rock(conn: &Connection, user_id: UserId, today: NaiveDate, command: RockCommand) -> CliResult {
    let mutation = match command {
        RockCommand::Add { title, role, day } => {
            return planner(conn)
                .add_big_rock(user_id, today, title, role, day)
                .map_err(|err| CliError::new("rock_add", err.user_message()))
                .and_then(|rock| to_json(&rock));
        }
        RockCommand::Done { id } => BoardMutation::SetRockComplete {
            rock_id: id,
            complete: true,
        },
        RockCommand::Undo { id } => BoardMutation::SetRockComplete {
            rock_id: id,
            complete: false,
        },
        RockCommand::Schedule { id, day } => BoardMutation::ScheduleRock { rock_id: id, day },
    };
    let board = apply_to_board(conn, user_id, today, mutation)?;
    to_json(board.rocks())
}

fn run_task(conn: &Connection, user_id: UserId, today: NaiveDate, command: TaskCommand) -> CliResult {
    let mutation = match command {
        TaskCommand::List { quadrant, open } => {
            return planner(conn)
                .filter_week_tasks(user_id, today, quadrant, open)
                .map_err(|err| CliError::new("task_list", err.user_message()))
                .and_then(|tasks| to_json(&tasks));
        }
        TaskCommand::Add {
            title,
            quadrant,
            urgent,
            important,
            date,
        } => {
            let quadrant = quadrant.unwrap_or_else(|| Quadrant::classify(urgent, important));
            let mut item = NewItem::new(title, quadrant);
            item.scheduled_date = date;
            return planner(conn)
                .add_item(user_id, today, item)
                .map_err(|err| CliError::new("task_add", err.user_message()))
                .and_then(|created| to_json(&created));
        }
        TaskCommand::Done { id } => BoardMutation::SetTaskComplete {
            task_id: id,
            complete: true,
        },
        TaskCommand::Undo { id } => BoardMutation::SetTaskComplete {
            task_id: id,
            complete: false,
        },
        TaskCommand::Schedule { id, date } => BoardMutation::ScheduleTask { task_id: id, date },
    };
    let board = apply_to_board(conn, user_id, today, mutation)?;
    to_json(board.tasks())
}

fn run_renewal(
    conn: &Connection,
    user_id: UserId,
    today: NaiveDate,
    command: RenewalCommand,
) -> CliResult {
    let renewal = RenewalService::new(SqliteRenewalRepository::new(conn));
    let output = match command {
        RenewalCommand::Log {
            physical,
            mental,
            spiritual,
            social,
            notes,
            date,
        } => {
            let notes = notes
                .iter()
                .map(|entry| {
                    entry
                        .split_once('=')
                        .and_then(|(dimension, text)| {
                            RenewalDimension::parse(dimension)
                                .map(|dimension| (dimension, text.trim().to_string()))
                        })
                        .ok_or_else(|| {
                            CliError::new("renewal_args", "Notes must look like physical=text")
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let entry = RenewalEntry {
                physical,
                mental,
                spiritual,
                social,
                notes,
            };
            renewal
                .log_day(user_id, date.unwrap_or(today), entry)
                .map(|log| to_json(&log))
        }
        RenewalCommand::Show { date } => renewal
            .get_log(user_id, date.unwrap_or(today))
            .map(|log| to_json(&log)),
        RenewalCommand::Week => renewal
            .week_summary(user_id, today)
            .map(|summary| to_json(&summary)),
    };
    output.map_err(|err| CliError::new("renewal", err.user_message()))?
}

fn run_circle(
    conn: &Connection,
    user_id: UserId,
    today: NaiveDate,
    command: CircleCommand,
) -> CliResult {
    let circle = CircleService::new(SqliteCircleRepository::new(conn));
    let mutation = match command {
        CircleCommand::List => {
            return circle
                .board(user_id)
                .map_err(|err| CliError::new("circle", err.user_message()))
                .and_then(|board| to_json(&board));
        }
        CircleCommand::Add { item, category } => {
            return circle
                .add_item(user_id, item, category)
                .map_err(|err| CliError::new("circle_add", err.user_message()))
                .and_then(|item| to_json(&item));
        }
        CircleCommand::Sort { id, category } => BoardMutation::SortCircleItem {
            item_id: id,
            category,
        },
        CircleCommand::Remove { id } => BoardMutation::RemoveCircleItem { item_id: id },
    };
    let board = apply_to_board(conn, user_id, today, mutation)?;
    Ok(json!({
        "items": board.circle(),
        "summary": board.control_summary(),
    }))
}

fn apply_to_board(
    conn: &Connection,
    user_id: UserId,
    today: NaiveDate,
    mutation: BoardMutation,
) -> Result<PlannerBoard, CliError> {
    let mut board = PlannerBoard::load(conn, user_id, today)
        .map_err(fail("board_load", "Failed to load your week"))?;
    let mut writer = StoreWriter::new(conn);
    board
        .apply(&mut writer, mutation)
        .map_err(|err: BoardError<_>| CliError::new("board_apply", err.user_message()))?;
    Ok(board)
}

fn require_user(config: &PlannerConfig) -> Result<UserId, CliError> {
    config
        .user
        .ok_or_else(|| CliError::new("no_session", "Please sign in first (set --user)"))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    serde_json::to_value(value).map_err(fail("serialize", "Failed to render output"))
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Init => "init",
        Command::Signup { .. } => "signup",
        Command::Login { .. } => "login",
        Command::Profile { .. } => "profile",
        Command::Roles(_) => "roles",
        Command::Mission(_) => "mission",
        Command::Week(_) => "week",
        Command::Rock(_) => "rock",
        Command::Task(_) => "task",
        Command::Renewal(_) => "renewal",
        Command::Circle(_) => "circle",
        Command::Dashboard => "dashboard",
    }
}

