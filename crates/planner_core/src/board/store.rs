//! SQLite-backed board loading and remote writes.

use super::{PlannerBoard, RemoteWrite, RemoteWriter};
use crate::model::plan::WeeklyPlan;
use crate::model::week::{week_end, week_start_for};
use crate::model::UserId;
use crate::repo::circle_repo::{CircleRepository, SqliteCircleRepository};
use crate::repo::plan_repo::{PlanRepository, SqlitePlanRepository};
use crate::repo::task_repo::{SqliteTaskRepository, TaskListQuery, TaskRepository};
use crate::repo::{RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::Connection;

/// Writes board mutations through the repositories of one connection.
pub struct StoreWriter<'conn> {
    plans: SqlitePlanRepository<'conn>,
    tasks: SqliteTaskRepository<'conn>,
    circle: SqliteCircleRepository<'conn>,
}

impl<'conn> StoreWriter<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            plans: SqlitePlanRepository::new(conn),
            tasks: SqliteTaskRepository::new(conn),
            circle: SqliteCircleRepository::new(conn),
        }
    }
}

impl RemoteWriter for StoreWriter<'_> {
    type Error = RepoError;

    fn write(&mut self, user_id: UserId, write: &RemoteWrite) -> RepoResult<()> {
        match write {
            RemoteWrite::SetRockComplete { rock_id, complete } => {
                self.plans.set_rock_complete(user_id, *rock_id, *complete)
            }
            RemoteWrite::SetRockDay { rock_id, day } => {
                self.plans.set_rock_scheduled_day(user_id, *rock_id, *day)
            }
            RemoteWrite::CreateRock(rock) => self.plans.create_big_rock(user_id, rock).map(drop),
            RemoteWrite::SetTaskComplete { task_id, complete } => {
                self.tasks.set_task_complete(user_id, *task_id, *complete)
            }
            RemoteWrite::SetTaskDate { task_id, date } => {
                self.tasks.set_task_scheduled_date(user_id, *task_id, *date)
            }
            RemoteWrite::CreateTask(task) => self.tasks.create_task(task).map(drop),
            RemoteWrite::CreateCircleItem(item) => self.circle.create_circle_item(item).map(drop),
            RemoteWrite::SetCircleCategory { item_id, category } => {
                self.circle.set_circle_category(user_id, *item_id, *category)
            }
            RemoteWrite::DeleteCircleItem { item_id } => {
                self.circle.delete_circle_item(user_id, *item_id)
            }
        }
    }
}

impl PlannerBoard {
    /// Loads `today`'s week for `user_id`, creating the weekly plan if absent.
    pub fn load(conn: &Connection, user_id: UserId, today: NaiveDate) -> RepoResult<Self> {
        let plans = SqlitePlanRepository::new(conn);
        let plan = plans.ensure_weekly_plan(&WeeklyPlan::for_date(user_id, today))?;
        let rocks = plans.list_big_rocks(user_id, plan.id)?;

        let week_start = week_start_for(today);
        let tasks = SqliteTaskRepository::new(conn)
            .list_tasks(&TaskListQuery::between(user_id, week_start, week_end(week_start)))?;
        let circle_items = SqliteCircleRepository::new(conn).list_circle_items(user_id)?;

        Ok(Self::new(user_id, plan, rocks, tasks, circle_items))
    }
}
