//! Weekly planning use-case service.
//!
//! # Responsibility
//! - Resolve the current week's plan, creating it on first visit.
//! - Route new items by quadrant: Q2 becomes a big rock, the rest tasks.
//! - Build the week board view (day columns, unscheduled rocks, quadrants).
//!
//! # Invariants
//! - Resolving the same date twice yields the same plan id.
//! - Completion writes set a target state; they never flip blindly.

use crate::model::plan::{rock_completion, BigRock, WeeklyPlan};
use crate::model::task::{task_completion, Quadrant, Task};
use crate::model::validation::ValidationError;
use crate::model::week::{day_index_of, week_days, week_end, week_start_for, WeekDay};
use crate::model::{PlanId, RockId, RoleId, TaskId, UserId};
use crate::repo::plan_repo::PlanRepository;
use crate::repo::task_repo::{TaskListQuery, TaskRepository};
use crate::repo::RepoError;
use chrono::NaiveDate;
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from weekly planning use-cases.
#[derive(Debug)]
pub enum PlannerError {
    /// Title is blank after trim.
    InvalidTitle,
    /// Day offset outside `0..=6`.
    InvalidDay(u8),
    PlanNotFound(PlanId),
    RockNotFound(RockId),
    TaskNotFound(TaskId),
    /// Role missing or owned by another user.
    RoleNotFound(RoleId),
    Repo(RepoError),
}

impl PlannerError {
    /// Single sentence suitable for the planner form.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidTitle => "Please enter a title",
            Self::InvalidDay(_) => "Please pick a day of this week",
            Self::PlanNotFound(_) => "Failed to load your week",
            Self::RockNotFound(_) | Self::TaskNotFound(_) => "Failed to update item",
            Self::RoleNotFound(_) => "Please pick one of your roles",
            Self::Repo(_) => "Failed to add item",
        }
    }
}

impl Display for PlannerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle => write!(f, "title must not be blank"),
            Self::InvalidDay(day) => write!(f, "scheduled day {day} is outside 0..=6"),
            Self::PlanNotFound(id) => write!(f, "weekly plan not found: {id}"),
            Self::RockNotFound(id) => write!(f, "big rock not found: {id}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::RoleNotFound(id) => write!(f, "role not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PlannerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for PlannerError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(ValidationError::BlankText { .. }) => Self::InvalidTitle,
            RepoError::Validation(ValidationError::ScheduledDayOutOfRange(day)) => {
                Self::InvalidDay(day)
            }
            RepoError::NotFound { entity: "big rock", id } => Self::RockNotFound(id),
            RepoError::NotFound { entity: "task", id } => Self::TaskNotFound(id),
            RepoError::NotFound { entity: "role", id } => Self::RoleNotFound(id),
            RepoError::NotFound {
                entity: "weekly plan",
                id,
            } => Self::PlanNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type PlannerResult<T> = Result<T, PlannerError>;

/// Input for a new planner item, before quadrant routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub title: String,
    pub quadrant: Quadrant,
    pub role_id: Option<RoleId>,
    /// Used as the rock's day when it falls inside the week, or as the
    /// task's scheduled date.
    pub scheduled_date: Option<NaiveDate>,
}

impl NewItem {
    pub fn new(title: impl Into<String>, quadrant: Quadrant) -> Self {
        Self {
            title: title.into(),
            quadrant,
            role_id: None,
            scheduled_date: None,
        }
    }
}

/// Row created by `add_item`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlannedItem {
    BigRock(BigRock),
    Task(Task),
}

/// One calendar column of the week board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayColumn {
    pub day: WeekDay,
    pub is_today: bool,
    pub rocks: Vec<BigRock>,
    pub tasks: Vec<Task>,
}

/// Derived view of one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekBoard {
    pub plan: WeeklyPlan,
    pub days: Vec<DayColumn>,
    pub unscheduled_rocks: Vec<BigRock>,
    /// Non-Q2 tasks of the week grouped by quadrant.
    pub tasks_by_quadrant: BTreeMap<Quadrant, Vec<Task>>,
    pub rock_completion: u8,
    pub task_completion: u8,
}

/// Weekly planning service facade.
pub struct PlannerService<P: PlanRepository, T: TaskRepository> {
    plans: P,
    tasks: T,
}

impl<P: PlanRepository, T: TaskRepository> PlannerService<P, T> {
    pub fn new(plans: P, tasks: T) -> Self {
        Self { plans, tasks }
    }

    /// Returns the plan for `today`'s week, creating it when absent.
    pub fn resolve_week(&self, user_id: UserId, today: NaiveDate) -> PlannerResult<WeeklyPlan> {
        let candidate = WeeklyPlan::for_date(user_id, today);
        let plan = self.plans.ensure_weekly_plan(&candidate)?;
        info!(
            "event=week_resolve module=planner status=ok week_start={} created={}",
            plan.week_start,
            plan.id == candidate.id
        );
        Ok(plan)
    }

    /// Adds a big rock to `today`'s week.
    pub fn add_big_rock(
        &self,
        user_id: UserId,
        today: NaiveDate,
        title: impl Into<String>,
        role_id: Option<RoleId>,
        scheduled_day: Option<u8>,
    ) -> PlannerResult<BigRock> {
        let plan = self.resolve_week(user_id, today)?;
        let mut rock = BigRock::new(plan.id, title);
        rock.role_id = role_id;
        rock.scheduled_day = scheduled_day;
        self.plans.create_big_rock(user_id, &rock)?;
        Ok(rock)
    }

    /// Adds an item, creating a big rock for Q2 and a task otherwise.
    pub fn add_item(
        &self,
        user_id: UserId,
        today: NaiveDate,
        item: NewItem,
    ) -> PlannerResult<PlannedItem> {
        if item.title.trim().is_empty() {
            return Err(PlannerError::InvalidTitle);
        }

        if item.quadrant.is_big_rock() {
            let week_start = week_start_for(today);
            let day = item
                .scheduled_date
                .and_then(|date| day_index_of(week_start, date));
            let rock = self.add_big_rock(user_id, today, item.title, item.role_id, day)?;
            info!("event=item_add module=planner status=ok kind=big_rock quadrant=q2");
            return Ok(PlannedItem::BigRock(rock));
        }

        let mut task = Task::new(user_id, item.title, item.quadrant);
        task.scheduled_date = item.scheduled_date;
        self.tasks.create_task(&task)?;
        info!(
            "event=item_add module=planner status=ok kind=task quadrant={}",
            task.quadrant.as_str()
        );
        Ok(PlannedItem::Task(task))
    }

    /// Sets a rock's completion to `complete` and returns the stored row.
    pub fn set_rock_complete(
        &self,
        user_id: UserId,
        rock_id: RockId,
        complete: bool,
    ) -> PlannerResult<BigRock> {
        self.plans.set_rock_complete(user_id, rock_id, complete)?;
        self.load_rock(user_id, rock_id)
    }

    /// Flips a rock's completion flag.
    pub fn toggle_rock(&self, user_id: UserId, rock_id: RockId) -> PlannerResult<BigRock> {
        let rock = self.load_rock(user_id, rock_id)?;
        self.set_rock_complete(user_id, rock_id, !rock.is_complete)
    }

    /// Moves a rock to `day` (0..=6) or back to unscheduled.
    pub fn schedule_rock(
        &self,
        user_id: UserId,
        rock_id: RockId,
        day: Option<u8>,
    ) -> PlannerResult<BigRock> {
        self.plans.set_rock_scheduled_day(user_id, rock_id, day)?;
        self.load_rock(user_id, rock_id)
    }

    pub fn set_task_complete(
        &self,
        user_id: UserId,
        task_id: TaskId,
        complete: bool,
    ) -> PlannerResult<Task> {
        self.tasks.set_task_complete(user_id, task_id, complete)?;
        self.load_task(user_id, task_id)
    }

    pub fn schedule_task(
        &self,
        user_id: UserId,
        task_id: TaskId,
        date: Option<NaiveDate>,
    ) -> PlannerResult<Task> {
        self.tasks.set_task_scheduled_date(user_id, task_id, date)?;
        self.load_task(user_id, task_id)
    }

    /// Stores the end-of-week reflection and completion flag.
    pub fn review_week(
        &self,
        user_id: UserId,
        plan_id: PlanId,
        reflection: Option<&str>,
        is_complete: bool,
    ) -> PlannerResult<WeeklyPlan> {
        self.plans
            .update_plan_review(user_id, plan_id, reflection, is_complete)?;
        self.plans
            .get_plan_by_id(user_id, plan_id)?
            .ok_or(PlannerError::PlanNotFound(plan_id))
    }

    /// Tasks dated inside `today`'s week plus undated ones.
    pub fn week_tasks(&self, user_id: UserId, today: NaiveDate) -> PlannerResult<Vec<Task>> {
        self.filter_week_tasks(user_id, today, None, false)
    }

    /// Week tasks narrowed to one quadrant and, with `open_only`, to the
    /// unfinished ones.
    pub fn filter_week_tasks(
        &self,
        user_id: UserId,
        today: NaiveDate,
        quadrant: Option<Quadrant>,
        open_only: bool,
    ) -> PlannerResult<Vec<Task>> {
        let week_start = week_start_for(today);
        let mut query = TaskListQuery::between(user_id, week_start, week_end(week_start));
        query.quadrant = quadrant;
        query.include_complete = !open_only;
        Ok(self.tasks.list_tasks(&query)?)
    }

    /// Builds the full week board for `today`.
    pub fn week_board(&self, user_id: UserId, today: NaiveDate) -> PlannerResult<WeekBoard> {
        let plan = self.resolve_week(user_id, today)?;
        let rocks = self.plans.list_big_rocks(user_id, plan.id)?;
        let tasks = self.week_tasks(user_id, today)?;
        Ok(assemble_board(plan, rocks, tasks, today))
    }

    fn load_rock(&self, user_id: UserId, rock_id: RockId) -> PlannerResult<BigRock> {
        self.plans
            .get_big_rock(user_id, rock_id)?
            .ok_or(PlannerError::RockNotFound(rock_id))
    }

    fn load_task(&self, user_id: UserId, task_id: TaskId) -> PlannerResult<Task> {
        self.tasks
            .get_task(user_id, task_id)?
            .ok_or(PlannerError::TaskNotFound(task_id))
    }
}

/// Groups rows of one week into the board view.
pub fn assemble_board(
    plan: WeeklyPlan,
    rocks: Vec<BigRock>,
    tasks: Vec<Task>,
    today: NaiveDate,
) -> WeekBoard {
    let rock_completion = rock_completion(&rocks);
    let task_completion = task_completion(&tasks);

    let mut days: Vec<DayColumn> = week_days(plan.week_start)
        .into_iter()
        .map(|day| DayColumn {
            is_today: day.date == today,
            day,
            rocks: Vec::new(),
            tasks: Vec::new(),
        })
        .collect();

    let mut unscheduled_rocks = Vec::new();
    for rock in rocks {
        let column = rock
            .scheduled_date(plan.week_start)
            .and_then(|date| days.iter_mut().find(|column| column.day.date == date));
        match column {
            Some(column) => column.rocks.push(rock),
            None => unscheduled_rocks.push(rock),
        }
    }

    let mut tasks_by_quadrant: BTreeMap<Quadrant, Vec<Task>> = BTreeMap::new();
    for task in tasks {
        if let Some(index) = task
            .scheduled_date
            .and_then(|date| day_index_of(plan.week_start, date))
        {
            if let Some(column) = days.get_mut(usize::from(index)) {
                column.tasks.push(task.clone());
            }
        }
        tasks_by_quadrant
            .entry(task.quadrant)
            .or_default()
            .push(task);
    }

    WeekBoard {
        plan,
        days,
        unscheduled_rocks,
        tasks_by_quadrant,
        rock_completion,
        task_completion,
    }
}

