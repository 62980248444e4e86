//! In-memory mirror of one week with optimistic mutations.
//!
//! # Responsibility
//! - Hold the current week's rocks, tasks and circle items for a user.
//! - Apply each mutation locally first, then forward it to a [`RemoteWriter`].
//!
//! # Invariants
//! - A rejected remote write leaves the affected row exactly as it was
//!   before the mutation.
//! - Completion mutations carry the target state, so repeating one is a no-op.
//! - Unassigned circle entries live only here; sorting one persists it.

pub mod store;

use crate::model::circle::{CircleCategory, CircleItem, ControlSummary};
use crate::model::plan::{validate_scheduled_day, BigRock, WeeklyPlan};
use crate::model::task::Task;
use crate::model::validation::{require_text, ValidationError};
use crate::model::week::day_index_of;
use crate::model::{now_epoch_ms, CircleItemId, RockId, TaskId, UserId};
use crate::service::planner_service::{assemble_board, NewItem, WeekBoard};
use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub use store::StoreWriter;

/// Where a circle entry currently sits on the sorting board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircleSlot {
    Unassigned,
    Sorted(CircleCategory),
}

/// Circle item as shown on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CircleEntry {
    pub id: CircleItemId,
    pub item: String,
    pub slot: CircleSlot,
    pub created_at: i64,
}

impl From<CircleItem> for CircleEntry {
    fn from(value: CircleItem) -> Self {
        Self {
            id: value.id,
            item: value.item,
            slot: CircleSlot::Sorted(value.category),
            created_at: value.created_at,
        }
    }
}

/// State change requested by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardMutation {
    SetRockComplete { rock_id: RockId, complete: bool },
    ScheduleRock { rock_id: RockId, day: Option<u8> },
    SetTaskComplete { task_id: TaskId, complete: bool },
    ScheduleTask { task_id: TaskId, date: Option<NaiveDate> },
    /// Q2 items become rocks on the board's plan.
    AddItem(NewItem),
    SortCircleItem { item_id: CircleItemId, category: CircleCategory },
    RemoveCircleItem { item_id: CircleItemId },
}

/// Storage write derived from a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteWrite {
    SetRockComplete { rock_id: RockId, complete: bool },
    SetRockDay { rock_id: RockId, day: Option<u8> },
    CreateRock(BigRock),
    SetTaskComplete { task_id: TaskId, complete: bool },
    SetTaskDate { task_id: TaskId, date: Option<NaiveDate> },
    CreateTask(Task),
    CreateCircleItem(CircleItem),
    SetCircleCategory { item_id: CircleItemId, category: CircleCategory },
    DeleteCircleItem { item_id: CircleItemId },
}

impl RemoteWrite {
    fn kind(&self) -> &'static str {
        match self {
            Self::SetRockComplete { .. } => "set_rock_complete",
            Self::SetRockDay { .. } => "set_rock_day",
            Self::CreateRock(_) => "create_rock",
            Self::SetTaskComplete { .. } => "set_task_complete",
            Self::SetTaskDate { .. } => "set_task_date",
            Self::CreateTask(_) => "create_task",
            Self::CreateCircleItem(_) => "create_circle_item",
            Self::SetCircleCategory { .. } => "set_circle_category",
            Self::DeleteCircleItem { .. } => "delete_circle_item",
        }
    }
}

/// Persists board mutations.
pub trait RemoteWriter {
    type Error;

    fn write(&mut self, user_id: UserId, write: &RemoteWrite) -> Result<(), Self::Error>;
}

/// Mutation rejected before touching any state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalRejection {
    UnknownRock(RockId),
    UnknownTask(TaskId),
    UnknownCircleItem(CircleItemId),
    Invalid(ValidationError),
}

impl Display for LocalRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownRock(id) => write!(f, "big rock is not on this board: {id}"),
            Self::UnknownTask(id) => write!(f, "task is not on this board: {id}"),
            Self::UnknownCircleItem(id) => write!(f, "circle item is not on this board: {id}"),
            Self::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl From<ValidationError> for LocalRejection {
    fn from(value: ValidationError) -> Self {
        Self::Invalid(value)
    }
}

#[derive(Debug)]
pub enum BoardError<E> {
    Local(LocalRejection),
    /// The write failed and the board was rolled back.
    Remote(E),
}

impl<E> BoardError<E> {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Local(LocalRejection::Invalid(_)) => "Please check the item and try again",
            Self::Local(_) => "That item is no longer on your board",
            Self::Remote(_) => "Failed to save change",
        }
    }
}

impl<E: Display> Display for BoardError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local(err) => write!(f, "{err}"),
            Self::Remote(err) => write!(f, "remote write failed: {err}"),
        }
    }
}

impl<E: Error + 'static> Error for BoardError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Local(_) => None,
            Self::Remote(err) => Some(err),
        }
    }
}

impl<E> From<LocalRejection> for BoardError<E> {
    fn from(value: LocalRejection) -> Self {
        Self::Local(value)
    }
}

/// Pre-mutation copy of the single row a mutation touches.
enum Undo {
    Rock(BigRock),
    DropRock(RockId),
    Task(Task),
    DropTask(TaskId),
    Circle(CircleEntry),
    RestoreCircle(usize, CircleEntry),
}

/// One user's week held in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannerBoard {
    user_id: UserId,
    plan: WeeklyPlan,
    rocks: Vec<BigRock>,
    tasks: Vec<Task>,
    circle: Vec<CircleEntry>,
}

impl PlannerBoard {
    pub fn new(
        user_id: UserId,
        plan: WeeklyPlan,
        rocks: Vec<BigRock>,
        tasks: Vec<Task>,
        circle_items: Vec<CircleItem>,
    ) -> Self {
        Self {
            user_id,
            plan,
            rocks,
            tasks,
            circle: circle_items.into_iter().map(CircleEntry::from).collect(),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn plan(&self) -> &WeeklyPlan {
        &self.plan
    }

    pub fn rocks(&self) -> &[BigRock] {
        &self.rocks
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn circle(&self) -> &[CircleEntry] {
        &self.circle
    }

    pub fn rock(&self, rock_id: RockId) -> Option<&BigRock> {
        self.rocks.iter().find(|rock| rock.id == rock_id)
    }

    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    /// Adds a concern to the unassigned pile. Nothing is written.
    pub fn enter_concern(&mut self, text: &str) -> Result<CircleItemId, LocalRejection> {
        require_text("circle item", text)?;
        let id = Uuid::new_v4();
        self.circle.push(CircleEntry {
            id,
            item: text.trim().to_string(),
            slot: CircleSlot::Unassigned,
            created_at: now_epoch_ms(),
        });
        Ok(id)
    }

    pub fn control_summary(&self) -> ControlSummary {
        let count = |slot: CircleSlot| self.circle.iter().filter(|e| e.slot == slot).count();
        ControlSummary::from_counts(
            count(CircleSlot::Sorted(CircleCategory::Control)),
            count(CircleSlot::Sorted(CircleCategory::NoControl)),
            count(CircleSlot::Unassigned),
        )
    }

    pub fn week_board(&self, today: NaiveDate) -> WeekBoard {
        assemble_board(
            self.plan.clone(),
            self.rocks.clone(),
            self.tasks.clone(),
            today,
        )
    }

    /// Applies `mutation` locally, then writes it through `writer`.
    ///
    /// # Errors
    /// - `Local` when the mutation is invalid; state is untouched and nothing
    ///   is written.
    /// - `Remote` when the write fails; the affected row is restored.
    pub fn apply<W: RemoteWriter>(
        &mut self,
        writer: &mut W,
        mutation: BoardMutation,
    ) -> Result<(), BoardError<W::Error>> {
        let (undo, write) = self.apply_local(mutation)?;
        let Some(write) = write else {
            return Ok(());
        };

        match writer.write(self.user_id, &write) {
            Ok(()) => {
                info!(
                    "event=board_write module=board status=ok kind={}",
                    write.kind()
                );
                Ok(())
            }
            Err(err) => {
                self.restore(undo);
                warn!(
                    "event=board_rollback module=board status=error kind={}",
                    write.kind()
                );
                Err(BoardError::Remote(err))
            }
        }
    }

    fn apply_local(
        &mut self,
        mutation: BoardMutation,
    ) -> Result<(Undo, Option<RemoteWrite>), LocalRejection> {
        match mutation {
            BoardMutation::SetRockComplete { rock_id, complete } => {
                let rock = self.rock_mut(rock_id)?;
                let undo = Undo::Rock(rock.clone());
                rock.is_complete = complete;
                Ok((undo, Some(RemoteWrite::SetRockComplete { rock_id, complete })))
            }
            BoardMutation::ScheduleRock { rock_id, day } => {
                validate_scheduled_day(day)?;
                let rock = self.rock_mut(rock_id)?;
                let undo = Undo::Rock(rock.clone());
                rock.scheduled_day = day;
                Ok((undo, Some(RemoteWrite::SetRockDay { rock_id, day })))
            }
            BoardMutation::SetTaskComplete { task_id, complete } => {
                let task = self.task_mut(task_id)?;
                let undo = Undo::Task(task.clone());
                task.is_complete = complete;
                Ok((undo, Some(RemoteWrite::SetTaskComplete { task_id, complete })))
            }
            BoardMutation::ScheduleTask { task_id, date } => {
                let task = self.task_mut(task_id)?;
                let undo = Undo::Task(task.clone());
                task.scheduled_date = date;
                Ok((undo, Some(RemoteWrite::SetTaskDate { task_id, date })))
            }
            BoardMutation::AddItem(item) => self.add_item(item),
            BoardMutation::SortCircleItem { item_id, category } => {
                let user_id = self.user_id;
                let entry = self.circle_mut(item_id)?;
                let undo = Undo::Circle(entry.clone());
                let write = match entry.slot {
                    CircleSlot::Unassigned => RemoteWrite::CreateCircleItem(CircleItem {
                        id: entry.id,
                        user_id,
                        item: entry.item.clone(),
                        category,
                        created_at: entry.created_at,
                    }),
                    CircleSlot::Sorted(_) => RemoteWrite::SetCircleCategory { item_id, category },
                };
                entry.slot = CircleSlot::Sorted(category);
                Ok((undo, Some(write)))
            }
            BoardMutation::RemoveCircleItem { item_id } => {
                let index = self
                    .circle
                    .iter()
                    .position(|entry| entry.id == item_id)
                    .ok_or(LocalRejection::UnknownCircleItem(item_id))?;
                let entry = self.circle.remove(index);
                let write = match entry.slot {
                    CircleSlot::Unassigned => None,
                    CircleSlot::Sorted(_) => Some(RemoteWrite::DeleteCircleItem { item_id }),
                };
                Ok((Undo::RestoreCircle(index, entry), write))
            }
        }
    }

    fn add_item(&mut self, item: NewItem) -> Result<(Undo, Option<RemoteWrite>), LocalRejection> {
        if item.quadrant.is_big_rock() {
            let week_start = self.plan.week_start;
            let mut rock = BigRock::new(self.plan.id, item.title);
            rock.role_id = item.role_id;
            rock.scheduled_day = item
                .scheduled_date
                .and_then(|date| day_index_of(week_start, date));
            rock.validate()?;
            let undo = Undo::DropRock(rock.id);
            self.rocks.push(rock.clone());
            return Ok((undo, Some(RemoteWrite::CreateRock(rock))));
        }

        let mut task = Task::new(self.user_id, item.title, item.quadrant);
        task.scheduled_date = item.scheduled_date;
        task.validate()?;
        let undo = Undo::DropTask(task.id);
        self.tasks.push(task.clone());
        Ok((undo, Some(RemoteWrite::CreateTask(task))))
    }

    fn restore(&mut self, undo: Undo) {
        match undo {
            Undo::Rock(previous) => {
                if let Some(rock) = self.rocks.iter_mut().find(|rock| rock.id == previous.id) {
                    *rock = previous;
                }
            }
            Undo::DropRock(id) => self.rocks.retain(|rock| rock.id != id),
            Undo::Task(previous) => {
                if let Some(task) = self.tasks.iter_mut().find(|task| task.id == previous.id) {
                    *task = previous;
                }
            }
            Undo::DropTask(id) => self.tasks.retain(|task| task.id != id),
            Undo::Circle(previous) => {
                if let Some(entry) = self.circle.iter_mut().find(|e| e.id == previous.id) {
                    *entry = previous;
                }
            }
            Undo::RestoreCircle(index, entry) => {
                let index = index.min(self.circle.len());
                self.circle.insert(index, entry);
            }
        }
    }

    fn rock_mut(&mut self, rock_id: RockId) -> Result<&mut BigRock, LocalRejection> {
        self.rocks
            .iter_mut()
            .find(|rock| rock.id == rock_id)
            .ok_or(LocalRejection::UnknownRock(rock_id))
    }

    fn task_mut(&mut self, task_id: TaskId) -> Result<&mut Task, LocalRejection> {
        self.tasks
            .iter_mut()
            .find(|task| task.id == task_id)
            .ok_or(LocalRejection::UnknownTask(task_id))
    }

    fn circle_mut(&mut self, item_id: CircleItemId) -> Result<&mut CircleEntry, LocalRejection> {
        self.circle
            .iter_mut()
            .find(|entry| entry.id == item_id)
            .ok_or(LocalRejection::UnknownCircleItem(item_id))
    }
}
