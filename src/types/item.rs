//! Work item value types: [`Task`], [`Epic`], [`Subtask`], and the
//! [`WorkItem`] sum over the three.
//!
//! Identity lives in the `id` field, which is `0` until the store
//! assigns a real id at creation time. Schedules are an optional start
//! timestamp plus an optional duration in whole minutes; the end time
//! exists only when both are present.
//!
//! Epic status and time fields are derived by the store from the epic's
//! subtasks. Whatever a caller puts there is overwritten on the next
//! recompute, and the subtask-id list itself is only reachable through
//! store operations.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::types::status::{Status, TaskKind};

/// Store-assigned entity identifier. Strictly increasing, never reused.
pub type TaskId = u64;

/// Computes `start + minutes`, or `None` when the span does not fit the
/// timestamp range.
pub(crate) fn span_end(start: NaiveDateTime, minutes: u64) -> Option<NaiveDateTime> {
    let minutes = i64::try_from(minutes).ok()?;
    let delta = Duration::try_minutes(minutes)?;
    start.checked_add_signed(delta)
}

/// A standalone schedulable unit of work.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use taskboard::{Status, Task};
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1)
///     .unwrap()
///     .and_hms_opt(10, 0, 0)
///     .unwrap();
/// let task = Task::new("groceries", "milk and bread").with_schedule(60, start);
///
/// assert_eq!(task.status, Status::New);
/// assert_eq!(task.end_time(), start.checked_add_signed(chrono::Duration::hours(1)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned id; `0` until the task is added.
    pub id: TaskId,
    /// Short human-readable name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Current lifecycle status.
    pub status: Status,
    /// Scheduled span in whole minutes, if any.
    pub duration_min: Option<u64>,
    /// Scheduled start, if any.
    pub start_time: Option<NaiveDateTime>,
}

impl Task {
    /// Creates an unscheduled task in the `New` status with no id.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: description.into(),
            status: Status::New,
            duration_min: None,
            start_time: None,
        }
    }

    /// Sets the status.
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Schedules the task: `duration_min` minutes starting at `start`.
    pub fn with_schedule(mut self, duration_min: u64, start: NaiveDateTime) -> Self {
        self.duration_min = Some(duration_min);
        self.start_time = Some(start);
        self
    }

    /// End of the scheduled span: start + duration when both are set.
    pub fn end_time(&self) -> Option<NaiveDateTime> {
        span_end(self.start_time?, self.duration_min?)
    }
}

/// A grouping task whose status and time span are derived from its
/// subtasks.
///
/// Created empty (`New`, no time fields, no subtasks). The store owns
/// the subtask-id list and every derived field; callers read them
/// through [`Epic::subtask_ids`] and the public fields but cannot
/// change the linkage directly.
///
/// # Examples
///
/// ```
/// use taskboard::{Epic, Status};
///
/// let epic = Epic::new("move", "move to the new flat");
/// assert_eq!(epic.status, Status::New);
/// assert!(epic.subtask_ids().is_empty());
/// assert!(epic.end_time().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epic {
    /// Store-assigned id; `0` until the epic is added.
    pub id: TaskId,
    /// Short human-readable name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Derived status; overwritten on every recompute.
    pub status: Status,
    /// Derived total duration: sum of the scheduled subtasks' minutes.
    pub duration_min: Option<u64>,
    /// Derived start: earliest scheduled subtask start.
    pub start_time: Option<NaiveDateTime>,
    /// Owned subtask ids in insertion order. Mutated only by the store.
    pub(crate) subtask_ids: Vec<TaskId>,
    /// Derived end: latest scheduled subtask end. Not `start + duration`,
    /// since subtask spans may leave gaps.
    pub(crate) end_time: Option<NaiveDateTime>,
}

impl Epic {
    /// Creates an empty epic with no subtasks and no derived time span.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: description.into(),
            status: Status::New,
            duration_min: None,
            start_time: None,
            subtask_ids: Vec::new(),
            end_time: None,
        }
    }

    /// Ids of the subtasks this epic owns, in insertion order.
    pub fn subtask_ids(&self) -> &[TaskId] {
        &self.subtask_ids
    }

    /// Derived end of the epic's span: the latest scheduled subtask end.
    pub fn end_time(&self) -> Option<NaiveDateTime> {
        self.end_time
    }
}

/// A task owned by exactly one epic.
///
/// The `epic_id` back-reference is fixed when the subtask is created;
/// the subtask cannot exist without that epic existing first.
///
/// # Examples
///
/// ```
/// use taskboard::{Status, Subtask};
///
/// let subtask = Subtask::new("pack", "boxes and tape", Status::New, 3);
/// assert_eq!(subtask.epic_id, 3);
/// assert!(subtask.end_time().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    /// Store-assigned id; `0` until the subtask is added.
    pub id: TaskId,
    /// Short human-readable name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Current lifecycle status.
    pub status: Status,
    /// Scheduled span in whole minutes, if any.
    pub duration_min: Option<u64>,
    /// Scheduled start, if any.
    pub start_time: Option<NaiveDateTime>,
    /// Id of the owning epic.
    pub epic_id: TaskId,
}

impl Subtask {
    /// Creates an unscheduled subtask referencing its owning epic.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        status: Status,
        epic_id: TaskId,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: description.into(),
            status,
            duration_min: None,
            start_time: None,
            epic_id,
        }
    }

    /// Schedules the subtask: `duration_min` minutes starting at `start`.
    pub fn with_schedule(mut self, duration_min: u64, start: NaiveDateTime) -> Self {
        self.duration_min = Some(duration_min);
        self.start_time = Some(start);
        self
    }

    /// End of the scheduled span: start + duration when both are set.
    pub fn end_time(&self) -> Option<NaiveDateTime> {
        span_end(self.start_time?, self.duration_min?)
    }
}

/// Any work item the store can hold, tagged by kind.
///
/// This is the shape the access history and the prioritized listing
/// speak: shared attributes are reachable through the accessor methods
/// without caring which concrete kind is inside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkItem {
    /// A standalone task.
    Task(Task),
    /// A grouping epic.
    Epic(Epic),
    /// An epic-owned subtask.
    Subtask(Subtask),
}

impl WorkItem {
    /// The item's id.
    pub fn id(&self) -> TaskId {
        match self {
            Self::Task(t) => t.id,
            Self::Epic(e) => e.id,
            Self::Subtask(s) => s.id,
        }
    }

    /// The item's concrete kind.
    pub fn kind(&self) -> TaskKind {
        match self {
            Self::Task(_) => TaskKind::Task,
            Self::Epic(_) => TaskKind::Epic,
            Self::Subtask(_) => TaskKind::Subtask,
        }
    }

    /// The item's name.
    pub fn name(&self) -> &str {
        match self {
            Self::Task(t) => &t.name,
            Self::Epic(e) => &e.name,
            Self::Subtask(s) => &s.name,
        }
    }

    /// The item's description.
    pub fn description(&self) -> &str {
        match self {
            Self::Task(t) => &t.description,
            Self::Epic(e) => &e.description,
            Self::Subtask(s) => &s.description,
        }
    }

    /// The item's status.
    pub fn status(&self) -> Status {
        match self {
            Self::Task(t) => t.status,
            Self::Epic(e) => e.status,
            Self::Subtask(s) => s.status,
        }
    }

    /// The item's duration in minutes, if scheduled.
    pub fn duration_min(&self) -> Option<u64> {
        match self {
            Self::Task(t) => t.duration_min,
            Self::Epic(e) => e.duration_min,
            Self::Subtask(s) => s.duration_min,
        }
    }

    /// The item's start time, if scheduled.
    pub fn start_time(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Task(t) => t.start_time,
            Self::Epic(e) => e.start_time,
            Self::Subtask(s) => s.start_time,
        }
    }

    /// The item's end time, when defined.
    pub fn end_time(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Task(t) => t.end_time(),
            Self::Epic(e) => e.end_time(),
            Self::Subtask(s) => s.end_time(),
        }
    }
}

impl From<Task> for WorkItem {
    fn from(task: Task) -> Self {
        Self::Task(task)
    }
}

impl From<Epic> for WorkItem {
    fn from(epic: Epic) -> Self {
        Self::Epic(epic)
    }
}

impl From<Subtask> for WorkItem {
    fn from(subtask: Subtask) -> Self {
        Self::Subtask(subtask)
    }
}
