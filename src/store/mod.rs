//! Work-item stores.
//!
//! [`TaskStore`] is the full create/read/update/delete surface over
//! tasks, epics, and subtasks. [`InMemoryTaskStore`](memory::InMemoryTaskStore)
//! is the engine that owns the entity maps, the id counter, the
//! temporal index, and the access log;
//! [`FileBackedTaskStore`](file::FileBackedTaskStore) wraps it and
//! mirrors every mutation to a flat-record file.
//!
//! Build stores explicitly and hand them to consumers; there is no
//! global accessor:
//!
//! ```
//! use taskboard::{InMemoryTaskStore, Task, TaskStore};
//!
//! let store = InMemoryTaskStore::new();
//! let id = store.add_task(Task::new("solo", "no schedule")).unwrap();
//! assert!(store.task_by_id(id).is_some());
//! ```

pub mod file;
pub mod memory;

use crate::error::StoreError;
use crate::types::{Epic, Subtask, Task, TaskId, WorkItem};

/// A store of hierarchical work items.
///
/// All mutating operations either fully apply their changes or leave
/// the store untouched. Absent ids are silent no-ops, never errors;
/// the only caller-surfaced failures are schedule conflicts and, for
/// file-backed stores, persistence problems.
pub trait TaskStore {
    /// Adds a task, assigning it the next id.
    ///
    /// # Errors
    ///
    /// [`StoreError::ScheduleConflict`] when the task's window overlaps
    /// any stored scheduled task or subtask; the store is unchanged.
    fn add_task(&self, task: Task) -> Result<TaskId, StoreError>;

    /// Adds an epic, assigning it the next id.
    ///
    /// The epic is stored empty: no subtasks, status `New`, no time
    /// fields, regardless of what the caller put in those fields. Epics
    /// are never overlap-checked.
    fn add_epic(&self, epic: Epic) -> Result<TaskId, StoreError>;

    /// Adds a subtask under its referenced epic.
    ///
    /// Returns `Ok(None)` without storing anything when the referenced
    /// epic does not exist. On success the subtask id is appended to
    /// the epic's list and the epic's status and time span are
    /// recomputed.
    ///
    /// # Errors
    ///
    /// [`StoreError::ScheduleConflict`] on a window overlap; the store
    /// is unchanged.
    fn add_subtask(&self, subtask: Subtask) -> Result<Option<TaskId>, StoreError>;

    /// Replaces a stored task. No-op when the id is not present.
    ///
    /// # Errors
    ///
    /// [`StoreError::ScheduleConflict`] when the new window overlaps
    /// another scheduled item (the task's own previous window is
    /// excluded); the stored version is kept.
    fn update_task(&self, task: Task) -> Result<(), StoreError>;

    /// Replaces a stored epic's name and description. No-op when the id
    /// is not present.
    ///
    /// The stored subtask linkage survives the update: the incoming
    /// list is merged with the existing one (without duplicating ids),
    /// then status and time span are recomputed, overwriting whatever
    /// the caller supplied for them.
    fn update_epic(&self, epic: Epic) -> Result<(), StoreError>;

    /// Replaces a stored subtask. No-op when the id is not present.
    ///
    /// The owning epic is fixed at creation; a different `epic_id` on
    /// the incoming value is ignored. The owning epic is recomputed
    /// after the update.
    ///
    /// # Errors
    ///
    /// [`StoreError::ScheduleConflict`] as for [`update_task`](TaskStore::update_task).
    fn update_subtask(&self, subtask: Subtask) -> Result<(), StoreError>;

    /// Deletes a task. Removes it from the temporal index and the
    /// access log. No-op when absent.
    fn delete_task_by_id(&self, id: TaskId) -> Result<(), StoreError>;

    /// Deletes an epic and every subtask it owns; each removed item
    /// also leaves the temporal index and the access log. No-op when
    /// absent.
    fn delete_epic_by_id(&self, id: TaskId) -> Result<(), StoreError>;

    /// Deletes a subtask, detaches it from its epic, and recomputes the
    /// epic. No-op when absent.
    fn delete_subtask_by_id(&self, id: TaskId) -> Result<(), StoreError>;

    /// Deletes every task.
    fn clear_tasks(&self) -> Result<(), StoreError>;

    /// Deletes every epic and, with them, every subtask.
    fn clear_epics(&self) -> Result<(), StoreError>;

    /// Deletes every subtask and resets every epic to empty/`New`.
    fn clear_subtasks(&self) -> Result<(), StoreError>;

    /// Snapshot of all tasks, sorted by id.
    fn all_tasks(&self) -> Vec<Task>;

    /// Snapshot of all epics, sorted by id.
    fn all_epics(&self) -> Vec<Epic>;

    /// Snapshot of all subtasks, sorted by id.
    fn all_subtasks(&self) -> Vec<Subtask>;

    /// Subtasks owned by `epic_id` in the epic's list order; empty when
    /// the epic is absent.
    fn subtasks_of_epic(&self, epic_id: TaskId) -> Vec<Subtask>;

    /// Looks up a task. On a hit the task is recorded in the access log.
    fn task_by_id(&self, id: TaskId) -> Option<Task>;

    /// Looks up an epic. On a hit the epic is recorded in the access log.
    fn epic_by_id(&self, id: TaskId) -> Option<Epic>;

    /// Looks up a subtask. On a hit the subtask is recorded in the
    /// access log.
    fn subtask_by_id(&self, id: TaskId) -> Option<Subtask>;

    /// All tasks and subtasks (never epics), scheduled ones first in
    /// ascending start order (ties by id), then unscheduled ones by id.
    fn prioritized_tasks(&self) -> Vec<WorkItem>;

    /// Access-log snapshot, oldest access first.
    fn history(&self) -> Vec<WorkItem>;
}
