//! In-memory store engine.
//!
//! [`InMemoryTaskStore`] is the sole authority over entity existence,
//! id assignment, epic derivation, and temporal non-overlap. All state
//! -- the three entity maps, the id counter, the temporal index, and
//! the access log -- lives behind one `parking_lot::Mutex`, acquired
//! exactly once per operation, so every operation is atomic with
//! respect to concurrent callers.
//!
//! # Temporal index
//!
//! Scheduled tasks and subtasks (both start and duration set) are
//! indexed in a `BTreeMap` keyed by `(start, id)` with the window end
//! as value. Conflict checks walk the index in start order and stop as
//! soon as an entry starts at or after the candidate's end, so a check
//! touches only the windows that could possibly intersect. Intervals
//! are half-open: touching windows do not conflict.
//!
//! # Re-hydration
//!
//! The `restore_*` methods are the trusted bulk-load path for a
//! persistence collaborator: ids are kept as given and overlap
//! validation is skipped. After restoring, call
//! [`finalize_restore`](InMemoryTaskStore::finalize_restore) to
//! recompute every epic and advance the id counter past the loaded ids.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use parking_lot::Mutex;

use crate::error::StoreError;
use crate::history::AccessLog;
use crate::store::TaskStore;
use crate::types::item::span_end;
use crate::types::{Epic, Status, Subtask, Task, TaskId, WorkItem};

/// Complete scheduled window of an item, when it has one.
fn window(
    start: Option<NaiveDateTime>,
    minutes: Option<u64>,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let start = start?;
    let end = span_end(start, minutes?)?;
    Some((start, end))
}

#[derive(Debug)]
struct StoreState {
    next_id: TaskId,
    tasks: HashMap<TaskId, Task>,
    epics: HashMap<TaskId, Epic>,
    subtasks: HashMap<TaskId, Subtask>,
    /// `(start, id) -> end` for every scheduled task and subtask.
    schedule: BTreeMap<(NaiveDateTime, TaskId), NaiveDateTime>,
    history: AccessLog,
}

impl StoreState {
    fn new() -> Self {
        Self {
            next_id: 1,
            tasks: HashMap::new(),
            epics: HashMap::new(),
            subtasks: HashMap::new(),
            schedule: BTreeMap::new(),
            history: AccessLog::new(),
        }
    }

    fn assign_id(&mut self) -> TaskId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn index_insert(&mut self, id: TaskId, start: Option<NaiveDateTime>, minutes: Option<u64>) {
        if let Some((start, end)) = window(start, minutes) {
            self.schedule.insert((start, id), end);
        }
    }

    fn index_remove(&mut self, id: TaskId, start: Option<NaiveDateTime>, minutes: Option<u64>) {
        if let Some((start, _)) = window(start, minutes) {
            self.schedule.remove(&(start, id));
        }
    }

    fn item_name(&self, id: TaskId) -> String {
        if let Some(task) = self.tasks.get(&id) {
            task.name.clone()
        } else if let Some(subtask) = self.subtasks.get(&id) {
            subtask.name.clone()
        } else {
            String::from("unknown")
        }
    }

    /// Rejects a candidate window that intersects any indexed window
    /// other than the candidate's own previous one.
    fn ensure_free(
        &self,
        own_id: Option<TaskId>,
        candidate: &str,
        start: Option<NaiveDateTime>,
        minutes: Option<u64>,
    ) -> Result<(), StoreError> {
        let Some((cand_start, cand_end)) = window(start, minutes) else {
            return Ok(());
        };

        for (&(entry_start, entry_id), &entry_end) in &self.schedule {
            if entry_start >= cand_end {
                break;
            }
            if own_id == Some(entry_id) {
                continue;
            }
            if cand_start < entry_end {
                tracing::warn!(
                    candidate,
                    existing_id = entry_id,
                    "rejected schedule conflict"
                );
                return Err(StoreError::ScheduleConflict {
                    candidate: candidate.to_string(),
                    candidate_start: cand_start,
                    candidate_end: cand_end,
                    existing_id: entry_id,
                    existing: self.item_name(entry_id),
                });
            }
        }
        Ok(())
    }

    /// Rederives an epic's status and time span from its current
    /// subtasks. Safe to call for absent epics.
    fn recompute_epic(&mut self, epic_id: TaskId) {
        let Some(epic) = self.epics.get(&epic_id) else {
            return;
        };
        let subtask_ids = epic.subtask_ids.clone();

        let mut total = 0usize;
        let mut new_count = 0usize;
        let mut done_count = 0usize;
        let mut earliest: Option<NaiveDateTime> = None;
        let mut latest: Option<NaiveDateTime> = None;
        let mut total_minutes = 0u64;
        let mut any_scheduled = false;

        for subtask in subtask_ids.iter().filter_map(|id| self.subtasks.get(id)) {
            total += 1;
            match subtask.status {
                Status::New => new_count += 1,
                Status::Done => done_count += 1,
                Status::InProgress => {}
            }
            if let (Some(start), Some(minutes), Some(end)) =
                (subtask.start_time, subtask.duration_min, subtask.end_time())
            {
                any_scheduled = true;
                total_minutes += minutes;
                if earliest.is_none_or(|e| start < e) {
                    earliest = Some(start);
                }
                if latest.is_none_or(|l| end > l) {
                    latest = Some(end);
                }
            }
        }

        let status = if total == 0 || new_count == total {
            Status::New
        } else if done_count == total {
            Status::Done
        } else {
            Status::InProgress
        };

        if let Some(epic) = self.epics.get_mut(&epic_id) {
            epic.status = status;
            if any_scheduled {
                epic.start_time = earliest;
                epic.end_time = latest;
                epic.duration_min = Some(total_minutes);
            } else {
                epic.start_time = None;
                epic.end_time = None;
                epic.duration_min = None;
            }
        }
    }
}

/// Thread-safe in-memory work-item store.
///
/// # Examples
///
/// ```
/// use taskboard::{InMemoryTaskStore, Status, Subtask, Epic, TaskStore};
///
/// let store = InMemoryTaskStore::new();
/// let epic_id = store.add_epic(Epic::new("move", "")).unwrap();
/// store
///     .add_subtask(Subtask::new("pack", "", Status::Done, epic_id))
///     .unwrap();
///
/// let epic = store.epic_by_id(epic_id).unwrap();
/// assert_eq!(epic.status, Status::Done);
/// ```
#[derive(Debug)]
pub struct InMemoryTaskStore {
    state: Mutex<StoreState>,
}

impl InMemoryTaskStore {
    /// Creates an empty store with the id counter at 1.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState::new()),
        }
    }

    /// Trusted load path: stores a task under its pre-assigned id,
    /// skipping overlap validation but populating the temporal index.
    pub fn restore_task(&self, task: Task) {
        let mut state = self.state.lock();
        state.index_insert(task.id, task.start_time, task.duration_min);
        state.tasks.insert(task.id, task);
    }

    /// Trusted load path: stores an epic under its pre-assigned id.
    /// Subtask linkage is rebuilt by the subsequent
    /// [`restore_subtask`](Self::restore_subtask) calls.
    pub fn restore_epic(&self, epic: Epic) {
        let mut state = self.state.lock();
        state.epics.insert(epic.id, epic);
    }

    /// Trusted load path: stores a subtask under its pre-assigned id
    /// and links it to its epic when that epic is already present.
    pub fn restore_subtask(&self, subtask: Subtask) {
        let mut state = self.state.lock();
        state.index_insert(subtask.id, subtask.start_time, subtask.duration_min);
        let id = subtask.id;
        let epic_id = subtask.epic_id;
        state.subtasks.insert(id, subtask);
        if let Some(epic) = state.epics.get_mut(&epic_id) {
            epic.subtask_ids.push(id);
        }
    }

    /// Finishes a bulk load: recomputes every epic's derived status and
    /// time span and moves the id counter past the highest loaded id.
    pub fn finalize_restore(&self) {
        let mut state = self.state.lock();

        let max_id = state
            .tasks
            .keys()
            .chain(state.epics.keys())
            .chain(state.subtasks.keys())
            .copied()
            .max()
            .unwrap_or(0);
        state.next_id = max_id + 1;

        let epic_ids: Vec<TaskId> = state.epics.keys().copied().collect();
        for epic_id in epic_ids {
            state.recompute_epic(epic_id);
        }
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore for InMemoryTaskStore {
    fn add_task(&self, mut task: Task) -> Result<TaskId, StoreError> {
        let mut state = self.state.lock();
        state.ensure_free(None, &task.name, task.start_time, task.duration_min)?;

        let id = state.assign_id();
        task.id = id;
        state.index_insert(id, task.start_time, task.duration_min);
        tracing::debug!(id, name = %task.name, "stored task");
        state.tasks.insert(id, task);
        Ok(id)
    }

    fn add_epic(&self, mut epic: Epic) -> Result<TaskId, StoreError> {
        let mut state = self.state.lock();
        let id = state.assign_id();
        epic.id = id;
        // Derived state starts from a clean slate no matter what the
        // caller filled in.
        epic.subtask_ids.clear();
        epic.status = Status::New;
        epic.start_time = None;
        epic.end_time = None;
        epic.duration_min = None;
        tracing::debug!(id, name = %epic.name, "stored epic");
        state.epics.insert(id, epic);
        Ok(id)
    }

    fn add_subtask(&self, mut subtask: Subtask) -> Result<Option<TaskId>, StoreError> {
        let mut state = self.state.lock();
        if !state.epics.contains_key(&subtask.epic_id) {
            tracing::debug!(
                epic_id = subtask.epic_id,
                name = %subtask.name,
                "dropped subtask referencing unknown epic"
            );
            return Ok(None);
        }
        state.ensure_free(None, &subtask.name, subtask.start_time, subtask.duration_min)?;

        let id = state.assign_id();
        subtask.id = id;
        let epic_id = subtask.epic_id;
        state.index_insert(id, subtask.start_time, subtask.duration_min);
        tracing::debug!(id, epic_id, name = %subtask.name, "stored subtask");
        state.subtasks.insert(id, subtask);
        if let Some(epic) = state.epics.get_mut(&epic_id) {
            epic.subtask_ids.push(id);
        }
        state.recompute_epic(epic_id);
        Ok(Some(id))
    }

    fn update_task(&self, task: Task) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        let Some(old) = state.tasks.get(&task.id) else {
            return Ok(());
        };
        let old_start = old.start_time;
        let old_minutes = old.duration_min;
        state.ensure_free(Some(task.id), &task.name, task.start_time, task.duration_min)?;

        state.index_remove(task.id, old_start, old_minutes);
        state.index_insert(task.id, task.start_time, task.duration_min);
        state.tasks.insert(task.id, task);
        Ok(())
    }

    fn update_epic(&self, mut epic: Epic) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        let Some(old) = state.epics.get(&epic.id) else {
            return Ok(());
        };
        // Keep the stored linkage: incoming ids first, then any stored
        // ids the incoming list does not already carry.
        for id in &old.subtask_ids {
            if !epic.subtask_ids.contains(id) {
                epic.subtask_ids.push(*id);
            }
        }
        let epic_id = epic.id;
        state.epics.insert(epic_id, epic);
        state.recompute_epic(epic_id);
        Ok(())
    }

    fn update_subtask(&self, mut subtask: Subtask) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        let Some(old) = state.subtasks.get(&subtask.id) else {
            return Ok(());
        };
        let old_start = old.start_time;
        let old_minutes = old.duration_min;
        // The owning epic is fixed at creation.
        subtask.epic_id = old.epic_id;
        state.ensure_free(
            Some(subtask.id),
            &subtask.name,
            subtask.start_time,
            subtask.duration_min,
        )?;

        state.index_remove(subtask.id, old_start, old_minutes);
        state.index_insert(subtask.id, subtask.start_time, subtask.duration_min);
        let epic_id = subtask.epic_id;
        state.subtasks.insert(subtask.id, subtask);
        state.recompute_epic(epic_id);
        Ok(())
    }

    fn delete_task_by_id(&self, id: TaskId) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        if let Some(task) = state.tasks.remove(&id) {
            state.index_remove(id, task.start_time, task.duration_min);
            state.history.remove(id);
            tracing::debug!(id, "deleted task");
        }
        Ok(())
    }

    fn delete_epic_by_id(&self, id: TaskId) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        if let Some(epic) = state.epics.remove(&id) {
            state.history.remove(id);
            for subtask_id in epic.subtask_ids {
                if let Some(subtask) = state.subtasks.remove(&subtask_id) {
                    state.index_remove(subtask_id, subtask.start_time, subtask.duration_min);
                    state.history.remove(subtask_id);
                }
            }
            tracing::debug!(id, "deleted epic with its subtasks");
        }
        Ok(())
    }

    fn delete_subtask_by_id(&self, id: TaskId) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        if let Some(subtask) = state.subtasks.remove(&id) {
            state.index_remove(id, subtask.start_time, subtask.duration_min);
            state.history.remove(id);
            if let Some(epic) = state.epics.get_mut(&subtask.epic_id) {
                epic.subtask_ids.retain(|owned| *owned != id);
            }
            state.recompute_epic(subtask.epic_id);
            tracing::debug!(id, epic_id = subtask.epic_id, "deleted subtask");
        }
        Ok(())
    }

    fn clear_tasks(&self) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        let drained: Vec<Task> = state.tasks.drain().map(|(_, task)| task).collect();
        for task in drained {
            state.index_remove(task.id, task.start_time, task.duration_min);
            state.history.remove(task.id);
        }
        Ok(())
    }

    fn clear_epics(&self) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        let epic_ids: Vec<TaskId> = state.epics.drain().map(|(id, _)| id).collect();
        for id in epic_ids {
            state.history.remove(id);
        }
        // Subtasks cannot outlive their epics.
        let drained: Vec<Subtask> = state.subtasks.drain().map(|(_, subtask)| subtask).collect();
        for subtask in drained {
            state.index_remove(subtask.id, subtask.start_time, subtask.duration_min);
            state.history.remove(subtask.id);
        }
        Ok(())
    }

    fn clear_subtasks(&self) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        let drained: Vec<Subtask> = state.subtasks.drain().map(|(_, subtask)| subtask).collect();
        for subtask in drained {
            state.index_remove(subtask.id, subtask.start_time, subtask.duration_min);
            state.history.remove(subtask.id);
        }
        for epic in state.epics.values_mut() {
            epic.subtask_ids.clear();
            epic.status = Status::New;
            epic.start_time = None;
            epic.end_time = None;
            epic.duration_min = None;
        }
        Ok(())
    }

    fn all_tasks(&self) -> Vec<Task> {
        let state = self.state.lock();
        let mut tasks: Vec<Task> = state.tasks.values().cloned().collect();
        tasks.sort_by_key(|task| task.id);
        tasks
    }

    fn all_epics(&self) -> Vec<Epic> {
        let state = self.state.lock();
        let mut epics: Vec<Epic> = state.epics.values().cloned().collect();
        epics.sort_by_key(|epic| epic.id);
        epics
    }

    fn all_subtasks(&self) -> Vec<Subtask> {
        let state = self.state.lock();
        let mut subtasks: Vec<Subtask> = state.subtasks.values().cloned().collect();
        subtasks.sort_by_key(|subtask| subtask.id);
        subtasks
    }

    fn subtasks_of_epic(&self, epic_id: TaskId) -> Vec<Subtask> {
        let state = self.state.lock();
        let Some(epic) = state.epics.get(&epic_id) else {
            return Vec::new();
        };
        epic.subtask_ids
            .iter()
            .filter_map(|id| state.subtasks.get(id).cloned())
            .collect()
    }

    fn task_by_id(&self, id: TaskId) -> Option<Task> {
        let mut state = self.state.lock();
        let task = state.tasks.get(&id).cloned();
        if let Some(task) = &task {
            state.history.record(WorkItem::Task(task.clone()));
        }
        task
    }

    fn epic_by_id(&self, id: TaskId) -> Option<Epic> {
        let mut state = self.state.lock();
        let epic = state.epics.get(&id).cloned();
        if let Some(epic) = &epic {
            state.history.record(WorkItem::Epic(epic.clone()));
        }
        epic
    }

    fn subtask_by_id(&self, id: TaskId) -> Option<Subtask> {
        let mut state = self.state.lock();
        let subtask = state.subtasks.get(&id).cloned();
        if let Some(subtask) = &subtask {
            state.history.record(WorkItem::Subtask(subtask.clone()));
        }
        subtask
    }

    fn prioritized_tasks(&self) -> Vec<WorkItem> {
        let state = self.state.lock();

        let items = state
            .tasks
            .values()
            .cloned()
            .map(WorkItem::Task)
            .chain(state.subtasks.values().cloned().map(WorkItem::Subtask));

        let mut scheduled: Vec<(NaiveDateTime, TaskId, WorkItem)> = Vec::new();
        let mut unscheduled: Vec<(TaskId, WorkItem)> = Vec::new();
        for item in items {
            match item.start_time() {
                Some(start) => scheduled.push((start, item.id(), item)),
                None => unscheduled.push((item.id(), item)),
            }
        }
        scheduled.sort_by_key(|(start, id, _)| (*start, *id));
        unscheduled.sort_by_key(|(id, _)| *id);

        scheduled
            .into_iter()
            .map(|(_, _, item)| item)
            .chain(unscheduled.into_iter().map(|(_, item)| item))
            .collect()
    }

    fn history(&self) -> Vec<WorkItem> {
        self.state.lock().history.snapshot()
    }
}
