//! File-backed store decorator.
//!
//! [`FileBackedTaskStore`] wraps an [`InMemoryTaskStore`] and rewrites
//! the whole flat-record file after every successful mutation, the
//! header line first, then tasks, epics, and subtasks in id order.
//! Loading goes through the engine's trusted re-hydration path, so a
//! reload never re-derives overlap errors for historical data and ends
//! with every epic recomputed and the id counter advanced.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::persist::{self, PersistError};
use crate::store::memory::InMemoryTaskStore;
use crate::store::TaskStore;
use crate::types::{Epic, Subtask, Task, TaskId, WorkItem};

/// A work-item store persisted to a flat-record file.
///
/// # Examples
///
/// ```no_run
/// use taskboard::{FileBackedTaskStore, Task, TaskStore};
///
/// let store = FileBackedTaskStore::new("tasks.csv");
/// store.add_task(Task::new("groceries", "milk and bread")).unwrap();
///
/// let reloaded = FileBackedTaskStore::load("tasks.csv").unwrap();
/// assert_eq!(reloaded.all_tasks().len(), 1);
/// ```
#[derive(Debug)]
pub struct FileBackedTaskStore {
    inner: InMemoryTaskStore,
    path: PathBuf,
}

impl FileBackedTaskStore {
    /// Creates an empty store that will save to `path`.
    ///
    /// Nothing is written until the first mutation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: InMemoryTaskStore::new(),
            path: path.into(),
        }
    }

    /// Builds a store from a previously saved file.
    ///
    /// A missing file yields an empty store. Blank lines are skipped;
    /// the first line is the header. Subtasks whose epic is present are
    /// re-linked, and the load finishes with a full epic recompute and
    /// the id counter set past the highest loaded id.
    ///
    /// # Errors
    ///
    /// [`StoreError::Persist`] when the file cannot be read or a record
    /// line cannot be decoded.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let store = Self {
            inner: InMemoryTaskStore::new(),
            path: path.clone(),
        };
        if !path.exists() {
            return Ok(store);
        }

        let content = fs::read_to_string(&path).map_err(|source| PersistError::Io {
            path: path.clone(),
            source,
        })?;

        for (index, line) in content.lines().enumerate() {
            if index == 0 || line.trim().is_empty() {
                continue;
            }
            match persist::decode_line(index + 1, line.trim())? {
                WorkItem::Task(task) => store.inner.restore_task(task),
                WorkItem::Epic(epic) => store.inner.restore_epic(epic),
                WorkItem::Subtask(subtask) => store.inner.restore_subtask(subtask),
            }
        }
        store.inner.finalize_restore();
        tracing::debug!(path = %path.display(), "loaded store from file");
        Ok(store)
    }

    /// The file this store saves to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrites the whole file from the current store contents.
    fn save(&self) -> Result<(), StoreError> {
        let mut lines = vec![persist::HEADER.to_string()];
        for task in self.inner.all_tasks() {
            lines.push(persist::encode_line(&WorkItem::Task(task)));
        }
        for epic in self.inner.all_epics() {
            lines.push(persist::encode_line(&WorkItem::Epic(epic)));
        }
        for subtask in self.inner.all_subtasks() {
            lines.push(persist::encode_line(&WorkItem::Subtask(subtask)));
        }

        let mut content = lines.join("\n");
        content.push('\n');
        fs::write(&self.path, content).map_err(|source| PersistError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}

impl TaskStore for FileBackedTaskStore {
    fn add_task(&self, task: Task) -> Result<TaskId, StoreError> {
        let id = self.inner.add_task(task)?;
        self.save()?;
        Ok(id)
    }

    fn add_epic(&self, epic: Epic) -> Result<TaskId, StoreError> {
        let id = self.inner.add_epic(epic)?;
        self.save()?;
        Ok(id)
    }

    fn add_subtask(&self, subtask: Subtask) -> Result<Option<TaskId>, StoreError> {
        let id = self.inner.add_subtask(subtask)?;
        self.save()?;
        Ok(id)
    }

    fn update_task(&self, task: Task) -> Result<(), StoreError> {
        self.inner.update_task(task)?;
        self.save()
    }

    fn update_epic(&self, epic: Epic) -> Result<(), StoreError> {
        self.inner.update_epic(epic)?;
        self.save()
    }

    fn update_subtask(&self, subtask: Subtask) -> Result<(), StoreError> {
        self.inner.update_subtask(subtask)?;
        self.save()
    }

    fn delete_task_by_id(&self, id: TaskId) -> Result<(), StoreError> {
        self.inner.delete_task_by_id(id)?;
        self.save()
    }

    fn delete_epic_by_id(&self, id: TaskId) -> Result<(), StoreError> {
        self.inner.delete_epic_by_id(id)?;
        self.save()
    }

    fn delete_subtask_by_id(&self, id: TaskId) -> Result<(), StoreError> {
        self.inner.delete_subtask_by_id(id)?;
        self.save()
    }

    fn clear_tasks(&self) -> Result<(), StoreError> {
        self.inner.clear_tasks()?;
        self.save()
    }

    fn clear_epics(&self) -> Result<(), StoreError> {
        self.inner.clear_epics()?;
        self.save()
    }

    fn clear_subtasks(&self) -> Result<(), StoreError> {
        self.inner.clear_subtasks()?;
        self.save()
    }

    fn all_tasks(&self) -> Vec<Task> {
        self.inner.all_tasks()
    }

    fn all_epics(&self) -> Vec<Epic> {
        self.inner.all_epics()
    }

    fn all_subtasks(&self) -> Vec<Subtask> {
        self.inner.all_subtasks()
    }

    fn subtasks_of_epic(&self, epic_id: TaskId) -> Vec<Subtask> {
        self.inner.subtasks_of_epic(epic_id)
    }

    fn task_by_id(&self, id: TaskId) -> Option<Task> {
        self.inner.task_by_id(id)
    }

    fn epic_by_id(&self, id: TaskId) -> Option<Epic> {
        self.inner.epic_by_id(id)
    }

    fn subtask_by_id(&self, id: TaskId) -> Option<Subtask> {
        self.inner.subtask_by_id(id)
    }

    fn prioritized_tasks(&self) -> Vec<WorkItem> {
        self.inner.prioritized_tasks()
    }

    fn history(&self) -> Vec<WorkItem> {
        self.inner.history()
    }
}
