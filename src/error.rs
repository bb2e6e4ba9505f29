//! Error types for store operations.
//!
//! The in-memory engine can only fail with
//! [`StoreError::ScheduleConflict`]; absent entities are expressed as
//! `Option`/no-op results, never as errors. The file-backed store adds
//! [`StoreError::Persist`] for codec and I/O failures.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::persist::PersistError;
use crate::types::TaskId;

/// Errors surfaced by [`TaskStore`](crate::TaskStore) operations.
///
/// A `ScheduleConflict` is reported before any state is touched, so a
/// failed add or update leaves the store exactly as it was.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use taskboard::{InMemoryTaskStore, StoreError, Task, TaskStore};
///
/// let store = InMemoryTaskStore::new();
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1)
///     .unwrap()
///     .and_hms_opt(10, 0, 0)
///     .unwrap();
/// store.add_task(Task::new("first", "").with_schedule(60, start)).unwrap();
///
/// let err = store
///     .add_task(Task::new("second", "").with_schedule(60, start))
///     .unwrap_err();
/// assert!(matches!(err, StoreError::ScheduleConflict { .. }));
/// assert!(err.to_string().contains("second"));
/// ```
#[derive(Debug, Error)]
pub enum StoreError {
    /// The candidate's scheduled window intersects an already stored one.
    #[error(
        "schedule conflict: '{candidate}' ({candidate_start} to {candidate_end}) \
         overlaps '{existing}' (id {existing_id})"
    )]
    ScheduleConflict {
        /// Name of the task or subtask being added or updated.
        candidate: String,
        /// Start of the rejected window.
        candidate_start: NaiveDateTime,
        /// End of the rejected window (exclusive).
        candidate_end: NaiveDateTime,
        /// Id of the stored item it collides with.
        existing_id: TaskId,
        /// Name of the stored item it collides with.
        existing: String,
    },

    /// Saving to or loading from the backing file failed.
    #[error(transparent)]
    Persist(#[from] PersistError),
}
