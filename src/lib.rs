//! In-process store for hierarchical work items.
//!
//! Three kinds of item live in the store: standalone [`Task`]s,
//! grouping [`Epic`]s, and epic-owned [`Subtask`]s. The store is the
//! sole authority over ids and over derived state:
//!
//! - an epic's status and time span are always recomputed from its
//!   subtasks, never taken from callers;
//! - scheduled tasks and subtasks are kept in a time-ordered index and
//!   any add or update whose half-open window would intersect an
//!   existing one is rejected with [`StoreError::ScheduleConflict`]
//!   before anything changes;
//! - by-id lookups feed an unbounded, duplicate-free [`AccessLog`]
//!   that deletions prune in the same operation.
//!
//! # Quick Start
//!
//! ```
//! use taskboard::{Epic, InMemoryTaskStore, Status, Subtask, TaskStore};
//!
//! let store = InMemoryTaskStore::new();
//! let epic_id = store.add_epic(Epic::new("move", "move to the new flat")).unwrap();
//! store
//!     .add_subtask(Subtask::new("pack", "boxes and tape", Status::New, epic_id))
//!     .unwrap();
//! store
//!     .add_subtask(Subtask::new("movers", "book a company", Status::Done, epic_id))
//!     .unwrap();
//!
//! let epic = store.epic_by_id(epic_id).unwrap();
//! assert_eq!(epic.status, Status::InProgress);
//! assert_eq!(store.history().len(), 1);
//! ```
//!
//! # Persistence
//!
//! [`FileBackedTaskStore`] mirrors every mutation to a flat-record file
//! and [`FileBackedTaskStore::load`] rebuilds a consistent store from
//! it through the engine's trusted re-hydration path
//! ([`InMemoryTaskStore::restore_task`] and friends followed by
//! [`InMemoryTaskStore::finalize_restore`]).
//!
//! # Module Organization
//!
//! - [`types`] - item value types and the status/kind enums
//! - [`store`] - the [`TaskStore`] trait and both store implementations
//! - [`history`] - the access-recency log
//! - [`persist`] - the flat-record codec
//! - [`error`] - error types

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod history;
pub mod persist;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use history::AccessLog;
pub use persist::PersistError;
pub use store::file::FileBackedTaskStore;
pub use store::memory::InMemoryTaskStore;
pub use store::TaskStore;
pub use types::{Epic, Status, Subtask, Task, TaskId, TaskKind, WorkItem};
