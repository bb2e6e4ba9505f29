//! Access-recency log: an ordered, duplicate-free sequence of work
//! items, most recently accessed last.
//!
//! The ordering is an id-keyed doubly-linked list: each entry knows the
//! ids of its neighbours and a `HashMap` gives O(1) access to any entry,
//! so both [`AccessLog::record`] and [`AccessLog::remove`] run in
//! constant time regardless of how long the log has grown. The log is
//! unbounded.
//!
//! The log never touches the store's entities; it keeps clones taken at
//! access time and forgets them when the underlying entity is deleted.

use std::collections::HashMap;

use crate::types::{TaskId, WorkItem};

#[derive(Debug, Clone)]
struct Node {
    item: WorkItem,
    prev: Option<TaskId>,
    next: Option<TaskId>,
}

/// Ordered, deduplicated log of accessed work items.
///
/// # Examples
///
/// ```
/// use taskboard::{AccessLog, Task, WorkItem};
///
/// let mut log = AccessLog::new();
/// let mut a = Task::new("a", "");
/// a.id = 1;
/// let mut b = Task::new("b", "");
/// b.id = 2;
///
/// log.record(WorkItem::Task(a.clone()));
/// log.record(WorkItem::Task(b));
/// log.record(WorkItem::Task(a)); // bumps id 1 to the end
///
/// let ids: Vec<_> = log.snapshot().iter().map(|i| i.id()).collect();
/// assert_eq!(ids, vec![2, 1]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AccessLog {
    nodes: HashMap<TaskId, Node>,
    head: Option<TaskId>,
    tail: Option<TaskId>,
}

impl AccessLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently in the log.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` when the log has no entries.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends `item` as the most recent entry.
    ///
    /// When an entry with the same id is already present it is removed
    /// from its old position first, so each id appears at most once and
    /// re-access moves an item to the end.
    pub fn record(&mut self, item: WorkItem) {
        let id = item.id();
        self.detach(id);

        let node = Node {
            item,
            prev: self.tail,
            next: None,
        };
        match self.tail {
            Some(tail_id) => {
                if let Some(tail) = self.nodes.get_mut(&tail_id) {
                    tail.next = Some(id);
                }
            }
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        self.nodes.insert(id, node);
    }

    /// Removes the entry with `id`, if present.
    pub fn remove(&mut self, id: TaskId) {
        self.detach(id);
    }

    /// Unlinks a node and patches its neighbours. No-op for unknown ids.
    fn detach(&mut self, id: TaskId) {
        let Some(node) = self.nodes.remove(&id) else {
            return;
        };
        match node.prev {
            Some(prev_id) => {
                if let Some(prev) = self.nodes.get_mut(&prev_id) {
                    prev.next = node.next;
                }
            }
            None => self.head = node.next,
        }
        match node.next {
            Some(next_id) => {
                if let Some(next) = self.nodes.get_mut(&next_id) {
                    next.prev = node.prev;
                }
            }
            None => self.tail = node.prev,
        }
    }

    /// Returns an independent copy of the log, oldest entry first.
    pub fn snapshot(&self) -> Vec<WorkItem> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let Some(node) = self.nodes.get(&id) else {
                break;
            };
            out.push(node.item.clone());
            cursor = node.next;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Task;
    use pretty_assertions::assert_eq;

    fn task(id: TaskId) -> WorkItem {
        let mut task = Task::new(format!("task {id}"), format!("description {id}"));
        task.id = id;
        WorkItem::Task(task)
    }

    fn ids(log: &AccessLog) -> Vec<TaskId> {
        log.snapshot().iter().map(WorkItem::id).collect()
    }

    #[test]
    fn record_single_item() {
        let mut log = AccessLog::new();
        log.record(task(1));
        assert_eq!(ids(&log), vec![1]);
    }

    #[test]
    fn record_keeps_access_order() {
        let mut log = AccessLog::new();
        log.record(task(1));
        log.record(task(2));
        log.record(task(3));
        assert_eq!(ids(&log), vec![1, 2, 3]);
    }

    #[test]
    fn re_recording_bumps_to_end_without_duplicating() {
        let mut log = AccessLog::new();
        log.record(task(1));
        log.record(task(2));
        log.record(task(3));
        log.record(task(1));
        assert_eq!(ids(&log), vec![2, 3, 1]);
    }

    #[test]
    fn re_recording_tail_is_stable() {
        let mut log = AccessLog::new();
        log.record(task(1));
        log.record(task(2));
        log.record(task(2));
        assert_eq!(ids(&log), vec![1, 2]);
    }

    #[test]
    fn re_recording_sole_entry() {
        let mut log = AccessLog::new();
        log.record(task(1));
        log.record(task(1));
        assert_eq!(ids(&log), vec![1]);
    }

    #[test]
    fn remove_middle_entry() {
        let mut log = AccessLog::new();
        log.record(task(1));
        log.record(task(2));
        log.record(task(3));
        log.remove(2);
        assert_eq!(ids(&log), vec![1, 3]);
    }

    #[test]
    fn remove_first_entry() {
        let mut log = AccessLog::new();
        log.record(task(1));
        log.record(task(2));
        log.record(task(3));
        log.remove(1);
        assert_eq!(ids(&log), vec![2, 3]);
    }

    #[test]
    fn remove_last_entry() {
        let mut log = AccessLog::new();
        log.record(task(1));
        log.record(task(2));
        log.record(task(3));
        log.remove(3);
        assert_eq!(ids(&log), vec![1, 2]);
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let mut log = AccessLog::new();
        log.record(task(1));
        log.record(task(2));
        log.remove(999);
        assert_eq!(ids(&log), vec![1, 2]);
    }

    #[test]
    fn remove_from_empty_log_is_noop() {
        let mut log = AccessLog::new();
        log.remove(1);
        assert!(log.snapshot().is_empty());
        assert!(log.is_empty());
    }

    #[test]
    fn remove_every_entry() {
        let mut log = AccessLog::new();
        log.record(task(1));
        log.record(task(2));
        log.record(task(3));
        log.remove(1);
        log.remove(2);
        log.remove(3);
        assert!(log.snapshot().is_empty());
        assert_eq!(log.len(), 0);
    }

    #[test]
    fn log_is_unbounded() {
        let mut log = AccessLog::new();
        for id in 1..=15 {
            log.record(task(id));
        }
        let snapshot = log.snapshot();
        assert_eq!(snapshot.len(), 15);
        assert_eq!(snapshot[0].id(), 1);
        assert_eq!(snapshot[14].id(), 15);
    }

    #[test]
    fn snapshots_are_independent() {
        let mut log = AccessLog::new();
        log.record(task(1));

        let mut first = log.snapshot();
        let second = log.snapshot();
        first.clear();

        assert_eq!(second.len(), 1);
        assert_eq!(log.snapshot().len(), 1);
    }

    #[test]
    fn interleaved_bumps_and_removals() {
        let mut log = AccessLog::new();
        log.record(task(1));
        log.record(task(2));
        log.record(task(3));
        log.record(task(1));
        assert_eq!(ids(&log), vec![2, 3, 1]);

        log.remove(3);
        assert_eq!(ids(&log), vec![2, 1]);

        log.record(task(3));
        assert_eq!(ids(&log), vec![2, 1, 3]);
    }
}
