//! End-to-end store lifecycle tests: epic derivation, schedule conflict
//! rejection, history pruning, and the file round trip, driven through
//! the public [`TaskStore`] surface.

use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use taskboard::{
    Epic, FileBackedTaskStore, InMemoryTaskStore, Status, StoreError, Subtask, Task, TaskId,
    TaskStore, WorkItem,
};

fn at(hour: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(hour, min, 0)
        .unwrap()
}

#[test]
fn epic_status_walkthrough() {
    let store = InMemoryTaskStore::new();
    let epic_id = store.add_epic(Epic::new("release", "ship the thing")).unwrap();
    let s1 = store
        .add_subtask(Subtask::new("write docs", "", Status::New, epic_id))
        .unwrap()
        .unwrap();
    let s2 = store
        .add_subtask(Subtask::new("tag build", "", Status::New, epic_id))
        .unwrap()
        .unwrap();
    assert_eq!(store.epic_by_id(epic_id).unwrap().status, Status::New);

    let mut docs = store.subtask_by_id(s1).unwrap();
    docs.status = Status::Done;
    store.update_subtask(docs).unwrap();
    assert_eq!(store.epic_by_id(epic_id).unwrap().status, Status::InProgress);

    let mut build = store.subtask_by_id(s2).unwrap();
    build.status = Status::Done;
    store.update_subtask(build).unwrap();
    assert_eq!(store.epic_by_id(epic_id).unwrap().status, Status::Done);
}

#[test]
fn schedule_conflict_walkthrough() {
    let store = InMemoryTaskStore::new();
    store
        .add_task(Task::new("meeting", "").with_schedule(60, at(10, 0)))
        .unwrap();

    // Intersects 10:00-11:00.
    let err = store
        .add_task(Task::new("call", "").with_schedule(30, at(10, 30)))
        .unwrap_err();
    assert!(matches!(err, StoreError::ScheduleConflict { .. }));

    // Touches the 11:00 endpoint; half-open windows do not conflict.
    store
        .add_task(Task::new("lunch", "").with_schedule(30, at(11, 0)))
        .unwrap();
    assert_eq!(store.all_tasks().len(), 2);
}

#[test]
fn subtask_with_unknown_epic_is_not_stored() {
    let store = InMemoryTaskStore::new();
    let assigned = store
        .add_subtask(Subtask::new("orphan", "", Status::New, 999))
        .unwrap();
    assert_eq!(assigned, None);
    assert!(store.all_subtasks().is_empty());
}

#[test]
fn deleting_epic_prunes_store_and_history_together() {
    let store = InMemoryTaskStore::new();
    let epic_id = store.add_epic(Epic::new("move", "")).unwrap();
    let s1 = store
        .add_subtask(Subtask::new("pack", "", Status::New, epic_id))
        .unwrap()
        .unwrap();
    let s2 = store
        .add_subtask(Subtask::new("movers", "", Status::New, epic_id))
        .unwrap()
        .unwrap();

    store.epic_by_id(epic_id).unwrap();
    store.subtask_by_id(s1).unwrap();
    store.subtask_by_id(s2).unwrap();
    assert_eq!(store.history().len(), 3);

    store.delete_epic_by_id(epic_id).unwrap();

    assert!(store.all_epics().is_empty());
    assert!(store.all_subtasks().is_empty());
    assert!(store.history().is_empty());
}

#[test]
fn history_grows_without_bound_and_dedupes() {
    let store = InMemoryTaskStore::new();
    let mut ids = Vec::new();
    for i in 0..15 {
        ids.push(store.add_task(Task::new(format!("task {i}"), "")).unwrap());
    }
    for id in &ids {
        store.task_by_id(*id).unwrap();
    }
    assert_eq!(store.history().len(), 15);

    // Re-visiting the first task moves it to the end, nothing grows.
    store.task_by_id(ids[0]).unwrap();
    let history = store.history();
    assert_eq!(history.len(), 15);
    assert_eq!(history.last().unwrap().id(), ids[0]);
}

#[test]
fn prioritized_listing_interleaves_tasks_and_subtasks() {
    let store = InMemoryTaskStore::new();
    let afternoon = store
        .add_task(Task::new("afternoon", "").with_schedule(30, at(14, 0)))
        .unwrap();
    let epic_id = store.add_epic(Epic::new("epic", "")).unwrap();
    let morning = store
        .add_subtask(Subtask::new("morning", "", Status::New, epic_id).with_schedule(30, at(9, 0)))
        .unwrap()
        .unwrap();
    let sometime = store.add_task(Task::new("sometime", "")).unwrap();

    let ids: Vec<TaskId> = store.prioritized_tasks().iter().map(WorkItem::id).collect();
    assert_eq!(ids, vec![morning, afternoon, sometime]);
}

#[test]
fn update_epic_only_renames_and_keeps_derivations() {
    let store = InMemoryTaskStore::new();
    let epic_id = store.add_epic(Epic::new("old name", "old text")).unwrap();
    store
        .add_subtask(
            Subtask::new("sub", "", Status::InProgress, epic_id).with_schedule(30, at(9, 0)),
        )
        .unwrap();

    let mut renamed = Epic::new("new name", "new text");
    renamed.id = epic_id;
    store.update_epic(renamed).unwrap();

    let epic = store.epic_by_id(epic_id).unwrap();
    assert_eq!(epic.name, "new name");
    assert_eq!(epic.status, Status::InProgress);
    assert_eq!(epic.start_time, Some(at(9, 0)));
    assert_eq!(epic.subtask_ids().len(), 1);
}

#[test]
fn file_round_trip_matches_original_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.csv");

    let store = FileBackedTaskStore::new(&path);
    store
        .add_task(Task::new("groceries", "milk and bread"))
        .unwrap();
    store
        .add_task(Task::new("cleaning", "vacuum the flat").with_schedule(45, at(18, 0)))
        .unwrap();
    let epic_id = store.add_epic(Epic::new("move", "new flat")).unwrap();
    store
        .add_subtask(Subtask::new("pack", "boxes", Status::New, epic_id))
        .unwrap();
    store
        .add_subtask(
            Subtask::new("movers", "book a company", Status::Done, epic_id)
                .with_schedule(60, at(10, 0)),
        )
        .unwrap();

    let reloaded = FileBackedTaskStore::load(&path).unwrap();
    assert_eq!(reloaded.all_tasks(), store.all_tasks());
    assert_eq!(reloaded.all_epics(), store.all_epics());
    assert_eq!(reloaded.all_subtasks(), store.all_subtasks());

    // The reloaded store keeps enforcing the same schedule.
    assert!(reloaded
        .add_task(Task::new("clash", "").with_schedule(30, at(10, 15)))
        .is_err());
}

#[test]
fn stores_are_interchangeable_behind_the_trait() {
    fn exercise(store: &dyn TaskStore) {
        let epic_id = store.add_epic(Epic::new("epic", "")).unwrap();
        store
            .add_subtask(Subtask::new("sub", "", Status::Done, epic_id))
            .unwrap();
        assert_eq!(store.epic_by_id(epic_id).unwrap().status, Status::Done);
    }

    let dir = tempfile::tempdir().unwrap();
    exercise(&InMemoryTaskStore::new());
    exercise(&FileBackedTaskStore::new(dir.path().join("tasks.csv")));
}
