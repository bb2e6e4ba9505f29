//! Console walkthrough of the file-backed store: create a handful of
//! work items, reload them from disk, and show the access history.
//!
//! Run with `RUST_LOG=taskboard=debug` to watch the store's tracing
//! output alongside the printed summary.

use taskboard::{Epic, FileBackedTaskStore, Status, Subtask, Task, TaskStore};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), taskboard::StoreError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = std::env::temp_dir().join("taskboard-demo.csv");

    println!("=== building a file-backed store at {} ===", path.display());
    let store = FileBackedTaskStore::new(&path);

    store.add_task(Task::new("groceries", "milk and bread"))?;
    store.add_task(Task::new("cleaning", "vacuum and mop"))?;
    let epic_id = store.add_epic(Epic::new("move", "move to the new flat"))?;
    store.add_subtask(Subtask::new("pack", "boxes and tape", Status::New, epic_id))?;
    store.add_subtask(Subtask::new(
        "movers",
        "book a moving company",
        Status::Done,
        epic_id,
    ))?;

    println!("tasks:    {}", store.all_tasks().len());
    println!("epics:    {}", store.all_epics().len());
    println!("subtasks: {}", store.all_subtasks().len());

    println!("\n=== reloading from the same file ===");
    let reloaded = FileBackedTaskStore::load(&path)?;
    println!("tasks:    {}", reloaded.all_tasks().len());
    println!("epics:    {}", reloaded.all_epics().len());
    println!("subtasks: {}", reloaded.all_subtasks().len());

    println!("\n=== comparing stores ===");
    println!("tasks match:    {}", store.all_tasks() == reloaded.all_tasks());
    println!("epics match:    {}", store.all_epics() == reloaded.all_epics());
    println!(
        "subtasks match: {}",
        store.all_subtasks() == reloaded.all_subtasks()
    );

    println!("\n=== access history ===");
    for epic in reloaded.all_epics() {
        let _ = reloaded.epic_by_id(epic.id);
        println!(
            "epic '{}' is {} with {} subtasks",
            epic.name,
            epic.status,
            epic.subtask_ids().len()
        );
    }
    for subtask in reloaded.all_subtasks() {
        let _ = reloaded.subtask_by_id(subtask.id);
    }
    for item in reloaded.history() {
        println!("visited {} '{}' (id {})", item.kind(), item.name(), item.id());
    }

    std::fs::remove_file(&path).ok();
    Ok(())
}
