use std::collections::HashSet;
use std::sync::{Arc, mpsc as std_mpsc};
use std::time::Duration;

use tally::core::action::{Action, Effect, update};
use tally::core::edit::{cancel_edit, save_edit, set_edit_text, start_editing};
use tally::core::ids::SequentialIds;
use tally::core::model::{ListCollection, Task};
use tally::core::state::App;
use tally::core::store::{ListStore, Outcome};
use tally::storage::{FileStore, KeyValueStore, MemoryStore, Persistence, RetryPolicy, SaveQueue};

// ============================================================================
// Helper Functions
// ============================================================================

fn app() -> App {
    App::new(Box::new(SequentialIds::new()))
}

/// Drive the reducer the way the UI does, through a list of actions.
fn apply(app: &mut App, actions: Vec<Action>) -> Vec<Effect> {
    actions.into_iter().map(|a| update(app, a)).collect()
}

fn add_task(app: &mut App, list_id: i64, text: &str) {
    apply(
        app,
        vec![
            Action::SetNewTaskText {
                list_id,
                text: text.to_string(),
            },
            Action::SubmitTask(list_id),
        ],
    );
}

/// A collection exercising every field: completed tasks, a pending buffer
/// and an empty list.
fn busy_collection() -> ListCollection {
    let mut app = app();
    apply(
        &mut app,
        vec![
            Action::AddList("Groceries".into()),
            Action::AddList("Work".into()),
            Action::AddList("Someday".into()),
        ],
    );
    add_task(&mut app, 1, "Milk");
    add_task(&mut app, 1, "Bread");
    add_task(&mut app, 2, "Write report");
    update(
        &mut app,
        Action::ToggleTask {
            list_id: 1,
            task_index: 1,
        },
    );
    update(
        &mut app,
        Action::SetNewTaskText {
            list_id: 2,
            text: "Call Sam".into(),
        },
    );
    app.store.snapshot()
}

// ============================================================================
// Store Properties
// ============================================================================

#[test]
fn test_add_list_keeps_order_and_distinct_ids() {
    let names = ["Groceries", "Work", " Books ", "Travel", "Groceries"];
    let mut store = ListStore::new();
    let mut ids = SequentialIds::new();
    for name in names {
        assert!(store.add_list(name, &mut ids).is_some());
    }

    let lists = store.lists();
    assert_eq!(lists.len(), names.len());
    let unique: HashSet<_> = lists.iter().map(|l| l.id).collect();
    assert_eq!(unique.len(), names.len());
    let stored: Vec<_> = lists.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(stored, ["Groceries", "Work", " Books ", "Travel", "Groceries"]);
}

#[test]
fn test_blank_list_names_are_ignored() {
    let mut app = app();
    let effects = apply(
        &mut app,
        vec![Action::AddList(String::new()), Action::AddList("   ".into())],
    );
    assert_eq!(effects, [Effect::None, Effect::None]);
    assert!(app.store.lists().is_empty());
}

#[test]
fn test_add_task_appends_open_task_and_clears_buffer() {
    let mut store = ListStore::new();
    let id = store.add_list("Groceries", &mut SequentialIds::new()).unwrap();
    assert_eq!(store.set_new_task_text(id, "Milk"), Outcome::Changed);

    assert_eq!(store.add_task(id, "Milk"), Outcome::Changed);

    let list = store.get(id).unwrap();
    assert_eq!(list.tasks, [Task::new("Milk")]);
    assert!(!list.tasks[0].completed);
    assert_eq!(list.new_task_text, "");
}

#[test]
fn test_remove_task_keeps_list_with_remaining_tasks() {
    let mut app = app();
    update(&mut app, Action::AddList("Groceries".into()));
    add_task(&mut app, 1, "Milk");
    add_task(&mut app, 1, "Bread");

    let effect = update(
        &mut app,
        Action::RemoveTask {
            list_id: 1,
            task_index: 0,
        },
    );
    assert_eq!(effect, Effect::Persist);
    let list = app.store.get(1).unwrap();
    assert_eq!(list.tasks, [Task::new("Bread")]);
}

#[test]
fn test_toggle_twice_restores_completion() {
    let mut app = app();
    update(&mut app, Action::AddList("Groceries".into()));
    add_task(&mut app, 1, "Milk");

    let toggle = || Action::ToggleTask {
        list_id: 1,
        task_index: 0,
    };
    apply(&mut app, vec![toggle(), toggle()]);
    assert!(!app.store.task(1, 0).unwrap().completed);
}

#[test]
fn test_save_edit_trims_or_ignores_blank() {
    let mut store = ListStore::new();
    let id = store.add_list("Groceries", &mut SequentialIds::new()).unwrap();
    let _ = store.add_task(id, "Milk");
    let mut session = None;

    start_editing(&mut session, id, 0, "Milk");
    set_edit_text(&mut session, "   ");
    assert_eq!(save_edit(&mut session, &mut store), Outcome::Unchanged);
    assert_eq!(store.task(id, 0).unwrap().text, "Milk");

    start_editing(&mut session, id, 0, "Milk");
    set_edit_text(&mut session, "  Oat milk ");
    assert_eq!(save_edit(&mut session, &mut store), Outcome::Changed);
    assert_eq!(store.task(id, 0).unwrap().text, "Oat milk");
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_scenario_add_list_task_and_toggle() {
    let mut app = app();
    update(&mut app, Action::AddList("Groceries".into()));
    let id = app.store.lists()[0].id;
    add_task(&mut app, id, "Milk");
    update(
        &mut app,
        Action::ToggleTask {
            list_id: id,
            task_index: 0,
        },
    );

    let lists = app.store.lists();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].name, "Groceries");
    assert_eq!(
        lists[0].tasks,
        [Task {
            text: "Milk".into(),
            completed: true
        }]
    );
}

#[test]
fn test_scenario_removing_only_task_removes_list() {
    let mut app = app();
    apply(
        &mut app,
        vec![
            Action::AddList("Groceries".into()),
            Action::AddList("Work".into()),
        ],
    );
    add_task(&mut app, 1, "Milk");

    update(
        &mut app,
        Action::RemoveTask {
            list_id: 1,
            task_index: 0,
        },
    );
    assert!(app.store.get(1).is_none());
    assert_eq!(app.store.lists().len(), 1);
    assert_eq!(app.store.lists()[0].name, "Work");
}

#[test]
fn test_scenario_cancelled_edit_keeps_text() {
    let mut app = app();
    update(&mut app, Action::AddList("Groceries".into()));
    add_task(&mut app, 1, "Milk");

    let effects = apply(
        &mut app,
        vec![
            Action::StartEditing {
                list_id: 1,
                task_index: 0,
            },
            Action::SetEditText("Bread".into()),
            Action::CancelEdit,
        ],
    );
    assert!(effects.iter().all(|e| *e == Effect::None));
    assert_eq!(app.store.task(1, 0).unwrap().text, "Milk");
    assert!(app.edit.is_none());

    let mut session = None;
    start_editing(&mut session, 1, 0, "Milk");
    set_edit_text(&mut session, "Bread");
    cancel_edit(&mut session);
    assert!(session.is_none());
}

// ============================================================================
// Persistence
// ============================================================================

#[tokio::test]
async fn test_round_trip_through_memory_store() {
    let persistence = Persistence::new(Arc::new(MemoryStore::new()), "todoLists");
    let lists = busy_collection();

    persistence.save(&lists).await.unwrap();
    let loaded = persistence.load().await.unwrap();
    assert_eq!(loaded, Some(lists));
}

#[tokio::test]
async fn test_round_trip_through_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let lists = busy_collection();

    let persistence = Persistence::new(Arc::new(FileStore::new(dir.path())), "todoLists");
    persistence.save(&lists).await.unwrap();

    // A fresh store over the same directory sees what the first one wrote
    let reopened = Persistence::new(Arc::new(FileStore::new(dir.path())), "todoLists");
    assert_eq!(reopened.load_or_empty().await, lists);

    let app = App::restored(reopened.load_or_empty().await);
    assert_eq!(app.store.snapshot(), lists);
}

#[tokio::test]
async fn test_saved_json_uses_camel_case_buffer_field() {
    let store = Arc::new(MemoryStore::new());
    let persistence = Persistence::new(store.clone(), "todoLists");
    persistence.save(&busy_collection()).await.unwrap();

    let json = store.get("todoLists").await.unwrap().unwrap();
    assert!(json.contains("\"newTaskText\":\"Call Sam\""));
    assert!(!json.contains("new_task_text"));
}

#[tokio::test]
async fn test_corrupt_data_starts_empty() {
    let store = Arc::new(MemoryStore::new());
    store.set("todoLists", "{not json").await.unwrap();
    let persistence = Persistence::new(store, "todoLists");

    assert!(persistence.load().await.is_err());
    assert!(persistence.load_or_empty().await.is_empty());
}

#[tokio::test]
async fn test_save_queue_leaves_newest_snapshot_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let persistence = Persistence::new(Arc::new(FileStore::new(dir.path())), "todoLists");
    let (tx, rx) = std_mpsc::channel();
    let queue = SaveQueue::spawn(
        persistence.clone(),
        RetryPolicy {
            attempts: 1,
            backoff: Duration::from_millis(1),
        },
        tx,
    );

    let mut app = app();
    update(&mut app, Action::AddList("Groceries".into()));
    for text in ["M", "Mi", "Mil", "Milk"] {
        let effect = update(
            &mut app,
            Action::SetNewTaskText {
                list_id: 1,
                text: text.into(),
            },
        );
        if effect == Effect::Persist {
            queue.enqueue(app.store.snapshot());
        }
    }
    queue.shutdown().await;

    let saved = persistence.load().await.unwrap().unwrap();
    assert_eq!(saved[0].new_task_text, "Milk");
    assert!(rx.try_recv().is_err());
}
