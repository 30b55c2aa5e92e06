//! Integration tests for the to-do store
//!
//! Drive `TodoStore` end to end against in-memory storage: creation,
//! toggling, removal, filtering and the persistence round trip.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use std::sync::Arc;
use todolist::{
    Filter, Task, TaskId, TodoAction, TodoEnvironment, TodoError, TodoReducer, TodoState,
    TodoStore, ValidationError,
};
use todolist_core::reducer::Reducer;
use todolist_testing::{test_clock, MemoryStorage, SteppingClock};

// ============================================================================
// Test Fixtures
// ============================================================================

fn stepping_env(storage: Arc<MemoryStorage>) -> TodoEnvironment {
    TodoEnvironment::new(
        Arc::new(SteppingClock::new(
            DateTime::<Utc>::UNIX_EPOCH + Duration::days(19_000),
            Duration::milliseconds(1),
        )),
        storage,
    )
}

fn new_store() -> (TodoStore, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    (TodoStore::new(stepping_env(Arc::clone(&storage))), storage)
}

// ============================================================================
// Operations
// ============================================================================

#[tokio::test]
async fn scenario_buy_milk() {
    let (store, _storage) = new_store();

    let task = store.create("Buy milk", "2024-01-10").await.unwrap();
    let tasks = store.tasks().await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].description, "Buy milk");
    assert_eq!(tasks[0].due_date, "2024-01-10");
    assert!(!tasks[0].completed);

    store.toggle(task.id).await.unwrap();
    assert!(store.tasks().await[0].completed);

    store.set_filter(Filter::Active).await.unwrap();
    assert!(store.visible_tasks().await.is_empty());

    store.set_filter(Filter::Completed).await.unwrap();
    let visible = store.visible_tasks().await;
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, task.id);

    store.remove(task.id).await.unwrap();
    assert!(store.tasks().await.is_empty());
}

#[tokio::test]
async fn create_appends_exactly_one_incomplete_task() {
    let (store, _storage) = new_store();
    store.create("First", "2024-01-01").await.unwrap();

    let before = store.tasks().await;
    let task = store.create("Second", "2024-02-01").await.unwrap();
    let after = store.tasks().await;

    assert_eq!(after.len(), before.len() + 1);
    assert_eq!(after.last(), Some(&task));
    assert!(!task.completed);
    assert!(before.iter().all(|t| t.id != task.id));
}

#[tokio::test]
async fn blank_description_is_rejected_and_list_unchanged() {
    let (store, storage) = new_store();
    store.create("Keep me", "2024-01-01").await.unwrap();
    let writes = storage.write_count();

    for description in ["", "   ", "\t\n"] {
        let error = store.create(description, "2024-01-10").await.unwrap_err();
        assert!(matches!(
            error,
            TodoError::ValidationFailed(ValidationError::MissingDescription)
        ));
        assert_eq!(error.to_string(), "Please enter a task!");
    }

    assert_eq!(store.tasks().await.len(), 1);
    assert_eq!(storage.write_count(), writes);
}

#[tokio::test]
async fn missing_due_date_is_rejected() {
    let (store, _storage) = new_store();

    let error = store.create("Buy milk", "").await.unwrap_err();

    assert!(matches!(
        error,
        TodoError::ValidationFailed(ValidationError::MissingDueDate)
    ));
    assert!(store.tasks().await.is_empty());
}

#[tokio::test]
async fn toggle_twice_restores_completion() {
    let (store, _storage) = new_store();
    let task = store.create("Buy milk", "2024-01-10").await.unwrap();

    store.toggle(task.id).await.unwrap();
    store.toggle(task.id).await.unwrap();

    assert!(!store.tasks().await[0].completed);
}

#[tokio::test]
async fn stale_ids_are_noops() {
    let (store, _storage) = new_store();
    store.create("Buy milk", "2024-01-10").await.unwrap();
    let before = store.tasks().await;

    store.toggle(TaskId::new(-1)).await.unwrap();
    store.remove(TaskId::new(-1)).await.unwrap();

    assert_eq!(store.tasks().await, before);
}

#[tokio::test]
async fn filters_preserve_insertion_order() {
    let (store, _storage) = new_store();
    let a = store.create("a", "2024-01-01").await.unwrap();
    let b = store.create("b", "2024-01-02").await.unwrap();
    let c = store.create("c", "2024-01-03").await.unwrap();
    let d = store.create("d", "2024-01-04").await.unwrap();
    store.toggle(b.id).await.unwrap();
    store.toggle(d.id).await.unwrap();

    let ids = |tasks: Vec<Task>| tasks.into_iter().map(|t| t.id).collect::<Vec<_>>();

    assert_eq!(store.filter().await, Filter::All);
    assert_eq!(ids(store.visible_tasks().await), vec![a.id, b.id, c.id, d.id]);

    store.set_filter(Filter::Active).await.unwrap();
    assert_eq!(ids(store.visible_tasks().await), vec![a.id, c.id]);

    store.set_filter(Filter::Completed).await.unwrap();
    assert_eq!(ids(store.visible_tasks().await), vec![b.id, d.id]);

    // Changing the filter never touches the list
    assert_eq!(store.tasks().await.len(), 4);
}

#[tokio::test]
async fn visible_tasks_reflect_later_mutations() {
    let (store, _storage) = new_store();
    store.set_filter(Filter::Active).await.unwrap();
    let task = store.create("Buy milk", "2024-01-10").await.unwrap();
    assert_eq!(store.visible_tasks().await.len(), 1);

    store.toggle(task.id).await.unwrap();
    assert!(store.visible_tasks().await.is_empty());
}

// ============================================================================
// Persistence
// ============================================================================

#[tokio::test]
async fn save_then_load_in_fresh_session_reproduces_list() {
    let (store, storage) = new_store();
    let a = store.create("Buy milk", "2024-01-10").await.unwrap();
    store.create("<script>alert(1)</script>", "2024-03-01").await.unwrap();
    store.toggle(a.id).await.unwrap();
    store.set_filter(Filter::Completed).await.unwrap();
    store.save().await.unwrap();
    let original = store.tasks().await;

    let reloaded = TodoStore::new(stepping_env(Arc::clone(&storage)));
    reloaded.load().await.unwrap();

    assert_eq!(reloaded.tasks().await, original);
    // The filter is not persisted
    assert_eq!(reloaded.filter().await, Filter::All);
}

#[tokio::test]
async fn every_mutation_overwrites_storage() {
    let (store, storage) = new_store();
    let task = store.create("Buy milk", "2024-01-10").await.unwrap();
    store.toggle(task.id).await.unwrap();

    let stored: Vec<Task> = serde_json::from_str(&storage.raw("todos").unwrap()).unwrap();
    assert!(stored[0].completed);

    store.remove(task.id).await.unwrap();
    assert_eq!(storage.raw("todos").as_deref(), Some("[]"));
}

#[tokio::test]
async fn load_reads_stored_field_names() {
    let storage = Arc::new(MemoryStorage::with_item(
        "todos",
        r#"[{"id":1704844800000,"task":"Buy milk","date":"2024-01-10","completed":true}]"#,
    ));
    let store = TodoStore::new(TodoEnvironment::new(Arc::new(test_clock()), storage));

    store.load().await.unwrap();

    assert_eq!(
        store.tasks().await,
        vec![Task {
            id: TaskId::new(1_704_844_800_000),
            description: "Buy milk".to_string(),
            due_date: "2024-01-10".to_string(),
            completed: true,
        }]
    );
}

#[tokio::test]
async fn load_with_no_prior_data_is_empty() {
    let (store, storage) = new_store();
    store.load().await.unwrap();
    assert!(store.tasks().await.is_empty());
    assert_eq!(storage.write_count(), 0);
}

#[tokio::test]
async fn load_of_malformed_data_fails_without_overwriting() {
    let storage = Arc::new(MemoryStorage::with_item("todos", "{oops"));
    let store = TodoStore::new(stepping_env(Arc::clone(&storage)));

    let error = store.load().await.unwrap_err();

    assert!(error.is_malformed_storage());
    assert!(store.tasks().await.is_empty());
    assert_eq!(storage.raw("todos").as_deref(), Some("{oops"));
}

#[tokio::test]
async fn custom_storage_key_is_used() {
    let storage = Arc::new(MemoryStorage::new());
    let env = stepping_env(Arc::clone(&storage)).with_storage_key("work");
    let store = TodoStore::new(env);

    store.create("Ship it", "2024-05-01").await.unwrap();

    assert!(storage.raw("work").is_some());
    assert!(storage.raw("todos").is_none());
}

#[tokio::test]
async fn storage_failure_surfaces_to_caller() {
    let (store, storage) = new_store();
    let task = store.create("Buy milk", "2024-01-10").await.unwrap();
    storage.set_fail_writes(true);

    let error = store.toggle(task.id).await.unwrap_err();

    assert!(matches!(error, TodoError::Store(_)));
    assert!(error.storage_error().is_some());
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn filters_partition_the_list(flags in proptest::collection::vec(any::<bool>(), 0..40)) {
        let tasks: Vec<Task> = flags
            .iter()
            .enumerate()
            .map(|(i, &completed)| Task {
                id: TaskId::new(i64::try_from(i).unwrap()),
                description: format!("task {i}"),
                due_date: "2024-01-10".to_string(),
                completed,
            })
            .collect();
        let mut state = TodoState { tasks: tasks.clone(), ..TodoState::new() };

        let all: Vec<Task> = state.visible_tasks().cloned().collect();
        prop_assert_eq!(&all, &tasks);

        state.filter = Filter::Active;
        let active: Vec<Task> = state.visible_tasks().cloned().collect();
        let expected: Vec<Task> = tasks.iter().filter(|t| !t.completed).cloned().collect();
        prop_assert_eq!(active, expected);

        state.filter = Filter::Completed;
        let completed: Vec<Task> = state.visible_tasks().cloned().collect();
        let expected: Vec<Task> = tasks.iter().filter(|t| t.completed).cloned().collect();
        prop_assert_eq!(completed, expected);
    }

    #[test]
    fn created_ids_are_unique(descriptions in proptest::collection::vec("[a-z]{1,8}", 1..30)) {
        // A frozen clock forces every id into the same millisecond
        let env = TodoEnvironment::new(Arc::new(test_clock()), Arc::new(MemoryStorage::new()));
        let reducer = TodoReducer::new();
        let mut state = TodoState::new();

        for description in &descriptions {
            let _ = reducer.reduce(
                &mut state,
                TodoAction::CreateTask {
                    description: description.clone(),
                    due_date: "2024-01-10".to_string(),
                },
                &env,
            );
        }

        prop_assert_eq!(state.count(), descriptions.len());
        let mut ids: Vec<TaskId> = state.tasks.iter().map(|t| t.id).collect();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), descriptions.len());
    }
}
