//! The to-do store: the authoritative task list and its durable copy.
//!
//! [`TodoStore`] wraps the reducer runtime and exposes the list operations as
//! plain async methods. Every mutating operation has written the full list to
//! durable storage by the time it returns.

use crate::error::TodoError;
use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::types::{Filter, Task, TaskId, TodoAction, TodoState};
use std::sync::Arc;
use todolist_runtime::Store;

type Runtime = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

/// Owner of the task list, the current filter and persistence
#[derive(Clone)]
pub struct TodoStore {
    runtime: Arc<Runtime>,
}

impl TodoStore {
    /// Creates a store with an empty list; call [`TodoStore::load`] to read storage
    #[must_use]
    pub fn new(env: TodoEnvironment) -> Self {
        Self {
            runtime: Arc::new(Store::new(TodoState::new(), TodoReducer::new(), env)),
        }
    }

    /// Reads the list from durable storage, replacing the in-memory list
    ///
    /// A missing key yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Store`] if storage cannot be read or holds a
    /// value that does not decode; the in-memory list is left untouched.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self) -> Result<(), TodoError> {
        self.runtime.send(TodoAction::LoadTasks).await?;
        let count = self.runtime.state(TodoState::count).await;
        tracing::info!(count, "Loaded tasks");
        Ok(())
    }

    /// Writes the full list to durable storage, replacing any prior value
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Store`] if the write fails.
    pub async fn save(&self) -> Result<(), TodoError> {
        self.runtime.send(TodoAction::SaveTasks).await?;
        Ok(())
    }

    /// Appends a new task and persists the list
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::ValidationFailed`] if the description is blank or
    /// the due date is missing (the list is unchanged), or
    /// [`TodoError::Store`] if the write fails.
    pub async fn create(&self, description: &str, due_date: &str) -> Result<Task, TodoError> {
        self.runtime
            .send(TodoAction::CreateTask {
                description: description.to_string(),
                due_date: due_date.to_string(),
            })
            .await?;

        match self.runtime.state(|s| s.last_create.clone()).await {
            Some(Ok(task)) => {
                tracing::debug!(id = %task.id, "Created task");
                Ok(task)
            },
            Some(Err(error)) => Err(TodoError::ValidationFailed(error)),
            None => Err(TodoError::NoOutcome),
        }
    }

    /// Flips the completion flag of `id`; unknown ids are ignored
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Store`] if the write fails.
    pub async fn toggle(&self, id: TaskId) -> Result<(), TodoError> {
        tracing::debug!(%id, "Toggling task");
        self.runtime.send(TodoAction::ToggleTask { id }).await?;
        Ok(())
    }

    /// Removes `id` from the list and persists; unknown ids leave the list as is
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Store`] if the write fails.
    pub async fn remove(&self, id: TaskId) -> Result<(), TodoError> {
        tracing::debug!(%id, "Removing task");
        self.runtime.send(TodoAction::RemoveTask { id }).await?;
        Ok(())
    }

    /// Changes which tasks [`TodoStore::visible_tasks`] returns
    ///
    /// # Errors
    ///
    /// Never fails in practice; the error is the runtime's send signature.
    pub async fn set_filter(&self, filter: Filter) -> Result<(), TodoError> {
        self.runtime.send(TodoAction::SetFilter { filter }).await?;
        Ok(())
    }

    /// Current filter selector
    pub async fn filter(&self) -> Filter {
        self.runtime.state(|s| s.filter).await
    }

    /// Tasks passing the current filter, in insertion order
    ///
    /// Recomputed from the list on every call.
    pub async fn visible_tasks(&self) -> Vec<Task> {
        self.runtime
            .state(|s| s.visible_tasks().cloned().collect())
            .await
    }

    /// The whole list in insertion order
    pub async fn tasks(&self) -> Vec<Task> {
        self.runtime.state(|s| s.tasks.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ValidationError;
    use todolist_testing::{test_clock, MemoryStorage};

    fn store_with(storage: Arc<MemoryStorage>) -> TodoStore {
        TodoStore::new(TodoEnvironment::new(Arc::new(test_clock()), storage))
    }

    #[tokio::test]
    async fn create_persists_before_returning() {
        let storage = Arc::new(MemoryStorage::new());
        let store = store_with(Arc::clone(&storage));

        let task = store.create("Buy milk", "2024-01-10").await.unwrap();

        let raw = storage.raw("todos").unwrap();
        let stored: Vec<Task> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, vec![task]);
    }

    #[tokio::test]
    async fn failed_validation_does_not_write() {
        let storage = Arc::new(MemoryStorage::new());
        let store = store_with(Arc::clone(&storage));

        let error = store.create("Buy milk", "").await.unwrap_err();

        assert!(matches!(
            error,
            TodoError::ValidationFailed(ValidationError::MissingDueDate)
        ));
        assert_eq!(error.to_string(), "Please select a due date!");
        assert_eq!(storage.write_count(), 0);
    }

    #[tokio::test]
    async fn toggle_of_unknown_id_does_not_write() {
        let storage = Arc::new(MemoryStorage::new());
        let store = store_with(Arc::clone(&storage));

        store.toggle(TaskId::new(5)).await.unwrap();

        assert_eq!(storage.write_count(), 0);
    }

    #[tokio::test]
    async fn write_failure_propagates() {
        let storage = Arc::new(MemoryStorage::new());
        let store = store_with(Arc::clone(&storage));
        storage.set_fail_writes(true);

        let error = store.create("Buy milk", "2024-01-10").await.unwrap_err();

        assert!(error.storage_error().is_some());
        assert!(!error.is_malformed_storage());
    }
}
