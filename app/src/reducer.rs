//! Reducer logic for the to-do list.
//!
//! Commands are validated and applied to state in place. Every mutation of the
//! task list returns an effect that writes the whole list to durable storage;
//! loading returns an effect that reads it and feeds `TasksLoaded` back.

use crate::types::{Filter, Task, TodoAction, TodoState, ValidationError};
use std::sync::Arc;
use todolist_core::{
    effect::{Effect, EffectError},
    environment::{Clock, Storage, StorageError},
    reducer::Reducer,
    smallvec, SmallVec,
};

/// Storage key the list is kept under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "todos";

/// Environment dependencies for the to-do reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Clock for generating task ids
    pub clock: Arc<dyn Clock>,
    /// Durable key-value store
    pub storage: Arc<dyn Storage>,
    /// Key holding the serialized list
    pub storage_key: String,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment` using [`DEFAULT_STORAGE_KEY`]
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, storage: Arc<dyn Storage>) -> Self {
        Self {
            clock,
            storage,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }

    /// Uses `key` instead of the default storage key
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}

/// Reducer for the to-do list
#[derive(Clone, Debug)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a `CreateTask` command, returning the trimmed description
    fn validate_create_task<'a>(
        description: &'a str,
        due_date: &str,
    ) -> Result<&'a str, ValidationError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ValidationError::MissingDescription);
        }

        if due_date.trim().is_empty() {
            return Err(ValidationError::MissingDueDate);
        }

        Ok(description)
    }

    /// Effect writing the full list under the configured key
    fn persist(tasks: &[Task], env: &TodoEnvironment) -> Effect<TodoAction> {
        let storage = Arc::clone(&env.storage);
        let key = env.storage_key.clone();
        let tasks = tasks.to_vec();

        Effect::Future(Box::pin(async move {
            let serialized = serde_json::to_string(&tasks)?;
            storage.set_item(&key, &serialized)?;
            Ok::<_, EffectError>(None)
        }))
    }

    /// Effect reading the list; a missing or blank value is an empty list
    fn load(env: &TodoEnvironment) -> Effect<TodoAction> {
        let storage = Arc::clone(&env.storage);
        let key = env.storage_key.clone();

        Effect::Future(Box::pin(async move {
            let tasks = match storage.get_item(&key)? {
                Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)
                    .map_err(|source| StorageError::Malformed { key, source })?,
                _ => Vec::new(),
            };
            Ok::<_, EffectError>(Some(TodoAction::TasksLoaded { tasks }))
        }))
    }
}

impl Default for TodoReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            TodoAction::CreateTask {
                description,
                due_date,
            } => match Self::validate_create_task(&description, &due_date) {
                Ok(description) => {
                    let id = state.next_id(env.clock.now());
                    let task = Task::new(id, description.to_string(), due_date);
                    state.tasks.push(task.clone());
                    state.last_create = Some(Ok(task));
                    smallvec![Self::persist(&state.tasks, env)]
                },
                Err(error) => {
                    state.last_create = Some(Err(error));
                    SmallVec::new()
                },
            },

            TodoAction::ToggleTask { id } => {
                // Stale ids are ignored
                let Some(task) = state.tasks.iter_mut().find(|t| t.id == id) else {
                    return SmallVec::new();
                };
                task.completed = !task.completed;
                smallvec![Self::persist(&state.tasks, env)]
            },

            TodoAction::RemoveTask { id } => {
                state.tasks.retain(|t| t.id != id);
                smallvec![Self::persist(&state.tasks, env)]
            },

            TodoAction::SetFilter { filter } => {
                state.filter = filter;
                SmallVec::new()
            },

            TodoAction::LoadTasks => smallvec![Self::load(env)],

            TodoAction::SaveTasks => smallvec![Self::persist(&state.tasks, env)],

            // ========== Events ==========
            TodoAction::TasksLoaded { tasks } => {
                state.replace_tasks(tasks);
                state.filter = Filter::All;
                SmallVec::new()
            },
        }
    }
}
