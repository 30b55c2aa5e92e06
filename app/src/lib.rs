//! A to-do list manager with due dates, status filters and durable storage.
//!
//! The list is owned by a [`TodoStore`], which runs a [`TodoReducer`] on the
//! todolist runtime. Every change to the list is written in full to a durable
//! key-value store before the call returns. A [`View`] renders the tasks that
//! pass the current [`Filter`] and turns user gestures into store calls.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use todolist::{FileStorage, TodoEnvironment, TodoStore, View};
//! use todolist_core::environment::{AlwaysConfirm, SystemClock};
//!
//! # async fn example() -> Result<(), todolist::TodoError> {
//! let env = TodoEnvironment::new(Arc::new(SystemClock), Arc::new(FileStorage::new("todos.json")));
//! let store = TodoStore::new(env);
//! store.load().await?;
//!
//! let task = store.create("Buy milk", "2024-01-10").await?;
//! store.toggle(task.id).await?;
//!
//! let view = View::mount(store, Arc::new(AlwaysConfirm(true))).await;
//! println!("{view}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod reducer;
pub mod shell;
pub mod storage;
pub mod store;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use config::Config;
pub use error::TodoError;
pub use reducer::{TodoEnvironment, TodoReducer};
pub use storage::FileStorage;
pub use store::TodoStore;
pub use types::{Filter, Task, TaskId, TodoAction, TodoState, ValidationError};
pub use view::{DisplayList, TaskRow, UiEvent, View};
