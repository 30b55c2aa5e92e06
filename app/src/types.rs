//! Domain types for the to-do list.
//!
//! A list is an ordered sequence of tasks, kept in insertion order, plus the
//! view filter currently selected. Only the tasks are persisted; the filter
//! resets to [`Filter::All`] on every fresh load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unique identifier for a task: milliseconds since the Unix epoch at creation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    /// Creates a `TaskId` from a raw value
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Derives the next id from the creation time, staying strictly above `last`
    #[must_use]
    pub fn generate(now: DateTime<Utc>, last: Option<Self>) -> Self {
        let millis = now.timestamp_millis();
        match last {
            Some(Self(last)) if last >= millis => Self(last.saturating_add(1)),
            _ => Self(millis),
        }
    }

    /// Returns the raw value
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A single to-do entry
///
/// Field names on the wire match the stored format: `id`, `task`, `date`,
/// `completed`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,
    /// What needs doing, never empty
    #[serde(rename = "task")]
    pub description: String,
    /// Due date as an ISO calendar date (`YYYY-MM-DD`)
    #[serde(rename = "date")]
    pub due_date: String,
    /// Whether the task is done
    pub completed: bool,
}

impl Task {
    /// Creates a new, not yet completed task
    #[must_use]
    pub const fn new(id: TaskId, description: String, due_date: String) -> Self {
        Self {
            id,
            description,
            due_date,
            completed: false,
        }
    }
}

/// Which tasks the view shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every task
    #[default]
    All,
    /// Tasks not yet completed
    Active,
    /// Completed tasks
    Completed,
}

impl Filter {
    /// All selectors, in the order the filter controls are laid out
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Value carried by the filter control's `data-filter` attribute
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Label shown on the filter control
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    /// Maps a `data-filter` attribute to a selector; unknown values mean `All`
    #[must_use]
    pub fn from_data_attr(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Self::Active,
            "completed" => Self::Completed,
            _ => Self::All,
        }
    }

    /// Whether `task` is visible under this selector
    #[must_use]
    pub const fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a task could not be created
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Description empty after trimming
    #[error("Please enter a task!")]
    MissingDescription,
    /// No due date given
    #[error("Please select a due date!")]
    MissingDueDate,
}

/// State of the to-do list
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoState {
    /// All tasks in insertion order
    pub tasks: Vec<Task>,
    /// Current view filter (not persisted)
    pub filter: Filter,
    /// Outcome of the most recent create command
    pub last_create: Option<Result<Task, ValidationError>>,
}

impl TodoState {
    /// Creates a new empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of tasks
    #[must_use]
    pub fn count(&self) -> usize {
        self.tasks.len()
    }

    /// Returns a task by ID
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Next id to hand out at `now`
    #[must_use]
    pub fn next_id(&self, now: DateTime<Utc>) -> TaskId {
        TaskId::generate(now, self.tasks.iter().map(|t| t.id).max())
    }

    /// Tasks passing the current filter, in insertion order
    ///
    /// The iterator is lazy and can be cloned to walk the view again.
    pub fn visible_tasks(&self) -> impl Iterator<Item = &Task> + Clone + '_ {
        let filter = self.filter;
        self.tasks.iter().filter(move |t| filter.matches(t))
    }

    /// Replaces the task list, dropping any later entry whose id repeats an earlier one
    pub fn replace_tasks(&mut self, tasks: Vec<Task>) {
        let mut seen = HashSet::with_capacity(tasks.len());
        self.tasks = tasks.into_iter().filter(|t| seen.insert(t.id)).collect();
    }
}

/// Actions processed by the to-do reducer
///
/// Commands come from the view; `TasksLoaded` is fed back by the load effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TodoAction {
    /// Command: add a task at the end of the list
    CreateTask {
        /// Raw description as typed
        description: String,
        /// Due date as picked
        due_date: String,
    },
    /// Command: flip a task's completion flag
    ToggleTask {
        /// Task to toggle
        id: TaskId,
    },
    /// Command: delete a task
    RemoveTask {
        /// Task to delete
        id: TaskId,
    },
    /// Command: change the view filter
    SetFilter {
        /// New selector
        filter: Filter,
    },
    /// Command: read the list from durable storage
    LoadTasks,
    /// Command: write the list to durable storage
    SaveTasks,
    /// Event: the stored list was read
    TasksLoaded {
        /// Tasks in stored order
        tasks: Vec<Task>,
    },
}
