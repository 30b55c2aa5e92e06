//! The view: renders visible tasks and turns user gestures into store calls.
//!
//! The display tree is kept as plain data ([`TaskForm`], [`ErrorRegion`],
//! filter buttons and a [`DisplayList`]) so a host can paint it any way it
//! likes. [`View::to_html`] serialises it as markup and the [`fmt::Display`]
//! impls give a terminal rendering.
//!
//! Rows are identified by their `data-id` attribute. Row gestures arrive as
//! [`UiEvent`]s carrying that attribute; the handler parses it back to a
//! [`TaskId`] and ignores values that no longer name a task.

use crate::error::TodoError;
use crate::store::TodoStore;
use crate::types::{Filter, Task, TaskId};
use chrono::{DateTime, NaiveDate};
use std::fmt;
use std::sync::Arc;
use todolist_core::environment::Confirm;

/// Shown in place of rows when no task passes the filter
pub const EMPTY_STATE_MESSAGE: &str = "No tasks to display";

/// Question asked before a task is deleted
pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this task?";

/// Due-date label for a stored date that does not parse
pub const INVALID_DATE: &str = "Invalid Date";

/// Formats an ISO date as `Mon D, YYYY` (en-US), e.g. `Jan 10, 2024`
#[must_use]
pub fn format_due_date(date: &str) -> String {
    let date = date.trim();
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(date).ok().map(|dt| dt.date_naive()))
        .map_or_else(
            || INVALID_DATE.to_string(),
            |d| d.format("%b %-d, %Y").to_string(),
        )
}

/// Escape HTML special characters so text is rendered literally
#[must_use]
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Input field of the submission form
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    /// Free-text task description
    Task,
    /// Due-date picker
    Date,
}

/// Current values of the submission form
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskForm {
    /// Description field contents
    pub task_input: String,
    /// Date field contents
    pub date_input: String,
    /// Field holding input focus
    pub focus: Option<FormField>,
}

impl TaskForm {
    fn clear(&mut self) {
        self.task_input.clear();
        self.date_input.clear();
        self.focus = Some(FormField::Task);
    }
}

/// The persistent error-message region
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorRegion {
    message: String,
    visible: bool,
}

impl ErrorRegion {
    /// Message currently shown, empty when hidden
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the region is shown
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    fn show(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.visible = true;
    }

    fn hide(&mut self) {
        self.message.clear();
        self.visible = false;
    }
}

/// One of the three filter controls
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterButton {
    /// Selector this control applies
    pub filter: Filter,
    /// Whether the control is highlighted
    pub active: bool,
}

/// A rendered task row
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskRow {
    /// Value of the row's `data-id` attribute
    pub data_id: String,
    /// Checkbox state
    pub completed: bool,
    /// Description as entered (escaped when written as markup)
    pub description: String,
    /// Formatted due date
    pub due_label: String,
}

impl TaskRow {
    fn from_task(task: &Task) -> Self {
        Self {
            data_id: task.id.to_string(),
            completed: task.completed,
            description: task.description.clone(),
            due_label: format_due_date(&task.due_date),
        }
    }

    /// Markup for this row
    #[must_use]
    pub fn to_html(&self) -> String {
        let class = if self.completed { "todo-item completed" } else { "todo-item" };
        let checked = if self.completed { " checked" } else { "" };
        format!(
            r#"<div class="{class}" data-id="{id}"><div class="todo-left"><input type="checkbox" class="todo-checkbox"{checked}><div class="todo-content"><div class="todo-task">{task}</div><div class="todo-date">Due: {due}</div></div></div><div class="todo-actions"><button class="btn-delete">Delete</button></div></div>"#,
            id = html_escape(&self.data_id),
            task = html_escape(&self.description),
            due = html_escape(&self.due_label),
        )
    }
}

impl fmt::Display for TaskRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.completed { 'x' } else { ' ' };
        write!(
            f,
            "[{mark}] {}  {}  (Due: {})",
            self.data_id, self.description, self.due_label
        )
    }
}

/// The list region: either the empty-state placeholder or one row per task
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayList {
    /// No visible tasks
    Empty,
    /// Visible tasks in order
    Rows(Vec<TaskRow>),
}

impl DisplayList {
    /// Rows shown, empty for the placeholder
    #[must_use]
    pub fn rows(&self) -> &[TaskRow] {
        match self {
            Self::Empty => &[],
            Self::Rows(rows) => rows,
        }
    }

    /// Markup for the list region contents
    #[must_use]
    pub fn to_html(&self) -> String {
        match self {
            Self::Empty => format!(r#"<div class="empty-state">{EMPTY_STATE_MESSAGE}</div>"#),
            Self::Rows(rows) => rows.iter().map(TaskRow::to_html).collect(),
        }
    }
}

impl fmt::Display for DisplayList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "{EMPTY_STATE_MESSAGE}"),
            Self::Rows(rows) => {
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{row}")?;
                }
                Ok(())
            },
        }
    }
}

/// A user gesture delivered to the view
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    /// The description field changed
    TaskInput(String),
    /// The date field changed
    DateInput(String),
    /// The form was submitted
    Submit,
    /// A row's checkbox changed
    CheckboxChanged {
        /// `data-id` of the row
        data_id: String,
    },
    /// A row's delete control was clicked
    DeleteClicked {
        /// `data-id` of the row
        data_id: String,
    },
    /// A filter control was clicked
    FilterClicked {
        /// `data-filter` of the control
        data_filter: String,
    },
}

/// Renders the store and handles user gestures
pub struct View {
    store: TodoStore,
    confirm: Arc<dyn Confirm>,
    form: TaskForm,
    error: ErrorRegion,
    filters: [FilterButton; 3],
    list: DisplayList,
}

impl View {
    /// Creates a view over `store`; nothing is rendered until [`View::render`]
    #[must_use]
    pub fn new(store: TodoStore, confirm: Arc<dyn Confirm>) -> Self {
        Self {
            store,
            confirm,
            form: TaskForm::default(),
            error: ErrorRegion::default(),
            filters: Filter::ALL.map(|filter| FilterButton {
                filter,
                active: filter == Filter::All,
            }),
            list: DisplayList::Empty,
        }
    }

    /// Creates a view and renders it once
    pub async fn mount(store: TodoStore, confirm: Arc<dyn Confirm>) -> Self {
        let mut view = Self::new(store, confirm);
        view.render().await;
        view
    }

    /// The store this view renders
    #[must_use]
    pub const fn store(&self) -> &TodoStore {
        &self.store
    }

    /// Submission form state
    #[must_use]
    pub const fn form(&self) -> &TaskForm {
        &self.form
    }

    /// Error region state
    #[must_use]
    pub const fn error(&self) -> &ErrorRegion {
        &self.error
    }

    /// Filter controls in layout order
    #[must_use]
    pub fn filters(&self) -> &[FilterButton] {
        &self.filters
    }

    /// Current list region
    #[must_use]
    pub const fn list(&self) -> &DisplayList {
        &self.list
    }

    /// Rebuilds the list region from the store's visible tasks
    pub async fn render(&mut self) {
        let tasks = self.store.visible_tasks().await;
        tracing::trace!(visible = tasks.len(), "Rendering list");
        self.list = if tasks.is_empty() {
            DisplayList::Empty
        } else {
            DisplayList::Rows(tasks.iter().map(TaskRow::from_task).collect())
        };
    }

    /// Routes a gesture to its handler
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Store`] if persisting the change fails.
    /// Validation failures are shown in the error region instead.
    pub async fn dispatch(&mut self, event: UiEvent) -> Result<(), TodoError> {
        match event {
            UiEvent::TaskInput(value) => {
                self.form.task_input = value;
                self.form.focus = Some(FormField::Task);
                Ok(())
            },
            UiEvent::DateInput(value) => {
                self.form.date_input = value;
                self.form.focus = Some(FormField::Date);
                Ok(())
            },
            UiEvent::Submit => self.submit().await,
            UiEvent::CheckboxChanged { data_id } => self.on_checkbox_change(&data_id).await,
            UiEvent::DeleteClicked { data_id } => self.on_delete_click(&data_id).await,
            UiEvent::FilterClicked { data_filter } => self.on_filter_click(&data_filter).await,
        }
    }

    /// Creates a task from the current form values
    ///
    /// On a validation failure the message is shown and the inputs are kept.
    /// On success the error is cleared, both inputs are emptied and focus
    /// returns to the description field.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Store`] if the write fails.
    pub async fn submit(&mut self) -> Result<(), TodoError> {
        let created = self
            .store
            .create(&self.form.task_input, &self.form.date_input)
            .await;
        match created {
            Ok(_) => {
                self.error.hide();
                self.render().await;
                self.form.clear();
                Ok(())
            },
            Err(TodoError::ValidationFailed(error)) => {
                self.error.show(error.to_string());
                Ok(())
            },
            Err(error) => Err(error),
        }
    }

    /// Toggles the task behind a row's checkbox
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Store`] if the write fails.
    pub async fn on_checkbox_change(&mut self, data_id: &str) -> Result<(), TodoError> {
        let Some(id) = Self::row_id(data_id) else {
            return Ok(());
        };
        self.store.toggle(id).await?;
        self.render().await;
        Ok(())
    }

    /// Deletes the task behind a row after the user confirms
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Store`] if the write fails.
    pub async fn on_delete_click(&mut self, data_id: &str) -> Result<(), TodoError> {
        let Some(id) = Self::row_id(data_id) else {
            return Ok(());
        };
        if !self.confirm.confirm(DELETE_CONFIRMATION) {
            tracing::debug!(%id, "Deletion declined");
            return Ok(());
        }
        self.store.remove(id).await?;
        self.render().await;
        Ok(())
    }

    /// Highlights the clicked filter control and applies its selector
    ///
    /// # Errors
    ///
    /// Propagates the store's error type; changing the filter does not write.
    pub async fn on_filter_click(&mut self, data_filter: &str) -> Result<(), TodoError> {
        let filter = Filter::from_data_attr(data_filter);
        for button in &mut self.filters {
            button.active = button.filter == filter;
        }
        self.store.set_filter(filter).await?;
        self.render().await;
        Ok(())
    }

    fn row_id(data_id: &str) -> Option<TaskId> {
        let id = data_id.parse().ok();
        if id.is_none() {
            tracing::debug!(data_id, "Ignoring row event with unparsable id");
        }
        id
    }

    /// Markup for the whole display tree
    #[must_use]
    pub fn to_html(&self) -> String {
        let autofocus = |field| {
            if self.form.focus == Some(field) { " autofocus" } else { "" }
        };
        let error_class = if self.error.visible { "error-message show" } else { "error-message" };
        let filters: String = self
            .filters
            .iter()
            .map(|b| {
                format!(
                    r#"<button class="filter-btn{active}" data-filter="{value}">{label}</button>"#,
                    active = if b.active { " active" } else { "" },
                    value = b.filter.as_str(),
                    label = b.filter.label(),
                )
            })
            .collect();

        format!(
            concat!(
                r#"<form id="todo-form">"#,
                r#"<input type="text" id="task-input" value="{task}"{task_focus}>"#,
                r#"<input type="date" id="date-input" value="{date}"{date_focus}>"#,
                r#"<button type="submit">Add</button></form>"#,
                r#"<div id="error-message" class="{error_class}">{error}</div>"#,
                r#"<div class="filters">{filters}</div>"#,
                r#"<div id="todo-list">{list}</div>"#,
            ),
            task = html_escape(&self.form.task_input),
            task_focus = autofocus(FormField::Task),
            date = html_escape(&self.form.date_input),
            date_focus = autofocus(FormField::Date),
            error_class = error_class,
            error = html_escape(&self.error.message),
            filters = filters,
            list = self.list.to_html(),
        )
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filters: Vec<String> = self
            .filters
            .iter()
            .map(|b| {
                if b.active {
                    format!("[{}]", b.filter.label())
                } else {
                    b.filter.label().to_string()
                }
            })
            .collect();
        writeln!(f, "Filter: {}", filters.join(" "))?;
        if self.error.visible {
            writeln!(f, "! {}", self.error.message)?;
        }
        write!(f, "{}", self.list)
    }
}
