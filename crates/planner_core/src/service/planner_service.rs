//! Planner use-case service.
//!
//! # Responsibility
//! - Provide the widget's entry points: quick add, form add, toggle, rename,
//!   date edits and deletes.
//! - Re-render every widget view after a mutation, plus the task
//!   management list after actions taken from it.
//!
//! # Invariants
//! - The service never bypasses `TaskStore` normalization.
//! - Every dispatched action runs to completion before rendering starts.

use crate::config::PlannerConfig;
use crate::model::task::{DateEdit, DateTimeField, Task, TaskDraft, TaskSelector};
use crate::render::views::{build_all_tasks, render_all, AllTasksView, RenderTarget};
use crate::store::kv::KvStore;
use crate::store::task_store::{StoreResult, TaskStore};
use chrono::{NaiveDate, NaiveTime};
use log::info;

/// Raw values from the full add-task form.
///
/// A date-time is only built for a slot whose date is filled in; a time
/// without a date is ignored. The "no due" / "no window" toggles disable
/// the matching inputs entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub text: String,
    pub no_due: bool,
    pub due_date: Option<NaiveDate>,
    pub due_time: Option<NaiveTime>,
    pub no_window: bool,
    pub work_start_date: Option<NaiveDate>,
    pub work_start_time: Option<NaiveTime>,
    pub work_end_date: Option<NaiveDate>,
    pub work_end_time: Option<NaiveTime>,
}

impl TaskForm {
    /// Converts form input into a draft carrying only date-time fields.
    pub fn into_draft(self) -> TaskDraft {
        let slot = |disabled: bool, date: Option<NaiveDate>, time: Option<NaiveTime>| {
            if disabled {
                None
            } else {
                date.map(|date| DateTimeField::new(date, time))
            }
        };

        TaskDraft {
            due_date_time: slot(self.no_due, self.due_date, self.due_time),
            work_start_date_time: slot(self.no_window, self.work_start_date, self.work_start_time),
            work_end_date_time: slot(self.no_window, self.work_end_date, self.work_end_time),
            ..TaskDraft::new(self.text)
        }
    }
}

/// A user action on the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannerAction {
    /// Enter in the top input: a task due on the current day.
    QuickAdd { text: String },
    /// Submit of the full add-task form.
    FormAdd(TaskForm),
    ToggleDone(TaskSelector),
    Rename { selector: TaskSelector, text: String },
    EditDates { selector: TaskSelector, edit: DateEdit },
    Delete(TaskSelector),
    /// Delete by position in the task management list.
    DeleteAt(usize),
}

impl PlannerAction {
    /// Whether the action comes from the task management list, which must be
    /// redrawn after it.
    pub fn from_manage_panel(&self) -> bool {
        matches!(
            self,
            Self::Rename { .. } | Self::EditDates { .. } | Self::DeleteAt(_)
        )
    }
}

/// Use-case facade over a task store.
pub struct PlannerService<S: KvStore> {
    store: TaskStore<S>,
    config: PlannerConfig,
}

impl<S: KvStore> PlannerService<S> {
    /// Creates a service storing tasks under `config.storage_key`.
    pub fn new(kv: S, config: PlannerConfig) -> Self {
        let store = TaskStore::new(kv, config.storage_key.clone());
        Self { store, config }
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.store.load_all()
    }

    /// Adds a task due on `today`. Blank text is ignored.
    pub fn quick_add(&self, text: &str, today: NaiveDate) -> StoreResult<Option<Task>> {
        self.store.create(TaskDraft::new(text).due_on(today))
    }

    /// Adds a task from the full form. Blank text is ignored.
    pub fn form_add(&self, form: TaskForm) -> StoreResult<Option<Task>> {
        self.store.create(form.into_draft())
    }

    /// Applies `action` and reports whether the collection changed.
    pub fn apply(&self, action: PlannerAction, today: NaiveDate) -> StoreResult<bool> {
        let changed = match action {
            PlannerAction::QuickAdd { text } => self.quick_add(&text, today)?.is_some(),
            PlannerAction::FormAdd(form) => self.form_add(form)?.is_some(),
            PlannerAction::ToggleDone(selector) => self.store.toggle_done(&selector)?,
            PlannerAction::Rename { selector, text } => self.store.rename(&selector, &text)?,
            PlannerAction::EditDates { selector, edit } => {
                self.store.update_dates(&selector, &edit)?
            }
            PlannerAction::Delete(selector) => self.store.delete(&selector)?,
            PlannerAction::DeleteAt(index) => self.store.delete_at(index)?,
        };
        Ok(changed)
    }

    /// Applies `action`, then re-renders the views for `today`.
    ///
    /// Views are redrawn even when the action was a no-op, matching a UI that
    /// refreshes after every event. Manage-panel actions redraw the task list
    /// first, then the widget.
    pub fn dispatch<T: RenderTarget + ?Sized>(
        &self,
        action: PlannerAction,
        today: NaiveDate,
        target: &mut T,
    ) -> StoreResult<bool> {
        let panel = action.from_manage_panel();
        let changed = self.apply(action, today)?;
        info!("event=planner_dispatch module=service status=ok changed={changed} panel={panel}");
        if panel {
            self.refresh_all_tasks(target);
        }
        self.refresh(today, target);
        Ok(changed)
    }

    /// Redraws the task management list.
    pub fn refresh_all_tasks<T: RenderTarget + ?Sized>(&self, target: &mut T) {
        target.render_all_tasks(&self.all_tasks_view());
    }

    /// Full re-render pass from the current stored collection.
    pub fn refresh<T: RenderTarget + ?Sized>(&self, today: NaiveDate, target: &mut T) {
        let tasks = self.store.load_all();
        render_all(&tasks, today, &self.config, target);
    }

    pub fn all_tasks_view(&self) -> AllTasksView {
        build_all_tasks(&self.store.load_all())
    }
}
