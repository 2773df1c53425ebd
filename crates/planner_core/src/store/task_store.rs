//! Task collection store over a key-value backend.
//!
//! # Responsibility
//! - Load and rewrite the serialized task collection under one key.
//! - Create tasks from drafts and apply selector-based mutations.
//!
//! # Invariants
//! - Every mutation is load-all, mutate, save-all.
//! - Selector misses and empty text are silent no-ops; nothing is written.
//! - Records are decoded one by one; a record that cannot be read is skipped
//!   with a warning and the rest of the collection survives.
//! - A blob that is not a JSON array reads as empty, but mutations refuse to
//!   write over it. Backend failures during a mutation propagate too.

use crate::model::task::{DateEdit, Task, TaskDraft, TaskSelector};
use crate::store::kv::{KvError, KvStore};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Kv(KvError),
    /// The stored blob is not a JSON array of records.
    Decode(serde_json::Error),
    Serialize(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kv(err) => write!(f, "{err}"),
            Self::Decode(err) => write!(f, "stored tasks are unreadable: {err}"),
            Self::Serialize(err) => write!(f, "failed to serialize tasks: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Kv(err) => Some(err),
            Self::Decode(err) | Self::Serialize(err) => Some(err),
        }
    }
}

impl From<KvError> for StoreError {
    fn from(value: KvError) -> Self {
        Self::Kv(value)
    }
}

/// Flat, insertion-ordered task collection persisted as one JSON blob.
pub struct TaskStore<S: KvStore> {
    kv: S,
    key: String,
}

impl<S: KvStore> TaskStore<S> {
    pub fn new(kv: S, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns every stored task in insertion order.
    ///
    /// Never fails: an absent, unreadable or unparseable blob yields an empty
    /// collection.
    pub fn load_all(&self) -> Vec<Task> {
        match self.read_collection() {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!("event=tasks_load module=store status=error error={err}");
                Vec::new()
            }
        }
    }

    /// Replaces the persisted collection with `tasks`.
    pub fn save_all(&self, tasks: &[Task]) -> StoreResult<()> {
        let raw = serde_json::to_string(tasks).map_err(StoreError::Serialize)?;
        self.kv.set(&self.key, &raw)?;
        debug!(
            "event=tasks_save module=store status=ok count={}",
            tasks.len()
        );
        Ok(())
    }

    /// Creates a task stamped with the current time.
    ///
    /// Returns `Ok(None)` without writing when the text is empty.
    pub fn create(&self, draft: TaskDraft) -> StoreResult<Option<Task>> {
        self.create_at(draft, Utc::now())
    }

    /// Creates a task with an explicit creation timestamp.
    pub fn create_at(
        &self,
        draft: TaskDraft,
        created_at: DateTime<Utc>,
    ) -> StoreResult<Option<Task>> {
        let task = match Task::from_draft(draft, created_at) {
            Ok(task) => task,
            Err(err) => {
                debug!("event=task_create module=store status=skipped reason={err}");
                return Ok(None);
            }
        };

        let mut tasks = self.read_collection()?;
        tasks.push(task.clone());
        self.save_all(&tasks)?;
        info!(
            "event=task_create module=store status=ok count={}",
            tasks.len()
        );
        Ok(Some(task))
    }

    /// Returns the first task matching `selector`.
    pub fn find(&self, selector: &TaskSelector) -> Option<Task> {
        self.load_all()
            .into_iter()
            .find(|task| selector.matches(task))
    }

    /// Applies `mutate` to the first task matching `selector` and saves.
    ///
    /// The edited task is normalized like a new one: text is trimmed and bare
    /// dates follow their date-times. Returns `Ok(false)` without writing when
    /// nothing matches or the text ends up blank.
    pub(crate) fn update<F>(&self, selector: &TaskSelector, mutate: F) -> StoreResult<bool>
    where
        F: FnOnce(&mut Task),
    {
        let mut tasks = self.read_collection()?;
        let Some(task) = tasks.iter_mut().find(|task| selector.matches(task)) else {
            debug!("event=task_update module=store status=not_found");
            return Ok(false);
        };

        mutate(task);
        let text = task.text.trim();
        if text.is_empty() {
            debug!("event=task_update module=store status=skipped reason=empty_text");
            return Ok(false);
        }
        task.text = text.to_string();
        task.reconcile_dates();
        self.save_all(&tasks)?;
        Ok(true)
    }

    pub fn toggle_done(&self, selector: &TaskSelector) -> StoreResult<bool> {
        self.update(selector, |task| task.done = !task.done)
    }

    /// Replaces the display text; blank text is ignored.
    pub fn rename(&self, selector: &TaskSelector, text: &str) -> StoreResult<bool> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            debug!("event=task_rename module=store status=skipped reason=empty_text");
            return Ok(false);
        }
        self.update(selector, |task| task.text = trimmed.to_string())
    }

    pub fn update_dates(&self, selector: &TaskSelector, edit: &DateEdit) -> StoreResult<bool> {
        self.update(selector, |task| task.apply_date_edit(edit))
    }

    /// Removes the first task matching `selector`.
    pub fn delete(&self, selector: &TaskSelector) -> StoreResult<bool> {
        let mut tasks = self.read_collection()?;
        let Some(index) = tasks.iter().position(|task| selector.matches(task)) else {
            debug!("event=task_delete module=store status=not_found");
            return Ok(false);
        };

        tasks.remove(index);
        self.save_all(&tasks)?;
        info!(
            "event=task_delete module=store status=ok count={}",
            tasks.len()
        );
        Ok(true)
    }

    /// Removes the task at list position `index`, as shown by the task
    /// management panel.
    pub fn delete_at(&self, index: usize) -> StoreResult<bool> {
        let mut tasks = self.read_collection()?;
        if index >= tasks.len() {
            debug!("event=task_delete module=store status=not_found index={index}");
            return Ok(false);
        }

        tasks.remove(index);
        self.save_all(&tasks)?;
        Ok(true)
    }

    fn read_collection(&self) -> StoreResult<Vec<Task>> {
        let Some(raw) = self.kv.get(&self.key)? else {
            return Ok(Vec::new());
        };
        decode_collection(&raw)
    }
}

/// Decodes the stored array record by record.
///
/// `null` reads as an empty collection, as an absent key does.
fn decode_collection(raw: &str) -> StoreResult<Vec<Task>> {
    let records: Option<Vec<serde_json::Value>> =
        serde_json::from_str(raw).map_err(StoreError::Decode)?;

    let mut tasks = Vec::new();
    for (index, record) in records.unwrap_or_default().into_iter().enumerate() {
        match serde_json::from_value::<Task>(record) {
            Ok(task) => tasks.push(task),
            Err(err) => {
                warn!("event=task_decode module=store status=skipped index={index} error={err}");
            }
        }
    }
    Ok(tasks)
}
