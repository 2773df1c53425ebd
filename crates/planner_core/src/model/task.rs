//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its camelCase wire fields.
//! - Normalize date-only and date-time representations.
//! - Provide lookup selectors by generated ID or legacy natural key.
//!
//! # Invariants
//! - `text` is never empty for a task built through `Task::from_draft`.
//! - When a date-time field is set, its date equals the paired bare date.
//! - `created_at` carries millisecond precision so it survives a save/load.
//! - A work window is only considered when both ends are set; an inverted
//!   window (`work_start > work_end`) contains no day.

use crate::dates::{parse_date_key, to_date_key};
use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, SubsecRound, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier assigned to every task at creation.
pub type TaskId = Uuid;

/// Namespace for IDs derived from records persisted before IDs existed.
const LEGACY_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2a4e_8b3d_4c7a_9e21_5d0f_b8a3_c614);

/// Validation failures for task construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Display text is empty after trimming.
    EmptyText,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "task text cannot be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// Error returned when a date-time string is not `YYYY-MM-DD[THH:MM[:SS]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeParseError {
    value: String,
}

impl Display for DateTimeParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid date-time `{}`; expected YYYY-MM-DD or YYYY-MM-DDTHH:MM",
            self.value
        )
    }
}

impl Error for DateTimeParseError {}

/// Calendar date with an optional wall-clock time.
///
/// Serialized as `YYYY-MM-DD` when no time is set, otherwise as
/// `YYYY-MM-DDTHH:MM`. The first ten characters are always the date key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTimeField {
    date: NaiveDate,
    time: Option<NaiveTime>,
}

impl DateTimeField {
    pub fn new(date: NaiveDate, time: Option<NaiveTime>) -> Self {
        Self {
            date,
            time: time.map(|value| value.trunc_subsecs(0)),
        }
    }

    pub fn date_only(date: NaiveDate) -> Self {
        Self::new(date, None)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> Option<NaiveTime> {
        self.time
    }
}

impl Display for DateTimeField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&to_date_key(self.date))?;
        match self.time {
            Some(time) if time.second() == 0 => write!(f, "T{}", time.format("%H:%M")),
            Some(time) => write!(f, "T{}", time.format("%H:%M:%S")),
            None => Ok(()),
        }
    }
}

impl FromStr for DateTimeField {
    type Err = DateTimeParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || DateTimeParseError {
            value: value.to_string(),
        };
        let trimmed = value.trim();
        let (date_part, time_part) = match trimmed.split_once('T') {
            Some((date, time)) => (date, Some(time)),
            None => (trimmed, None),
        };

        let date = parse_date_key(date_part).ok_or_else(invalid)?;
        let time = match time_part {
            Some(text) => Some(
                NaiveTime::parse_from_str(text, "%H:%M")
                    .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
                    .map_err(|_| invalid())?,
            ),
            None => None,
        };
        Ok(Self::new(date, time))
    }
}

impl Serialize for DateTimeField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateTimeField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Caller-supplied fields for a new task.
///
/// Bare dates may be omitted when the matching date-time is present; the
/// bare date is then derived from the date-time's date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub text: String,
    pub due_date: Option<NaiveDate>,
    pub work_start: Option<NaiveDate>,
    pub work_end: Option<NaiveDate>,
    pub due_date_time: Option<DateTimeField>,
    pub work_start_date_time: Option<DateTimeField>,
    pub work_end_date_time: Option<DateTimeField>,
}

impl TaskDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn due_on(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    pub fn due_at(mut self, value: DateTimeField) -> Self {
        self.due_date_time = Some(value);
        self
    }

    pub fn work_window(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.work_start = Some(start);
        self.work_end = Some(end);
        self
    }

    pub fn work_window_at(mut self, start: DateTimeField, end: DateTimeField) -> Self {
        self.work_start_date_time = Some(start);
        self.work_end_date_time = Some(end);
        self
    }
}

/// Replacement values for all date fields of a task.
///
/// `None` clears the field pair; `Some` sets both the date-time and the
/// derived bare date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateEdit {
    pub due: Option<DateTimeField>,
    pub work_start: Option<DateTimeField>,
    pub work_end: Option<DateTimeField>,
}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "TaskRecord")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub done: bool,
    pub due_date: Option<NaiveDate>,
    pub work_start: Option<NaiveDate>,
    pub work_end: Option<NaiveDate>,
    pub due_date_time: Option<DateTimeField>,
    pub work_start_date_time: Option<DateTimeField>,
    pub work_end_date_time: Option<DateTimeField>,
    #[serde(serialize_with = "serialize_created_at")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Builds a task from a draft with a freshly generated ID.
    ///
    /// # Errors
    /// - `TaskValidationError::EmptyText` when the trimmed text is empty.
    pub fn from_draft(
        draft: TaskDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TaskValidationError> {
        let text = draft.text.trim();
        if text.is_empty() {
            return Err(TaskValidationError::EmptyText);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            text: text.to_string(),
            done: false,
            due_date: reconcile_date(draft.due_date, draft.due_date_time),
            work_start: reconcile_date(draft.work_start, draft.work_start_date_time),
            work_end: reconcile_date(draft.work_end, draft.work_end_date_time),
            due_date_time: draft.due_date_time,
            work_start_date_time: draft.work_start_date_time,
            work_end_date_time: draft.work_end_date_time,
            created_at: created_at.trunc_subsecs(3),
        })
    }

    /// Deterministic ID for a record persisted without one.
    pub fn legacy_id(text: &str, created_at: &DateTime<Utc>) -> TaskId {
        let name = format!("{text}\u{0}{}", format_created_at(created_at));
        Uuid::new_v5(&LEGACY_ID_NAMESPACE, name.as_bytes())
    }

    /// Inclusive work window, when both ends are set.
    pub fn work_window(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.work_start?, self.work_end?))
    }

    pub fn has_work_window(&self) -> bool {
        self.work_window().is_some()
    }

    /// Whether `day` falls inside the task's own (unclipped) work window.
    pub fn window_contains(&self, day: NaiveDate) -> bool {
        self.work_window()
            .is_some_and(|(start, end)| start <= day && day <= end)
    }

    pub fn is_due_on(&self, day: NaiveDate) -> bool {
        self.due_date == Some(day)
    }

    /// Re-derives each bare date from its date-time, when one is set.
    pub fn reconcile_dates(&mut self) {
        self.due_date = reconcile_date(self.due_date, self.due_date_time);
        self.work_start = reconcile_date(self.work_start, self.work_start_date_time);
        self.work_end = reconcile_date(self.work_end, self.work_end_date_time);
    }

    /// Stores the id a raw JSON record would be given on read.
    ///
    /// Returns `false` when the record already has a usable id, or when its
    /// `text` or `createdAt` is missing or malformed.
    pub fn backfill_record_id(record: &mut serde_json::Value) -> bool {
        let Some(fields) = record.as_object_mut() else {
            return false;
        };
        let has_id = fields
            .get("id")
            .and_then(serde_json::Value::as_str)
            .is_some_and(|raw| Uuid::parse_str(raw).is_ok());
        if has_id {
            return false;
        }
        let Some(text) = fields.get("text").and_then(serde_json::Value::as_str) else {
            return false;
        };
        let Some(created_at) = fields
            .get("createdAt")
            .and_then(serde_json::Value::as_str)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        else {
            return false;
        };

        let id = Self::legacy_id(text, &created_at.with_timezone(&Utc));
        fields.insert("id".to_string(), serde_json::Value::String(id.to_string()));
        true
    }

    /// Replaces every date field, keeping bare dates in step with date-times.
    pub fn apply_date_edit(&mut self, edit: &DateEdit) {
        self.due_date_time = edit.due;
        self.due_date = edit.due.map(|value| value.date());
        self.work_start_date_time = edit.work_start;
        self.work_start = edit.work_start.map(|value| value.date());
        self.work_end_date_time = edit.work_end;
        self.work_end = edit.work_end.map(|value| value.date());
    }
}

/// Locates a task inside the stored collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSelector {
    /// Generated stable ID.
    Id(TaskId),
    /// Legacy `(text, createdAt)` pair.
    NaturalKey {
        text: String,
        created_at: DateTime<Utc>,
    },
}

impl TaskSelector {
    pub fn natural_key_of(task: &Task) -> Self {
        Self::NaturalKey {
            text: task.text.clone(),
            created_at: task.created_at,
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::Id(id) => task.id == *id,
            Self::NaturalKey { text, created_at } => {
                task.text == *text && task.created_at == *created_at
            }
        }
    }
}

impl From<TaskId> for TaskSelector {
    fn from(value: TaskId) -> Self {
        Self::Id(value)
    }
}

/// Date-time wins over a disagreeing bare date so the pair stays consistent.
fn reconcile_date(bare: Option<NaiveDate>, with_time: Option<DateTimeField>) -> Option<NaiveDate> {
    with_time.map(|value| value.date()).or(bare)
}

fn format_created_at(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_created_at<S: Serializer>(
    value: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_created_at(value))
}

/// Persisted record shape, lenient about optional date fields.
///
/// Unparseable optional dates and ids are read as absent and a null `done`
/// as false; only `text` and a valid `createdAt` are required.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    #[serde(default)]
    id: Option<String>,
    text: String,
    #[serde(default)]
    done: Option<bool>,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    work_start: Option<String>,
    #[serde(default)]
    work_end: Option<String>,
    #[serde(default)]
    due_date_time: Option<String>,
    #[serde(default)]
    work_start_date_time: Option<String>,
    #[serde(default)]
    work_end_date_time: Option<String>,
    created_at: String,
}

/// Decoding failure for a persisted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecordError {
    created_at: String,
}

impl Display for TaskRecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid createdAt `{}` in task record", self.created_at)
    }
}

impl Error for TaskRecordError {}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskRecordError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let created_at = DateTime::parse_from_rfc3339(&record.created_at)
            .map_err(|_| TaskRecordError {
                created_at: record.created_at.clone(),
            })?
            .with_timezone(&Utc);

        let due_date_time = parse_optional_date_time(record.due_date_time.as_deref());
        let work_start_date_time = parse_optional_date_time(record.work_start_date_time.as_deref());
        let work_end_date_time = parse_optional_date_time(record.work_end_date_time.as_deref());

        Ok(Self {
            id: record
                .id
                .and_then(|raw| Uuid::parse_str(&raw).ok())
                .unwrap_or_else(|| Self::legacy_id(&record.text, &created_at)),
            due_date: reconcile_date(parse_optional_date(record.due_date.as_deref()), due_date_time),
            work_start: reconcile_date(
                parse_optional_date(record.work_start.as_deref()),
                work_start_date_time,
            ),
            work_end: reconcile_date(
                parse_optional_date(record.work_end.as_deref()),
                work_end_date_time,
            ),
            text: record.text,
            done: record.done.unwrap_or(false),
            due_date_time,
            work_start_date_time,
            work_end_date_time,
            created_at,
        })
    }
}

fn parse_optional_date(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(parse_date_key)
}

fn parse_optional_date_time(value: Option<&str>) -> Option<DateTimeField> {
    value.and_then(|raw| raw.parse().ok())
}
