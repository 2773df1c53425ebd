//! Day and range membership rules.
//!
//! # Invariants
//! - A task belongs to a day when it is due that day or the day lies in its
//!   inclusive work window.
//! - Inverted windows match no day and overlap no range.
//! - Malformed keys and inverted ranges yield empty results, never errors.

use crate::dates::parse_date_key;
use crate::model::task::Task;
use chrono::NaiveDate;

/// Tasks that belong to `day`: due that day or working through it.
pub fn tasks_on_day(tasks: &[Task], day: NaiveDate) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| task.is_due_on(day) || task.window_contains(day))
        .collect()
}

pub fn has_due_task(tasks: &[Task], day: NaiveDate) -> bool {
    tasks.iter().any(|task| task.is_due_on(day))
}

pub fn due_tasks_on(tasks: &[Task], day: NaiveDate) -> Vec<&Task> {
    tasks.iter().filter(|task| task.is_due_on(day)).collect()
}

pub fn has_work_window(tasks: &[Task], day: NaiveDate) -> bool {
    tasks.iter().any(|task| task.window_contains(day))
}

/// Whether `task` touches the closed range `[start, end]`.
pub fn intersects_range(task: &Task, start: NaiveDate, end: NaiveDate) -> bool {
    if start > end {
        return false;
    }
    let due_in_range = task
        .due_date
        .is_some_and(|due| start <= due && due <= end);
    due_in_range || window_overlaps(task, start, end)
}

/// Tasks due inside `[start, end]` or whose work window overlaps it.
pub fn tasks_intersecting_range(tasks: &[Task], start: NaiveDate, end: NaiveDate) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| intersects_range(task, start, end))
        .collect()
}

fn window_overlaps(task: &Task, start: NaiveDate, end: NaiveDate) -> bool {
    match task.work_window() {
        Some((work_start, work_end)) if work_start <= work_end => {
            !(work_end < start || work_start > end)
        }
        _ => false,
    }
}

/// `tasks_on_day` for a `YYYY-MM-DD` key.
pub fn tasks_on_day_key<'a>(tasks: &'a [Task], key: &str) -> Vec<&'a Task> {
    parse_date_key(key).map_or_else(Vec::new, |day| tasks_on_day(tasks, day))
}

pub fn has_due_task_key(tasks: &[Task], key: &str) -> bool {
    parse_date_key(key).is_some_and(|day| has_due_task(tasks, day))
}

pub fn due_tasks_on_key<'a>(tasks: &'a [Task], key: &str) -> Vec<&'a Task> {
    parse_date_key(key).map_or_else(Vec::new, |day| due_tasks_on(tasks, day))
}

pub fn has_work_window_key(tasks: &[Task], key: &str) -> bool {
    parse_date_key(key).is_some_and(|day| has_work_window(tasks, day))
}

pub fn tasks_intersecting_range_keys<'a>(
    tasks: &'a [Task],
    start_key: &str,
    end_key: &str,
) -> Vec<&'a Task> {
    match (parse_date_key(start_key), parse_date_key(end_key)) {
        (Some(start), Some(end)) => tasks_intersecting_range(tasks, start, end),
        _ => Vec::new(),
    }
}
