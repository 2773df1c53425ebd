//! View builders for the three widget panels plus the task manager.

use crate::config::PlannerConfig;
use crate::dates::{
    days_in_month, format_short_today, month_start_offset, ordinal_suffix, to_date_key, Week,
};
use crate::layout::week_bars::{layout_week_bars, BarDescriptor, BarStack};
use crate::model::task::{Task, TaskId};
use crate::query::range::{due_tasks_on, has_due_task, has_work_window, tasks_on_day};
use chrono::{Datelike, NaiveDate, SecondsFormat};
use serde::Serialize;

/// Decoration class attached to a calendar cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CellTag {
    Today,
    HasTask,
    HasWindow,
}

impl CellTag {
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::HasTask => "has-task",
            Self::HasWindow => "has-window",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayListItem {
    pub task_id: TaskId,
    pub text: String,
    pub done: bool,
    pub due_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayListView {
    pub date: NaiveDate,
    pub heading: String,
    pub items: Vec<DayListItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekCell {
    pub date: NaiveDate,
    pub day_number: u32,
    pub tags: Vec<CellTag>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekStripView {
    pub label: String,
    pub cells: Vec<WeekCell>,
    pub bars: Vec<BarDescriptor>,
    pub stack: BarStack,
    pub label_reserve: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuePill {
    pub task_id: TaskId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthCell {
    pub date: NaiveDate,
    pub day_number: u32,
    pub tags: Vec<CellTag>,
    pub due_pills: Vec<DuePill>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthGridView {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    /// Monday-start rows; `None` marks padding before the 1st and after the
    /// last day.
    pub rows: Vec<[Option<MonthCell>; 7]>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub index: usize,
    pub task_id: TaskId,
    pub text: String,
    pub done: bool,
    pub created_at: String,
    pub due: Option<String>,
    pub work_start: Option<String>,
    pub work_end: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllTasksView {
    pub items: Vec<TaskSummary>,
}

/// Adapter that realizes views on a concrete surface.
pub trait RenderTarget {
    fn render_day_list(&mut self, view: &DayListView);
    fn render_week_strip(&mut self, view: &WeekStripView);
    fn render_month_grid(&mut self, view: &MonthGridView);

    /// Redraws the task management list. Targets without one keep the no-op.
    fn render_all_tasks(&mut self, _view: &AllTasksView) {}
}

/// Full re-render pass: day list, week strip and month grid for `today`.
pub fn render_all<T: RenderTarget + ?Sized>(
    tasks: &[Task],
    today: NaiveDate,
    config: &PlannerConfig,
    target: &mut T,
) {
    target.render_day_list(&build_day_list(tasks, today));
    target.render_week_strip(&build_week_strip(tasks, today, config));
    target.render_month_grid(&build_month_grid(tasks, today));
}

pub fn build_day_list(tasks: &[Task], day: NaiveDate) -> DayListView {
    DayListView {
        date: day,
        heading: format!("Tasks for {}", format_short_today(day)),
        items: tasks_on_day(tasks, day)
            .into_iter()
            .map(|task| DayListItem {
                task_id: task.id,
                text: task.text.clone(),
                done: task.done,
                due_label: due_label(task),
            })
            .collect(),
    }
}

/// Week strip for the week containing `today`.
///
/// A week that leaves the calendar's range renders as an empty strip.
pub fn build_week_strip(
    tasks: &[Task],
    today: NaiveDate,
    config: &PlannerConfig,
) -> WeekStripView {
    let Some(week) = Week::containing(today) else {
        return WeekStripView {
            label: String::new(),
            cells: Vec::new(),
            bars: Vec::new(),
            stack: BarStack::new(0, &config.week_bars),
            label_reserve: config.week_bars.label_reserve,
        };
    };
    let cells = week
        .days()
        .iter()
        .map(|day| WeekCell {
            date: *day,
            day_number: day.day(),
            tags: cell_tags(tasks, *day, today),
        })
        .collect();
    let bars = layout_week_bars(&week, tasks);
    let stack = BarStack::new(bars.len(), &config.week_bars);

    WeekStripView {
        label: week.label(),
        cells,
        bars,
        stack,
        label_reserve: config.week_bars.label_reserve,
    }
}

pub fn build_month_grid(tasks: &[Task], today: NaiveDate) -> MonthGridView {
    let (year, month) = (today.year(), today.month());
    let mut view = MonthGridView {
        year,
        month,
        month_name: today.format("%B").to_string(),
        rows: Vec::new(),
    };
    let (Some(total_days), Some(offset)) =
        (days_in_month(year, month), month_start_offset(year, month))
    else {
        return view;
    };

    let mut next_day = 1;
    while next_day <= total_days {
        let mut row: [Option<MonthCell>; 7] = Default::default();
        for (column, slot) in row.iter_mut().enumerate() {
            let before_first = view.rows.is_empty() && (column as u32) < offset;
            if before_first || next_day > total_days {
                continue;
            }
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, next_day) {
                *slot = Some(month_cell(tasks, date, today));
            }
            next_day += 1;
        }
        view.rows.push(row);
    }
    view
}

pub fn build_all_tasks(tasks: &[Task]) -> AllTasksView {
    AllTasksView {
        items: tasks
            .iter()
            .enumerate()
            .map(|(index, task)| TaskSummary {
                index,
                task_id: task.id,
                text: task.text.clone(),
                done: task.done,
                created_at: task.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                due: task
                    .due_date_time
                    .map(|value| value.to_string())
                    .or_else(|| task.due_date.map(to_date_key)),
                work_start: task.work_start.map(to_date_key),
                work_end: task.work_end.map(to_date_key),
            })
            .collect(),
    }
}

/// Suffix shown after a task's text in the day list.
///
/// " (due Dec 4th, 11:30 PM)" when a time is known, " (due Dec 4th)" for a
/// bare date, `None` without a due date.
pub fn due_label(task: &Task) -> Option<String> {
    let date = task
        .due_date_time
        .map(|value| value.date())
        .or(task.due_date)?;
    let day = date.day();
    let time = task.due_date_time.and_then(|value| value.time());

    Some(match time {
        Some(time) => format!(
            " (due {} {day}{}, {})",
            date.format("%b"),
            ordinal_suffix(day),
            time.format("%-I:%M %p")
        ),
        None => format!(" (due {} {day}{})", date.format("%b"), ordinal_suffix(day)),
    })
}

fn month_cell(tasks: &[Task], date: NaiveDate, today: NaiveDate) -> MonthCell {
    MonthCell {
        date,
        day_number: date.day(),
        tags: cell_tags(tasks, date, today),
        due_pills: due_tasks_on(tasks, date)
            .into_iter()
            .map(|task| DuePill {
                task_id: task.id,
                text: task.text.clone(),
            })
            .collect(),
    }
}

fn cell_tags(tasks: &[Task], date: NaiveDate, today: NaiveDate) -> Vec<CellTag> {
    let mut tags = Vec::new();
    if date == today {
        tags.push(CellTag::Today);
    }
    if has_due_task(tasks, date) {
        tags.push(CellTag::HasTask);
    }
    if has_work_window(tasks, date) {
        tags.push(CellTag::HasWindow);
    }
    tags
}
