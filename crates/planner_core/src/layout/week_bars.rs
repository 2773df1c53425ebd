//! Week bar layout engine.
//!
//! # Responsibility
//! - Emit at most one window bar and one due marker per task in the week.
//! - Clip work windows to the visible Monday..Sunday span.
//! - Stack bars one per row in emission order.
//!
//! # Invariants
//! - A due date inside the task's own window is embedded in the window bar;
//!   otherwise it becomes a separate due-only bar. Never both.
//! - Inverted windows never produce a window bar.
//! - Rows are not compacted: bar `i` always sits in row `i`.

use crate::config::BarMetrics;
use crate::dates::Week;
use crate::model::task::{Task, TaskId};
use crate::query::range::intersects_range;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BarKind {
    /// Spans the clipped work window.
    Window,
    /// Single-day marker for a due date no window bar can host.
    DueOnly,
}

/// One horizontal bar, positioned by day index within the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarDescriptor {
    #[serde(rename = "type")]
    pub kind: BarKind,
    pub start_idx: usize,
    pub end_idx: usize,
    /// Due-day index embedded in a window bar.
    pub due_idx: Option<usize>,
    pub text: String,
    pub task_id: TaskId,
}

/// Due highlight layered over a window bar.
///
/// Rounded ends only where the highlight touches the bar's own ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueMarker {
    pub idx: usize,
    pub round_start: bool,
    pub round_end: bool,
}

impl BarDescriptor {
    pub fn due_marker(&self) -> Option<DueMarker> {
        let idx = self.due_idx?;
        Some(DueMarker {
            idx,
            round_start: idx == self.start_idx,
            round_end: idx == self.end_idx,
        })
    }

    /// Number of day columns covered.
    pub fn span(&self) -> usize {
        self.end_idx - self.start_idx + 1
    }
}

/// Lays out bars for every task that touches `week`, in task order.
pub fn layout_week_bars(week: &Week, tasks: &[Task]) -> Vec<BarDescriptor> {
    let mut bars = Vec::new();
    for task in tasks
        .iter()
        .filter(|task| intersects_range(task, week.start(), week.end()))
    {
        bars.extend(window_bar(week, task));
        bars.extend(due_only_bar(week, task));
    }
    bars
}

fn window_bar(week: &Week, task: &Task) -> Option<BarDescriptor> {
    let (work_start, work_end) = task.work_window()?;
    let span_start = work_start.max(week.start());
    let span_end = work_end.min(week.end());
    if span_start > span_end {
        return None;
    }

    let due_idx = task
        .due_date
        .filter(|due| task.window_contains(*due))
        .and_then(|due| week.index_of(due));

    Some(BarDescriptor {
        kind: BarKind::Window,
        start_idx: week.index_of(span_start)?,
        end_idx: week.index_of(span_end)?,
        due_idx,
        text: task.text.clone(),
        task_id: task.id,
    })
}

fn due_only_bar(week: &Week, task: &Task) -> Option<BarDescriptor> {
    let due = task.due_date?;
    let idx = week.index_of(due)?;
    if task.window_contains(due) {
        return None;
    }

    Some(BarDescriptor {
        kind: BarKind::DueOnly,
        start_idx: idx,
        end_idx: idx,
        due_idx: None,
        text: task.text.clone(),
        task_id: task.id,
    })
}

/// Vertical geometry of a stack of week bars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarStack {
    pub rows: usize,
    pub bar_height: f32,
    pub gap: f32,
}

impl BarStack {
    pub fn new(rows: usize, metrics: &BarMetrics) -> Self {
        Self {
            rows,
            bar_height: metrics.bar_height,
            gap: metrics.gap,
        }
    }

    /// `rows * bar_height + (rows - 1) * gap`, or zero for an empty stack.
    pub fn total_height(&self) -> f32 {
        if self.rows == 0 {
            return 0.0;
        }
        let rows = self.rows as f32;
        rows * self.bar_height + (rows - 1.0) * self.gap
    }

    /// Offset of `row` from the top of the stack.
    pub fn row_offset(&self, row: usize) -> f32 {
        row as f32 * (self.bar_height + self.gap)
    }

    /// Top of the stack relative to the cell top, centered in the band left
    /// after `label_reserve`.
    pub fn top_within_cell(&self, cell_height: f32, label_reserve: f32) -> f32 {
        label_reserve + (cell_height - label_reserve - self.total_height()) / 2.0
    }
}
