use chrono::{NaiveDate, TimeZone, Utc};
use planner_core::{layout_week_bars, BarKind, Task, TaskDraft, Week};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn task(draft: TaskDraft) -> Task {
    let created_at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    Task::from_draft(draft, created_at).unwrap()
}

fn june_week() -> Week {
    Week::from_keys(&[
        "2025-06-09",
        "2025-06-10",
        "2025-06-11",
        "2025-06-12",
        "2025-06-13",
        "2025-06-14",
        "2025-06-15",
    ])
    .unwrap()
}

#[test]
fn lone_due_date_yields_single_due_only_bar() {
    let tasks = vec![task(TaskDraft::new("pay rent").due_on(date(2025, 6, 10)))];

    let bars = layout_week_bars(&june_week(), &tasks);

    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].kind, BarKind::DueOnly);
    assert_eq!((bars[0].start_idx, bars[0].end_idx), (1, 1));
    assert_eq!(bars[0].due_idx, None);
    assert_eq!(bars[0].text, "pay rent");
    assert_eq!(bars[0].task_id, tasks[0].id);
}

#[test]
fn window_past_week_end_is_clipped_and_hosts_due_marker() {
    let tasks = vec![task(
        TaskDraft::new("thesis")
            .work_window(date(2025, 6, 9), date(2025, 6, 16))
            .due_on(date(2025, 6, 12)),
    )];

    let bars = layout_week_bars(&june_week(), &tasks);

    assert_eq!(bars.len(), 1);
    let bar = &bars[0];
    assert_eq!(bar.kind, BarKind::Window);
    assert_eq!((bar.start_idx, bar.end_idx), (0, 6));
    assert_eq!(bar.due_idx, Some(3));
    let marker = bar.due_marker().unwrap();
    assert_eq!(marker.idx, 3);
    assert!(!marker.round_start && !marker.round_end);
}

#[test]
fn window_before_week_start_is_clipped_at_monday() {
    let tasks = vec![task(
        TaskDraft::new("reading").work_window(date(2025, 6, 1), date(2025, 6, 11)),
    )];

    let bars = layout_week_bars(&june_week(), &tasks);

    assert_eq!(bars.len(), 1);
    assert_eq!((bars[0].start_idx, bars[0].end_idx), (0, 2));
    assert_eq!(bars[0].due_marker(), None);
}

#[test]
fn due_outside_own_window_gets_separate_bar() {
    let tasks = vec![task(
        TaskDraft::new("prep")
            .work_window(date(2025, 6, 9), date(2025, 6, 10))
            .due_on(date(2025, 6, 13)),
    )];

    let bars = layout_week_bars(&june_week(), &tasks);

    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].kind, BarKind::Window);
    assert_eq!(bars[0].due_idx, None);
    assert_eq!(bars[1].kind, BarKind::DueOnly);
    assert_eq!(bars[1].start_idx, 4);
}

#[test]
fn due_in_window_but_outside_week_draws_no_marker() {
    let tasks = vec![task(
        TaskDraft::new("long haul")
            .work_window(date(2025, 6, 9), date(2025, 6, 20))
            .due_on(date(2025, 6, 18)),
    )];

    let bars = layout_week_bars(&june_week(), &tasks);

    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].kind, BarKind::Window);
    assert_eq!(bars[0].due_idx, None);
}

#[test]
fn due_on_window_edge_rounds_that_side_only() {
    let tasks = vec![task(
        TaskDraft::new("sprint")
            .work_window(date(2025, 6, 10), date(2025, 6, 13))
            .due_on(date(2025, 6, 13)),
    )];

    let bars = layout_week_bars(&june_week(), &tasks);
    let marker = bars[0].due_marker().unwrap();

    assert_eq!(marker.idx, 4);
    assert!(!marker.round_start);
    assert!(marker.round_end);
}

#[test]
fn inverted_window_never_produces_window_bar() {
    let tasks = vec![
        task(TaskDraft::new("backwards").work_window(date(2025, 6, 12), date(2025, 6, 10))),
        task(
            TaskDraft::new("backwards with due")
                .work_window(date(2025, 6, 12), date(2025, 6, 10))
                .due_on(date(2025, 6, 11)),
        ),
    ];

    let bars = layout_week_bars(&june_week(), &tasks);

    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].kind, BarKind::DueOnly);
    assert_eq!(bars[0].text, "backwards with due");
}

#[test]
fn tasks_outside_the_week_are_ignored() {
    let tasks = vec![
        task(TaskDraft::new("last week").due_on(date(2025, 6, 8))),
        task(TaskDraft::new("next week").work_window(date(2025, 6, 16), date(2025, 6, 18))),
        task(TaskDraft::new("undated")),
    ];

    assert!(layout_week_bars(&june_week(), &tasks).is_empty());
}

#[test]
fn bars_follow_task_order_one_row_each() {
    let tasks = vec![
        task(TaskDraft::new("a").due_on(date(2025, 6, 9))),
        task(
            TaskDraft::new("b")
                .work_window(date(2025, 6, 14), date(2025, 6, 15))
                .due_on(date(2025, 6, 10)),
        ),
        task(TaskDraft::new("c").due_on(date(2025, 6, 15))),
    ];

    let bars = layout_week_bars(&june_week(), &tasks);
    let summary: Vec<_> = bars
        .iter()
        .map(|bar| (bar.text.as_str(), bar.kind, bar.start_idx, bar.end_idx))
        .collect();

    // "a" and "c" could share a row; no compaction is performed.
    assert_eq!(
        summary,
        vec![
            ("a", BarKind::DueOnly, 0, 0),
            ("b", BarKind::Window, 5, 6),
            ("b", BarKind::DueOnly, 1, 1),
            ("c", BarKind::DueOnly, 6, 6),
        ]
    );
}

#[test]
fn layout_is_deterministic() {
    let tasks = vec![
        task(TaskDraft::new("x").work_window(date(2025, 6, 5), date(2025, 6, 11))),
        task(TaskDraft::new("y").due_on(date(2025, 6, 14))),
    ];
    let week = june_week();

    assert_eq!(layout_week_bars(&week, &tasks), layout_week_bars(&week, &tasks));
}

#[test]
fn descriptors_serialize_with_index_fields() {
    let tasks = vec![task(
        TaskDraft::new("thesis")
            .work_window(date(2025, 6, 9), date(2025, 6, 16))
            .due_on(date(2025, 6, 12)),
    )];

    let bars = layout_week_bars(&june_week(), &tasks);
    let json = serde_json::to_value(&bars[0]).unwrap();

    assert_eq!(json["type"], "window");
    assert_eq!(json["startIdx"], 0);
    assert_eq!(json["endIdx"], 6);
    assert_eq!(json["dueIdx"], 3);
    assert_eq!(json["text"], "thesis");
}
