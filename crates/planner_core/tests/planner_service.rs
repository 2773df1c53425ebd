use chrono::{NaiveDate, NaiveTime};
use planner_core::{
    AllTasksView, DateEdit, DateTimeField, DayListView, KvStore, MemoryKvStore, MonthGridView,
    PlannerAction, PlannerConfig, PlannerService, RenderTarget, TaskForm, TaskSelector,
    WeekStripView,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[derive(Default)]
struct RecordingTarget {
    calls: Vec<&'static str>,
    day_list: Option<DayListView>,
    week_strip: Option<WeekStripView>,
    month_grid: Option<MonthGridView>,
    all_tasks: Option<AllTasksView>,
}

impl RenderTarget for RecordingTarget {
    fn render_day_list(&mut self, view: &DayListView) {
        self.calls.push("day_list");
        self.day_list = Some(view.clone());
    }

    fn render_week_strip(&mut self, view: &WeekStripView) {
        self.calls.push("week_strip");
        self.week_strip = Some(view.clone());
    }

    fn render_month_grid(&mut self, view: &MonthGridView) {
        self.calls.push("month_grid");
        self.month_grid = Some(view.clone());
    }

    fn render_all_tasks(&mut self, view: &AllTasksView) {
        self.calls.push("all_tasks");
        self.all_tasks = Some(view.clone());
    }
}

#[test]
fn quick_add_creates_task_due_today() {
    let kv = MemoryKvStore::new();
    let service = PlannerService::new(&kv, PlannerConfig::default());
    let today = date(2025, 6, 11);

    let task = service.quick_add("  water plants ", today).unwrap().unwrap();

    assert_eq!(task.text, "water plants");
    assert_eq!(task.due_date, Some(today));
    assert_eq!(task.due_date_time, None);
    assert_eq!(service.tasks(), vec![task]);
}

#[test]
fn blank_quick_add_is_ignored_but_still_renders() {
    let kv = MemoryKvStore::new();
    let service = PlannerService::new(&kv, PlannerConfig::default());
    let mut target = RecordingTarget::default();

    let changed = service
        .dispatch(
            PlannerAction::QuickAdd {
                text: "   ".to_string(),
            },
            date(2025, 6, 11),
            &mut target,
        )
        .unwrap();

    assert!(!changed);
    assert!(service.tasks().is_empty());
    assert_eq!(target.calls, ["day_list", "week_strip", "month_grid"]);
}

#[test]
fn dispatch_renders_views_from_updated_collection() {
    let kv = MemoryKvStore::new();
    let service = PlannerService::new(&kv, PlannerConfig::default());
    let today = date(2025, 6, 11);
    let mut target = RecordingTarget::default();

    let form = TaskForm {
        text: "thesis".to_string(),
        due_date: Some(date(2025, 6, 12)),
        due_time: NaiveTime::from_hms_opt(17, 0, 0),
        work_start_date: Some(date(2025, 6, 9)),
        work_end_date: Some(date(2025, 6, 16)),
        ..TaskForm::default()
    };
    assert!(service
        .dispatch(PlannerAction::FormAdd(form), today, &mut target)
        .unwrap());

    let day_list = target.day_list.unwrap();
    assert_eq!(day_list.items.len(), 1);
    assert_eq!(
        day_list.items[0].due_label.as_deref(),
        Some(" (due Jun 12th, 5:00 PM)")
    );

    let week_strip = target.week_strip.unwrap();
    assert_eq!(week_strip.bars.len(), 1);
    assert_eq!(week_strip.bars[0].due_idx, Some(3));

    let month_grid = target.month_grid.unwrap();
    let twelfth = month_grid
        .rows
        .iter()
        .flatten()
        .flatten()
        .find(|cell| cell.day_number == 12)
        .unwrap();
    assert_eq!(twelfth.due_pills.len(), 1);
}

#[test]
fn manage_panel_actions_redraw_task_list_before_widget() {
    let kv = MemoryKvStore::new();
    let service = PlannerService::new(&kv, PlannerConfig::default());
    let today = date(2025, 6, 11);
    let mut target = RecordingTarget::default();

    service
        .dispatch(
            PlannerAction::QuickAdd {
                text: "first".to_string(),
            },
            today,
            &mut target,
        )
        .unwrap();
    service.quick_add("second", today).unwrap();
    assert!(!target.calls.contains(&"all_tasks"));

    target.calls.clear();
    assert!(service
        .dispatch(PlannerAction::DeleteAt(0), today, &mut target)
        .unwrap());

    assert_eq!(
        target.calls,
        ["all_tasks", "day_list", "week_strip", "month_grid"]
    );
    let panel = target.all_tasks.unwrap();
    assert_eq!(panel.items.len(), 1);
    assert_eq!(panel.items[0].text, "second");
    assert_eq!(target.day_list.unwrap().items.len(), 1);
}

#[test]
fn actions_mutate_selected_task() {
    let kv = MemoryKvStore::new();
    let service = PlannerService::new(&kv, PlannerConfig::default());
    let today = date(2025, 6, 11);
    let first = service.quick_add("first", today).unwrap().unwrap();
    service.quick_add("second", today).unwrap();
    let selector = TaskSelector::Id(first.id);

    assert!(service
        .apply(PlannerAction::ToggleDone(selector.clone()), today)
        .unwrap());
    assert!(service
        .apply(
            PlannerAction::Rename {
                selector: selector.clone(),
                text: "renamed".to_string(),
            },
            today,
        )
        .unwrap());
    assert!(service
        .apply(
            PlannerAction::EditDates {
                selector: selector.clone(),
                edit: DateEdit {
                    due: None,
                    work_start: Some(DateTimeField::date_only(date(2025, 6, 20))),
                    work_end: Some(DateTimeField::date_only(date(2025, 6, 22))),
                },
            },
            today,
        )
        .unwrap());

    let edited = service.store().find(&selector).unwrap();
    assert!(edited.done);
    assert_eq!(edited.text, "renamed");
    assert_eq!(edited.due_date, None);
    assert_eq!(edited.work_window(), Some((date(2025, 6, 20), date(2025, 6, 22))));

    assert!(service.apply(PlannerAction::Delete(selector), today).unwrap());
    assert!(!service.apply(PlannerAction::DeleteAt(3), today).unwrap());
    assert!(service.apply(PlannerAction::DeleteAt(0), today).unwrap());
    assert!(service.all_tasks_view().items.is_empty());
}

#[test]
fn configured_storage_key_is_used() {
    let kv = MemoryKvStore::new();
    let config = PlannerConfig::from_json_str(r#"{"storage_key": "work-planner"}"#).unwrap();
    let service = PlannerService::new(&kv, config);

    service.quick_add("standup", date(2025, 6, 11)).unwrap();

    assert!(kv.get("work-planner").unwrap().is_some());
    assert_eq!(kv.get("planner-tasks").unwrap(), None);
    assert_eq!(service.store().key(), "work-planner");
}
