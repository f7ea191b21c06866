use chrono::{Duration, NaiveDate};
use pomoplan_core::{
    Category, NewTask, PlanError, Planner, SessionLog, TaskRepository, TaskStatus, TimeWindow,
};
use pomoplan_store::{CsvSessionLog, CsvTaskFile};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn open(dir: &Path) -> Planner<CsvTaskFile, CsvSessionLog> {
    Planner::open(
        CsvTaskFile::new(dir.join("tasks.csv")),
        CsvSessionLog::new(dir.join("sessions.csv")),
    )
    .unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 20).unwrap()
}

fn due(days: i64) -> String {
    (today() + Duration::days(days)).format("%Y-%m-%d").to_string()
}

fn add(p: &mut Planner<CsvTaskFile, CsvSessionLog>, name: &str, cat: &str, blocks: i64, due_in: i64) {
    let date = pomoplan_core::parse_date(&due(due_in)).unwrap();
    p.add_task(NewTask::new(name, cat, blocks, date), today()).unwrap();
}

/// Real-file regression: the malformed rows in the fixture are skipped and
/// the rest still add up.
#[test]
fn test_summary_from_fixture_skips_bad_rows() {
    let log = CsvSessionLog::new(fixture("sessions.csv"));
    let entries = log.read_all().unwrap();
    assert_eq!(entries.len(), 9);

    let s = pomoplan_core::weekly_summary(&entries, today());
    assert_eq!(s.total, 9);
    assert_eq!(s.focus_minutes, 225);
    assert_eq!(s.per_day.len(), 7);
    assert_eq!(s.per_day[&NaiveDate::from_ymd_opt(2026, 2, 14).unwrap()], 3);
    assert_eq!(s.per_day[&NaiveDate::from_ymd_opt(2026, 2, 16).unwrap()], 0);
    assert_eq!(s.by_category[&Category::Other], 3);
    assert_eq!(s.by_category[&Category::Exam], 2);
    assert_eq!(s.by_category.values().sum::<u64>(), s.total);
}

/// A parseable but absurd block count must not stop the summary.
#[test]
fn test_huge_block_count_saturates_instead_of_panicking() {
    let log = CsvSessionLog::new(fixture("sessions_huge_count.csv"));
    let entries = log.read_all().unwrap();
    assert_eq!(entries.len(), 3);

    let big = u64::from(u32::MAX) + 1;
    let s = pomoplan_core::weekly_summary(&entries, today());
    assert_eq!(s.per_day[&today()], big);
    assert_eq!(s.by_category[&Category::Study], 2);
    assert_eq!(s.total, big + 2);
    assert_eq!(s.focus_minutes, (big + 2) * 25);
    assert_eq!(pomoplan_core::daily_count(&entries, today()), big);
}

#[test]
fn test_tasks_survive_reload() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut p = open(dir.path());
        add(&mut p, "Math Revision", "exam", 3, 3);
        add(&mut p, "Essay Draft", "assignment", 2, 2);
        add(&mut p, "Research Reading", "reading", 4, 5);
        let deps = vec!["Math Revision".to_string(), "Essay Draft".to_string()];
        let date = pomoplan_core::parse_date(&due(6)).unwrap();
        p.add_task(NewTask::new("Final Report", "assignment", 2, date).depends_on(deps), today())
            .unwrap();
        p.log_completion("essay draft", today()).unwrap();
        p.log_completion("essay draft", today()).unwrap();
    }

    let p = open(dir.path());
    assert_eq!(p.tasks().len(), 4);

    let essay = p.get_task("Essay Draft").unwrap();
    assert_eq!(essay.completed_blocks, 2);
    assert_eq!(essay.status, TaskStatus::Completed);
    assert_eq!(essay.end_date, Some(today()));

    let report = p.get_task("final report").unwrap();
    assert_eq!(report.dependencies, vec!["Math Revision", "Essay Draft"]);
    assert_eq!(report.start_date, today());

    assert_eq!(p.today_count(today()).unwrap(), 2);
    let log = fs::read_to_string(dir.path().join("sessions.csv")).unwrap();
    assert_eq!(log, "date,category,blocks\n2026-02-20,assignment,1\n2026-02-20,assignment,1\n");
}

#[test]
fn test_unknown_task_does_not_touch_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut p = open(dir.path());

    let err = p.log_completion("nothing here", today()).unwrap_err();
    assert!(matches!(err, PlanError::NotFound { .. }));
    assert!(!dir.path().join("tasks.csv").exists());
    assert!(!dir.path().join("sessions.csv").exists());
}

#[test]
fn test_deleting_last_task_leaves_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let mut p = open(dir.path());
    add(&mut p, "Random Task", "other", 2, 4);
    p.delete_task("random task").unwrap();

    let text = fs::read_to_string(dir.path().join("tasks.csv")).unwrap();
    assert_eq!(
        text.trim_end(),
        "name,category,estimated_blocks,completed_blocks,status,start_date,due_date,end_date,dependencies"
    );
    assert!(open(dir.path()).tasks().is_empty());
}

#[test]
fn test_corrupt_task_rows_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.csv");
    fs::write(
        &path,
        "name,category,estimated_blocks,completed_blocks,status,start_date,due_date,end_date,dependencies\n\
         Good,exam,2,0,not started,2026-02-20,2026-02-25,,\n\
         Broken,exam,lots,0,not started,2026-02-20,2026-02-25,,\n\
         Undated,exam,1,0,not started,2026-02-20,someday,,\n\
         Also Good,reading,1,1,completed,2026-02-18,2026-02-22,2026-02-19,Good\n",
    )
    .unwrap();

    let tasks = CsvTaskFile::new(&path).load().unwrap();
    let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Good", "Also Good"]);
    assert_eq!(tasks[1].dependencies, vec!["Good"]);
}

#[test]
fn test_schedules_from_persisted_tasks() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut p = open(dir.path());
        add(&mut p, "A", "exam", 2, 3);
        add(&mut p, "B", "reading", 1, 5);
    }
    let p = open(dir.path());

    let day = p.daily_schedule(&[TimeWindow::new(9.0, 10.0)], today());
    let names: Vec<&str> = day.iter().map(|e| e.task.as_str()).collect();
    assert_eq!(names, vec!["A", "A"]);

    let per_day: BTreeMap<NaiveDate, Vec<TimeWindow>> = (0..7)
        .map(|i| (today() + Duration::days(i), vec![TimeWindow::new(9.0, 11.0)]))
        .collect();
    let week = p.weekly_schedule(&per_day, today(), 0.1);
    assert_eq!(week.len(), 7);
    assert!(week.values().all(|d| d.len() == 3));
}
