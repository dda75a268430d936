//! Drives a controller over a file-backed store, checking the task-list
//! synchronisation and filtering model

use std::path::PathBuf;

use chrono::NaiveDate;

use datebook::local_store::LocalStore;
use datebook::traits::TaskStore;
use datebook::{TaskId, TaskListController};

fn temp_backing_file() -> PathBuf {
    let unique = TaskId::random();
    std::env::temp_dir().join(format!("datebook-controller-{}.json", unique))
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A fresh controller over an empty store, with 2024-03-10 selected
fn new_controller() -> (TaskListController<LocalStore>, PathBuf) {
    let path = temp_backing_file();
    let store = LocalStore::open(&path).unwrap();
    (TaskListController::new(store, day(2024, 3, 10)), path)
}

#[tokio::test]
async fn created_task_is_visible_on_its_day_only() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (mut controller, path) = new_controller();

    assert!(!controller.is_loading());
    assert!(controller.visible_tasks().is_empty());

    controller.begin_create();
    assert!(controller.is_creating());
    controller.submit_create("Buy milk").await;
    assert!(!controller.is_creating());

    let visible = controller.visible_tasks();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].title(), "Buy milk");
    assert_eq!(visible[0].date(), day(2024, 3, 10));
    assert_eq!(visible[0].done(), false);

    // Switching the day hides the task from the view, but the day stays marked
    controller.select_date(day(2024, 3, 11));
    assert!(controller.visible_tasks().is_empty());
    assert!(controller.marked_dates().contains(&day(2024, 3, 10)));
    assert!(!controller.marked_dates().contains(&day(2024, 3, 11)));

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn visible_tasks_match_the_selected_day_exactly() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (mut controller, path) = new_controller();

    controller.submit_create("first of March").await;
    controller.select_date(day(2024, 3, 11));
    controller.submit_create("second of March").await;
    controller.submit_create("also second of March").await;

    assert_eq!(controller.tasks().len(), 3);
    for task in controller.visible_tasks() {
        assert_eq!(task.date(), controller.selected_date());
    }
    assert_eq!(controller.visible_tasks().len(), 2);

    let marked = controller.marked_dates();
    assert_eq!(marked.len(), 2);
    assert!(marked.contains(&day(2024, 3, 10)));
    assert!(marked.contains(&day(2024, 3, 11)));

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn empty_title_cancels_the_create() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (mut controller, path) = new_controller();

    controller.begin_create();
    controller.submit_create("").await;
    assert!(!controller.is_creating());
    assert!(controller.tasks().is_empty());

    controller.begin_create();
    controller.submit_create("   \t ").await;
    assert!(!controller.is_creating());
    assert!(controller.tasks().is_empty());

    // Nothing must have reached the store either
    assert!(controller.store().tasks().await.unwrap().is_empty());
    assert_eq!(controller.take_notice(), None);

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn empty_title_aborts_the_edit() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (mut controller, path) = new_controller();

    controller.submit_create("A").await;
    let id = controller.tasks()[0].id().clone();

    controller.begin_edit(&id);
    assert_eq!(controller.editing(), Some(&id));
    controller.submit_edit(&id, "").await;

    assert_eq!(controller.editing(), None);
    assert_eq!(controller.tasks()[0].title(), "A");

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn submitted_titles_are_trimmed() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (mut controller, path) = new_controller();

    controller.submit_create("  Buy milk  ").await;
    assert_eq!(controller.tasks()[0].title(), "Buy milk");

    let id = controller.tasks()[0].id().clone();
    controller.begin_edit(&id);
    controller.submit_edit(&id, " Buy oat milk ").await;
    assert_eq!(controller.tasks()[0].title(), "Buy oat milk");
    assert_eq!(controller.editing(), None);

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn toggle_round_trips() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (mut controller, path) = new_controller();

    controller.submit_create("Buy milk").await;
    let id = controller.tasks()[0].id().clone();
    assert_eq!(controller.tasks()[0].done(), false);

    controller.toggle(&id).await;
    assert_eq!(controller.tasks()[0].done(), true);

    controller.toggle(&id).await;
    assert_eq!(controller.tasks()[0].done(), false);

    // Toggling an unknown id changes nothing and raises no notice
    controller.toggle(&TaskId::random()).await;
    assert_eq!(controller.tasks().len(), 1);
    assert_eq!(controller.take_notice(), None);

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn delete_removes_exactly_one_task() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (mut controller, path) = new_controller();

    controller.submit_create("Buy milk").await;
    controller.submit_create("Feed the cat").await;
    let milk = controller.tasks()[0].id().clone();

    controller.delete(&milk).await;
    assert_eq!(controller.tasks().len(), 1);
    assert_eq!(controller.tasks()[0].title(), "Feed the cat");

    controller.delete(&TaskId::random()).await;
    assert_eq!(controller.tasks().len(), 1);
    assert_eq!(controller.take_notice(), None);

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn editing_a_second_task_abandons_the_first_edit() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (mut controller, path) = new_controller();

    controller.submit_create("first").await;
    controller.submit_create("second").await;
    let first = controller.tasks()[0].id().clone();
    let second = controller.tasks()[1].id().clone();

    controller.begin_edit(&first);
    controller.begin_edit(&second);
    assert_eq!(controller.editing(), Some(&second));

    // The first task was never saved with any new title
    controller.submit_edit(&second, "renamed").await;
    assert_eq!(controller.tasks()[0].title(), "first");
    assert_eq!(controller.tasks()[1].title(), "renamed");

    controller.begin_edit(&first);
    controller.cancel_edit();
    assert_eq!(controller.editing(), None);

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn renames_survive_a_reopen() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (mut controller, path) = new_controller();

    controller.submit_create("draft title").await;
    let id = controller.tasks()[0].id().clone();
    controller.submit_edit(&id, "final title").await;

    let reopened = LocalStore::open(&path).unwrap();
    let tasks = reopened.tasks().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title(), "final title");

    let _ = std::fs::remove_file(&path);
}
