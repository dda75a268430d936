use chrono::Local;

use datebook::local_store::LocalStore;
use datebook::TaskListController;

#[tokio::main]
async fn main() {
    env_logger::init();

    let backing_file = std::env::temp_dir().join("datebook-demo.json");
    let store = match LocalStore::open(&backing_file) {
        Ok(store) => store,
        Err(err) => {
            log::warn!("Invalid backing file: {}. Starting over", err);
            let _ = std::fs::remove_file(&backing_file);
            LocalStore::open(&backing_file).unwrap()
        }
    };

    let today = Local::now().date_naive();
    let mut controller = TaskListController::new(store, today);

    controller.begin_create();
    controller.submit_create("water the plants").await;
    controller.begin_create();
    controller.submit_create("take out the trash").await;

    println!("---- {} ----", controller.selected_date());
    datebook::utils::print_task_list(&controller.visible_tasks());

    // Complete the first task of the day
    if let Some(task) = controller.visible_tasks().first() {
        let id = task.id().clone();
        controller.toggle(&id).await;
    }

    println!("---- after completing one ----");
    datebook::utils::print_task_list(&controller.visible_tasks());

    if let Some(notice) = controller.take_notice() {
        println!("{}", notice);
    }

    println!("(tasks persisted to {:?})", backing_file);
}
