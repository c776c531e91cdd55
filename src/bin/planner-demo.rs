//! A text rendition of the planner.
//!
//! If `PLANNER_STORE_URL` and `PLANNER_STORE_KEY` are set, this lists the schedule and tasks of that store. \
//! Otherwise, this runs a short scripted session against an in-memory store.
//! You can also set the RUST_LOG environment variable to display more info about the requests.

use std::sync::Arc;

use academic_planner::config::ENV_CONFIG;
use academic_planner::planner::Page;
use academic_planner::schedule::{ScheduleForm, Weekday};
use academic_planner::store::memory::MemoryStore;
use academic_planner::store::rest::RestStore;
use academic_planner::task::{Priority, TaskForm};
use academic_planner::traits::Store;
use academic_planner::utils::{print_message, print_schedule_list, print_task_list};
use academic_planner::Planner;


#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    match &*ENV_CONFIG {
        Some(config) => {
            println!("Using the store at {}", config.url);
            let store = match RestStore::from_config(config) {
                Ok(store) => Some(Arc::new(store)),
                Err(err) => {
                    log::error!("Unable to build a store client: {}", err);
                    None
                },
            };
            let mut planner = Planner::new(store);
            show_both_pages(&mut planner).await;
        },
        None => {
            println!("No remote store configured, using an in-memory store.");
            let mut planner = Planner::new(Some(Arc::new(MemoryStore::for_planner())));
            scripted_session(&mut planner).await;
            show_both_pages(&mut planner).await;
        },
    }
}

async fn show_both_pages<S: Store>(planner: &mut Planner<S>) {
    if let Some(status) = planner.status_message() {
        println!("{}", status);
        return;
    }

    planner.set_page(Page::Schedules).await;
    println!("---- {} -----", planner.page());
    print_schedule_list(planner.schedules().entries());

    planner.set_page(Page::Tasks).await;
    println!("---- {} -----", planner.page());
    print_task_list(planner.tasks().tasks());
}

async fn scripted_session<S: Store>(planner: &mut Planner<S>) {
    planner.mount().await;

    let schedules = planner.schedules_mut();
    for (day, time, subject) in &[
        (Weekday::Wednesday, "10:00", "Physics"),
        (Weekday::Monday, "08:00", "Math"),
        (Weekday::Monday, "07:00", "Spanish"),
    ] {
        schedules.begin_create();
        let form = ScheduleForm { day: *day, time: time.to_string(), subject: subject.to_string(), ..ScheduleForm::default() };
        let _ = schedules.save(form).await;
        print_message(schedules.message());
    }

    planner.set_page(Page::Tasks).await;
    let tasks = planner.tasks_mut();
    for (title, date, priority) in &[
        ("Lab report", "2025-01-10", Priority::Low),
        ("Essay", "2025-01-10", Priority::High),
        ("Read chapter 3", "2025-01-08", Priority::Medium),
    ] {
        tasks.begin_create();
        let form = TaskForm { title: title.to_string(), due_date: date.to_string(), priority: *priority, ..TaskForm::default() };
        let _ = tasks.save(form).await;
        print_message(tasks.message());
    }

    if let Some(first) = tasks.tasks().first().cloned() {
        let _ = tasks.toggle_complete(&first).await;
        print_message(tasks.message());
    }
}
