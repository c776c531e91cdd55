//! The planner as a whole: one controller per page, and which page is shown

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use crate::controller::{ScheduleController, TaskController, CLIENT_NOT_INITIALIZED};
use crate::repository::{ScheduleRepository, TaskRepository};
use crate::store::StoreAdapter;
use crate::traits::Store;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Schedules,
    Tasks,
}

impl Default for Page {
    fn default() -> Self {
        Page::Schedules
    }
}

impl Display for Page {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Page::Schedules => write!(f, "Schedules"),
            Page::Tasks => write!(f, "Tasks"),
        }
    }
}

/// Both controllers, sharing the same store handle.
///
/// The two collections are fully independent: an action on one page never touches the other one.
pub struct Planner<S> {
    page: Page,
    available: bool,
    schedules: ScheduleController<S>,
    tasks: TaskController<S>,
}

impl<S: Store> Planner<S> {
    /// `store` is `None` when the store client could not be built. The planner still works, and says so
    pub fn new(store: Option<Arc<S>>) -> Self {
        let adapter = StoreAdapter::new(store);
        Self {
            page: Page::default(),
            available: adapter.is_available(),
            schedules: ScheduleController::new(ScheduleRepository::new(adapter.clone())),
            tasks: TaskController::new(TaskRepository::new(adapter)),
        }
    }

    pub fn page(&self) -> Page { self.page }

    pub fn schedules(&self) -> &ScheduleController<S>         { &self.schedules }
    pub fn schedules_mut(&mut self) -> &mut ScheduleController<S> { &mut self.schedules }
    pub fn tasks(&self) -> &TaskController<S>                 { &self.tasks }
    pub fn tasks_mut(&mut self) -> &mut TaskController<S>     { &mut self.tasks }

    /// A page-independent error to display instead of any page, if the store client is missing
    pub fn status_message(&self) -> Option<&'static str> {
        if self.available { None } else { Some(CLIENT_NOT_INITIALIZED) }
    }

    /// Show the current page for the first time
    pub async fn mount(&mut self) {
        log::info!("Showing page {}", self.page);
        match self.page {
            Page::Schedules => self.schedules.mount().await,
            Page::Tasks => self.tasks.mount().await,
        }
    }

    /// Switch to another page. The page that is shown is mounted again, which re-fetches its collection
    pub async fn set_page(&mut self, page: Page) {
        self.page = page;
        self.mount().await;
    }
}
