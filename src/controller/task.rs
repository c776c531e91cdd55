use crate::error::{PlannerError, PlannerResult};
use crate::repository::TaskRepository;
use crate::task::{Task, TaskForm, TaskId, TaskPatch};
use crate::traits::Store;

use super::feedback::FeedbackSender;
use super::{Editing, LoadState, Message, ViewState, CLIENT_NOT_INITIALIZED};

/// Owns the task list as displayed, and the actions the user can perform on it
pub struct TaskController<S> {
    repository: TaskRepository<S>,
    view: ViewState<Task, TaskId, TaskForm>,
}

impl<S: Store> TaskController<S> {
    pub fn new(repository: TaskRepository<S>) -> Self {
        Self { repository, view: ViewState::new(None) }
    }

    pub fn new_with_feedback_channel(repository: TaskRepository<S>, channel: FeedbackSender) -> Self {
        Self { repository, view: ViewState::new(Some(channel)) }
    }

    /// The cached tasks: pending first, then by due date, most urgent first
    pub fn tasks(&self) -> &[Task]                  { self.view.items() }
    pub fn load_state(&self) -> LoadState           { self.view.load_state() }
    pub fn is_loading(&self) -> bool                { self.view.load_state() == LoadState::Loading }
    pub fn editing(&self) -> &Editing<TaskId>       { self.view.editing() }
    pub fn form(&self) -> Option<&TaskForm>         { self.view.form() }
    pub fn form_mut(&mut self) -> Option<&mut TaskForm> { self.view.form_mut() }
    pub fn message(&self) -> Option<&Message>       { self.view.message() }

    /// Called when the task view is shown: fetch the tasks, or report that there is no store client
    pub async fn mount(&mut self) {
        if self.repository.is_available() == false {
            self.view.set_message(Some(Message::error(CLIENT_NOT_INITIALIZED)));
            return;
        }
        self.refresh().await;
    }

    /// Replace the cached tasks with a fresh copy from the store
    pub async fn refresh(&mut self) {
        if self.repository.is_available() == false {
            return;
        }
        self.view.start_loading();
        let tasks = self.repository.list().await;
        self.view.finish_loading(tasks);
    }

    /// Open an empty form, due today with a medium priority
    pub fn begin_create(&mut self) {
        self.view.open_form(Editing::New, TaskForm::default());
    }

    /// Open a form pre-filled with the values of `task`. Completed tasks cannot be edited
    pub fn begin_edit(&mut self, task: &Task) -> PlannerResult<()> {
        if task.is_editable() == false {
            return Err(PlannerError::NotEditable("Completed tasks cannot be edited.".to_string()));
        }
        self.view.open_form(Editing::Existing(task.id()), TaskForm::from_task(task));
        Ok(())
    }

    /// Close the form, and forget what was typed in it
    pub fn cancel_edit(&mut self) {
        self.view.close_form();
        self.view.set_message(None);
    }

    /// Submit the form.
    ///
    /// On success, the form is closed and the tasks are re-fetched.
    /// On failure, the form stays open with the submitted values, and an error message is set.
    pub async fn save(&mut self, form: TaskForm) -> PlannerResult<()> {
        self.view.ensure_available(self.repository.is_available())?;

        let target = match self.view.editing() {
            Editing::None => return Err(PlannerError::NotEditing),
            Editing::New => None,
            Editing::Existing(id) => Some(*id),
        };

        let fields = form.validate();
        self.view.keep_draft(form);
        let fields = match fields {
            Ok(fields) => fields,
            Err(err) => return self.view.fail(err),
        };

        let result = match target {
            None => self.repository.create(fields).await.map(|_| "Task created."),
            Some(id) => self.repository.update(id, fields).await.map(|_| "Task updated."),
        };

        match result {
            Ok(text) => {
                self.view.close_form();
                self.resync(Message::success(text)).await;
                Ok(())
            },
            Err(err) => self.view.fail(err),
        }
    }

    /// Flip the completion status of a task
    pub async fn toggle_complete(&mut self, task: &Task) -> PlannerResult<()> {
        self.view.ensure_available(self.repository.is_available())?;

        let completed = task.completed() == false;
        match self.repository.update(task.id(), TaskPatch::completion(completed)).await {
            Ok(()) => {
                let text = if completed { "Task marked as completed." } else { "Task marked as pending." };
                self.resync(Message::success(text)).await;
                Ok(())
            },
            Err(err) => self.view.fail(err),
        }
    }

    /// Run after every successful mutation
    async fn resync(&mut self, message: Message) {
        self.view.set_message(Some(message));
        self.refresh().await;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use std::sync::Arc;

    use crate::controller::feedback::{feedback_channel, ViewEvent};
    use crate::mock_behaviour::MockBehaviour;
    use crate::store::memory::MemoryStore;
    use crate::store::StoreAdapter;
    use crate::task::Priority;

    fn controller() -> (Arc<MemoryStore>, TaskController<MemoryStore>) {
        let store = Arc::new(MemoryStore::for_planner());
        let repo = TaskRepository::new(StoreAdapter::new(Some(store.clone())));
        (store, TaskController::new(repo))
    }

    fn form(title: &str, date: &str, priority: Priority) -> TaskForm {
        TaskForm { title: title.to_string(), description: String::new(), due_date: date.to_string(), priority }
    }

    async fn create(controller: &mut TaskController<MemoryStore>, title: &str, date: &str, priority: Priority) {
        controller.begin_create();
        controller.save(form(title, date, priority)).await.unwrap();
    }

    #[tokio::test]
    async fn test_create() {
        let (store, mut controller) = controller();
        controller.mount().await;

        controller.begin_create();
        let defaults = controller.form().unwrap().clone();
        assert_eq!(defaults.priority, Priority::Medium);
        assert_eq!(defaults, TaskForm::default());

        controller.save(form("Essay", "2025-01-10", Priority::High)).await.unwrap();
        assert_eq!(controller.editing(), &Editing::None);
        assert_eq!(controller.tasks().len(), 1);
        assert_eq!(controller.tasks()[0].completed(), false);
        assert_eq!(controller.message(), Some(&Message::success("Task created.")));
        assert_eq!(store.request_counts().select, 2);
    }

    #[tokio::test]
    async fn test_toggle_twice() {
        let (store, mut controller) = controller();
        controller.mount().await;
        create(&mut controller, "Essay", "2025-01-10", Priority::High).await;

        let original = controller.tasks()[0].clone();
        controller.toggle_complete(&original).await.unwrap();
        let toggled = controller.tasks()[0].clone();
        assert!(toggled.completed());
        assert_eq!(controller.message(), Some(&Message::success("Task marked as completed.")));

        controller.toggle_complete(&toggled).await.unwrap();
        assert_eq!(controller.tasks()[0], original);
        assert_eq!(controller.message(), Some(&Message::success("Task marked as pending.")));

        // mount, create, and one re-fetch per toggle
        assert_eq!(store.request_counts().select, 4);
    }

    #[tokio::test]
    async fn test_completed_tasks_cannot_be_edited() {
        let (_store, mut controller) = controller();
        controller.mount().await;
        create(&mut controller, "Essay", "2025-01-10", Priority::High).await;

        let task = controller.tasks()[0].clone();
        controller.toggle_complete(&task).await.unwrap();
        let completed = controller.tasks()[0].clone();

        assert!(matches!(controller.begin_edit(&completed), Err(PlannerError::NotEditable(_))));
        assert_eq!(controller.editing(), &Editing::None);
    }

    #[tokio::test]
    async fn test_edit() {
        let (_store, mut controller) = controller();
        controller.mount().await;
        create(&mut controller, "Essay", "2025-01-10", Priority::High).await;

        let task = controller.tasks()[0].clone();
        controller.begin_edit(&task).unwrap();
        assert_eq!(controller.editing(), &Editing::Existing(task.id()));
        assert_eq!(controller.form(), Some(&TaskForm::from_task(&task)));

        let mut edited = controller.form().unwrap().clone();
        edited.description = "Five pages".to_string();
        edited.priority = Priority::Low;
        controller.save(edited).await.unwrap();

        let task = controller.tasks()[0].clone();
        assert_eq!(task.description(), Some("Five pages"));
        assert_eq!(task.priority(), Priority::Low);
        assert_eq!(task.title(), "Essay");
        assert_eq!(controller.message(), Some(&Message::success("Task updated.")));
    }

    #[tokio::test]
    async fn test_failed_toggle() {
        let (store, mut controller) = controller();
        controller.mount().await;
        create(&mut controller, "Essay", "2025-01-10", Priority::High).await;
        let selects = store.request_counts().select;

        store.set_mock_behaviour(MockBehaviour::fail_writes(1));
        let task = controller.tasks()[0].clone();
        assert!(matches!(controller.toggle_complete(&task).await, Err(PlannerError::UpdateFailed(_))));
        assert!(controller.message().unwrap().is_error());
        assert_eq!(controller.tasks()[0].completed(), false);
        assert_eq!(store.request_counts().select, selects);
    }

    #[tokio::test]
    async fn test_invalid_form() {
        let (store, mut controller) = controller();
        controller.mount().await;
        controller.begin_create();

        let res = controller.save(form("Essay", "", Priority::High)).await;
        assert!(matches!(res, Err(PlannerError::Invalid(_))));
        assert_eq!(controller.editing(), &Editing::New);
        assert_eq!(store.request_counts().insert, 0);
    }

    #[tokio::test]
    async fn test_feedback() {
        let store = Arc::new(MemoryStore::for_planner());
        let repo = TaskRepository::new(StoreAdapter::new(Some(store.clone())));
        let (sender, receiver) = feedback_channel();
        let mut controller = TaskController::new_with_feedback_channel(repo, sender);
        assert_eq!(*receiver.borrow(), ViewEvent::NotStarted);

        controller.mount().await;
        assert_eq!(*receiver.borrow(), ViewEvent::Ready{ items: 0 });

        controller.begin_create();
        assert_eq!(*receiver.borrow(), ViewEvent::Message(None));
    }

    #[tokio::test]
    async fn test_without_client() {
        let repo = TaskRepository::<MemoryStore>::new(StoreAdapter::unavailable());
        let mut controller = TaskController::new(repo);

        controller.mount().await;
        assert_eq!(controller.load_state(), LoadState::Idle);
        assert!(controller.message().unwrap().is_error());

        controller.begin_create();
        assert_eq!(controller.save(form("Essay", "2025-01-10", Priority::High)).await, Err(PlannerError::ClientUnavailable));
    }
}
