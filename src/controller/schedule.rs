use crate::error::PlannerResult;
use crate::repository::ScheduleRepository;
use crate::schedule::{ScheduleEntry, ScheduleForm, ScheduleId};
use crate::traits::Store;

use super::feedback::FeedbackSender;
use super::{Editing, LoadState, Message, ViewState, CLIENT_NOT_INITIALIZED};

/// Owns the weekly schedule as displayed, and the actions the user can perform on it
pub struct ScheduleController<S> {
    repository: ScheduleRepository<S>,
    view: ViewState<ScheduleEntry, ScheduleId, ScheduleForm>,
}

impl<S: Store> ScheduleController<S> {
    pub fn new(repository: ScheduleRepository<S>) -> Self {
        Self { repository, view: ViewState::new(None) }
    }

    pub fn new_with_feedback_channel(repository: ScheduleRepository<S>, channel: FeedbackSender) -> Self {
        Self { repository, view: ViewState::new(Some(channel)) }
    }

    /// The cached entries, by day of the week then time
    pub fn entries(&self) -> &[ScheduleEntry]       { self.view.items() }
    pub fn load_state(&self) -> LoadState           { self.view.load_state() }
    pub fn is_loading(&self) -> bool                { self.view.load_state() == LoadState::Loading }
    pub fn editing(&self) -> &Editing<ScheduleId>   { self.view.editing() }
    /// The open form, if any
    pub fn form(&self) -> Option<&ScheduleForm>     { self.view.form() }
    pub fn form_mut(&mut self) -> Option<&mut ScheduleForm> { self.view.form_mut() }
    pub fn message(&self) -> Option<&Message>       { self.view.message() }

    /// Called when the schedule view is shown: fetch the entries, or report that there is no store client
    pub async fn mount(&mut self) {
        if self.repository.is_available() == false {
            self.view.set_message(Some(Message::error(CLIENT_NOT_INITIALIZED)));
            return;
        }
        self.refresh().await;
    }

    /// Replace the cached entries with a fresh copy from the store
    pub async fn refresh(&mut self) {
        if self.repository.is_available() == false {
            return;
        }
        self.view.start_loading();
        let entries = self.repository.list().await;
        self.view.finish_loading(entries);
    }

    /// Open an empty form, that starts on Monday at 08:00
    pub fn begin_create(&mut self) {
        self.view.open_form(Editing::New, ScheduleForm::default());
    }

    /// Open a form pre-filled with the values of `entry`
    pub fn begin_edit(&mut self, entry: &ScheduleEntry) {
        self.view.open_form(Editing::Existing(entry.id().clone()), ScheduleForm::from_entry(entry));
    }

    /// Close the form, and forget what was typed in it
    pub fn cancel_edit(&mut self) {
        self.view.close_form();
        self.view.set_message(None);
    }

    /// Submit the form.
    ///
    /// On success, the form is closed and the schedule is re-fetched.
    /// On failure, the form stays open with the submitted values, and an error message is set.
    pub async fn save(&mut self, form: ScheduleForm) -> PlannerResult<()> {
        self.view.ensure_available(self.repository.is_available())?;

        let target = match self.view.editing() {
            Editing::None => return Err(crate::error::PlannerError::NotEditing),
            Editing::New => None,
            Editing::Existing(id) => Some(id.clone()),
        };

        let fields = form.validate();
        self.view.keep_draft(form);
        let fields = match fields {
            Ok(fields) => fields,
            Err(err) => return self.view.fail(err),
        };

        let result = match &target {
            None => self.repository.create(fields).await.map(|_| "Schedule entry created."),
            Some(id) => self.repository.update(id, fields).await.map(|_| "Schedule entry updated."),
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

    /// Delete an entry
    pub async fn remove(&mut self, id: &ScheduleId) -> PlannerResult<()> {
        self.view.ensure_available(self.repository.is_available())?;

        match self.repository.delete(id).await {
            Ok(()) => {
                self.resync(Message::success("Schedule entry deleted.")).await;
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
