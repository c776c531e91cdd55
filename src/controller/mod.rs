//! View state controllers
//!
//! A controller owns the cached collection of one entity type, plus the state a presentation layer needs to
//! render it: whether a fetch is in progress, which form is open, and the last message to show. \
//! The cached collection is never patched: every successful mutation is followed by exactly one full re-fetch.

pub mod feedback;
pub mod schedule;
pub mod task;

pub use schedule::ScheduleController;
pub use task::TaskController;

use feedback::{FeedbackSender, ViewEvent};

use crate::error::{PlannerError, PlannerResult};

/// Shown when a controller is mounted without a store client
pub const CLIENT_NOT_INITIALIZED: &str = "Error: the store client could not be initialized.";

/// Fetch state of a controller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing has been fetched yet
    Idle,
    Loading,
    Ready,
}

/// Which form (if any) is open
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Editing<I> {
    None,
    New,
    Existing(I),
}

impl<I> Editing<I> {
    pub fn is_open(&self) -> bool {
        !matches!(self, Editing::None)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// A message for the user. It stays until the next action replaces or clears it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub severity: Severity,
}

impl Message {
    pub fn success<S: ToString>(text: S) -> Self {
        Self { text: text.to_string(), severity: Severity::Success }
    }
    pub fn error<S: ToString>(text: S) -> Self {
        Self { text: text.to_string(), severity: Severity::Error }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}


/// The state shared by every controller: a cached collection of `T` (identified by `I`), and a form `F`
pub(crate) struct ViewState<T, I, F> {
    items: Vec<T>,
    load_state: LoadState,
    editing: Editing<I>,
    form: Option<F>,
    message: Option<Message>,
    feedback_channel: Option<FeedbackSender>,
}

impl<T, I: Clone, F> ViewState<T, I, F> {
    pub fn new(feedback_channel: Option<FeedbackSender>) -> Self {
        Self {
            items: Vec::new(),
            load_state: LoadState::Idle,
            editing: Editing::None,
            form: None,
            message: None,
            feedback_channel,
        }
    }

    pub fn items(&self) -> &[T]                { &self.items }
    pub fn load_state(&self) -> LoadState      { self.load_state }
    pub fn editing(&self) -> &Editing<I>       { &self.editing }
    pub fn form(&self) -> Option<&F>           { self.form.as_ref() }
    pub fn form_mut(&mut self) -> Option<&mut F> { self.form.as_mut() }
    pub fn message(&self) -> Option<&Message>  { self.message.as_ref() }

    pub fn start_loading(&mut self) {
        self.load_state = LoadState::Loading;
        self.feedback(ViewEvent::Loading);
    }

    /// Replace the whole cached collection
    pub fn finish_loading(&mut self, items: Vec<T>) {
        self.items = items;
        self.load_state = LoadState::Ready;
        self.feedback(ViewEvent::Ready{ items: self.items.len() });
    }

    pub fn open_form(&mut self, editing: Editing<I>, form: F) {
        self.editing = editing;
        self.form = Some(form);
        self.set_message(None);
    }

    pub fn close_form(&mut self) {
        self.editing = Editing::None;
        self.form = None;
    }

    /// Keep what the user submitted, so that it is still there if saving fails
    pub fn keep_draft(&mut self, form: F) {
        self.form = Some(form);
    }

    pub fn set_message(&mut self, message: Option<Message>) {
        match &message {
            Some(m) if m.is_error() => log::warn!("{}", m.text),
            Some(m) => log::info!("{}", m.text),
            None => {},
        }
        self.message = message.clone();
        self.feedback(ViewEvent::Message(message));
    }

    /// Report an error to the user, and hand it back to the caller
    pub fn fail<R>(&mut self, err: PlannerError) -> PlannerResult<R> {
        self.set_message(Some(Message::error(&err)));
        Err(err)
    }

    /// Actions are refused (with a message) when there is no store client
    pub fn ensure_available(&mut self, available: bool) -> PlannerResult<()> {
        if available {
            Ok(())
        } else {
            self.fail(PlannerError::ClientUnavailable)
        }
    }

    /// Send an event as a feedback to the listener (if any).
    fn feedback(&self, event: ViewEvent) {
        if let Some(sender) = &self.feedback_channel {
            // Nobody listening is fine
            let _ = sender.send(event);
        }
    }
}
