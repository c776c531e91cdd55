//! Utilities to let a presentation layer follow the state of a controller

use std::fmt::{Display, Error, Formatter};

use super::Message;

/// Something that happened to a controller
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewEvent {
    /// The controller has not been mounted yet
    NotStarted,
    /// A fetch is in progress
    Loading,
    /// The collection has been replaced with a fresh copy
    Ready { items: usize },
    /// A message should be shown (or cleared, for `None`)
    Message(Option<Message>),
}

impl Display for ViewEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            ViewEvent::NotStarted => write!(f, "Not started"),
            ViewEvent::Loading => write!(f, "Loading..."),
            ViewEvent::Ready{ items } => write!(f, "{} items loaded", items),
            ViewEvent::Message(Some(message)) => write!(f, "{}", message.text),
            ViewEvent::Message(None) => write!(f, "(message cleared)"),
        }
    }
}

impl Default for ViewEvent {
    fn default() -> Self {
        Self::NotStarted
    }
}


/// See [`feedback_channel`]
pub type FeedbackSender = tokio::sync::watch::Sender<ViewEvent>;
/// See [`feedback_channel`]
pub type FeedbackReceiver = tokio::sync::watch::Receiver<ViewEvent>;

/// Create a feeback channel, that can be used to retrieve the latest event of a controller
pub fn feedback_channel() -> (FeedbackSender, FeedbackReceiver) {
    tokio::sync::watch::channel(ViewEvent::default())
}
