//! Errors returned by the planner

use thiserror::Error;

/// Everything that can go wrong between a user action and the remote store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlannerError {
    /// The store client was never initialized (missing configuration)
    #[error("The store client is not ready.")]
    ClientUnavailable,

    /// The store rejected or failed a request
    #[error("Store error: {message}")]
    Store { message: String },

    #[error("{0}")]
    FetchFailed(String),

    #[error("{0}")]
    CreateFailed(String),

    #[error("{0}")]
    UpdateFailed(String),

    #[error("{0}")]
    DeleteFailed(String),

    /// Some required field is missing or malformed. No request has been sent.
    #[error("{0}")]
    Invalid(String),

    /// The item cannot be edited in its current state (e.g. a completed task)
    #[error("{0}")]
    NotEditable(String),

    /// `save` was called while no form is open
    #[error("Nothing is being edited.")]
    NotEditing,
}

impl PlannerError {
    pub(crate) fn store<S: ToString>(message: S) -> Self {
        PlannerError::Store { message: message.to_string() }
    }

    /// The message the store gave, or the full display text for every other variant
    pub fn detail(&self) -> String {
        match self {
            PlannerError::Store { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display() {
        let err = PlannerError::store("permission denied for table horarios");
        assert_eq!(err.to_string(), "Store error: permission denied for table horarios");
        assert_eq!(err.detail(), "permission denied for table horarios");

        let err = PlannerError::CreateFailed("Could not create the task.".to_string());
        assert_eq!(err.to_string(), "Could not create the task.");
        assert_eq!(PlannerError::ClientUnavailable.detail(), "The store client is not ready.");
    }
}
