//! Entity-specific access to the store
//!
//! Repositories know the tables, keys and ordering rules of each entity type.
//! Reads are best-effort: [`list`](schedule::ScheduleRepository::list) logs failures and returns an empty collection.
//! Writes always report their failures to the caller.

pub mod schedule;
pub mod task;

pub use schedule::ScheduleRepository;
pub use task::TaskRepository;

use crate::error::PlannerError;

/// Turn an adapter failure into the error of a given write operation.
/// A missing store client is reported as is.
fn write_error(err: PlannerError, wrap: fn(String) -> PlannerError, what: &str) -> PlannerError {
    match err {
        PlannerError::ClientUnavailable => PlannerError::ClientUnavailable,
        other => {
            log::error!("{} ({})", what, other);
            wrap(format!("{} ({})", what, other.detail()))
        },
    }
}

fn fetch_error(err: PlannerError, what: &str) -> PlannerError {
    PlannerError::FetchFailed(format!("{} ({})", what, err.detail()))
}
