use serde::Serialize;

use crate::config::{TASK_KEY, TASK_TABLE};
use crate::error::{PlannerError, PlannerResult};
use crate::store::StoreAdapter;
use crate::task::{Task, TaskFields, TaskId, TaskPatch};
use crate::traits::{KeyMatch, OrderBy, Store};

use super::{fetch_error, write_error};

/// The row inserted for a new task. Its identifier is left to the store
#[derive(Serialize)]
struct NewTask<'a> {
    #[serde(flatten)]
    fields: &'a TaskFields,
    #[serde(rename = "completada")]
    completed: bool,
}

/// Read and write tasks. Tasks cannot be deleted.
pub struct TaskRepository<S> {
    store: StoreAdapter<S>,
}

impl<S: Store> TaskRepository<S> {
    pub fn new(store: StoreAdapter<S>) -> Self {
        Self { store }
    }

    pub fn is_available(&self) -> bool {
        self.store.is_available()
    }

    /// Returns every task: pending ones first, then by due date, then most urgent first.
    ///
    /// All three keys are plain columns, so the order is entirely left to the store.
    pub async fn try_list(&self) -> PlannerResult<Vec<Task>> {
        self.store
            .list(TASK_TABLE, &[OrderBy::asc("completada"), OrderBy::asc("fecha"), OrderBy::desc("prioridad")])
            .await
            .map_err(|err| fetch_error(err, "Could not fetch the tasks"))
    }

    /// Same as [`Self::try_list`], but a failure is only logged, and yields an empty list
    pub async fn list(&self) -> Vec<Task> {
        match self.try_list().await {
            Ok(tasks) => tasks,
            Err(err) => {
                log::error!("{}", err);
                Vec::new()
            },
        }
    }

    /// Insert a new task. New tasks are never completed, whatever they have been built from.
    pub async fn create<F: Into<TaskFields>>(&self, fields: F) -> PlannerResult<()> {
        let fields = fields.into();
        let row = NewTask { fields: &fields, completed: false };

        self.store.create(TASK_TABLE, &row).await
            .map_err(|err| write_error(err, PlannerError::CreateFailed, "Could not create the task"))?;
        log::info!("Created task {:?}", fields.title());
        Ok(())
    }

    /// Update the fields present in `patch`. This is used both for edits and to toggle the completion status
    pub async fn update<P: Into<TaskPatch>>(&self, id: TaskId, patch: P) -> PlannerResult<()> {
        let patch = patch.into();
        self.store.update(TASK_TABLE, &KeyMatch::new(TASK_KEY, id.as_i64()), &patch).await
            .map_err(|err| write_error(err, PlannerError::UpdateFailed, "Could not update the task"))?;
        log::info!("Updated task {}", id);
        Ok(())
    }
}
