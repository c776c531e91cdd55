//! Access to the remote store
//!
//! The [`StoreAdapter`] is what the repositories talk to. It wraps an optional [`Store`] handle: when the
//! store client could not be built (e.g. missing configuration), reads degrade to empty results and writes
//! fail with [`PlannerError::ClientUnavailable`] without any request being made.

pub mod memory;
pub mod rest;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{PlannerError, PlannerResult};
use crate::traits::{KeyMatch, OrderBy, Row, Store};

/// Uniform list/create/update/delete verbs over an optional store handle
pub struct StoreAdapter<S> {
    handle: Option<Arc<S>>,
}

// Derive would require `S: Clone`
impl<S> Clone for StoreAdapter<S> {
    fn clone(&self) -> Self {
        Self { handle: self.handle.clone() }
    }
}

impl<S: Store> StoreAdapter<S> {
    pub fn new(handle: Option<Arc<S>>) -> Self {
        if handle.is_none() {
            log::warn!("No store client available. Reads will be empty and writes will fail.");
        }
        Self { handle }
    }

    /// An adapter with no store behind it
    pub fn unavailable() -> Self {
        Self::new(None)
    }

    pub fn is_available(&self) -> bool {
        self.handle.is_some()
    }

    /// Fetch and decode every row of `table`
    pub async fn list<T: DeserializeOwned>(&self, table: &str, order: &[OrderBy]) -> PlannerResult<Vec<T>> {
        let store = match &self.handle {
            None => return Ok(Vec::new()),
            Some(store) => store,
        };

        log::debug!("Selecting every row of {}", table);
        let rows = store.select_all(table, order).await.map_err(PlannerError::store)?;
        rows.into_iter()
            .map(|row| serde_json::from_value(Value::Object(row)).map_err(|err| {
                PlannerError::store(format!("Unable to decode a row of {}: {}", table, err))
            }))
            .collect()
    }

    pub async fn create<T: Serialize>(&self, table: &str, record: &T) -> PlannerResult<()> {
        let store = self.handle.as_ref().ok_or(PlannerError::ClientUnavailable)?;
        let row = to_row(record)?;

        log::debug!("Inserting into {}", table);
        store.insert(table, row).await.map_err(PlannerError::store)
    }

    pub async fn update<T: Serialize>(&self, table: &str, key: &KeyMatch, patch: &T) -> PlannerResult<()> {
        let store = self.handle.as_ref().ok_or(PlannerError::ClientUnavailable)?;
        let patch = to_row(patch)?;

        log::debug!("Updating {} where {}", table, key);
        store.update(table, patch, key).await.map_err(PlannerError::store)
    }

    pub async fn delete(&self, table: &str, key: &KeyMatch) -> PlannerResult<()> {
        let store = self.handle.as_ref().ok_or(PlannerError::ClientUnavailable)?;

        log::debug!("Deleting from {} where {}", table, key);
        store.delete(table, key).await.map_err(PlannerError::store)
    }
}

/// Serialize a record into a row. Records must serialize as JSON objects.
fn to_row<T: Serialize>(record: &T) -> PlannerResult<Row> {
    match serde_json::to_value(record) {
        Ok(Value::Object(row)) => Ok(row),
        Ok(other) => Err(PlannerError::store(format!("Expected a record, got {}", other))),
        Err(err) => Err(PlannerError::store(format!("Unable to encode record: {}", err))),
    }
}
