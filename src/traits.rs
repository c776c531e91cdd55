use std::error::Error;
use std::fmt::{Display, Formatter};

use async_trait::async_trait;
use serde_json::Value;

/// A row, as it is exchanged with the store: a JSON object keyed by column name
pub type Row = serde_json::Map<String, Value>;

/// Errors that cross the [`Store`] boundary
pub type StoreResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// One key of an `ORDER BY` clause
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

impl OrderBy {
    pub fn asc<S: ToString>(column: S) -> Self {
        Self { column: column.to_string(), ascending: true }
    }
    pub fn desc<S: ToString>(column: S) -> Self {
        Self { column: column.to_string(), ascending: false }
    }
}

/// A `column = value` filter, used to target a single row by its primary key
#[derive(Clone, Debug, PartialEq)]
pub struct KeyMatch {
    pub column: String,
    pub value: Value,
}

impl KeyMatch {
    pub fn new<S: ToString, V: Into<Value>>(column: S, value: V) -> Self {
        Self { column: column.to_string(), value: value.into() }
    }

    /// Whether a row has this key
    pub fn matches(&self, row: &Row) -> bool {
        row.get(&self.column) == Some(&self.value)
    }
}

impl Display for KeyMatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            // Do not quote strings, this is how the REST API expects them
            Value::String(s) => write!(f, "{}={}", self.column, s),
            other => write!(f, "{}={}", self.column, other),
        }
    }
}

/// A remote table-oriented store (usually a hosted database reached over HTTP)
///
/// Implementors must be cheap to share: the planner keeps a single handle behind an `Arc`.
#[async_trait]
pub trait Store: Send + Sync {
    /// Returns every row of a table, ordered by the given keys (first key is the primary one)
    async fn select_all(&self, table: &str, order: &[OrderBy]) -> StoreResult<Vec<Row>>;

    /// Insert a single row
    async fn insert(&self, table: &str, row: Row) -> StoreResult<()>;

    /// Overwrite the columns present in `patch`, on the rows matching `key`
    async fn update(&self, table: &str, patch: Row, key: &KeyMatch) -> StoreResult<()>;

    /// Delete the rows matching `key`
    async fn delete(&self, table: &str, key: &KeyMatch) -> StoreResult<()>;
}
