//! An in-process [`Store`], that mocks a remote one
//!
//! This is what tests (and the demo binary, when no remote store is configured) run against.
//! Its behaviour can be tweaked with a [`MockBehaviour`] so that some requests fail.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use crate::mock_behaviour::MockBehaviour;
use crate::traits::{KeyMatch, OrderBy, Row, Store, StoreResult};

/// How many requests of each kind a [`MemoryStore`] has received (failed ones included)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestCounts {
    pub select: usize,
    pub insert: usize,
    pub update: usize,
    pub delete: usize,
}

impl RequestCounts {
    pub fn total(&self) -> usize {
        self.select + self.insert + self.update + self.delete
    }
}

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Row>,
    /// Column that the store fills with an auto-incremented integer on insert, if any
    serial_key: Option<String>,
    last_serial: i64,
}

/// A [`Store`] that keeps its tables in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Table>>,
    mock_behaviour: Mutex<MockBehaviour>,
    requests: Mutex<RequestCounts>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `column` of `table` a server-generated integer key (like a SQL `serial` column)
    pub fn with_serial_key(self, table: &str, column: &str) -> Self {
        if let Ok(mut tables) = self.tables.lock() {
            tables.entry(table.to_string()).or_default().serial_key = Some(column.to_string());
        }
        self
    }

    /// A store with the planner tables set up the way the remote database defines them
    pub fn for_planner() -> Self {
        Self::new().with_serial_key(crate::config::TASK_TABLE, crate::config::TASK_KEY)
    }

    pub fn set_mock_behaviour(&self, behaviour: MockBehaviour) {
        if let Ok(mut current) = self.mock_behaviour.lock() {
            *current = behaviour;
        }
    }

    pub fn request_counts(&self) -> RequestCounts {
        self.requests.lock().map(|counts| *counts).unwrap_or_default()
    }

    /// A copy of the rows of a table, in insertion order
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.tables.lock()
            .map(|tables| tables.get(table).map(|t| t.rows.clone()).unwrap_or_default())
            .unwrap_or_default()
    }

    fn lock_tables(&self) -> StoreResult<MutexGuard<'_, HashMap<String, Table>>> {
        self.tables.lock().map_err(|_| "The in-memory store is poisoned".into())
    }

    /// Count the request, then check whether the mock behaviour lets it through
    fn admit(&self, check: fn(&mut MockBehaviour) -> StoreResult<()>, count: fn(&mut RequestCounts)) -> StoreResult<()> {
        if let Ok(mut counts) = self.requests.lock() {
            count(&mut *counts);
        }
        let mut behaviour = self.mock_behaviour.lock().map_err(|_| "The in-memory store is poisoned")?;
        check(&mut *behaviour)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn select_all(&self, table: &str, order: &[OrderBy]) -> StoreResult<Vec<Row>> {
        self.admit(MockBehaviour::can_select, |c| c.select += 1)?;

        let mut rows = self.lock_tables()?
            .get(table)
            .map(|t| t.rows.clone())
            .unwrap_or_default();

        rows.sort_by(|a, b| {
            for key in order {
                let ord = compare_values(a.get(&key.column), b.get(&key.column));
                let ord = if key.ascending { ord } else { ord.reverse() };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
        Ok(rows)
    }

    async fn insert(&self, table: &str, mut row: Row) -> StoreResult<()> {
        self.admit(MockBehaviour::can_insert, |c| c.insert += 1)?;

        let mut tables = self.lock_tables()?;
        let table = tables.entry(table.to_string()).or_default();
        if let Some(key) = &table.serial_key {
            match row.get(key).and_then(Value::as_i64) {
                Some(given) => table.last_serial = table.last_serial.max(given),
                None => {
                    table.last_serial += 1;
                    row.insert(key.clone(), Value::from(table.last_serial));
                },
            }
        }
        table.rows.push(row);
        Ok(())
    }

    async fn update(&self, table: &str, patch: Row, key: &KeyMatch) -> StoreResult<()> {
        self.admit(MockBehaviour::can_update, |c| c.update += 1)?;

        let mut tables = self.lock_tables()?;
        if let Some(table) = tables.get_mut(table) {
            for row in table.rows.iter_mut().filter(|row| key.matches(row)) {
                for (column, value) in &patch {
                    row.insert(column.clone(), value.clone());
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, table: &str, key: &KeyMatch) -> StoreResult<()> {
        self.admit(MockBehaviour::can_delete, |c| c.delete += 1)?;

        let mut tables = self.lock_tables()?;
        if let Some(table) = tables.get_mut(table) {
            table.rows.retain(|row| key.matches(row) == false);
        }
        Ok(())
    }
}

/// Total order over JSON values: missing/null, then booleans, numbers, strings, and the rest
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(Value::Array(_)) => 4,
            Some(Value::Object(_)) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            x.as_f64().partial_cmp(&y.as_f64()).unwrap_or(Ordering::Equal)
        },
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[tokio::test]
    async fn test_ordering() {
        let store = MemoryStore::new();
        store.insert("t", row(json!({ "done": true,  "date": "2025-01-01", "p": 1 }))).await.unwrap();
        store.insert("t", row(json!({ "done": false, "date": "2025-01-10", "p": 1 }))).await.unwrap();
        store.insert("t", row(json!({ "done": false, "date": "2025-01-10", "p": 3 }))).await.unwrap();
        store.insert("t", row(json!({ "done": false, "date": "2025-01-02", "p": 2 }))).await.unwrap();

        let rows = store.select_all("t", &[OrderBy::asc("done"), OrderBy::asc("date"), OrderBy::desc("p")]).await.unwrap();
        let summary: Vec<(bool, &str, i64)> = rows.iter()
            .map(|r| (r["done"].as_bool().unwrap(), r["date"].as_str().unwrap(), r["p"].as_i64().unwrap()))
            .collect();
        assert_eq!(summary, vec![
            (false, "2025-01-02", 2),
            (false, "2025-01-10", 3),
            (false, "2025-01-10", 1),
            (true,  "2025-01-01", 1),
        ]);
    }

    #[tokio::test]
    async fn test_serial_key() {
        let store = MemoryStore::new().with_serial_key("t", "id");
        store.insert("t", row(json!({ "name": "a" }))).await.unwrap();
        store.insert("t", row(json!({ "id": 10, "name": "b" }))).await.unwrap();
        store.insert("t", row(json!({ "id": null, "name": "c" }))).await.unwrap();

        let ids: Vec<i64> = store.rows("t").iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![1, 10, 11]);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = MemoryStore::new();
        store.insert("t", row(json!({ "id": "a", "v": 1 }))).await.unwrap();
        store.insert("t", row(json!({ "id": "b", "v": 2 }))).await.unwrap();

        store.update("t", row(json!({ "v": 5 })), &KeyMatch::new("id", "b")).await.unwrap();
        // Updating a missing row is not an error
        store.update("t", row(json!({ "v": 5 })), &KeyMatch::new("id", "zz")).await.unwrap();
        store.delete("t", &KeyMatch::new("id", "a")).await.unwrap();

        assert_eq!(store.rows("t"), vec![row(json!({ "id": "b", "v": 5 }))]);
        assert_eq!(store.request_counts(), RequestCounts { select: 0, insert: 2, update: 2, delete: 1 });
    }

    #[tokio::test]
    async fn test_mock_failures_are_counted() {
        let store = MemoryStore::new();
        store.set_mock_behaviour(MockBehaviour::fail_now(1));

        assert!(store.select_all("t", &[]).await.is_err());
        assert!(store.select_all("t", &[]).await.is_ok());
        assert_eq!(store.request_counts().select, 2);
        assert_eq!(store.request_counts().total(), 2);
    }
}
