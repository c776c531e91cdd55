//! A [`Store`] reached over HTTP, through a PostgREST-style API (`/rest/v1/<table>`)

use std::error::Error;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use url::Url;

use crate::config::StoreConfig;
use crate::traits::{KeyMatch, OrderBy, Row, Store, StoreResult};

/// A remote store
pub struct RestStore {
    base_url: Url,
    api_key: String,
    http: reqwest::Client,
}

impl RestStore {
    /// Create a store client. This does not start a connection
    pub fn new<S: AsRef<str>, T: ToString>(base_url: S, api_key: T) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let mut base_url = Url::parse(base_url.as_ref())?;
        if base_url.cannot_be_a_base() {
            return Err(format!("{} cannot be used as a base URL", base_url).into());
        }
        if base_url.path().ends_with('/') == false {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            api_key: api_key.to_string(),
            http: reqwest::Client::new(),
        })
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Self::new(&config.url, &config.api_key)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn table_url(&self, table: &str) -> StoreResult<Url> {
        Ok(self.base_url.join("rest/v1/")?.join(table)?)
    }

    /// `GET <table>?select=*&order=a.asc,b.desc`
    fn select_url(&self, table: &str, order: &[OrderBy]) -> StoreResult<Url> {
        let mut url = self.table_url(table)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("select", "*");
            if order.is_empty() == false {
                query.append_pair("order", &order_param(order));
            }
        }
        Ok(url)
    }

    /// `<table>?<column>=eq.<value>`
    fn keyed_url(&self, table: &str, key: &KeyMatch) -> StoreResult<Url> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut().append_pair(&key.column, &format!("eq.{}", filter_value(&key.value)));
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

#[async_trait]
impl Store for RestStore {
    async fn select_all(&self, table: &str, order: &[OrderBy]) -> StoreResult<Vec<Row>> {
        let url = self.select_url(table, order)?;
        let response = self.request(Method::GET, url).send().await?;
        let rows = check_status(response).await?.json::<Vec<Row>>().await?;
        log::debug!("Got {} rows from {}", rows.len(), table);
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Row) -> StoreResult<()> {
        let url = self.table_url(table)?;
        let response = self.request(Method::POST, url)
            .header("Prefer", "return=minimal")
            .json(&vec![Value::Object(row)])
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn update(&self, table: &str, patch: Row, key: &KeyMatch) -> StoreResult<()> {
        let url = self.keyed_url(table, key)?;
        let response = self.request(Method::PATCH, url)
            .header("Prefer", "return=minimal")
            .json(&patch)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn delete(&self, table: &str, key: &KeyMatch) -> StoreResult<()> {
        let url = self.keyed_url(table, key)?;
        let response = self.request(Method::DELETE, url).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

fn order_param(order: &[OrderBy]) -> String {
    order.iter()
        .map(|key| format!("{}.{}", key.column, if key.ascending { "asc" } else { "desc" }))
        .collect::<Vec<_>>()
        .join(",")
}

fn filter_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

async fn check_status(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(error_message(status, &body).into())
}

/// The API reports errors as `{"message": "...", ...}`. Fall back to the status code otherwise.
fn error_message(status: StatusCode, body: &str) -> String {
    let message = serde_json::from_str::<Value>(body).ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from));

    match message {
        Some(message) => format!("{} (HTTP {})", message, status.as_u16()),
        None => format!("Unexpected HTTP status code {:?}", status),
    }
}
