//! Support for configuration options
//!
//! The remote store is configured from the environment. Missing configuration is not an error: the
//! planner then runs without a store client, and reports it to the user.

use once_cell::sync::Lazy;

/// Environment variable holding the base URL of the remote store (e.g. `https://xyz.example.co`)
pub const STORE_URL_VAR: &str = "PLANNER_STORE_URL";
/// Environment variable holding the API key sent to the remote store
pub const STORE_KEY_VAR: &str = "PLANNER_STORE_KEY";

/// Table holding [`ScheduleEntry`](crate::schedule::ScheduleEntry) rows
pub const SCHEDULE_TABLE: &str = "horarios";
/// Primary key of [`SCHEDULE_TABLE`]
pub const SCHEDULE_KEY: &str = "id_usuario";
/// Table holding [`Task`](crate::task::Task) rows
pub const TASK_TABLE: &str = "tareas";
/// Primary key of [`TASK_TABLE`]
pub const TASK_KEY: &str = "id";

/// Where and how to reach the remote store
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    pub url: String,
    pub api_key: String,
}

impl StoreConfig {
    /// Build a config from explicit values. Returns `None` if any of them is blank
    pub fn new<S: ToString, T: ToString>(url: S, api_key: T) -> Option<Self> {
        let url = url.to_string().trim().to_string();
        let api_key = api_key.to_string().trim().to_string();
        if url.is_empty() || api_key.is_empty() {
            return None;
        }
        Some(Self { url, api_key })
    }

    /// Read the config from [`STORE_URL_VAR`] and [`STORE_KEY_VAR`]
    pub fn from_env() -> Option<Self> {
        let url = std::env::var(STORE_URL_VAR).ok();
        let api_key = std::env::var(STORE_KEY_VAR).ok();
        match (url, api_key) {
            (Some(url), Some(api_key)) => Self::new(url, api_key),
            _ => {
                log::info!("{} or {} is not set", STORE_URL_VAR, STORE_KEY_VAR);
                None
            },
        }
    }
}

/// The process-wide store configuration. It is read from the environment the first time it is accessed.
pub static ENV_CONFIG: Lazy<Option<StoreConfig>> = Lazy::new(StoreConfig::from_env);
