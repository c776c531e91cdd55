//! This crate provides the data layer of an academic planner: a weekly class schedule, and a to-do list.
//!
//! Both are stored in a remote table store, that is abstracted by the [`Store`](traits::Store) trait. \
//! A [`RestStore`](store::rest::RestStore) talks to such a store over HTTP, and a [`MemoryStore`](store::memory::MemoryStore) mocks it in memory.
//!
//! On top of the store, the [`repository`] module knows the tables and the ordering rules of each entity type,
//! and the [`controller`] module keeps a displayable copy of each collection, along with the form and message state
//! a user interface needs. \
//! Controllers do not patch their collections: every successful change is followed by a full re-fetch.

pub mod traits;
pub mod error;
pub use error::{PlannerError, PlannerResult};

pub mod schedule;
pub use schedule::{ScheduleEntry, Weekday};
pub mod task;
pub use task::{Priority, Task};

pub mod store;
pub mod repository;
pub mod controller;
pub mod planner;
pub use planner::Planner;

pub mod config;
pub mod mock_behaviour;
pub mod utils;
