//! Durable task storage
//!
//! A single SQLite table plus an invalidation-driven observable query.

mod query;
mod sqlite;

pub use query::{Snapshot, TaskQuery};
pub use sqlite::{TaskStore, SCHEMA_VERSION};
