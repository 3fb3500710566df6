//! Core library for Tasks
//!
//! This crate contains the to-do list logic, including:
//! - The task entity
//! - SQLite storage with a live task query
//! - The data source and repository layers
//! - Headless presentation state
//!
//! The `test-util` feature exports in-memory fakes of the repository and data
//! source (`data::FakeTasksRepository`, `data::FakeTasksDataSource`) for
//! downstream tests.

pub mod data;
pub mod error;
pub mod presentation;
pub mod store;
pub mod task;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
