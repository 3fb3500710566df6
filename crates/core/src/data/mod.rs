//! Data layer
//!
//! The data source contract, its SQLite implementation and the repository
//! built on top of it. In-memory fakes are available under `cfg(test)` and the
//! `test-util` feature.

#[cfg(any(test, feature = "test-util"))]
mod fake;
mod local;
mod repository;
mod source;
mod write;

#[cfg(any(test, feature = "test-util"))]
pub use fake::{FakeTasksDataSource, FakeTasksRepository};
pub use local::LocalTasksDataSource;
pub use repository::{DefaultTasksRepository, TasksRepository};
pub use source::{TaskStream, TasksDataSource};
pub use write::WriteHandle;
