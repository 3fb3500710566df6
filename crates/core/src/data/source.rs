//! Data source trait
//!
//! Defines the async, result-wrapped contract over task storage.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::task::Task;
use crate::Result;

/// Continuous stream of task list snapshots
pub type TaskStream = BoxStream<'static, Result<Vec<Task>>>;

/// Source of task data for the repository
///
/// Writes carry no payload: their effect is observed through
/// [`TasksDataSource::observe_tasks`].
#[async_trait]
pub trait TasksDataSource: Send + Sync {
    /// Subscribe to the task list; the first item is the current state
    fn observe_tasks(&self) -> TaskStream;

    /// Get all tasks
    async fn get_tasks(&self) -> Result<Vec<Task>>;

    /// Get a task by ID, failing with `TaskNotFound` when absent
    async fn get_task(&self, task_id: &str) -> Result<Task>;

    /// Insert or fully replace a task
    async fn save_task(&self, task: Task) -> Result<()>;

    /// Mark a task completed
    async fn complete_task(&self, task_id: &str) -> Result<()>;

    /// Mark a task active again
    async fn activate_task(&self, task_id: &str) -> Result<()>;

    /// Remove every completed task
    async fn clear_completed_tasks(&self) -> Result<()>;
}
