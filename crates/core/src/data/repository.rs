//! Task repository
//!
//! The interface presentation logic depends on. Reads are awaited; writes are
//! submitted and return immediately, with their effect arriving through
//! [`TasksRepository::observe_tasks`].

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::runtime::Handle;
use tracing::error;

use super::source::{TaskStream, TasksDataSource};
use super::write::WriteHandle;
use crate::task::Task;
use crate::Result;

/// Repository interface for task operations
#[async_trait]
pub trait TasksRepository: Send + Sync {
    /// Subscribe to the task list; the first item is the current state
    fn observe_tasks(&self) -> TaskStream;

    /// Get all tasks
    async fn get_tasks(&self) -> Result<Vec<Task>>;

    /// Get a task by ID
    async fn get_task(&self, task_id: &str) -> Result<Task>;

    /// Submit an insert-or-replace of `task`
    fn save_task(&self, task: Task) -> WriteHandle;

    /// Submit marking a task completed
    fn complete_task(&self, task_id: &str) -> WriteHandle;

    /// Submit marking a task active
    fn activate_task(&self, task_id: &str) -> WriteHandle;

    /// Submit removal of every completed task
    fn clear_completed_tasks(&self) -> WriteHandle;
}

/// Repository forwarding to a single data source
#[derive(Clone)]
pub struct DefaultTasksRepository {
    data_source: Arc<dyn TasksDataSource>,
    runtime: Handle,
}

impl DefaultTasksRepository {
    /// Create a repository that spawns writes on `runtime`
    pub fn new(data_source: Arc<dyn TasksDataSource>, runtime: Handle) -> Self {
        Self {
            data_source,
            runtime,
        }
    }

    fn submit<F>(&self, operation: &'static str, write: F) -> WriteHandle
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        WriteHandle::spawn(&self.runtime, async move {
            let result = write.await;
            if let Err(e) = &result {
                error!("Task write {} failed: {}", operation, e);
            }
            result
        })
    }
}

#[async_trait]
impl TasksRepository for DefaultTasksRepository {
    fn observe_tasks(&self) -> TaskStream {
        self.data_source.observe_tasks()
    }

    async fn get_tasks(&self) -> Result<Vec<Task>> {
        self.data_source.get_tasks().await
    }

    async fn get_task(&self, task_id: &str) -> Result<Task> {
        self.data_source.get_task(task_id).await
    }

    fn save_task(&self, task: Task) -> WriteHandle {
        let source = Arc::clone(&self.data_source);
        self.submit("save_task", async move { source.save_task(task).await })
    }

    fn complete_task(&self, task_id: &str) -> WriteHandle {
        let source = Arc::clone(&self.data_source);
        let id = task_id.to_string();
        self.submit("complete_task", async move { source.complete_task(&id).await })
    }

    fn activate_task(&self, task_id: &str) -> WriteHandle {
        let source = Arc::clone(&self.data_source);
        let id = task_id.to_string();
        self.submit("activate_task", async move { source.activate_task(&id).await })
    }

    fn clear_completed_tasks(&self) -> WriteHandle {
        let source = Arc::clone(&self.data_source);
        self.submit("clear_completed_tasks", async move {
            source.clear_completed_tasks().await
        })
    }
}
