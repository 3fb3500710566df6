//! SQLite-backed data source
//!
//! Moves every store call onto the blocking pool of the injected runtime so
//! callers never run database I/O on their own task.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::runtime::Handle;

use super::source::{TaskStream, TasksDataSource};
use crate::store::TaskStore;
use crate::task::Task;
use crate::{Error, Result};

/// Data source over the local task database
#[derive(Clone)]
pub struct LocalTasksDataSource {
    store: Arc<TaskStore>,
    io: Handle,
}

impl LocalTasksDataSource {
    /// Create a data source running store I/O on `io`
    pub fn new(store: Arc<TaskStore>, io: Handle) -> Self {
        Self { store, io }
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&TaskStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        self.io.spawn_blocking(move || op(&store)).await?
    }
}

#[async_trait]
impl TasksDataSource for LocalTasksDataSource {
    fn observe_tasks(&self) -> TaskStream {
        self.store.observe_tasks().boxed()
    }

    async fn get_tasks(&self) -> Result<Vec<Task>> {
        self.run(|store| store.get_tasks()).await
    }

    async fn get_task(&self, task_id: &str) -> Result<Task> {
        let id = task_id.to_string();
        self.run(move |store| store.get_task_by_id(&id)?.ok_or(Error::TaskNotFound(id)))
            .await
    }

    async fn save_task(&self, task: Task) -> Result<()> {
        self.run(move |store| store.insert_task(&task)).await
    }

    async fn complete_task(&self, task_id: &str) -> Result<()> {
        let id = task_id.to_string();
        self.run(move |store| store.update_completed(&id, true)).await
    }

    async fn activate_task(&self, task_id: &str) -> Result<()> {
        let id = task_id.to_string();
        self.run(move |store| store.update_completed(&id, false)).await
    }

    async fn clear_completed_tasks(&self) -> Result<()> {
        self.run(|store| store.delete_completed_tasks().map(|_| ()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;
    use tempfile::TempDir;

    fn create_data_source() -> LocalTasksDataSource {
        let store = Arc::new(TaskStore::open_in_memory().unwrap());
        LocalTasksDataSource::new(store, Handle::current())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_save_task_retrieves_task() {
        let source = create_data_source();
        let task = Task::new("title").with_completed(true);
        source.save_task(task.clone()).await.unwrap();

        let loaded = source.get_task(&task.id).await.unwrap();
        assert_eq!(loaded.title, "title");
        assert!(loaded.completed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_complete_task_retrieved_task_is_complete() {
        let source = create_data_source();
        let task = Task::new("X").with_id("A");
        source.save_task(task).await.unwrap();

        source.complete_task("A").await.unwrap();

        let loaded = source.get_task("A").await.unwrap();
        assert_eq!(loaded, Task::new("X").with_id("A").with_completed(true));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_activate_task_retrieved_task_is_active() {
        let source = create_data_source();
        let task = Task::new("Some title").with_completed(true);
        source.save_task(task.clone()).await.unwrap();

        source.activate_task(&task.id).await.unwrap();

        let loaded = source.get_task(&task.id).await.unwrap();
        assert_eq!(loaded.title, "Some title");
        assert!(loaded.is_active());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_get_tasks_on_empty_store_is_success() {
        let source = create_data_source();
        let tasks = source.get_tasks().await.unwrap();
        assert!(tasks.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_get_missing_task_is_not_found() {
        let source = create_data_source();
        match source.get_task("missing-id").await {
            Err(Error::TaskNotFound(id)) => assert_eq!(id, "missing-id"),
            other => panic!("Expected TaskNotFound error, got: {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_clear_completed_tasks_leaves_active_task() {
        let source = create_data_source();
        source.save_task(Task::new("active").with_id("A")).await.unwrap();
        source
            .save_task(Task::new("done").with_id("B").with_completed(true))
            .await
            .unwrap();
        source
            .save_task(Task::new("done").with_id("C").with_completed(true))
            .await
            .unwrap();

        source.clear_completed_tasks().await.unwrap();

        assert!(source.get_task("B").await.unwrap_err().is_not_found());
        assert!(source.get_task("C").await.unwrap_err().is_not_found());
        assert_eq!(
            source.get_tasks().await.unwrap(),
            vec![Task::new("active").with_id("A")]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_get_tasks_retrieves_saved_tasks() {
        let source = create_data_source();
        source.save_task(Task::new("title")).await.unwrap();
        source.save_task(Task::new("title")).await.unwrap();

        assert_eq!(source.get_tasks().await.unwrap().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_observe_tasks_follows_writes() {
        let source = create_data_source();
        let mut stream = source.observe_tasks();
        assert!(stream.next().await.unwrap().unwrap().is_empty());

        source.save_task(Task::new("title").with_id("A")).await.unwrap();
        let snapshot = stream.next().await.unwrap().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot[0].is_active());

        source.complete_task("A").await.unwrap();
        let snapshot = stream.next().await.unwrap().unwrap();
        assert!(snapshot[0].completed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_missing_table_surfaces_database_errors() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tasks.db");
        let store = Arc::new(TaskStore::open(&path).unwrap());
        let source = LocalTasksDataSource::new(Arc::clone(&store), Handle::current());
        source.save_task(Task::new("title").with_id("A")).await.unwrap();

        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("DROP TABLE tasks").unwrap();

        match source.get_tasks().await {
            Err(Error::Database(_)) => {}
            other => panic!("Expected Database error, got: {:?}", other),
        }
        match source.get_task("A").await {
            Err(Error::Database(_)) => {}
            other => panic!("Expected Database error, got: {:?}", other),
        }
        assert!(matches!(
            source.save_task(Task::new("title")).await,
            Err(Error::Database(_))
        ));
    }
}
