//! In-memory test doubles
//!
//! Available to this crate's tests and, with the `test-util` feature, to
//! dependent crates.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use super::repository::TasksRepository;
use super::source::{TaskStream, TasksDataSource};
use super::write::WriteHandle;
use crate::task::Task;
use crate::{Error, Result};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn upsert(tasks: &mut Vec<Task>, task: Task) {
    match tasks.iter_mut().find(|existing| existing.same_identity(&task)) {
        Some(slot) => *slot = task,
        None => tasks.push(task),
    }
}

fn set_completed(tasks: &mut [Task], task_id: &str, completed: bool) {
    if let Some(task) = tasks.iter_mut().find(|t| t.id == task_id) {
        *task = task.clone().with_completed(completed);
    }
}

/// Repository keeping tasks in insertion order, with switchable failures
///
/// Writes apply before the returned handle is created, so the handle is
/// always finished.
pub struct FakeTasksRepository {
    tasks: Mutex<Vec<Task>>,
    should_return_error: AtomicBool,
    observable: watch::Sender<Result<Vec<Task>>>,
}

impl Default for FakeTasksRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeTasksRepository {
    pub fn new() -> Self {
        let (observable, _) = watch::channel(Ok(Vec::new()));
        Self {
            tasks: Mutex::new(Vec::new()),
            should_return_error: AtomicBool::new(false),
            observable,
        }
    }

    /// Make every read fail with a storage error
    pub fn set_return_error(&self, value: bool) {
        self.should_return_error.store(value, Ordering::SeqCst);
        self.refresh_tasks();
    }

    /// Store fixtures and notify observers
    pub fn add_tasks(&self, tasks: impl IntoIterator<Item = Task>) {
        {
            let mut stored = lock(&self.tasks);
            for task in tasks {
                upsert(&mut stored, task);
            }
        }
        self.refresh_tasks();
    }

    /// Current contents, ignoring error injection
    pub fn tasks(&self) -> Vec<Task> {
        lock(&self.tasks).clone()
    }

    /// A stored task, ignoring error injection
    pub fn task(&self, task_id: &str) -> Option<Task> {
        lock(&self.tasks).iter().find(|t| t.id == task_id).cloned()
    }

    fn current(&self) -> Result<Vec<Task>> {
        if self.should_return_error.load(Ordering::SeqCst) {
            return Err(Error::Storage("Test exception".to_string()));
        }
        Ok(self.tasks())
    }

    fn refresh_tasks(&self) {
        self.observable.send_replace(self.current());
    }

    fn mutate(&self, f: impl FnOnce(&mut Vec<Task>)) -> WriteHandle {
        {
            let mut tasks = lock(&self.tasks);
            f(&mut *tasks);
        }
        self.refresh_tasks();
        WriteHandle::ready(Ok(()))
    }
}

#[async_trait]
impl TasksRepository for FakeTasksRepository {
    fn observe_tasks(&self) -> TaskStream {
        self.refresh_tasks();
        WatchStream::new(self.observable.subscribe()).boxed()
    }

    async fn get_tasks(&self) -> Result<Vec<Task>> {
        self.current()
    }

    async fn get_task(&self, task_id: &str) -> Result<Task> {
        self.current()?
            .into_iter()
            .find(|t| t.id == task_id)
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))
    }

    fn save_task(&self, task: Task) -> WriteHandle {
        self.mutate(|tasks| upsert(tasks, task))
    }

    fn complete_task(&self, task_id: &str) -> WriteHandle {
        self.mutate(|tasks| set_completed(tasks, task_id, true))
    }

    fn activate_task(&self, task_id: &str) -> WriteHandle {
        self.mutate(|tasks| set_completed(tasks, task_id, false))
    }

    fn clear_completed_tasks(&self) -> WriteHandle {
        self.mutate(|tasks| tasks.retain(Task::is_active))
    }
}

/// List-backed data source; `None` contents make it unavailable
pub struct FakeTasksDataSource {
    tasks: Mutex<Option<Vec<Task>>>,
}

impl FakeTasksDataSource {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Mutex::new(Some(tasks)),
        }
    }

    pub fn set_tasks(&self, tasks: Option<Vec<Task>>) {
        *lock(&self.tasks) = tasks;
    }

    pub fn tasks(&self) -> Option<Vec<Task>> {
        lock(&self.tasks).clone()
    }

    fn with_tasks<T>(&self, f: impl FnOnce(&mut Vec<Task>) -> T) -> Result<T> {
        match lock(&self.tasks).as_mut() {
            Some(tasks) => Ok(f(tasks)),
            None => Err(Error::Storage("Tasks not found".to_string())),
        }
    }
}

#[async_trait]
impl TasksDataSource for FakeTasksDataSource {
    /// Yields a single snapshot of the current contents
    fn observe_tasks(&self) -> TaskStream {
        let snapshot = self.with_tasks(|tasks| tasks.clone());
        futures::stream::iter([snapshot]).boxed()
    }

    async fn get_tasks(&self) -> Result<Vec<Task>> {
        self.with_tasks(|tasks| tasks.clone())
    }

    async fn get_task(&self, task_id: &str) -> Result<Task> {
        self.with_tasks(|tasks| tasks.iter().find(|t| t.id == task_id).cloned())?
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))
    }

    async fn save_task(&self, task: Task) -> Result<()> {
        self.with_tasks(|tasks| upsert(tasks, task))
    }

    async fn complete_task(&self, task_id: &str) -> Result<()> {
        self.with_tasks(|tasks| set_completed(tasks, task_id, true))
    }

    async fn activate_task(&self, task_id: &str) -> Result<()> {
        self.with_tasks(|tasks| set_completed(tasks, task_id, false))
    }

    async fn clear_completed_tasks(&self) -> Result<()> {
        self.with_tasks(|tasks| tasks.retain(Task::is_active))
    }
}
