//! Task list state holder

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::event::{Event, Message};
use crate::data::{TasksRepository, WriteHandle};
use crate::task::Task;
use crate::{Error, Result};

/// Outcome reported by the add-task screen when it closes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditResult {
    Added,
    Cancelled,
}

struct State {
    items: watch::Sender<Vec<Task>>,
    data_loading: watch::Sender<bool>,
    snackbar_text: watch::Sender<Option<Event<Message>>>,
    new_task_event: watch::Sender<Option<Event<()>>>,
    /// Last published result was a failure
    failing: AtomicBool,
}

impl State {
    fn publish(&self, result: Result<Vec<Task>>) {
        match result {
            Ok(tasks) => {
                self.failing.store(false, Ordering::Release);
                self.items.send_if_modified(|current| {
                    if *current == tasks {
                        false
                    } else {
                        *current = tasks;
                        true
                    }
                });
            }
            Err(e) => {
                self.report_failure(&e);
                self.items.send_if_modified(|current| {
                    let changed = !current.is_empty();
                    current.clear();
                    changed
                });
            }
        }
    }

    /// Shows the loading error once per transition into failure
    fn report_failure(&self, error: &Error) {
        if !self.failing.swap(true, Ordering::AcqRel) {
            warn!("Failed to load tasks: {}", error);
            self.show_snackbar_message(Message::LoadingTasksError);
        }
    }

    fn show_snackbar_message(&self, message: Message) {
        self.snackbar_text.send_replace(Some(Event::new(message)));
    }
}

/// UI state for the task list screen
///
/// Follows the repository's task stream from construction until drop, so it
/// must be created inside a Tokio runtime.
pub struct TasksViewModel {
    repository: Arc<dyn TasksRepository>,
    state: Arc<State>,
    result_message_shown: AtomicBool,
    observer: JoinHandle<()>,
}

impl TasksViewModel {
    pub fn new(repository: Arc<dyn TasksRepository>) -> Self {
        let state = Arc::new(State {
            items: watch::channel(Vec::new()).0,
            data_loading: watch::channel(false).0,
            snackbar_text: watch::channel(None).0,
            new_task_event: watch::channel(None).0,
            failing: AtomicBool::new(false),
        });

        let mut stream = repository.observe_tasks();
        let observer_state = Arc::clone(&state);
        let observer = tokio::spawn(async move {
            while let Some(result) = stream.next().await {
                observer_state.publish(result);
            }
            debug!("Task stream ended");
        });

        Self {
            repository,
            state,
            result_message_shown: AtomicBool::new(false),
            observer,
        }
    }

    /// The visible tasks
    pub fn items(&self) -> watch::Receiver<Vec<Task>> {
        self.state.items.subscribe()
    }

    /// True while a forced load is running
    pub fn data_loading(&self) -> watch::Receiver<bool> {
        self.state.data_loading.subscribe()
    }

    pub fn snackbar_text(&self) -> watch::Receiver<Option<Event<Message>>> {
        self.state.snackbar_text.subscribe()
    }

    /// Fired when the user asks to add a task
    pub fn new_task_event(&self) -> watch::Receiver<Option<Event<()>>> {
        self.state.new_task_event.subscribe()
    }

    /// Reload the list; without `force_update` the live stream is relied on
    ///
    /// Only the observer writes `items`, so a slow read can never overwrite
    /// a newer snapshot. A failed read still surfaces the loading error.
    pub async fn load_tasks(&self, force_update: bool) {
        if !force_update {
            return;
        }
        self.state.data_loading.send_replace(true);
        if let Err(e) = self.repository.get_tasks().await {
            self.state.report_failure(&e);
        }
        self.state.data_loading.send_replace(false);
    }

    /// Complete or re-activate `task`
    pub fn complete_task(&self, task: &Task, completed: bool) -> WriteHandle {
        if completed {
            let handle = self.repository.complete_task(&task.id);
            self.state.show_snackbar_message(Message::TaskMarkedComplete);
            handle
        } else {
            let handle = self.repository.activate_task(&task.id);
            self.state.show_snackbar_message(Message::TaskMarkedActive);
            handle
        }
    }

    pub fn clear_completed_tasks(&self) -> WriteHandle {
        let handle = self.repository.clear_completed_tasks();
        self.state.show_snackbar_message(Message::CompletedTasksCleared);
        handle
    }

    /// Show the outcome of the add-task screen, once per view model
    pub fn show_edit_result_message(&self, result: EditResult) {
        if self.result_message_shown.swap(true, Ordering::AcqRel) {
            return;
        }
        if result == EditResult::Added {
            self.state.show_snackbar_message(Message::SavedTask);
        }
    }

    pub fn add_new_task(&self) {
        self.state.new_task_event.send_replace(Some(Event::new(())));
    }
}

impl Drop for TasksViewModel {
    fn drop(&mut self) {
        self.observer.abort();
    }
}
