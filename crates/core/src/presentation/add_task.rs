//! Add-task state holder

use std::sync::Arc;

use tokio::sync::watch;

use super::event::{Event, Message};
use crate::data::{TasksRepository, WriteHandle};
use crate::task::Task;

/// UI state for the add-task screen
pub struct AddTaskViewModel {
    repository: Arc<dyn TasksRepository>,
    task_description: watch::Sender<Option<String>>,
    task_updated_event: watch::Sender<Option<Event<()>>>,
    snackbar_text: watch::Sender<Option<Event<Message>>>,
}

impl AddTaskViewModel {
    pub fn new(repository: Arc<dyn TasksRepository>) -> Self {
        Self {
            repository,
            task_description: watch::channel(None).0,
            task_updated_event: watch::channel(None).0,
            snackbar_text: watch::channel(None).0,
        }
    }

    pub fn set_task_description(&self, description: Option<String>) {
        self.task_description.send_replace(description);
    }

    pub fn task_description(&self) -> watch::Receiver<Option<String>> {
        self.task_description.subscribe()
    }

    /// Fired once the new task has been submitted
    pub fn task_updated_event(&self) -> watch::Receiver<Option<Event<()>>> {
        self.task_updated_event.subscribe()
    }

    pub fn snackbar_text(&self) -> watch::Receiver<Option<Event<Message>>> {
        self.snackbar_text.subscribe()
    }

    /// Submit the described task; empty descriptions are rejected
    pub fn save_task(&self) -> Option<WriteHandle> {
        let description = self.task_description.borrow().clone();
        let Some(description) = description.filter(|d| !d.is_empty()) else {
            self.snackbar_text
                .send_replace(Some(Event::new(Message::EmptyTask)));
            return None;
        };

        let handle = self.repository.save_task(Task::new(description));
        self.task_updated_event.send_replace(Some(Event::new(())));
        Some(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FakeTasksRepository;

    fn setup() -> (Arc<FakeTasksRepository>, AddTaskViewModel) {
        let repository = Arc::new(FakeTasksRepository::new());
        let view_model = AddTaskViewModel::new(repository.clone());
        (repository, view_model)
    }

    fn save_task_and_assert_snackbar_error(title: Option<&str>) {
        let (repository, view_model) = setup();
        view_model.set_task_description(title.map(String::from));

        assert!(view_model.save_task().is_none());

        let snackbar = view_model.snackbar_text();
        let event = snackbar.borrow();
        assert_eq!(
            event.as_ref().unwrap().content_if_not_handled(),
            Some(&Message::EmptyTask)
        );
        assert!(repository.tasks().is_empty());
        assert!(view_model.task_updated_event().borrow().is_none());
    }

    #[tokio::test]
    async fn test_save_new_task_to_repository() {
        let (repository, view_model) = setup();
        view_model.set_task_description(Some("New Task Title".to_string()));

        view_model.save_task().unwrap().wait().await.unwrap();

        let saved = repository.tasks();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].title, "New Task Title");
        assert!(saved[0].is_active());
        assert!(view_model.task_updated_event().borrow().is_some());
    }

    #[test]
    fn test_save_new_task_empty_title_error() {
        save_task_and_assert_snackbar_error(Some(""));
    }

    #[test]
    fn test_save_new_task_missing_title_error() {
        save_task_and_assert_snackbar_error(None);
    }
}
