//! One-shot UI events and user-facing messages

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Content meant to be consumed once, such as a snackbar message
///
/// Clones share the handled flag, so an event published through a watch
/// channel is consumed at most once across all receivers.
#[derive(Debug, Clone)]
pub struct Event<T> {
    content: T,
    handled: Arc<AtomicBool>,
}

impl<T> Event<T> {
    pub fn new(content: T) -> Self {
        Self {
            content,
            handled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Return the content the first time only
    pub fn content_if_not_handled(&self) -> Option<&T> {
        if self.handled.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(&self.content)
        }
    }

    /// Return the content even if already handled
    pub fn peek_content(&self) -> &T {
        &self.content
    }

    pub fn has_been_handled(&self) -> bool {
        self.handled.load(Ordering::Acquire)
    }
}

/// Messages shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    LoadingTasksError,
    TaskMarkedComplete,
    TaskMarkedActive,
    CompletedTasksCleared,
    SavedTask,
    EmptyTask,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::LoadingTasksError => "Error while loading tasks",
            Self::TaskMarkedComplete => "Task marked complete",
            Self::TaskMarkedActive => "Task marked active",
            Self::CompletedTasksCleared => "Completed tasks cleared",
            Self::SavedTask => "Task saved",
            Self::EmptyTask => "Tasks cannot be empty",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_is_consumed_once_across_clones() {
        let event = Event::new(Message::SavedTask);
        let copy = event.clone();

        assert_eq!(copy.content_if_not_handled(), Some(&Message::SavedTask));
        assert!(event.has_been_handled());
        assert_eq!(event.content_if_not_handled(), None);
        assert_eq!(event.peek_content(), &Message::SavedTask);
    }

    #[test]
    fn test_message_text() {
        assert_eq!(Message::EmptyTask.to_string(), "Tasks cannot be empty");
    }
}
