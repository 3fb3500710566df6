//! Task model definitions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A to-do item
///
/// `id` is the identity used for storage and lookups. `PartialEq` compares
/// every field, so two snapshots of the same task differ once its title or
/// completion flag changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(rename = "isCompleted", default)]
    pub completed: bool,
}

impl Task {
    /// Create a new active task with a freshly generated id
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            completed: false,
        }
    }

    /// Replace the generated id, for fixtures that need a known key
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the completion flag
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn is_active(&self) -> bool {
        !self.completed
    }

    /// Whether both values describe the same stored record
    pub fn same_identity(&self, other: &Task) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_task() {
        let task = Task::new("Test task");
        assert_eq!(task.title, "Test task");
        assert!(!task.completed);
        assert!(task.is_active());
        assert!(!task.id.is_empty());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = Task::new("same");
        let b = Task::new("same");
        assert_ne!(a.id, b.id);
        assert_ne!(a, b);
        assert!(!a.same_identity(&b));
    }

    #[test]
    fn test_task_with_id_and_completed() {
        let task = Task::new("Fixture").with_id("A").with_completed(true);
        assert_eq!(task.id, "A");
        assert!(task.completed);
        assert!(!task.is_active());
    }

    #[test]
    fn test_equality_is_by_value_identity_is_by_id() {
        let original = Task::new("Title").with_id("A");
        let flipped = original.clone().with_completed(true);

        assert_ne!(original, flipped);
        assert!(original.same_identity(&flipped));
    }

    #[test]
    fn test_empty_title_is_allowed() {
        let task = Task::new("");
        assert_eq!(task.title, "");
    }

    #[test]
    fn test_serializes_completion_as_is_completed() {
        let task = Task::new("Title").with_id("A").with_completed(true);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], "A");
        assert_eq!(json["title"], "Title");
        assert_eq!(json["isCompleted"], true);

        let parsed: Task = serde_json::from_str(r#"{"id":"B","title":"T"}"#).unwrap();
        assert!(parsed.is_active());
    }
}
