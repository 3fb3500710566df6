//! Presentation state holders
//!
//! Headless view models exposing UI-ready state through watch channels.

mod add_task;
mod event;
mod tasks;

pub use add_task::AddTaskViewModel;
pub use event::{Event, Message};
pub use tasks::{EditResult, TasksViewModel};
