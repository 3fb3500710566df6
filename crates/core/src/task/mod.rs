//! Task module
//!
//! This module contains the task entity.

mod model;

pub use model::*;
