//! List module
//!
//! This module contains the task list model, sorting and storage.

mod file_store;
mod model;
mod repository;
mod sort;

pub use file_store::FileListStore;
pub use model::*;
pub use repository::ListRepository;
pub use sort::{compare_deadlines, sort_by_deadline, sort_by_priority, SortMode};
