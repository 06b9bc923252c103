//! List repository trait
//!
//! Defines the interface for list storage operations.

use async_trait::async_trait;
use uuid::Uuid;

use super::model::{Item, ListName, TaskList};
use crate::Result;

/// Repository interface for the list documents
#[async_trait]
pub trait ListRepository: Send + Sync {
    /// Get a list by name without creating it
    async fn get(&self, name: ListName) -> Result<Option<TaskList>>;

    /// Get a list by name, creating it empty if it does not exist yet
    async fn find_or_create(&self, name: ListName) -> Result<TaskList>;

    /// Append an item to a list, creating the list if needed, as one operation
    async fn push_item(&self, name: ListName, item: Item) -> Result<TaskList>;

    /// Remove an item from a list; returns false if nothing was removed
    async fn remove_item(&self, name: ListName, id: Uuid) -> Result<bool>;
}
