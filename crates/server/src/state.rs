//! Application state

use std::path::PathBuf;
use std::sync::Arc;

use tasklist_core::list::{FileListStore, ListRepository};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    list_store: Arc<dyn ListRepository>,
    data_dir: PathBuf,
}

impl AppState {
    /// Open the file store inside the given data directory
    pub async fn new(data_dir: PathBuf) -> tasklist_core::Result<Self> {
        let list_store = FileListStore::new(data_dir.join("lists.json")).await?;
        Ok(Self::with_store(data_dir, Arc::new(list_store)))
    }

    /// Build the state around an already constructed store
    pub fn with_store(data_dir: PathBuf, list_store: Arc<dyn ListRepository>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                list_store,
                data_dir,
            }),
        }
    }

    /// Get reference to the list store
    pub fn list_store(&self) -> &dyn ListRepository {
        self.inner.list_store.as_ref()
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.inner.data_dir
    }
}
