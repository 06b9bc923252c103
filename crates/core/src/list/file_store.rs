//! File-based list storage implementation
//!
//! Stores the list documents as JSON in a file on disk.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::{Item, ListName, TaskList};
use super::repository::ListRepository;
use crate::{Error, Result};

/// File-based list store using JSON
///
/// Every mutation holds the write lock until the file has been written, so
/// concurrent requests against the same list are applied one after another.
pub struct FileListStore {
    /// Path to the JSON file
    path: PathBuf,
    /// In-memory copy of the list documents
    cache: RwLock<HashMap<ListName, TaskList>>,
}

impl FileListStore {
    /// Open a FileListStore
    ///
    /// If the file doesn't exist, it will be created on first write. A backup
    /// left behind by an interrupted write is loaded in its place.
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let backup_path = sibling_path(&path, "bak");

        let source = if tokio::fs::try_exists(&path).await? {
            Some(path.clone())
        } else if tokio::fs::try_exists(&backup_path).await? {
            tracing::warn!("Recovering lists from backup {:?}", backup_path);
            Some(backup_path)
        } else {
            None
        };

        let cache: HashMap<ListName, TaskList> = match source {
            Some(source) => {
                let content = tokio::fs::read_to_string(&source).await.map_err(|e| {
                    Error::Storage(format!(
                        "Failed to read list file {}: {}",
                        source.display(),
                        e
                    ))
                })?;
                let lists: Vec<TaskList> = serde_json::from_str(&content)?;
                lists.into_iter().map(|l| (l.name, l)).collect()
            }
            None => HashMap::new(),
        };

        tracing::debug!("Loaded {} list(s) from {:?}", cache.len(), path);

        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    /// Write the given documents to disk
    ///
    /// The new content goes to a temp file that is renamed over the old one,
    /// so the file on disk is always either the previous or the new snapshot.
    /// Callers pass the contents of a held write guard.
    async fn persist(&self, lists: &HashMap<ListName, TaskList>) -> Result<()> {
        let documents: Vec<&TaskList> = ListName::ALL
            .iter()
            .filter_map(|name| lists.get(name))
            .collect();
        let content = serde_json::to_string_pretty(&documents)
            .map_err(|e| Error::Storage(format!("Failed to serialize lists: {}", e)))?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Error::Storage(format!("Failed to create directory: {}", e))
            })?;
        }

        let temp_path = sibling_path(&self.path, "tmp");
        let backup_path = sibling_path(&self.path, "bak");

        if let Err(err) = tokio::fs::write(&temp_path, content).await {
            discard(&temp_path).await;
            return Err(Error::Storage(format!(
                "Failed to write temp list file: {}",
                err
            )));
        }

        let had_original = tokio::fs::try_exists(&self.path).await.unwrap_or(false);
        if had_original {
            if let Err(err) = tokio::fs::rename(&self.path, &backup_path).await {
                discard(&temp_path).await;
                return Err(Error::Storage(format!(
                    "Failed to prepare list file write: {}",
                    err
                )));
            }
        }

        if let Err(err) = tokio::fs::rename(&temp_path, &self.path).await {
            if had_original {
                if let Err(restore_err) = tokio::fs::rename(&backup_path, &self.path).await {
                    tracing::error!("Failed to restore list file from backup: {}", restore_err);
                }
            }
            discard(&temp_path).await;
            return Err(Error::Storage(format!(
                "Failed to finalize list file write: {}",
                err
            )));
        }

        if had_original {
            discard(&backup_path).await;
        }
        Ok(())
    }
}

/// `.lists.json.<suffix>` next to the store file
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "lists.json".to_string());
    path.with_file_name(format!(".{}.{}", file_name, suffix))
}

async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("Failed to remove {:?}: {}", path, e);
        }
    }
}

#[async_trait]
impl ListRepository for FileListStore {
    async fn get(&self, name: ListName) -> Result<Option<TaskList>> {
        let cache = self.cache.read().await;
        Ok(cache.get(&name).cloned())
    }

    async fn find_or_create(&self, name: ListName) -> Result<TaskList> {
        if let Some(list) = self.cache.read().await.get(&name) {
            return Ok(list.clone());
        }

        let mut cache = self.cache.write().await;
        // Another request may have created it while we waited for the lock
        if let Some(list) = cache.get(&name) {
            return Ok(list.clone());
        }

        let list = TaskList::new(name);
        cache.insert(name, list.clone());
        if let Err(e) = self.persist(&cache).await {
            cache.remove(&name);
            return Err(e);
        }

        tracing::info!("Created list {}", name);
        Ok(list)
    }

    async fn push_item(&self, name: ListName, item: Item) -> Result<TaskList> {
        let mut cache = self.cache.write().await;
        let created = !cache.contains_key(&name);
        let item_id = item.id;
        cache
            .entry(name)
            .or_insert_with(|| TaskList::new(name))
            .push(item);

        if let Err(e) = self.persist(&cache).await {
            // Roll back so memory matches what is on disk
            if created {
                cache.remove(&name);
            } else if let Some(list) = cache.get_mut(&name) {
                list.remove(item_id);
            }
            return Err(e);
        }

        cache
            .get(&name)
            .cloned()
            .ok_or_else(|| Error::Storage(format!("List {} vanished during write", name)))
    }

    async fn remove_item(&self, name: ListName, id: Uuid) -> Result<bool> {
        let mut cache = self.cache.write().await;
        let Some(list) = cache.get_mut(&name) else {
            return Ok(false);
        };
        let Some(index) = list.items.iter().position(|item| item.id == id) else {
            return Ok(false);
        };

        let removed = list.items.remove(index);
        if let Err(e) = self.persist(&cache).await {
            if let Some(list) = cache.get_mut(&name) {
                list.items.insert(index, removed);
            }
            return Err(e);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn create_test_store() -> (FileListStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lists.json");
        let store = FileListStore::new(&path).await.unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_find_or_create_creates_empty_list() {
        let (store, _temp) = create_test_store().await;

        assert!(store.get(ListName::General).await.unwrap().is_none());

        let list = store.find_or_create(ListName::General).await.unwrap();
        assert_eq!(list.name, ListName::General);
        assert!(list.items.is_empty());

        assert!(store.get(ListName::General).await.unwrap().is_some());
        assert!(store.get(ListName::Work).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_or_create_returns_existing_list() {
        let (store, _temp) = create_test_store().await;

        store
            .push_item(ListName::Work, Item::new("Existing", 1))
            .await
            .unwrap();

        let list = store.find_or_create(ListName::Work).await.unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].title, "Existing");
    }

    #[tokio::test]
    async fn test_push_item_appends_in_order() {
        let (store, _temp) = create_test_store().await;

        store
            .push_item(ListName::Work, Item::new("First", 3))
            .await
            .unwrap();
        let list = store
            .push_item(ListName::Work, Item::new("Second", 1))
            .await
            .unwrap();

        let titles: Vec<&str> = list.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn test_remove_item() {
        let (store, _temp) = create_test_store().await;

        let item = Item::new("Item to delete", 1);
        let id = item.id;
        store.push_item(ListName::General, item).await.unwrap();

        assert!(store.remove_item(ListName::General, id).await.unwrap());
        let list = store.get(ListName::General).await.unwrap().unwrap();
        assert!(list.items.is_empty());

        // Delete again should return false
        assert!(!store.remove_item(ListName::General, id).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_unknown_id_leaves_list_unchanged() {
        let (store, _temp) = create_test_store().await;

        store
            .push_item(ListName::General, Item::new("Keep me", 2))
            .await
            .unwrap();
        let before = store.get(ListName::General).await.unwrap().unwrap();

        let removed = store
            .remove_item(ListName::General, Uuid::new_v4())
            .await
            .unwrap();
        assert!(!removed);

        let after = store.get(ListName::General).await.unwrap().unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_remove_from_missing_list_does_not_create_it() {
        let (store, _temp) = create_test_store().await;

        let removed = store
            .remove_item(ListName::Work, Uuid::new_v4())
            .await
            .unwrap();
        assert!(!removed);
        assert!(store.get(ListName::Work).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_persistence_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lists.json");

        let item_id;

        {
            let store = FileListStore::new(&path).await.unwrap();
            let item = Item::new("Persistent item", 2)
                .with_description("Should survive reload")
                .with_estimated_duration(30);
            item_id = item.id;
            store.push_item(ListName::Work, item).await.unwrap();
            store.find_or_create(ListName::General).await.unwrap();
        }

        {
            let store = FileListStore::new(&path).await.unwrap();
            let work = store.get(ListName::Work).await.unwrap().unwrap();
            assert_eq!(work.items.len(), 1);
            let item = &work.items[0];
            assert_eq!(item.id, item_id);
            assert_eq!(item.title, "Persistent item");
            assert_eq!(item.description, "Should survive reload");
            assert_eq!(item.estimated_duration, Some(30));

            let general = store.get(ListName::General).await.unwrap().unwrap();
            assert!(general.items.is_empty());
        }
    }

    #[tokio::test]
    async fn test_concurrent_pushes_lose_nothing() {
        let (store, _temp) = create_test_store().await;
        let store = Arc::new(store);

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .push_item(ListName::Work, Item::new(format!("Item {}", i), i))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let list = store.get(ListName::Work).await.unwrap().unwrap();
        assert_eq!(list.items.len(), 20);
    }

    #[tokio::test]
    async fn test_corrupt_file_fails_to_open() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lists.json");
        tokio::fs::write(&path, "not json").await.unwrap();

        let result = FileListStore::new(&path).await;
        match result {
            Err(Error::Serialization(_)) => {}
            Err(e) => panic!("Expected Serialization error, got: {:?}", e),
            Ok(_) => panic!("Expected corrupt file to be rejected"),
        }
    }

    /// A directory in the temp file's place makes every write fail
    fn block_writes(dir: &Path) {
        std::fs::create_dir_all(dir.join(".lists.json.tmp")).unwrap();
    }

    fn unblock_writes(dir: &Path) {
        std::fs::remove_dir_all(dir.join(".lists.json.tmp")).unwrap();
    }

    fn assert_storage_error<T: std::fmt::Debug>(result: Result<T>) {
        match result {
            Err(Error::Storage(_)) => {}
            other => panic!("Expected Storage error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_push_keeps_previous_state() {
        let (store, temp) = create_test_store().await;
        store
            .push_item(ListName::Work, Item::new("Saved", 1))
            .await
            .unwrap();
        let before = store.get(ListName::Work).await.unwrap();
        let on_disk = std::fs::read_to_string(temp.path().join("lists.json")).unwrap();

        block_writes(temp.path());

        assert_storage_error(store.push_item(ListName::Work, Item::new("Lost", 2)).await);
        assert_eq!(store.get(ListName::Work).await.unwrap(), before);

        // A list the failed push would have created is not left behind
        assert_storage_error(
            store
                .push_item(ListName::General, Item::new("Lost", 2))
                .await,
        );
        assert!(store.get(ListName::General).await.unwrap().is_none());

        // The file from the last successful write is untouched
        let after = std::fs::read_to_string(temp.path().join("lists.json")).unwrap();
        assert_eq!(on_disk, after);
    }

    #[tokio::test]
    async fn test_failed_remove_keeps_item() {
        let (store, temp) = create_test_store().await;
        let first = Item::new("First", 1);
        let second = Item::new("Second", 2);
        let first_id = first.id;
        store.push_item(ListName::General, first).await.unwrap();
        store.push_item(ListName::General, second).await.unwrap();
        let before = store.get(ListName::General).await.unwrap();

        block_writes(temp.path());

        assert_storage_error(store.remove_item(ListName::General, first_id).await);
        assert_eq!(store.get(ListName::General).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_failed_create_leaves_no_list() {
        let (store, temp) = create_test_store().await;
        store.find_or_create(ListName::Work).await.unwrap();

        block_writes(temp.path());

        assert_storage_error(store.find_or_create(ListName::General).await);
        assert!(store.get(ListName::General).await.unwrap().is_none());

        // Writes work again once the obstruction is gone
        unblock_writes(temp.path());
        store.find_or_create(ListName::General).await.unwrap();
        assert!(store.get(ListName::General).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_reopen_after_failed_write_sees_last_saved_state() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lists.json");

        {
            let store = FileListStore::new(&path).await.unwrap();
            store
                .push_item(ListName::Work, Item::new("Saved", 1))
                .await
                .unwrap();
            block_writes(temp_dir.path());
            assert!(store
                .push_item(ListName::Work, Item::new("Lost", 2))
                .await
                .is_err());
        }

        let store = FileListStore::new(&path).await.unwrap();
        let work = store.get(ListName::Work).await.unwrap().unwrap();
        let titles: Vec<&str> = work.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Saved"]);
    }

    #[tokio::test]
    async fn test_successful_write_leaves_no_side_files() {
        let (store, temp) = create_test_store().await;
        store
            .push_item(ListName::Work, Item::new("One", 1))
            .await
            .unwrap();
        store
            .push_item(ListName::Work, Item::new("Two", 2))
            .await
            .unwrap();

        assert!(!temp.path().join(".lists.json.tmp").exists());
        assert!(!temp.path().join(".lists.json.bak").exists());
    }

    #[tokio::test]
    async fn test_recovers_from_backup_when_main_file_is_missing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lists.json");

        {
            let store = FileListStore::new(&path).await.unwrap();
            store
                .push_item(ListName::General, Item::new("Backed up", 1))
                .await
                .unwrap();
        }
        // Interrupted between moving the old file aside and renaming the new one in
        std::fs::rename(&path, temp_dir.path().join(".lists.json.bak")).unwrap();

        let store = FileListStore::new(&path).await.unwrap();
        let general = store.get(ListName::General).await.unwrap().unwrap();
        assert_eq!(general.items[0].title, "Backed up");
    }
}
