//! Search history, unique per (query, search type)

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::errors::StoreError;
use super::types::SearchType;

/// How many entries are shown per search type
pub const MAX_SEARCH_HISTORY: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    pub query: String,
    pub search_type: SearchType,
    pub timestamp: i64,
}

impl SearchHistoryEntry {
    pub fn now(query: impl Into<String>, search_type: SearchType) -> Self {
        Self {
            query: query.into(),
            search_type,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    fn same_key(&self, query: &str, search_type: SearchType) -> bool {
        self.query == query && self.search_type == search_type
    }
}

/// History store, persisted as a JSON file
#[derive(Clone)]
pub struct SearchHistoryStore {
    path: Option<Arc<PathBuf>>,
    entries: Arc<RwLock<Vec<SearchHistoryEntry>>>,
}

impl SearchHistoryStore {
    /// History that lives only in memory
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content).map_err(|source| StoreError::Json {
                path: path.display().to_string(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        Ok(Self {
            path: Some(Arc::new(path)),
            entries: Arc::new(RwLock::new(entries)),
        })
    }

    async fn save(&self, entries: &[SearchHistoryEntry]) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let content = serde_json::to_string(entries).map_err(|source| StoreError::Json {
            path: path.display().to_string(),
            source,
        })?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Io {
                    path: parent.display().to_string(),
                    source,
                })?;
        }
        tokio::fs::write(path.as_ref(), content)
            .await
            .map_err(|source| StoreError::Io {
                path: path.display().to_string(),
                source,
            })
    }

    /// Edits a copy of the entries and keeps it only once saved
    async fn update(&self, apply: impl FnOnce(&mut Vec<SearchHistoryEntry>)) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        let mut next = entries.clone();
        apply(&mut next);
        self.save(&next).await?;
        *entries = next;
        Ok(())
    }

    /// Inserts `entry`, replacing any entry with the same query and type
    pub async fn upsert(&self, entry: SearchHistoryEntry) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.retain(|e| !e.same_key(&entry.query, entry.search_type));
            entries.push(entry);
        })
        .await
    }

    /// All entries, most recent first
    pub async fn list(&self) -> Vec<SearchHistoryEntry> {
        let mut entries = self.entries.read().await.clone();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }

    /// Most recent entries of one search type, capped for display
    pub async fn recent(&self, search_type: SearchType) -> Vec<SearchHistoryEntry> {
        self.list()
            .await
            .into_iter()
            .filter(|e| e.search_type == search_type)
            .take(MAX_SEARCH_HISTORY)
            .collect()
    }

    pub async fn delete(&self, query: &str, search_type: SearchType) -> Result<(), StoreError> {
        self.update(|entries| entries.retain(|e| !e.same_key(query, search_type)))
            .await
    }

    pub async fn delete_all(&self) -> Result<(), StoreError> {
        self.update(Vec::clear).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(query: &str, search_type: SearchType, timestamp: i64) -> SearchHistoryEntry {
        SearchHistoryEntry {
            query: query.to_string(),
            search_type,
            timestamp,
        }
    }

    #[tokio::test]
    async fn upsert_replaces_same_key() {
        let store = SearchHistoryStore::in_memory();
        store.upsert(entry("daft punk", SearchType::Tracks, 10)).await.unwrap();
        store.upsert(entry("daft punk", SearchType::Tracks, 20)).await.unwrap();

        assert_eq!(store.list().await, vec![entry("daft punk", SearchType::Tracks, 20)]);
    }

    #[tokio::test]
    async fn same_query_different_type_is_separate() {
        let store = SearchHistoryStore::in_memory();
        store.upsert(entry("q", SearchType::Tracks, 1)).await.unwrap();
        store.upsert(entry("q", SearchType::Albums, 2)).await.unwrap();
        assert_eq!(store.list().await.len(), 2);
    }

    #[tokio::test]
    async fn recent_is_newest_first_and_capped() {
        let store = SearchHistoryStore::in_memory();
        for i in 0..8 {
            store.upsert(entry(&format!("t{i}"), SearchType::Tracks, i)).await.unwrap();
        }
        store.upsert(entry("album", SearchType::Albums, 100)).await.unwrap();

        let recent: Vec<String> = store
            .recent(SearchType::Tracks)
            .await
            .into_iter()
            .map(|e| e.query)
            .collect();
        assert_eq!(recent, vec!["t7", "t6", "t5", "t4", "t3"]);
    }

    #[tokio::test]
    async fn delete_one_and_all() {
        let store = SearchHistoryStore::in_memory();
        store.upsert(entry("a", SearchType::Tracks, 1)).await.unwrap();
        store.upsert(entry("b", SearchType::Tracks, 2)).await.unwrap();

        store.delete("a", SearchType::Tracks).await.unwrap();
        assert_eq!(store.list().await, vec![entry("b", SearchType::Tracks, 2)]);

        store.delete_all().await.unwrap();
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn failed_save_keeps_previous_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search_history.json");
        let store = SearchHistoryStore::load(&path).await.unwrap();
        store.upsert(entry("a", SearchType::Tracks, 1)).await.unwrap();

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(store.upsert(entry("b", SearchType::Tracks, 2)).await.is_err());
        assert!(store.delete("a", SearchType::Tracks).await.is_err());
        assert!(store.delete_all().await.is_err());
        assert_eq!(store.list().await, vec![entry("a", SearchType::Tracks, 1)]);
    }

    #[tokio::test]
    async fn persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search_history.json");

        let store = SearchHistoryStore::load(&path).await.unwrap();
        store.upsert(entry("kept", SearchType::Albums, 5)).await.unwrap();

        let reloaded = SearchHistoryStore::load(&path).await.unwrap();
        assert_eq!(reloaded.list().await, vec![entry("kept", SearchType::Albums, 5)]);
    }
}
