//! Persisted user settings
//!
//! Settings live in a small JSON file. Reads are served from memory; every
//! write goes straight back to disk. The reveal-unsupported flag is also
//! published on a watch channel so long-lived listeners see every change.

use std::path::PathBuf;
use std::sync::Arc;

use futures::Stream;
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, RwLock};

use super::errors::StoreError;

pub const DEFAULT_SERVER_URL: &str = "https://example.com/api/echoir";
pub const DEFAULT_REGION: &str = "BR";

/// How downloaded files are named
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileNamingFormat {
    ArtistTitle,
    TitleArtist,
    TitleOnly,
}

impl FileNamingFormat {
    pub const ALL: [FileNamingFormat; 3] = [Self::ArtistTitle, Self::TitleArtist, Self::TitleOnly];

    /// Unknown ordinals fall back to `TitleOnly`
    pub fn from_ordinal(ordinal: i64) -> Self {
        usize::try_from(ordinal)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .unwrap_or(Self::TitleOnly)
    }

    pub fn next(self) -> Self {
        Self::from_ordinal((self.ordinal() + 1) % Self::ALL.len() as i64)
    }

    pub fn ordinal(self) -> i64 {
        match self {
            Self::ArtistTitle => 0,
            Self::TitleArtist => 1,
            Self::TitleOnly => 2,
        }
    }

    /// Base file name (no extension). Only the first of a comma-separated
    /// artist list is used.
    pub fn format(self, artist: &str, title: &str) -> String {
        let first_artist = artist.split(',').next().unwrap_or_default().trim();
        match self {
            Self::ArtistTitle => format!("{first_artist} - {title}"),
            Self::TitleArtist => format!("{title} - {first_artist}"),
            Self::TitleOnly => title.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub output_directory: Option<String>,
    /// Stored as an ordinal, see [`FileNamingFormat::from_ordinal`]
    pub file_naming_format: i64,
    pub region: String,
    pub server_url: String,
    pub show_unsupported_formats: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_directory: None,
            file_naming_format: 0,
            region: DEFAULT_REGION.to_string(),
            server_url: DEFAULT_SERVER_URL.to_string(),
            show_unsupported_formats: false,
        }
    }
}

#[derive(Clone)]
pub struct SettingsStore {
    path: Arc<PathBuf>,
    settings: Arc<RwLock<Settings>>,
    show_unsupported_tx: Arc<watch::Sender<bool>>,
}

impl SettingsStore {
    /// Opens the store at `path`, starting from defaults if the file is absent
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let settings = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content).map_err(|source| StoreError::Json {
                path: path.display().to_string(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Settings::default(),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        tracing::debug!(path = %path.display(), server_url = %settings.server_url, "Settings loaded");
        let (tx, _rx) = watch::channel(settings.show_unsupported_formats);

        Ok(Self {
            path: Arc::new(path),
            settings: Arc::new(RwLock::new(settings)),
            show_unsupported_tx: Arc::new(tx),
        })
    }

    pub async fn snapshot(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Applies `apply` to a copy and writes it out. Memory and listeners
    /// only see the change once the file is written.
    async fn update(&self, apply: impl FnOnce(&mut Settings)) -> Result<(), StoreError> {
        let mut settings = self.settings.write().await;
        let mut next = settings.clone();
        apply(&mut next);
        let content = serde_json::to_string_pretty(&next).map_err(|source| StoreError::Json {
            path: self.path.display().to_string(),
            source,
        })?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Io {
                    path: parent.display().to_string(),
                    source,
                })?;
        }
        tokio::fs::write(self.path.as_ref(), content)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.display().to_string(),
                source,
            })?;

        let show = next.show_unsupported_formats;
        *settings = next;
        self.show_unsupported_tx.send_if_modified(|current| {
            if *current != show {
                *current = show;
                true
            } else {
                false
            }
        });
        Ok(())
    }

    pub async fn output_directory(&self) -> Option<String> {
        self.settings.read().await.output_directory.clone()
    }

    pub async fn set_output_directory(&self, dir: Option<String>) -> Result<(), StoreError> {
        self.update(|s| s.output_directory = dir).await
    }

    pub async fn file_naming_format(&self) -> FileNamingFormat {
        FileNamingFormat::from_ordinal(self.settings.read().await.file_naming_format)
    }

    pub async fn set_file_naming_format(&self, format: FileNamingFormat) -> Result<(), StoreError> {
        self.update(|s| s.file_naming_format = format.ordinal()).await
    }

    pub async fn region(&self) -> String {
        self.settings.read().await.region.clone()
    }

    pub async fn set_region(&self, region: String) -> Result<(), StoreError> {
        self.update(|s| s.region = region).await
    }

    pub async fn server_url(&self) -> String {
        self.settings.read().await.server_url.clone()
    }

    /// Blank URLs are ignored
    pub async fn set_server_url(&self, url: &str) -> Result<(), StoreError> {
        let url = url.trim();
        if url.is_empty() {
            return Ok(());
        }
        let url = url.to_string();
        tracing::info!(server_url = %url, "Server URL updated");
        self.update(|s| s.server_url = url).await
    }

    pub async fn reset_server_settings(&self) -> Result<(), StoreError> {
        self.update(|s| s.server_url = DEFAULT_SERVER_URL.to_string()).await
    }

    pub async fn show_unsupported_formats(&self) -> bool {
        self.settings.read().await.show_unsupported_formats
    }

    pub async fn set_show_unsupported_formats(&self, show: bool) -> Result<(), StoreError> {
        self.update(|s| s.show_unsupported_formats = show).await
    }

    /// Yields the current reveal-unsupported value, then every change.
    /// Ends only when the store is dropped.
    pub fn show_unsupported_formats_stream(&self) -> impl Stream<Item = bool> + Send + use<> {
        let rx = self.show_unsupported_tx.subscribe();
        futures::stream::unfold((rx, true), |(mut rx, first)| async move {
            if !first && rx.changed().await.is_err() {
                return None;
            }
            let value = *rx.borrow_and_update();
            Some((value, (rx, false)))
        })
    }

    /// Restores defaults, keeping the reveal-unsupported preference
    pub async fn reset(&self) -> Result<(), StoreError> {
        self.update(|s| {
            let show = s.show_unsupported_formats;
            *s = Settings {
                file_naming_format: FileNamingFormat::TitleOnly.ordinal(),
                show_unsupported_formats: show,
                ..Settings::default()
            };
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use pretty_assertions::assert_eq;

    #[test]
    fn naming_format_ordinals() {
        assert_eq!(FileNamingFormat::from_ordinal(0), FileNamingFormat::ArtistTitle);
        assert_eq!(FileNamingFormat::from_ordinal(1), FileNamingFormat::TitleArtist);
        assert_eq!(FileNamingFormat::from_ordinal(2), FileNamingFormat::TitleOnly);
        assert_eq!(FileNamingFormat::from_ordinal(7), FileNamingFormat::TitleOnly);
        assert_eq!(FileNamingFormat::from_ordinal(-1), FileNamingFormat::TitleOnly);
    }

    #[test]
    fn naming_format_cycles() {
        assert_eq!(FileNamingFormat::ArtistTitle.next(), FileNamingFormat::TitleArtist);
        assert_eq!(FileNamingFormat::TitleOnly.next(), FileNamingFormat::ArtistTitle);
    }

    #[test]
    fn naming_format_uses_first_artist() {
        assert_eq!(
            FileNamingFormat::ArtistTitle.format("Daft Punk, Pharrell", "Get Lucky"),
            "Daft Punk - Get Lucky"
        );
        assert_eq!(
            FileNamingFormat::TitleArtist.format(" Solo ", "Song"),
            "Song - Solo"
        );
        assert_eq!(FileNamingFormat::TitleOnly.format("A", "Song"), "Song");
    }

    #[tokio::test]
    async fn defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::load(dir.path().join("settings.json")).await.unwrap();

        assert_eq!(store.snapshot().await, Settings::default());
        assert_eq!(store.region().await, "BR");
        assert_eq!(store.server_url().await, DEFAULT_SERVER_URL);
        assert_eq!(store.file_naming_format().await, FileNamingFormat::ArtistTitle);
        assert!(!store.show_unsupported_formats().await);
    }

    #[tokio::test]
    async fn writes_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let store = SettingsStore::load(&path).await.unwrap();
        store.set_server_url("https://music.lan/api").await.unwrap();
        store.set_region("US".to_string()).await.unwrap();
        store.set_file_naming_format(FileNamingFormat::TitleArtist).await.unwrap();
        store.set_output_directory(Some("/music".to_string())).await.unwrap();

        let reloaded = SettingsStore::load(&path).await.unwrap();
        assert_eq!(reloaded.server_url().await, "https://music.lan/api");
        assert_eq!(reloaded.region().await, "US");
        assert_eq!(reloaded.file_naming_format().await, FileNamingFormat::TitleArtist);
        assert_eq!(reloaded.output_directory().await, Some("/music".to_string()));
    }

    #[tokio::test]
    async fn blank_server_url_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::load(dir.path().join("settings.json")).await.unwrap();
        store.set_server_url("https://music.lan").await.unwrap();
        store.set_server_url("   ").await.unwrap();
        assert_eq!(store.server_url().await, "https://music.lan");

        store.reset_server_settings().await.unwrap();
        assert_eq!(store.server_url().await, DEFAULT_SERVER_URL);
    }

    #[tokio::test]
    async fn unknown_naming_ordinal_on_disk_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"file_naming_format": 42}"#).unwrap();

        let store = SettingsStore::load(&path).await.unwrap();
        assert_eq!(store.file_naming_format().await, FileNamingFormat::TitleOnly);
        assert_eq!(store.region().await, DEFAULT_REGION);
    }

    #[tokio::test]
    async fn reset_keeps_reveal_preference() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::load(dir.path().join("settings.json")).await.unwrap();
        store.set_region("DE".to_string()).await.unwrap();
        store.set_show_unsupported_formats(true).await.unwrap();

        store.reset().await.unwrap();
        assert_eq!(store.region().await, DEFAULT_REGION);
        assert_eq!(store.file_naming_format().await, FileNamingFormat::TitleOnly);
        assert!(store.show_unsupported_formats().await);
    }

    #[tokio::test]
    async fn failed_write_leaves_settings_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let store = SettingsStore::load(&path).await.unwrap();
        let mut stream = Box::pin(store.show_unsupported_formats_stream());
        assert_eq!(stream.next().await, Some(false));

        // A directory in place of the file makes every write fail
        std::fs::create_dir(&path).unwrap();

        assert!(store.set_show_unsupported_formats(true).await.is_err());
        assert!(!store.show_unsupported_formats().await);
        assert!(store.set_region("US".to_string()).await.is_err());
        assert_eq!(store.region().await, DEFAULT_REGION);

        let next = tokio::time::timeout(std::time::Duration::from_millis(50), stream.next()).await;
        assert!(next.is_err());
    }

    #[tokio::test]
    async fn reveal_stream_emits_current_then_changes() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::load(dir.path().join("settings.json")).await.unwrap();
        let mut stream = Box::pin(store.show_unsupported_formats_stream());

        assert_eq!(stream.next().await, Some(false));

        store.set_show_unsupported_formats(true).await.unwrap();
        assert_eq!(stream.next().await, Some(true));

        store.set_show_unsupported_formats(false).await.unwrap();
        assert_eq!(stream.next().await, Some(false));
    }
}
