//! Download requests and their hand-off to the background downloader

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::content::SearchResult;
use super::quality::QualityTier;
use super::settings::SettingsStore;

/// A track paired with the chosen quality, ready to hand off
#[derive(Clone, Debug, PartialEq)]
pub struct DownloadRequest {
    pub track: SearchResult,
    pub tier: QualityTier,
    pub file_name: String,
    pub output_dir: PathBuf,
}

impl DownloadRequest {
    /// Builds a request using the configured naming format and output
    /// directory (falling back to the user's download directory)
    pub async fn build(track: SearchResult, tier: QualityTier, settings: &SettingsStore) -> Self {
        let naming = settings.file_naming_format().await;
        let output_dir = settings
            .output_directory()
            .await
            .map(PathBuf::from)
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        let file_name = naming.format(&track.artist_line(), &track.title);

        Self {
            track,
            tier,
            file_name,
            output_dir,
        }
    }
}

/// Receiver of download requests; execution happens elsewhere
#[async_trait]
pub trait DownloadDispatch: Send + Sync {
    async fn dispatch(&self, request: DownloadRequest) -> Result<()>;
}

/// Queue of accepted requests waiting for the downloader
#[derive(Clone, Default)]
pub struct DownloadQueue {
    pending: Arc<Mutex<Vec<DownloadRequest>>>,
}

impl DownloadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn pending(&self) -> Vec<DownloadRequest> {
        self.pending.lock().await.clone()
    }
}

#[async_trait]
impl DownloadDispatch for DownloadQueue {
    async fn dispatch(&self, request: DownloadRequest) -> Result<()> {
        tracing::info!(
            track_id = request.track.id,
            quality = request.tier.quality,
            tier = ?request.tier.key,
            file_name = %request.file_name,
            output_dir = %request.output_dir.display(),
            "Download queued"
        );
        self.pending.lock().await.push(request);
        Ok(())
    }
}
