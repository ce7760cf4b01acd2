//! HTTP client for the catalog search service

use async_trait::async_trait;

use super::content::SearchResult;
use super::errors::SearchError;
use super::settings::SettingsStore;
use super::types::SearchType;

/// Catalog search service
#[async_trait]
pub trait SearchApi: Send + Sync {
    async fn search(&self, query: &str, search_type: SearchType) -> Result<Vec<SearchResult>, SearchError>;

    async fn get_album_tracks(&self, album_id: i64) -> Result<Vec<SearchResult>, SearchError>;
}

/// Search service client. Server URL and region are read from settings on
/// every request, so edits take effect immediately.
#[derive(Clone)]
pub struct EchoirClient {
    http: reqwest::Client,
    settings: SettingsStore,
}

impl EchoirClient {
    pub fn new(settings: SettingsStore) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }

    async fn get_results(&self, path: &str, params: &[(&str, String)]) -> Result<Vec<SearchResult>, SearchError> {
        let server_url = self.settings.server_url().await;
        let region = self.settings.region().await;
        let url = format!("{}/{}", server_url.trim_end_matches('/'), path);

        tracing::debug!(url = %url, ?params, "API request started");

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("country", region)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(url = %url, status = status.as_u16(), "API request failed");
            return Err(SearchError::Server {
                status: status.as_u16(),
                message: if message.is_empty() {
                    status.canonical_reason().unwrap_or("unknown").to_string()
                } else {
                    message
                },
            });
        }

        let results: Vec<SearchResult> = response.json().await?;
        tracing::info!(url = %url, results = results.len(), "API request successful");
        Ok(results)
    }
}

#[async_trait]
impl SearchApi for EchoirClient {
    async fn search(&self, query: &str, search_type: SearchType) -> Result<Vec<SearchResult>, SearchError> {
        self.get_results(
            "search",
            &[
                ("query", query.to_string()),
                ("type", search_type.as_param().to_string()),
            ],
        )
        .await
    }

    async fn get_album_tracks(&self, album_id: i64) -> Result<Vec<SearchResult>, SearchError> {
        self.get_results("album/tracks", &[("id", album_id.to_string())]).await
    }
}
