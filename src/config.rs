//! Where the client keeps its files, and environment overrides

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result};

const HOME_ENV: &str = "ECHOIR_HOME";
const SERVER_URL_ENV: &str = "ECHOIR_SERVER_URL";
const REGION_ENV: &str = "ECHOIR_REGION";
const APP_DIR_NAME: &str = "echoir-rs";
const FALLBACK_DIR: &str = ".echoir";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppPaths {
    pub data_dir: PathBuf,
}

impl AppPaths {
    /// `$ECHOIR_HOME`, else the platform data directory, else `./.echoir`
    pub fn resolve() -> Self {
        Self::from_sources(std::env::var_os(HOME_ENV), dirs::data_dir())
    }

    fn from_sources(home: Option<OsString>, platform_data_dir: Option<PathBuf>) -> Self {
        let data_dir = home
            .filter(|h| !h.is_empty())
            .map(PathBuf::from)
            .or_else(|| platform_data_dir.map(|d| d.join(APP_DIR_NAME)))
            .unwrap_or_else(|| PathBuf::from(FALLBACK_DIR));
        Self { data_dir }
    }

    pub fn settings_file(&self) -> PathBuf {
        self.data_dir.join("settings.json")
    }

    pub fn history_file(&self) -> PathBuf {
        self.data_dir.join("search_history.json")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("creating {}", self.data_dir.display()))
    }
}

/// Server URL forced from the environment, if any
pub fn server_url_override() -> Option<String> {
    non_blank(std::env::var(SERVER_URL_ENV).ok())
}

/// Search region forced from the environment, if any
pub fn region_override() -> Option<String> {
    non_blank(std::env::var(REGION_ENV).ok()).map(|r| r.to_uppercase())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
