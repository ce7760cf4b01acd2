mod config;
mod controller;
mod logging;
mod model;
mod view;

use std::io;
use std::sync::Arc;
use anyhow::Result;
use std::time::Duration;
use tokio::sync::Mutex;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use config::AppPaths;
use controller::{AppController, SearchSession};
use model::{
    AppModel, CodecCapabilityProbe, DownloadQueue, EchoirClient, SearchHistoryStore, SettingsStore,
};
use view::{AppView, ViewSnapshot};

#[tokio::main]
async fn main() -> Result<()> {
    let paths = AppPaths::resolve();
    paths.ensure_dirs()?;

    if let Err(e) = logging::init_logging(&paths.log_dir()) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!(data_dir = %paths.data_dir.display(), "=== echoir-rs starting ===");

    let settings = SettingsStore::load(paths.settings_file()).await?;
    if let Some(url) = config::server_url_override() {
        tracing::info!(server_url = %url, "Server URL taken from environment");
        settings.set_server_url(&url).await?;
    }
    if let Some(region) = config::region_override() {
        tracing::info!(region = %region, "Region taken from environment");
        settings.set_region(region).await?;
    }

    let history = match SearchHistoryStore::load(paths.history_file()).await {
        Ok(history) => history,
        Err(e) => {
            tracing::warn!(error = %e, "Search history unreadable, starting empty");
            SearchHistoryStore::in_memory()
        }
    };

    let probe = Arc::new(CodecCapabilityProbe::system());
    let client = Arc::new(EchoirClient::new(settings.clone()));
    let session = SearchSession::new(client, settings.clone(), history, probe.clone());
    session.start_preference_listener().await;

    let model = Arc::new(Mutex::new(AppModel::new()));
    let downloads = DownloadQueue::new();
    let controller = AppController::new(
        model.clone(),
        session.clone(),
        settings.clone(),
        Arc::new(downloads.clone()),
    );

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model, controller, &settings, &probe, &downloads).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    session.stop_preference_listener().await;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("echoir-rs shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
    settings: &SettingsStore,
    probe: &CodecCapabilityProbe,
    downloads: &DownloadQueue,
) -> io::Result<()> {
    loop {
        controller.sync_selections().await;

        // Get current state
        let (ui_state, should_quit) = {
            let model_guard = model.lock().await;

            model_guard.auto_clear_old_notices().await;

            (model_guard.get_ui_state().await, model_guard.should_quit().await)
        };

        let snapshot = ViewSnapshot {
            search: controller.session().snapshot().await,
            ui_state,
            history: controller.session().recent_history().await,
            server_url: settings.server_url().await,
            queued: downloads.pending().await.len(),
        };

        // Draw UI
        terminal.draw(|f| {
            AppView::render(f, &snapshot, probe);
        })?;

        // Short poll keeps Loading and notices responsive
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }

        if should_quit {
            break;
        }
    }

    Ok(())
}
