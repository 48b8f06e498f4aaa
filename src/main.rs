//! Listing TUI - terminal client for listing appliance parts for sale
//!
//! A Ratatui-based TUI that walks a seller through the listing wizard,
//! keeps step drafts on disk between runs and submits the finished
//! listing to the marketplace's Supabase backend.

mod app;
mod backend;
mod config;
mod platform;
mod state;
mod ui;

use anyhow::{Context, Result};
use app::App;
use backend::{SessionWatch, SupabaseClient};
use config::TuiConfig;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use state::drafts::MemoryDraftStore;
use state::{DraftStore, FileDraftStore};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "listing_tui=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = TuiConfig::load().context("loading configuration")?;
    let mut app = build_app(config).await?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Handle any errors
    if let Err(err) = result {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

/// Wire the draft store, auth client and session watch into an [`App`]
async fn build_app(config: TuiConfig) -> Result<App> {
    let drafts: Box<dyn DraftStore> = match FileDraftStore::new(config.drafts_dir()) {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!(
                "Drafts directory {} unusable, keeping drafts in memory: {}",
                config.drafts_dir().display(),
                e
            );
            Box::new(MemoryDraftStore::new())
        }
    };

    let watch = SessionWatch::new();
    let session = watch.subscribe();
    let client = SupabaseClient::new(
        config.supabase_url.as_deref(),
        config.supabase_anon_key.clone(),
        Some(config.session_path()),
        watch,
    )?;
    client.restore_session().await;

    if config.supabase_url.is_none() {
        tracing::warn!("No supabase_url configured; sign-in and submission will fail");
    }

    let app = App::new(Arc::new(client), drafts, session, config);
    app.spawn_session_check();
    Ok(app)
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Apply session changes pushed by the auth client
        app.tick();

        // Draw the UI
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Remote work runs after the "submitting" state has been drawn
        if app.pending().is_some() {
            app.run_pending().await;
            continue;
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Global quit: Ctrl+C
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return Ok(());
                }

                // Handle key event
                app.handle_key(key).await?;
            }
        }

        // Check if app wants to quit
        if app.should_quit() {
            return Ok(());
        }
    }
}
