//! river-view — browse a site's rivers from the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐ FetchRequest ┌──────────┐ FetchMsg ┌──────────┐  draw()  ┌──────────┐
//! │  app.rs  │ ───────────► │ fetch.rs │ ───────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (outbox) │  (channel)   │ (tokio)  │ (channel)│ (apply)  │          │ (render) │
//! └──────────┘              └──────────┘          └──────────┘          └──────────┘
//!      ▲                         │
//!      │ handle_key_event()      │ RiverSource
//! ┌──────────┐              ┌──────────┐
//! │ input.rs │              │  river/  │
//! └──────────┘              └──────────┘
//! ```
//!
//! * **`river/`** — the `RiverSource` trait, manifest and river types, and
//!   the site source that reads them over HTTP or from disk.
//! * **`fetch`** — background runtime that performs requests concurrently.
//! * **`app`** — the view-model: rivers, selection, content, request tokens.
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to `App` mutations.
//! * **`config`** — command-line flags.
//! * **`main`** — wires everything together and runs the event loop.

mod app;
mod config;
mod fetch;
mod input;
mod river;
mod ui;

#[cfg(test)]
mod test_utils;

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc::error::SendError;
use tracing_subscriber::EnvFilter;

use app::App;
use config::Cli;
use river::{Location, RiverSource, SiteSource};

// ---------------------------------------------------------------------------
// RAII terminal guard
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the default hook prints the panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

/// Log to a file; stdout is the UI.  `RUST_LOG` overrides the `info` default.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    // -- data source and fetcher ---------------------------------------------
    let manifest = Location::parse(&cli.manifest)
        .with_context(|| format!("bad manifest location {:?}", cli.manifest))?;
    let source = SiteSource::new(manifest, cli.request_timeout())
        .context("failed to build HTTP client")?;
    tracing::info!(manifest = source.name(), "starting");

    let (requests, results) = fetch::spawn(Arc::new(source))?;

    // -- terminal setup ------------------------------------------------------
    install_panic_hook();
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new().with_refresh(cli.refresh_interval(), Instant::now());

    // -- main event loop -----------------------------------------------------
    // ~10 fps.  Each iteration:
    //   1. Send queued requests to the fetcher.
    //   2. Apply finished fetches.
    //   3. Queue a periodic refresh when due.
    //   4. Render.
    //   5. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        for request in app.take_requests() {
            if let Err(SendError(request)) = requests.send(request) {
                tracing::error!(?request, "fetcher is gone");
                app.request_failed(request);
            }
        }

        while let Ok(msg) = results.try_recv() {
            app.apply(msg);
        }

        app.tick(Instant::now());

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    tracing::info!("exiting");
    Ok(())
}
