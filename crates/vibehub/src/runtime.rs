#![forbid(unsafe_code)]

//! Terminal host loop.
//!
//! Owns the terminal session and the presenter, feeds input and time into
//! [`AppModel`], and redraws only when the model reports a change.

use std::io::{self, BufWriter};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use vibe_catalog::PromptRepository;
use vibe_core::{Event, MonotonicClock};
use vibe_fx::{CpuSurfaceProvider, SurfaceProvider, UnavailableSurfaceProvider};
use vibe_render::{Buffer, Cell, Presenter};

use crate::app::{AppConfig, AppModel};
use crate::cli::Opts;
use crate::clipboard::Osc52Clipboard;
use crate::error::AppError;
use crate::theme;

/// Load the catalog named on the command line, or the embedded one.
pub fn load_catalog(path: Option<&Path>) -> Result<PromptRepository, AppError> {
    match path {
        Some(path) => Ok(PromptRepository::from_path(path)?),
        None => {
            let repo = PromptRepository::builtin()?;
            tracing::info!(prompts = repo.len(), "builtin catalog loaded");
            Ok(repo)
        }
    }
}

/// Startup settings derived from the options.
#[must_use]
pub fn app_config(opts: &Opts) -> AppConfig {
    AppConfig {
        fps: opts.fps,
        seed: opts.seed.unwrap_or_else(time_seed),
        skip_boot: opts.skip_boot,
        exit_after: (opts.exit_after_ms > 0).then(|| Duration::from_millis(opts.exit_after_ms)),
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(AppConfig::default().seed, |d| d.as_nanos() as u64)
}

fn surfaces(opts: &Opts) -> Box<dyn SurfaceProvider> {
    if opts.no_background {
        Box::new(UnavailableSurfaceProvider)
    } else {
        Box::new(CpuSurfaceProvider::new())
    }
}

/// Run the app until it quits. The terminal is restored on every exit path.
pub fn run(opts: &Opts) -> Result<(), AppError> {
    let repo = Arc::new(load_catalog(opts.catalog.as_deref())?);
    let config = app_config(opts);

    let session = crate::terminal::TerminalSession::new()?;
    let size = session.size()?;
    tracing::debug!(?size, ?config, "terminal session ready");

    let clipboard = Box::new(Osc52Clipboard::from_env(io::stdout()));
    let mut app = AppModel::new(
        repo,
        config,
        MonotonicClock::new(),
        surfaces(opts),
        clipboard,
        size,
    );
    let mut presenter = Presenter::new(BufWriter::new(io::stdout()));
    let mut frame = Buffer::new(size, Cell::blank(theme::DEPTH));

    app.start();
    let result = event_loop(&session, &mut app, &mut presenter, &mut frame);
    app.shutdown();
    drop(session);
    result
}

fn event_loop(
    session: &crate::terminal::TerminalSession,
    app: &mut AppModel<MonotonicClock>,
    presenter: &mut Presenter<BufWriter<io::Stdout>>,
    frame: &mut Buffer,
) -> Result<(), AppError> {
    let mut dirty = true;
    let mut frames: u64 = 0;
    while !app.should_quit() {
        if dirty {
            app.view(frame);
            let stats = presenter.present(frame)?;
            frames += 1;
            tracing::trace!(cells = stats.cells, full = stats.full, "frame presented");
            dirty = false;
        }

        let timeout = app
            .time_until_next()
            .map_or(app.frame_interval(), |t| t.min(app.frame_interval()));
        if session.poll_event(timeout)? {
            loop {
                if let Some(event) = session.read_event()? {
                    if matches!(event, Event::Resize { .. }) {
                        presenter.invalidate();
                    }
                    dirty |= app.handle_event(event);
                }
                if app.should_quit() || !session.poll_event(Duration::ZERO)? {
                    break;
                }
            }
        }
        dirty |= app.tick();
    }
    tracing::info!(frames, "event loop finished");
    Ok(())
}
