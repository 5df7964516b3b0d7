use craftai::app::{AppState, Effect};
use craftai::cli::Cli;
use craftai::events::{AppEvent, EventHandler};
use craftai::input::{self, InputContext, OverlayMode};
use craftai::loader::Loader;
use craftai::source::{ItemSource, JsonFileSource, SampleSource};
use craftai::tui;

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

fn setup_verbose_logging() -> Result<()> {
    let state_dir = dirs_next_or_fallback();
    std::fs::create_dir_all(&state_dir)
        .map_err(|e| eyre!("Failed to create log directory {state_dir:?}: {e}"))?;
    let log_path = state_dir.join("debug.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| eyre!("Failed to open log file {log_path:?}: {e}"))?;
    tracing_subscriber::fmt()
        .with_writer(file)
        .with_ansi(false)
        .init();
    tracing::info!(
        "craftai v{} starting with verbose logging",
        env!("CARGO_PKG_VERSION")
    );
    Ok(())
}

fn dirs_next_or_fallback() -> std::path::PathBuf {
    if let Some(state) = std::env::var_os("XDG_STATE_HOME") {
        std::path::PathBuf::from(state).join("craftai")
    } else if let Some(home) = std::env::var_os("HOME") {
        std::path::PathBuf::from(home)
            .join(".local")
            .join("state")
            .join("craftai")
    } else {
        std::path::PathBuf::from("/tmp/craftai")
    }
}

fn spawn_monitored(
    tx: mpsc::UnboundedSender<AppEvent>,
    label: &'static str,
    fut: impl Future<Output = ()> + Send + 'static,
) {
    tokio::spawn(async move {
        let handle = tokio::spawn(fut);
        if let Err(join_err) = handle.await {
            let msg = if join_err.is_panic() {
                match join_err.into_panic().downcast::<String>() {
                    Ok(s) => *s,
                    Err(payload) => match payload.downcast::<&str>() {
                        Ok(s) => s.to_string(),
                        Err(_) => "unknown panic".to_string(),
                    },
                }
            } else {
                "task cancelled".to_string()
            };
            tracing::error!("{label} panicked: {msg}");
            if tx
                .send(AppEvent::Error(format!("{label} crashed: {msg}")))
                .is_err()
            {
                tracing::warn!("{label}: channel closed while reporting panic");
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();

    if args.verbose {
        setup_verbose_logging()?;
    }

    let source: Arc<dyn ItemSource> = match &args.data {
        Some(path) => {
            if !path.is_file() {
                eprintln!("Error: dataset {path:?} does not exist or is not a file");
                std::process::exit(1);
            }
            Arc::new(JsonFileSource::new(path))
        }
        None => Arc::new(SampleSource),
    };

    let mut state = AppState::new(args.app_config(source.describe()))?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        if let Err(e) = terminal::disable_raw_mode() {
            eprintln!("Failed to disable raw mode during panic: {e}");
        }
        if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, SetTitle("")) {
            eprintln!("Failed to leave alternate screen during panic: {e}");
        }
        original_hook(panic_info);
    }));

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle("craftai"))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let events = EventHandler::new(Duration::from_millis(100));
    let tx = events.sender();

    let (refresh_tx, refresh_rx) = mpsc::unbounded_channel();
    let loader = Loader::new(source, tx.clone(), refresh_rx, args.interval);
    spawn_monitored(tx.clone(), "loader", loader.run());

    let result = run_app(&mut terminal, &mut state, events, &refresh_tx).await;

    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, SetTitle(""))?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    mut events: EventHandler,
    refresh_tx: &mpsc::UnboundedSender<()>,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| tui::render::render(f, state))?;

        state.prune_notifications();
        state.prune_error();

        if let Some(event) = events.next().await {
            match event {
                AppEvent::Key(key) => {
                    let ctx = InputContext {
                        has_error: state.error.is_some(),
                        is_loading: state.is_loading(),
                        overlay: if state.overlay.is_some() {
                            OverlayMode::Detail
                        } else {
                            OverlayMode::None
                        },
                        editing_search: state.editing_search,
                    };
                    let action = input::map_key(key, &ctx);
                    if let Some(Effect::Refresh) = state.handle_action(action) {
                        tracing::debug!("manual refresh requested");
                        if refresh_tx.send(()).is_err() {
                            state.on_load_failed("Loader stopped; restart to reload".to_string());
                        }
                    }
                }
                AppEvent::Tick => {
                    if last_tick.elapsed() >= Duration::from_millis(100) {
                        if state.is_loading() {
                            state.advance_spinner();
                        }
                        last_tick = Instant::now();
                    }
                }
                AppEvent::LoadStarted => state.on_load_started(),
                AppEvent::Loaded { dataset, manual } => {
                    tracing::debug!(items = dataset.len(), manual, "dataset loaded");
                    state.on_loaded(dataset, manual);
                }
                AppEvent::LoadFailed(msg) => state.on_load_failed(msg),
                AppEvent::Error(msg) => state.on_error(msg),
            }
        }

        if state.should_quit {
            break;
        }
    }

    events.stop();
    Ok(())
}
