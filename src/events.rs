//! Terminal input thread and application event channel.
//!
//! `crossterm::event::poll()` blocks, so input is read on a dedicated OS thread
//! and forwarded over the same channel the loader uses. Dropping the handler only
//! raises the shutdown flag; the thread notices on its next poll tick.

use crate::source::Dataset;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    /// An automatic reload began. Manual reloads are counted when requested.
    LoadStarted,
    Loaded {
        dataset: Dataset,
        /// `true` when the user asked for the reload.
        manual: bool,
    },
    /// A reload finished with an error.
    LoadFailed(String),
    /// Global toast, auto-dismisses after `ERROR_TTL_SECS`.
    Error(String),
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    tx: mpsc::UnboundedSender<AppEvent>,
    shutdown: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let input_tx = tx.clone();
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = shutdown.clone();

        let thread = std::thread::spawn(move || read_terminal(&input_tx, &flag, tick_rate));

        Self {
            rx,
            tx,
            shutdown,
            thread: Some(thread),
        }
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.tx.clone()
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }

    pub fn stop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                tracing::error!("input thread panicked");
            }
        }
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

fn read_terminal(tx: &mpsc::UnboundedSender<AppEvent>, shutdown: &AtomicBool, tick_rate: Duration) {
    while !shutdown.load(Ordering::Relaxed) {
        let ready = match event::poll(tick_rate) {
            Ok(ready) => ready,
            Err(e) => {
                let _ = tx.send(AppEvent::Error(format!("Terminal poll error: {e}")));
                return;
            }
        };
        if !ready {
            if tx.send(AppEvent::Tick).is_err() {
                return;
            }
            continue;
        }
        match event::read() {
            Ok(CrosstermEvent::Key(key)) => {
                if tx.send(AppEvent::Key(key)).is_err() {
                    return;
                }
            }
            // EINTR: retry
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => {
                let _ = tx.send(AppEvent::Error(format!("Terminal read error: {e}")));
                return;
            }
            // Resize is picked up by the redraw after the next tick.
            Ok(_) => {}
        }
    }
}
