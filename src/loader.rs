//! Background data loading with optional periodic reload and exponential backoff.
//!
//! The loader fetches once at startup, then waits for either a manual refresh
//! request or, when a reload interval is configured, the next tick. A failed fetch
//! is retried after `base × 2^failures` seconds, capped at `MAX_BACKOFF_SECS`,
//! even when periodic reload is off. The delay resets after the next success.
//!
//! Every automatic fetch is announced with `LoadStarted` and every fetch ends with
//! exactly one `Loaded` or `LoadFailed`, so the UI's in-flight count stays balanced.

use crate::events::AppEvent;
use crate::source::ItemSource;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{self, Duration};

const MAX_BACKOFF_SECS: u64 = 300;

/// Retry base when periodic reload is disabled.
const RETRY_BASE_SECS: u64 = 2;

/// `min(base_interval * 2^failures, MAX_BACKOFF_SECS)`, never below one second.
pub fn backoff_delay(base_interval: u64, failures: u32) -> u64 {
    let multiplier = 1u64.checked_shl(failures).unwrap_or(u64::MAX);
    base_interval
        .saturating_mul(multiplier)
        .clamp(1, MAX_BACKOFF_SECS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadOutcome {
    Success,
    Failure,
    ChannelClosed,
}

pub struct Loader {
    source: Arc<dyn ItemSource>,
    tx: mpsc::UnboundedSender<AppEvent>,
    refresh_rx: mpsc::UnboundedReceiver<()>,
    /// Seconds between automatic reloads; 0 disables them.
    interval: u64,
}

impl Loader {
    pub fn new(
        source: Arc<dyn ItemSource>,
        tx: mpsc::UnboundedSender<AppEvent>,
        refresh_rx: mpsc::UnboundedReceiver<()>,
        interval: u64,
    ) -> Self {
        Self {
            source,
            tx,
            refresh_rx,
            interval,
        }
    }

    pub async fn run(mut self) {
        let mut failures: u32 = 0;

        match self.load_once(false).await {
            LoadOutcome::Success => {}
            LoadOutcome::Failure => failures = 1,
            LoadOutcome::ChannelClosed => return,
        }

        loop {
            let base = if self.interval > 0 {
                self.interval
            } else {
                RETRY_BASE_SECS
            };
            let timed = self.interval > 0 || failures > 0;
            let delay = if failures > 0 {
                backoff_delay(base, failures)
            } else {
                base
            };

            let manual = tokio::select! {
                () = time::sleep(Duration::from_secs(delay)), if timed => false,
                request = self.refresh_rx.recv() => match request {
                    Some(()) => true,
                    None => return,
                },
            };

            match self.load_once(manual).await {
                LoadOutcome::Success => failures = 0,
                LoadOutcome::Failure => {
                    failures = failures.saturating_add(1);
                    let next = backoff_delay(base, failures);
                    tracing::warn!(failures, next, "load failed, backing off");
                }
                LoadOutcome::ChannelClosed => return,
            }
        }
    }

    async fn load_once(&self, manual: bool) -> LoadOutcome {
        // Manual reloads were already counted when the key was handled.
        if !manual && self.tx.send(AppEvent::LoadStarted).is_err() {
            tracing::warn!("loader: channel closed");
            return LoadOutcome::ChannelClosed;
        }
        let event = match self.source.fetch().await {
            Ok(dataset) => AppEvent::Loaded { dataset, manual },
            Err(e) => {
                AppEvent::LoadFailed(format!("Load from {} failed: {e}", self.source.describe()))
            }
        };
        let failed = matches!(event, AppEvent::LoadFailed(_));
        if self.tx.send(event).is_err() {
            tracing::warn!("loader: channel closed");
            return LoadOutcome::ChannelClosed;
        }
        if failed {
            LoadOutcome::Failure
        } else {
            LoadOutcome::Success
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{sample_dataset, Dataset};
    use async_trait::async_trait;
    use color_eyre::eyre::{eyre, Result};
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FlakySource {
        calls: AtomicU32,
        fail_first: u32,
    }

    #[async_trait]
    impl ItemSource for FlakySource {
        fn describe(&self) -> String {
            "flaky".to_string()
        }

        async fn fetch(&self) -> Result<Dataset> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.fail_first {
                Err(eyre!("backend unavailable"))
            } else {
                Ok(sample_dataset())
            }
        }
    }

    #[test]
    fn backoff_doubles() {
        assert_eq!(backoff_delay(2, 0), 2);
        assert_eq!(backoff_delay(2, 1), 4);
        assert_eq!(backoff_delay(2, 3), 16);
    }

    #[test]
    fn backoff_is_capped() {
        assert_eq!(backoff_delay(10, 10), MAX_BACKOFF_SECS);
        assert_eq!(backoff_delay(10, 200), MAX_BACKOFF_SECS);
    }

    #[test]
    fn backoff_never_zero() {
        assert_eq!(backoff_delay(0, 0), 1);
    }

    #[tokio::test]
    async fn initial_load_is_sent() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (_refresh_tx, refresh_rx) = mpsc::unbounded_channel();
        let source = Arc::new(FlakySource {
            calls: AtomicU32::new(0),
            fail_first: 0,
        });
        tokio::spawn(Loader::new(source, tx, refresh_rx, 0).run());
        assert!(matches!(rx.recv().await, Some(AppEvent::LoadStarted)));
        match rx.recv().await {
            Some(AppEvent::Loaded { dataset, manual }) => {
                assert!(!manual);
                assert_eq!(dataset.tasks.len(), 30);
            }
            other => panic!("expected Loaded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn manual_refresh_is_flagged() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (refresh_tx, refresh_rx) = mpsc::unbounded_channel();
        let source = Arc::new(FlakySource {
            calls: AtomicU32::new(0),
            fail_first: 0,
        });
        tokio::spawn(Loader::new(source, tx, refresh_rx, 0).run());
        assert!(matches!(rx.recv().await, Some(AppEvent::LoadStarted)));
        assert!(matches!(rx.recv().await, Some(AppEvent::Loaded { manual: false, .. })));
        refresh_tx.send(()).unwrap();
        // No LoadStarted: the key handler already counted this one.
        assert!(matches!(rx.recv().await, Some(AppEvent::Loaded { manual: true, .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn periodic_reload_announces_start() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (_refresh_tx, refresh_rx) = mpsc::unbounded_channel();
        let source = Arc::new(FlakySource {
            calls: AtomicU32::new(0),
            fail_first: 0,
        });
        tokio::spawn(Loader::new(source, tx, refresh_rx, 5).run());
        assert!(matches!(rx.recv().await, Some(AppEvent::LoadStarted)));
        assert!(matches!(rx.recv().await, Some(AppEvent::Loaded { manual: false, .. })));
        assert!(matches!(rx.recv().await, Some(AppEvent::LoadStarted)));
        assert!(matches!(rx.recv().await, Some(AppEvent::Loaded { manual: false, .. })));
    }

    #[tokio::test]
    async fn failure_reports_error() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (_refresh_tx, refresh_rx) = mpsc::unbounded_channel();
        let source = Arc::new(FlakySource {
            calls: AtomicU32::new(0),
            fail_first: 1,
        });
        tokio::spawn(Loader::new(source, tx, refresh_rx, 0).run());
        assert!(matches!(rx.recv().await, Some(AppEvent::LoadStarted)));
        match rx.recv().await {
            Some(AppEvent::LoadFailed(msg)) => {
                assert!(msg.contains("flaky"));
                assert!(msg.contains("backend unavailable"));
            }
            other => panic!("expected LoadFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn stops_when_refresh_sender_dropped() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (refresh_tx, refresh_rx) = mpsc::unbounded_channel::<()>();
        let source = Arc::new(FlakySource {
            calls: AtomicU32::new(0),
            fail_first: 0,
        });
        let handle = tokio::spawn(Loader::new(source, tx, refresh_rx, 0).run());
        let _ = rx.recv().await;
        drop(refresh_tx);
        handle.await.unwrap();
    }
}
