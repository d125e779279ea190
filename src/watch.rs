//! Watch-session refresh loop.
//!
//! Periodic re-fetch of one asset with in-place line rewriting and
//! cooperative cancellation. There is deliberately no retry or backoff: a
//! failed cycle is logged, skipped and re-attempted at the same fixed
//! cadence.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::warn;

use crate::adapters::QuoteSource;
use crate::error::Result;
use crate::output;

/// Lifecycle of a watch session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// Created, loop not entered yet
    Idle,
    /// Loop is polling
    Running,
    /// Cancelled; the session never runs again
    Stopped,
}

impl std::fmt::Display for WatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatchState::Idle => write!(f, "idle"),
            WatchState::Running => write!(f, "running"),
            WatchState::Stopped => write!(f, "stopped"),
        }
    }
}

/// Sleep abstraction so the refresh cadence is testable without real delays
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// External cancellation signal for a watch session
pub struct StopSignal {
    requested: AtomicBool,
    tx: watch::Sender<bool>,
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            requested: AtomicBool::new(false),
            tx,
            rx,
        }
    }

    /// Request cancellation. Duplicate requests are ignored.
    pub fn stop(&self) {
        if self.requested.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.tx.send(true);
    }

    /// Whether cancellation has been requested
    pub fn is_stopped(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Resolve once cancellation is requested
    pub async fn wait_for_stop(&self) {
        let mut rx = self.rx.clone();
        while !*rx.borrow() {
            if rx.changed().await.is_err() {
                break;
            }
        }
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// One watch session over a single asset
pub struct WatchSession {
    asset_id: String,
    interval: Duration,
    state_tx: watch::Sender<WatchState>,
    state_rx: watch::Receiver<WatchState>,
}

impl WatchSession {
    /// Create an idle session. Non-positive intervals are normalized to 1s.
    pub fn new(asset_id: impl Into<String>, interval_secs: u64) -> Self {
        let (state_tx, state_rx) = watch::channel(WatchState::Idle);
        Self {
            asset_id: asset_id.into(),
            interval: Duration::from_secs(interval_secs.max(1)),
            state_tx,
            state_rx,
        }
    }

    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Current lifecycle state
    pub fn state(&self) -> WatchState {
        *self.state_rx.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.state() == WatchState::Running
    }

    /// Receiver for state transitions, for observers and tests
    pub fn state_receiver(&self) -> watch::Receiver<WatchState> {
        self.state_rx.clone()
    }

    /// Drive the loop until cancelled. Consumes the session: the loop is
    /// entered at most once and the session ends in `Stopped`, with exactly
    /// one termination notice written.
    pub async fn run(
        self,
        source: &dyn QuoteSource,
        sleeper: &dyn Sleeper,
        stop: &StopSignal,
        w: &mut dyn Write,
        symbol: &str,
    ) -> Result<()> {
        let _ = self.state_tx.send(WatchState::Running);
        let outcome = self.refresh_cycles(source, sleeper, stop, w, symbol).await;
        let _ = self.state_tx.send(WatchState::Stopped);
        output::print_watch_stopped(w)?;
        outcome
    }

    async fn refresh_cycles(
        &self,
        source: &dyn QuoteSource,
        sleeper: &dyn Sleeper,
        stop: &StopSignal,
        w: &mut dyn Write,
        symbol: &str,
    ) -> Result<()> {
        loop {
            if stop.is_stopped() {
                return Ok(());
            }

            // Cancellation races the in-flight request; the pending future
            // is dropped on the spot.
            tokio::select! {
                fetched = source.fetch_quote(&self.asset_id) => match fetched {
                    Ok(quote) => output::print_watch_line(w, &self.asset_id, &quote, symbol)?,
                    // Absorbed: the render is skipped and the cadence continues.
                    Err(e) => warn!(asset = %self.asset_id, error = %e, "refresh failed"),
                },
                _ = stop.wait_for_stop() => return Ok(()),
            }

            tokio::select! {
                _ = sleeper.sleep(self.interval) => {}
                _ = stop.wait_for_stop() => return Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_state_display() {
        assert_eq!(WatchState::Idle.to_string(), "idle");
        assert_eq!(WatchState::Running.to_string(), "running");
        assert_eq!(WatchState::Stopped.to_string(), "stopped");
    }

    #[test]
    fn test_interval_normalized_to_minimum() {
        let session = WatchSession::new("bitcoin", 0);
        assert_eq!(session.interval(), Duration::from_secs(1));

        let session = WatchSession::new("bitcoin", 30);
        assert_eq!(session.interval(), Duration::from_secs(30));
    }

    #[test]
    fn test_session_starts_idle() {
        let session = WatchSession::new("bitcoin", 30);
        assert_eq!(session.state(), WatchState::Idle);
        assert!(!session.is_running());
        assert_eq!(session.asset_id(), "bitcoin");
    }

    #[tokio::test]
    async fn test_stop_is_idempotent_and_observable() {
        let stop = StopSignal::new();
        assert!(!stop.is_stopped());

        stop.stop();
        stop.stop();
        assert!(stop.is_stopped());

        // Resolves immediately once requested.
        stop.wait_for_stop().await;
    }
}
