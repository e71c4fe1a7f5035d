//! # Save Queue
//!
//! Writes happen off the event loop. The loop pushes a full snapshot after
//! every change and moves on without waiting.
//!
//! ```text
//! event loop ──snapshot──▶ mpsc ──▶ worker task ──▶ Persistence::save
//!     ▲                                  │
//!     └──── Action::SaveFailed ──────────┘ (after the last retry)
//! ```
//!
//! A single worker drains the channel, so writes land in the order they were
//! queued and the newest snapshot is always the one left on disk. When several
//! snapshots pile up behind a slow write, only the latest is written.
//!
//! A failed write is retried with doubling delays, each retry writing the
//! newest snapshot queued so far. Each failure is logged. If every attempt
//! fails, the UI is told through its action channel, and told again once a
//! later write goes through.

use std::sync::mpsc as std_mpsc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::action::Action;
use crate::core::model::ListCollection;
use crate::storage::persistence::Persistence;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts per snapshot, including the first.
    pub attempts: u32,
    /// Delay before the first retry. Doubles after each failure.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_millis(200),
        }
    }
}

pub struct SaveQueue {
    tx: mpsc::UnboundedSender<ListCollection>,
    worker: JoinHandle<()>,
}

impl SaveQueue {
    /// Start the worker. Must be called from within a tokio runtime.
    pub fn spawn(
        persistence: Persistence,
        policy: RetryPolicy,
        notify: std_mpsc::Sender<Action>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(persistence, policy, rx, notify));
        info!(
            "Save queue started ({} attempt(s), {:?} backoff)",
            policy.attempts, policy.backoff
        );
        Self { tx, worker }
    }

    /// Queue a snapshot. Returns immediately.
    pub fn enqueue(&self, lists: ListCollection) {
        if self.tx.send(lists).is_err() {
            warn!("Save queue worker is gone; snapshot dropped");
        }
    }

    /// Stop accepting snapshots and wait until everything queued is written.
    pub async fn shutdown(self) {
        let Self { tx, worker } = self;
        drop(tx);
        if let Err(e) = worker.await {
            warn!("Save queue worker ended abnormally: {}", e);
        }
        info!("Save queue drained");
    }
}

async fn run_worker(
    persistence: Persistence,
    policy: RetryPolicy,
    mut rx: mpsc::UnboundedReceiver<ListCollection>,
    notify: std_mpsc::Sender<Action>,
) {
    // Set while the UI is showing a save failure
    let mut failure_reported = false;

    while let Some(mut latest) = rx.recv().await {
        coalesce(&mut rx, &mut latest);

        let status = match save_with_retry(&persistence, &mut rx, latest, policy).await {
            Ok(()) if failure_reported => {
                info!("Saving works again");
                failure_reported = false;
                Some(Action::SaveRecovered)
            }
            Ok(()) => None,
            Err(reason) => {
                failure_reported = true;
                Some(Action::SaveFailed(reason))
            }
        };
        if let Some(action) = status
            && notify.send(action).is_err()
        {
            warn!("Failed to report save status: receiver dropped");
        }
    }
}

/// Replace `latest` with the newest snapshot already waiting in `rx`.
fn coalesce(rx: &mut mpsc::UnboundedReceiver<ListCollection>, latest: &mut ListCollection) {
    let mut skipped = 0usize;
    while let Ok(newer) = rx.try_recv() {
        *latest = newer;
        skipped += 1;
    }
    if skipped > 0 {
        debug!("Coalesced {} stale snapshot(s)", skipped);
    }
}

async fn save_with_retry(
    persistence: &Persistence,
    rx: &mut mpsc::UnboundedReceiver<ListCollection>,
    mut lists: ListCollection,
    policy: RetryPolicy,
) -> Result<(), String> {
    let attempts = policy.attempts.max(1);
    let mut delay = policy.backoff;
    let mut attempt = 1;
    loop {
        match persistence.save(&lists).await {
            Ok(()) => return Ok(()),
            Err(e) if attempt < attempts => {
                warn!(
                    "Save attempt {}/{} failed: {}; retrying in {:?}",
                    attempt, attempts, e, delay
                );
                tokio::time::sleep(delay).await;
                // Retry with whatever the UI queued in the meantime
                coalesce(rx, &mut lists);
                delay = delay.saturating_mul(2);
                attempt += 1;
            }
            Err(e) => {
                warn!("Save failed after {} attempt(s): {}", attempts, e);
                return Err(e.to_string());
            }
        }
    }
}
