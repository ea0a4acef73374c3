// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cardsync_core::{Document, Verb};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::db::{LocalStore, QueueItem, SyncQueue};
use crate::error::Result;
use crate::network::NetworkMonitor;
use crate::remote::{RemoteError, RemoteResult, RemoteStore};

/// Sync engine settings.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Period of the background drain.
    pub interval: Duration,
    /// Failures an item may accumulate before it is dropped.
    pub max_retries: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            interval: Duration::from_secs(30),
            max_retries: 5,
        }
    }
}

/// Why a drain did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Offline,
    AlreadyDraining,
}

/// What a completed drain did, by queue item id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Applied remotely and removed from the queue.
    pub flushed: Vec<String>,
    /// Failed and kept for the next drain.
    pub retried: Vec<String>,
    /// Failed past the retry limit and discarded.
    pub dropped: Vec<String>,
    /// Cache records marked synced after the pass.
    pub marked_synced: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrainOutcome {
    Skipped(SkipReason),
    Completed(DrainReport),
}

/// Resets the draining flag when a drain ends, however it ends.
struct DrainGuard<'a>(&'a AtomicBool);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drains the [`SyncQueue`] into a [`RemoteStore`].
pub struct SyncEngine<R: RemoteStore + ?Sized> {
    queue: Arc<SyncQueue>,
    store: Arc<LocalStore>,
    network: Arc<NetworkMonitor>,
    remote: Arc<R>,
    config: SyncConfig,
    draining: AtomicBool,
}

impl<R: RemoteStore + ?Sized> SyncEngine<R> {
    pub fn new(
        queue: Arc<SyncQueue>,
        store: Arc<LocalStore>,
        network: Arc<NetworkMonitor>,
        remote: Arc<R>,
        config: SyncConfig,
    ) -> Self {
        SyncEngine {
            queue,
            store,
            network,
            remote,
            config,
            draining: AtomicBool::new(false),
        }
    }

    /// Number of mutations waiting to be synced.
    pub fn pending_count(&self) -> Result<usize> {
        self.queue.len()
    }

    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Acquire)
    }

    /// Replay every queued mutation once, oldest first.
    ///
    /// Returns `Skipped` without touching the queue when offline or when
    /// another drain is in progress. If the network drops mid-pass, the
    /// remaining items are left untouched for the next drain.
    pub async fn drain(&self) -> Result<DrainOutcome> {
        if !self.network.is_online() {
            return Ok(DrainOutcome::Skipped(SkipReason::Offline));
        }
        if self
            .draining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(DrainOutcome::Skipped(SkipReason::AlreadyDraining));
        }
        let _guard = DrainGuard(&self.draining);

        let items = self.queue.peek_all()?;
        let mut report = DrainReport::default();
        let mut flushed: Vec<QueueItem> = Vec::new();
        let mut storage_error = None;

        for item in items {
            if !self.network.is_online() {
                tracing::debug!("went offline mid-drain, stopping");
                break;
            }

            let applied = self.apply(&item).await;
            if let Err(e) = self.settle(item, applied, &mut report, &mut flushed) {
                storage_error = Some(e);
                break;
            }
        }

        // Items already flushed are off the queue, so mark them even if the
        // pass was cut short.
        for item in &flushed {
            let kind = item.action.entity;
            if self.queue.has_pending(kind, &item.entity_id)? {
                continue;
            }
            if self.store.mark_synced(kind, &item.entity_id, item.timestamp)? {
                report.marked_synced += 1;
            }
        }

        if let Some(e) = storage_error {
            tracing::warn!(error = %e, flushed = report.flushed.len(), "drain interrupted");
            return Err(e);
        }

        tracing::info!(
            flushed = report.flushed.len(),
            retried = report.retried.len(),
            dropped = report.dropped.len(),
            "drain complete"
        );
        Ok(DrainOutcome::Completed(report))
    }

    /// Record the result of one replayed item in the queue and the report.
    fn settle(
        &self,
        item: QueueItem,
        applied: RemoteResult<()>,
        report: &mut DrainReport,
        flushed: &mut Vec<QueueItem>,
    ) -> Result<()> {
        match applied {
            Ok(()) => {
                self.queue.remove(&item.id)?;
                tracing::debug!(id = %item.id, "flushed");
                report.flushed.push(item.id.clone());
                flushed.push(item);
            }
            Err(e) => {
                let failures = self.queue.record_failure(&item.id)?;
                if failures > self.config.max_retries {
                    self.queue.remove(&item.id)?;
                    tracing::warn!(
                        id = %item.id,
                        failures,
                        error = %e,
                        "dropping mutation after repeated failures"
                    );
                    report.dropped.push(item.id);
                } else {
                    tracing::debug!(id = %item.id, failures, error = %e, "mutation failed, will retry");
                    report.retried.push(item.id);
                }
            }
        }
        Ok(())
    }

    async fn apply(&self, item: &QueueItem) -> RemoteResult<()> {
        let collection = item.action.entity.collection();
        let id = item.entity_id.as_str();
        match item.action.verb {
            Verb::Create => {
                let data = payload_document(item)?;
                self.remote.set_document(collection, id, data).await
            }
            Verb::Update => {
                let patch = payload_document(item)?;
                self.remote.update_document(collection, id, patch).await
            }
            Verb::Delete => self.remote.delete_document(collection, id).await,
        }
    }

    /// Drain on every interval tick and whenever the network comes back.
    ///
    /// A drain already running when `cancel` fires is finished first.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut online = self.network.watch();
        let mut tick = tokio::time::interval(self.config.interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tick.tick() => {}
                changed = online.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    if !*online.borrow_and_update() {
                        continue;
                    }
                    tracing::info!("back online, draining queue");
                }
            }

            if let Err(e) = self.drain().await {
                tracing::warn!(error = %e, "drain failed");
            }
        }
        tracing::debug!("sync loop stopped");
    }
}

fn payload_document(item: &QueueItem) -> RemoteResult<Document> {
    item.payload
        .as_object()
        .cloned()
        .ok_or_else(|| RemoteError::Rejected(format!("payload of {} is not an object", item.id)))
}
