//! Run orchestration: fetch, detect, notify, persist.

use crate::detect::{detect, Change};
use crate::format;
use crate::normalize;
use crate::notify::NotificationSink;
use crate::source::FlightSource;
use crate::store::{StatusStore, StoreError};
use crate::types::{ChangeKey, FlightId, KeyPolicy};
use chrono::Utc;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    /// Losing the updated state would re-notify every change on the next
    /// run, so this is the one per-run failure surfaced to the caller.
    #[error("Failed to persist state: {0}")]
    Persist(#[from] StoreError),
}

/// Aggregate outcome of one run over the configured flight set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Flights that changed and were notified.
    pub changed: usize,
    /// Flights fetched successfully with no notification-worthy change.
    pub unchanged: usize,
    /// Flights the provider had no record for.
    pub not_found: usize,
    /// Flights whose fetch failed; retried on the next run.
    pub fetch_failed: usize,
    /// Flights whose notification could not be delivered; retried on the
    /// next run because their stored key was left untouched.
    pub delivery_failed: usize,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "changed={}, unchanged={}, not_found={}, fetch_failed={}, delivery_failed={}",
            self.changed, self.unchanged, self.not_found, self.fetch_failed, self.delivery_failed
        )
    }
}

/// Cumulative counters across watch ticks.
#[derive(Debug, Default)]
pub struct MonitorStats {
    pub runs: AtomicU64,
    pub notifications_sent: AtomicU64,
    pub fetch_errors: AtomicU64,
    pub delivery_errors: AtomicU64,
}

impl MonitorStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            runs: self.runs.load(Ordering::Relaxed),
            notifications_sent: self.notifications_sent.load(Ordering::Relaxed),
            fetch_errors: self.fetch_errors.load(Ordering::Relaxed),
            delivery_errors: self.delivery_errors.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatsSnapshot {
    pub runs: u64,
    pub notifications_sent: u64,
    pub fetch_errors: u64,
    pub delivery_errors: u64,
}

/// Configuration for the monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Flights checked each run; fixed for the monitor's lifetime.
    pub flights: Vec<FlightId>,
    /// Fields that make a change notification-worthy.
    pub key_policy: KeyPolicy,
}

impl MonitorConfig {
    pub fn new(flights: Vec<FlightId>) -> Self {
        Self {
            flights,
            key_policy: KeyPolicy::default(),
        }
    }

    pub fn with_key_policy(mut self, policy: KeyPolicy) -> Self {
        self.key_policy = policy;
        self
    }
}

/// Orchestrates checking runs over the configured flight set.
pub struct Monitor<S, N> {
    source: S,
    sink: N,
    store: StatusStore,
    config: MonitorConfig,
    stats: Arc<MonitorStats>,
}

impl<S: FlightSource, N: NotificationSink> Monitor<S, N> {
    pub fn new(source: S, sink: N, store: StatusStore, config: MonitorConfig) -> Self {
        Self {
            source,
            sink,
            store,
            config,
            stats: Arc::new(MonitorStats::new()),
        }
    }

    pub fn stats(&self) -> Arc<MonitorStats> {
        Arc::clone(&self.stats)
    }

    pub fn store(&self) -> &StatusStore {
        &self.store
    }

    /// Execute one full run: fetch, detect, notify and persist.
    ///
    /// Per-flight failures are isolated; a flight whose fetch or delivery
    /// fails keeps its stored key untouched and is retried naturally on
    /// the next run. The state file is written at most once, and only if
    /// something was notified.
    pub async fn run_once(&mut self) -> Result<RunReport, MonitorError> {
        let mut report = RunReport::default();
        let mut dirty = false;
        let generated_at = Utc::now();
        let flights = self.config.flights.clone();

        for id in flights {
            let raw = match self.source.fetch(&id).await {
                Ok(Some(raw)) => raw,
                Ok(None) => {
                    tracing::info!("{}: no record from provider", id);
                    report.not_found += 1;
                    continue;
                }
                Err(e) => {
                    tracing::warn!("{}: fetch failed: {}", id, e);
                    self.stats.fetch_errors.fetch_add(1, Ordering::Relaxed);
                    report.fetch_failed += 1;
                    continue;
                }
            };

            let snapshot = normalize::normalize(&raw);
            let next = ChangeKey::build(&snapshot, &self.config.key_policy);

            if let Change::Unchanged = detect(self.store.get(&id), &next) {
                tracing::debug!("{}: unchanged ({})", id, next);
                report.unchanged += 1;
                continue;
            }

            let message = format::render(&id, &snapshot, generated_at);
            match self.sink.deliver(&message).await {
                Ok(()) => {
                    tracing::info!(
                        "{}: notified, status {}",
                        id,
                        snapshot.status.as_deref().unwrap_or("?")
                    );
                    self.store.insert(id, next);
                    dirty = true;
                    report.changed += 1;
                    self.stats
                        .notifications_sent
                        .fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    tracing::warn!("{}: delivery failed, retrying next run: {}", id, e);
                    self.stats.delivery_errors.fetch_add(1, Ordering::Relaxed);
                    report.delivery_failed += 1;
                }
            }
        }

        if dirty {
            self.store.save()?;
            tracing::debug!("Persisted {} entries", self.store.len());
        }

        self.stats.runs.fetch_add(1, Ordering::Relaxed);
        Ok(report)
    }
}
