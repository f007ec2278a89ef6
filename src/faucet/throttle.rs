//! Per-requester cool-down cache.
//!
//! A reservation is taken before the backend is contacted, so two
//! concurrent claims from one requester cannot both reach the wallet.

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time;

use crate::clock::Clock;
use crate::faucet::types::ThrottleEntry;
use crate::observability::metrics;

/// Result of [`ThrottleCache::try_reserve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
    Granted { expires_at: DateTime<Utc> },
    Denied { retry_not_before: DateTime<Utc> },
}

/// A thread-safe map of requester -> cool-down entry.
pub struct ThrottleCache {
    entries: DashMap<String, ThrottleEntry>,
    cooldown: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl ThrottleCache {
    /// Create an empty cache with a fixed cool-down window.
    pub fn new(cooldown: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            cooldown: chrono::Duration::from_std(cooldown).unwrap_or(chrono::Duration::MAX),
            clock,
        }
    }

    /// Reserve a claim slot for `requester`.
    ///
    /// Check and insert happen under the same shard lock. An entry that has
    /// expired but not yet been swept is replaced.
    pub fn try_reserve(&self, requester: &str) -> Reservation {
        let now = self.clock.now();
        let fresh = || ThrottleEntry {
            requester: requester.to_string(),
            last_granted_at: now,
            expires_at: now + self.cooldown,
        };

        let reservation = match self.entries.entry(requester.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_live(now) {
                    Reservation::Denied {
                        retry_not_before: occupied.get().expires_at,
                    }
                } else {
                    let entry = fresh();
                    let expires_at = entry.expires_at;
                    occupied.insert(entry);
                    Reservation::Granted { expires_at }
                }
            }
            Entry::Vacant(vacant) => {
                let entry = fresh();
                let expires_at = entry.expires_at;
                vacant.insert(entry);
                Reservation::Granted { expires_at }
            }
        };

        // Stored, not live: expired entries count until swept.
        metrics::record_throttle_entries(self.len());
        reservation
    }

    /// Drop the reservation for `requester`. Returns whether one existed.
    pub fn release(&self, requester: &str) -> bool {
        let removed = self.entries.remove(requester).is_some();
        metrics::record_throttle_entries(self.entries.len());
        removed
    }

    /// Live entry for `requester`, if any.
    pub fn get(&self, requester: &str) -> Option<ThrottleEntry> {
        let now = self.clock.now();
        self.entries
            .get(requester)
            .map(|r| r.value().clone())
            .filter(|e| e.is_live(now))
    }

    /// Remove every expired entry. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let keep = entry.is_live(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        metrics::record_throttle_entries(self.entries.len());
        removed
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sweep expired entries every `interval` until shutdown.
    pub async fn run_sweeper(
        self: Arc<Self>,
        interval: Duration,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        tracing::info!(interval_secs = interval.as_secs(), "Throttle sweeper starting");

        let mut ticker = time::interval(interval);
        // The first tick completes immediately; nothing can have expired yet.
        ticker.tick().await;

        loop {
            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    tracing::info!("Throttle sweeper received shutdown signal, exiting loop");
                    break;
                }
                _ = ticker.tick() => {
                    let removed = self.sweep_expired();
                    if removed > 0 {
                        tracing::debug!(removed, remaining = self.len(), "Swept expired throttle entries");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::lifecycle::Shutdown;

    const COOLDOWN: Duration = Duration::from_secs(120);

    fn cache() -> (Arc<ThrottleCache>, ManualClock) {
        let clock = ManualClock::default();
        let cache = Arc::new(ThrottleCache::new(COOLDOWN, Arc::new(clock.clone())));
        (cache, clock)
    }

    #[test]
    fn test_second_reservation_denied() {
        let (cache, clock) = cache();
        let start = clock.now();

        let first = cache.try_reserve("r1");
        let expected = start + chrono::Duration::seconds(120);
        assert_eq!(first, Reservation::Granted { expires_at: expected });

        clock.advance(chrono::Duration::seconds(30));
        let second = cache.try_reserve("r1");
        assert_eq!(second, Reservation::Denied { retry_not_before: expected });
    }

    #[test]
    fn test_requesters_are_independent() {
        let (cache, _clock) = cache();
        assert!(matches!(cache.try_reserve("r1"), Reservation::Granted { .. }));
        assert!(matches!(cache.try_reserve("r2"), Reservation::Granted { .. }));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_release_allows_immediate_retry() {
        let (cache, _clock) = cache();
        cache.try_reserve("r1");
        assert!(cache.release("r1"));
        assert!(matches!(cache.try_reserve("r1"), Reservation::Granted { .. }));
        assert!(!cache.release("nobody"));
    }

    #[test]
    fn test_expired_entry_counts_as_absent() {
        let (cache, clock) = cache();
        cache.try_reserve("r1");

        clock.advance(chrono::Duration::seconds(121));
        // Not swept, but no longer live
        assert_eq!(cache.len(), 1);
        assert!(cache.get("r1").is_none());
        assert!(matches!(cache.try_reserve("r1"), Reservation::Granted { .. }));
    }

    #[test]
    fn test_stored_count_includes_expired_until_sweep() {
        let (cache, clock) = cache();
        cache.try_reserve("r1");
        cache.try_reserve("r2");
        clock.advance(chrono::Duration::seconds(121));

        cache.try_reserve("r3");
        assert_eq!(cache.len(), 3);
        assert!(cache.get("r1").is_none());

        assert_eq!(cache.sweep_expired(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let (cache, clock) = cache();
        cache.try_reserve("old");
        clock.advance(chrono::Duration::seconds(100));
        cache.try_reserve("new");
        clock.advance(chrono::Duration::seconds(30));

        assert_eq!(cache.sweep_expired(), 1);
        assert!(cache.get("old").is_none());
        assert!(cache.get("new").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_runs_until_shutdown() {
        let (cache, clock) = cache();
        cache.try_reserve("r1");
        clock.advance(chrono::Duration::seconds(200));

        let shutdown = Shutdown::new();
        let handle = tokio::spawn(
            cache.clone().run_sweeper(Duration::from_secs(30), shutdown.subscribe()),
        );

        time::sleep(Duration::from_secs(31)).await;
        assert!(cache.is_empty());

        shutdown.trigger();
        handle.await.unwrap();
    }
}
