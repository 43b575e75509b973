// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Time-bounded single-entry caches for appliance responses.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

/// A cached response and the moment it was stored.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry<T> {
    pub(crate) body: T,
    pub(crate) time: Instant,
}

impl<T> CacheEntry<T> {
    /// Returns `true` while the entry is strictly younger than `window`.
    fn is_fresh(&self, window: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.time) < window
    }
}

/// Holds at most one response, served while younger than its window.
///
/// The lock is never held across an `.await`. Two callers that both find the
/// entry stale will both fetch, and whichever stores last wins.
#[derive(Debug)]
pub(crate) struct TimedCache<T> {
    window: Duration,
    entry: Mutex<Option<CacheEntry<T>>>,
}

impl<T: Clone> TimedCache<T> {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            window,
            entry: Mutex::new(None),
        }
    }

    pub(crate) fn window(&self) -> Duration {
        self.window
    }

    /// Returns a copy of the entry if it is still fresh.
    pub(crate) fn get_fresh(&self) -> Option<T> {
        let now = Instant::now();
        self.entry
            .lock()
            .as_ref()
            .filter(|entry| entry.is_fresh(self.window, now))
            .map(|entry| entry.body.clone())
    }

    /// Stores `body` stamped with the current time.
    pub(crate) fn store(&self, body: T) {
        *self.entry.lock() = Some(CacheEntry {
            body,
            time: Instant::now(),
        });
    }

    /// Drops the entry so the next read refetches.
    pub(crate) fn invalidate(&self) {
        *self.entry.lock() = None;
    }

    /// Returns the entry regardless of age.
    #[cfg(test)]
    pub(crate) fn peek(&self) -> Option<CacheEntry<T>> {
        self.entry.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn serves_within_window() {
        let cache = TimedCache::new(Duration::from_millis(300_000));
        cache.store(7u32);

        tokio::time::advance(Duration::from_millis(299_999)).await;
        assert_eq!(cache.get_fresh(), Some(7));
    }

    #[tokio::test(start_paused = true)]
    async fn expires_at_window() {
        let cache = TimedCache::new(Duration::from_millis(10_000));
        cache.store(7u32);

        tokio::time::advance(Duration::from_millis(10_000)).await;
        assert_eq!(cache.get_fresh(), None);
        assert!(cache.peek().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_clears_entry() {
        let cache = TimedCache::new(Duration::from_secs(60));
        cache.store("body".to_string());
        cache.invalidate();

        assert_eq!(cache.get_fresh(), None);
        assert!(cache.peek().is_none());
    }

    #[test]
    fn empty_cache_misses() {
        let cache: TimedCache<u8> = TimedCache::new(Duration::from_secs(1));
        assert_eq!(cache.window(), Duration::from_secs(1));
        assert_eq!(cache.get_fresh(), None);
    }
}
