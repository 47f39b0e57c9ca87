use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// Internal cache entry with timestamp
struct CacheEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
}

/// Per-process memoization keyed by (symbol, freshness window).
///
/// Windows are aligned to the epoch: window = floor(unix_seconds / ttl), so
/// every entry expires at the next window boundary at the latest.
pub struct WindowedCache<T> {
    entries: DashMap<(String, i64), CacheEntry<T>>,
    ttl_secs: i64,
}

impl<T: Clone> WindowedCache<T> {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            entries: DashMap::new(),
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX).max(1),
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    fn window(&self, now: DateTime<Utc>) -> i64 {
        now.timestamp().div_euclid(self.ttl_secs)
    }

    fn key(&self, symbol: &str, now: DateTime<Utc>) -> (String, i64) {
        (symbol.trim().to_uppercase(), self.window(now))
    }

    pub fn get(&self, symbol: &str, now: DateTime<Utc>) -> Option<T> {
        let key = self.key(symbol, now);
        self.entries.get(&key).map(|entry| {
            tracing::debug!(
                symbol = %key.0,
                age_secs = (now - entry.cached_at).num_seconds(),
                "cache hit"
            );
            entry.data.clone()
        })
    }

    pub fn insert(&self, symbol: &str, now: DateTime<Utc>, data: T) {
        self.entries.insert(
            self.key(symbol, now),
            CacheEntry {
                data,
                cached_at: now,
            },
        );
    }

    /// Drop entries from windows before the one containing `now`
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let current = self.window(now);
        let before = self.entries.len();
        self.entries.retain(|(_, window), _| *window >= current);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_hit_within_window_case_insensitive() {
        let cache = WindowedCache::new(300);
        cache.insert("itsa4.sa", at(600), 42);
        assert_eq!(cache.get("ITSA4.SA", at(899)), Some(42));
        assert_eq!(cache.get(" itsa4.sa ", at(650)), Some(42));
    }

    #[test]
    fn test_miss_in_next_window() {
        let cache = WindowedCache::new(300);
        cache.insert("ITSA4.SA", at(899), 42);
        assert_eq!(cache.get("ITSA4.SA", at(900)), None);
    }

    #[test]
    fn test_purge_expired() {
        let cache = WindowedCache::new(60);
        cache.insert("A", at(0), 1);
        cache.insert("B", at(59), 2);
        cache.insert("C", at(60), 3);
        assert_eq!(cache.purge_expired(at(61)), 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("C", at(100)), Some(3));
    }

    #[test]
    fn test_zero_ttl_is_clamped() {
        let cache: WindowedCache<u8> = WindowedCache::new(0);
        assert_eq!(cache.ttl_secs(), 1);
        assert!(cache.is_empty());
    }
}
