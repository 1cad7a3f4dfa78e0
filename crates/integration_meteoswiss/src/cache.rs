//! Station list cache
//!
//! Station metadata changes rarely, so the lists can be kept in memory for a
//! while. The cache is owned by whoever builds the client and passed in
//! explicitly; entries expire after a fixed time-to-live and can be
//! invalidated by hand.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use moka::future::Cache;
use tracing::debug;

use crate::config::MeteoConfig;
use crate::models::StationInfo;

/// Which station list an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StationFeed {
    /// Pollen measurement stations
    Pollen,
    /// Automatic weather stations
    Weather,
}

/// In-memory cache for station lists
pub struct StationCache {
    cache: Cache<StationFeed, Arc<Vec<StationInfo>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl std::fmt::Debug for StationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StationCache")
            .field("entries", &self.cache.entry_count())
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

impl StationCache {
    /// Create a cache whose entries live for `ttl`
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Cache::builder().max_capacity(2).time_to_live(ttl).build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Create a cache with a time-to-live given in minutes
    #[must_use]
    pub fn with_ttl_minutes(minutes: u32) -> Self {
        Self::new(Duration::from_secs(u64::from(minutes) * 60))
    }

    /// Create a cache with the TTL from `config`
    ///
    /// Returns `None` when caching is disabled (`station_cache_ttl_minutes = 0`).
    #[must_use]
    pub fn from_config(config: &MeteoConfig) -> Option<Self> {
        config
            .caching_enabled()
            .then(|| Self::with_ttl_minutes(config.station_cache_ttl_minutes))
    }

    /// Look up a station list
    pub async fn get(&self, feed: StationFeed) -> Option<Arc<Vec<StationInfo>>> {
        let entry = self.cache.get(&feed).await;
        if entry.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(?feed, "Station cache hit");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(?feed, "Station cache miss");
        }
        entry
    }

    /// Store a station list
    pub async fn insert(&self, feed: StationFeed, stations: Arc<Vec<StationInfo>>) {
        self.cache.insert(feed, stations).await;
    }

    /// Drop one station list
    pub async fn invalidate(&self, feed: StationFeed) {
        self.cache.invalidate(&feed).await;
        debug!(?feed, "Station cache invalidated");
    }

    /// Drop every station list
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Number of lookups served from the cache
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of lookups that missed
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stations(abbr: &str) -> Arc<Vec<StationInfo>> {
        Arc::new(vec![StationInfo {
            name: abbr.to_string(),
            abbreviation: abbr.to_string(),
            station_type: None,
            altitude: None,
            latitude: None,
            longitude: None,
            canton: None,
        }])
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let cache = StationCache::with_ttl_minutes(60);
        assert!(cache.get(StationFeed::Pollen).await.is_none());

        cache.insert(StationFeed::Pollen, stations("PBE")).await;

        let cached = cache.get(StationFeed::Pollen).await.unwrap();
        assert_eq!(cached[0].abbreviation, "PBE");
        assert!(cache.get(StationFeed::Weather).await.is_none());
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 2);
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache = StationCache::with_ttl_minutes(60);
        cache.insert(StationFeed::Pollen, stations("PBE")).await;
        cache.insert(StationFeed::Weather, stations("KLO")).await;

        cache.invalidate(StationFeed::Pollen).await;
        assert!(cache.get(StationFeed::Pollen).await.is_none());
        assert!(cache.get(StationFeed::Weather).await.is_some());

        cache.invalidate_all();
        assert!(cache.get(StationFeed::Weather).await.is_none());
    }

    #[test]
    fn test_from_config() {
        assert!(StationCache::from_config(&MeteoConfig::default()).is_some());
        assert!(StationCache::from_config(&MeteoConfig::for_testing("http://localhost")).is_none());
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let cache = StationCache::new(Duration::from_millis(50));
        cache.insert(StationFeed::Weather, stations("KLO")).await;

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(cache.get(StationFeed::Weather).await.is_none());
    }
}
