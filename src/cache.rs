use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::models::LandingPage;

/// Process-local slug -> published page cache with a fixed TTL.
#[derive(Clone)]
pub struct PageCache {
    store: Arc<DashMap<String, (LandingPage, Instant)>>,
    /// Bumped by every invalidation.
    generation: Arc<AtomicU64>,
    ttl: Duration,
}

impl PageCache {
    pub fn new(ttl: Duration) -> Self {
        Self { store: Arc::new(DashMap::new()), generation: Arc::new(AtomicU64::new(0)), ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh entry for `slug`, evicting it if expired.
    pub fn get(&self, slug: &str) -> Option<LandingPage> {
        if let Some(entry) = self.store.get(slug) {
            let (page, stored_at) = entry.value();
            if stored_at.elapsed() < self.ttl {
                return Some(page.clone());
            }
        }
        self.store.remove(slug);
        None
    }

    pub fn insert(&self, page: LandingPage) {
        self.store.insert(page.slug.clone(), (page, Instant::now()));
    }

    /// Current invalidation generation. Read it before loading a page that
    /// will be handed to [`PageCache::insert_if_current`].
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Inserts `page` unless an invalidation happened since `seen`.
    /// A page read before a concurrent save is never left behind.
    pub fn insert_if_current(&self, page: LandingPage, seen: u64) -> bool {
        if self.generation() != seen {
            return false;
        }
        let slug = page.slug.clone();
        self.insert(page);
        if self.generation() != seen {
            self.store.remove(&slug);
            return false;
        }
        true
    }

    pub fn invalidate(&self, slug: &str) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.store.remove(slug);
    }

    /// Drops everything; returns how many entries were held.
    pub fn clear(&self) -> usize {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let n = self.store.len();
        self.store.clear();
        n
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new(CacheConfig::default().ttl)
    }
}

#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub ttl: Duration,
    /// Slugs loaded into the cache at startup.
    pub preload_slugs: Vec<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl: Duration::from_secs(300), preload_slugs: Vec::new() }
    }
}

impl CacheConfig {
    pub fn from_env() -> Self {
        let ttl = std::env::var("PAGE_CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(300));
        let preload_slugs = std::env::var("PRELOAD_SLUGS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        Self { ttl, preload_slugs }
    }
}
