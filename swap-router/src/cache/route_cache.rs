use crate::graph::TokenId;
use crate::routing::SwapRoute;
use alloy_primitives::U256;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Cache key: the full request shape plus the graph version the result
/// was computed against. Any pool update bumps the version, so a cached
/// entry can never be served across a write.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteCacheKey {
    pub token_in: TokenId,
    pub token_out: TokenId,
    pub amount_in: U256,
    pub k: usize,
    pub slippage_pips: u64,
    pub allowed_exchanges: Option<Vec<String>>,
    pub graph_version: u64,
}

struct CacheEntry {
    routes: Vec<SwapRoute>,
    inserted_at: Instant,
}

/// In-memory route cache with TTL and a bounded entry count.
pub struct RouteCache {
    entries: DashMap<RouteCacheKey, CacheEntry>,
    ttl: Duration,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl RouteCache {
    pub fn new(ttl_seconds: u64, capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: Duration::from_secs(ttl_seconds),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &RouteCacheKey) -> Option<Vec<SwapRoute>> {
        if let Some(entry) = self.entries.get(key) {
            if entry.inserted_at.elapsed() < self.ttl {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.routes.clone());
            }
            drop(entry);
            self.entries.remove(key);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    pub fn insert(&self, key: RouteCacheKey, routes: Vec<SwapRoute>) {
        if self.entries.len() >= self.capacity {
            self.entries
                .retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);
            if self.entries.len() >= self.capacity {
                return;
            }
        }

        self.entries.insert(
            key,
            CacheEntry {
                routes,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}

impl Default for RouteCache {
    fn default() -> Self {
        Self::new(15, 1_000)
    }
}

#[derive(Debug, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}
