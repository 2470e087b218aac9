//! Lazy-loading, LRU-bounded model cache.
//!
//! One mutex spans lookup, resolution, eviction and load, so a name is never
//! loaded twice and a handle is never evicted halfway through being handed
//! out. With a capacity of one, every switch between distinct models reloads
//! from disk.

use crate::{
    CacheConfig, Error, Registry, Result, Runtime,
    resolver::{self, ModelSource},
};
use compact_str::CompactString;
use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;
use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

/// Cache statistics for observability.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Acquires served from a resident entry.
    pub hits: u64,
    /// Acquires that had to load.
    pub misses: u64,
    /// Successful runtime loads.
    pub loads: u64,
    /// Entries evicted to make room.
    pub evictions: u64,
    /// Entries currently resident.
    pub resident: usize,
}

/// Metadata of a resident entry. The handle itself never leaves the cache
/// except through [`ModelCache::acquire`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Logical model name.
    pub name: CompactString,
    /// Where the handle was loaded from.
    pub source: ModelSource,
    /// How long ago the handle was loaded.
    pub age: Duration,
    /// How long ago the entry was last acquired.
    pub idle: Duration,
    /// Number of hits since load.
    pub hits: u64,
}

struct Slot<H> {
    handle: Arc<H>,
    source: ModelSource,
    loaded_at: Instant,
    last_used: Instant,
    hits: u64,
}

impl<H> Slot<H> {
    fn touch(&mut self) {
        self.last_used = Instant::now();
        self.hits += 1;
    }
}

struct Inner<H> {
    /// Most-recently-used at the front.
    entries: LruCache<CompactString, Slot<H>>,
    stats: CacheStats,
}

/// Bounded store of loaded model handles keyed by logical name.
pub struct ModelCache<R: Runtime> {
    runtime: Arc<R>,
    registry: Arc<Registry>,
    models_dir: PathBuf,
    capacity: NonZeroUsize,
    inner: Mutex<Inner<R::Handle>>,
}

impl<R: Runtime> ModelCache<R> {
    /// Create an empty cache.
    ///
    /// Fails with [`Error::Config`] if the configured capacity is zero.
    pub fn new(runtime: Arc<R>, registry: Arc<Registry>, config: &CacheConfig) -> Result<Self> {
        let capacity = NonZeroUsize::new(config.max_loaded)
            .ok_or_else(|| Error::Config("cache capacity must be at least 1".into()))?;

        Ok(Self {
            runtime,
            registry,
            models_dir: config.models_dir.clone(),
            capacity,
            inner: Mutex::new(Inner {
                entries: LruCache::new(capacity),
                stats: CacheStats::default(),
            }),
        })
    }

    /// Return the handle for `name`, loading it on a miss.
    ///
    /// A hit promotes `name` to most-recently-used. A miss re-resolves the
    /// source, evicts the least-recently-used entry if the cache is full,
    /// then loads. Resolution failures leave the cache untouched; load
    /// failures never insert a partial entry.
    pub fn acquire(&self, name: &str) -> Result<Arc<R::Handle>> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if let Some(slot) = inner.entries.get_mut(name) {
            slot.touch();
            inner.stats.hits += 1;
            tracing::debug!(model = name, "cache hit");
            return Ok(Arc::clone(&slot.handle));
        }

        let source = resolver::resolve(name, &self.models_dir, &self.registry)?;
        inner.stats.misses += 1;

        while inner.entries.len() >= self.capacity.get() {
            let Some((evicted, slot)) = inner.entries.pop_lru() else {
                break;
            };
            inner.stats.evictions += 1;
            tracing::info!(
                "[lru] evicting model '{evicted}' to free memory (loaded: {}/{})",
                inner.entries.len(),
                self.capacity
            );
            drop(slot);
        }

        tracing::info!("loading model '{name}' from {source}");
        let started = Instant::now();
        let handle = self
            .runtime
            .load(&source)
            .map_err(|err| Error::Load {
                name: name.into(),
                source: err,
            })?;
        tracing::info!(
            "'{name}' loaded in {:.1}s",
            started.elapsed().as_secs_f64()
        );

        let handle = Arc::new(handle);
        let now = Instant::now();
        inner.entries.put(
            name.into(),
            Slot {
                handle: Arc::clone(&handle),
                source,
                loaded_at: now,
                last_used: now,
                hits: 0,
            },
        );
        inner.stats.loads += 1;
        Ok(handle)
    }

    /// Resident names, least-recently-used first.
    pub fn loaded(&self) -> Vec<CompactString> {
        let inner = self.inner.lock();
        inner.entries.iter().rev().map(|(name, _)| name.clone()).collect()
    }

    /// Metadata of resident entries, least-recently-used first.
    pub fn entries(&self) -> Vec<CacheEntry> {
        let inner = self.inner.lock();
        inner
            .entries
            .iter()
            .rev()
            .map(|(name, slot)| CacheEntry {
                name: name.clone(),
                source: slot.source.clone(),
                age: slot.loaded_at.elapsed(),
                idle: slot.last_used.elapsed(),
                hits: slot.hits,
            })
            .collect()
    }

    /// Whether `name` is resident. Does not touch recency.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.lock().entries.contains(name)
    }

    /// Snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            resident: inner.entries.len(),
            ..inner.stats
        }
    }

    /// Release every resident handle.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        let cleared = inner.entries.len();
        inner.entries.clear();
        tracing::info!(cleared, "released all cached models");
    }

    /// Maximum number of resident entries.
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Root directory searched for local artifacts.
    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    /// The registry consulted on misses.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The runtime handles are loaded with.
    pub fn runtime(&self) -> &R {
        &self.runtime
    }
}

impl<R: Runtime> std::fmt::Debug for ModelCache<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("ModelCache")
            .field("capacity", &self.capacity)
            .field("models_dir", &self.models_dir)
            .field("resident", &inner.entries.len())
            .finish()
    }
}
