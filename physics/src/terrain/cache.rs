//! Short-lived ground height cache.
//!
//! Keys are positions snapped to a coarse grid (`cell_size`), values are the probed
//! height together with the time it was written. Time is always passed in by the
//! caller, never read from a clock, so expiry is deterministic.

use std::time::Duration;

use rapier3d::parry::utils::hashmap::HashMap;

use crate::constants::{HEIGHT_CACHE_CELL_SIZE, HEIGHT_CACHE_VALIDITY};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightCacheSettings {
    /// Quantization step for cache keys (world units).
    pub cell_size: f32,
    /// Entries older than this are stale.
    pub validity: Duration,
}

impl Default for HeightCacheSettings {
    fn default() -> Self {
        Self {
            cell_size: HEIGHT_CACHE_CELL_SIZE,
            validity: HEIGHT_CACHE_VALIDITY,
        }
    }
}

type CacheKey = (i32, i32);

#[derive(Clone, Copy, Debug)]
struct CachedHeight {
    /// `None` records a probe that hit nothing.
    height: Option<f32>,
    written_at: Duration,
}

#[derive(Debug)]
pub struct HeightCache {
    entries: HashMap<CacheKey, CachedHeight>,
    settings: HeightCacheSettings,
}

impl HeightCache {
    pub fn new(settings: HeightCacheSettings) -> Self {
        let cell_size = if settings.cell_size.is_finite() && settings.cell_size > 0.0 {
            settings.cell_size
        } else {
            log::warn!(
                "height cache cell size {} is invalid, using {HEIGHT_CACHE_CELL_SIZE}",
                settings.cell_size
            );
            HEIGHT_CACHE_CELL_SIZE
        };

        Self {
            entries: HashMap::default(),
            settings: HeightCacheSettings {
                cell_size,
                ..settings
            },
        }
    }

    #[inline]
    pub fn settings(&self) -> &HeightCacheSettings {
        &self.settings
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snap a world position to its cache key. Non-finite positions have no key.
    #[inline]
    fn key(&self, x: f32, z: f32) -> Option<CacheKey> {
        if !x.is_finite() || !z.is_finite() {
            return None;
        }
        let inv = 1.0 / self.settings.cell_size;
        Some(((x * inv).round() as i32, (z * inv).round() as i32))
    }

    #[inline]
    fn is_fresh(&self, entry: &CachedHeight, now: Duration) -> bool {
        now.saturating_sub(entry.written_at) < self.settings.validity
    }

    /// Fresh cached result for `(x, z)`.
    ///
    /// The outer `Option` is the cache hit; the inner one is the probe result.
    pub fn get(&self, x: f32, z: f32, now: Duration) -> Option<Option<f32>> {
        let key = self.key(x, z)?;
        self.entries
            .get(&key)
            .filter(|entry| self.is_fresh(entry, now))
            .map(|entry| entry.height)
    }

    pub fn insert(&mut self, x: f32, z: f32, height: Option<f32>, now: Duration) {
        if let Some(key) = self.key(x, z) {
            self.entries.insert(
                key,
                CachedHeight {
                    height,
                    written_at: now,
                },
            );
        }
    }

    /// Drop every stale entry. Returns how many were evicted.
    pub fn evict_expired(&mut self, now: Duration) -> usize {
        let before = self.entries.len();
        let validity = self.settings.validity;
        self.entries
            .retain(|_, entry| now.saturating_sub(entry.written_at) < validity);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for HeightCache {
    fn default() -> Self {
        Self::new(HeightCacheSettings::default())
    }
}
