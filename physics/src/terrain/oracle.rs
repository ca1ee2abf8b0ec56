use std::time::Duration;

use nalgebra::Vector3;

use super::cache::{HeightCache, HeightCacheSettings};

/// Something that can answer "where is the walkable surface under `(x, z)`?".
///
/// Implementations cast one ray from high above straight down against the walkable
/// surface only, and return the hit height or `None` when nothing is below.
pub trait HeightQuery {
    fn probe_height(&self, x: f32, z: f32) -> Option<f32>;
}

impl<Q: HeightQuery + ?Sized> HeightQuery for &Q {
    fn probe_height(&self, x: f32, z: f32) -> Option<f32> {
        (**self).probe_height(x, z)
    }
}

/// Ground height oracle: a height query with a short-lived spatial cache in front.
#[derive(Debug)]
pub struct TerrainHeightOracle<Q> {
    query: Q,
    cache: HeightCache,
}

impl<Q: HeightQuery> TerrainHeightOracle<Q> {
    pub fn new(query: Q) -> Self {
        Self::with_cache_settings(query, HeightCacheSettings::default())
    }

    pub fn with_cache_settings(query: Q, settings: HeightCacheSettings) -> Self {
        Self {
            query,
            cache: HeightCache::new(settings),
        }
    }

    #[inline]
    pub fn query(&self) -> &Q {
        &self.query
    }

    /// Ground height under `(x, z)`.
    ///
    /// With `use_cache`, a result written within the validity window is returned
    /// without probing; otherwise the probe result is written back. `now` is the
    /// caller's clock (any fixed epoch).
    pub fn height_at(&mut self, x: f32, z: f32, now: Duration, use_cache: bool) -> Option<f32> {
        if !x.is_finite() || !z.is_finite() {
            return None;
        }
        if !use_cache {
            return self.query.probe_height(x, z);
        }
        if let Some(hit) = self.cache.get(x, z, now) {
            return hit;
        }

        let height = self.query.probe_height(x, z);
        self.cache.insert(x, z, height, now);
        height
    }

    /// Spawn point on the ground at `(x, z)`, always probed fresh.
    ///
    /// `model_lowest_point` is the lowest point of the model relative to its origin
    /// (usually negative), so the returned origin puts the model's feet on the ground.
    pub fn spawn_position(&self, x: f32, z: f32, model_lowest_point: f32) -> Option<Vector3<f32>> {
        if !x.is_finite() || !z.is_finite() || !model_lowest_point.is_finite() {
            return None;
        }
        self.query
            .probe_height(x, z)
            .map(|ground| Vector3::new(x, ground - model_lowest_point, z))
    }

    /// Evict expired cache entries. Call occasionally, not every tick.
    pub fn clean_cache(&mut self, now: Duration) -> usize {
        self.cache.evict_expired(now)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    #[inline]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}
