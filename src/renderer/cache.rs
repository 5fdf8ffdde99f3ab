//! Rasterized text and pre-blurred backdrop layers, memoised per surface.

use std::hash::Hash;

use indexmap::IndexMap;

use crate::style::values::{snap_blur_radius, BLUR_RADII};
use crate::widgets::{Color, Size};

/// Handle to an image produced by a [`Rasterizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RasterId(pub u64);

/// What to render for one single-line, centred text raster.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest {
    pub text: String,
    /// Pixel size, already floored to a whole number
    pub font_size: u32,
    pub color: Color,
    pub weight: u16,
    /// Empty for the host's default family
    pub family: String,
    /// Logical size of the raster; the text is centred in it
    pub size: Size,
    pub scale_factor: f32,
}

impl TextRequest {
    fn key(&self) -> TextKey {
        TextKey {
            text: self.text.clone(),
            font_size: self.font_size,
            color: self.color.to_rgba8(),
            weight: self.weight,
            family: self.family.clone(),
            width: self.size.width.max(1.0) as u32,
            height: self.size.height.max(1.0) as u32,
            scale_milli: (self.scale_factor * 1000.0).round() as u32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TextKey {
    text: String,
    font_size: u32,
    color: [u8; 4],
    weight: u16,
    family: String,
    width: u32,
    height: u32,
    scale_milli: u32,
}

/// The host's image collaborator: turns text into rasters and blurs the
/// surface background.
pub trait Rasterizer {
    fn rasterize_text(&mut self, request: &TextRequest) -> RasterId;

    /// Blur the surface background by `radius` px. `None` when the surface
    /// has no background texture to blur.
    fn blur_backdrop(&mut self, radius: u32, scale_factor: f32) -> Option<RasterId>;

    /// Called when the cache drops a raster it handed out.
    fn release(&mut self, _id: RasterId) {}
}

/// Insertion-ordered map that drops its oldest entry once full.
#[derive(Debug, Clone)]
pub struct BoundedCache<K, V> {
    entries: IndexMap<K, V>,
    capacity: usize,
}

impl<K: Hash + Eq, V> BoundedCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: IndexMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Insert `value`, returning the entry evicted to make room, if any.
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            return None;
        }
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0)
        } else {
            None
        };
        self.entries.insert(key, value);
        evicted
    }

    pub fn drain(&mut self) -> impl Iterator<Item = (K, V)> + '_ {
        self.entries.drain(..)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Per-surface cache of text rasters and blurred backdrop layers.
#[derive(Debug, Clone)]
pub struct SurfaceCache {
    scale_factor: f32,
    text: BoundedCache<TextKey, RasterId>,
    backdrops: BoundedCache<u32, RasterId>,
}

impl SurfaceCache {
    /// `capacity` bounds both caches together. Backdrops take at most half,
    /// and never more than there are snapped radii.
    pub fn new(capacity: usize) -> Self {
        let backdrops = (capacity / 2).min(BLUR_RADII.len()).max(1);
        let text = capacity.saturating_sub(backdrops).max(1);
        Self {
            scale_factor: 1.0,
            text: BoundedCache::new(text),
            backdrops: BoundedCache::new(backdrops),
        }
    }

    pub fn capacity(&self) -> usize {
        self.text.capacity() + self.backdrops.capacity()
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    /// Text keys carry the scale factor, so only the backdrops go stale.
    pub fn set_scale_factor(&mut self, rasterizer: &mut dyn Rasterizer, scale_factor: f32) {
        if scale_factor != self.scale_factor {
            self.scale_factor = scale_factor;
            self.invalidate_backdrops(rasterizer);
        }
    }

    /// Raster for `request`, rendering it on a miss.
    pub fn text(&mut self, rasterizer: &mut dyn Rasterizer, request: &TextRequest) -> RasterId {
        let key = request.key();
        if let Some(id) = self.text.get(&key) {
            return *id;
        }
        let id = rasterizer.rasterize_text(request);
        if let Some((old, old_id)) = self.text.insert(key, id) {
            log::trace!("evicting text raster {:?} for {:?}", old_id, old.text);
            rasterizer.release(old_id);
        }
        id
    }

    /// Backdrop layer for a `blur` radius, snapped to the baked radii.
    pub fn backdrop(&mut self, rasterizer: &mut dyn Rasterizer, blur: f32) -> Option<(RasterId, u32)> {
        let radius = snap_blur_radius(blur);
        if let Some(id) = self.backdrops.get(&radius) {
            return Some((*id, radius));
        }
        let id = rasterizer.blur_backdrop(radius, self.scale_factor)?;
        if let Some((old_radius, old_id)) = self.backdrops.insert(radius, id) {
            log::trace!("evicting backdrop layer {:?} (blur {})", old_id, old_radius);
            rasterizer.release(old_id);
        }
        Some((id, radius))
    }

    /// Drop the blurred layers, e.g. after the surface background changed.
    /// Text rasters stay.
    pub fn invalidate_backdrops(&mut self, rasterizer: &mut dyn Rasterizer) {
        for (_, id) in self.backdrops.drain() {
            rasterizer.release(id);
        }
    }

    pub fn text_len(&self) -> usize {
        self.text.len()
    }

    pub fn backdrop_len(&self) -> usize {
        self.backdrops.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::testing::RecordingRasterizer;

    fn request(text: &str) -> TextRequest {
        TextRequest {
            text: text.to_string(),
            font_size: 13,
            color: Color::WHITE,
            weight: 400,
            family: String::new(),
            size: Size::new(80.0, 40.0),
            scale_factor: 1.0,
        }
    }

    #[test]
    fn test_bounded_cache_evicts_oldest() {
        let mut cache = BoundedCache::new(2);
        assert!(cache.insert("a", 1).is_none());
        assert!(cache.insert("b", 2).is_none());
        assert_eq!(cache.insert("c", 3), Some(("a", 1)));
        assert!(cache.get(&"a").is_none());
        assert_eq!(cache.get(&"c"), Some(&3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_bounded_cache_update_keeps_size() {
        let mut cache = BoundedCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert!(cache.insert("a", 10).is_none());
        assert_eq!(cache.get(&"a"), Some(&10));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_text_hit_does_not_rerender() {
        let mut raster = RecordingRasterizer::default();
        let mut cache = SurfaceCache::new(64);
        let first = cache.text(&mut raster, &request("OK"));
        let second = cache.text(&mut raster, &request("OK"));
        assert_eq!(first, second);
        assert_eq!(raster.texts.len(), 1);
    }

    #[test]
    fn test_text_key_includes_color_and_scale() {
        let mut raster = RecordingRasterizer::default();
        let mut cache = SurfaceCache::new(64);
        cache.text(&mut raster, &request("OK"));
        let mut red = request("OK");
        red.color = Color::rgb(1.0, 0.0, 0.0);
        cache.text(&mut raster, &red);
        let mut hidpi = request("OK");
        hidpi.scale_factor = 2.0;
        cache.text(&mut raster, &hidpi);
        assert_eq!(raster.texts.len(), 3);
    }

    #[test]
    fn test_text_eviction_releases() {
        let mut raster = RecordingRasterizer::default();
        // two text slots, two backdrop slots
        let mut cache = SurfaceCache::new(4);
        let first = cache.text(&mut raster, &request("a"));
        cache.text(&mut raster, &request("b"));
        cache.text(&mut raster, &request("c"));
        assert_eq!(cache.text_len(), 2);
        assert_eq!(raster.released, vec![first]);
    }

    #[test]
    fn test_capacity_is_shared() {
        let mut raster = RecordingRasterizer::default();
        let mut cache = SurfaceCache::new(64);
        assert_eq!(cache.capacity(), 64);
        for i in 0..80 {
            cache.text(&mut raster, &request(&i.to_string()));
        }
        for radius in [4.0, 8.0, 12.0, 16.0, 20.0, 24.0, 32.0, 40.0, 48.0, 0.0] {
            cache.backdrop(&mut raster, radius);
        }
        assert_eq!(cache.text_len(), 54);
        assert_eq!(cache.backdrop_len(), 10);
        assert!(cache.text_len() + cache.backdrop_len() <= 64);
    }

    #[test]
    fn test_backdrop_snaps_and_invalidates_alone() {
        let mut raster = RecordingRasterizer::default();
        let mut cache = SurfaceCache::new(64);
        let (a, radius) = cache.backdrop(&mut raster, 14.0).unwrap();
        assert_eq!(radius, 12);
        let (b, _) = cache.backdrop(&mut raster, 11.0).unwrap();
        assert_eq!(a, b);
        assert_eq!(raster.blurs, vec![12]);

        cache.text(&mut raster, &request("OK"));
        cache.invalidate_backdrops(&mut raster);
        assert_eq!(cache.backdrop_len(), 0);
        assert_eq!(cache.text_len(), 1);
    }

    #[test]
    fn test_backdrop_without_texture() {
        let mut raster = RecordingRasterizer {
            has_texture: false,
            ..Default::default()
        };
        let mut cache = SurfaceCache::new(64);
        assert!(cache.backdrop(&mut raster, 20.0).is_none());
        assert_eq!(cache.backdrop_len(), 0);
    }
}
