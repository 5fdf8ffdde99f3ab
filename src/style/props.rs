use indexmap::IndexMap;

use crate::align::Align;
use crate::style::values::{
    parse_backdrop_blur, parse_box_shadow, parse_color, parse_font_weight, parse_glass_border,
    parse_transform, parse_transition, BoxShadow, GlassBorder, TransitionValue, DEFAULT_TRANSITION,
};
use crate::widgets::Color;

pub const DEFAULT_RADIUS: f32 = 12.0;
pub const DEFAULT_FONT_SIZE: f32 = 13.0;

/// Flat `key: value` declarations of one rule, in declaration order.
///
/// Typed accessors never fail: an absent key yields the documented default
/// and an unreadable value is logged and treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMap {
    entries: IndexMap<String, String>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `self ⊕ overrides`: keys of `overrides` replace ours one by one.
    pub fn merged_with(&self, overrides: &PropertyMap) -> PropertyMap {
        let mut merged = self.clone();
        for (key, value) in &overrides.entries {
            merged.entries.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Numeric value of `key`, if present and readable. A trailing `px` is allowed.
    pub fn number_opt(&self, key: &str) -> Option<f32> {
        let raw = self.get(key)?;
        let trimmed = raw.trim();
        let digits = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
        match digits.parse::<f32>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => {
                log::warn!("ignoring non-numeric {}: {:?}", key, raw);
                None
            }
        }
    }

    pub fn number(&self, key: &str, default: f32) -> f32 {
        self.number_opt(key).unwrap_or(default)
    }

    /// Colour of `key`; an unreadable colour paints as transparent.
    pub fn color(&self, key: &str) -> Option<Color> {
        let raw = self.get(key)?;
        Some(parse_color(raw).unwrap_or_else(|| {
            log::warn!("unrecognised colour for {}: {:?}", key, raw);
            Color::TRANSPARENT
        }))
    }

    /// `(scale, rotate_degrees)` from `transform`.
    pub fn transform(&self) -> (f32, f32) {
        self.get("transform").map(parse_transform).unwrap_or((1.0, 0.0))
    }

    pub fn transition(&self) -> TransitionValue {
        parse_transition(self.get("transition").unwrap_or(DEFAULT_TRANSITION))
    }

    pub fn align(&self) -> Align {
        self.get("align").map(Align::parse).unwrap_or_default()
    }

    pub fn radius(&self) -> f32 {
        self.number("border-radius", DEFAULT_RADIUS)
    }

    pub fn opacity(&self) -> f32 {
        self.number("opacity", 1.0).clamp(0.0, 1.0)
    }

    pub fn padding(&self) -> f32 {
        self.number("padding", 0.0)
    }

    pub fn font_size(&self) -> f32 {
        self.number("font-size", DEFAULT_FONT_SIZE).max(1.0)
    }

    pub fn font_weight(&self) -> u16 {
        parse_font_weight(self.get("font-weight").unwrap_or("normal"))
    }

    /// `elastic-drag` radius fraction; zero disables the drag effect.
    pub fn elastic_drag(&self) -> f32 {
        self.number("elastic-drag", 0.0).max(0.0)
    }

    /// `box-shadow` layers, `None` when the key is absent.
    pub fn box_shadow(&self) -> Option<Vec<BoxShadow>> {
        self.get("box-shadow").map(parse_box_shadow)
    }

    pub fn backdrop_blur(&self) -> f32 {
        self.get("backdrop-filter").map(parse_backdrop_blur).unwrap_or(0.0)
    }

    pub fn glass_border(&self) -> Option<GlassBorder> {
        self.get("glass-border").map(parse_glass_border)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = PropertyMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}
