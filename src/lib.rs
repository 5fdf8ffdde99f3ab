pub mod align;
pub mod animation;
pub mod engine;
pub mod renderer;
pub mod style;
pub mod transform;
pub mod widgets;

use animation::JellyConfig;

pub use engine::{Control, Engine, Handler};

pub mod prelude {
    pub use crate::animation::{AnimationState, JellyConfig, TimingFunction, Transition};
    pub use crate::renderer::{DrawCommand, Layer, RasterId, Rasterizer, TextRequest};
    pub use crate::style::{LoadReport, StyleError, StyleSheet, VisualState};
    pub use crate::widgets::{
        ActionGroup, Anchor, Button, ChangeFlags, Color, ControlEvent, ControlEventKind, ControlId,
        Direction, GroupState, Overlay, Point, Rect, Size, SlotItem, StyledSlot, Toggle, Wrap,
    };
    pub use crate::{Control, Engine, EngineConfig};
}

/// Tunables shared by every control an [`Engine`] creates.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Overlay canvas size as a multiple of the logical size
    pub overlay_multiplier: f32,
    /// Raster cache entries, text and backdrop layers together
    pub cache_capacity: usize,
    /// Duration of the button snap-back after an elastic drag
    pub button_snap_ms: f32,
    /// Duration of the knob jelly settle after a toggle drag
    pub knob_jelly_ms: f32,
    /// Room around an action-group pill for its scale animation
    pub pill_margin: f32,
    /// Pointer travel after which a knob press counts as a drag
    pub drag_threshold: f32,
    pub jelly: JellyConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            overlay_multiplier: widgets::OVERLAY_MULTIPLIER,
            cache_capacity: 64,
            button_snap_ms: animation::elastic::SNAP_BACK_MS,
            knob_jelly_ms: animation::elastic::KNOB_JELLY_MS,
            pill_margin: widgets::action_group::layout::PILL_MARGIN,
            drag_threshold: 3.0,
            jelly: JellyConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overlay_multiplier(mut self, multiplier: f32) -> Self {
        self.overlay_multiplier = multiplier;
        self
    }

    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn button_snap_ms(mut self, ms: f32) -> Self {
        self.button_snap_ms = ms;
        self
    }

    pub fn knob_jelly_ms(mut self, ms: f32) -> Self {
        self.knob_jelly_ms = ms;
        self
    }

    pub fn pill_margin(mut self, margin: f32) -> Self {
        self.pill_margin = margin;
        self
    }

    pub fn drag_threshold(mut self, px: f32) -> Self {
        self.drag_threshold = px;
        self
    }

    pub fn jelly(mut self, jelly: JellyConfig) -> Self {
        self.jelly = jelly;
        self
    }
}
