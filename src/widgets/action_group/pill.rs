//! The floating surface an action group expands into.
//!
//! The pill draws its own background plus every style-only slot, including a
//! copy of the trigger at slot 0. Embedded controls keep their own overlays;
//! the pill leaves their slots empty and never hit-tests them.

use crate::animation::{AdvanceResult, AnimationState, TimingFunction, Transition};
use crate::renderer::{Border, DrawCommand, Layer, PaintContext};
use crate::style::{PropertyMap, StyleRef, StyleSheet, TransitionValue, VisualState};
use crate::transform::Transform;
use crate::widgets::action_group::layout::PillLayout;
use crate::widgets::overlay::{style_border, text_request, OverlayProps, OverlayTick, ShadowFade};
use crate::widgets::{Color, Point, Rect, Size};

pub const DEFAULT_PILL_COLOR: Color = Color::from_hex(0x2d2f3a);
const DEFAULT_SLOT_COLOR: Color = Color::from_hex(0x3b3f52);
const DEFAULT_SLOT_RADIUS: f32 = 10.0;
const DEFAULT_PILL_TRANSITION: (f32, &str) = (0.32, "ease-out");
const DEFAULT_SLOT_TRANSITION: (f32, &str) = (0.18, "ease-out");
const MIN_PILL_MS: f32 = 100.0;
const MIN_SLOT_MS: f32 = 60.0;
const OPEN_FADE_MS: f32 = 120.0;
const CLOSE_FADE_MS: f32 = 100.0;

/// `transition` of a base style, or `fallback` when the rule declares none.
fn declared_transition(base: &PropertyMap, fallback: (f32, &str)) -> TransitionValue {
    if base.contains("transition") {
        base.transition()
    } else {
        TransitionValue {
            duration_secs: fallback.0,
            easing: fallback.1.to_string(),
        }
    }
}

/// Animated feedback of one slot the pill draws itself.
struct SlotLook {
    class: String,
    background: AnimationState<Color>,
    border: AnimationState<Color>,
    scale: AnimationState<f32>,
}

impl SlotLook {
    fn new(class: String, sheet: &StyleSheet, default_background: Color) -> Self {
        let base = StyleRef::new(class.as_str()).base(sheet);
        Self {
            background: AnimationState::new(
                base.color("background").unwrap_or(default_background),
                Transition::default(),
            ),
            border: AnimationState::new(
                base.color("border-color").unwrap_or(Color::TRANSPARENT),
                Transition::default(),
            ),
            scale: AnimationState::new(1.0, Transition::default()),
            class,
        }
    }

    /// Head toward the look of `state`, on the base rule's transition.
    fn go(&mut self, sheet: &StyleSheet, state: VisualState, default_background: Color) {
        let style = StyleRef::new(self.class.as_str());
        let base = style.base(sheet);
        let merged = style.merged(sheet, state);
        let value = declared_transition(&base, DEFAULT_SLOT_TRANSITION);
        let transition = value.to_transition().duration(value.duration_ms().max(MIN_SLOT_MS));

        self.background.animate_to(
            merged.color("background").unwrap_or(default_background),
            transition.clone(),
        );
        self.border.animate_to(
            merged.color("border-color").unwrap_or(Color::TRANSPARENT),
            transition.clone(),
        );
        self.scale.animate_to(merged.transform().0, transition);
    }

    fn advance(&mut self, dt_ms: f32) -> bool {
        let background = self.background.advance(dt_ms).is_changed();
        let border = self.border.advance(dt_ms).is_changed();
        let scale = self.scale.advance(dt_ms).is_changed();
        background || border || scale
    }
}

fn record<T>(tick: &mut OverlayTick, prop: OverlayProps, result: AdvanceResult<T>) {
    match result {
        AdvanceResult::NoChange => {}
        AdvanceResult::Changed(_) => tick.changed |= prop,
        AdvanceResult::Finished(_) => {
            tick.changed |= prop;
            tick.finished |= prop;
        }
    }
}

pub struct Pill {
    class: String,
    layout: PillLayout,
    /// Canvas top-left in window coordinates
    origin: Point,
    transition: Transition,
    scale: AnimationState<f32>,
    opacity: AnimationState<f32>,
    /// `None` for slots an embedded control draws
    looks: Vec<Option<SlotLook>>,
    labels: Vec<String>,
    hovered: Option<usize>,
    pressed: Option<usize>,
    shadow: Option<ShadowFade>,
    visible: bool,
}

impl Pill {
    /// `slots[0]` is the trigger; `None` marks an embedded control's slot.
    pub fn new(
        class: String,
        layout: PillLayout,
        sheet: &StyleSheet,
        slots: Vec<Option<String>>,
        labels: Vec<String>,
    ) -> Self {
        let mut pill = Self {
            class,
            layout,
            origin: Point::ZERO,
            transition: Transition::default(),
            scale: AnimationState::new(0.0, Transition::default()),
            opacity: AnimationState::new(0.0, Transition::default()),
            looks: Vec::new(),
            labels,
            hovered: None,
            pressed: None,
            shadow: None,
            visible: false,
        };
        pill.read_decoration(sheet);
        pill.rebuild_looks(sheet, slots);
        pill
    }

    fn read_decoration(&mut self, sheet: &StyleSheet) {
        let base = self.base(sheet);
        let value = declared_transition(&base, DEFAULT_PILL_TRANSITION);
        self.transition = value.to_transition().duration(value.duration_ms().max(MIN_PILL_MS));
        self.shadow = base
            .box_shadow()
            .filter(|shadows| !shadows.is_empty())
            .map(ShadowFade::new);
    }

    /// Pick up a reloaded sheet. The pivot stays pinned on `trigger_center`.
    pub fn restyle(&mut self, sheet: &StyleSheet, layout: PillLayout, slots: Vec<Option<String>>, trigger_center: Point) {
        self.read_decoration(sheet);
        self.layout = layout;
        self.place(trigger_center);
        self.rebuild_looks(sheet, slots);
        self.hovered = None;
        self.pressed = None;
    }

    pub fn set_labels(&mut self, labels: Vec<String>) {
        self.labels = labels;
    }

    /// Reset every slot to its base look.
    pub fn rebuild_looks(&mut self, sheet: &StyleSheet, slots: Vec<Option<String>>) {
        self.looks = slots
            .into_iter()
            .enumerate()
            .map(|(idx, class)| class.map(|class| SlotLook::new(class, sheet, self.default_slot_color(idx))))
            .collect();
    }

    fn default_slot_color(&self, idx: usize) -> Color {
        if idx == 0 {
            DEFAULT_PILL_COLOR
        } else {
            DEFAULT_SLOT_COLOR
        }
    }

    pub fn layout(&self) -> &PillLayout {
        &self.layout
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Canvas bounds in window coordinates.
    pub fn canvas(&self) -> Rect {
        let size = self.layout.canvas_size();
        Rect::new(self.origin.x, self.origin.y, size.width, size.height)
    }

    /// Pin the pivot onto the trigger centre, in window coordinates.
    pub fn place(&mut self, trigger_center: Point) {
        let pivot = self.layout.pivot();
        self.origin = Point::new(trigger_center.x - pivot.x, trigger_center.y - pivot.y);
    }

    pub fn scale(&self) -> f32 {
        *self.scale.current()
    }

    pub fn opacity(&self) -> f32 {
        *self.opacity.current()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.hovered = None;
        self.pressed = None;
    }

    /// Scale run of the pill, which embedded items share.
    pub fn transition(&self) -> Transition {
        self.transition.clone()
    }

    pub fn duration_ms(&self) -> f32 {
        self.transition.duration_ms
    }

    pub fn open_fade(&self) -> Transition {
        Transition::new(OPEN_FADE_MS.min(self.duration_ms() / 2.0), TimingFunction::EaseOut)
    }

    pub fn close_fade(&self) -> Transition {
        Transition::new(CLOSE_FADE_MS.min(self.duration_ms() / 3.0), TimingFunction::EaseIn)
    }

    pub fn is_animating(&self) -> bool {
        self.scale.is_animating() || self.opacity.is_animating()
    }

    /// Scale about the pivot, in canvas coordinates.
    pub fn transform(&self) -> Transform {
        Transform::scale_rotate_about(self.layout.pivot(), self.scale().max(0.0), 0.0)
    }

    pub fn slot_rects(&self) -> Vec<Rect> {
        self.layout.slot_rects()
    }

    /// Window position of a slot centre, either at rest or through the
    /// current pill scale.
    pub fn slot_center(&self, idx: usize, transformed: bool) -> Option<Point> {
        let center = self.layout.slot_rects().get(idx)?.center();
        let center = if transformed {
            self.transform().transform_point(center)
        } else {
            center
        };
        Some(center.offset(self.origin.x, self.origin.y))
    }

    /// Style-only slot under a window point, seen through the inverse pill
    /// transform. Embedded slots are skipped.
    pub fn hit_slot(&self, window: Point) -> Option<usize> {
        if !self.visible {
            return None;
        }
        let inverse = self.transform().inverse()?;
        let local = inverse.transform_point(Point::new(window.x - self.origin.x, window.y - self.origin.y));
        self.layout
            .slot_rects()
            .iter()
            .enumerate()
            .find(|(idx, rect)| rect.contains_point(local) && self.looks.get(*idx).is_some_and(Option::is_some))
            .map(|(idx, _)| idx)
    }

    /// Whether a window point lands on the pill at its current scale.
    pub fn contains(&self, window: Point) -> bool {
        let Some(inverse) = self.transform().inverse() else {
            return false;
        };
        let local = inverse.transform_point(Point::new(window.x - self.origin.x, window.y - self.origin.y));
        self.visible && self.layout.pill_rect().contains_point(local)
    }

    fn color_slot(&mut self, sheet: &StyleSheet, idx: usize, state: VisualState) {
        let default = self.default_slot_color(idx);
        if let Some(Some(look)) = self.looks.get_mut(idx) {
            look.go(sheet, state, default);
        }
    }

    fn slot_state(&self, idx: usize) -> VisualState {
        VisualState::resolve(self.pressed == Some(idx), self.hovered == Some(idx))
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn pointer_move(&mut self, sheet: &StyleSheet, window: Point) {
        let idx = self.hit_slot(window);
        if idx == self.hovered {
            return;
        }
        let old = std::mem::replace(&mut self.hovered, idx);
        if let Some(old) = old {
            let state = if self.pressed == Some(old) {
                VisualState::Active
            } else {
                VisualState::Base
            };
            self.color_slot(sheet, old, state);
        }
        if let Some(idx) = idx {
            self.color_slot(sheet, idx, VisualState::Hover);
        }
    }

    pub fn pointer_press(&mut self, sheet: &StyleSheet, window: Point) -> Option<usize> {
        let idx = self.hit_slot(window)?;
        if let Some(old) = self.pressed.replace(idx) {
            let state = if self.hovered == Some(old) {
                VisualState::Hover
            } else {
                VisualState::Base
            };
            self.color_slot(sheet, old, state);
        }
        self.color_slot(sheet, idx, VisualState::Active);
        Some(idx)
    }

    /// The slot that fired: press and release on the same slot.
    pub fn pointer_release(&mut self, sheet: &StyleSheet, window: Point) -> Option<usize> {
        let idx = self.hit_slot(window);
        let pressed = self.pressed.take()?;
        let state = if self.hovered == Some(pressed) {
            VisualState::Hover
        } else {
            VisualState::Base
        };
        self.color_slot(sheet, pressed, state);
        (idx == Some(pressed)).then_some(pressed)
    }

    pub fn pointer_leave(&mut self, sheet: &StyleSheet) {
        for idx in [self.hovered.take(), self.pressed.take()].into_iter().flatten() {
            self.color_slot(sheet, idx, VisualState::Base);
        }
    }

    /// Grow from the current scale and fade in.
    pub fn expand(&mut self, sheet: &StyleSheet, slots: Vec<Option<String>>) {
        self.rebuild_looks(sheet, slots);
        self.hovered = None;
        self.pressed = None;
        self.visible = true;
        self.scale.animate_to(1.0, self.transition.clone());
        self.opacity.animate_to(1.0, self.open_fade());
    }

    /// Shrink to nothing and fade out. The owner hides the pill once the
    /// scale run reports finished.
    pub fn collapse(&mut self) {
        self.scale.animate_to(0.0, self.transition.clone());
        self.opacity.animate_to(0.0, self.close_fade());
    }

    pub fn tick(&mut self, dt_ms: f32) -> OverlayTick {
        let mut tick = OverlayTick::default();
        record(&mut tick, OverlayProps::SCALE, self.scale.advance(dt_ms));
        record(&mut tick, OverlayProps::OPACITY, self.opacity.advance(dt_ms));
        for look in self.looks.iter_mut().flatten() {
            if look.advance(dt_ms) {
                tick.changed |= OverlayProps::BACKGROUND;
            }
        }
        tick
    }

    fn base(&self, sheet: &StyleSheet) -> PropertyMap {
        StyleRef::new(self.class.as_str()).base(sheet)
    }

    fn radius(&self, base: &PropertyMap) -> f32 {
        let pill = self.layout.pill_size();
        let half = pill.width.min(pill.height) / 2.0;
        base.number("border-radius", half).min(half)
    }

    /// Shadow under the pill, following its scale and opacity.
    pub fn paint_shadow(&self, sheet: &StyleSheet) -> Option<Layer> {
        let shadow = self.shadow.as_ref()?;
        if !self.visible || self.opacity() <= 0.0 {
            return None;
        }
        let base = self.base(sheet);
        let mut layer = Layer::new(self.canvas());
        layer.opacity = self.opacity();
        layer.transform = self.transform();
        layer.commands = shadow.commands(self.layout.pill_rect(), self.radius(&base));
        Some(layer)
    }

    pub fn paint(&self, ctx: &mut PaintContext<'_>, sheet: &StyleSheet) -> Option<Layer> {
        if !self.visible || self.opacity() <= 0.0 {
            return None;
        }
        let base = self.base(sheet);
        let pill_rect = self.layout.pill_rect();
        let radius = self.radius(&base);

        let mut layer = Layer::new(self.canvas());
        layer.opacity = self.opacity();
        layer.transform = self.transform();

        if base.contains("backdrop-filter") {
            if let Some((raster, blur_radius)) = ctx.backdrop(base.backdrop_blur()) {
                layer.push(DrawCommand::Backdrop {
                    rect: pill_rect,
                    radius,
                    layer: raster,
                    blur_radius,
                });
            }
        }

        let background = base.color("background").unwrap_or(DEFAULT_PILL_COLOR);
        layer.push(match style_border(&base) {
            Some(border) => DrawCommand::bordered_rect(pill_rect, background, radius, border),
            None => DrawCommand::rounded_rect(pill_rect, background, radius),
        });

        for (idx, rect) in self.layout.slot_rects().into_iter().enumerate() {
            let Some(Some(look)) = self.looks.get(idx) else {
                continue;
            };
            let text = self.labels.get(idx).map(String::as_str).unwrap_or("");
            self.paint_slot(ctx, sheet, &mut layer, idx, look, rect, text);
        }

        Some(layer)
    }

    #[allow(clippy::too_many_arguments)]
    fn paint_slot(
        &self,
        ctx: &mut PaintContext<'_>,
        sheet: &StyleSheet,
        layer: &mut Layer,
        idx: usize,
        look: &SlotLook,
        rect: Rect,
        text: &str,
    ) {
        let merged = StyleRef::new(look.class.as_str()).merged(sheet, self.slot_state(idx));
        let scale = *look.scale.current();
        let drawn = Rect::centered_at(rect.center(), rect.size().scaled(scale.max(0.0)));
        let radius = merged.number("border-radius", DEFAULT_SLOT_RADIUS) * scale.max(0.0);

        let border_width = merged.number("border-width", 0.0);
        let border_color = *look.border.current();
        let background = *look.background.current();
        layer.push(if border_width > 0.0 && border_color.is_visible() {
            DrawCommand::bordered_rect(
                drawn,
                background,
                radius,
                Border::new(border_width, border_color),
            )
        } else {
            DrawCommand::rounded_rect(drawn, background, radius)
        });

        if !text.is_empty() {
            let font_size = merged.font_size().trunc();
            let size = Size::new(rect.width.max(1.0), rect.height.max(1.0));
            let request = text_request(&merged, text, font_size, size, ctx.scale_factor());
            let raster = ctx.text(&request);
            layer.push(DrawCommand::Text { raster, rect: drawn });
        }
    }
}
