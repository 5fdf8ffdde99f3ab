//! The oversized canvas a control is drawn on.
//!
//! An overlay sits in window coordinates, five times the size of the control
//! it represents and centred on it, so that scale, rotation and elastic
//! squash never clip at the control's bounds. It owns every animated visual
//! value of the control; controllers only decide targets.

use bitflags::bitflags;

use crate::animation::elastic::{damped_flatten_easing, snap_back_easing};
use crate::animation::{AdvanceResult, AnimationState, ElasticDeform, TimingFunction, Transition};
use crate::renderer::{Border, DrawCommand, Layer, PaintContext, TextRequest};
use crate::style::{BoxShadow, PropertyMap};
use crate::transform::Transform;
use crate::widgets::{ChangeFlags, Color, Point, Rect, Size};

/// Default oversize factor between the canvas and the logical size.
pub const OVERLAY_MULTIPLIER: f32 = 5.0;
/// Shortest shadow crossfade.
const MIN_SHADOW_FADE_MS: f32 = 60.0;
/// Share of the smaller logical side an icon takes without `object-size`.
const ICON_FRACTION: f32 = 0.6;

bitflags! {
    /// Animated overlay properties, as reported by [`Overlay::tick`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct OverlayProps: u8 {
        const SCALE = 1 << 0;
        const ROTATE = 1 << 1;
        const OFFSET = 1 << 2;
        const FLATTEN = 1 << 3;
        const BACKGROUND = 1 << 4;
        const OPACITY = 1 << 5;
        const SHADOW = 1 << 6;
    }
}

/// What one [`Overlay::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlayTick {
    /// Properties whose value moved, including on their final tick
    pub changed: OverlayProps,
    /// Properties whose animation completed on this tick
    pub finished: OverlayProps,
}

impl OverlayTick {
    pub fn flags(&self) -> ChangeFlags {
        if self.changed.is_empty() {
            ChangeFlags::empty()
        } else {
            ChangeFlags::PAINT
        }
    }
}

/// How the overlay draws its decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Background plus the declared `border-width`/`border-color`
    #[default]
    Rect,
    /// Background and icon only
    Icon,
}

/// Zero-size controls still get a 1×1 body, keeping ratios finite.
fn at_least_one(size: Size) -> Size {
    Size::new(size.width.max(1.0), size.height.max(1.0))
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

/// Crossfade between two `box-shadow` lists.
pub struct ShadowFade {
    from: Vec<BoxShadow>,
    to: Vec<BoxShadow>,
    mix: AnimationState<f32>,
}

impl ShadowFade {
    pub fn new(shadows: Vec<BoxShadow>) -> Self {
        Self {
            from: Vec::new(),
            to: shadows,
            mix: AnimationState::new(1.0, Transition::default()),
        }
    }

    /// Fade from whatever is showing now to `shadows`.
    pub fn transition_to(&mut self, shadows: Vec<BoxShadow>, transition: Transition) {
        let duration = transition.duration_ms.max(MIN_SHADOW_FADE_MS);
        self.from = std::mem::replace(&mut self.to, shadows);
        self.mix.animate(0.0, 1.0, transition.duration(duration));
    }

    pub fn advance(&mut self, dt_ms: f32) -> AdvanceResult<f32> {
        self.mix.advance(dt_ms)
    }

    /// Weight of the newest list; the previous one shows at `1 - mix`.
    pub fn mix(&self) -> f32 {
        self.mix.current().clamp(0.0, 1.0)
    }

    pub fn is_animating(&self) -> bool {
        self.mix.is_animating()
    }

    pub fn current(&self) -> &[BoxShadow] {
        &self.to
    }

    /// Shadow commands for a shape at `rect`, radius limited to the shape.
    pub fn commands(&self, rect: Rect, radius: f32) -> Vec<DrawCommand> {
        let radius = radius.min(rect.width / 2.0).min(rect.height / 2.0);
        let mix = self.mix();
        let fading = self.from.iter().map(|s| (s, 1.0 - mix));
        let showing = self.to.iter().map(|s| (s, mix));
        fading
            .chain(showing)
            .filter(|(_, opacity)| *opacity > 0.0)
            .map(|(shadow, opacity)| DrawCommand::Shadow {
                rect,
                radius,
                shadow: *shadow,
                opacity,
            })
            .collect()
    }
}

/// Animated visual state of one control and the canvas it paints on.
pub struct Overlay {
    logical: Size,
    multiplier: f32,
    /// Canvas bounds in window coordinates
    canvas: Rect,
    scale: AnimationState<f32>,
    rotate: AnimationState<f32>,
    offset: AnimationState<Point>,
    flatten: AnimationState<f32>,
    direction: Point,
    background: AnimationState<Color>,
    opacity: AnimationState<f32>,
    font_size: f32,
    style: PropertyMap,
    mode: RenderMode,
    text: Option<String>,
    icon: Option<String>,
    shadow: Option<ShadowFade>,
    visible: bool,
}

impl Overlay {
    pub fn new(logical: Size, multiplier: f32) -> Self {
        let multiplier = multiplier.max(1.0);
        let logical = at_least_one(logical);
        Self {
            logical,
            multiplier,
            canvas: Rect::from_size(logical.scaled(multiplier)),
            scale: AnimationState::new(1.0, Transition::default()),
            rotate: AnimationState::new(0.0, Transition::default()),
            offset: AnimationState::new(Point::ZERO, Transition::default()),
            flatten: AnimationState::new(0.0, Transition::default()),
            direction: Point::ZERO,
            background: AnimationState::new(Color::TRANSPARENT, Transition::default()),
            opacity: AnimationState::new(1.0, Transition::default()),
            font_size: crate::style::DEFAULT_FONT_SIZE,
            style: PropertyMap::new(),
            mode: RenderMode::Rect,
            text: None,
            icon: None,
            shadow: None,
            visible: true,
        }
    }

    /// Resize the logical rectangle; the canvas follows and keeps its centre.
    pub fn set_logical_size(&mut self, size: Size) {
        let center = self.canvas.center();
        let size = at_least_one(size);
        self.logical = size;
        self.canvas = Rect::centered_at(center, size.scaled(self.multiplier));
    }

    /// Logical (CSS) size, never below 1×1.
    pub fn logical_size(&self) -> Size {
        self.logical
    }

    /// Re-centre the canvas on a control centre given in window coordinates.
    pub fn center_on(&mut self, center: Point) {
        self.canvas = Rect::centered_at(center, self.canvas.size());
    }

    pub fn canvas(&self) -> Rect {
        self.canvas
    }

    /// Canvas centre in window coordinates.
    pub fn center(&self) -> Point {
        self.canvas.center()
    }

    pub fn scale(&self) -> f32 {
        *self.scale.current()
    }

    pub fn rotate(&self) -> f32 {
        *self.rotate.current()
    }

    pub fn offset(&self) -> Point {
        *self.offset.current()
    }

    pub fn flatten(&self) -> f32 {
        *self.flatten.current()
    }

    pub fn direction(&self) -> Point {
        self.direction
    }

    pub fn background(&self) -> Color {
        *self.background.current()
    }

    pub fn opacity(&self) -> f32 {
        *self.opacity.current()
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn scale_target(&self) -> f32 {
        *self.scale.target()
    }

    pub fn background_target(&self) -> Color {
        *self.background.target()
    }

    pub fn is_animating_background_to(&self, color: Color) -> bool {
        self.background.is_animating_to(&color)
    }

    pub fn animate_scale(&mut self, to: f32, transition: Transition) {
        self.scale.animate_to(to, transition);
    }

    pub fn animate_scale_from(&mut self, from: f32, to: f32, transition: Transition) {
        self.scale.animate(from, to, transition);
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale.set_immediate(scale);
    }

    pub fn animate_rotate(&mut self, to: f32, transition: Transition) {
        self.rotate.animate_to(to, transition);
    }

    pub fn set_rotate(&mut self, degrees: f32) {
        self.rotate.set_immediate(degrees);
    }

    /// Colour runs on its own out-cubic curve with the given duration.
    pub fn animate_background(&mut self, to: Color, duration_ms: f32) {
        self.background
            .animate_to(to, Transition::new(duration_ms, TimingFunction::EaseOut));
    }

    pub fn set_background(&mut self, color: Color) {
        self.background.set_immediate(color);
    }

    pub fn animate_opacity(&mut self, from: f32, to: f32, transition: Transition) {
        self.opacity.animate(from, to, transition);
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity.set_immediate(opacity);
    }

    /// Apply a drag deformation directly, cancelling any settle in flight.
    pub fn set_elastic(&mut self, deform: ElasticDeform) {
        self.offset.set_immediate(deform.offset);
        self.flatten.set_immediate(deform.flatten);
        if deform.direction != Point::ZERO {
            self.direction = deform.direction;
        }
    }

    /// Set flatten and its axis directly, cancelling any flatten animation.
    pub fn set_flatten(&mut self, flatten: f32, direction: Point) {
        self.flatten.set_immediate(flatten);
        self.direction = direction;
    }

    pub fn animate_flatten(&mut self, from: f32, to: f32, transition: Transition) {
        self.flatten.animate(from, to, transition);
    }

    pub fn set_direction(&mut self, direction: Point) {
        self.direction = direction;
    }

    pub fn is_flatten_animating(&self) -> bool {
        self.flatten.is_animating()
    }

    /// Settle a drag: the offset springs home and the flatten rings down
    /// from its current value through the damped oscillation.
    pub fn release_elastic(&mut self, duration_ms: f32) {
        self.offset.animate_to(
            Point::ZERO,
            Transition::new(duration_ms, snap_back_easing()),
        );
        let peak = self.flatten();
        self.flatten
            .animate(peak, 0.0, Transition::new(duration_ms, damped_flatten_easing()));
    }

    pub fn style(&self) -> &PropertyMap {
        &self.style
    }

    /// Replace the style used for painting; picks up `font-size`.
    pub fn set_style(&mut self, style: PropertyMap) {
        self.font_size = style.font_size();
        self.style = style;
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: RenderMode) {
        self.mode = mode;
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: Option<String>) {
        self.text = text;
    }

    pub fn set_icon(&mut self, icon: Option<String>) {
        self.icon = icon;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn has_shadow(&self) -> bool {
        self.shadow.is_some()
    }

    /// Give the overlay a shadow layer showing `shadows`.
    pub fn enable_shadow(&mut self, shadows: Vec<BoxShadow>) {
        self.shadow = Some(ShadowFade::new(shadows));
    }

    /// Crossfade the shadow layer, if there is one.
    pub fn transition_shadows(&mut self, shadows: Vec<BoxShadow>, transition: Transition) {
        if let Some(shadow) = self.shadow.as_mut() {
            shadow.transition_to(shadows, transition);
        }
    }

    pub fn shadow(&self) -> Option<&ShadowFade> {
        self.shadow.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.scale.is_animating()
            || self.rotate.is_animating()
            || self.offset.is_animating()
            || self.flatten.is_animating()
            || self.background.is_animating()
            || self.opacity.is_animating()
            || self.shadow.as_ref().is_some_and(ShadowFade::is_animating)
    }

    /// Cancel every running animation, keeping current values.
    pub fn stop_all(&mut self) {
        self.scale.stop();
        self.rotate.stop();
        self.offset.stop();
        self.flatten.stop();
        self.background.stop();
        self.opacity.stop();
    }

    pub fn tick(&mut self, dt_ms: f32) -> OverlayTick {
        let mut tick = OverlayTick::default();
        record(&mut tick, OverlayProps::SCALE, self.scale.advance(dt_ms));
        record(&mut tick, OverlayProps::ROTATE, self.rotate.advance(dt_ms));
        record(&mut tick, OverlayProps::OFFSET, self.offset.advance(dt_ms));
        record(&mut tick, OverlayProps::FLATTEN, self.flatten.advance(dt_ms));
        record(&mut tick, OverlayProps::BACKGROUND, self.background.advance(dt_ms));
        record(&mut tick, OverlayProps::OPACITY, self.opacity.advance(dt_ms));
        if let Some(shadow) = self.shadow.as_mut() {
            record(&mut tick, OverlayProps::SHADOW, shadow.advance(dt_ms));
        }
        tick
    }

    /// Canvas centre in canvas coordinates, the pivot of every transform.
    pub fn local_center(&self) -> Point {
        Point::new(self.canvas.width / 2.0, self.canvas.height / 2.0)
    }

    /// Scale and rotate about the canvas centre, then the drag squash.
    pub fn transform(&self) -> Transform {
        let pivot = self.local_center();
        let base = Transform::scale_rotate_about(pivot, self.scale(), self.rotate());
        Transform::flatten(self.direction, self.flatten(), pivot).then(&base)
    }

    /// Logical rectangle in canvas coordinates, placed by `align`.
    pub fn logical_rect(&self) -> Rect {
        let bounds = Rect::from_size(self.canvas.size());
        self.style.align().resolve(bounds, self.logical_size())
    }

    /// Where icon and text go: the padded logical rect, shifted by the
    /// elastic offset so content follows the finger.
    pub fn content_rect(&self) -> Rect {
        let rect = self.logical_rect();
        let offset = self.offset();
        rect.inset(self.style.padding())
            .offset(offset.x * rect.width / 2.0, offset.y * rect.height / 2.0)
    }

    /// Logical rect in window coordinates at the current scale, without rotation.
    pub fn scaled_window_rect(&self) -> Rect {
        let size = self.logical_size().scaled(self.scale().max(0.0));
        Rect::centered_at(self.center(), size)
    }

    pub fn paint(&self, ctx: &mut PaintContext<'_>) -> Option<Layer> {
        if !self.visible {
            return None;
        }
        let mut layer = Layer::new(self.canvas);
        layer.opacity = self.opacity() * self.style.opacity();
        layer.transform = self.transform();

        let rect = self.logical_rect();
        let radius = self.style.radius();

        if self.style.contains("backdrop-filter") {
            if let Some((raster, blur_radius)) = ctx.backdrop(self.style.backdrop_blur()) {
                layer.push(DrawCommand::Backdrop {
                    rect,
                    radius,
                    layer: raster,
                    blur_radius,
                });
            }
        }

        let background = self.background();
        if background.is_visible() {
            layer.push(DrawCommand::rounded_rect(rect, background, radius));
        }

        if self.mode == RenderMode::Rect {
            if let Some(border) = style_border(&self.style) {
                layer.push(DrawCommand::bordered_rect(rect, Color::TRANSPARENT, radius, border));
            }
        }

        if let Some(glass) = self.style.glass_border() {
            layer.push(DrawCommand::glass_border(rect, radius, glass.light_deg, glass.width));
        }

        let content = self.content_rect();
        if let Some(icon) = &self.icon {
            let side = self
                .style
                .number_opt("object-size")
                .unwrap_or_else(|| rect.width.min(rect.height) * ICON_FRACTION);
            layer.push(DrawCommand::Icon {
                source: icon.clone(),
                rect: Rect::centered_at(content.center(), Size::new(side, side)),
            });
        }

        if let Some(text) = self.text.as_deref().filter(|t| !t.is_empty()) {
            let request = text_request(&self.style, text, self.font_size, content.size(), ctx.scale_factor());
            let raster = ctx.text(&request);
            layer.push(DrawCommand::Text { raster, rect: content });
        }

        Some(layer)
    }

    /// The shadow layer, scaled with the overlay but not rotated or squashed.
    pub fn paint_shadow(&self) -> Option<Layer> {
        let shadow = self.shadow.as_ref()?;
        if !self.visible {
            return None;
        }
        let mut layer = Layer::new(self.canvas);
        layer.opacity = self.opacity();
        layer.transform = Transform::scale_rotate_about(self.local_center(), self.scale(), 0.0);
        layer.commands = shadow.commands(self.logical_rect(), self.style.radius());
        if layer.is_empty() {
            None
        } else {
            Some(layer)
        }
    }
}

/// `border-width`/`border-color` of a style, when both are usable.
pub(crate) fn style_border(style: &PropertyMap) -> Option<Border> {
    let width = style.number("border-width", 0.0);
    let color = style.color("border-color")?;
    if width > 0.0 {
        Some(Border::new(width, color))
    } else {
        None
    }
}

/// Raster request for `text` centred in `size`, coloured by the style's `color`.
pub(crate) fn text_request(style: &PropertyMap, text: &str, font_size: f32, size: Size, scale_factor: f32) -> TextRequest {
    TextRequest {
        text: text.to_string(),
        font_size: font_size.max(1.0) as u32,
        color: style.color("color").unwrap_or(Color::WHITE),
        weight: style.font_weight(),
        family: style.get("font-family").unwrap_or("").trim().to_string(),
        size: Size::new(size.width.max(1.0), size.height.max(1.0)),
        scale_factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::testing::RecordingRasterizer;
    use crate::renderer::SurfaceCache;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn overlay(w: f32, h: f32) -> Overlay {
        let mut overlay = Overlay::new(Size::new(w, h), OVERLAY_MULTIPLIER);
        overlay.center_on(Point::new(100.0, 100.0));
        overlay
    }

    fn paint(overlay: &Overlay) -> (Layer, RecordingRasterizer) {
        let mut raster = RecordingRasterizer::default();
        let mut cache = SurfaceCache::new(64);
        let layer = {
            let mut ctx = PaintContext::new(&mut cache, &mut raster);
            overlay.paint(&mut ctx).unwrap()
        };
        (layer, raster)
    }

    #[test]
    fn test_canvas_is_oversized_and_centered() {
        let overlay = overlay(80.0, 40.0);
        assert_eq!(overlay.canvas(), Rect::new(-100.0, 0.0, 400.0, 200.0));
        assert_eq!(overlay.logical_rect(), Rect::new(160.0, 80.0, 80.0, 40.0));
    }

    #[test]
    fn test_resize_keeps_center() {
        let mut overlay = overlay(80.0, 40.0);
        overlay.set_logical_size(Size::new(20.0, 20.0));
        assert_eq!(overlay.center(), Point::new(100.0, 100.0));
        assert_eq!(overlay.canvas().size(), Size::new(100.0, 100.0));
    }

    #[test]
    fn test_degenerate_size_is_clamped() {
        let mut overlay = Overlay::new(Size::ZERO, OVERLAY_MULTIPLIER);
        assert_eq!(overlay.logical_size(), Size::new(1.0, 1.0));
        assert_eq!(overlay.canvas().size(), Size::new(5.0, 5.0));

        overlay.set_logical_size(Size::new(40.0, 0.0));
        assert_eq!(overlay.logical_size(), Size::new(40.0, 1.0));
        assert_eq!(overlay.canvas().size(), Size::new(200.0, 5.0));
    }

    #[test]
    fn test_align_places_logical_rect() {
        let mut overlay = overlay(80.0, 40.0);
        overlay.set_style([("align", "left top")].into_iter().collect());
        assert_eq!(overlay.logical_rect(), Rect::new(0.0, 0.0, 80.0, 40.0));
    }

    #[test]
    fn test_transform_pivots_on_canvas_center() {
        let mut overlay = overlay(80.0, 40.0);
        assert!(overlay.transform().is_identity());
        overlay.set_scale(2.0);
        let c = overlay.local_center();
        assert_eq!(overlay.transform().transform_point(c), c);
        let p = overlay.transform().transform_point(Point::new(c.x + 10.0, c.y));
        assert!(approx_eq(p.x, c.x + 20.0));
    }

    #[test]
    fn test_squash_applies_after_scale() {
        let mut overlay = overlay(80.0, 40.0);
        overlay.set_scale(1.5);
        overlay.set_rotate(30.0);
        overlay.set_flatten(0.5, Point::new(1.0, 0.0));
        let c = overlay.local_center();
        let expected = Transform::flatten(Point::new(1.0, 0.0), 0.5, c)
            .then(&Transform::scale_rotate_about(c, 1.5, 30.0));
        let p = Point::new(c.x + 7.0, c.y - 3.0);
        let got = overlay.transform().transform_point(p);
        let want = expected.transform_point(p);
        assert!(approx_eq(got.x, want.x) && approx_eq(got.y, want.y));
    }

    #[test]
    fn test_background_skipped_when_transparent() {
        let overlay = overlay(80.0, 40.0);
        let (layer, _) = paint(&overlay);
        assert!(layer.commands.is_empty());
    }

    #[test]
    fn test_background_uses_animated_color() {
        let mut overlay = overlay(80.0, 40.0);
        overlay.set_style([("background", "#ff0000")].into_iter().collect());
        overlay.set_background(Color::rgb(0.0, 0.0, 1.0));
        let (layer, _) = paint(&overlay);
        assert_eq!(
            layer.commands[0],
            DrawCommand::rounded_rect(overlay.logical_rect(), Color::rgb(0.0, 0.0, 1.0), 12.0)
        );
    }

    #[test]
    fn test_rect_mode_draws_border() {
        let mut overlay = overlay(80.0, 40.0);
        overlay.set_style(
            [("border-width", "2"), ("border-color", "#ffffff")]
                .into_iter()
                .collect(),
        );
        let (layer, _) = paint(&overlay);
        assert!(matches!(
            layer.commands[0],
            DrawCommand::RoundedRect { border: Some(b), .. } if b.width == 2.0
        ));

        overlay.set_mode(RenderMode::Icon);
        let (layer, _) = paint(&overlay);
        assert!(layer.commands.is_empty());
    }

    #[test]
    fn test_text_follows_elastic_offset() {
        let mut overlay = overlay(80.0, 40.0);
        overlay.set_text(Some("Go".to_string()));
        overlay.set_elastic(ElasticDeform {
            offset: Point::new(0.5, 0.0),
            flatten: 0.2,
            direction: Point::new(1.0, 0.0),
        });
        let (layer, raster) = paint(&overlay);
        let logical = overlay.logical_rect();
        match &layer.commands[0] {
            DrawCommand::Text { rect, .. } => assert_eq!(*rect, logical.offset(20.0, 0.0)),
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(raster.texts[0].color, Color::WHITE);
        assert_eq!(raster.texts[0].font_size, 13);
    }

    #[test]
    fn test_icon_default_size() {
        let mut overlay = overlay(80.0, 40.0);
        overlay.set_mode(RenderMode::Icon);
        overlay.set_icon(Some("star.svg".to_string()));
        let (layer, _) = paint(&overlay);
        match &layer.commands[0] {
            DrawCommand::Icon { rect, .. } => assert!(approx_eq(rect.width, 24.0)),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_backdrop_comes_first() {
        let mut overlay = overlay(80.0, 40.0);
        overlay.set_style(
            [("backdrop-filter", "blur(18px)"), ("background", "#ffffff33")]
                .into_iter()
                .collect(),
        );
        overlay.set_background(Color::rgba(1.0, 1.0, 1.0, 0.2));
        let (layer, raster) = paint(&overlay);
        assert!(matches!(layer.commands[0], DrawCommand::Backdrop { blur_radius: 16, .. }));
        assert_eq!(raster.blurs, vec![16]);
    }

    #[test]
    fn test_release_rings_down() {
        let mut overlay = overlay(80.0, 40.0);
        overlay.set_elastic(ElasticDeform {
            offset: Point::new(0.4, 0.0),
            flatten: 0.5,
            direction: Point::new(1.0, 0.0),
        });
        overlay.release_elastic(1000.0);
        overlay.tick(500.0);
        assert!(approx_eq(overlay.flatten(), -0.1));
        let tick = overlay.tick(500.0);
        assert!(tick.finished.contains(OverlayProps::FLATTEN | OverlayProps::OFFSET));
        assert_eq!(overlay.flatten(), 0.0);
        assert_eq!(overlay.offset(), Point::ZERO);
    }

    #[test]
    fn test_tick_reports_paint() {
        let mut overlay = overlay(80.0, 40.0);
        assert_eq!(overlay.tick(16.0).flags(), ChangeFlags::empty());
        overlay.animate_scale(1.05, Transition::new(300.0, TimingFunction::EaseOut));
        let tick = overlay.tick(16.0);
        assert_eq!(tick.flags(), ChangeFlags::PAINT);
        assert!(tick.changed.contains(OverlayProps::SCALE));
    }

    #[test]
    fn test_shadow_crossfade_weights() {
        let a = BoxShadow {
            blur: 10.0,
            ..Default::default()
        };
        let b = BoxShadow {
            blur: 20.0,
            ..Default::default()
        };
        let mut fade = ShadowFade::new(vec![a]);
        fade.transition_to(vec![b], Transition::new(100.0, TimingFunction::Linear));
        fade.advance(25.0);
        let commands = fade.commands(Rect::new(0.0, 0.0, 80.0, 40.0), 30.0);
        assert_eq!(commands.len(), 2);
        match (&commands[0], &commands[1]) {
            (
                DrawCommand::Shadow {
                    opacity: old,
                    radius,
                    ..
                },
                DrawCommand::Shadow { opacity: new, .. },
            ) => {
                assert!(approx_eq(*old, 0.75));
                assert!(approx_eq(*new, 0.25));
                assert_eq!(*radius, 20.0);
            }
            other => panic!("unexpected commands {:?}", other),
        }
    }

    #[test]
    fn test_shadow_fade_has_minimum_duration() {
        let mut fade = ShadowFade::new(Vec::new());
        fade.transition_to(Vec::new(), Transition::new(10.0, TimingFunction::Linear));
        fade.advance(30.0);
        assert!(approx_eq(fade.mix(), 0.5));
    }
}
