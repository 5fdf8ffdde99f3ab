//! Styled interactive element: hover/press feedback through an overlay.
//!
//! A button starts out `Created` with its style request queued. The host
//! calls [`Button::realize`] once its first layout is committed; that attaches
//! the overlay and applies the queued style exactly once. Style changes after
//! that apply immediately.

use crate::animation::elastic::apply_elastic;
use crate::animation::DragSession;
use crate::renderer::{Layer, PaintContext};
use crate::style::{PropertyMap, SharedStyles, StyleRef, VisualState};
use crate::widgets::overlay::{Overlay, OverlayTick, RenderMode};
use crate::widgets::{ControlEvent, ControlEventKind, ControlId, Point, Rect, Size};
use crate::EngineConfig;

/// Logical side used when a class declares no size.
pub const DEFAULT_SIZE: f32 = 64.0;

/// `width`/`height` of a base style, falling back to `object-size`, then to
/// `current` when it is non-empty, then to [`DEFAULT_SIZE`].
pub(crate) fn styled_size(base: &PropertyMap, current: Size) -> Size {
    let fallback = base.number_opt("object-size");
    let pick = |declared: Option<f32>, current: f32| {
        declared
            .or(fallback)
            .unwrap_or(if current > 0.0 { current } else { DEFAULT_SIZE })
    };
    Size::new(
        pick(base.number_opt("width"), current.width),
        pick(base.number_opt("height"), current.height),
    )
}

/// Point the overlay at the look of `merged`: scale and rotate on the
/// style's transition, colour on its own run, shadows crossfaded.
pub(crate) fn drive_overlay(overlay: &mut Overlay, merged: PropertyMap) {
    let (scale, rotate) = merged.transform();
    let transition = merged.transition().to_transition();

    if let Some(background) = merged.color("background") {
        overlay.animate_background(background, transition.duration_ms);
    }
    if overlay.has_shadow() {
        overlay.transition_shadows(merged.box_shadow().unwrap_or_default(), transition.clone());
    }
    overlay.set_style(merged);
    overlay.animate_scale(scale, transition.clone());
    overlay.animate_rotate(rotate, transition);
}

enum Phase {
    /// Not yet laid out; the style request waits here.
    Created { pending: Option<StyleRef> },
    Realized(Overlay),
}

pub struct Button {
    id: ControlId,
    styles: SharedStyles,
    config: EngineConfig,
    style: Option<StyleRef>,
    phase: Phase,
    text: Option<String>,
    icon: Option<String>,
    /// Logical rectangle in window coordinates
    geometry: Rect,
    /// Size reported to layout, fixed by the first style applied
    layout_size: Size,
    hovered: bool,
    pressed: bool,
    drag: Option<DragSession>,
    elastic_radius: f32,
}

impl Button {
    pub fn new(id: ControlId, styles: SharedStyles, config: &EngineConfig) -> Self {
        Self {
            id,
            styles,
            config: config.clone(),
            style: None,
            phase: Phase::Created { pending: None },
            text: None,
            icon: None,
            geometry: Rect::default(),
            layout_size: Size::ZERO,
            hovered: false,
            pressed: false,
            drag: None,
            elastic_radius: 0.0,
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.set_style_ref(StyleRef::new(class));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(Some(text.into()));
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn id(&self) -> ControlId {
        self.id
    }

    pub fn style_ref(&self) -> Option<&StyleRef> {
        self.style.as_ref()
    }

    pub fn set_class(&mut self, class: impl Into<String>) {
        self.set_style_ref(StyleRef::new(class));
    }

    /// Style from `class` or one of its components. Queued until realized.
    pub fn set_style_ref(&mut self, style: StyleRef) {
        self.style = Some(style.clone());
        if let Phase::Created { pending } = &mut self.phase {
            self.layout_size = styled_size(&style.base(&self.styles.borrow()), self.layout_size);
            *pending = Some(style);
            return;
        }
        self.apply_style(false);
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: Option<String>) {
        if let Phase::Realized(overlay) = &mut self.phase {
            overlay.set_text(text.clone());
        }
        self.text = text;
    }

    pub fn is_realized(&self) -> bool {
        matches!(self.phase, Phase::Realized(_))
    }

    /// Attach the overlay and apply the queued style. Later calls do nothing.
    pub fn realize(&mut self) {
        let pending = match &mut self.phase {
            Phase::Created { pending } => pending.take(),
            Phase::Realized(_) => return,
        };
        let size = if self.layout_size.is_empty() {
            self.geometry.size()
        } else {
            self.layout_size
        };
        let mut overlay = Overlay::new(size, self.config.overlay_multiplier);
        overlay.set_mode(if self.icon.is_some() {
            RenderMode::Icon
        } else {
            RenderMode::Rect
        });
        overlay.set_text(self.text.clone());
        overlay.set_icon(self.icon.clone());
        overlay.center_on(self.geometry.center());
        self.phase = Phase::Realized(overlay);
        log::debug!("realized control {:?}", self.id);

        if pending.is_some() {
            self.apply_style(true);
        }
    }

    /// Size the host should lay this control out at.
    pub fn preferred_size(&self) -> Size {
        if self.layout_size.is_empty() {
            self.geometry.size()
        } else {
            self.layout_size
        }
    }

    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    /// Logical rectangle in window coordinates; the overlay re-centres on it.
    pub fn set_geometry(&mut self, rect: Rect) {
        self.geometry = rect;
        if let Phase::Realized(overlay) = &mut self.phase {
            overlay.center_on(rect.center());
        }
    }

    /// Move the overlay only, leaving the logical rectangle alone.
    pub(crate) fn place_overlay(&mut self, center: Point) {
        if let Phase::Realized(overlay) = &mut self.phase {
            overlay.center_on(center);
        }
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        match &self.phase {
            Phase::Realized(overlay) => Some(overlay),
            Phase::Created { .. } => None,
        }
    }

    pub fn overlay_mut(&mut self) -> Option<&mut Overlay> {
        match &mut self.phase {
            Phase::Realized(overlay) => Some(overlay),
            Phase::Created { .. } => None,
        }
    }

    pub fn visual_state(&self) -> VisualState {
        VisualState::resolve(self.pressed, self.hovered)
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Re-read the class after the sheet was replaced.
    pub fn restyle(&mut self) {
        if self.is_realized() && self.style.is_some() {
            self.layout_size = Size::ZERO;
            self.apply_style(false);
        }
    }

    fn apply_style(&mut self, immediate: bool) {
        let Some(style) = self.style.clone() else {
            return;
        };
        let base = style.base(&self.styles.borrow());
        let size = styled_size(&base, self.geometry.size());
        if self.layout_size.is_empty() {
            self.layout_size = size;
        }
        self.elastic_radius = base.elastic_drag();
        let has_shadow = style.declares(&self.styles.borrow(), "box-shadow");

        let Phase::Realized(overlay) = &mut self.phase else {
            return;
        };
        overlay.set_logical_size(size);
        overlay.center_on(self.geometry.center());
        if immediate {
            let merged = style.merged(&self.styles.borrow(), VisualState::resolve(self.pressed, self.hovered));
            if has_shadow {
                overlay.enable_shadow(merged.box_shadow().unwrap_or_default());
            }
            let (scale, rotate) = merged.transform();
            overlay.set_scale(scale);
            overlay.set_rotate(rotate);
            if let Some(background) = merged.color("background") {
                overlay.set_background(background);
            }
            overlay.set_style(merged);
            return;
        }
        if has_shadow && !overlay.has_shadow() {
            overlay.enable_shadow(base.box_shadow().unwrap_or_default());
        }
        self.update_visual_state();
    }

    /// Animate the overlay toward the style of the current visual state.
    pub fn update_visual_state(&mut self) {
        let state = self.visual_state();
        let (Some(style), Phase::Realized(overlay)) = (&self.style, &mut self.phase) else {
            return;
        };
        let merged = style.merged(&self.styles.borrow(), state);
        log::trace!("control {:?} -> {}", self.id, state.as_str());
        drive_overlay(overlay, merged);
    }

    /// Hit area: the logical size scaled by the live overlay scale, centred
    /// on the control. `local` is relative to the control's top-left.
    pub fn hit_test(&self, local: Point) -> bool {
        let Some(overlay) = self.overlay() else {
            return Rect::from_size(self.geometry.size()).contains_point(local);
        };
        let scale = overlay.scale();
        let size = overlay.logical_size();
        let dx = (local.x - self.geometry.width / 2.0).abs();
        let dy = (local.y - self.geometry.height / 2.0).abs();
        dx <= size.width / 2.0 * scale && dy <= size.height / 2.0 * scale
    }

    pub fn pointer_enter(&mut self) {
        self.hovered = true;
        self.update_visual_state();
    }

    pub fn pointer_leave(&mut self) {
        self.hovered = false;
        self.update_visual_state();
    }

    /// Returns whether the press landed in the hit area.
    pub fn pointer_press(&mut self, local: Point) -> bool {
        if !self.hit_test(local) {
            return false;
        }
        self.pressed = true;
        self.drag = Some(DragSession::new(local, self.elastic_radius));
        self.update_visual_state();
        true
    }

    pub fn pointer_move(&mut self, local: Point) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        drag.update(local, self.config.jelly.velocity_keep);
        if drag.radius_fraction <= 0.0 {
            return;
        }
        let deform = apply_elastic(drag.origin, local, self.geometry.width, drag.radius_fraction);
        if let Phase::Realized(overlay) = &mut self.phase {
            overlay.set_elastic(deform);
        }
    }

    /// Ends a press. Emits `Clicked` when the release is inside the hit area.
    pub fn pointer_release(&mut self, local: Point) -> Option<ControlEvent> {
        if !self.pressed {
            return None;
        }
        self.pressed = false;
        self.hovered = Rect::from_size(self.geometry.size()).contains_point(local);
        let clicked = self.hit_test(local);
        self.update_visual_state();
        self.drag = None;
        let snap_ms = self.config.button_snap_ms;
        if let Phase::Realized(overlay) = &mut self.phase {
            overlay.release_elastic(snap_ms);
        }
        clicked.then(|| ControlEvent::new(self.id, ControlEventKind::Clicked))
    }

    /// Force the pressed look for a control whose owner routes the pointer.
    pub(crate) fn set_pressed(&mut self, pressed: bool) {
        if self.pressed != pressed {
            self.pressed = pressed;
            self.update_visual_state();
        }
    }

    /// Drop hover and press without emitting anything.
    pub fn reset_interaction(&mut self) {
        self.hovered = false;
        self.pressed = false;
        self.drag = None;
        self.update_visual_state();
    }

    pub fn tick(&mut self, dt_ms: f32) -> OverlayTick {
        match &mut self.phase {
            Phase::Realized(overlay) => overlay.tick(dt_ms),
            Phase::Created { .. } => OverlayTick::default(),
        }
    }

    /// Shadow layer (if any) followed by the overlay.
    pub fn paint(&self, ctx: &mut PaintContext<'_>) -> Vec<Layer> {
        let Some(overlay) = self.overlay() else {
            return Vec::new();
        };
        overlay.paint_shadow().into_iter().chain(overlay.paint(ctx)).collect()
    }
}
