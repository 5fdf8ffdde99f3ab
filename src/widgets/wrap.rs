//! Styling for an element the host owns.
//!
//! A [`Wrap`] never hit-tests or emits events: the host forwards enter,
//! leave, press and release of its own element and the overlay follows the
//! class's base/hover/active looks.

use crate::renderer::{Layer, PaintContext};
use crate::style::{SharedStyles, StyleRef, VisualState};
use crate::widgets::button::{drive_overlay, DEFAULT_SIZE};
use crate::widgets::overlay::{Overlay, OverlayTick, RenderMode};
use crate::widgets::{ChangeFlags, ControlId, Rect, Size};
use crate::EngineConfig;

pub struct Wrap {
    id: ControlId,
    styles: SharedStyles,
    style: StyleRef,
    multiplier: f32,
    overlay: Option<Overlay>,
    geometry: Rect,
    hovered: bool,
    pressed: bool,
}

impl Wrap {
    pub fn new(id: ControlId, styles: SharedStyles, config: &EngineConfig, class: impl Into<String>) -> Self {
        Self {
            id,
            styles,
            style: StyleRef::new(class),
            multiplier: config.overlay_multiplier,
            overlay: None,
            geometry: Rect::default(),
            hovered: false,
            pressed: false,
        }
    }

    pub fn id(&self) -> ControlId {
        self.id
    }

    /// `width`/`height` of the class, else the element's own size, else 64.
    pub fn preferred_size(&self) -> Size {
        let base = self.style.base(&self.styles.borrow());
        let pick = |declared: Option<f32>, own: f32| {
            declared.unwrap_or(if own > 0.0 { own } else { DEFAULT_SIZE })
        };
        Size::new(
            pick(base.number_opt("width"), self.geometry.width),
            pick(base.number_opt("height"), self.geometry.height),
        )
    }

    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    pub fn set_geometry(&mut self, rect: Rect) {
        self.geometry = rect;
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.center_on(rect.center());
        }
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn is_realized(&self) -> bool {
        self.overlay.is_some()
    }

    /// Attach the overlay and head for the current look.
    pub fn realize(&mut self) {
        if self.overlay.is_some() {
            return;
        }
        let mut overlay = Overlay::new(self.preferred_size(), self.multiplier);
        overlay.set_mode(RenderMode::Rect);
        overlay.center_on(self.geometry.center());
        self.overlay = Some(overlay);
        log::debug!("wrapped element {:?} with .{}", self.id, self.style.class);
        self.update();
    }

    pub fn restyle(&mut self) {
        let size = self.preferred_size();
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.set_logical_size(size);
        }
        self.update();
    }

    pub fn visual_state(&self) -> VisualState {
        VisualState::resolve(self.pressed, self.hovered)
    }

    fn update(&mut self) {
        let state = self.visual_state();
        let Some(overlay) = self.overlay.as_mut() else {
            return;
        };
        drive_overlay(overlay, self.style.merged(&self.styles.borrow(), state));
    }

    pub fn pointer_enter(&mut self) {
        self.hovered = true;
        self.update();
    }

    pub fn pointer_leave(&mut self) {
        self.hovered = false;
        self.update();
    }

    pub fn pointer_press(&mut self) {
        self.pressed = true;
        self.update();
    }

    pub fn pointer_release(&mut self) {
        self.pressed = false;
        self.update();
    }

    pub fn tick(&mut self, dt_ms: f32) -> ChangeFlags {
        self.overlay
            .as_mut()
            .map(|overlay| overlay.tick(dt_ms))
            .unwrap_or_default()
            .flags()
    }

    pub fn paint(&self, ctx: &mut PaintContext<'_>) -> Vec<Layer> {
        self.overlay.iter().filter_map(|overlay| overlay.paint(ctx)).collect()
    }
}

impl std::fmt::Debug for Wrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wrap")
            .field("id", &self.id)
            .field("class", &self.style.class)
            .field("state", &self.visual_state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::style::StyleSheet;
    use crate::widgets::{Color, Point};

    const SHEET: &str = "
        .card { width: 120; height: 80; background: #101010; transition: 0.2s linear; }
        .card:hover { background: #202020; transform: scale(1.1) rotate(4deg); }
        .card:active { transform: scale(0.95); }
    ";

    fn wrap(class: &str, own: Rect) -> Wrap {
        let styles = Rc::new(RefCell::new(StyleSheet::from_source(SHEET)));
        let mut wrap = Wrap::new(ControlId(3), styles, &EngineConfig::default(), class);
        wrap.set_geometry(own);
        wrap.realize();
        wrap
    }

    #[test]
    fn test_size_from_class_or_element() {
        let wrap_card = wrap("card", Rect::new(0.0, 0.0, 30.0, 30.0));
        assert_eq!(wrap_card.preferred_size(), Size::new(120.0, 80.0));
        let plain = wrap("plain", Rect::new(0.0, 0.0, 30.0, 20.0));
        assert_eq!(plain.preferred_size(), Size::new(30.0, 20.0));
        let empty = wrap("plain", Rect::default());
        assert_eq!(empty.overlay().unwrap().logical_size(), Size::new(64.0, 64.0));
    }

    #[test]
    fn test_hover_and_press_follow_style() {
        let mut wrap = wrap("card", Rect::new(0.0, 0.0, 120.0, 80.0));
        wrap.tick(200.0);
        assert_eq!(wrap.overlay().unwrap().background(), Color::from_hex(0x101010));

        wrap.pointer_enter();
        wrap.tick(200.0);
        let overlay = wrap.overlay().unwrap();
        assert_eq!(overlay.background(), Color::from_hex(0x202020));
        assert_eq!(overlay.scale(), 1.1);
        assert_eq!(overlay.rotate(), 4.0);

        wrap.pointer_press();
        assert_eq!(wrap.visual_state(), VisualState::Active);
        wrap.tick(200.0);
        assert_eq!(wrap.overlay().unwrap().scale(), 0.95);
        wrap.pointer_release();
        assert_eq!(wrap.visual_state(), VisualState::Hover);
    }

    #[test]
    fn test_overlay_follows_element() {
        let mut wrap = wrap("card", Rect::new(0.0, 0.0, 120.0, 80.0));
        wrap.set_geometry(Rect::new(200.0, 100.0, 120.0, 80.0));
        assert_eq!(wrap.overlay().unwrap().center(), Point::new(260.0, 140.0));
    }
}
