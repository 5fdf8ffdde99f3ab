//! Two-state switch: a styled track with a draggable knob.
//!
//! The track and knob are [`Button`]s styled from the `toggle` and
//! `toggle-knob` components of the toggle's class. The toggle routes the
//! pointer itself; the track never sees events and the knob only shows its
//! pressed look.
//!
//! A press outside the knob toggles at once. A press on the knob toggles on
//! release when the pointer stayed within the drag threshold, otherwise the
//! knob is dragged along the rail and the release settles by midpoint.

use crate::animation::elastic::{damped_flatten_easing, overshoot_stretch, stretch_reset_easing, track_stretch};
use crate::animation::{AdvanceResult, Animatable, AnimationState, DragSession, ElasticDeform, Transition};
use crate::renderer::{Layer, PaintContext};
use crate::style::{SharedStyles, StyleRef, TransitionValue, VisualState};
use crate::widgets::button::Button;
use crate::widgets::{ChangeFlags, Color, ControlEvent, ControlEventKind, ControlId, Point, Rect, Size};
use crate::EngineConfig;

pub const TRACK_COMPONENT: &str = "toggle";
pub const KNOB_COMPONENT: &str = "toggle-knob";

const DEFAULT_TRACK_SIZE: Size = Size::new(64.0, 34.0);
const DEFAULT_KNOB_SIZE: Size = Size::new(26.0, 26.0);
const DEFAULT_TRACK_COLOR: Color = Color::from_hex(0x444444);
const DEFAULT_KNOB_COLOR: Color = Color::WHITE;
/// Gap between the knob and either end of the track.
const KNOB_INSET: f32 = 4.0;
/// Knob squash set as a springy snap starts.
const SNAP_JELLY: f32 = 0.4;
const MAX_OVERSHOOT_JELLY: f32 = 0.5;
const OVERSHOOT_JELLY_GAIN: f32 = 1.3;

struct KnobDrag {
    session: DragSession,
    /// Knob x when the press landed
    start_x: f32,
}

/// The knob snap in flight and what to do once it lands.
#[derive(Debug, Clone, Copy)]
struct Snap {
    target: f32,
    springy: bool,
    /// Side the knob travels toward, `1` right and `-1` left
    side: f32,
}

pub struct Toggle {
    id: ControlId,
    styles: SharedStyles,
    config: EngineConfig,
    track_style: StyleRef,
    knob_style: StyleRef,
    track: Button,
    knob: Button,
    /// Toggle rectangle in window coordinates
    geometry: Rect,
    track_size: Size,
    knob_size: Size,
    checked: bool,
    hovered: bool,
    /// Knob left edge relative to the toggle
    knob_x: AnimationState<f32>,
    snap: Option<Snap>,
    drag: Option<KnobDrag>,
}

impl Toggle {
    pub fn new(id: ControlId, styles: SharedStyles, config: &EngineConfig, class: impl Into<String>) -> Self {
        let class = class.into();
        let track_style = StyleRef::component(class.as_str(), TRACK_COMPONENT);
        let knob_style = StyleRef::component(class, KNOB_COMPONENT);

        let mut track = Button::new(id, styles.clone(), config);
        track.set_style_ref(track_style.clone());
        let mut knob = Button::new(id, styles.clone(), config);
        knob.set_style_ref(knob_style.clone());

        let mut toggle = Self {
            id,
            styles,
            config: config.clone(),
            track_style,
            knob_style,
            track,
            knob,
            geometry: Rect::default(),
            track_size: DEFAULT_TRACK_SIZE,
            knob_size: DEFAULT_KNOB_SIZE,
            checked: false,
            hovered: false,
            knob_x: AnimationState::new(KNOB_INSET, Transition::default()),
            snap: None,
            drag: None,
        };
        toggle.read_sizes();
        toggle.knob_x.set_immediate(toggle.rest_x());
        toggle.layout();
        toggle
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.set_checked(checked);
        self
    }

    pub fn id(&self) -> ControlId {
        self.id
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Change the state without emitting anything.
    pub fn set_checked(&mut self, checked: bool) {
        if checked == self.checked {
            return;
        }
        self.checked = checked;
        self.sync_track_color(self.track_state());
        self.snap_knob();
    }

    pub fn track(&self) -> &Button {
        &self.track
    }

    pub fn knob(&self) -> &Button {
        &self.knob
    }

    /// Knob left edge relative to the toggle.
    pub fn knob_x(&self) -> f32 {
        *self.knob_x.current()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Bounding size of track and knob.
    pub fn preferred_size(&self) -> Size {
        Size::new(
            self.track_size.width.max(self.knob_size.width),
            self.track_size.height.max(self.knob_size.height),
        )
    }

    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    pub fn set_geometry(&mut self, rect: Rect) {
        self.geometry = rect;
        self.layout();
    }

    pub fn is_realized(&self) -> bool {
        self.track.is_realized() && self.knob.is_realized()
    }

    pub fn realize(&mut self) {
        if self.is_realized() {
            return;
        }
        self.layout();
        self.track.realize();
        self.knob.realize();
        if self.checked {
            let color = self.track_color(VisualState::Active);
            if let Some(track) = self.track.overlay_mut() {
                track.set_background(color);
            }
        }
    }

    /// Re-read sizes and colours after the sheet was replaced.
    pub fn restyle(&mut self) {
        self.read_sizes();
        self.track.restyle();
        self.knob.restyle();
        if self.drag.is_none() {
            self.snap = None;
            self.knob_x.set_immediate(self.rest_x());
        }
        self.layout();
        self.sync_track_color(self.track_state());
        self.sync_knob_color(self.knob_state());
    }

    fn read_sizes(&mut self) {
        let sheet = self.styles.borrow();
        let track = self.track_style.base(&sheet);
        let knob = self.knob_style.base(&sheet);
        self.track_size = Size::new(
            track.number("width", DEFAULT_TRACK_SIZE.width),
            track.number("height", DEFAULT_TRACK_SIZE.height),
        );
        self.knob_size = Size::new(
            knob.number("width", DEFAULT_KNOB_SIZE.width),
            knob.number("height", DEFAULT_KNOB_SIZE.height),
        );
    }

    fn knob_left(&self) -> f32 {
        KNOB_INSET
    }

    fn knob_right(&self) -> f32 {
        (self.track_size.width - self.knob_size.width - KNOB_INSET).max(KNOB_INSET)
    }

    fn knob_y(&self) -> f32 {
        (self.preferred_size().height - self.knob_size.height) / 2.0
    }

    fn rest_x(&self) -> f32 {
        if self.checked {
            self.knob_right()
        } else {
            self.knob_left()
        }
    }

    fn knob_rect(&self) -> Rect {
        Rect::new(self.knob_x(), self.knob_y(), self.knob_size.width, self.knob_size.height)
    }

    fn layout(&mut self) {
        let widget = self.preferred_size();
        self.track.set_geometry(Rect::new(
            self.geometry.x,
            self.geometry.y + (widget.height - self.track_size.height) / 2.0,
            self.track_size.width,
            self.track_size.height,
        ));
        self.place_knob();
    }

    fn place_knob(&mut self) {
        let knob = self.knob_rect().offset(self.geometry.x, self.geometry.y);
        self.knob.set_geometry(knob);
    }

    fn transition(&self, style: &StyleRef) -> TransitionValue {
        style.base(&self.styles.borrow()).transition()
    }

    /// `elastic-drag` of the track, looked up in hover, active, then base.
    fn elastic_drag(&self) -> f32 {
        let sheet = self.styles.borrow();
        [VisualState::Hover, VisualState::Active, VisualState::Base]
            .into_iter()
            .find_map(|state| self.track_style.state(&sheet, state).number_opt("elastic-drag"))
            .unwrap_or(0.0)
    }

    fn track_state(&self) -> VisualState {
        VisualState::resolve(self.checked, self.hovered)
    }

    /// Track background for `state`, falling back to the base rule.
    fn track_color(&self, state: VisualState) -> Color {
        let sheet = self.styles.borrow();
        self.track_style
            .state(&sheet, state)
            .color("background")
            .or_else(|| self.track_style.base(&sheet).color("background"))
            .unwrap_or(DEFAULT_TRACK_COLOR)
    }

    fn knob_color(&self, state: VisualState) -> Color {
        let sheet = self.styles.borrow();
        self.knob_style
            .state(&sheet, state)
            .color("background")
            .or_else(|| self.knob_style.base(&sheet).color("background"))
            .unwrap_or(DEFAULT_KNOB_COLOR)
    }

    fn sync_track_color(&mut self, state: VisualState) {
        let target = self.track_color(state);
        let duration = self.transition(&self.track_style).duration_ms();
        let Some(track) = self.track.overlay_mut() else {
            return;
        };
        if track.is_animating_background_to(target) {
            return;
        }
        track.animate_background(target, duration);
    }

    /// The knob only has base and hover looks; pressing it keeps the hover one.
    fn knob_state(&self) -> VisualState {
        if self.hovered {
            VisualState::Hover
        } else {
            VisualState::Base
        }
    }

    fn sync_knob_color(&mut self, state: VisualState) {
        let target = self.knob_color(state);
        let duration = self.transition(&self.knob_style).duration_ms();
        if let Some(knob) = self.knob.overlay_mut() {
            knob.animate_background(target, duration);
        }
    }

    pub fn pointer_enter(&mut self) {
        self.hovered = true;
        if !self.checked {
            self.sync_track_color(VisualState::Hover);
        }
        self.sync_knob_color(VisualState::Hover);
    }

    pub fn pointer_leave(&mut self) {
        self.hovered = false;
        if !self.checked {
            self.sync_track_color(VisualState::Base);
        }
        self.sync_knob_color(VisualState::Base);
    }

    /// `local` is relative to the toggle's top-left.
    pub fn pointer_press(&mut self, local: Point) -> Option<ControlEvent> {
        let knob = self.knob_rect();
        if self.knob.hit_test(Point::new(local.x - knob.x, local.y - knob.y)) {
            self.knob_x.stop();
            self.snap = None;
            self.drag = Some(KnobDrag {
                session: DragSession::new(local, self.elastic_drag()),
                start_x: self.knob_x(),
            });
            self.knob.set_pressed(true);
            self.sync_knob_color(self.knob_state());
            log::trace!("toggle {:?} knob drag started", self.id);
            return None;
        }
        if Rect::from_size(self.preferred_size()).contains_point(local) {
            return Some(self.toggle());
        }
        None
    }

    pub fn pointer_move(&mut self, local: Point) {
        let (keep, threshold) = (self.config.jelly.velocity_keep, self.config.drag_threshold);
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        drag.session.update(local, keep);
        drag.session.note_movement(threshold);
        let dx = drag.session.delta().x;
        let speed = drag.session.speed();
        let radius = drag.session.radius_fraction;
        let raw = drag.start_x + dx;

        let (left, right) = (self.knob_left(), self.knob_right());
        let overflow = if raw < left {
            raw - left
        } else if raw > right {
            raw - right
        } else {
            0.0
        };
        let x = raw.clamp(left, right);
        self.knob_x.set_immediate(x);
        self.place_knob();

        let stretch = track_stretch(overflow, self.track_size.width, radius);
        let side = if overflow >= 0.0 { 1.0 } else { -1.0 };
        if let Some(track) = self.track.overlay_mut() {
            track.set_elastic(ElasticDeform {
                offset: Point::ZERO,
                flatten: stretch.abs(),
                direction: Point::new(side, 0.0),
            });
        }

        if self.transition(&self.knob_style).is_springy() {
            let jelly = self.config.jelly;
            if let Some(knob) = self.knob.overlay_mut() {
                let (direction, flatten) = jelly.knob_jelly(dx, right - left, speed, knob.flatten());
                knob.set_flatten(flatten, direction);
            }
        }

        let progress = (x - left) / (right - left).max(1.0);
        let color = Color::lerp(
            &self.track_color(VisualState::Base),
            &self.track_color(VisualState::Active),
            progress,
        );
        if let Some(track) = self.track.overlay_mut() {
            track.set_background(color);
        }
    }

    pub fn pointer_release(&mut self, local: Point) -> Option<ControlEvent> {
        let drag = self.drag.take()?;
        self.knob.set_pressed(false);
        self.hovered = Rect::from_size(self.preferred_size()).contains_point(local);
        self.sync_knob_color(self.knob_state());
        if !drag.session.has_moved() {
            return Some(self.toggle());
        }

        let x = self.knob_x();
        let checked = x >= (self.knob_left() + self.knob_right()) / 2.0;
        let changed = checked != self.checked;
        self.checked = checked;
        log::debug!("toggle {:?} drag released, checked = {}", self.id, checked);

        self.sync_track_color(self.track_state());
        self.reset_track_stretch();
        let side = if x - drag.start_x >= 0.0 { 1.0 } else { -1.0 };
        self.snap_knob();
        self.reset_knob_jelly(side);

        changed.then(|| ControlEvent::new(self.id, ControlEventKind::Toggled(self.checked)))
    }

    /// Drop hover and any drag in progress, settling the knob.
    pub fn reset_interaction(&mut self) {
        self.hovered = false;
        if self.drag.take().is_some() {
            self.knob.set_pressed(false);
            self.reset_track_stretch();
            self.snap_knob();
        }
        self.sync_track_color(self.track_state());
        self.sync_knob_color(VisualState::Base);
    }

    fn toggle(&mut self) -> ControlEvent {
        self.checked = !self.checked;
        log::debug!("toggle {:?} -> {}", self.id, self.checked);
        self.sync_track_color(self.track_state());
        self.snap_knob();
        ControlEvent::new(self.id, ControlEventKind::Toggled(self.checked))
    }

    /// Animate the knob to the rail end of the current state.
    fn snap_knob(&mut self) {
        let target = self.rest_x();
        if !self.is_realized() {
            self.knob_x.set_immediate(target);
            self.place_knob();
            return;
        }
        let transition = self.transition(&self.knob_style);
        let springy = transition.is_springy();
        let side = if self.checked { 1.0 } else { -1.0 };
        self.knob_x.animate_to(target, transition.to_transition());
        self.snap = Some(Snap { target, springy, side });
        if springy {
            if let Some(knob) = self.knob.overlay_mut() {
                knob.set_flatten(SNAP_JELLY, Point::new(side, 0.0));
            }
        }
    }

    /// While a springy snap travels, the knob's distance from its rest pulls
    /// the track and squashes the knob. A settle already running wins.
    fn pull_track(&mut self, snap: Snap, x: f32) {
        if !snap.springy {
            return;
        }
        let overshoot = x - snap.target;
        let stretch = overshoot_stretch(overshoot, self.track_size.width);
        let direction = Point::new(if overshoot >= 0.0 { 1.0 } else { -1.0 }, 0.0);
        if let Some(track) = self.track.overlay_mut() {
            if !track.is_flatten_animating() {
                track.set_flatten(stretch.abs(), direction);
            }
        }
        if let Some(knob) = self.knob.overlay_mut() {
            if !knob.is_flatten_animating() {
                let jelly = (stretch.abs() * OVERSHOOT_JELLY_GAIN).min(MAX_OVERSHOOT_JELLY);
                knob.set_flatten(jelly, direction);
            }
        }
    }

    fn reset_track_stretch(&mut self) {
        let transition = self.transition(&self.track_style);
        let timing = stretch_reset_easing(transition.is_springy());
        if let Some(track) = self.track.overlay_mut() {
            let from = track.flatten();
            track.animate_flatten(from, 0.0, Transition::new(transition.duration_ms(), timing));
        }
    }

    /// Ring the knob squash down along the last direction of travel.
    fn reset_knob_jelly(&mut self, side: f32) {
        let (jelly, duration) = (self.config.jelly, self.config.knob_jelly_ms);
        if let Some(knob) = self.knob.overlay_mut() {
            let peak = jelly.release_peak(knob.flatten());
            knob.set_flatten(peak, Point::new(side, 0.0));
            knob.animate_flatten(peak, 0.0, Transition::new(duration, damped_flatten_easing()));
        }
    }

    /// Overlays advance first so settles started by a landing snap begin
    /// on the next frame.
    pub fn tick(&mut self, dt_ms: f32) -> ChangeFlags {
        let mut flags = self.track.tick(dt_ms).flags() | self.knob.tick(dt_ms).flags();
        match self.knob_x.advance(dt_ms) {
            AdvanceResult::NoChange => {}
            AdvanceResult::Changed(x) => {
                flags |= ChangeFlags::PAINT | ChangeFlags::GEOMETRY;
                self.place_knob();
                if let Some(snap) = self.snap {
                    self.pull_track(snap, x);
                }
            }
            AdvanceResult::Finished(_) => {
                flags |= ChangeFlags::PAINT | ChangeFlags::GEOMETRY;
                self.place_knob();
                if let Some(snap) = self.snap.take().filter(|snap| snap.springy) {
                    self.reset_track_stretch();
                    // a drag release already rang the knob down
                    let settling = self.knob.overlay().is_some_and(|knob| knob.is_flatten_animating());
                    if !settling {
                        self.reset_knob_jelly(snap.side);
                    }
                }
            }
        }
        flags
    }

    /// Track layers, then knob layers on top.
    pub fn paint(&self, ctx: &mut PaintContext<'_>) -> Vec<Layer> {
        let mut layers = self.track.paint(ctx);
        layers.extend(self.knob.paint(ctx));
        layers
    }
}
