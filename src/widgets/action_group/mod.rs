//! Floating action group: a trigger that expands into a pill of slots.
//!
//! Slots are either style-only ([`StyledSlot`], drawn and hit-tested by the
//! pill) or embedded [`Button`]s that keep their own overlays and hit tests.
//! The pill is built on first open and reused afterwards.
//!
//! ```text
//! Closed --open--> Opening --entries done--> Open --close--> Closing --pill scale 0--> Closed
//! ```

pub mod layout;
pub mod pill;

use std::rc::Rc;

use crate::animation::{AdvanceResult, AnimationState, TimingFunction, Transition};
use crate::renderer::{Layer, PaintContext};
use crate::style::{PropertyMap, SharedStyles, StyleRef, StyleSheet};
use crate::widgets::button::Button;
use crate::widgets::overlay::OverlayProps;
use crate::widgets::{ChangeFlags, ControlEvent, ControlEventKind, ControlId, Point, Rect, Size};
use crate::EngineConfig;

pub use layout::{trigger_size, Anchor, Direction, PillLayout};
pub use pill::Pill;

/// Label of the trigger slot when the trigger has no text.
const CLOSE_LABEL: &str = "×";
const MAX_STAGGER_MS: f32 = 50.0;
const ENTRY_FRACTION: f32 = 0.85;
const ENTRY_FADE_MS: f32 = 120.0;
/// Slack after the slowest entry before the group counts as open.
const ENTRY_SETTLE_MS: f32 = 60.0;

/// A slot the pill draws itself. Clicking it emits `Clicked` from `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledSlot {
    pub id: ControlId,
    /// Falls back to the group class
    pub class: Option<String>,
    pub text: String,
}

impl StyledSlot {
    pub fn new(id: ControlId, text: impl Into<String>) -> Self {
        Self {
            id,
            class: None,
            text: text.into(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }
}

pub enum SlotItem {
    Styled(StyledSlot),
    Embedded(Button),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroupState {
    Closed,
    /// Embedded items are still flying out of the trigger.
    Opening { remaining_ms: f32 },
    Open,
    /// The pill is shrinking; it is hidden once the scale run ends.
    Closing,
}

/// One embedded item travelling from the trigger to its slot.
struct EntryMotion {
    item: usize,
    position: AnimationState<Point>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PressTarget {
    Trigger,
    Slot,
    Embedded(usize),
}

pub struct ActionGroup {
    id: ControlId,
    styles: SharedStyles,
    config: EngineConfig,
    class: String,
    trigger: Button,
    items: Vec<SlotItem>,
    direction: Option<Direction>,
    anchor: Option<Anchor>,
    /// Trigger rectangle in window coordinates
    geometry: Rect,
    state: GroupState,
    pill: Option<Pill>,
    entries: Vec<EntryMotion>,
    /// Hide the trigger overlay once its scale-out lands
    hide_trigger: bool,
    press: Option<PressTarget>,
}

impl ActionGroup {
    pub fn new(
        id: ControlId,
        styles: SharedStyles,
        config: &EngineConfig,
        class: impl Into<String>,
        items: Vec<SlotItem>,
    ) -> Self {
        let class = class.into();
        let trigger = Button::new(id, styles.clone(), config).with_class(class.as_str());
        Self {
            id,
            styles,
            config: config.clone(),
            class,
            trigger,
            items,
            direction: None,
            anchor: None,
            geometry: Rect::default(),
            state: GroupState::Closed,
            pill: None,
            entries: Vec::new(),
            hide_trigger: false,
            press: None,
        }
    }

    pub fn with_trigger_text(mut self, text: impl Into<String>) -> Self {
        self.trigger.set_text(Some(text.into()));
        self
    }

    /// Override `action-direction`.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Override `action-anchor`.
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn id(&self) -> ControlId {
        self.id
    }

    pub fn state(&self) -> GroupState {
        self.state
    }

    /// Opening or open.
    pub fn is_open(&self) -> bool {
        matches!(self.state, GroupState::Opening { .. } | GroupState::Open)
    }

    pub fn trigger(&self) -> &Button {
        &self.trigger
    }

    pub fn items(&self) -> &[SlotItem] {
        &self.items
    }

    pub fn embedded(&self, idx: usize) -> Option<&Button> {
        match self.items.get(idx)? {
            SlotItem::Embedded(button) => Some(button),
            SlotItem::Styled(_) => None,
        }
    }

    pub fn pill(&self) -> Option<&Pill> {
        self.pill.as_ref()
    }

    fn base(&self, sheet: &StyleSheet) -> PropertyMap {
        StyleRef::new(self.class.as_str()).base(sheet)
    }

    /// The trigger's styled size; the group occupies exactly that.
    pub fn preferred_size(&self) -> Size {
        trigger_size(&self.base(&self.styles.borrow()))
    }

    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    pub fn set_geometry(&mut self, rect: Rect) {
        self.geometry = rect;
        self.trigger.set_geometry(rect);
        if let Some(pill) = self.pill.as_mut() {
            pill.place(rect.center());
        }
        match self.state {
            GroupState::Open => self.place_embedded(),
            GroupState::Closing => self.sync_embedded(true),
            GroupState::Closed | GroupState::Opening { .. } => {}
        }
    }

    pub fn realize(&mut self) {
        self.trigger.realize();
        for item in &mut self.items {
            if let SlotItem::Embedded(button) = item {
                button.realize();
                if let Some(overlay) = button.overlay_mut() {
                    overlay.set_visible(false);
                }
            }
        }
    }

    /// Re-read every style after the sheet was replaced.
    pub fn restyle(&mut self) {
        self.trigger.restyle();
        for item in &mut self.items {
            if let SlotItem::Embedded(button) = item {
                button.restyle();
            }
        }
        let styles = Rc::clone(&self.styles);
        let sheet = styles.borrow();
        let layout = self.pill_layout(&sheet);
        let slots = self.slot_classes();
        let center = self.geometry.center();
        if let Some(pill) = self.pill.as_mut() {
            pill.restyle(&sheet, layout, slots, center);
        }
        if self.state == GroupState::Open {
            self.place_embedded();
        }
    }

    fn resolved_direction(&self, base: &PropertyMap) -> Direction {
        self.direction
            .unwrap_or_else(|| Direction::parse(base.get("action-direction").unwrap_or("horizontal")))
    }

    fn resolved_anchor(&self, base: &PropertyMap, direction: Direction) -> Anchor {
        self.anchor
            .unwrap_or_else(|| Anchor::parse(base.get("action-anchor").unwrap_or("left"), direction))
    }

    /// Slot sizes come from the trigger class; an embedded first item
    /// supplies the item size from its own class.
    fn pill_layout(&self, sheet: &StyleSheet) -> PillLayout {
        let base = self.base(sheet);
        let direction = self.resolved_direction(&base);
        let anchor = self.resolved_anchor(&base, direction);
        let mut layout = PillLayout::from_style(&base, direction, anchor, self.items.len(), self.config.pill_margin);
        if let Some(SlotItem::Embedded(button)) = self.items.first() {
            if let Some(style) = button.style_ref() {
                let item = style.base(sheet);
                layout.item = Size::new(
                    item.number("width", layout.item.width),
                    item.number("height", layout.item.height),
                );
            }
        }
        layout
    }

    fn slot_classes(&self) -> Vec<Option<String>> {
        std::iter::once(Some(self.class.clone()))
            .chain(self.items.iter().map(|item| match item {
                SlotItem::Styled(slot) => Some(slot.class.clone().unwrap_or_else(|| self.class.clone())),
                SlotItem::Embedded(_) => None,
            }))
            .collect()
    }

    fn labels(&self) -> Vec<String> {
        let trigger = self
            .trigger
            .text()
            .filter(|text| !text.is_empty())
            .unwrap_or(CLOSE_LABEL)
            .to_string();
        std::iter::once(trigger)
            .chain(self.items.iter().map(|item| match item {
                SlotItem::Styled(slot) => slot.text.clone(),
                SlotItem::Embedded(_) => String::new(),
            }))
            .collect()
    }

    /// Expand the pill out of the trigger. Returns `Expanded(true)`, or
    /// nothing when already open.
    pub fn open(&mut self) -> Option<ControlEvent> {
        if self.is_open() {
            return None;
        }
        let styles = Rc::clone(&self.styles);
        let sheet = styles.borrow();
        let trigger_center = self.geometry.center();

        if self.pill.is_none() {
            let layout = self.pill_layout(&sheet);
            log::debug!(
                "building pill for group {:?}: {}x{}",
                self.id,
                layout.pill_size().width,
                layout.pill_size().height
            );
            self.pill = Some(Pill::new(
                self.class.clone(),
                layout,
                &sheet,
                self.slot_classes(),
                self.labels(),
            ));
        }
        let slots = self.slot_classes();
        let labels = self.labels();
        let pill = self.pill.as_mut()?;
        pill.set_labels(labels);
        pill.place(trigger_center);
        pill.expand(&sheet, slots);
        let transition = pill.transition();
        let targets: Vec<Option<Point>> = (0..self.items.len()).map(|idx| pill.slot_center(idx + 1, false)).collect();

        let duration = transition.duration_ms;
        let embedded = self
            .items
            .iter()
            .filter(|item| matches!(item, SlotItem::Embedded(_)))
            .count();
        let stagger = MAX_STAGGER_MS.min(duration / (embedded * 2).max(1) as f32);
        let entry = duration * ENTRY_FRACTION;
        let fade = Transition::new(ENTRY_FADE_MS.min(entry / 3.0), TimingFunction::EaseOut);

        self.entries.clear();
        let mut remaining = 0.0;
        let mut launched = 0;
        for (idx, item) in self.items.iter_mut().enumerate() {
            let SlotItem::Embedded(button) = item else {
                continue;
            };
            let Some(target) = targets.get(idx).copied().flatten() else {
                launched += 1;
                continue;
            };
            let delay = launched as f32 * stagger;
            launched += 1;
            remaining = delay + entry + ENTRY_SETTLE_MS;

            let background = button.style_ref().and_then(|style| style.base(&sheet).color("background"));
            let size = button.preferred_size();
            button.reset_interaction();
            button.set_geometry(Rect::centered_at(target, size));
            button.place_overlay(trigger_center);
            if let Some(overlay) = button.overlay_mut() {
                overlay.stop_all();
                if let Some(background) = background {
                    overlay.set_background(background);
                }
                overlay.set_visible(true);
                overlay.animate_scale_from(0.0, 1.0, transition.clone().duration(entry).delay(delay));
                overlay.animate_opacity(0.0, 1.0, fade.clone().delay(delay));
            }

            let mut position = AnimationState::new(trigger_center, Transition::default());
            position.animate(trigger_center, target, transition.clone().duration(entry).delay(delay));
            self.entries.push(EntryMotion { item: idx, position });
        }

        self.trigger.reset_interaction();
        if let Some(overlay) = self.trigger.overlay_mut() {
            overlay.animate_scale(0.0, transition);
            self.hide_trigger = true;
        }

        self.press = None;
        self.state = GroupState::Opening { remaining_ms: remaining };
        log::debug!("group {:?} opening", self.id);
        Some(ControlEvent::new(self.id, ControlEventKind::Expanded(true)))
    }

    /// Shrink the pill back into the trigger. Returns `Expanded(false)`,
    /// or nothing when not open.
    pub fn close(&mut self) -> Option<ControlEvent> {
        if !self.is_open() {
            return None;
        }
        self.state = GroupState::Closing;
        self.entries.clear();
        self.press = None;

        let pill = self.pill.as_mut()?;
        pill.collapse();
        let transition = pill.transition();
        let fade = pill.close_fade();

        for item in &mut self.items {
            if let SlotItem::Embedded(button) = item {
                button.reset_interaction();
                if let Some(overlay) = button.overlay_mut() {
                    overlay.animate_opacity(overlay.opacity(), 0.0, fade.clone());
                    overlay.animate_scale(0.0, transition.clone());
                }
            }
        }

        self.trigger.reset_interaction();
        self.hide_trigger = false;
        let center = self.geometry.center();
        self.trigger.place_overlay(center);
        if let Some(overlay) = self.trigger.overlay_mut() {
            overlay.set_visible(true);
            overlay.animate_scale_from(0.0, 1.0, transition);
        }

        log::debug!("group {:?} closing", self.id);
        Some(ControlEvent::new(self.id, ControlEventKind::Expanded(false)))
    }

    pub fn toggle_open(&mut self) -> Option<ControlEvent> {
        if self.is_open() {
            self.close()
        } else {
            self.open()
        }
    }

    /// Embedded overlays onto their slot centres, at rest or through the
    /// live pill scale.
    fn sync_embedded(&mut self, transformed: bool) {
        let Some(pill) = self.pill.as_ref() else {
            return;
        };
        for (idx, item) in self.items.iter_mut().enumerate() {
            if let SlotItem::Embedded(button) = item {
                if let Some(center) = pill.slot_center(idx + 1, transformed) {
                    button.place_overlay(center);
                }
            }
        }
    }

    /// Embedded controls and their overlays onto their final slots.
    fn place_embedded(&mut self) {
        let Some(pill) = self.pill.as_ref() else {
            return;
        };
        for (idx, item) in self.items.iter_mut().enumerate() {
            if let SlotItem::Embedded(button) = item {
                if let Some(center) = pill.slot_center(idx + 1, false) {
                    let size = button.preferred_size();
                    button.set_geometry(Rect::centered_at(center, size));
                }
            }
        }
    }

    pub fn tick(&mut self, dt_ms: f32) -> ChangeFlags {
        let trigger = self.trigger.tick(dt_ms);
        let mut flags = trigger.flags();
        if self.hide_trigger && trigger.finished.contains(OverlayProps::SCALE) {
            self.hide_trigger = false;
            if let Some(overlay) = self.trigger.overlay_mut() {
                overlay.set_visible(false);
            }
        }

        for item in &mut self.items {
            if let SlotItem::Embedded(button) = item {
                flags |= button.tick(dt_ms).flags();
            }
        }

        for entry in &mut self.entries {
            match entry.position.advance(dt_ms) {
                AdvanceResult::NoChange => {}
                AdvanceResult::Changed(center) | AdvanceResult::Finished(center) => {
                    if let Some(SlotItem::Embedded(button)) = self.items.get_mut(entry.item) {
                        button.place_overlay(center);
                    }
                    flags |= ChangeFlags::PAINT | ChangeFlags::GEOMETRY;
                }
            }
        }

        let mut pill_scaled = false;
        if let Some(pill) = self.pill.as_mut() {
            let tick = pill.tick(dt_ms);
            flags |= tick.flags();
            pill_scaled = tick.changed.contains(OverlayProps::SCALE);
            if self.state == GroupState::Closing {
                if tick.finished.contains(OverlayProps::OPACITY) {
                    for item in &mut self.items {
                        if let Some(overlay) = match item {
                            SlotItem::Embedded(button) => button.overlay_mut(),
                            SlotItem::Styled(_) => None,
                        } {
                            overlay.set_visible(false);
                            overlay.set_scale(1.0);
                            overlay.set_opacity(1.0);
                        }
                    }
                }
                if tick.finished.contains(OverlayProps::SCALE) {
                    pill.hide();
                    self.state = GroupState::Closed;
                    log::debug!("group {:?} closed", self.id);
                }
            }
        }

        let mut entered = false;
        if let GroupState::Opening { remaining_ms } = &mut self.state {
            *remaining_ms -= dt_ms;
            entered = *remaining_ms <= 0.0;
        }
        if entered {
            self.state = GroupState::Open;
            self.entries.clear();
            self.sync_embedded(false);
            flags |= ChangeFlags::PAINT | ChangeFlags::GEOMETRY;
            log::debug!("group {:?} open", self.id);
        } else if pill_scaled && self.state == GroupState::Closing {
            self.sync_embedded(true);
            flags |= ChangeFlags::GEOMETRY;
        }
        flags
    }

    fn to_window(&self, local: Point) -> Point {
        local.offset(self.geometry.x, self.geometry.y)
    }

    /// Whether a window point is over the trigger's hit area or the visible pill.
    pub fn contains(&self, window: Point) -> bool {
        let local = Point::new(window.x - self.geometry.x, window.y - self.geometry.y);
        self.trigger.hit_test(local) || self.pill.as_ref().is_some_and(|pill| pill.contains(window))
    }

    pub fn pointer_enter(&mut self) {
        if !self.is_open() {
            self.trigger.pointer_enter();
        }
    }

    pub fn pointer_leave(&mut self) {
        if self.trigger.is_hovered() {
            self.trigger.pointer_leave();
        }
        let styles = Rc::clone(&self.styles);
        if let Some(pill) = self.pill.as_mut() {
            pill.pointer_leave(&styles.borrow());
        }
        for item in &mut self.items {
            if let SlotItem::Embedded(button) = item {
                if button.is_hovered() {
                    button.pointer_leave();
                }
            }
        }
    }

    /// `local` is relative to the trigger's top-left, like every pointer
    /// position handed to a control.
    pub fn pointer_move(&mut self, local: Point) {
        if !self.is_open() {
            self.trigger.pointer_move(local);
            return;
        }
        let window = self.to_window(local);
        let styles = Rc::clone(&self.styles);
        if let Some(pill) = self.pill.as_mut() {
            pill.pointer_move(&styles.borrow(), window);
        }
        for item in &mut self.items {
            if let SlotItem::Embedded(button) = item {
                let local = embedded_local(button, window);
                let inside = button.hit_test(local);
                if inside != button.is_hovered() {
                    if inside {
                        button.pointer_enter();
                    } else {
                        button.pointer_leave();
                    }
                }
                button.pointer_move(local);
            }
        }
    }

    /// Returns whether anything took the press. Embedded controls get the
    /// first look, then the pill's own slots.
    pub fn pointer_press(&mut self, local: Point) -> bool {
        self.press = None;
        if !self.is_open() {
            if self.trigger.pointer_press(local) {
                self.press = Some(PressTarget::Trigger);
            }
            return self.press.is_some();
        }

        let window = self.to_window(local);
        for (idx, item) in self.items.iter_mut().enumerate() {
            if let SlotItem::Embedded(button) = item {
                if button.pointer_press(embedded_local(button, window)) {
                    self.press = Some(PressTarget::Embedded(idx));
                    return true;
                }
            }
        }
        let styles = Rc::clone(&self.styles);
        if let Some(pill) = self.pill.as_mut() {
            if pill.pointer_press(&styles.borrow(), window).is_some() {
                self.press = Some(PressTarget::Slot);
            }
        }
        self.press.is_some()
    }

    /// Events in the order they happened: a slot's `Clicked` comes before
    /// the `Expanded(false)` of the close it causes.
    pub fn pointer_release(&mut self, local: Point) -> Vec<ControlEvent> {
        let window = self.to_window(local);
        let mut events = Vec::new();
        match self.press.take() {
            None => {}
            Some(PressTarget::Trigger) => {
                if self.trigger.pointer_release(local).is_some() {
                    events.extend(self.toggle_open());
                }
            }
            Some(PressTarget::Embedded(idx)) => {
                if let Some(SlotItem::Embedded(button)) = self.items.get_mut(idx) {
                    let local = embedded_local(button, window);
                    events.extend(button.pointer_release(local));
                }
            }
            Some(PressTarget::Slot) => {
                let styles = Rc::clone(&self.styles);
                let fired = match self.pill.as_mut() {
                    Some(pill) => pill.pointer_release(&styles.borrow(), window),
                    None => None,
                };
                match fired {
                    None => {}
                    Some(0) => events.extend(self.close()),
                    Some(slot) => {
                        if let Some(SlotItem::Styled(styled)) = self.items.get(slot - 1) {
                            events.push(ControlEvent::new(styled.id, ControlEventKind::Clicked));
                        }
                        events.extend(self.close());
                    }
                }
            }
        }
        events
    }

    /// Drop hover and press everywhere without emitting anything.
    pub fn reset_interaction(&mut self) {
        self.press = None;
        self.trigger.reset_interaction();
        for item in &mut self.items {
            if let SlotItem::Embedded(button) = item {
                button.reset_interaction();
            }
        }
        let styles = Rc::clone(&self.styles);
        if let Some(pill) = self.pill.as_mut() {
            pill.pointer_leave(&styles.borrow());
        }
    }

    /// Pill shadow, pill, trigger, then embedded controls on top.
    pub fn paint(&self, ctx: &mut PaintContext<'_>) -> Vec<Layer> {
        let mut layers = Vec::new();
        if let Some(pill) = self.pill.as_ref() {
            let sheet = self.styles.borrow();
            layers.extend(pill.paint_shadow(&sheet));
            layers.extend(pill.paint(ctx, &sheet));
        }
        layers.extend(self.trigger.paint(ctx));
        for item in &self.items {
            if let SlotItem::Embedded(button) = item {
                layers.extend(button.paint(ctx));
            }
        }
        layers
    }
}

fn embedded_local(button: &Button, window: Point) -> Point {
    let origin = button.geometry().origin();
    Point::new(window.x - origin.x, window.y - origin.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::renderer::testing::RecordingRasterizer;
    use crate::renderer::SurfaceCache;

    const SHEET: &str = "
        .fab { width: 56; height: 56; background: #202020; transition: 0.3s ease-out; }
        .chip { background: #3b3f52; }
        .chip:hover { background: #4b5066; }
        .mini { width: 100; height: 40; background: #334455; }
    ";

    fn styles() -> SharedStyles {
        Rc::new(RefCell::new(StyleSheet::from_source(SHEET)))
    }

    fn styled(id: u32, text: &str) -> SlotItem {
        SlotItem::Styled(StyledSlot::new(ControlId(id), text).with_class("chip"))
    }

    fn group(items: Vec<SlotItem>) -> ActionGroup {
        let mut group = ActionGroup::new(ControlId(1), styles(), &EngineConfig::default(), "fab", items);
        group.set_geometry(Rect::new(100.0, 100.0, 56.0, 56.0));
        group.realize();
        group
    }

    fn click(group: &mut ActionGroup, local: Point) -> Vec<ControlEvent> {
        group.pointer_press(local);
        group.pointer_release(local)
    }

    fn local_of(group: &ActionGroup, window: Point) -> Point {
        Point::new(window.x - group.geometry().x, window.y - group.geometry().y)
    }

    #[test]
    fn test_trigger_click_opens() {
        let mut group = group(vec![styled(10, "Copy"), styled(11, "Share")]);
        assert!(group.pill().is_none());
        let events = click(&mut group, Point::new(28.0, 28.0));
        assert_eq!(events, vec![ControlEvent::new(ControlId(1), ControlEventKind::Expanded(true))]);
        assert!(group.is_open());
        let pill = group.pill().unwrap();
        assert_eq!(pill.slot_center(0, false), Some(Point::new(128.0, 128.0)));
    }

    #[test]
    fn test_opens_then_settles() {
        let mut group = group(vec![styled(10, "Copy")]);
        group.open();
        // no embedded items: only the settle slack
        group.tick(16.0);
        group.tick(50.0);
        assert_eq!(group.state(), GroupState::Open);
        group.tick(300.0);
        assert_eq!(group.pill().unwrap().scale(), 1.0);
        assert!(!group.trigger().overlay().unwrap().is_visible());
    }

    #[test]
    fn test_style_slot_click_fires_and_closes() {
        let mut group = group(vec![styled(10, "Copy"), styled(11, "Share")]);
        group.open();
        group.tick(400.0);
        let center = group.pill().unwrap().slot_center(2, true).unwrap();
        let local = local_of(&group, center);
        let events = click(&mut group, local);
        assert_eq!(
            events,
            vec![
                ControlEvent::new(ControlId(11), ControlEventKind::Clicked),
                ControlEvent::new(ControlId(1), ControlEventKind::Expanded(false)),
            ]
        );
        assert_eq!(group.state(), GroupState::Closing);
    }

    #[test]
    fn test_trigger_slot_closes() {
        let mut group = group(vec![styled(10, "Copy")]);
        group.open();
        group.tick(400.0);
        let events = click(&mut group, Point::new(28.0, 28.0));
        assert_eq!(events, vec![ControlEvent::new(ControlId(1), ControlEventKind::Expanded(false))]);
    }

    #[test]
    fn test_pill_hidden_only_after_scale_run() {
        let mut group = group(vec![styled(10, "Copy")]);
        group.open();
        group.tick(400.0);
        group.close();
        group.tick(100.0);
        // fade is over, scale is not
        assert_eq!(group.state(), GroupState::Closing);
        assert!(group.pill().unwrap().is_visible());
        group.tick(200.0);
        assert_eq!(group.state(), GroupState::Closed);
        assert!(!group.pill().unwrap().is_visible());
        let trigger = group.trigger().overlay().unwrap();
        assert!(trigger.is_visible());
        assert_eq!(trigger.scale(), 1.0);
    }

    #[test]
    fn test_embedded_items_stagger_out() {
        let items = vec![
            SlotItem::Embedded(Button::new(ControlId(20), styles(), &EngineConfig::default()).with_class("mini")),
            SlotItem::Embedded(Button::new(ControlId(21), styles(), &EngineConfig::default()).with_class("mini")),
        ];
        let mut group = group(items);
        // item size comes from the first embedded class
        group.open();
        let layout = *group.pill().unwrap().layout();
        assert_eq!(layout.item, Size::new(100.0, 40.0));
        let GroupState::Opening { remaining_ms } = group.state() else {
            panic!("expected opening, got {:?}", group.state());
        };
        // second item: 50 ms stagger, 255 ms entry, 60 ms slack
        assert!((remaining_ms - 365.0).abs() < 1e-3);

        let first = group.embedded(0).unwrap().overlay().unwrap();
        assert!(first.is_visible());
        assert_eq!(first.scale(), 0.0);
        assert_eq!(first.center(), Point::new(128.0, 128.0));

        group.tick(40.0);
        let first = group.embedded(0).unwrap().overlay().unwrap().center();
        let second = group.embedded(1).unwrap().overlay().unwrap().center();
        assert!(first.x > 128.0);
        // the second item is still waiting out its delay
        assert_eq!(second, Point::new(128.0, 128.0));

        group.tick(400.0);
        assert_eq!(group.state(), GroupState::Open);
        let target = group.pill().unwrap().slot_center(2, false).unwrap();
        let second = group.embedded(1).unwrap().overlay().unwrap();
        assert_eq!(second.center(), target);
        assert_eq!(second.scale(), 1.0);
    }

    #[test]
    fn test_embedded_click_keeps_group_open() {
        let items = vec![
            styled(10, "Copy"),
            SlotItem::Embedded(Button::new(ControlId(20), styles(), &EngineConfig::default()).with_class("mini")),
        ];
        let mut group = group(items);
        group.open();
        group.tick(600.0);
        let center = group.pill().unwrap().slot_center(2, true).unwrap();
        // the pill never claims an embedded slot
        assert_eq!(group.pill().unwrap().hit_slot(center), None);
        let local = local_of(&group, center);
        let events = click(&mut group, local);
        assert_eq!(events, vec![ControlEvent::new(ControlId(20), ControlEventKind::Clicked)]);
        assert_eq!(group.state(), GroupState::Open);
    }

    #[test]
    fn test_direction_override() {
        let mut group = group(vec![styled(10, "A"), styled(11, "B")]).with_direction(Direction::Vertical);
        group.open();
        let layout = *group.pill().unwrap().layout();
        assert_eq!(layout.direction, Direction::Vertical);
        assert_eq!(layout.pill_size(), Size::new(122.0, 168.0));
    }

    #[test]
    fn test_paint_layers() {
        let mut group = group(vec![styled(10, "Copy")]);
        let mut raster = RecordingRasterizer::default();
        let mut cache = SurfaceCache::new(64);
        let mut ctx = PaintContext::new(&mut cache, &mut raster);
        // closed: just the trigger
        assert_eq!(group.paint(&mut ctx).len(), 1);
        group.open();
        group.tick(400.0);
        // open: pill only, the trigger overlay is hidden
        assert_eq!(group.paint(&mut ctx).len(), 1);
    }
}
