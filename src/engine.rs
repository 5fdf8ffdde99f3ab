//! The entry point an application holds on to.
//!
//! An [`Engine`] owns the shared cascade and the raster cache, creates
//! controls, routes pointer input to them by id and dispatches the events
//! they emit through a handler table.
//!
//! ```ignore
//! let mut engine = Engine::new(EngineConfig::default());
//! engine.load_str(".primary { width: 80; height: 40; background: #2d2f3a; }");
//! let ok = engine.object("primary", Some("OK"), None);
//! engine.on_event(ok, |event| println!("{:?}", event));
//! engine.set_geometry(ok, Rect::new(10.0, 10.0, 80.0, 40.0));
//! engine.realize_all();
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::renderer::{Layer, PaintContext, Rasterizer, SurfaceCache};
use crate::style::{self, LoadReport, SharedStyles, StyleSheet};
use crate::widgets::{
    ActionGroup, Button, ChangeFlags, ControlEvent, ControlId, Point, Rect, Size, SlotItem, StyledSlot, Toggle, Wrap,
};
use crate::EngineConfig;

/// Called with every event whose source it was registered for.
pub type Handler = Box<dyn FnMut(&ControlEvent)>;

/// A top-level control owned by the engine.
pub enum Control {
    Object(Button),
    Toggle(Toggle),
    ActionGroup(ActionGroup),
    Wrap(Wrap),
}

impl Control {
    pub fn preferred_size(&self) -> Size {
        match self {
            Control::Object(button) => button.preferred_size(),
            Control::Toggle(toggle) => toggle.preferred_size(),
            Control::ActionGroup(group) => group.preferred_size(),
            Control::Wrap(wrap) => wrap.preferred_size(),
        }
    }

    pub fn geometry(&self) -> Rect {
        match self {
            Control::Object(button) => button.geometry(),
            Control::Toggle(toggle) => toggle.geometry(),
            Control::ActionGroup(group) => group.geometry(),
            Control::Wrap(wrap) => wrap.geometry(),
        }
    }

    pub fn set_geometry(&mut self, rect: Rect) {
        match self {
            Control::Object(button) => button.set_geometry(rect),
            Control::Toggle(toggle) => toggle.set_geometry(rect),
            Control::ActionGroup(group) => group.set_geometry(rect),
            Control::Wrap(wrap) => wrap.set_geometry(rect),
        }
    }

    pub fn realize(&mut self) {
        match self {
            Control::Object(button) => button.realize(),
            Control::Toggle(toggle) => toggle.realize(),
            Control::ActionGroup(group) => group.realize(),
            Control::Wrap(wrap) => wrap.realize(),
        }
    }

    fn restyle(&mut self) {
        match self {
            Control::Object(button) => button.restyle(),
            Control::Toggle(toggle) => toggle.restyle(),
            Control::ActionGroup(group) => group.restyle(),
            Control::Wrap(wrap) => wrap.restyle(),
        }
    }

    /// Whether a window point is over the control. Buttons answer with
    /// their scaled hit area, a toggle also with its knob's, and a group
    /// with its trigger or open pill.
    pub fn contains(&self, window: Point) -> bool {
        match self {
            Control::Object(button) => button.hit_test(local_to(button.geometry(), window)),
            Control::Toggle(toggle) => {
                let knob = toggle.knob();
                toggle.geometry().contains_point(window) || knob.hit_test(local_to(knob.geometry(), window))
            }
            Control::ActionGroup(group) => group.contains(window),
            Control::Wrap(wrap) => wrap.geometry().contains_point(window),
        }
    }

    fn tick(&mut self, dt_ms: f32) -> ChangeFlags {
        match self {
            Control::Object(button) => button.tick(dt_ms).flags(),
            Control::Toggle(toggle) => toggle.tick(dt_ms),
            Control::ActionGroup(group) => group.tick(dt_ms),
            Control::Wrap(wrap) => wrap.tick(dt_ms),
        }
    }

    fn paint(&self, ctx: &mut PaintContext<'_>) -> Vec<Layer> {
        match self {
            Control::Object(button) => button.paint(ctx),
            Control::Toggle(toggle) => toggle.paint(ctx),
            Control::ActionGroup(group) => group.paint(ctx),
            Control::Wrap(wrap) => wrap.paint(ctx),
        }
    }
}

/// `window` relative to the top-left of `rect`.
fn local_to(rect: Rect, window: Point) -> Point {
    Point::new(window.x - rect.x, window.y - rect.y)
}

pub struct Engine {
    config: EngineConfig,
    styles: SharedStyles,
    cache: SurfaceCache,
    controls: IndexMap<ControlId, Control>,
    handlers: HashMap<ControlId, Handler>,
    next_id: u32,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            cache: SurfaceCache::new(config.cache_capacity),
            config,
            styles: Rc::new(RefCell::new(StyleSheet::new())),
            controls: IndexMap::new(),
            handlers: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The cascade every control of this engine reads.
    pub fn styles(&self) -> SharedStyles {
        Rc::clone(&self.styles)
    }

    /// Replace the whole rule set and restyle every control.
    pub fn load_str(&mut self, source: &str) -> LoadReport {
        let report = self.styles.borrow_mut().load(source);
        log::debug!("loaded {} rule(s), {} skipped", report.rules, report.errors.len());
        self.restyle_all();
        report
    }

    /// Alias of [`Engine::load_str`] for a sheet that was already loaded once.
    pub fn reload_str(&mut self, source: &str) -> LoadReport {
        self.load_str(source)
    }

    /// Replace the rule set from a file. On I/O failure the old rules stay.
    pub fn reload_path(&mut self, path: impl AsRef<Path>) -> style::Result<LoadReport> {
        let report = self.styles.borrow_mut().load_path(path)?;
        log::debug!("reloaded {} rule(s), {} skipped", report.rules, report.errors.len());
        self.restyle_all();
        Ok(report)
    }

    fn restyle_all(&mut self) {
        for control in self.controls.values_mut() {
            control.restyle();
        }
    }

    /// A fresh id, for controls and for style-only slots alike.
    pub fn allocate_id(&mut self) -> ControlId {
        let id = ControlId(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert(&mut self, id: ControlId, control: Control) -> ControlId {
        self.controls.insert(id, control);
        id
    }

    /// Styled interactive element with optional text and icon.
    pub fn object(&mut self, class: &str, text: Option<&str>, icon: Option<&str>) -> ControlId {
        let button = self.button(class, text, icon);
        let id = button.id();
        self.insert(id, Control::Object(button))
    }

    fn button(&mut self, class: &str, text: Option<&str>, icon: Option<&str>) -> Button {
        let id = self.allocate_id();
        let mut button = Button::new(id, self.styles(), &self.config).with_class(class);
        if let Some(text) = text {
            button = button.with_text(text);
        }
        if let Some(icon) = icon {
            button = button.with_icon(icon);
        }
        button
    }

    pub fn toggle(&mut self, class: &str, checked: bool) -> ControlId {
        let id = self.allocate_id();
        let toggle = Toggle::new(id, self.styles(), &self.config, class).with_checked(checked);
        self.insert(id, Control::Toggle(toggle))
    }

    /// A style-only action-group item; `class` falls back to the group's.
    pub fn slot(&mut self, text: &str, class: Option<&str>) -> SlotItem {
        let mut slot = StyledSlot::new(self.allocate_id(), text);
        slot.class = class.map(str::to_string);
        SlotItem::Styled(slot)
    }

    /// An interactive action-group item with its own overlay.
    pub fn embedded(&mut self, class: &str, text: Option<&str>, icon: Option<&str>) -> SlotItem {
        SlotItem::Embedded(self.button(class, text, icon))
    }

    pub fn action_group(&mut self, class: &str, items: Vec<SlotItem>) -> ControlId {
        self.action_group_with(class, items, |group| group)
    }

    /// Like [`Engine::action_group`], letting `configure` set trigger text,
    /// direction or anchor before the group is registered.
    pub fn action_group_with(
        &mut self,
        class: &str,
        items: Vec<SlotItem>,
        configure: impl FnOnce(ActionGroup) -> ActionGroup,
    ) -> ControlId {
        let id = self.allocate_id();
        let group = configure(ActionGroup::new(id, self.styles(), &self.config, class, items));
        self.insert(id, Control::ActionGroup(group))
    }

    /// Style an element the host owns.
    pub fn wrap(&mut self, class: &str) -> ControlId {
        let id = self.allocate_id();
        let wrap = Wrap::new(id, self.styles(), &self.config, class);
        self.insert(id, Control::Wrap(wrap))
    }

    pub fn control(&self, id: ControlId) -> Option<&Control> {
        self.controls.get(&id)
    }

    pub fn control_mut(&mut self, id: ControlId) -> Option<&mut Control> {
        self.controls.get_mut(&id)
    }

    /// Drop a control and its handler.
    pub fn remove(&mut self, id: ControlId) -> Option<Control> {
        self.handlers.remove(&id);
        self.controls.shift_remove(&id)
    }

    /// Register the handler for events emitted from `source`, replacing any
    /// earlier one.
    pub fn on_event(&mut self, source: ControlId, handler: impl FnMut(&ControlEvent) + 'static) {
        self.handlers.insert(source, Box::new(handler));
    }

    /// Run the handler registered for each event's source.
    pub fn dispatch(&mut self, events: &[ControlEvent]) {
        for event in events {
            match self.handlers.get_mut(&event.source) {
                Some(handler) => handler(event),
                None => log::trace!("no handler for {:?}", event),
            }
        }
    }

    pub fn set_geometry(&mut self, id: ControlId, rect: Rect) {
        if let Some(control) = self.controls.get_mut(&id) {
            control.set_geometry(rect);
        }
    }

    /// The host committed its first layout of `id`.
    pub fn realize(&mut self, id: ControlId) {
        if let Some(control) = self.controls.get_mut(&id) {
            control.realize();
        }
    }

    pub fn realize_all(&mut self) {
        for control in self.controls.values_mut() {
            control.realize();
        }
    }

    /// Topmost control under a window point.
    pub fn hit(&self, window: Point) -> Option<ControlId> {
        self.controls
            .iter()
            .rev()
            .find(|(_, control)| control.contains(window))
            .map(|(id, _)| *id)
    }

    pub fn pointer_enter(&mut self, id: ControlId) {
        match self.controls.get_mut(&id) {
            Some(Control::Object(button)) => button.pointer_enter(),
            Some(Control::Toggle(toggle)) => toggle.pointer_enter(),
            Some(Control::ActionGroup(group)) => group.pointer_enter(),
            Some(Control::Wrap(wrap)) => wrap.pointer_enter(),
            None => {}
        }
    }

    pub fn pointer_leave(&mut self, id: ControlId) {
        match self.controls.get_mut(&id) {
            Some(Control::Object(button)) => button.pointer_leave(),
            Some(Control::Toggle(toggle)) => toggle.pointer_leave(),
            Some(Control::ActionGroup(group)) => group.pointer_leave(),
            Some(Control::Wrap(wrap)) => wrap.pointer_leave(),
            None => {}
        }
    }

    /// `local` is relative to the control's top-left. Events a press causes
    /// right away (a toggle flipping) are dispatched and returned.
    pub fn pointer_press(&mut self, id: ControlId, local: Point) -> Vec<ControlEvent> {
        let events: Vec<ControlEvent> = match self.controls.get_mut(&id) {
            Some(Control::Object(button)) => {
                button.pointer_press(local);
                Vec::new()
            }
            Some(Control::Toggle(toggle)) => toggle.pointer_press(local).into_iter().collect(),
            Some(Control::ActionGroup(group)) => {
                group.pointer_press(local);
                Vec::new()
            }
            Some(Control::Wrap(wrap)) => {
                wrap.pointer_press();
                Vec::new()
            }
            None => Vec::new(),
        };
        self.dispatch(&events);
        events
    }

    pub fn pointer_move(&mut self, id: ControlId, local: Point) {
        match self.controls.get_mut(&id) {
            Some(Control::Object(button)) => button.pointer_move(local),
            Some(Control::Toggle(toggle)) => toggle.pointer_move(local),
            Some(Control::ActionGroup(group)) => group.pointer_move(local),
            Some(Control::Wrap(_)) | None => {}
        }
    }

    pub fn pointer_release(&mut self, id: ControlId, local: Point) -> Vec<ControlEvent> {
        let events: Vec<ControlEvent> = match self.controls.get_mut(&id) {
            Some(Control::Object(button)) => button.pointer_release(local).into_iter().collect(),
            Some(Control::Toggle(toggle)) => toggle.pointer_release(local).into_iter().collect(),
            Some(Control::ActionGroup(group)) => group.pointer_release(local),
            Some(Control::Wrap(wrap)) => {
                wrap.pointer_release();
                Vec::new()
            }
            None => Vec::new(),
        };
        self.dispatch(&events);
        events
    }

    /// Advance every animation. The result tells the host whether to repaint.
    pub fn tick(&mut self, dt_ms: f32) -> ChangeFlags {
        self.controls
            .values_mut()
            .fold(ChangeFlags::empty(), |flags, control| flags | control.tick(dt_ms))
    }

    pub fn set_scale_factor(&mut self, rasterizer: &mut dyn Rasterizer, scale_factor: f32) {
        self.cache.set_scale_factor(rasterizer, scale_factor);
    }

    /// Layers of every control in creation order, bottom first.
    pub fn paint(&mut self, rasterizer: &mut dyn Rasterizer) -> Vec<Layer> {
        let mut ctx = PaintContext::new(&mut self.cache, rasterizer);
        self.controls
            .values()
            .flat_map(|control| control.paint(&mut ctx))
            .collect()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
