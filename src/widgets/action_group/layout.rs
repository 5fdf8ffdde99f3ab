//! Pill geometry: overall size, the pivot it grows from, and where each slot sits.
//!
//! Everything here is in canvas coordinates. The canvas is the pill plus a
//! margin on every side so the scale animation has room to draw.

use crate::style::PropertyMap;
use crate::widgets::{Point, Rect, Size};

pub const DEFAULT_GAP: f32 = 6.0;
pub const DEFAULT_PADDING: f32 = 6.0;
pub const DEFAULT_TRIGGER_SIZE: Size = Size::new(56.0, 56.0);
pub const DEFAULT_ITEM_SIZE: Size = Size::new(110.0, 44.0);
/// Room around the pill inside its canvas.
pub const PILL_MARGIN: f32 = 80.0;

/// Axis the items are laid out along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Horizontal,
    Vertical,
}

impl Direction {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "vertical" => Direction::Vertical,
            _ => Direction::Horizontal,
        }
    }
}

/// Where the trigger sits along the pill. `Start` is left or top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    Start,
    Center,
    End,
}

impl Anchor {
    /// `right` (horizontal) or `bottom` (vertical) is `End`, `center` is
    /// `Center`, anything else `Start`.
    pub fn parse(value: &str, direction: Direction) -> Self {
        match (value.trim().to_ascii_lowercase().as_str(), direction) {
            ("center", _) => Anchor::Center,
            ("right", Direction::Horizontal) | ("bottom", Direction::Vertical) => Anchor::End,
            _ => Anchor::Start,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PillLayout {
    pub direction: Direction,
    pub anchor: Anchor,
    pub gap: f32,
    pub padding: f32,
    pub trigger: Size,
    pub item: Size,
    pub count: usize,
    pub margin: f32,
}

impl PillLayout {
    /// Read `action-gap`, `action-padding`, `width`/`height` of the trigger and
    /// `action-item-width`/`action-item-height` from a trigger base style.
    pub fn from_style(base: &PropertyMap, direction: Direction, anchor: Anchor, count: usize, margin: f32) -> Self {
        Self {
            direction,
            anchor,
            gap: base.number("action-gap", DEFAULT_GAP),
            padding: base.number("action-padding", DEFAULT_PADDING),
            trigger: trigger_size(base),
            item: Size::new(
                base.number("action-item-width", DEFAULT_ITEM_SIZE.width),
                base.number("action-item-height", DEFAULT_ITEM_SIZE.height),
            ),
            count,
            margin,
        }
    }

    pub fn pill_size(&self) -> Size {
        let n = self.count as f32;
        let (pad, gap) = (self.padding, self.gap);
        match self.direction {
            Direction::Horizontal => Size::new(
                pad * 2.0 + self.trigger.width + gap + n * self.item.width + (n - 1.0) * gap,
                self.trigger.height.max(self.item.height) + pad * 2.0,
            ),
            Direction::Vertical => Size::new(
                self.trigger.width.max(self.item.width) + pad * 2.0,
                pad * 2.0 + self.trigger.height + gap + n * self.item.height + (n - 1.0) * gap,
            ),
        }
    }

    pub fn canvas_size(&self) -> Size {
        let pill = self.pill_size();
        Size::new(pill.width + self.margin * 2.0, pill.height + self.margin * 2.0)
    }

    pub fn pill_rect(&self) -> Rect {
        let pill = self.pill_size();
        Rect::new(self.margin, self.margin, pill.width, pill.height)
    }

    /// Centre of the trigger slot (or of the pill when centred); the pill
    /// scales about this point and it is pinned to the trigger on screen.
    pub fn pivot(&self) -> Point {
        let pill = self.pill_rect();
        let (pad, trigger) = (self.padding, self.trigger);
        match (self.direction, self.anchor) {
            (_, Anchor::Center) => pill.center(),
            (Direction::Horizontal, Anchor::End) => Point::new(
                pill.x + pill.width - pad - trigger.width / 2.0,
                pill.y + pill.height / 2.0,
            ),
            (Direction::Horizontal, Anchor::Start) => {
                Point::new(pill.x + pad + trigger.width / 2.0, pill.y + pill.height / 2.0)
            }
            (Direction::Vertical, Anchor::End) => Point::new(
                pill.x + pill.width / 2.0,
                pill.y + pill.height - pad - trigger.height / 2.0,
            ),
            (Direction::Vertical, Anchor::Start) => {
                Point::new(pill.x + pill.width / 2.0, pill.y + pad + trigger.height / 2.0)
            }
        }
    }

    /// Slot 0 is the trigger, slot `i + 1` the `i`-th item. Items sit on the
    /// far side of the trigger; a centred pill lays out like `Start`.
    pub fn slot_rects(&self) -> Vec<Rect> {
        let pill = self.pill_rect();
        let pad = self.padding;
        let mut rects = Vec::with_capacity(self.count + 1);

        match self.direction {
            Direction::Horizontal => {
                let height = self.trigger.height;
                let y = pill.y + pad;
                let step = self.item.width + self.gap;
                if self.anchor == Anchor::End {
                    let tx = pill.x + pill.width - pad - self.trigger.width;
                    rects.push(Rect::new(tx, y, self.trigger.width, height));
                    rects.extend((0..self.count).map(|i| {
                        let x = tx - (self.count - i) as f32 * step;
                        Rect::new(x, y, self.item.width, height)
                    }));
                } else {
                    let tx = pill.x + pad;
                    rects.push(Rect::new(tx, y, self.trigger.width, height));
                    rects.extend((0..self.count).map(|i| {
                        let x = tx + self.trigger.width + self.gap + i as f32 * step;
                        Rect::new(x, y, self.item.width, height)
                    }));
                }
            }
            Direction::Vertical => {
                let width = pill.width - pad * 2.0;
                let x = pill.x + pad;
                let step = self.item.height + self.gap;
                if self.anchor == Anchor::End {
                    let ty = pill.y + pill.height - pad - self.trigger.height;
                    rects.push(Rect::new(x, ty, width, self.trigger.height));
                    rects.extend((0..self.count).map(|i| {
                        let y = ty - (self.count - i) as f32 * step;
                        Rect::new(x, y, width, self.item.height)
                    }));
                } else {
                    let ty = pill.y + pad;
                    rects.push(Rect::new(x, ty, width, self.trigger.height));
                    rects.extend((0..self.count).map(|i| {
                        let y = ty + self.trigger.height + self.gap + i as f32 * step;
                        Rect::new(x, y, width, self.item.height)
                    }));
                }
            }
        }
        rects
    }
}

/// `width`/`height` of a trigger style, 56 × 56 when undeclared.
pub fn trigger_size(base: &PropertyMap) -> Size {
    Size::new(
        base.number("width", DEFAULT_TRIGGER_SIZE.width),
        base.number("height", DEFAULT_TRIGGER_SIZE.height),
    )
}
