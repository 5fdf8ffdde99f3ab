use bitflags::bitflags;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build a color from 8-bit channels.
    pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: f32::from(r) / 255.0,
            g: f32::from(g) / 255.0,
            b: f32::from(b) / 255.0,
            a: f32::from(a) / 255.0,
        }
    }

    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Channels quantised to 8 bits, as used in cache keys.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    pub fn is_visible(&self) -> bool {
        self.a > 0.0
    }

    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance_to(&self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: size.width,
            height: size.height,
        }
    }

    /// Rectangle of `size` centered on `center`.
    pub fn centered_at(center: Point, size: Size) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    pub fn inset(&self, amount: f32) -> Self {
        Self {
            x: self.x + amount,
            y: self.y + amount,
            width: (self.width - amount * 2.0).max(0.0),
            height: (self.height - amount * 2.0).max(0.0),
        }
    }

    /// Half-open containment test.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    pub fn contains_point(&self, p: Point) -> bool {
        self.contains(p.x, p.y)
    }
}

/// Identifies a control, a style-only slot, or any other event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(pub u32);

/// What a control reports back to its owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEventKind {
    /// Press and release both landed inside the hit area.
    Clicked,
    /// A toggle changed its checked state.
    Toggled(bool),
    /// An action group opened (`true`) or started closing (`false`).
    Expanded(bool),
}

/// Message emitted by controls and dispatched through a lookup table by the owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlEvent {
    pub source: ControlId,
    pub kind: ControlEventKind,
}

impl ControlEvent {
    pub fn new(source: ControlId, kind: ControlEventKind) -> Self {
        Self { source, kind }
    }
}

bitflags! {
    /// What a tick or event changed, so the host knows what to redo.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ChangeFlags: u8 {
        /// Some overlay needs a repaint.
        const PAINT = 0b0000_0001;
        /// Some overlay or slot moved or resized.
        const GEOMETRY = 0b0000_0010;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_centered_at() {
        let r = Rect::centered_at(Point::new(50.0, 40.0), Size::new(20.0, 10.0));
        assert_eq!(r, Rect::new(40.0, 35.0, 20.0, 10.0));
        assert_eq!(r.center(), Point::new(50.0, 40.0));
    }

    #[test]
    fn test_rect_contains_is_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(0.0, 0.0));
        assert!(r.contains(9.9, 9.9));
        assert!(!r.contains(10.0, 5.0));
    }

    #[test]
    fn test_color_rgba8_roundtrip_quantises() {
        let c = Color::rgba8(45, 47, 58, 255);
        assert_eq!(c.to_rgba8(), [45, 47, 58, 255]);
    }

    #[test]
    fn test_change_flags_union() {
        let mut flags = ChangeFlags::empty();
        flags |= ChangeFlags::PAINT;
        assert!(flags.contains(ChangeFlags::PAINT));
        assert!(!flags.contains(ChangeFlags::GEOMETRY));
    }
}
