//! Draw command definitions for overlay layers.

use super::cache::RasterId;
use crate::style::BoxShadow;
use crate::transform::Transform;
use crate::widgets::{Color, Point, Rect, Size};

/// Alpha stops of the glass ring's conical gradient, as `(position, alpha)`.
pub const GLASS_STOPS: [(f32, u8); 5] = [(0.0, 128), (0.25, 25), (0.5, 128), (0.75, 25), (1.0, 128)];

/// Border definition for shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    /// Border width in logical pixels
    pub width: f32,
    /// Border color
    pub color: Color,
}

impl Border {
    /// Create a new border.
    pub fn new(width: f32, color: Color) -> Self {
        Self { width, color }
    }
}

/// A single draw operation in layer coordinates.
///
/// Coordinates are relative to the owning [`Layer`]'s origin. The layer
/// transform applies to every command.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// One box-shadow layer behind a rounded rectangle.
    Shadow {
        /// Bounds of the shape casting the shadow, before offset and spread
        rect: Rect,
        /// Corner radius of the casting shape
        radius: f32,
        shadow: BoxShadow,
        /// Crossfade weight of this shadow layer
        opacity: f32,
    },

    /// Blurred copy of whatever lies behind `rect`, clipped to its rounded shape.
    Backdrop {
        rect: Rect,
        radius: f32,
        /// Pre-blurred surface layer to sample from
        layer: RasterId,
        /// Snapped blur radius of `layer`
        blur_radius: u32,
    },

    /// Draw a rounded rectangle with an optional border.
    RoundedRect {
        /// Rectangle bounds in layer coordinates
        rect: Rect,
        /// Fill color; transparent means border only
        color: Color,
        /// Corner radius in logical pixels
        radius: f32,
        /// Optional border
        border: Option<Border>,
    },

    /// White ring lit from `light_deg` (CSS angle, 0 = up).
    ///
    /// The ring fills the space between the outer rounded rect and the same
    /// rect shrunk by `width`; its alpha follows [`GLASS_STOPS`] around a
    /// conical gradient starting at `90 - light_deg`.
    GlassBorder {
        rect: Rect,
        /// Outer corner radius, already limited to half the shorter side
        outer_radius: f32,
        /// Inner corner radius, never negative
        inner_radius: f32,
        light_deg: f32,
        width: f32,
    },

    /// Draw an icon.
    Icon {
        /// Icon source as given by the application
        source: String,
        /// Square the icon is fitted into
        rect: Rect,
    },

    /// Draw a pre-rasterized single line of text.
    Text {
        raster: RasterId,
        /// Destination rectangle, the size the raster was made for
        rect: Rect,
    },
}

impl DrawCommand {
    pub fn rounded_rect(rect: Rect, color: Color, radius: f32) -> Self {
        Self::RoundedRect {
            rect,
            color,
            radius,
            border: None,
        }
    }

    pub fn bordered_rect(rect: Rect, color: Color, radius: f32, border: Border) -> Self {
        Self::RoundedRect {
            rect,
            color,
            radius,
            border: Some(border),
        }
    }

    pub fn glass_border(rect: Rect, radius: f32, light_deg: f32, width: f32) -> Self {
        let outer_radius = radius.min(rect.width.min(rect.height) / 2.0);
        Self::GlassBorder {
            rect,
            outer_radius,
            inner_radius: (outer_radius - width).max(0.0),
            light_deg,
            width,
        }
    }

    /// Start angle of the glass gradient, counter-clockwise from the +x axis.
    pub fn glass_gradient_angle(light_deg: f32) -> f32 {
        90.0 - light_deg
    }
}

/// A painted overlay: commands in layer coordinates plus how to place them.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Top-left of the layer in window coordinates
    pub origin: Point,
    pub size: Size,
    /// Multiplied into every command
    pub opacity: f32,
    /// Applied to every command, in layer coordinates
    pub transform: Transform,
    pub commands: Vec<DrawCommand>,
}

impl Layer {
    pub fn new(bounds: Rect) -> Self {
        Self {
            origin: bounds.origin(),
            size: bounds.size(),
            opacity: 1.0,
            transform: Transform::IDENTITY,
            commands: Vec::new(),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.origin.x, self.origin.y, self.size.width, self.size.height)
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Map a point in layer coordinates through the transform into window coordinates.
    pub fn to_window(&self, p: Point) -> Point {
        let local = self.transform.transform_point(p);
        local.offset(self.origin.x, self.origin.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glass_border_radii() {
        let cmd = DrawCommand::glass_border(Rect::new(0.0, 0.0, 40.0, 20.0), 30.0, 135.0, 1.5);
        match cmd {
            DrawCommand::GlassBorder {
                outer_radius,
                inner_radius,
                ..
            } => {
                assert_eq!(outer_radius, 10.0);
                assert_eq!(inner_radius, 8.5);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_glass_inner_radius_never_negative() {
        let cmd = DrawCommand::glass_border(Rect::new(0.0, 0.0, 40.0, 40.0), 1.0, 0.0, 4.0);
        assert!(matches!(cmd, DrawCommand::GlassBorder { inner_radius, .. } if inner_radius == 0.0));
    }

    #[test]
    fn test_layer_to_window() {
        let mut layer = Layer::new(Rect::new(100.0, 50.0, 200.0, 100.0));
        layer.transform = Transform::translate(5.0, 0.0);
        assert_eq!(layer.to_window(Point::new(10.0, 10.0)), Point::new(115.0, 60.0));
    }
}
