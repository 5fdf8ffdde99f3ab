use crate::widgets::{Rect, Size};

/// Horizontal placement of an overlay's logical rectangle in its canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical placement of an overlay's logical rectangle in its canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Where the logical rectangle sits inside the oversized overlay canvas,
/// written in a style as `align: left top`, `align: right` and so on.
///
/// Words may come in any order; an axis that is not named stays centered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Align {
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
}

impl Align {
    pub const CENTER: Self = Self {
        horizontal: HorizontalAlign::Center,
        vertical: VerticalAlign::Center,
    };

    pub fn new(horizontal: HorizontalAlign, vertical: VerticalAlign) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Parse an `align` value. Unknown words are ignored.
    pub fn parse(value: &str) -> Self {
        let mut align = Self::CENTER;
        for word in value.split_whitespace() {
            match word.to_ascii_lowercase().as_str() {
                "left" => align.horizontal = HorizontalAlign::Left,
                "right" => align.horizontal = HorizontalAlign::Right,
                "top" => align.vertical = VerticalAlign::Top,
                "bottom" => align.vertical = VerticalAlign::Bottom,
                "center" => {}
                other => log::trace!("ignoring align keyword {:?}", other),
            }
        }
        align
    }

    /// Place a rectangle of `size` inside `bounds`.
    pub fn resolve(&self, bounds: Rect, size: Size) -> Rect {
        let x = match self.horizontal {
            HorizontalAlign::Left => bounds.x,
            HorizontalAlign::Center => bounds.x + (bounds.width - size.width) / 2.0,
            HorizontalAlign::Right => bounds.x + bounds.width - size.width,
        };

        let y = match self.vertical {
            VerticalAlign::Top => bounds.y,
            VerticalAlign::Center => bounds.y + (bounds.height - size.height) / 2.0,
            VerticalAlign::Bottom => bounds.y + bounds.height - size.height,
        };

        Rect::new(x, y, size.width, size.height)
    }

    pub fn is_center(&self) -> bool {
        *self == Self::CENTER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Align::parse("center"), Align::CENTER);
        assert_eq!(Align::parse(""), Align::CENTER);
        assert_eq!(
            Align::parse("left top"),
            Align::new(HorizontalAlign::Left, VerticalAlign::Top)
        );
        assert_eq!(
            Align::parse("Bottom  right"),
            Align::new(HorizontalAlign::Right, VerticalAlign::Bottom)
        );
        assert_eq!(
            Align::parse("top"),
            Align::new(HorizontalAlign::Center, VerticalAlign::Top)
        );
    }

    #[test]
    fn test_resolve() {
        let canvas = Rect::new(0.0, 0.0, 400.0, 200.0);
        let size = Size::new(80.0, 40.0);

        assert_eq!(Align::CENTER.resolve(canvas, size), Rect::new(160.0, 80.0, 80.0, 40.0));
        assert_eq!(
            Align::parse("left top").resolve(canvas, size),
            Rect::new(0.0, 0.0, 80.0, 40.0)
        );
        assert_eq!(
            Align::parse("right bottom").resolve(canvas, size),
            Rect::new(320.0, 160.0, 80.0, 40.0)
        );
    }

    #[test]
    fn test_is_center() {
        assert!(Align::default().is_center());
        assert!(!Align::parse("left").is_center());
    }
}
