//! Parsers for individual property values.
//!
//! All of these are total: malformed input never errors, it yields the
//! documented neutral value so a typo in a style sheet degrades to a default
//! look instead of a broken control.

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_until},
    character::complete::{char, digit1, multispace0},
    combinator::{map_res, opt, recognize},
    multi::separated_list1,
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

use crate::animation::{is_springy, Transition};
use crate::widgets::Color;

/// Default transition when a style declares none.
pub const DEFAULT_TRANSITION: &str = "0.25s ease";

/// Colour used by shadow layers that do not name one.
pub const DEFAULT_SHADOW_COLOR: Color = Color::rgba(0.0, 0.0, 0.0, 80.0 / 255.0);

/// Blur radii backdrop layers are baked at.
pub const BLUR_RADII: [u32; 10] = [0, 4, 8, 12, 16, 20, 24, 32, 40, 48];

/// A parsed `transition` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionValue {
    pub duration_secs: f32,
    pub easing: String,
}

impl TransitionValue {
    pub fn duration_ms(&self) -> f32 {
        self.duration_secs * 1000.0
    }

    pub fn is_springy(&self) -> bool {
        is_springy(&self.easing)
    }

    pub fn to_transition(&self) -> Transition {
        Transition::from_declaration(self.duration_secs, &self.easing)
    }
}

impl Default for TransitionValue {
    fn default() -> Self {
        Self {
            duration_secs: 0.25,
            easing: "ease".to_string(),
        }
    }
}

/// One layer of a `box-shadow` declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxShadow {
    pub offset_x: f32,
    pub offset_y: f32,
    pub blur: f32,
    pub spread: f32,
    pub color: Color,
}

impl Default for BoxShadow {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            blur: 0.0,
            spread: 0.0,
            color: DEFAULT_SHADOW_COLOR,
        }
    }
}

/// `glass-border: <angle>deg <width>px`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlassBorder {
    /// Light direction, CSS convention (0deg points up)
    pub light_deg: f32,
    pub width: f32,
}

impl Default for GlassBorder {
    fn default() -> Self {
        Self {
            light_deg: 135.0,
            width: 1.0,
        }
    }
}

fn signed_number(input: &str) -> IResult<&str, f32> {
    map_res(
        recognize(tuple((
            opt(alt((char('-'), char('+')))),
            digit1,
            opt(pair(char('.'), digit1)),
        ))),
        str::parse::<f32>,
    )(input)
}

fn unsigned_number(input: &str) -> IResult<&str, f32> {
    map_res(
        recognize(pair(digit1, opt(pair(char('.'), digit1)))),
        str::parse::<f32>,
    )(input)
}

/// Run `parser` at every character offset and return the first match.
fn find_first<'a, O>(input: &'a str, mut parser: impl FnMut(&'a str) -> IResult<&'a str, O>) -> Option<O> {
    input
        .char_indices()
        .find_map(|(offset, _)| parser(&input[offset..]).ok().map(|(_, out)| out))
}

/// `name(` ... `)`, yielding the raw argument text.
fn call<'a>(name: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    move |input| delimited(pair(tag(name), char('(')), take_until(")"), char(')'))(input)
}

/// Parse `scale(n) rotate(ndeg)` into `(scale, rotate_degrees)`.
///
/// Either function may be missing. A component that fails to parse falls
/// back to `1.0` / `0.0` on its own.
pub fn parse_transform(value: &str) -> (f32, f32) {
    let scale = find_first(value, call("scale"))
        .map(|arg| arg.trim().parse::<f32>().unwrap_or(1.0))
        .unwrap_or(1.0);
    let rotate = find_first(value, call("rotate"))
        .map(|arg| arg.replace("deg", "").trim().parse::<f32>().unwrap_or(0.0))
        .unwrap_or(0.0);
    (scale, rotate)
}

/// Parse `<duration> <easing>` in any order.
///
/// A token ending in `s` (or `ms`) sets the duration when it is numeric;
/// any other token sets the easing name. Later tokens win.
pub fn parse_transition(value: &str) -> TransitionValue {
    let mut parsed = TransitionValue::default();
    for token in value.split_whitespace() {
        if let Some(ms) = token.strip_suffix("ms") {
            if let Ok(ms) = ms.parse::<f32>() {
                parsed.duration_secs = ms / 1000.0;
            }
        } else if let Some(secs) = token.strip_suffix('s') {
            if let Ok(secs) = secs.parse::<f32>() {
                parsed.duration_secs = secs;
            }
        } else {
            parsed.easing = token.to_string();
        }
    }
    parsed
}

/// The fixed named palette, iOS-flavoured.
fn named_color(name: &str) -> Option<Color> {
    let (r, g, b) = match name {
        "transparent" => return Some(Color::TRANSPARENT),
        "white" => (255, 255, 255),
        "black" => (0, 0, 0),
        "red" => (255, 59, 48),
        "blue" => (10, 132, 255),
        "green" => (52, 199, 89),
        "cyan" => (90, 200, 250),
        "orange" => (255, 149, 0),
        "brown" => (162, 132, 94),
        "yellow" | "yelow" => (255, 214, 10),
        "pink" => (255, 45, 85),
        "purple" => (175, 82, 222),
        "gray" | "grey" => (142, 142, 147),
        "indigo" => (88, 86, 214),
        "teal" => (48, 209, 191),
        "mint" => (99, 230, 190),
        "lavender" => (204, 204, 255),
        "cream" => (255, 253, 240),
        "navy" => (0, 0, 128),
        "maroon" => (128, 0, 0),
        "olive" => (128, 128, 0),
        "lime" => (0, 255, 0),
        "magenta" => (255, 0, 255),
        "violet" => (143, 0, 255),
        "gold" => (255, 200, 0),
        "silver" => (192, 192, 192),
        _ => return None,
    };
    Some(Color::rgba8(r, g, b, 255))
}

fn channel(v: f32) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

fn rgb_function(input: &str) -> IResult<&str, Color> {
    let (input, name) = alt((tag_no_case("rgba"), tag_no_case("rgb")))(input)?;
    let (input, args) = delimited(
        pair(char('('), multispace0),
        separated_list1(
            tuple((multispace0, char(','), multispace0)),
            unsigned_number,
        ),
        pair(multispace0, char(')')),
    )(input)?;

    let color = match (name.len(), args.as_slice()) {
        (3, [r, g, b]) => Color::rgba8(channel(*r), channel(*g), channel(*b), 255),
        (4, [r, g, b, a]) => Color::rgba8(channel(*r), channel(*g), channel(*b), channel(a * 255.0)),
        _ => {
            return Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Verify,
            )))
        }
    };
    Ok((input, color))
}

fn hex_color(digits: &str) -> Option<Color> {
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).ok().map(|v| v * 17);
    match digits.len() {
        3 => Some(Color::rgba8(nibble(0)?, nibble(1)?, nibble(2)?, 255)),
        6 => Some(Color::rgba8(byte(0)?, byte(2)?, byte(4)?, 255)),
        // Alpha comes first
        8 => Some(Color::rgba8(byte(2)?, byte(4)?, byte(6)?, byte(0)?)),
        _ => None,
    }
}

/// Parse a colour value.
///
/// Accepts `#rgb`, `#rrggbb`, `#aarrggbb`, `rgb(r, g, b)`,
/// `rgba(r, g, b, a)` with `a` in `0..=1`, palette names and `name/percent`.
/// Returns `None` for anything else.
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(("", color)) = rgb_function(value) {
        return Some(color);
    }

    if let Some((name, percent)) = value.split_once('/') {
        let percent: u32 = percent.trim().parse().ok()?;
        let alpha = (percent.min(100) as f32 / 100.0 * 255.0) as u8;
        return named_color(&name.trim().to_ascii_lowercase()).map(|c| {
            let [r, g, b, _] = c.to_rgba8();
            Color::rgba8(r, g, b, alpha)
        });
    }

    if let Some(digits) = value.strip_prefix('#') {
        return hex_color(digits);
    }

    named_color(&value.to_ascii_lowercase())
}

/// Split on commas that are not inside parentheses.
fn split_top_level(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in value.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);
    parts
}

fn all_numbers(mut input: &str) -> Vec<f32> {
    let mut numbers = Vec::new();
    while !input.is_empty() {
        match signed_number(input) {
            Ok((rest, n)) => {
                numbers.push(n);
                input = rest;
            }
            Err(_) => {
                let mut chars = input.chars();
                chars.next();
                input = chars.as_str();
            }
        }
    }
    numbers
}

fn parse_shadow_layer(layer: &str) -> Option<BoxShadow> {
    let mut rest = layer.to_string();
    let mut color = DEFAULT_SHADOW_COLOR;

    if let Some(start) = layer.find("rgb") {
        if let Some(len) = layer[start..].find(')') {
            let call_text = &layer[start..start + len + 1];
            color = parse_color(call_text).unwrap_or(DEFAULT_SHADOW_COLOR);
            rest = layer.replacen(call_text, "", 1);
        }
    } else if let Some(start) = layer.find('#') {
        let digits: String = layer[start + 1..]
            .chars()
            .take_while(|c| c.is_ascii_hexdigit())
            .take(8)
            .collect();
        if digits.len() >= 3 {
            color = hex_color(&digits).unwrap_or(Color::TRANSPARENT);
            rest = layer.replacen(&format!("#{}", digits), "", 1);
        }
    }

    let numbers = all_numbers(&rest);
    if numbers.len() < 2 {
        return None;
    }
    Some(BoxShadow {
        offset_x: numbers[0],
        offset_y: numbers[1],
        blur: numbers.get(2).copied().unwrap_or(0.0),
        spread: numbers.get(3).copied().unwrap_or(0.0),
        color,
    })
}

/// Parse a comma-separated `box-shadow` list.
///
/// Each layer is `offset-x offset-y [blur [spread]] [colour]`; layers with
/// fewer than two numbers are dropped.
pub fn parse_box_shadow(value: &str) -> Vec<BoxShadow> {
    split_top_level(value)
        .into_iter()
        .filter_map(|layer| parse_shadow_layer(layer.trim()))
        .collect()
}

/// `backdrop-filter: blur(N)` → `N`, anything else → `0`.
pub fn parse_backdrop_blur(value: &str) -> f32 {
    find_first(value, preceded(pair(tag("blur("), multispace0), unsigned_number)).unwrap_or(0.0)
}

/// Nearest radius in [`BLUR_RADII`].
pub fn snap_blur_radius(radius: f32) -> u32 {
    BLUR_RADII
        .iter()
        .copied()
        .min_by(|a, b| {
            let da = (*a as f32 - radius).abs();
            let db = (*b as f32 - radius).abs();
            da.total_cmp(&db)
        })
        .unwrap_or(0)
}

/// `glass-border: <deg>deg <w>px`; missing parts keep their defaults and the
/// width never drops below 0.1.
pub fn parse_glass_border(value: &str) -> GlassBorder {
    let mut border = GlassBorder::default();
    if let Some(deg) = find_first(value, terminated(signed_number, preceded(multispace0, tag_no_case("deg")))) {
        border.light_deg = deg;
    }
    if let Some(width) = find_first(value, terminated(signed_number, preceded(multispace0, tag_no_case("px")))) {
        border.width = width;
    }
    border.width = border.width.max(0.1);
    border
}

/// Map a `font-weight` keyword or number onto the 100..=900 scale.
pub fn parse_font_weight(value: &str) -> u16 {
    let value = value.trim().to_ascii_lowercase();
    match value.as_str() {
        "thin" => 100,
        "light" => 300,
        "normal" | "" => 400,
        "medium" => 500,
        "semibold" => 600,
        "bold" => 700,
        "extrabold" => 800,
        "black" => 900,
        other => other.parse::<u16>().unwrap_or(400),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_transform() {
        assert_eq!(parse_transform("scale(1.2) rotate(45deg)"), (1.2, 45.0));
        assert_eq!(parse_transform("rotate(-5deg)"), (1.0, -5.0));
        assert_eq!(parse_transform("scale(0.95)"), (0.95, 0.0));
        assert_eq!(parse_transform(""), (1.0, 0.0));
        assert_eq!(parse_transform("scale(big) rotate(x)"), (1.0, 0.0));
        assert_eq!(parse_transform("scale(1.1"), (1.0, 0.0));
    }

    #[test]
    fn test_transition() {
        let t = parse_transition("0.3s ease-out");
        assert!(approx_eq(t.duration_secs, 0.3));
        assert_eq!(t.easing, "ease-out");

        let t = parse_transition("spring 0.5s");
        assert!(approx_eq(t.duration_secs, 0.5));
        assert!(t.is_springy());

        let t = parse_transition("120ms linear");
        assert!(approx_eq(t.duration_ms(), 120.0));

        assert_eq!(parse_transition(""), TransitionValue::default());
        // Malformed duration keeps the default
        assert!(approx_eq(parse_transition("fasts").duration_secs, 0.25));
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(parse_color("#2d2f3a"), Some(Color::rgba8(0x2d, 0x2f, 0x3a, 255)));
        assert_eq!(parse_color("#fff"), Some(Color::rgba8(255, 255, 255, 255)));
        assert_eq!(parse_color("#802d2f3a"), Some(Color::rgba8(0x2d, 0x2f, 0x3a, 0x80)));
        assert_eq!(parse_color("#12"), None);
        assert_eq!(parse_color("#zzzzzz"), None);
    }

    #[test]
    fn test_functional_colors() {
        assert_eq!(parse_color("rgb(45, 47, 58)"), Some(Color::rgba8(45, 47, 58, 255)));
        assert_eq!(
            parse_color("rgba(45,47,58,0.5)"),
            Some(Color::rgba8(45, 47, 58, 127))
        );
        assert_eq!(parse_color("rgba(300, 0, 0, 2)"), Some(Color::rgba8(255, 0, 0, 255)));
        assert_eq!(parse_color("rgb(1, 2)"), None);
    }

    #[test]
    fn test_named_colors() {
        assert_eq!(parse_color("red"), Some(Color::rgba8(255, 59, 48, 255)));
        assert_eq!(parse_color("White"), Some(Color::WHITE));
        assert_eq!(parse_color("transparent"), Some(Color::TRANSPARENT));
        assert_eq!(parse_color("blue/50"), Some(Color::rgba8(10, 132, 255, 127)));
        assert_eq!(parse_color("chartreuse"), None);
    }

    #[test]
    fn test_box_shadow_layers() {
        let layers = parse_box_shadow("0 4px 12px rgba(0, 0, 0, 0.3), 0 1px 2px #ff0000");
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].offset_y, 4.0);
        assert_eq!(layers[0].blur, 12.0);
        assert_eq!(layers[0].color, Color::rgba8(0, 0, 0, 76));
        assert_eq!(layers[1].color, Color::rgba8(255, 0, 0, 255));
        assert_eq!(layers[1].spread, 0.0);
    }

    #[test]
    fn test_box_shadow_defaults_and_drops() {
        let layers = parse_box_shadow("2 3, 5");
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].color, DEFAULT_SHADOW_COLOR);
        assert!(parse_box_shadow("none").is_empty());
    }

    #[test]
    fn test_backdrop_blur() {
        assert_eq!(parse_backdrop_blur("blur(14px)"), 14.0);
        assert_eq!(parse_backdrop_blur("blur( 6 )"), 6.0);
        assert_eq!(parse_backdrop_blur("none"), 0.0);
        assert_eq!(snap_blur_radius(14.0), 12);
        assert_eq!(snap_blur_radius(100.0), 48);
        assert_eq!(snap_blur_radius(1.0), 0);
    }

    #[test]
    fn test_glass_border() {
        let g = parse_glass_border("45deg 1.5px");
        assert_eq!(g.light_deg, 45.0);
        assert_eq!(g.width, 1.5);
        assert_eq!(parse_glass_border("on"), GlassBorder::default());
        assert_eq!(parse_glass_border("0px").width, 0.1);
    }

    #[test]
    fn test_font_weight() {
        assert_eq!(parse_font_weight("bold"), 700);
        assert_eq!(parse_font_weight("semibold"), 600);
        assert_eq!(parse_font_weight("350"), 350);
        assert_eq!(parse_font_weight("heavy"), 400);
    }
}
