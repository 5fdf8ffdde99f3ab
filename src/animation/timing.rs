//! Timing functions (easing curves) for animations.
//!
//! Timing functions control the rate of change during an animation, allowing
//! for natural-feeling motion rather than linear interpolation.
//!
//! ## Built-in Easing Functions
//!
//! - [`TimingFunction::Linear`] - Constant speed (no easing)
//! - [`TimingFunction::EaseIn`] - Cubic acceleration
//! - [`TimingFunction::EaseOut`] - Cubic deceleration
//! - [`TimingFunction::EaseInOut`] - Slow start and end, fast middle
//!
//! ## Advanced Options
//!
//! - [`TimingFunction::CubicBezier`] - CSS-style cubic bezier curve
//! - [`TimingFunction::Spline`] - Chain of cubic segments, may leave [0, 1]
//! - [`TimingFunction::OutElastic`] - Decaying sine overshoot
//! - [`TimingFunction::Custom`] - User-defined function
//!
//! Style sheets name curves rather than build them; see [`TimingFunction::from_name`].

use std::f32::consts::TAU;
use std::sync::Arc;

/// One cubic segment of a [`TimingFunction::Spline`].
///
/// The segment starts where the previous one ended (the first starts at `(0, 0)`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplineSegment {
    pub c1: (f32, f32),
    pub c2: (f32, f32),
    pub end: (f32, f32),
}

impl SplineSegment {
    pub const fn new(c1: (f32, f32), c2: (f32, f32), end: (f32, f32)) -> Self {
        Self { c1, c2, end }
    }
}

/// Timing function that controls the animation curve
#[derive(Clone)]
pub enum TimingFunction {
    /// Linear interpolation (constant speed)
    Linear,
    /// Starts slow, ends fast
    EaseIn,
    /// Starts fast, ends slow
    EaseOut,
    /// Starts slow, speeds up, then slows down
    EaseInOut,
    /// CSS cubic-bezier curve (x1, y1, x2, y2)
    CubicBezier(f32, f32, f32, f32),
    /// Piecewise cubic curve; output may overshoot or dip below zero
    Spline(Arc<[SplineSegment]>),
    /// Elastic settle with the given amplitude and period
    OutElastic { amplitude: f32, period: f32 },
    /// Custom timing function
    Custom(Arc<dyn Fn(f32) -> f32 + Send + Sync>),
}

impl TimingFunction {
    /// Evaluate the timing function at time t (0.0 to 1.0)
    /// Returns the interpolation factor (can exceed [0, 1] for overshoot)
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            TimingFunction::Linear => t,
            TimingFunction::EaseIn => ease_in(t),
            TimingFunction::EaseOut => ease_out(t),
            TimingFunction::EaseInOut => ease_in_out(t),
            TimingFunction::CubicBezier(x1, y1, x2, y2) => cubic_bezier(t, *x1, *y1, *x2, *y2),
            TimingFunction::Spline(segments) => spline(t, segments),
            TimingFunction::OutElastic { amplitude, period } => out_elastic(t, *amplitude, *period),
            TimingFunction::Custom(f) => f(t),
        }
    }

    /// Create a custom timing function from a closure
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f32) -> f32 + Send + Sync + 'static,
    {
        TimingFunction::Custom(Arc::new(f))
    }

    /// Create a spline from its segments.
    pub fn spline(segments: &[SplineSegment]) -> Self {
        TimingFunction::Spline(Arc::from(segments))
    }

    /// Resolve an easing name as written in a `transition` declaration.
    ///
    /// Unknown names fall back to the cubic in-out curve used for `ease`.
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "linear" => TimingFunction::Linear,
            "ease-in" => TimingFunction::EaseIn,
            "ease-out" => TimingFunction::EaseOut,
            "bounce" => TimingFunction::CubicBezier(0.175, 0.885, 0.32, 1.275),
            "spring" => TimingFunction::OutElastic {
                amplitude: 1.0,
                period: 0.4,
            },
            _ => TimingFunction::EaseInOut,
        }
    }
}

/// Whether an easing name overshoots, which gates the jelly and stretch effects.
pub fn is_springy(name: &str) -> bool {
    matches!(name.trim(), "spring" | "bounce")
}

impl std::fmt::Debug for TimingFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimingFunction::Linear => write!(f, "Linear"),
            TimingFunction::EaseIn => write!(f, "EaseIn"),
            TimingFunction::EaseOut => write!(f, "EaseOut"),
            TimingFunction::EaseInOut => write!(f, "EaseInOut"),
            TimingFunction::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "CubicBezier({}, {}, {}, {})", x1, y1, x2, y2)
            }
            TimingFunction::Spline(segments) => write!(f, "Spline({} segments)", segments.len()),
            TimingFunction::OutElastic { amplitude, period } => {
                write!(f, "OutElastic({}, {})", amplitude, period)
            }
            TimingFunction::Custom(_) => write!(f, "Custom"),
        }
    }
}

// Easing functions

fn ease_in(t: f32) -> f32 {
    t * t * t
}

fn ease_out(t: f32) -> f32 {
    let f = t - 1.0;
    f * f * f + 1.0
}

fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let f = 2.0 * t - 2.0;
        0.5 * f * f * f + 1.0
    }
}

fn out_elastic(t: f32, amplitude: f32, period: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let period = period.max(1e-3);
    let (a, s) = if amplitude < 1.0 {
        (1.0, period / 4.0)
    } else {
        (amplitude, period / TAU * (1.0 / amplitude).asin())
    };
    a * 2f32.powf(-10.0 * t) * ((t - s) * TAU / period).sin() + 1.0
}

/// Cubic bezier curve evaluation
/// Simplified implementation assuming x1, x2 are in [0, 1]
fn cubic_bezier(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    // Use Newton-Raphson to solve for t given x
    let mut current_t = t;
    for _ in 0..8 {
        let current_x = cubic_bezier_x(current_t, x1, x2);
        let current_slope = cubic_bezier_slope(current_t, x1, x2);
        if current_slope.abs() < 1e-6 {
            break;
        }
        current_t -= (current_x - t) / current_slope;
    }
    cubic_bezier_y(current_t, y1, y2)
}

fn cubic_bezier_x(t: f32, x1: f32, x2: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    3.0 * mt2 * t * x1 + 3.0 * mt * t2 * x2 + t3
}

fn cubic_bezier_y(t: f32, y1: f32, y2: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    3.0 * mt2 * t * y1 + 3.0 * mt * t2 * y2 + t3
}

fn cubic_bezier_slope(t: f32, x1: f32, x2: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * x1 + 6.0 * mt * t * (x2 - x1) + 3.0 * t * t * (1.0 - x2)
}

fn bezier_component(s: f32, p0: f32, p1: f32, p2: f32, p3: f32) -> f32 {
    let ms = 1.0 - s;
    ms * ms * ms * p0 + 3.0 * ms * ms * s * p1 + 3.0 * ms * s * s * p2 + s * s * s * p3
}

fn spline(t: f32, segments: &[SplineSegment]) -> f32 {
    let mut start = (0.0f32, 0.0f32);
    for segment in segments {
        if t <= segment.end.0 {
            if t <= start.0 {
                return start.1;
            }
            if t >= segment.end.0 {
                return segment.end.1;
            }
            // x is monotonic within a segment; bisect for the curve parameter
            let (mut lo, mut hi) = (0.0f32, 1.0f32);
            for _ in 0..40 {
                let mid = (lo + hi) * 0.5;
                let x = bezier_component(mid, start.0, segment.c1.0, segment.c2.0, segment.end.0);
                if x < t {
                    lo = mid;
                } else {
                    hi = mid;
                }
            }
            let s = (lo + hi) * 0.5;
            return bezier_component(s, start.1, segment.c1.1, segment.c2.1, segment.end.1);
        }
        start = segment.end;
    }
    start.1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_linear() {
        assert_eq!(TimingFunction::Linear.evaluate(0.0), 0.0);
        assert_eq!(TimingFunction::Linear.evaluate(0.5), 0.5);
        assert_eq!(TimingFunction::Linear.evaluate(1.0), 1.0);
    }

    #[test]
    fn test_ease_in() {
        let result = TimingFunction::EaseIn.evaluate(0.5);
        assert!(result < 0.5); // Should be slower at start
    }

    #[test]
    fn test_ease_out() {
        let result = TimingFunction::EaseOut.evaluate(0.5);
        assert!(result > 0.5); // Should be faster at start
        assert!(approx_eq(TimingFunction::EaseOut.evaluate(1.0), 1.0));
    }

    #[test]
    fn test_ease_in_out_is_symmetric() {
        let f = TimingFunction::EaseInOut;
        assert!(approx_eq(f.evaluate(0.5), 0.5));
        assert!(approx_eq(f.evaluate(0.25) + f.evaluate(0.75), 1.0));
    }

    #[test]
    fn test_out_elastic_overshoots_and_lands() {
        let f = TimingFunction::from_name("spring");
        assert_eq!(f.evaluate(0.0), 0.0);
        assert_eq!(f.evaluate(1.0), 1.0);
        let peak = (1..100)
            .map(|i| f.evaluate(i as f32 / 100.0))
            .fold(0.0f32, f32::max);
        assert!(peak > 1.0, "spring should overshoot, peak {}", peak);
    }

    #[test]
    fn test_bounce_overshoots() {
        let f = TimingFunction::from_name("bounce");
        let peak = (1..100)
            .map(|i| f.evaluate(i as f32 / 100.0))
            .fold(0.0f32, f32::max);
        assert!(peak > 1.0);
        assert!(approx_eq(f.evaluate(1.0), 1.0));
    }

    #[test]
    fn test_spline_hits_segment_ends() {
        let f = TimingFunction::spline(&[
            SplineSegment::new((0.1, 0.0), (0.4, 1.5), (0.5, 1.5)),
            SplineSegment::new((0.6, 1.5), (0.9, 1.0), (1.0, 1.0)),
        ]);
        assert!(approx_eq(f.evaluate(0.0), 0.0));
        assert!(approx_eq(f.evaluate(0.5), 1.5));
        assert!(approx_eq(f.evaluate(1.0), 1.0));
    }

    #[test]
    fn test_names() {
        assert!(matches!(TimingFunction::from_name("linear"), TimingFunction::Linear));
        assert!(matches!(TimingFunction::from_name("ease"), TimingFunction::EaseInOut));
        assert!(matches!(TimingFunction::from_name("ease-out"), TimingFunction::EaseOut));
        assert!(matches!(TimingFunction::from_name("wobble"), TimingFunction::EaseInOut));
        assert!(is_springy("spring"));
        assert!(is_springy("bounce"));
        assert!(!is_springy("ease-out"));
    }
}
