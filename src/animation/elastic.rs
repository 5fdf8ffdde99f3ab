//! Elastic drag deformation and the curves that settle it.
//!
//! Everything here is plain math over pointer positions. The controllers feed
//! the results into an overlay's offset/flatten/direction state either
//! directly (while dragging) or through an [`AnimationState`] (on release).
//!
//! [`AnimationState`]: crate::animation::AnimationState

use crate::animation::{SplineSegment, TimingFunction};
use crate::widgets::Point;

/// Gain applied before the `tanh` soft limit.
const DRAG_GAIN: f32 = 1.2;
/// Upper bound of the normalised content offset.
pub const MAX_OFFSET: f32 = 0.85;
/// Upper bound of the drag flatten.
pub const MAX_FLATTEN: f32 = 0.8;
/// Default duration of a button's snap-back.
pub const SNAP_BACK_MS: f32 = 520.0;
/// Duration of the knob jelly settle after a toggle drag.
pub const KNOB_JELLY_MS: f32 = 420.0;

/// Offset, flatten and flatten axis produced by a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElasticDeform {
    /// Content offset, normalised to half the widget size.
    pub offset: Point,
    pub flatten: f32,
    /// Unit vector along the drag, or zero when there is no drag.
    pub direction: Point,
}

impl ElasticDeform {
    pub const NONE: ElasticDeform = ElasticDeform {
        offset: Point::ZERO,
        flatten: 0.0,
        direction: Point::ZERO,
    };
}

/// Map a drag from `origin` to `pointer` onto a bounded deformation.
///
/// `extent` is the widget width and `radius_fraction` the `elastic-drag`
/// value; together they set how far the pointer must travel before the
/// deformation gets heavy. Offset stays below [`MAX_OFFSET`] and flatten below
/// [`MAX_FLATTEN`] however far the pointer goes.
pub fn apply_elastic(origin: Point, pointer: Point, extent: f32, radius_fraction: f32) -> ElasticDeform {
    let dx = pointer.x - origin.x;
    let dy = pointer.y - origin.y;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance == 0.0 {
        return ElasticDeform::NONE;
    }

    let direction = Point::new(dx / distance, dy / distance);
    let reach = (extent * radius_fraction).max(1.0);
    let mapped = (distance / reach * DRAG_GAIN).tanh();
    let offset = mapped * MAX_OFFSET;

    ElasticDeform {
        offset: Point::new(direction.x * offset, direction.y * offset),
        flatten: mapped * MAX_FLATTEN,
        direction,
    }
}

/// Fast-start curve used to bring the content offset home after a drag.
pub fn snap_back_easing() -> TimingFunction {
    TimingFunction::spline(&[SplineSegment::new((0.25, 1.06), (0.55, 0.98), (1.0, 1.0))])
}

/// Damped oscillation for releasing a flatten of `peak`.
///
/// Animating `peak -> 0` through this curve yields `peak`, then `0`, then
/// `-peak/5` on the other axis, then `0`, then `+peak/25`, then rest.
pub fn damped_flatten_easing() -> TimingFunction {
    TimingFunction::spline(&[
        SplineSegment::new((0.15, 0.00), (0.28, 1.00), (0.35, 1.00)),
        SplineSegment::new((0.40, 1.00), (0.46, 1.20), (0.50, 1.20)),
        SplineSegment::new((0.54, 1.20), (0.59, 1.00), (0.62, 1.00)),
        SplineSegment::new((0.65, 1.00), (0.69, 0.96), (0.72, 0.96)),
        SplineSegment::new((0.75, 0.96), (0.78, 1.00), (0.80, 1.00)),
        SplineSegment::new((0.88, 1.00), (0.95, 1.00), (1.00, 1.00)),
    ])
}

/// Easing that settles a stretched track back to rest.
pub fn stretch_reset_easing(springy: bool) -> TimingFunction {
    if springy {
        TimingFunction::OutElastic {
            amplitude: 0.55,
            period: 0.35,
        }
    } else {
        TimingFunction::EaseOut
    }
}

/// Signed track flatten for a knob pulled `overflow` px past its rail.
pub fn track_stretch(overflow: f32, track_width: f32, radius_fraction: f32) -> f32 {
    if overflow == 0.0 || radius_fraction <= 0.0 {
        return 0.0;
    }
    let reach = (track_width * radius_fraction / 10.0).max(1.0);
    let mapped = (overflow.abs() / reach * DRAG_GAIN).tanh();
    mapped * MAX_OFFSET * 1.2 * overflow.signum()
}

/// Signed track flatten while a springy snap carries the knob past its rest.
pub fn overshoot_stretch(overshoot: f32, track_width: f32) -> f32 {
    let half = (track_width / 2.0).max(1.0);
    (overshoot / half * 3.0).tanh() * 0.30
}

/// Tuned constants of the knob "jelly" squash.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JellyConfig {
    /// Below this smoothed speed (px/frame) the knob counts as stopped.
    pub stop_speed: f32,
    /// A stop only flips the axis while flatten is above this.
    pub stop_flatten: f32,
    /// Largest flatten kept through a sudden stop.
    pub stop_flatten_cap: f32,
    /// Flatten at full travel while moving.
    pub drag_flatten: f32,
    /// Smallest peak used for the release oscillation.
    pub min_release_peak: f32,
    /// Weight of the previous velocity in the moving average.
    pub velocity_keep: f32,
}

impl Default for JellyConfig {
    fn default() -> Self {
        Self {
            stop_speed: 1.5,
            stop_flatten: 0.12,
            stop_flatten_cap: 0.55,
            drag_flatten: 0.45,
            min_release_peak: 0.25,
            velocity_keep: 0.7,
        }
    }
}

impl JellyConfig {
    /// Knob squash for a drag of `drag_dx` px over a rail of `travel` px.
    ///
    /// Moving squashes across the motion; a sudden stop while still squashed
    /// flips the squash onto the motion axis.
    pub fn knob_jelly(&self, drag_dx: f32, travel: f32, speed: f32, prev_flatten: f32) -> (Point, f32) {
        if speed < self.stop_speed && prev_flatten > self.stop_flatten {
            let sign = if drag_dx > 0.0 { 1.0 } else { -1.0 };
            (Point::new(sign, 0.0), prev_flatten.min(self.stop_flatten_cap))
        } else {
            let fraction = (drag_dx.abs() / travel.max(1.0)).clamp(0.0, 1.0);
            (Point::new(0.0, 1.0), fraction * self.drag_flatten)
        }
    }

    pub fn release_peak(&self, flatten: f32) -> f32 {
        flatten.max(self.min_release_peak)
    }
}

/// A pointer drag from press to release.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub origin: Point,
    pub current: Point,
    /// Smoothed horizontal velocity in px per move event.
    pub velocity: f32,
    /// `elastic-drag` radius fraction in effect for this drag.
    pub radius_fraction: f32,
    moved: bool,
}

impl DragSession {
    pub fn new(origin: Point, radius_fraction: f32) -> Self {
        Self {
            origin,
            current: origin,
            velocity: 0.0,
            radius_fraction,
            moved: false,
        }
    }

    /// Record a pointer move; `keep` weights the previous velocity.
    pub fn update(&mut self, pointer: Point, keep: f32) {
        let frame_dx = pointer.x - self.current.x;
        self.velocity = self.velocity * keep + frame_dx * (1.0 - keep);
        self.current = pointer;
    }

    pub fn delta(&self) -> Point {
        Point::new(self.current.x - self.origin.x, self.current.y - self.origin.y)
    }

    pub fn speed(&self) -> f32 {
        self.velocity.abs()
    }

    /// Sticky: once the horizontal travel passed `threshold` it stays moved.
    pub fn note_movement(&mut self, threshold: f32) -> bool {
        if self.delta().x.abs() > threshold {
            self.moved = true;
        }
        self.moved
    }

    pub fn has_moved(&self) -> bool {
        self.moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_zero_distance_is_rest() {
        let p = Point::new(10.0, 10.0);
        assert_eq!(apply_elastic(p, p, 100.0, 0.5), ElasticDeform::NONE);
    }

    #[test]
    fn test_elastic_is_bounded_and_monotonic() {
        let origin = Point::ZERO;
        let mut last = ElasticDeform::NONE;
        for d in [1.0, 5.0, 20.0, 80.0, 400.0, 10_000.0] {
            let e = apply_elastic(origin, Point::new(d, 0.0), 100.0, 0.5);
            assert!(e.offset.x >= last.offset.x);
            assert!(e.flatten >= last.flatten);
            assert!(e.offset.x < MAX_OFFSET + 1e-6);
            assert!(e.flatten < MAX_FLATTEN + 1e-6);
            last = e;
        }
    }

    #[test]
    fn test_elastic_follows_direction() {
        let e = apply_elastic(Point::ZERO, Point::new(0.0, -30.0), 100.0, 0.3);
        assert_eq!(e.direction, Point::new(0.0, -1.0));
        assert!(e.offset.y < 0.0);
        assert_eq!(e.offset.x, 0.0);
    }

    #[test]
    fn test_damped_flatten_checkpoints() {
        let easing = damped_flatten_easing();
        let peak = 0.6;
        let out = |t: f32| peak * (1.0 - easing.evaluate(t));

        assert!(approx_eq(out(0.0), peak));
        assert!(approx_eq(out(0.35), 0.0));
        assert!(approx_eq(out(0.5), -0.2 * peak));
        assert!(approx_eq(out(0.62), 0.0));
        assert!(approx_eq(out(0.72), 0.04 * peak));
        assert!(approx_eq(out(1.0), 0.0));
    }

    #[test]
    fn test_snap_back_front_loaded() {
        let easing = snap_back_easing();
        assert!(easing.evaluate(0.3) > 0.7);
        assert!(easing.evaluate(0.9) <= 1.0 + 1e-4);
        assert!(approx_eq(easing.evaluate(1.0), 1.0));
    }

    #[test]
    fn test_track_stretch_signed_and_bounded() {
        let right = track_stretch(20.0, 64.0, 1.0);
        let left = track_stretch(-20.0, 64.0, 1.0);
        assert!(right > 0.0);
        assert!(approx_eq(left, -right));
        assert!(track_stretch(1e6, 64.0, 1.0) <= 0.85 * 1.2 + 1e-6);
        assert_eq!(track_stretch(20.0, 64.0, 0.0), 0.0);
    }

    #[test]
    fn test_knob_jelly_moving_and_sudden_stop() {
        let config = JellyConfig::default();

        let (dir, flatten) = config.knob_jelly(15.0, 30.0, 4.0, 0.0);
        assert_eq!(dir, Point::new(0.0, 1.0));
        assert!(approx_eq(flatten, 0.225));

        let (dir, flatten) = config.knob_jelly(15.0, 30.0, 0.5, 0.3);
        assert_eq!(dir, Point::new(1.0, 0.0));
        assert!(approx_eq(flatten, 0.3));

        let (_, capped) = config.knob_jelly(-15.0, 30.0, 0.5, 0.9);
        assert!(approx_eq(capped, 0.55));
    }

    #[test]
    fn test_drag_session_velocity_ema() {
        let mut drag = DragSession::new(Point::ZERO, 0.0);
        drag.update(Point::new(10.0, 0.0), 0.7);
        assert!(approx_eq(drag.velocity, 3.0));
        drag.update(Point::new(10.0, 0.0), 0.7);
        assert!(approx_eq(drag.velocity, 2.1));
        assert!(drag.note_movement(3.0));
        drag.update(Point::new(1.0, 0.0), 0.7);
        assert!(drag.note_movement(3.0));
    }
}
