use crate::widgets::Point;

/// Threshold below which a flatten amount is treated as no deformation.
const FLATTEN_EPSILON: f32 = 0.001;
/// How much a full flatten squeezes across the motion axis.
const FLATTEN_PERPENDICULAR: f32 = 0.18;
/// How much a full flatten stretches along the motion axis.
const FLATTEN_PARALLEL: f32 = 0.07;

/// A 2D affine transformation stored as the top two rows of a 3x3 matrix.
///
/// `x' = a·x + b·y + tx`, `y' = c·x + d·y + ty`, kept in row-major order as
/// `[a, b, tx, c, d, ty]`. The same matrix is used to paint an overlay and to
/// map pointer positions back into it, so the two never drift apart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub data: [f32; 6],
}

impl Transform {
    /// Identity matrix (no transformation)
    pub const IDENTITY: Self = Self {
        data: [
            1.0, 0.0, 0.0, // row 0
            0.0, 1.0, 0.0, // row 1
        ],
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// Create a translation transform
    pub fn translate(x: f32, y: f32) -> Self {
        Self {
            data: [1.0, 0.0, x, 0.0, 1.0, y],
        }
    }

    /// Create a rotation transform (positive angles turn clockwise on screen)
    pub fn rotate(angle_radians: f32) -> Self {
        let cos = angle_radians.cos();
        let sin = angle_radians.sin();
        Self {
            data: [cos, -sin, 0.0, sin, cos, 0.0],
        }
    }

    pub fn rotate_degrees(angle_degrees: f32) -> Self {
        Self::rotate(angle_degrees.to_radians())
    }

    /// Create a uniform scale transform
    pub fn scale(s: f32) -> Self {
        Self::scale_xy(s, s)
    }

    pub fn scale_xy(sx: f32, sy: f32) -> Self {
        Self {
            data: [sx, 0.0, 0.0, 0.0, sy, 0.0],
        }
    }

    /// Compose this transform with another: `self * other`.
    /// Applies `other` first, then `self`.
    pub fn then(&self, other: &Transform) -> Transform {
        let [a1, b1, tx1, c1, d1, ty1] = self.data;
        let [a2, b2, tx2, c2, d2, ty2] = other.data;
        Transform {
            data: [
                a1 * a2 + b1 * c2,
                a1 * b2 + b1 * d2,
                a1 * tx2 + b1 * ty2 + tx1,
                c1 * a2 + d1 * c2,
                c1 * b2 + d1 * d2,
                c1 * tx2 + d1 * ty2 + ty1,
            ],
        }
    }

    /// The same linear part applied around `pivot` instead of the origin.
    pub fn pivoted(&self, pivot: Point) -> Transform {
        Transform::translate(pivot.x, pivot.y)
            .then(self)
            .then(&Transform::translate(-pivot.x, -pivot.y))
    }

    /// Scale about `pivot`, then rotate about it: `T(p)·S·R·T(-p)`.
    pub fn scale_rotate_about(pivot: Point, scale: f32, rotate_degrees: f32) -> Transform {
        Transform::scale(scale)
            .then(&Transform::rotate_degrees(rotate_degrees))
            .pivoted(pivot)
    }

    /// Direction-aware squash about `pivot`.
    ///
    /// Stretches along the unit vector `direction` by `1 + amount·0.07` and
    /// squeezes across it by `1 - amount·0.18`. Negative amounts invert the
    /// effect. Near-zero amounts or a zero direction yield the identity.
    pub fn flatten(direction: Point, amount: f32, pivot: Point) -> Transform {
        if amount.abs() <= FLATTEN_EPSILON || (direction.x == 0.0 && direction.y == 0.0) {
            return Self::IDENTITY;
        }
        let (vx, vy) = (direction.x, direction.y);
        let perp = 1.0 - amount * FLATTEN_PERPENDICULAR;
        let para = 1.0 + amount * FLATTEN_PARALLEL;

        let m11 = para * vx * vx + perp * vy * vy;
        let m12 = (para - perp) * vx * vy;
        let m22 = para * vy * vy + perp * vx * vx;
        Transform {
            data: [m11, m12, 0.0, m12, m22, 0.0],
        }
        .pivoted(pivot)
    }

    /// Compute the inverse of this transform, or `None` when it collapses
    /// the plane (for example a zero scale).
    pub fn inverse(&self) -> Option<Transform> {
        let [a, b, tx, c, d, ty] = self.data;
        let det = a * d - b * c;

        if det.abs() < 1e-10 {
            return None;
        }

        let inv_det = 1.0 / det;
        Some(Transform {
            data: [
                d * inv_det,
                -b * inv_det,
                (-d * tx + b * ty) * inv_det,
                -c * inv_det,
                a * inv_det,
                (c * tx - a * ty) * inv_det,
            ],
        })
    }

    /// Transform a 2D point by this matrix
    pub fn transform_point(&self, p: Point) -> Point {
        let [a, b, tx, c, d, ty] = self.data;
        Point::new(a * p.x + b * p.y + tx, c * p.x + d * p.y + ty)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn approx_pt(p: Point, x: f32, y: f32) -> bool {
        approx_eq(p.x, x) && approx_eq(p.y, y)
    }

    #[test]
    fn test_identity() {
        let t = Transform::identity();
        assert!(t.is_identity());
        assert!(approx_pt(t.transform_point(Point::new(3.0, 4.0)), 3.0, 4.0));
    }

    #[test]
    fn test_translate() {
        let t = Transform::translate(10.0, 20.0);
        assert!(approx_pt(t.transform_point(Point::new(5.0, 5.0)), 15.0, 25.0));
    }

    #[test]
    fn test_rotate() {
        let t = Transform::rotate_degrees(90.0);
        assert!(approx_pt(t.transform_point(Point::new(1.0, 0.0)), 0.0, 1.0));
    }

    #[test]
    fn test_compose() {
        // scale.then(translate): first translate, then scale
        let composed = Transform::scale(2.0).then(&Transform::translate(10.0, 0.0));
        assert!(approx_pt(composed.transform_point(Point::ZERO), 20.0, 0.0));
    }

    #[test]
    fn test_scale_about_pivot_keeps_pivot() {
        let pivot = Point::new(100.0, 50.0);
        let t = Transform::scale_rotate_about(pivot, 1.5, 30.0);
        assert!(approx_pt(t.transform_point(pivot), 100.0, 50.0));
        // A point 10px right of the pivot ends up 15px away
        let p = t.transform_point(Point::new(110.0, 50.0));
        assert!(approx_eq(p.distance_to(pivot), 15.0));
    }

    #[test]
    fn test_flatten_horizontal() {
        let pivot = Point::new(50.0, 50.0);
        let t = Transform::flatten(Point::new(1.0, 0.0), 1.0, pivot);
        // Along the motion: stretched by 1.07
        assert!(approx_pt(t.transform_point(Point::new(60.0, 50.0)), 60.7, 50.0));
        // Across the motion: squeezed by 0.82
        assert!(approx_pt(t.transform_point(Point::new(50.0, 60.0)), 50.0, 58.2));
        assert!(approx_pt(t.transform_point(pivot), 50.0, 50.0));
    }

    #[test]
    fn test_flatten_negative_inverts() {
        let t = Transform::flatten(Point::new(0.0, 1.0), -0.5, Point::ZERO);
        let p = t.transform_point(Point::new(10.0, 10.0));
        // Across (x) grows, along (y) shrinks
        assert!(p.x > 10.0);
        assert!(p.y < 10.0);
    }

    #[test]
    fn test_flatten_noop_cases() {
        assert!(Transform::flatten(Point::new(1.0, 0.0), 0.0005, Point::ZERO).is_identity());
        assert!(Transform::flatten(Point::ZERO, 0.5, Point::ZERO).is_identity());
    }

    #[test]
    fn test_inverse_roundtrip() {
        let t = Transform::scale_rotate_about(Point::new(20.0, 30.0), 0.5, 45.0)
            .then(&Transform::translate(3.0, -7.0));
        let inv = t.inverse().expect("invertible");
        let p = Point::new(12.0, -4.0);
        let back = inv.transform_point(t.transform_point(p));
        assert!(approx_pt(back, 12.0, -4.0));
    }

    #[test]
    fn test_inverse_degenerate() {
        assert!(Transform::scale(0.0).inverse().is_none());
    }
}
