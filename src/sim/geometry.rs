//! Rectangle and segment geometry
//!
//! Hit tests use axis-aligned rectangles with a top-left origin. All
//! functions are pure and return a defined zero/false result for degenerate
//! input instead of propagating NaN.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{normalize_angle, radians_from_vector, vector_from_radians};

/// Axis-aligned rectangle, `pos` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Rectangle of `size` centered on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            pos: center - size * 0.5,
            size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Shrink by `amount` on every side (never below zero size)
    pub fn inset(&self, amount: f32) -> Rect {
        let size = (self.size - Vec2::splat(amount * 2.0)).max(Vec2::ZERO);
        Rect::centered(self.center(), size)
    }

    /// Corners clockwise from top-left
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.left(), self.top()),
            Vec2::new(self.right(), self.top()),
            Vec2::new(self.right(), self.bottom()),
            Vec2::new(self.left(), self.bottom()),
        ]
    }

    /// The four edges as (start, end) segments
    pub fn edges(&self) -> [(Vec2, Vec2); 4] {
        let [tl, tr, br, bl] = self.corners();
        [(tl, tr), (tr, br), (br, bl), (bl, tl)]
    }

    /// Overlap along each axis (zero when the rects don't intersect)
    pub fn overlap(&self, other: &Rect) -> Vec2 {
        if !self.intersects(other) {
            return Vec2::ZERO;
        }
        Vec2::new(
            self.right().min(other.right()) - self.left().max(other.left()),
            self.bottom().min(other.bottom()) - self.top().max(other.top()),
        )
    }
}

/// Normalized direction from `a` to `b`, zero if the points coincide
#[inline]
pub fn direction_between(a: Vec2, b: Vec2) -> Vec2 {
    (b - a).normalize_or_zero()
}

#[inline]
pub fn rects_collide(a: &Rect, b: &Rect) -> bool {
    a.intersects(b)
}

#[inline]
pub fn point_in_rect(p: Vec2, rect: &Rect) -> bool {
    rect.contains_point(p)
}

/// 2D cross product (z component)
#[inline]
fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Parametric segment intersection test
///
/// Parallel, collinear or zero-length segments report no intersection.
pub fn segments_intersect(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    let r = a2 - a1;
    let s = b2 - b1;
    let denom = cross(r, s);
    if denom.abs() <= f32::EPSILON {
        return false;
    }

    let qp = b1 - a1;
    let t = cross(qp, s) / denom;
    let u = cross(qp, r) / denom;
    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

/// Distance from `p` to segment `a`-`b`
pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-8 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Minimum distance between two segments (0 when they cross)
pub fn segment_distance(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> f32 {
    if segments_intersect(a1, a2, b1, b2) {
        return 0.0;
    }
    point_segment_distance(a1, b1, b2)
        .min(point_segment_distance(a2, b1, b2))
        .min(point_segment_distance(b1, a1, a2))
        .min(point_segment_distance(b2, a1, a2))
}

/// 0 if the rects intersect, otherwise the closest edge-to-edge distance
pub fn distance_between_rects(a: &Rect, b: &Rect) -> f32 {
    if a.intersects(b) {
        return 0.0;
    }
    let mut best = f32::MAX;
    for (a1, a2) in a.edges() {
        for (b1, b2) in b.edges() {
            best = best.min(segment_distance(a1, a2, b1, b2));
        }
    }
    best
}

/// Does a melee arc reach the rectangle?
///
/// The arc starts at `origin`, faces `facing` (radians, up/clockwise
/// convention) and spans `half_arc` to either side, out to `range`. The
/// direction toward the rect center is clamped into the arc and the
/// resulting ray is tested against every rect edge.
pub fn rectangle_intersects_arc(
    rect: &Rect,
    origin: Vec2,
    facing: f32,
    half_arc: f32,
    range: f32,
) -> bool {
    if range <= 0.0 {
        return false;
    }

    let to_target = rect.center() - origin;
    let angle = if to_target.length_squared() < 1e-8 {
        facing
    } else {
        let offset = normalize_angle(radians_from_vector(to_target) - facing);
        facing + offset.clamp(-half_arc.abs(), half_arc.abs())
    };

    let ray_end = origin + vector_from_radians(angle) * range;
    if rect.contains_point(origin) || rect.contains_point(ray_end) {
        return true;
    }

    rect.edges()
        .iter()
        .any(|&(e1, e2)| segments_intersect(origin, ray_end, e1, e2))
}
