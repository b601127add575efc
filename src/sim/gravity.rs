//! Point gravity source
//!
//! Pull is constant with distance (no inverse-square falloff), so a unit's
//! acceleration toward the source depends only on direction.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::direction_between;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gravity {
    pub position: Vec2,
    /// Acceleration toward `position` (pixels/s²)
    pub magnitude: f32,
}

impl Gravity {
    pub fn new(position: Vec2, magnitude: f32) -> Self {
        Self { position, magnitude }
    }

    /// Velocity change for a body at `point` over `dt`
    #[inline]
    pub fn acceleration_at(&self, point: Vec2, multiplier: f32, dt: f32) -> Vec2 {
        direction_between(point, self.position) * self.magnitude * multiplier * dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pull_has_no_falloff() {
        let g = Gravity::new(Vec2::ZERO, 100.0);
        let near = g.acceleration_at(Vec2::new(10.0, 0.0), 1.0, 0.5);
        let far = g.acceleration_at(Vec2::new(1000.0, 0.0), 1.0, 0.5);
        assert_eq!(near, Vec2::new(-50.0, 0.0));
        assert_eq!(near, far);
    }

    #[test]
    fn test_multiplier_and_center() {
        let g = Gravity::new(Vec2::new(5.0, 5.0), 10.0);
        assert_eq!(g.acceleration_at(Vec2::new(5.0, 5.0), 1.0, 1.0), Vec2::ZERO);
        let a = g.acceleration_at(Vec2::new(5.0, 0.0), 3.0, 1.0);
        assert!((a - Vec2::new(0.0, 30.0)).length() < 1e-5);
    }
}
