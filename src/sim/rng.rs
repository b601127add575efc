//! Random helpers over an injectable generator
//!
//! The simulation never reaches for a global RNG. Everything takes
//! `&mut R where R: Rng + ?Sized`; the level owns a seeded [`SimRng`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::geometry::Rect;
use crate::vector_from_radians;

/// Generator used by the simulation
pub type SimRng = Pcg32;

/// Seeded generator (same seed, same run)
pub fn seeded(seed: u64) -> SimRng {
    Pcg32::seed_from_u64(seed)
}

/// Uniform float in [min, max); returns `min` for an empty range
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}

/// Uniform integer in [min, max); returns `min` for an empty range
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, min: i32, max: i32) -> i32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}

/// `v` with each component nudged by up to ±`variance`
pub fn randomize_vector<R: Rng + ?Sized>(rng: &mut R, v: Vec2, variance: f32) -> Vec2 {
    let variance = variance.abs();
    Vec2::new(
        v.x + random_range(rng, -variance, variance),
        v.y + random_range(rng, -variance, variance),
    )
}

/// Uniformly distributed direction
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    vector_from_radians(random_range(rng, -std::f32::consts::PI, std::f32::consts::PI))
}

pub fn random_point_in_rect<R: Rng + ?Sized>(rng: &mut R, rect: &Rect) -> Vec2 {
    Vec2::new(
        random_range(rng, rect.left(), rect.right()),
        random_range(rng, rect.top(), rect.bottom()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_repeatable() {
        let mut a = seeded(7);
        let mut b = seeded(7);
        for _ in 0..32 {
            assert_eq!(random_range(&mut a, 0.0, 1.0), random_range(&mut b, 0.0, 1.0));
        }
    }

    #[test]
    fn test_empty_ranges_return_min() {
        let mut rng = seeded(1);
        assert_eq!(random_range(&mut rng, 5.0, 5.0), 5.0);
        assert_eq!(random_range(&mut rng, 5.0, 1.0), 5.0);
        assert_eq!(random_int(&mut rng, 3, 3), 3);
    }

    #[test]
    fn test_point_in_rect_stays_inside() {
        let mut rng = seeded(99);
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        for _ in 0..100 {
            assert!(rect.contains_point(random_point_in_rect(&mut rng, &rect)));
        }
        let v = randomize_vector(&mut rng, Vec2::new(100.0, 100.0), 5.0);
        assert!((v.x - 100.0).abs() <= 5.0 && (v.y - 100.0).abs() <= 5.0);
    }

    #[test]
    fn test_dyn_rng_is_accepted() {
        let mut rng = seeded(3);
        let dynamic: &mut dyn rand::RngCore = &mut rng;
        let d = random_unit_vector(dynamic);
        assert!((d.length() - 1.0).abs() < 1e-5);
    }
}
