//! Frostfall - simulation core for a 2D arena action game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (units, weapons, particles, waves)
//! - `data`: Typed template registry (units, weapons, effects, waves, levels)
//! - `settings`: Runtime settings (quality preset, bullet-time factor)
//! - `error`: Loading and lookup errors

pub mod data;
pub mod error;
pub mod settings;
pub mod sim;

pub use data::Registry;
pub use error::{SimError, SimResult};
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Upper bound of every status channel (fire, cryo, shock)
    pub const STATUS_MAX: f32 = 100.0;

    /// Ice integrity granted on freezing, as a fraction of max health
    pub const FREEZE_INTEGRITY_RATIO: f32 = 0.5;
    /// Cryo left behind after a thaw (stops freeze/thaw flicker)
    pub const THAW_RESIDUAL_CRYO: f32 = STATUS_MAX * 0.5;

    /// Ice fragments per side when a frozen unit shatters (N x N grid)
    pub const ICE_FRAGMENT_GRID: usize = 3;
    /// Share of the unit's velocity each fragment inherits
    pub const FRAGMENT_INHERIT_VELOCITY: f32 = 0.6;
    /// Random scatter speed added to each fragment
    pub const FRAGMENT_SCATTER_SPEED: f32 = 80.0;
    /// Max fragment spin (radians/sec)
    pub const FRAGMENT_MAX_SPIN: f32 = 6.0;
    /// Fragment health per point of cryo at the moment of shattering
    pub const FRAGMENT_HEALTH_PER_CRYO: f32 = 0.1;
    /// Fragment melt rate (health/sec)
    pub const FRAGMENT_MELT_RATE: f32 = 2.0;
    /// Fragment melt rate while being eaten by a gravity well (health/sec)
    pub const FRAGMENT_EATEN_MELT_RATE: f32 = 12.0;
    /// Fragment velocity decay (per second, exponential)
    pub const FRAGMENT_DECELERATION: f32 = 1.5;

    /// Scale lost per second while being eaten
    pub const EATEN_SHRINK_RATE: f32 = 1.5;
    /// Seconds the damage flash stays visible
    pub const DAMAGE_FLASH_DURATION: f32 = 0.12;

    /// Burn damage per second per point of fire
    pub const FIRE_DAMAGE_PER_POINT: f32 = 0.05;
    /// Fraction of max speed lost at full cryo
    pub const CRYO_SLOW_FACTOR: f32 = 0.5;
    /// Fraction of move force lost at full shock
    pub const SHOCK_WEAKEN_FACTOR: f32 = 0.5;

    /// Units closer than this (rect to rect) exchange fire
    pub const FIRE_SPREAD_DISTANCE: f32 = 24.0;
    /// Fire gained by the neighbour, per second, per point of source fire
    pub const FIRE_SPREAD_FACTOR: f32 = 0.8;
    /// Fire lost by the source, per second, per point of source fire
    pub const FIRE_SPREAD_LOSS: f32 = 0.3;

    /// Inset of the playable area where the restoring force starts
    pub const BOUNDS_BUFFER: f32 = 16.0;
    /// Restoring acceleration per pixel of penetration (pixels/s² per px)
    pub const BOUNDS_FORCE: f32 = 60.0;

    /// Jitter around a burst wave's spawn point
    pub const BURST_SPAWN_JITTER: f32 = 6.0;
    /// Margin kept between spawn points and the level edge
    pub const SPAWN_MARGIN: f32 = 48.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    if !angle.is_finite() {
        return 0.0;
    }
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Angle of a vector, 0 = up (-y), clockwise positive
#[inline]
pub fn radians_from_vector(v: Vec2) -> f32 {
    v.x.atan2(-v.y)
}

/// Same as [`radians_from_vector`], in degrees
#[inline]
pub fn degrees_from_vector(v: Vec2) -> f32 {
    radians_from_vector(v).to_degrees()
}

/// Unit vector for an angle in the up/clockwise convention
#[inline]
pub fn vector_from_radians(angle: f32) -> Vec2 {
    Vec2::new(angle.sin(), -angle.cos())
}
