//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed call order per tick
//! - Injected, seeded RNG only
//! - Stable iteration order (template order, then slot order)
//! - No rendering or platform dependencies; drawing goes through [`DrawSink`]

pub mod black_hole;
pub mod draw;
pub mod geometry;
pub mod gravity;
pub mod level;
pub mod particle;
pub mod projectile;
pub mod rng;
pub mod status;
pub mod tick;
pub mod unit;
pub mod wave;
pub mod weapon;

pub use black_hole::BlackHole;
pub use draw::{DrawList, DrawSink, Quad, Tint};
pub use geometry::Rect;
pub use gravity::Gravity;
pub use level::Level;
pub use particle::{ParticleEffect, ParticleGenerator};
pub use projectile::{EffectSet, Projectile, ProjectileEffect, ProjectileState};
pub use rng::SimRng;
pub use status::StatusEffect;
pub use tick::{TickInput, tick};
pub use unit::{LifeState, PhysicalUnit, UnitId, collide_units};
pub use wave::{Enemy, Wave, WavePhase, collide_waves};
pub use weapon::{Weapon, WeaponCore, WeaponKind};
