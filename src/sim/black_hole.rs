//! Gravity well that eats units
//!
//! Pulls every unit and ice fragment toward its center. Units that cross
//! the event horizon start being eaten until the hole has swallowed
//! `capacity` worth of mass; fragments are always marked eaten so they melt
//! fast. Gravity and the swirl visuals grow with how full it is.

use glam::Vec2;
use rand::Rng;

use super::draw::DrawSink;
use super::gravity::Gravity;
use super::particle::ParticleEffect;
use super::unit::{LifeState, PhysicalUnit};
use crate::data::{BlackHoleTemplate, Registry};
use crate::error::SimResult;

#[derive(Debug, Clone)]
pub struct BlackHole {
    gravity: Gravity,
    base_gravity: f32,
    capacity: f32,
    used_capacity: f32,
    radius: f32,
    growth: f32,
    swirl: Option<ParticleEffect>,
    core: Option<ParticleEffect>,
}

impl BlackHole {
    pub fn new(
        template: &BlackHoleTemplate,
        position: Vec2,
        swirl: Option<ParticleEffect>,
        core: Option<ParticleEffect>,
    ) -> Self {
        Self {
            gravity: Gravity::new(position, template.gravity),
            base_gravity: template.gravity,
            capacity: template.capacity,
            used_capacity: 0.0,
            radius: template.radius,
            growth: template.growth,
            swirl,
            core,
        }
    }

    pub fn from_registry(registry: &Registry, name: &str, position: Vec2) -> SimResult<Self> {
        let template = registry.black_hole(name)?;
        let effect = |name: &Option<String>| -> SimResult<Option<ParticleEffect>> {
            name.as_deref()
                .map(|n| registry.particle_effect(n).map(ParticleEffect::new))
                .transpose()
        };
        Ok(Self::new(
            template,
            position,
            effect(&template.swirl_effect)?,
            effect(&template.core_effect)?,
        ))
    }

    pub fn position(&self) -> Vec2 {
        self.gravity.position
    }

    pub fn gravity(&self) -> &Gravity {
        &self.gravity
    }

    pub fn used_capacity(&self) -> f32 {
        self.used_capacity
    }

    /// used / capacity, in 0..1
    pub fn fullness(&self) -> f32 {
        (self.used_capacity / self.capacity).clamp(0.0, 1.0)
    }

    pub fn is_full(&self) -> bool {
        self.used_capacity >= self.capacity
    }

    pub fn set_particle_cap(&mut self, cap: usize) {
        for effect in [&mut self.swirl, &mut self.core].into_iter().flatten() {
            effect.set_particle_cap(cap);
        }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) {
        let fullness = self.fullness();
        self.gravity.magnitude = self.base_gravity * (1.0 + self.growth * fullness);

        let position = self.gravity.position;
        for effect in [&mut self.swirl, &mut self.core].into_iter().flatten() {
            effect.set_intensity(1.0 + fullness);
            effect.spawn(position, 0.0, dt, Vec2::ZERO, rng);
            effect.update(dt);
        }
    }

    /// Pull `unit` (or its fragments) in and eat whatever crossed the event
    /// horizon. Returns true if the unit started being eaten.
    pub fn apply_to_unit(&mut self, unit: &mut PhysicalUnit, dt: f32) -> bool {
        unit.apply_gravity(&self.gravity, 1.0, dt);

        let center = self.gravity.position;
        if unit.state() == LifeState::Shattered {
            for fragment in unit.fragments_mut() {
                if !fragment.eaten && fragment.position.distance(center) <= self.radius {
                    fragment.eaten = true;
                }
            }
            return false;
        }

        if self.is_full() || unit.center().distance(center) > self.radius {
            return false;
        }
        if !unit.begin_being_eaten() {
            return false;
        }

        self.used_capacity += unit.total_mass();
        log::debug!(
            "Black hole ate {} ({:.1}/{:.1})",
            unit.name(),
            self.used_capacity,
            self.capacity
        );
        if self.is_full() {
            log::info!("Black hole reached capacity");
        }
        true
    }

    pub fn draw(&self, sink: &mut dyn DrawSink) {
        for effect in [&self.swirl, &self.core].into_iter().flatten() {
            effect.draw(sink);
        }
    }
}
