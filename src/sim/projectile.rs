//! Pooled projectiles and their area effects
//!
//! A projectile lives in its weapon's pool and cycles
//!
//! ```text
//! Dormant -> Moving -> JustHit -> ApplyContactEffect -> Dormant
//!                   \-> ReachedDestination ----------/
//! ```
//!
//! Effect states count down on their own in `update`, so they expire even
//! when no unit is near.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::draw::{DrawSink, Quad};
use super::geometry::{Rect, direction_between, distance_between_rects};
use super::status::StatusEffect;
use super::unit::{PhysicalUnit, UnitId};
use crate::radians_from_vector;

/// Area effect applied over `duration` seconds to units within `radius`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileEffect {
    pub radius: f32,
    /// Zero applies the whole effect in one tick
    pub duration: f32,
    pub damage: f32,
    /// Impulse pushing units away from the source
    pub force: f32,
    pub status: StatusEffect,
}

impl ProjectileEffect {
    /// Share of the effect delivered in a tick of `dt`
    pub fn fraction(&self, dt: f32) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (dt / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Apply this tick's share to `unit` if it is within reach of `source`
    pub fn apply<R: Rng + ?Sized>(
        &self,
        source: &Rect,
        unit: &mut PhysicalUnit,
        dt: f32,
        rng: &mut R,
    ) -> bool {
        if !unit.is_collidable() {
            return false;
        }
        let target = unit.hit_rect();
        if distance_between_rects(source, &target) > self.radius {
            return false;
        }

        let fraction = self.fraction(dt);
        if self.force != 0.0 {
            let push = direction_between(source.center(), target.center());
            unit.apply_impulse(push * self.force * fraction);
        }
        if !self.status.is_zero() {
            unit.apply_status(self.status * fraction);
        }
        if self.damage > 0.0 {
            unit.apply_damage(self.damage * fraction, rng);
        }
        true
    }
}

/// The three effects a weapon lends to its projectiles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectSet {
    /// Applied every tick while moving
    pub proximity: Option<ProjectileEffect>,
    /// Applied after the last penetrating hit
    pub contact: Option<ProjectileEffect>,
    /// Applied where the projectile lands or expires
    pub destination: Option<ProjectileEffect>,
}

impl EffectSet {
    /// Longest effect duration, for pool sizing
    pub fn longest_duration(&self) -> f32 {
        [&self.proximity, &self.contact, &self.destination]
            .into_iter()
            .flatten()
            .map(|e| e.duration)
            .fold(0.0, f32::max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectileState {
    #[default]
    Dormant,
    Moving,
    JustHit,
    ApplyContactEffect,
    ReachedDestination,
}

/// Launch parameters for a pooled projectile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileLaunch {
    /// Center
    pub position: Vec2,
    pub velocity: Vec2,
    pub lifetime: f32,
    /// -1 for infinite
    pub penetration: i32,
    pub mass: f32,
    pub size: Vec2,
    /// Stop here instead of flying on
    pub destination: Option<Vec2>,
}

#[derive(Debug, Clone, Default)]
pub struct Projectile {
    state: ProjectileState,
    /// Center
    pub position: Vec2,
    pub velocity: Vec2,
    life: f32,
    penetration: i32,
    mass: f32,
    size: Vec2,
    angle: f32,
    destination: Option<Vec2>,
    effect_timer: f32,
    /// Units already hit this flight
    struck: Vec<UnitId>,
}

impl Projectile {
    pub fn state(&self) -> ProjectileState {
        self.state
    }

    pub fn is_dormant(&self) -> bool {
        self.state == ProjectileState::Dormant
    }

    pub fn penetration(&self) -> i32 {
        self.penetration
    }

    pub fn life(&self) -> f32 {
        self.life
    }

    pub fn rect(&self) -> Rect {
        Rect::centered(self.position, self.size)
    }

    /// Reset every field and start moving
    pub fn initialize(&mut self, launch: ProjectileLaunch) {
        let mut struck = std::mem::take(&mut self.struck);
        struck.clear();
        *self = Self {
            state: ProjectileState::Moving,
            position: launch.position,
            velocity: launch.velocity,
            life: launch.lifetime,
            penetration: launch.penetration,
            mass: launch.mass,
            size: launch.size,
            angle: radians_from_vector(launch.velocity),
            destination: launch.destination,
            effect_timer: 0.0,
            struck,
        };
    }

    pub fn deactivate(&mut self) {
        self.state = ProjectileState::Dormant;
        self.velocity = Vec2::ZERO;
    }

    pub fn update(&mut self, dt: f32, effects: &EffectSet) {
        match self.state {
            ProjectileState::Dormant => {}
            ProjectileState::Moving => {
                let before = self.position;
                self.position += self.velocity * dt;
                self.life -= dt;

                if let Some(target) = self.destination {
                    // Passed the target this tick
                    if (target - self.position).dot(target - before) <= 0.0 {
                        self.position = target;
                        self.land(effects);
                        return;
                    }
                }
                if self.life <= 0.0 {
                    self.land(effects);
                }
            }
            ProjectileState::JustHit => self.resolve_hit(effects),
            ProjectileState::ApplyContactEffect | ProjectileState::ReachedDestination => {
                self.effect_timer -= dt;
                if self.effect_timer <= 0.0 {
                    self.deactivate();
                }
            }
        }
    }

    fn land(&mut self, effects: &EffectSet) {
        self.velocity = Vec2::ZERO;
        match &effects.destination {
            Some(effect) => {
                self.state = ProjectileState::ReachedDestination;
                self.effect_timer = effect.duration;
            }
            None => self.deactivate(),
        }
    }

    fn resolve_hit(&mut self, effects: &EffectSet) {
        match &effects.contact {
            Some(effect) => {
                self.state = ProjectileState::ApplyContactEffect;
                self.effect_timer = effect.duration;
            }
            None => self.deactivate(),
        }
    }

    /// Test one unit against this projectile and apply whatever the current
    /// state calls for. Returns true if the unit was affected.
    pub fn check_and_apply_collision<R: Rng + ?Sized>(
        &mut self,
        unit: &mut PhysicalUnit,
        effects: &EffectSet,
        dt: f32,
        rng: &mut R,
    ) -> bool {
        if !unit.is_collidable() {
            return false;
        }

        if self.state == ProjectileState::JustHit {
            self.resolve_hit(effects);
        }

        let rect = self.rect();
        match self.state {
            ProjectileState::Dormant | ProjectileState::JustHit => false,
            ProjectileState::Moving => {
                let mut affected = effects
                    .proximity
                    .as_ref()
                    .is_some_and(|e| e.apply(&rect, unit, dt, rng));

                if rect.intersects(&unit.hit_rect()) && !self.struck.contains(&unit.id()) {
                    self.struck.push(unit.id());
                    unit.apply_impulse(self.velocity * self.mass);
                    if self.penetration > 0 {
                        self.penetration -= 1;
                        if self.penetration == 0 {
                            self.state = ProjectileState::JustHit;
                            self.velocity = Vec2::ZERO;
                        }
                    }
                    affected = true;
                }
                affected
            }
            ProjectileState::ApplyContactEffect => effects
                .contact
                .as_ref()
                .is_some_and(|e| e.apply(&rect, unit, dt, rng)),
            ProjectileState::ReachedDestination => effects
                .destination
                .as_ref()
                .is_some_and(|e| e.apply(&rect, unit, dt, rng)),
        }
    }

    pub fn draw(&self, texture: &str, sink: &mut dyn DrawSink) {
        if self.state == ProjectileState::Moving {
            sink.draw_quad(Quad {
                rotation: self.angle,
                ..Quad::new(texture, self.position)
            });
        }
    }
}
