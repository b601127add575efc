//! Weapons
//!
//! Every weapon shares a [`WeaponCore`] (cooldown, trigger intent) and one
//! behavior variant. The owner is lent in on each call rather than stored.
//!
//! Firing is one-shot per trigger: `trigger` raises the firing flag,
//! `update` lets the variant act on it, then clears it.

mod hookshot;
mod melee;
mod projectile_weapon;
mod throwable;

pub use hookshot::{HookShot, HookState};
pub use melee::MeleeWeapon;
pub use projectile_weapon::ProjectileWeapon;
pub use throwable::ThrowableWeapon;

use glam::Vec2;
use rand::Rng;

use super::draw::DrawSink;
use super::geometry::direction_between;
use super::unit::PhysicalUnit;
use crate::data::{Registry, WeaponTemplate};
use crate::error::SimResult;

/// State shared by all weapon variants
#[derive(Debug, Clone)]
pub struct WeaponCore {
    name: String,
    texture: String,
    fire_delay: f32,
    cooldown: f32,
    firing: bool,
    fire_position: Vec2,
    target: Vec2,
    direction: Vec2,
}

impl WeaponCore {
    pub fn new(name: &str, texture: &str, fire_delay: f32) -> Self {
        let texture = if texture.is_empty() { name } else { texture };
        Self {
            name: name.to_string(),
            texture: texture.to_string(),
            fire_delay,
            cooldown: 0.0,
            firing: false,
            fire_position: Vec2::ZERO,
            target: Vec2::ZERO,
            direction: Vec2::ZERO,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn texture(&self) -> &str {
        &self.texture
    }

    pub fn fire_delay(&self) -> f32 {
        self.fire_delay
    }

    /// Seconds until the weapon can fire again
    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown <= 0.0
    }

    /// Set only between `trigger` and the end of the next `update`
    pub fn is_firing(&self) -> bool {
        self.firing
    }

    pub fn fire_position(&self) -> Vec2 {
        self.fire_position
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    /// Normalized aim, zero if the target sits on the fire position
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Record a firing intent unless still cooling down
    pub fn trigger(&mut self, fire_position: Vec2, target: Vec2) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.firing = true;
        self.fire_position = fire_position;
        self.target = target;
        self.direction = direction_between(fire_position, target);
        self.cooldown = self.fire_delay;
        true
    }

    fn tick_cooldown(&mut self, dt: f32) {
        self.cooldown = (self.cooldown - dt).max(0.0);
    }
}

#[derive(Debug, Clone)]
pub enum WeaponKind {
    Projectile(ProjectileWeapon),
    Melee(MeleeWeapon),
    HookShot(HookShot),
    Throwable(ThrowableWeapon),
}

#[derive(Debug, Clone)]
pub struct Weapon {
    pub core: WeaponCore,
    pub kind: WeaponKind,
}

impl Weapon {
    /// Build the named weapon, resolving its effect templates
    pub fn from_registry(registry: &Registry, name: &str) -> SimResult<Self> {
        let weapon = match registry.weapon(name)? {
            WeaponTemplate::Projectile(t) => Weapon {
                core: WeaponCore::new(name, &t.texture, t.fire_delay),
                kind: WeaponKind::Projectile(ProjectileWeapon::from_registry(registry, t)?),
            },
            WeaponTemplate::Melee(t) => Weapon {
                core: WeaponCore::new(name, &t.texture, t.fire_delay),
                kind: WeaponKind::Melee(MeleeWeapon::new(t)),
            },
            WeaponTemplate::HookShot(t) => Weapon {
                core: WeaponCore::new(name, &t.texture, t.fire_delay),
                kind: WeaponKind::HookShot(HookShot::new(t)),
            },
            WeaponTemplate::Throwable(t) => Weapon {
                core: WeaponCore::new(name, &t.weapon.texture, t.weapon.fire_delay),
                kind: WeaponKind::Throwable(ThrowableWeapon::from_registry(registry, t)?),
            },
        };
        log::debug!("Built weapon '{}'", name);
        Ok(weapon)
    }

    pub fn name(&self) -> &str {
        self.core.name()
    }

    /// Try to fire from `fire_position` toward `target`
    ///
    /// A hook already out is released instead, regardless of cooldown.
    /// Throwables refuse once out of ammo and spend one on success.
    pub fn trigger(&mut self, fire_position: Vec2, target: Vec2) -> bool {
        match &mut self.kind {
            WeaponKind::HookShot(hook) => match hook.state() {
                HookState::Fired | HookState::Attached(_) => {
                    hook.release();
                    return true;
                }
                HookState::Retracting => return false,
                HookState::Idle => {}
            },
            WeaponKind::Throwable(throwable) if throwable.ammo() == 0 => return false,
            _ => {}
        }

        if !self.core.trigger(fire_position, target) {
            return false;
        }
        if let WeaponKind::Throwable(throwable) = &mut self.kind {
            throwable.spend();
        }
        true
    }

    pub fn update<R: Rng + ?Sized>(&mut self, owner: &mut PhysicalUnit, dt: f32, rng: &mut R) {
        self.core.tick_cooldown(dt);
        match &mut self.kind {
            WeaponKind::Projectile(w) => w.update(&self.core, owner, dt, rng),
            WeaponKind::Melee(w) => w.update(&self.core, owner, dt),
            WeaponKind::HookShot(w) => w.update(&self.core, owner, dt),
            WeaponKind::Throwable(w) => w.update(&self.core, owner, dt, rng),
        }
        self.core.firing = false;
    }

    /// Resolve this weapon's hits against one unit
    pub fn check_collision<R: Rng + ?Sized>(
        &mut self,
        unit: &mut PhysicalUnit,
        dt: f32,
        rng: &mut R,
    ) -> bool {
        match &mut self.kind {
            WeaponKind::Projectile(w) => w.check_collision(unit, dt, rng),
            WeaponKind::Melee(w) => w.check_collision(unit, rng),
            WeaponKind::HookShot(w) => w.check_collision(unit, dt),
            WeaponKind::Throwable(w) => w.check_collision(unit, dt, rng),
        }
    }

    /// How far away a target can be and still get hit (used by enemy AI)
    pub fn reach(&self) -> f32 {
        match &self.kind {
            WeaponKind::Projectile(w) => w.reach(),
            WeaponKind::Melee(w) => w.reach(),
            WeaponKind::HookShot(w) => w.reach(),
            WeaponKind::Throwable(w) => w.reach(),
        }
    }

    pub fn draw(&self, sink: &mut dyn DrawSink) {
        let texture = self.core.texture();
        match &self.kind {
            WeaponKind::Projectile(w) => w.draw(texture, sink),
            WeaponKind::Melee(w) => w.draw(texture, sink),
            WeaponKind::HookShot(w) => w.draw(texture, sink),
            WeaponKind::Throwable(w) => w.draw(texture, sink),
        }
    }
}
