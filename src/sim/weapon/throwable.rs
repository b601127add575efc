//! Projectile weapon with limited ammo

use rand::Rng;

use super::WeaponCore;
use super::projectile_weapon::ProjectileWeapon;
use crate::data::{Registry, ThrowableWeaponTemplate};
use crate::error::SimResult;
use crate::sim::draw::DrawSink;
use crate::sim::unit::PhysicalUnit;

#[derive(Debug, Clone)]
pub struct ThrowableWeapon {
    launcher: ProjectileWeapon,
    ammo: u32,
}

impl ThrowableWeapon {
    pub fn new(launcher: ProjectileWeapon, ammo: u32) -> Self {
        Self { launcher, ammo }
    }

    pub fn from_registry(registry: &Registry, template: &ThrowableWeaponTemplate) -> SimResult<Self> {
        Ok(Self::new(
            ProjectileWeapon::from_registry(registry, &template.weapon)?,
            template.ammo,
        ))
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn reach(&self) -> f32 {
        self.launcher.reach()
    }

    pub(super) fn spend(&mut self) {
        self.ammo = self.ammo.saturating_sub(1);
    }

    pub(super) fn update<R: Rng + ?Sized>(
        &mut self,
        core: &WeaponCore,
        owner: &mut PhysicalUnit,
        dt: f32,
        rng: &mut R,
    ) {
        self.launcher.update(core, owner, dt, rng);
    }

    pub(super) fn check_collision<R: Rng + ?Sized>(
        &mut self,
        unit: &mut PhysicalUnit,
        dt: f32,
        rng: &mut R,
    ) -> bool {
        self.launcher.check_collision(unit, dt, rng)
    }

    pub(super) fn draw(&self, texture: &str, sink: &mut dyn DrawSink) {
        self.launcher.draw(texture, sink);
    }
}
