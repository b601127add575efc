//! Pool-backed projectile launcher

use rand::Rng;

use super::WeaponCore;
use crate::data::{ProjectileWeaponTemplate, Registry};
use crate::error::SimResult;
use crate::sim::draw::DrawSink;
use crate::sim::projectile::{EffectSet, Projectile, ProjectileLaunch};
use crate::sim::rng::random_range;
use crate::sim::unit::PhysicalUnit;
use crate::{radians_from_vector, vector_from_radians};

#[derive(Debug, Clone)]
pub struct ProjectileWeapon {
    template: ProjectileWeaponTemplate,
    effects: EffectSet,
    pool: Vec<Projectile>,
}

/// Projectiles that can be alive at once: every volley fired while the
/// oldest one is still flying or applying its longest effect, plus one
/// extra volley so a trigger landing on the same tick a slot frees up
/// still finds room.
pub fn pool_size(template: &ProjectileWeaponTemplate, effects: &EffectSet) -> usize {
    let per_fire = template.projectiles_per_fire.max(1) as f32;
    let fire_rate = 1.0 / template.fire_delay;
    let alive = template.lifetime + effects.longest_duration();
    ((fire_rate * alive * per_fire).ceil() + per_fire) as usize
}

impl ProjectileWeapon {
    pub fn new(template: &ProjectileWeaponTemplate, effects: EffectSet) -> Self {
        let size = pool_size(template, &effects);
        Self {
            template: template.clone(),
            effects,
            pool: vec![Projectile::default(); size],
        }
    }

    /// Resolve effect names against the registry
    pub fn from_registry(registry: &Registry, template: &ProjectileWeaponTemplate) -> SimResult<Self> {
        let resolve = |name: &Option<String>| -> SimResult<_> {
            name.as_deref().map(|n| registry.effect(n).cloned()).transpose()
        };
        let effects = EffectSet {
            proximity: resolve(&template.proximity_effect)?,
            contact: resolve(&template.contact_effect)?,
            destination: resolve(&template.destination_effect)?,
        };
        Ok(Self::new(template, effects))
    }

    pub fn template(&self) -> &ProjectileWeaponTemplate {
        &self.template
    }

    pub fn effects(&self) -> &EffectSet {
        &self.effects
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.pool
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    pub fn active_count(&self) -> usize {
        self.pool.iter().filter(|p| !p.is_dormant()).count()
    }

    pub fn reach(&self) -> f32 {
        self.template.speed * self.template.lifetime
    }

    pub(super) fn update<R: Rng + ?Sized>(
        &mut self,
        core: &WeaponCore,
        owner: &mut PhysicalUnit,
        dt: f32,
        rng: &mut R,
    ) {
        for p in &mut self.pool {
            p.update(dt, &self.effects);
        }
        if core.is_firing() {
            self.fire(core, owner, rng);
        }
    }

    fn fire<R: Rng + ?Sized>(&mut self, core: &WeaponCore, owner: &mut PhysicalUnit, rng: &mut R) {
        let t = &self.template;
        let base = radians_from_vector(core.direction());
        let half_spread = t.spread.to_radians() * 0.5;
        let destination = t.stops_at_target.then(|| core.target());
        let pool_len = self.pool.len();

        for _ in 0..t.projectiles_per_fire {
            let Some(slot) = self.pool.iter_mut().find(|p| p.is_dormant()) else {
                panic!("projectile pool for '{}' exhausted ({} slots)", core.name(), pool_len);
            };
            let angle = base + random_range(rng, -half_spread, half_spread);
            let speed = random_range(rng, t.speed - t.speed_variance, t.speed + t.speed_variance);
            slot.initialize(ProjectileLaunch {
                position: core.fire_position(),
                velocity: vector_from_radians(angle) * speed,
                lifetime: t.lifetime,
                penetration: t.penetration,
                mass: t.mass,
                size: t.size,
                destination,
            });
        }

        if t.recoil > 0.0 {
            owner.apply_impulse(-core.direction() * t.recoil);
        }
    }

    pub(super) fn check_collision<R: Rng + ?Sized>(
        &mut self,
        unit: &mut PhysicalUnit,
        dt: f32,
        rng: &mut R,
    ) -> bool {
        let mut hit = false;
        for p in self.pool.iter_mut().filter(|p| !p.is_dormant()) {
            hit |= p.check_and_apply_collision(unit, &self.effects, dt, rng);
        }
        hit
    }

    pub(super) fn draw(&self, texture: &str, sink: &mut dyn DrawSink) {
        for p in &self.pool {
            p.draw(texture, sink);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::UnitTemplate;
    use crate::sim::draw::DrawList;
    use crate::sim::projectile::{ProjectileEffect, ProjectileState};
    use crate::sim::rng::seeded;
    use crate::sim::unit::UnitId;
    use crate::sim::weapon::{Weapon, WeaponKind};
    use glam::Vec2;

    fn template() -> ProjectileWeaponTemplate {
        ProjectileWeaponTemplate {
            fire_delay: 0.1,
            speed: 300.0,
            lifetime: 0.5,
            projectiles_per_fire: 3,
            spread: 30.0,
            ..Default::default()
        }
    }

    fn weapon(template: &ProjectileWeaponTemplate, effects: EffectSet) -> Weapon {
        Weapon {
            core: WeaponCore::new("blaster", "", template.fire_delay),
            kind: WeaponKind::Projectile(ProjectileWeapon::new(template, effects)),
        }
    }

    fn owner() -> PhysicalUnit {
        let mut unit = PhysicalUnit::new(UnitId(0), "penguin", &UnitTemplate::default());
        unit.respawn(Vec2::ZERO);
        unit
    }

    fn pool(weapon: &Weapon) -> &ProjectileWeapon {
        match &weapon.kind {
            WeaponKind::Projectile(p) => p,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_pool_size_formula() {
        let effects = EffectSet {
            destination: Some(ProjectileEffect {
                duration: 0.25,
                ..Default::default()
            }),
            ..Default::default()
        };
        // 10/s * 0.75s * 3 = 22.5 -> 23, plus one volley
        assert_eq!(pool_size(&template(), &effects), 26);
        assert_eq!(pool_size(&template(), &EffectSet::default()), 18);
    }

    #[test]
    fn test_volley_fires_per_fire_projectiles() {
        let mut rng = seeded(1);
        let mut owner = owner();
        let mut w = weapon(&template(), EffectSet::default());
        let origin = owner.center();
        assert!(w.trigger(origin, origin + Vec2::new(0.0, -100.0)));
        w.update(&mut owner, 1.0 / 60.0, &mut rng);
        assert_eq!(pool(&w).active_count(), 3);
        for p in pool(&w).projectiles().iter().filter(|p| !p.is_dormant()) {
            // Within ±15° of straight up
            let angle = radians_from_vector(p.velocity);
            assert!(angle.abs() <= 15f32.to_radians() + 1e-4);
            assert!((p.velocity.length() - 300.0).abs() < 1e-3);
        }

        let mut list = DrawList::new();
        w.draw(&mut list);
        assert_eq!(list.count_texture("blaster"), 3);
    }

    #[test]
    fn test_continuous_fire_never_exhausts_pool() {
        let mut rng = seeded(2);
        let mut owner = owner();
        let effects = EffectSet {
            contact: Some(ProjectileEffect {
                duration: 0.3,
                ..Default::default()
            }),
            destination: Some(ProjectileEffect {
                duration: 0.4,
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut w = weapon(&template(), effects);
        let dt = 1.0 / 60.0;
        for _ in 0..600 {
            w.trigger(owner.center(), Vec2::new(50.0, -50.0));
            w.update(&mut owner, dt, &mut rng);
        }
        assert!(pool(&w).active_count() <= pool(&w).pool_len());
    }

    #[test]
    #[should_panic(expected = "exhausted")]
    fn test_overdrawn_pool_panics() {
        let mut rng = seeded(3);
        let mut owner = owner();
        let t = template();
        let mut w = ProjectileWeapon::new(&t, EffectSet::default());
        let mut core = WeaponCore::new("blaster", "", t.fire_delay);
        // Firing faster than the pool was sized for
        for _ in 0..100 {
            core.cooldown = 0.0;
            core.trigger(Vec2::ZERO, Vec2::ONE);
            w.update(&core, &mut owner, 0.0, &mut rng);
        }
    }

    #[test]
    fn test_hits_unit_and_recoils_owner() {
        let mut rng = seeded(4);
        let mut owner = owner();
        let t = ProjectileWeaponTemplate {
            projectiles_per_fire: 1,
            recoil: 5.0,
            ..template()
        };
        let mut w = weapon(&t, EffectSet::default());
        let mut target = PhysicalUnit::new(UnitId(1), "seal", &UnitTemplate::default());
        target.respawn(Vec2::new(0.0, -60.0));

        w.trigger(owner.center(), target.center());
        w.update(&mut owner, 1.0 / 60.0, &mut rng);
        assert!(owner.velocity.y > 0.0);

        let mut hit = false;
        for _ in 0..30 {
            w.update(&mut owner, 1.0 / 60.0, &mut rng);
            hit |= w.check_collision(&mut target, 1.0 / 60.0, &mut rng);
        }
        assert!(hit);
        assert!(target.velocity.y < 0.0);
        let states: Vec<_> = pool(&w).projectiles().iter().map(|p| p.state()).collect();
        assert!(states.iter().all(|s| *s == ProjectileState::Dormant));
    }
}
