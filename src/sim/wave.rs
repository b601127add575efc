//! Enemy waves
//!
//! A wave owns a fixed pool of enemies and decides when slots come into
//! play:
//!
//! - **Trickle**: after `start_time`, every `interval` seconds the next slot
//!   in round-robin order (`spawned_so_far % count`) is respawned if it is
//!   free, then the shared spawn point moves. Never finishes.
//! - **Burst**: after `start_time` a portal charges up for
//!   `activation_delay` seconds, every enemy spawns at once, and the wave
//!   finishes when none of them is updating any more.

use glam::Vec2;
use rand::Rng;

use super::draw::DrawSink;
use super::geometry::Rect;
use super::particle::ParticleEffect;
use super::rng::{random_point_in_rect, random_range, random_unit_vector};
use super::unit::{PhysicalUnit, UnitId, collide_units};
use super::weapon::Weapon;
use crate::consts::{BURST_SPAWN_JITTER, SPAWN_MARGIN};
use crate::data::{Registry, WaveMode, WaveTemplate};
use crate::error::SimResult;

/// Enemy unit plus its optional weapon
#[derive(Debug, Clone)]
pub struct Enemy {
    pub unit: PhysicalUnit,
    pub weapon: Option<Weapon>,
}

impl Enemy {
    pub fn from_registry(registry: &Registry, name: &str, id: UnitId) -> SimResult<Self> {
        let template = registry.enemy(name)?;
        let unit = PhysicalUnit::new(id, &template.unit, registry.unit(&template.unit)?);
        let weapon = template
            .weapon
            .as_deref()
            .map(|w| Weapon::from_registry(registry, w))
            .transpose()?;
        Ok(Self { unit, weapon })
    }

    /// Chase AI: walk toward the target, face it, swing or shoot once in reach
    fn think(&mut self, target: Vec2) {
        let center = self.unit.center();
        self.unit.set_move_direction(target - center);
        self.unit.look_at(target);
        if let Some(weapon) = &mut self.weapon {
            if center.distance(target) <= weapon.reach() {
                weapon.trigger(center, target);
            }
        }
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        target: Option<Vec2>,
        dt: f32,
        bounds: &Rect,
        rng: &mut R,
    ) {
        if let Some(target) = target {
            if self.unit.state().takes_commands() {
                self.think(target);
            }
        }
        self.unit.update(dt, bounds);
        if let Some(weapon) = &mut self.weapon {
            weapon.update(&mut self.unit, dt, rng);
        }
    }

    pub fn draw(&self, sink: &mut dyn DrawSink) {
        self.unit.draw(sink);
        if let Some(weapon) = &self.weapon {
            weapon.draw(sink);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavePhase {
    /// Before `start_time`
    Waiting,
    /// Burst portal charging
    Charging,
    Running,
    /// Burst wave whose enemies are all gone
    Finished,
}

#[derive(Debug, Clone)]
pub struct Wave {
    name: String,
    template: WaveTemplate,
    enemies: Vec<Enemy>,
    portal: Option<ParticleEffect>,
    phase: WavePhase,
    elapsed: f32,
    charge: f32,
    spawn_timer: f32,
    spawn_point: Vec2,
    spawned_so_far: usize,
}

impl Wave {
    /// Build the named wave; `next_id` hands out one id per enemy slot
    pub fn from_registry(
        registry: &Registry,
        name: &str,
        mut next_id: impl FnMut() -> UnitId,
    ) -> SimResult<Self> {
        let template = registry.wave(name)?.clone();
        let enemies = (0..template.count)
            .map(|_| Enemy::from_registry(registry, &template.enemy, next_id()))
            .collect::<SimResult<Vec<_>>>()?;
        let portal = match &template.mode {
            WaveMode::Burst {
                portal: Some(effect),
                ..
            } => Some(ParticleEffect::new(registry.particle_effect(effect)?)),
            _ => None,
        };
        Ok(Self {
            name: name.to_string(),
            template,
            enemies,
            portal,
            phase: WavePhase::Waiting,
            elapsed: 0.0,
            charge: 0.0,
            spawn_timer: 0.0,
            spawn_point: Vec2::ZERO,
            spawned_so_far: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    /// Enemies are in play and take part in cross-wave collisions
    pub fn is_active(&self) -> bool {
        self.phase == WavePhase::Running
    }

    pub fn is_finished(&self) -> bool {
        self.phase == WavePhase::Finished
    }

    pub fn spawned_so_far(&self) -> usize {
        self.spawned_so_far
    }

    pub fn spawn_point(&self) -> Vec2 {
        self.spawn_point
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    pub fn living_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.unit.is_updating()).count()
    }

    pub fn set_particle_cap(&mut self, cap: usize) {
        if let Some(portal) = &mut self.portal {
            portal.set_particle_cap(cap);
        }
    }

    fn move_spawn_point<R: Rng + ?Sized>(&mut self, bounds: &Rect, rng: &mut R) {
        self.spawn_point = random_point_in_rect(rng, &bounds.inset(SPAWN_MARGIN));
    }

    /// Advance timers, spawn what is due, then run every enemy
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        target: Option<Vec2>,
        dt: f32,
        bounds: &Rect,
        rng: &mut R,
    ) {
        self.elapsed += dt;

        if self.phase == WavePhase::Waiting && self.elapsed >= self.template.start_time {
            self.move_spawn_point(bounds, rng);
            self.phase = match self.template.mode {
                WaveMode::Trickle { .. } => WavePhase::Running,
                WaveMode::Burst { .. } => WavePhase::Charging,
            };
            log::info!("Wave '{}' activated ({:?})", self.name, self.phase);
        }

        match self.phase {
            WavePhase::Charging => {
                if let WaveMode::Burst { activation_delay, .. } = self.template.mode {
                    self.charge_portal(activation_delay, dt, rng);
                }
            }
            WavePhase::Running => match self.template.mode {
                WaveMode::Trickle { interval } => self.trickle(interval, dt, bounds, rng),
                WaveMode::Burst { .. } => {
                    if !self.enemies.iter().any(|e| e.unit.is_updating()) {
                        self.phase = WavePhase::Finished;
                        log::info!("Wave '{}' finished", self.name);
                    }
                }
            },
            WavePhase::Waiting | WavePhase::Finished => {}
        }

        if let Some(portal) = &mut self.portal {
            portal.update(dt);
        }
        for enemy in &mut self.enemies {
            enemy.update(target, dt, bounds, rng);
        }
    }

    fn trickle<R: Rng + ?Sized>(&mut self, interval: f32, dt: f32, bounds: &Rect, rng: &mut R) {
        self.spawn_timer -= dt;
        if self.spawn_timer > 0.0 || self.enemies.is_empty() {
            return;
        }
        let slot = self.spawned_so_far % self.enemies.len();
        if self.enemies[slot].unit.is_updating() {
            return;
        }
        self.enemies[slot].unit.respawn_centered(self.spawn_point);
        self.spawned_so_far += 1;
        self.spawn_timer = interval;
        log::debug!("Wave '{}' spawned slot {} ({} total)", self.name, slot, self.spawned_so_far);
        self.move_spawn_point(bounds, rng);
    }

    fn charge_portal<R: Rng + ?Sized>(&mut self, activation_delay: f32, dt: f32, rng: &mut R) {
        self.charge += dt;
        let progress = if activation_delay > 0.0 {
            (self.charge / activation_delay).min(1.0)
        } else {
            1.0
        };
        if let Some(portal) = &mut self.portal {
            portal.set_intensity(progress);
            portal.spawn(self.spawn_point, 0.0, dt, Vec2::ZERO, rng);
        }
        if self.charge < activation_delay {
            return;
        }

        for enemy in &mut self.enemies {
            let offset = random_unit_vector(rng) * random_range(rng, 0.0, BURST_SPAWN_JITTER);
            let at = self.spawn_point + offset;
            enemy.unit.respawn_centered(at);
            enemy.unit.randomize_animation_frame(rng);
        }
        self.spawned_so_far += self.enemies.len();
        self.phase = WavePhase::Running;
        log::info!("Wave '{}' burst: {} enemies", self.name, self.enemies.len());
    }

    /// Unit collisions between this wave's own enemies
    pub fn collide_within(&mut self, dt: f32) {
        for i in 0..self.enemies.len() {
            let (head, tail) = self.enemies.split_at_mut(i + 1);
            let a = &mut head[i].unit;
            for b in tail {
                collide_units(a, &mut b.unit, dt);
            }
        }
    }

    /// Bodies bump the player; enemy weapons strike it
    pub fn collide_with_player<R: Rng + ?Sized>(
        &mut self,
        player: &mut PhysicalUnit,
        dt: f32,
        rng: &mut R,
    ) {
        for enemy in &mut self.enemies {
            collide_units(&mut enemy.unit, player, dt);
            if let Some(weapon) = &mut enemy.weapon {
                weapon.check_collision(player, dt, rng);
            }
        }
    }

    pub fn draw(&self, sink: &mut dyn DrawSink) {
        if let Some(portal) = &self.portal {
            portal.draw(sink);
        }
        for enemy in &self.enemies {
            enemy.draw(sink);
        }
    }
}

/// Unit collisions across two waves (the caller picks the active pairs)
pub fn collide_waves(a: &mut Wave, b: &mut Wave, dt: f32) {
    for ea in &mut a.enemies {
        for eb in &mut b.enemies {
            collide_units(&mut ea.unit, &mut eb.unit, dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::seeded;
    use crate::sim::unit::LifeState;

    const DT: f32 = 1.0 / 60.0;

    fn registry() -> Registry {
        Registry::from_json(
            r#"{
                "units": { "seal": { "size": [16.0, 16.0], "max_health": 10.0 } },
                "particles": { "portal": { "generators": [ { "spawn_rate": 30.0, "lifetime": 0.5 } ] } },
                "weapons": { "flipper": { "kind": "melee", "range": 20.0, "damage": 1.0 } },
                "enemies": {
                    "seal": { "unit": "seal" },
                    "angry_seal": { "unit": "seal", "weapon": "flipper" }
                },
                "waves": {
                    "drip": { "enemy": "seal", "count": 2, "start_time": 0.5, "mode": { "type": "trickle", "interval": 0.1 } },
                    "rush": { "enemy": "angry_seal", "count": 3, "mode": { "type": "burst", "activation_delay": 0.5, "portal": "portal" } }
                }
            }"#,
        )
        .unwrap()
    }

    fn wave(name: &str) -> Wave {
        let mut next = 0;
        Wave::from_registry(&registry(), name, || {
            next += 1;
            UnitId(next)
        })
        .unwrap()
    }

    fn arena() -> Rect {
        Rect::new(0.0, 0.0, 800.0, 600.0)
    }

    fn knock_out_all(wave: &mut Wave) {
        let mut rng = seeded(99);
        for enemy in wave.enemies_mut() {
            enemy.unit.apply_damage(1000.0, &mut rng);
        }
    }

    #[test]
    fn test_enemy_ids_are_unique() {
        let w = wave("rush");
        let ids: Vec<u32> = w.enemies().iter().map(|e| e.unit.id().0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(w.enemies().iter().all(|e| e.weapon.is_some()));
    }

    #[test]
    fn test_waits_for_start_time() {
        let mut rng = seeded(1);
        let mut w = wave("drip");
        for _ in 0..29 {
            w.update(None, DT, &arena(), &mut rng);
        }
        assert_eq!(w.phase(), WavePhase::Waiting);
        assert_eq!(w.spawned_so_far(), 0);
        w.update(None, DT * 2.0, &arena(), &mut rng);
        assert_eq!(w.phase(), WavePhase::Running);
        assert_eq!(w.spawned_so_far(), 1);
    }

    #[test]
    fn test_trickle_respawns_forever() {
        let mut rng = seeded(2);
        let mut w = wave("drip");
        let mut last_point = Vec2::ZERO;
        for round in 0..5 {
            for _ in 0..60 {
                w.update(None, DT, &arena(), &mut rng);
            }
            assert_eq!(w.living_count(), 2);
            assert_ne!(w.spawn_point(), last_point);
            last_point = w.spawn_point();
            assert!(arena().inset(SPAWN_MARGIN).contains_point(last_point));
            knock_out_all(&mut w);
            assert!(w.spawned_so_far() >= 2 * (round + 1));
        }
        assert!(w.is_active());
        assert!(!w.is_finished());
    }

    #[test]
    fn test_trickle_waits_for_busy_slot() {
        let mut rng = seeded(3);
        let mut w = wave("drip");
        for _ in 0..120 {
            w.update(None, DT, &arena(), &mut rng);
        }
        assert_eq!(w.spawned_so_far(), 2);
        // Both slots busy: nothing more spawns
        for _ in 0..120 {
            w.update(None, DT, &arena(), &mut rng);
        }
        assert_eq!(w.spawned_so_far(), 2);
    }

    #[test]
    fn test_burst_spawns_exactly_once() {
        let mut rng = seeded(4);
        let mut w = wave("rush");
        let mut saw_portal = false;
        for _ in 0..20 {
            w.update(None, DT, &arena(), &mut rng);
            saw_portal |= w.portal.as_ref().is_some_and(|p| !p.is_empty());
        }
        assert_eq!(w.phase(), WavePhase::Charging);
        assert!(saw_portal);
        assert_eq!(w.living_count(), 0);

        for _ in 0..20 {
            w.update(None, DT, &arena(), &mut rng);
        }
        assert_eq!(w.phase(), WavePhase::Running);
        assert_eq!(w.spawned_so_far(), 3);
        assert_eq!(w.living_count(), 3);
        for e in w.enemies() {
            assert!(e.unit.center().distance(w.spawn_point()) <= BURST_SPAWN_JITTER * 2.0 + 1.0);
        }

        knock_out_all(&mut w);
        for _ in 0..600 {
            w.update(None, DT, &arena(), &mut rng);
        }
        assert!(w.is_finished());
        assert_eq!(w.spawned_so_far(), 3);
        assert!(w.enemies().iter().all(|e| e.unit.state() == LifeState::Disabled));
    }

    #[test]
    fn test_chase_ai_moves_and_attacks() {
        let mut rng = seeded(5);
        let mut w = wave("rush");
        for _ in 0..40 {
            w.update(None, DT, &arena(), &mut rng);
        }
        let start = w.enemies()[0].unit.center();
        let target = start + Vec2::new(200.0, 0.0);
        for _ in 0..30 {
            w.update(Some(target), DT, &arena(), &mut rng);
        }
        assert!(w.enemies()[0].unit.center().x > start.x);

        // Player right next to the pack gets hit by a flipper
        let mut player = PhysicalUnit::new(UnitId(100), "seal", registry().unit("seal").unwrap());
        player.respawn_centered(w.enemies()[0].unit.center() + Vec2::new(12.0, 0.0));
        let before = player.health();
        for _ in 0..10 {
            w.update(Some(player.center()), DT, &arena(), &mut rng);
            w.collide_with_player(&mut player, DT, &mut rng);
        }
        assert!(player.health() < before);
    }

    #[test]
    fn test_collisions_within_and_across() {
        let mut rng = seeded(6);
        let mut a = wave("rush");
        let mut b = wave("rush");
        for _ in 0..40 {
            a.update(None, DT, &arena(), &mut rng);
            b.update(None, DT, &arena(), &mut rng);
        }
        // Burst enemies start stacked within the spawn jitter
        let stacked: Vec<Vec2> = a.enemies().iter().map(|e| e.unit.position).collect();
        a.collide_within(DT);
        let spread: Vec<Vec2> = a.enemies().iter().map(|e| e.unit.position).collect();
        assert_ne!(stacked, spread);

        for enemy in b.enemies_mut() {
            enemy.unit.position = a.enemies()[0].unit.position;
        }
        let before = b.enemies()[0].unit.position;
        collide_waves(&mut a, &mut b, DT);
        assert_ne!(b.enemies()[0].unit.position, before);
    }
}
