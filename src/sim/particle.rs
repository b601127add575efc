//! Particle generators and composite effects
//!
//! A generator owns its particles outright; nothing outside ever holds a
//! reference to an individual particle. Motion is an analytic function of
//! age, so reversed effects can start at the end-of-life state and play back
//! toward the emitter.

use glam::Vec2;
use rand::Rng;

use super::draw::{DrawSink, Quad};
use super::rng::{random_range, randomize_vector};
use crate::data::{ParticleEffectTemplate, ParticleGeneratorTemplate};
use crate::vector_from_radians;

/// Slack when turning the fractional spawn carry into whole particles
const SPAWN_EPSILON: f32 = 1e-3;

/// One particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Emit point
    pub origin: Vec2,
    /// Velocity at age 0 (before deceleration)
    pub start_velocity: Vec2,
    pub position: Vec2,
    pub velocity: Vec2,
    pub scale: f32,
    pub start_rotation: f32,
    pub rotation: f32,
    /// Seconds alive
    pub age: f32,
    pub lifetime: f32,
}

impl Particle {
    /// Fraction of life used, 0..1
    pub fn life_fraction(&self) -> f32 {
        if self.lifetime > 0.0 {
            (self.age / self.lifetime).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

/// Distance factor travelled after `t` seconds with exponential deceleration
#[inline]
fn travel(deceleration: f32, t: f32) -> f32 {
    if deceleration > 1e-4 {
        (1.0 - (-deceleration * t).exp()) / deceleration
    } else {
        t
    }
}

/// Emits, ages and retires particles for one template
#[derive(Debug, Clone)]
pub struct ParticleGenerator {
    template: ParticleGeneratorTemplate,
    particles: Vec<Particle>,
    /// Particles owed but not yet spawned (fractional carry between calls)
    spawn_carry: f32,
    /// Spawn-rate multiplier
    intensity: f32,
    cap: usize,
}

impl ParticleGenerator {
    pub fn new(template: &ParticleGeneratorTemplate) -> Self {
        let expected = (template.spawn_rate.max(0.0)
            * (template.lifetime + template.lifetime_variance).max(0.0))
        .ceil() as usize;
        Self {
            template: template.clone(),
            particles: Vec::with_capacity(expected.min(template.max_particles)),
            spawn_carry: 0.0,
            intensity: 1.0,
            cap: template.max_particles,
        }
    }

    pub fn template(&self) -> &ParticleGeneratorTemplate {
        &self.template
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Scale the spawn rate (0 stops emission)
    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity.max(0.0);
    }

    /// Hard cap on live particles; never above the template's own cap
    pub fn set_particle_cap(&mut self, cap: usize) {
        self.cap = cap.min(self.template.max_particles);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.spawn_carry = 0.0;
    }

    /// Emit particles for `dt` seconds of spawning
    ///
    /// Fractional particles carry over to the next call, so the long-run
    /// count is `spawn_rate * total_time` however `dt` is split. `angle` is
    /// the base emission direction (radians, up/clockwise) and
    /// `base_velocity` is added to every particle.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        position: Vec2,
        angle: f32,
        dt: f32,
        base_velocity: Vec2,
        rng: &mut R,
    ) -> usize {
        if dt <= 0.0 || self.template.spawn_rate <= 0.0 {
            return 0;
        }

        self.spawn_carry += self.template.spawn_rate * self.intensity * dt;
        let due = (self.spawn_carry + SPAWN_EPSILON).floor().max(0.0);
        self.spawn_carry -= due;

        let mut spawned = 0;
        for _ in 0..due as usize {
            if self.particles.len() >= self.cap {
                break;
            }
            let particle = self.make_particle(position, angle, base_velocity, rng);
            self.particles.push(particle);
            spawned += 1;
        }
        spawned
    }

    fn make_particle<R: Rng + ?Sized>(
        &self,
        position: Vec2,
        angle: f32,
        base_velocity: Vec2,
        rng: &mut R,
    ) -> Particle {
        let t = &self.template;
        let half_arc = t.spawn_arc.to_radians() * 0.5;
        let jitter = t.angle_jitter.to_radians();
        let direction = angle + random_range(rng, -half_arc, half_arc) + random_range(rng, -jitter, jitter);
        let speed = (t.speed + random_range(rng, -t.speed_variance, t.speed_variance)).max(0.0);
        let lifetime = (t.lifetime + random_range(rng, -t.lifetime_variance, t.lifetime_variance)).max(0.01);
        let origin = randomize_vector(rng, position, t.offset_variance);
        let start_rotation = random_range(rng, -std::f32::consts::PI, std::f32::consts::PI);

        let mut particle = Particle {
            origin,
            start_velocity: vector_from_radians(direction) * speed + base_velocity,
            position: origin,
            velocity: Vec2::ZERO,
            scale: t.start_scale,
            start_rotation,
            rotation: start_rotation,
            age: 0.0,
            lifetime,
        };
        self.advance(&mut particle);
        particle
    }

    /// Recompute position/velocity/scale/rotation from age
    fn advance(&self, p: &mut Particle) {
        let t = &self.template;
        // Reversed particles run their timeline backwards
        let time = if t.reversed { p.lifetime - p.age } else { p.age }.max(0.0);
        let decay = (-t.deceleration.max(0.0) * time).exp();
        let direction = if t.reversed { -1.0 } else { 1.0 };

        p.position = p.origin + p.start_velocity * travel(t.deceleration.max(0.0), time);
        p.velocity = p.start_velocity * decay * direction;
        let frac = if p.lifetime > 0.0 { time / p.lifetime } else { 1.0 };
        p.scale = t.start_scale + (t.end_scale - t.start_scale) * frac.clamp(0.0, 1.0);
        p.rotation = p.start_rotation + t.rotation_speed * time;
    }

    /// Age every particle and drop the expired ones
    pub fn update(&mut self, dt: f32) {
        let mut particles = std::mem::take(&mut self.particles);
        particles.retain_mut(|p| {
            p.age += dt;
            if p.age > p.lifetime {
                return false;
            }
            self.advance(p);
            true
        });
        self.particles = particles;
    }

    pub fn draw(&self, sink: &mut dyn DrawSink) {
        let t = &self.template;
        for p in &self.particles {
            let fade = if t.reversed {
                p.life_fraction()
            } else {
                1.0 - p.life_fraction()
            };
            let mut tint = t.tint;
            tint[3] *= fade;
            sink.draw_quad(Quad {
                texture: &t.texture,
                position: p.position,
                rotation: p.rotation,
                scale: p.scale,
                tint,
                frame: 0,
            });
        }
    }
}

/// 1..N generators driven together
#[derive(Debug, Clone, Default)]
pub struct ParticleEffect {
    generators: Vec<ParticleGenerator>,
}

impl ParticleEffect {
    pub fn new(template: &ParticleEffectTemplate) -> Self {
        Self {
            generators: template.generators.iter().map(ParticleGenerator::new).collect(),
        }
    }

    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        position: Vec2,
        angle: f32,
        dt: f32,
        base_velocity: Vec2,
        rng: &mut R,
    ) -> usize {
        self.generators
            .iter_mut()
            .map(|g| g.spawn(position, angle, dt, base_velocity, rng))
            .sum()
    }

    pub fn update(&mut self, dt: f32) {
        for g in &mut self.generators {
            g.update(dt);
        }
    }

    pub fn draw(&self, sink: &mut dyn DrawSink) {
        for g in &self.generators {
            g.draw(sink);
        }
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        for g in &mut self.generators {
            g.set_intensity(intensity);
        }
    }

    pub fn set_particle_cap(&mut self, cap: usize) {
        for g in &mut self.generators {
            g.set_particle_cap(cap);
        }
    }

    pub fn particle_count(&self) -> usize {
        self.generators.iter().map(|g| g.particle_count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.particle_count() == 0
    }

    pub fn clear(&mut self) {
        for g in &mut self.generators {
            g.clear();
        }
    }
}
