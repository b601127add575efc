//! Close-range arc swings

use glam::Vec2;
use rand::Rng;

use super::WeaponCore;
use crate::data::MeleeWeaponTemplate;
use crate::sim::draw::{DrawSink, Quad};
use crate::sim::geometry::{direction_between, rectangle_intersects_arc};
use crate::sim::unit::{PhysicalUnit, UnitId};
use crate::radians_from_vector;

#[derive(Debug, Clone)]
pub struct MeleeWeapon {
    template: MeleeWeaponTemplate,
    swinging: bool,
    swing_timer: f32,
    origin: Vec2,
    facing: f32,
    /// Units already struck by the current swing
    struck: Vec<UnitId>,
}

impl MeleeWeapon {
    pub fn new(template: &MeleeWeaponTemplate) -> Self {
        Self {
            template: template.clone(),
            swinging: false,
            swing_timer: 0.0,
            origin: Vec2::ZERO,
            facing: 0.0,
            struck: Vec::new(),
        }
    }

    pub fn is_swinging(&self) -> bool {
        self.swinging
    }

    pub fn reach(&self) -> f32 {
        self.template.range
    }

    /// A swing starts on the firing tick and stays live for `swing_time`
    /// (at least the rest of that tick's collision pass)
    pub(super) fn update(&mut self, core: &WeaponCore, owner: &mut PhysicalUnit, dt: f32) {
        self.origin = owner.center();
        if core.is_firing() {
            self.swinging = true;
            self.swing_timer = self.template.swing_time;
            self.facing = radians_from_vector(core.direction());
            self.struck.clear();
            if self.template.recoil > 0.0 {
                owner.apply_impulse(-core.direction() * self.template.recoil);
            }
        } else if self.swinging {
            self.swing_timer -= dt;
            if self.swing_timer <= 0.0 {
                self.swinging = false;
            }
        }
    }

    pub(super) fn check_collision<R: Rng + ?Sized>(&mut self, unit: &mut PhysicalUnit, rng: &mut R) -> bool {
        if !self.swinging || !unit.is_collidable() || self.struck.contains(&unit.id()) {
            return false;
        }
        let t = &self.template;
        let rect = unit.hit_rect();
        if !rectangle_intersects_arc(&rect, self.origin, self.facing, t.arc.to_radians() * 0.5, t.range) {
            return false;
        }

        self.struck.push(unit.id());
        unit.apply_impulse(direction_between(self.origin, rect.center()) * t.force);
        if !t.status.is_zero() {
            unit.apply_status(t.status);
        }
        unit.apply_damage(t.damage, rng);
        true
    }

    pub(super) fn draw(&self, texture: &str, sink: &mut dyn DrawSink) {
        if self.swinging {
            sink.draw_quad(Quad {
                rotation: self.facing,
                ..Quad::new(texture, self.origin)
            });
        }
    }
}
