//! Grappling hook
//!
//! `Idle -> Fired -> Attached | Retracting -> Idle`. While attached the
//! owner and the target are pulled together. The hook lets go when the
//! owner triggers again, or when the target stops being collidable or is
//! no longer checked against the hook.

use glam::Vec2;

use super::WeaponCore;
use crate::data::HookShotTemplate;
use crate::sim::draw::{DrawSink, Quad};
use crate::sim::geometry::{Rect, direction_between};
use crate::sim::unit::{PhysicalUnit, UnitId};
use crate::radians_from_vector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HookState {
    #[default]
    Idle,
    Fired,
    Attached(UnitId),
    Retracting,
}

#[derive(Debug, Clone)]
pub struct HookShot {
    template: HookShotTemplate,
    state: HookState,
    head: Vec2,
    direction: Vec2,
    /// Owner center as of the last update
    anchor: Vec2,
    /// Attached target showed up in a collision check since the last update
    target_seen: bool,
}

impl HookShot {
    pub fn new(template: &HookShotTemplate) -> Self {
        Self {
            template: template.clone(),
            state: HookState::Idle,
            head: Vec2::ZERO,
            direction: Vec2::ZERO,
            anchor: Vec2::ZERO,
            target_seen: false,
        }
    }

    pub fn state(&self) -> HookState {
        self.state
    }

    pub fn head(&self) -> Vec2 {
        self.head
    }

    pub fn reach(&self) -> f32 {
        self.template.range
    }

    /// Let go and reel the hook back in
    pub fn release(&mut self) {
        if matches!(self.state, HookState::Fired | HookState::Attached(_)) {
            log::debug!("hook released");
            self.state = HookState::Retracting;
        }
    }

    fn head_rect(&self) -> Rect {
        Rect::centered(self.head, self.template.size)
    }

    pub(super) fn update(&mut self, core: &WeaponCore, owner: &mut PhysicalUnit, dt: f32) {
        self.anchor = owner.center();
        match self.state {
            HookState::Idle => {
                self.head = self.anchor;
                if core.is_firing() {
                    self.state = HookState::Fired;
                    self.direction = core.direction();
                }
            }
            HookState::Fired => {
                self.head += self.direction * self.template.speed * dt;
                if self.head.distance(self.anchor) >= self.template.range {
                    self.state = HookState::Retracting;
                }
            }
            HookState::Attached(_) => {
                if self.target_seen {
                    let pull = direction_between(self.anchor, self.head) * self.template.pull_force;
                    owner.apply_force(pull, dt);
                } else {
                    self.release();
                }
            }
            HookState::Retracting => {
                let to_owner = self.anchor - self.head;
                let step = self.template.retract_speed * dt;
                if to_owner.length() <= step {
                    self.head = self.anchor;
                    self.state = HookState::Idle;
                } else {
                    self.head += to_owner.normalize_or_zero() * step;
                }
            }
        }
        self.target_seen = false;
    }

    pub(super) fn check_collision(&mut self, unit: &mut PhysicalUnit, dt: f32) -> bool {
        match self.state {
            HookState::Fired => {
                if !unit.is_collidable() || !self.head_rect().intersects(&unit.hit_rect()) {
                    return false;
                }
                log::debug!("hook attached to {} ({:?})", unit.name(), unit.id());
                self.state = HookState::Attached(unit.id());
                self.head = unit.center();
                self.target_seen = true;
                true
            }
            HookState::Attached(id) if id == unit.id() => {
                if !unit.is_collidable() {
                    self.release();
                    return false;
                }
                self.target_seen = true;
                self.head = unit.center();
                let pull = direction_between(unit.center(), self.anchor) * self.template.pull_force;
                unit.apply_force(pull, dt);
                true
            }
            _ => false,
        }
    }

    pub(super) fn draw(&self, texture: &str, sink: &mut dyn DrawSink) {
        if self.state == HookState::Idle {
            return;
        }
        sink.draw_quad(Quad {
            rotation: radians_from_vector(self.head - self.anchor),
            ..Quad::new(texture, self.head)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::UnitTemplate;
    use crate::sim::rng::seeded;
    use crate::sim::unit::LifeState;
    use crate::sim::weapon::{Weapon, WeaponKind};

    const DT: f32 = 1.0 / 60.0;

    fn hook() -> Weapon {
        let template = HookShotTemplate {
            fire_delay: 0.2,
            speed: 600.0,
            range: 200.0,
            pull_force: 500.0,
            retract_speed: 1200.0,
            size: Vec2::new(10.0, 10.0),
            ..Default::default()
        };
        Weapon {
            core: WeaponCore::new("hook", "", template.fire_delay),
            kind: WeaponKind::HookShot(HookShot::new(&template)),
        }
    }

    fn state(weapon: &Weapon) -> HookState {
        match &weapon.kind {
            WeaponKind::HookShot(h) => h.state(),
            _ => unreachable!(),
        }
    }

    fn unit(id: u32, center: Vec2) -> PhysicalUnit {
        let mut unit = PhysicalUnit::new(UnitId(id), "seal", &UnitTemplate::default());
        unit.respawn_centered(center);
        unit
    }

    /// Fire at a unit 100px to the right and tick until the hook lands
    fn attached() -> (Weapon, PhysicalUnit, PhysicalUnit) {
        let mut rng = seeded(1);
        let mut owner = unit(0, Vec2::ZERO);
        let mut target = unit(1, Vec2::new(100.0, 0.0));
        let mut weapon = hook();
        assert!(weapon.trigger(owner.center(), target.center()));
        for _ in 0..20 {
            weapon.update(&mut owner, DT, &mut rng);
            weapon.check_collision(&mut target, DT, &mut rng);
            if matches!(state(&weapon), HookState::Attached(_)) {
                break;
            }
        }
        assert_eq!(state(&weapon), HookState::Attached(UnitId(1)));
        (weapon, owner, target)
    }

    #[test]
    fn test_attach_and_pull() {
        let mut rng = seeded(2);
        let (mut weapon, mut owner, mut target) = attached();
        weapon.update(&mut owner, DT, &mut rng);
        weapon.check_collision(&mut target, DT, &mut rng);
        target.update(DT, &Rect::new(-500.0, -500.0, 1000.0, 1000.0));
        owner.update(DT, &Rect::new(-500.0, -500.0, 1000.0, 1000.0));
        assert!(target.velocity.x < 0.0);
        assert!(owner.velocity.x > 0.0);
    }

    #[test]
    fn test_retrigger_releases_ignoring_cooldown() {
        let mut rng = seeded(3);
        let (mut weapon, mut owner, _target) = attached();
        assert!(!weapon.core.is_ready());
        assert!(weapon.trigger(owner.center(), Vec2::ZERO));
        assert_eq!(state(&weapon), HookState::Retracting);
        for _ in 0..30 {
            weapon.update(&mut owner, DT, &mut rng);
        }
        assert_eq!(state(&weapon), HookState::Idle);
    }

    #[test]
    fn test_releases_when_target_disappears() {
        let mut rng = seeded(4);
        let (mut weapon, _owner, mut target) = attached();
        target.begin_being_eaten();
        assert_eq!(target.state(), LifeState::BeingEaten);
        weapon.check_collision(&mut target, DT, &mut rng);
        assert_eq!(state(&weapon), HookState::Retracting);

        // A target that is never checked again also lets go
        let (mut weapon, mut owner, _gone) = attached();
        weapon.update(&mut owner, DT, &mut rng);
        assert_eq!(state(&weapon), HookState::Attached(UnitId(1)));
        weapon.update(&mut owner, DT, &mut rng);
        assert_eq!(state(&weapon), HookState::Retracting);
    }

    #[test]
    fn test_misses_and_retracts_at_range() {
        let mut rng = seeded(5);
        let mut owner = unit(0, Vec2::ZERO);
        let mut weapon = hook();
        weapon.trigger(owner.center(), Vec2::new(0.0, -100.0));
        let mut saw_retract = false;
        for _ in 0..60 {
            weapon.update(&mut owner, DT, &mut rng);
            saw_retract |= state(&weapon) == HookState::Retracting;
        }
        assert!(saw_retract);
        assert_eq!(state(&weapon), HookState::Idle);
    }
}
