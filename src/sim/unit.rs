//! Physical units
//!
//! The central entity: integrates motion, carries health and status
//! effects, and walks the life-state machine
//!
//! ```text
//! Dormant -respawn-> Living <-> Ghost
//! Living -cryo full-> Frozen -cryo gone-> Living (cryo left at half)
//! Living -health 0-> Disabled
//! Frozen -ice integrity < 0-> Shattered -fragments melted-> Destroyed
//! any live state -gravity well-> BeingEaten -scale 0-> Destroyed
//! ```
//!
//! Containers keep units as pool slots: a Destroyed unit is brought back
//! with [`PhysicalUnit::respawn`], never freed.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::draw::{DrawSink, Quad, Tint};
use super::geometry::{Rect, distance_between_rects};
use super::gravity::Gravity;
use super::rng::{random_int, random_range, randomize_vector};
use super::status::StatusEffect;
use crate::consts::*;
use crate::data::UnitTemplate;
use crate::radians_from_vector;

/// Handle assigned by whichever container owns the unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// Coarse behavioral mode of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeState {
    /// Pool slot not in play
    Dormant,
    Living,
    /// Reserved: behaves like Living without move commands
    Stunned,
    /// Encased in ice; damage chips ice integrity instead of health
    Frozen,
    /// Replaced by ice fragments
    Shattered,
    /// Knocked out at zero health; no motion, status still decays
    Disabled,
    /// Shrinking into a gravity well
    BeingEaten,
    Destroyed,
    /// Living but passes through other units
    Ghost,
}

impl LifeState {
    /// Still an active participant (waves wait on these)
    pub fn is_updating(self) -> bool {
        matches!(
            self,
            LifeState::Living
                | LifeState::Ghost
                | LifeState::Stunned
                | LifeState::Frozen
                | LifeState::Shattered
                | LifeState::BeingEaten
        )
    }

    /// Can be hit by units, projectiles and melee
    pub fn is_collidable(self) -> bool {
        matches!(
            self,
            LifeState::Living | LifeState::Stunned | LifeState::Frozen | LifeState::Disabled
        )
    }

    /// Integrates velocity into position
    pub fn is_movable(self) -> bool {
        matches!(
            self,
            LifeState::Living
                | LifeState::Ghost
                | LifeState::Stunned
                | LifeState::Frozen
                | LifeState::BeingEaten
        )
    }

    /// Responds to move/look commands
    pub fn takes_commands(self) -> bool {
        matches!(self, LifeState::Living | LifeState::Ghost)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimationClip {
    #[default]
    Idle,
    Walk,
    Hurt,
    Frozen,
    KnockedOut,
}

impl AnimationClip {
    /// Clips that hold their first frame
    fn is_still(self) -> bool {
        matches!(self, AnimationClip::Frozen | AnimationClip::KnockedOut)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationState {
    pub clip: AnimationClip,
    pub frame: u32,
    timer: f32,
}

impl AnimationState {
    fn play(&mut self, clip: AnimationClip) {
        if self.clip != clip {
            self.clip = clip;
            self.frame = 0;
            self.timer = 0.0;
        }
    }

    fn advance(&mut self, dt: f32, frames: u32, fps: f32) {
        if self.clip.is_still() || frames <= 1 || fps <= 0.0 {
            return;
        }
        let frame_time = 1.0 / fps;
        self.timer += dt;
        while self.timer >= frame_time {
            self.timer -= frame_time;
            self.frame = (self.frame + 1) % frames;
        }
    }
}

/// One cell of a shattered unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IceFragment {
    /// Center of the fragment
    pub position: Vec2,
    pub velocity: Vec2,
    pub angle: f32,
    pub angular_velocity: f32,
    pub health: f32,
    pub max_health: f32,
    pub scale: f32,
    /// Set by a gravity well; eaten fragments melt faster
    pub eaten: bool,
    /// Sprite-sheet cell (row * N + col)
    pub cell: u32,
}

impl IceFragment {
    pub fn is_melted(&self) -> bool {
        self.health <= 0.0
    }
}

const FLASH_TINT: Tint = [1.0, 0.35, 0.35, 1.0];
const FROZEN_TINT: Tint = [0.6, 0.85, 1.0, 1.0];
const ICE_TINT: Tint = [0.75, 0.9, 1.0, 0.9];
/// Velocity below which a unit counts as standing still (pixels/s)
const WALK_THRESHOLD: f32 = 5.0;
const MIN_FRAGMENT_HEALTH: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct PhysicalUnit {
    id: UnitId,
    name: String,
    texture: String,
    state: LifeState,
    /// Top-left of the hit rectangle
    pub position: Vec2,
    pub velocity: Vec2,
    /// Velocity change queued for the next integration step
    pub acceleration: Vec2,
    /// Visual spin
    pub angle: f32,
    pub angular_velocity: f32,
    facing: f32,
    size: Vec2,
    pub mass: f32,
    /// Temporary mass boost
    pub additional_mass: f32,
    pub max_speed: f32,
    pub move_force: f32,
    pub deceleration: f32,
    health: f32,
    max_health: f32,
    status: StatusEffect,
    status_resist: StatusEffect,
    ice_integrity: f32,
    /// Live state to return to after a thaw
    thawed_state: LifeState,
    fragments: Vec<IceFragment>,
    move_direction: Vec2,
    look_direction: Vec2,
    scale: f32,
    damage_flash: f32,
    animation: AnimationState,
    animation_frames: u32,
    animation_fps: f32,
}

impl PhysicalUnit {
    /// Build a Dormant unit from its template
    pub fn new(id: UnitId, name: &str, template: &UnitTemplate) -> Self {
        let texture = if template.texture.is_empty() {
            name.to_string()
        } else {
            template.texture.clone()
        };
        Self {
            id,
            name: name.to_string(),
            texture,
            state: LifeState::Dormant,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            angle: 0.0,
            angular_velocity: 0.0,
            facing: 0.0,
            size: template.size,
            mass: template.mass,
            additional_mass: 0.0,
            max_speed: template.max_speed,
            move_force: template.move_force,
            deceleration: template.deceleration,
            health: template.max_health,
            max_health: template.max_health,
            status: StatusEffect::ZERO,
            status_resist: template.status_resist,
            ice_integrity: 0.0,
            thawed_state: LifeState::Living,
            fragments: Vec::with_capacity(ICE_FRAGMENT_GRID * ICE_FRAGMENT_GRID),
            move_direction: Vec2::ZERO,
            look_direction: Vec2::ZERO,
            scale: 1.0,
            damage_flash: 0.0,
            animation: AnimationState::default(),
            animation_frames: template.animation_frames,
            animation_fps: template.animation_fps,
        }
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> LifeState {
        self.state
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn status(&self) -> StatusEffect {
        self.status
    }

    pub fn ice_integrity(&self) -> f32 {
        self.ice_integrity
    }

    pub fn fragments(&self) -> &[IceFragment] {
        &self.fragments
    }

    pub fn fragments_mut(&mut self) -> &mut [IceFragment] {
        &mut self.fragments
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Facing angle (radians, up/clockwise)
    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn animation(&self) -> AnimationState {
        self.animation
    }

    pub fn is_flashing(&self) -> bool {
        self.damage_flash > 0.0
    }

    pub fn total_mass(&self) -> f32 {
        self.mass + self.additional_mass
    }

    /// Hit rectangle, always derived from position
    pub fn hit_rect(&self) -> Rect {
        Rect {
            pos: self.position,
            size: self.size,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    pub fn is_updating(&self) -> bool {
        self.state.is_updating()
    }

    pub fn is_collidable(&self) -> bool {
        self.state.is_collidable()
    }

    /// Back to a fresh Dormant slot
    pub fn reset(&mut self) {
        self.state = LifeState::Dormant;
        self.velocity = Vec2::ZERO;
        self.acceleration = Vec2::ZERO;
        self.angle = 0.0;
        self.angular_velocity = 0.0;
        self.facing = 0.0;
        self.additional_mass = 0.0;
        self.health = self.max_health;
        self.status = StatusEffect::ZERO;
        self.ice_integrity = 0.0;
        self.thawed_state = LifeState::Living;
        self.fragments.clear();
        self.move_direction = Vec2::ZERO;
        self.look_direction = Vec2::ZERO;
        self.scale = 1.0;
        self.damage_flash = 0.0;
        self.animation = AnimationState::default();
    }

    /// Reset and bring the unit into play with its top-left at `position`
    pub fn respawn(&mut self, position: Vec2) {
        self.reset();
        self.position = position;
        self.state = LifeState::Living;
    }

    /// Respawn with the hit rectangle centered on `center`
    pub fn respawn_centered(&mut self, center: Vec2) {
        self.respawn(center - self.size * 0.5);
    }

    /// Start the current clip on a random frame so spawned groups do not
    /// animate in lockstep
    pub fn randomize_animation_frame<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let frames = self.animation_frames.min(i32::MAX as u32) as i32;
        self.animation.frame = random_int(rng, 0, frames) as u32;
    }

    /// Move command for the next tick only
    pub fn set_move_direction(&mut self, direction: Vec2) {
        self.move_direction = direction;
    }

    /// Look command for the next tick only
    pub fn set_look_direction(&mut self, direction: Vec2) {
        self.look_direction = direction;
    }

    pub fn look_at(&mut self, point: Vec2) {
        self.look_direction = point - self.center();
    }

    /// Toggle between Living and Ghost
    pub fn set_ghost(&mut self, ghost: bool) {
        match (self.state, ghost) {
            (LifeState::Living, true) => self.state = LifeState::Ghost,
            (LifeState::Ghost, false) => self.state = LifeState::Living,
            _ => {}
        }
    }

    /// Queue a force for the next integration step
    pub fn apply_force(&mut self, force: Vec2, dt: f32) {
        if self.state.is_movable() {
            self.acceleration += force / self.total_mass() * dt;
        }
    }

    /// Instant velocity change from an impulse
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        if self.state.is_movable() {
            self.velocity += impulse / self.total_mass();
        }
    }

    /// 1-D elastic collision with a body of `other_mass` moving at `other_velocity`
    pub fn apply_impact(&mut self, other_velocity: Vec2, other_mass: f32) {
        if matches!(self.state, LifeState::Dormant | LifeState::Destroyed) {
            return;
        }
        let mass = self.total_mass();
        let total = mass + other_mass;
        if total <= 0.0 {
            return;
        }
        self.velocity = (self.velocity * (mass - other_mass) + 2.0 * other_mass * other_velocity) / total;
    }

    /// Pull toward a gravity source (fragments are pulled individually)
    pub fn apply_gravity(&mut self, gravity: &Gravity, multiplier: f32, dt: f32) {
        match self.state {
            LifeState::Shattered => {
                for f in self.fragments.iter_mut().filter(|f| !f.is_melted()) {
                    f.velocity += gravity.acceleration_at(f.position, multiplier, dt);
                }
            }
            state if state.is_movable() => {
                self.acceleration += gravity.acceleration_at(self.center(), multiplier, dt);
            }
            _ => {}
        }
    }

    pub fn apply_status(&mut self, effect: StatusEffect) {
        if matches!(
            self.state,
            LifeState::Dormant | LifeState::Destroyed | LifeState::BeingEaten | LifeState::Shattered
        ) {
            return;
        }
        let mut incoming = effect;
        // Fire melts ice before it can burn
        if self.state == LifeState::Frozen && incoming.fire > 0.0 {
            self.status.cryo -= incoming.fire;
            incoming.fire = 0.0;
        }
        self.status = (self.status + incoming).clamped();
    }

    /// Take damage; frozen units lose ice integrity and shatter below zero
    pub fn apply_damage<R: Rng + ?Sized>(&mut self, amount: f32, rng: &mut R) {
        if !amount.is_finite() || amount <= 0.0 {
            return;
        }
        match self.state {
            LifeState::Dormant | LifeState::Destroyed | LifeState::BeingEaten | LifeState::Shattered => {}
            LifeState::Frozen => {
                self.ice_integrity -= amount;
                if self.ice_integrity < 0.0 {
                    self.shatter(rng);
                }
            }
            LifeState::Living | LifeState::Ghost | LifeState::Stunned | LifeState::Disabled => {
                self.health = (self.health - amount).clamp(0.0, self.max_health);
                if self.health <= 0.0 {
                    self.knock_out();
                } else {
                    self.damage_flash = DAMAGE_FLASH_DURATION;
                }
            }
        }
    }

    /// Start shrinking into a gravity well
    pub fn begin_being_eaten(&mut self) -> bool {
        if matches!(
            self.state,
            LifeState::Living | LifeState::Ghost | LifeState::Stunned | LifeState::Frozen | LifeState::Disabled
        ) {
            self.state = LifeState::BeingEaten;
            true
        } else {
            false
        }
    }

    fn knock_out(&mut self) {
        if self.state != LifeState::Disabled {
            log::debug!("{} ({:?}) knocked out", self.name, self.id);
        }
        self.state = LifeState::Disabled;
        self.velocity = Vec2::ZERO;
        self.acceleration = Vec2::ZERO;
    }

    fn freeze(&mut self) {
        log::debug!("{} ({:?}) frozen", self.name, self.id);
        self.thawed_state = match self.state {
            LifeState::Ghost | LifeState::Stunned => self.state,
            _ => LifeState::Living,
        };
        self.state = LifeState::Frozen;
        self.ice_integrity = self.max_health * FREEZE_INTEGRITY_RATIO;
        self.status.fire = 0.0;
    }

    fn thaw(&mut self) {
        self.state = if self.health > 0.0 {
            self.thawed_state
        } else {
            LifeState::Disabled
        };
        self.ice_integrity = 0.0;
        self.status.cryo = THAW_RESIDUAL_CRYO;
    }

    fn shatter<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        log::debug!("{} ({:?}) shattered", self.name, self.id);
        let n = ICE_FRAGMENT_GRID;
        let cell = self.size / n as f32;
        let health = (self.status.cryo * FRAGMENT_HEALTH_PER_CRYO).max(MIN_FRAGMENT_HEALTH);

        self.fragments.clear();
        for row in 0..n {
            for col in 0..n {
                let offset = Vec2::new((col as f32 + 0.5) * cell.x, (row as f32 + 0.5) * cell.y);
                let scatter = randomize_vector(rng, Vec2::ZERO, FRAGMENT_SCATTER_SPEED);
                self.fragments.push(IceFragment {
                    position: self.position + offset,
                    velocity: scatter + self.velocity * FRAGMENT_INHERIT_VELOCITY,
                    angle: self.angle,
                    angular_velocity: random_range(rng, -FRAGMENT_MAX_SPIN, FRAGMENT_MAX_SPIN),
                    health,
                    max_health: health,
                    scale: 1.0,
                    eaten: false,
                    cell: (row * n + col) as u32,
                });
            }
        }

        self.state = LifeState::Shattered;
        self.velocity = Vec2::ZERO;
        self.acceleration = Vec2::ZERO;
    }

    /// Advance one tick
    pub fn update(&mut self, dt: f32, bounds: &Rect) {
        self.damage_flash = (self.damage_flash - dt).max(0.0);

        match self.state {
            LifeState::Dormant | LifeState::Destroyed => {}
            LifeState::BeingEaten => {
                self.integrate(dt);
                self.scale -= EATEN_SHRINK_RATE * dt;
                if self.scale <= 0.0 {
                    self.scale = 0.0;
                    self.state = LifeState::Destroyed;
                    log::debug!("{} ({:?}) eaten", self.name, self.id);
                }
            }
            LifeState::Shattered => {
                self.update_fragments(dt);
                if self.fragments.iter().all(IceFragment::is_melted) {
                    self.fragments.clear();
                    self.state = LifeState::Destroyed;
                }
            }
            LifeState::Disabled => {
                self.velocity = Vec2::ZERO;
                self.acceleration = Vec2::ZERO;
                if self.status.cryo >= STATUS_MAX {
                    self.freeze();
                }
                self.status.decay(&self.status_resist, dt);
                self.update_animation(dt);
            }
            LifeState::Living | LifeState::Ghost | LifeState::Stunned | LifeState::Frozen => {
                if self.state.takes_commands() {
                    self.apply_commands(dt);
                }
                self.apply_bounds_force(bounds, dt);
                self.integrate(dt);

                if self.state == LifeState::Frozen {
                    if self.status.cryo <= 0.0 {
                        self.thaw();
                    }
                } else if self.status.cryo >= STATUS_MAX {
                    self.freeze();
                }

                self.status.decay(&self.status_resist, dt);
                if self.state != LifeState::Frozen && self.status.fire > 0.0 {
                    self.burn(self.status.fire * FIRE_DAMAGE_PER_POINT * dt);
                }
                self.update_animation(dt);
            }
        }

        self.move_direction = Vec2::ZERO;
        self.look_direction = Vec2::ZERO;
    }

    fn apply_commands(&mut self, dt: f32) {
        let direction = self.move_direction.normalize_or_zero();
        if direction != Vec2::ZERO {
            let weaken = 1.0 - SHOCK_WEAKEN_FACTOR * self.status.shock / STATUS_MAX;
            self.acceleration += direction * self.move_force * weaken / self.total_mass() * dt;
        }

        if self.look_direction.length_squared() > 1e-6 {
            self.facing = radians_from_vector(self.look_direction);
        } else if direction != Vec2::ZERO {
            self.facing = radians_from_vector(direction);
        }
    }

    /// Push back toward the playable area, proportional to how far the hit
    /// rect sticks out past the buffer margin
    fn apply_bounds_force(&mut self, bounds: &Rect, dt: f32) {
        let inner = bounds.inset(BOUNDS_BUFFER);
        let rect = self.hit_rect();
        let mut depth = Vec2::ZERO;
        if rect.left() < inner.left() {
            depth.x += inner.left() - rect.left();
        }
        if rect.right() > inner.right() {
            depth.x -= rect.right() - inner.right();
        }
        if rect.top() < inner.top() {
            depth.y += inner.top() - rect.top();
        }
        if rect.bottom() > inner.bottom() {
            depth.y -= rect.bottom() - inner.bottom();
        }
        self.acceleration += depth * BOUNDS_FORCE * dt;
    }

    fn integrate(&mut self, dt: f32) {
        self.velocity += self.acceleration;
        self.position += self.velocity * dt;
        self.acceleration = Vec2::ZERO;

        self.velocity *= (-self.deceleration * dt).exp();
        let slow = 1.0 - CRYO_SLOW_FACTOR * self.status.cryo / STATUS_MAX;
        self.velocity = self.velocity.clamp_length_max(self.max_speed * slow);
        self.angle += self.angular_velocity * dt;
    }

    fn burn(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
        if self.health <= 0.0 {
            self.knock_out();
        }
    }

    fn update_fragments(&mut self, dt: f32) {
        let decay = (-FRAGMENT_DECELERATION * dt).exp();
        for f in self.fragments.iter_mut().filter(|f| !f.is_melted()) {
            f.position += f.velocity * dt;
            f.velocity *= decay;
            f.angle += f.angular_velocity * dt;
            let melt = if f.eaten {
                FRAGMENT_EATEN_MELT_RATE
            } else {
                FRAGMENT_MELT_RATE
            };
            f.health -= melt * dt;
            f.scale = (f.health / f.max_health).clamp(0.0, 1.0);
        }
    }

    fn update_animation(&mut self, dt: f32) {
        let clip = match self.state {
            LifeState::Frozen => AnimationClip::Frozen,
            LifeState::Disabled => AnimationClip::KnockedOut,
            _ if self.damage_flash > 0.0 => AnimationClip::Hurt,
            _ if self.velocity.length() > WALK_THRESHOLD => AnimationClip::Walk,
            _ => AnimationClip::Idle,
        };
        self.animation.play(clip);
        self.animation.advance(dt, self.animation_frames, self.animation_fps);
    }

    fn tint(&self) -> Tint {
        if self.damage_flash > 0.0 {
            return FLASH_TINT;
        }
        if self.state == LifeState::Frozen {
            return FROZEN_TINT;
        }
        let heat = self.status.fire / STATUS_MAX;
        let mut tint = [1.0, 1.0 - 0.4 * heat, 1.0 - 0.7 * heat, 1.0];
        if self.state == LifeState::Ghost {
            tint[3] = 0.5;
        }
        tint
    }

    pub fn draw(&self, sink: &mut dyn DrawSink) {
        match self.state {
            LifeState::Dormant | LifeState::Destroyed => {}
            LifeState::Shattered => {
                for f in self.fragments.iter().filter(|f| !f.is_melted()) {
                    sink.draw_quad(Quad {
                        texture: &self.texture,
                        position: f.position,
                        rotation: f.angle,
                        scale: f.scale,
                        tint: ICE_TINT,
                        frame: f.cell,
                    });
                }
            }
            _ => sink.draw_quad(Quad {
                texture: &self.texture,
                position: self.center(),
                rotation: self.angle,
                scale: self.scale,
                tint: self.tint(),
                frame: self.animation.frame,
            }),
        }
    }
}

/// Resolve contact between two units
///
/// Fire spreads between units within `FIRE_SPREAD_DISTANCE`: the neighbour
/// gains more than the source loses. Overlapping units that approach each
/// other exchange velocity elastically and are pushed apart. Returns true
/// when the bodies touched.
pub fn collide_units(a: &mut PhysicalUnit, b: &mut PhysicalUnit, dt: f32) -> bool {
    if !a.is_collidable() || !b.is_collidable() {
        return false;
    }
    let rect_a = a.hit_rect();
    let rect_b = b.hit_rect();

    let distance = distance_between_rects(&rect_a, &rect_b);
    if distance < FIRE_SPREAD_DISTANCE {
        let proximity = 1.0 - distance / FIRE_SPREAD_DISTANCE;
        spread_fire(a, b, proximity, dt);
    }

    if !rect_a.intersects(&rect_b) {
        return false;
    }

    let (va, vb) = (a.velocity, b.velocity);
    let (ma, mb) = (a.total_mass(), b.total_mass());
    let closing = (vb - va).dot(b.center() - a.center()) < 0.0;
    if closing {
        a.apply_impact(vb, mb);
        b.apply_impact(va, ma);
    }
    separate(a, b, rect_a.overlap(&rect_b));
    true
}

fn spread_fire(a: &mut PhysicalUnit, b: &mut PhysicalUnit, proximity: f32, dt: f32) {
    let (fire_a, fire_b) = (a.status.fire, b.status.fire);
    let share = FIRE_SPREAD_FACTOR * proximity * dt;
    let loss = FIRE_SPREAD_LOSS * proximity * dt;

    a.status.fire = (a.status.fire - fire_a * loss).max(0.0);
    b.status.fire = (b.status.fire - fire_b * loss).max(0.0);
    if fire_b > 0.0 {
        a.apply_status(StatusEffect::new(fire_b * share, 0.0, 0.0));
    }
    if fire_a > 0.0 {
        b.apply_status(StatusEffect::new(fire_a * share, 0.0, 0.0));
    }
}

/// Push overlapping units apart along the axis of least overlap
fn separate(a: &mut PhysicalUnit, b: &mut PhysicalUnit, overlap: Vec2) {
    let delta = b.center() - a.center();
    let push = if overlap.x < overlap.y {
        Vec2::new(overlap.x * delta.x.signum(), 0.0)
    } else {
        Vec2::new(0.0, overlap.y * delta.y.signum())
    };
    let (share_a, share_b) = match (a.state.is_movable(), b.state.is_movable()) {
        (true, true) => (0.5, 0.5),
        (true, false) => (1.0, 0.0),
        (false, true) => (0.0, 1.0),
        (false, false) => return,
    };
    a.position -= push * share_a;
    b.position += push * share_b;
}
