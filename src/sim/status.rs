//! Status effects: fire, cryo and shock
//!
//! A plain additive triple. Operators never clamp; owners call
//! [`StatusEffect::clamped`] after combining so every channel stays in
//! [0, STATUS_MAX].

use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::consts::STATUS_MAX;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusEffect {
    pub fire: f32,
    pub cryo: f32,
    pub shock: f32,
}

impl StatusEffect {
    pub const ZERO: StatusEffect = StatusEffect::new(0.0, 0.0, 0.0);

    pub const fn new(fire: f32, cryo: f32, shock: f32) -> Self {
        Self { fire, cryo, shock }
    }

    /// Every channel clamped to [0, STATUS_MAX]; NaN becomes 0
    pub fn clamped(self) -> Self {
        fn clamp(v: f32) -> f32 {
            if v.is_nan() { 0.0 } else { v.clamp(0.0, STATUS_MAX) }
        }
        Self {
            fire: clamp(self.fire),
            cryo: clamp(self.cryo),
            shock: clamp(self.shock),
        }
    }

    /// Decay each channel by its resist rate (per second), then clamp
    pub fn decay(&mut self, resist: &StatusEffect, dt: f32) {
        *self = (*self - *resist * dt).clamped();
    }

    pub fn is_zero(&self) -> bool {
        self.fire <= 0.0 && self.cryo <= 0.0 && self.shock <= 0.0
    }
}

impl Add for StatusEffect {
    type Output = StatusEffect;

    fn add(self, rhs: StatusEffect) -> StatusEffect {
        StatusEffect::new(self.fire + rhs.fire, self.cryo + rhs.cryo, self.shock + rhs.shock)
    }
}

impl Sub for StatusEffect {
    type Output = StatusEffect;

    fn sub(self, rhs: StatusEffect) -> StatusEffect {
        StatusEffect::new(self.fire - rhs.fire, self.cryo - rhs.cryo, self.shock - rhs.shock)
    }
}

impl Mul<f32> for StatusEffect {
    type Output = StatusEffect;

    fn mul(self, rhs: f32) -> StatusEffect {
        StatusEffect::new(self.fire * rhs, self.cryo * rhs, self.shock * rhs)
    }
}

impl AddAssign for StatusEffect {
    fn add_assign(&mut self, rhs: StatusEffect) {
        *self = *self + rhs;
    }
}

impl SubAssign for StatusEffect {
    fn sub_assign(&mut self, rhs: StatusEffect) {
        *self = *self - rhs;
    }
}
