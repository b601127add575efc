//! Runtime settings
//!
//! Quality and time-scale knobs the simulation reads at level construction
//! and every tick. Parsed from JSON; missing fields fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Live particle cap per generator for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 64,
            QualityPreset::Medium => 256,
            QualityPreset::High => 1024,
        }
    }
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Particle effects on/off
    pub particles: bool,
    /// Time multiplier while slow-time is held (1.0 = no slowdown)
    pub time_slow_factor: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            time_slow_factor: 0.3,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Parse settings JSON
    pub fn from_json(json: &str) -> SimResult<Self> {
        let settings: Settings = serde_json::from_str(json).map_err(|e| SimError::Parse {
            what: "settings",
            message: e.to_string(),
        })?;
        log::info!(
            "Loaded settings: quality {}, particles {}",
            settings.quality.as_str(),
            settings.particles
        );
        Ok(settings)
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Multiplier applied to the frame dt
    pub fn time_scale(&self, slow_time: bool) -> f32 {
        if slow_time {
            self.time_slow_factor.clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}
