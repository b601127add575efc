//! Data templates
//!
//! Immutable configuration records keyed by name. The registry is parsed
//! once from JSON into typed structs, validated, and then passed down by
//! reference; nothing in the simulation reads global tables.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult, require_non_negative, require_positive};
use crate::sim::draw::{Tint, WHITE};
use crate::sim::geometry::Rect;
use crate::sim::projectile::ProjectileEffect;
use crate::sim::status::StatusEffect;

/// Templates bundled with the crate
pub const BUILTIN_TEMPLATES: &str = include_str!("../data/templates.json");

/// Physical unit configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitTemplate {
    /// Texture key (falls back to the template name when empty)
    pub texture: String,
    /// Hit rectangle size
    pub size: Vec2,
    pub mass: f32,
    pub max_speed: f32,
    /// Force applied along the move command
    pub move_force: f32,
    /// Exponential velocity decay per second
    pub deceleration: f32,
    pub max_health: f32,
    /// Per-channel status decay per second
    pub status_resist: StatusEffect,
    /// Frames per animation clip
    pub animation_frames: u32,
    pub animation_fps: f32,
}

impl Default for UnitTemplate {
    fn default() -> Self {
        Self {
            texture: String::new(),
            size: Vec2::new(32.0, 32.0),
            mass: 1.0,
            max_speed: 200.0,
            move_force: 600.0,
            deceleration: 2.0,
            max_health: 100.0,
            status_resist: StatusEffect::new(10.0, 10.0, 10.0),
            animation_frames: 4,
            animation_fps: 8.0,
        }
    }
}

/// One particle generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleGeneratorTemplate {
    pub texture: String,
    /// Particles per second
    pub spawn_rate: f32,
    /// Seconds
    pub lifetime: f32,
    pub lifetime_variance: f32,
    pub speed: f32,
    pub speed_variance: f32,
    /// Emission arc around the base angle (degrees)
    pub spawn_arc: f32,
    /// Extra random angle (degrees)
    pub angle_jitter: f32,
    /// Random offset of the emit point (pixels)
    pub offset_variance: f32,
    /// Exponential velocity decay per second
    pub deceleration: f32,
    pub start_scale: f32,
    pub end_scale: f32,
    /// Radians/sec
    pub rotation_speed: f32,
    pub tint: Tint,
    /// Play particles backwards (converging instead of emitting)
    pub reversed: bool,
    pub max_particles: usize,
}

impl Default for ParticleGeneratorTemplate {
    fn default() -> Self {
        Self {
            texture: String::new(),
            spawn_rate: 0.0,
            lifetime: 1.0,
            lifetime_variance: 0.0,
            speed: 0.0,
            speed_variance: 0.0,
            spawn_arc: 0.0,
            angle_jitter: 0.0,
            offset_variance: 0.0,
            deceleration: 0.0,
            start_scale: 1.0,
            end_scale: 1.0,
            rotation_speed: 0.0,
            tint: WHITE,
            reversed: false,
            max_particles: 4096,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticleEffectTemplate {
    pub generators: Vec<ParticleGeneratorTemplate>,
}

/// Gun-style weapon firing pooled projectiles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileWeaponTemplate {
    pub texture: String,
    /// Seconds between triggers
    pub fire_delay: f32,
    pub speed: f32,
    pub speed_variance: f32,
    /// Total random spread (degrees)
    pub spread: f32,
    /// Seconds a projectile flies before expiring
    pub lifetime: f32,
    pub projectiles_per_fire: u32,
    /// Hits before stopping, -1 for infinite
    pub penetration: i32,
    pub mass: f32,
    pub size: Vec2,
    /// Stop at the aim point instead of flying on
    pub stops_at_target: bool,
    /// Impulse pushed back onto the shooter
    pub recoil: f32,
    pub proximity_effect: Option<String>,
    pub contact_effect: Option<String>,
    pub destination_effect: Option<String>,
}

impl Default for ProjectileWeaponTemplate {
    fn default() -> Self {
        Self {
            texture: String::new(),
            fire_delay: 0.25,
            speed: 400.0,
            speed_variance: 0.0,
            spread: 0.0,
            lifetime: 1.0,
            projectiles_per_fire: 1,
            penetration: 1,
            mass: 0.1,
            size: Vec2::new(8.0, 8.0),
            stops_at_target: false,
            recoil: 0.0,
            proximity_effect: None,
            contact_effect: None,
            destination_effect: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeleeWeaponTemplate {
    pub texture: String,
    pub fire_delay: f32,
    /// Reach of the swing (pixels)
    pub range: f32,
    /// Full swing arc (degrees)
    pub arc: f32,
    pub damage: f32,
    /// Impulse applied to each unit hit
    pub force: f32,
    pub status: StatusEffect,
    /// Impulse pushed back onto the swinger
    pub recoil: f32,
    /// Seconds the swing stays visible
    pub swing_time: f32,
}

impl Default for MeleeWeaponTemplate {
    fn default() -> Self {
        Self {
            texture: String::new(),
            fire_delay: 0.5,
            range: 40.0,
            arc: 90.0,
            damage: 10.0,
            force: 50.0,
            status: StatusEffect::ZERO,
            recoil: 0.0,
            swing_time: 0.15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HookShotTemplate {
    pub texture: String,
    pub fire_delay: f32,
    /// Hook flight speed
    pub speed: f32,
    /// Max flight distance before retracting
    pub range: f32,
    /// Force pulling owner and target together while attached
    pub pull_force: f32,
    pub retract_speed: f32,
    /// Hook hit box size
    pub size: Vec2,
}

impl Default for HookShotTemplate {
    fn default() -> Self {
        Self {
            texture: String::new(),
            fire_delay: 0.5,
            speed: 600.0,
            range: 300.0,
            pull_force: 800.0,
            retract_speed: 900.0,
            size: Vec2::new(10.0, 10.0),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrowableWeaponTemplate {
    pub ammo: u32,
    pub weapon: ProjectileWeaponTemplate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeaponTemplate {
    Projectile(ProjectileWeaponTemplate),
    Melee(MeleeWeaponTemplate),
    HookShot(HookShotTemplate),
    Throwable(ThrowableWeaponTemplate),
}

impl WeaponTemplate {
    pub fn fire_delay(&self) -> f32 {
        match self {
            WeaponTemplate::Projectile(t) => t.fire_delay,
            WeaponTemplate::Melee(t) => t.fire_delay,
            WeaponTemplate::HookShot(t) => t.fire_delay,
            WeaponTemplate::Throwable(t) => t.weapon.fire_delay,
        }
    }
}

/// Enemy = unit template + optional weapon
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTemplate {
    pub unit: String,
    pub weapon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WaveMode {
    /// Keep refilling freed slots, one every `interval` seconds
    Trickle { interval: f32 },
    /// Open a portal for `activation_delay` seconds, then spawn everyone once
    Burst {
        activation_delay: f32,
        #[serde(default)]
        portal: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveTemplate {
    pub enemy: String,
    pub count: usize,
    #[serde(default)]
    pub start_time: f32,
    pub mode: WaveMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlackHoleTemplate {
    /// Base pull (pixels/s²)
    pub gravity: f32,
    /// Mass it can swallow before it stops eating
    pub capacity: f32,
    /// Event horizon radius
    pub radius: f32,
    /// Extra gravity multiplier reached at full capacity
    pub growth: f32,
    pub swirl_effect: Option<String>,
    pub core_effect: Option<String>,
}

impl Default for BlackHoleTemplate {
    fn default() -> Self {
        Self {
            gravity: 120.0,
            capacity: 20.0,
            radius: 24.0,
            growth: 1.0,
            swirl_effect: None,
            core_effect: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelTemplate {
    pub bounds: Rect,
    pub player: String,
    pub player_spawn: Vec2,
    #[serde(default)]
    pub weapons: Vec<String>,
    #[serde(default)]
    pub black_hole: Option<String>,
    #[serde(default)]
    pub black_hole_position: Vec2,
    #[serde(default)]
    pub waves: Vec<String>,
}

/// Every template table, keyed by name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Registry {
    pub units: HashMap<String, UnitTemplate>,
    pub effects: HashMap<String, ProjectileEffect>,
    pub particles: HashMap<String, ParticleEffectTemplate>,
    pub weapons: HashMap<String, WeaponTemplate>,
    pub enemies: HashMap<String, EnemyTemplate>,
    pub waves: HashMap<String, WaveTemplate>,
    pub black_holes: HashMap<String, BlackHoleTemplate>,
    pub levels: HashMap<String, LevelTemplate>,
}

fn lookup<'a, T>(table: &'a HashMap<String, T>, kind: &'static str, name: &str) -> SimResult<&'a T> {
    table.get(name).ok_or_else(|| SimError::UnknownTemplate {
        kind,
        name: name.to_string(),
    })
}

impl Registry {
    /// Parse and validate a JSON template document
    pub fn from_json(json: &str) -> SimResult<Self> {
        let registry: Registry = serde_json::from_str(json).map_err(|e| SimError::Parse {
            what: "templates",
            message: e.to_string(),
        })?;
        registry.validate()?;
        log::info!(
            "Loaded templates: {} units, {} weapons, {} waves, {} levels",
            registry.units.len(),
            registry.weapons.len(),
            registry.waves.len(),
            registry.levels.len()
        );
        Ok(registry)
    }

    /// Templates shipped in `data/templates.json`
    pub fn builtin() -> SimResult<Self> {
        Self::from_json(BUILTIN_TEMPLATES)
    }

    pub fn unit(&self, name: &str) -> SimResult<&UnitTemplate> {
        lookup(&self.units, "unit", name)
    }

    pub fn effect(&self, name: &str) -> SimResult<&ProjectileEffect> {
        lookup(&self.effects, "effect", name)
    }

    pub fn particle_effect(&self, name: &str) -> SimResult<&ParticleEffectTemplate> {
        lookup(&self.particles, "particle effect", name)
    }

    pub fn weapon(&self, name: &str) -> SimResult<&WeaponTemplate> {
        lookup(&self.weapons, "weapon", name)
    }

    pub fn enemy(&self, name: &str) -> SimResult<&EnemyTemplate> {
        lookup(&self.enemies, "enemy", name)
    }

    pub fn wave(&self, name: &str) -> SimResult<&WaveTemplate> {
        lookup(&self.waves, "wave", name)
    }

    pub fn black_hole(&self, name: &str) -> SimResult<&BlackHoleTemplate> {
        lookup(&self.black_holes, "black hole", name)
    }

    pub fn level(&self, name: &str) -> SimResult<&LevelTemplate> {
        lookup(&self.levels, "level", name)
    }

    /// Check values the simulation divides by or loops on, and that every
    /// cross-reference resolves
    pub fn validate(&self) -> SimResult<()> {
        for (name, unit) in &self.units {
            require_positive("unit", name, "mass", unit.mass)?;
            require_positive("unit", name, "max_health", unit.max_health)?;
            require_non_negative("unit", name, "max_speed", unit.max_speed)?;
            require_non_negative("unit", name, "deceleration", unit.deceleration)?;
            require_positive("unit", name, "size.x", unit.size.x)?;
            require_positive("unit", name, "size.y", unit.size.y)?;
        }

        for (name, effect) in &self.effects {
            require_non_negative("effect", name, "radius", effect.radius)?;
            require_non_negative("effect", name, "duration", effect.duration)?;
        }

        for (name, particles) in &self.particles {
            for generator in &particles.generators {
                require_non_negative("particle effect", name, "spawn_rate", generator.spawn_rate)?;
                require_positive("particle effect", name, "lifetime", generator.lifetime)?;
            }
        }

        for (name, weapon) in &self.weapons {
            require_positive("weapon", name, "fire_delay", weapon.fire_delay())?;
            match weapon {
                WeaponTemplate::Projectile(t) => self.validate_projectile_weapon(name, t)?,
                WeaponTemplate::Throwable(t) => self.validate_projectile_weapon(name, &t.weapon)?,
                WeaponTemplate::Melee(t) => {
                    require_non_negative("weapon", name, "range", t.range)?;
                }
                WeaponTemplate::HookShot(t) => {
                    require_positive("weapon", name, "speed", t.speed)?;
                    require_positive("weapon", name, "retract_speed", t.retract_speed)?;
                }
            }
        }

        for enemy in self.enemies.values() {
            self.unit(&enemy.unit)?;
            if let Some(weapon) = &enemy.weapon {
                self.weapon(weapon)?;
            }
        }

        for (name, wave) in &self.waves {
            self.enemy(&wave.enemy)?;
            if wave.count == 0 {
                return Err(SimError::InvalidTemplate {
                    kind: "wave",
                    name: name.clone(),
                    reason: "count must be > 0".to_string(),
                });
            }
            require_non_negative("wave", name, "start_time", wave.start_time)?;
            match &wave.mode {
                WaveMode::Trickle { interval } => {
                    require_non_negative("wave", name, "interval", *interval)?;
                }
                WaveMode::Burst {
                    activation_delay,
                    portal,
                } => {
                    require_non_negative("wave", name, "activation_delay", *activation_delay)?;
                    if let Some(portal) = portal {
                        self.particle_effect(portal)?;
                    }
                }
            }
        }

        for (name, hole) in &self.black_holes {
            require_positive("black hole", name, "capacity", hole.capacity)?;
            require_non_negative("black hole", name, "radius", hole.radius)?;
            for effect in [&hole.swirl_effect, &hole.core_effect].into_iter().flatten() {
                self.particle_effect(effect)?;
            }
        }

        for (name, level) in &self.levels {
            self.unit(&level.player)?;
            for weapon in &level.weapons {
                self.weapon(weapon)?;
            }
            for wave in &level.waves {
                self.wave(wave)?;
            }
            if let Some(hole) = &level.black_hole {
                self.black_hole(hole)?;
            }
            require_positive("level", name, "bounds width", level.bounds.size.x)?;
            require_positive("level", name, "bounds height", level.bounds.size.y)?;
        }

        Ok(())
    }

    fn validate_projectile_weapon(&self, name: &str, t: &ProjectileWeaponTemplate) -> SimResult<()> {
        require_positive("weapon", name, "lifetime", t.lifetime)?;
        require_positive("weapon", name, "mass", t.mass)?;
        if t.projectiles_per_fire == 0 {
            return Err(SimError::InvalidTemplate {
                kind: "weapon",
                name: name.to_string(),
                reason: "projectiles_per_fire must be > 0".to_string(),
            });
        }
        if t.penetration == 0 || t.penetration < -1 {
            return Err(SimError::InvalidTemplate {
                kind: "weapon",
                name: name.to_string(),
                reason: format!("penetration must be -1 or > 0 (got {})", t.penetration),
            });
        }
        for effect in [&t.proximity_effect, &t.contact_effect, &t.destination_effect]
            .into_iter()
            .flatten()
        {
            self.effect(effect)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_templates_load() {
        let registry = Registry::builtin().expect("builtin templates");
        assert!(registry.level("glacier").is_ok());
        assert!(registry.unit("penguin").is_ok());
        assert!(matches!(
            registry.weapon("snowball_launcher"),
            Ok(WeaponTemplate::Projectile(_))
        ));
        assert!(matches!(registry.weapon("frost_grenade"), Ok(WeaponTemplate::Throwable(_))));
    }

    #[test]
    fn test_unknown_template() {
        let registry = Registry::default();
        match registry.unit("nobody") {
            Err(SimError::UnknownTemplate { kind, name }) => {
                assert_eq!(kind, "unit");
                assert_eq!(name, "nobody");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_zero_mass_rejected() {
        let json = r#"{ "units": { "ghost": { "mass": 0.0 } } }"#;
        let err = Registry::from_json(json).unwrap_err();
        assert!(matches!(err, SimError::InvalidTemplate { kind: "unit", .. }));
    }

    #[test]
    fn test_dangling_reference_rejected() {
        let json = r#"{
            "weapons": {
                "gun": { "kind": "projectile", "contact_effect": "missing" }
            }
        }"#;
        let err = Registry::from_json(json).unwrap_err();
        assert!(matches!(err, SimError::UnknownTemplate { kind: "effect", .. }));
    }

    #[test]
    fn test_parse_error() {
        let err = Registry::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SimError::Parse { what: "templates", .. }));
    }

    #[test]
    fn test_weapon_variants_parse() {
        let json = r#"{
            "weapons": {
                "club": { "kind": "melee", "range": 30.0, "arc": 120.0 },
                "hook": { "kind": "hook_shot", "range": 200.0 },
                "rock": { "kind": "throwable", "ammo": 2, "weapon": { "lifetime": 0.5 } }
            }
        }"#;
        let registry = Registry::from_json(json).unwrap();
        match registry.weapon("rock").unwrap() {
            WeaponTemplate::Throwable(t) => {
                assert_eq!(t.ammo, 2);
                assert_eq!(t.weapon.lifetime, 0.5);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(registry.weapon("hook"), Ok(WeaponTemplate::HookShot(_))));
        assert_eq!(registry.weapon("club").unwrap().fire_delay(), 0.5);
    }
}
