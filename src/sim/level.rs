//! Level state
//!
//! Everything one play session owns: the player and their weapons, the
//! black hole, the enemy waves, the bounds, the seeded RNG and settings.
//! Advanced only by [`super::tick::tick`].

use glam::Vec2;

use super::black_hole::BlackHole;
use super::draw::DrawSink;
use super::geometry::Rect;
use super::rng::{SimRng, seeded};
use super::unit::{PhysicalUnit, UnitId};
use super::wave::Wave;
use super::weapon::Weapon;
use crate::data::Registry;
use crate::error::SimResult;
use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct Level {
    /// Template name
    pub name: String,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Playable area
    pub bounds: Rect,
    pub player: PhysicalUnit,
    pub weapons: Vec<Weapon>,
    /// Index into `weapons`
    pub current_weapon: usize,
    pub black_hole: Option<BlackHole>,
    /// Iterated in template order
    pub waves: Vec<Wave>,
    pub rng: SimRng,
    pub settings: Settings,
    /// Scaled seconds simulated so far
    pub time: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub paused: bool,
    /// Next unit ID
    next_id: u32,
}

impl Level {
    /// Build the named level from the registry
    pub fn new(registry: &Registry, name: &str, settings: Settings, seed: u64) -> SimResult<Self> {
        let template = registry.level(name)?;
        let mut next_id = 0;
        let mut alloc = || {
            next_id += 1;
            UnitId(next_id)
        };

        let mut player = PhysicalUnit::new(alloc(), &template.player, registry.unit(&template.player)?);
        player.respawn_centered(template.player_spawn);

        let weapons = template
            .weapons
            .iter()
            .map(|w| Weapon::from_registry(registry, w))
            .collect::<SimResult<Vec<_>>>()?;

        let black_hole = template
            .black_hole
            .as_deref()
            .map(|b| BlackHole::from_registry(registry, b, template.black_hole_position))
            .transpose()?;

        let waves = template
            .waves
            .iter()
            .map(|w| Wave::from_registry(registry, w, &mut alloc))
            .collect::<SimResult<Vec<_>>>()?;

        let mut level = Self {
            name: name.to_string(),
            seed,
            bounds: template.bounds,
            player,
            weapons,
            current_weapon: 0,
            black_hole,
            waves,
            rng: seeded(seed),
            settings: Settings::default(),
            time: 0.0,
            time_ticks: 0,
            paused: false,
            next_id: next_id + 1,
        };
        level.apply_settings(settings);

        log::info!(
            "Level '{}' ready: {} weapons, {} waves, seed {}",
            name,
            level.weapons.len(),
            level.waves.len(),
            seed
        );
        Ok(level)
    }

    /// Allocate a new unit ID
    pub fn next_entity_id(&mut self) -> UnitId {
        let id = UnitId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Swap settings in and push the particle cap down to every effect
    pub fn apply_settings(&mut self, settings: Settings) {
        let cap = settings.max_particles();
        if let Some(hole) = &mut self.black_hole {
            hole.set_particle_cap(cap);
        }
        for wave in &mut self.waves {
            wave.set_particle_cap(cap);
        }
        self.settings = settings;
    }

    pub fn weapon(&self) -> Option<&Weapon> {
        self.weapons.get(self.current_weapon)
    }

    /// Switch weapons; out-of-range slots are ignored
    pub fn select_weapon(&mut self, slot: usize) {
        if slot < self.weapons.len() {
            self.current_weapon = slot;
        }
    }

    pub fn cycle_weapon(&mut self) {
        if !self.weapons.is_empty() {
            self.current_weapon = (self.current_weapon + 1) % self.weapons.len();
        }
    }

    /// Where the player aims without a cursor: straight ahead
    pub fn default_aim(&self) -> Vec2 {
        self.player.center() + crate::vector_from_radians(self.player.facing()) * 100.0
    }

    pub fn is_player_down(&self) -> bool {
        !self.player.is_updating()
    }

    pub fn enemy_count(&self) -> usize {
        self.waves.iter().map(Wave::living_count).sum()
    }

    /// Side-effect-free draw pass
    pub fn draw(&self, sink: &mut dyn DrawSink) {
        if let Some(hole) = &self.black_hole {
            hole.draw(sink);
        }
        for wave in &self.waves {
            wave.draw(sink);
        }
        self.player.draw(sink);
        for weapon in &self.weapons {
            weapon.draw(sink);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Registry;
    use crate::error::SimError;
    use crate::settings::QualityPreset;
    use crate::sim::draw::DrawList;
    use crate::sim::unit::LifeState;

    fn glacier(seed: u64) -> Level {
        let registry = Registry::builtin().unwrap();
        Level::new(&registry, "glacier", Settings::default(), seed).unwrap()
    }

    #[test]
    fn test_builds_from_builtin() {
        let level = glacier(1);
        assert_eq!(level.player.state(), LifeState::Living);
        assert!(level.bounds.contains_point(level.player.center()));
        assert!(!level.weapons.is_empty());
        assert!(level.black_hole.is_some());
        assert!(!level.waves.is_empty());
        assert_eq!(level.enemy_count(), 0);
    }

    #[test]
    fn test_unit_ids_unique() {
        let mut level = glacier(1);
        let mut ids = vec![level.player.id()];
        for wave in &level.waves {
            ids.extend(wave.enemies().iter().map(|e| e.unit.id()));
        }
        let fresh = level.next_entity_id();
        assert!(!ids.contains(&fresh));
        ids.sort_by_key(|id| id.0);
        ids.dedup();
        assert_eq!(ids.len(), 1 + level.waves.iter().map(|w| w.enemies().len()).sum::<usize>());
    }

    #[test]
    fn test_unknown_level() {
        let registry = Registry::builtin().unwrap();
        let err = Level::new(&registry, "lava", Settings::default(), 0).unwrap_err();
        assert!(matches!(err, SimError::UnknownTemplate { kind: "level", .. }));
    }

    #[test]
    fn test_weapon_selection() {
        let mut level = glacier(1);
        let count = level.weapons.len();
        level.select_weapon(count + 3);
        assert_eq!(level.current_weapon, 0);
        level.select_weapon(count - 1);
        assert_eq!(level.current_weapon, count - 1);
        level.cycle_weapon();
        assert_eq!(level.current_weapon, 0);
        assert!(level.weapon().is_some());
    }

    #[test]
    fn test_draw_includes_player() {
        let level = glacier(1);
        let mut list = DrawList::new();
        level.draw(&mut list);
        assert_eq!(list.count_texture("penguin"), 1);
    }

    #[test]
    fn test_settings_cap_particles() {
        let mut level = glacier(1);
        level.apply_settings(Settings {
            particles: false,
            ..Settings::from_preset(QualityPreset::Low)
        });
        assert_eq!(level.settings.max_particles(), 0);
    }
}
