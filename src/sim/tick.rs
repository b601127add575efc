//! Fixed timestep simulation tick
//!
//! Advances a [`Level`] deterministically: same seed and same inputs give
//! the same state.

use glam::Vec2;

use super::level::Level;
use super::wave::collide_waves;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement intent; any length, zero = stand still
    pub movement: Vec2,
    /// Aim point in world space (player faces it)
    pub cursor: Option<Vec2>,
    /// Trigger the current weapon
    pub fire: bool,
    /// Jump to a weapon slot
    pub select_weapon: Option<usize>,
    /// Cycle to the next weapon
    pub next_weapon: bool,
    /// Hold bullet time
    pub slow_time: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the level by one frame
pub fn tick(level: &mut Level, input: &TickInput, dt: f32) {
    if input.pause {
        level.paused = !level.paused;
        log::debug!("Paused: {}", level.paused);
    }
    if level.paused {
        return;
    }

    let dt = dt * level.settings.time_scale(input.slow_time);
    if dt <= 0.0 {
        return;
    }
    level.time += dt;
    level.time_ticks += 1;

    if let Some(slot) = input.select_weapon {
        level.select_weapon(slot);
    }
    if input.next_weapon {
        level.cycle_weapon();
    }

    // Black hole
    if let Some(hole) = &mut level.black_hole {
        hole.update(dt, &mut level.rng);
    }

    // Player
    update_player(level, input, dt);

    // Player weapons; all of them, so shots in flight finish after a switch
    for weapon in &mut level.weapons {
        weapon.update(&mut level.player, dt, &mut level.rng);
    }

    // Waves chase the player while it is still in play
    let target = level
        .player
        .state()
        .takes_commands()
        .then(|| level.player.center());
    for wave in &mut level.waves {
        wave.update(target, dt, &level.bounds, &mut level.rng);
    }

    // Gravity
    if let Some(hole) = &mut level.black_hole {
        if hole.apply_to_unit(&mut level.player, dt) {
            log::info!("Player fell into the black hole");
        }
        for wave in &mut level.waves {
            for enemy in wave.enemies_mut() {
                hole.apply_to_unit(&mut enemy.unit, dt);
            }
        }
    }

    resolve_collisions(level, dt);
}

fn update_player(level: &mut Level, input: &TickInput, dt: f32) {
    let player = &mut level.player;
    if player.state().takes_commands() {
        player.set_move_direction(input.movement);
        if let Some(cursor) = input.cursor {
            player.look_at(cursor);
        }
    }

    if input.fire && player.state().takes_commands() {
        let target = input.cursor.unwrap_or_else(|| level.default_aim());
        let origin = level.player.center();
        if let Some(weapon) = level.weapons.get_mut(level.current_weapon) {
            weapon.trigger(origin, target);
        }
    }

    level.player.update(dt, &level.bounds);
}

fn resolve_collisions(level: &mut Level, dt: f32) {
    let Level {
        player,
        weapons,
        waves,
        rng,
        ..
    } = level;

    // Player weapons vs enemies of active waves
    for weapon in weapons.iter_mut() {
        for wave in waves.iter_mut().filter(|w| w.is_active()) {
            for enemy in wave.enemies_mut() {
                weapon.check_collision(&mut enemy.unit, dt, rng);
            }
        }
    }

    // Waves vs player, then within each wave
    for wave in waves.iter_mut() {
        wave.collide_with_player(player, dt, rng);
        wave.collide_within(dt);
    }

    // Cross-wave pairs of active waves
    for i in 0..waves.len() {
        let (head, tail) = waves.split_at_mut(i + 1);
        let a = &mut head[i];
        if !a.is_active() {
            continue;
        }
        for b in tail.iter_mut().filter(|b| b.is_active()) {
            collide_waves(a, b, dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::data::Registry;
    use crate::settings::Settings;
    use crate::sim::unit::LifeState;
    use crate::sim::weapon::WeaponKind;

    fn glacier(seed: u64) -> Level {
        let registry = Registry::builtin().unwrap();
        Level::new(&registry, "glacier", Settings::default(), seed).unwrap()
    }

    /// Positions and states of every unit, in iteration order
    fn snapshot(level: &Level) -> Vec<(Vec2, LifeState, f32)> {
        let mut units = vec![(level.player.center(), level.player.state(), level.player.health())];
        for wave in &level.waves {
            for enemy in wave.enemies() {
                units.push((enemy.unit.center(), enemy.unit.state(), enemy.unit.health()));
            }
        }
        units
    }

    #[test]
    fn test_determinism() {
        // Two levels with the same seed should produce identical results
        let mut level1 = glacier(99999);
        let mut level2 = glacier(99999);

        for i in 0..900 {
            let t = i as f32 * SIM_DT;
            let input = TickInput {
                movement: Vec2::new(t.cos(), t.sin()),
                cursor: Some(Vec2::new(640.0 + 200.0 * t.sin(), 200.0)),
                fire: i % 3 == 0,
                next_weapon: i % 240 == 0,
                ..Default::default()
            };
            tick(&mut level1, &input, SIM_DT);
            tick(&mut level2, &input, SIM_DT);
        }

        assert_eq!(level1.time_ticks, level2.time_ticks);
        assert_eq!(snapshot(&level1), snapshot(&level2));
        let spawned: Vec<usize> = level1.waves.iter().map(|w| w.spawned_so_far()).collect();
        assert!(spawned.iter().any(|&n| n > 0));
        assert_eq!(
            spawned,
            level2.waves.iter().map(|w| w.spawned_so_far()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_tick_pause() {
        let mut level = glacier(1);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut level, &pause, SIM_DT);
        assert!(level.paused);
        tick(&mut level, &TickInput::default(), SIM_DT);
        assert_eq!(level.time_ticks, 0);

        // Unpause
        tick(&mut level, &pause, SIM_DT);
        assert!(!level.paused);
        assert_eq!(level.time_ticks, 1);
    }

    #[test]
    fn test_slow_time_scales_dt() {
        let mut level = glacier(1);
        let input = TickInput {
            slow_time: true,
            ..Default::default()
        };
        tick(&mut level, &input, SIM_DT);
        assert!((level.time - SIM_DT * 0.3).abs() < 1e-6);
        tick(&mut level, &TickInput::default(), SIM_DT);
        assert!((level.time - SIM_DT * 1.3).abs() < 1e-6);
    }

    #[test]
    fn test_weapon_switch() {
        let mut level = glacier(1);
        let input = TickInput {
            select_weapon: Some(1),
            ..Default::default()
        };
        tick(&mut level, &input, SIM_DT);
        assert_eq!(level.current_weapon, 1);

        let input = TickInput {
            next_weapon: true,
            ..Default::default()
        };
        tick(&mut level, &input, SIM_DT);
        assert_eq!(level.current_weapon, 2 % level.weapons.len());
    }

    #[test]
    fn test_fire_launches_projectiles() {
        let mut level = glacier(5);
        let input = TickInput {
            cursor: Some(level.player.center() + Vec2::new(0.0, -200.0)),
            fire: true,
            ..Default::default()
        };
        tick(&mut level, &input, SIM_DT);
        let WeaponKind::Projectile(launcher) = &level.weapons[0].kind else {
            panic!("first glacier weapon should be a projectile weapon");
        };
        assert!(launcher.active_count() > 0);
        assert!(!level.weapons[0].core.is_ready());
    }

    #[test]
    fn test_movement_moves_player() {
        let mut level = glacier(1);
        let start = level.player.center();
        let input = TickInput {
            movement: Vec2::new(1.0, 0.0),
            ..Default::default()
        };
        for _ in 0..30 {
            tick(&mut level, &input, SIM_DT);
        }
        assert!(level.player.center().x > start.x + 10.0);
    }

    #[test]
    fn test_player_eaten_by_black_hole() {
        let mut level = glacier(1);
        let hole = level.black_hole.as_ref().unwrap().position();
        level.player.respawn_centered(hole);
        tick(&mut level, &TickInput::default(), SIM_DT);
        assert_eq!(level.player.state(), LifeState::BeingEaten);

        // Commands are ignored from here on
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut level, &input, SIM_DT);
        assert!(level.weapons[level.current_weapon].core.is_ready());
    }
}
