//! Frostfall entry point
//!
//! Headless demo: builds a level from the bundled templates, drives the
//! player with a scripted pilot on a variable frame clock, and logs what
//! happens. `RUST_LOG=info` (or `debug`) controls the output.
//!
//! Usage: `frostfall [level] [seed] [seconds]`

#[cfg(not(target_arch = "wasm32"))]
use frostfall::consts::{MAX_SUBSTEPS, SIM_DT};
#[cfg(not(target_arch = "wasm32"))]
use frostfall::sim::{DrawList, Level, TickInput, tick};
#[cfg(not(target_arch = "wasm32"))]
use frostfall::{Registry, Settings, SimResult};
#[cfg(not(target_arch = "wasm32"))]
use glam::Vec2;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let level_name = args.next().unwrap_or_else(|| "glacier".to_string());
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);
    let seconds: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60.0);

    log::info!("Frostfall (headless) starting...");
    if let Err(e) = run(&level_name, seed, seconds) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is a library; there is no wasm driver
}

#[cfg(not(target_arch = "wasm32"))]
fn run(level_name: &str, seed: u64, seconds: f32) -> SimResult<()> {
    let registry = Registry::builtin()?;
    let mut level = Level::new(&registry, level_name, Settings::default(), seed)?;

    // Uneven frame times exercise the accumulator
    let frame_times = [1.0 / 60.0, 1.0 / 45.0, 1.0 / 90.0, 1.0 / 30.0];
    let mut accumulator = 0.0;
    let mut elapsed = 0.0;
    let mut frame = 0usize;
    let mut next_report = 1.0;

    while elapsed < seconds && !level.is_player_down() {
        let dt = frame_times[frame % frame_times.len()];
        frame += 1;
        elapsed += dt;
        accumulator += dt;

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = pilot(&level);
            tick(&mut level, &input, SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;
        }

        if elapsed >= next_report {
            next_report += 5.0;
            report(&level);
        }
    }

    let mut list = DrawList::new();
    level.draw(&mut list);
    report(&level);
    log::info!(
        "Finished after {} ticks ({:.1}s simulated), {} quads in the last frame",
        level.time_ticks,
        level.time,
        list.len()
    );
    println!(
        "{}: {} ticks, player {:?} at {:.0} hp, {} enemies alive, {} quads",
        level.name,
        level.time_ticks,
        level.player.state(),
        level.player.health(),
        level.enemy_count(),
        list.len()
    );
    Ok(())
}

/// Scripted player: keep away from the hole and the nearest enemy, aim at
/// that enemy and fire when one is on the field
#[cfg(not(target_arch = "wasm32"))]
fn pilot(level: &Level) -> TickInput {
    let center = level.player.center();
    let nearest = level
        .waves
        .iter()
        .filter(|w| w.is_active())
        .flat_map(|w| w.enemies())
        .filter(|e| e.unit.is_collidable())
        .map(|e| e.unit.center())
        .min_by(|a, b| a.distance_squared(center).total_cmp(&b.distance_squared(center)));

    let mut movement = Vec2::ZERO;
    if let Some(hole) = &level.black_hole {
        movement += (center - hole.position()).normalize_or_zero();
    }
    if let Some(enemy) = nearest {
        let away = (center - enemy).normalize_or_zero();
        // Strafe around the threat rather than straight back
        movement += away + away.perp() * 0.5;
    }

    let crowded = level.enemy_count() >= 4;
    let slot = if crowded { 2 } else { 0 };
    TickInput {
        movement,
        cursor: nearest,
        fire: nearest.is_some(),
        select_weapon: (level.current_weapon != slot).then_some(slot),
        slow_time: nearest.is_some_and(|e| e.distance(center) < 60.0),
        ..Default::default()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn report(level: &Level) {
    let hole = level
        .black_hole
        .as_ref()
        .map_or(0.0, |h| h.fullness() * 100.0);
    log::info!(
        "t={:.1}s player {:?} hp {:.0} | enemies {} | hole {:.0}% full | weapon '{}'",
        level.time,
        level.player.state(),
        level.player.health(),
        level.enemy_count(),
        hole,
        level.weapon().map_or("none", |w| w.name())
    );
}
