//! Tank Arena headless runner
//!
//! Plays one session with the autopilot and prints a JSON summary:
//!
//! ```text
//! tank-arena [tank] [weapon] [bomb] [seed] [frames]
//! ```

use tank_arena::SessionConfig;
use tank_arena::audio::AudioManager;
use tank_arena::consts::FRAME_MS;
use tank_arena::sim::{GameEvent, GameState, Summary, autopilot, tick};

const DEFAULT_SEED: u64 = 12345;
/// Five minutes at ~60 fps
const DEFAULT_FRAMES: u64 = 18_000;

fn parse_number(arg: Option<&String>, name: &str, default: u64) -> Result<u64, String> {
    match arg {
        None => Ok(default),
        Some(s) => s.parse().map_err(|_| format!("invalid {name}: {s:?}")),
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let arg = |i: usize, default: &'static str| args.get(i).map(String::as_str).unwrap_or(default);

    let config = match SessionConfig::from_names(arg(0, "default"), arg(1, "standard"), arg(2, "cluster")) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    let (seed, frames) = match (
        parse_number(args.get(3), "seed", DEFAULT_SEED),
        parse_number(args.get(4), "frame count", DEFAULT_FRAMES),
    ) {
        (Ok(seed), Ok(frames)) => (seed, frames),
        (Err(e), _) | (_, Err(e)) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    log::info!("Tank Arena (headless) starting...");

    let mut state = GameState::new(config, seed);
    let mut audio = AudioManager::default();
    let (mut kills, mut bombs_used, mut pickups_collected) = (0u64, 0u64, 0u64);
    let mut played = 0u64;

    while played < frames && state.is_playing() {
        let input = autopilot(&state);
        tick(&mut state, &input, FRAME_MS);
        played += 1;

        audio.process(&state.sounds, state.time_ms);
        for event in &state.events {
            match event {
                GameEvent::EnemyDestroyed { .. } => kills += 1,
                GameEvent::BombTriggered { .. } => bombs_used += 1,
                GameEvent::PickupCollected { .. } => pickups_collected += 1,
                _ => {}
            }
        }
    }

    if state.is_playing() {
        state.end_session();
    }

    let summary = Summary {
        seed,
        tank: config.tank.as_str().to_string(),
        weapon: config.weapon.as_str().to_string(),
        bomb: config.bomb.as_str().to_string(),
        time_ms: state.time_ms,
        frames: played,
        phase: state.phase,
        score: state.score,
        kills,
        player_health: state.player.health.round(),
        enemies_alive: state.enemies.len(),
        bombs_used,
        pickups_collected,
    };

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            log::error!("Failed to serialize summary: {e}");
            std::process::exit(1);
        }
    }
}
