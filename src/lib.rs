//! Tank Arena - an arcade tank combat simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, combat, AI, scheduling)
//! - `config`: Tank/weapon/bomb archetypes chosen at session start
//! - `audio`: Pooled sound playback driven by simulation events

pub mod audio;
pub mod config;
pub mod sim;

pub use config::{BombKind, ConfigError, SessionConfig, TankKind, WeaponKind};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal frame length (one tick per rendered frame, ~60 Hz)
    pub const FRAME_MS: u64 = 16;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Tank footprint (square)
    pub const TANK_SIZE: f32 = 40.0;
    /// Base bullet diameter
    pub const BULLET_SIZE: f32 = 6.0;
    /// Base bullet speed (units per tick)
    pub const BULLET_SPEED: f32 = 7.0;
    /// Base weapon cooldown
    pub const BULLET_COOLDOWN_MS: u64 = 500;
    /// Trail positions kept per bullet
    pub const BULLET_TRAIL_LENGTH: usize = 5;

    pub const PLAYER_SPEED: f32 = 3.0;
    pub const PLAYER_ROTATION_SPEED: f32 = 0.05;
    pub const ENEMY_SPEED: f32 = 1.5;
    pub const ENEMY_ROTATION_SPEED: f32 = 0.03;

    pub const MAX_ENEMIES: usize = 5;
    pub const ENEMY_SPAWN_INTERVAL_MS: u64 = 3000;
    pub const KILL_REWARD: u64 = 100;

    /// Player bullets hit 200% harder, enemy bullets only 40%
    pub const PLAYER_DAMAGE_MULTIPLIER: f32 = 2.0;
    pub const ENEMY_DAMAGE_MULTIPLIER: f32 = 0.4;

    pub const BOMB_RECHARGE_MS: u64 = 20_000;
    pub const FREEZE_DURATION_MS: u64 = 3000;

    pub const HEALTH_PICKUP_INTERVAL_MS: u64 = 15_000;
    pub const HEALTH_PICKUP_AMOUNT: f32 = 50.0;
    pub const MAX_PICKUPS: usize = 3;
    pub const PICKUP_SIZE: f32 = 25.0;

    /// Per-tick work caps
    pub const MAX_PARTICLE_UPDATES: usize = 30;
    pub const MAX_BULLET_UPDATES: usize = 20;
    pub const MAX_ENEMY_UPDATES: usize = 3;
    /// Above this many enemies, bullets only test every other enemy
    pub const SPARSE_COLLISION_THRESHOLD: usize = 8;
    /// Frame counter wraps here
    pub const FRAME_COUNTER_WRAP: u64 = 1000;

    /// Explosion particle count at scale 1
    pub const EXPLOSION_PARTICLES: usize = 30;
}

/// Normalize angle to [-π, π]
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle > PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Turn `current` toward `target` by at most `max_step` radians (never snaps past)
#[inline]
pub fn rotate_toward(current: f32, target: f32, max_step: f32) -> f32 {
    let diff = normalize_angle(target - current);
    if diff > 0.0 {
        current + max_step.min(diff)
    } else {
        current - max_step.min(-diff)
    }
}

/// Unit vector for a heading angle
#[inline]
pub fn heading_vector(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::PI;

    #[test]
    fn test_rotate_toward_clamps_step() {
        let next = rotate_toward(0.0, 1.0, 0.05);
        assert!((next - 0.05).abs() < 1e-6);

        // Close enough: lands exactly on target
        let next = rotate_toward(0.98, 1.0, 0.05);
        assert!((next - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotate_toward_takes_short_way_round() {
        // From just below +π to just above -π is a small positive turn
        let next = rotate_toward(PI - 0.01, -PI + 0.01, 0.05);
        assert!(next > PI - 0.01);
    }

    proptest! {
        #[test]
        fn normalize_angle_stays_in_range(angle in -100.0f32..100.0) {
            let n = normalize_angle(angle);
            prop_assert!(n >= -PI - 1e-4 && n <= PI + 1e-4);
            // Same direction as the input
            prop_assert!((n.sin() - angle.sin()).abs() < 1e-3);
            prop_assert!((n.cos() - angle.cos()).abs() < 1e-3);
        }
    }
}
