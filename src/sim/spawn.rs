//! Enemy wave spawns and health pickup placement

use glam::Vec2;
use rand::Rng;

use super::effects;
use super::events::GameEvent;
use super::state::{GameState, HealthPickup, Tank};
use crate::config::{TankKind, WeaponKind};
use crate::consts::*;

/// Body colors enemies are painted with
pub const ENEMY_COLORS: [u32; 4] = [0x8E44AD, 0xD35400, 0xC0392B, 0x16A085];

/// Distance kept from the arena walls for spawns
const EDGE_MARGIN: f32 = 50.0;
/// Placement attempts for a health pickup before giving up
const PICKUP_ATTEMPTS: usize = 20;
/// Pickups keep at least this far from any enemy
const PICKUP_ENEMY_CLEARANCE: f32 = 100.0;
/// ... and this far from the player
const PICKUP_PLAYER_CLEARANCE: f32 = 150.0;

/// Enemy entry point: top edge half the time, left or right edge otherwise
pub fn pick_spawn_point<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    let roll: f32 = rng.random();
    let along_x = rng.random::<f32>() * (ARENA_WIDTH - 2.0 * EDGE_MARGIN) + EDGE_MARGIN;
    let along_y = rng.random::<f32>() * (ARENA_HEIGHT - 2.0 * EDGE_MARGIN) + EDGE_MARGIN;

    if roll < 0.5 {
        Vec2::new(along_x, EDGE_MARGIN)
    } else if roll < 0.75 {
        Vec2::new(EDGE_MARGIN, along_y)
    } else {
        Vec2::new(ARENA_WIDTH - EDGE_MARGIN, along_y)
    }
}

/// Look for a pickup location clear of the player and every enemy.
/// Returns `None` when all attempts land too close to something.
pub fn find_pickup_spot<R: Rng + ?Sized>(rng: &mut R, player: Vec2, enemies: &[Tank]) -> Option<Vec2> {
    for _ in 0..PICKUP_ATTEMPTS {
        let candidate = Vec2::new(
            EDGE_MARGIN + rng.random::<f32>() * (ARENA_WIDTH - 2.0 * EDGE_MARGIN),
            EDGE_MARGIN + rng.random::<f32>() * (ARENA_HEIGHT - 2.0 * EDGE_MARGIN),
        );

        let clear_of_enemies = enemies
            .iter()
            .all(|e| e.pos.distance(candidate) >= PICKUP_ENEMY_CLEARANCE);
        if clear_of_enemies && candidate.distance(player) >= PICKUP_PLAYER_CLEARANCE {
            return Some(candidate);
        }
    }
    None
}

impl GameState {
    /// Add one enemy at an arena edge. No-op at the enemy cap or once play ends.
    pub fn spawn_enemy(&mut self) -> bool {
        if !self.is_playing() || self.enemies.len() >= MAX_ENEMIES {
            return false;
        }

        let pos = pick_spawn_point(&mut self.rng);
        let kind = TankKind::ALL[self.rng.random_range(0..TankKind::ALL.len())];
        let weapon = WeaponKind::ALL[self.rng.random_range(0..WeaponKind::ALL.len())];
        let color = ENEMY_COLORS[self.rng.random_range(0..ENEMY_COLORS.len())];

        self.enemies.push(Tank::enemy(kind, weapon, color, pos));
        effects::teleport(&mut self.particles, &mut self.rng, pos);
        self.emit(GameEvent::EnemySpawned { pos, kind });
        log::debug!(
            "Enemy spawned: {} with {} at ({:.0}, {:.0}), {} alive",
            kind.as_str(),
            weapon.as_str(),
            pos.x,
            pos.y,
            self.enemies.len()
        );
        true
    }

    /// Place a health pack somewhere safe. Gives up quietly if no spot is found.
    pub fn spawn_health_pickup(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }

        let Some(pos) = find_pickup_spot(&mut self.rng, self.player.pos, &self.enemies) else {
            log::debug!("No clear spot for a health pickup; skipping");
            return false;
        };

        self.pickups.push(HealthPickup::new(pos));
        self.last_pickup_ms = self.time_ms;
        effects::pickup_spawn(&mut self.particles, &mut self.rng, pos);
        self.emit(GameEvent::PickupSpawned { pos });
        true
    }
}
