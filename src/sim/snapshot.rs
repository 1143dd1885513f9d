//! Read-only view of the simulation for renderers and tooling

use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::state::{GamePhase, GameState, Role, Tank};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TankView {
    pub role: Role,
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub color: u32,
    /// Health as a fraction of max, for health bars
    pub health: f32,
    pub frozen: bool,
    pub destroyed: bool,
    pub track_offset: f32,
}

impl From<&Tank> for TankView {
    fn from(tank: &Tank) -> Self {
        Self {
            role: tank.role,
            kind: tank.kind.as_str().to_string(),
            x: tank.pos.x,
            y: tank.pos.y,
            rotation: tank.rotation,
            color: tank.color,
            health: tank.health_fraction(),
            frozen: tank.frozen,
            destroyed: tank.destroyed,
            track_offset: tank.track_offset,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletView {
    pub owner: Role,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: u32,
    pub trail: Vec<[f32; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleView {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub alpha: f32,
    pub color: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupView {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub pulse: f32,
    pub spin: f32,
}

/// Everything a frame needs to draw, captured after a tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub time_ms: u64,
    pub phase: GamePhase,
    pub score: u64,
    pub bomb_ready: bool,
    pub player: TankView,
    pub enemies: Vec<TankView>,
    pub bullets: Vec<BulletView>,
    pub particles: Vec<ParticleView>,
    pub pickups: Vec<PickupView>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub events: Vec<GameEvent>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let bullets = state
            .player_bullets
            .iter()
            .chain(state.enemy_bullets.iter())
            .map(|b| BulletView {
                owner: b.owner,
                x: b.pos.x,
                y: b.pos.y,
                size: b.size,
                color: b.color,
                trail: b.trail.iter().map(|p| [p.x, p.y]).collect(),
            })
            .collect();

        Self {
            time_ms: state.time_ms,
            phase: state.phase,
            score: state.score,
            bomb_ready: state.bomb_ready,
            player: TankView::from(&state.player),
            enemies: state.enemies.iter().map(TankView::from).collect(),
            bullets,
            particles: state
                .particles
                .iter()
                .map(|p| ParticleView {
                    x: p.pos.x,
                    y: p.pos.y,
                    size: p.size,
                    alpha: p.alpha,
                    color: p.color,
                })
                .collect(),
            pickups: state
                .pickups
                .iter()
                .map(|p| PickupView {
                    x: p.pos.x,
                    y: p.pos.y,
                    size: p.size,
                    pulse: p.pulse,
                    spin: p.spin,
                })
                .collect(),
            events: state.events.clone(),
        }
    }
}

/// End-of-run numbers printed by the headless runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub seed: u64,
    pub tank: String,
    pub weapon: String,
    pub bomb: String,
    pub time_ms: u64,
    pub frames: u64,
    pub phase: GamePhase,
    pub score: u64,
    pub kills: u64,
    pub player_health: f32,
    pub enemies_alive: usize,
    pub bombs_used: u64,
    pub pickups_collected: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SessionConfig, TankKind, WeaponKind};
    use glam::Vec2;

    #[test]
    fn test_capture_reflects_state() {
        let mut state = GameState::new(SessionConfig::default(), 2);
        let mut enemy = Tank::enemy(TankKind::Heavy, WeaponKind::Cannon, 0x16A085, Vec2::new(100.0, 80.0));
        enemy.health = 37.5;
        enemy.frozen = true;
        state.enemies.push(enemy);
        state.score = 300;

        let snap = Snapshot::capture(&state);
        assert_eq!(snap.score, 300);
        assert!(snap.bomb_ready);
        assert_eq!(snap.player.health, 1.0);
        assert_eq!(snap.enemies.len(), 1);
        assert_eq!(snap.enemies[0].kind, "heavy");
        assert!((snap.enemies[0].health - 0.5).abs() < 1e-6);
        assert!(snap.enemies[0].frozen);
        assert_eq!(snap.particles.len(), state.particles.len());
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(SessionConfig::default(), 2);
        let json = serde_json::to_string(&Snapshot::capture(&state)).unwrap();
        assert!(json.contains("\"phase\":\"Playing\""));
        assert!(!json.contains("\"events\""));
    }
}
