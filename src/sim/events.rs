//! Discrete simulation events
//!
//! Entities never call into rendering or audio. They push events here and the
//! host forwards them to whatever presentation/audio collaborators it has.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Role;
use crate::config::{BombKind, TankKind};

/// Named sound cues (no payload)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    Fire,
    Explosion,
}

impl SoundEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Fire => "fire",
            SoundEffect::Explosion => "explosion",
        }
    }
}

/// Something the presentation layer may want to react to this tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Fired { owner: Role, pos: Vec2, heading: f32 },
    Hit { target: Role, pos: Vec2, damage: f32 },
    Explosion { pos: Vec2, scale: f32 },
    Healed { pos: Vec2, amount: f32 },
    Frozen { pos: Vec2 },
    EnemySpawned { pos: Vec2, kind: TankKind },
    EnemyDestroyed { pos: Vec2, reward: u64 },
    PickupSpawned { pos: Vec2 },
    PickupCollected { pos: Vec2 },
    BombTriggered { pos: Vec2, kind: BombKind },
    BombReady,
    GameOver { score: u64 },
}
