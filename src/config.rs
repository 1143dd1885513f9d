//! Session configuration and archetype tables
//!
//! Chosen once before a session starts and fixed for its duration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Configuration lookup failures (fatal at session start)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown tank type: {0}")]
    UnknownTank(String),
    #[error("unknown weapon type: {0}")]
    UnknownWeapon(String),
    #[error("unknown bomb type: {0}")]
    UnknownBomb(String),
    #[error("malformed session config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tank chassis archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TankKind {
    #[default]
    Default,
    Speeder,
    Heavy,
}

/// Chassis stats for one side of the fight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankStats {
    pub speed: f32,
    pub health: f32,
    /// Damage multiplier (lower is better)
    pub armor: f32,
    pub body_color: u32,
}

impl TankKind {
    pub const ALL: [TankKind; 3] = [TankKind::Default, TankKind::Speeder, TankKind::Heavy];

    pub fn as_str(&self) -> &'static str {
        match self {
            TankKind::Default => "default",
            TankKind::Speeder => "speeder",
            TankKind::Heavy => "heavy",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default" => Some(TankKind::Default),
            "speeder" => Some(TankKind::Speeder),
            "heavy" => Some(TankKind::Heavy),
            _ => None,
        }
    }

    /// Player-side stats
    pub fn player_stats(&self) -> TankStats {
        match self {
            TankKind::Default => TankStats {
                speed: PLAYER_SPEED,
                health: 200.0,
                armor: 0.6,
                body_color: 0x2980B9,
            },
            TankKind::Speeder => TankStats {
                speed: PLAYER_SPEED * 1.5,
                health: 150.0,
                armor: 0.7,
                body_color: 0xE67E22,
            },
            TankKind::Heavy => TankStats {
                speed: PLAYER_SPEED * 0.7,
                health: 300.0,
                armor: 0.5,
                body_color: 0x8E44AD,
            },
        }
    }

    /// Enemy-side stats - much weaker than the player's
    pub fn enemy_stats(&self) -> TankStats {
        match self {
            TankKind::Default => TankStats {
                speed: ENEMY_SPEED,
                health: 50.0,
                armor: 1.0,
                body_color: 0x2980B9,
            },
            TankKind::Speeder => TankStats {
                speed: ENEMY_SPEED * 1.5,
                health: 40.0,
                armor: 1.2, // Takes 20% more damage
                body_color: 0xE67E22,
            },
            TankKind::Heavy => TankStats {
                speed: ENEMY_SPEED * 0.7,
                health: 75.0,
                armor: 0.8,
                body_color: 0x8E44AD,
            },
        }
    }
}

/// Weapon archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponKind {
    #[default]
    Standard,
    Rapid,
    Cannon,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponStats {
    pub damage: f32,
    pub cooldown_ms: u64,
    pub bullet_speed: f32,
    pub bullet_size: f32,
    pub bullet_color: u32,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 3] = [WeaponKind::Standard, WeaponKind::Rapid, WeaponKind::Cannon];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponKind::Standard => "standard",
            WeaponKind::Rapid => "rapid",
            WeaponKind::Cannon => "cannon",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "standard" => Some(WeaponKind::Standard),
            "rapid" => Some(WeaponKind::Rapid),
            "cannon" => Some(WeaponKind::Cannon),
            _ => None,
        }
    }

    pub fn stats(&self) -> WeaponStats {
        match self {
            WeaponKind::Standard => WeaponStats {
                damage: 25.0,
                cooldown_ms: BULLET_COOLDOWN_MS,
                bullet_speed: BULLET_SPEED,
                bullet_size: BULLET_SIZE,
                bullet_color: 0x3498DB,
            },
            WeaponKind::Rapid => WeaponStats {
                damage: 15.0,
                cooldown_ms: BULLET_COOLDOWN_MS * 2 / 5,
                bullet_speed: BULLET_SPEED * 1.2,
                bullet_size: BULLET_SIZE * 0.8,
                bullet_color: 0xE74C3C,
            },
            WeaponKind::Cannon => WeaponStats {
                damage: 50.0,
                cooldown_ms: BULLET_COOLDOWN_MS * 2,
                bullet_speed: BULLET_SPEED * 0.8,
                bullet_size: BULLET_SIZE * 1.5,
                bullet_color: 0x2ECC71,
            },
        }
    }
}

/// Special bomb archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BombKind {
    #[default]
    Cluster,
    Emp,
    Nuke,
}

/// How a bomb applies its damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BombEffect {
    /// Full blast plus delayed half-strength sub-blasts
    Cluster,
    /// Freeze plus a small flat damage
    Freeze,
    /// Linear distance falloff
    Nuke,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BombStats {
    pub damage: f32,
    pub range: f32,
    pub color: u32,
    pub effect: BombEffect,
}

impl BombKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BombKind::Cluster => "cluster",
            BombKind::Emp => "emp",
            BombKind::Nuke => "nuke",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cluster" => Some(BombKind::Cluster),
            "emp" | "freeze" => Some(BombKind::Emp),
            "nuke" => Some(BombKind::Nuke),
            _ => None,
        }
    }

    pub fn stats(&self) -> BombStats {
        match self {
            BombKind::Cluster => BombStats {
                damage: 30.0,
                range: 100.0,
                color: 0xF39C12,
                effect: BombEffect::Cluster,
            },
            BombKind::Emp => BombStats {
                damage: 10.0,
                range: 150.0,
                color: 0x3498DB,
                effect: BombEffect::Freeze,
            },
            BombKind::Nuke => BombStats {
                damage: 75.0,
                range: 200.0,
                color: 0xE74C3C,
                effect: BombEffect::Nuke,
            },
        }
    }
}

/// Player loadout for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub tank: TankKind,
    pub weapon: WeaponKind,
    pub bomb: BombKind,
}

impl SessionConfig {
    /// Resolve a loadout from archetype names
    pub fn from_names(tank: &str, weapon: &str, bomb: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            tank: TankKind::from_str(tank).ok_or_else(|| ConfigError::UnknownTank(tank.into()))?,
            weapon: WeaponKind::from_str(weapon)
                .ok_or_else(|| ConfigError::UnknownWeapon(weapon.into()))?,
            bomb: BombKind::from_str(bomb).ok_or_else(|| ConfigError::UnknownBomb(bomb.into()))?,
        })
    }

    /// Parse a loadout from JSON, e.g. `{"tank":"heavy","weapon":"cannon","bomb":"nuke"}`
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }
}
