//! Damage, healing and freezing
//!
//! `take_damage` is symmetric: it only applies the target's armor. Role-based
//! multipliers (player bullets hit harder, enemy bullets softer) are applied
//! by the caller before the damage gets here.

use super::effects;
use super::events::{GameEvent, SoundEffect};
use super::state::{GameState, Tank};
use crate::consts::KILL_REWARD;

/// Result of applying damage to a tank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Target was already destroyed; nothing changed
    Ignored,
    Survived,
    /// This hit destroyed the target
    Destroyed,
}

/// Apply `raw * armor` damage, flooring health at zero
pub fn take_damage(tank: &mut Tank, raw: f32) -> DamageOutcome {
    if tank.destroyed {
        return DamageOutcome::Ignored;
    }

    let effective = (raw * tank.armor).max(0.0);
    tank.health = (tank.health - effective).max(0.0);

    if tank.health <= 0.0 {
        tank.health = 0.0;
        tank.destroyed = true;
        DamageOutcome::Destroyed
    } else {
        DamageOutcome::Survived
    }
}

/// Stop the tank in place as of `now_ms`. Returns false for destroyed tanks.
pub fn freeze(tank: &mut Tank, now_ms: u64) -> bool {
    if tank.destroyed {
        return false;
    }
    tank.frozen = true;
    tank.frozen_at_ms = now_ms;
    true
}

/// Restore health up to max. Returns the amount actually restored.
pub fn heal(tank: &mut Tank, amount: f32) -> f32 {
    if tank.destroyed {
        return 0.0;
    }
    let before = tank.health;
    tank.health = (tank.health + amount.max(0.0)).min(tank.max_health);
    tank.health - before
}

impl GameState {
    /// Damage the enemy at `index`. A kill pays the reward and removes it.
    pub fn damage_enemy(&mut self, index: usize, raw: f32) -> DamageOutcome {
        let Some(enemy) = self.enemies.get_mut(index) else {
            return DamageOutcome::Ignored;
        };

        let outcome = take_damage(enemy, raw);
        if outcome == DamageOutcome::Destroyed {
            let enemy = self.enemies.remove(index);
            effects::explosion(&mut self.particles, &mut self.rng, enemy.pos, 1.0, None);
            self.play(SoundEffect::Explosion);
            self.score += KILL_REWARD;
            self.emit(GameEvent::EnemyDestroyed {
                pos: enemy.pos,
                reward: KILL_REWARD,
            });
            log::debug!("Enemy {} destroyed, score {}", enemy.kind.as_str(), self.score);
        }
        outcome
    }

    /// Damage the player. Destroying the player ends the game.
    pub fn damage_player(&mut self, raw: f32) -> DamageOutcome {
        let outcome = take_damage(&mut self.player, raw);
        if outcome == DamageOutcome::Destroyed {
            let pos = self.player.pos;
            effects::explosion(&mut self.particles, &mut self.rng, pos, 1.0, None);
            self.play(SoundEffect::Explosion);
            self.game_over();
        }
        outcome
    }

    pub fn freeze_enemy(&mut self, index: usize) -> bool {
        let now = self.time_ms;
        let Some(enemy) = self.enemies.get_mut(index) else {
            return false;
        };
        if !freeze(enemy, now) {
            return false;
        }
        let pos = enemy.pos;
        effects::freeze_crystals(&mut self.particles, &mut self.rng, pos);
        self.emit(GameEvent::Frozen { pos });
        true
    }

    pub fn heal_player(&mut self, amount: f32) -> f32 {
        let healed = heal(&mut self.player, amount);
        if !self.player.destroyed {
            let pos = self.player.pos;
            effects::healing(&mut self.particles, &mut self.rng, pos);
            self.emit(GameEvent::Healed { pos, amount: healed });
        }
        healed
    }
}
